//! The closed set of renderable primitives.

use gi_math::{Mat4, Ray, Vec3};

use crate::material::{Color, Material};
use crate::sphere::Sphere;
use crate::triangle::{Triangle, UvTriangle};

/// A ray-surface hit in camera space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub point: Vec3,
    /// Unit surface normal
    pub normal: Vec3,
}

/// Any object the tracer can hit.
#[derive(Debug, Clone)]
pub enum Primitive {
    Sphere(Sphere),
    Triangle(Triangle),
    UvTriangle(UvTriangle),
}

impl Primitive {
    /// Cache the camera-space form of the primitive for this frame.
    pub fn obtain_camera_coordinates(&mut self, view: &Mat4) {
        match self {
            Self::Sphere(s) => s.obtain_camera_coordinates(view),
            Self::Triangle(t) => t.obtain_camera_coordinates(view),
            Self::UvTriangle(t) => t.obtain_camera_coordinates(view),
        }
    }

    /// Intersect a camera-space ray.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        match self {
            Self::Sphere(s) => s.intersect(ray),
            Self::Triangle(t) => t.intersect(ray),
            Self::UvTriangle(t) => t.intersect(ray),
        }
    }

    pub fn material(&self) -> &Material {
        match self {
            Self::Sphere(s) => s.material(),
            Self::Triangle(t) => t.material(),
            Self::UvTriangle(t) => t.material(),
        }
    }

    /// Base surface color at a hit.
    pub fn color(&self, hit: &Intersection) -> Color {
        match self {
            Self::Sphere(s) => s.color(hit),
            Self::Triangle(t) => t.color(hit),
            Self::UvTriangle(t) => t.color(hit),
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(sphere: Sphere) -> Self {
        Self::Sphere(sphere)
    }
}

impl From<Triangle> for Primitive {
    fn from(triangle: Triangle) -> Self {
        Self::Triangle(triangle)
    }
}

impl From<UvTriangle> for Primitive {
    fn from(triangle: UvTriangle) -> Self {
        Self::UvTriangle(triangle)
    }
}
