//! Sphere primitive for ray tracing.

use gi_math::{point_h, Mat4, Mat4Ext, Ray, Vec3, Vec4};

use crate::material::{Color, Material};
use crate::primitive::Intersection;

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec4,
    radius: f32,
    /// Center as of the last projection
    camera_center: Vec3,
    material: Material,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        Self {
            center: point_h(center.x, center.y, center.z),
            radius,
            camera_center: center,
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center.truncate()
    }

    /// Move the sphere in world space. Takes effect at the next projection.
    pub fn set_center(&mut self, center: Vec3) {
        self.center = point_h(center.x, center.y, center.z);
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn obtain_camera_coordinates(&mut self, view: &Mat4) {
        self.camera_center = view.project_point_h(self.center);
    }

    /// Nearest non-negative root of |o + t d - c|^2 = r^2.
    ///
    /// When the origin is inside the sphere the far root is returned.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let oc = ray.origin() - self.camera_center;
        // Direction is unit length, so a = 1
        let b = 2.0 * ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = b * b - 4.0 * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let near = (-b - sqrtd) / 2.0;
        let far = (-b + sqrtd) / 2.0;

        let t = if near >= 0.0 {
            near
        } else if far >= 0.0 {
            far
        } else {
            return None;
        };

        let point = ray.at(t);
        let normal = (point - self.camera_center).normalize();
        Some(Intersection { point, normal })
    }

    /// Surface color: the normal remapped into [0, 1].
    pub fn color(&self, hit: &Intersection) -> Color {
        (hit.normal + Vec3::ONE) / 2.0
    }
}
