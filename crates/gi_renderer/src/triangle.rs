//! Triangle primitives for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.
//! [`UvTriangle`] adds per-vertex texture coordinates and shades with a
//! procedural checkerboard.

use std::ops::{Add, Mul};

use gi_math::{point_h, Mat4, Mat4Ext, Ray, Vec2, Vec3, Vec4};

use crate::material::{Color, Material};
use crate::primitive::Intersection;

/// Checker squares per unit of UV.
const CHECKER_SCALE: f32 = 30.0;
const CHECKER_EVEN: Color = Color::new(1.0, 0.0, 0.0);
const CHECKER_ODD: Color = Color::new(1.0, 1.0, 0.0);

/// A triangle primitive.
#[derive(Debug, Clone)]
pub struct Triangle {
    /// World-space vertices
    vertices: [Vec4; 3],
    /// Vertices as of the last projection
    camera_vertices: [Vec3; 3],
    material: Material,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Material) -> Self {
        Self {
            vertices: [v0, v1, v2].map(|v| point_h(v.x, v.y, v.z)),
            camera_vertices: [v0, v1, v2],
            material,
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        self.vertices.map(|v| v.truncate())
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn obtain_camera_coordinates(&mut self, view: &Mat4) {
        for (camera, world) in self.camera_vertices.iter_mut().zip(&self.vertices) {
            *camera = view.project_point_h(*world);
        }
    }

    /// Möller-Trumbore ray-triangle intersection algorithm.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let [v0, v1, v2] = self.camera_vertices;
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if t < 0.0 {
            return None;
        }

        Some(Intersection {
            point: ray.at(t),
            normal: -edge1.cross(edge2).normalize(),
        })
    }

    /// Barycentric coordinates of `point` from sub-triangle area ratios.
    ///
    /// Weight `i` belongs to vertex `i`: it is the area of the sub-triangle
    /// opposite that vertex over the full area. Only meaningful for points
    /// on the triangle.
    pub fn barycentric(&self, point: Vec3) -> [f32; 3] {
        let [a, b, c] = self.camera_vertices;
        let area = (b - a).cross(c - a).length();

        let l0 = (b - point).cross(c - point).length() / area;
        let l1 = (c - point).cross(a - point).length() / area;
        [l0, l1, 1.0 - l0 - l1]
    }

    /// Blend per-vertex values at `point`.
    pub fn interpolate<T>(&self, point: Vec3, values: [T; 3]) -> T
    where
        T: Copy + Add<Output = T> + Mul<f32, Output = T>,
    {
        let [l0, l1, l2] = self.barycentric(point);
        values[0] * l0 + values[1] * l1 + values[2] * l2
    }

    /// Surface color: the normal remapped into [0, 1].
    pub fn color(&self, hit: &Intersection) -> Color {
        (hit.normal + Vec3::ONE) / 2.0
    }
}

/// A triangle carrying texture coordinates, shaded with a checkerboard.
#[derive(Debug, Clone)]
pub struct UvTriangle {
    triangle: Triangle,
    uvs: [Vec2; 3],
}

impl UvTriangle {
    pub fn new(vertices: [Vec3; 3], uvs: [Vec2; 3], material: Material) -> Self {
        let [v0, v1, v2] = vertices;
        Self {
            triangle: Triangle::new(v0, v1, v2, material),
            uvs,
        }
    }

    pub fn triangle(&self) -> &Triangle {
        &self.triangle
    }

    pub fn uvs(&self) -> [Vec2; 3] {
        self.uvs
    }

    pub fn material(&self) -> &Material {
        self.triangle.material()
    }

    pub fn obtain_camera_coordinates(&mut self, view: &Mat4) {
        self.triangle.obtain_camera_coordinates(view);
    }

    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        self.triangle.intersect(ray)
    }

    /// Texture coordinates at `point`.
    pub fn uv_at(&self, point: Vec3) -> Vec2 {
        self.triangle.interpolate(point, self.uvs)
    }

    /// Checkerboard color: squares alternate wherever the floored scaled
    /// coordinates change parity.
    pub fn color(&self, hit: &Intersection) -> Color {
        let uv = self.uv_at(hit.point) * CHECKER_SCALE;
        let parity = (uv.x.floor() as i64 + uv.y.floor() as i64).rem_euclid(2);
        if parity == 0 {
            CHECKER_EVEN
        } else {
            CHECKER_ODD
        }
    }
}
