// Re-export glam for convenience
pub use glam::*;

// gi math types
mod ray;
mod transform;

pub use ray::Ray;
pub use transform::{from_homogeneous, point_h, Mat4Ext};

/// Offset applied along a surface normal when spawning secondary rays,
/// keeping them clear of the surface they start on.
pub const SURFACE_BIAS: f32 = 0.001;

/// Mirror `v` about the unit normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Perceptual luminance of a linear RGB triple.
#[inline]
pub fn luminance(rgb: Vec3) -> f32 {
    0.27 * rgb.x + 0.67 * rgb.y + 0.06 * rgb.z
}
