// Homogeneous transform utilities for Mat4
//
// Scene geometry is stored as homogeneous world-space points and projected
// through the camera's affine view matrix every frame.

use glam::{Mat4, Vec3, Vec4};

/// Build a homogeneous point (w = 1).
#[inline]
pub fn point_h(x: f32, y: f32, z: f32) -> Vec4 {
    Vec4::new(x, y, z, 1.0)
}

/// Drop the w component of a homogeneous point, dividing through by it.
#[inline]
pub fn from_homogeneous(v: Vec4) -> Vec3 {
    v.truncate() / v.w
}

/// Extension trait for Mat4 used by the camera's view transform.
pub trait Mat4Ext {
    /// Multiply a homogeneous point and project the result back to 3D.
    fn project_point_h(&self, point: Vec4) -> Vec3;

    /// The xyz part of the translation column.
    ///
    /// Only meaningful for affine matrices, where the bottom row is (0, 0, 0, 1).
    fn translation(&self) -> Vec3;

    /// Overwrite the xyz part of the translation column, leaving w untouched.
    fn set_translation(&mut self, translation: Vec3);
}

impl Mat4Ext for Mat4 {
    fn project_point_h(&self, point: Vec4) -> Vec3 {
        from_homogeneous(*self * point)
    }

    fn translation(&self) -> Vec3 {
        self.w_axis.truncate()
    }

    fn set_translation(&mut self, translation: Vec3) {
        self.w_axis.x = translation.x;
        self.w_axis.y = translation.y;
        self.w_axis.z = translation.z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_homogeneous_divides_by_w() {
        let v = Vec4::new(2.0, 4.0, 6.0, 2.0);
        assert_eq!(from_homogeneous(v), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_project_point_h_applies_translation() {
        let m = Mat4::from_translation(Vec3::new(1.0, -2.0, 3.0));
        let p = m.project_point_h(point_h(1.0, 1.0, 1.0));
        assert_eq!(p, Vec3::new(2.0, -1.0, 4.0));
    }

    #[test]
    fn test_set_translation_round_trip() {
        let mut m = Mat4::IDENTITY;
        m.set_translation(Vec3::new(5.0, 6.0, 7.0));

        assert_eq!(m.translation(), Vec3::new(5.0, 6.0, 7.0));
        assert_eq!(m.w_axis.w, 1.0);
        // Rotation block untouched
        assert_eq!(m.x_axis, Vec4::X);
    }
}
