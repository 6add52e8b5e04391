//! Point light.

use gi_math::{point_h, Mat4, Mat4Ext, Vec3, Vec4};

use crate::material::Color;

/// Default light color; slightly over unit intensity.
pub const DEFAULT_LIGHT_COLOR: Color = Color::new(1.1, 1.1, 1.1);

/// A point light with a world-space position and a cached camera-space one.
#[derive(Debug, Clone, Copy)]
pub struct Light {
    position: Vec4,
    camera_position: Vec3,
    color: Color,
}

impl Light {
    pub fn new(position: Vec3, color: Color) -> Self {
        Self {
            position: point_h(position.x, position.y, position.z),
            camera_position: position,
            color,
        }
    }

    /// Light with [`DEFAULT_LIGHT_COLOR`].
    pub fn white(position: Vec3) -> Self {
        Self::new(position, DEFAULT_LIGHT_COLOR)
    }

    /// Project the world position through the view matrix.
    pub fn obtain_camera_coordinates(&mut self, view: &Mat4) {
        self.camera_position = view.project_point_h(self.position);
    }

    pub fn position(&self) -> Vec3 {
        self.position.truncate()
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = point_h(position.x, position.y, position.z);
    }

    /// Position as of the last projection.
    pub fn camera_position(&self) -> Vec3 {
        self.camera_position
    }

    pub fn color(&self) -> Color {
        self.color
    }
}
