//! Surface materials and Phong local shading.

use gi_core::MaterialDescription;
use gi_math::{reflect, Vec3};

/// Color type alias (linear RGB, unbounded above)
pub type Color = Vec3;

/// How a surface passes light on to secondary rays.
///
/// Reflection wins: transmission is only evaluated when
/// `reflection_constant` is zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Weight of the mirror ray, in [0, 1]
    pub reflection_constant: f32,
    /// Weight of the refracted ray, in [0, 1]
    pub transmission_constant: f32,
    /// Index of refraction of the medium inside the surface
    pub medium_index: f32,
}

impl Material {
    pub fn new(reflection_constant: f32, transmission_constant: f32, medium_index: f32) -> Self {
        Self {
            reflection_constant,
            transmission_constant,
            medium_index,
        }
    }

    /// A perfect-ish mirror blending `k` of the reflected color.
    pub fn mirror(k: f32) -> Self {
        Self::new(k, 0.0, 1.0)
    }

    /// A transparent surface blending `k` of the transmitted color.
    pub fn glass(k: f32, medium_index: f32) -> Self {
        Self::new(0.0, k, medium_index)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

impl From<&MaterialDescription> for Material {
    fn from(desc: &MaterialDescription) -> Self {
        Self::new(desc.reflection, desc.transmission, desc.medium_index)
    }
}

/// Everything the local shading model needs about one surface point, in
/// camera space.
#[derive(Debug, Clone, Copy)]
pub struct ShadingInfo {
    pub position: Vec3,
    pub normal: Vec3,
    /// Base color of the surface at `position`
    pub color: Color,
    pub light_position: Vec3,
    pub light_color: Color,
}

/// Phong reflection model coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phong {
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
    pub specular_color: Color,
}

impl Default for Phong {
    fn default() -> Self {
        Self {
            ambient: 0.2,
            diffuse: 0.4,
            specular: 0.4,
            shininess: 10.0,
            specular_color: Color::ONE,
        }
    }
}

impl Phong {
    /// Full ambient + diffuse + specular shading.
    ///
    /// The eye sits at the camera-space origin, so the view vector is just
    /// the negated position.
    pub fn shade(&self, info: &ShadingInfo) -> Color {
        let ambient = info.color * info.light_color;

        let to_light = (info.light_position - info.position).normalize();
        let diffuse = info.color * info.light_color * info.normal.dot(to_light).max(0.0);

        let reflected = reflect(-to_light, info.normal).normalize();
        let to_eye = -info.position.normalize();
        let specular = self.specular_color
            * info.light_color
            * reflected.dot(to_eye).max(0.0).powf(self.shininess);

        self.specular * specular + self.diffuse * diffuse + self.ambient * ambient
    }

    /// Shading for a point the light can't see: the ambient term only.
    pub fn shade_shadow(&self, info: &ShadingInfo) -> Color {
        self.ambient * info.color * info.light_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facing_light() -> ShadingInfo {
        ShadingInfo {
            position: Vec3::new(0.0, 0.0, -2.0),
            normal: Vec3::Z,
            color: Color::new(0.5, 0.5, 0.5),
            light_position: Vec3::new(0.0, 0.0, 0.0),
            light_color: Color::ONE,
        }
    }

    #[test]
    fn test_phong_head_on() {
        let phong = Phong::default();
        let c = phong.shade(&facing_light());

        // ambient 0.2*0.5 + diffuse 0.4*0.5 + specular 0.4*1
        let expected = 0.1 + 0.2 + 0.4;
        assert!((c.x - expected).abs() < 1e-5, "got {}", c.x);
        assert!((c.y - c.z).abs() < 1e-6);
    }

    #[test]
    fn test_grazing_light_is_ambient_only() {
        let phong = Phong::default();
        let mut info = facing_light();
        info.normal = Vec3::X;

        let c = phong.shade(&info);
        assert!((c - phong.shade_shadow(&info)).length() < 1e-6);
    }

    #[test]
    fn test_shadow_never_brighter_than_lit() {
        let phong = Phong::default();
        let mut info = facing_light();

        for i in 0..8 {
            let angle = i as f32 * 0.4;
            info.normal = Vec3::new(angle.sin(), 0.0, angle.cos());
            let lit = phong.shade(&info);
            let shadow = phong.shade_shadow(&info);
            assert!(shadow.x <= lit.x + 1e-6 && shadow.y <= lit.y + 1e-6 && shadow.z <= lit.z + 1e-6);
        }
    }

    #[test]
    fn test_material_from_description() {
        let desc = MaterialDescription {
            reflection: 0.25,
            transmission: 0.0,
            medium_index: 1.0,
        };
        assert_eq!(Material::from(&desc), Material::mirror(0.25));
        assert_eq!(Material::default().medium_index, 1.0);
    }
}
