//! Scene description types.
//!
//! A scene file is JSON describing the output resolution, the camera
//! look-at, render settings, primitives and lights. The renderer consumes
//! it through its scene-setup hook; nothing here depends on camera space.
//!
//! # Example
//!
//! ```json
//! {
//!   "resolution": { "width": 320, "height": 240 },
//!   "camera": { "position": [0, 0, 2], "center": [0, 0, -1], "up": [0, 1, 0] },
//!   "settings": { "tone_operator": "reinhard" },
//!   "objects": [
//!     { "type": "sphere", "center": [0, 0, 0], "radius": 0.5,
//!       "material": { "reflection": 0.8 } },
//!     { "type": "mesh", "path": "bunny.ply" }
//!   ],
//!   "lights": [ { "position": [0, 1, 2] } ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::RenderSettings;

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid scene: {0}")]
    Invalid(String),
}

/// Result type for scene loading.
pub type SceneResult<T> = Result<T, SceneError>;

/// Output resolution in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: usize,
    pub height: usize,
}

impl Resolution {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Total number of pixels, or `None` if it overflows `usize`.
    pub fn pixel_count(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(1024, 768)
    }
}

/// Camera look-at triple, in world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraDescription {
    pub position: [f32; 3],
    pub center: [f32; 3],
    pub up: [f32; 3],
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 2.0],
            center: [0.0, 0.0, -1.0],
            up: [0.0, 1.0, 0.0],
        }
    }
}

/// Reflection / transmission parameters of a primitive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDescription {
    pub reflection: f32,
    pub transmission: f32,
    pub medium_index: f32,
}

impl Default for MaterialDescription {
    fn default() -> Self {
        Self {
            reflection: 0.0,
            transmission: 0.0,
            medium_index: 1.0,
        }
    }
}

/// A primitive (or a mesh expanding to many triangles).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDescription {
    Sphere {
        center: [f32; 3],
        radius: f32,
        #[serde(default)]
        material: MaterialDescription,
    },
    Triangle {
        vertices: [[f32; 3]; 3],
        #[serde(default)]
        material: MaterialDescription,
    },
    UvTriangle {
        vertices: [[f32; 3]; 3],
        uvs: [[f32; 2]; 3],
        #[serde(default)]
        material: MaterialDescription,
    },
    /// An ASCII PLY file; each face becomes one triangle.
    Mesh {
        path: PathBuf,
        #[serde(default)]
        material: MaterialDescription,
    },
}

impl ObjectDescription {
    pub fn material(&self) -> &MaterialDescription {
        match self {
            Self::Sphere { material, .. }
            | Self::Triangle { material, .. }
            | Self::UvTriangle { material, .. }
            | Self::Mesh { material, .. } => material,
        }
    }
}

fn default_light_color() -> [f32; 3] {
    [1.1, 1.1, 1.1]
}

/// A point light.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightDescription {
    pub position: [f32; 3],
    #[serde(default = "default_light_color")]
    pub color: [f32; 3],
}

/// A complete scene: everything needed to start a render session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default)]
    pub camera: CameraDescription,
    #[serde(default)]
    pub settings: RenderSettings,
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
    #[serde(default)]
    pub lights: Vec<LightDescription>,

    /// Directory used to resolve relative mesh paths
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl SceneDescription {
    /// The demo scene: a mirror-ish sphere, a second sphere behind it, a
    /// checkered ground quad made of two UV triangles and one light.
    pub fn default_scene() -> Self {
        let ground = [
            [-6.0, -1.25, 6.0],
            [-6.0, -1.25, -6.0],
            [6.0, -1.25, -6.0],
            [6.0, -1.25, 6.0],
        ];

        Self {
            resolution: Resolution::default(),
            camera: CameraDescription::default(),
            settings: RenderSettings::default(),
            objects: vec![
                ObjectDescription::Sphere {
                    center: [0.0, 0.0, 0.0],
                    radius: 0.5,
                    material: MaterialDescription {
                        reflection: 0.0,
                        transmission: 0.8,
                        medium_index: 0.95,
                    },
                },
                ObjectDescription::Sphere {
                    center: [0.75, -0.5, -1.1],
                    radius: 0.5,
                    material: MaterialDescription {
                        reflection: 1.0,
                        transmission: 0.0,
                        medium_index: 1.0,
                    },
                },
                ObjectDescription::UvTriangle {
                    vertices: [ground[0], ground[1], ground[2]],
                    uvs: [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0]],
                    material: MaterialDescription::default(),
                },
                ObjectDescription::UvTriangle {
                    vertices: [ground[2], ground[3], ground[0]],
                    uvs: [[1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
                    material: MaterialDescription::default(),
                },
            ],
            lights: vec![LightDescription {
                position: [0.0, 1.0, 2.0],
                color: default_light_color(),
            }],
            base_dir: None,
        }
    }

    /// Check the description for values the renderer can't work with.
    pub fn validate(&self) -> SceneResult<()> {
        match self.resolution.pixel_count() {
            Some(count) if count > 0 => {}
            _ => {
                return Err(SceneError::Invalid(format!(
                    "resolution must be non-zero and fit in memory, got {}x{}",
                    self.resolution.width, self.resolution.height
                )))
            }
        }

        for (i, object) in self.objects.iter().enumerate() {
            let material = object.material();
            let in_unit = |k: f32| (0.0..=1.0).contains(&k);
            if !in_unit(material.reflection) || !in_unit(material.transmission) {
                return Err(SceneError::Invalid(format!(
                    "object {}: reflection and transmission must lie in [0, 1]",
                    i
                )));
            }
            if material.medium_index <= 0.0 {
                return Err(SceneError::Invalid(format!(
                    "object {}: medium_index must be positive",
                    i
                )));
            }
            if let ObjectDescription::Sphere { radius, .. } = object {
                if *radius <= 0.0 {
                    return Err(SceneError::Invalid(format!(
                        "object {}: sphere radius must be positive",
                        i
                    )));
                }
            }
        }

        if self.lights.len() > 1 {
            log::warn!(
                "Scene has {} lights; only the first one is used for shading",
                self.lights.len()
            );
        }

        Ok(())
    }

    /// Resolve a (possibly relative) mesh path against the scene's directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Parse and validate a scene description from a JSON string.
pub fn load_scene_from_str(content: &str) -> SceneResult<SceneDescription> {
    let scene: SceneDescription = serde_json::from_str(content)?;
    scene.validate()?;
    Ok(scene)
}

/// Load a scene description from a JSON file.
///
/// Relative mesh paths inside the file resolve against the file's directory.
pub fn load_scene<P: AsRef<Path>>(path: P) -> SceneResult<SceneDescription> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let mut scene = load_scene_from_str(&content)?;
    scene.base_dir = path.parent().map(Path::to_path_buf);

    log::info!(
        "Loaded scene {}: {} objects, {} lights, {}x{}",
        path.display(),
        scene.objects.len(),
        scene.lights.len(),
        scene.resolution.width,
        scene.resolution.height
    );

    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ToneOperator;

    #[test]
    fn test_default_scene_is_valid() {
        let scene = SceneDescription::default_scene();

        assert!(scene.validate().is_ok());
        assert_eq!(scene.objects.len(), 4);
        assert_eq!(scene.lights.len(), 1);
        assert_eq!(scene.resolution, Resolution::new(1024, 768));
    }

    #[test]
    fn test_parse_minimal_scene() {
        let json = r#"{
            "resolution": { "width": 64, "height": 48 },
            "objects": [
                { "type": "sphere", "center": [0, 0, 0], "radius": 0.5,
                  "material": { "reflection": 0.5 } },
                { "type": "mesh", "path": "bunny.ply" }
            ],
            "lights": [ { "position": [0, 1, 2] } ],
            "settings": { "tone_operator": "adaptive_logarithmic" }
        }"#;

        let scene = load_scene_from_str(json).unwrap();

        assert_eq!(scene.resolution.pixel_count(), Some(64 * 48));
        assert_eq!(scene.camera, CameraDescription::default());
        assert_eq!(scene.settings.tone_operator, ToneOperator::AdaptiveLogarithmic);
        assert_eq!(scene.lights[0].color, [1.1, 1.1, 1.1]);
        match &scene.objects[0] {
            ObjectDescription::Sphere { radius, material, .. } => {
                assert_eq!(*radius, 0.5);
                assert_eq!(material.reflection, 0.5);
                assert_eq!(material.medium_index, 1.0);
            }
            other => panic!("expected sphere, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let json = r#"{ "resolution": { "width": 0, "height": 10 } }"#;
        assert!(matches!(load_scene_from_str(json), Err(SceneError::Invalid(_))));
    }

    #[test]
    fn test_overflowing_resolution_rejected() {
        let huge = Resolution::new(usize::MAX, 2);
        assert_eq!(huge.pixel_count(), None);

        let description = SceneDescription {
            resolution: huge,
            ..SceneDescription::default_scene()
        };
        assert!(matches!(description.validate(), Err(SceneError::Invalid(_))));
    }

    #[test]
    fn test_out_of_range_material_rejected() {
        let json = r#"{ "objects": [
            { "type": "triangle", "vertices": [[0,0,0],[1,0,0],[0,1,0]],
              "material": { "transmission": 1.5 } }
        ] }"#;
        assert!(matches!(load_scene_from_str(json), Err(SceneError::Invalid(_))));
    }

    #[test]
    fn test_unknown_object_type_is_json_error() {
        let json = r#"{ "objects": [ { "type": "torus" } ] }"#;
        assert!(matches!(load_scene_from_str(json), Err(SceneError::Json(_))));
    }

    #[test]
    fn test_resolve_relative_mesh_path() {
        let mut scene = SceneDescription::default();
        scene.base_dir = Some(PathBuf::from("scenes"));

        assert_eq!(
            scene.resolve_path(Path::new("bunny.ply")),
            PathBuf::from("scenes").join("bunny.ply")
        );
    }
}
