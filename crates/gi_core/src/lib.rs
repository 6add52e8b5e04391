//! gi core - scene description, render settings and mesh import.
//!
//! This crate provides:
//!
//! - **Scene description**: `SceneDescription`, loaded from JSON
//! - **Render settings**: `RenderSettings`, `ToneOperator`, `ShadowShading`
//! - **Mesh import**: `Mesh` and ASCII PLY loading
//!
//! # Example
//!
//! ```ignore
//! use gi_core::{load_ply, load_scene};
//!
//! let scene = load_scene("scenes/demo.json")?;
//! let bunny = load_ply("bunny.ply")?;
//! println!("{} objects, {} triangles", scene.objects.len(), bunny.triangle_count());
//! ```

pub mod mesh;
pub mod ply;
pub mod scene;
pub mod settings;

// Re-export commonly used types
pub use mesh::Mesh;
pub use ply::{load_ply, parse_ply, PlyError, PlyResult};
pub use scene::{
    load_scene, load_scene_from_str, CameraDescription, LightDescription, MaterialDescription,
    ObjectDescription, Resolution, SceneDescription, SceneError, SceneResult,
};
pub use settings::{RenderSettings, ShadowShading, ToneOperator, UnknownToneOperator};
