//! gi renderer - Whitted-style CPU ray tracing with tone reproduction.
//!
//! Every frame the scene is projected into camera space, one primary ray per
//! pixel is traced recursively (Phong shading, hard shadows, mirror
//! reflection and refraction), and the resulting radiance is tone mapped
//! into an RGBA8 buffer. All three phases run on the rayon global pool.
//!
//! # Example
//!
//! ```ignore
//! use gi_core::SceneDescription;
//! use gi_renderer::{Renderer, SceneLoader, Session};
//!
//! let description = SceneDescription::default_scene();
//! let r = description.resolution;
//! let renderer = Renderer::new(r.width, r.height, description.settings.clone())?;
//! let mut session = Session::new(renderer, SceneLoader::new(description), my_sink)?;
//! session.run(10)?;
//! ```

mod camera;
mod command;
mod error;
mod frame_buffer;
mod illumination;
mod light;
mod material;
mod primitive;
mod renderer;
mod session;
mod sphere;
mod triangle;

pub use camera::{Camera, FilmPlane};
pub use command::{CameraCommand, UnknownCommand};
pub use error::{RenderError, RenderResult};
pub use frame_buffer::{FrameBuffer, Pixel};
pub use illumination::{TraceConfig, TraceStats, Tracer};
pub use light::{Light, DEFAULT_LIGHT_COLOR};
pub use material::{Color, Material, Phong, ShadingInfo};
pub use primitive::{Intersection, Primitive};
pub use renderer::{Renderer, Scene};
pub use session::{sink_error, Frame, FrameSink, SceneLoader, Session, SessionHooks};
pub use sphere::Sphere;
pub use triangle::{Triangle, UvTriangle};

/// Re-export math types from gi_math
pub use gi_math::{Ray, Vec2, Vec3};
