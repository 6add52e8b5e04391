//! Render sessions and their collaborators.
//!
//! A [`Session`] drives a [`Renderer`] frame after frame. Two seams connect
//! it to the outside world:
//!
//! - [`SessionHooks`]: builds the scene before the first frame and animates
//!   it after every frame
//! - [`FrameSink`]: receives each finished frame and supplies camera
//!   commands to apply before the next one

use std::time::Instant;

use gi_core::SceneDescription;
use gi_math::Vec3;

use crate::command::CameraCommand;
use crate::error::{RenderError, RenderResult};
use crate::illumination::TraceStats;
use crate::renderer::{Renderer, Scene};

/// A completed, tone-mapped frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// 1-based frame counter
    pub index: u64,
    pub width: usize,
    pub height: usize,
    /// RGBA8, row-major, `width * height * 4` bytes
    pub bytes: &'a [u8],
}

/// Scene setup and animation callbacks.
pub trait SessionHooks {
    /// Called once, before the first frame.
    fn on_load(&mut self, renderer: &mut Renderer) -> RenderResult<()>;

    /// Called after every delivered frame with its duration in seconds.
    fn on_frame(&mut self, _renderer: &mut Renderer, _delta: f32) {}
}

/// Destination for finished frames.
pub trait FrameSink {
    fn deliver(&mut self, frame: &Frame<'_>) -> RenderResult<()>;

    /// Camera commands received since the last poll.
    fn poll_commands(&mut self) -> Vec<CameraCommand> {
        Vec::new()
    }
}

/// Hooks that populate the renderer from a [`SceneDescription`].
#[derive(Debug, Clone)]
pub struct SceneLoader {
    description: SceneDescription,
}

impl SceneLoader {
    pub fn new(description: SceneDescription) -> Self {
        Self { description }
    }

    pub fn description(&self) -> &SceneDescription {
        &self.description
    }
}

impl SessionHooks for SceneLoader {
    fn on_load(&mut self, renderer: &mut Renderer) -> RenderResult<()> {
        let resolution = self.description.resolution;
        renderer.set_resolution(resolution.width, resolution.height)?;

        let scene = Scene::from_description(&self.description)?;
        log::info!(
            "Scene ready: {} primitives, {} lights",
            scene.objects.len(),
            scene.lights.len()
        );
        renderer.set_scene(scene);

        let camera = &self.description.camera;
        renderer.camera_mut().look_at(
            Vec3::from_array(camera.position),
            Vec3::from_array(camera.center),
            Vec3::from_array(camera.up),
        );
        *renderer.settings_mut() = self.description.settings.clone();

        Ok(())
    }
}

/// A renderer bound to its hooks and frame sink.
pub struct Session<H: SessionHooks, S: FrameSink> {
    renderer: Renderer,
    hooks: H,
    sink: S,
}

impl<H: SessionHooks, S: FrameSink> Session<H, S> {
    /// Run the load hook and return a session ready for its first frame.
    pub fn new(mut renderer: Renderer, mut hooks: H, sink: S) -> RenderResult<Self> {
        hooks.on_load(&mut renderer)?;
        Ok(Self {
            renderer,
            hooks,
            sink,
        })
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Apply pending commands, render, deliver, then run the frame hook.
    pub fn run_frame(&mut self) -> RenderResult<TraceStats> {
        let step = self.renderer.settings().movement_step;
        for command in self.sink.poll_commands() {
            log::debug!("Applying {}", command);
            command.apply(self.renderer.camera_mut(), step);
        }

        let start = Instant::now();
        let stats = self.renderer.render();
        self.sink.deliver(&self.renderer.frame())?;
        let delta = start.elapsed().as_secs_f32();

        log::info!(
            "Frame {} took {:.3}s ({} rays)",
            self.renderer.frame_index(),
            delta,
            stats.rays_cast
        );

        self.hooks.on_frame(&mut self.renderer, delta);
        Ok(stats)
    }

    /// Render `frames` frames, stopping at the first delivery failure.
    pub fn run(&mut self, frames: u64) -> RenderResult<()> {
        for _ in 0..frames {
            self.run_frame()?;
        }
        Ok(())
    }

    pub fn into_parts(self) -> (Renderer, H, S) {
        (self.renderer, self.hooks, self.sink)
    }
}

/// Wrap any error as a frame-delivery failure.
pub fn sink_error<E>(err: E) -> RenderError
where
    E: std::error::Error + Send + Sync + 'static,
{
    RenderError::Sink(Box::new(err))
}
