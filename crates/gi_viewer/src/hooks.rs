//! Session hooks used by the viewer: scene loading plus optional animation.

use gi_core::SceneDescription;
use gi_renderer::{Primitive, RenderResult, Renderer, SceneLoader, SessionHooks};

/// Sweep a sphere back and forth along world X.
///
/// The sphere travels at `speed` units per second and turns around once it
/// passes `limit` on either side of the origin.
#[derive(Debug, Clone)]
pub struct OscillateSphere {
    /// Index of the sphere in the scene's object list
    pub object: usize,
    pub limit: f32,
    pub speed: f32,
    /// Moving toward +X
    positive: bool,
}

impl OscillateSphere {
    pub fn new(object: usize, limit: f32, speed: f32) -> Self {
        Self {
            object,
            limit,
            speed,
            positive: true,
        }
    }

    /// Advance by `delta` seconds and move the sphere.
    pub fn step(&mut self, renderer: &mut Renderer, delta: f32) {
        let Some(Primitive::Sphere(sphere)) = renderer.scene_mut().objects.get_mut(self.object) else {
            log::warn!("Object {} is not a sphere; nothing to animate", self.object);
            return;
        };

        let mut center = sphere.center();
        if center.x > self.limit {
            self.positive = false;
        } else if center.x < -self.limit {
            self.positive = true;
        }

        let distance = self.speed * delta;
        center.x += if self.positive { distance } else { -distance };
        sphere.set_center(center);
    }
}

/// Loads the scene description, then runs the optional animation each frame.
pub struct ViewerHooks {
    loader: SceneLoader,
    oscillate: Option<OscillateSphere>,
}

impl ViewerHooks {
    pub fn new(description: SceneDescription, oscillate: Option<OscillateSphere>) -> Self {
        Self {
            loader: SceneLoader::new(description),
            oscillate,
        }
    }
}

impl SessionHooks for ViewerHooks {
    fn on_load(&mut self, renderer: &mut Renderer) -> RenderResult<()> {
        self.loader.on_load(renderer)
    }

    fn on_frame(&mut self, renderer: &mut Renderer, delta: f32) {
        if let Some(oscillate) = &mut self.oscillate {
            oscillate.step(renderer, delta);
        }
    }
}
