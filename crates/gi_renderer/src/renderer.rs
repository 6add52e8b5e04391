//! Scene container and per-frame orchestration.
//!
//! A frame runs in three data-parallel phases, each finishing before the
//! next starts:
//!
//! 1. project every primitive and light into camera space
//! 2. trace one primary ray per pixel into the radiance buffer
//! 3. tone map the radiance buffer into RGBA8
//!
//! Tracing only ever sees the scene through shared references, so the
//! projection phase is the single point where the scene is written.

use gi_core::{Mesh, ObjectDescription, RenderSettings, SceneDescription};
use gi_math::{Vec2, Vec3};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::error::{RenderError, RenderResult};
use crate::frame_buffer::FrameBuffer;
use crate::illumination::{TraceConfig, TraceStats, Tracer};
use crate::light::Light;
use crate::material::{Color, Material};
use crate::primitive::Primitive;
use crate::session::Frame;
use crate::sphere::Sphere;
use crate::triangle::{Triangle, UvTriangle};

/// Primitives and lights of a session, in world space.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub objects: Vec<Primitive>,
    pub lights: Vec<Light>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a primitive, returning its index.
    pub fn add(&mut self, primitive: impl Into<Primitive>) -> usize {
        self.objects.push(primitive.into());
        self.objects.len() - 1
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Add one triangle per mesh face, all sharing `material`.
    ///
    /// Returns the number of triangles added.
    pub fn add_mesh(&mut self, mesh: &Mesh, material: Material) -> usize {
        let triangles = mesh.triangles();
        self.objects.reserve(triangles.len());
        for [v0, v1, v2] in &triangles {
            self.objects.push(Triangle::new(*v0, *v1, *v2, material).into());
        }
        triangles.len()
    }

    /// Build a scene from a description, loading any referenced meshes.
    pub fn from_description(description: &SceneDescription) -> RenderResult<Self> {
        let mut scene = Self::new();

        for object in &description.objects {
            let material = Material::from(object.material());
            match object {
                ObjectDescription::Sphere { center, radius, .. } => {
                    scene.add(Sphere::new(Vec3::from_array(*center), *radius, material));
                }
                ObjectDescription::Triangle { vertices, .. } => {
                    let [v0, v1, v2] = vertices.map(Vec3::from_array);
                    scene.add(Triangle::new(v0, v1, v2, material));
                }
                ObjectDescription::UvTriangle { vertices, uvs, .. } => {
                    scene.add(UvTriangle::new(
                        vertices.map(Vec3::from_array),
                        uvs.map(Vec2::from_array),
                        material,
                    ));
                }
                ObjectDescription::Mesh { path, .. } => {
                    let mesh = gi_core::load_ply(description.resolve_path(path))?;
                    let count = scene.add_mesh(&mesh, material);
                    log::info!("Added {} triangles from {}", count, path.display());
                }
            }
        }

        for light in &description.lights {
            scene.add_light(Light::new(
                Vec3::from_array(light.position),
                Color::from_array(light.color),
            ));
        }

        Ok(scene)
    }
}

/// Owns everything a session renders with: camera, scene and frame buffers.
#[derive(Debug)]
pub struct Renderer {
    camera: Camera,
    scene: Scene,
    settings: RenderSettings,
    frame: FrameBuffer,
    frame_index: u64,
}

impl Renderer {
    /// Allocate the session buffers. The camera starts at the origin looking
    /// down -Z; the scene starts empty.
    pub fn new(width: usize, height: usize, settings: RenderSettings) -> RenderResult<Self> {
        let camera = Camera::new(width, height, Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)?;
        let frame = FrameBuffer::new(width, height)?;

        log::info!("Allocated {}x{} render session", width, height);

        Ok(Self {
            camera,
            scene: Scene::new(),
            settings,
            frame,
            frame_index: 0,
        })
    }

    /// Reallocate the ray grid and frame buffers for a new output size.
    ///
    /// Scene, view and settings are kept. On error nothing changes.
    pub fn set_resolution(&mut self, width: usize, height: usize) -> RenderResult<()> {
        if (width, height) == (self.frame.width(), self.frame.height()) {
            return Ok(());
        }

        let frame = FrameBuffer::new(width, height)?;
        self.camera.resize(width, height)?;
        self.frame = frame;

        log::info!("Resized render session to {}x{}", width, height);
        Ok(())
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn set_scene(&mut self, scene: Scene) {
        self.scene = scene;
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.settings
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Number of frames rendered so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// The most recently completed frame.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            index: self.frame_index,
            width: self.frame.width(),
            height: self.frame.height(),
            bytes: self.frame.bytes(),
        }
    }

    /// Render one frame into the pixel buffer.
    pub fn render(&mut self) -> TraceStats {
        // Phase 1: projection
        let view = *self.camera.view();
        self.scene
            .objects
            .par_iter_mut()
            .for_each(|object| object.obtain_camera_coordinates(&view));
        self.scene
            .lights
            .par_iter_mut()
            .for_each(|light| light.obtain_camera_coordinates(&view));

        // Phase 2: tracing
        let config = TraceConfig::from(&self.settings);
        let tracer = Tracer::new(&self.scene.objects, &self.scene.lights, &config);
        let stats = self
            .frame
            .radiance_mut()
            .par_iter_mut()
            .zip(self.camera.rays().par_iter())
            .map(|(radiance, ray)| {
                let mut stats = TraceStats::default();
                *radiance = tracer.illuminate_with_stats(ray, 0, &mut stats);
                stats
            })
            .reduce(TraceStats::default, TraceStats::merge);

        // Phase 3: tone reproduction
        self.frame.tone_map(self.settings.tone_operator);

        self.frame_index += 1;
        log::debug!(
            "Frame {}: {} rays, {} shadow rays, max depth {}",
            self.frame_index,
            stats.rays_cast,
            stats.shadow_rays,
            stats.max_depth_reached
        );

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gi_core::ToneOperator;
    use gi_math::{point_h, Mat4Ext, Ray};

    fn demo_renderer(width: usize, height: usize) -> Renderer {
        let mut description = SceneDescription::default_scene();
        description.resolution = gi_core::Resolution::new(width, height);

        let mut renderer = Renderer::new(width, height, description.settings.clone()).unwrap();
        renderer.set_scene(Scene::from_description(&description).unwrap());
        let c = description.camera;
        renderer.camera_mut().look_at(
            Vec3::from_array(c.position),
            Vec3::from_array(c.center),
            Vec3::from_array(c.up),
        );
        renderer
    }

    #[test]
    fn test_quad_diagonal_resolves_to_one_triangle() {
        // Ground quad split along the (-1, 1) -> (1, -1) diagonal
        let v = [
            Vec3::new(-1.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 1.0),
        ];
        let mut renderer = Renderer::new(8, 6, RenderSettings::default()).unwrap();
        let mut scene = Scene::new();
        scene.add(Triangle::new(v[0], v[1], v[2], Material::default()));
        scene.add(Triangle::new(v[2], v[3], v[0], Material::default()));
        renderer.set_scene(scene);
        renderer
            .camera_mut()
            .look_at(Vec3::new(0.0, 3.0, 0.0), Vec3::ZERO, Vec3::NEG_Z);
        renderer.render();

        let view = *renderer.camera().view();
        let config = TraceConfig::from(renderer.settings());
        let objects = &renderer.scene().objects;
        let tracer = Tracer::new(objects, &renderer.scene().lights, &config);
        let index_of = |p: &Primitive| objects.iter().position(|o| std::ptr::eq(o, p));
        let cast = |world: Vec3| {
            let target = view.project_point_h(point_h(world.x, world.y, world.z));
            (target, Ray::new(Vec3::ZERO, target))
        };

        let across = Vec3::new(1.0, 0.0, 1.0).normalize();
        for i in 1..100 {
            let s = i as f32 / 100.0;
            let on_edge = v[0] + s * (v[2] - v[0]);

            // No gap: the edge is always hit, at the edge point, by a single primitive
            let (target, ray) = cast(on_edge);
            let (primitive, hit) = tracer.nearest_hit(&ray, None).unwrap();
            assert!(index_of(primitive).is_some());
            assert!((hit.point - target).length() < 1e-4, "s = {}", s);

            // Either side of the edge belongs to exactly one triangle
            let (_, ray) = cast(on_edge - 0.01 * across);
            let (primitive, _) = tracer.nearest_hit(&ray, None).unwrap();
            assert_eq!(index_of(primitive), Some(0));

            let (_, ray) = cast(on_edge + 0.01 * across);
            let (primitive, _) = tracer.nearest_hit(&ray, None).unwrap();
            assert_eq!(index_of(primitive), Some(1));
        }
    }

    #[test]
    fn test_set_resolution_reallocates() {
        let mut renderer = Renderer::new(4, 3, RenderSettings::default()).unwrap();
        renderer.set_resolution(8, 6).unwrap();
        assert_eq!(renderer.camera().rays().len(), 48);

        renderer.render();
        assert_eq!(renderer.frame().bytes.len(), 8 * 6 * 4);

        // A rejected size leaves the session as it was
        assert!(matches!(
            renderer.set_resolution(0, 6),
            Err(RenderError::InvalidResolution { .. })
        ));
        assert_eq!((renderer.camera().width(), renderer.frame_buffer().width()), (8, 8));
    }

    #[test]
    fn test_zero_size_renderer_rejected() {
        assert!(matches!(
            Renderer::new(0, 0, RenderSettings::default()),
            Err(RenderError::InvalidResolution { .. })
        ));
    }

    #[test]
    fn test_sphere_end_to_end() {
        // Unit-diameter sphere at the origin, eye at z = 2: the center pixel
        // hits the front of the sphere 1.5 units in front of the eye
        let mut renderer = Renderer::new(64, 48, RenderSettings::default()).unwrap();
        renderer
            .scene_mut()
            .add(Sphere::new(Vec3::ZERO, 0.5, Material::default()));
        renderer
            .camera_mut()
            .look_at(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
        renderer.render();

        let center = 24 * 64 + 32;
        let ray = renderer.camera().rays()[center];
        let hit = renderer.scene().objects[0].intersect(&ray).unwrap();

        assert!((hit.point - Vec3::new(0.0, 0.0, -1.5)).length() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
        assert!(((hit.point - ray.origin()).length() - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_empty_scene_renders_background() {
        let mut settings = RenderSettings::default();
        settings.background = [0.5, 0.25, 1.0];
        settings.tone_operator = ToneOperator::None;
        let mut renderer = Renderer::new(8, 6, settings).unwrap();

        let stats = renderer.render();

        assert_eq!(stats.rays_cast, 48);
        assert_eq!(stats.max_depth_reached, 0);
        for pixel in renderer.frame_buffer().pixels() {
            assert_eq!((pixel.r, pixel.g, pixel.b, pixel.a), (127, 63, 255, 255));
        }
    }

    #[test]
    fn test_demo_scene_renders() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut renderer = demo_renderer(64, 48);
        let stats = renderer.render();

        assert!(stats.rays_cast >= 64 * 48);
        assert!(stats.max_depth_reached <= renderer.settings().max_depth);

        let frame = renderer.frame();
        assert_eq!(frame.index, 1);
        assert_eq!(frame.bytes.len(), 64 * 48 * 4);
        assert!(frame.bytes.chunks_exact(4).all(|p| p[3] == 255));
        // Something other than black made it to the screen
        assert!(frame.bytes.chunks_exact(4).any(|p| p[0] > 0 || p[1] > 0 || p[2] > 0));
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut a = demo_renderer(32, 24);
        let mut b = demo_renderer(32, 24);
        a.render();
        b.render();
        assert_eq!(a.frame().bytes, b.frame().bytes);
    }

    #[test]
    fn test_add_mesh_creates_one_triangle_per_face() {
        let mesh = Mesh::from_polygons(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            &[vec![0, 1, 2, 3]],
        );
        let mut scene = Scene::new();

        assert_eq!(scene.add_mesh(&mesh, Material::mirror(0.5)), 2);
        assert_eq!(scene.objects.len(), 2);
        assert!(scene
            .objects
            .iter()
            .all(|o| matches!(o, Primitive::Triangle(_)) && o.material().reflection_constant == 0.5));
    }

    #[test]
    fn test_scene_from_default_description() {
        let scene = Scene::from_description(&SceneDescription::default_scene()).unwrap();

        assert_eq!(scene.objects.len(), 4);
        assert_eq!(scene.lights.len(), 1);
        assert!(matches!(scene.objects[2], Primitive::UvTriangle(_)));
        assert_eq!(scene.objects[0].material().transmission_constant, 0.8);
    }

    #[test]
    fn test_missing_mesh_is_an_error() {
        let mut description = SceneDescription::default();
        description.objects.push(ObjectDescription::Mesh {
            path: "does/not/exist.ply".into(),
            material: Default::default(),
        });

        assert!(matches!(
            Scene::from_description(&description),
            Err(RenderError::Mesh(_))
        ));
    }
}
