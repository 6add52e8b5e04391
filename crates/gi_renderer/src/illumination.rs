//! Recursive Whitted-style illumination.
//!
//! For every ray the tracer finds the nearest primitive by brute force,
//! shades it with Phong against the first light (casting one shadow ray),
//! then optionally spawns a mirror or a refracted ray and blends the result.
//! Everything happens in camera space, against primitives that were
//! projected earlier in the frame.

use gi_core::{RenderSettings, ShadowShading};
use gi_math::{reflect, Ray, SURFACE_BIAS};

use crate::light::Light;
use crate::material::{Color, Phong, ShadingInfo};
use crate::primitive::{Intersection, Primitive};

/// Tracer configuration.
#[derive(Debug, Clone)]
pub struct TraceConfig {
    /// Depth at which secondary rays stop being spawned
    pub max_depth: u32,
    /// Color of rays that hit nothing
    pub background: Color,
    pub shadow_shading: ShadowShading,
    pub phong: Phong,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self::from(&RenderSettings::default())
    }
}

impl From<&RenderSettings> for TraceConfig {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            max_depth: settings.max_depth,
            background: Color::from_array(settings.background),
            shadow_shading: settings.shadow_shading,
            phong: Phong::default(),
        }
    }
}

/// Counters gathered while tracing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    /// Primary and secondary rays, shadow rays excluded
    pub rays_cast: u64,
    pub shadow_rays: u64,
    /// Deepest recursion level reached
    pub max_depth_reached: u32,
}

impl TraceStats {
    /// Combine counters from two disjoint sets of pixels.
    pub fn merge(self, other: Self) -> Self {
        Self {
            rays_cast: self.rays_cast + other.rays_cast,
            shadow_rays: self.shadow_rays + other.shadow_rays,
            max_depth_reached: self.max_depth_reached.max(other.max_depth_reached),
        }
    }
}

/// Read-only view of a projected scene that can shade rays.
///
/// Cheap to copy into every rayon task; nothing here is mutated while
/// tracing.
#[derive(Debug, Clone, Copy)]
pub struct Tracer<'a> {
    primitives: &'a [Primitive],
    lights: &'a [Light],
    config: &'a TraceConfig,
}

impl<'a> Tracer<'a> {
    pub fn new(primitives: &'a [Primitive], lights: &'a [Light], config: &'a TraceConfig) -> Self {
        Self {
            primitives,
            lights,
            config,
        }
    }

    /// Color seen along `ray`, starting at recursion `depth`.
    pub fn illuminate(&self, ray: &Ray, depth: u32) -> Color {
        self.illuminate_with_stats(ray, depth, &mut TraceStats::default())
    }

    /// Like [`Tracer::illuminate`], also counting rays into `stats`.
    pub fn illuminate_with_stats(&self, ray: &Ray, depth: u32, stats: &mut TraceStats) -> Color {
        stats.rays_cast += 1;
        stats.max_depth_reached = stats.max_depth_reached.max(depth);

        let Some((primitive, hit)) = self.nearest_hit(ray, None) else {
            return self.config.background;
        };

        let local = self.local_color(primitive, &hit, stats);
        if depth >= self.config.max_depth {
            return local;
        }

        let material = primitive.material();
        if material.reflection_constant > 0.0 {
            let k = material.reflection_constant;
            let reflected = Ray::new(
                hit.point + SURFACE_BIAS * hit.normal,
                reflect(ray.direction(), hit.normal),
            );
            let color = self.illuminate_with_stats(&reflected, depth + 1, stats);
            return (1.0 - k) * local + k * color;
        }

        if material.transmission_constant > 0.0 {
            let k = material.transmission_constant;
            let transmitted = transmit(ray, &hit, material.medium_index);
            let color = self.illuminate_with_stats(&transmitted, depth + 1, stats);
            return (1.0 - k) * local + k * color;
        }

        local
    }

    /// Nearest primitive hit by `ray`, ignoring hits farther than
    /// `max_distance`. On equal distance the later primitive wins.
    pub fn nearest_hit(&self, ray: &Ray, max_distance: Option<f32>) -> Option<(&'a Primitive, Intersection)> {
        let mut nearest = None;
        let mut best = max_distance.unwrap_or(f32::INFINITY);

        for primitive in self.primitives {
            let Some(hit) = primitive.intersect(ray) else {
                continue;
            };
            let distance = (hit.point - ray.origin()).length();
            if distance > best {
                continue;
            }
            best = distance;
            nearest = Some((primitive, hit));
        }

        nearest
    }

    /// Phong shading against the first light, with a hard shadow test.
    fn local_color(&self, primitive: &Primitive, hit: &Intersection, stats: &mut TraceStats) -> Color {
        let Some(light) = self.lights.first() else {
            return Color::ZERO;
        };

        let info = ShadingInfo {
            position: hit.point,
            normal: hit.normal,
            color: primitive.color(hit),
            light_position: light.camera_position(),
            light_color: light.color(),
        };

        let origin = hit.point + SURFACE_BIAS * hit.normal;
        let to_light = light.camera_position() - origin;
        let shadow_ray = Ray::new(origin, to_light);
        stats.shadow_rays += 1;

        if self.nearest_hit(&shadow_ray, Some(to_light.length())).is_some() {
            match self.config.shadow_shading {
                ShadowShading::Ambient => self.config.phong.shade_shadow(&info),
                ShadowShading::Black => Color::ZERO,
            }
        } else {
            self.config.phong.shade(&info)
        }
    }
}

/// Refracted ray through the surface at `hit`, or the mirror ray on total
/// internal reflection.
fn transmit(ray: &Ray, hit: &Intersection, medium_index: f32) -> Ray {
    let d = ray.direction();
    let mut n = hit.normal;
    let mut eta = 1.0 / medium_index;

    // Leaving the medium
    if n.dot(-d) < 0.0 {
        n = -n;
        eta = 1.0 / eta;
    }

    let cos_i = -n.dot(d);
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i);

    if sin2_t > 1.0 {
        return Ray::new(hit.point + SURFACE_BIAS * n, reflect(d, n));
    }

    let cos_t = (1.0 - sin2_t).sqrt();
    let direction = eta * d + (eta * cos_i - cos_t) * n;
    Ray::new(hit.point - SURFACE_BIAS * n, direction)
}
