//! Camera: view transform plus a fixed grid of primary rays.
//!
//! Primary rays live in camera space and never change after construction.
//! Moving the camera only rewrites the view matrix; the scene is re-projected
//! into camera space every frame instead.

use gi_math::{Mat4, Mat4Ext, Ray, Vec3, Vec4};

use crate::error::{allocate, pixel_count, RenderResult};

/// The virtual film the primary rays pass through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilmPlane {
    pub width: f32,
    pub height: f32,
    /// Distance from the eye along -Z
    pub distance: f32,
}

impl Default for FilmPlane {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 0.75,
            distance: 0.5,
        }
    }
}

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    width: usize,
    height: usize,
    film: FilmPlane,
    view: Mat4,
    rays: Vec<Ray>,
}

impl Camera {
    /// Create a camera with the default film plane, looking from `position`
    /// toward `center`.
    pub fn new(width: usize, height: usize, position: Vec3, center: Vec3, up: Vec3) -> RenderResult<Self> {
        Self::with_film(width, height, FilmPlane::default(), position, center, up)
    }

    /// Create a camera with a custom film plane.
    pub fn with_film(
        width: usize,
        height: usize,
        film: FilmPlane,
        position: Vec3,
        center: Vec3,
        up: Vec3,
    ) -> RenderResult<Self> {
        let count = pixel_count(width, height)?;
        let mut rays = allocate("primary rays", count, Ray::default())?;
        generate_rays(&mut rays, width, height, &film);

        let mut camera = Self {
            width,
            height,
            film,
            view: Mat4::IDENTITY,
            rays,
        };
        camera.look_at(position, center, up);
        Ok(camera)
    }

    /// Rebuild the view matrix from a look-at triple.
    ///
    /// The rotation block has columns `[right, up, -forward]` and the
    /// translation column holds `(-right.p, -up.p, forward.p)`.
    pub fn look_at(&mut self, position: Vec3, center: Vec3, up: Vec3) {
        let forward = (center - position).normalize();
        let right = forward.cross(up).normalize();
        let up = right.cross(forward).normalize();

        self.view = Mat4::from_cols(
            right.extend(0.0),
            up.extend(0.0),
            (-forward).extend(0.0),
            Vec4::new(-right.dot(position), -up.dot(position), forward.dot(position), 1.0),
        );
    }

    /// Regenerate the primary rays for a new resolution, keeping the view.
    pub fn resize(&mut self, width: usize, height: usize) -> RenderResult<()> {
        let count = pixel_count(width, height)?;
        let mut rays = allocate("primary rays", count, Ray::default())?;
        generate_rays(&mut rays, width, height, &self.film);

        self.width = width;
        self.height = height;
        self.rays = rays;
        Ok(())
    }

    /// World-to-camera transform.
    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    /// Primary rays in row-major pixel order.
    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn film(&self) -> &FilmPlane {
        &self.film
    }

    /// The translation column of the view matrix.
    pub fn position(&self) -> Vec3 {
        self.view.translation()
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.view.set_translation(position);
    }

    /// Move along `direction` by `distance`.
    pub fn translate(&mut self, direction: Vec3, distance: f32) {
        self.set_position(self.position() - distance * direction);
    }

    /// Third column of the view matrix.
    pub fn forward(&self) -> Vec3 {
        self.view.z_axis.truncate()
    }

    /// Second column of the view matrix.
    pub fn up(&self) -> Vec3 {
        self.view.y_axis.truncate()
    }

    pub fn right(&self) -> Vec3 {
        self.up().cross(self.forward())
    }
}

fn generate_rays(rays: &mut [Ray], width: usize, height: usize, film: &FilmPlane) {
    for y in 0..height {
        for x in 0..width {
            let film_x = x as f32 / width as f32 * film.width;
            let film_y = y as f32 / height as f32 * film.height;
            let direction = Vec3::new(
                film_x - film.width / 2.0,
                -film_y + film.height / 2.0,
                -film.distance,
            );
            rays[y * width + x] = Ray::new(Vec3::ZERO, direction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;

    fn default_camera(width: usize, height: usize) -> Camera {
        Camera::new(
            width,
            height,
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::Y,
        )
        .unwrap()
    }

    #[test]
    fn test_one_ray_per_pixel() {
        let camera = default_camera(32, 24);
        assert_eq!(camera.rays().len(), 32 * 24);
    }

    #[test]
    fn test_primary_rays_are_unit_length() {
        let camera = default_camera(16, 12);

        for ray in camera.rays() {
            assert!((ray.direction().length() - 1.0).abs() < 1e-5);
            assert_eq!(ray.origin(), Vec3::ZERO);
        }
    }

    #[test]
    fn test_ray_grid_layout() {
        let camera = default_camera(4, 2);

        // Top-left pixel points up and to the left
        let d = camera.rays()[0].direction();
        assert!(d.x < 0.0 && d.y > 0.0 && d.z < 0.0);

        // Center pixel looks straight down -Z
        let center = camera.rays()[1 * 4 + 2].direction();
        assert!((center - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_zero_resolution_fails() {
        let result = Camera::new(0, 10, Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        assert!(matches!(result, Err(RenderError::InvalidResolution { .. })));
    }

    #[test]
    fn test_axis_aligned_look_at() {
        let camera = default_camera(4, 4);
        let view = camera.view();

        assert_eq!(view.x_axis, Vec4::X);
        assert_eq!(view.y_axis, Vec4::Y);
        assert_eq!(view.z_axis, Vec4::Z);
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, -2.0));

        // The world origin lands two units in front of the eye
        let p = view.project_point_h(gi_math::point_h(0.0, 0.0, 0.0));
        assert!((p - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-6);
    }

    #[test]
    fn test_basis_vectors() {
        let camera = default_camera(4, 4);

        assert!((camera.forward() - Vec3::Z).length() < 1e-6);
        assert!((camera.up() - Vec3::Y).length() < 1e-6);
        assert!((camera.right() - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_translate_moves_position() {
        let mut camera = default_camera(4, 4);
        let before = camera.position();

        camera.translate(Vec3::X, 0.5);
        assert!((camera.position() - (before - Vec3::new(0.5, 0.0, 0.0))).length() < 1e-6);

        camera.set_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.view().w_axis.w, 1.0);
    }
}
