//! Perspective camera and viewport binding.

use glam::{Mat4, Vec3};

use crate::Vec2;

/// Fixed perspective camera looking down -Z at the cloud.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    aspect: f32,
}

impl Camera {
    /// 75 degree camera at z = 1000, clipping at 1..2000.
    pub fn new(aspect: f32) -> Self {
        Self {
            fov_y: 75.0_f32.to_radians(),
            near: 1.0,
            far: 2000.0,
            position: Vec3::new(0.0, 0.0, 1000.0),
            target: Vec3::ZERO,
            aspect,
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

/// Surface size and the camera whose aspect follows it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    camera: Camera,
}

impl Viewport {
    /// Zero dimensions are bumped to 1 so the aspect stays finite.
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            width,
            height,
            camera: Camera::new(width as f32 / height as f32),
        }
    }

    /// Apply a new surface size. Returns `true` if anything changed.
    ///
    /// Repeating the current size or passing a zero dimension (minimized
    /// window) leaves everything untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 || (width == self.width && height == self.height) {
            return false;
        }
        self.width = width;
        self.height = height;
        self.camera.set_aspect(width as f32 / height as f32);
        true
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size_f32(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Convert a pointer position in pixels to NDC, y up.
    pub fn pixel_to_ndc(&self, x: f64, y: f64) -> Vec2 {
        Vec2::new(
            (x / self.width as f64 * 2.0 - 1.0) as f32,
            (-(y / self.height as f64) * 2.0 + 1.0) as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_sets_aspect_and_size() {
        let mut viewport = Viewport::new(800, 600);
        assert!(viewport.resize(1920, 1080));
        assert_eq!(viewport.width(), 1920);
        assert_eq!(viewport.height(), 1080);
        assert_eq!(viewport.camera().aspect(), 1920.0 / 1080.0);
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut viewport = Viewport::new(800, 600);
        viewport.resize(1000, 500);
        let before = viewport;
        assert!(!viewport.resize(1000, 500));
        assert_eq!(viewport, before);
    }

    #[test]
    fn test_zero_size_ignored() {
        let mut viewport = Viewport::new(800, 600);
        assert!(!viewport.resize(0, 600));
        assert!(!viewport.resize(800, 0));
        assert_eq!((viewport.width(), viewport.height()), (800, 600));
        assert_eq!(Viewport::new(0, 0).camera().aspect(), 1.0);
    }

    #[test]
    fn test_pixel_to_ndc() {
        let viewport = Viewport::new(800, 600);
        assert_eq!(viewport.pixel_to_ndc(400.0, 300.0), Vec2::ZERO);
        assert_eq!(viewport.pixel_to_ndc(0.0, 0.0), Vec2::new(-1.0, 1.0));
        assert_eq!(viewport.pixel_to_ndc(800.0, 600.0), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_origin_is_in_front_of_camera() {
        let camera = Camera::new(1.0);
        let clip = camera.projection_matrix() * camera.view_matrix() * glam::Vec4::W;
        assert!(clip.w > 0.0);
        assert!((clip.x / clip.w).abs() < 1e-6);
        assert!((clip.z / clip.w) > 0.0 && (clip.z / clip.w) < 1.0);
    }
}
