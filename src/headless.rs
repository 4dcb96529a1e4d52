//! CPU renderer for running the background without a GPU.
//!
//! Evaluates the reference kernel for every particle each frame and keeps the
//! resulting samples as its "framebuffer". Used by integration tests and
//! benches, and handy for inspecting what the shader is expected to produce.

use crate::kernel::{self, Sample};
use crate::render_loop::FrameRenderer;
use crate::spawn::Particle;
use crate::uniforms::FrameUniforms;
use crate::Vec2;

/// Summary of the most recent frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Particles with nonzero opacity.
    pub visible: usize,
    /// Particles pushed by the pointer.
    pub repelled: usize,
    /// Largest per-particle repulsion displacement.
    pub max_displacement: f32,
}

pub struct HeadlessRenderer {
    particles: Vec<Particle>,
    samples: Vec<Sample>,
    size: (u32, u32),
    presented: u64,
    last: FrameStats,
    ever_repelled: usize,
}

impl HeadlessRenderer {
    pub fn new(particles: Vec<Particle>, width: u32, height: u32) -> Self {
        Self {
            samples: Vec::with_capacity(particles.len()),
            particles,
            size: (width, height),
            presented: 0,
            last: FrameStats::default(),
            ever_repelled: 0,
        }
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Kernel output of the last presented frame.
    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn presented(&self) -> u64 {
        self.presented
    }

    #[inline]
    pub fn last_stats(&self) -> FrameStats {
        self.last
    }

    /// Frames in which at least one particle was repelled.
    #[inline]
    pub fn frames_with_repulsion(&self) -> usize {
        self.ever_repelled
    }
}

impl FrameRenderer for HeadlessRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn render(&mut self, frame: &FrameUniforms) -> Result<(), wgpu::SurfaceError> {
        self.samples.clear();
        self.samples
            .extend(self.particles.iter().map(|p| kernel::evaluate(p, frame)));

        let mut stats = FrameStats::default();
        for s in &self.samples {
            if s.is_visible() {
                stats.visible += 1;
            }
            let pushed = s.displacement.length();
            if s.displacement != Vec2::ZERO {
                stats.repelled += 1;
            }
            stats.max_displacement = stats.max_displacement.max(pushed);
        }
        if stats.repelled > 0 {
            self.ever_repelled += 1;
        }

        self.last = stats;
        self.presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Viewport;
    use crate::spawn::{FieldGenerator, Palette};
    use crate::uniforms::POINTER_SENTINEL;

    #[test]
    fn test_empty_field_presents() {
        let mut renderer = HeadlessRenderer::new(Vec::new(), 800, 600);
        let frame = FrameUniforms::new(1.0, POINTER_SENTINEL, &Viewport::new(800, 600));
        renderer.render(&frame).unwrap();
        assert_eq!(renderer.presented(), 1);
        assert!(renderer.samples().is_empty());
        assert_eq!(renderer.last_stats(), FrameStats::default());
    }

    #[test]
    fn test_sentinel_pointer_repels_nothing() {
        let field = FieldGenerator::seeded(2).generate(2000, &Palette::default());
        let mut renderer = HeadlessRenderer::new(field, 800, 600);
        let frame = FrameUniforms::new(3.0, POINTER_SENTINEL, &Viewport::new(800, 600));
        renderer.render(&frame).unwrap();
        let stats = renderer.last_stats();
        assert_eq!(stats.repelled, 0);
        assert!(stats.visible > 0);
        assert_eq!(renderer.samples().len(), 2000);
    }

    #[test]
    fn test_resize_updates_size() {
        let mut renderer = HeadlessRenderer::new(Vec::new(), 800, 600);
        renderer.resize(10, 20);
        assert_eq!(renderer.size(), (10, 20));
    }
}
