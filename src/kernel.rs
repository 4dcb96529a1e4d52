//! CPU reference of the per-particle motion/color kernel.
//!
//! The GPU runs the same math in the vertex stage of `smoke.wgsl`.
//! This module mirrors it one-to-one so the behavior can be tested, benched
//! and driven headless. Keep the constants here and the WGSL `const`s in sync.
//!
//! Every value is derived from the particle's static attributes plus two
//! per-frame scalars (time and pointer). Nothing is written back.

use crate::spawn::Particle;
use crate::uniforms::FrameUniforms;
use crate::{Vec2, Vec3, Vec4};

/// Fraction of a rise cycle completed per second of simulation time.
pub const RISE_SPEED: f32 = 0.05;
/// Seconds for one full rise, `1 / RISE_SPEED`.
pub const RISE_PERIOD: f32 = 20.0;
/// Height where particles enter at the bottom of their cycle.
pub const FLOOR_Y: f32 = -800.0;
/// Distance covered in one cycle.
pub const RISE_HEIGHT: f32 = 1600.0;

/// Horizontal sway: spatial frequency, time speed, amplitude.
pub const SWAY_X: (f32, f32, f32) = (0.005, 0.5, 50.0);
/// Depth sway: spatial frequency, time speed, amplitude.
pub const SWAY_Z: (f32, f32, f32) = (0.003, 0.7, 40.0);

/// NDC pointer to world units.
pub const POINTER_SCALE: f32 = 1000.0;
/// Particles closer than this to the pointer are pushed away.
pub const REPEL_RADIUS: f32 = 200.0;
/// Per-axis push at zero distance.
pub const REPEL_STRENGTH: f32 = 100.0;

/// Peak opacity of a single splat.
pub const MAX_OPACITY: f32 = 0.08;
/// Cycle range over which particles fade in.
pub const FADE_IN: (f32, f32) = (0.0, 0.3);
/// Cycle range over which particles fade out.
pub const FADE_OUT: (f32, f32) = (1.0, 0.5);

/// Point size in pixels at unit depth per unit of base size.
pub const SIZE_ATTENUATION: f32 = 400.0;
/// Depths below this are clamped before attenuation.
pub const MIN_DEPTH: f32 = 1.0;

/// Hermite step between two edges. Works with `edge0 > edge1` as a falling step.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Position in the rise cycle, in `[0, 1)`.
#[inline]
pub fn cycle(time: f32, phase: f32) -> f32 {
    let v = time * RISE_SPEED + phase;
    let c = v - v.floor();
    // x - floor(x) rounds up to 1.0 for tiny negative x
    if c >= 1.0 {
        0.0
    } else {
        c
    }
}

/// Height for a point in the rise cycle.
#[inline]
pub fn rise_height(cycle: f32) -> f32 {
    FLOOR_Y + cycle * RISE_HEIGHT
}

/// Horizontal and depth offsets for a particle at height `y`.
#[inline]
pub fn sway(y: f32, time: f32) -> Vec2 {
    let (fx, sx, ax) = SWAY_X;
    let (fz, sz, az) = SWAY_Z;
    Vec2::new((y * fx + time * sx).sin() * ax, (y * fz + time * sz).cos() * az)
}

/// Repulsion magnitude per axis for a given planar distance.
#[inline]
pub fn repulsion_force(distance: f32) -> f32 {
    if distance < REPEL_RADIUS {
        (REPEL_RADIUS - distance) / REPEL_RADIUS * REPEL_STRENGTH
    } else {
        0.0
    }
}

/// Displacement pushing `position` away from `pointer` (both in world units).
///
/// Each axis is pushed independently by the same magnitude, the sign taken
/// from which side of the pointer the particle sits on.
#[inline]
pub fn repulsion(position: Vec2, pointer: Vec2) -> Vec2 {
    let force = repulsion_force(position.distance(pointer));
    if force == 0.0 {
        return Vec2::ZERO;
    }
    let side = |p: f32, m: f32| if p > m { 1.0 } else { -1.0 };
    Vec2::new(
        force * side(position.x, pointer.x),
        force * side(position.y, pointer.y),
    )
}

/// Opacity envelope over the rise cycle.
#[inline]
pub fn opacity(cycle: f32) -> f32 {
    smoothstep(FADE_OUT.0, FADE_OUT.1, cycle) * smoothstep(FADE_IN.0, FADE_IN.1, cycle) * MAX_OPACITY
}

/// Perspective point size in pixels.
#[inline]
pub fn point_size(size: f32, depth: f32) -> f32 {
    size * (SIZE_ATTENUATION / depth.max(MIN_DEPTH))
}

/// Everything the kernel derives for one particle in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// World position after rise, sway and repulsion.
    pub position: Vec3,
    /// Repulsion part of the displacement.
    pub displacement: Vec2,
    pub cycle: f32,
    pub opacity: f32,
    /// Point size in pixels.
    pub point_size: f32,
    pub color: Vec3,
    /// Clip-space center of the splat.
    pub clip: Vec4,
}

impl Sample {
    /// Center in window pixels, origin top-left. `None` behind the camera.
    pub fn screen_position(&self, viewport: Vec2) -> Option<Vec2> {
        if self.clip.w <= 0.0 {
            return None;
        }
        let ndc = self.clip.truncate() / self.clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * viewport.x,
            (1.0 - ndc.y) * 0.5 * viewport.y,
        ))
    }

    /// Whether the splat contributes anything to the frame.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Evaluate the kernel for one particle.
pub fn evaluate(particle: &Particle, frame: &FrameUniforms) -> Sample {
    let time = frame.time;
    let cycle = cycle(time, particle.phase);

    let mut p = particle.position();
    p.y = rise_height(cycle);

    let offset = sway(p.y, time);
    p.x += offset.x;
    p.z += offset.y;

    let displacement = repulsion(p.truncate(), frame.pointer * POINTER_SCALE);
    p.x += displacement.x;
    p.y += displacement.y;

    let world = p.extend(1.0);
    let depth = -(frame.view * world).z;

    Sample {
        position: p,
        displacement,
        cycle,
        opacity: opacity(cycle),
        point_size: point_size(particle.size, depth),
        color: particle.color(),
        clip: frame.view_proj * world,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Viewport;
    use crate::uniforms::POINTER_SENTINEL;

    fn frame(time: f32, pointer: Vec2) -> FrameUniforms {
        FrameUniforms::new(time, pointer, &Viewport::new(800, 600))
    }

    #[test]
    fn test_rise_period_matches_speed() {
        assert_eq!(RISE_PERIOD * RISE_SPEED, 1.0);
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(cycle(0.0, 0.0), 0.0);
        assert!((cycle(10.0, 0.0) - 0.5).abs() < 1e-6);
        assert!((cycle(10.0, 0.75) - 0.25).abs() < 1e-6);
        assert!(cycle(-1e-9, 0.0) < 1.0);
        assert!(cycle(-5.0, 0.0) >= 0.0);
    }

    #[test]
    fn test_smoothstep_falling_edges() {
        assert_eq!(smoothstep(1.0, 0.5, 1.0), 0.0);
        assert_eq!(smoothstep(1.0, 0.5, 0.5), 1.0);
        assert_eq!(smoothstep(1.0, 0.5, 0.2), 1.0);
        assert!((smoothstep(1.0, 0.5, 0.75) - 0.5).abs() < 1e-6);
        // matches the 1 - smoothstep(lo, hi, x) form used in WGSL
        for i in 0..=20 {
            let x = i as f32 / 20.0;
            assert!((smoothstep(1.0, 0.5, x) - (1.0 - smoothstep(0.5, 1.0, x))).abs() < 1e-6);
        }
    }

    #[test]
    fn test_opacity_envelope() {
        assert_eq!(opacity(0.0), 0.0);
        assert_eq!(opacity(1.0), 0.0);
        for i in 1..100 {
            let c = i as f32 / 100.0;
            let o = opacity(c);
            assert!(o > 0.0, "opacity({}) = {}", c, o);
            assert!(o <= MAX_OPACITY);
        }
        assert_eq!(opacity(0.4), MAX_OPACITY);
    }

    #[test]
    fn test_repulsion_outside_radius() {
        assert_eq!(repulsion(Vec2::new(200.0, 0.0), Vec2::ZERO), Vec2::ZERO);
        assert_eq!(repulsion(Vec2::new(500.0, 500.0), Vec2::ZERO), Vec2::ZERO);
        assert_eq!(repulsion_force(200.0), 0.0);
    }

    #[test]
    fn test_repulsion_grows_toward_pointer() {
        let mut last = 0.0;
        for step in (0..200).rev() {
            let d = step as f32;
            let f = repulsion_force(d);
            assert!(f > last, "force at {} = {} not above {}", d, f, last);
            last = f;
        }
        assert_eq!(repulsion_force(0.0), REPEL_STRENGTH);
    }

    #[test]
    fn test_repulsion_direction_is_per_axis() {
        let pointer = Vec2::new(100.0, 100.0);
        let d = repulsion(Vec2::new(150.0, 50.0), pointer);
        assert!(d.x > 0.0 && d.y < 0.0);
        assert_eq!(d.x.abs(), d.y.abs());
        let d = repulsion(Vec2::new(50.0, 150.0), pointer);
        assert!(d.x < 0.0 && d.y > 0.0);
    }

    #[test]
    fn test_point_size_perspective() {
        assert_eq!(point_size(100.0, 400.0), 100.0);
        assert_eq!(point_size(100.0, 800.0), 50.0);
        assert!(point_size(100.0, 0.0).is_finite());
    }

    #[test]
    fn test_evaluate_without_pointer() {
        let particle = Particle {
            position: [10.0, 900.0, -20.0],
            size: 150.0,
            color: [1.0, 0.5, 0.25],
            phase: 0.5,
        };
        let s = evaluate(&particle, &frame(0.0, POINTER_SENTINEL));

        assert_eq!(s.cycle, 0.5);
        assert_eq!(s.displacement, Vec2::ZERO);
        // initial y is replaced by the rise height
        let expected_y = rise_height(0.5);
        assert!((s.position.y - expected_y).abs() < 1e-3);
        let sway = sway(expected_y, 0.0);
        assert!((s.position.x - (10.0 + sway.x)).abs() < 1e-3);
        assert!((s.position.z - (-20.0 + sway.y)).abs() < 1e-3);
        assert_eq!(s.color, Vec3::new(1.0, 0.5, 0.25));
        assert!(s.is_visible());

        // camera sits at z = 1000 looking down -z
        let depth = 1000.0 - s.position.z;
        assert!((s.point_size - point_size(150.0, depth)).abs() < 1e-2);
    }

    #[test]
    fn test_evaluate_pointer_on_particle() {
        let particle = Particle {
            position: [0.0, 0.0, 0.0],
            size: 100.0,
            color: [1.0; 3],
            phase: 0.5,
        };
        let f = frame(0.0, POINTER_SENTINEL);
        let rest = evaluate(&particle, &f);

        // aim the pointer at where the particle would be without it
        let pointer = rest.position.truncate() / POINTER_SCALE;
        let pushed = evaluate(&particle, &frame(0.0, pointer));
        assert!(pushed.displacement.length() > 0.0);
        assert!((pushed.position.truncate() - rest.position.truncate()).length() > 100.0);
    }

    #[test]
    fn test_center_particle_projects_to_screen_center() {
        let particle = Particle {
            position: [0.0, 0.0, 0.0],
            size: 100.0,
            color: [1.0; 3],
            phase: 0.5,
        };
        let mut s = evaluate(&particle, &frame(0.0, POINTER_SENTINEL));
        // undo sway for a clean projection check
        s.clip = frame(0.0, POINTER_SENTINEL).view_proj * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let screen = s.screen_position(Vec2::new(800.0, 600.0)).unwrap();
        assert!((screen - Vec2::new(400.0, 300.0)).length() < 1e-2);
    }
}
