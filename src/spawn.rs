//! Particle field generation.
//!
//! The smoke cloud is generated once at startup. Every particle gets a
//! position, a base size, a palette color picked from its horizontal band and
//! a phase that offsets its rise cycle. None of it changes afterwards; all
//! motion is derived per frame by the kernel.
//!
//! ```ignore
//! let field = FieldGenerator::seeded(7).generate(5000, &Palette::default());
//! assert_eq!(field.len(), 5000);
//! ```

use crate::Vec3;
use bytemuck::{Pod, Zeroable};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Default number of particles in the cloud.
pub const DEFAULT_PARTICLE_COUNT: u32 = 5000;

/// Outer radius of the horizontal distribution.
pub const MAX_RADIUS: f32 = 2000.0;

/// Vertical spawn range, independent of radius.
pub const SPAWN_HEIGHT: f32 = 2000.0;

/// Depth spawn range.
pub const SPAWN_DEPTH: f32 = 1000.0;

/// Base point size range, half-open.
pub const SIZE_RANGE: (f32, f32) = (100.0, 300.0);

/// Horizontal window mapped onto [0, 1] for color banding.
pub const BAND_WINDOW: (f32, f32) = (-400.0, 400.0);

/// Band edges: below the first is palette[0], above the second palette[1].
pub const BAND_EDGES: (f32, f32) = (0.4, 0.6);

/// One smoke particle as laid out in the instance buffer.
///
/// 32 bytes, read by the vertex stage as four attributes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Particle {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 3],
    pub phase: f32,
}

impl Particle {
    /// Byte offset of `size`.
    pub const SIZE_OFFSET: u32 = 12;
    /// Byte offset of `color`.
    pub const COLOR_OFFSET: u32 = 16;
    /// Byte offset of `phase`.
    pub const PHASE_OFFSET: u32 = 28;

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    #[inline]
    pub fn color(&self) -> Vec3 {
        Vec3::from_array(self.color)
    }
}

/// Three-color palette for the horizontal bands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Linear RGB colors: left band, right band, center band.
    pub colors: [Vec3; 3],
}

impl Palette {
    /// Build a palette from linear RGB colors.
    pub fn new(left: Vec3, right: Vec3, center: Vec3) -> Self {
        Self {
            colors: [left, right, center],
        }
    }

    /// Build a palette from `0xRRGGBB` sRGB values.
    pub fn from_hex(left: u32, right: u32, center: u32) -> Self {
        Self::new(hex_to_linear(left), hex_to_linear(right), hex_to_linear(center))
    }

    /// Color for a normalized horizontal coordinate.
    ///
    /// `t < 0.4` is the left color, `t > 0.6` the right one, anything in
    /// between (edges included) the center one.
    pub fn band(&self, t: f32) -> Vec3 {
        self.colors[band_index(t)]
    }
}

impl Default for Palette {
    /// Makeup pink, vanilla cream and pure white.
    fn default() -> Self {
        Self::from_hex(0xF4B1D2, 0xFFF8E1, 0xFFFFFF)
    }
}

/// Palette slot for a normalized horizontal coordinate.
#[inline]
pub fn band_index(t: f32) -> usize {
    if t < BAND_EDGES.0 {
        0
    } else if t > BAND_EDGES.1 {
        1
    } else {
        2
    }
}

/// Map a horizontal position onto the banding window.
///
/// Not clamped: particles outside the window land in the outer bands.
#[inline]
pub fn normalize_x(x: f32) -> f32 {
    (x - BAND_WINDOW.0) / (BAND_WINDOW.1 - BAND_WINDOW.0)
}

/// Convert a `0xRRGGBB` sRGB color to linear RGB.
pub fn hex_to_linear(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xFF) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Generates the static particle field.
pub struct FieldGenerator {
    rng: SmallRng,
}

impl FieldGenerator {
    /// Generator seeded from the clock, so each run looks different.
    pub fn new() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::seeded(seed)
    }

    /// Reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Produce `count` particles colored from `palette`.
    pub fn generate(&mut self, count: u32, palette: &Palette) -> Vec<Particle> {
        (0..count).map(|_| self.particle(palette)).collect()
    }

    fn particle(&mut self, palette: &Palette) -> Particle {
        // sqrt keeps the disk area-uniform, which piles x up around the center
        let r = self.rng.gen::<f32>().sqrt() * MAX_RADIUS;
        let angle = self.rng.gen_range(0.0..TAU);

        let x = r * angle.cos();
        let y = (self.rng.gen::<f32>() - 0.5) * SPAWN_HEIGHT;
        let z = (self.rng.gen::<f32>() - 0.5) * SPAWN_DEPTH;

        let phase = self.rng.gen::<f32>();
        let size = self.rng.gen_range(SIZE_RANGE.0..SIZE_RANGE.1);
        let color = palette.band(normalize_x(x));

        Particle {
            position: [x, y, z],
            size,
            color: color.to_array(),
            phase,
        }
    }
}

impl Default for FieldGenerator {
    fn default() -> Self {
        Self::new()
    }
}
