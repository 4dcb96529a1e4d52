//! # smokefield
//!
//! A pointer-reactive smoke cloud rendered on the GPU, meant to sit behind
//! other content as a decorative background.
//!
//! ## Quick Start
//!
//! ```ignore
//! use smokefield::prelude::*;
//!
//! fn main() {
//!     let mut containers = ContainerRegistry::new();
//!     containers.register("background", ContainerSpec::new("Shop", 1280, 720));
//!
//!     if let Some(background) = init_background(&containers, "background") {
//!         if let Err(e) = background.run() {
//!             log::warn!("continuing without background: {}", e);
//!         }
//!     }
//! }
//! ```
//!
//! ## How it works
//!
//! - A fixed field of particles is generated once ([`FieldGenerator`]).
//!   Each particle has a position, a base size, a band color and a phase.
//! - Every frame the [`RenderLoop`] drains queued input, advances simulation
//!   time and eases the pointer toward its latest sample.
//! - The vertex shader derives each particle's rise, sway, pointer
//!   repulsion, fade and perspective size from its static attributes and the
//!   two per-frame values. Nothing is stored back.
//! - Splats are soft discs blended additively, so the low per-particle
//!   opacity builds up into a glow where particles overlap.
//!
//! The same per-particle math is available on the CPU in [`kernel`] and is
//! what the [`HeadlessRenderer`] runs.

mod background;
pub mod camera;
pub mod error;
mod gpu;
mod headless;
pub mod input;
pub mod kernel;
mod render_loop;
pub mod shader;
pub mod spawn;
pub mod time;
pub mod uniforms;

pub use background::{init_background, Background, ContainerRegistry, ContainerSpec};
pub use camera::{Camera, Viewport};
pub use error::{BackgroundError, GpuError, ShaderError};
pub use glam::{Vec2, Vec3, Vec4};
pub use headless::{FrameStats, HeadlessRenderer};
pub use input::{BackgroundEvent, EventSender};
pub use render_loop::{FrameRenderer, LoopStatus, RenderLoop};
pub use spawn::{FieldGenerator, Palette, Particle};
pub use uniforms::{FrameUniforms, SimulationState};

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::background::{init_background, Background, ContainerRegistry, ContainerSpec};
    pub use crate::error::BackgroundError;
    pub use crate::input::{BackgroundEvent, EventSender};
    pub use crate::render_loop::{FrameRenderer, LoopStatus, RenderLoop};
    pub use crate::spawn::{FieldGenerator, Palette, Particle};
    pub use crate::{Vec2, Vec3, Vec4};
}
