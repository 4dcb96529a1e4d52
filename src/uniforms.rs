//! Per-frame uniform state.
//!
//! [`SimulationState`] is the only writer of simulation time and the smoothed
//! pointer. Each frame it produces a [`FrameUniforms`] snapshot that is handed
//! by reference to the renderer and, through [`GpuUniforms`], to the shader.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::camera::Viewport;
use crate::Vec2;

/// Pointer position used before any pointer sample arrives.
///
/// Far enough off-screen that no particle is ever repelled.
pub const POINTER_SENTINEL: Vec2 = Vec2::new(-1000.0, -1000.0);

/// Fraction of the remaining distance the smoothed pointer covers per frame.
pub const DEFAULT_POINTER_SMOOTHING: f32 = 0.05;

/// Everything constant across all particles for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUniforms {
    /// Simulation time in seconds.
    pub time: f32,
    /// Smoothed pointer in NDC.
    pub pointer: Vec2,
    pub view: Mat4,
    pub view_proj: Mat4,
    /// Surface size in pixels.
    pub viewport: Vec2,
}

impl FrameUniforms {
    /// Snapshot for the given time, pointer and viewport.
    pub fn new(time: f32, pointer: Vec2, viewport: &Viewport) -> Self {
        let camera = viewport.camera();
        let view = camera.view_matrix();
        Self {
            time,
            pointer,
            view,
            view_proj: camera.projection_matrix() * view,
            viewport: viewport.size_f32(),
        }
    }

    /// GPU layout of this snapshot.
    pub fn to_gpu(&self) -> GpuUniforms {
        GpuUniforms {
            view_proj: self.view_proj.to_cols_array_2d(),
            view: self.view.to_cols_array_2d(),
            pointer: self.pointer.to_array(),
            viewport: self.viewport.to_array(),
            time: self.time,
            _padding: [0.0; 3],
        }
    }
}

/// Uniform block as declared in `smoke.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GpuUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub pointer: [f32; 2],
    pub viewport: [f32; 2],
    pub time: f32,
    pub _padding: [f32; 3],
}

/// Exponentially smoothed pointer.
#[derive(Clone, Copy, Debug)]
pub struct PointerState {
    raw: Option<Vec2>,
    smoothed: Vec2,
    smoothing: f32,
}

impl PointerState {
    /// Pointer parked at [`POINTER_SENTINEL`].
    pub fn new(smoothing: f32) -> Self {
        Self {
            raw: None,
            smoothed: POINTER_SENTINEL,
            smoothing: smoothing.clamp(0.0, 1.0),
        }
    }

    /// Record the latest raw sample in NDC.
    ///
    /// The first sample snaps the smoothed pointer onto it; the sentinel is
    /// not a real position to ease away from.
    pub fn set_raw(&mut self, ndc: Vec2) {
        if self.raw.is_none() {
            self.smoothed = ndc;
        }
        self.raw = Some(ndc);
    }

    /// Advance smoothing by one frame and return the smoothed pointer.
    pub fn step(&mut self) -> Vec2 {
        if let Some(raw) = self.raw {
            self.smoothed += (raw - self.smoothed) * self.smoothing;
        }
        self.smoothed
    }

    #[inline]
    pub fn raw(&self) -> Option<Vec2> {
        self.raw
    }

    #[inline]
    pub fn smoothed(&self) -> Vec2 {
        self.smoothed
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new(DEFAULT_POINTER_SMOOTHING)
    }
}

/// Simulation time plus pointer, the mutable half of the kernel's input.
#[derive(Clone, Copy, Debug)]
pub struct SimulationState {
    time_scale: f32,
    sim_time: f32,
    pub pointer: PointerState,
}

impl SimulationState {
    pub fn new(time_scale: f32, pointer_smoothing: f32) -> Self {
        Self {
            time_scale: time_scale.max(0.0),
            sim_time: 0.0,
            pointer: PointerState::new(pointer_smoothing),
        }
    }

    /// Advance to `elapsed` wall-clock seconds and snapshot the frame.
    ///
    /// Simulation time never goes backwards, even if `elapsed` does.
    pub fn advance(&mut self, elapsed: f32, viewport: &Viewport) -> FrameUniforms {
        self.sim_time = self.sim_time.max(elapsed * self.time_scale);
        let pointer = self.pointer.step();
        FrameUniforms::new(self.sim_time, pointer, viewport)
    }

    #[inline]
    pub fn sim_time(&self) -> f32 {
        self.sim_time
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(1.0, DEFAULT_POINTER_SMOOTHING)
    }
}
