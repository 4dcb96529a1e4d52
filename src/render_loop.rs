//! The per-frame driver.
//!
//! One call to [`RenderLoop::frame`] is one iteration: drain queued input,
//! apply resizes, advance simulation time, smooth the pointer, render and
//! present. The caller reschedules it (winit redraw requests, or a plain loop
//! when headless) until it reports [`LoopStatus::TornDown`].

use log::{error, info, warn};

use crate::camera::Viewport;
use crate::input::EventQueue;
use crate::uniforms::{FrameUniforms, SimulationState};

/// Something that can draw the whole field for one frame.
pub trait FrameRenderer {
    /// Match the presentation surface to a new size in pixels.
    ///
    /// Also used to reconfigure a lost surface at its current size.
    fn resize(&mut self, width: u32, height: u32);

    /// Evaluate the kernel for every particle, rasterize and present.
    fn render(&mut self, frame: &FrameUniforms) -> Result<(), wgpu::SurfaceError>;
}

/// Whether the loop should be scheduled again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStatus {
    Continue,
    TornDown,
}

/// Owns the renderer and all mutable frame state.
pub struct RenderLoop<R: FrameRenderer> {
    renderer: Option<R>,
    state: SimulationState,
    viewport: Viewport,
    events: EventQueue,
    frames: u64,
}

impl<R: FrameRenderer> RenderLoop<R> {
    pub fn new(renderer: R, viewport: Viewport, state: SimulationState, events: EventQueue) -> Self {
        Self {
            renderer: Some(renderer),
            state,
            viewport,
            events,
            frames: 0,
        }
    }

    /// Run one frame at `elapsed` wall-clock seconds since start.
    pub fn frame(&mut self, elapsed: f32) -> LoopStatus {
        if self.renderer.is_none() {
            return LoopStatus::TornDown;
        }

        let input = self.events.drain();
        if input.teardown {
            self.teardown();
            return LoopStatus::TornDown;
        }

        let Some(renderer) = self.renderer.as_mut() else {
            return LoopStatus::TornDown;
        };

        if let Some((width, height)) = input.resize {
            if self.viewport.resize(width, height) {
                renderer.resize(width, height);
            }
        }
        if let Some((x, y)) = input.pointer {
            self.state.pointer.set_raw(self.viewport.pixel_to_ndc(x, y));
        }

        let frame = self.state.advance(elapsed, &self.viewport);

        match renderer.render(&frame) {
            Ok(()) => self.frames += 1,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                warn!("surface lost, reconfiguring at {}x{}", self.viewport.width(), self.viewport.height());
                renderer.resize(self.viewport.width(), self.viewport.height());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("out of GPU memory, dropping the background");
                self.teardown();
                return LoopStatus::TornDown;
            }
            Err(e) => warn!("frame skipped: {:?}", e),
        }

        LoopStatus::Continue
    }

    /// Drop the renderer and everything it holds. Further frames are no-ops.
    pub fn teardown(&mut self) {
        if self.renderer.take().is_some() {
            info!("background torn down after {} frames", self.frames);
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.renderer.is_some()
    }

    /// Frames successfully presented.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }
}
