//! Background builder and window runner.
//!
//! A host registers named containers, then asks for a background in one of
//! them with [`init_background`]. A missing container yields `None` and
//! allocates nothing; everything else is configured on the returned
//! [`Background`] and started with [`Background::run`].
//!
//! ```ignore
//! let mut containers = ContainerRegistry::new();
//! containers.register("hero", ContainerSpec::new("Shop", 1280, 720));
//!
//! if let Some(background) = init_background(&containers, "hero") {
//!     if let Err(e) = background.with_seed(7).run() {
//!         log::warn!("running without background: {}", e);
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::camera::Viewport;
use crate::error::BackgroundError;
use crate::gpu::GpuState;
use crate::headless::HeadlessRenderer;
use crate::input::{event_channel, scale_pixels, BackgroundEvent, EventQueue, EventSender};
use crate::render_loop::{LoopStatus, RenderLoop};
use crate::spawn::{FieldGenerator, Palette, Particle, DEFAULT_PARTICLE_COUNT};
use crate::time::Time;
use crate::uniforms::{SimulationState, DEFAULT_POINTER_SMOOTHING};

/// A display container the background can take over.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerSpec {
    pub title: String,
    /// Initial logical width.
    pub width: u32,
    /// Initial logical height.
    pub height: u32,
    /// Whether the window behind the smoke is see-through.
    pub transparent: bool,
}

impl ContainerSpec {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            transparent: true,
        }
    }

    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }
}

/// Containers known to the host, by identifier.
#[derive(Debug, Default, Clone)]
pub struct ContainerRegistry {
    containers: HashMap<String, ContainerSpec>,
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a container.
    pub fn register(&mut self, id: impl Into<String>, spec: ContainerSpec) -> &mut Self {
        self.containers.insert(id.into(), spec);
        self
    }

    pub fn get(&self, id: &str) -> Option<&ContainerSpec> {
        self.containers.get(id)
    }
}

/// Look up `container_id` and prepare a background for it.
///
/// Returns `None` when no such container exists. That is not an error: the
/// background is decoration and the host simply goes without.
pub fn init_background(containers: &ContainerRegistry, container_id: &str) -> Option<Background> {
    match containers.get(container_id) {
        Some(spec) => Some(Background::new(spec.clone())),
        None => {
            debug!("no container `{}`, skipping background", container_id);
            None
        }
    }
}

/// A configured, not yet running, smoke background.
pub struct Background {
    container: ContainerSpec,
    particle_count: u32,
    palette: Palette,
    seed: Option<u64>,
    time_scale: f32,
    pointer_smoothing: f32,
    clear_color: wgpu::Color,
    sender: EventSender,
    queue: EventQueue,
}

impl Background {
    /// Background with default settings for `container`.
    pub fn new(container: ContainerSpec) -> Self {
        let (sender, queue) = event_channel();
        Self {
            container,
            particle_count: DEFAULT_PARTICLE_COUNT,
            palette: Palette::default(),
            seed: None,
            time_scale: 1.0,
            pointer_smoothing: DEFAULT_POINTER_SMOOTHING,
            clear_color: wgpu::Color::TRANSPARENT,
            sender,
            queue,
        }
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the band colors.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Make the particle layout reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Simulation seconds per wall-clock second. Negative values clamp to 0.
    pub fn with_time_scale(mut self, scale: f32) -> Self {
        self.time_scale = scale.max(0.0);
        self
    }

    /// Per-frame pointer smoothing factor in `[0, 1]`.
    pub fn with_pointer_smoothing(mut self, factor: f32) -> Self {
        self.pointer_smoothing = factor.clamp(0.0, 1.0);
        self
    }

    /// Color the surface is cleared to each frame.
    pub fn with_clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Handle for feeding pointer, resize or teardown events from elsewhere.
    pub fn event_sender(&self) -> EventSender {
        self.sender.clone()
    }

    #[inline]
    pub fn container(&self) -> &ContainerSpec {
        &self.container
    }

    #[inline]
    pub fn particle_count(&self) -> u32 {
        self.particle_count
    }

    /// Generate the static particle field for this configuration.
    pub fn generate_field(&self) -> Vec<Particle> {
        let mut generator = match self.seed {
            Some(seed) => FieldGenerator::seeded(seed),
            None => FieldGenerator::new(),
        };
        generator.generate(self.particle_count, &self.palette)
    }

    /// Build a render loop around the CPU renderer at the container's size.
    pub fn into_headless(self) -> RenderLoop<HeadlessRenderer> {
        let particles = self.generate_field();
        let (width, height) = (self.container.width, self.container.height);
        let renderer = HeadlessRenderer::new(particles, width, height);
        RenderLoop::new(
            renderer,
            Viewport::new(width, height),
            SimulationState::new(self.time_scale, self.pointer_smoothing),
            self.queue,
        )
    }

    /// Open the container window and render until it is closed or torn down.
    ///
    /// GPU failures come back as `Err` after the window is released; the
    /// caller decides whether to carry on without a background.
    pub fn run(self) -> Result<(), BackgroundError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Highest device pixel ratio the surface is rendered at.
const MAX_PIXEL_RATIO: f64 = 2.0;

/// Surface pixels per window pixel on a display with `scale_factor`.
fn render_scale(scale_factor: f64) -> f64 {
    if scale_factor > MAX_PIXEL_RATIO {
        MAX_PIXEL_RATIO / scale_factor
    } else {
        1.0
    }
}

/// What the app does with a window event.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Dispatch {
    /// Hand to the render loop at the start of the next frame.
    Queue(BackgroundEvent),
    /// Release everything now. Closed or hidden windows may never redraw.
    Shutdown,
    Ignore,
}

fn dispatch(event: &WindowEvent, scale: f64) -> Dispatch {
    match BackgroundEvent::from_window_event(event) {
        Some(BackgroundEvent::Teardown) => Dispatch::Shutdown,
        Some(bg_event) => Dispatch::Queue(bg_event.scaled(scale)),
        None => Dispatch::Ignore,
    }
}

struct App {
    container: ContainerSpec,
    particles: Vec<Particle>,
    state: SimulationState,
    clear_color: wgpu::Color,
    sender: EventSender,
    queue: Option<EventQueue>,
    window: Option<Arc<Window>>,
    render_loop: Option<RenderLoop<GpuState>>,
    time: Time,
    error: Option<BackgroundError>,
}

impl App {
    fn new(background: Background) -> Self {
        let particles = background.generate_field();
        Self {
            particles,
            state: SimulationState::new(background.time_scale, background.pointer_smoothing),
            clear_color: background.clear_color,
            sender: background.sender,
            queue: Some(background.queue),
            container: background.container,
            window: None,
            render_loop: None,
            time: Time::new(),
            error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), BackgroundError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.container.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.container.width,
                self.container.height,
            ))
            .with_transparent(self.container.transparent);

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.window = Some(window.clone());

        let physical = window.inner_size();
        let scale = render_scale(window.scale_factor());
        let size = (
            scale_pixels(physical.width, scale),
            scale_pixels(physical.height, scale),
        );
        let gpu_state = pollster::block_on(GpuState::new(
            window.clone(),
            size,
            &self.particles,
            self.clear_color,
        ))?;

        let Some(queue) = self.queue.take() else {
            return Ok(());
        };
        self.render_loop = Some(RenderLoop::new(
            gpu_state,
            Viewport::new(size.0, size.1),
            self.state,
            queue,
        ));
        self.time = Time::new();
        info!(
            "smoke background running: {} particles at {}x{}",
            self.particles.len(),
            size.0,
            size.1
        );

        window.request_redraw();
        Ok(())
    }

    /// Release GPU resources before the window they draw into.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut render_loop) = self.render_loop.take() {
            render_loop.teardown();
        }
        self.window = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.error.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            warn!("smoke background unavailable: {}", e);
            self.error = Some(e);
            self.shutdown(event_loop);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let scale = self
            .window
            .as_ref()
            .map_or(1.0, |window| render_scale(window.scale_factor()));
        match dispatch(&event, scale) {
            Dispatch::Queue(bg_event) => {
                self.sender.send(bg_event);
            }
            Dispatch::Shutdown => {
                self.shutdown(event_loop);
                return;
            }
            Dispatch::Ignore => {}
        }

        match event {
            WindowEvent::RedrawRequested => {
                let Some(render_loop) = &mut self.render_loop else {
                    return;
                };
                if self.time.update() {
                    debug!(
                        "frame {} at {:.1} fps ({:.2} ms)",
                        self.time.frame(),
                        self.time.fps(),
                        self.time.delta() * 1000.0
                    );
                }
                match render_loop.frame(self.time.elapsed()) {
                    LoopStatus::Continue => {
                        if let Some(window) = &self.window {
                            window.request_redraw();
                        }
                    }
                    LoopStatus::TornDown => self.shutdown(event_loop),
                }
            }
            _ => {}
        }
    }
}
