//! Input events for the render loop.
//!
//! Pointer moves, resizes and teardown requests never touch frame state
//! directly. They are queued on a channel and drained by the render loop at
//! the start of the next frame, last write winning.
//!
//! ```ignore
//! let (sender, receiver) = event_channel();
//! sender.pointer_moved(400.0, 300.0);
//! sender.resized(1024, 768);
//! // next frame: RenderLoop drains `receiver`
//! ```

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use winit::event::WindowEvent;

/// Something that happened to the container since the last frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundEvent {
    /// Pointer position in container pixels, origin top-left.
    PointerMoved { x: f64, y: f64 },
    /// New container size in pixels.
    Resized { width: u32, height: u32 },
    /// Stop rendering and release the surface.
    Teardown,
}

impl BackgroundEvent {
    /// Translate a window event, if it is one the background cares about.
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::CursorMoved { position, .. } => Some(BackgroundEvent::PointerMoved {
                x: position.x,
                y: position.y,
            }),
            WindowEvent::Resized(size) => Some(BackgroundEvent::Resized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::CloseRequested | WindowEvent::Destroyed => Some(BackgroundEvent::Teardown),
            _ => None,
        }
    }

    /// Map window pixels onto a surface rendered at `scale` times their size.
    pub fn scaled(self, scale: f64) -> Self {
        match self {
            BackgroundEvent::PointerMoved { x, y } => BackgroundEvent::PointerMoved {
                x: x * scale,
                y: y * scale,
            },
            BackgroundEvent::Resized { width, height } => BackgroundEvent::Resized {
                width: scale_pixels(width, scale),
                height: scale_pixels(height, scale),
            },
            BackgroundEvent::Teardown => BackgroundEvent::Teardown,
        }
    }
}

/// Scaled pixel count, never below one.
pub fn scale_pixels(pixels: u32, scale: f64) -> u32 {
    ((pixels as f64 * scale).round() as u32).max(1)
}

/// Cloneable producer side of the event channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<BackgroundEvent>,
}

impl EventSender {
    /// Queue an event. Returns `false` once the background is gone.
    pub fn send(&self, event: BackgroundEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn pointer_moved(&self, x: f64, y: f64) -> bool {
        self.send(BackgroundEvent::PointerMoved { x, y })
    }

    pub fn resized(&self, width: u32, height: u32) -> bool {
        self.send(BackgroundEvent::Resized { width, height })
    }

    pub fn teardown(&self) -> bool {
        self.send(BackgroundEvent::Teardown)
    }
}

/// What the render loop needs from one drain of the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PendingInput {
    /// Latest pointer position in pixels.
    pub pointer: Option<(f64, f64)>,
    /// Latest size.
    pub resize: Option<(u32, u32)>,
    pub teardown: bool,
}

/// Consumer side of the event channel, owned by the render loop.
#[derive(Debug)]
pub struct EventQueue {
    rx: Receiver<BackgroundEvent>,
}

impl EventQueue {
    /// Take everything queued so far, collapsing repeats.
    ///
    /// A disconnected channel is not a teardown: the loop keeps running
    /// when every sender has been dropped.
    pub fn drain(&self) -> PendingInput {
        let mut pending = PendingInput::default();
        loop {
            match self.rx.try_recv() {
                Ok(BackgroundEvent::PointerMoved { x, y }) => pending.pointer = Some((x, y)),
                Ok(BackgroundEvent::Resized { width, height }) => pending.resize = Some((width, height)),
                Ok(BackgroundEvent::Teardown) => pending.teardown = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        pending
    }
}

/// Create a connected sender/queue pair.
pub fn event_channel() -> (EventSender, EventQueue) {
    let (tx, rx) = unbounded();
    (EventSender { tx }, EventQueue { rx })
}
