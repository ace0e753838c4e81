//! Input events for the render loop.
//!
//! Raw winit window events are translated into the small [`Event`] set the
//! loop understands, and queued until the next frame polls them. The loop
//! takes at most one event per frame, so the queue keeps only the newest
//! pointer position when several motions arrive back to back.

use std::collections::VecDeque;

use glam::DVec2;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Keys the demos react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Space,
    Enter,
    Q,
    Other(u32),
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::Escape => KeyCode::Escape,
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::Enter => KeyCode::Enter,
            WinitKeyCode::KeyQ => KeyCode::Q,
            _ => KeyCode::Other(key as u32),
        }
    }
}

/// An input event, already reduced to what the loop needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Window close request.
    Quit,
    /// A key went down.
    KeyDown(KeyCode),
    /// Cursor position as a fraction of the window size, `[0, 1]` on each axis.
    PointerMoved(DVec2),
    /// New window size in physical pixels.
    Resized { width: u32, height: u32 },
}

impl Event {
    /// Whether this event ends the loop.
    pub fn is_quit(&self) -> bool {
        matches!(self, Event::Quit | Event::KeyDown(KeyCode::Escape))
    }
}

/// Source of input events, polled once per frame.
pub trait EventSource {
    /// Next pending event, if any. Never blocks.
    fn poll_event(&mut self) -> Option<Event>;
}

/// FIFO of translated events.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event. A pointer motion replaces a pointer motion queued
    /// directly before it.
    pub fn push(&mut self, event: Event) {
        if let (Event::PointerMoved(_), Some(Event::PointerMoved(_))) = (&event, self.events.back()) {
            self.events.pop_back();
        }
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSource for EventQueue {
    fn poll_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }
}

/// Translates winit window events into [`Event`]s.
///
/// Tracks the window size so cursor positions can be normalized.
#[derive(Debug)]
pub struct Input {
    window_size: (u32, u32),
}

impl Input {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            window_size: (width, height),
        }
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Translate one window event. Returns `None` for events the loop ignores.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<Event> {
        match event {
            WindowEvent::CloseRequested => Some(Event::Quit),

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return None;
                }
                match event.physical_key {
                    PhysicalKey::Code(code) => Some(Event::KeyDown(KeyCode::from(code))),
                    PhysicalKey::Unidentified(_) => None,
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.normalize(position.x, position.y).map(Event::PointerMoved)
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return None;
                }
                self.window_size = (size.width, size.height);
                Some(Event::Resized {
                    width: size.width,
                    height: size.height,
                })
            }

            _ => None,
        }
    }

    /// Cursor pixel position as a fraction of the window size.
    pub fn normalize(&self, x: f64, y: f64) -> Option<DVec2> {
        let (w, h) = self.window_size;
        if w == 0 || h == 0 {
            return None;
        }
        Some(DVec2::new(x / w as f64, y / h as f64))
    }
}
