//! # Plasma - real-time plasma demos
//!
//! Animated color fields driven by a fixed-timestep render loop.
//!
//! Every frame advances a virtual clock by exactly one step (one display
//! refresh period), so the animation runs at the same speed no matter how
//! long a frame really took. A busy-wait [`Pacer`](time::Pacer) holds each
//! frame to the display's refresh period.
//!
//! ## Quick Start
//!
//! ```ignore
//! use plasma::prelude::*;
//!
//! let mut config = PlasmaConfig::new(Variant::ColorCycling);
//! config.palette = PaletteKind::Rainbow;
//! plasma::window::run(config)?;
//! ```
//!
//! ## Variants
//!
//! | Variant | Rendering | Default size |
//! |---------|-----------|--------------|
//! | `classic` | CPU, three-term phase, red held high | 320x240 |
//! | `rgb` | CPU, phase-shifted channels, optional mouse | 128x128 x4 |
//! | `color-cycling` | CPU, static field + rotating [`Palette`] | 640x480 |
//! | `shader` | GPU fragment shader | 640x480 |
//! | `cube` | GPU, plasma on a rotating cube | 640x480 |
//!
//! ## Headless use
//!
//! [`RenderLoop`] only needs an [`EventSource`] and a [`Surface`]. Tests
//! drive it with a scripted event queue, a recording surface and a fake
//! [`Clock`](time::Clock):
//!
//! ```ignore
//! let mut render_loop = RenderLoop::new(Box::new(FieldPlasma::rgb(4, 4)), clock, 0);
//! let status = render_loop.run(&mut events, &mut surface);
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod gpu;
pub mod grid;
pub mod input;
pub mod metrics;
pub mod palette;
pub mod render_loop;
pub mod scene;
pub mod shader;
pub mod time;
pub mod window;

pub use color::Rgba;
pub use config::{Args, PlasmaConfig, Variant};
pub use error::{GpuError, PresentError, RunError, ShaderError};
pub use grid::{FieldBuffer, Grid, PixelBuffer};
pub use input::{Event, EventQueue, EventSource, KeyCode};
pub use palette::{Palette, PaletteKind};
pub use render_loop::{ExitStatus, LoopState, RenderLoop, Surface};
pub use scene::{ColorCycling, CubePlasma, FieldPlasma, Frame, Scene, ShaderPlasma};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use plasma::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::Rgba;
    pub use crate::config::{PlasmaConfig, Variant};
    pub use crate::field::FieldKind;
    pub use crate::grid::{FieldBuffer, Grid, PixelBuffer};
    pub use crate::input::{Event, EventQueue, EventSource, KeyCode};
    pub use crate::palette::{Palette, PaletteKind};
    pub use crate::render_loop::{ExitStatus, LoopState, RenderLoop, Surface};
    pub use crate::scene::{ColorCycling, CubePlasma, FieldPlasma, Frame, Scene, ShaderPlasma};
    pub use crate::time::{Clock, Pacer, SystemClock, VirtualClock};
}
