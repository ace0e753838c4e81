//! Procedural plasma fields.
//!
//! Every formula here is a pure function of pixel position and elapsed time.
//! The shared ingredient is a sum of sine terms plus one term driven by the
//! distance to a focus point that orbits with time,
//! `sin(sqrt(cx² + cy² + 1) + t)`, which produces the moving blobs.
//!
//! There are two ways to turn a field into color:
//!
//! - direct trigonometric RGB, see [`phase_to_rgb`]
//! - palette indirection, see [`static_field`] and [`crate::palette`]

use std::f64::consts::PI;

use glam::DVec2;

use crate::color::Rgba;

/// Spatial scale of the RGB plasma: pixel coordinates span `[-S, 0)`.
pub const PLASMA_SCALE: f64 = 20.0;

const PLASMA_SCALE_HALF: f64 = PLASMA_SCALE * 0.5;

/// Phase offsets of the R, G and B channels, 120° apart.
pub const CHANNEL_PHASES: [f64; 3] = [0.0, 2.0 * PI / 3.0, 4.0 * PI / 3.0];

/// Map a pixel index to a centred coordinate in roughly `[-0.5, 0.5]`.
#[inline]
pub fn centered(index: usize, extent: usize) -> f64 {
    let extent = extent as f64;
    (index as f64 - 0.5 * extent) / extent
}

/// Map a pixel index to RGB plasma space.
#[inline]
pub fn plasma_space(index: f64, extent: usize) -> f64 {
    (0.5 + index / extent as f64 - 1.0) * PLASMA_SCALE - PLASMA_SCALE_HALF
}

/// Three-term plasma over centred coordinates.
pub fn classic_phase(x: f64, y: f64, t: f64) -> f64 {
    let v1 = (x * 10.0 + t).sin();
    let v2 = (10.0 * (x * (t / 2.0).sin() + y * (t / 3.0).cos()) + t).sin();

    let cx = x + 0.5 * (t / 5.0).sin();
    let cy = y + 0.5 * (t / 3.0).cos();
    let v3 = ((cx * cx + cy * cy + 1.0).sqrt() + t).sin();

    v1 + v2 + v3
}

/// Red fixed at full intensity, green and blue from the phase.
pub fn classic_color(v: f64) -> Rgba {
    let g = (v * PI).cos() * 0.5 + 0.5;
    let b = (v * PI).sin() * 0.5 + 0.5;
    Rgba::from_unit(1.0, g, b)
}

/// Four-term plasma over [`plasma_space`] coordinates.
pub fn rgb_phase(x: f64, y: f64, t: f64) -> f64 {
    let mut v = (y + t).sin();
    v += ((x + t) * 0.5).sin();
    v += ((x + y + t) * 0.5).sin();

    let cx = x + PLASMA_SCALE_HALF * (t * 0.33).sin();
    let cy = y + PLASMA_SCALE_HALF * (t * 0.5).cos();
    v += ((cx * cx + cy * cy + 1.0).sqrt() + t).sin();

    v * 0.5
}

/// `channel = sin(vπ + φ)·0.5 + 0.5` with φ from [`CHANNEL_PHASES`].
pub fn phase_to_rgb(v: f64) -> Rgba {
    let [r, g, b] = CHANNEL_PHASES.map(|phase| (v * PI + phase).sin() * 0.5 + 0.5);
    Rgba::from_unit(r, g, b)
}

/// RGB plasma color perturbed by the distance to the cursor.
///
/// Red and blue shift with the distance; green keeps the plain phase.
pub fn interactive_rgb(v: f64, x: f64, y: f64, cursor: DVec2, t: f64) -> Rgba {
    let dist = DVec2::new(x, y).distance(cursor);

    let r = ((v + (dist * 2.0 + t).sin()) * PI).sin() * 0.5 + 0.5;
    let g = (v * PI + CHANNEL_PHASES[1]).sin() * 0.5 + 0.5;
    let b = ((v + (dist + t * 0.33).cos()) * PI + CHANNEL_PHASES[2]).sin() * 0.5 + 0.5;

    Rgba::from_unit(r, g, b)
}

/// Time-independent field for palette cycling, in `0..=160`.
///
/// Five `128 + 128·sin` terms over raw pixel coordinates, averaged down by 8.
pub fn static_field(x: usize, y: usize, width: usize, height: usize) -> u32 {
    let (xf, yf) = (x as f64, y as f64);
    let dx = xf - width as f64 / 2.0;
    let dy = yf - height as f64 / 2.0;

    let mut value = 128.0 + 128.0 * (xf / 16.0).sin();
    value += 128.0 + 128.0 * (yf / 8.0).sin();
    value += 128.0 + 128.0 * ((xf + yf) / 16.0).sin();
    value += 128.0 + 128.0 * ((dx * dx + dy * dy).sqrt() / 8.0).sin();
    value += 128.0 + 128.0 * ((xf * xf + yf * yf).sqrt() / 8.0).sin();

    value as u32 / 8
}

/// Per-pixel formula selector for the software scenes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Three sines over centred coordinates, red held at full intensity.
    Classic,
    /// Four sines in plasma space, 120° phase-shifted channels.
    Rgb,
    /// [`FieldKind::Rgb`] perturbed by the cursor.
    ///
    /// `cursor` is the pointer's window fraction minus 0.5, so it stays in
    /// `[-0.5, 0.5]` while pixel coordinates span `[-20, 0)`. The distance is
    /// taken between those two ranges as-is.
    Interactive { cursor: DVec2 },
}

impl FieldKind {
    /// Color of pixel `(xi, yi)` in a `width x height` buffer at time `t`.
    pub fn color(&self, xi: usize, yi: usize, width: usize, height: usize, t: f64) -> Rgba {
        match *self {
            FieldKind::Classic => {
                let v = classic_phase(centered(xi, width), centered(yi, height), t);
                classic_color(v)
            }
            FieldKind::Rgb => {
                let x = plasma_space(xi as f64, width);
                let y = plasma_space(yi as f64, height);
                phase_to_rgb(rgb_phase(x, y, t))
            }
            FieldKind::Interactive { cursor } => {
                let x = plasma_space(xi as f64, width);
                let y = plasma_space(yi as f64, height);
                interactive_rgb(rgb_phase(x, y, t), x, y, cursor, t)
            }
        }
    }
}
