//! Pixel color type and channel conversions.

use bytemuck::{Pod, Zeroable};

/// One RGBA8 pixel, laid out the way the GPU texture expects it.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    /// Opaque color from 8-bit channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Opaque color from unit-range channels.
    ///
    /// Each channel is scaled by 255 and clamped before narrowing, so
    /// floating point overshoot at formula boundaries never wraps.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        Self::rgb(unit_to_u8(r), unit_to_u8(g), unit_to_u8(b))
    }

    /// Pack as `0x00RRGGBB`.
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// Clamp a 0..255 channel value into a byte.
#[inline]
pub fn channel_to_u8(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0) as u8
}

/// Scale a 0..1 channel value into a byte.
#[inline]
pub fn unit_to_u8(value: f64) -> u8 {
    channel_to_u8(value * 255.0)
}

/// Convert HSV in `[0, 1]³` to RGB in `[0, 1]³`.
///
/// Standard six-sector formula: `sector = floor(6h) mod 6` and the
/// fractional part `f = 6h - floor(6h)` interpolates inside the sector.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [f64; 3] {
    if s <= 0.0 {
        return [v, v, v];
    }

    let h6 = h * 6.0;
    let floor = h6.floor();
    let sector = (floor as i64).rem_euclid(6);
    let f = h6 - floor;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}
