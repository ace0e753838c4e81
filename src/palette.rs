//! 256-entry color lookup tables for palette cycling.
//!
//! A palette is built once from a [`PaletteKind`] and never changes. Motion
//! comes from shifting the lookup index over time:
//!
//! ```ignore
//! let palette = Palette::build(PaletteKind::RedBlue);
//! let shift = palette_shift(elapsed_ms, DEFAULT_SHIFT_DIVISOR);
//! let color = palette.lookup(field_value, shift);
//! ```

use std::f64::consts::PI;

use crate::color::{channel_to_u8, hsv_to_rgb, Rgba};

/// Number of entries in every palette.
pub const PALETTE_SIZE: usize = 256;

/// Milliseconds of virtual time per one-entry palette shift.
pub const DEFAULT_SHIFT_DIVISOR: f64 = 32.0;

/// Available palette generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PaletteKind {
    /// Red and blue sines at different frequencies, no green (default).
    #[default]
    RedBlue,

    /// Independent sine frequency per channel.
    Rainbow,

    /// Full-saturation hue sweep.
    HsvHue,

    /// Hue sweep with brightness rising along the index.
    HsvHueLightness,
}

impl PaletteKind {
    /// Every kind, in declaration order.
    pub const ALL: [PaletteKind; 4] = [
        PaletteKind::RedBlue,
        PaletteKind::Rainbow,
        PaletteKind::HsvHue,
        PaletteKind::HsvHueLightness,
    ];

    /// Color of palette entry `i`.
    pub fn entry(self, i: usize) -> Rgba {
        match self {
            PaletteKind::RedBlue => Rgba::rgb(sine_channel(i, 32.0), 0, sine_channel(i, 64.0)),
            PaletteKind::Rainbow => Rgba::rgb(
                sine_channel(i, 16.0),
                sine_channel(i, 32.0),
                sine_channel(i, 64.0),
            ),
            PaletteKind::HsvHue => {
                let [r, g, b] = hsv_to_rgb(i as f64 / PALETTE_SIZE as f64, 1.0, 1.0);
                Rgba::from_unit(r, g, b)
            }
            PaletteKind::HsvHueLightness => {
                let h = i as f64 / PALETTE_SIZE as f64;
                let v = i as f64 / (PALETTE_SIZE - 1) as f64;
                let [r, g, b] = hsv_to_rgb(h, 1.0, v);
                Rgba::from_unit(r, g, b)
            }
        }
    }
}

/// `clamp(128 + 128·sin(πi/D), 0, 255)`.
#[inline]
fn sine_channel(i: usize, divisor: f64) -> u8 {
    channel_to_u8(128.0 + 128.0 * (PI * i as f64 / divisor).sin())
}

/// Palette shift for an elapsed time: `floor(elapsed_ms / divisor)`.
#[inline]
pub fn palette_shift(elapsed_ms: f64, divisor: f64) -> u32 {
    (elapsed_ms / divisor).floor().max(0.0) as u32
}

/// Table index for a field value and shift, always in `0..PALETTE_SIZE`.
#[inline]
pub fn palette_index(field: u32, shift: u32) -> usize {
    ((field as u64 + shift as u64) % PALETTE_SIZE as u64) as usize
}

/// An immutable 256-entry color table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    kind: PaletteKind,
    entries: [Rgba; PALETTE_SIZE],
}

impl Palette {
    /// Build the table for `kind`.
    pub fn build(kind: PaletteKind) -> Self {
        let mut entries = [Rgba::BLACK; PALETTE_SIZE];
        for (i, entry) in entries.iter_mut().enumerate() {
            *entry = kind.entry(i);
        }
        Self { kind, entries }
    }

    pub fn kind(&self) -> PaletteKind {
        self.kind
    }

    pub fn entries(&self) -> &[Rgba; PALETTE_SIZE] {
        &self.entries
    }

    /// `table[(field + shift) mod 256]`.
    #[inline]
    pub fn lookup(&self, field: u32, shift: u32) -> Rgba {
        self.entries[palette_index(field, shift)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_is_deterministic() {
        for kind in PaletteKind::ALL {
            let a = Palette::build(kind);
            let b = Palette::build(kind);
            assert_eq!(
                bytemuck::cast_slice::<Rgba, u8>(a.entries()),
                bytemuck::cast_slice::<Rgba, u8>(b.entries()),
                "{:?}",
                kind
            );
        }
    }

    #[test]
    fn test_kinds_are_distinct() {
        // HsvHue must not be overwritten by HsvHueLightness.
        let hue = Palette::build(PaletteKind::HsvHue);
        let lightness = Palette::build(PaletteKind::HsvHueLightness);
        assert_ne!(hue, lightness);
        assert_eq!(hue.kind(), PaletteKind::HsvHue);
        assert_eq!(hue.entries()[0], Rgba::rgb(255, 0, 0));
        assert_eq!(lightness.entries()[0], Rgba::BLACK);
    }

    #[test]
    fn test_red_blue_entries() {
        let palette = Palette::build(PaletteKind::RedBlue);
        assert_eq!(palette.entries()[0], Rgba::rgb(128, 0, 128));
        // sin(π/2) = 1 saturates red at entry 16
        assert_eq!(palette.entries()[16].r, 255);
        assert_eq!(palette.entries()[32].b, 255);
        assert!(palette.entries().iter().all(|c| c.g == 0));
    }

    #[test]
    fn test_index_wraps() {
        assert_eq!(palette_index(200, 100), 44);
        assert_eq!(palette_index(0, 256), 0);
        assert_eq!(palette_index(255, 1), 0);
        assert_eq!(palette_index(160, 256 * 7 + 3), 163);
        assert_eq!(palette_index(u32::MAX, u32::MAX), (2 * u32::MAX as u64 % 256) as usize);
    }

    #[test]
    fn test_lookup_uses_wrapped_index() {
        let palette = Palette::build(PaletteKind::Rainbow);
        assert_eq!(palette.lookup(200, 100), palette.entries()[44]);
    }

    #[test]
    fn test_shift_floors() {
        assert_eq!(palette_shift(0.0, 32.0), 0);
        assert_eq!(palette_shift(31.9, 32.0), 0);
        assert_eq!(palette_shift(32.0, 32.0), 1);
        assert_eq!(palette_shift(1000.0, 32.0), 31);
        assert_eq!(palette_shift(1000.0, 8.0), 125);
    }
}
