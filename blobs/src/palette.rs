//! Deterministic per-blob display colors.

use image::Rgb;
use serde::{Deserialize, Serialize};

/// Spreads blob colors around the hue circle at fixed saturation and value.
///
/// Color `i` has hue `(i * hue_step) mod 360` degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Hue advance between consecutive indices, in degrees.
    pub hue_step: u32,
    /// Saturation in [0, 1].
    pub saturation: f64,
    /// Value (brightness) in [0, 1].
    pub value: f64,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            hue_step: 77,
            saturation: 0.5,
            value: 1.0,
        }
    }
}

impl Palette {
    pub fn color_for(&self, index: usize) -> Rgb<u8> {
        let hue = ((index % 360) as u32 * (self.hue_step % 360)) % 360;
        hsv_to_rgb(hue as f64, self.saturation, self.value)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.saturation) {
            return Err(format!(
                "palette saturation must be in [0, 1], got {}",
                self.saturation
            ));
        }
        if !(0.0..=1.0).contains(&self.value) {
            return Err(format!(
                "palette value must be in [0, 1], got {}",
                self.value
            ));
        }
        Ok(())
    }
}

/// Converts HSV (hue in degrees, saturation and value in [0, 1]) to 8-bit RGB.
pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Rgb<u8> {
    let h = hue.rem_euclid(360.0) / 60.0;
    let sector = h.floor();
    let f = h - sector;

    let p = value * (1.0 - saturation);
    let q = value * (1.0 - f * saturation);
    let t = value * (1.0 - (1.0 - f) * saturation);

    let (r, g, b) = match sector as u32 % 6 {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    };

    Rgb([to_u8(r), to_u8(g), to_u8(b)])
}

#[inline]
fn to_u8(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}
