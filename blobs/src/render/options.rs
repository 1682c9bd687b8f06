//! Configuration for [`render`](super::render).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::palette::Palette;

/// Selects which overlays a render pass draws and how.
///
/// Each flag gates one independent feature. Within a pass the color fill is
/// applied first, then per-blob bounding boxes, orientation segments and
/// centroid markers, in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    // ========================================================================
    // Features
    // ========================================================================
    /// Blend each blob's palette color over its pixels.
    pub color: bool,
    /// Outline each blob's bounding box.
    pub bounding_box: bool,
    /// Mark each centroid with a cross.
    pub centroid: bool,
    /// Draw a segment along each blob's principal axis. Computes and caches
    /// central moments for blobs that lack them.
    pub angle: bool,
    /// Emit one `info` event per blob with its statistics.
    pub log: bool,

    // ========================================================================
    // Color fill
    // ========================================================================
    /// Weight of the palette color: 0 keeps the source, 1 replaces it.
    pub alpha: f64,
    pub palette: Palette,

    // ========================================================================
    // Overlay geometry
    // ========================================================================
    /// Half-length of the orientation segment per pixel of blob area.
    pub angle_scale: f64,
    /// Arm length of the centroid cross, in pixels.
    pub centroid_arm: f32,

    pub bounding_box_color: [u8; 3],
    pub angle_color: [u8; 3],
    pub centroid_color: [u8; 3],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: true,
            bounding_box: true,
            centroid: true,
            angle: true,
            log: false,

            alpha: 1.0,
            palette: Palette::default(),

            angle_scale: 0.005,
            centroid_arm: 3.0,

            bounding_box_color: [255, 0, 0],
            angle_color: [0, 255, 0],
            centroid_color: [0, 0, 255],
        }
    }
}

impl RenderOptions {
    /// Options with every feature disabled.
    pub fn none() -> Self {
        Self {
            color: false,
            bounding_box: false,
            centroid: false,
            angle: false,
            log: false,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    pub fn with_bounding_box(mut self, enabled: bool) -> Self {
        self.bounding_box = enabled;
        self
    }

    pub fn with_centroid(mut self, enabled: bool) -> Self {
        self.centroid = enabled;
        self
    }

    pub fn with_angle(mut self, enabled: bool) -> Self {
        self.angle = enabled;
        self
    }

    pub fn with_log(mut self, enabled: bool) -> Self {
        self.log = enabled;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_angle_scale(mut self, angle_scale: f64) -> Self {
        self.angle_scale = angle_scale;
        self
    }

    /// True if any per-blob pass (overlays or logging) is enabled.
    pub(crate) fn needs_blob_pass(&self) -> bool {
        self.bounding_box || self.centroid || self.angle || self.log
    }

    /// Parses options from JSON; missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(Error::InvalidConfig(format!(
                "alpha must be in [0, 1], got {}",
                self.alpha
            )));
        }
        if !(self.angle_scale.is_finite() && self.angle_scale > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "angle_scale must be positive, got {}",
                self.angle_scale
            )));
        }
        if !(self.centroid_arm.is_finite() && self.centroid_arm >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "centroid_arm must be non-negative, got {}",
                self.centroid_arm
            )));
        }
        self.palette.validate().map_err(Error::InvalidConfig)
    }
}
