//! Region record: statistics of one labeled blob.

use glam::DVec2;

use crate::error::{Error, Result};

/// Region identifier stored per pixel in a label image.
pub type Label = u32;

/// Label of pixels that belong to no blob.
pub const BACKGROUND: Label = 0;

/// Axis-aligned bounding box in pixel coordinates.
///
/// Minimum bounds are inclusive, maximum bounds are exclusive: a pixel at
/// (x, y) is inside if `min_x <= x < max_x` and `min_y <= y < max_y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    #[inline]
    pub const fn new(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Box covering exactly one pixel.
    #[inline]
    pub const fn from_pixel(x: u32, y: u32) -> Self {
        Self::new(x, y, x + 1, y + 1)
    }

    /// Expand this bounding box to include the given pixel.
    #[inline]
    pub fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x + 1);
        self.max_y = self.max_y.max(y + 1);
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.max_x.saturating_sub(self.min_x)
    }

    #[inline]
    pub const fn height(&self) -> u32 {
        self.max_y.saturating_sub(self.min_y)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.min_x >= self.max_x || self.min_y >= self.max_y
    }

    #[inline]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }

    /// True if the box lies within a `width` x `height` image.
    #[inline]
    pub const fn fits(&self, width: u32, height: u32) -> bool {
        self.max_x <= width && self.max_y <= height
    }
}

/// First-order coordinate sums over the pixels of a blob.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawMoments {
    /// Sum of x coordinates.
    pub m10: f64,
    /// Sum of y coordinates.
    pub m01: f64,
}

/// Second-order moments about the centroid.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CentralMoments {
    pub u11: f64,
    pub u20: f64,
    pub u02: f64,
}

/// A labeled region with its accumulated statistics.
///
/// Label, area, bounding box and raw moments come from the labeling stage
/// and never change once the blob is registered. Centroid and central
/// moments are derived lazily and cached; see
/// [`compute_central_moments`](crate::compute_central_moments).
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    label: Label,
    area: u32,
    bbox: BoundingBox,
    raw: RawMoments,

    centroid: Option<DVec2>,
    central_moments: Option<CentralMoments>,
}

impl Blob {
    pub fn new(label: Label, area: u32, bbox: BoundingBox, raw: RawMoments) -> Self {
        Self {
            label,
            area,
            bbox,
            raw,
            centroid: None,
            central_moments: None,
        }
    }

    /// Blob consisting of a single pixel, to be grown with [`Blob::add_pixel`].
    pub fn from_pixel(label: Label, x: u32, y: u32) -> Self {
        Self::new(
            label,
            1,
            BoundingBox::from_pixel(x, y),
            RawMoments {
                m10: x as f64,
                m01: y as f64,
            },
        )
    }

    /// Accumulates one more pixel. Drops any cached derived statistics.
    pub fn add_pixel(&mut self, x: u32, y: u32) {
        self.area += 1;
        self.bbox.include(x, y);
        self.raw.m10 += x as f64;
        self.raw.m01 += y as f64;
        self.centroid = None;
        self.central_moments = None;
    }

    #[inline]
    pub fn label(&self) -> Label {
        self.label
    }

    /// Number of pixels.
    #[inline]
    pub fn area(&self) -> u32 {
        self.area
    }

    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    #[inline]
    pub fn raw_moments(&self) -> RawMoments {
        self.raw
    }

    /// Centroid from raw moments, without caching.
    pub fn compute_centroid(&self) -> Result<DVec2> {
        if self.area == 0 {
            return Err(Error::DegenerateRegion { label: self.label });
        }
        let area = self.area as f64;
        Ok(DVec2::new(self.raw.m10 / area, self.raw.m01 / area))
    }

    /// Centroid, computed on first request and cached.
    pub fn centroid(&mut self) -> Result<DVec2> {
        if let Some(centroid) = self.centroid {
            return Ok(centroid);
        }
        let centroid = self.compute_centroid()?;
        self.centroid = Some(centroid);
        Ok(centroid)
    }

    pub fn cached_centroid(&self) -> Option<DVec2> {
        self.centroid
    }

    pub fn central_moments(&self) -> Option<&CentralMoments> {
        self.central_moments.as_ref()
    }

    pub fn has_central_moments(&self) -> bool {
        self.central_moments.is_some()
    }

    pub(crate) fn set_derived(&mut self, centroid: DVec2, moments: CentralMoments) {
        self.centroid = Some(centroid);
        self.central_moments = Some(moments);
    }

    /// Checks the invariants a registered blob must hold.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.label == BACKGROUND {
            return Err(Error::BackgroundLabel);
        }
        if self.area == 0 {
            return Err(Error::DegenerateRegion { label: self.label });
        }
        if self.bbox.is_empty() {
            return Err(Error::InvalidBoundingBox { label: self.label });
        }
        Ok(())
    }
}
