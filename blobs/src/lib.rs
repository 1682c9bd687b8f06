//! Blobs - per-region statistics and overlays for labeled images.
//!
//! Given a label image (one [`Label`] per pixel, 0 for background) and a
//! registry of the regions found in it, this crate provides:
//! - Centroid and second-order central moments per blob
//! - Principal-axis orientation
//! - Area and label filters over the registry
//! - Color-coded overlay rendering onto an RGB image
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use blobs::{Blobs, Image, RenderOptions, render};
//!
//! let labels = Image::from_labels(width, height, label_data)?;
//! let mut blobs = Blobs::from_label_image(&labels)?;
//! blobs.filter_by_area(20, 10_000);
//!
//! let mut dest = source.clone();
//! render(&labels, &mut blobs, &source, &mut dest, &RenderOptions::default())?;
//! ```

mod blob;
mod error;
mod image;
mod mean_color;
mod moments;
mod palette;
mod registry;
mod render;


// ============================================================================
// Data model
// ============================================================================

pub use blob::{Blob, BoundingBox, CentralMoments, Label, RawMoments, BACKGROUND};
pub use registry::Blobs;

// ============================================================================
// Images
// ============================================================================

pub use crate::image::{ChannelCount, ChannelSize, ChannelType, ColorFormat, Image, ImageDesc};

// ============================================================================
// Errors
// ============================================================================

pub use error::{Error, ImageRole, Result};

// ============================================================================
// Analysis
// ============================================================================

pub use mean_color::mean_color;
pub use moments::{angle, compute_central_moments};

// ============================================================================
// Rendering
// ============================================================================

pub use palette::{hsv_to_rgb, Palette};
pub use render::{render, RenderOptions};
