//! Overlay rendering of blob statistics onto a color image.

mod options;


pub use options::RenderOptions;

use std::collections::HashMap;

use image::{ImageBuffer, Rgb};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::blob::{Blob, Label, BACKGROUND};
use crate::error::{Error, ImageRole, Result};
use crate::image::{ColorFormat, Image};
use crate::moments::{angle, compute_central_moments};
use crate::registry::Blobs;

/// Renders the blobs of `labels` into `dest`.
///
/// `labels` must be an `L_U32` image, `source` and `dest` `RGB_U8` images,
/// all of the same size. Every check runs before the first write, so on
/// error `dest` is unchanged. Only `dest` and the blobs' cached statistics
/// are modified.
///
/// The color fill touches only pixels whose label is registered in `blobs`;
/// background pixels and pixels of unregistered labels keep whatever `dest`
/// already holds.
pub fn render(
    labels: &Image,
    blobs: &mut Blobs,
    source: &Image,
    dest: &mut Image,
    options: &RenderOptions,
) -> Result<()> {
    options.validate()?;

    let label_pixels = labels.labels()?;
    source
        .desc()
        .expect_format(ImageRole::Source, ColorFormat::RGB_U8)?;
    dest.desc()
        .expect_format(ImageRole::Destination, ColorFormat::RGB_U8)?;
    labels.desc().expect_same_size(source.desc())?;
    labels.desc().expect_same_size(dest.desc())?;

    if options.angle {
        let (width, height) = (labels.width(), labels.height());
        let outside = blobs
            .iter()
            .find(|b| !b.bounding_box().fits(width, height));
        if let Some(blob) = outside {
            return Err(Error::BoundingBoxOutOfBounds {
                label: blob.label(),
                width,
                height,
            });
        }
    }

    tracing::debug!(
        blobs = blobs.len(),
        image = %dest.desc(),
        color = options.color,
        bounding_box = options.bounding_box,
        centroid = options.centroid,
        angle = options.angle,
        "Rendering blobs"
    );

    if options.color {
        fill_colors(label_pixels, blobs, source, dest, options);
    }

    if options.needs_blob_pass() {
        let mut canvas = dest.rgb_view_mut()?;
        for blob in blobs.iter_mut() {
            draw_blob(&mut canvas, blob, labels, options)?;
        }
    }

    Ok(())
}

/// Palette color per registered label, assigned in registry order.
fn palette_colors(blobs: &Blobs, options: &RenderOptions) -> HashMap<Label, [f64; 3]> {
    blobs
        .labels()
        .enumerate()
        .map(|(index, label)| {
            let Rgb(rgb) = options.palette.color_for(index);
            (label, rgb.map(f64::from))
        })
        .collect()
}

fn fill_colors(
    label_pixels: &[Label],
    blobs: &Blobs,
    source: &Image,
    dest: &mut Image,
    options: &RenderOptions,
) {
    let palette = palette_colors(blobs, options);
    let alpha = options.alpha;

    let src = source.bytes().chunks_exact(3);
    let dst = dest.bytes_mut().chunks_exact_mut(3);
    for ((&label, src_px), dst_px) in label_pixels.iter().zip(src).zip(dst) {
        if label == BACKGROUND {
            continue;
        }
        let Some(color) = palette.get(&label) else {
            continue;
        };
        for ((d, &s), &c) in dst_px.iter_mut().zip(src_px).zip(color) {
            *d = ((1.0 - alpha) * s as f64 + alpha * c).round().clamp(0.0, 255.0) as u8;
        }
    }
}

type Canvas<'a> = ImageBuffer<Rgb<u8>, &'a mut [u8]>;

fn draw_blob(
    canvas: &mut Canvas<'_>,
    blob: &mut Blob,
    labels: &Image,
    options: &RenderOptions,
) -> Result<()> {
    if options.bounding_box {
        let bbox = blob.bounding_box();
        let rect = Rect::at(bbox.min_x as i32, bbox.min_y as i32)
            .of_size(bbox.width(), bbox.height());
        draw_hollow_rect_mut(canvas, rect, Rgb(options.bounding_box_color));
    }

    if options.angle {
        compute_central_moments(blob, labels)?;
        let theta = angle(blob)?;
        let centroid = blob.centroid()?;
        let half = options.angle_scale * blob.area() as f64;
        let (dx, dy) = (half * theta.cos(), half * theta.sin());
        draw_line_segment_mut(
            canvas,
            ((centroid.x - dx) as f32, (centroid.y - dy) as f32),
            ((centroid.x + dx) as f32, (centroid.y + dy) as f32),
            Rgb(options.angle_color),
        );
    }

    if options.centroid {
        let centroid = blob.centroid()?;
        let (cx, cy) = (centroid.x.round() as f32, centroid.y.round() as f32);
        let arm = options.centroid_arm;
        let color = Rgb(options.centroid_color);
        draw_line_segment_mut(canvas, (cx - arm, cy), (cx + arm, cy), color);
        draw_line_segment_mut(canvas, (cx, cy - arm), (cx, cy + arm), color);
    }

    if options.log {
        let bbox = blob.bounding_box();
        let centroid = blob.centroid()?;
        let orientation = blob.central_moments().map(|_| angle(blob)).transpose()?;
        tracing::info!(
            label = blob.label(),
            area = blob.area(),
            min_x = bbox.min_x,
            min_y = bbox.min_y,
            max_x = bbox.max_x,
            max_y = bbox.max_y,
            centroid_x = centroid.x,
            centroid_y = centroid.y,
            angle = ?orientation,
            "Blob"
        );
    }

    Ok(())
}
