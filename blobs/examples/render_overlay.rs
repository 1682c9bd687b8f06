//! Renders a synthetic scene of labeled ellipses with every overlay enabled
//! and writes the result to `test_output/render_overlay.png`.

use anyhow::Context;
use blobs::{angle, compute_central_moments, render, Blobs, Image, RenderOptions};
use common::log_setup::{setup_logging, LogConfig};
use common::test_utils::test_output_path;
use image::{Rgb, RgbImage};

const WIDTH: u32 = 320;
const HEIGHT: u32 = 240;

/// (center x, center y, semi-axis a, semi-axis b, rotation in radians)
const ELLIPSES: &[(f64, f64, f64, f64, f64)] = &[
    (60.0, 60.0, 40.0, 12.0, 0.3),
    (200.0, 70.0, 25.0, 25.0, 0.0),
    (120.0, 170.0, 55.0, 18.0, -0.8),
    (260.0, 180.0, 30.0, 10.0, 1.4),
    (290.0, 30.0, 3.0, 2.0, 0.0),
];

fn label_scene() -> anyhow::Result<Image> {
    let mut data = vec![0u32; (WIDTH * HEIGHT) as usize];
    for (index, &(cx, cy, a, b, rotation)) in ELLIPSES.iter().enumerate() {
        let (sin, cos) = f64::sin_cos(rotation);
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let dx = x as f64 - cx;
                let dy = y as f64 - cy;
                let u = dx * cos + dy * sin;
                let v = -dx * sin + dy * cos;
                if (u / a).powi(2) + (v / b).powi(2) <= 1.0 {
                    data[(y * WIDTH + x) as usize] = index as u32 + 1;
                }
            }
        }
    }
    Image::from_labels(WIDTH, HEIGHT, data).context("building label image")
}

fn gradient_source() -> Image {
    let rgb = RgbImage::from_fn(WIDTH, HEIGHT, |x, y| {
        Rgb([(x * 255 / WIDTH) as u8, (y * 255 / HEIGHT) as u8, 96])
    });
    Image::from_rgb_image(&rgb)
}

fn main() -> anyhow::Result<()> {
    setup_logging(&LogConfig::default().with_base_level("info,blobs=debug"));

    let labels = label_scene()?;
    let mut blobs = Blobs::from_label_image(&labels)?;
    blobs.filter_by_area(50, 10_000);
    tracing::info!(count = blobs.len(), largest = blobs.largest(), "Blobs after filtering");

    for blob in blobs.iter_mut() {
        compute_central_moments(blob, &labels)?;
        tracing::info!(
            label = blob.label(),
            angle_deg = angle(blob)?.to_degrees(),
            "Orientation"
        );
    }

    let source = gradient_source();
    let mut dest = source.clone();
    let options = RenderOptions::default().with_alpha(0.6).with_log(true);
    render(&labels, &mut blobs, &source, &mut dest, &options)?;

    let path = test_output_path("render_overlay.png");
    dest.to_rgb_image()?
        .save(&path)
        .with_context(|| format!("saving {}", path.display()))?;
    tracing::info!(path = %path.display(), "Wrote overlay");

    Ok(())
}
