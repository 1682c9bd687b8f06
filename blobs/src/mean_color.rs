use image::Rgb;

use crate::blob::Blob;
use crate::error::{Error, ImageRole, Result};
use crate::image::{ColorFormat, Image};

/// Average color of `source` over the pixels of `blob`.
///
/// `labels` must be an `L_U32` image and `source` an `RGB_U8` image of the
/// same size.
pub fn mean_color(blob: &Blob, labels: &Image, source: &Image) -> Result<Rgb<u8>> {
    let label_pixels = labels.labels()?;
    source
        .desc()
        .expect_format(ImageRole::Source, ColorFormat::RGB_U8)?;
    labels.desc().expect_same_size(source.desc())?;

    let (width, height) = (labels.width(), labels.height());
    let bbox = blob.bounding_box();
    if !bbox.fits(width, height) {
        return Err(Error::BoundingBoxOutOfBounds {
            label: blob.label(),
            width,
            height,
        });
    }

    let stride = width as usize;
    let rgb = source.bytes();
    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for y in bbox.min_y as usize..bbox.max_y as usize {
        for x in bbox.min_x as usize..bbox.max_x as usize {
            let idx = y * stride + x;
            if label_pixels[idx] != blob.label() {
                continue;
            }
            let px = &rgb[idx * 3..idx * 3 + 3];
            for (acc, &channel) in sum.iter_mut().zip(px) {
                *acc += channel as u64;
            }
            count += 1;
        }
    }

    if count == 0 {
        return Err(Error::DegenerateRegion { label: blob.label() });
    }

    Ok(Rgb(sum.map(|acc| (acc as f64 / count as f64).round() as u8)))
}
