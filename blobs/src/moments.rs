//! Central moments and principal orientation of blobs.

use crate::blob::{Blob, CentralMoments};
use crate::error::{Error, Result};
use crate::image::Image;

/// Computes and caches the second-order central moments of `blob`.
///
/// Only pixels inside the blob's bounding box are visited, and of those only
/// pixels carrying the blob's label contribute. The result is cached on the
/// blob; later calls return the cached value without reading `labels`.
///
/// Fails with a format error unless `labels` is an `L_U32` image, and with
/// [`Error::BoundingBoxOutOfBounds`] if the box reaches outside it. On
/// failure the blob is left untouched.
pub fn compute_central_moments<'a>(
    blob: &'a mut Blob,
    labels: &Image,
) -> Result<&'a CentralMoments> {
    if blob.has_central_moments() {
        return blob
            .central_moments()
            .ok_or(Error::CentralMomentsUnavailable {
                label: blob.label(),
            });
    }

    let pixels = labels.labels()?;
    let (width, height) = (labels.width(), labels.height());
    let bbox = blob.bounding_box();
    if !bbox.fits(width, height) {
        return Err(Error::BoundingBoxOutOfBounds {
            label: blob.label(),
            width,
            height,
        });
    }
    let centroid = blob.compute_centroid()?;

    let label = blob.label();
    let stride = width as usize;
    let mut moments = CentralMoments::default();
    for y in bbox.min_y..bbox.max_y {
        let row = &pixels[y as usize * stride..(y as usize + 1) * stride];
        let dy = y as f64 - centroid.y;
        for x in bbox.min_x..bbox.max_x {
            if row[x as usize] != label {
                continue;
            }
            let dx = x as f64 - centroid.x;
            moments.u11 += dx * dy;
            moments.u20 += dx * dx;
            moments.u02 += dy * dy;
        }
    }

    tracing::debug!(
        label,
        u11 = moments.u11,
        u20 = moments.u20,
        u02 = moments.u02,
        "Computed central moments"
    );

    blob.set_derived(centroid, moments);
    blob.central_moments()
        .ok_or(Error::CentralMomentsUnavailable { label })
}

/// Angle of the blob's principal axis in radians, in `(-PI/2, PI/2]`.
///
/// Measured from the +x axis towards +y (image rows grow downward).
/// Requires central moments; call [`compute_central_moments`] first.
pub fn angle(blob: &Blob) -> Result<f64> {
    let m = blob
        .central_moments()
        .ok_or(Error::CentralMomentsUnavailable {
            label: blob.label(),
        })?;
    Ok(0.5 * (2.0 * m.u11).atan2(m.u20 - m.u02))
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_4;

    use super::*;
    use crate::blob::{BoundingBox, RawMoments};
    use crate::image::{ColorFormat, ImageDesc};
    use crate::registry::Blobs;

    /// Label image with the given pixels set to `label`.
    fn label_image(width: u32, height: u32, label: u32, pixels: &[(u32, u32)]) -> Image {
        let mut data = vec![0; (width * height) as usize];
        for &(x, y) in pixels {
            data[(y * width + x) as usize] = label;
        }
        Image::from_labels(width, height, data).unwrap()
    }

    fn single_blob(labels: &Image) -> Blob {
        let blobs = Blobs::from_label_image(labels).unwrap();
        assert_eq!(blobs.len(), 1);
        blobs.iter().next().unwrap().clone()
    }

    #[test]
    fn test_square_moments() {
        let pixels: Vec<_> = (4..7).flat_map(|y| (4..7).map(move |x| (x, y))).collect();
        let labels = label_image(10, 10, 1, &pixels);
        let mut blob = single_blob(&labels);

        let moments = *compute_central_moments(&mut blob, &labels).unwrap();
        // Each axis: 3 rows of (1 + 0 + 1)
        assert!((moments.u20 - 6.0).abs() < 1e-12);
        assert!((moments.u02 - 6.0).abs() < 1e-12);
        assert!(moments.u11.abs() < 1e-12);
        assert_eq!(blob.cached_centroid().unwrap().to_array(), [5.0, 5.0]);
    }

    #[test]
    fn test_diagonal_line_orientation() {
        let pixels: Vec<_> = (2..8).map(|i| (i, i)).collect();
        let labels = label_image(10, 10, 3, &pixels);
        let mut blob = single_blob(&labels);

        compute_central_moments(&mut blob, &labels).unwrap();
        let theta = angle(&blob).unwrap();
        assert!((theta - FRAC_PI_4).abs() < 1e-9, "angle = {theta}");
    }

    #[test]
    fn test_horizontal_and_vertical_bars() {
        let horizontal: Vec<_> = (1..9).flat_map(|x| [(x, 4), (x, 5)]).collect();
        let labels = label_image(10, 10, 1, &horizontal);
        let mut blob = single_blob(&labels);
        compute_central_moments(&mut blob, &labels).unwrap();
        assert!(angle(&blob).unwrap().abs() < 1e-9);

        let vertical: Vec<_> = (1..9).flat_map(|y| [(4, y), (5, y)]).collect();
        let labels = label_image(10, 10, 1, &vertical);
        let mut blob = single_blob(&labels);
        compute_central_moments(&mut blob, &labels).unwrap();
        let theta = angle(&blob).unwrap();
        assert!((theta.abs() - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_ignores_other_labels_inside_bbox() {
        // Blob 1 is an L shape whose box also contains a pixel of blob 2.
        let mut data = vec![0u32; 25];
        for (x, y) in [(1, 1), (1, 2), (1, 3), (2, 3), (3, 3)] {
            data[y * 5 + x] = 1;
        }
        data[2 * 5 + 3] = 2;
        let labels = Image::from_labels(5, 5, data).unwrap();

        let blobs = Blobs::from_label_image(&labels).unwrap();
        let mut blob = blobs.get(1).unwrap().clone();
        assert_eq!(blob.bounding_box(), BoundingBox::new(1, 1, 4, 4));

        let m = *compute_central_moments(&mut blob, &labels).unwrap();
        let c = blob.cached_centroid().unwrap();
        let coords = [(1.0, 1.0), (1.0, 2.0), (1.0, 3.0), (2.0, 3.0), (3.0, 3.0)];
        let u20: f64 = coords.iter().map(|(x, _)| (x - c.x).powi(2)).sum();
        let u11: f64 = coords.iter().map(|(x, y)| (x - c.x) * (y - c.y)).sum();
        assert!((m.u20 - u20).abs() < 1e-12);
        assert!((m.u11 - u11).abs() < 1e-12);
    }

    #[test]
    fn test_second_call_uses_cache() {
        let labels = label_image(6, 6, 1, &[(1, 1), (2, 1), (2, 2)]);
        let mut blob = single_blob(&labels);
        let first = *compute_central_moments(&mut blob, &labels).unwrap();

        // Erasing the blob from the image would change a rescan result.
        let blank = Image::from_labels(6, 6, vec![0; 36]).unwrap();
        let second = *compute_central_moments(&mut blob, &blank).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_wrong_format_leaves_blob_untouched() {
        let mut blob = Blob::from_pixel(1, 1, 1);
        let before = blob.clone();
        let image = Image::new_empty(ImageDesc::new(4, 4, ColorFormat::L_U8));

        let err = compute_central_moments(&mut blob, &image).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
        assert_eq!(blob, before);
        assert!(blob.cached_centroid().is_none());
    }

    #[test]
    fn test_bbox_outside_image() {
        let mut blob = Blob::from_pixel(1, 5, 5);
        let labels = Image::from_labels(4, 4, vec![0; 16]).unwrap();
        assert_eq!(
            compute_central_moments(&mut blob, &labels).unwrap_err(),
            Error::BoundingBoxOutOfBounds {
                label: 1,
                width: 4,
                height: 4
            }
        );
        assert!(!blob.has_central_moments());
    }

    #[test]
    fn test_zero_area_is_degenerate() {
        let mut blob = Blob::new(9, 0, BoundingBox::new(0, 0, 2, 2), RawMoments::default());
        let labels = Image::from_labels(4, 4, vec![0; 16]).unwrap();
        assert_eq!(
            compute_central_moments(&mut blob, &labels).unwrap_err(),
            Error::DegenerateRegion { label: 9 }
        );
    }

    #[test]
    fn test_angle_requires_moments() {
        let blob = Blob::from_pixel(4, 0, 0);
        let result = angle(&blob);
        assert_eq!(result, Err(Error::CentralMomentsUnavailable { label: 4 }));
        assert_eq!(result.unwrap_or_default(), 0.0);
    }
}
