//! Registry of blobs keyed by label.

use std::collections::btree_map::{self, BTreeMap};

use crate::blob::{Blob, Label, BACKGROUND};
use crate::error::{Error, Result};
use crate::image::Image;

/// Owns every registered [`Blob`], keyed by its label.
///
/// Iteration visits blobs in ascending label order. Removing a blob drops
/// it; there is no other way to release one while it is registered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Blobs {
    blobs: BTreeMap<Label, Blob>,
}

impl Blobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects area, bounding box and raw moments for every non-background
    /// label of an already labeled image.
    pub fn from_label_image(labels: &Image) -> Result<Self> {
        let pixels = labels.labels()?;
        let width = labels.width() as usize;

        let mut blobs = BTreeMap::new();
        if width > 0 {
            for (y, row) in pixels.chunks_exact(width).enumerate() {
                for (x, &label) in row.iter().enumerate() {
                    if label == BACKGROUND {
                        continue;
                    }
                    let (x, y) = (x as u32, y as u32);
                    blobs
                        .entry(label)
                        .and_modify(|blob: &mut Blob| blob.add_pixel(x, y))
                        .or_insert_with(|| Blob::from_pixel(label, x, y));
                }
            }
        }

        tracing::debug!(count = blobs.len(), "Collected blobs from label image");

        Ok(Self { blobs })
    }

    /// Registers `blob`, returning the blob previously stored under its label.
    ///
    /// Rejects the background label, zero-area blobs and empty bounding boxes.
    pub fn insert(&mut self, blob: Blob) -> Result<Option<Blob>> {
        blob.validate()?;
        Ok(self.blobs.insert(blob.label(), blob))
    }

    pub fn remove(&mut self, label: Label) -> Option<Blob> {
        self.blobs.remove(&label)
    }

    pub fn get(&self, label: Label) -> Option<&Blob> {
        self.blobs.get(&label)
    }

    pub fn get_mut(&mut self, label: Label) -> Option<&mut Blob> {
        self.blobs.get_mut(&label)
    }

    pub fn contains(&self, label: Label) -> bool {
        self.blobs.contains_key(&label)
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.blobs.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Values<'_, Label, Blob> {
        self.blobs.values()
    }

    pub fn iter_mut(&mut self) -> btree_map::ValuesMut<'_, Label, Blob> {
        self.blobs.values_mut()
    }

    /// Removes every blob whose area lies outside `min_area..=max_area`.
    pub fn filter_by_area(&mut self, min_area: u32, max_area: u32) {
        let before = self.blobs.len();
        self.blobs
            .retain(|_, blob| (min_area..=max_area).contains(&blob.area()));

        tracing::debug!(
            min_area,
            max_area,
            removed = before - self.blobs.len(),
            kept = self.blobs.len(),
            "Filtered blobs by area"
        );
    }

    /// Removes every blob except the one labeled `label`.
    pub fn filter_by_label(&mut self, label: Label) {
        self.blobs.retain(|&key, _| key == label);
    }

    /// Label of the blob with the largest area, or [`BACKGROUND`] if empty.
    ///
    /// Ties resolve to the lowest label.
    pub fn largest(&self) -> Label {
        let mut label = BACKGROUND;
        let mut max_area = 0;
        for blob in self.blobs.values() {
            if blob.area() > max_area {
                label = blob.label();
                max_area = blob.area();
            }
        }
        label
    }
}

impl<'a> IntoIterator for &'a Blobs {
    type Item = &'a Blob;
    type IntoIter = btree_map::Values<'a, Label, Blob>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TryFrom<Vec<Blob>> for Blobs {
    type Error = Error;

    fn try_from(blobs: Vec<Blob>) -> Result<Self> {
        let mut registry = Blobs::new();
        for blob in blobs {
            registry.insert(blob)?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::{BoundingBox, RawMoments};

    /// Blob of the given area; shape statistics are irrelevant to the registry.
    fn blob(label: Label, area: u32) -> Blob {
        Blob::new(
            label,
            area,
            BoundingBox::new(0, 0, area, 1),
            RawMoments {
                m10: (area * area.saturating_sub(1) / 2) as f64,
                m01: 0.0,
            },
        )
    }

    fn registry(areas: &[(Label, u32)]) -> Blobs {
        Blobs::try_from(
            areas
                .iter()
                .map(|&(label, area)| blob(label, area))
                .collect::<Vec<_>>(),
        )
        .unwrap()
    }

    #[test]
    fn test_insert_rejects_invalid_blobs() {
        let mut blobs = Blobs::new();
        assert_eq!(blobs.insert(blob(0, 3)), Err(Error::BackgroundLabel));
        assert_eq!(
            blobs.insert(Blob::new(2, 0, BoundingBox::new(0, 0, 1, 1), RawMoments::default())),
            Err(Error::DegenerateRegion { label: 2 })
        );
        assert!(blobs.is_empty());
    }

    #[test]
    fn test_insert_replaces_same_label() {
        let mut blobs = Blobs::new();
        assert_eq!(blobs.insert(blob(5, 3)).unwrap(), None);
        let previous = blobs.insert(blob(5, 8)).unwrap();
        assert_eq!(previous.map(|b| b.area()), Some(3));
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs.get(5).map(Blob::area), Some(8));
    }

    #[test]
    fn test_filter_by_area_bounds_are_inclusive() {
        let mut blobs = registry(&[(1, 4), (2, 5), (3, 12), (4, 20), (5, 21)]);
        blobs.filter_by_area(5, 20);

        assert_eq!(blobs.labels().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert!(blobs.iter().all(|b| (5..=20).contains(&b.area())));
        assert!(blobs.get(1).is_none());
        assert!(blobs.get(5).is_none());
    }

    #[test]
    fn test_filter_keeps_survivors_unchanged() {
        let mut blobs = registry(&[(1, 6), (2, 50)]);
        let before = blobs.get(1).cloned();
        blobs.filter_by_area(1, 10);
        assert_eq!(blobs.get(1).cloned(), before);
    }

    #[test]
    fn test_filter_everything_out() {
        let mut blobs = registry(&[(1, 6), (2, 7)]);
        blobs.filter_by_area(10, 5);
        assert!(blobs.is_empty());
        assert_eq!(blobs.iter().count(), 0);
    }

    #[test]
    fn test_filter_by_label() {
        let mut blobs = registry(&[(1, 6), (2, 7), (3, 8)]);
        blobs.filter_by_label(2);
        assert_eq!(blobs.labels().collect::<Vec<_>>(), vec![2]);

        blobs.filter_by_label(9);
        assert!(blobs.is_empty());
    }

    #[test]
    fn test_largest() {
        assert_eq!(Blobs::new().largest(), BACKGROUND);

        let blobs = registry(&[(3, 10), (7, 42), (9, 5)]);
        assert_eq!(blobs.largest(), 7);
    }

    #[test]
    fn test_largest_tie_takes_first() {
        let blobs = registry(&[(8, 30), (2, 30), (5, 10)]);
        assert_eq!(blobs.largest(), 2);
    }

    #[test]
    fn test_from_label_image() {
        #[rustfmt::skip]
        let data = vec![
            0, 1, 1, 0,
            0, 1, 0, 2,
            3, 0, 0, 2,
        ];
        let labels = Image::from_labels(4, 3, data).unwrap();
        let blobs = Blobs::from_label_image(&labels).unwrap();

        assert_eq!(blobs.labels().collect::<Vec<_>>(), vec![1, 2, 3]);

        let one = blobs.get(1).unwrap();
        assert_eq!(one.area(), 3);
        assert_eq!(one.bounding_box(), BoundingBox::new(1, 0, 3, 2));
        assert_eq!(one.raw_moments(), RawMoments { m10: 4.0, m01: 1.0 });

        let two = blobs.get(2).unwrap();
        assert_eq!(two.area(), 2);
        assert_eq!(two.bounding_box(), BoundingBox::new(3, 1, 4, 3));
    }
}
