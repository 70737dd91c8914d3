use crate::image::{Image, ImageView};

pub const TRACK: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Binary track/background field with one cell per source pixel.
///
/// Cells are stored as `0`/`255` bytes so the field can be fed straight into
/// the binary morphology and sampling routines.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyField {
    cells: Image<u8>,
}

impl OccupancyField {
    pub fn from_bools(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        Self {
            cells: Image::from_fn(width, height, |x, y| if f(x, y) { TRACK } else { BACKGROUND }),
        }
    }

    /// Wraps a binary image; any non-zero value counts as track.
    pub fn from_mask(mask: &Image<u8>) -> Self {
        Self {
            cells: Image::from_fn(mask.width(), mask.height(), |x, y| {
                if mask.get(x, y).is_some_and(|&v| v != 0) {
                    TRACK
                } else {
                    BACKGROUND
                }
            }),
        }
    }

    pub fn width(&self) -> usize {
        self.cells.width()
    }

    pub fn height(&self) -> usize {
        self.cells.height()
    }

    pub fn is_track(&self, x: usize, y: usize) -> bool {
        self.cells.get(x, y).is_some_and(|&v| v != 0)
    }

    pub fn count(&self) -> usize {
        self.cells.data().iter().filter(|&&v| v != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.data().iter().all(|&v| v == 0)
    }

    pub fn as_view(&self) -> ImageView<'_, u8> {
        self.cells.as_view()
    }

    /// Fraction of cells whose state differs. `None` if the sizes differ.
    pub fn disagreement(&self, other: &Self) -> Option<f32> {
        if self.width() != other.width() || self.height() != other.height() {
            return None;
        }

        let total = self.cells.data().len();
        if total == 0 {
            return Some(0.0);
        }

        let differing = self
            .cells
            .data()
            .iter()
            .zip(other.cells.data())
            .filter(|(a, b)| (**a != 0) != (**b != 0))
            .count();
        Some(differing as f32 / total as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::OccupancyField;
    use crate::Image;

    #[test]
    fn bools_and_mask_agree() {
        let a = OccupancyField::from_bools(4, 3, |x, y| x == y);
        let mask = Image::from_fn(4, 3, |x, y| if x == y { 1u8 } else { 0 });
        let b = OccupancyField::from_mask(&mask);

        assert_eq!(a, b);
        assert_eq!(a.count(), 3);
        assert!(a.is_track(2, 2));
        assert!(!a.is_track(3, 2));
        assert!(!a.is_track(9, 9));
        assert_eq!(a.disagreement(&b), Some(0.0));
    }

    #[test]
    fn disagreement_counts_flipped_cells() {
        let a = OccupancyField::from_bools(5, 2, |_, _| false);
        let b = OccupancyField::from_bools(5, 2, |x, _| x == 0);

        assert!(a.is_empty());
        assert_eq!(a.disagreement(&b), Some(0.2));
        assert_eq!(a.disagreement(&OccupancyField::from_bools(2, 2, |_, _| false)), None);
    }
}
