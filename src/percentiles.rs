//! Percentile bands over a growing and shrinking set of points.

use alloc::vec::Vec;
use core::iter;

use crate::error::{Result, TreeError};
use crate::search_tree::AugmentedSearchTree;

/// A multiset of ordered points that reports the points lying between two
/// percentiles.
///
/// Each distinct point is a key of an [`AugmentedSearchTree`] whose value
/// counts its copies, so adding and removing a copy cost O(depth). A band is
/// read off with one in-order walk.
///
/// # Examples
///
/// ```
/// use rank_tree::Percentiles;
///
/// let mut percentiles = Percentiles::new();
/// for point in [31, 7, 12, 48, 3, 25, 19, 40, 9, 14] {
///     percentiles.add_point(point);
/// }
///
/// // Drop the lowest 20% and the highest 30%.
/// let band: Vec<_> = percentiles.ratio(20, 30).unwrap().into_iter().copied().collect();
/// assert_eq!(band, [9, 12, 14, 19, 25]);
/// ```
pub struct Percentiles<T> {
    copies: AugmentedSearchTree<T, usize>,
    len: usize,
}

impl<T> Percentiles<T> {
    /// Creates an empty set of points.
    #[must_use]
    pub const fn new() -> Self {
        Percentiles {
            copies: AugmentedSearchTree::new(),
            len: 0,
        }
    }

    /// Returns the number of points held, counting every copy.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T: Ord> Percentiles<T> {
    /// Adds one copy of a point.
    pub fn add_point(&mut self, point: T) {
        match self.copies.lookup_mut(&point) {
            Ok(count) => *count += 1,
            Err(_) => {
                let inserted = self.copies.insert(point, 1);
                debug_assert!(inserted.is_ok(), "absent point collided on insert");
            }
        }
        self.len += 1;
    }

    /// Removes one copy of a point, returning whether any was held.
    pub fn remove_point(&mut self, point: &T) -> bool {
        let Ok(count) = self.copies.lookup_mut(point) else {
            return false;
        };
        if *count > 1 {
            *count -= 1;
        } else if self.copies.delete(point).is_err() {
            return false;
        }
        self.len -= 1;
        true
    }

    /// Returns, in ascending order, the points above the lowest `x` percent
    /// and below the highest `y` percent. Repeated points appear once per copy.
    ///
    /// With `n` points, the lowest `ceil(n * x / 100)` and the highest
    /// `ceil(n * y / 100)` are excluded. When the two exclusions overlap the
    /// band is empty.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidArgument`] if `x` or `y` exceeds 100.
    pub fn ratio(&self, x: u32, y: u32) -> Result<Vec<&T>> {
        if x > 100 || y > 100 {
            return Err(TreeError::InvalidArgument("percentiles must lie in 0..=100"));
        }

        let below = excluded(self.len, x);
        let above = self.len - excluded(self.len, y);

        Ok(self
            .copies
            .iter()
            .flat_map(|(point, &count)| iter::repeat_n(point, count))
            .skip(below)
            .take(above.saturating_sub(below))
            .collect())
    }
}

impl<T> Default for Percentiles<T> {
    fn default() -> Self {
        Percentiles::new()
    }
}

/// `ceil(n * percent / 100)`.
fn excluded(n: usize, percent: u32) -> usize {
    (n * percent as usize).div_ceil(100)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn filled(points: impl IntoIterator<Item = u32>) -> Percentiles<u32> {
        let mut percentiles = Percentiles::new();
        for point in points {
            percentiles.add_point(point);
        }
        percentiles
    }

    fn band(percentiles: &Percentiles<u32>, x: u32, y: u32) -> Vec<u32> {
        percentiles.ratio(x, y).expect("valid percentiles").into_iter().copied().collect()
    }

    #[test]
    fn fifty_shuffled_points() {
        // Multiplying by 17 modulo 50 visits every residue once.
        let percentiles = filled((0..50).map(|i| (i * 17) % 50));
        assert_eq!(percentiles.len(), 50);
        assert_eq!(band(&percentiles, 15, 66), (8..=16).collect::<Vec<_>>());
    }

    #[test]
    fn repeated_points_are_all_counted() {
        let mut percentiles = filled([20, 10, 20, 30, 20]);
        assert_eq!(percentiles.len(), 5);
        assert_eq!(band(&percentiles, 0, 0), [10, 20, 20, 20, 30]);
        assert_eq!(band(&percentiles, 20, 20), [20, 20, 20]);

        assert!(percentiles.remove_point(&20));
        assert_eq!(percentiles.len(), 4);
        assert_eq!(band(&percentiles, 0, 0), [10, 20, 20, 30]);
        assert_eq!(band(&percentiles, 25, 25), [20, 20]);
    }

    #[test]
    fn sorted_arrival_keeps_band_order() {
        let percentiles = filled(0..2_000);
        assert_eq!(band(&percentiles, 10, 10), (200..1_800).collect::<Vec<_>>());
    }

    #[test]
    fn whole_and_empty_bands() {
        let percentiles = filled(1..=10);
        assert_eq!(band(&percentiles, 0, 0), (1..=10).collect::<Vec<_>>());
        assert!(band(&percentiles, 100, 0).is_empty());
        assert!(band(&percentiles, 60, 60).is_empty());
        assert!(band(&Percentiles::new(), 10, 10).is_empty());
    }

    #[test]
    fn out_of_range_percentiles() {
        let percentiles = filled(1..=10);
        assert!(matches!(percentiles.ratio(101, 0), Err(TreeError::InvalidArgument(_))));
        assert!(matches!(percentiles.ratio(0, 101), Err(TreeError::InvalidArgument(_))));
    }

    #[test]
    fn add_and_remove() {
        let mut percentiles = filled([5, 1, 9]);
        percentiles.add_point(5);
        assert_eq!(percentiles.len(), 4);
        assert!(percentiles.remove_point(&5));
        assert!(percentiles.remove_point(&5));
        assert!(!percentiles.remove_point(&5));
        assert!(!percentiles.remove_point(&2));
        assert_eq!(percentiles.len(), 2);
        assert_eq!(band(&percentiles, 0, 0), [1, 9]);
    }
}
