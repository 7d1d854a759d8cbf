//! Insertion orders that keep non-rebalancing trees shallow.
//!
//! Neither tree in this crate rebalances, so its height is decided entirely by
//! the order keys arrive in. Inserting the median of a sorted range before the
//! medians of its two halves, recursively, builds a scalar search tree of
//! height `floor(log2(n)) + 1`. [`make_ordering`] applies that idea to each
//! axis of a point set and interleaves the three results, which in practice
//! keeps a [`SpatialPartitionTree`](crate::SpatialPartitionTree) close to
//! logarithmic height. It is a heuristic, not a guarantee.

use alloc::vec::Vec;

use smallvec::SmallVec;
use tracing::debug;

use crate::point::{Axis, Point};

/// Returns `sorted` rearranged so that the median of every sub-range comes
/// before the elements of its two halves.
///
/// Over a range `[lo, hi)` the element at `(lo + hi) / 2` is emitted first,
/// then the order of `[lo, mid)`, then the order of `[mid + 1, hi)`.
///
/// # Examples
///
/// ```
/// use rank_tree::balancing::median_first;
///
/// assert_eq!(median_first(&[1, 2, 3, 4, 5, 6, 7]), [4, 2, 1, 3, 6, 5, 7]);
/// assert_eq!(median_first(&[1, 2]), [2, 1]);
/// ```
#[must_use]
pub fn median_first<T: Clone>(sorted: &[T]) -> Vec<T> {
    median_first_indices(sorted.len()).into_iter().map(|index| sorted[index].clone()).collect()
}

fn median_first_indices(len: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(len);
    // Pending half-open ranges; the left half is pushed last so it is emitted first.
    let mut ranges: SmallVec<[(usize, usize); 64]> = SmallVec::new();
    ranges.push((0, len));

    while let Some((lo, hi)) = ranges.pop() {
        if lo >= hi {
            continue;
        }
        let mid = lo + (hi - lo) / 2;
        order.push(mid);
        ranges.push((mid + 1, hi));
        ranges.push((lo, mid));
    }

    order
}

/// Produces an insertion order for `points` that keeps a spatial partition
/// tree shallow.
///
/// The points are sorted by x and arranged [`median_first`], then re-sorted by
/// y and by z in turn (each sort is stable, so ties keep the previous axis's
/// order) and arranged the same way. The three orders are interleaved
/// position by position: `x[0], y[0], z[0], x[1], y[1], z[1], ...`.
///
/// The result holds `3 * points.len()` entries and names every point three
/// times, once per axis. Feed it to a tree that rejects duplicates by skipping
/// repeats, as [`SpatialPartitionTree::build_balanced`] does. An empty input
/// gives an empty ordering.
///
/// # Examples
///
/// ```
/// use rank_tree::{make_ordering, Point};
///
/// let points = [Point::new(0, 0, 0), Point::new(1, 1, 1), Point::new(2, 2, 2)];
/// let ordering = make_ordering(&points);
///
/// assert_eq!(ordering.len(), 9);
/// // Every axis pass starts from its median.
/// assert_eq!(&ordering[..3], &[Point::new(1, 1, 1); 3]);
/// ```
///
/// [`SpatialPartitionTree::build_balanced`]: crate::SpatialPartitionTree::build_balanced
#[must_use]
pub fn make_ordering<C: Ord + Clone>(points: &[Point<C>]) -> Vec<Point<C>> {
    let medians = median_first_indices(points.len());
    let mut sorted = points.to_vec();

    let [xs, ys, zs] = Axis::ALL.map(|axis| {
        sorted.sort_by(|a, b| a.coord(axis).cmp(b.coord(axis)));
        medians.iter().map(|&index| sorted[index].clone()).collect::<Vec<_>>()
    });

    let mut ordering = Vec::with_capacity(points.len() * 3);
    for ((x, y), z) in xs.into_iter().zip(ys).zip(zs) {
        ordering.extend([x, y, z]);
    }

    debug!(points = points.len(), entries = ordering.len(), "computed balanced ordering");
    ordering
}
