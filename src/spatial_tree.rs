use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

use tracing::{debug, trace};

use crate::balancing::make_ordering;
use crate::error::{Result, TreeError};
use crate::point::Point;
use crate::raw::{RawPreorder, RawSpatialTree};

mod capacity;

/// A point index that splits space into octants at every node.
///
/// Each node compares a point against its own coordinates, axis by axis, and
/// sends it to one of eight children (see [`Octant`](crate::Octant)). Ties on
/// an axis go to the "greater or equal" side. Like [`AugmentedSearchTree`], every
/// node counts the nodes below it, and nothing ever rebalances: the shape is
/// fixed by insertion order. [`build_balanced`] picks a good order for a batch.
///
/// Points are unique. A point equal to any node on its insertion path is
/// rejected with [`TreeError::DuplicateKey`]; because routing is a pure
/// function of the coordinates, that path is the only place an equal point
/// could be stored.
///
/// There is no deletion and no range query.
///
/// # Examples
///
/// ```
/// use rank_tree::{Point, SpatialPartitionTree, TreeError};
///
/// let mut tree = SpatialPartitionTree::new();
/// tree.insert(Point::new(3, 3, 3), "A").unwrap();
/// tree.insert(Point::new(1, 5, 2), "B").unwrap();
/// tree.insert(Point::new(4, 3, 1), "C").unwrap();
/// tree.insert(Point::new(5, 4, 0), "D").unwrap();
///
/// assert_eq!(tree.lookup(&Point::new(5, 4, 0)), Ok(&"D"));
/// assert_eq!(tree.lookup(&Point::new(5, 4, 1)), Err(TreeError::KeyNotFound));
///
/// // (4, 3, 1) and (5, 4, 0) share the root's upper-x, upper-y, lower-z octant.
/// assert_eq!(tree.subtree_size_toward(&Point::new(4, 3, 1)), Some(2));
/// ```
///
/// [`AugmentedSearchTree`]: crate::AugmentedSearchTree
/// [`build_balanced`]: SpatialPartitionTree::build_balanced
pub struct SpatialPartitionTree<C, V> {
    raw: RawSpatialTree<C, V>,
}

impl<C, V> SpatialPartitionTree<C, V> {
    /// Makes a new, empty tree.
    #[must_use]
    pub const fn new() -> Self {
        SpatialPartitionTree { raw: RawSpatialTree::new() }
    }

    /// Returns the number of points in the tree.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree holds no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the tree, removing all points.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of nodes on the longest root-to-leaf path, or `0`
    /// for an empty tree.
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Gets an iterator over the points and values in pre-order: each node
    /// before its children, children in octant order.
    pub fn iter(&self) -> Iter<'_, C, V> {
        Iter { inner: self.raw.preorder() }
    }
}

impl<C: Ord, V> SpatialPartitionTree<C, V> {
    /// Inserts a point and its value.
    ///
    /// An empty tree takes the point as its root. Otherwise the point descends
    /// by octant until it reaches an empty child slot, and every node passed
    /// grows its subtree size by one.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateKey`] if the exact point is already stored.
    /// The tree is left unchanged.
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn insert(&mut self, point: Point<C>, value: V) -> Result<()> {
        self.raw.insert(point, value)?;
        trace!(len = self.raw.len(), "inserted point");
        Ok(())
    }

    /// Returns a reference to the value stored at `point`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if the point is not stored.
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn lookup(&self, point: &Point<C>) -> Result<&V> {
        self.raw.get(point).ok_or(TreeError::KeyNotFound)
    }

    /// Returns a mutable reference to the value stored at `point`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if the point is not stored.
    pub fn lookup_mut(&mut self, point: &Point<C>) -> Result<&mut V> {
        self.raw.get_mut(point).ok_or(TreeError::KeyNotFound)
    }

    /// Returns a reference to the value stored at `point`, or `None`.
    #[must_use]
    pub fn get(&self, point: &Point<C>) -> Option<&V> {
        self.raw.get(point)
    }

    /// Returns `true` if the exact point is stored. Never fails.
    #[must_use]
    pub fn contains(&self, point: &Point<C>) -> bool {
        self.lookup(point).is_ok()
    }

    /// Returns the size of the subtree in the root's child slot that the
    /// octant test for `point` selects; `Some(0)` when that slot is empty and
    /// `None` when the tree is.
    #[must_use]
    pub fn subtree_size_toward(&self, point: &Point<C>) -> Option<usize> {
        self.raw.subtree_size_toward(point)
    }
}

impl<C: Ord + Clone, V> SpatialPartitionTree<C, V> {
    /// Builds a tree from a batch of points, inserting them in the order
    /// [`make_ordering`] produces so the tree stays shallow.
    ///
    /// The ordering names every point once per axis; each point is inserted on
    /// its first appearance and its later appearances are skipped. If the batch
    /// names a point more than once, the last value given for it wins.
    ///
    /// # Errors
    ///
    /// None in practice: the batch is deduplicated before insertion, so
    /// [`TreeError::DuplicateKey`] cannot arise.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Point, SpatialPartitionTree};
    ///
    /// let items = (0..64).map(|i| (Point::new(i, i, i), i));
    /// let tree = SpatialPartitionTree::build_balanced(items).unwrap();
    ///
    /// assert_eq!(tree.len(), 64);
    /// assert_eq!(tree.lookup(&Point::new(17, 17, 17)), Ok(&17));
    /// assert!(tree.height() <= 7);
    /// ```
    pub fn build_balanced<I>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Point<C>, V)>,
    {
        let mut pending: BTreeMap<Point<C>, V> = items.into_iter().collect();
        let points: Vec<Point<C>> = pending.keys().cloned().collect();
        let mut tree = Self::with_capacity(points.len());

        for point in make_ordering(&points) {
            if let Some(value) = pending.remove(&point) {
                tree.raw.insert(point, value)?;
            }
        }

        debug!(len = tree.len(), height = tree.height(), "built balanced spatial tree");
        Ok(tree)
    }
}

impl<C: Clone, V: Clone> Clone for SpatialPartitionTree<C, V> {
    fn clone(&self) -> Self {
        SpatialPartitionTree { raw: self.raw.clone() }
    }
}

impl<C: fmt::Debug, V: fmt::Debug> fmt::Debug for SpatialPartitionTree<C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<C, V> Default for SpatialPartitionTree<C, V> {
    /// Creates an empty `SpatialPartitionTree`.
    fn default() -> SpatialPartitionTree<C, V> {
        SpatialPartitionTree::new()
    }
}

impl<'a, C, V> IntoIterator for &'a SpatialPartitionTree<C, V> {
    type Item = (&'a Point<C>, &'a V);
    type IntoIter = Iter<'a, C, V>;

    fn into_iter(self) -> Iter<'a, C, V> {
        self.iter()
    }
}

/// A pre-order iterator over the points of a `SpatialPartitionTree`.
///
/// This `struct` is created by the [`iter`] method on [`SpatialPartitionTree`].
///
/// [`iter`]: SpatialPartitionTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, C, V> {
    inner: RawPreorder<'a, C, V>,
}

impl<'a, C, V> Iterator for Iter<'a, C, V> {
    type Item = (&'a Point<C>, &'a V);

    fn next(&mut self) -> Option<(&'a Point<C>, &'a V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<C, V> ExactSizeIterator for Iter<'_, C, V> {}

impl<C, V> FusedIterator for Iter<'_, C, V> {}

impl<C, V> Clone for Iter<'_, C, V> {
    fn clone(&self) -> Self {
        Iter { inner: self.inner.clone() }
    }
}

impl<C: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
