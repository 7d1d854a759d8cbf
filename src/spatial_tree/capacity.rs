use super::SpatialPartitionTree;
use crate::raw::RawSpatialTree;

impl<C, V> SpatialPartitionTree<C, V> {
    /// Creates an empty tree with room for at least `capacity` points before
    /// the node arena reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::SpatialPartitionTree;
    ///
    /// let tree: SpatialPartitionTree<i32, ()> = SpatialPartitionTree::with_capacity(16);
    /// assert!(tree.capacity() >= 16);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        SpatialPartitionTree {
            raw: RawSpatialTree::with_capacity(capacity),
        }
    }

    /// Returns the number of points the tree can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
