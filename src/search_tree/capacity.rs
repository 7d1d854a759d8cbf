use super::AugmentedSearchTree;
use crate::raw::RawSearchTree;

impl<K, V> AugmentedSearchTree<K, V> {
    /// Creates an empty tree with room for at least `capacity` entries before
    /// the node arena reallocates.
    ///
    /// Slots freed by [`delete`](AugmentedSearchTree::delete) are reused by
    /// later inserts.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::AugmentedSearchTree;
    ///
    /// let tree: AugmentedSearchTree<i32, i32> = AugmentedSearchTree::with_capacity(32);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 32);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        AugmentedSearchTree {
            raw: RawSearchTree::with_capacity(capacity),
        }
    }

    /// Returns the number of entries the tree can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
