use core::borrow::Borrow;

use super::AugmentedSearchTree;
use crate::error::{Result, TreeError};

impl<K: Ord, V> AugmentedSearchTree<K, V> {
    /// Returns the entry at position `k` in ascending key order.
    ///
    /// The rank is one-based: `kth_smallest(1)` is the smallest key and
    /// `kth_smallest(len)` the largest. At each node the size of the left
    /// subtree decides whether the answer is the node itself, lies to the
    /// left, or lies to the right with `k` reduced by the left size plus one.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidRank`] unless `1 <= k <= len`.
    ///
    /// # Complexity
    ///
    /// O(depth)
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{AugmentedSearchTree, TreeError};
    ///
    /// let mut tree = AugmentedSearchTree::new();
    /// for key in [5, 3, 8, 1, 4, 7, 9] {
    ///     tree.insert(key, ()).unwrap();
    /// }
    ///
    /// assert_eq!(tree.kth_smallest(1).unwrap().0, &1);
    /// assert_eq!(tree.kth_smallest(4).unwrap().0, &5);
    /// assert_eq!(tree.kth_smallest(7).unwrap().0, &9);
    /// assert_eq!(tree.kth_smallest(8), Err(TreeError::InvalidRank { rank: 8, len: 7 }));
    /// ```
    pub fn kth_smallest(&self, k: usize) -> Result<(&K, &V)> {
        let root = self.raw.root().ok_or(TreeError::InvalidRank { rank: k, len: 0 })?;
        let handle = self.raw.kth_smallest(root, k)?;
        Ok(self.raw.key_value(handle))
    }

    /// Returns the entry at position `k` in ascending key order among the keys
    /// of the subtree rooted at the node holding `subtree_key`.
    ///
    /// Which keys share that subtree depends on insertion order, so this is
    /// mostly useful to callers that reason about the tree's shape.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if `subtree_key` is absent, and
    /// [`TreeError::InvalidRank`] unless `1 <= k <=` the subtree's size.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::AugmentedSearchTree;
    ///
    /// let mut tree = AugmentedSearchTree::new();
    /// for key in [5, 3, 8, 1, 4, 7, 9] {
    ///     tree.insert(key, ()).unwrap();
    /// }
    ///
    /// // 8 roots the subtree {7, 8, 9}.
    /// assert_eq!(tree.kth_smallest_in(&8, 1).unwrap().0, &7);
    /// assert!(tree.kth_smallest_in(&8, 4).is_err());
    /// ```
    pub fn kth_smallest_in<Q>(&self, subtree_key: &Q, k: usize) -> Result<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let root = self.raw.find(subtree_key).ok_or(TreeError::KeyNotFound)?;
        let handle = self.raw.kth_smallest(root, k)?;
        Ok(self.raw.key_value(handle))
    }

    /// Returns the one-based rank of `key`, the inverse of [`kth_smallest`].
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if `key` is absent.
    ///
    /// # Complexity
    ///
    /// O(depth)
    ///
    /// [`kth_smallest`]: AugmentedSearchTree::kth_smallest
    pub fn rank_of<Q>(&self, key: &Q) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.rank_of(key).ok_or(TreeError::KeyNotFound)
    }
}
