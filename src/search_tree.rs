use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::Index;

use tracing::trace;

use crate::error::{Result, TreeError};
use crate::raw::{RawIter, RawSearchTree, Side};

mod capacity;
mod order_statistic;

/// An ordered map backed by an unbalanced binary search tree whose nodes
/// count their subtrees.
///
/// Keys must implement [`Ord`] and are unique: inserting a key that is already
/// present fails with [`TreeError::DuplicateKey`] rather than overwriting it.
/// Besides the usual lookups the tree answers rank queries, "which key is the
/// k-th smallest" and "what is the rank of this key", in O(depth) using the
/// maintained subtree sizes.
///
/// The tree never rebalances. Inserting keys in sorted order produces a tree
/// of depth n; that is an accepted cost of the structure, and all operations
/// walk the tree iteratively so deep trees cannot overflow the stack.
///
/// # Examples
///
/// ```
/// use rank_tree::{AugmentedSearchTree, TreeError};
///
/// let mut tree = AugmentedSearchTree::new();
/// tree.insert("carol", 92).unwrap();
/// tree.insert("alice", 100).unwrap();
/// tree.insert("bob", 85).unwrap();
///
/// assert_eq!(tree.insert("bob", 0), Err(TreeError::DuplicateKey));
/// assert_eq!(tree.lookup(&"bob"), Ok(&85));
/// assert_eq!(tree.kth_smallest(1), Ok((&"alice", &100)));
///
/// assert_eq!(tree.delete(&"alice"), Ok(("alice", 100)));
/// assert_eq!(tree.lookup(&"alice"), Err(TreeError::KeyNotFound));
/// assert_eq!(tree.len(), 2);
/// ```
pub struct AugmentedSearchTree<K, V> {
    raw: RawSearchTree<K, V>,
}

impl<K, V> AugmentedSearchTree<K, V> {
    /// Makes a new, empty tree.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::AugmentedSearchTree;
    ///
    /// let mut tree = AugmentedSearchTree::new();
    /// tree.insert(1, "a").unwrap();
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        AugmentedSearchTree { raw: RawSearchTree::new() }
    }

    /// Returns the number of entries in the tree, which is also the subtree
    /// size stored at the root.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the tree, removing all entries.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of nodes on the longest root-to-leaf path, or `0`
    /// for an empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::AugmentedSearchTree;
    ///
    /// let mut tree = AugmentedSearchTree::new();
    /// for key in [2, 1, 3] {
    ///     tree.insert(key, ()).unwrap();
    /// }
    /// assert_eq!(tree.height(), 2);
    ///
    /// tree.insert(4, ()).unwrap();
    /// assert_eq!(tree.height(), 3);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the entry with the smallest key.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.extreme(Side::Left).map(|handle| self.raw.key_value(handle))
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.extreme(Side::Right).map(|handle| self.raw.key_value(handle))
    }

    /// Gets an iterator over the entries of the tree, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::AugmentedSearchTree;
    ///
    /// let mut tree = AugmentedSearchTree::new();
    /// tree.insert(3, "c").unwrap();
    /// tree.insert(1, "a").unwrap();
    /// tree.insert(2, "b").unwrap();
    ///
    /// let entries: Vec<_> = tree.iter().collect();
    /// assert_eq!(entries, [(&1, &"a"), (&2, &"b"), (&3, &"c")]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { inner: self.raw.iter() }
    }

    /// Gets an iterator over the keys of the tree, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }
}

impl<K: Ord, V> AugmentedSearchTree<K, V> {
    /// Inserts a key-value pair.
    ///
    /// Every node on the path from the root to the new leaf grows its subtree
    /// size by one.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateKey`] if `key` is already present. The tree
    /// is left unchanged.
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        self.raw.insert(key, value)?;
        trace!(len = self.raw.len(), "inserted key");
        Ok(())
    }

    /// Removes a key from the tree, returning the stored key and value.
    ///
    /// A node with two children is replaced by its in-order successor, so the
    /// in-order sequence of the remaining keys is unchanged apart from the
    /// removed key.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if `key` is absent. The tree is left
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{AugmentedSearchTree, TreeError};
    ///
    /// let mut tree = AugmentedSearchTree::new();
    /// for key in [5, 3, 8] {
    ///     tree.insert(key, key * 10).unwrap();
    /// }
    ///
    /// assert_eq!(tree.delete(&5), Ok((5, 50)));
    /// assert_eq!(tree.delete(&5), Err(TreeError::KeyNotFound));
    /// assert_eq!(tree.keys().copied().collect::<Vec<_>>(), [3, 8]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn delete<Q>(&mut self, key: &Q) -> Result<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let entry = self.raw.delete(key)?;
        trace!(len = self.raw.len(), "deleted key");
        Ok(entry)
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if `key` is absent.
    ///
    /// # Complexity
    ///
    /// O(depth)
    pub fn lookup<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key).ok_or(TreeError::KeyNotFound)
    }

    /// Returns a mutable reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if `key` is absent.
    pub fn lookup_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key).ok_or(TreeError::KeyNotFound)
    }

    /// Returns a reference to the value stored under `key`, or `None`.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Returns `true` if the tree holds `key`. Never fails.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.lookup(key).is_ok()
    }
}

impl<K: Clone, V: Clone> Clone for AugmentedSearchTree<K, V> {
    fn clone(&self) -> Self {
        AugmentedSearchTree { raw: self.raw.clone() }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AugmentedSearchTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for AugmentedSearchTree<K, V> {
    /// Creates an empty `AugmentedSearchTree`.
    fn default() -> AugmentedSearchTree<K, V> {
        AugmentedSearchTree::new()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for AugmentedSearchTree<K, V> {
    /// Two trees are equal when they hold the same entries, whatever their shape.
    fn eq(&self, other: &AugmentedSearchTree<K, V>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for AugmentedSearchTree<K, V> {}

impl<'a, K, V> IntoIterator for &'a AugmentedSearchTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

/// Returns a reference to the value corresponding to the supplied key.
///
/// # Panics
///
/// Panics if the key is not present in the tree.
impl<K, Q, V> Index<&Q> for AugmentedSearchTree<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

/// An iterator over the entries of an `AugmentedSearchTree`, in key order.
///
/// This `struct` is created by the [`iter`] method on [`AugmentedSearchTree`].
///
/// [`iter`]: AugmentedSearchTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: RawIter<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter { inner: self.inner.clone() }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the keys of an `AugmentedSearchTree`, in sorted order.
///
/// This `struct` is created by the [`keys`] method on [`AugmentedSearchTree`].
///
/// [`keys`]: AugmentedSearchTree::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys { inner: self.inner.clone() }
    }
}
