use core::borrow::Borrow;
use core::cmp::Ordering;
use core::iter::FusedIterator;
use core::mem;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{BinaryNode, Side};
use super::size::size_or_zero;
use crate::error::{Result, TreeError};

/// Handles from the root down to, but excluding, the node being worked on.
type Path = SmallVec<[Handle; 32]>;

/// The unbalanced, size-augmented binary search tree backing `AugmentedSearchTree`.
#[derive(Clone)]
pub(crate) struct RawSearchTree<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<BinaryNode<K, V>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
}

impl<K, V> RawSearchTree<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) fn len(&self) -> usize {
        self.size_of(self.root)
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn key_value(&self, handle: Handle) -> (&K, &V) {
        let node = self.nodes.get(handle);
        (&node.key, &node.value)
    }

    /// Subtree size of an optional child; an empty slot counts as zero.
    #[inline]
    fn size_of(&self, handle: Option<Handle>) -> usize {
        size_or_zero(handle.map(|h| self.nodes.get(h).size))
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        let mut stack: SmallVec<[(Handle, usize); 32]> = self.root.map(|root| (root, 1)).into_iter().collect();
        let mut height = 0;

        while let Some((handle, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.nodes.get(handle);
            stack.extend([node.left, node.right].into_iter().flatten().map(|child| (child, depth + 1)));
        }

        height
    }

    /// Follows `side` from the root until the slot is empty.
    pub(crate) fn extreme(&self, side: Side) -> Option<Handle> {
        let mut current = self.root?;
        while let Some(next) = self.nodes.get(current).child(side) {
            current = next;
        }
        Some(current)
    }

    pub(crate) fn iter(&self) -> RawIter<'_, K, V> {
        RawIter::new(self)
    }
}

impl<K: Ord, V> RawSearchTree<K, V> {
    /// Searches for a key and returns the handle of the node holding it.
    pub(crate) fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut cursor = self.root;
        while let Some(current) = cursor {
            let node = self.nodes.get(current);
            cursor = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(current),
            };
        }
        None
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.find(key).map(|handle| &self.nodes.get(handle).value)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.find(key)?;
        Some(&mut self.nodes.get_mut(handle).value)
    }

    /// Inserts a new key, incrementing the size of every ancestor on the path.
    ///
    /// Nothing is mutated when the key is already present.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Result<()> {
        let mut path = Path::new();
        let mut side = Side::Left;
        let mut cursor = self.root;

        while let Some(current) = cursor {
            let node = self.nodes.get(current);
            side = match key.cmp(&node.key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Err(TreeError::DuplicateKey),
            };
            path.push(current);
            cursor = node.child(side);
        }

        let leaf = self.nodes.alloc(BinaryNode::leaf(key, value));
        match path.last() {
            Some(&parent) => self.nodes.get_mut(parent).set_child(side, Some(leaf)),
            None => self.root = Some(leaf),
        }
        for &ancestor in &path {
            self.nodes.get_mut(ancestor).size.increment();
        }

        Ok(())
    }

    /// Removes a key and returns its entry.
    ///
    /// A node with two children keeps its slot: it takes over the entry of its
    /// in-order successor (the leftmost node of its right subtree), and the
    /// successor's node, which has no left child, is unlinked instead. Every
    /// ancestor of the unlinked node loses one from its size.
    pub(crate) fn delete<Q>(&mut self, key: &Q) -> Result<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut path = Path::new();
        let mut side = Side::Left;
        let mut cursor = self.root;

        let target = loop {
            let Some(current) = cursor else {
                return Err(TreeError::KeyNotFound);
            };
            let node = self.nodes.get(current);
            side = match key.cmp(node.key.borrow()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => break current,
            };
            path.push(current);
            cursor = node.child(side);
        };

        let victim = match *self.nodes.get(target) {
            BinaryNode {
                left: Some(_),
                right: Some(right),
                ..
            } => {
                path.push(target);
                side = Side::Right;
                let mut successor = right;
                while let Some(left) = self.nodes.get(successor).left {
                    path.push(successor);
                    side = Side::Left;
                    successor = left;
                }
                successor
            }
            _ => target,
        };

        let node = self.nodes.get(victim);
        let orphan = node.left.or(node.right);
        match path.last() {
            Some(&parent) => self.nodes.get_mut(parent).set_child(side, orphan),
            None => self.root = orphan,
        }
        for &ancestor in &path {
            self.nodes.get_mut(ancestor).size.decrement();
        }

        let mut removed = self.nodes.take(victim);
        if victim != target {
            let survivor = self.nodes.get_mut(target);
            mem::swap(&mut survivor.key, &mut removed.key);
            mem::swap(&mut survivor.value, &mut removed.value);
        }

        Ok((removed.key, removed.value))
    }

    /// Selects the `k`-th smallest node (1-indexed) of the subtree rooted at `root`.
    pub(crate) fn kth_smallest(&self, root: Handle, k: usize) -> Result<Handle> {
        let len = self.nodes.get(root).size.to_usize();
        if k == 0 || k > len {
            return Err(TreeError::InvalidRank { rank: k, len });
        }

        let mut current = root;
        let mut remaining = k;
        loop {
            let node = self.nodes.get(current);
            let left_size = self.size_of(node.left);
            let next = match (remaining - 1).cmp(&left_size) {
                Ordering::Equal => return Ok(current),
                Ordering::Less => node.left,
                Ordering::Greater => {
                    remaining -= left_size + 1;
                    node.right
                }
            };
            current = next.expect("`RawSearchTree::kth_smallest()` - subtree sizes are out of sync!");
        }
    }

    /// Returns the 1-indexed rank of `key` among all keys in the tree.
    pub(crate) fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut preceding = 0;
        let mut cursor = self.root;
        while let Some(current) = cursor {
            let node = self.nodes.get(current);
            match key.cmp(node.key.borrow()) {
                Ordering::Less => cursor = node.left,
                Ordering::Equal => return Some(preceding + self.size_of(node.left) + 1),
                Ordering::Greater => {
                    preceding += self.size_of(node.left) + 1;
                    cursor = node.right;
                }
            }
        }
        None
    }
}

/// In-order traversal over a [`RawSearchTree`] with an explicit stack.
pub(crate) struct RawIter<'a, K, V> {
    tree: &'a RawSearchTree<K, V>,
    // Nodes whose left subtree is exhausted (or pending) and which are not yet yielded.
    stack: SmallVec<[Handle; 32]>,
    remaining: usize,
}

impl<'a, K, V> RawIter<'a, K, V> {
    fn new(tree: &'a RawSearchTree<K, V>) -> Self {
        let mut iter = Self {
            tree,
            stack: SmallVec::new(),
            remaining: tree.len(),
        };
        iter.descend_left(tree.root);
        iter
    }

    fn descend_left(&mut self, mut cursor: Option<Handle>) {
        while let Some(current) = cursor {
            self.stack.push(current);
            cursor = self.tree.nodes.get(current).left;
        }
    }
}

impl<K, V> Clone for RawIter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for RawIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let tree = self.tree;
        let node = tree.nodes.get(current);
        self.descend_left(node.right);
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for RawIter<'_, K, V> {}

impl<K, V> FusedIterator for RawIter<'_, K, V> {}
