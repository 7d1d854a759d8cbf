use crate::point::{Octant, Point};

use super::handle::Handle;
use super::size::Size;

/// Node of the scalar search tree.
#[derive(Clone)]
pub(crate) struct BinaryNode<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    // Nodes in the subtree rooted here, this node included.
    pub(crate) size: Size,
}

/// Which child slot of a [`BinaryNode`] a descent took.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl<K, V> BinaryNode<K, V> {
    /// Creates a childless node.
    pub(crate) const fn leaf(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            size: Size::ONE,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

/// Node of the spatial partition tree.
#[derive(Clone)]
pub(crate) struct OctantNode<C, V> {
    pub(crate) point: Point<C>,
    pub(crate) value: V,
    // Indexed by `Octant::index()`.
    pub(crate) children: [Option<Handle>; Octant::COUNT],
    pub(crate) size: Size,
}

impl<C, V> OctantNode<C, V> {
    pub(crate) const fn leaf(point: Point<C>, value: V) -> Self {
        Self {
            point,
            value,
            children: [None; Octant::COUNT],
            size: Size::ONE,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, octant: Octant) -> Option<Handle> {
        self.children[octant.index()]
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

impl<C: Ord, V> OctantNode<C, V> {
    /// Classifies `point` against this node's coordinates.
    #[inline]
    pub(crate) fn octant_of(&self, point: &Point<C>) -> Octant {
        Octant::locate(point, &self.point)
    }
}
