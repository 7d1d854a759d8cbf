use core::iter::FusedIterator;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::OctantNode;
use super::size::size_or_zero;
use crate::error::{Result, TreeError};
use crate::point::{Octant, Point};

/// The eight-way partition tree backing `SpatialPartitionTree`.
///
/// Every node splits its descendants into eight octants by comparing them
/// against its own point. There is no deletion, so the arena never has holes.
#[derive(Clone)]
pub(crate) struct RawSpatialTree<C, V> {
    nodes: Arena<OctantNode<C, V>>,
    root: Option<Handle>,
}

impl<C, V> RawSpatialTree<C, V> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

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

    #[inline]
    fn size_of(&self, handle: Option<Handle>) -> usize {
        size_or_zero(handle.map(|h| self.nodes.get(h).size))
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        let mut stack: SmallVec<[(Handle, usize); 64]> = self.root.map(|root| (root, 1)).into_iter().collect();
        let mut height = 0;

        while let Some((handle, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.nodes.get(handle);
            if !node.is_leaf() {
                stack.extend(node.children.iter().flatten().map(|&child| (child, depth + 1)));
            }
        }

        height
    }

    pub(crate) fn preorder(&self) -> RawPreorder<'_, C, V> {
        RawPreorder {
            tree: self,
            stack: self.root.into_iter().collect(),
            remaining: self.len(),
        }
    }
}

impl<C: Ord, V> RawSpatialTree<C, V> {
    /// Descends by octant until a node holds exactly `point`.
    pub(crate) fn find(&self, point: &Point<C>) -> Option<Handle> {
        let mut cursor = self.root;
        while let Some(current) = cursor {
            let node = self.nodes.get(current);
            if node.point == *point {
                return Some(current);
            }
            cursor = node.child(node.octant_of(point));
        }
        None
    }

    pub(crate) fn get(&self, point: &Point<C>) -> Option<&V> {
        self.find(point).map(|handle| &self.nodes.get(handle).value)
    }

    pub(crate) fn get_mut(&mut self, point: &Point<C>) -> Option<&mut V> {
        let handle = self.find(point)?;
        Some(&mut self.nodes.get_mut(handle).value)
    }

    /// Inserts a point below the first empty slot on its octant path.
    ///
    /// A point equal to any node on the path is rejected before anything is
    /// mutated. Every node on the path grows by one.
    pub(crate) fn insert(&mut self, point: Point<C>, value: V) -> Result<()> {
        let mut path: SmallVec<[Handle; 32]> = SmallVec::new();
        let mut octant = None;
        let mut cursor = self.root;

        while let Some(current) = cursor {
            let node = self.nodes.get(current);
            if node.point == point {
                return Err(TreeError::DuplicateKey);
            }
            let next = node.octant_of(&point);
            path.push(current);
            octant = Some(next);
            cursor = node.child(next);
        }

        let leaf = self.nodes.alloc(OctantNode::leaf(point, value));
        match (path.last(), octant) {
            (Some(&parent), Some(octant)) => self.nodes.get_mut(parent).children[octant.index()] = Some(leaf),
            _ => self.root = Some(leaf),
        }
        for &ancestor in &path {
            self.nodes.get_mut(ancestor).size.increment();
        }

        Ok(())
    }

    /// Size of the root's child slot that the octant test for `point` selects.
    pub(crate) fn subtree_size_toward(&self, point: &Point<C>) -> Option<usize> {
        let root = self.nodes.get(self.root?);
        Some(self.size_of(root.child(root.octant_of(point))))
    }
}

/// Pre-order traversal over a [`RawSpatialTree`], children in octant order.
pub(crate) struct RawPreorder<'a, C, V> {
    tree: &'a RawSpatialTree<C, V>,
    stack: SmallVec<[Handle; 64]>,
    remaining: usize,
}

impl<C, V> Clone for RawPreorder<'_, C, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, C, V> Iterator for RawPreorder<'a, C, V> {
    type Item = (&'a Point<C>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let tree = self.tree;
        let node = tree.nodes.get(current);
        // Reversed so octant 0 is popped first.
        self.stack.extend(node.children.iter().rev().flatten().copied());
        self.remaining -= 1;
        Some((&node.point, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<C, V> ExactSizeIterator for RawPreorder<'_, C, V> {}

impl<C, V> FusedIterator for RawPreorder<'_, C, V> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    impl<C: Ord, V> RawSpatialTree<C, V> {
        /// Checks the size invariant at every node and that every descendant lies
        /// in the octant its slot claims, relative to every ancestor on its path.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();
            let mut ancestors: Vec<(Handle, Octant)> = Vec::new();
            let counted = self.root.map_or(0, |root| self.validate_node(root, &mut ancestors, &mut errors));

            if counted != self.nodes.len() {
                errors.push(format!("reachable nodes={counted}, arena len={}", self.nodes.len()));
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        fn validate_node(&self, handle: Handle, ancestors: &mut Vec<(Handle, Octant)>, errors: &mut Vec<String>) -> usize {
            let node = self.nodes.get(handle);
            for &(ancestor, octant) in ancestors.iter() {
                let ancestor = self.nodes.get(ancestor);
                if ancestor.octant_of(&node.point) != octant || ancestor.point == node.point {
                    errors.push(format!("node {handle:?} is misplaced below {octant:?}"));
                }
            }

            let mut actual = 1;
            for (index, child) in node.children.iter().enumerate() {
                if let Some(child) = *child {
                    let octant = node.octant_of(&self.nodes.get(child).point);
                    if octant.index() != index {
                        errors.push(format!("child {child:?} sits in slot {index}, belongs in {}", octant.index()));
                    }
                    ancestors.push((handle, octant));
                    actual += self.validate_node(child, ancestors, errors);
                    ancestors.pop();
                }
            }

            if node.size.to_usize() != actual {
                errors.push(format!("size mismatch at {handle:?}: stored={}, actual={actual}", node.size.to_usize()));
            }
            actual
        }
    }

    /// Names a child slot by its per-axis comparisons.
    fn octant_from_bits(x_upper: bool, y_upper: bool, z_upper: bool) -> Octant {
        let corner = |upper: bool| i32::from(upper);
        Octant::locate(&Point::new(corner(x_upper), corner(y_upper), corner(z_upper)), &Point::new(1, 1, 1))
    }

    #[test]
    fn four_point_scenario() {
        let mut tree = RawSpatialTree::new();
        tree.insert(Point::new(3, 3, 3), "A").expect("empty tree");
        tree.insert(Point::new(1, 5, 2), "B").expect("distinct");
        tree.insert(Point::new(4, 3, 1), "C").expect("distinct");
        tree.insert(Point::new(5, 4, 0), "D").expect("distinct");
        tree.validate_invariants();

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.subtree_size_toward(&Point::new(4, 3, 1)), Some(2));
        assert_eq!(tree.subtree_size_toward(&Point::new(1, 5, 2)), Some(1));
        assert_eq!(tree.subtree_size_toward(&Point::new(0, 0, 0)), Some(0));
        assert_eq!(tree.height(), 3);

        let root = tree.nodes.get(tree.root.expect("non-empty"));
        assert!(root.child(octant_from_bits(true, true, false)).is_some());
        assert!(root.child(octant_from_bits(false, true, false)).is_some());
    }

    #[test]
    fn ties_route_to_the_upper_octant() {
        let mut tree = RawSpatialTree::new();
        tree.insert(Point::new(0, 0, 0), 0).expect("empty tree");
        tree.insert(Point::new(0, 0, 1), 1).expect("distinct");
        tree.validate_invariants();

        let root = tree.nodes.get(tree.root.expect("non-empty"));
        assert!(root.child(octant_from_bits(true, true, true)).is_some());
        assert_eq!(tree.get(&Point::new(0, 0, 1)), Some(&1));
    }

    #[test]
    fn duplicate_point_is_rejected_below_the_root() {
        let mut tree = RawSpatialTree::new();
        for (index, point) in [(5, 5, 5), (7, 7, 7), (6, 6, 6)].into_iter().enumerate() {
            tree.insert(Point::from(point), index).expect("distinct");
        }

        // (6, 6, 6) lives two levels down; equality is still detected there.
        assert_eq!(tree.insert(Point::new(6, 6, 6), 99), Err(TreeError::DuplicateKey));
        tree.validate_invariants();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get(&Point::new(6, 6, 6)), Some(&2));
    }

    #[test]
    fn preorder_visits_every_node_once() {
        let mut tree = RawSpatialTree::new();
        let points = [(3, 3, 3), (1, 5, 2), (4, 3, 1), (5, 4, 0), (0, 0, 0), (9, 9, 9)];
        for point in points {
            tree.insert(Point::from(point), ()).expect("distinct");
        }

        let visited: Vec<Point<i32>> = tree.preorder().map(|(point, ())| *point).collect();
        assert_eq!(visited.len(), points.len());
        assert_eq!(visited[0], Point::new(3, 3, 3));
        // Octant 0 before octant 2 before octant 6 before octant 7.
        assert_eq!(visited[1], Point::new(0, 0, 0));
        assert_eq!(visited[2], Point::new(1, 5, 2));
        assert_eq!(tree.preorder().len(), points.len());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn inserted_points_are_found(points in prop::collection::vec((-8i8..8, -8i8..8, -8i8..8), 0..300)) {
            let mut tree: RawSpatialTree<i8, usize> = RawSpatialTree::new();
            let mut model: BTreeMap<Point<i8>, usize> = BTreeMap::new();

            for (index, point) in points.into_iter().enumerate() {
                let point = Point::from(point);
                let expected = if model.contains_key(&point) {
                    Err(TreeError::DuplicateKey)
                } else {
                    model.insert(point, index);
                    Ok(())
                };
                prop_assert_eq!(tree.insert(point, index), expected);
            }

            tree.validate_invariants();
            prop_assert_eq!(tree.len(), model.len());
            for (point, index) in &model {
                prop_assert_eq!(tree.get(point), Some(index));
            }
            for x in -9i8..9 {
                let probe = Point::new(x, 8, -9);
                prop_assert!(tree.find(&probe).is_none());
            }
        }
    }
}
