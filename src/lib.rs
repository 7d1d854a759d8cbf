//! Size-augmented search trees for Rust.
//!
//! This crate provides two trees that never rebalance but keep a subtree-size
//! counter on every node, plus a helper for choosing a good insertion order:
//!
//! - [`AugmentedSearchTree`] - an ordered key/value map answering "k-th smallest"
//!   and "rank of key" queries in O(depth)
//! - [`SpatialPartitionTree`] - an eight-way tree that indexes 3-D [`Point`]s by
//!   recursive [`Octant`] splitting
//! - [`make_ordering`] - a median-first, axis-interleaved insertion order that
//!   keeps a [`SpatialPartitionTree`] shallow
//! - [`Percentiles`] - a percentile band reporter over a multiset of ordered points
//!
//! # Example
//!
//! ```
//! use rank_tree::{AugmentedSearchTree, Point, SpatialPartitionTree};
//!
//! let mut scores = AugmentedSearchTree::new();
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     scores.insert(key, key * 10).unwrap();
//! }
//!
//! // Ranks are 1-indexed.
//! assert_eq!(scores.kth_smallest(1).unwrap(), (&1, &10));
//! assert_eq!(scores.kth_smallest(4).unwrap(), (&5, &50));
//! assert_eq!(scores.rank_of(&9).unwrap(), 7);
//!
//! let mut space = SpatialPartitionTree::new();
//! space.insert(Point::new(3, 3, 3), "A").unwrap();
//! space.insert(Point::new(1, 5, 2), "B").unwrap();
//! assert_eq!(space.lookup(&Point::new(1, 5, 2)).unwrap(), &"B");
//! ```
//!
//! # Implementation
//!
//! Nodes live in an arena and refer to their children by handle, so each node
//! exclusively owns its child slots and no back-references exist. Every
//! traversal is iterative with an explicit path stack: worst-case depth is
//! O(n) for adversarial insertion orders, and that depth never turns into
//! call-stack depth.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod raw;

pub mod balancing;
pub mod error;
pub mod percentiles;
pub mod point;
pub mod search_tree;
pub mod spatial_tree;

pub use balancing::make_ordering;
pub use error::{Result, TreeError};
pub use percentiles::Percentiles;
pub use point::{Axis, Octant, Point};
pub use search_tree::AugmentedSearchTree;
pub use spatial_tree::SpatialPartitionTree;
