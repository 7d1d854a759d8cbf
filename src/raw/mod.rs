mod arena;
mod handle;
mod node;
mod raw_search_tree;
mod raw_spatial_tree;
mod size;

pub(crate) use node::Side;
pub(crate) use raw_search_tree::{RawIter, RawSearchTree};
pub(crate) use raw_spatial_tree::{RawPreorder, RawSpatialTree};
