//! Spatial data structures and queries.
//!
//! - [`IntervalTree`] - A red-black tree of boxes with subtree-bound pruning
//! - [`PlanarSet`] - A unique set of handles indexed by their bounding boxes

mod interval_tree;
mod planar_set;

pub use interval_tree::{Interval, IntervalTree, Iter};
pub use planar_set::PlanarSet;
