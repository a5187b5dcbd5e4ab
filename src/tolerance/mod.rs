//! Epsilon-aware comparisons and geometric predicates.
//!
//! All functions in this crate take an explicit [`Tolerance`] (or a raw
//! `eps`). No hidden epsilons are used.

mod config;
mod predicates;

pub use config::{Tolerance, DEFAULT_EPS, DEFAULT_SNAP_FACTOR};
pub use predicates::{orient2d, point_on_segment, Orientation};
