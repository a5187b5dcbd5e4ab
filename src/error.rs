//! Error types for planum operations.

use thiserror::Error;

/// Fatal conditions that abort a boolean operation.
///
/// Both indicate degenerate or self-intersecting input. The operation's
/// inputs are untouched; partially built results are discarded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BooleanError {
    /// A chain between two intersection points could not be given a
    /// consistent inside/outside/boundary label.
    #[error("unresolved boundary conflict near ({x}, {y})")]
    UnresolvedBoundaryConflict {
        /// Location of the chain start.
        x: f64,
        /// Location of the chain start.
        y: f64,
    },

    /// Walking a face ring did not return to its starting edge.
    #[error("infinite loop detected while walking a face of {edges} edges")]
    InfiniteLoop {
        /// Number of edges available to the walk.
        edges: usize,
    },
}

impl BooleanError {
    pub(crate) fn conflict_at<F: num_traits::Float>(p: crate::primitives::Point2<F>) -> Self {
        BooleanError::UnresolvedBoundaryConflict {
            x: p.x.to_f64().unwrap_or(f64::NAN),
            y: p.y.to_f64().unwrap_or(f64::NAN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Point2;

    #[test]
    fn test_messages() {
        let e = BooleanError::conflict_at(Point2::new(1.5f64, -2.0));
        assert_eq!(e.to_string(), "unresolved boundary conflict near (1.5, -2)");
        let e = BooleanError::InfiniteLoop { edges: 12 };
        assert_eq!(
            e.to_string(),
            "infinite loop detected while walking a face of 12 edges"
        );
    }
}
