//! Pathfinding - precomputed sea-route trees and on-demand point search.

mod route_tree;
mod search;

pub use route_tree::*;
pub use search::*;

/// f32 priority usable in a `BinaryHeap`; costs here are finite by
/// construction so the total-order fudge never fires
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Priority(pub f32);

impl Eq for Priority {}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0
            .partial_cmp(&other.0)
            .unwrap_or(std::cmp::Ordering::Equal)
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
