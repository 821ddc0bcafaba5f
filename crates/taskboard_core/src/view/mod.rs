//! Read-only views derived from the canonical collection.
//!
//! # Responsibility
//! - Compute the filtered, lane-partitioned board and its statistics.
//!
//! # Invariants
//! - Views are recomputed from the collection, never cached or written back.

pub mod projection;
pub mod stats;

use crate::view::projection::LaneMap;
use crate::view::stats::BoardStats;

/// Everything a view layer needs to render the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// Filtered, sorted lanes.
    pub lanes: LaneMap,
    /// Counts over the unfiltered collection.
    pub stats: BoardStats,
}
