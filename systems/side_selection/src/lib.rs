#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks which lane hosts this turn's attack.
//!
//! The opponent's structures are counted over two fixed patches of their half,
//! one overlooking each lane, and the attack goes down the lane with fewer
//! defenders. Ties favour the left lane. Nothing is remembered between turns.

use funnel_core::{CellCoord, Side, StructureView};

const fn cell(column: u32, row: u32) -> CellCoord {
    CellCoord::new(column, row)
}

/// Enemy cells overlooking the left lane.
pub const LEFT_LANE_WATCH: [CellCoord; 19] = [
    cell(4, 18),
    cell(3, 17),
    cell(4, 17),
    cell(5, 17),
    cell(2, 16),
    cell(3, 16),
    cell(4, 16),
    cell(5, 16),
    cell(1, 15),
    cell(2, 15),
    cell(3, 15),
    cell(4, 15),
    cell(5, 15),
    cell(0, 14),
    cell(1, 14),
    cell(2, 14),
    cell(3, 14),
    cell(4, 14),
    cell(5, 14),
];

/// Enemy cells overlooking the right lane.
pub const RIGHT_LANE_WATCH: [CellCoord; 19] = [
    cell(23, 18),
    cell(22, 17),
    cell(23, 17),
    cell(24, 17),
    cell(22, 16),
    cell(23, 16),
    cell(24, 16),
    cell(25, 16),
    cell(22, 15),
    cell(23, 15),
    cell(24, 15),
    cell(25, 15),
    cell(26, 15),
    cell(22, 14),
    cell(23, 14),
    cell(24, 14),
    cell(25, 14),
    cell(26, 14),
    cell(27, 14),
];

/// Structure counts observed over each lane-watch patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LaneDensity {
    /// Structures overlooking the left lane.
    pub left: usize,
    /// Structures overlooking the right lane.
    pub right: usize,
}

impl LaneDensity {
    /// Creates a density report from explicit counts.
    #[must_use]
    pub const fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }

    /// Lane with fewer defenders; the left lane wins ties.
    #[must_use]
    pub const fn side(&self) -> Side {
        if self.left <= self.right {
            Side::Left
        } else {
            Side::Right
        }
    }
}

/// Counts the structures over both lane-watch patches.
#[must_use]
pub fn survey(structures: StructureView<'_>) -> LaneDensity {
    LaneDensity::new(
        structures.count_occupied(&LEFT_LANE_WATCH),
        structures.count_occupied(&RIGHT_LANE_WATCH),
    )
}

/// Chooses the attack lane from the current structure snapshot.
#[must_use]
pub fn choose_side(structures: StructureView<'_>) -> Side {
    survey(structures).side()
}
