//! Geometry of the diamond-shaped arena.

use funnel_core::{CellCoord, ARENA_SIZE, HALF_ARENA};

/// Reports whether the cell lies inside the playable diamond.
///
/// Row `y` of the friendly half spans columns `13 - y ..= 14 + y`; the enemy
/// half mirrors that shape.
#[must_use]
pub fn in_arena_bounds(cell: CellCoord) -> bool {
    let (column, row) = (cell.column(), cell.row());
    if column >= ARENA_SIZE || row >= ARENA_SIZE {
        return false;
    }

    let depth = if row < HALF_ARENA {
        row
    } else {
        ARENA_SIZE - 1 - row
    };
    let first = HALF_ARENA - 1 - depth;
    let last = HALF_ARENA + depth;
    (first..=last).contains(&column)
}

/// Reports whether the cell lies on the bottom-left or bottom-right edge,
/// the only cells friendly mobile units may enter from.
#[must_use]
pub fn is_friendly_edge(cell: CellCoord) -> bool {
    if !cell.is_friendly() {
        return false;
    }
    let (column, row) = (cell.column(), cell.row());
    column + row == HALF_ARENA - 1 || column == HALF_ARENA + row
}
