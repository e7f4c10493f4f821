//! Static coordinate plans the controller builds from.

use funnel_core::{CellCoord, Side};

const fn cell(column: u32, row: u32) -> CellCoord {
    CellCoord::new(column, row)
}

/// Turret perimeter laid down on turn zero and repaired every turn.
pub const TURRET_LAYOUT: [CellCoord; 38] = [
    cell(0, 13),
    cell(11, 7),
    cell(16, 7),
    cell(2, 13),
    cell(3, 13),
    cell(6, 13),
    cell(11, 13),
    cell(16, 13),
    cell(21, 13),
    cell(24, 13),
    cell(25, 13),
    cell(27, 13),
    cell(3, 12),
    cell(4, 12),
    cell(23, 12),
    cell(24, 12),
    cell(5, 11),
    cell(8, 11),
    cell(12, 11),
    cell(15, 11),
    cell(19, 11),
    cell(22, 11),
    cell(6, 10),
    cell(21, 10),
    cell(7, 9),
    cell(20, 9),
    cell(8, 8),
    cell(16, 9),
    cell(11, 9),
    cell(19, 8),
    cell(9, 7),
    cell(18, 7),
    cell(10, 6),
    cell(12, 6),
    cell(13, 6),
    cell(14, 6),
    cell(15, 6),
    cell(17, 6),
];

/// Corner turrets placed on turn zero only. They double as the outermost
/// funnel-gap cells.
pub const CORNER_TURRETS: [CellCoord; 2] = [cell(1, 13), cell(26, 13)];

/// Turrets added behind the front line once resources allow.
pub const EXTRA_TURRETS: [CellCoord; 6] = [
    cell(4, 13),
    cell(23, 13),
    cell(5, 12),
    cell(9, 12),
    cell(18, 12),
    cell(22, 12),
];

/// Second line of turrets along the inside of the perimeter.
pub const SECOND_ROW: [CellCoord; 16] = [
    cell(6, 11),
    cell(21, 11),
    cell(7, 10),
    cell(20, 10),
    cell(8, 9),
    cell(19, 9),
    cell(9, 8),
    cell(18, 8),
    cell(10, 7),
    cell(17, 7),
    cell(11, 6),
    cell(16, 6),
    cell(12, 5),
    cell(13, 5),
    cell(14, 5),
    cell(15, 5),
];

/// Perimeter turrets upgraded first.
pub const UPGRADE_TARGETS: [CellCoord; 16] = [
    cell(3, 13),
    cell(24, 13),
    cell(12, 11),
    cell(15, 11),
    cell(4, 12),
    cell(23, 12),
    cell(11, 9),
    cell(16, 9),
    cell(6, 10),
    cell(21, 10),
    cell(2, 13),
    cell(25, 13),
    cell(9, 7),
    cell(18, 7),
    cell(13, 6),
    cell(14, 6),
];

/// Supports kept alive every turn.
pub const CORE_SHIELDS: [CellCoord; 4] = [cell(12, 3), cell(13, 3), cell(14, 3), cell(15, 3)];

/// Supports added when the structure pool is healthy.
pub const EXTRA_SHIELDS: [CellCoord; 2] = [cell(13, 2), cell(14, 2)];

/// Cells a side's funnel cycle works on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FunnelPlan {
    /// Turrets removed to open the lane and rebuilt to close it.
    pub gap: [CellCoord; 3],
    /// Edge cells the attack burst enters from.
    pub entries: [CellCoord; 2],
}

/// Funnel through the left corner.
pub const LEFT_FUNNEL: FunnelPlan = FunnelPlan {
    gap: [cell(1, 13), cell(1, 12), cell(2, 12)],
    entries: [cell(14, 0), cell(24, 10)],
};

/// Funnel through the right corner.
pub const RIGHT_FUNNEL: FunnelPlan = FunnelPlan {
    gap: [cell(26, 13), cell(26, 12), cell(25, 12)],
    entries: [cell(13, 0), cell(3, 10)],
};

impl FunnelPlan {
    /// Plan matching the provided side.
    #[must_use]
    pub const fn for_side(side: Side) -> &'static Self {
        match side {
            Side::Left => &LEFT_FUNNEL,
            Side::Right => &RIGHT_FUNNEL,
        }
    }
}
