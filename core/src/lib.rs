#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the funnel algo.
//!
//! This crate defines the message surface that connects the platform
//! adapter, the mirrored game world, and the pure decision systems. Systems
//! read an immutable [`TurnView`] captured at the start of a turn and respond
//! exclusively with [`Command`] batches. The world resolves each command and
//! reports an [`Outcome`]; a rejected command is a no-op, never an error.

use serde::{Deserialize, Serialize};

/// Number of cells along each edge of the square board that contains the arena.
pub const ARENA_SIZE: u32 = 28;

/// Number of rows owned by each player. Rows below this index are friendly.
pub const HALF_ARENA: u32 = ARENA_SIZE / 2;

/// Number of cells in the square board backing the arena.
pub const ARENA_CELLS: usize = (ARENA_SIZE * ARENA_SIZE) as usize;

/// Requests that the decision systems hand to the game platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Requests a single unit of the provided kind at the cell.
    Spawn {
        /// Kind of unit to create.
        kind: UnitKind,
        /// Cell the unit should occupy or enter from.
        cell: CellCoord,
    },
    /// Requests removal of the friendly structure occupying the cell.
    Remove {
        /// Cell holding the structure to remove.
        cell: CellCoord,
    },
    /// Requests an upgrade of the friendly structure occupying the cell.
    Upgrade {
        /// Cell holding the structure to upgrade.
        cell: CellCoord,
    },
}

impl Command {
    /// Cell targeted by the command.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        match self {
            Self::Spawn { cell, .. } | Self::Remove { cell } | Self::Upgrade { cell } => *cell,
        }
    }
}

/// Reports broadcast by the world after resolving a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Confirms that a unit was queued for creation.
    Spawned {
        /// Kind of unit that was queued.
        kind: UnitKind,
        /// Cell the unit was queued at.
        cell: CellCoord,
    },
    /// Reports that a spawn request had no effect.
    SpawnRejected {
        /// Kind of unit requested.
        kind: UnitKind,
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the spawn failed.
        reason: RejectionReason,
    },
    /// Confirms that a structure was marked for removal.
    Removed {
        /// Cell holding the structure.
        cell: CellCoord,
    },
    /// Reports that a removal request had no effect.
    RemovalRejected {
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the removal failed.
        reason: RejectionReason,
    },
    /// Confirms that a structure was upgraded.
    Upgraded {
        /// Cell holding the structure.
        cell: CellCoord,
    },
    /// Reports that an upgrade request had no effect.
    UpgradeRejected {
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the upgrade failed.
        reason: RejectionReason,
    },
}

impl Outcome {
    /// Reports whether the command left the world untouched.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(
            self,
            Self::SpawnRejected { .. } | Self::RemovalRejected { .. } | Self::UpgradeRejected { .. }
        )
    }
}

/// Reasons a command may resolve to a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    /// The cell lies outside the diamond-shaped arena.
    OutOfBounds,
    /// The cell lies in the opponent's half of the arena.
    EnemyTerritory,
    /// A structure already occupies the cell.
    Occupied,
    /// Mobile units may only enter from a friendly edge cell.
    NotOnEdge,
    /// The relevant resource pool cannot cover the cost.
    InsufficientResources,
    /// No friendly structure occupies the cell.
    NoStructure,
    /// The structure at the cell was already upgraded.
    AlreadyUpgraded,
    /// The structure at the cell is already scheduled for removal.
    PendingRemoval,
}

/// Location of a single arena cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Reports whether the cell lies in the friendly half of the board.
    #[must_use]
    pub const fn is_friendly(&self) -> bool {
        self.row < HALF_ARENA
    }

    /// Dense index of the cell within the square board, if it lies on it.
    #[must_use]
    pub fn board_index(&self) -> Option<usize> {
        if self.column < ARENA_SIZE && self.row < ARENA_SIZE {
            let row = usize::try_from(self.row).ok()?;
            let column = usize::try_from(self.column).ok()?;
            let width = usize::try_from(ARENA_SIZE).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Unit kinds published by the platform's unit catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKind {
    /// Cheap blocking structure.
    Wall,
    /// Structure that shields friendly mobile units passing nearby.
    Support,
    /// Structure that fires at enemy mobile units.
    Turret,
    /// Fast mobile unit.
    Scout,
    /// Long-range mobile unit that targets structures.
    Demolisher,
    /// Mobile unit that hunts enemy mobile units.
    Interceptor,
}

impl UnitKind {
    /// Every unit kind in catalog order.
    pub const ALL: [Self; 6] = [
        Self::Wall,
        Self::Support,
        Self::Turret,
        Self::Scout,
        Self::Demolisher,
        Self::Interceptor,
    ];

    /// Reports whether the kind is a stationary structure.
    #[must_use]
    pub const fn is_structure(self) -> bool {
        matches!(self, Self::Wall | Self::Support | Self::Turret)
    }

    /// Position of the kind inside the platform's unit catalog.
    #[must_use]
    pub const fn catalog_index(self) -> usize {
        match self {
            Self::Wall => 0,
            Self::Support => 1,
            Self::Turret => 2,
            Self::Scout => 3,
            Self::Demolisher => 4,
            Self::Interceptor => 5,
        }
    }

    /// Resolves the kind stored at the provided catalog position.
    #[must_use]
    pub fn from_catalog_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// The two independent currencies a player spends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    /// Pays for structures, upgrades and repairs.
    Structure,
    /// Pays for mobile units.
    Mobile,
}

/// Amounts held in each resource pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourcePool {
    structure: f32,
    mobile: f32,
}

impl ResourcePool {
    /// Creates a pool holding the provided amounts.
    #[must_use]
    pub const fn new(structure: f32, mobile: f32) -> Self {
        Self { structure, mobile }
    }

    /// Amount held in the structure pool.
    #[must_use]
    pub const fn structure(&self) -> f32 {
        self.structure
    }

    /// Amount held in the mobile pool.
    #[must_use]
    pub const fn mobile(&self) -> f32 {
        self.mobile
    }

    /// Amount held in the requested pool.
    #[must_use]
    pub const fn get(&self, resource: Resource) -> f32 {
        match resource {
            Resource::Structure => self.structure,
            Resource::Mobile => self.mobile,
        }
    }

    /// Reports whether both pools cover the provided cost.
    #[must_use]
    pub fn can_afford(&self, cost: ResourceCost) -> bool {
        self.structure >= cost.structure() && self.mobile >= cost.mobile()
    }

    /// Deducts the provided cost, returning `false` without touching the
    /// pools when it cannot be covered.
    pub fn try_spend(&mut self, cost: ResourceCost) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.structure -= cost.structure();
        self.mobile -= cost.mobile();
        true
    }
}

/// Price of a unit or upgrade expressed per resource pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceCost {
    structure: f32,
    mobile: f32,
}

impl ResourceCost {
    /// Creates a cost from per-pool amounts.
    #[must_use]
    pub const fn new(structure: f32, mobile: f32) -> Self {
        Self { structure, mobile }
    }

    /// Portion paid from the structure pool.
    #[must_use]
    pub const fn structure(&self) -> f32 {
        self.structure
    }

    /// Portion paid from the mobile pool.
    #[must_use]
    pub const fn mobile(&self) -> f32 {
        self.mobile
    }
}

/// Half of the board hosting the attack lane for a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Lane along the low-column edge.
    Left,
    /// Lane along the high-column edge.
    Right,
}

/// Owner of a unit on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    /// The player running this agent.
    Own,
    /// The opponent.
    Enemy,
}

/// Immutable representation of a structure occupying a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Structure {
    /// Kind of structure.
    pub kind: UnitKind,
    /// Player that owns the structure.
    pub owner: Player,
    /// Indicates whether the structure was upgraded.
    pub upgraded: bool,
    /// Indicates whether the owner scheduled the structure for removal.
    pub pending_removal: bool,
}

impl Structure {
    /// Creates a freshly built structure.
    #[must_use]
    pub const fn new(kind: UnitKind, owner: Player) -> Self {
        Self {
            kind,
            owner,
            upgraded: false,
            pending_removal: false,
        }
    }
}

/// Read-only view into the dense structure grid.
#[derive(Clone, Copy, Debug)]
pub struct StructureView<'a> {
    cells: &'a [Option<Structure>],
}

impl<'a> StructureView<'a> {
    /// Captures a new view backed by a row-major slice of [`ARENA_CELLS`] cells.
    #[must_use]
    pub fn new(cells: &'a [Option<Structure>]) -> Self {
        Self { cells }
    }

    /// Returns the structure occupying the provided cell, if any.
    #[must_use]
    pub fn structure_at(&self, cell: CellCoord) -> Option<&'a Structure> {
        cell.board_index()
            .and_then(|index| self.cells.get(index))
            .and_then(Option::as_ref)
    }

    /// Reports whether a structure of either player occupies the cell.
    #[must_use]
    pub fn contains_stationary_unit(&self, cell: CellCoord) -> bool {
        self.structure_at(cell).is_some()
    }

    /// Counts the cells in `cells` that hold a structure.
    #[must_use]
    pub fn count_occupied(&self, cells: &[CellCoord]) -> usize {
        cells
            .iter()
            .filter(|cell| self.contains_stationary_unit(**cell))
            .count()
    }
}

/// Snapshot of everything the decision systems may read during a turn.
#[derive(Clone, Copy, Debug)]
pub struct TurnView<'a> {
    turn_number: u32,
    resources: ResourcePool,
    structures: StructureView<'a>,
}

impl<'a> TurnView<'a> {
    /// Captures a new turn snapshot.
    #[must_use]
    pub const fn new(
        turn_number: u32,
        resources: ResourcePool,
        structures: StructureView<'a>,
    ) -> Self {
        Self {
            turn_number,
            resources,
            structures,
        }
    }

    /// Zero-based index of the turn being planned.
    #[must_use]
    pub const fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Friendly resource pools captured at turn start.
    #[must_use]
    pub const fn resources(&self) -> ResourcePool {
        self.resources
    }

    /// Structures present on the board at turn start.
    #[must_use]
    pub const fn structures(&self) -> StructureView<'a> {
        self.structures
    }
}
