#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Local mirror of the game platform for the funnel algo.
//!
//! The world is rebuilt from every deploy frame the platform streams. It
//! answers the read-only queries decision systems rely on, resolves their
//! [`Command`] requests the way the platform does (arena legality, occupancy
//! and cost), and accumulates the accepted actions into the
//! [`ActionBatch`] that is committed at the end of the turn. Requests that
//! cannot take effect resolve to a rejected [`Outcome`] and leave the world
//! untouched.

pub mod arena;
mod batch;
mod catalog;
mod frame;

pub use batch::{Action, ActionBatch};
pub use catalog::{ConfigError, UnitCatalog, UnitSpec};
pub use frame::{PlayerStats, StateError, TurnFrame, TurnPhase, UnitGroups};

use funnel_core::{
    CellCoord, Command, Outcome, Player, RejectionReason, ResourcePool, Structure,
    StructureView, UnitKind, ARENA_CELLS,
};
use tracing::debug;

/// Represents the board, pools and pending actions for the current turn.
#[derive(Debug)]
pub struct World {
    catalog: UnitCatalog,
    turn_number: u32,
    opening_resources: ResourcePool,
    resources: ResourcePool,
    board: Vec<Option<Structure>>,
    batch: ActionBatch,
}

impl World {
    /// Creates an empty turn-zero world with drained resource pools.
    #[must_use]
    pub fn new(catalog: UnitCatalog) -> Self {
        Self {
            catalog,
            turn_number: 0,
            opening_resources: ResourcePool::default(),
            resources: ResourcePool::default(),
            board: vec![None; ARENA_CELLS],
            batch: ActionBatch::new(),
        }
    }

    /// Rebuilds the world from a frame streamed by the platform.
    #[must_use]
    pub fn from_frame(catalog: UnitCatalog, frame: &TurnFrame) -> Self {
        let mut world = Self::new(catalog);
        world.turn_number = frame.turn_number;
        world.opening_resources = frame.own.resources;
        world.resources = frame.own.resources;
        world.load_units(Player::Own, &frame.own_units);
        world.load_units(Player::Enemy, &frame.enemy_units);
        world
    }

    /// Places a structure without charging for it, returning `false` when
    /// the cell is off the board or already occupied.
    pub fn place_structure(&mut self, cell: CellCoord, structure: Structure) -> bool {
        let Some(slot) = cell.board_index().and_then(|index| self.board.get_mut(index)) else {
            return false;
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(structure);
        true
    }

    /// Rolls the world over to the next turn for offline replays: structures
    /// marked for removal leave the board, the batch is discarded and the
    /// provided pools become the new opening balance.
    pub fn advance_turn(&mut self, resources: ResourcePool) {
        for slot in &mut self.board {
            if slot.is_some_and(|structure| structure.pending_removal) {
                *slot = None;
            }
        }
        self.turn_number = self.turn_number.saturating_add(1);
        self.opening_resources = resources;
        self.resources = resources;
        self.batch = ActionBatch::new();
    }

    /// Hands over the actions accepted so far, leaving an empty batch behind.
    pub fn take_batch(&mut self) -> ActionBatch {
        std::mem::take(&mut self.batch)
    }

    fn load_units(&mut self, owner: Player, units: &UnitGroups) {
        for &(kind, cell) in &units.structures {
            if !self.place_structure(cell, Structure::new(kind, owner)) {
                debug!(?owner, ?kind, ?cell, "skipping structure on unusable cell");
            }
        }
        for &cell in &units.removals {
            if let Some(structure) = self.structure_mut(cell) {
                structure.pending_removal = true;
            }
        }
        for &cell in &units.upgrades {
            if let Some(structure) = self.structure_mut(cell) {
                structure.upgraded = true;
            }
        }
    }

    fn structure_mut(&mut self, cell: CellCoord) -> Option<&mut Structure> {
        let index = cell.board_index()?;
        self.board.get_mut(index)?.as_mut()
    }

    fn own_structure_mut(&mut self, cell: CellCoord) -> Result<&mut Structure, RejectionReason> {
        self.structure_mut(cell)
            .filter(|structure| structure.owner == Player::Own)
            .ok_or(RejectionReason::NoStructure)
    }

    fn try_spawn(&mut self, kind: UnitKind, cell: CellCoord) -> Result<(), RejectionReason> {
        if !arena::in_arena_bounds(cell) {
            return Err(RejectionReason::OutOfBounds);
        }
        if !cell.is_friendly() {
            return Err(RejectionReason::EnemyTerritory);
        }
        if !kind.is_structure() && !arena::is_friendly_edge(cell) {
            return Err(RejectionReason::NotOnEdge);
        }
        if StructureView::new(&self.board).contains_stationary_unit(cell) {
            return Err(RejectionReason::Occupied);
        }

        let spec = self.catalog.spec(kind);
        if !self.resources.try_spend(spec.cost()) {
            return Err(RejectionReason::InsufficientResources);
        }
        let action = Action::new(spec.shorthand(), cell);

        if kind.is_structure() {
            let placed = self.place_structure(cell, Structure::new(kind, Player::Own));
            debug_assert!(placed, "{cell:?} was checked free before spawning");
            self.batch.push_build(action);
        } else {
            self.batch.push_deploy(action);
        }
        Ok(())
    }

    fn try_remove(&mut self, cell: CellCoord) -> Result<(), RejectionReason> {
        let structure = self.own_structure_mut(cell)?;
        if structure.pending_removal {
            return Err(RejectionReason::PendingRemoval);
        }
        structure.pending_removal = true;

        let action = Action::new(self.catalog.remove_shorthand(), cell);
        self.batch.push_build(action);
        Ok(())
    }

    fn try_upgrade(&mut self, cell: CellCoord) -> Result<(), RejectionReason> {
        let structure = self.own_structure_mut(cell)?;
        if structure.upgraded {
            return Err(RejectionReason::AlreadyUpgraded);
        }
        let kind = structure.kind;

        let cost = self.catalog.spec(kind).upgrade_cost();
        if !self.resources.try_spend(cost) {
            return Err(RejectionReason::InsufficientResources);
        }
        self.own_structure_mut(cell)?.upgraded = true;

        let action = Action::new(self.catalog.upgrade_shorthand(), cell);
        self.batch.push_build(action);
        Ok(())
    }
}

/// Resolves the provided command against the world and reports the outcome.
pub fn apply(world: &mut World, command: Command, out_outcomes: &mut Vec<Outcome>) {
    let outcome = match command {
        Command::Spawn { kind, cell } => match world.try_spawn(kind, cell) {
            Ok(()) => Outcome::Spawned { kind, cell },
            Err(reason) => Outcome::SpawnRejected { kind, cell, reason },
        },
        Command::Remove { cell } => match world.try_remove(cell) {
            Ok(()) => Outcome::Removed { cell },
            Err(reason) => Outcome::RemovalRejected { cell, reason },
        },
        Command::Upgrade { cell } => match world.try_upgrade(cell) {
            Ok(()) => Outcome::Upgraded { cell },
            Err(reason) => Outcome::UpgradeRejected { cell, reason },
        },
    };

    if outcome.is_rejected() {
        debug!(?outcome, "command had no effect");
    }
    out_outcomes.push(outcome);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{ActionBatch, UnitCatalog, World};
    use funnel_core::{CellCoord, Resource, ResourcePool, Structure, StructureView, TurnView};

    pub use crate::arena::{in_arena_bounds, is_friendly_edge};

    /// Zero-based index of the current turn.
    #[must_use]
    pub fn turn_number(world: &World) -> u32 {
        world.turn_number
    }

    /// Amount currently left in the requested pool, net of accepted commands.
    #[must_use]
    pub fn resource(world: &World, resource: Resource) -> f32 {
        world.resources.get(resource)
    }

    /// Pools reported by the platform when the turn began.
    #[must_use]
    pub fn opening_resources(world: &World) -> ResourcePool {
        world.opening_resources
    }

    /// Unit metadata the world resolves commands with.
    #[must_use]
    pub fn catalog(world: &World) -> &UnitCatalog {
        &world.catalog
    }

    /// Exposes a read-only view of the structure grid.
    #[must_use]
    pub fn structure_view(world: &World) -> StructureView<'_> {
        StructureView::new(&world.board)
    }

    /// Returns the structure occupying the provided cell, if any.
    #[must_use]
    pub fn structure_at(world: &World, cell: CellCoord) -> Option<Structure> {
        structure_view(world).structure_at(cell).copied()
    }

    /// Reports whether a structure of either player occupies the cell.
    #[must_use]
    pub fn contains_stationary_unit(world: &World, cell: CellCoord) -> bool {
        structure_view(world).contains_stationary_unit(cell)
    }

    /// Captures the turn-start snapshot handed to decision systems.
    #[must_use]
    pub fn turn_view(world: &World) -> TurnView<'_> {
        TurnView::new(
            world.turn_number,
            world.opening_resources,
            structure_view(world),
        )
    }

    /// Actions accepted so far this turn.
    #[must_use]
    pub fn pending_batch(world: &World) -> &ActionBatch {
        &world.batch
    }
}
