//! Build passes issued every turn after the funnel transition.
//!
//! Every pass emits requests unconditionally. Cells that are already built or
//! upgraded resolve to platform-side no-ops, so running a pass against a
//! finished board changes nothing.

use funnel_core::{CellCoord, Command, UnitKind};

use crate::{
    plans::{
        CORE_SHIELDS, CORNER_TURRETS, EXTRA_SHIELDS, EXTRA_TURRETS, SECOND_ROW, TURRET_LAYOUT,
        UPGRADE_TARGETS,
    },
    Tuning,
};

/// Lays down the turret perimeter and both corner turrets.
pub fn initial_setup(out: &mut Vec<Command>) {
    spawn_except(UnitKind::Turret, &TURRET_LAYOUT, &[], out);
    spawn_except(UnitKind::Turret, &CORNER_TURRETS, &[], out);
}

/// Rebuilds the perimeter and the extra turrets, skipping `held_open`.
pub fn repair(held_open: &[CellCoord], out: &mut Vec<Command>) {
    spawn_except(UnitKind::Turret, &TURRET_LAYOUT, held_open, out);
    spawn_except(UnitKind::Turret, &EXTRA_TURRETS, held_open, out);
}

/// Builds the second row, then upgrades the fixed targets ahead of the
/// second row itself, skipping `held_open`.
pub fn upgrade(held_open: &[CellCoord], out: &mut Vec<Command>) {
    spawn_except(UnitKind::Turret, &SECOND_ROW, held_open, out);
    upgrade_except(&UPGRADE_TARGETS, held_open, out);
    upgrade_except(&SECOND_ROW, held_open, out);
}

/// Spawns and upgrades each core shield, then the extra shields when the
/// turn-start structure pool reaches the threshold.
pub fn put_shields(structure_resource: f32, tuning: &Tuning, out: &mut Vec<Command>) {
    for &cell in &CORE_SHIELDS {
        out.push(Command::Spawn {
            kind: UnitKind::Support,
            cell,
        });
        out.push(Command::Upgrade { cell });
    }

    if structure_resource >= tuning.extra_shield_threshold {
        spawn_except(UnitKind::Support, &EXTRA_SHIELDS, &[], out);
        upgrade_except(&EXTRA_SHIELDS, &[], out);
    }
}

fn spawn_except(
    kind: UnitKind,
    cells: &[CellCoord],
    skip: &[CellCoord],
    out: &mut Vec<Command>,
) {
    out.extend(
        cells
            .iter()
            .filter(|cell| !skip.contains(*cell))
            .map(|&cell| Command::Spawn { kind, cell }),
    );
}

fn upgrade_except(cells: &[CellCoord], skip: &[CellCoord], out: &mut Vec<Command>) {
    out.extend(
        cells
            .iter()
            .filter(|cell| !skip.contains(*cell))
            .map(|&cell| Command::Upgrade { cell }),
    );
}
