#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn-cycle decision system for the funnel algo.
//!
//! The controller keeps a gap in the turret wall sealed until the mobile pool
//! can pay for a full attack, then runs a three-turn cycle: the gap turrets
//! are removed, a scout burst is sent through the open lane, and the gap is
//! rebuilt. Every turn, after the cycle step, the perimeter is repaired, the
//! second row and the upgrade targets are reinforced, and the shields behind
//! the line are topped up. The controller only reads the [`TurnView`] captured
//! at turn start and answers with a command batch for the platform to resolve.

pub mod passes;
pub mod plans;
mod tuning;

pub use tuning::{SidePolicy, Tuning};

use funnel_core::{CellCoord, Command, Side, TurnView, UnitKind};
use funnel_system_side_selection::{survey, LaneDensity};
use plans::FunnelPlan;
use tracing::{debug, info};

/// Posture of the funnel gap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FunnelState {
    /// The gap is sealed.
    #[default]
    Closed,
    /// The gap turrets were removed and the lane is open.
    Open,
    /// The attack went through; the gap is rebuilt next turn.
    PendingClose,
}

/// Funnel transition fired during a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FunnelTransition {
    /// The gap turrets were removed.
    Opened,
    /// Scouts were sent through the open lane.
    Attacked {
        /// Scouts requested at each entry cell.
        per_entry: u32,
    },
    /// The gap turrets were rebuilt.
    Closed,
}

/// Summary of the decisions taken during one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnReport {
    /// Turn the report describes.
    pub turn_number: u32,
    /// Lane the funnel cycle worked on.
    pub side: Side,
    /// Enemy structures counted over each lane.
    pub density: LaneDensity,
    /// Funnel state when the turn began.
    pub before: FunnelState,
    /// Funnel state after the turn.
    pub after: FunnelState,
    /// Transition fired during the turn, if any.
    pub transition: Option<FunnelTransition>,
    /// Number of commands issued during the turn.
    pub commands: usize,
}

/// Stateful turn planner that owns the funnel cycle.
#[derive(Clone, Debug)]
pub struct TurnController {
    tuning: Tuning,
    funnel: FunnelState,
    opened_on: Option<Side>,
}

impl Default for TurnController {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl TurnController {
    /// Creates a controller with a sealed funnel.
    #[must_use]
    pub const fn new(tuning: Tuning) -> Self {
        Self {
            tuning,
            funnel: FunnelState::Closed,
            opened_on: None,
        }
    }

    /// Current posture of the funnel gap.
    #[must_use]
    pub const fn funnel_state(&self) -> FunnelState {
        self.funnel
    }

    /// Lane whose gap was opened by the cycle in flight, if any.
    #[must_use]
    pub const fn opened_on(&self) -> Option<Side> {
        self.opened_on
    }

    /// Policy knobs the controller was built with.
    #[must_use]
    pub const fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Plans one turn, appending the commands to `out`.
    ///
    /// At most one funnel transition fires per call. Both resource guards
    /// read the pools captured in `view`, never an amount reduced by earlier
    /// commands of the same turn.
    pub fn on_turn(&mut self, view: &TurnView<'_>, out: &mut Vec<Command>) -> TurnReport {
        let issued_before = out.len();
        let before = self.funnel;
        let density = survey(view.structures());
        let side = self.active_side(density.side());

        if view.turn_number() == 0 {
            passes::initial_setup(out);
        }

        let transition = self.advance(view, side, out);

        let held_open = self.held_open();
        passes::repair(held_open, out);
        passes::upgrade(held_open, out);
        passes::put_shields(view.resources().structure(), &self.tuning, out);

        let report = TurnReport {
            turn_number: view.turn_number(),
            side,
            density,
            before,
            after: self.funnel,
            transition,
            commands: out.len() - issued_before,
        };
        info!(
            turn = report.turn_number,
            ?side,
            left = density.left,
            right = density.right,
            funnel = ?report.after,
            commands = report.commands,
            "turn planned"
        );
        report
    }

    fn active_side(&self, surveyed: Side) -> Side {
        match (self.tuning.side_policy, self.opened_on) {
            (SidePolicy::FreezeWhileOpen, Some(held)) => held,
            _ => surveyed,
        }
    }

    fn advance(
        &mut self,
        view: &TurnView<'_>,
        side: Side,
        out: &mut Vec<Command>,
    ) -> Option<FunnelTransition> {
        let plan = FunnelPlan::for_side(side);

        let transition = match self.funnel {
            FunnelState::PendingClose => {
                out.extend(plan.gap.iter().map(|&cell| Command::Spawn {
                    kind: UnitKind::Turret,
                    cell,
                }));
                self.funnel = FunnelState::Closed;
                self.opened_on = None;
                FunnelTransition::Closed
            }
            FunnelState::Open => {
                let per_entry = self.tuning.burst_size(view.turn_number());
                for &cell in &plan.entries {
                    for _ in 0..per_entry {
                        out.push(Command::Spawn {
                            kind: UnitKind::Scout,
                            cell,
                        });
                    }
                }
                self.funnel = FunnelState::PendingClose;
                FunnelTransition::Attacked { per_entry }
            }
            FunnelState::Closed
                if view.resources().mobile() >= self.tuning.attack_threshold =>
            {
                out.extend(plan.gap.iter().map(|&cell| Command::Remove { cell }));
                self.funnel = FunnelState::Open;
                self.opened_on = Some(side);
                FunnelTransition::Opened
            }
            FunnelState::Closed => return None,
        };

        debug!(?side, ?transition, "funnel transition");
        Some(transition)
    }

    fn held_open(&self) -> &'static [CellCoord] {
        match (self.funnel, self.opened_on) {
            (FunnelState::Open | FunnelState::PendingClose, Some(side)) => {
                &FunnelPlan::for_side(side).gap
            }
            _ => &[],
        }
    }
}
