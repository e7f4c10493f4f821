use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use funnel_system_turn_controller::{FunnelTransition, TurnController, Tuning};
use funnel_world::{self as world, query, TurnFrame, TurnPhase, UnitCatalog, World};
use tracing::{debug, info, warn};

/// What the session expects after consuming a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Keep reading input.
    Continue,
    /// The game is over.
    Stop,
}

/// Totals gathered over a whole game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Deploy frames answered with an action batch.
    pub turns_played: u32,
    /// Turns on which a scout burst was sent through the funnel.
    pub attacks_launched: u32,
    /// Whether the engine announced the end of the game before input ended.
    pub game_over: bool,
}

/// Protocol state for one game.
#[derive(Debug)]
pub struct Session {
    catalog: Option<UnitCatalog>,
    controller: TurnController,
    summary: SessionSummary,
}

impl Session {
    /// Creates a session waiting for the game configuration.
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        Self {
            catalog: None,
            controller: TurnController::new(tuning),
            summary: SessionSummary::default(),
        }
    }

    /// Totals gathered so far.
    #[must_use]
    pub const fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Consumes one line of engine input, writing any response to `out`.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Step> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Step::Continue);
        }

        if !line.contains("turnInfo") {
            if self.catalog.is_some() {
                warn!("ignoring repeated game configuration");
                return Ok(Step::Continue);
            }
            let catalog =
                UnitCatalog::from_config_json(line).context("failed to load game configuration")?;
            info!("game configuration loaded");
            self.catalog = Some(catalog);
            return Ok(Step::Continue);
        }

        let catalog = self
            .catalog
            .as_ref()
            .context("turn frame received before the game configuration")?;
        let frame = TurnFrame::from_json(line).context("failed to parse turn frame")?;

        match frame.phase {
            TurnPhase::Deploy => {
                let world = World::from_frame(catalog.clone(), &frame);
                self.play_turn(world, out)?;
                Ok(Step::Continue)
            }
            TurnPhase::ActionFrame => Ok(Step::Continue),
            TurnPhase::GameOver => {
                info!(turn = frame.turn_number, "game over");
                self.summary.game_over = true;
                Ok(Step::Stop)
            }
        }
    }

    fn play_turn<W: Write>(&mut self, mut world: World, out: &mut W) -> Result<()> {
        let mut commands = Vec::new();
        let report = self.controller.on_turn(&query::turn_view(&world), &mut commands);

        let mut outcomes = Vec::new();
        for command in commands {
            world::apply(&mut world, command, &mut outcomes);
        }
        let rejected = outcomes.iter().filter(|outcome| outcome.is_rejected()).count();
        debug!(
            turn = report.turn_number,
            transition = ?report.transition,
            issued = outcomes.len(),
            rejected,
            "commands resolved"
        );

        let batch = world.take_batch();
        writeln!(out, "{}", batch.build_json()?).context("failed to write build stack")?;
        out.flush().context("failed to flush build stack")?;
        writeln!(out, "{}", batch.deploy_json()?).context("failed to write deploy stack")?;
        out.flush().context("failed to flush deploy stack")?;

        self.summary.turns_played += 1;
        if matches!(report.transition, Some(FunnelTransition::Attacked { .. })) {
            self.summary.attacks_launched += 1;
        }
        Ok(())
    }
}

/// Drives a whole game, reading engine lines from `input` until the game is
/// over or the input ends.
pub fn run<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    tuning: Tuning,
) -> Result<SessionSummary> {
    let mut session = Session::new(tuning);

    for line in input.lines() {
        let line = line.context("failed to read engine input")?;
        if session.handle_line(&line, &mut output)? == Step::Stop {
            return Ok(session.summary());
        }
    }

    warn!("engine input closed before the game ended");
    Ok(session.summary())
}
