//! Numeric policy knobs for the funnel cycle.

use serde::Deserialize;

/// How the attack lane is chosen while a funnel cycle is in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidePolicy {
    /// Every turn works on the lane surveyed that turn, even mid-cycle.
    #[default]
    Reevaluate,
    /// The lane surveyed when the funnel opened is kept until it closes.
    FreezeWhileOpen,
}

/// Thresholds and burst sizing used by the turn controller.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    /// Mobile resource required before the funnel opens.
    pub attack_threshold: f32,
    /// Scouts sent from each entry cell on turn zero.
    pub burst_base: u32,
    /// Every this many turns the burst grows by one scout per entry. Zero
    /// disables escalation.
    pub burst_escalation_turns: u32,
    /// Structure resource required before the extra shields are built.
    pub extra_shield_threshold: f32,
    /// Lane selection policy during an open cycle.
    pub side_policy: SidePolicy,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            attack_threshold: 16.0,
            burst_base: 11,
            burst_escalation_turns: 7,
            extra_shield_threshold: 15.0,
            side_policy: SidePolicy::Reevaluate,
        }
    }
}

impl Tuning {
    /// Scouts spawned at each entry cell during an attack on `turn_number`.
    #[must_use]
    pub fn burst_size(&self, turn_number: u32) -> u32 {
        let escalation = turn_number
            .checked_div(self.burst_escalation_turns)
            .unwrap_or(0);
        self.burst_base.saturating_add(escalation)
    }
}
