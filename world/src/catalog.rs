//! Unit metadata published once in the game-start payload.

use funnel_core::{ResourceCost, UnitKind};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_REMOVE_SHORTHAND: &str = "RM";
const DEFAULT_UPGRADE_SHORTHAND: &str = "UP";
const REMOVE_INDEX: usize = 6;
const UPGRADE_INDEX: usize = 7;

/// Errors raised while loading the game configuration. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The payload was not valid JSON or lacked `unitInformation`.
    #[error("could not parse game configuration: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// A unit kind the agent relies on has no catalog entry.
    #[error("unit catalog has no entry for {kind:?} at index {index}")]
    MissingUnit {
        /// Kind expected at the index.
        kind: UnitKind,
        /// Catalog position that was missing.
        index: usize,
    },
    /// A unit entry carries no shorthand identifier.
    #[error("unit catalog entry {index} has no shorthand")]
    MissingShorthand {
        /// Catalog position of the entry.
        index: usize,
    },
}

/// Metadata describing one unit kind.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitSpec {
    shorthand: String,
    cost: ResourceCost,
    upgrade_cost: ResourceCost,
}

impl UnitSpec {
    /// Creates a new unit description.
    #[must_use]
    pub fn new(
        shorthand: impl Into<String>,
        cost: ResourceCost,
        upgrade_cost: ResourceCost,
    ) -> Self {
        Self {
            shorthand: shorthand.into(),
            cost,
            upgrade_cost,
        }
    }

    /// Identifier the platform uses for the kind on the wire.
    #[must_use]
    pub fn shorthand(&self) -> &str {
        &self.shorthand
    }

    /// Price of placing one unit.
    #[must_use]
    pub const fn cost(&self) -> ResourceCost {
        self.cost
    }

    /// Price of upgrading a placed unit.
    #[must_use]
    pub const fn upgrade_cost(&self) -> ResourceCost {
        self.upgrade_cost
    }
}

/// Unit metadata for every kind, plus the remove and upgrade pseudo-actions.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitCatalog {
    units: Vec<UnitSpec>,
    remove_shorthand: String,
    upgrade_shorthand: String,
}

impl UnitCatalog {
    /// Parses the `unitInformation` table out of the game-start payload.
    pub fn from_config_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;

        let mut units = Vec::with_capacity(UnitKind::ALL.len());
        for kind in UnitKind::ALL {
            let index = kind.catalog_index();
            let entry = raw
                .unit_information
                .get(index)
                .ok_or(ConfigError::MissingUnit { kind, index })?;
            let shorthand = entry
                .shorthand
                .clone()
                .ok_or(ConfigError::MissingShorthand { index })?;
            let cost = ResourceCost::new(entry.cost1, entry.cost2);
            let upgrade_cost = entry.upgrade.as_ref().map_or(cost, |upgrade| {
                ResourceCost::new(
                    upgrade.cost1.unwrap_or(entry.cost1),
                    upgrade.cost2.unwrap_or(entry.cost2),
                )
            });
            units.push(UnitSpec::new(shorthand, cost, upgrade_cost));
        }

        let pseudo_shorthand = |index: usize, fallback: &str| {
            raw.unit_information
                .get(index)
                .and_then(|entry| entry.shorthand.clone())
                .unwrap_or_else(|| fallback.to_owned())
        };

        Ok(Self {
            units,
            remove_shorthand: pseudo_shorthand(REMOVE_INDEX, DEFAULT_REMOVE_SHORTHAND),
            upgrade_shorthand: pseudo_shorthand(UPGRADE_INDEX, DEFAULT_UPGRADE_SHORTHAND),
        })
    }

    /// Metadata for the provided kind.
    #[must_use]
    pub fn spec(&self, kind: UnitKind) -> &UnitSpec {
        &self.units[kind.catalog_index()]
    }

    /// Shorthand that marks a removal in the build stack.
    #[must_use]
    pub fn remove_shorthand(&self) -> &str {
        &self.remove_shorthand
    }

    /// Shorthand that marks an upgrade in the build stack.
    #[must_use]
    pub fn upgrade_shorthand(&self) -> &str {
        &self.upgrade_shorthand
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    unit_information: Vec<RawUnit>,
}

#[derive(Debug, Deserialize)]
struct RawUnit {
    shorthand: Option<String>,
    #[serde(default)]
    cost1: f32,
    #[serde(default)]
    cost2: f32,
    #[serde(default)]
    upgrade: Option<RawUpgrade>,
}

#[derive(Debug, Deserialize)]
struct RawUpgrade {
    cost1: Option<f32>,
    cost2: Option<f32>,
}
