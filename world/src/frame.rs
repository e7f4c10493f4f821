//! Parsing of the per-turn state frames streamed by the platform.

use funnel_core::{CellCoord, ResourcePool, UnitKind};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

const REMOVAL_GROUP: usize = 6;
const UPGRADE_GROUP: usize = 7;

/// Errors raised while parsing a turn frame.
#[derive(Debug, Error)]
pub enum StateError {
    /// The frame was not valid JSON or lacked `turnInfo`.
    #[error("could not parse turn state: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// A positional array held fewer values than required.
    #[error("turn state field `{field}` holds {found} values, expected at least {expected}")]
    ShortField {
        /// Name of the offending field.
        field: &'static str,
        /// Number of values present.
        found: usize,
        /// Number of values required.
        expected: usize,
    },
    /// The frame declared a phase the agent does not know.
    #[error("turn state phase {0} is not recognised")]
    UnknownPhase(i64),
    /// The frame declared a negative turn number.
    #[error("turn number {0} is invalid")]
    InvalidTurnNumber(i64),
    /// A unit row lacked non-negative integer coordinates.
    #[error("unit row {row} of group {group} in `{field}` is malformed")]
    InvalidUnitRow {
        /// Name of the unit field.
        field: &'static str,
        /// Catalog group the row belongs to.
        group: usize,
        /// Position of the row inside the group.
        row: usize,
    },
}

/// Stage of the turn a frame describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    /// Players may queue actions.
    Deploy,
    /// Intermediate frame of the action phase.
    ActionFrame,
    /// The match finished.
    GameOver,
}

/// Per-player statistics reported with every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerStats {
    /// Remaining health points.
    pub health: f32,
    /// Resources available for the turn.
    pub resources: ResourcePool,
}

/// Units a player holds on the board, grouped by what the platform reports.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnitGroups {
    /// Structures and the cells they occupy.
    pub structures: Vec<(UnitKind, CellCoord)>,
    /// Cells whose structure is scheduled for removal.
    pub removals: Vec<CellCoord>,
    /// Cells whose structure has been upgraded.
    pub upgrades: Vec<CellCoord>,
}

/// Parsed turn frame.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnFrame {
    /// Stage of the turn.
    pub phase: TurnPhase,
    /// Zero-based turn index.
    pub turn_number: u32,
    /// Statistics of the player running the agent.
    pub own: PlayerStats,
    /// Statistics of the opponent.
    pub enemy: PlayerStats,
    /// Units owned by the player running the agent.
    pub own_units: UnitGroups,
    /// Units owned by the opponent.
    pub enemy_units: UnitGroups,
}

impl TurnFrame {
    /// Parses a frame from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, StateError> {
        let raw: RawFrame = serde_json::from_str(json)?;

        let [phase, turn_number, ..] = raw.turn_info[..] else {
            return Err(StateError::ShortField {
                field: "turnInfo",
                found: raw.turn_info.len(),
                expected: 2,
            });
        };
        let phase = match phase {
            0 => TurnPhase::Deploy,
            1 => TurnPhase::ActionFrame,
            2 => TurnPhase::GameOver,
            other => return Err(StateError::UnknownPhase(other)),
        };
        let turn_number =
            u32::try_from(turn_number).map_err(|_| StateError::InvalidTurnNumber(turn_number))?;

        Ok(Self {
            phase,
            turn_number,
            own: parse_stats("p1Stats", &raw.p1_stats)?,
            enemy: parse_stats("p2Stats", &raw.p2_stats)?,
            own_units: parse_units("p1Units", &raw.p1_units)?,
            enemy_units: parse_units("p2Units", &raw.p2_units)?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFrame {
    turn_info: Vec<i64>,
    p1_stats: Vec<f32>,
    p2_stats: Vec<f32>,
    #[serde(default)]
    p1_units: Vec<Vec<Vec<Value>>>,
    #[serde(default)]
    p2_units: Vec<Vec<Vec<Value>>>,
}

fn parse_stats(field: &'static str, values: &[f32]) -> Result<PlayerStats, StateError> {
    // [health, structure, mobile, time]
    let [health, structure, mobile, ..] = values[..] else {
        return Err(StateError::ShortField {
            field,
            found: values.len(),
            expected: 3,
        });
    };
    Ok(PlayerStats {
        health,
        resources: ResourcePool::new(structure, mobile),
    })
}

fn parse_units(field: &'static str, groups: &[Vec<Vec<Value>>]) -> Result<UnitGroups, StateError> {
    let mut units = UnitGroups::default();

    for (group, rows) in groups.iter().enumerate() {
        for (row, values) in rows.iter().enumerate() {
            let cell = parse_cell(values).ok_or(StateError::InvalidUnitRow { field, group, row })?;
            match group {
                REMOVAL_GROUP => units.removals.push(cell),
                UPGRADE_GROUP => units.upgrades.push(cell),
                _ => {
                    if let Some(kind) = UnitKind::from_catalog_index(group) {
                        if kind.is_structure() {
                            units.structures.push((kind, cell));
                        }
                    }
                }
            }
        }
    }

    Ok(units)
}

fn parse_cell(values: &[Value]) -> Option<CellCoord> {
    let coordinate = |value: Option<&Value>| {
        value
            .and_then(Value::as_u64)
            .and_then(|raw| u32::try_from(raw).ok())
    };
    Some(CellCoord::new(
        coordinate(values.first())?,
        coordinate(values.get(1))?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: &str = r#"{
        "p2Units": [
            [[4, 18, 60.0, "11"]], [], [[23, 16, 75.0, "12"]], [], [], [], [], [[23, 16, 0.0, "12"]]
        ],
        "turnInfo": [0, 14, -1, 3012],
        "p1Stats": [30.0, 17.5, 16.0, 1204],
        "p1Units": [
            [], [], [[3, 13, 75.0, "3"], [1, 12, 75.0, "4"]], [[14, 0, 15.0, "5"]], [], [],
            [[1, 12, 75.0, "4"]], []
        ],
        "p2Stats": [28.0, 9.0, 4.0, 877],
        "events": {"breach": []}
    }"#;

    #[test]
    fn parses_turn_info_and_stats() {
        let frame = TurnFrame::from_json(FRAME).expect("frame parses");
        assert_eq!(frame.phase, TurnPhase::Deploy);
        assert_eq!(frame.turn_number, 14);
        assert_eq!(frame.own.resources, ResourcePool::new(17.5, 16.0));
        assert_eq!(frame.enemy.resources, ResourcePool::new(9.0, 4.0));
        assert!((frame.own.health - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn groups_structures_and_markers_ignoring_mobile_units() {
        let frame = TurnFrame::from_json(FRAME).expect("frame parses");
        assert_eq!(
            frame.own_units.structures,
            vec![
                (UnitKind::Turret, CellCoord::new(3, 13)),
                (UnitKind::Turret, CellCoord::new(1, 12)),
            ]
        );
        assert_eq!(frame.own_units.removals, vec![CellCoord::new(1, 12)]);
        assert_eq!(frame.enemy_units.upgrades, vec![CellCoord::new(23, 16)]);
        assert_eq!(frame.enemy_units.structures.len(), 2);
    }

    #[test]
    fn recognises_action_and_end_frames() {
        let action = r#"{"turnInfo": [1, 3, 12], "p1Stats": [30, 1, 2, 0], "p2Stats": [30, 1, 2, 0]}"#;
        let over = r#"{"turnInfo": [2, 40, 80], "p1Stats": [0, 1, 2, 0], "p2Stats": [9, 1, 2, 0]}"#;
        assert_eq!(
            TurnFrame::from_json(action).expect("parses").phase,
            TurnPhase::ActionFrame
        );
        assert_eq!(
            TurnFrame::from_json(over).expect("parses").phase,
            TurnPhase::GameOver
        );
    }

    #[test]
    fn short_stats_are_reported() {
        let frame = r#"{"turnInfo": [0, 1], "p1Stats": [30, 1], "p2Stats": [30, 1, 2, 0]}"#;
        let error = TurnFrame::from_json(frame).expect_err("frame must fail");
        assert!(matches!(
            error,
            StateError::ShortField {
                field: "p1Stats",
                found: 2,
                expected: 3
            }
        ));
    }

    #[test]
    fn unknown_phase_is_reported() {
        let frame = r#"{"turnInfo": [5, 1], "p1Stats": [30, 1, 2], "p2Stats": [30, 1, 2]}"#;
        assert!(matches!(
            TurnFrame::from_json(frame),
            Err(StateError::UnknownPhase(5))
        ));
    }

    #[test]
    fn negative_coordinates_are_malformed() {
        let frame = r#"{
            "turnInfo": [0, 1], "p1Stats": [30, 1, 2], "p2Stats": [30, 1, 2],
            "p1Units": [[[-1, 3, 10, "1"]]]
        }"#;
        assert!(matches!(
            TurnFrame::from_json(frame),
            Err(StateError::InvalidUnitRow {
                field: "p1Units",
                group: 0,
                row: 0
            })
        ));
    }

    #[test]
    fn fractional_coordinates_are_malformed() {
        let frame = r#"{
            "turnInfo": [0, 1], "p1Stats": [30, 1, 2], "p2Stats": [30, 1, 2],
            "p2Units": [[], [], [[3.7, 13, 10, "1"]]]
        }"#;
        assert!(matches!(
            TurnFrame::from_json(frame),
            Err(StateError::InvalidUnitRow {
                field: "p2Units",
                group: 2,
                row: 0
            })
        ));
    }

    #[test]
    fn short_turn_info_is_reported() {
        let frame = r#"{"turnInfo": [0], "p1Stats": [30, 1, 2], "p2Stats": [30, 1, 2]}"#;
        assert!(matches!(
            TurnFrame::from_json(frame),
            Err(StateError::ShortField {
                field: "turnInfo",
                found: 1,
                expected: 2
            })
        ));
    }

    #[test]
    fn negative_turn_number_is_reported() {
        let frame = r#"{"turnInfo": [0, -3], "p1Stats": [30, 1, 2], "p2Stats": [30, 1, 2]}"#;
        assert!(matches!(
            TurnFrame::from_json(frame),
            Err(StateError::InvalidTurnNumber(-3))
        ));
    }
}
