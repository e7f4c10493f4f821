//! Action stacks committed to the platform at the end of a turn.

use funnel_core::CellCoord;
use serde::ser::{Serialize, SerializeTuple, Serializer};

/// One queued action, written on the wire as `[shorthand, x, y]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Action {
    shorthand: String,
    cell: CellCoord,
}

impl Action {
    /// Creates an action for the provided shorthand and cell.
    #[must_use]
    pub fn new(shorthand: impl Into<String>, cell: CellCoord) -> Self {
        Self {
            shorthand: shorthand.into(),
            cell,
        }
    }

    /// Platform shorthand for the unit or pseudo-action.
    #[must_use]
    pub fn shorthand(&self) -> &str {
        &self.shorthand
    }

    /// Cell the action targets.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.shorthand)?;
        tuple.serialize_element(&self.cell.column())?;
        tuple.serialize_element(&self.cell.row())?;
        tuple.end()
    }
}

/// Build and deploy stacks accumulated over a turn.
///
/// Structures, removals and upgrades share the build stack in issue order;
/// mobile units go to the deploy stack, which the platform resolves after
/// every build action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionBatch {
    build: Vec<Action>,
    deploy: Vec<Action>,
}

impl ActionBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_build(&mut self, action: Action) {
        self.build.push(action);
    }

    pub(crate) fn push_deploy(&mut self, action: Action) {
        self.deploy.push(action);
    }

    /// Actions resolved during the build step.
    #[must_use]
    pub fn build(&self) -> &[Action] {
        &self.build
    }

    /// Mobile units deployed after the build step.
    #[must_use]
    pub fn deploy(&self) -> &[Action] {
        &self.deploy
    }

    /// Reports whether no action was queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.build.is_empty() && self.deploy.is_empty()
    }

    /// Serializes the build stack as a single JSON line.
    pub fn build_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.build)
    }

    /// Serializes the deploy stack as a single JSON line.
    pub fn deploy_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.deploy)
    }
}
