//! Undo/redo history with a two-phase commit protocol.
//!
//! An [`Action`] goes through `Uninitialized → Draft → Committed`:
//! - `init` records the operation and snapshots the attributes it touches;
//! - the first `execute` (or an explicit `commit` after an interactive
//!   gesture) snapshots the resulting values;
//! - from then on `execute`/`undo` only replay the two snapshots.
//!
//! [`UndoService`] keeps the actions in order together with the number of
//! applied ones. Starting a new action drops everything that was undone.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use pathforge_core::{EditorSettings, HistoryError, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::node::{AttrValue, NodeHost, NodeId, PATH_DATA_ATTR};
use crate::path::CommandType;
use crate::transform::TransformAction;

/// Attribute values keyed by node and attribute name. `None` records an
/// absent attribute so that it is removed again on restore.
pub type Snapshot = BTreeMap<(NodeId, String), Option<AttrValue>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionState {
    Uninitialized,
    Draft,
    Committed,
}

/// A structural edit of a path node's data.
#[derive(Debug, Clone, PartialEq)]
pub enum PathEdit {
    RemoveCommand(usize),
    RemoveSegment(usize),
    ConvertCommand { index: usize, to: CommandType },
    SplitCommand { index: usize, t: f64 },
    MovePoint { index: usize, to: Point },
    CloseSegment(usize),
}

/// What an action does the first time it executes.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// An interactive gesture; the node is mutated by pointer moves and the
    /// action is committed when the gesture ends.
    Transform(TransformAction),
    PathEdit { node: NodeId, edit: PathEdit },
    SetAttributes {
        node: NodeId,
        values: Vec<(String, Option<AttrValue>)>,
    },
}

impl Operation {
    fn touched(&self) -> Vec<(NodeId, String)> {
        match self {
            Operation::Transform(transform) => transform
                .target()
                .map(|target| {
                    target
                        .attributes()
                        .iter()
                        .map(|name| (transform.node(), name.to_string()))
                        .collect()
                })
                .unwrap_or_default(),
            Operation::PathEdit { node, .. } => vec![(*node, PATH_DATA_ATTR.to_string())],
            Operation::SetAttributes { node, values } => values
                .iter()
                .map(|(name, _)| (*node, name.clone()))
                .collect(),
        }
    }

    fn perform(&self, host: &mut dyn NodeHost) -> Result<(), HistoryError> {
        match self {
            Operation::Transform(_) => Ok(()),
            Operation::PathEdit { node, edit } => {
                let mut data = host.path_data(*node)?;
                match edit {
                    PathEdit::RemoveCommand(index) => data.remove_command(*index)?,
                    PathEdit::RemoveSegment(index) => data.remove_segment(*index)?,
                    PathEdit::ConvertCommand { index, to } => data.convert_command(*index, *to)?,
                    PathEdit::SplitCommand { index, t } => data.split_command(*index, *t)?,
                    PathEdit::MovePoint { index, to } => data.set_point(*index, *to)?,
                    PathEdit::CloseSegment(index) => data.close_segment(*index)?,
                }
                host.set_attribute(*node, PATH_DATA_ATTR, Some(AttrValue::Path(data)))?;
                Ok(())
            }
            Operation::SetAttributes { node, values } => {
                for (name, value) in values {
                    host.set_attribute(*node, name, value.clone())?;
                }
                Ok(())
            }
        }
    }
}

/// One undoable step.
#[derive(Debug, Clone)]
pub struct Action {
    id: Uuid,
    label: String,
    created_at: DateTime<Utc>,
    state: ActionState,
    operation: Option<Operation>,
    initial_values: Snapshot,
    committed_values: Snapshot,
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

fn capture(host: &dyn NodeHost, keys: &[(NodeId, String)]) -> Snapshot {
    keys.iter()
        .map(|(node, name)| ((*node, name.clone()), host.attribute(*node, name)))
        .collect()
}

fn restore(host: &mut dyn NodeHost, snapshot: &Snapshot) -> Result<(), HistoryError> {
    for ((node, name), value) in snapshot {
        host.set_attribute(*node, name, value.clone())?;
    }
    Ok(())
}

impl Action {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            created_at: Utc::now(),
            state: ActionState::Uninitialized,
            operation: None,
            initial_values: Snapshot::new(),
            committed_values: Snapshot::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn is_committed(&self) -> bool {
        self.state == ActionState::Committed
    }

    pub fn operation(&self) -> Option<&Operation> {
        self.operation.as_ref()
    }

    pub fn initial_values(&self) -> &Snapshot {
        &self.initial_values
    }

    pub fn committed_values(&self) -> &Snapshot {
        &self.committed_values
    }

    /// Attaches the operation and snapshots the values it will change.
    ///
    /// A transform operation captures its starting geometry here.
    pub fn init(&mut self, host: &dyn NodeHost, mut operation: Operation) -> Result<(), HistoryError> {
        if self.state != ActionState::Uninitialized {
            return Err(HistoryError::InvalidOperation {
                reason: format!("action '{}' is already initialized", self.label),
            });
        }
        if let Operation::Transform(transform) = &mut operation {
            transform.init(host)?;
        }
        self.operation = Some(operation);
        self.state = ActionState::Draft;
        self.save_initial_value(host);
        Ok(())
    }

    /// Snapshots the current values of every attribute the operation touches.
    pub fn save_initial_value(&mut self, host: &dyn NodeHost) {
        let keys = self.operation.as_ref().map(Operation::touched).unwrap_or_default();
        self.initial_values = capture(host, &keys);
    }

    /// Freezes the current values as the redo snapshot.
    pub fn commit(&mut self, host: &dyn NodeHost) -> Result<(), HistoryError> {
        match self.state {
            ActionState::Uninitialized => Err(HistoryError::NotInitialized {
                label: self.label.clone(),
            }),
            ActionState::Committed => Ok(()),
            ActionState::Draft => {
                let keys: Vec<(NodeId, String)> = self.initial_values.keys().cloned().collect();
                self.committed_values = capture(host, &keys);
                self.state = ActionState::Committed;
                tracing::debug!(label = %self.label, "Action committed");
                Ok(())
            }
        }
    }

    /// Forwards a pointer move to an uncommitted transform.
    pub fn transform_by_mouse(&mut self, host: &mut dyn NodeHost, screen: Point) -> bool {
        if self.state != ActionState::Draft {
            return false;
        }
        match &mut self.operation {
            Some(Operation::Transform(transform)) => transform.transform_by_mouse(host, screen),
            _ => false,
        }
    }

    pub fn can_execute(&self) -> bool {
        self.state != ActionState::Uninitialized
    }

    pub fn can_undo(&self) -> bool {
        self.state == ActionState::Committed
    }

    /// Performs the operation the first time, replays the redo snapshot
    /// afterwards.
    pub fn execute(&mut self, host: &mut dyn NodeHost) -> Result<(), HistoryError> {
        match self.state {
            ActionState::Uninitialized => Err(HistoryError::NotInitialized {
                label: self.label.clone(),
            }),
            ActionState::Draft => {
                if let Some(operation) = &self.operation {
                    if let Err(err) = operation.perform(host) {
                        // Roll back whatever part of the operation was applied.
                        restore(host, &self.initial_values)?;
                        return Err(err);
                    }
                }
                self.commit(host)
            }
            ActionState::Committed => restore(host, &self.committed_values),
        }
    }

    pub fn undo(&mut self, host: &mut dyn NodeHost) -> Result<(), HistoryError> {
        match self.state {
            ActionState::Uninitialized => Err(HistoryError::NotInitialized {
                label: self.label.clone(),
            }),
            ActionState::Draft => Err(HistoryError::NotCommitted {
                label: self.label.clone(),
            }),
            ActionState::Committed => restore(host, &self.initial_values),
        }
    }
}

/// Serializable view of one history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSummary {
    pub id: Uuid,
    pub label: String,
    pub created_at: DateTime<Utc>,
    pub state: ActionState,
    pub applied: bool,
}

/// Linear undo/redo history.
#[derive(Debug, Clone)]
pub struct UndoService {
    actions: Vec<Action>,
    /// Number of leading actions currently applied.
    applied: usize,
    max_depth: usize,
}

impl Default for UndoService {
    fn default() -> Self {
        Self::from_settings(&EditorSettings::default())
    }
}

impl UndoService {
    pub fn new(max_depth: usize) -> Self {
        Self {
            actions: Vec::new(),
            applied: 0,
            max_depth: max_depth.max(1),
        }
    }

    pub fn from_settings(settings: &EditorSettings) -> Self {
        Self::new(settings.history_depth)
    }

    /// A fresh, uninitialized action.
    pub fn get_action(&self, label: impl Into<String>) -> Action {
        Action::new(label)
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Index of the most recently applied action.
    pub fn active_index(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    pub fn active_action(&self) -> Option<&Action> {
        self.active_index().and_then(|i| self.actions.get(i))
    }

    /// The newest action, typically an interactive transform still in progress.
    pub fn last_action_mut(&mut self) -> Option<&mut Action> {
        self.actions.last_mut()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Appends `action`, executing it first when `execute` is set.
    ///
    /// Every undone action is discarded. When the history grows past its
    /// depth the oldest entries are dropped.
    ///
    /// # Panics
    ///
    /// Panics if the newest action has not been committed; an open
    /// transaction must be committed or removed first.
    pub fn start_action(
        &mut self,
        host: &mut dyn NodeHost,
        mut action: Action,
        execute: bool,
    ) -> Result<(), HistoryError> {
        if let Some(last) = self.actions.last() {
            assert!(
                last.is_committed(),
                "cannot start '{}' while '{}' is uncommitted",
                action.label,
                last.label
            );
        }

        if execute {
            if let Err(err) = action.execute(host) {
                tracing::error!(label = %action.label, %err, "Action failed, not recorded");
                return Err(err);
            }
        }

        if self.applied < self.actions.len() {
            tracing::debug!(dropped = self.actions.len() - self.applied, "Discarding redo branch");
            self.actions.truncate(self.applied);
        }
        tracing::debug!(label = %action.label, execute, "Action started");
        self.actions.push(action);
        self.applied = self.actions.len();
        self.trim_to_depth(self.max_depth);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.active_action().is_some_and(Action::can_undo)
    }

    pub fn can_redo(&self) -> bool {
        self.actions
            .get(self.applied)
            .is_some_and(Action::can_execute)
    }

    /// Undoes the active action. Returns `false` when there is nothing to
    /// undo or the step failed.
    pub fn undo(&mut self, host: &mut dyn NodeHost) -> bool {
        let Some(index) = self.active_index() else {
            return false;
        };
        let action = &mut self.actions[index];
        if !action.can_undo() {
            return false;
        }
        match action.undo(host) {
            Ok(()) => {
                self.applied -= 1;
                true
            }
            Err(err) => {
                tracing::error!(label = %action.label, %err, "Undo failed");
                false
            }
        }
    }

    /// Re-applies the next undone action.
    pub fn redo(&mut self, host: &mut dyn NodeHost) -> bool {
        let Some(action) = self.actions.get_mut(self.applied) else {
            return false;
        };
        if !action.can_execute() {
            return false;
        }
        match action.execute(host) {
            Ok(()) => {
                self.applied += 1;
                true
            }
            Err(err) => {
                tracing::error!(label = %action.label, %err, "Redo failed");
                false
            }
        }
    }

    /// Steps back or forward until the action with `id` is the active one.
    ///
    /// Stops at the first failing step and keeps the steps already taken;
    /// returns whether the target was reached.
    pub fn go_to_action(&mut self, host: &mut dyn NodeHost, id: Uuid) -> Result<bool, HistoryError> {
        let target = self
            .actions
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| HistoryError::UnknownAction { id: id.to_string() })?;

        while self.applied > target + 1 {
            if !self.undo(host) {
                return Ok(false);
            }
        }
        while self.applied < target + 1 {
            if !self.redo(host) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Drops an action without undoing it, typically an abandoned gesture.
    pub fn remove(&mut self, id: Uuid) -> Option<Action> {
        let index = self.actions.iter().position(|a| a.id == id)?;
        if index < self.applied {
            self.applied -= 1;
        }
        Some(self.actions.remove(index))
    }

    pub fn undo_depth(&self) -> usize {
        self.applied
    }

    pub fn redo_depth(&self) -> usize {
        self.actions.len() - self.applied
    }

    pub fn undo_description(&self) -> Option<String> {
        self.active_action().map(|a| a.label.clone())
    }

    pub fn redo_description(&self) -> Option<String> {
        self.actions.get(self.applied).map(|a| a.label.clone())
    }

    /// Drops the oldest actions until at most `depth` remain.
    pub fn trim_to_depth(&mut self, depth: usize) {
        if self.actions.len() > depth {
            let excess = self.actions.len() - depth;
            self.actions.drain(..excess);
            self.applied = self.applied.saturating_sub(excess);
        }
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.applied = 0;
    }

    pub fn summary(&self) -> Vec<ActionSummary> {
        self.actions
            .iter()
            .enumerate()
            .map(|(i, a)| ActionSummary {
                id: a.id,
                label: a.label.clone(),
                created_at: a.created_at,
                state: a.state,
                applied: i < self.applied,
            })
            .collect()
    }

    pub fn summary_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.summary())
    }
}
