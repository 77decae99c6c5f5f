//! Undo/redo task manager.
//!
//! Every change is recorded as a [`Task`] wrapping a command that knows how
//! to apply and revert itself against a target. Tasks carry a group id; undo
//! and redo always replay a whole group, so a user action that produced
//! several tasks (removing a node together with its links, moving a
//! selection) is reverted in one step.
//!
//! Groups are opened explicitly with [`TaskManager::begin_action`] or
//! implicitly by the diagram with [`TaskManager::begin_implicit`], which
//! joins an already open group instead of nesting.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use flowkit_core::DiagramError;

/// A reversible change applied to a `T`.
pub trait Command<T> {
    /// Applies (or re-applies) the change.
    fn apply(&mut self, target: &mut T);

    /// Reverts the change.
    fn undo(&mut self, target: &mut T);

    /// Returns the name of the command for display.
    fn name(&self) -> &str;
}

/// Kind of user action a group of tasks belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActionCode {
    /// Idle marker; never opens a group
    #[default]
    None,
    Create,
    Delete,
    Move,
    Resize,
    Stretch,
    Relink,
    Restyle,
    EditText,
    Reorder,
    Clear,
    /// Host-defined action
    Custom(u32),
}

impl fmt::Display for ActionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionCode::None => f.write_str("none"),
            ActionCode::Create => f.write_str("create"),
            ActionCode::Delete => f.write_str("delete"),
            ActionCode::Move => f.write_str("move"),
            ActionCode::Resize => f.write_str("resize"),
            ActionCode::Stretch => f.write_str("stretch"),
            ActionCode::Relink => f.write_str("relink"),
            ActionCode::Restyle => f.write_str("restyle"),
            ActionCode::EditText => f.write_str("edit text"),
            ActionCode::Reorder => f.write_str("reorder"),
            ActionCode::Clear => f.write_str("clear"),
            ActionCode::Custom(code) => write!(f, "custom {}", code),
        }
    }
}

/// One recorded command.
#[derive(Debug, Clone)]
pub struct Task<C> {
    pub command: C,
    pub group: u64,
    pub group_code: ActionCode,
}

/// Observable state of the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// No group open
    Idle,
    /// A group opened by the diagram itself is collecting tasks
    Recording,
    /// A group opened with `begin_action` is collecting tasks
    Grouping,
    /// Undo or redo in progress
    Replaying,
}

#[derive(Debug, Clone, Copy)]
struct OpenGroup {
    id: u64,
    code: ActionCode,
    implicit: bool,
}

/// Grouped, bounded undo history.
#[derive(Debug, Clone)]
pub struct TaskManager<C> {
    tasks: Vec<Task<C>>,
    /// Number of applied tasks; `tasks[cursor - 1]` is the next undo
    cursor: usize,
    group_counter: u64,
    open: Option<OpenGroup>,
    depth: usize,
    replaying: bool,
    enabled: bool,
    skip: bool,
    undo_limit: usize,
}

impl<C> Default for TaskManager<C> {
    fn default() -> Self {
        Self::new(100)
    }
}

impl<C> TaskManager<C> {
    /// Creates a manager keeping at most `undo_limit` groups (0 = unbounded).
    pub fn new(undo_limit: usize) -> Self {
        Self {
            tasks: Vec::new(),
            cursor: 0,
            group_counter: 0,
            open: None,
            depth: 0,
            replaying: false,
            enabled: true,
            skip: false,
            undo_limit,
        }
    }

    pub fn state(&self) -> TaskState {
        if self.replaying {
            TaskState::Replaying
        } else {
            match self.open {
                Some(g) if g.implicit => TaskState::Recording,
                Some(_) => TaskState::Grouping,
                None => TaskState::Idle,
            }
        }
    }

    /// Index of the task the next undo starts from.
    pub fn current_index(&self) -> Option<usize> {
        self.cursor.checked_sub(1)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[Task<C>] {
        &self.tasks
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.tasks.len()
    }

    /// Number of groups that can be undone.
    pub fn undo_depth(&self) -> usize {
        count_groups(&self.tasks[..self.cursor])
    }

    /// Number of groups that can be redone.
    pub fn redo_depth(&self) -> usize {
        count_groups(&self.tasks[self.cursor..])
    }

    pub fn undo_limit(&self) -> usize {
        self.undo_limit
    }

    /// Changes the group limit, evicting the oldest groups if needed.
    pub fn set_undo_limit(&mut self, limit: usize) {
        self.undo_limit = limit;
        self.evict();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling drops the whole history.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.clear();
        }
    }

    pub fn is_skipping(&self) -> bool {
        self.skip
    }

    /// While skipping, submitted commands are discarded.
    pub fn set_skip(&mut self, skip: bool) {
        self.skip = skip;
    }

    fn is_recording(&self) -> bool {
        self.enabled && !self.skip && !self.replaying
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    /// Code of the group currently open, `ActionCode::None` when idle.
    pub fn current_code(&self) -> ActionCode {
        self.open.map_or(ActionCode::None, |g| g.code)
    }

    /// Forgets every task. Open groups stay open.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.cursor = 0;
    }

    /// Opens an external group. Calls nest; only the outermost opens.
    pub fn begin_action(&mut self, code: ActionCode) -> Result<(), DiagramError> {
        if code == ActionCode::None {
            return Err(DiagramError::ReservedActionCode);
        }
        self.open_group(code, false);
        Ok(())
    }

    /// Closes the group opened by the matching `begin_action`.
    pub fn end_action(&mut self) {
        match self.depth {
            0 => debug!("end_action without matching begin_action"),
            1 => {
                self.depth = 0;
                if let Some(group) = self.open.take() {
                    trace!(group = group.id, code = %group.code, "Closed undo group");
                }
            }
            _ => self.depth -= 1,
        }
    }

    /// Opens a group unless one is already open or submissions are being
    /// discarded, so skipped edits never consume a group id.
    ///
    /// Returns whether a group was opened; pass it back to `end_implicit`.
    pub fn begin_implicit(&mut self, code: ActionCode) -> bool {
        if self.depth > 0 || code == ActionCode::None || !self.is_recording() {
            return false;
        }
        self.open_group(code, true);
        true
    }

    pub fn end_implicit(&mut self, opened: bool) {
        if opened {
            self.end_action();
        }
    }

    fn open_group(&mut self, code: ActionCode, implicit: bool) {
        if self.depth == 0 {
            self.group_counter += 1;
            self.open = Some(OpenGroup {
                id: self.group_counter,
                code,
                implicit,
            });
            trace!(group = self.group_counter, code = %code, "Opened undo group");
        }
        self.depth += 1;
    }

    /// Records an already applied command.
    ///
    /// Returns `false` when the command was discarded (replaying, disabled or
    /// skipping).
    pub fn submit(&mut self, command: C) -> bool {
        if self.replaying || !self.enabled || self.skip {
            return false;
        }

        self.tasks.truncate(self.cursor);
        let (group, group_code) = match self.open {
            Some(g) => (g.id, g.code),
            None => {
                self.group_counter += 1;
                (self.group_counter, ActionCode::None)
            }
        };
        self.tasks.push(Task {
            command,
            group,
            group_code,
        });
        self.cursor = self.tasks.len();
        self.evict();
        true
    }

    fn evict(&mut self) {
        if self.undo_limit == 0 {
            return;
        }
        while count_groups(&self.tasks) > self.undo_limit {
            let oldest = self.tasks[0].group;
            let n = self.tasks.iter().take_while(|t| t.group == oldest).count();
            self.tasks.drain(..n);
            self.cursor = self.cursor.saturating_sub(n);
        }
    }

    /// Reverts the most recent group.
    pub fn undo<T>(&mut self, target: &mut T) -> bool
    where
        C: Command<T>,
    {
        let Some(last) = self.current_index() else {
            return false;
        };
        let group = self.tasks[last].group;
        self.replaying = true;
        while self.cursor > 0 && self.tasks[self.cursor - 1].group == group {
            self.cursor -= 1;
            let task = &mut self.tasks[self.cursor];
            trace!(command = task.command.name(), "Undo");
            task.command.undo(target);
        }
        self.replaying = false;
        true
    }

    /// Re-applies the next undone group.
    pub fn redo<T>(&mut self, target: &mut T) -> bool
    where
        C: Command<T>,
    {
        let Some(group) = self.tasks.get(self.cursor).map(|t| t.group) else {
            return false;
        };
        self.replaying = true;
        while self.cursor < self.tasks.len() && self.tasks[self.cursor].group == group {
            let task = &mut self.tasks[self.cursor];
            trace!(command = task.command.name(), "Redo");
            task.command.apply(target);
            self.cursor += 1;
        }
        self.replaying = false;
        true
    }

    /// Reverts the most recent task alone and forgets it along with any redo
    /// future.
    pub fn remove_last_task<T>(&mut self, target: &mut T) -> bool
    where
        C: Command<T>,
    {
        let Some(last) = self.current_index() else {
            return false;
        };
        self.replaying = true;
        self.tasks[last].command.undo(target);
        self.replaying = false;
        self.tasks.truncate(last);
        self.cursor = last;
        true
    }

    /// Name of the command the next undo starts with.
    pub fn undo_name<T>(&self) -> Option<&str>
    where
        C: Command<T>,
    {
        self.current_index().map(|i| self.tasks[i].command.name())
    }
}

fn count_groups<C>(tasks: &[Task<C>]) -> usize {
    let mut count = 0;
    let mut last = None;
    for task in tasks {
        if last != Some(task.group) {
            count += 1;
            last = Some(task.group);
        }
    }
    count
}
