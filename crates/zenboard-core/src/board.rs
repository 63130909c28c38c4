//! Board state and the operations that mutate it.
//!
//! The board is one ordered list of tasks. A column is that list filtered by
//! status, so moving a card between columns is a status change plus, when it
//! is dropped on another card, an index move inside the single list.

use chrono::{DateTime, Utc};

use crate::error::ZenboardError;
use crate::id;
use crate::seed;
use crate::task::{self, Status, SubTask, Task};

/// What the dragged card is currently over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Task(String),
    Column(Status),
}

impl DropTarget {
    fn is_task(&self, id: &str) -> bool {
        matches!(self, DropTarget::Task(t) if t == id)
    }
}

/// Result of finishing a drag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragOutcome {
    /// The list order changed on drop.
    pub reordered: bool,
    /// The card was dropped on a target and sits in the Done column.
    pub landed_in_done: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    tasks: Vec<Task>,
}

impl Board {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Board populated with the starter tasks.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self::new(seed::starter_tasks(now))
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Task, ZenboardError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ZenboardError::NotFound(format!("task {id}")))
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Tasks in one column, in board order.
    pub fn column(&self, status: Status) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    /// Task count per column, indexed by [`Status::index`].
    pub fn counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for task in &self.tasks {
            counts[task.status.index()] += 1;
        }
        counts
    }

    fn id_taken(&self, candidate: &str) -> bool {
        self.tasks.iter().any(|t| {
            t.id == candidate || t.sub_tasks.iter().any(|s| s.id == candidate)
        })
    }

    fn fresh_id(&self) -> String {
        id::unique_id(|c| self.id_taken(c))
    }

    // -- Tasks --

    /// Append a new task to the To Do column.
    pub fn add_task(&mut self, title: &str) -> Result<&Task, ZenboardError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ZenboardError::InvalidInput("task title is empty".into()));
        }
        let task = Task {
            id: self.fresh_id(),
            title: title.to_string(),
            description: String::new(),
            status: Status::Todo,
            created_at: task::now_millis(),
            sub_tasks: Vec::new(),
        };
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    pub fn delete_task(&mut self, id: &str) -> Result<Task, ZenboardError> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| ZenboardError::NotFound(format!("task {id}")))?;
        Ok(self.tasks.remove(idx))
    }

    pub fn rename_task(&mut self, id: &str, title: &str) -> Result<(), ZenboardError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ZenboardError::InvalidInput("task title is empty".into()));
        }
        self.get_mut(id)?.title = title.to_string();
        Ok(())
    }

    pub fn update_description(&mut self, id: &str, description: &str) -> Result<(), ZenboardError> {
        self.get_mut(id)?.description = description.to_string();
        Ok(())
    }

    // -- Subtasks --

    /// Flip a subtask's completed flag. Returns the new value.
    pub fn toggle_subtask(&mut self, task_id: &str, subtask_id: &str) -> Result<bool, ZenboardError> {
        let task = self.get_mut(task_id)?;
        let sub = task
            .sub_tasks
            .iter_mut()
            .find(|s| s.id == subtask_id)
            .ok_or_else(|| ZenboardError::NotFound(format!("subtask {subtask_id}")))?;
        sub.completed = !sub.completed;
        Ok(sub.completed)
    }

    /// Append one open subtask per title, in order. Returns how many were added.
    pub fn add_subtasks<S: AsRef<str>>(
        &mut self,
        task_id: &str,
        titles: &[S],
    ) -> Result<usize, ZenboardError> {
        if self.get(task_id).is_none() {
            return Err(ZenboardError::NotFound(format!("task {task_id}")));
        }
        let mut subs = Vec::with_capacity(titles.len());
        for title in titles {
            let id = id::unique_id(|c| {
                self.id_taken(c) || subs.iter().any(|s: &SubTask| s.id == c)
            });
            subs.push(SubTask {
                id,
                title: title.as_ref().to_string(),
                completed: false,
            });
        }
        let added = subs.len();
        self.get_mut(task_id)?.sub_tasks.extend(subs);
        Ok(added)
    }

    /// Append a single subtask typed by the user. Blank titles are rejected.
    pub fn add_subtask(&mut self, task_id: &str, title: &str) -> Result<(), ZenboardError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ZenboardError::InvalidInput("subtask title is empty".into()));
        }
        self.add_subtasks(task_id, &[title]).map(|_| ())
    }

    // -- Drag and drop --

    /// Snapshot of the card being picked up, for the drag overlay.
    pub fn drag_start(&self, active_id: &str) -> Option<Task> {
        self.get(active_id).cloned()
    }

    /// Apply a hover. Returns `true` when the board changed.
    ///
    /// Over a card in another column the active card takes that column's
    /// status and jumps to the card's index. Over a column only the status
    /// changes. Over a card in the same column nothing happens until drop.
    pub fn drag_over(&mut self, active_id: &str, target: &DropTarget) -> bool {
        if target.is_task(active_id) {
            return false;
        }
        let Some(active_idx) = self.index_of(active_id) else {
            return false;
        };
        match target {
            DropTarget::Task(over_id) => {
                let Some(over_idx) = self.index_of(over_id) else {
                    return false;
                };
                let over_status = self.tasks[over_idx].status;
                if self.tasks[active_idx].status == over_status {
                    return false;
                }
                self.tasks[active_idx].status = over_status;
                array_move(&mut self.tasks, active_idx, over_idx);
                true
            }
            DropTarget::Column(status) => {
                let task = &mut self.tasks[active_idx];
                if task.status == *status {
                    return false;
                }
                task.status = *status;
                true
            }
        }
    }

    /// Finish a drag. Dropping on another card moves the active card to that
    /// card's index; dropping on a column or on nothing leaves order alone.
    pub fn drag_end(&mut self, active_id: &str, target: Option<&DropTarget>) -> DragOutcome {
        let mut outcome = DragOutcome::default();
        let Some(target) = target else {
            return outcome;
        };
        if target.is_task(active_id) {
            return outcome;
        }
        let Some(active_idx) = self.index_of(active_id) else {
            return outcome;
        };
        outcome.landed_in_done = self.tasks[active_idx].is_done();
        if let DropTarget::Task(over_id) = target {
            if let Some(over_idx) = self.index_of(over_id) {
                outcome.reordered = active_idx != over_idx;
                array_move(&mut self.tasks, active_idx, over_idx);
            }
        }
        outcome
    }

    /// Drop a card straight onto a column. Returns `true` if its status changed.
    pub fn move_to_column(&mut self, id: &str, status: Status) -> bool {
        self.drag_over(id, &DropTarget::Column(status))
    }

    /// The card `offset` places away from `id` within its own column.
    pub fn neighbour(&self, id: &str, offset: isize) -> Option<&Task> {
        let status = self.get(id)?.status;
        let column = self.column(status);
        let pos = column.iter().position(|t| t.id == id)?;
        let target = pos.checked_add_signed(offset)?;
        column.get(target).copied()
    }
}

/// Remove the element at `from` and insert it at `to`.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}
