use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub const ALL: &[Status] = &[Status::Todo, Status::InProgress, Status::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::Done => "done",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Status::Todo => "To Do",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
        }
    }

    /// Position of this status in the fixed column order.
    pub fn index(&self) -> usize {
        match self {
            Status::Todo => 0,
            Status::InProgress => 1,
            Status::Done => 2,
        }
    }

    /// The column to the right, if any.
    pub fn next(&self) -> Option<Status> {
        Status::ALL.get(self.index() + 1).copied()
    }

    /// The column to the left, if any.
    pub fn prev(&self) -> Option<Status> {
        self.index().checked_sub(1).map(|i| Status::ALL[i])
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current time truncated to the millisecond precision the document stores.
pub fn now_millis() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(Utc::now().timestamp_millis()).unwrap_or_else(Utc::now)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

/// A card on the board.
///
/// Field names and the millisecond timestamp match the persisted document,
/// so a board written by one version can be read back without migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Status,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub sub_tasks: Vec<SubTask>,
}

impl Task {
    /// Number of completed subtasks and total subtasks.
    pub fn progress(&self) -> (usize, usize) {
        let done = self.sub_tasks.iter().filter(|s| s.completed).count();
        (done, self.sub_tasks.len())
    }

    /// Completed fraction in `[0, 1]`. Zero when the task has no subtasks.
    pub fn progress_ratio(&self) -> f64 {
        match self.progress() {
            (_, 0) => 0.0,
            (done, total) => done as f64 / total as f64,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == Status::Done
    }
}
