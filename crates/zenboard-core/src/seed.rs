use chrono::{DateTime, Utc};

use crate::task::{Status, SubTask, Task};

/// The starter board shown the first time the application runs.
pub fn starter_tasks(now: DateTime<Utc>) -> Vec<Task> {
    vec![
        Task {
            id: "1".into(),
            title: "Launch ZenBoard AI".into(),
            description: String::new(),
            status: Status::InProgress,
            created_at: now,
            sub_tasks: vec![
                SubTask {
                    id: "s1".into(),
                    title: "Connect Gemini API".into(),
                    completed: true,
                },
                SubTask {
                    id: "s2".into(),
                    title: "Test Drag and Drop".into(),
                    completed: false,
                },
            ],
        },
        Task {
            id: "2".into(),
            title: "Write documentation".into(),
            description: String::new(),
            status: Status::Todo,
            created_at: now,
            sub_tasks: Vec::new(),
        },
        Task {
            id: "3".into(),
            title: "Setup GitHub Repo".into(),
            description: String::new(),
            status: Status::Done,
            created_at: now,
            sub_tasks: Vec::new(),
        },
    ]
}
