pub mod context;
pub mod subtasks;
pub mod summary;

pub use context::board_context;

/// Which AI action a prompt is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Subtasks,
    Summary,
}

impl PromptKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptKind::Subtasks => "subtasks",
            PromptKind::Summary => "summary",
        }
    }
}
