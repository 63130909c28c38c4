use zenboard_core::Task;

/// One line per task, `- [status] title`, in board order.
pub fn board_context(tasks: &[Task]) -> String {
    tasks
        .iter()
        .map(|t| format!("- [{}] {}", t.status.as_str(), t.title))
        .collect::<Vec<_>>()
        .join("\n")
}
