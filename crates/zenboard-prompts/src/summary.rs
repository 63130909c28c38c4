use zenboard_core::Task;

use crate::context::board_context;

/// Prompt asking for a brief, friendly progress summary of the board.
pub fn build(tasks: &[Task]) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "You are a project management assistant. Here is the current state of a task board:\n",
    );
    prompt.push_str(&board_context(tasks));
    prompt.push_str(
        "\n\nProvide a very short (2-3 sentences) motivational summary of progress and \
         suggest what the team should focus on next. Use a friendly tone.",
    );
    prompt
}
