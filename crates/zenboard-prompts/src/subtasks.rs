/// Prompt asking for a short breakdown of `task_title` as a JSON array.
pub fn build(task_title: &str) -> String {
    format!(
        "Generate a list of 3-5 concise, actionable subtasks for the following main task: \
         \"{task_title}\". Return only a JSON array of strings."
    )
}
