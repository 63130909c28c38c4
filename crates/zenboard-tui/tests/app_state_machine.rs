//! State machine tests for the TUI App.
//!
//! Each test builds an App over an in-memory store and a canned assistant,
//! then simulates key events. Tests are plain `#[test]` functions because the
//! App owns its own tokio runtime and blocks on it.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use zenboard_ai::{MockAssistant, SUMMARY_ERROR_MESSAGE};
use zenboard_core::{Board, DropTarget, Status};
use zenboard_store::{BoardRepository, LocalStore, MemoryStore, BOARD_KEY};
use zenboard_tui::app::{App, Mode};

const AI_WAIT: Duration = Duration::from_secs(5);

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn char_key(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(char_key(c));
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Runtime::new().unwrap()
}

fn make_app_with(mock: Arc<MockAssistant>) -> (App, BoardRepository) {
    let repo = BoardRepository::new(Arc::new(MemoryStore::new()));
    let app = App::new(runtime(), repo.clone(), mock).unwrap();
    (app, repo)
}

fn make_app() -> (App, BoardRepository) {
    make_app_with(Arc::new(MockAssistant::new()))
}

/// What a fresh load of the repository sees.
fn stored(repo: &BoardRepository) -> Board {
    runtime().block_on(repo.load()).unwrap().unwrap()
}

fn column_ids(board: &Board, status: Status) -> Vec<String> {
    board.column(status).iter().map(|t| t.id.clone()).collect()
}

fn render_text(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
    terminal.draw(|frame| app.render(frame)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

// ---- Startup and persistence ----

#[test]
fn app_starts_normal_with_starter_board() {
    let (app, repo) = make_app();
    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.board().tasks().len(), 3);
    assert_eq!(app.selected_task().unwrap().id, "2");
    // First run seeds and saves immediately.
    assert_eq!(stored(&repo), *app.board());
}

#[test]
fn board_survives_restart() {
    let (mut app, repo) = make_app();
    app.handle_key(char_key('n'));
    type_text(&mut app, "Buy milk");
    app.handle_key(key(KeyCode::Enter));
    let before = app.board().clone();
    drop(app);

    let app = App::new(runtime(), repo, Arc::new(MockAssistant::new())).unwrap();
    assert_eq!(*app.board(), before);
}

#[test]
fn corrupt_document_refuses_to_start() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(BOARD_KEY), "{ not a board").unwrap();
    let repo = BoardRepository::new(Arc::new(LocalStore::new(dir.path().to_path_buf())));

    let result = App::new(runtime(), repo, Arc::new(MockAssistant::new()));
    assert!(result.is_err());
    // The document is left untouched.
    let content = std::fs::read_to_string(dir.path().join(BOARD_KEY)).unwrap();
    assert_eq!(content, "{ not a board");
}

#[test]
fn quit_keys() {
    let (mut app, _) = make_app();
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert!(app.should_quit(char_key('q')));
    assert!(app.should_quit(ctrl_c));

    app.handle_key(char_key('n'));
    assert!(app.is_input_mode());
    assert!(!app.should_quit(char_key('q')));
    assert!(app.should_quit(ctrl_c));
}

// ---- New task ----

#[test]
fn n_enters_new_task() {
    let (mut app, _) = make_app();
    app.handle_key(char_key('n'));
    assert!(matches!(app.mode(), Mode::NewTask { input } if input.is_empty()));
}

#[test]
fn new_task_esc_cancels() {
    let (mut app, _) = make_app();
    app.handle_key(char_key('n'));
    type_text(&mut app, "abc");
    app.handle_key(key(KeyCode::Esc));
    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.board().tasks().len(), 3);
}

#[test]
fn new_task_backspace() {
    let (mut app, _) = make_app();
    app.handle_key(char_key('n'));
    type_text(&mut app, "abc");
    app.handle_key(key(KeyCode::Backspace));
    assert!(matches!(app.mode(), Mode::NewTask { input } if input == "ab"));
}

#[test]
fn new_task_submit_appends_to_todo() {
    let (mut app, repo) = make_app();
    app.handle_key(char_key('n'));
    type_text(&mut app, "  Buy milk ");
    app.handle_key(key(KeyCode::Enter));

    assert!(matches!(app.mode(), Mode::Normal));
    let last = app.board().tasks().last().unwrap();
    assert_eq!(last.title, "Buy milk");
    assert_eq!(last.status, Status::Todo);
    assert!(last.sub_tasks.is_empty());
    assert_eq!(app.selected_task().unwrap().title, "Buy milk");
    assert_eq!(app.status_message(), Some("Task created"));
    assert_eq!(stored(&repo), *app.board());
}

#[test]
fn blank_title_is_ignored() {
    let (mut app, _) = make_app();
    app.handle_key(char_key('n'));
    type_text(&mut app, "   ");
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.board().tasks().len(), 3);
}

// ---- Detail view ----

#[test]
fn enter_opens_detail() {
    let (mut app, _) = make_app();
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::TaskDetail { task_id, cursor: 0 } if task_id == "2"));
}

#[test]
fn detail_esc_and_q_return() {
    let (mut app, _) = make_app();
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Esc));
    assert!(matches!(app.mode(), Mode::Normal));

    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('q'));
    assert!(matches!(app.mode(), Mode::Normal));
}

#[test]
fn detail_space_toggles_subtasks() {
    let (mut app, repo) = make_app();
    app.handle_key(char_key('l'));
    assert_eq!(app.selected_task().unwrap().id, "1");
    app.handle_key(key(KeyCode::Enter));

    app.handle_key(char_key(' '));
    assert_eq!(app.board().get("1").unwrap().progress(), (0, 2));

    app.handle_key(char_key('j'));
    app.handle_key(char_key(' '));
    let task = app.board().get("1").unwrap();
    assert!(task.sub_tasks.iter().any(|s| s.id == "s2" && s.completed));
    assert_eq!(task.progress(), (1, 2));
    assert_eq!(task.progress_ratio(), 0.5);
    assert_eq!(stored(&repo), *app.board());

    // Cursor stops at the last subtask.
    app.handle_key(char_key('j'));
    assert!(matches!(app.mode(), Mode::TaskDetail { cursor: 1, .. }));
}

#[test]
fn detail_t_renames() {
    let (mut app, _) = make_app();
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('t'));
    assert!(matches!(app.mode(), Mode::EditTitle { input, .. } if input == "Write documentation"));
    type_text(&mut app, "!");
    app.handle_key(key(KeyCode::Enter));

    assert!(matches!(app.mode(), Mode::TaskDetail { task_id, .. } if task_id == "2"));
    assert_eq!(app.board().get("2").unwrap().title, "Write documentation!");
}

#[test]
fn rename_to_blank_keeps_title() {
    let (mut app, _) = make_app();
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('t'));
    for _ in 0.."Write documentation".len() {
        app.handle_key(key(KeyCode::Backspace));
    }
    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::TaskDetail { .. }));
    assert_eq!(app.board().get("2").unwrap().title, "Write documentation");
}

#[test]
fn detail_e_edits_description() {
    let (mut app, _) = make_app();
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('e'));
    type_text(&mut app, "line one");
    app.handle_key(key(KeyCode::Enter));
    type_text(&mut app, "line two");
    app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));

    assert!(matches!(app.mode(), Mode::TaskDetail { .. }));
    assert_eq!(
        app.board().get("2").unwrap().description,
        "line one\nline two"
    );
}

#[test]
fn description_esc_discards() {
    let (mut app, _) = make_app();
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('e'));
    type_text(&mut app, "draft");
    app.handle_key(key(KeyCode::Esc));
    assert!(matches!(app.mode(), Mode::TaskDetail { .. }));
    assert!(app.board().get("2").unwrap().description.is_empty());
}

#[test]
fn detail_n_adds_subtask() {
    let (mut app, _) = make_app();
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('n'));
    assert!(matches!(app.mode(), Mode::NewSubtask { .. }));
    type_text(&mut app, "Draft outline");
    app.handle_key(key(KeyCode::Enter));

    assert!(matches!(app.mode(), Mode::TaskDetail { .. }));
    let task = app.board().get("2").unwrap();
    assert_eq!(task.sub_tasks.len(), 1);
    assert_eq!(task.sub_tasks[0].title, "Draft outline");
    assert!(!task.sub_tasks[0].completed);
}

// ---- Delete ----

#[test]
fn delete_confirm_y() {
    let (mut app, repo) = make_app();
    app.handle_key(char_key('d'));
    assert!(matches!(app.mode(), Mode::ConfirmDelete { task } if task.id == "2"));
    app.handle_key(char_key('y'));

    assert!(matches!(app.mode(), Mode::Normal));
    assert!(app.board().get("2").is_none());
    assert_eq!(app.board().tasks().len(), 2);
    assert_eq!(stored(&repo), *app.board());
}

#[test]
fn delete_other_key_cancels() {
    let (mut app, _) = make_app();
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('d'));
    app.handle_key(char_key('n'));
    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.board().tasks().len(), 3);
}

// ---- Drag and drop ----

#[test]
fn space_picks_up_selected_card() {
    let (mut app, _) = make_app();
    app.handle_key(char_key(' '));
    assert!(matches!(
        app.mode(),
        Mode::Dragging { active, over: None } if active.id == "2"
    ));
}

#[test]
fn drag_to_card_in_next_column() {
    let (mut app, repo) = make_app();
    app.handle_key(char_key(' '));
    app.handle_key(char_key('l'));

    // Hovering the in-progress card adopts its status and index.
    assert!(matches!(
        app.mode(),
        Mode::Dragging { over: Some(DropTarget::Task(id)), .. } if id == "1"
    ));
    assert_eq!(app.board().get("2").unwrap().status, Status::InProgress);
    assert_eq!(column_ids(app.board(), Status::InProgress), vec!["2", "1"]);

    app.handle_key(key(KeyCode::Enter));
    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(column_ids(app.board(), Status::InProgress), vec!["1", "2"]);
    assert_eq!(app.selected_task().unwrap().id, "2");
    assert_eq!(stored(&repo), *app.board());
}

#[test]
fn drag_to_empty_column_celebrates_done() {
    let (mut app, _) = make_app();
    // Empty the Done column first.
    app.handle_key(char_key('l'));
    app.handle_key(char_key('l'));
    app.handle_key(char_key('d'));
    app.handle_key(char_key('y'));
    assert!(app.board().column(Status::Done).is_empty());

    app.handle_key(char_key('h'));
    assert_eq!(app.selected_task().unwrap().id, "1");
    app.handle_key(char_key(' '));
    app.handle_key(char_key('l'));
    assert!(matches!(
        app.mode(),
        Mode::Dragging { over: Some(DropTarget::Column(Status::Done)), .. }
    ));
    assert_eq!(app.board().get("1").unwrap().status, Status::Done);

    app.handle_key(char_key(' '));
    assert!(matches!(app.mode(), Mode::Normal));
    assert!(app.status_message().unwrap().contains("is done"));
}

#[test]
fn drag_reorders_within_column() {
    let (mut app, _) = make_app();
    app.handle_key(char_key('n'));
    type_text(&mut app, "Second");
    app.handle_key(key(KeyCode::Enter));
    let second = app.selected_task().unwrap().id.clone();
    app.handle_key(char_key('g'));
    assert_eq!(app.selected_task().unwrap().id, "2");

    app.handle_key(char_key(' '));
    app.handle_key(char_key('j'));
    // Same-column hover does not move anything until the drop.
    assert_eq!(column_ids(app.board(), Status::Todo), vec!["2".to_string(), second.clone()]);

    app.handle_key(key(KeyCode::Enter));
    assert_eq!(column_ids(app.board(), Status::Todo), vec![second, "2".to_string()]);
}

#[test]
fn esc_ends_drag_without_target() {
    let (mut app, _) = make_app();
    app.handle_key(char_key(' '));
    app.handle_key(char_key('l'));
    let during = app.board().clone();
    app.handle_key(key(KeyCode::Esc));

    // Nothing is rolled back and nothing further moves.
    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(*app.board(), during);
    assert_eq!(app.board().get("2").unwrap().status, Status::InProgress);
}

#[test]
fn drag_past_last_column_does_nothing() {
    let (mut app, _) = make_app();
    app.handle_key(char_key(' '));
    app.handle_key(char_key('h'));
    assert!(matches!(app.mode(), Mode::Dragging { over: None, .. }));
    assert_eq!(app.board().get("2").unwrap().status, Status::Todo);
}

// ---- AI ----

#[test]
fn breakdown_adds_subtasks_and_expands() {
    let mock = Arc::new(MockAssistant::new());
    let (mut app, repo) = make_app_with(mock.clone());
    app.handle_key(char_key('a'));
    assert!(app.needs_polling());
    assert!(app.wait_for_ai(AI_WAIT));

    let task = app.board().get("2").unwrap();
    let titles: Vec<&str> = task.sub_tasks.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Outline", "Draft", "Review"]);
    assert!(task.sub_tasks.iter().all(|s| !s.completed));
    assert!(app.is_expanded("2"));
    assert!(!app.is_generating("2"));
    assert_eq!(mock.calls(), vec!["subtasks:Write documentation"]);
    assert_eq!(stored(&repo), *app.board());
}

#[test]
fn breakdown_is_not_reentrant() {
    let mock = Arc::new(MockAssistant::new().with_delay(Duration::from_millis(200)));
    let (mut app, _) = make_app_with(mock.clone());
    app.handle_key(char_key('a'));
    app.handle_key(char_key('a'));
    assert!(app.is_generating("2"));
    assert!(app.wait_for_ai(AI_WAIT));
    assert_eq!(mock.calls().len(), 1);
    assert_eq!(app.board().get("2").unwrap().sub_tasks.len(), 3);
}

#[test]
fn breakdown_from_detail_view() {
    let (mut app, _) = make_app();
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('a'));
    assert!(app.wait_for_ai(AI_WAIT));
    assert!(matches!(app.mode(), Mode::TaskDetail { .. }));
    assert_eq!(app.board().get("2").unwrap().sub_tasks.len(), 3);
}

#[test]
fn failed_breakdown_leaves_task_unchanged() {
    let (mut app, _) = make_app_with(Arc::new(MockAssistant::new().failing_subtasks()));
    let before = app.board().clone();
    app.handle_key(char_key('a'));
    assert!(app.wait_for_ai(AI_WAIT));
    assert_eq!(*app.board(), before);
    assert!(!app.is_generating("2"));
    assert!(app
        .status_message()
        .unwrap()
        .starts_with("AI breakdown failed"));
}

#[test]
fn empty_suggestions_still_expand_card() {
    let (mut app, _) = make_app_with(Arc::new(MockAssistant::new().with_subtasks(&[])));
    app.handle_key(char_key('a'));
    assert!(app.wait_for_ai(AI_WAIT));
    assert!(app.board().get("2").unwrap().sub_tasks.is_empty());
    assert!(app.is_expanded("2"));
}

#[test]
fn summary_shows_and_dismisses() {
    let mock = Arc::new(MockAssistant::new().with_summary("Two to go. Focus on docs."));
    let (mut app, _) = make_app_with(mock.clone());
    app.handle_key(char_key('s'));
    assert!(app.is_summarizing());
    assert!(app.wait_for_ai(AI_WAIT));
    assert!(!app.is_summarizing());
    assert_eq!(app.ai_summary(), Some("Two to go. Focus on docs."));
    assert_eq!(mock.calls(), vec!["summary:3"]);

    app.handle_key(char_key('x'));
    assert!(app.ai_summary().is_none());
}

#[test]
fn summary_failure_shows_fixed_message() {
    let (mut app, _) = make_app_with(Arc::new(MockAssistant::new().failing_summary()));
    app.handle_key(char_key('s'));
    assert!(app.wait_for_ai(AI_WAIT));
    assert!(!app.is_summarizing());
    assert_eq!(app.ai_summary(), Some(SUMMARY_ERROR_MESSAGE));
}

#[test]
fn summary_is_not_reentrant() {
    let mock = Arc::new(MockAssistant::new().with_delay(Duration::from_millis(200)));
    let (mut app, _) = make_app_with(mock.clone());
    app.handle_key(char_key('s'));
    app.handle_key(char_key('s'));
    assert!(app.wait_for_ai(AI_WAIT));
    assert_eq!(mock.calls().len(), 1);
}

// ---- Rendering ----

#[test]
fn renders_board_and_footer() {
    let (mut app, _) = make_app();
    let text = render_text(&app);
    assert!(text.contains("To Do (1)"));
    assert!(text.contains("In Progress (1)"));
    assert!(text.contains("Done (1)"));
    assert!(text.contains("Data stored locally"));
    assert!(text.contains("Powered by mock"));

    app.handle_key(char_key('s'));
    assert!(app.wait_for_ai(AI_WAIT));
    assert!(render_text(&app).contains("AI Assistant Insights"));
}

#[test]
fn renders_each_overlay() {
    let (mut app, _) = make_app();
    app.handle_key(key(KeyCode::Enter));
    assert!(render_text(&app).contains("Task Detail"));
    app.handle_key(key(KeyCode::Esc));

    app.handle_key(char_key(' '));
    assert!(render_text(&app).contains("Moving"));
    app.handle_key(key(KeyCode::Esc));

    app.handle_key(char_key('d'));
    assert!(render_text(&app).contains("Confirm Delete"));
}
