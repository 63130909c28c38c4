use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tokio::runtime::Runtime;
use tracing::{error, info, warn};
use zenboard_ai::{AiError, Assistant, SUMMARY_ERROR_MESSAGE};
use zenboard_core::{Board, Column, DropTarget, Status, Task};
use zenboard_store::BoardRepository;

use crate::components::card::{card_lines, progress_bar, CardFlags};
use crate::components::task_board::{CardHints, TaskBoard};

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// What the app is currently doing
#[derive(Debug, Clone)]
pub enum Mode {
    /// Normal board navigation
    Normal,
    /// Typing a new task title
    NewTask { input: String },
    /// Viewing task detail, `cursor` is the highlighted subtask
    TaskDetail { task_id: String, cursor: usize },
    /// Editing a task's title
    EditTitle { task_id: String, input: String },
    /// Editing a task's description
    EditDescription { task_id: String, input: String },
    /// Typing a subtask by hand
    NewSubtask { task_id: String, input: String },
    /// Confirm delete task
    ConfirmDelete { task: Task },
    /// Carrying a card. `active` is the snapshot taken when it was picked up.
    Dragging {
        active: Task,
        over: Option<DropTarget>,
    },
}

/// A finished AI request, delivered from the runtime to the UI thread.
#[derive(Debug)]
pub enum AiEvent {
    Subtasks {
        task_id: String,
        result: Result<Vec<String>, AiError>,
    },
    Summary(Result<String, AiError>),
}

pub struct App {
    rt: Runtime,
    repo: BoardRepository,
    assistant: Arc<dyn Assistant>,
    board: Board,
    view: TaskBoard,
    mode: Mode,
    status_message: Option<String>,
    ai_summary: Option<String>,
    summarizing: bool,
    /// Tasks with a breakdown request in flight.
    generating: HashSet<String>,
    /// Cards showing their subtask checklist.
    expanded: HashSet<String>,
    ai_tx: Sender<AiEvent>,
    ai_rx: Receiver<AiEvent>,
    ticks: usize,
}

impl App {
    /// Load the stored board (seeding it on first run) and build the UI state.
    pub fn new(rt: Runtime, repo: BoardRepository, assistant: Arc<dyn Assistant>) -> Result<Self> {
        let board = rt
            .block_on(repo.load_or_seed())
            .with_context(|| format!("failed to load board from {}", repo.key()))?;
        let view = TaskBoard::new(&board);
        let (ai_tx, ai_rx) = mpsc::channel();
        info!(
            tasks = board.tasks().len(),
            assistant = assistant.name(),
            "board ready"
        );

        Ok(Self {
            rt,
            repo,
            assistant,
            board,
            view,
            mode: Mode::Normal,
            status_message: None,
            ai_summary: None,
            summarizing: false,
            generating: HashSet::new(),
            expanded: HashSet::new(),
            ai_tx,
            ai_rx,
            ticks: 0,
        })
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn ai_summary(&self) -> Option<&str> {
        self.ai_summary.as_deref()
    }

    pub fn is_summarizing(&self) -> bool {
        self.summarizing
    }

    pub fn is_generating(&self, task_id: &str) -> bool {
        self.generating.contains(task_id)
    }

    pub fn is_expanded(&self, task_id: &str) -> bool {
        self.expanded.contains(task_id)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.view.selected_task()
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(
            self.mode,
            Mode::NewTask { .. }
                | Mode::EditTitle { .. }
                | Mode::EditDescription { .. }
                | Mode::NewSubtask { .. }
        )
    }

    /// Ctrl+C always quits; `q` only from the board itself.
    pub fn should_quit(&self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        key.code == KeyCode::Char('q') && matches!(self.mode, Mode::Normal)
    }

    /// Returns true if the event loop should use a poll timeout instead of blocking.
    pub fn needs_polling(&self) -> bool {
        self.summarizing || !self.generating.is_empty()
    }

    /// Advance the spinner. Called on poll timeout from the event loop.
    pub fn on_tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    // -- Persistence --

    /// Save the board and rebuild the view from it.
    fn commit(&mut self) {
        if let Err(e) = self.rt.block_on(self.repo.save(&self.board)) {
            error!("failed to save board: {e}");
            self.status_message = Some(format!("Save error: {e}"));
        }
        self.view.refresh(&self.board);
    }

    // -- AI --

    /// Ask the assistant to break a task into subtasks. Ignored while a
    /// request for the same task is in flight.
    pub fn request_breakdown(&mut self, task_id: &str) {
        let Some(task) = self.board.get(task_id) else {
            return;
        };
        if !self.generating.insert(task.id.clone()) {
            return;
        }
        let task_id = task.id.clone();
        let title = task.title.clone();
        let assistant = self.assistant.clone();
        let tx = self.ai_tx.clone();
        info!(task_id = %task_id, "requesting subtask breakdown");
        self.rt.spawn(async move {
            let result = assistant.generate_subtasks(&title).await;
            let _ = tx.send(AiEvent::Subtasks { task_id, result });
        });
    }

    /// Ask the assistant for a board summary. Ignored while one is in flight.
    pub fn request_summary(&mut self) {
        if self.summarizing {
            return;
        }
        self.summarizing = true;
        let tasks = self.board.tasks().to_vec();
        let assistant = self.assistant.clone();
        let tx = self.ai_tx.clone();
        info!(tasks = tasks.len(), "requesting board summary");
        self.rt.spawn(async move {
            let result = assistant.board_summary(&tasks).await;
            let _ = tx.send(AiEvent::Summary(result));
        });
    }

    /// Apply every AI result that has arrived. Never blocks.
    pub fn poll_ai(&mut self) {
        while let Ok(event) = self.ai_rx.try_recv() {
            self.apply_ai_event(event);
        }
    }

    /// Block until no AI request is in flight or `timeout` passes, applying
    /// results as they arrive. Returns `true` if everything finished.
    pub fn wait_for_ai(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.needs_polling() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.ai_rx.recv_timeout(remaining) {
                Ok(event) => self.apply_ai_event(event),
                Err(_) => return false,
            }
        }
        true
    }

    fn apply_ai_event(&mut self, event: AiEvent) {
        match event {
            AiEvent::Subtasks { task_id, result } => {
                self.generating.remove(&task_id);
                match result {
                    Ok(titles) if titles.is_empty() => {
                        if self.board.get(&task_id).is_some() {
                            self.expanded.insert(task_id);
                        }
                        self.status_message = Some("No subtask suggestions returned".into());
                    }
                    Ok(titles) => match self.board.add_subtasks(&task_id, &titles) {
                        Ok(added) => {
                            self.expanded.insert(task_id);
                            self.status_message = Some(format!("Added {added} subtasks"));
                            self.commit();
                        }
                        Err(e) => warn!("dropping subtask suggestions: {e}"),
                    },
                    Err(e) => {
                        error!(task_id = %task_id, "subtask breakdown failed: {e}");
                        self.status_message = Some(format!("AI breakdown failed: {e}"));
                    }
                }
            }
            AiEvent::Summary(result) => {
                self.summarizing = false;
                self.ai_summary = Some(match result {
                    Ok(text) => text,
                    Err(e) => {
                        error!("board summary failed: {e}");
                        SUMMARY_ERROR_MESSAGE.to_string()
                    }
                });
            }
        }
    }

    // -- Keys --

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status_message = None;

        match self.mode.clone() {
            Mode::Normal => self.handle_normal(key),
            Mode::NewTask { input } => self.handle_new_task(key, input),
            Mode::TaskDetail { task_id, cursor } => self.handle_task_detail(key, task_id, cursor),
            Mode::EditTitle { task_id, input } => self.handle_edit_title(key, task_id, input),
            Mode::EditDescription { task_id, input } => {
                self.handle_edit_description(key, task_id, input)
            }
            Mode::NewSubtask { task_id, input } => self.handle_new_subtask(key, task_id, input),
            Mode::ConfirmDelete { task } => self.handle_confirm_delete(key, task),
            Mode::Dragging { active, over } => self.handle_dragging(key, active, over),
        }
    }

    fn handle_normal(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('n') => {
                self.mode = Mode::NewTask {
                    input: String::new(),
                };
            }
            KeyCode::Enter => {
                if let Some(task) = self.view.selected_task() {
                    self.mode = Mode::TaskDetail {
                        task_id: task.id.clone(),
                        cursor: 0,
                    };
                }
            }
            KeyCode::Char(' ') => {
                let active = self
                    .view
                    .selected_task()
                    .and_then(|t| self.board.drag_start(&t.id));
                if let Some(active) = active {
                    self.mode = Mode::Dragging { active, over: None };
                }
            }
            KeyCode::Char('a') => {
                if let Some(id) = self.view.selected_task().map(|t| t.id.clone()) {
                    self.request_breakdown(&id);
                }
            }
            KeyCode::Char('s') => self.request_summary(),
            KeyCode::Char('x') => self.ai_summary = None,
            KeyCode::Char('o') => {
                if let Some(id) = self.view.selected_task().map(|t| t.id.clone()) {
                    if !self.expanded.remove(&id) {
                        self.expanded.insert(id);
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.view.selected_task() {
                    self.mode = Mode::ConfirmDelete { task: task.clone() };
                }
            }
            _ => self.view.handle_key(key),
        }
    }

    fn handle_new_task(&mut self, key: KeyEvent, mut input: String) {
        match key.code {
            KeyCode::Enter => {
                // Blank titles are ignored.
                if let Ok(task) = self.board.add_task(&input) {
                    let id = task.id.clone();
                    info!(task_id = %id, "task created");
                    self.commit();
                    self.view.select_task_by_id(&id);
                    self.status_message = Some("Task created".into());
                }
                self.mode = Mode::Normal;
            }
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Backspace => {
                input.pop();
                self.mode = Mode::NewTask { input };
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.mode = Mode::NewTask { input };
            }
            _ => {}
        }
    }

    fn handle_task_detail(&mut self, key: KeyEvent, task_id: String, mut cursor: usize) {
        let Some(task) = self.board.get(&task_id).cloned() else {
            self.mode = Mode::Normal;
            return;
        };
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.mode = Mode::Normal,
            KeyCode::Char('j') | KeyCode::Down => {
                if cursor + 1 < task.sub_tasks.len() {
                    cursor += 1;
                }
                self.mode = Mode::TaskDetail { task_id, cursor };
            }
            KeyCode::Char('k') | KeyCode::Up => {
                cursor = cursor.saturating_sub(1);
                self.mode = Mode::TaskDetail { task_id, cursor };
            }
            KeyCode::Char(' ') => {
                if let Some(sub) = task.sub_tasks.get(cursor) {
                    if self.board.toggle_subtask(&task_id, &sub.id).is_ok() {
                        self.commit();
                    }
                }
            }
            KeyCode::Char('n') => {
                self.mode = Mode::NewSubtask {
                    task_id,
                    input: String::new(),
                };
            }
            KeyCode::Char('e') => {
                self.mode = Mode::EditDescription {
                    task_id,
                    input: task.description,
                };
            }
            KeyCode::Char('t') => {
                self.mode = Mode::EditTitle {
                    task_id,
                    input: task.title,
                };
            }
            KeyCode::Char('a') => self.request_breakdown(&task_id),
            KeyCode::Char('d') => self.mode = Mode::ConfirmDelete { task },
            _ => {}
        }
    }

    fn back_to_detail(&mut self, task_id: String) {
        self.mode = if self.board.get(&task_id).is_some() {
            Mode::TaskDetail { task_id, cursor: 0 }
        } else {
            Mode::Normal
        };
    }

    fn handle_edit_title(&mut self, key: KeyEvent, task_id: String, mut input: String) {
        match key.code {
            KeyCode::Enter => {
                if self.board.rename_task(&task_id, &input).is_ok() {
                    self.commit();
                    self.status_message = Some("Title updated".into());
                }
                self.back_to_detail(task_id);
            }
            KeyCode::Esc => self.back_to_detail(task_id),
            KeyCode::Backspace => {
                input.pop();
                self.mode = Mode::EditTitle { task_id, input };
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.mode = Mode::EditTitle { task_id, input };
            }
            _ => {}
        }
    }

    fn handle_edit_description(&mut self, key: KeyEvent, task_id: String, mut input: String) {
        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                match self.board.update_description(&task_id, &input) {
                    Ok(()) => {
                        self.commit();
                        self.status_message = Some("Description updated".into());
                    }
                    Err(e) => self.status_message = Some(format!("Error: {e}")),
                }
                self.back_to_detail(task_id);
            }
            KeyCode::Esc => self.back_to_detail(task_id),
            KeyCode::Enter => {
                input.push('\n');
                self.mode = Mode::EditDescription { task_id, input };
            }
            KeyCode::Backspace => {
                input.pop();
                self.mode = Mode::EditDescription { task_id, input };
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.mode = Mode::EditDescription { task_id, input };
            }
            _ => {}
        }
    }

    fn handle_new_subtask(&mut self, key: KeyEvent, task_id: String, mut input: String) {
        match key.code {
            KeyCode::Enter => {
                if self.board.add_subtask(&task_id, &input).is_ok() {
                    self.commit();
                    self.status_message = Some("Subtask added".into());
                }
                self.back_to_detail(task_id);
            }
            KeyCode::Esc => self.back_to_detail(task_id),
            KeyCode::Backspace => {
                input.pop();
                self.mode = Mode::NewSubtask { task_id, input };
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.mode = Mode::NewSubtask { task_id, input };
            }
            _ => {}
        }
    }

    fn handle_confirm_delete(&mut self, key: KeyEvent, task: Task) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.board.delete_task(&task.id) {
                    Ok(removed) => {
                        self.expanded.remove(&removed.id);
                        info!(task_id = %removed.id, "task deleted");
                        self.commit();
                        self.status_message = Some(format!("Deleted: {}", removed.title));
                    }
                    Err(e) => self.status_message = Some(format!("Error: {e}")),
                }
                self.mode = Mode::Normal;
            }
            _ => self.mode = Mode::Normal,
        }
    }

    // -- Drag and drop --

    fn handle_dragging(&mut self, key: KeyEvent, active: Task, over: Option<DropTarget>) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let target = self.vertical_target(&active.id, over.as_ref(), 1);
                self.hover(active, over, target);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let target = self.vertical_target(&active.id, over.as_ref(), -1);
                self.hover(active, over, target);
            }
            KeyCode::Char('h') | KeyCode::Left => {
                let target = self.horizontal_target(&active.id, false);
                self.hover(active, over, target);
            }
            KeyCode::Char('l') | KeyCode::Right => {
                let target = self.horizontal_target(&active.id, true);
                self.hover(active, over, target);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let outcome = self.board.drag_end(&active.id, over.as_ref());
                info!(
                    task_id = %active.id,
                    reordered = outcome.reordered,
                    done = outcome.landed_in_done,
                    "card dropped"
                );
                self.commit();
                self.view.select_task_by_id(&active.id);
                if outcome.landed_in_done {
                    self.status_message = Some(format!("✨ \"{}\" is done! ✨", active.title));
                }
                self.mode = Mode::Normal;
            }
            KeyCode::Esc => {
                self.board.drag_end(&active.id, None);
                self.commit();
                self.view.select_task_by_id(&active.id);
                self.mode = Mode::Normal;
            }
            _ => {}
        }
    }

    /// Next card up or down from the current hover position, within the
    /// active card's column.
    fn vertical_target(
        &self,
        active_id: &str,
        over: Option<&DropTarget>,
        offset: isize,
    ) -> Option<DropTarget> {
        let active_status = self.board.get(active_id)?.status;
        let from = match over {
            Some(DropTarget::Task(id))
                if self.board.get(id).is_some_and(|t| t.status == active_status) =>
            {
                id.as_str()
            }
            _ => active_id,
        };
        self.board
            .neighbour(from, offset)
            .map(|t| DropTarget::Task(t.id.clone()))
    }

    /// The card at the same row in the adjacent column, or the column itself
    /// when it is empty.
    fn horizontal_target(&self, active_id: &str, forward: bool) -> Option<DropTarget> {
        let status = self.board.get(active_id)?.status;
        let next = if forward { status.next() } else { status.prev() }?;
        let row = self
            .board
            .column(status)
            .iter()
            .position(|t| t.id == active_id)
            .unwrap_or(0);
        let column = self.board.column(next);
        match column.get(row.min(column.len().saturating_sub(1))) {
            Some(task) => Some(DropTarget::Task(task.id.clone())),
            None => Some(DropTarget::Column(next)),
        }
    }

    fn hover(&mut self, active: Task, over: Option<DropTarget>, target: Option<DropTarget>) {
        let Some(target) = target else {
            self.mode = Mode::Dragging { active, over };
            return;
        };
        if self.board.drag_over(&active.id, &target) {
            self.commit();
        }
        self.view.select_task_by_id(&active.id);
        self.mode = Mode::Dragging {
            active,
            over: Some(target),
        };
    }

    // -- Rendering --

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let summary_height = if self.ai_summary.is_some() { 5 } else { 0 };

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(summary_height),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title_bar(frame, layout[0]);
        if let Some(ref summary) = self.ai_summary {
            self.render_summary(frame, summary, layout[1]);
        }
        let dragging = match &self.mode {
            Mode::Dragging { active, .. } => Some(active.id.as_str()),
            _ => None,
        };
        let hints = CardHints {
            expanded: Some(&self.expanded),
            generating: Some(&self.generating),
            dragging,
        };
        self.view.render(frame, layout[2], &hints);
        self.render_status_bar(frame, layout[3]);
        self.render_footer(frame, layout[4]);

        // Overlays
        match &self.mode {
            Mode::Normal => {}
            Mode::NewTask { input } => self.render_input_bar(frame, " New task ", input, area),
            Mode::TaskDetail { task_id, cursor } => {
                if let Some(task) = self.board.get(task_id) {
                    self.render_task_detail(frame, task, *cursor, area)
                }
            }
            Mode::EditTitle { input, .. } => self.render_input_bar(frame, " Title ", input, area),
            Mode::EditDescription { input, .. } => {
                self.render_description_editor(frame, input, area)
            }
            Mode::NewSubtask { input, .. } => {
                self.render_input_bar(frame, " New subtask ", input, area)
            }
            Mode::ConfirmDelete { task } => self.render_confirm_delete_dialog(frame, task, area),
            Mode::Dragging { active, over } => {
                self.render_drag_overlay(frame, active, over.as_ref(), area)
            }
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(" ZenBoard ", Style::default().bold().fg(Color::Cyan)),
            Span::styled("AI", Style::default().bold().fg(Color::Magenta)),
            Span::raw(" | "),
        ];
        if self.summarizing {
            spans.push(Span::styled(
                format!("{} Summarizing...", SPINNER[self.ticks % SPINNER.len()]),
                Style::default().fg(Color::Yellow),
            ));
        } else {
            spans.push(Span::styled(
                "[s] AI Summary",
                Style::default().fg(Color::DarkGray),
            ));
        }
        if !self.generating.is_empty() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                format!(
                    "{} Breaking down {} task(s)",
                    SPINNER[self.ticks % SPINNER.len()],
                    self.generating.len()
                ),
                Style::default().fg(Color::Yellow),
            ));
        }
        frame.render_widget(Line::from(spans), area);
    }

    fn render_summary(&self, frame: &mut Frame, summary: &str, area: Rect) {
        let block = Block::default()
            .title(" AI Assistant Insights ")
            .title_bottom(Line::from(" x dismiss ").right_aligned())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));
        let paragraph = Paragraph::new(summary)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some(ref msg) = self.status_message {
            let line = Line::from(Span::styled(
                format!(" {msg}"),
                Style::default().fg(Color::Green),
            ));
            frame.render_widget(line, area);
            return;
        }

        let hints = match &self.mode {
            Mode::Normal => vec![
                ("q", "quit"),
                ("h/l", "cols"),
                ("j/k", "rows"),
                ("n", "new"),
                ("Enter", "detail"),
                ("space", "drag"),
                ("a", "AI breakdown"),
                ("o", "expand"),
                ("s", "summary"),
                ("d", "delete"),
            ],
            Mode::TaskDetail { .. } => vec![
                ("Esc", "back"),
                ("j/k", "subtask"),
                ("space", "toggle"),
                ("n", "add subtask"),
                ("e", "description"),
                ("t", "title"),
                ("a", "AI breakdown"),
                ("d", "delete"),
            ],
            Mode::Dragging { .. } => vec![
                ("h/l", "column"),
                ("j/k", "position"),
                ("Enter/space", "drop"),
                ("Esc", "release"),
            ],
            Mode::EditDescription { .. } => vec![("Ctrl+S", "save"), ("Esc", "cancel")],
            Mode::ConfirmDelete { .. } => vec![("y", "delete"), ("any", "cancel")],
            _ => vec![("Enter", "save"), ("Esc", "cancel")],
        };

        let mut spans = Vec::new();
        for (i, (key, desc)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
            spans.push(Span::raw(format!(" {desc}")));
        }
        frame.render_widget(Line::from(spans), area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let model = self
            .assistant
            .model_hint()
            .unwrap_or_else(|| self.assistant.name());
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        frame.render_widget(
            Line::from(" Data stored locally").style(Style::default().fg(Color::DarkGray)),
            halves[0],
        );
        frame.render_widget(
            Line::from(format!("Powered by {model} "))
                .style(Style::default().fg(Color::DarkGray))
                .right_aligned(),
            halves[1],
        );
    }

    fn render_input_bar(&self, frame: &mut Frame, label: &str, input: &str, area: Rect) {
        let input_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(3),
            width: area.width,
            height: 3.min(area.height),
        };
        frame.render_widget(Clear, input_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(label);
        let paragraph = Paragraph::new(input).block(block);
        frame.render_widget(paragraph, input_area);
    }

    fn render_task_detail(&self, frame: &mut Frame, task: &Task, cursor: usize, area: Rect) {
        let popup = centered_rect(60, 70, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Task Detail ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let (done, total) = task.progress();
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Title: ", Style::default().bold()),
                Span::raw(task.title.as_str()),
            ]),
            Line::from(vec![
                Span::styled("Status: ", Style::default().bold()),
                Span::styled(task.status.display_name(), status_style(task.status)),
            ]),
            Line::from(vec![
                Span::styled("Created: ", Style::default().bold()),
                Span::raw(task.created_at.format("%Y-%m-%d %H:%M").to_string()),
            ]),
            Line::from(""),
            Line::from(Span::styled("Description:", Style::default().bold())),
        ];

        if task.description.is_empty() {
            lines.push(Line::from(Span::styled(
                "  (no description)",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            for line in task.description.lines() {
                lines.push(Line::from(format!("  {line}")));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                format!("Subtasks ({done}/{total}) "),
                Style::default().bold(),
            ),
            Span::styled(
                progress_bar(task.progress_ratio(), 10),
                Style::default().fg(Color::Green),
            ),
        ]));
        if self.generating.contains(&task.id) {
            lines.push(Line::from(Span::styled(
                format!("  {} AI is thinking...", SPINNER[self.ticks % SPINNER.len()]),
                Style::default().fg(Color::Yellow),
            )));
        }
        if task.sub_tasks.is_empty() {
            lines.push(Line::from(Span::styled(
                "  (none yet, press a for an AI breakdown)",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for (i, sub) in task.sub_tasks.iter().enumerate() {
            let check = if sub.completed { "[x]" } else { "[ ]" };
            let mut style = if sub.completed {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };
            if i == cursor {
                style = style.fg(Color::Black).bg(Color::Cyan);
            }
            lines.push(Line::from(Span::styled(
                format!("  {check} {}", sub.title),
                style,
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);
    }

    fn render_description_editor(&self, frame: &mut Frame, input: &str, area: Rect) {
        let popup = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Edit Description (Ctrl+S save, Esc cancel) ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let paragraph = Paragraph::new(input)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup);
    }

    fn render_confirm_delete_dialog(&self, frame: &mut Frame, task: &Task, area: Rect) {
        let popup = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Confirm Delete ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));

        let text = format!("Delete \"{}\"?\n\n(y)es / (any key) cancel", task.title);
        let paragraph = Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup);
    }

    fn render_drag_overlay(
        &self,
        frame: &mut Frame,
        active: &Task,
        over: Option<&DropTarget>,
        area: Rect,
    ) {
        let popup = centered_rect(40, 25, area);
        frame.render_widget(Clear, popup);

        let target = match over {
            Some(DropTarget::Task(id)) if *id == active.id => "itself".to_string(),
            Some(DropTarget::Task(id)) => match self.board.get(id) {
                Some(t) => format!("\"{}\"", t.title),
                None => "nothing".to_string(),
            },
            Some(DropTarget::Column(status)) => {
                format!("{} column", Column::for_status(*status).title)
            }
            None => "nothing".to_string(),
        };

        let block = Block::default()
            .title(" Moving ")
            .title_bottom(Line::from(format!(" over {target} ")).right_aligned())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        let paragraph = Paragraph::new(card_lines(active, CardFlags::default()))
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup);
    }
}

fn status_style(s: Status) -> Style {
    match s {
        Status::Todo => Style::default().fg(Color::Blue),
        Status::InProgress => Style::default().fg(Color::Yellow),
        Status::Done => Style::default().fg(Color::Green),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
