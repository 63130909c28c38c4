use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use zenboard_core::{Board, Column, Task};

use super::card::{card_lines, CardFlags};

/// Per-card decoration owned by the app rather than the board.
#[derive(Default)]
pub struct CardHints<'a> {
    pub expanded: Option<&'a HashSet<String>>,
    pub generating: Option<&'a HashSet<String>>,
    pub dragging: Option<&'a str>,
}

impl CardHints<'_> {
    fn flags(&self, task: &Task) -> CardFlags {
        CardFlags {
            expanded: self.expanded.is_some_and(|s| s.contains(&task.id)),
            generating: self.generating.is_some_and(|s| s.contains(&task.id)),
            dragging: self.dragging == Some(task.id.as_str()),
        }
    }
}

/// Column-by-column view of a [`Board`] with a cursor.
pub struct TaskBoard {
    columns: Vec<BoardColumn>,
    active_column: usize,
}

struct BoardColumn {
    column: Column,
    tasks: Vec<Task>,
    list_state: ListState,
}

impl TaskBoard {
    pub fn new(board: &Board) -> Self {
        let columns = Column::ALL
            .iter()
            .map(|&column| {
                let tasks: Vec<Task> = board.column(column.id).into_iter().cloned().collect();
                let mut list_state = ListState::default();
                if !tasks.is_empty() {
                    list_state.select(Some(0));
                }
                BoardColumn {
                    column,
                    tasks,
                    list_state,
                }
            })
            .collect();
        Self {
            columns,
            active_column: 0,
        }
    }

    /// Rebuild from `board`, keeping the cursor on the same column and,
    /// when it still exists, on the same task.
    pub fn refresh(&mut self, board: &Board) {
        let selected_id = self.selected_task().map(|t| t.id.clone());
        let active_column = self.active_column;
        let previous_row = self.selected_row();
        *self = Self::new(board);
        self.active_column = active_column;
        if let Some(id) = selected_id {
            if self.select_task_by_id(&id) {
                return;
            }
        }
        if let Some(col) = self.columns.get_mut(active_column) {
            if !col.tasks.is_empty() {
                let row = previous_row.unwrap_or(0).min(col.tasks.len() - 1);
                col.list_state.select(Some(row));
            }
        }
    }

    /// Returns the currently highlighted task, if any.
    pub fn selected_task(&self) -> Option<&Task> {
        let col = self.columns.get(self.active_column)?;
        let idx = col.list_state.selected()?;
        col.tasks.get(idx)
    }

    /// Row of the highlighted task within its column.
    pub fn selected_row(&self) -> Option<usize> {
        self.columns.get(self.active_column)?.list_state.selected()
    }

    /// Attempt to select the task with the given ID.
    /// Scans all columns; if found, moves the cursor there.
    /// Returns `true` if the task was found and selected, `false` otherwise.
    pub fn select_task_by_id(&mut self, task_id: &str) -> bool {
        for (col_idx, col) in self.columns.iter_mut().enumerate() {
            if let Some(task_idx) = col.tasks.iter().position(|t| t.id == task_id) {
                self.active_column = col_idx;
                col.list_state.select(Some(task_idx));
                return true;
            }
        }
        false
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => {
                if self.active_column > 0 {
                    self.active_column -= 1;
                }
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if self.active_column + 1 < self.columns.len() {
                    self.active_column += 1;
                }
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if let Some(col) = self.columns.get_mut(self.active_column) {
                    let current = col.list_state.selected().unwrap_or(0);
                    if current + 1 < col.tasks.len() {
                        col.list_state.select(Some(current + 1));
                    }
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if let Some(col) = self.columns.get_mut(self.active_column) {
                    let current = col.list_state.selected().unwrap_or(0);
                    if current > 0 {
                        col.list_state.select(Some(current - 1));
                    }
                }
            }
            // Jump to first/last
            KeyCode::Char('g') => {
                if let Some(col) = self.columns.get_mut(self.active_column) {
                    if !col.tasks.is_empty() {
                        col.list_state.select(Some(0));
                    }
                }
            }
            KeyCode::Char('G') => {
                if let Some(col) = self.columns.get_mut(self.active_column) {
                    if !col.tasks.is_empty() {
                        col.list_state.select(Some(col.tasks.len() - 1));
                    }
                }
            }
            _ => {}
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, hints: &CardHints) {
        let col_count = self.columns.len() as u16;
        if col_count == 0 {
            return;
        }

        let constraints: Vec<Constraint> = (0..col_count)
            .map(|_| Constraint::Ratio(1, col_count as u32))
            .collect();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (i, (col, chunk)) in self.columns.iter().zip(chunks.iter()).enumerate() {
            let is_active = i == self.active_column;
            self.render_column(frame, col, *chunk, is_active, hints);
        }
    }

    fn render_column(
        &self,
        frame: &mut Frame,
        col: &BoardColumn,
        area: Rect,
        is_active: bool,
        hints: &CardHints,
    ) {
        let title = format!(" {} ({}) ", col.column.title, col.tasks.len());

        let border_style = if hints.dragging.is_some() && is_active {
            Style::default().fg(Color::Yellow)
        } else if is_active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        if col.tasks.is_empty() {
            let placeholder = Paragraph::new("Drag tasks here")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        }

        let items: Vec<ListItem> = col
            .tasks
            .iter()
            .map(|task| {
                let mut lines = card_lines(task, hints.flags(task));
                lines.push(Line::default());
                ListItem::new(lines)
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan))
            .highlight_symbol("> ");

        let mut state = col.list_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }
}
