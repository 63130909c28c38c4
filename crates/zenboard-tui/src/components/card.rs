use ratatui::prelude::*;
use zenboard_core::Task;

const BAR_WIDTH: usize = 10;

/// How a card should be decorated beyond its own data.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardFlags {
    pub expanded: bool,
    pub generating: bool,
    pub dragging: bool,
}

/// Fixed-width text progress bar, `█` for done and `░` for remaining.
pub fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    let mut bar = "█".repeat(filled);
    bar.push_str(&"░".repeat(width - filled));
    bar
}

/// The lines that make up one card in a column.
pub fn card_lines(task: &Task, flags: CardFlags) -> Vec<Line<'static>> {
    let title_style = if task.is_done() {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let mut title = Vec::new();
    if flags.generating {
        title.push(Span::styled("✦ ", Style::default().fg(Color::Yellow)));
    }
    if task.is_done() {
        title.push(Span::styled("▌", Style::default().fg(Color::Green)));
    }
    title.push(Span::styled(task.title.clone(), title_style));
    let mut lines = vec![Line::from(title)];

    let (done, total) = task.progress();
    if total > 0 {
        let toggle = if flags.expanded { "▴" } else { "▾" };
        lines.push(Line::from(vec![
            Span::styled(
                format!("  ✓ {done}/{total} subtasks "),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                progress_bar(task.progress_ratio(), BAR_WIDTH),
                Style::default().fg(Color::Green),
            ),
            Span::styled(format!(" {toggle}"), Style::default().fg(Color::DarkGray)),
        ]));

        if flags.expanded {
            for sub in &task.sub_tasks {
                let (mark, style) = if sub.completed {
                    (
                        "●",
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::CROSSED_OUT),
                    )
                } else {
                    ("○", Style::default())
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("    {mark} "), Style::default().fg(Color::Green)),
                    Span::styled(sub.title.clone(), style),
                ]));
            }
        }
    }

    if flags.dragging {
        lines = lines
            .into_iter()
            .map(|l| l.patch_style(Style::default().add_modifier(Modifier::DIM)))
            .collect();
    }
    lines
}
