use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use taskwatch_core::view::{RenderModel, StatusLine};

use crate::app::{App, InputMode};

pub fn ui(f: &mut Frame, app: &mut App, task: Option<(&str, &RenderModel)>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(5),
            Constraint::Length(8),
            Constraint::Length(3),
        ])
        .split(f.area());

    f.render_widget(summary(task), chunks[0]);

    let log_items: Vec<ListItem> = task
        .map(|(_, model)| {
            model
                .log
                .iter()
                .rev()
                .map(|entry| ListItem::new(entry.summary()))
                .collect()
        })
        .unwrap_or_default();
    let log = List::new(log_items).block(Block::default().borders(Borders::ALL).title("Log (newest first)"));
    f.render_widget(log, chunks[1]);

    let messages: Vec<ListItem> = app
        .messages
        .iter()
        .map(|m| ListItem::new(m.as_str()))
        .collect();
    let messages = List::new(messages)
        .block(Block::default().borders(Borders::ALL).title("Activity"))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));
    f.render_stateful_widget(messages, chunks[2], &mut app.scroll_state);

    let (title, style) = match app.input_mode {
        InputMode::Normal => ("Press e to edit, q to quit", Style::default()),
        InputMode::Editing => ("Command (Esc to leave)", Style::default().fg(Color::Yellow)),
    };
    let input = Paragraph::new(app.input.as_str())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, chunks[3]);
}

fn summary(task: Option<(&str, &RenderModel)>) -> Paragraph<'static> {
    let Some((id, model)) = task else {
        return Paragraph::new("No task. Submit one with /start.")
            .block(Block::default().borders(Borders::ALL).title("Task"));
    };

    let status_color = match model.status {
        StatusLine::Running => Color::Green,
        StatusLine::Stopped => Color::Gray,
        StatusLine::Error(_) => Color::Red,
    };

    let mut lines = model.lines().into_iter();
    let mut text = Vec::new();
    if let Some(status) = lines.next() {
        text.push(Line::from(Span::styled(
            status,
            Style::default().fg(status_color).add_modifier(Modifier::BOLD),
        )));
    }
    text.extend(lines.map(Line::from));

    Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Task {id}")),
    )
}
