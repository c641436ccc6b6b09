use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use super::layout::centered_popup_rect;
use crate::app::{DialogReply, FileFilter};
use crate::document::CloseChoice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Open,
    Save,
}

/// Path-entry dialog standing in for the native open/save dialogs.
#[derive(Debug)]
pub struct PathPrompt {
    pub kind: DialogKind,
    pub input: String,
    pub filters: Vec<FileFilter>,
    reply: Option<DialogReply>,
}

impl PathPrompt {
    pub fn new(kind: DialogKind, filters: &[FileFilter], reply: DialogReply) -> Self {
        Self {
            kind,
            input: String::new(),
            filters: filters.to_vec(),
            reply: Some(reply),
        }
    }

    /// Feed a key. Returns `true` once the prompt is finished.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.resolve(None);
                true
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.resolve(None);
                true
            }
            KeyCode::Enter => {
                let path = self.input.trim();
                if path.is_empty() {
                    return false;
                }
                let path = PathBuf::from(path);
                self.resolve(Some(path));
                true
            }
            KeyCode::Backspace => {
                self.input.pop();
                false
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(ch);
                false
            }
            _ => false,
        }
    }

    pub fn paste(&mut self, text: &str) {
        self.input.push_str(text.trim_end_matches(['\n', '\r']));
    }

    /// Resolve as cancelled if still open.
    pub fn cancel(&mut self) {
        self.resolve(None);
    }

    fn resolve(&mut self, path: Option<PathBuf>) {
        if let Some(reply) = self.reply.take() {
            reply.resolve(path);
        }
    }
}

impl Drop for PathPrompt {
    fn drop(&mut self) {
        self.cancel();
    }
}

const CLOSE_BUTTONS: [(&str, CloseChoice); 3] = [
    ("Save and Close", CloseChoice::SaveAndClose),
    ("Close without Saving", CloseChoice::CloseWithoutSaving),
    ("Don't Close", CloseChoice::Cancel),
];

/// Blocking overlays drawn above everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    ConfirmClose { selected: usize },
    Message { title: String, message: String },
}

impl Modal {
    pub const fn confirm_close() -> Self {
        Self::ConfirmClose { selected: 0 }
    }
}

/// Feed a key to the close confirmation. Enter activates the selected button
/// (Save and Close by default), Esc means Don't Close.
pub fn confirm_close_key(selected: &mut usize, key: KeyEvent) -> Option<CloseChoice> {
    match key.code {
        KeyCode::Enter => Some(CLOSE_BUTTONS[*selected % CLOSE_BUTTONS.len()].1),
        KeyCode::Esc => Some(CloseChoice::Cancel),
        KeyCode::Char('s' | 'S') => Some(CloseChoice::SaveAndClose),
        KeyCode::Char('d' | 'D') => Some(CloseChoice::CloseWithoutSaving),
        KeyCode::Char('c' | 'C') => Some(CloseChoice::Cancel),
        KeyCode::Left | KeyCode::BackTab => {
            *selected = (*selected + CLOSE_BUTTONS.len() - 1) % CLOSE_BUTTONS.len();
            None
        }
        KeyCode::Right | KeyCode::Tab => {
            *selected = (*selected + 1) % CLOSE_BUTTONS.len();
            None
        }
        _ => None,
    }
}

fn popup_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White))
}

pub fn render_path_prompt(prompt: &PathPrompt, frame: &mut Frame, area: Rect) {
    let popup = centered_popup_rect(area.width.saturating_sub(10).max(40), 7, area);
    let title = match prompt.kind {
        DialogKind::Open => "Open File",
        DialogKind::Save => "Save As",
    };
    let filters = prompt
        .filters
        .iter()
        .map(|f| format!("{} ({})", f.name, f.pattern))
        .collect::<Vec<_>>()
        .join(", ");
    let dim = Style::default().fg(Color::Indexed(245));
    let lines = vec![
        Line::from(vec![
            Span::styled("Path: ", Style::default().fg(Color::Yellow)),
            Span::raw(prompt.input.clone()),
            Span::styled(" ", Style::default().bg(Color::White)),
        ]),
        Line::styled(filters, dim),
        Line::raw(""),
        Line::styled("Enter: confirm \u{2502} Esc: cancel", dim),
    ];
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(popup_block(title)), popup);
}

pub fn render_modal(modal: &Modal, frame: &mut Frame, area: Rect) {
    match modal {
        Modal::ConfirmClose { selected } => render_confirm_close(*selected, frame, area),
        Modal::Message { title, message } => render_message(title, message, frame, area),
    }
}

fn render_confirm_close(selected: usize, frame: &mut Frame, area: Rect) {
    let popup = centered_popup_rect(64, 7, area);
    let mut buttons = Vec::new();
    for (idx, (label, _)) in CLOSE_BUTTONS.iter().enumerate() {
        let style = if idx == selected % CLOSE_BUTTONS.len() {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        buttons.push(Span::styled(format!("[ {label} ]"), style));
        buttons.push(Span::raw(" "));
    }
    let lines = vec![
        Line::raw("You still have unsaved changes!"),
        Line::raw(""),
        Line::from(buttons),
        Line::styled(
            "Enter: choose \u{2502} s/d/c \u{2502} Esc: don't close",
            Style::default().fg(Color::Indexed(245)),
        ),
    ];
    let block = popup_block("Are you sure you want to close?").border_style(Style::default().fg(Color::Yellow));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn render_message(title: &str, message: &str, frame: &mut Frame, area: Rect) {
    #[allow(clippy::cast_possible_truncation)]
    let height = (message.lines().count() as u16).saturating_add(5);
    let popup = centered_popup_rect(area.width.saturating_sub(10).max(40), height, area);
    let mut lines: Vec<Line> = message.lines().map(|l| Line::raw(l.to_string())).collect();
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Press any key",
        Style::default().fg(Color::Indexed(245)),
    ));
    let block = popup_block(title).border_style(Style::default().fg(Color::Red));
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup,
    );
}
