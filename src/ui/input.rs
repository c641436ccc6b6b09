use std::path::PathBuf;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use super::layout::contains;
use super::view::{ViewState, char_col_at_display};
use crate::app::{ClickTarget, Shortcut, UiEvent};
use crate::editor::Direction;

const WHEEL_LINES: isize = 3;

/// Turn a terminal event into a controller event, applying any purely visual
/// effect (cursor movement, scrolling, focus) to `view` along the way.
pub fn translate_event(view: &mut ViewState, event: Event, area: Rect) -> Option<UiEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => translate_key(view, key, area),
        Event::Mouse(mouse) => translate_mouse(view, mouse, area),
        Event::Paste(text) => translate_paste(view, &text),
        _ => None,
    }
}

pub fn translate_key(view: &mut ViewState, key: KeyEvent, area: Rect) -> Option<UiEvent> {
    if let Some(prompt) = view.prompt.as_mut() {
        if prompt.handle_key(key) {
            view.prompt = None;
        }
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => return Some(UiEvent::QuitRequested),
        KeyCode::Char('q') if ctrl => return Some(UiEvent::Shortcut(Shortcut::Quit)),
        KeyCode::Char('o') if ctrl => return Some(UiEvent::Shortcut(Shortcut::Open)),
        KeyCode::Char('s') if ctrl => return Some(UiEvent::Shortcut(Shortcut::Save)),
        KeyCode::F(2) => return Some(UiEvent::Shortcut(Shortcut::DumpHtml)),
        _ => {}
    }

    if view.editor_focused {
        if key.code == KeyCode::Esc {
            view.editor_focused = false;
            return None;
        }
        return edit_key(view, key);
    }

    let page = isize::try_from(view.panes(area).preview_inner().height.max(1)).unwrap_or(1);
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(UiEvent::CloseRequested),
        KeyCode::Char('i') | KeyCode::Enter => view.editor_focused = true,
        KeyCode::Char('j') | KeyCode::Down => view.scroll_preview(1),
        KeyCode::Char('k') | KeyCode::Up => view.scroll_preview(-1),
        KeyCode::PageDown | KeyCode::Char(' ') => view.scroll_preview(page),
        KeyCode::PageUp => view.scroll_preview(-page),
        KeyCode::Home | KeyCode::Char('g') => view.preview_scroll = 0,
        KeyCode::End | KeyCode::Char('G') => view.scroll_preview(isize::MAX),
        KeyCode::Left | KeyCode::Char('h') => view.scroll_preview_horizontal(-4),
        KeyCode::Right | KeyCode::Char('l') => view.scroll_preview_horizontal(4),
        _ => {}
    }
    None
}

fn edit_key(view: &mut ViewState, key: KeyEvent) -> Option<UiEvent> {
    // AltGr arrives as Ctrl+Alt on Windows and still types a character.
    let alt_gr = KeyModifiers::CONTROL | KeyModifiers::ALT;
    let plain = !key.modifiers.intersects(alt_gr) || key.modifiers.contains(alt_gr);
    let editor = &mut view.editor;
    let changed = match key.code {
        KeyCode::Char(ch) if plain => {
            editor.insert_char(ch);
            true
        }
        KeyCode::Enter => {
            editor.split_line();
            true
        }
        KeyCode::Tab => {
            editor.insert_str("    ");
            true
        }
        KeyCode::Backspace => editor.delete_back(),
        KeyCode::Delete => editor.delete_forward(),
        KeyCode::Left => {
            editor.move_cursor(Direction::Left);
            false
        }
        KeyCode::Right => {
            editor.move_cursor(Direction::Right);
            false
        }
        KeyCode::Up => {
            editor.move_cursor(Direction::Up);
            false
        }
        KeyCode::Down => {
            editor.move_cursor(Direction::Down);
            false
        }
        KeyCode::Home => {
            editor.move_home();
            false
        }
        KeyCode::End => {
            editor.move_end();
            false
        }
        _ => false,
    };
    changed.then_some(UiEvent::TextChanged)
}

pub fn translate_mouse(view: &mut ViewState, mouse: MouseEvent, area: Rect) -> Option<UiEvent> {
    if view.prompt.is_some() || view.modal.is_some() {
        return None;
    }
    let panes = view.panes(area);
    let (column, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if contains(panes.open_button, column, row) {
                return Some(UiEvent::Click(ClickTarget::ToolbarOpen));
            }
            if contains(panes.save_button, column, row) {
                return Some(UiEvent::Click(ClickTarget::ToolbarSave));
            }
            let editor = panes.editor_inner();
            if contains(editor, column, row) {
                view.editor_focused = true;
                let line = (view.editor_scroll + usize::from(row - editor.y))
                    .min(view.editor.line_count().saturating_sub(1));
                let x = view.editor_hscroll + usize::from(column - editor.x);
                let text = view.editor.line_at(line).unwrap_or_default();
                view.editor.move_to(line, char_col_at_display(&text, x));
                return None;
            }
            if contains(panes.editor, column, row) {
                view.editor_focused = true;
                return None;
            }
            let preview = panes.preview_inner();
            if contains(preview, column, row) {
                view.editor_focused = false;
                let line = view.preview_scroll + usize::from(row - preview.y);
                let col = view.preview_hscroll + usize::from(column - preview.x);
                return view
                    .preview
                    .href_at(line, col)
                    .map(|href| UiEvent::Click(ClickTarget::Link(href)));
            }
            None
        }
        MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
            let delta = if mouse.kind == MouseEventKind::ScrollDown {
                WHEEL_LINES
            } else {
                -WHEEL_LINES
            };
            if contains(panes.preview, column, row) {
                view.scroll_preview(delta);
            } else if contains(panes.editor, column, row) {
                let direction = if delta > 0 {
                    Direction::Down
                } else {
                    Direction::Up
                };
                for _ in 0..WHEEL_LINES {
                    view.editor.move_cursor(direction);
                }
            }
            None
        }
        _ => None,
    }
}

pub fn translate_paste(view: &mut ViewState, text: &str) -> Option<UiEvent> {
    if let Some(prompt) = view.prompt.as_mut() {
        prompt.paste(text);
        return None;
    }
    if view.modal.is_some() {
        return None;
    }
    if view.editor_focused {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        if text.is_empty() {
            return None;
        }
        view.editor.insert_str(&text);
        return Some(UiEvent::TextChanged);
    }
    dropped_path(text).map(UiEvent::DropFile)
}

/// Path pasted into the unfocused window, as terminals deliver drag-and-drop.
pub fn dropped_path(text: &str) -> Option<PathBuf> {
    let text = text.trim();
    let text = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .or_else(|| text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')))
        .unwrap_or(text);
    let text = text.strip_prefix("file://").unwrap_or(text);
    if text.is_empty() || text.contains('\n') {
        return None;
    }
    Some(PathBuf::from(text))
}
