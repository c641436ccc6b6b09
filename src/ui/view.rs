use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::layout::{OPEN_BUTTON, Panes, SAVE_BUTTON};
use super::overlays::{Modal, PathPrompt, render_modal, render_path_prompt};
use super::preview::PreviewContent;
use crate::editor::EditorBuffer;

/// Everything the terminal front end draws.
#[derive(Debug)]
pub struct ViewState {
    pub editor: EditorBuffer,
    pub editor_focused: bool,
    pub editor_scroll: usize,
    pub editor_hscroll: usize,
    pub preview: PreviewContent,
    pub preview_scroll: usize,
    pub preview_hscroll: usize,
    pub open_file_label: String,
    pub unsaved: bool,
    pub preview_percent: u16,
    pub prompt: Option<PathPrompt>,
    pub modal: Option<Modal>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(50)
    }
}

impl ViewState {
    pub fn new(preview_percent: u16) -> Self {
        Self {
            editor: EditorBuffer::empty(),
            editor_focused: true,
            editor_scroll: 0,
            editor_hscroll: 0,
            preview: PreviewContent::default(),
            preview_scroll: 0,
            preview_hscroll: 0,
            open_file_label: String::new(),
            unsaved: false,
            preview_percent,
            prompt: None,
            modal: None,
        }
    }

    pub fn panes(&self, area: Rect) -> Panes {
        Panes::compute(area, self.preview_percent)
    }

    /// Scroll the preview by `delta` lines, clamped to its content.
    pub fn scroll_preview(&mut self, delta: isize) {
        let max = self.preview.line_count().saturating_sub(1);
        self.preview_scroll = self.preview_scroll.saturating_add_signed(delta).min(max);
    }

    pub fn scroll_preview_horizontal(&mut self, delta: isize) {
        self.preview_hscroll = self.preview_hscroll.saturating_add_signed(delta);
    }

    /// Adjust the editor scroll so the cursor sits inside `inner`.
    pub fn ensure_cursor_visible(&mut self, inner: Rect) {
        let (line, col) = self.editor.cursor();
        let height = usize::from(inner.height.max(1));
        if line < self.editor_scroll {
            self.editor_scroll = line;
        } else if line >= self.editor_scroll + height {
            self.editor_scroll = line + 1 - height;
        }

        let text = self.editor.line_at(line).unwrap_or_default();
        let x = display_width_to(&text, col);
        let width = usize::from(inner.width.max(1));
        if x < self.editor_hscroll {
            self.editor_hscroll = x;
        } else if x >= self.editor_hscroll + width {
            self.editor_hscroll = x + 1 - width;
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let panes = self.panes(area);
        self.ensure_cursor_visible(panes.editor_inner());

        self.render_toolbar(frame, &panes);
        self.render_editor(frame, panes.editor);
        self.render_preview(frame, panes.preview);
        self.render_hints(frame, panes.hints);

        if let Some(prompt) = &self.prompt {
            render_path_prompt(prompt, frame, area);
        }
        if let Some(modal) = &self.modal {
            render_modal(modal, frame, area);
        }
    }

    fn render_toolbar(&self, frame: &mut Frame, panes: &Panes) {
        let button = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        frame.render_widget(Clear, panes.toolbar);
        frame.render_widget(Paragraph::new(OPEN_BUTTON).style(button), panes.open_button);
        frame.render_widget(Paragraph::new(SAVE_BUTTON).style(button), panes.save_button);

        let mut label = vec![Span::raw(self.open_file_label.clone())];
        if self.unsaved {
            label.push(Span::styled(
                " *",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(label)), panes.label);
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect) {
        let block = pane_block(" Markdown ", self.editor_focused);
        let inner = block.inner(area);
        let height = usize::from(inner.height);
        let (cursor_line, cursor_col) = self.editor.cursor();
        let end = (self.editor_scroll + height).min(self.editor.line_count());

        let mut content: Vec<Line> = Vec::new();
        for line_idx in self.editor_scroll..end {
            let text = self.editor.line_at(line_idx).unwrap_or_default();
            let text = skip_display_cols(&text, self.editor_hscroll);
            let col = if line_idx == cursor_line && self.editor_focused {
                Some(cursor_col.saturating_sub(text.skipped_chars))
            } else {
                None
            };
            content.push(editor_line(text.rest, col));
        }

        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(content).block(block), area);
    }

    fn render_preview(&self, frame: &mut Frame, area: Rect) {
        let block = pane_block(" Preview ", false);
        let inner = block.inner(area);
        let end = (self.preview_scroll + usize::from(inner.height)).min(self.preview.line_count());
        let start = self.preview_scroll.min(end);
        let lines = self.preview.lines().get(start..end).unwrap_or_default().to_vec();
        let hscroll = u16::try_from(self.preview_hscroll).unwrap_or(u16::MAX);

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines).block(block).scroll((0, hscroll)),
            area,
        );
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let hints = if self.editor_focused {
            "Esc: leave editor \u{2502} ^O open \u{2502} ^S save \u{2502} ^Q quit \u{2502} F2 dump html"
        } else {
            "i: edit \u{2502} \u{2191}\u{2193}/PgUp/PgDn: scroll preview \u{2502} ^O open \u{2502} ^S save \u{2502} q: quit"
        };
        frame.render_widget(
            Paragraph::new(hints).style(Style::default().fg(Color::Indexed(245))),
            area,
        );
    }
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border)
}

fn editor_line(text: &str, cursor_col: Option<usize>) -> Line<'static> {
    let Some(col) = cursor_col else {
        return Line::raw(text.to_string());
    };
    let split = text.char_indices().nth(col).map_or(text.len(), |(idx, _)| idx);
    let (before, rest) = text.split_at(split);
    let mut chars = rest.chars();
    let cursor_char = chars.next().map_or_else(|| " ".to_string(), String::from);
    let after = chars.as_str();

    let mut spans = Vec::new();
    if !before.is_empty() {
        spans.push(Span::raw(before.to_string()));
    }
    spans.push(Span::styled(
        cursor_char,
        Style::default().bg(Color::White).fg(Color::Black),
    ));
    if !after.is_empty() {
        spans.push(Span::raw(after.to_string()));
    }
    Line::from(spans)
}

/// Display width of the first `chars` chars of `text`.
pub fn display_width_to(text: &str, chars: usize) -> usize {
    text.chars().take(chars).map(|ch| ch.width().unwrap_or(0)).sum()
}

/// Char column under display column `x` of `text`, clamped to the line end.
pub fn char_col_at_display(text: &str, x: usize) -> usize {
    let mut width = 0;
    for (idx, ch) in text.chars().enumerate() {
        let w = ch.width().unwrap_or(0);
        if x < width + w.max(1) {
            return idx;
        }
        width += w;
    }
    text.chars().count()
}

struct Skipped<'a> {
    rest: &'a str,
    skipped_chars: usize,
}

fn skip_display_cols(text: &str, cols: usize) -> Skipped<'_> {
    if cols == 0 || text.width() == 0 {
        return Skipped {
            rest: text,
            skipped_chars: 0,
        };
    }
    let skipped_chars = char_col_at_display(text, cols);
    let byte = text
        .char_indices()
        .nth(skipped_chars)
        .map_or(text.len(), |(idx, _)| idx);
    Skipped {
        rest: &text[byte..],
        skipped_chars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_col_at_display_handles_wide_chars() {
        assert_eq!(char_col_at_display("ab", 1), 1);
        assert_eq!(char_col_at_display("你好", 1), 0);
        assert_eq!(char_col_at_display("你好", 2), 1);
        assert_eq!(char_col_at_display("ab", 10), 2);
    }

    #[test]
    fn test_display_width_to_counts_wide_chars() {
        assert_eq!(display_width_to("你好x", 2), 4);
        assert_eq!(display_width_to("abc", 10), 3);
    }

    #[test]
    fn test_ensure_cursor_visible_scrolls_down_and_right() {
        let mut view = ViewState::default();
        let text = (0..20).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        view.editor.set_text(&text);
        view.editor.move_to(15, 4);
        view.ensure_cursor_visible(Rect::new(0, 0, 3, 5));
        assert_eq!(view.editor_scroll, 11);
        assert_eq!(view.editor_hscroll, 2);

        view.editor.move_to(0, 0);
        view.ensure_cursor_visible(Rect::new(0, 0, 3, 5));
        assert_eq!(view.editor_scroll, 0);
        assert_eq!(view.editor_hscroll, 0);
    }

    #[test]
    fn test_preview_scroll_clamps() {
        let mut view = ViewState::default();
        view.preview.set("<p>a</p>\n<p>b</p>\n");
        view.scroll_preview(10);
        assert_eq!(view.preview_scroll, 1);
        view.scroll_preview(-5);
        assert_eq!(view.preview_scroll, 0);
    }

    #[test]
    fn test_editor_line_marks_cursor_past_end() {
        let line = editor_line("ab", Some(2));
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[1].content, " ");
    }
}
