use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};

pub const OPEN_BUTTON: &str = "[ Open ]";
pub const SAVE_BUTTON: &str = "[ Save ]";

/// Where every part of the window sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panes {
    pub toolbar: Rect,
    pub open_button: Rect,
    pub save_button: Rect,
    pub label: Rect,
    /// Editor block including its border
    pub editor: Rect,
    /// Preview block including its border
    pub preview: Rect,
    pub hints: Rect,
}

impl Panes {
    pub fn compute(area: Rect, preview_percent: u16) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(3), Constraint::Length(1)])
            .split(area);
        let toolbar = rows[0];

        #[allow(clippy::cast_possible_truncation)]
        let button_width = OPEN_BUTTON.len() as u16;
        let open_button = clip(Rect::new(toolbar.x + 1, toolbar.y, button_width, 1), toolbar);
        let save_button = clip(
            Rect::new(open_button.x + button_width + 2, toolbar.y, button_width, 1),
            toolbar,
        );
        let label_x = save_button.x + button_width + 2;
        let label = clip(
            Rect::new(label_x, toolbar.y, toolbar.width.saturating_sub(label_x - toolbar.x), 1),
            toolbar,
        );

        let preview_percent = preview_percent.clamp(10, 90);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(100 - preview_percent),
                Constraint::Percentage(preview_percent),
            ])
            .split(rows[1]);

        Self {
            toolbar,
            open_button,
            save_button,
            label,
            editor: columns[0],
            preview: columns[1],
            hints: rows[2],
        }
    }

    pub fn editor_inner(&self) -> Rect {
        self.editor.inner(Margin::new(1, 1))
    }

    pub fn preview_inner(&self) -> Rect {
        self.preview.inner(Margin::new(1, 1))
    }
}

pub const fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

pub fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}

fn clip(rect: Rect, bounds: Rect) -> Rect {
    rect.intersection(bounds)
}
