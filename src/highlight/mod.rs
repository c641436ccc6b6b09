//! Syntax highlighting for the preview pane.
//!
//! The preview shows the patched HTML itself, coloured with syntect's HTML
//! syntax definition.

use std::sync::OnceLock;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Highlight `html` into one ratatui line per source line.
///
/// Falls back to unstyled lines when no HTML syntax is available.
pub fn highlight_html(html: &str) -> Vec<Line<'static>> {
    let syntax_set = syntax_set();
    let Some(syntax) = syntax_set.find_syntax_by_extension("html") else {
        return html.lines().map(|line| Line::raw(line.to_string())).collect();
    };

    let mode = background_mode();
    let mut highlighter = HighlightLines::new(syntax, theme());
    let mut lines = Vec::new();
    for line in LinesWithEndings::from(html) {
        let ranges = match highlighter.highlight_line(line, syntax_set) {
            Ok(ranges) => ranges,
            Err(err) => {
                tracing::debug!(%err, "html highlight failed for line");
                lines.push(Line::raw(line.trim_end_matches(['\n', '\r']).to_string()));
                continue;
            }
        };
        let spans = ranges
            .into_iter()
            .map(|(style, text)| (style, text.trim_end_matches(['\n', '\r'])))
            .filter(|(_, text)| !text.is_empty())
            .map(|(style, text)| {
                let fg = adjust_fg_for_background(
                    (style.foreground.r, style.foreground.g, style.foreground.b),
                    mode,
                );
                Span::styled(text.to_string(), Style::default().fg(Color::Rgb(fg.0, fg.1, fg.2)))
            })
            .collect::<Vec<_>>();
        lines.push(Line::from(spans));
    }
    lines
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> &'static Theme {
    static THEME: OnceLock<Theme> = OnceLock::new();
    THEME.get_or_init(|| {
        let theme_set = ThemeSet::load_defaults();
        let preferred = match background_mode() {
            BackgroundMode::Dark => ["base16-ocean.dark", "Solarized (dark)"].as_slice(),
            BackgroundMode::Light => ["InspiredGitHub", "base16-ocean.light"].as_slice(),
        };

        for name in preferred {
            if let Some(theme) = theme_set.themes.get(*name) {
                return theme.clone();
            }
        }

        theme_set
            .themes
            .values()
            .next()
            .cloned()
            .unwrap_or_default()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackgroundMode {
    Dark,
    Light,
}

fn background_mode() -> BackgroundMode {
    background_mode_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_mode_from_colorfgbg(colorfgbg: Option<&str>) -> BackgroundMode {
    let Some(value) = colorfgbg else {
        return BackgroundMode::Dark;
    };
    let bg = value.rsplit(';').next().unwrap_or(value);
    match bg.parse::<u8>() {
        Ok(bg) if bg >= 7 => BackgroundMode::Light,
        _ => BackgroundMode::Dark,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn adjust_fg_for_background((r, g, b): (u8, u8, u8), mode: BackgroundMode) -> (u8, u8, u8) {
    if mode == BackgroundMode::Dark {
        return (r, g, b);
    }
    let luma = 0.0722f32.mul_add(
        f32::from(b),
        0.2126f32.mul_add(f32::from(r), 0.7152 * f32::from(g)),
    );
    if luma < 155.0 {
        return (r, g, b);
    }
    let darken = |c: u8| (f32::from(c) * 0.42).round() as u8;
    (darken(r), darken(g), darken(b))
}
