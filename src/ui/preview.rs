//! Preview pane content and link hit-testing.

use ratatui::text::Line;
use unicode_width::UnicodeWidthChar;

/// Byte index of the char shown at display column `col`, if any.
pub fn byte_at_display_col(line: &str, col: usize) -> Option<usize> {
    let mut x = 0;
    for (idx, ch) in line.char_indices() {
        let width = ch.width().unwrap_or(0);
        if col < x + width.max(1) {
            return Some(idx);
        }
        x += width;
    }
    None
}

/// The `href` of the anchor drawn under display column `col` of `line`.
///
/// An anchor spans from its opening `<a ` tag to the end of its `</a>`, or to
/// the end of the opening tag when the close is on another line.
pub fn href_at(line: &str, col: usize) -> Option<String> {
    let target = byte_at_display_col(line, col)?;
    for (start, _) in line.match_indices("<a ") {
        if start > target {
            break;
        }
        let tag_end = line[start..].find('>').map_or(line.len(), |i| start + i + 1);
        let anchor_end = line[start..]
            .find("</a>")
            .map_or(tag_end, |i| start + i + "</a>".len());
        if target < anchor_end {
            return href_attribute(&line[start..tag_end]);
        }
    }
    None
}

fn href_attribute(tag: &str) -> Option<String> {
    let value_start = tag.find("href=\"")? + "href=\"".len();
    let value_len = tag[value_start..].find('"')?;
    Some(unescape_attribute(&tag[value_start..value_start + value_len]))
}

fn unescape_attribute(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Patched HTML as shown in the preview pane.
#[derive(Debug, Default)]
pub struct PreviewContent {
    html: String,
    lines: Vec<Line<'static>>,
    raw_lines: Vec<String>,
}

impl PreviewContent {
    pub fn set(&mut self, html: &str) {
        html.clone_into(&mut self.html);
        self.lines = crate::highlight::highlight_html(html);
        self.raw_lines = html.lines().map(ToOwned::to_owned).collect();
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.raw_lines.len()
    }

    /// Link under a cell of the preview's content area.
    pub fn href_at(&self, line: usize, col: usize) -> Option<String> {
        href_at(self.raw_lines.get(line)?, col)
    }
}
