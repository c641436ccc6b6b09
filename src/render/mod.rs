//! Markdown to HTML rendering.
//!
//! comrak parses the source with the GitHub-flavoured extensions and streams
//! its HTML through a [`FragmentPatcher`], which re-chunks the output into
//! tag and text fragments and applies the preview patches (self-closed
//! `<br />` and `<img ... />`, bullet glyph after every `<li>`).

mod patch;

pub use patch::{BULLET, FragmentPatcher, patch_fragment};

use comrak::{Arena, Options, format_html, parse_document};

/// Renders markdown source into the HTML shown by the preview pane.
///
/// `Renderer` holds no state between calls: the same input always produces
/// the same output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Renderer {
    safe_html: bool,
}

impl Renderer {
    /// Raw HTML in the source passes through to the output.
    pub const fn new() -> Self {
        Self { safe_html: false }
    }

    /// Replace raw HTML in the source with comrak's omission placeholder.
    pub const fn with_safe_html(mut self, safe: bool) -> Self {
        self.safe_html = safe;
        self
    }

    pub const fn safe_html(&self) -> bool {
        self.safe_html
    }

    /// Render `markdown` to patched HTML.
    ///
    /// Never fails. If the formatter reports an error the output produced so
    /// far is returned and the failure is logged.
    pub fn render(&self, markdown: &str) -> String {
        let markdown = markdown.strip_prefix('\u{feff}').unwrap_or(markdown);
        if markdown.is_empty() {
            return String::new();
        }

        let arena = Arena::new();
        let mut options = Options::default();
        configure(&mut options, self.safe_html);
        let root = parse_document(&arena, markdown, &options);

        let mut patcher = FragmentPatcher::new();
        if let Err(err) = format_html(root, &options, &mut patcher) {
            tracing::warn!(%err, "markdown html formatting failed, keeping partial output");
        }
        patcher.finish()
    }
}

/// Render with the default [`Renderer`].
pub fn render(markdown: &str) -> String {
    Renderer::new().render(markdown)
}

fn configure(options: &mut Options, safe_html: bool) {
    // GitHub dialect: tables, strikethrough, permissive autolinks, task lists
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;

    options.render.unsafe_ = !safe_html;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_input_renders_empty() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_heading_renders_plain_h1() {
        let html = render("# Title\n");
        assert!(html.contains("<h1>Title</h1>"), "got: {html}");
    }

    #[test]
    fn test_list_items_get_bullet_glyph() {
        let html = render("# Title\n\n- one\n- two\n");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<li>\u{2022} one</li>"), "got: {html}");
        assert!(html.contains("<li>\u{2022} two</li>"), "got: {html}");
        assert_eq!(html.matches("<li>").count(), 2);
        assert_eq!(html.matches(BULLET).count(), 2);
    }

    #[test]
    fn test_ordered_list_items_get_bullet_glyph_too() {
        let html = render("1. first\n2. second\n");
        assert!(html.contains("<ol>"));
        assert_eq!(html.matches("<li>\u{2022} ").count(), 2, "got: {html}");
    }

    #[test]
    fn test_hard_break_is_self_closed() {
        let html = render("line1  \nline2");
        assert!(html.contains("line1<br />"), "got: {html}");
        assert!(!html.contains("<br>"));
    }

    #[test]
    fn test_raw_br_is_self_closed() {
        let html = render("a<br>b and c<BR>d");
        assert!(!html.contains("<br>"), "got: {html}");
        assert!(!html.contains("<BR>"), "got: {html}");
        assert_eq!(html.matches("<br />").count(), 2);
    }

    #[test]
    fn test_raw_img_is_self_closed() {
        let html = render(r#"see <img src="cat.png" alt="cat"> here"#);
        assert!(html.contains(r#"<img src="cat.png" alt="cat" />"#), "got: {html}");
    }

    #[test]
    fn test_already_self_closed_img_is_untouched() {
        let html = render(r#"see <img src="cat.png"/> here"#);
        assert!(html.contains(r#"<img src="cat.png"/>"#), "got: {html}");
        assert!(!html.contains("/ />"));
    }

    #[test]
    fn test_markdown_image_stays_self_closed_once() {
        let html = render("![alt](pic.png)");
        assert!(html.contains("<img src=\"pic.png\" alt=\"alt\" />"), "got: {html}");
        assert!(!html.contains("/ />"));
    }

    #[test]
    fn test_gfm_extensions_enabled() {
        let html = render("~~gone~~\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\nwww.example.com\n");
        assert!(html.contains("<del>gone</del>"), "got: {html}");
        assert!(html.contains("<table>"), "got: {html}");
        assert!(html.contains("href=\"http://www.example.com\""), "got: {html}");
    }

    #[test]
    fn test_task_list_renders_checkbox() {
        let html = render("- [x] done\n- [ ] todo\n");
        assert_eq!(html.matches("type=\"checkbox\"").count(), 2, "got: {html}");
    }

    #[test]
    fn test_safe_html_omits_raw_html() {
        let renderer = Renderer::new().with_safe_html(true);
        let html = renderer.render("a <span>raw</span> b");
        assert!(!html.contains("<span>"), "got: {html}");
        assert!(html.contains("raw HTML omitted"), "got: {html}");
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        assert_eq!(render("\u{feff}# Hi\n"), render("# Hi\n"));
    }

    #[test]
    fn test_unbalanced_emphasis_degrades_gracefully() {
        let html = render("**bold *mixed\n\n`tick");
        assert!(html.contains("**bold"), "got: {html}");
        assert!(html.contains("`tick"), "got: {html}");
    }

    #[test]
    fn test_unterminated_attribute_quote_does_not_swallow_document() {
        let html = render("<div title=\"x>\n\nline1<br>line2\n\n- one\n- two\n");
        assert!(!html.contains("<br>"), "got: {html}");
        assert!(html.contains("line1<br />line2"), "got: {html}");
        assert!(html.contains("<li>\u{2022} one</li>"), "got: {html}");
        assert!(html.contains("<li>\u{2022} two</li>"), "got: {html}");
    }

    #[test]
    fn test_quote_inside_html_comment_is_ignored() {
        let html = render("<!-- a='b -->\n\n- one\n");
        assert!(html.contains("<!-- a='b -->"), "got: {html}");
        assert!(html.contains("<li>\u{2022} one</li>"), "got: {html}");
    }

    proptest! {
        #[test]
        fn prop_render_is_pure(source in "\\PC{0,200}") {
            prop_assert_eq!(render(&source), render(&source));
        }

        #[test]
        fn prop_no_unclosed_br_survives(
            text in "[a-z ]{0,40}",
            upper in any::<bool>(),
            hard_break in any::<bool>(),
        ) {
            let br = if upper { "<BR>" } else { "<br>" };
            let source = if hard_break {
                format!("{text}  \n{text}{br}{text}")
            } else {
                format!("{text}{br}{text}")
            };
            let html = render(&source);
            prop_assert!(!html.contains("<br>"));
            prop_assert!(!html.contains("<BR>"));
        }
    }
}
