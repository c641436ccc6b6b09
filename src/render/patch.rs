//! Fragment-level patching of streamed HTML output.

use std::io::{self, Write};

/// Glyph appended after every `<li>` so list items show a marker in the preview.
pub const BULLET: &str = "\u{2022} ";

/// Patch a single fragment and append it to `out`.
///
/// A fragment is one whole tag or one text run. The three shapes below are
/// mutually exclusive and checked in order.
pub fn patch_fragment(fragment: &str, out: &mut String) {
    if fragment == "<br>" || fragment == "<BR>" {
        out.push_str("<br />");
        return;
    }
    if fragment.starts_with("<img") && fragment.ends_with('>') && !fragment.ends_with("/>") {
        out.push_str(&fragment[..fragment.len() - 1]);
        out.push_str(" />");
        return;
    }
    out.push_str(fragment);
    if fragment == "<li>" {
        out.push_str(BULLET);
    }
}

/// `Write` sink that splits a streamed HTML byte stream into fragments and
/// patches each one as soon as it is complete.
///
/// Chunk boundaries of the incoming writes do not matter: bytes are buffered
/// until a tag closes (`>` outside a quoted attribute value, or `-->` for a
/// comment) or a new tag opens (`<` in text).
#[derive(Debug, Default)]
pub struct FragmentPatcher {
    out: String,
    pending: Vec<u8>,
    in_tag: bool,
    quote: Option<u8>,
    /// A `>` was seen inside the open quote
    quoted_gt: bool,
    /// Inside `<!-- ... -->`
    comment: bool,
    prev: u8,
}

impl FragmentPatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flush whatever is still buffered and return the patched output.
    pub fn finish(mut self) -> String {
        self.emit_pending();
        self.out
    }

    fn feed(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if self.in_tag {
                self.pending.push(byte);
                if self.comment {
                    if self.pending.ends_with(b"-->") {
                        self.close_tag();
                    }
                } else {
                    self.feed_tag_byte(byte);
                }
            } else if byte == b'<' {
                self.emit_pending();
                self.pending.push(byte);
                self.in_tag = true;
            } else {
                self.pending.push(byte);
            }
            if !byte.is_ascii_whitespace() {
                self.prev = byte;
            }
        }
    }

    /// A quoted value never spans a line break. If a `>` appeared inside it,
    /// the tag ends at that line break too.
    fn feed_tag_byte(&mut self, byte: u8) {
        match self.quote {
            Some(quote) if byte == quote => {
                self.quote = None;
                self.quoted_gt = false;
            }
            Some(_) if byte == b'\n' => {
                self.quote = None;
                if self.quoted_gt {
                    self.close_tag();
                }
            }
            Some(_) => {
                if byte == b'>' {
                    self.quoted_gt = true;
                }
            }
            None if (byte == b'"' || byte == b'\'') && self.prev == b'=' => {
                self.quote = Some(byte);
                self.quoted_gt = false;
            }
            None if byte == b'>' => self.close_tag(),
            None => {
                // Comments are opaque: quotes inside them mean nothing.
                if self.pending == b"<!--" {
                    self.comment = true;
                }
            }
        }
    }

    fn close_tag(&mut self) {
        self.emit_pending();
        self.in_tag = false;
    }

    fn emit_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let bytes = std::mem::take(&mut self.pending);
        let fragment = String::from_utf8_lossy(&bytes);
        patch_fragment(&fragment, &mut self.out);
        self.quote = None;
        self.quoted_gt = false;
        self.comment = false;
    }
}

impl Write for FragmentPatcher {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.feed(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
