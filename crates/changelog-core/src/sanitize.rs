//! Default `Sanitizer`: plain single-line text.
//!
//! Markup tags are removed, control characters become spaces, runs of
//! whitespace collapse to one space, single quotes are dropped, and the
//! result is truncated to `max_length` characters. A `<` only opens a tag
//! when a tag name, `/`, `!` or `?` follows it. A truncated value ends in
//! `…` so readers can tell it was cut.

use crate::traits::Sanitizer;

pub const DEFAULT_MAX_LENGTH: usize = 255;

const ELLIPSIS: char = '…';

#[derive(Debug, Clone)]
pub struct TextSanitizer {
    max_length: usize,
}

impl TextSanitizer {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }
}

impl Default for TextSanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LENGTH)
    }
}

impl Sanitizer for TextSanitizer {
    fn sanitize(&self, value: &str) -> String {
        let mut text = String::with_capacity(value.len());
        let mut in_tag = false;
        let mut pending_space = false;

        let mut chars = value.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '<' if !in_tag && chars.peek().is_some_and(|&next| opens_tag(next)) => {
                    in_tag = true
                }
                '>' if in_tag => {
                    in_tag = false;
                    pending_space = true;
                }
                _ if in_tag => {}
                '\'' => {}
                c if c.is_control() || c.is_whitespace() => pending_space = true,
                c => {
                    if pending_space && !text.is_empty() {
                        text.push(' ');
                    }
                    pending_space = false;
                    text.push(c);
                }
            }
        }

        if text.chars().count() <= self.max_length {
            return text;
        }
        let keep = self.max_length.saturating_sub(1);
        let mut cut: String = text.chars().take(keep).collect();
        cut.truncate(cut.trim_end().len());
        if self.max_length > 0 {
            cut.push(ELLIPSIS);
        }
        cut
    }
}

fn opens_tag(next: char) -> bool {
    next.is_ascii_alphabetic() || matches!(next, '/' | '!' | '?')
}
