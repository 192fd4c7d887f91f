//! Author-supplied field patterns
//!
//! Patterns are written in the browser's regular expression dialect, so
//! they are compiled with a backtracking engine that supports look-around
//! and backreferences. The shorthand classes `\d`, `\D`, `\w` and `\W` are
//! ASCII-only in that dialect and are rewritten to explicit ASCII classes
//! before compiling. Matching is an unanchored search.

use std::fmt;

use fancy_regex::Regex;
use serde::{Serialize, Serializer};

/// A compiled field pattern that remembers the text the author wrote.
#[derive(Clone)]
pub struct FieldPattern {
    source: String,
    compiled: Regex,
}

impl FieldPattern {
    /// Compiles an author pattern.
    pub fn new(source: impl Into<String>) -> Result<Self, fancy_regex::Error> {
        let source = source.into();
        let compiled = Regex::new(&ascii_shorthands(&source))?;
        Ok(Self { source, compiled })
    }

    /// The pattern as the author wrote it
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Unanchored search. A search that exceeds the backtracking limit
    /// counts as a mismatch.
    pub fn is_match(&self, value: &str) -> bool {
        self.compiled.is_match(value).unwrap_or(false)
    }
}

impl PartialEq for FieldPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for FieldPattern {}

impl fmt::Debug for FieldPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldPattern").field(&self.source).finish()
    }
}

impl Serialize for FieldPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

/// Rewrites `\d`, `\D`, `\w`, `\W` to ASCII classes and escapes `[`
/// inside a bracket class, where the browser dialect treats it literally.
fn ascii_shorthands(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + 16);
    let mut chars = source.chars();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(class @ ('d' | 'D' | 'w' | 'W')) => out.push_str(ascii_class(class, in_class)),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '[' if in_class => out.push_str("\\["),
            '[' => {
                in_class = true;
                out.push(c);
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    out
}

fn ascii_class(class: char, in_class: bool) -> &'static str {
    match (class, in_class) {
        ('d', false) => "[0-9]",
        ('D', false) => "[^0-9]",
        ('w', false) => "[0-9A-Za-z_]",
        ('W', false) => "[^0-9A-Za-z_]",
        ('d', true) => "0-9",
        ('w', true) => "0-9A-Za-z_",
        // Negated shorthands cannot be spliced into a bracket class.
        ('D', true) => "\\D",
        _ => "\\W",
    }
}
