//! Renders a mapping as an indented literal document.
//!
//! The writer is a small recursive pretty-printer.  It keeps the current
//! nesting `level` (starting at 1, inside the top-level `return [`) and emits
//! one line per entry:
//!
//! ```text
//! indent(level) 'key' => value,
//! ```
//!
//! A nested mapping opens a bracket on the entry line, renders its own entries
//! one level deeper, and closes the bracket at the parent's indentation.
//!
//! The writer renders any depth, but the reader only loads mappings nested
//! up to [`MAX_DEPTH`](super::reader::MAX_DEPTH) levels.  Deeper documents
//! are written and then fail to load with `LiteralError::TooDeep`.
//!
//! String values are written verbatim between single quotes.  Embedded quote
//! characters are *not* escaped; changing that would alter the bytes of every
//! file written so far.

use crate::domain::value::{Map, Value};

/// Columns of indentation per nesting level.
pub const INDENT_WIDTH: usize = 4;

/// Text emitted before the top-level entries.
pub const DOCUMENT_HEADER: &str = "<?php \nreturn [\n";

/// Text emitted after the top-level entries.
pub const DOCUMENT_TRAILER: &str = "];";

/// Renders `map` as a complete literal document with the default indentation.
///
/// # Examples
///
/// ```rust
/// use storekeeper_core::{render, Map, Value};
///
/// let mut map = Map::new();
/// map.insert("boolean".to_string(), Value::Bool(true));
/// assert_eq!(render(&map), "<?php \nreturn [\n    'boolean' => true,\n];");
/// ```
pub fn render(map: &Map) -> String {
    LiteralWriter::new().write_document(map)
}

/// Recursive literal renderer.
#[derive(Debug, Clone)]
pub struct LiteralWriter {
    indent_width: usize,
    level: usize,
}

impl LiteralWriter {
    pub fn new() -> Self {
        Self::with_indent(INDENT_WIDTH)
    }

    /// Creates a writer using `indent_width` columns per nesting level.
    pub fn with_indent(indent_width: usize) -> Self {
        Self {
            indent_width,
            level: 1,
        }
    }

    /// Renders `map` wrapped in [`DOCUMENT_HEADER`] and [`DOCUMENT_TRAILER`].
    pub fn write_document(&mut self, map: &Map) -> String {
        self.level = 1;
        let mut out = String::from(DOCUMENT_HEADER);
        self.write_entries(&mut out, map);
        out.push_str(DOCUMENT_TRAILER);
        out
    }

    fn write_entries(&mut self, out: &mut String, map: &Map) {
        for (key, value) in map {
            self.write_indent(out);
            out.push('\'');
            out.push_str(key);
            out.push_str("' => ");
            self.write_value(out, value);
        }
    }

    fn write_value(&mut self, out: &mut String, value: &Value) {
        match value {
            // '...' => [         <-- entry line at `level`
            //     '...' => '...' <-- children at `level + 1`
            // ]                  <-- closing bracket back at `level`
            Value::Map(map) => {
                out.push_str("[\n");
                self.level += 1;
                self.write_entries(out, map);
                self.level -= 1;
                self.write_indent(out);
                out.push(']');
            }
            Value::String(s) => {
                out.push('\'');
                out.push_str(s);
                out.push('\'');
            }
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Int(i) => out.push_str(&i.to_string()),
            Value::Float(x) => out.push_str(&format_float(*x)),
            Value::Null => out.push_str("null"),
        }
        out.push_str(",\n");
    }

    fn write_indent(&self, out: &mut String) {
        out.extend(std::iter::repeat(' ').take(self.indent_width * self.level));
    }
}

impl Default for LiteralWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats a float so the reader parses it back as a float, never an integer.
fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "NAN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    // `{:?}` is the shortest text that round-trips and always carries a `.`
    // or an exponent (`1.0`, `1e-7`, `1e100`).
    format!("{x:?}")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
