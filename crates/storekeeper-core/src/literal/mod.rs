//! Literal document codec: how a configuration mapping travels to and from disk.
//!
//! Document format:
//! ```text
//! <?php
//! return [
//!     'string' => 'value1',
//!     'array' => [
//!         'index1' => 'value1',
//!     ],
//!     'boolean' => true,
//! ];
//! ```
//!
//! The document is a single key→value mapping literal.  Nested mappings are
//! bracketed sub-literals indented 4 columns per level; string values are
//! single-quoted; booleans and null are bare tokens.
//!
//! The [`writer`] produces this text from a [`Map`](crate::Map) and the
//! [`reader`] parses it back, so `parse_document(&render(&m)) == m` for every
//! mapping whose strings contain no `'` and no `\\` pair, and do not end in `\`.

pub mod reader;
pub mod writer;

pub use reader::{parse_document, parse_value, LiteralError, MAX_DEPTH};
pub use writer::{render, LiteralWriter, DOCUMENT_HEADER, DOCUMENT_TRAILER, INDENT_WIDTH};
