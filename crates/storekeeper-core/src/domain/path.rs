//! Separator-delimited path expressions.
//!
//! A path such as `array.subarray.index1` addresses a location inside a
//! nested mapping.  Parsing splits it into the intermediate *steps*
//! (`["array", "subarray"]`) that must be walked and the *final key*
//! (`"index1"`) that is read, written, or removed in the last mapping.
//!
//! There is no trimming and no escaping: a key that itself contains the
//! separator character cannot be addressed.  Empty segments are kept, so
//! `a..b` walks through a key named `""`.

use std::fmt;

use thiserror::Error;

/// The separator used when none has been configured.
pub const DEFAULT_SEPARATOR: char = '.';

/// Errors produced while parsing a path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The raw path string had zero length.
    #[error("path must contain at least 1 character")]
    Empty,
}

/// A parsed path: zero or more intermediate steps plus one final key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathExpr {
    steps: Vec<String>,
    final_key: String,
}

impl PathExpr {
    /// Parses `raw` by splitting on every occurrence of `separator`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Empty`] if `raw` has length 0.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use storekeeper_core::PathExpr;
    ///
    /// let path = PathExpr::parse("array.subarray.index1", '.').unwrap();
    /// assert_eq!(path.steps(), ["array", "subarray"]);
    /// assert_eq!(path.final_key(), "index1");
    /// ```
    pub fn parse(raw: &str, separator: char) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }

        let mut steps: Vec<String> = raw.split(separator).map(str::to_string).collect();
        // `split` on a non-empty string always yields at least one token.
        let final_key = steps.pop().unwrap_or_default();

        Ok(Self { steps, final_key })
    }

    /// Builds a single-segment path addressing a top-level key.
    pub fn key(final_key: impl Into<String>) -> Self {
        Self {
            steps: Vec::new(),
            final_key: final_key.into(),
        }
    }

    /// The intermediate keys walked before the final lookup, in order.
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// The key read, written, or removed in the last mapping.
    pub fn final_key(&self) -> &str {
        &self.final_key
    }

    /// Number of segments (steps plus the final key).
    pub fn depth(&self) -> usize {
        self.steps.len() + 1
    }

    /// Rejoins the segments with `separator`.
    pub fn to_raw(&self, separator: char) -> String {
        let mut out = String::new();
        for step in &self.steps {
            out.push_str(step);
            out.push(separator);
        }
        out.push_str(&self.final_key);
        out
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_raw(DEFAULT_SEPARATOR))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
