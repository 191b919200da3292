//! Path-based navigation inside a nested mapping.
//!
//! Every function here starts at the root mapping and walks the steps of a
//! [`PathExpr`] one key at a time.  Nothing keeps a reference into the tree
//! between calls, so callers are free to mutate the tree in any way between
//! two navigations.
//!
//! | Operation    | Missing / non-mapping step        | Missing final key   |
//! |--------------|-----------------------------------|---------------------|
//! | [`read`]     | `PathNotFound`                    | `PathNotFound`      |
//! | [`contains`] | `false`                           | `false`             |
//! | [`write`]    | replaced by an empty mapping      | inserted            |
//! | [`remove`]   | `PathNotFound`                    | no-op (`Ok(None)`)  |

use thiserror::Error;
use tracing::trace;

use super::path::PathExpr;
use super::value::{Map, Value};

/// Errors produced while walking a mapping.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// A step or the final key does not exist (or a step is not a mapping).
    #[error("no mapping entry '{key}' at depth {depth}")]
    PathNotFound {
        /// The key that could not be resolved.
        key: String,
        /// Zero-based segment index of `key` within the path.
        depth: usize,
    },
}

/// Returns a reference to the value at `path`.
///
/// # Errors
///
/// Returns [`NavigationError::PathNotFound`] if any step is missing or is not
/// a mapping, or if the final key is absent.
pub fn read<'a>(root: &'a Map, path: &PathExpr) -> Result<&'a Value, NavigationError> {
    let node = walk(root, path.steps())?;
    node.get(path.final_key())
        .ok_or_else(|| NavigationError::PathNotFound {
            key: path.final_key().to_string(),
            depth: path.steps().len(),
        })
}

/// Sets the value at `path`, creating intermediate mappings as needed.
///
/// A missing step becomes an empty mapping.  A step that exists but holds a
/// scalar is overwritten with an empty mapping.  Whatever was stored under the
/// final key before (scalar or whole sub-tree) is discarded.
pub fn write(root: &mut Map, path: &PathExpr, value: Value) {
    let mut node = root;
    for step in path.steps() {
        let slot = node.entry(step.clone()).or_insert_with(Value::empty_map);
        if !slot.is_map() {
            trace!(step = %step, kind = slot.kind(), "replacing non-mapping step with an empty mapping");
        }
        node = slot.make_map();
    }
    node.insert(path.final_key().to_string(), value);
}

/// Removes the final key of `path`, returning the removed value if it existed.
///
/// Steps are never created.  The relative order of the remaining keys is kept.
///
/// # Errors
///
/// Returns [`NavigationError::PathNotFound`] if any step is missing or is not
/// a mapping.
pub fn remove(root: &mut Map, path: &PathExpr) -> Result<Option<Value>, NavigationError> {
    let node = walk_mut(root, path.steps())?;
    Ok(node.shift_remove(path.final_key()))
}

/// Returns `true` if the final key of `path` is present (any value, including
/// null).
pub fn contains(root: &Map, path: &PathExpr) -> bool {
    walk(root, path.steps())
        .map(|node| node.contains_key(path.final_key()))
        .unwrap_or(false)
}

// ── Walking ───────────────────────────────────────────────────────────────────

fn walk<'a>(root: &'a Map, steps: &[String]) -> Result<&'a Map, NavigationError> {
    let mut node = root;
    for (depth, step) in steps.iter().enumerate() {
        node = node
            .get(step)
            .and_then(Value::as_map)
            .ok_or_else(|| NavigationError::PathNotFound {
                key: step.clone(),
                depth,
            })?;
    }
    Ok(node)
}

fn walk_mut<'a>(root: &'a mut Map, steps: &[String]) -> Result<&'a mut Map, NavigationError> {
    let mut node = root;
    for (depth, step) in steps.iter().enumerate() {
        node = node
            .get_mut(step)
            .and_then(Value::as_map_mut)
            .ok_or_else(|| NavigationError::PathNotFound {
                key: step.clone(),
                depth,
            })?;
    }
    Ok(node)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
