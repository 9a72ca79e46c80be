//! Error taxonomy.
//!
//! Only two things in this crate can fail: formula/token handling (caller
//! input) and data-pack loading (process startup). Classification,
//! normalization, and resolution are total — unknown text degrades to a
//! generic `raw` atom, and an over-limit result is reported as a violation
//! on the [`Resolution`](crate::Resolution), never as an error.

use std::path::PathBuf;
use thiserror::Error;

/// Rejections raised before any resolution work happens.
///
/// Format errors and constraint violations are surfaced immediately and are
/// never retried; a formula that fails validation is never resolved.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormulaError {
    /// The token is not `<code><digit 1-3>`, e.g. `RK2`.
    #[error("bad token format: {0:?} (expected CODE1/CODE2/CODE3)")]
    BadTokenFormat(String),

    /// The same ingredient with the same chosen slot appears twice.
    #[error("duplicate selection token: {0}")]
    DuplicateToken(String),

    /// A recipe must contain exactly the fixed formula size of tokens.
    #[error("formula must contain {expected} tokens, got {got}")]
    WrongSize { expected: usize, got: usize },

    /// One ingredient code appears more than twice.
    #[error("ingredient {code} is used {count} times (max 2 is allowed)")]
    TooManyRepeats { code: String, count: usize },

    /// A repeated code must use distinct slot indices.
    #[error("ingredient {0} is repeated without changing the slot index")]
    RepeatedWithoutSlotChange(String),

    /// Token references a code absent from the ingredient index.
    #[error("unknown ingredient code: {0}")]
    UnknownIngredient(String),

    /// The ingredient record has no main effect text.
    #[error("ingredient {0} has no main effect")]
    MissingMainEffect(String),

    /// The chosen secondary slot is empty for this ingredient.
    #[error("ingredient {code} has no effect in slot {slot}")]
    MissingSlotEffect { code: String, slot: u8 },
}

/// Failures while loading the data pack (ingredients, catalog, rules).
#[derive(Debug, Error)]
pub enum PackError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
