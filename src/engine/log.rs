//! Audit trail for a resolution run.
//!
//! Every action the resolver takes — a cancellation, a block, a stepwise
//! reduction, a collapse — is appended to an ordered log so that callers can
//! show *why* a formula produced its final effects. The log is the engine's
//! observability surface; collecting it is cheap (tens of entries) and
//! always on.

use std::fmt;

/// What a resolver step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogAction {
    /// Two opposing atoms suppressed each other.
    Cancel,
    /// Presence of one kind removed atoms of other kinds.
    Block,
    /// A cross-tier pairing degraded to a weaker residual atom.
    Reduce,
    /// Several same-kind atoms collapsed to the strongest representative.
    Collapse,
}

impl fmt::Display for LogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogAction::Cancel => "cancel",
            LogAction::Block => "block",
            LogAction::Reduce => "reduce",
            LogAction::Collapse => "collapse",
        };
        f.write_str(s)
    }
}

/// One audit record: an action and its human-readable detail line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveLog {
    pub action: LogAction,
    pub details: String,
}

impl ResolveLog {
    pub(crate) fn new(action: LogAction, details: impl Into<String>) -> Self {
        ResolveLog { action, details: details.into() }
    }
}

/// Outcome of resolving one formula's atoms.
///
/// A non-empty `violations` list marks the formula invalid but the final
/// effects are still fully populated — callers decide how to present an
/// unstable result.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Display texts of the surviving effects, in reporting order.
    pub final_effects: Vec<String>,
    /// Ordered audit log of every action taken.
    pub logs: Vec<ResolveLog>,
    /// Rule violations (currently: output-size limit exceeded).
    pub violations: Vec<String>,
}

impl Resolution {
    pub fn effect_count(&self) -> usize {
        self.final_effects.len()
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}
