//! Rules configuration.
//!
//! A small document that parameterizes the resolver: tier ranks for the
//! collapse step, the output-size limit, the mutually-exclusive kind pairs,
//! and the "if any of X, remove all Y" block rules. Loaded once at startup
//! from a plain JSON schema and held read-only for the process lifetime —
//! there is no dynamic rule loading and no hot reload.

use crate::Tier;
use crate::error::PackError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Two kinds that cancel one-for-one in the generic pass (e.g. truth vs lie).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MutualPair {
    pub a: String,
    pub b: String,
}

/// If any atom of a kind in `if_any_of` is present, remove all atoms whose
/// kind is in `then_block`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BlockRule {
    pub if_any_of: Vec<String>,
    pub then_block: Vec<String>,
    #[serde(default)]
    pub note: String,
}

/// The resolver's rule tables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rank per tier; higher wins the collapse-to-strongest step.
    pub tier_rank: BTreeMap<Tier, u8>,
    /// Maximum number of final effects before the formula is flagged invalid.
    pub max_final_effects: usize,
    pub mutual_exclusive_pairs: Vec<MutualPair>,
    pub block_rules: Vec<BlockRule>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        let tier_rank = Tier::DESCENDING.iter().map(|&t| (t, t.default_rank())).collect();
        RulesConfig {
            tier_rank,
            max_final_effects: 4,
            mutual_exclusive_pairs: vec![
                MutualPair { a: "truth".into(), b: "lie".into() },
                MutualPair { a: "wake".into(), b: "sleep".into() },
            ],
            block_rules: vec![
                BlockRule {
                    if_any_of: vec!["sobriety".into()],
                    then_block: vec!["intoxication".into()],
                    note: "Отрезвление снимает опьянение".into(),
                },
                BlockRule {
                    if_any_of: vec!["mental_protect".into(), "mental_cleanse".into()],
                    then_block: vec!["hallucinations".into()],
                    note: "Ментальная защита блокирует галлюцинации".into(),
                },
            ],
        }
    }
}

impl RulesConfig {
    /// Rank of an optional tier; atoms without a tier rank lowest.
    pub fn rank(&self, tier: Option<Tier>) -> u8 {
        match tier {
            Some(t) => self.tier_rank.get(&t).copied().unwrap_or(0),
            None => 0,
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn load(path: &Path) -> Result<Self, PackError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| PackError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&raw).map_err(|source| PackError::Parse { path: path.to_path_buf(), source })
    }
}
