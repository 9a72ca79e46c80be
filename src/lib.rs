#[macro_use]
mod macros;
mod api;
mod catalog;
mod classify;
mod config;
mod engine;
mod error;
mod ingredient;
mod normalize;
mod search;
mod token;

pub use api::{Engine, SearchOptions};
pub use catalog::{EffectCatalog, EffectClass};
pub use config::{BlockRule, MutualPair, RulesConfig};
pub use engine::{LogAction, Resolution, ResolveLog};
pub use error::{FormulaError, PackError};
pub use ingredient::{Ingredient, IngredientIndex};
pub use normalize::{normalize_key, normalize_text};
pub use search::RecipeCandidate;
pub use token::{FORMULA_SIZE, SelectionToken, parse_token, validate_formula_tokens, validate_recipe_tokens};

use serde::Deserialize;

// --- Core types --------------------------------------------------------------

/// Potency tier for poison/antidote atoms: weak < medium < strong < deadly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Weak,
    Medium,
    Strong,
    Deadly,
}

impl Tier {
    /// All tiers, strongest first. The canonical reporting order.
    pub const DESCENDING: [Tier; 4] = [Tier::Deadly, Tier::Strong, Tier::Medium, Tier::Weak];

    /// Default rank used when the rules config does not override it.
    pub fn default_rank(self) -> u8 {
        match self {
            Tier::Weak => 1,
            Tier::Medium => 2,
            Tier::Strong => 3,
            Tier::Deadly => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Weak => "weak",
            Tier::Medium => "medium",
            Tier::Strong => "strong",
            Tier::Deadly => "deadly",
        }
    }
}

/// A single typed, tiered unit of in-game effect derived from one effect text.
///
/// Atoms are produced transiently by classification and consumed by the
/// resolver; they are never persisted. `kind` is drawn from the catalog's
/// vocabulary (well-known values live in [`kinds`]); `tier` is present only
/// for poison/antidote kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectAtom {
    pub kind: String,
    pub tier: Option<Tier>,
    /// Display form of the source effect text (or a canonical label for
    /// atoms synthesized by the engine, e.g. a residual poison).
    pub text: String,
    pub tags: Vec<String>,
}

impl EffectAtom {
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        EffectAtom { kind: kind.into(), tier: None, text: text.into(), tags: Vec::new() }
    }

    pub fn tiered(kind: impl Into<String>, tier: Tier, text: impl Into<String>) -> Self {
        EffectAtom { kind: kind.into(), tier: Some(tier), text: text.into(), tags: Vec::new() }
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

/// Well-known effect kinds.
///
/// The vocabulary is open (the catalog may define more), but these are the
/// kinds the engine itself inspects.
pub mod kinds {
    pub const POISON: &str = "poison";
    pub const ANTIDOTE: &str = "antidote";
    /// Composite: expands to poison + bleeding during classification.
    pub const POISON_BLEEDING: &str = "poison_bleeding";
    /// Composite: expands to poison + energy_down during classification.
    pub const POISON_ENERGY_DOWN: &str = "poison_energy_down";
    pub const BLEEDING: &str = "bleeding";
    pub const ENERGY_DOWN: &str = "energy_down";
    pub const RESTORE_ENERGY: &str = "restore_energy";
    pub const STOP_BLEEDING: &str = "stop_bleeding";
    pub const HEALING: &str = "healing";
    pub const GENDER_TOXIN: &str = "gender_toxin";
    pub const CANT_SLEEP: &str = "cant_sleep";
    pub const SOBRIETY: &str = "sobriety";
    /// Fallback for texts absent from the catalog.
    pub const RAW: &str = "raw";
}

// --- Canonical display labels ------------------------------------------------

/// Canonical display text for a poison of the given tier.
pub fn poison_label(tier: Tier) -> &'static str {
    match tier {
        Tier::Weak => "Слабый яд",
        Tier::Medium => "Средний яд",
        Tier::Strong => "Сильный яд",
        Tier::Deadly => "Смертельный яд",
    }
}

/// Canonical display text for an antidote of the given tier.
pub fn antidote_label(tier: Tier) -> &'static str {
    match tier {
        Tier::Weak => "Слабое противоядие",
        Tier::Medium => "Среднее противоядие",
        Tier::Strong => "Сильное противоядие",
        Tier::Deadly => "Противоядие от смертельных ядов",
    }
}
