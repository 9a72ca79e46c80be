//! Public facade.
//!
//! [`Engine`] bundles the three data-pack documents (ingredients, effect
//! catalog, rules) behind one handle and exposes the crate's operations:
//! classify a text, resolve a list of effects or a token formula, search the
//! catalog and the ingredient index, and find recipes for a target effect.
//!
//! The engine is immutable after construction; the token universe used by
//! the recipe search is derived lazily on first use and cached for the
//! engine's lifetime.

use crate::EffectAtom;
use crate::catalog::EffectCatalog;
use crate::classify::classify_effect_text;
use crate::config::RulesConfig;
use crate::engine::{Resolution, resolve_effect_texts};
use crate::error::{FormulaError, PackError};
use crate::ingredient::IngredientIndex;
use crate::normalize::normalize_text;
use crate::search::{RecipeCandidate, TokenUniverse, find_recipes};
use crate::token::{parse_token, validate_formula_tokens, validate_recipe_tokens};
use once_cell::sync::OnceCell;
use std::path::Path;
use std::time::Duration;

/// File names of the three data-pack documents inside a pack directory.
const INGREDIENTS_FILE: &str = "ingredients.json";
const CATALOG_FILE: &str = "effect_catalog.json";
const RULES_FILE: &str = "rules.json";

/// Knobs for [`Engine::find_recipes`].
///
/// The defaults are sized for a full game data pack; tests and small packs
/// can shrink them freely. `seed` drives the sampling fallback only — for a
/// fixed pack, options, and seed the search output is reproducible.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Upper bound on the ranked candidate pool.
    pub pool_size: usize,
    /// Upper bound on the target-producing seed tokens.
    pub max_seeds: usize,
    /// How many ranked candidates to return.
    pub max_results: usize,
    /// Wall-clock budget across all relaxation phases.
    pub time_budget: Duration,
    /// RNG seed for the sampling fallback.
    pub seed: u64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            pool_size: 9999,
            max_seeds: 24,
            max_results: 3,
            time_budget: Duration::from_secs(20),
            seed: 0,
        }
    }
}

/// A loaded ruleset: ingredients + effect catalog + rules.
///
/// ```
/// use alembic::{EffectCatalog, EffectClass, Engine, IngredientIndex, RulesConfig, Tier};
///
/// let class = |kind: &str, tier| EffectClass { kind: kind.into(), tier, tags: vec![] };
/// let catalog = EffectCatalog::from_entries([
///     ("Слабый яд".to_string(), class("poison", Some(Tier::Weak))),
///     ("Слабое противоядие".to_string(), class("antidote", Some(Tier::Weak))),
/// ]);
/// let engine = Engine::new(catalog, IngredientIndex::default(), RulesConfig::default());
///
/// let res = engine.resolve_effects(&["Слабый яд", "Слабое противоядие"]);
/// assert!(res.final_effects.is_empty());
/// assert!(res.is_valid());
/// ```
#[derive(Debug)]
pub struct Engine {
    catalog: EffectCatalog,
    ingredients: IngredientIndex,
    rules: RulesConfig,
    universe: OnceCell<TokenUniverse>,
}

impl Engine {
    pub fn new(catalog: EffectCatalog, ingredients: IngredientIndex, rules: RulesConfig) -> Self {
        Engine { catalog, ingredients, rules, universe: OnceCell::new() }
    }

    /// Load the three pack documents from a directory.
    pub fn load_pack(dir: impl AsRef<Path>) -> Result<Self, PackError> {
        let dir = dir.as_ref();
        Ok(Engine::new(
            EffectCatalog::load(&dir.join(CATALOG_FILE))?,
            IngredientIndex::load(&dir.join(INGREDIENTS_FILE))?,
            RulesConfig::load(&dir.join(RULES_FILE))?,
        ))
    }

    pub fn catalog(&self) -> &EffectCatalog {
        &self.catalog
    }

    pub fn ingredients(&self) -> &IngredientIndex {
        &self.ingredients
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Classify one effect text into typed atoms.
    pub fn classify(&self, effect_text: &str) -> Vec<EffectAtom> {
        classify_effect_text(effect_text, &self.catalog)
    }

    /// Resolve a plain list of effect texts (no token validation).
    pub fn resolve_effects<S: AsRef<str>>(&self, effect_texts: &[S]) -> Resolution {
        resolve_effect_texts(effect_texts, &self.rules, &self.catalog)
    }

    /// Expand and resolve a token formula of any length.
    ///
    /// Applies the duplicate-token check only; use [`Engine::resolve_recipe`]
    /// for the full fixed-size recipe constraints.
    pub fn resolve_formula<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Resolution, FormulaError> {
        validate_formula_tokens(tokens)?;
        let texts = self.expand_tokens(tokens)?;
        Ok(resolve_effect_texts(&texts, &self.rules, &self.catalog))
    }

    /// Expand and resolve a full recipe (exact size, repeat limits).
    pub fn resolve_recipe<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Resolution, FormulaError> {
        validate_recipe_tokens(tokens)?;
        let texts = self.expand_tokens(tokens)?;
        Ok(resolve_effect_texts(&texts, &self.rules, &self.catalog))
    }

    /// Search for recipes whose resolved output contains `effect_text`.
    ///
    /// Returns at most `options.max_results` candidates, best first; empty
    /// when no ingredient produces the target or the budget runs out.
    pub fn find_recipes(&self, effect_text: &str, options: &SearchOptions) -> Vec<RecipeCandidate> {
        find_recipes(self.universe(), &self.catalog, &self.rules, effect_text, options)
    }

    fn universe(&self) -> &TokenUniverse {
        self.universe.get_or_init(|| TokenUniverse::build(&self.ingredients, &self.catalog))
    }

    /// Turn each token into its two effect texts (main + chosen secondary).
    fn expand_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<String>, FormulaError> {
        let mut texts = Vec::with_capacity(tokens.len() * 2);
        for raw in tokens {
            let token = parse_token(raw.as_ref())?;
            let ing = self
                .ingredients
                .get(token.code())
                .ok_or_else(|| FormulaError::UnknownIngredient(token.code().to_string()))?;

            let main = normalize_text(&ing.main);
            if main.is_empty() {
                return Err(FormulaError::MissingMainEffect(token.code().to_string()));
            }
            let add = normalize_text(ing.add(token.slot()));
            if add.is_empty() {
                return Err(FormulaError::MissingSlotEffect {
                    code: token.code().to_string(),
                    slot: token.slot(),
                });
            }
            texts.push(main);
            texts.push(add);
        }
        Ok(texts)
    }
}
