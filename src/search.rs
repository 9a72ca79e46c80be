//! Recipe search: find token formulas that brew a requested effect.
//!
//! The search inverts the resolver. Given a target effect text it looks for
//! five-token formulas whose resolved output contains the target, preferring
//! formulas with fewer side effects and less harmful ones.
//!
//! ## Strategy
//!
//! ```text
//! target text ── seed_tokens ──> seeds (tokens that yield the target)
//!                                  │
//!                                  v
//!                 ranked_pool (seeds + supportive fillers)
//!                                  │
//!                   ┌──────────────┴──────────────┐
//!                   v                             v
//!          exhaustive enumeration        seeded random sampling
//!          (when it fits the budget)     (when the space is too big)
//!                   └──────────────┬──────────────┘
//!                                  v
//!                        score + rank candidates
//! ```
//!
//! Phases relax the side-effect tolerance: phase 1 accepts only a clean
//! single-effect brew and gets the lion's share of the time budget plus a
//! widened pool; later phases accept one more final effect each, up to the
//! rules' output limit. The first phase that produces any candidate wins.
//!
//! Sampling is driven by a caller-provided seed, so results are reproducible
//! for a fixed data pack and options.

#[path = "search/budget.rs"]
mod budget;
#[path = "search/pool.rs"]
mod pool;

pub(crate) use pool::TokenUniverse;

use crate::api::SearchOptions;
use crate::catalog::EffectCatalog;
use crate::classify::classify_effect_text;
use crate::config::RulesConfig;
use crate::engine::{ResolveLog, resolve_effect_texts};
use crate::normalize::{normalize_key, normalize_text};
use crate::token::{FORMULA_SIZE, validate_recipe_tokens};
use budget::SearchBudget;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::time::Duration;

/// Cap on the first (strictest) phase's share of the time budget.
const PHASE_ONE_WINDOW_CAP: Duration = Duration::from_secs(8);
/// Evaluation allowances: the strict phase digs much deeper.
const PHASE_ONE_EVALS: u64 = 650_000;
const RELAXED_EVALS: u64 = 180_000;
/// Minimum pool/seed widths for the strict phase.
const PHASE_ONE_MIN_POOL: usize = 70;
const PHASE_ONE_MIN_SEEDS: usize = 16;
/// Sampling mixes draws from the top of the ranked pool with uniform draws.
const SAMPLE_TOP_SLICE: usize = 90;
const SAMPLE_TOP_PROB: f64 = 0.6;
const SAMPLE_MAX_ATTEMPTS: usize = 200;
/// Internal working-set floor, independent of how few results were asked for.
const MIN_KEPT: usize = 10;

/// Harm scoring of a candidate's final effects.
const POISON_HARM: i32 = 3;
const MINOR_HARM: i32 = 2;
const MINOR_HARM_KINDS: &[&str] = &[
    "sleep",
    "hallucinations",
    "lie",
    "kleptomania",
    "curious_varvara",
    "intoxication",
    "carefree",
];

/// A scored formula produced by the search.
#[derive(Debug, Clone)]
pub struct RecipeCandidate {
    /// The five selection tokens, in pick order.
    pub tokens: Vec<String>,
    /// Resolved output of the formula (contains the target).
    pub final_effects: Vec<String>,
    /// The resolver's audit log for this formula.
    pub logs: Vec<ResolveLog>,
    /// Number of final effects (the primary ranking key).
    pub effect_count: usize,
    /// Harm score of the final effects (lower is better).
    pub harm: i32,
}

impl RecipeCandidate {
    fn sort_key(&self) -> (usize, i32, String) {
        (self.effect_count, self.harm, self.tokens.join(","))
    }
}

/// Run the phased search for `effect_text`.
///
/// Returns at most `options.max_results` candidates, best first, or an empty
/// vector when no token yields the target at all or the budget runs out
/// without a hit.
pub(crate) fn find_recipes(
    universe: &TokenUniverse,
    catalog: &EffectCatalog,
    cfg: &RulesConfig,
    effect_text: &str,
    options: &SearchOptions,
) -> Vec<RecipeCandidate> {
    let target = normalize_text(effect_text);
    let target_key = normalize_key(&target);

    let phases = cfg.max_final_effects.max(1);
    let phase_one_window = (options.time_budget / 2).min(PHASE_ONE_WINDOW_CAP);
    let relaxed_window = if phases > 1 {
        options.time_budget.saturating_sub(phase_one_window) / (phases as u32 - 1)
    } else {
        Duration::ZERO
    };

    for max_effects in 1..=phases {
        let (max_seeds, pool_size, evals, window) = if max_effects == 1 {
            (
                options.max_seeds.max(PHASE_ONE_MIN_SEEDS),
                options.pool_size.max(PHASE_ONE_MIN_POOL),
                PHASE_ONE_EVALS,
                phase_one_window,
            )
        } else {
            (options.max_seeds, options.pool_size, RELAXED_EVALS, relaxed_window)
        };

        let seeds = universe.seed_tokens(&target, max_seeds);
        if seeds.is_empty() {
            // No token produces the target; relaxing tolerance cannot help.
            return Vec::new();
        }
        let pool = universe.ranked_pool(&seeds, pool_size);
        if pool.len() < FORMULA_SIZE {
            continue;
        }

        let mut budget = SearchBudget::new(window, evals);
        let exhaustive = enumeration_cost(seeds.len(), pool.len())
            .map_or(false, |cost| budget.fits(cost));

        let found = if exhaustive {
            enumerate_phase(&seeds, &pool, universe, catalog, cfg, &target_key, max_effects, options, &mut budget)
        } else {
            sample_phase(&seeds, &pool, universe, catalog, cfg, &target_key, max_effects, options, &mut budget)
        };
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

/// `seeds × C(pool − 1, 4)`, or `None` on overflow (treated as "too big").
fn enumeration_cost(seeds: usize, pool: usize) -> Option<u64> {
    if pool < FORMULA_SIZE {
        return Some(0);
    }
    let n = (pool - 1) as u64;
    let combos = n.checked_mul(n - 1)?.checked_mul(n - 2)?.checked_mul(n - 3)? / 24;
    combos.checked_mul(seeds as u64)
}

#[allow(clippy::too_many_arguments)]
fn enumerate_phase(
    seeds: &[String],
    pool: &[String],
    universe: &TokenUniverse,
    catalog: &EffectCatalog,
    cfg: &RulesConfig,
    target_key: &str,
    max_effects: usize,
    options: &SearchOptions,
    budget: &mut SearchBudget,
) -> Vec<RecipeCandidate> {
    let keep = options.max_results.max(MIN_KEPT);
    let mut best: Vec<RecipeCandidate> = Vec::new();

    'outer: for seed in seeds {
        let rest: Vec<&String> = pool.iter().filter(|tok| *tok != seed).collect();
        let n = rest.len();
        for i in 0..n {
            for j in i + 1..n {
                for k in j + 1..n {
                    for l in k + 1..n {
                        if !budget.charge() {
                            break 'outer;
                        }
                        let tokens = vec![
                            seed.clone(),
                            rest[i].clone(),
                            rest[j].clone(),
                            rest[k].clone(),
                            rest[l].clone(),
                        ];
                        if let Some(candidate) =
                            score_formula(&tokens, universe, catalog, cfg, target_key, max_effects)
                        {
                            let clean = candidate.effect_count == 1;
                            best.push(candidate);
                            if clean {
                                break 'outer;
                            }
                            prune(&mut best, keep);
                        }
                    }
                }
            }
        }
    }

    finish(best, options.max_results)
}

#[allow(clippy::too_many_arguments)]
fn sample_phase(
    seeds: &[String],
    pool: &[String],
    universe: &TokenUniverse,
    catalog: &EffectCatalog,
    cfg: &RulesConfig,
    target_key: &str,
    max_effects: usize,
    options: &SearchOptions,
    budget: &mut SearchBudget,
) -> Vec<RecipeCandidate> {
    let keep = options.max_results.max(MIN_KEPT);
    let top = pool.len().min(SAMPLE_TOP_SLICE);
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut seen: BTreeSet<Vec<String>> = BTreeSet::new();
    let mut best: Vec<RecipeCandidate> = Vec::new();

    while budget.charge() {
        let mut tokens = vec![seeds[rng.gen_range(0..seeds.len())].clone()];
        let mut attempts = 0;
        while tokens.len() < FORMULA_SIZE && attempts < SAMPLE_MAX_ATTEMPTS {
            attempts += 1;
            let pick = if rng.gen_bool(SAMPLE_TOP_PROB) {
                &pool[rng.gen_range(0..top)]
            } else {
                &pool[rng.gen_range(0..pool.len())]
            };
            if !tokens.contains(pick) {
                tokens.push(pick.clone());
            }
        }
        if tokens.len() < FORMULA_SIZE {
            continue;
        }

        let mut key = tokens.clone();
        key.sort();
        if !seen.insert(key) {
            continue;
        }

        if let Some(candidate) = score_formula(&tokens, universe, catalog, cfg, target_key, max_effects) {
            let clean = candidate.effect_count == 1;
            best.push(candidate);
            if clean {
                break;
            }
            prune(&mut best, keep);
        }
    }

    finish(best, options.max_results)
}

/// Validate, expand, resolve, and score one formula. `None` means the formula
/// is malformed, breaks a rule, overshoots the side-effect tolerance, or does
/// not yield the target.
fn score_formula(
    tokens: &[String],
    universe: &TokenUniverse,
    catalog: &EffectCatalog,
    cfg: &RulesConfig,
    target_key: &str,
    max_effects: usize,
) -> Option<RecipeCandidate> {
    validate_recipe_tokens(tokens).ok()?;

    let mut texts: Vec<String> = Vec::with_capacity(FORMULA_SIZE * 2);
    for token in tokens {
        let info = universe.get(token)?;
        texts.push(info.main_effect.clone());
        texts.push(info.add_effect.clone());
    }

    let resolution = resolve_effect_texts(&texts, cfg, catalog);
    if !resolution.is_valid() || resolution.effect_count() > max_effects {
        return None;
    }
    if !resolution.final_effects.iter().any(|text| normalize_key(text) == target_key) {
        return None;
    }

    let harm = harm_score(&resolution.final_effects, catalog);
    Some(RecipeCandidate {
        tokens: tokens.to_vec(),
        effect_count: resolution.final_effects.len(),
        final_effects: resolution.final_effects,
        logs: resolution.logs,
        harm,
    })
}

fn harm_score(effects: &[String], catalog: &EffectCatalog) -> i32 {
    let mut harm = 0;
    for text in effects {
        for atom in classify_effect_text(text, catalog) {
            if atom.kind.starts_with("poison") {
                harm += POISON_HARM;
            } else if MINOR_HARM_KINDS.contains(&atom.kind.as_str()) {
                harm += MINOR_HARM;
            }
        }
    }
    harm
}

/// Bound the working set during a long phase.
fn prune(best: &mut Vec<RecipeCandidate>, keep: usize) {
    if best.len() > keep * 4 {
        best.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        best.truncate(keep);
    }
}

fn finish(mut best: Vec<RecipeCandidate>, max_results: usize) -> Vec<RecipeCandidate> {
    best.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    best.dedup_by(|a, b| a.tokens == b.tokens);
    best.truncate(max_results);
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tier;
    use crate::catalog::EffectClass;
    use crate::ingredient::IngredientIndex;

    fn catalog() -> EffectCatalog {
        EffectCatalog::from_entries([
            ("Правда", "truth", None),
            ("Сон", "sleep", None),
            ("Пробуждение", "wake", None),
            ("Слабый яд", "poison", Some(Tier::Weak)),
            ("Противоядие от смертельных ядов", "antidote", Some(Tier::Deadly)),
        ]
        .map(|(text, kind, tier)| {
            (text.to_string(), EffectClass { kind: kind.to_string(), tier, tags: Vec::new() })
        }))
    }

    fn universe(catalog: &EffectCatalog) -> TokenUniverse {
        // Ten effect texts across the five tokens: one target, one deadly
        // antidote, four weak poisons, two sleeps, two wakes. Everything but
        // the target cancels out.
        let index = IngredientIndex::from_json_str(
            r#"{
                "ingredients": {
                    "AA": {"main": "Слабый яд", "add1": "Правда", "add2": "", "add3": ""},
                    "BB": {"main": "Противоядие от смертельных ядов", "add1": "Слабый яд", "add2": "", "add3": ""},
                    "CC": {"main": "Слабый яд", "add1": "Сон", "add2": "", "add3": ""},
                    "DD": {"main": "Сон", "add1": "Слабый яд", "add2": "", "add3": ""},
                    "EE": {"main": "Пробуждение", "add1": "Пробуждение", "add2": "", "add3": ""}
                }
            }"#,
        )
        .unwrap();
        TokenUniverse::build(&index, catalog)
    }

    fn options() -> SearchOptions {
        SearchOptions {
            pool_size: 5,
            max_seeds: 4,
            max_results: 3,
            time_budget: Duration::from_secs(5),
            seed: 0,
        }
    }

    #[test]
    fn finds_clean_single_effect_recipe() {
        let catalog = catalog();
        let universe = universe(&catalog);
        let found =
            find_recipes(&universe, &catalog, &RulesConfig::default(), "Правда", &options());
        assert_eq!(found.len(), 1);
        let best = &found[0];
        assert_eq!(best.effect_count, 1);
        assert_eq!(best.final_effects, vec!["Правда"]);
        assert_eq!(best.harm, 0);
        let mut tokens = best.tokens.clone();
        tokens.sort();
        assert_eq!(tokens, vec!["AA1", "BB1", "CC1", "DD1", "EE1"]);
        // The target-producing token leads the pick order.
        assert_eq!(best.tokens[0], "AA1");
    }

    #[test]
    fn search_is_deterministic_for_a_fixed_seed() {
        let catalog = catalog();
        let universe = universe(&catalog);
        let cfg = RulesConfig::default();
        let first = find_recipes(&universe, &catalog, &cfg, "Правда", &options());
        let second = find_recipes(&universe, &catalog, &cfg, "Правда", &options());
        let tokens =
            |found: &[RecipeCandidate]| found.iter().map(|c| c.tokens.clone()).collect::<Vec<_>>();
        assert_eq!(tokens(&first), tokens(&second));
    }

    #[test]
    fn unknown_target_yields_no_recipes() {
        let catalog = catalog();
        let universe = universe(&catalog);
        let found = find_recipes(
            &universe,
            &catalog,
            &RulesConfig::default(),
            "Несуществующий эффект",
            &options(),
        );
        assert!(found.is_empty());
    }

    #[test]
    fn harm_scores_poison_and_minor_harms() {
        let catalog = catalog();
        let effects = ["Слабый яд".to_string(), "Сон".to_string(), "Правда".to_string()];
        assert_eq!(harm_score(&effects, &catalog), POISON_HARM + MINOR_HARM);
    }

    #[test]
    fn enumeration_cost_counts_seeded_combinations() {
        // 2 seeds × C(9, 4) = 2 × 126.
        assert_eq!(enumeration_cost(2, 10), Some(252));
        assert_eq!(enumeration_cost(1, 4), Some(0));
    }

    #[test]
    fn candidates_rank_by_effect_count_then_harm() {
        let a = RecipeCandidate {
            tokens: vec!["AA1".into()],
            final_effects: vec![],
            logs: vec![],
            effect_count: 2,
            harm: 0,
        };
        let b = RecipeCandidate { effect_count: 1, harm: 5, ..a.clone() };
        assert!(b.sort_key() < a.sort_key());
        let c = RecipeCandidate { effect_count: 2, harm: 3, ..a.clone() };
        assert!(a.sort_key() < c.sort_key());
    }
}
