//! Token universe, seeds, and the candidate pool.
//!
//! The search never enumerates the raw ingredient×slot space. It works from:
//!
//! - **seeds**: tokens whose main or chosen secondary effect exactly equals
//!   the target text — a secondary match is preferred because it leaves the
//!   main effect free to be a useful support effect;
//! - a **pool**: all seeds plus the remaining tokens ranked by
//!   "supportiveness" (support kinds score up, harm kinds score down).
//!
//! The weights are tuned-by-play constants; their relative ordering is part
//! of the house rules, so keep them named and do not re-derive them.

use crate::catalog::EffectCatalog;
use crate::ingredient::IngredientIndex;
use crate::normalize::normalize_text;
use bitflags::bitflags;
use std::collections::BTreeMap;

bitflags! {
    /// Coarse classification of an effect kind for pool ranking.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct KindClass: u8 {
        const SUPPORT = 1 << 0;
        const HARM = 1 << 1;
    }
}

const SUPPORT_KINDS: &[&str] = &[
    "antidote",
    "restore_energy",
    "mental_protect",
    "mental_cleanse",
    "mental_clarity",
    "stop_bleeding",
    "wake",
    "sobriety",
    "temptation_resistance",
    "truth",
    "balance",
    "cant_sleep",
    "reason_restore",
];

const HARM_KINDS: &[&str] = &[
    "poison",
    "poison_bleeding",
    "poison_energy_down",
    "sleep",
    "hallucinations",
    "lie",
    "kleptomania",
    "curious_varvara",
    "intoxication",
    "carefree",
    "reason_clouding",
    "nature_craving",
];

/// Reward per distinct support kind on a token.
pub(crate) const SUPPORT_WEIGHT: i32 = 3;
/// Penalty per distinct harm kind on a token.
pub(crate) const HARM_WEIGHT: i32 = 2;

pub(crate) fn kind_class(kind: &str) -> KindClass {
    let mut class = KindClass::empty();
    if SUPPORT_KINDS.contains(&kind) {
        class |= KindClass::SUPPORT;
    }
    if HARM_KINDS.contains(&kind) {
        class |= KindClass::HARM;
    }
    class
}

/// One selectable token with its pre-normalized effect texts and kinds.
#[derive(Debug, Clone)]
pub(crate) struct TokenInfo {
    pub(crate) main_effect: String,
    pub(crate) add_effect: String,
    /// Distinct kinds across main + add effect, sorted.
    pub(crate) kinds: Vec<String>,
}

impl TokenInfo {
    /// Supportiveness rank used for pool ordering.
    pub(crate) fn rank(&self) -> i32 {
        let mut support = 0;
        let mut harm = 0;
        for kind in &self.kinds {
            let class = kind_class(kind);
            if class.contains(KindClass::SUPPORT) {
                support += 1;
            }
            if class.contains(KindClass::HARM) {
                harm += 1;
            }
        }
        SUPPORT_WEIGHT * support - HARM_WEIGHT * harm
    }
}

/// The full ingredient×slot token space, keyed by token string.
///
/// Built once per engine context (lazily) and shared read-only by every
/// search invocation.
#[derive(Debug, Clone, Default)]
pub(crate) struct TokenUniverse {
    by_token: BTreeMap<String, TokenInfo>,
}

impl TokenUniverse {
    pub(crate) fn build(index: &IngredientIndex, catalog: &EffectCatalog) -> Self {
        let mut by_token = BTreeMap::new();
        for (code, ing) in index.iter() {
            let main = normalize_text(&ing.main);
            if main.is_empty() {
                continue;
            }
            for slot in 1..=3u8 {
                let add = normalize_text(ing.add(slot));
                if add.is_empty() {
                    continue;
                }
                let mut kinds =
                    vec![catalog.kind_of(&main).to_string(), catalog.kind_of(&add).to_string()];
                kinds.sort();
                kinds.dedup();
                by_token.insert(
                    format!("{code}{slot}"),
                    TokenInfo { main_effect: main.clone(), add_effect: add, kinds },
                );
            }
        }
        TokenUniverse { by_token }
    }

    pub(crate) fn get(&self, token: &str) -> Option<&TokenInfo> {
        self.by_token.get(token)
    }

    pub(crate) fn len(&self) -> usize {
        self.by_token.len()
    }

    /// Tokens whose main or add effect equals `target` (already normalized).
    /// Secondary matches sort before main matches; ties break on the token.
    pub(crate) fn seed_tokens(&self, target: &str, max_seeds: usize) -> Vec<String> {
        let mut out: Vec<&String> = self
            .by_token
            .iter()
            .filter(|(_, info)| info.main_effect == target || info.add_effect == target)
            .map(|(tok, _)| tok)
            .collect();
        out.sort_by_key(|tok| {
            let info = &self.by_token[*tok];
            (if info.add_effect == target { 0 } else { 1 }, (*tok).clone())
        });
        out.into_iter().take(max_seeds).cloned().collect()
    }

    /// All seeds first, then the remaining tokens by descending rank
    /// (lexicographic tie-break), truncated to `pool_size`.
    pub(crate) fn ranked_pool(&self, seeds: &[String], pool_size: usize) -> Vec<String> {
        let mut ranked: Vec<&String> =
            self.by_token.keys().filter(|tok| !seeds.contains(*tok)).collect();
        ranked.sort_by(|a, b| {
            let ra = self.by_token[*a].rank();
            let rb = self.by_token[*b].rank();
            rb.cmp(&ra).then_with(|| a.cmp(b))
        });

        let mut pool: Vec<String> = seeds.to_vec();
        for tok in ranked {
            if pool.len() >= pool_size {
                break;
            }
            pool.push(tok.clone());
        }
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EffectClass;

    fn universe() -> TokenUniverse {
        let catalog = EffectCatalog::from_entries(
            [
                ("Правда", "truth"),
                ("Сон", "sleep"),
                ("Слабое противоядие", "antidote"),
                ("Цель", "target_kind"),
            ]
            .map(|(text, kind)| {
                (text.to_string(), EffectClass { kind: kind.to_string(), tier: None, tags: Vec::new() })
            }),
        );
        let index = IngredientIndex::from_json_str(
            r#"{
                "ingredients": {
                    "AA": {"main": "Цель", "add1": "Сон", "add2": "Правда", "add3": ""},
                    "BB": {"main": "Правда", "add1": "Цель", "add2": "Слабое противоядие", "add3": ""},
                    "CC": {"main": "Сон", "add1": "Сон", "add2": "", "add3": ""}
                }
            }"#,
        )
        .unwrap();
        TokenUniverse::build(&index, &catalog)
    }

    #[test]
    fn skips_empty_slots() {
        let universe = universe();
        assert!(universe.get("AA3").is_none());
        assert!(universe.get("AA1").is_some());
        assert_eq!(universe.len(), 5);
    }

    #[test]
    fn seeds_prefer_secondary_matches() {
        let universe = universe();
        let seeds = universe.seed_tokens("Цель", 10);
        // BB1 matches as add (preferred); AA1/AA2 match as main.
        assert_eq!(seeds, vec!["BB1", "AA1", "AA2"]);
    }

    #[test]
    fn pool_ranks_support_above_harm() {
        let universe = universe();
        let pool = universe.ranked_pool(&[], 10);
        let bb2 = pool.iter().position(|t| t == "BB2").unwrap();
        let cc1 = pool.iter().position(|t| t == "CC1").unwrap();
        // BB2 carries truth+antidote (support); CC1 is sleep-only (harm).
        assert!(bb2 < cc1);
    }

    #[test]
    fn rank_weights_apply_per_distinct_kind() {
        let universe = universe();
        let bb2 = universe.get("BB2").unwrap();
        assert_eq!(bb2.rank(), 2 * SUPPORT_WEIGHT);
        let cc1 = universe.get("CC1").unwrap();
        assert_eq!(cc1.rank(), -HARM_WEIGHT);
    }
}
