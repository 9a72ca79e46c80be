//! Resolver orchestration (phases 6–7 plus the overall pipeline).
//!
//! [`resolve_atoms`] is the single entry point: it owns the phase ordering,
//! the reassembly order of surviving atoms, the collapse-to-strongest step,
//! and the output-size check. It never fails on well-formed atoms; malformed
//! tokens are rejected upstream before the engine ever sees them.

use super::blocks::apply_cross_kind_rules;
use super::buckets::TierBuckets;
use super::log::{LogAction, Resolution, ResolveLog};
use super::tiers::{block_with_deadly_antidotes, cancel_deadly_pairs, reduce_cross_tier};
use crate::catalog::EffectCatalog;
use crate::classify::classify_effect_text;
use crate::config::RulesConfig;
use crate::{EffectAtom, kinds};

/// Run the full reduction pipeline over a list of atoms.
pub(crate) fn resolve_atoms(atoms: Vec<EffectAtom>, cfg: &RulesConfig) -> Resolution {
    let mut logs: Vec<ResolveLog> = Vec::new();
    let mut violations: Vec<String> = Vec::new();

    let mut buckets = TierBuckets::from_atoms(atoms);

    cancel_deadly_pairs(&mut buckets, &mut logs);
    block_with_deadly_antidotes(&mut buckets, &mut logs);
    reduce_cross_tier(&mut buckets, &mut logs);

    let mut final_atoms = buckets.into_final_atoms();

    apply_cross_kind_rules(&mut final_atoms, cfg, &mut logs);

    collapse_strongest(&mut final_atoms, kinds::POISON, cfg, &mut logs);
    collapse_strongest(&mut final_atoms, kinds::ANTIDOTE, cfg, &mut logs);

    let final_effects: Vec<String> = final_atoms.into_iter().map(|a| a.text).collect();

    let max = cfg.max_final_effects;
    if final_effects.len() > max {
        violations.push(format!("Слишком много итоговых эффектов: {} (лимит {max})", final_effects.len()));
    }

    Resolution { final_effects, logs, violations }
}

/// Classify each text and resolve the combined atoms.
pub(crate) fn resolve_effect_texts<S: AsRef<str>>(
    texts: &[S],
    cfg: &RulesConfig,
    catalog: &EffectCatalog,
) -> Resolution {
    let mut atoms: Vec<EffectAtom> = Vec::new();
    for text in texts {
        atoms.extend(classify_effect_text(text.as_ref(), catalog));
    }
    resolve_atoms(atoms, cfg)
}

/// Phase 6: if more than one atom of `group_kind` survives, keep only the one
/// with the highest tier rank (first-encountered wins ties). The survivor is
/// re-appended at the end of the list.
fn collapse_strongest(
    atoms: &mut Vec<EffectAtom>,
    group_kind: &str,
    cfg: &RulesConfig,
    logs: &mut Vec<ResolveLog>,
) {
    let group: Vec<&EffectAtom> = atoms.iter().filter(|a| a.is_kind(group_kind)).collect();
    if group.len() <= 1 {
        return;
    }

    let best = group
        .iter()
        .max_by_key(|a| cfg.rank(a.tier))
        .map(|a| (*a).clone())
        .unwrap_or_else(|| group[0].clone());
    let count = group.len();

    atoms.retain(|a| !a.is_kind(group_kind));
    logs.push(ResolveLog::new(
        LogAction::Collapse,
        format!("{group_kind}: {count} -> 1 (оставлен '{}')", best.text),
    ));
    atoms.push(best);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Tier, antidote_label, poison_label};

    fn poison(tier: Tier) -> EffectAtom {
        EffectAtom::tiered(kinds::POISON, tier, poison_label(tier))
    }

    fn antidote(tier: Tier) -> EffectAtom {
        EffectAtom::tiered(kinds::ANTIDOTE, tier, antidote_label(tier))
    }

    fn raw(text: &str) -> EffectAtom {
        EffectAtom::new(kinds::RAW, text)
    }

    #[test]
    fn deadly_cancellation_yields_empty_set() {
        let res = resolve_atoms(vec![poison(Tier::Deadly), antidote(Tier::Deadly)], &RulesConfig::default());
        assert!(res.final_effects.is_empty());
        assert_eq!(res.logs.len(), 1);
        assert_eq!(res.logs[0].action, LogAction::Cancel);
        assert!(res.is_valid());
    }

    #[test]
    fn strong_poison_medium_antidote_leaves_medium_poison() {
        let res = resolve_atoms(vec![poison(Tier::Strong), antidote(Tier::Medium)], &RulesConfig::default());
        assert_eq!(res.final_effects, vec!["Средний яд"]);
        assert!(res.logs.iter().any(|l| l.action == LogAction::Reduce));
    }

    #[test]
    fn mixed_tier_poisons_collapse_to_strongest() {
        let res = resolve_atoms(
            vec![poison(Tier::Weak), poison(Tier::Strong), poison(Tier::Medium)],
            &RulesConfig::default(),
        );
        assert_eq!(res.final_effects, vec!["Сильный яд"]);
        assert!(res.logs.iter().any(|l| l.action == LogAction::Collapse));
    }

    #[test]
    fn restore_energy_blocks_energy_down() {
        let res = resolve_atoms(
            vec![
                EffectAtom::new(kinds::RESTORE_ENERGY, "Восстановление энергии"),
                EffectAtom::new(kinds::ENERGY_DOWN, "Понижение энергии"),
            ],
            &RulesConfig::default(),
        );
        assert_eq!(res.final_effects, vec!["Восстановление энергии"]);
        assert_eq!(res.logs.iter().filter(|l| l.action == LogAction::Block).count(), 1);
    }

    #[test]
    fn over_limit_is_reported_not_truncated() {
        let atoms: Vec<EffectAtom> = (0..5).map(|i| raw(&format!("эффект {i}"))).collect();
        let res = resolve_atoms(atoms, &RulesConfig::default());
        assert_eq!(res.final_effects.len(), 5);
        assert!(!res.is_valid());
        assert!(res.violations[0].contains("лимит 4"));
    }

    #[test]
    fn output_order_is_others_then_poison_then_antidote() {
        let res = resolve_atoms(
            vec![antidote(Tier::Weak), raw("Сон"), poison(Tier::Deadly), raw("Правда")],
            &RulesConfig::default(),
        );
        assert_eq!(res.final_effects, vec!["Сон", "Правда", "Смертельный яд", "Слабое противоядие"]);
    }

    #[test]
    fn surplus_deadly_poisons_collapse_after_cancellation() {
        // One pairing cancels; the rest collapse to a single deadly poison.
        let atoms = vec![
            poison(Tier::Deadly),
            poison(Tier::Deadly),
            poison(Tier::Deadly),
            antidote(Tier::Deadly),
        ];
        let res = resolve_atoms(atoms, &RulesConfig::default());
        assert_eq!(res.final_effects, vec!["Смертельный яд"]);
    }
}
