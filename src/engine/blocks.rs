//! Generic cross-kind pass (phase 5).
//!
//! Runs over the reassembled atom list after the tier phases, in a fixed
//! order: configured mutually-exclusive pairs cancel one-for-one, configured
//! block rules fire, then three built-in rules from the composite-poison
//! model (gender toxin, energy restoration, bleeding control).

use super::log::{LogAction, ResolveLog};
use crate::config::RulesConfig;
use crate::{EffectAtom, kinds};

/// Remove up to `n` atoms of `kind_a` and `kind_b` pairwise, where `n` is the
/// smaller of the two counts.
pub(crate) fn cancel_pairwise(
    atoms: &mut Vec<EffectAtom>,
    kind_a: &str,
    kind_b: &str,
    logs: &mut Vec<ResolveLog>,
) {
    let count_a = atoms.iter().filter(|a| a.is_kind(kind_a)).count();
    let count_b = atoms.iter().filter(|a| a.is_kind(kind_b)).count();
    let n = count_a.min(count_b);
    if n == 0 {
        return;
    }

    let mut left_a = n;
    let mut left_b = n;
    atoms.retain(|a| {
        if a.is_kind(kind_a) && left_a > 0 {
            left_a -= 1;
            false
        } else if a.is_kind(kind_b) && left_b > 0 {
            left_b -= 1;
            false
        } else {
            true
        }
    });
    logs.push(ResolveLog::new(LogAction::Cancel, format!("{kind_a} ↔ {kind_b}: {n}×")));
}

/// If any atom's kind is in `if_any_of`, remove every atom whose kind is in
/// `then_block`.
pub(crate) fn block_by_presence(
    atoms: &mut Vec<EffectAtom>,
    if_any_of: &[String],
    then_block: &[String],
    note: &str,
    logs: &mut Vec<ResolveLog>,
) {
    if !atoms.iter().any(|a| if_any_of.iter().any(|k| a.is_kind(k))) {
        return;
    }
    let removed: Vec<String> = atoms
        .iter()
        .filter(|a| then_block.iter().any(|k| a.is_kind(k)))
        .map(|a| a.text.clone())
        .collect();
    if removed.is_empty() {
        return;
    }
    atoms.retain(|a| !then_block.iter().any(|k| a.is_kind(k)));
    let label = if note.is_empty() { "Block rule" } else { note };
    logs.push(ResolveLog::new(LogAction::Block, format!("{label}: {}", removed.join(", "))));
}

/// Configured pairs and block rules, then the built-in special rules.
pub(crate) fn apply_cross_kind_rules(
    atoms: &mut Vec<EffectAtom>,
    cfg: &RulesConfig,
    logs: &mut Vec<ResolveLog>,
) {
    for pair in &cfg.mutual_exclusive_pairs {
        cancel_pairwise(atoms, &pair.a, &pair.b, logs);
    }

    for rule in &cfg.block_rules {
        block_by_presence(atoms, &rule.if_any_of, &rule.then_block, &rule.note, logs);
    }

    // Gender-specific toxin is suppressed by "cannot sleep" or sobriety.
    if atoms.iter().any(|a| a.is_kind(kinds::GENDER_TOXIN))
        && atoms.iter().any(|a| a.is_kind(kinds::CANT_SLEEP) || a.is_kind(kinds::SOBRIETY))
    {
        atoms.retain(|a| !a.is_kind(kinds::GENDER_TOXIN));
        logs.push(ResolveLog::new(
            LogAction::Block,
            "Гендерный токсин подавлен (есть 'невозможно уснуть' или отрезвление)",
        ));
    }

    // Composite-poison cleanup: restored energy beats the implied drain...
    if atoms.iter().any(|a| a.is_kind(kinds::RESTORE_ENERGY))
        && atoms.iter().any(|a| a.is_kind(kinds::ENERGY_DOWN))
    {
        atoms.retain(|a| !a.is_kind(kinds::ENERGY_DOWN));
        logs.push(ResolveLog::new(LogAction::Block, "Восстановление энергии блокирует понижение энергии"));
    }

    // ...and bleeding control beats the implied bleeding.
    if atoms.iter().any(|a| a.is_kind(kinds::STOP_BLEEDING) || a.is_kind(kinds::HEALING))
        && atoms.iter().any(|a| a.is_kind(kinds::BLEEDING))
    {
        atoms.retain(|a| !a.is_kind(kinds::BLEEDING));
        logs.push(ResolveLog::new(LogAction::Block, "Кровоостанавливающее/исцеление блокирует кровотечение"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(kind: &str) -> EffectAtom {
        EffectAtom::new(kind, kind)
    }

    #[test]
    fn pairwise_cancels_min_count() {
        let mut atoms = vec![atom("truth"), atom("lie"), atom("truth"), atom("sleep")];
        let mut logs = Vec::new();
        cancel_pairwise(&mut atoms, "truth", "lie", &mut logs);
        let kinds_left: Vec<&str> = atoms.iter().map(|a| a.kind.as_str()).collect();
        assert_eq!(kinds_left, vec!["truth", "sleep"]);
        assert_eq!(logs.len(), 1);
        assert!(logs[0].details.contains("1×"));
    }

    #[test]
    fn block_rule_fires_only_when_trigger_present() {
        let cfg = RulesConfig {
            mutual_exclusive_pairs: vec![],
            block_rules: vec![crate::config::BlockRule {
                if_any_of: vec!["wake".into()],
                then_block: vec!["sleep".into()],
                note: "Пробуждение".into(),
            }],
            ..RulesConfig::default()
        };

        let mut atoms = vec![atom("sleep")];
        let mut logs = Vec::new();
        apply_cross_kind_rules(&mut atoms, &cfg, &mut logs);
        assert_eq!(atoms.len(), 1);

        let mut atoms = vec![atom("sleep"), atom("wake")];
        apply_cross_kind_rules(&mut atoms, &cfg, &mut logs);
        assert!(atoms.iter().all(|a| !a.is_kind("sleep")));
        assert!(logs.iter().any(|l| l.details.starts_with("Пробуждение")));
    }

    #[test]
    fn restore_energy_removes_all_energy_down() {
        let cfg = RulesConfig { mutual_exclusive_pairs: vec![], block_rules: vec![], ..RulesConfig::default() };
        let mut atoms = vec![atom(kinds::ENERGY_DOWN), atom(kinds::RESTORE_ENERGY), atom(kinds::ENERGY_DOWN)];
        let mut logs = Vec::new();
        apply_cross_kind_rules(&mut atoms, &cfg, &mut logs);
        let kinds_left: Vec<&str> = atoms.iter().map(|a| a.kind.as_str()).collect();
        assert_eq!(kinds_left, vec![kinds::RESTORE_ENERGY]);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, LogAction::Block);
    }

    #[test]
    fn gender_toxin_suppressed_by_sobriety() {
        let cfg = RulesConfig { mutual_exclusive_pairs: vec![], block_rules: vec![], ..RulesConfig::default() };
        let mut atoms = vec![atom(kinds::GENDER_TOXIN), atom(kinds::SOBRIETY)];
        let mut logs = Vec::new();
        apply_cross_kind_rules(&mut atoms, &cfg, &mut logs);
        assert!(atoms.iter().all(|a| !a.is_kind(kinds::GENDER_TOXIN)));
    }

    #[test]
    fn healing_removes_bleeding() {
        let cfg = RulesConfig { mutual_exclusive_pairs: vec![], block_rules: vec![], ..RulesConfig::default() };
        let mut atoms = vec![atom(kinds::BLEEDING), atom(kinds::HEALING)];
        let mut logs = Vec::new();
        apply_cross_kind_rules(&mut atoms, &cfg, &mut logs);
        let kinds_left: Vec<&str> = atoms.iter().map(|a| a.kind.as_str()).collect();
        assert_eq!(kinds_left, vec![kinds::HEALING]);
    }
}
