//! Tier phases of the resolver (phases 1–4).
//!
//! Operates on [`TierBuckets`] in a fixed order:
//!
//! 1. deadly poison ↔ deadly antidote, 1:1 until one side is exhausted;
//! 2. each remaining deadly antidote blocks the *cheapest sufficient bundle*
//!    of non-deadly poisons — a fixed preference list, not a numeric
//!    optimization;
//! 3. same-tier cancellation for strong, medium, weak (in that order);
//! 4. cross-tier stepwise reduction to a fixed point: a pairing across tiers
//!    degrades to a residual atom of the weaker tier, and same-tier
//!    cancellation is retried after each pass since a reduction can create a
//!    new same-tier pair.
//!
//! The fixed-point loop is bounded as a safety valve; the bundle-blocking
//! phase is *not* re-run inside it.

use super::buckets::TierBuckets;
use super::log::{LogAction, ResolveLog};
use crate::{EffectAtom, Tier, antidote_label, kinds, poison_label};

/// Safety bound for the cross-tier fixed-point loop.
const MAX_REDUCTION_PASSES: usize = 50;

/// Phase 1: deadly 1:1 cancellation.
pub(crate) fn cancel_deadly_pairs(buckets: &mut TierBuckets, logs: &mut Vec<ResolveLog>) {
    while buckets.poison_len(Tier::Deadly) > 0 && buckets.antidote_len(Tier::Deadly) > 0 {
        buckets.poison(Tier::Deadly).pop();
        buckets.antidote(Tier::Deadly).pop();
        logs.push(ResolveLog::new(LogAction::Cancel, "Смертельный яд ↔ противоядие от смертельных ядов"));
    }
}

/// Phase 2: every leftover deadly antidote consumes a bundle of non-deadly
/// poisons. Preference order: (1 strong + 2 medium), (2 strong), (3 medium),
/// (4 weak), then a single best-available poison as a partial match.
pub(crate) fn block_with_deadly_antidotes(buckets: &mut TierBuckets, logs: &mut Vec<ResolveLog>) {
    while buckets.antidote_len(Tier::Deadly) > 0 && buckets.has_lesser_poison() {
        buckets.antidote(Tier::Deadly).pop();
        let mut blocked: Vec<EffectAtom> = Vec::new();

        if buckets.poison_len(Tier::Strong) >= 1 && buckets.poison_len(Tier::Medium) >= 2 {
            blocked.extend(buckets.poison(Tier::Strong).pop());
            blocked.extend(buckets.poison(Tier::Medium).pop());
            blocked.extend(buckets.poison(Tier::Medium).pop());
        } else if buckets.poison_len(Tier::Strong) >= 2 {
            blocked.extend(buckets.poison(Tier::Strong).pop());
            blocked.extend(buckets.poison(Tier::Strong).pop());
        } else if buckets.poison_len(Tier::Medium) >= 3 {
            for _ in 0..3 {
                blocked.extend(buckets.poison(Tier::Medium).pop());
            }
        } else if buckets.poison_len(Tier::Weak) >= 4 {
            for _ in 0..4 {
                blocked.extend(buckets.poison(Tier::Weak).pop());
            }
        } else {
            // No full bundle available; spend the antidote on the single
            // strongest poison left.
            for tier in [Tier::Strong, Tier::Medium, Tier::Weak] {
                if buckets.poison_len(tier) > 0 {
                    blocked.extend(buckets.poison(tier).pop());
                    break;
                }
            }
        }

        let names: Vec<&str> = blocked.iter().map(|a| a.text.as_str()).collect();
        logs.push(ResolveLog::new(
            LogAction::Block,
            format!("Противоядие от смертельных ядов блокирует: {}", names.join(", ")),
        ));
    }
}

/// Phase 3 rule: pop one poison and one antidote of `tier` while both exist.
pub(crate) fn cancel_same_tier(buckets: &mut TierBuckets, tier: Tier, logs: &mut Vec<ResolveLog>) {
    while buckets.poison_len(tier) > 0 && buckets.antidote_len(tier) > 0 {
        let p = buckets.poison(tier).pop();
        let a = buckets.antidote(tier).pop();
        if let (Some(p), Some(a)) = (p, a) {
            logs.push(ResolveLog::new(LogAction::Cancel, format!("{} ↔ {} (оба подавлены)", p.text, a.text)));
        }
    }
}

/// Phases 3+4: same-tier cancellation followed by the cross-tier fixed point.
pub(crate) fn reduce_cross_tier(buckets: &mut TierBuckets, logs: &mut Vec<ResolveLog>) {
    for tier in [Tier::Strong, Tier::Medium, Tier::Weak] {
        cancel_same_tier(buckets, tier, logs);
    }

    let mut changed = true;
    let mut passes = 0;
    while changed && passes < MAX_REDUCTION_PASSES {
        passes += 1;
        changed = false;

        // strong poison + (medium | weak) antidote => residual poison of the
        // antidote's tier
        while buckets.poison_len(Tier::Strong) > 0
            && (buckets.antidote_len(Tier::Medium) > 0 || buckets.antidote_len(Tier::Weak) > 0)
        {
            if buckets.antidote_len(Tier::Medium) > 0 {
                reduce_poison(buckets, Tier::Strong, Tier::Medium, Tier::Medium, logs,
                    "Сильный яд + среднее противоядие ⇒ остаётся средний яд");
            } else {
                reduce_poison(buckets, Tier::Strong, Tier::Weak, Tier::Weak, logs,
                    "Сильный яд + слабое противоядие ⇒ остаётся слабый яд");
            }
            changed = true;
        }

        // strong antidote + (medium | weak) poison => residual antidote
        while buckets.antidote_len(Tier::Strong) > 0
            && (buckets.poison_len(Tier::Medium) > 0 || buckets.poison_len(Tier::Weak) > 0)
        {
            if buckets.poison_len(Tier::Medium) > 0 {
                reduce_antidote(buckets, Tier::Strong, Tier::Medium, Tier::Medium, logs,
                    "Сильное противоядие + средний яд ⇒ остаётся среднее противоядие");
            } else {
                reduce_antidote(buckets, Tier::Strong, Tier::Weak, Tier::Weak, logs,
                    "Сильное противоядие + слабый яд ⇒ остаётся слабое противоядие");
            }
            changed = true;
        }

        // medium poison + weak antidote => residual weak poison
        while buckets.poison_len(Tier::Medium) > 0 && buckets.antidote_len(Tier::Weak) > 0 {
            reduce_poison(buckets, Tier::Medium, Tier::Weak, Tier::Weak, logs,
                "Средний яд + слабое противоядие ⇒ остаётся слабый яд");
            changed = true;
        }

        // medium antidote + weak poison => residual weak antidote
        while buckets.antidote_len(Tier::Medium) > 0 && buckets.poison_len(Tier::Weak) > 0 {
            reduce_antidote(buckets, Tier::Medium, Tier::Weak, Tier::Weak, logs,
                "Среднее противоядие + слабый яд ⇒ остаётся слабое противоядие");
            changed = true;
        }

        // A reduction may have created a fresh same-tier pair; retry.
        for tier in [Tier::Strong, Tier::Medium, Tier::Weak] {
            let before = (buckets.poison_len(tier), buckets.antidote_len(tier));
            cancel_same_tier(buckets, tier, logs);
            if (buckets.poison_len(tier), buckets.antidote_len(tier)) != before {
                changed = true;
            }
        }
    }
}

fn reduce_poison(
    buckets: &mut TierBuckets,
    poison_tier: Tier,
    antidote_tier: Tier,
    result_tier: Tier,
    logs: &mut Vec<ResolveLog>,
    msg: &str,
) {
    buckets.poison(poison_tier).pop();
    buckets.antidote(antidote_tier).pop();
    buckets.poison(result_tier).push(EffectAtom::tiered(kinds::POISON, result_tier, poison_label(result_tier)));
    logs.push(ResolveLog::new(LogAction::Reduce, msg));
}

fn reduce_antidote(
    buckets: &mut TierBuckets,
    antidote_tier: Tier,
    poison_tier: Tier,
    result_tier: Tier,
    logs: &mut Vec<ResolveLog>,
    msg: &str,
) {
    buckets.antidote(antidote_tier).pop();
    buckets.poison(poison_tier).pop();
    buckets
        .antidote(result_tier)
        .push(EffectAtom::tiered(kinds::ANTIDOTE, result_tier, antidote_label(result_tier)));
    logs.push(ResolveLog::new(LogAction::Reduce, msg));
}
