//! Tiered bucket state for the resolver.
//!
//! The tier phases operate on poison and antidote atoms bucketed by tier;
//! everything else rides along in `others` in original encounter order.
//! `TierBuckets` is the resolver's working state, built once from the
//! classified atoms and drained when the final atom list is reassembled.

use crate::{EffectAtom, Tier, kinds};

#[derive(Debug, Default)]
pub(crate) struct TierBuckets {
    poison: [Vec<EffectAtom>; 4],
    antidote: [Vec<EffectAtom>; 4],
    /// Non-poison/antidote atoms, original encounter order.
    pub(crate) others: Vec<EffectAtom>,
}

fn slot(tier: Tier) -> usize {
    match tier {
        Tier::Weak => 0,
        Tier::Medium => 1,
        Tier::Strong => 2,
        Tier::Deadly => 3,
    }
}

impl TierBuckets {
    /// Split atoms into tier buckets. Poison/antidote atoms *without* a tier
    /// are treated as "other" — the tier phases have nothing to pair them
    /// against.
    pub(crate) fn from_atoms(atoms: Vec<EffectAtom>) -> Self {
        let mut buckets = TierBuckets::default();
        for atom in atoms {
            match (atom.kind.as_str(), atom.tier) {
                (kinds::POISON, Some(tier)) => buckets.poison[slot(tier)].push(atom),
                (kinds::ANTIDOTE, Some(tier)) => buckets.antidote[slot(tier)].push(atom),
                _ => buckets.others.push(atom),
            }
        }
        buckets
    }

    pub(crate) fn poison(&mut self, tier: Tier) -> &mut Vec<EffectAtom> {
        &mut self.poison[slot(tier)]
    }

    pub(crate) fn antidote(&mut self, tier: Tier) -> &mut Vec<EffectAtom> {
        &mut self.antidote[slot(tier)]
    }

    pub(crate) fn poison_len(&self, tier: Tier) -> usize {
        self.poison[slot(tier)].len()
    }

    pub(crate) fn antidote_len(&self, tier: Tier) -> usize {
        self.antidote[slot(tier)].len()
    }

    /// True if any non-deadly poison remains.
    pub(crate) fn has_lesser_poison(&self) -> bool {
        [Tier::Strong, Tier::Medium, Tier::Weak].iter().any(|&t| self.poison_len(t) > 0)
    }

    /// Reassemble the surviving atoms: others first (encounter order), then
    /// poisons strongest-first, then antidotes strongest-first.
    pub(crate) fn into_final_atoms(mut self) -> Vec<EffectAtom> {
        let mut out = std::mem::take(&mut self.others);
        for tier in Tier::DESCENDING {
            out.append(&mut self.poison[slot(tier)]);
        }
        for tier in Tier::DESCENDING {
            out.append(&mut self.antidote[slot(tier)]);
        }
        out
    }
}
