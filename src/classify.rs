//! Effect classification: raw effect text → one or more typed atoms.
//!
//! Classification is total and deterministic for a given catalog snapshot:
//!
//! - Catalog hit: take `{kind, tier, tags}` from the entry. Two composite
//!   poison kinds expand into *two* atoms (the poison itself plus the implied
//!   side effect).
//! - Catalog miss: substring heuristics on the normalized key — an antidote
//!   marker word wins over the poison marker (the former contains the
//!   latter), and anything else degrades to a generic `raw` atom carrying the
//!   original text.
//!
//! The result is never empty.

use crate::catalog::EffectCatalog;
use crate::normalize::{normalize_key, normalize_text};
use crate::{EffectAtom, Tier, kinds};

/// Label used for the bleeding atom implied by a composite poison.
const BLEEDING_LABEL: &str = "Кровотечение";
/// Label used for the energy-down atom implied by a composite poison.
const ENERGY_DOWN_LABEL: &str = "Понижение энергии";

/// Expand one effect text into its atoms. Always returns at least one atom.
pub fn classify_effect_text(effect_text: &str, catalog: &EffectCatalog) -> Vec<EffectAtom> {
    let text = normalize_text(effect_text);

    let Some(class) = catalog.get(&text) else {
        return vec![fallback_atom(&text)];
    };

    match class.kind.as_str() {
        kinds::POISON_BLEEDING => vec![
            EffectAtom::tiered(kinds::POISON, class.tier.unwrap_or(Tier::Medium), &text),
            EffectAtom::new(kinds::BLEEDING, BLEEDING_LABEL),
        ],
        kinds::POISON_ENERGY_DOWN => vec![
            EffectAtom::tiered(kinds::POISON, class.tier.unwrap_or(Tier::Weak), &text),
            EffectAtom::new(kinds::ENERGY_DOWN, ENERGY_DOWN_LABEL),
        ],
        _ => vec![EffectAtom {
            kind: class.kind.clone(),
            tier: class.tier,
            text,
            tags: class.tags.clone(),
        }],
    }
}

fn fallback_atom(text: &str) -> EffectAtom {
    let key = normalize_key(text);
    // "противояд" contains "яд"; check the more specific marker first.
    if key.contains("противояд") {
        EffectAtom::new(kinds::ANTIDOTE, text)
    } else if key.contains("яд") {
        EffectAtom::new(kinds::POISON, text)
    } else {
        EffectAtom::new(kinds::RAW, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EffectClass;

    fn catalog() -> EffectCatalog {
        let class = |kind: &str, tier: Option<Tier>| EffectClass {
            kind: kind.to_string(),
            tier,
            tags: Vec::new(),
        };
        EffectCatalog::from_entries([
            ("Сильный яд".to_string(), class("poison", Some(Tier::Strong))),
            ("Яд с кровотечением".to_string(), class("poison_bleeding", None)),
            ("Истощающий яд".to_string(), class("poison_energy_down", Some(Tier::Medium))),
            ("Сон".to_string(), class("sleep", None)),
        ])
    }

    #[test]
    fn catalog_hit_carries_kind_and_tier() {
        let atoms = classify_effect_text("  сильный   ЯД ", &catalog());
        assert_eq!(atoms.len(), 1);
        assert_eq!(atoms[0].kind, kinds::POISON);
        assert_eq!(atoms[0].tier, Some(Tier::Strong));
        assert_eq!(atoms[0].text, "сильный ЯД");
    }

    #[test]
    fn composite_bleeding_expands_to_two_atoms() {
        let atoms = classify_effect_text("Яд с кровотечением", &catalog());
        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms[0].kind, kinds::POISON);
        // Tier defaults to medium when the catalog does not give one.
        assert_eq!(atoms[0].tier, Some(Tier::Medium));
        assert_eq!(atoms[1].kind, kinds::BLEEDING);
        assert_eq!(atoms[1].text, "Кровотечение");
    }

    #[test]
    fn composite_energy_down_keeps_catalog_tier() {
        let atoms = classify_effect_text("Истощающий яд", &catalog());
        assert_eq!(atoms[0].tier, Some(Tier::Medium));
        assert_eq!(atoms[1].kind, kinds::ENERGY_DOWN);
    }

    #[test]
    fn fallback_prefers_antidote_marker_over_poison() {
        let cat = catalog();
        assert_eq!(classify_effect_text("Неизвестное противоядие", &cat)[0].kind, kinds::ANTIDOTE);
        assert_eq!(classify_effect_text("Какой-то ядовитый отвар", &cat)[0].kind, kinds::POISON);
        assert_eq!(classify_effect_text("Лёгкость", &cat)[0].kind, kinds::RAW);
    }

    #[test]
    fn classification_is_total() {
        let cat = EffectCatalog::default();
        for text in ["", "   ", "???", "яд", "ПРОТИВОЯДИЕ"] {
            assert!(!classify_effect_text(text, &cat).is_empty());
        }
    }
}
