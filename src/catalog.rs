//! Effect catalog: normalized effect text → semantic descriptor.
//!
//! The catalog is reference data sourced from an external tabular
//! collaborator. Each entry maps the canonical display text of an effect to
//! `{kind, tier, tags}`. Keys are stored under [`normalize_key`] so that
//! lookups tolerate casing and the known source typos; the display texts are
//! kept separately, in document order, for the substring search used by
//! selection UIs.
//!
//! Absent entries are not an error — the classifier falls back to substring
//! heuristics (see `classify.rs`).

use crate::Tier;
use crate::error::PackError;
use crate::normalize::{normalize_key, normalize_text};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Semantic descriptor of one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectClass {
    pub kind: String,
    pub tier: Option<Tier>,
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    effect_text: String,
    #[serde(default)]
    kind: String,
    #[serde(default)]
    tier: Option<Tier>,
    #[serde(default)]
    tags: Vec<String>,
}

/// Read-only mapping from normalized effect text to [`EffectClass`].
#[derive(Debug, Clone, Default)]
pub struct EffectCatalog {
    entries: HashMap<String, EffectClass>,
    /// Display texts in document order, for search.
    texts: Vec<String>,
}

impl EffectCatalog {
    /// Build a catalog from `(effect_text, class)` pairs. Texts are
    /// normalized; later duplicates overwrite earlier ones, as in the source
    /// tables.
    pub fn from_entries(rows: impl IntoIterator<Item = (String, EffectClass)>) -> Self {
        let mut catalog = EffectCatalog::default();
        for (text, mut class) in rows {
            let display = normalize_text(&text);
            if display.is_empty() {
                continue;
            }
            if class.kind.is_empty() {
                class.kind = crate::kinds::RAW.to_string();
            }
            let key = normalize_key(&display);
            if catalog.entries.insert(key, class).is_none() {
                catalog.texts.push(display);
            }
        }
        catalog
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let rows: Vec<CatalogRow> = serde_json::from_str(raw)?;
        Ok(Self::from_entries(rows.into_iter().map(|row| {
            (row.effect_text, EffectClass { kind: row.kind, tier: row.tier, tags: row.tags })
        })))
    }

    pub fn load(path: &Path) -> Result<Self, PackError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| PackError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&raw).map_err(|source| PackError::Parse { path: path.to_path_buf(), source })
    }

    /// Look up the class of an effect text (normalized internally).
    pub fn get(&self, effect_text: &str) -> Option<&EffectClass> {
        self.entries.get(&normalize_key(effect_text))
    }

    /// Kind of an effect text, defaulting to `raw` for unknown texts.
    pub fn kind_of(&self, effect_text: &str) -> &str {
        self.get(effect_text).map(|c| c.kind.as_str()).unwrap_or(crate::kinds::RAW)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Substring search over catalog texts for UI selection.
    ///
    /// Matches on the normalized key; ranked by (match position, text length,
    /// lexicographic), earliest and shortest first.
    pub fn search(&self, query: &str, limit: usize) -> Vec<String> {
        let q = normalize_key(query);
        if q.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, usize, &String)> = self
            .texts
            .iter()
            .filter_map(|text| normalize_key(text).find(&q).map(|pos| (pos, text.chars().count(), text)))
            .collect();
        scored.sort_by(|a, b| (a.0, a.1, a.2.to_lowercase()).cmp(&(b.0, b.1, b.2.to_lowercase())));
        scored.into_iter().take(limit).map(|(_, _, t)| t.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> EffectCatalog {
        let class = |kind: &str, tier: Option<Tier>| EffectClass {
            kind: kind.to_string(),
            tier,
            tags: Vec::new(),
        };
        EffectCatalog::from_entries([
            ("Слабый яд".to_string(), class("poison", Some(Tier::Weak))),
            ("Сильный яд".to_string(), class("poison", Some(Tier::Strong))),
            ("Восстановление энергии".to_string(), class("restore_energy", None)),
            ("Правда".to_string(), class("truth", None)),
        ])
    }

    #[test]
    fn lookup_is_case_and_whitespace_insensitive() {
        let cat = catalog();
        let class = cat.get("  слабый   ЯД ").unwrap();
        assert_eq!(class.kind, "poison");
        assert_eq!(class.tier, Some(Tier::Weak));
    }

    #[test]
    fn kind_of_falls_back_to_raw() {
        let cat = catalog();
        assert_eq!(cat.kind_of("неизвестный эффект"), "raw");
        assert_eq!(cat.kind_of("Восстановление энергии"), "restore_energy");
    }

    #[test]
    fn search_ranks_by_position_then_length() {
        let cat = catalog();
        let hits = cat.search("яд", 10);
        // "Слабый яд" and "Сильный яд" both match at position 7 bytes in...
        // earlier position wins; among same positions shorter text wins.
        assert!(hits.contains(&"Слабый яд".to_string()));
        assert!(hits.contains(&"Сильный яд".to_string()));
        assert!(!hits.contains(&"Правда".to_string()));
    }

    #[test]
    fn search_empty_query_returns_nothing() {
        assert!(catalog().search("   ", 5).is_empty());
    }

    #[test]
    fn parses_json_rows() {
        let cat = EffectCatalog::from_json_str(
            r#"[
                {"effect_text": "Средний яд", "kind": "poison", "tier": "medium"},
                {"effect_text": "Сон", "kind": "sleep", "tags": ["mind"]}
            ]"#,
        )
        .unwrap();
        assert_eq!(cat.len(), 2);
        assert_eq!(cat.get("средний яд").unwrap().tier, Some(Tier::Medium));
        assert_eq!(cat.get("Сон").unwrap().tags, vec!["mind".to_string()]);
    }
}
