//! Ingredient reference data.
//!
//! Immutable records created by data ingestion and never mutated by the
//! engine: a short unique code, a display name, a material category, one
//! primary effect text and up to three secondary effect texts (slots 1–3,
//! empty string = unused slot).

use crate::error::PackError;
use crate::normalize::normalize_text;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub material: String,
    /// Primary effect text.
    pub main: String,
    #[serde(default)]
    pub add1: String,
    #[serde(default)]
    pub add2: String,
    #[serde(default)]
    pub add3: String,
}

impl Ingredient {
    /// Secondary effect text for slot 1–3; empty string if unused.
    pub fn add(&self, slot: u8) -> &str {
        match slot {
            1 => &self.add1,
            2 => &self.add2,
            3 => &self.add3,
            _ => "",
        }
    }
}

#[derive(Debug, Deserialize)]
struct IngredientDoc {
    ingredients: BTreeMap<String, Ingredient>,
}

/// Read-only index of ingredients by code, with stable iteration order.
#[derive(Debug, Clone, Default)]
pub struct IngredientIndex {
    by_code: BTreeMap<String, Ingredient>,
}

impl IngredientIndex {
    pub fn from_map(by_code: BTreeMap<String, Ingredient>) -> Self {
        IngredientIndex { by_code }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let doc: IngredientDoc = serde_json::from_str(raw)?;
        Ok(IngredientIndex { by_code: doc.ingredients })
    }

    pub fn load(path: &Path) -> Result<Self, PackError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| PackError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&raw).map_err(|source| PackError::Parse { path: path.to_path_buf(), source })
    }

    pub fn get(&self, code: &str) -> Option<&Ingredient> {
        self.by_code.get(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Ingredient)> {
        self.by_code.iter()
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// Selection tokens whose main or chosen secondary effect equals
    /// `effect_text`. A main-effect match contributes all three slots (any
    /// chosen slot carries the main effect along); a secondary match only
    /// its own slot. Sorted, truncated to `limit`.
    pub fn tokens_producing_effect(&self, effect_text: &str, limit: usize) -> Vec<String> {
        let target = normalize_text(effect_text);
        let mut out: Vec<String> = Vec::new();
        for (code, ing) in &self.by_code {
            if normalize_text(&ing.main) == target {
                out.extend((1..=3).map(|i| format!("{code}{i}")));
                continue;
            }
            for slot in 1..=3u8 {
                if !ing.add(slot).is_empty() && normalize_text(ing.add(slot)) == target {
                    out.push(format!("{code}{slot}"));
                }
            }
        }
        out.sort();
        out.truncate(limit);
        out
    }
}
