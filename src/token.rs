//! Selection tokens and formula-level constraints.
//!
//! A token is `<ingredient-code><slot digit 1-3>`, e.g. `RK2`: "use this
//! ingredient's main effect plus its slot-2 secondary effect". A formula is
//! a fixed-size list of tokens; order carries no semantic weight but is
//! preserved for display.
//!
//! Constraint layers:
//!
//! - [`parse_token`]: format only.
//! - [`validate_formula_tokens`]: no verbatim duplicate token.
//! - [`validate_recipe_tokens`]: additionally the fixed size, per-code
//!   repeat limit (≤2), and distinct slots for a repeated code.

use crate::error::FormulaError;
use std::collections::HashMap;
use std::fmt;

/// Number of selection tokens in a full formula.
pub const FORMULA_SIZE: usize = 5;

/// A parsed `(ingredient_code, slot)` selection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionToken {
    code: String,
    slot: u8,
}

impl SelectionToken {
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Chosen secondary-effect slot, 1–3.
    pub fn slot(&self) -> u8 {
        self.slot
    }
}

impl fmt::Display for SelectionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.code, self.slot)
    }
}

/// Parse `"KQ1"` into `(KQ, 1)`. Fails on anything that does not end in a
/// digit 1–3 preceded by a non-empty code.
pub fn parse_token(token: &str) -> Result<SelectionToken, FormulaError> {
    let token = token.trim();
    let caps = regex!(r"^(.+?)([123])$")
        .captures(token)
        .ok_or_else(|| FormulaError::BadTokenFormat(token.to_string()))?;

    let code = caps[1].to_string();
    // The pattern guarantees a single digit 1-3.
    let slot = caps[2].as_bytes()[0] - b'0';
    Ok(SelectionToken { code, slot })
}

/// Reject a formula that repeats the exact same token (same ingredient *and*
/// same slot). Repeating a code with different slots is allowed here.
pub fn validate_formula_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<(), FormulaError> {
    let mut seen: Vec<&str> = Vec::with_capacity(tokens.len());
    for tok in tokens {
        let t = tok.as_ref().trim();
        if seen.contains(&t) {
            return Err(FormulaError::DuplicateToken(t.to_string()));
        }
        seen.push(t);
    }
    Ok(())
}

/// Full recipe validation: exact size, no duplicate tokens, each code used at
/// most twice, and a repeated code must use as many distinct slots as it has
/// occurrences.
pub fn validate_recipe_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<(), FormulaError> {
    if tokens.len() != FORMULA_SIZE {
        return Err(FormulaError::WrongSize { expected: FORMULA_SIZE, got: tokens.len() });
    }
    validate_formula_tokens(tokens)?;

    let mut counts: HashMap<String, (usize, Vec<u8>)> = HashMap::new();
    for tok in tokens {
        let parsed = parse_token(tok.as_ref())?;
        let entry = counts.entry(parsed.code.clone()).or_default();
        entry.0 += 1;
        if !entry.1.contains(&parsed.slot) {
            entry.1.push(parsed.slot);
        }
    }

    for (code, (count, slots)) in counts {
        if count > 2 {
            return Err(FormulaError::TooManyRepeats { code, count });
        }
        if slots.len() != count {
            return Err(FormulaError::RepeatedWithoutSlotChange(code));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        for (raw, code, slot) in [("KQ1", "KQ", 1), ("RK2", "RK", 2), ("ФЛ3", "ФЛ", 3)] {
            let tok = parse_token(raw).unwrap();
            assert_eq!(tok.code(), code);
            assert_eq!(tok.slot(), slot);
            assert_eq!(tok.to_string(), raw);
            assert_eq!(parse_token(&tok.to_string()).unwrap(), tok);
        }
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        assert_eq!(parse_token("  KQ1 ").unwrap().code(), "KQ");
    }

    #[test]
    fn parse_rejects_malformed_tokens() {
        for bad in ["KQ", "KQ4", "1", "", "KQ0"] {
            assert!(matches!(parse_token(bad), Err(FormulaError::BadTokenFormat(_))), "token {bad:?}");
        }
    }

    #[test]
    fn duplicate_token_is_rejected() {
        let err = validate_formula_tokens(&["A1", "A1", "B2"]).unwrap_err();
        assert_eq!(err, FormulaError::DuplicateToken("A1".to_string()));
        // Same code with different slots is fine at this layer.
        validate_formula_tokens(&["A1", "A2", "A3"]).unwrap();
    }

    #[test]
    fn recipe_accepts_two_codes_with_distinct_slots() {
        validate_recipe_tokens(&["A1", "A2", "B1", "B2", "C3"]).unwrap();
    }

    #[test]
    fn recipe_rejects_wrong_size() {
        assert!(matches!(
            validate_recipe_tokens(&["A1", "A2", "B1"]),
            Err(FormulaError::WrongSize { expected: FORMULA_SIZE, got: 3 })
        ));
    }

    #[test]
    fn recipe_rejects_exact_duplicate() {
        assert!(matches!(
            validate_recipe_tokens(&["A1", "A1", "B2", "B3", "C1"]),
            Err(FormulaError::DuplicateToken(_))
        ));
    }

    #[test]
    fn recipe_rejects_triple_use_of_one_code() {
        assert!(matches!(
            validate_recipe_tokens(&["A1", "A2", "A3", "B1", "C1"]),
            Err(FormulaError::TooManyRepeats { count: 3, .. })
        ));
    }
}
