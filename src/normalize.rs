//! Canonicalization of raw effect strings.
//!
//! Two levels:
//!
//! - [`normalize_text`] produces the *display* form: trimmed, internal
//!   whitespace collapsed, letter variants and quote glyphs unified. This is
//!   the form the engine reports back to callers.
//! - [`normalize_key`] produces the *lookup* form: the display form,
//!   lowercased, with a small fixed set of known source-data typos folded in.
//!   Catalog keys and search comparisons use this form so that two
//!   differently-misspelled phrasings of the same effect land on one entry.
//!
//! Both functions are total and idempotent; they never fail, whatever the
//! input.

/// Canonical display form of an effect text.
pub fn normalize_text(s: &str) -> String {
    let s = s.trim();
    let mut out = String::with_capacity(s.len());

    for ch in s.chars() {
        match ch {
            'Ё' => out.push('Е'),
            'ё' => out.push('е'),
            '«' | '»' | '“' | '”' => out.push('"'),
            _ => out.push(ch),
        }
    }

    regex!(r"\s+").replace_all(&out, " ").into_owned()
}

/// Canonical lookup key: [`normalize_text`] + lowercase + known-typo fixes.
pub fn normalize_key(s: &str) -> String {
    let mut s = normalize_text(s).to_lowercase();
    // Frequent typos in the source tables; keep this list short and exact.
    for (from, to) in [
        ("галюцина", "галлюцина"),
        ("приводик", "приводит"),
        ("сноведени", "сновидени"),
        ("эфори", "эйфори"),
    ] {
        if s.contains(from) {
            s = s.replace(from, to);
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(normalize_text("  Слабый   яд \t"), "Слабый яд");
    }

    #[test]
    fn unifies_letter_variants_and_quotes() {
        assert_eq!(normalize_text("«Зелёный»"), "\"Зеленый\"");
        assert_eq!(normalize_text("ЁЖ ёж"), "ЕЖ еж");
    }

    #[test]
    fn text_is_idempotent() {
        let inputs = ["  a  b ", "«Ёлка»", "", "уже нормально", "x\n\ny"];
        for input in inputs {
            let once = normalize_text(input);
            assert_eq!(normalize_text(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn key_lowercases_and_fixes_typos() {
        assert_eq!(normalize_key("ГАЛЮЦИНАЦИИ"), "галлюцинации");
        assert_eq!(normalize_key("Эфория"), "эйфория");
        assert_eq!(normalize_key("Приводик ко сну"), "приводит ко сну");
    }

    #[test]
    fn key_is_idempotent() {
        for input in ["Галюцинации и сноведения", "Средний ЯД", ""] {
            let once = normalize_key(input);
            assert_eq!(normalize_key(&once), once, "input: {input:?}");
        }
    }
}
