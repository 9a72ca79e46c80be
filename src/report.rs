use alembic::{EffectAtom, RecipeCandidate, Resolution};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_resolution(input: &str, res: &Resolution, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚗  Resolving: \"{}\"", input), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Final effects ━━━", ansi::GRAY));
    if res.final_effects.is_empty() {
        println!("{}", palette.dim("  (everything cancelled out)"));
    } else {
        for (idx, effect) in res.final_effects.iter().enumerate() {
            println!(
                "  {} {}",
                palette.paint(format!("[{}]", idx), ansi::GRAY),
                palette.bold(palette.paint(effect, ansi::GREEN)),
            );
        }
    }

    if !res.logs.is_empty() {
        println!("\n{}", palette.paint("━━━ Log ━━━", ansi::GRAY));
        for log in &res.logs {
            println!(
                "  {} {}",
                palette.paint(format!("{:>8}", log.action.to_string()), ansi::YELLOW),
                palette.dim(&log.details),
            );
        }
    }

    if !res.violations.is_empty() {
        println!("\n{}", palette.paint("━━━ Violations ━━━", ansi::GRAY));
        for violation in &res.violations {
            println!("  {}", palette.paint(violation, ansi::RED));
        }
    }
    println!();
}

pub fn print_candidates(target: &str, found: &[RecipeCandidate], color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚗  Searching: \"{}\"", target), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Recipes ━━━", ansi::GRAY));
    if found.is_empty() {
        println!("{}", palette.dim("  No recipe found"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • No ingredient produces this effect text");
        println!("  • Every candidate exceeded the side-effect limit");
        println!("  • The time budget ran out (try a larger --budget)");
        println!();
        return;
    }

    for (idx, candidate) in found.iter().enumerate() {
        println!(
            "  {} {} {} {}",
            palette.paint(format!("[{}]", idx), ansi::GRAY),
            palette.bold(palette.paint(candidate.tokens.join(" "), ansi::GREEN)),
            palette.dim("│"),
            palette.paint(
                format!("{} effect(s), harm {}", candidate.effect_count, candidate.harm),
                ansi::YELLOW
            ),
        );
        println!("      {} {}", palette.dim("brew:"), palette.paint(candidate.final_effects.join(", "), ansi::CYAN));
    }
    println!();
}

pub fn print_classification(
    input: &str,
    atoms: &[EffectAtom],
    tokens: &[String],
    catalog_matches: &[String],
    color: bool,
) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚗  Classifying: \"{}\"", input), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Atoms ━━━", ansi::GRAY));
    for atom in atoms {
        let tier = atom.tier.map(|t| t.as_str()).unwrap_or("-");
        println!(
            "  {} {} {} {}",
            palette.bold(palette.paint(&atom.kind, ansi::GREEN)),
            palette.paint(format!("tier {}", tier), ansi::YELLOW),
            palette.dim("│"),
            palette.dim(&atom.text),
        );
        if !atom.tags.is_empty() {
            println!("      {} {}", palette.dim("tags:"), palette.dim(atom.tags.join(", ")));
        }
    }

    println!("\n{}", palette.paint("━━━ Producing tokens ━━━", ansi::GRAY));
    if tokens.is_empty() {
        println!("{}", palette.dim("  No ingredient produces this exact text"));
    } else {
        println!("  {}", palette.paint(tokens.join(" "), ansi::GREEN));
    }

    if !catalog_matches.is_empty() {
        println!("\n{}", palette.paint("━━━ Similar catalog entries ━━━", ansi::GRAY));
        for text in catalog_matches {
            println!("  {}", palette.dim(text));
        }
    }
    println!();
}
