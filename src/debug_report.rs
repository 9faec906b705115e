use orgmatch::{PassMode, PassSummary, Query, ResolveError, VerboseResolution};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
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

pub fn print_run(query: &Query, res: &VerboseResolution<'_>, color: bool) {
    let palette = ansi::Palette::new(color);
    println!(
        "\n{}",
        palette.bold(palette.paint(format!("⚙  Resolving: \"{}\"", query.name), ansi::CYAN))
    );

    println!("\n{}", palette.paint("━━━ Query ━━━", ansi::GRAY));
    println!("  Canonical name: {}", palette.paint(&res.details.query_canonical, ansi::GREEN));
    match (&res.details.query_registration, res.details.query_registration_invalid) {
        (Some(id), _) => {
            println!("  Registration:   {}", palette.paint(id.normalized(), ansi::GREEN));
        }
        (None, true) => {
            println!(
                "  Registration:   {}",
                palette.paint("unparseable, matching by name only", ansi::YELLOW)
            );
        }
        (None, false) => println!("  Registration:   {}", palette.dim("none")),
    }

    let winner = res.outcome.as_ref().ok().map(|best| best.index);

    println!("\n{}", palette.paint("━━━ Scoring ━━━", ansi::GRAY));
    if res.details.passes.is_empty() {
        println!("{}", palette.dim("  No candidates to score"));
    }
    for (number, pass) in res.details.passes.iter().enumerate() {
        print_pass(number + 1, pass, winner, &palette);
    }

    println!("\n{}", palette.paint("━━━ Result ━━━", ansi::GRAY));
    match &res.outcome {
        Ok(best) => {
            println!(
                "  {} {} {}",
                palette.paint(format!("[{}]", best.index), ansi::GRAY),
                palette.bold(palette.paint(&best.candidate.name, ansi::GREEN)),
                palette.paint(format!("score {:.1}", best.final_score), ansi::YELLOW),
            );
            match &best.candidate.registration {
                Some(registration) => println!(
                    "      {} {}",
                    palette.dim("registration:"),
                    palette.paint(registration, ansi::BLUE)
                ),
                None => println!("      {}", palette.dim("registration: none")),
            }
            if best.fallback {
                println!("      {}", palette.paint("decided by the name-only fallback pass", ansi::YELLOW));
            }
        }
        Err(ResolveError::NoCandidates) => {
            println!("{}", palette.dim("  No candidate rows supplied"));
        }
        Err(ResolveError::NoMatchFound) => {
            println!("{}", palette.dim("  No sufficiently similar candidate"));
            println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
            println!("  • No candidate scored above the viability floor (see --floor)");
            println!("  • The candidate names share no tokens with the query");
            println!("  • Candidate registration cells were unparseable");
        }
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    let passes = res
        .details
        .passes
        .iter()
        .map(|p| format!("{:?}", p.duration))
        .collect::<Vec<_>>()
        .join(" + ");
    println!(
        "  Total: {}  │  Passes: {}",
        palette.paint(format!("{:?}", res.details.total), ansi::GREEN),
        if passes.is_empty() { palette.dim("-") } else { palette.paint(passes, ansi::CYAN) },
    );
    println!();
}

fn print_pass(number: usize, pass: &PassSummary, winner: Option<usize>, palette: &ansi::Palette) {
    let label = match pass.mode {
        PassMode::Weighted => format!("Pass {number} (registration-weighted):"),
        PassMode::NameOnly => format!("Pass {number} (name-only fallback):"),
    };
    println!("  {}", palette.paint(label, ansi::BLUE));

    for score in &pass.scores {
        let marker = if winner == Some(score.index) { "◀" } else { " " };
        println!(
            "    {} {} {}",
            palette.paint(format!("[{}]", score.index), ansi::GRAY),
            palette.bold(truncate(&score.name, 40)),
            palette.paint(marker, ansi::GREEN),
        );
        println!(
            "        {} {:>5.1}  {} {:.3}  {} {:>6.0}  {} {}",
            palette.dim("name:"),
            score.name_score,
            palette.dim("│ similarity:"),
            score.registration_similarity,
            palette.dim("│ bonus:"),
            score.registration_bonus,
            palette.dim("│ final:"),
            palette.paint(format!("{:.1}", score.final_score), ansi::YELLOW),
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max { s.to_string() } else { s.chars().take(max).collect::<String>() + "…" }
}
