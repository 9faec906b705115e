mod debug_report;

use orgmatch::{Candidate, Options, Query, resolve_verbose_with};
use std::fs;
use std::io::{self, IsTerminal, Read};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    init_tracing();

    let candidates = match load_candidates(&config) {
        Ok(candidates) => candidates,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let mut query = Query::new(&config.name);
    if let Some(registration) = &config.registration {
        query = query.with_registration(registration);
    }

    let options = Options { viability_floor: config.floor };
    let res = resolve_verbose_with(&query, &candidates, &options);
    let matched = res.outcome.is_ok();
    debug_report::print_run(&query, &res, config.color);

    if !matched {
        std::process::exit(1);
    }
}

struct CliConfig {
    name: String,
    registration: Option<String>,
    candidates_path: Option<String>,
    floor: f64,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut name: Option<String> = None;
    let mut registration: Option<String> = None;
    let mut candidates_path: Option<String> = None;
    let mut floor = 0.0f64;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("orgmatch {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--registration" | "-r" => {
                let value =
                    args.next().ok_or_else(|| "error: --registration expects a value".to_string())?;
                registration = Some(value);
            }
            "--candidates" | "-c" => {
                let value =
                    args.next().ok_or_else(|| "error: --candidates expects a path".to_string())?;
                candidates_path = Some(value);
            }
            "--floor" => {
                let value = args.next().ok_or_else(|| "error: --floor expects a value".to_string())?;
                floor = parse_floor(&value)?;
            }
            _ if arg.starts_with("--registration=") => {
                registration = Some(arg.trim_start_matches("--registration=").to_string());
            }
            _ if arg.starts_with("--candidates=") => {
                candidates_path = Some(arg.trim_start_matches("--candidates=").to_string());
            }
            _ if arg.starts_with("--floor=") => {
                floor = parse_floor(arg.trim_start_matches("--floor="))?;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                name = Some(rest);
                break;
            }
        }
    }

    let name = name.ok_or_else(|| format!("error: no query name provided\n\n{}", help_text()))?;
    if name.trim().is_empty() {
        return Err(format!("error: query name is empty\n\n{}", help_text()));
    }

    Ok(CliConfig { name, registration, candidates_path, floor, color })
}

fn parse_floor(value: &str) -> Result<f64, String> {
    value.parse::<f64>().map_err(|_| format!("error: invalid --floor '{value}' (expected a number)"))
}

/// Candidate rows come one per line as `name<TAB>registration`; the
/// registration column is optional. Blank lines and `#` comments are skipped.
fn load_candidates(config: &CliConfig) -> Result<Vec<Candidate>, String> {
    let text = match &config.candidates_path {
        Some(path) => fs::read_to_string(path)
            .map_err(|err| format!("error: failed to read '{path}': {err}"))?,
        None => {
            if io::stdin().is_terminal() {
                return Err(format!(
                    "error: no candidate rows (pass --candidates <file> or pipe rows on stdin)\n\n{}",
                    help_text()
                ));
            }
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|err| format!("error: failed to read stdin: {err}"))?;
            buffer
        }
    };

    let mut candidates = Vec::new();
    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        let candidate = match line.split_once('\t') {
            Some((name, registration)) if !registration.trim().is_empty() => {
                Candidate::new(name.trim()).with_registration(registration.trim())
            }
            Some((name, _)) => Candidate::new(name.trim()),
            None => Candidate::new(line.trim()),
        };
        candidates.push(candidate);
    }

    Ok(candidates)
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "orgmatch {version}

Resolves an organization name (and optional registration identifier) against
scraped candidate rows and reports the best match with a score breakdown.

Usage:
  orgmatch [OPTIONS] <name...>
  orgmatch [OPTIONS] --candidates <file> <name...>

Candidate rows are read from --candidates or stdin, one per line:
  <name>[<TAB><registration>]
Blank lines and lines starting with '#' are skipped.

Options:
  -r, --registration <id>    Registration identifier for precise matching.
                             All register formats are accepted: HRB, HRA, PR,
                             GnR, VR, GüR, EWIV, SE, SCE, SPE.
  -c, --candidates <file>    File with candidate rows. Defaults to stdin.
  --floor <score>            Viability floor a match must exceed. Default: 0.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  A match was selected.
  1  No candidates or no sufficiently similar candidate.
  2  Invalid arguments or unreadable input.
",
        version = env!("CARGO_PKG_VERSION")
    )
}
