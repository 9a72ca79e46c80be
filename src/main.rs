mod report;

use alembic::{Engine, SearchOptions};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::time::Duration;

const DATA_DIR_ENV: &str = "ALEMBIC_DATA";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_BUDGET_SECS: u64 = 20;
const DEFAULT_LIMIT: usize = 3;

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let engine = match Engine::load_pack(&config.data_dir) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    std::process::exit(run(&engine, &config));
}

fn run(engine: &Engine, config: &CliConfig) -> i32 {
    match config.command {
        Command::Resolve => {
            let tokens: Vec<String> = config
                .input
                .split([' ', ','])
                .filter(|t| !t.trim().is_empty())
                .map(|t| t.trim().to_string())
                .collect();
            match engine.resolve_formula(&tokens) {
                Ok(res) => {
                    report::print_resolution(&config.input, &res, config.color);
                    0
                }
                Err(err) => {
                    eprintln!("error: {err}");
                    2
                }
            }
        }
        Command::Search => {
            let options = SearchOptions {
                max_results: config.limit,
                time_budget: config.budget,
                seed: config.seed,
                ..SearchOptions::default()
            };
            let found = engine.find_recipes(&config.input, &options);
            report::print_candidates(&config.input, &found, config.color);
            0
        }
        Command::Classify => {
            let atoms = engine.classify(&config.input);
            let tokens = engine.ingredients().tokens_producing_effect(&config.input, 30);
            let matches = engine.catalog().search(&config.input, 10);
            report::print_classification(&config.input, &atoms, &tokens, &matches, config.color);
            0
        }
    }
}

#[derive(Clone, Copy)]
enum Command {
    Resolve,
    Search,
    Classify,
}

struct CliConfig {
    command: Command,
    input: String,
    data_dir: PathBuf,
    seed: u64,
    budget: Duration,
    limit: usize,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut command: Option<Command> = None;
    let mut input: Option<String> = None;
    let mut data_dir =
        PathBuf::from(std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()));
    let mut seed = 0u64;
    let mut budget = Duration::from_secs(DEFAULT_BUDGET_SECS);
    let mut limit = DEFAULT_LIMIT;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("alembic {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--data" => {
                let value = args.next().ok_or_else(|| "error: --data expects a value".to_string())?;
                data_dir = PathBuf::from(value);
            }
            "--seed" => {
                let value = args.next().ok_or_else(|| "error: --seed expects a value".to_string())?;
                seed = parse_seed(&value)?;
            }
            "--budget" => {
                let value = args.next().ok_or_else(|| "error: --budget expects a value".to_string())?;
                budget = parse_budget(&value)?;
            }
            "--limit" => {
                let value = args.next().ok_or_else(|| "error: --limit expects a value".to_string())?;
                limit = parse_limit(&value)?;
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--data=") => {
                data_dir = PathBuf::from(arg.trim_start_matches("--data="));
            }
            _ if arg.starts_with("--seed=") => {
                seed = parse_seed(arg.trim_start_matches("--seed="))?;
            }
            _ if arg.starts_with("--budget=") => {
                budget = parse_budget(arg.trim_start_matches("--budget="))?;
            }
            _ if arg.starts_with("--limit=") => {
                limit = parse_limit(arg.trim_start_matches("--limit="))?;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ if command.is_none() => {
                command = Some(parse_command(&arg)?);
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    let command = command.ok_or_else(|| format!("error: no command provided\n\n{}", help_text()))?;

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { command, input: input.trim().to_string(), data_dir, seed, budget, limit, color })
}

fn parse_command(value: &str) -> Result<Command, String> {
    match value {
        "resolve" => Ok(Command::Resolve),
        "search" => Ok(Command::Search),
        "classify" => Ok(Command::Classify),
        _ => Err(format!("error: unknown command '{value}' (expected resolve, search, or classify)")),
    }
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn parse_seed(value: &str) -> Result<u64, String> {
    value.parse().map_err(|_| format!("error: invalid --seed '{value}' (expected an integer)"))
}

fn parse_budget(value: &str) -> Result<Duration, String> {
    let secs: u64 =
        value.parse().map_err(|_| format!("error: invalid --budget '{value}' (expected seconds)"))?;
    Ok(Duration::from_secs(secs))
}

fn parse_limit(value: &str) -> Result<usize, String> {
    let limit: usize =
        value.parse().map_err(|_| format!("error: invalid --limit '{value}' (expected an integer)"))?;
    if limit == 0 {
        return Err("error: --limit must be at least 1".to_string());
    }
    Ok(limit)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "alembic {version}

Crafting-ruleset engine CLI.

Usage:
  alembic <command> [OPTIONS] [--] <input...>

Commands:
  resolve    Resolve a token formula, e.g. 'KQ1 FR2 ML1 SB3 TT1'.
  search     Find recipes for a target effect text.
  classify   Classify an effect text and list matching tokens.

Options:
  --data <dir>       Data pack directory with ingredients.json,
                     effect_catalog.json, rules.json.
                     Default: ${data_env} or '{default_dir}'.
  --seed <n>         RNG seed for the search sampling fallback. Default: 0.
  --budget <secs>    Search time budget in seconds. Default: {budget}.
  --limit <n>        Maximum search results. Default: {limit}.
  --color            Force ANSI color output.
  --no-color         Disable ANSI color output.
  -h, --help         Show this help message.
  -V, --version      Print version information.

Exit codes:
  0  Success.
  1  Data pack could not be loaded.
  2  Invalid arguments or malformed input.
",
        version = env!("CARGO_PKG_VERSION"),
        data_env = DATA_DIR_ENV,
        default_dir = DEFAULT_DATA_DIR,
        budget = DEFAULT_BUDGET_SECS,
        limit = DEFAULT_LIMIT,
    )
}
