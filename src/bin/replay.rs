// Offline replay of a decision log.
//
// Re-evaluates logged turns with the current code and config and reports
// where the answers diverge from what was played:
//
//   replay decisions.jsonl --all
//   replay decisions.jsonl --turns 41,42 --verbose
//   SNAKE_PROFILE=1 replay decisions.jsonl --all

use std::env;
use std::process;
use std::time::Instant;

use gradient_snake::config::Config;
use gradient_snake::profile;
use gradient_snake::replay::ReplayEngine;

struct Options {
    log_file: String,
    config_path: String,
    verbose: bool,
    /// None replays everything; otherwise the listed turns, in order.
    turns: Option<Vec<i32>>,
}

const USAGE: &str = "\
Decision log replay tool

USAGE:
  replay <log_file> (--all | --turns <T1,T2,...>) [OPTIONS]

OPTIONS:
  --verbose          Log every replayed turn, not just the summary
  --config <path>    Path to Snake.toml (default: Snake.toml)
  --help             Show this help message

Set SNAKE_PROFILE=1 for per-stage timings after the run.";

fn parse_options(args: &[String]) -> Result<Options, String> {
    if args.is_empty() {
        return Err("missing log file argument".to_string());
    }

    let mut options = Options {
        log_file: args[0].clone(),
        config_path: "Snake.toml".to_string(),
        verbose: false,
        turns: None,
    };
    let mut mode_chosen = false;

    let mut rest = args[1..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--all" => mode_chosen = true,
            "--turns" => {
                let list = rest.next().ok_or("--turns requires an argument")?;
                let turns = list
                    .split(',')
                    .map(|t| {
                        t.trim()
                            .parse::<i32>()
                            .map_err(|e| format!("invalid turn number '{}': {}", t, e))
                    })
                    .collect::<Result<Vec<i32>, String>>()?;
                options.turns = Some(turns);
                mode_chosen = true;
            }
            "--config" => {
                options.config_path = rest.next().ok_or("--config requires an argument")?.clone();
            }
            "--verbose" => options.verbose = true,
            other => return Err(format!("unknown option '{}'", other)),
        }
    }

    if !mode_chosen {
        return Err("must specify --all or --turns".to_string());
    }
    Ok(options)
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help") {
        println!("{}", USAGE);
        return;
    }

    let options = match parse_options(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            process::exit(1);
        }
    };

    let config = Config::from_file(&options.config_path).unwrap_or_else(|e| {
        eprintln!(
            "Warning: could not load '{}' ({}), using built-in defaults",
            options.config_path, e
        );
        Config::default_hardcoded()
    });

    let engine = ReplayEngine::new(config, options.verbose);
    let entries = match engine.load_log_file(&options.log_file) {
        Ok(entries) if entries.is_empty() => {
            eprintln!("Error: log file '{}' is empty", options.log_file);
            process::exit(1);
        }
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    println!("Loaded {} decision records from {}", entries.len(), options.log_file);

    let started = Instant::now();
    let outcome = match &options.turns {
        Some(turns) => engine.replay_turns(&entries, turns),
        None => engine.replay_all(&entries),
    };

    match outcome {
        Ok(results) => engine.print_report(&results),
        Err(e) => {
            eprintln!("Error during replay: {}", e);
            process::exit(1);
        }
    }

    if profile::is_profiling_enabled() {
        profile::merge_thread_local();
        profile::print_report(started.elapsed().as_millis() as u64);
    }
}
