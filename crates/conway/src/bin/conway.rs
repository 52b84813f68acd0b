//! # Conway
//!
//! Runs a Game of Life session in the terminal.
//!
//! ## Usage
//!
//! ```bash
//! conway --config crates/conway/data/conway.toml --mode spaceships --run
//! ```
//!
//! Input is line-buffered: type keys and press enter. `:resize W H` resizes
//! the grid and `:quit` (or end of input) leaves.

use std::io::{self, BufRead};
use std::process;
use std::thread;

use std::str::FromStr;

use conway::core::{GridSeed, PatternLibrary, Rule, SeedMode, SimulationConfig};
use conway::{InputEvent, InputQueue, Session, TextRenderer};

/// Command line overrides applied on top of the config file.
#[derive(Default)]
struct Overrides {
    config: Option<String>,
    patterns: Option<String>,
    width: Option<usize>,
    height: Option<usize>,
    seed: Option<u64>,
    mode: Option<SeedMode>,
    rule: Option<String>,
    interval_ms: Option<u64>,
    run: bool,
    no_colors: bool,
    help: bool,
}

fn print_help() {
    println!("Usage: conway [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>        TOML config file");
    println!("  -p, --patterns <PATH>      TOML pattern library");
    println!("  -W, --width <CELLS>        Grid width");
    println!("  -H, --height <CELLS>       Grid height");
    println!("  -s, --seed <N>             Fixed random seed");
    println!("  -m, --mode <MODE>          Seed mode, see below");
    println!("  -r, --rule <RULE>          B/S notation (e.g. B36/S23) or a rule title");
    println!("  -i, --interval <MS>        Tick interval in milliseconds");
    println!("      --run                  Start running instead of paused");
    println!("      --no-colors            Disable age colors");
    println!("  -h, --help                 Show this help");
    println!();
    println!("Modes: random, still_life, oscillators, spaceships, gospers_guns");
    println!();
    println!("Rules:");
    for (title, rule) in Rule::named() {
        println!("  {title:<24} {rule}");
    }
    println!();
    println!("Keys: space pause/resume, r reseed, 1-4 presets, c colors, +/- speed, q quit");
}

fn fail(message: &str) -> ! {
    eprintln!("conway: {message}");
    process::exit(1);
}

fn parse_number<T: FromStr>(flag: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("invalid value {value:?} for {flag}"))
}

/// Parses the arguments after the program name.
fn parse_args(args: &[String]) -> Result<Overrides, String> {
    let mut overrides = Overrides::default();

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args.get(i + 1).map(String::as_str);
        let mut takes_value = true;
        match (flag, value) {
            ("--config" | "-c", Some(v)) => overrides.config = Some(v.to_string()),
            ("--patterns" | "-p", Some(v)) => overrides.patterns = Some(v.to_string()),
            ("--width" | "-W", Some(v)) => overrides.width = Some(parse_number(flag, v)?),
            ("--height" | "-H", Some(v)) => overrides.height = Some(parse_number(flag, v)?),
            ("--seed" | "-s", Some(v)) => overrides.seed = Some(parse_number(flag, v)?),
            ("--interval" | "-i", Some(v)) => overrides.interval_ms = Some(parse_number(flag, v)?),
            ("--rule" | "-r", Some(v)) => {
                let rule = Rule::from_title(v).map_or_else(|| v.to_string(), |r| r.to_string());
                overrides.rule = Some(rule);
            }
            ("--mode" | "-m", Some(v)) => match SeedMode::from_category(v) {
                Some(mode) => overrides.mode = Some(mode),
                None => return Err(format!("unknown seed mode {v:?}")),
            },
            ("--run", _) => {
                overrides.run = true;
                takes_value = false;
            }
            ("--no-colors", _) => {
                overrides.no_colors = true;
                takes_value = false;
            }
            ("--help" | "-h", _) => {
                overrides.help = true;
                takes_value = false;
            }
            (flag, None) if flag.starts_with('-') => return Err(format!("{flag} needs a value")),
            (other, _) => return Err(format!("unknown argument {other:?}")),
        }
        i += if takes_value { 2 } else { 1 };
    }

    Ok(overrides)
}

fn build_config(overrides: &Overrides) -> SimulationConfig {
    let mut config = match &overrides.config {
        Some(path) => SimulationConfig::load(path).unwrap_or_else(|e| fail(&e.to_string())),
        None => SimulationConfig::default(),
    };

    if let Some(width) = overrides.width {
        config.width = width;
    }
    if let Some(height) = overrides.height {
        config.height = height;
    }
    if let Some(seed) = overrides.seed {
        config.seed = Some(seed);
    }
    if let Some(mode) = overrides.mode {
        config.seed_mode = mode;
    }
    if let Some(rule) = &overrides.rule {
        config.rule.clone_from(rule);
    }
    if let Some(interval_ms) = overrides.interval_ms {
        config.tick_interval_ms = interval_ms;
    }
    if let Some(patterns) = &overrides.patterns {
        config.patterns = Some(patterns.clone());
    }
    config.start_running |= overrides.run;
    config.colors &= !overrides.no_colors;

    // Pin the seed so the banner shows the one actually used.
    if config.seed.is_none() {
        config.seed = Some(GridSeed::from_clock().value());
    }

    if let Err(e) = config.validate() {
        fail(&e.to_string());
    }
    config
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let overrides = parse_args(&args).unwrap_or_else(|e| fail(&e));
    if overrides.help {
        print_help();
        return;
    }
    let config = build_config(&overrides);

    let library = match &config.patterns {
        Some(path) => PatternLibrary::load(path).unwrap_or_else(|e| fail(&e.to_string())),
        None => PatternLibrary::new(),
    };
    if config.seed_mode != SeedMode::Random && library.patterns(config.seed_mode).is_empty() {
        eprintln!(
            "conway: no {} patterns loaded, the grid starts empty",
            config.seed_mode.category()
        );
    }

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         CONWAY'S GAME OF LIFE                                    ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!("  Grid:      {}x{}", config.width, config.height);
    println!("  Rule:      {}", config.rule);
    println!(
        "  Seed:      {:#x} ({})",
        config.seed.unwrap_or_default(),
        config.seed_mode.category()
    );
    println!("  Interval:  {} ms", config.tick_interval_ms);
    println!("  Patterns:  {}", library.len());
    println!();

    let renderer = TextRenderer::terminal(Box::new(io::stdout()) as Box<dyn io::Write + Send>);
    let session = Session::new(&config, library, renderer).unwrap_or_else(|e| fail(&e.to_string()));

    let queue = InputQueue::default();
    let sender = queue.sender();
    let receiver = queue.receiver();
    drop(queue);

    // The reader blocks on stdin and is abandoned at exit.
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            for event in InputEvent::parse_line(&line) {
                if !sender.send_blocking(event) {
                    return;
                }
            }
        }
        sender.send_blocking(InputEvent::Quit);
    });

    session.run(&receiver);

    println!();
    println!(
        "Stopped at generation {} with {} living cells.",
        session.grid().turns(),
        session.grid().population()
    );
}
