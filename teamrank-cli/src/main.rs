mod config;
mod output;
mod parse;

use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use teamrank_core::{RankingEngine, SkillFunction, SolverOptions};
use tracing_subscriber::EnvFilter;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "teamrank", version, about = "Rank teams from a CSV of match results")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Rate every team in a match-result CSV and write the ranking
    Rank(RankArgs),
    /// Create a default config file at ~/.config/teamrank/config.toml
    Init,
}

#[derive(Parser)]
struct RankArgs {
    /// CSV with one match per line: teamA,scoreA,scoreB,teamB[,YYYY-MM-DD]
    #[arg(long)]
    input: Option<PathBuf>,

    /// Where to write the rank,team,rating CSV
    #[arg(long)]
    output: Option<PathBuf>,

    /// Skill function: "plain", "weighted-goal-difference" or "win-bonus"
    #[arg(long)]
    skill: Option<String>,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,

    /// Log solver progress (debug level) to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (default: ~/.config/teamrank/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Upper bound on optimizer steps per match group
    #[arg(long)]
    max_iterations: Option<usize>,
}

/// RUST_LOG wins; otherwise `info`, or `debug` with --verbose.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank(args) => {
            init_logging(args.verbose);
            run_rank(args);
        }
        Commands::Init => {
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set your default input, output and skill function.");
        }
    }
}

fn run_rank(args: RankArgs) {
    // Load config file, merge with CLI args (CLI wins)
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    let input = args.input.or(cfg.input).unwrap_or_else(|| PathBuf::from(config::DEFAULT_INPUT));
    let output_path = args.output.or(cfg.output).unwrap_or_else(|| PathBuf::from(config::DEFAULT_OUTPUT));

    let skill: SkillFunction = match args.skill.or(cfg.skill) {
        Some(name) => name.parse().unwrap_or_else(|e| bail(e)),
        None => SkillFunction::default(),
    };

    let mut options = SolverOptions::default();
    if let Some(max_iterations) = args.max_iterations.or(cfg.max_iterations) {
        if max_iterations == 0 {
            bail("--max-iterations must be at least 1");
        }
        options.max_iterations = max_iterations;
    }

    tracing::info!(
        "Reading CSV {} and writing output to {}",
        input.display(),
        output_path.display()
    );

    let content = std::fs::read_to_string(&input)
        .unwrap_or_else(|e| bail(format!("Failed to read input file {}: {e}", input.display())));
    let matches = parse::parse_matches(&content, Local::now().date_naive());
    if matches.is_empty() {
        bail(format!("No valid match rows in {}", input.display()));
    }

    let mut engine = RankingEngine::new(skill, options);
    for m in matches {
        engine.add_match(m.date(), m.team_a(), m.team_b(), m.score_a(), m.score_b());
    }

    let standings = engine
        .standings()
        .unwrap_or_else(|e| bail(format!("Ranking failed: {e}")));
    let groups = engine
        .group_count()
        .unwrap_or_else(|e| bail(format!("Ranking failed: {e}")));

    tracing::info!(skill = %skill, "Ranking of {} teams complete", standings.len());

    output::write_csv(&output_path, &standings)
        .unwrap_or_else(|e| bail(format!("Failed to write {}: {e}", output_path.display())));

    if args.json {
        output::print_json(&standings, engine.match_count(), groups, skill.name());
    } else {
        output::print_table(&standings, engine.match_count(), groups);
    }
}
