mod config;
mod pipeline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use artifacts::DEFAULT_SCENARIOS;
use config::LearnerOverrides;
use pipeline::{LearnArgs, PlanArgs, ReplayArgs, ScrambleArgs, SummaryArgs};

/// cam: macro learning and greedy planning on the 3x3x3 cube.
#[derive(Parser)]
#[command(name = "cam", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// CLI subcommands for scramble generation, learning, planning, and inspection.
#[derive(Subcommand)]
enum Command {
    /// Generate a seeded set of `start-NNN.txt` scramble files.
    Scramble {
        /// Output directory.
        #[arg(long, default_value = "scrambles")]
        dir: PathBuf,
        /// Number of scenarios.
        #[arg(long, default_value_t = DEFAULT_SCENARIOS)]
        count: usize,
        /// Actions per scramble.
        #[arg(long, default_value_t = 60)]
        length: usize,
        /// Random seed.
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Learn macros around a scrambled state.
    Learn {
        /// Path to cam config TOML file.
        #[arg(long, default_value = "configs/cam.toml")]
        config: PathBuf,
        /// Directory of scramble files.
        #[arg(long, default_value = "scrambles")]
        scrambles: PathBuf,
        /// Number of scenarios in the scramble set.
        #[arg(long, default_value_t = DEFAULT_SCENARIOS)]
        scenarios: usize,
        /// Scenario index.
        #[arg(long)]
        index: usize,
        /// Path for the output macro library JSON.
        #[arg(long)]
        output: PathBuf,
        /// Override the exploration budget.
        #[arg(long)]
        budget: Option<u64>,
        /// Override the number of retained candidates.
        #[arg(long)]
        max_macros: Option<usize>,
        /// Override the reduction factor.
        #[arg(long)]
        reduction: Option<usize>,
        /// Override the fringe ceiling multiple.
        #[arg(long)]
        fringe_factor: Option<usize>,
        /// Learn with no fringe ceiling.
        #[arg(long)]
        unbounded_fringe: bool,
    },
    /// Plan from a scrambled state towards the goal.
    Plan {
        /// Path to cam config TOML file.
        #[arg(long, default_value = "configs/cam.toml")]
        config: PathBuf,
        /// Directory of scramble files.
        #[arg(long, default_value = "scrambles")]
        scrambles: PathBuf,
        /// Number of scenarios in the scramble set.
        #[arg(long, default_value_t = DEFAULT_SCENARIOS)]
        scenarios: usize,
        /// Scenario index.
        #[arg(long)]
        index: usize,
        /// Macro library JSON. Plans with primitives only when omitted.
        #[arg(long)]
        macros: Option<PathBuf>,
        /// Path for the output plan JSON.
        #[arg(long)]
        output: PathBuf,
        /// Override the evaluation budget.
        #[arg(long)]
        budget: Option<u64>,
        /// Override the round cap.
        #[arg(long)]
        max_rounds: Option<usize>,
    },
    /// Render a saved plan applied to its scramble.
    Replay {
        /// Directory of scramble files.
        #[arg(long, default_value = "scrambles")]
        scrambles: PathBuf,
        /// Number of scenarios in the scramble set.
        #[arg(long, default_value_t = DEFAULT_SCENARIOS)]
        scenarios: usize,
        /// Scenario index.
        #[arg(long)]
        index: usize,
        /// Plan JSON written by `plan`.
        #[arg(long)]
        plan: PathBuf,
    },
    /// Print statistics of a macro library.
    Summary {
        /// Path to the macro library JSON.
        #[arg(long)]
        macros: PathBuf,
        /// Output as JSON instead of human-readable text.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Scramble {
            dir,
            count,
            length,
            seed,
        } => pipeline::run_scramble(ScrambleArgs {
            dir,
            count,
            length,
            seed,
        }),
        Command::Learn {
            config,
            scrambles,
            scenarios,
            index,
            output,
            budget,
            max_macros,
            reduction,
            fringe_factor,
            unbounded_fringe,
        } => pipeline::run_learn(LearnArgs {
            config,
            scrambles,
            scenarios,
            index,
            output,
            overrides: LearnerOverrides {
                budget,
                max_macros,
                reduction,
                fringe_factor,
                unbounded_fringe,
            },
        }),
        Command::Plan {
            config,
            scrambles,
            scenarios,
            index,
            macros,
            output,
            budget,
            max_rounds,
        } => pipeline::run_plan(PlanArgs {
            config,
            scrambles,
            scenarios,
            index,
            macros,
            output,
            budget,
            max_rounds,
        }),
        Command::Replay {
            scrambles,
            scenarios,
            index,
            plan,
        } => pipeline::run_replay(ReplayArgs {
            scrambles,
            scenarios,
            index,
            plan,
        }),
        Command::Summary { macros, json } => pipeline::run_summary(SummaryArgs { macros, json }),
    }
}
