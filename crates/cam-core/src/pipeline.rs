//! Scramble, learning, planning, and replay pipelines behind the CLI.

use std::path::PathBuf;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

use artifacts::{MacroLibrary, MacroSummary, PlanRecord, ScrambleSet};
use cube::CubeEnv;
use search::{MacroLearner, MacroSet, Planner, ProgressSink, StateSimulator};

use crate::config::{build_learner_config, build_planner_config, load_cam_toml, LearnerOverrides};

/// Arguments for the `scramble` subcommand.
#[derive(Debug)]
pub struct ScrambleArgs {
    /// Directory for the `start-NNN.txt` files.
    pub dir: PathBuf,
    /// Number of scenarios to write.
    pub count: usize,
    /// Actions per scramble.
    pub length: usize,
    /// Seed for the random generator.
    pub seed: u64,
}

/// Arguments for the `learn` subcommand.
#[derive(Debug)]
pub struct LearnArgs {
    pub config: PathBuf,
    pub scrambles: PathBuf,
    pub scenarios: usize,
    /// Scenario whose scrambled state is the learning base.
    pub index: usize,
    /// Path for the output macro library JSON.
    pub output: PathBuf,
    pub overrides: LearnerOverrides,
}

/// Arguments for the `plan` subcommand.
#[derive(Debug)]
pub struct PlanArgs {
    pub config: PathBuf,
    pub scrambles: PathBuf,
    pub scenarios: usize,
    pub index: usize,
    /// Macro library; primitives only when absent.
    pub macros: Option<PathBuf>,
    /// Path for the output plan JSON.
    pub output: PathBuf,
    pub budget: Option<u64>,
    pub max_rounds: Option<usize>,
}

/// Arguments for the `replay` subcommand.
#[derive(Debug)]
pub struct ReplayArgs {
    pub scrambles: PathBuf,
    pub scenarios: usize,
    pub index: usize,
    pub plan: PathBuf,
}

/// Arguments for the `summary` subcommand.
#[derive(Debug)]
pub struct SummaryArgs {
    /// Path to the macro library JSON.
    pub macros: PathBuf,
    /// Output as JSON instead of human-readable text.
    pub json: bool,
}

/// Forwards search progress to an `indicatif` bar.
struct BarSink {
    bar: ProgressBar,
}

impl BarSink {
    fn new(len: u64) -> anyhow::Result<Self> {
        let bar = ProgressBar::new(len);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
                .progress_chars("=> "),
        );
        Ok(Self { bar })
    }
}

impl ProgressSink for BarSink {
    fn evaluated(&self, count: u64) {
        self.bar.inc(count);
    }

    fn round(&self, progress: u32, max_progress: u32) {
        self.bar
            .set_message(format!("progress {progress}/{max_progress}"));
    }

    fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}

/// Generate a seeded scramble set.
pub fn run_scramble(args: ScrambleArgs) -> anyhow::Result<()> {
    let env = CubeEnv::new();
    let set = ScrambleSet::new(&args.dir).with_count(args.count);
    let paths = set.generate(&env, args.length, args.seed)?;

    println!("Wrote {} scrambles of length {}", paths.len(), args.length);
    println!("Directory: {}", args.dir.display());
    Ok(())
}

/// Learn macros around a scrambled state and write the library.
pub fn run_learn(args: LearnArgs) -> anyhow::Result<()> {
    let start = Instant::now();

    // 1. Load config
    let toml = load_cam_toml(&args.config)?;
    let config = build_learner_config(&toml.learner, args.overrides);

    // 2. Load the base scramble
    let mut env = CubeEnv::new();
    let set = ScrambleSet::new(&args.scrambles).with_count(args.scenarios);
    let base = set.load(&env, args.index)?;

    // 3. Learn with progress bar
    let sink = BarSink::new(config.budget)?;
    let learner = MacroLearner::new(config);
    let outcome = learner.run_with_progress(&mut env, &base, &sink)?;

    // 4. Write library
    let library = MacroLibrary::from_macros(&env, Some(args.index), &base, &outcome.macros);
    library.save(&args.output)?;

    // 5. Print summary
    let stats = &outcome.stats;
    println!("\n--- Learning Summary ---");
    println!("Scenario: {}", args.index);
    println!("Macros: {}", library.len());
    println!("Expansions: {}", stats.expansions);
    println!("Evaluations: {}", stats.evaluations);
    println!("Duplicates merged: {}", stats.duplicates_merged);
    println!(
        "Evictions: {} fringe, {} visited",
        stats.fringe_evictions, stats.visited_evictions
    );
    println!("Replays: {} resets, {} rewinds", stats.resets, stats.rewinds);
    println!("Peak fringe: {}", stats.peak_fringe);
    if let Some(discarded) = stats.best_discarded {
        println!("Best discarded effect: {discarded}");
    }
    println!("Output: {}", args.output.display());
    println!("Elapsed: {:.1}s", start.elapsed().as_secs_f64());

    Ok(())
}

/// Plan from a scrambled state, optionally with learned macros.
pub fn run_plan(args: PlanArgs) -> anyhow::Result<()> {
    let start = Instant::now();

    // 1. Load config
    let toml = load_cam_toml(&args.config)?;
    let config = build_planner_config(&toml.planner, args.budget, args.max_rounds);

    // 2. Load scramble and macros
    let mut env = CubeEnv::new();
    let set = ScrambleSet::new(&args.scrambles).with_count(args.scenarios);
    let scramble = set.load(&env, args.index)?;
    let macros = match &args.macros {
        Some(path) => MacroLibrary::load(path)?.to_macro_set(&env)?,
        None => MacroSet::new(),
    };
    tracing::info!(
        index = args.index,
        scramble_len = scramble.len(),
        macros = macros.len(),
        "Loaded planning inputs"
    );

    // 3. Plan with progress bar
    let per_round = env.num_actions() + macros.len();
    let rounds = config.rounds(per_round);
    let sink = BarSink::new(rounds.saturating_mul(per_round) as u64)?;
    let planner = Planner::new(config);
    let result = planner.run_with_progress(&mut env, &scramble, &macros, &sink)?;

    // 4. Write plan
    let record = PlanRecord::from_result(&env, args.index, &scramble, macros.len(), &result);
    record.save(&args.output)?;

    // 5. Print summary
    println!("\n--- Planning Summary ---");
    println!("Scenario: {}", args.index);
    println!("Result: {}", result.termination);
    println!("Steps: {}", result.actions.len());
    println!("Rounds: {}", result.rounds);
    println!(
        "Committed: {} primitives, {} macros",
        result.stats.primitive_steps, result.stats.macro_steps
    );
    println!("Evaluations: {}", result.stats.evaluations);
    println!("Duplicates skipped: {}", result.stats.duplicates_skipped);
    if let Some(last) = result.distances.last() {
        println!("Final distance: {last}/{}", result.max_distance);
    }
    println!("Output: {}", args.output.display());
    println!("Elapsed: {:.1}s", start.elapsed().as_secs_f64());

    Ok(())
}

/// Render a saved plan applied to its scramble.
pub fn run_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let mut env = CubeEnv::new();
    let set = ScrambleSet::new(&args.scrambles).with_count(args.scenarios);
    let scramble = set.load(&env, args.index)?;
    let record = PlanRecord::load(&args.plan)?;

    if record.scramble_index != args.index || record.scramble_actions(&env)? != scramble {
        tracing::warn!(
            record_index = record.scramble_index,
            index = args.index,
            "Plan was recorded for a different scramble"
        );
    }
    let plan = record.plan_actions(&env)?;

    env.reset(&scramble);
    println!("--- Scramble {} ({} moves) ---", args.index, scramble.len());
    println!("{}", StateSimulator::format_sequence(&env, &scramble));
    println!("{}", env.render());

    for &action in &plan {
        env.step(action);
    }
    println!("--- After plan ({} moves) ---", plan.len());
    println!("{}", StateSimulator::format_sequence(&env, &plan));
    println!("{}", env.render());

    if env.is_solved() {
        println!("Solved");
    } else {
        let distance = StateSimulator::diff(&env, None);
        println!("Unsolved (distance {distance}/{})", env.max_diff());
    }
    if env.is_solved() != record.solved {
        tracing::warn!(recorded = record.solved, "Replay disagrees with the recorded outcome");
    }

    Ok(())
}

/// Print statistics of a macro library.
pub fn run_summary(args: SummaryArgs) -> anyhow::Result<()> {
    let library = MacroLibrary::load(&args.macros)?;
    let summary = MacroSummary::from_library(&library);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("--- Macro Library Summary ---");
    println!("File: {}", args.macros.display());
    if let Some(index) = library.source_index {
        println!("Source scenario: {index}");
    }
    println!("Base: {} moves", library.base.len());
    println!("{summary}");

    Ok(())
}
