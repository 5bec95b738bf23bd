mod report;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stderr, stdout};
use std::path::{Path, PathBuf};

use montyhall_engine::{ProgressEvent, SimulationEngine, SimulationResult, SimulatorConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary
    Console,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "montyhall", version)]
#[command(about = "A simulator for the two main strategies in the Monty Hall problem")]
struct Args {
    /// Number of games to simulate. Zero or less uses the default (100000);
    /// values above the maximum are clamped
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    trials: i64,

    /// Worker threads to use. Zero or less uses the default (1); capped at
    /// three quarters of the logical cores
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    threads: i64,

    /// JSON file overriding simulator defaults and limits
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fixed base seed for the worker generators
    #[arg(long)]
    seed: Option<u64>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Print a line after every completed chunk
    #[arg(long)]
    progress: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_deref(), args.seed)?;
    let (trials, threads) = coerce_counts(args.trials, args.threads);

    if args.report == ReportFormat::Console {
        report::write_banner(&mut stdout())?;
    }

    let result = run_simulation(&args, config, trials, threads)?;
    write_report(&args, &result)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<SimulatorConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            SimulatorConfig::from_json_str(&text)
                .with_context(|| format!("invalid config in {}", path.display()))?
        }
        None => SimulatorConfig::default(),
    };
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

/// Non-positive counts become zero, which the engine replaces by its defaults.
fn coerce_counts(trials: i64, threads: i64) -> (u64, usize) {
    (
        u64::try_from(trials).unwrap_or(0),
        usize::try_from(threads).unwrap_or(0),
    )
}

fn run_simulation(
    args: &Args,
    config: SimulatorConfig,
    trials: u64,
    threads: usize,
) -> Result<SimulationResult> {
    let show_progress = args.progress && args.report == ReportFormat::Console;
    let request = config.resolve(trials, threads);

    if args.report == ReportFormat::Console {
        println!();
        println!(
            "Running simulation with {} game{} on {} thread{}... ",
            report::group_thousands(request.total_trials),
            plural(request.total_trials),
            request.thread_count,
            plural(request.thread_count as u64)
        );
    }

    let mut engine = SimulationEngine::new(config).context("simulator configuration rejected")?;
    if show_progress {
        engine.on_progress(|event: ProgressEvent| {
            if let Err(err) = report::write_progress(&mut stderr(), &event) {
                log::warn!("could not write progress: {err}");
            }
        });
    }
    let result = engine.run_request(request).context("simulation aborted")?;

    if args.report == ReportFormat::Console {
        println!("{}", "complete.".green());
    }
    Ok(result)
}

const fn plural(count: u64) -> &'static str {
    if count == 1 { "" } else { "s" }
}

fn render_report(
    format: ReportFormat,
    out: &mut dyn Write,
    result: &SimulationResult,
) -> Result<()> {
    match format {
        ReportFormat::Console => report::generate_console_report(out, result),
        ReportFormat::Json => report::generate_json_report(out, result),
    }
}

fn write_report(args: &Args, result: &SimulationResult) -> Result<()> {
    let mut out = open_output(args.output.as_deref())?;
    render_report(args.report, &mut out, result)?;
    out.flush()?;
    Ok(())
}

/// Buffered writer over `path`, or stdout when no path is given.
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(stdout()))),
    }
}
