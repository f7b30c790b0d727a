//! Headless runner: loads a scenario, runs it and writes the transcript
//!
//! Exit status is 0 when every objective is reached, 2 when the run stops at
//! an unreachable objective and 1 on input errors.

use clap::Parser;
use fogwalk::loader::load_scenario;
use fogwalk::{Config, EventLog, Navigator, RunOutcome, TranscriptWriter};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "navigate", about = "Run a fog-of-war navigation scenario")]
struct Args {
    /// Land description: dimensions, then one `x y type` line per cell
    land: PathBuf,
    /// Edge records: `x1-y1,x2-y2 weight`
    edges: PathBuf,
    /// Radius, start position and objectives
    objectives: PathBuf,
    /// Transcript destination; stdout when omitted
    output: Option<PathBuf>,
    /// Configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
    /// Also save the events as JSON to this path
    #[arg(long)]
    event_log: Option<PathBuf>,
    /// Print a run summary to stderr
    #[arg(long)]
    summary: bool,
}

fn run(args: &Args) -> fogwalk::Result<RunOutcome> {
    let config = Config::load_from(&args.config);
    let scenario = load_scenario(&args.land, &args.edges, &args.objectives)?;

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    let mut sinks = (EventLog::new(), TranscriptWriter::new(out));

    let report = Navigator::new(scenario, &config.simulation).run(&mut sinks);
    let (log, transcript) = sinks;
    transcript.finish()?;

    let log_path = args.event_log.clone().or_else(|| {
        config
            .logging
            .enable_event_log
            .then(|| PathBuf::from(&config.logging.event_log_path))
    });
    if let Some(path) = log_path {
        log.save_to_file(&path)?;
        info!("Event log saved to {}", path.display());
    }
    if args.summary {
        eprintln!("{}", log.summary());
    }

    Ok(report.outcome)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fogwalk=info,navigate=info")),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(RunOutcome::Completed { objectives }) => {
            info!("All {} objectives reached", objectives);
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Aborted { objective }) => {
            info!("Run stopped at unreachable objective {}", objective);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
