//! EOD Signal CLI — compute daily signal records and resolve trade dates.
//!
//! Commands:
//! - `compute`: run one pass over a bar history CSV for a target date
//! - `resolve-date`: print the trade date a run at a given time would use

mod io;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use eodsignal_core::calendar::{RunGate, TradeDateResolver, WeekdayCalendar};
use eodsignal_core::engine::{chunk_by_instrument, run_chunks, PassStats, TracingObserver};
use eodsignal_core::fingerprint::records_digest;
use eodsignal_core::sink::{MemorySink, RecordSink};
use eodsignal_core::{SignalCalculator, SignalConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "eodsignal",
    about = "EOD Signal: daily indicators, patterns and decisions from end-of-day bars"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute one record per instrument for the target date.
    Compute {
        /// Bar history CSV.
        #[arg(long)]
        bars: PathBuf,

        /// Target date (YYYY-MM-DD). Defaults to the latest final session.
        #[arg(long)]
        date: Option<String>,

        /// Previously written records CSV, used for signal continuity.
        #[arg(long)]
        prev: Option<PathBuf>,

        /// TOML config with threshold overrides.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output CSV. Defaults to stdout.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Instruments per parallel chunk.
        #[arg(long, default_value_t = 200)]
        chunk_size: usize,

        /// File of exchange holidays, one YYYY-MM-DD per line.
        #[arg(long)]
        holidays: Option<PathBuf>,
    },
    /// Print the trade date a run would compute.
    ResolveDate {
        /// Explicit date (YYYY-MM-DD), returned as-is.
        #[arg(long)]
        date: Option<String>,

        /// Local time to resolve at ("YYYY-MM-DD HH:MM"). Defaults to now.
        #[arg(long)]
        at: Option<String>,

        /// TOML config (for the cutoff time).
        #[arg(long)]
        config: Option<PathBuf>,

        /// File of exchange holidays, one YYYY-MM-DD per line.
        #[arg(long)]
        holidays: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eodsignal_cli=info,eodsignal_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compute {
            bars,
            date,
            prev,
            config,
            out,
            chunk_size,
            holidays,
        } => run_compute(ComputeArgs {
            bars,
            date,
            prev,
            config,
            out,
            chunk_size,
            holidays,
        }),
        Commands::ResolveDate {
            date,
            at,
            config,
            holidays,
        } => run_resolve_date(date, at, config, holidays),
    }
}

struct ComputeArgs {
    bars: PathBuf,
    date: Option<String>,
    prev: Option<PathBuf>,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    chunk_size: usize,
    holidays: Option<PathBuf>,
}

fn run_compute(args: ComputeArgs) -> Result<()> {
    if args.chunk_size == 0 {
        bail!("--chunk-size must be at least 1");
    }
    let config = load_config(args.config.as_deref())?;
    let resolver = build_resolver(&config, args.holidays.as_deref())?;

    let target = match resolver.gate(args.date.as_deref(), Local::now().naive_local())? {
        RunGate::Compute(date) => date,
        RunGate::Skip { date, reason } => {
            eprintln!("Skipping {date}: {reason:?}");
            return Ok(());
        }
    };
    let window_start = resolver.window_start(target, &config.window)?;
    tracing::info!(
        %target,
        %window_start,
        config = %config.fingerprint(),
        "computing signals"
    );

    let bars: Vec<_> = io::read_bars(&args.bars)?
        .into_iter()
        .filter(|b| b.trade_date >= window_start && b.trade_date <= target)
        .collect();
    if bars.is_empty() {
        tracing::warn!(%target, "no bars inside the lookback window");
    }

    let mut sink = MemorySink::new();
    if let Some(prev_path) = &args.prev {
        sink.upsert_all(io::read_records(prev_path)?)?;
    }
    let prev = sink.snapshots_before(target);

    let calc = SignalCalculator::new(config, target);
    let chunks = chunk_by_instrument(bars, args.chunk_size);
    let output = run_chunks(&calc, chunks, &prev, |_| TracingObserver);

    let digest = records_digest(&output.records);
    sink.upsert_all(output.records)?;

    let written = match &args.out {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            io::write_records(file, sink.records())?
        }
        None => io::write_records(std::io::stdout().lock(), sink.records())?,
    };

    print_summary(target, &output.stats, &digest, written);
    Ok(())
}

fn run_resolve_date(
    date: Option<String>,
    at: Option<String>,
    config: Option<PathBuf>,
    holidays: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let resolver = build_resolver(&config, holidays.as_deref())?;
    let now = match at.as_deref() {
        Some(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
            .with_context(|| format!("invalid --at {s:?}, expected \"YYYY-MM-DD HH:MM\""))?,
        None => Local::now().naive_local(),
    };
    match resolver.gate(date.as_deref(), now)? {
        RunGate::Compute(date) => println!("{date}"),
        RunGate::Skip { date, reason } => println!("{date} (skip: {reason:?})"),
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SignalConfig> {
    match path {
        Some(path) => SignalConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(SignalConfig::default()),
    }
}

fn build_resolver(
    config: &SignalConfig,
    holidays: Option<&Path>,
) -> Result<TradeDateResolver<WeekdayCalendar>> {
    let calendar = match holidays {
        Some(path) => WeekdayCalendar::with_holidays(io::read_holidays(path)?),
        None => WeekdayCalendar::new(),
    };
    Ok(TradeDateResolver::new(config.cutoff, calendar))
}

fn print_summary(target: chrono::NaiveDate, stats: &PassStats, digest: &str, written: usize) {
    eprintln!();
    eprintln!("=== Signal Pass ===");
    eprintln!("Target date:    {target}");
    eprintln!("Bars read:      {}", stats.bars_seen);
    eprintln!("Instruments:    {}", stats.instruments_seen);
    eprintln!("Emitted:        {}", stats.emitted);
    eprintln!("Invalid bars:   {}", stats.skipped_invalid);
    eprintln!("Corp. actions:  {}", stats.corporate_actions);
    eprintln!("Short windows:  {}", stats.insufficient_windows);
    if stats.duplicates > 0 {
        eprintln!("Duplicates:     {}", stats.duplicates);
    }
    eprintln!("Rows written:   {written}");
    eprintln!("Digest:         {digest}");
    for id in &stats.invalid_instruments {
        eprintln!("WARNING: invalid target-date bar for {id}");
    }
    eprintln!();
}
