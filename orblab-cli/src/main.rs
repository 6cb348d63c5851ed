//! OrbLab CLI — daily signal run, inspection, and export commands.
//!
//! Commands:
//! - `run` — execute the full pipeline for a session date
//! - `show` — print stored predictions and outcomes for a date
//! - `stats` — print the per-symbol rolling statistics table
//! - `export` — write a date's predictions as CSV and JSON

use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use orblab_core::data::{SyntheticProvider, YahooProvider};
use orblab_core::store::{SignalStore, SqliteStore};
use orblab_runner::{run_for_date, save_artifacts, RunConfig, RunReport};

#[derive(Parser)]
#[command(
    name = "orblab",
    about = "OrbLab CLI — intraday opening-range breakout signals"
)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute the full pipeline for a session date.
    Run {
        /// Session date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Use the deterministic synthetic provider instead of Yahoo.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Seed for the synthetic provider.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Print stored predictions and outcomes for a date.
    Show {
        /// Session date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// Print the per-symbol rolling statistics table.
    Stats,
    /// Write a date's predictions as CSV and JSON.
    Export {
        /// Session date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Output directory for the artifacts.
        #[arg(long, default_value = "results")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            date,
            synthetic,
            seed,
        } => cmd_run(&config, date.as_deref(), synthetic, seed),
        Commands::Show { date } => cmd_show(&config, date.as_deref()),
        Commands::Stats => cmd_stats(&config),
        Commands::Export { date, out } => cmd_export(&config, date.as_deref(), &out),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<RunConfig> {
    match path {
        Some(p) => RunConfig::from_file(p).with_context(|| format!("load {}", p.display())),
        None => Ok(RunConfig::default()),
    }
}

fn parse_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn open_store(config: &RunConfig) -> Result<SqliteStore> {
    SqliteStore::open(&config.store.db_path)
        .with_context(|| format!("open store {}", config.store.db_path.display()))
}

fn cmd_run(config: &RunConfig, date: Option<&str>, synthetic: bool, seed: u64) -> Result<()> {
    let date = parse_date(date)?;
    let universe = config.universe.resolve()?;
    let store = open_store(config)?;

    let report = if synthetic {
        let provider = SyntheticProvider::new(config.session, seed);
        run_for_date(date, &provider, &store, config, &universe)?
    } else {
        let tz: Tz = config
            .data
            .timezone
            .parse()
            .map_err(|e: chrono_tz::ParseError| anyhow::anyhow!("invalid timezone: {e}"))?;
        let provider = YahooProvider::new(tz, config.session);
        run_for_date(date, &provider, &store, config, &universe)?
    };

    print_summary(&report);
    Ok(())
}

fn cmd_show(config: &RunConfig, date: Option<&str>) -> Result<()> {
    let date = parse_date(date)?;
    let store = open_store(config)?;
    let records = store.predictions_for_date(date)?;

    if records.is_empty() {
        println!("No predictions stored for {date}.");
        return Ok(());
    }

    println!(
        "{:<14} {:<6} {:>8} {:>8} {:>8} {:>6} {:>6} {:<10} {:>10}",
        "Symbol", "Action", "Entry", "Target", "Stop", "Time", "Qty", "Outcome", "PnL"
    );
    println!("{}", "-".repeat(84));
    for record in &records {
        let p = &record.prediction;
        let (outcome, pnl) = match &record.outcome {
            Some(o) => (o.kind.to_string(), format!("{:.2}", o.pnl)),
            None => ("-".into(), "-".into()),
        };
        println!(
            "{:<14} {:<6} {:>8.2} {:>8.2} {:>8.2} {:>6} {:>6} {:<10} {:>10}",
            p.symbol,
            p.action.to_string(),
            p.entry_price,
            p.target_price,
            p.stop_loss,
            p.signal_time.format("%H:%M").to_string(),
            p.suggested_qty,
            outcome,
            pnl,
        );
    }
    println!();
    println!("{} prediction(s) for {date}.", records.len());
    Ok(())
}

fn cmd_stats(config: &RunConfig) -> Result<()> {
    let store = open_store(config)?;
    let stats = store.symbol_stats()?;

    if stats.is_empty() {
        println!("No statistics recorded yet.");
        return Ok(());
    }

    let mut rows: Vec<_> = stats.into_values().collect();
    rows.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    println!(
        "{:<14} {:>7} {:>6} {:>7} {:>9}",
        "Symbol", "Trades", "Wins", "Losses", "Win Rate"
    );
    println!("{}", "-".repeat(46));
    for s in &rows {
        println!(
            "{:<14} {:>7} {:>6} {:>7} {:>8.1}%",
            s.symbol,
            s.trades,
            s.wins,
            s.losses,
            s.win_rate() * 100.0
        );
    }
    Ok(())
}

fn cmd_export(config: &RunConfig, date: Option<&str>, out: &std::path::Path) -> Result<()> {
    let date = parse_date(date)?;
    let store = open_store(config)?;
    let records = store.predictions_for_date(date)?;

    if records.is_empty() {
        println!("No predictions stored for {date}, nothing to export.");
        return Ok(());
    }

    let paths = save_artifacts(out, date, &records)?;
    println!("Exported {} record(s):", records.len());
    println!("  {}", paths.csv.display());
    println!("  {}", paths.json.display());
    Ok(())
}

fn print_summary(report: &RunReport) {
    println!();
    println!("=== Daily Run ===");
    println!("Date:        {}", report.date);
    println!("Bias:        {}", report.bias);
    println!("Predictions: {}", report.prediction_count);

    for record in &report.predictions {
        let p = &record.prediction;
        println!(
            "  {} {} @ {:.2} (target {:.2}, stop {:.2}, qty {}) at {}",
            p.action,
            p.symbol,
            p.entry_price,
            p.target_price,
            p.stop_loss,
            p.suggested_qty,
            p.signal_time.format("%H:%M"),
        );
        if let Some(o) = &record.outcome {
            println!("    -> {} pnl {:.2} ({:.2}R)", o.kind, o.pnl, o.r_multiple);
        }
    }

    if !report.skips.is_empty() {
        println!();
        println!("Skips:");
        for skip in &report.skips {
            println!("  {} [{}]: {}", skip.symbol, skip.stage, skip.reason);
        }
    }
    println!();
}
