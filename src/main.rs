//! TVI command line
//!
//! Scores recorded transport sessions and inspects stored results.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tvi_engine::{
    audit::create_shared_log_with_persistence, Config, HistoricalScores, HistorySummary,
    JsonFileStore, RawReading, SessionRecorder, TviEngine, VERSION,
};

#[derive(Parser)]
#[command(name = "tvi")]
#[command(version = VERSION)]
#[command(about = "Transport Vibration Index scoring for neonatal transport", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a capture file as a session
    Import {
        /// JSON capture file with device id and readings
        file: PathBuf,
    },

    /// Score a stored session
    Score {
        session_id: String,

        /// Do not persist the result
        #[arg(long)]
        no_save: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored results
    History {
        /// Only results for this transport unit
        #[arg(long)]
        unit: Option<String>,

        /// Number of most recent results to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show analysis statistics
    Stats {
        /// Zero the stored counters
        #[arg(long)]
        reset: bool,
    },

    /// Show configuration
    Config {
        /// Write the default configuration to the config file
        #[arg(long)]
        reset: bool,
    },
}

/// Capture file written by a recording device.
#[derive(Deserialize)]
struct CaptureFile {
    #[serde(default)]
    session_id: Option<String>,
    device_id: String,
    #[serde(default)]
    unit_id: Option<String>,
    readings: Vec<RawReading>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Import { file } => cmd_import(&config, file).await,
        Commands::Score {
            session_id,
            no_save,
            json,
        } => cmd_score(&config, &session_id, no_save, json).await,
        Commands::History { unit, limit } => cmd_history(&config, unit, limit).await,
        Commands::Stats { reset } => cmd_stats(&config, reset),
        Commands::Config { reset } => cmd_config(reset),
    }
}

async fn cmd_import(config: &Config, file: PathBuf) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("reading capture file {file:?}"))?;
    let capture: CaptureFile =
        serde_json::from_str(&content).with_context(|| format!("parsing {file:?}"))?;

    let mut recorder = match capture.session_id {
        Some(id) => SessionRecorder::with_session_id(id, capture.device_id),
        None => SessionRecorder::new(capture.device_id),
    };
    if let Some(unit) = capture.unit_id {
        recorder = recorder.for_unit(unit);
    }
    recorder.record_all(capture.readings)?;
    let session = recorder.finish()?;

    let store = JsonFileStore::new(&config.data_path);
    let path = store.put_session(&session).await?;

    println!("Imported session {}", session.session_id);
    println!("  Samples: {}", session.sample_count());
    println!("  Duration: {:.1}s", session.duration_secs);
    println!("  Peak magnitude: {:.3}g", session.peak_magnitude);
    println!("  Stored at: {path:?}");
    Ok(())
}

async fn cmd_score(
    config: &Config,
    session_id: &str,
    no_save: bool,
    json: bool,
) -> anyhow::Result<()> {
    config
        .ensure_directories()
        .context("creating data directory")?;

    let log = create_shared_log_with_persistence(config.stats_path());
    let store = Arc::new(JsonFileStore::new(&config.data_path));
    let engine = TviEngine::with_config(store, config.engine.clone()).with_log(log.clone());

    let outcome = engine.calculate_tvi(session_id).await;
    let saved = match &outcome {
        Ok(result) if !no_save => Some(
            engine
                .save_tvi_analysis(session_id, result, result.unit_id.as_deref())
                .await,
        ),
        _ => None,
    };

    if let Err(e) = log.save() {
        tracing::warn!("Could not save analysis stats: {}", e);
    }

    let result = outcome?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", result.summary());
    }

    if let Some(saved) = saved {
        let id = saved?;
        if !json {
            println!();
            println!("Saved as record {id}");
        }
    }
    Ok(())
}

async fn cmd_history(config: &Config, unit: Option<String>, limit: usize) -> anyhow::Result<()> {
    let store = JsonFileStore::new(&config.data_path);
    let mut records: Vec<_> = store
        .records()
        .await?
        .into_iter()
        .filter(|r| r.matches_unit(unit.as_deref()))
        .collect();

    if records.is_empty() {
        println!("No stored results in {:?}", config.data_path);
        return Ok(());
    }

    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    for record in records.iter().take(limit) {
        println!(
            "#{:<5} {}  {:<24} {:>6.1}  {:<9} risk {}",
            record.id,
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.session_id,
            record.tvi_score,
            record.safety_rating,
            record.risk_level
        );
    }

    let history = store.historical_scores(unit.as_deref()).await?;
    if let Some(summary) = HistorySummary::from_history(&history) {
        println!();
        println!("Results: {}", summary.count);
        println!("  Mean score: {:.1}", summary.mean);
        if let Some(sd) = summary.std_dev {
            println!("  Std deviation: {sd:.1}");
        }
        println!("  Range: {:.1} - {:.1}", summary.min, summary.max);
        println!(
            "  Latest: {:.1} at {}",
            summary.latest,
            summary.latest_at.to_rfc3339()
        );
    }
    Ok(())
}

fn cmd_stats(config: &Config, reset: bool) -> anyhow::Result<()> {
    let path = config.stats_path();
    if !path.exists() {
        println!("No analysis statistics found.");
        return Ok(());
    }
    let log = create_shared_log_with_persistence(path);
    if reset {
        log.reset();
        log.save().context("saving analysis stats")?;
        println!("Analysis statistics reset.");
        return Ok(());
    }
    println!("{}", log.summary());
    Ok(())
}

fn cmd_config(reset: bool) -> anyhow::Result<()> {
    let config = if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults.");
        println!();
        config
    } else {
        Config::load()?
    };

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
