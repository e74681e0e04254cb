//! Headless auto-battle entry point.
mod config;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use battle_content::{BattleSetup, ContentFactory};
use battle_core::BattleEvent;
use battle_runtime::{AutoPlayerProvider, BattleRuntime, EnemyAiProvider, RuntimeConfig, Topic};
use config::CliConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();
    let _guard = setup_logging(config.session_id.as_deref())?;

    let mut setup = load_setup(&config)?;
    setup.config.game_seed = config.seed;
    tracing::info!(
        encounter = %config.encounter,
        name = %setup.name,
        seed = config.seed,
        "starting battle"
    );

    let runtime = BattleRuntime::builder()
        .config(RuntimeConfig {
            pace_steps: config.pace_steps,
            ..RuntimeConfig::default()
        })
        .setup(setup)
        .player_provider(AutoPlayerProvider)
        .enemy_provider(EnemyAiProvider::with_think_delay(config.think_delay))
        .build()
        .await?;

    let reporter = tokio::spawn(report_events(
        runtime.subscribe(Topic::Round),
        runtime.subscribe(Topic::Unit),
    ));

    let outcome = runtime.run().await?;
    runtime.shutdown().await?;
    // The bus closes with the worker, which ends the reporter.
    reporter.await.context("event reporter panicked")?;

    let summary = serde_json::json!({
        "encounter": config.encounter,
        "seed": config.seed,
        "winner": outcome.winner.to_string(),
        "rounds": outcome.rounds,
        "snapshot": outcome.snapshot,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

fn load_setup(config: &CliConfig) -> Result<BattleSetup> {
    let setup = match &config.data_dir {
        Some(dir) => ContentFactory::new(dir).load_battle(&config.encounter),
        None => battle_content::embedded::battle(&config.encounter),
    };
    setup.with_context(|| format!("failed to load encounter '{}'", config.encounter))
}

/// Logs round and unit events as they happen until the bus closes.
async fn report_events(
    mut rounds: tokio::sync::broadcast::Receiver<BattleEvent>,
    mut units: tokio::sync::broadcast::Receiver<BattleEvent>,
) {
    use tokio::sync::broadcast::error::RecvError;

    let mut rounds_open = true;
    let mut units_open = true;
    while rounds_open || units_open {
        let received = tokio::select! {
            event = rounds.recv(), if rounds_open => (event, &mut rounds_open),
            event = units.recv(), if units_open => (event, &mut units_open),
        };
        match received {
            (Ok(event), _) => tracing::info!(target: "battle_cli::events", ?event),
            (Err(RecvError::Lagged(skipped)), _) => {
                tracing::warn!(target: "battle_cli::events", skipped, "event reporter lagged")
            }
            (Err(RecvError::Closed), open) => *open = false,
        }
    }
}

/// Setup logging to both stderr and a per-session file
fn setup_logging(session_id: Option<&str>) -> Result<WorkerGuard> {
    let session_id = match session_id {
        Some(id) => id.to_owned(),
        None => {
            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            format!("session_{}", timestamp)
        }
    };

    let session_log_dir = log_directory().join(&session_id);
    std::fs::create_dir_all(&session_log_dir).with_context(|| {
        format!(
            "failed to create log directory {}",
            session_log_dir.display()
        )
    })?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "battle.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::info!("Logging initialized: session={}", session_id);
    tracing::info!("Log file: {}/battle.log", session_log_dir.display());

    Ok(guard)
}

/// Platform cache directory for logs, e.g. `~/.cache/mask-battle/logs` on Linux.
fn log_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "mask-battle")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("mask-battle"))
        .join("logs")
}
