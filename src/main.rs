mod main_runtime;

use anyhow::{Context, Result};
use clap::Parser;
use hexguide::cli::{Cli, Commands};
use hexguide::config::AppConfig;
use hexguide::guidance::GuidanceEngine;
use hexguide::services::ApiWatcher;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info};

use main_runtime::{build_engine, init_logging, init_logging_simple, load_config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(&cli)?;

    match cli.command_or_default() {
        Commands::Watch { .. } => {
            init_logging(&cfg.logging);
            run_watch_mode(&cfg).await?;
        }
        Commands::Prices => {
            init_logging_simple();
            let engine = build_engine(&cfg).await?;
            print!("{}", engine.dump_prices());
        }
        Commands::Collection => {
            init_logging_simple();
            let engine = build_engine(&cfg).await?;
            print!("{}", engine.dump_collection());
        }
        Commands::Dispatch { message } => {
            init_logging_simple();
            let mut engine = build_engine(&cfg).await?;
            run_dispatch_once(&mut engine, &message)?;
        }
        Commands::Save { target } => {
            init_logging_simple();
            let mut engine = build_engine(&cfg).await?;
            run_save(&mut engine, target)?;
        }
    }

    Ok(())
}

async fn run_watch_mode(cfg: &AppConfig) -> Result<()> {
    let engine = build_engine(cfg).await?;
    info!("Ready: {} cards in catalog", engine.catalog().len());

    let watcher = ApiWatcher::new(
        &cfg.sources.api_data,
        engine,
        cfg.watch.collection_write_delay(),
    );
    let watcher = watcher
        .run(cfg.watch.poll_interval(), shutdown_signal(), |guidance| {
            println!("{}\n", guidance)
        })
        .await;

    info!("Handled {} API messages", watcher.messages_received());
    Ok(())
}

fn run_dispatch_once(engine: &mut GuidanceEngine, message: &str) -> Result<()> {
    let guidance = engine.dispatch(message).context("dispatching message")?;
    println!("{}", guidance);

    // No debounce for a single message
    if engine.reconciliation_pending() {
        let report = engine
            .reconcile_collection()
            .context("reconciling collection snapshot")?;
        println!(
            "Collection cache updated: {} cards owned, {} without prices",
            report.applied,
            report.unmatched.len()
        );
    }
    Ok(())
}

fn run_save(engine: &mut GuidanceEngine, target: Option<PathBuf>) -> Result<()> {
    let saved = engine
        .save_collection(target.as_deref())
        .context("saving collection cache")?;
    println!("Saved collection to {}", saved.display());
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
