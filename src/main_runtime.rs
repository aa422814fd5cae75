use anyhow::{Context, Result};
use hexguide::adapters::{PriceFeedClient, PriceSource};
use hexguide::cli::{Cli, Commands};
use hexguide::config::{AppConfig, LoggingConfig};
use hexguide::error::GuideError;
use hexguide::guidance::GuidanceEngine;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Config from `cli.config`, with the command line overrides applied and validated.
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut cfg = AppConfig::load_from(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    if let Some(prices) = &cli.prices {
        cfg.sources.prices = prices.clone();
    }
    if let Some(collection) = &cli.collection {
        cfg.sources.collection_cache = collection.clone();
    }
    if let Some(Commands::Watch {
        api_data: Some(path),
    }) = &cli.command
    {
        cfg.sources.api_data = path.clone();
    }

    cfg.validate()
        .map_err(|errors| GuideError::Validation(errors.join("; ")))
        .context("invalid configuration")?;
    Ok(cfg)
}

/// Prices first, then the collection cache, the order the catalog needs.
///
/// A price feed that cannot be fetched is logged and skipped so the
/// collection still loads.
pub async fn build_engine(cfg: &AppConfig) -> Result<GuidanceEngine> {
    let mut engine = GuidanceEngine::default();

    let source = PriceSource::parse(&cfg.sources.prices);
    let client = PriceFeedClient::new(Duration::from_secs(cfg.sources.fetch_timeout_secs))
        .context("building price feed client")?;
    match client.fetch(&source).await {
        Ok(text) => {
            let report = engine.ingest_prices(&text);
            info!(
                "Price catalog ready: {} cards ({} lines skipped)",
                engine.catalog().len(),
                report.skipped
            );
        }
        Err(e) => warn!("Could not load prices from {}: {}", source, e),
    }

    engine
        .load_collection(&cfg.sources.collection_cache)
        .with_context(|| {
            format!(
                "loading collection cache {}",
                cfg.sources.collection_cache.display()
            )
        })?;
    Ok(engine)
}

/// Default `EnvFilter` directive when `RUST_LOG` is unset.
///
/// A bare level applies to this crate. At debug or trace, dependencies stay
/// at info. Anything else is passed through as a full directive.
pub fn filter_directive(cfg: &LoggingConfig) -> String {
    let level = cfg.level.trim();
    if level.contains(',') || level.contains('=') {
        return level.to_string();
    }
    match level.to_ascii_lowercase().as_str() {
        "debug" | "trace" => format!("info,hexguide={}", level),
        _ => level.to_string(),
    }
}

pub fn init_logging(cfg: &LoggingConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(cfg)));

    // `tracing_appender::rolling::daily` panics if it can't create the initial
    // log file, so writability is checked first.
    let file_layer = cfg.dir.as_ref().and_then(|log_dir| {
        if std::fs::create_dir_all(log_dir).is_err() {
            eprintln!(
                "Warning: Could not create log directory {}, file logging disabled",
                log_dir.display()
            );
            return None;
        }
        let test_path = log_dir.join(".hexguide_write_test");
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&test_path)
        {
            Ok(_) => {
                let _ = std::fs::remove_file(&test_path);

                let file_appender = tracing_appender::rolling::daily(log_dir, "hexguide.log");
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                // Lives for the whole process
                Box::leak(Box::new(guard));

                Some(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true),
                )
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not write to log directory {} ({}), file logging disabled",
                    log_dir.display(),
                    e
                );
                None
            }
        }
    });

    let (json_layer, text_layer) = if cfg.json {
        (Some(tracing_subscriber::fmt::layer().json().with_target(true)), None)
    } else {
        (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            ),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .init();
}

pub fn init_logging_simple() {
    // Minimal logging for one-shot commands
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .try_init();
}
