//! # Tracing Module
//!
//! Environment-aware console logging using the tracing ecosystem.
//! Logs go to stdout; output is either human-readable or one JSON object per
//! line for log shippers.
//!
//! Level resolution, first match wins:
//!
//! 1. `logging.level` from configuration
//! 2. `LOG_LEVEL`
//! 3. `RUST_LOG`
//! 4. per-environment default (`production` → info, everything else → debug)

use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{ConfigManager, LogFormat, LoggingConfig};

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console logging. Safe to call more than once; only the first
/// call installs a subscriber.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INITIALIZED.get_or_init(|| {
        let environment = ConfigManager::detect_environment();
        let log_level = resolve_log_level(config, &environment);

        let use_ansi = IsTerminal::is_terminal(&std::io::stdout());

        let console_layer = match config.format {
            LogFormat::Pretty => fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(use_ansi)
                .with_filter(EnvFilter::new(&log_level))
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(false)
                .with_filter(EnvFilter::new(&log_level))
                .boxed(),
        };

        let subscriber = tracing_subscriber::registry().with(console_layer);

        if subscriber.try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        } else {
            tracing::info!(
                environment = %environment,
                level = %log_level,
                format = ?config.format,
                ansi_colors = use_ansi,
                "Console logging initialized"
            );
        }
    });
}

/// Console subscriber scoped to the current thread, for output emitted
/// before configuration is loaded. Dropping the guard removes it.
pub fn init_bootstrap_tracing() -> DefaultGuard {
    let environment = ConfigManager::detect_environment();
    let log_level = resolve_log_level(&LoggingConfig::default(), &environment);

    let subscriber = fmt()
        .with_target(true)
        .with_ansi(IsTerminal::is_terminal(&std::io::stdout()))
        .with_env_filter(EnvFilter::new(log_level))
        .finish();
    tracing::subscriber::set_default(subscriber)
}

fn resolve_log_level(config: &LoggingConfig, environment: &str) -> String {
    select_directive(
        config.level.as_deref(),
        std::env::var("LOG_LEVEL").ok().as_deref(),
        std::env::var("RUST_LOG").ok().as_deref(),
        environment,
    )
}

/// Directives are passed through as given; target names are case-sensitive
fn select_directive(
    configured: Option<&str>,
    log_level: Option<&str>,
    rust_log: Option<&str>,
    environment: &str,
) -> String {
    [configured, log_level, rust_log]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|directive| !directive.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| default_level_for(environment).to_string())
}

fn default_level_for(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}
