//! Structured logging setup
//!
//! One `tracing-subscriber` pipeline for the whole binary. The filter
//! comes from `RUST_LOG` when set, otherwise from the configured log
//! level applied globally and to this crate's target. Debug builds log
//! human-readable output; release builds log JSON with span context,
//! which is what the loop's per-iteration events are meant for.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber at the given log level.
///
/// `RUST_LOG` takes precedence over `log_level`. Installing twice is a
/// no-op, so tests can call this freely.
pub fn init_telemetry_with_level(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{log_level},colloquy_engine={log_level}"))
    });

    let registry = tracing_subscriber::registry().with(filter);

    #[cfg(debug_assertions)]
    registry
        .with(fmt::layer().pretty().with_target(false))
        .try_init()
        .ok();

    #[cfg(not(debug_assertions))]
    registry
        .with(fmt::layer().json().with_current_span(true))
        .try_init()
        .ok();
}
