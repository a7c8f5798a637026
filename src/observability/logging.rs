//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Honour `RUST_LOG`, falling back to the requested level
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Initialization is idempotent so tests and hosts may both call it

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither `RUST_LOG` nor a level is supplied.
pub const DEFAULT_FILTER: &str = "mongodb_provider=info";

/// Build the filter: `RUST_LOG` wins, then `level`, then [`DEFAULT_FILTER`].
pub fn build_filter(level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = level
            .map(|l| format!("mongodb_provider={}", l))
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());
        EnvFilter::new(directive)
    })
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init_logging(level: Option<&str>) -> bool {
    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}
