//! Tracing setup
//!
//! Output format is controlled by `BEANCHECK_LOG_FORMAT`:
//!
//! - `text` (default): plain `tracing-subscriber` lines
//! - `json`: one JSON object per event
//!
//! ```bash
//! BEANCHECK_LOG=debug cargo test
//! BEANCHECK_LOG="beancheck::synth=trace" BEANCHECK_LOG_FORMAT=json cargo test
//! ```
//!
//! The subscriber is only installed when `BEANCHECK_LOG` (or `RUST_LOG`) is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Filter variable
pub const LOG_ENV: &str = "BEANCHECK_LOG";
/// Format variable
pub const LOG_FORMAT_ENV: &str = "BEANCHECK_LOG_FORMAT";

/// Tracing output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Flat text lines (default)
    Text,
    /// Newline-delimited JSON objects
    Json,
}

impl LogFormat {
    /// Parse a format name; anything unrecognized is text
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var(LOG_FORMAT_ENV).unwrap_or_default())
    }
}

/// `BEANCHECK_LOG` takes precedence over `RUST_LOG`
fn build_filter() -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(value) => EnvFilter::builder().parse_lossy(value),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global tracing subscriber
///
/// Does nothing when neither variable is set, or when a subscriber is already
/// installed (repeated calls from several tests are harmless). Output goes to
/// stderr.
pub fn init_tracing() {
    if std::env::var(LOG_ENV).is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    let filter = build_filter();
    let installed = match LogFormat::from_env() {
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default()
                .with(filter)
                .with(json_layer)
                .try_init()
                .is_ok()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    };
    if installed {
        tracing::debug!("tracing subscriber installed");
    }
}
