//! Tracing setup.
//!
//! The terminal belongs to the UI, so log output goes to a daily rolling
//! file instead.  `RUST_LOG` wins over the `--debug` default when set.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE: &str = "redfeed.log";

/// Install the global subscriber.
///
/// Keep the returned guard alive for the life of the program; dropping it
/// flushes and stops the background writer.
pub fn init(log_dir: &Path, debug: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(non_blocking);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(guard)
}

fn default_directive(debug: bool) -> &'static str {
    if debug {
        "redfeed=debug,warn"
    } else {
        "redfeed=info,warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_raises_own_level_only() {
        assert_eq!(default_directive(true), "redfeed=debug,warn");
        assert_eq!(default_directive(false), "redfeed=info,warn");
    }
}
