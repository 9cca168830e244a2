//! Subscriber setup for sweep runs.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::errors::EvalError;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Directive for stderr logs when `RUST_LOG` is unset or invalid.
const DEFAULT_DIRECTIVE: &str = "info";

/// Append JSON log lines with RFC 3339 UTC timestamps to `path`.
///
/// Records every level.
pub fn init_run_logging(path: &Path) -> Result<(), EvalError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let layer = fmt::layer()
        .json()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(Mutex::new(file))
        .boxed();
    install(layer, EnvFilter::new("trace"))
}

/// Human-readable logs on stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_stderr_logging() -> Result<(), EvalError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let layer = fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(io::stderr)
        .boxed();
    install(layer, filter)
}

/// Sets the process-wide subscriber; fails if one is already installed.
fn install(layer: BoxedLayer, filter: EnvFilter) -> Result<(), EvalError> {
    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .map_err(|err| EvalError::Logging(err.to_string()))
}
