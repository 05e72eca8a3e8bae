//! Logging utilities for mutator-math.
//!
//! Structured `tracing` output for the CLI and for long builds. The library
//! itself only emits events; installing a subscriber is up to the binary.

use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::error::MutatorError;

/// Initialize the tracing subscriber with the given log level.
///
/// `RUST_LOG` wins over `log_level` when set. Calling this twice is harmless:
/// the second subscriber is not installed.
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_err() {
        debug!("Tracing subscriber already installed");
    }
}

/// Log the start of a CLI step such as loading or evaluating.
pub fn log_operation_start(operation: &str, details: Option<&str>) {
    match details {
        Some(details) => info!(operation, details, "Starting"),
        None => info!(operation, "Starting"),
    }
}

/// Log the end of a step started with [`log_operation_start`].
pub fn log_operation_end(operation: &str, start_time: Instant, success: bool) {
    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    if success {
        info!(operation, duration_ms, "Finished");
    } else {
        warn!(operation, duration_ms, "Failed");
    }
}

/// Run `f` and log how long it took, at debug level.
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let result = f();
    debug!(
        operation,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Timed"
    );
    result
}

/// Log what a design space document contains.
pub fn log_document_stats(path: &str, axis_names: &[&str], master_count: usize, instance_count: usize) {
    info!(
        operation = "document_load",
        path = path,
        axes = %axis_names.join(", "),
        masters = master_count,
        instances = instance_count,
        "Document loaded"
    );
}

fn error_kind(error: &MutatorError) -> &'static str {
    match error {
        MutatorError::NoNeutral { .. } => "no_neutral",
        MutatorError::ZeroDivision { .. } => "zero_division",
        MutatorError::WarpFailed { .. } => "warp_failed",
        MutatorError::AmbivalentMaster { .. } => "ambivalent_master",
        MutatorError::IncompatibleMaster { .. } => "incompatible_master",
        MutatorError::MalformedLocation { .. } => "malformed_location",
        MutatorError::InvalidDocument { .. } => "invalid_document",
        MutatorError::Config { .. } => "config",
        MutatorError::Io(_) => "io",
        MutatorError::Json(_) => "json",
    }
}

/// Log an error with the step it happened in.
pub fn log_error(error: &MutatorError, context: &str) {
    error!(error = %error, kind = error_kind(error), context, "Error occurred");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_log_timed_operation() {
        let result = log_timed_operation("test_operation", || {
            std::thread::sleep(Duration::from_millis(1));
            42
        });
        assert_eq!(result, 42);
    }

    #[test]
    fn test_error_kind() {
        let err = MutatorError::NoNeutral {
            bias: "pop:1".to_string(),
        };
        assert_eq!(error_kind(&err), "no_neutral");
        let err = MutatorError::Io(std::io::Error::other("gone"));
        assert_eq!(error_kind(&err), "io");
    }

    #[test]
    fn test_init_tracing_twice() {
        init_tracing("debug");
        init_tracing("info");
        log_operation_start("twice", Some("no panic"));
        log_operation_end("twice", Instant::now(), true);
        log_error(
            &MutatorError::Config {
                message: "test".to_string(),
            },
            "test",
        );
    }
}
