//! mutator-math - piecewise-linear interpolation of design space documents
//!
//! Loads a document, builds the mutator for its masters and prints the
//! computed instances as JSON.

use anyhow::Context;
use std::time::Instant;
use tracing::{error, info};

use mutator_math::document::load_document;
use mutator_math::{
    init_tracing, log_error, log_operation_end, log_operation_start, log_timed_operation, Config,
};

fn main() -> anyhow::Result<()> {
    let (config, document_path) = Config::load()?;

    config.validate().map_err(|e| {
        eprintln!("Invalid configuration: {}", e);
        e
    })?;

    init_tracing(&config.log_level);
    info!("Starting mutator-math v{}", env!("CARGO_PKG_VERSION"));

    let document =
        log_timed_operation("document_load", || load_document(&document_path)).map_err(|e| {
            log_error(&e, "document_load");
            e
        })?;
    mutator_math::logging::log_document_stats(
        &document_path.display().to_string(),
        &document.axis_names(),
        document.masters.len(),
        document.instances.len(),
    );

    let start = Instant::now();
    log_operation_start("evaluate", Some(if config.bend { "bent" } else { "unbent" }));
    let evaluation = document.evaluate(config.bend);
    log_operation_end("evaluate", start, evaluation.is_ok());
    let evaluation = evaluation.map_err(|e| {
        error!("Failed to evaluate {}: {}", document_path.display(), e);
        e
    })?;

    let output = if config.pretty {
        serde_json::to_string_pretty(&evaluation)
    } else {
        serde_json::to_string(&evaluation)
    }
    .context("Failed to serialize the result")?;
    println!("{}", output);
    Ok(())
}
