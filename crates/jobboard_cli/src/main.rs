//! Schema export probe.
//!
//! # Responsibility
//! - Build the job board schema with the default data config.
//! - Print the snapshot as JSON, or write it to the path given as first arg.
//!
//! Set `JOBBOARD_LOG_DIR` to an absolute path to enable file logging.

use jobboard_core::{core_version, default_log_level, init_logging, jobboard_schema, DataConfig};
use log::info;
use std::process::ExitCode;

const LOG_DIR_ENV: &str = "JOBBOARD_LOG_DIR";

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        if let Err(err) = init_logging(default_log_level(), log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let schema = match jobboard_schema(DataConfig::default()) {
        Ok(schema) => schema,
        Err(err) => {
            eprintln!("schema build failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    let json = match serde_json::to_string_pretty(&schema) {
        Ok(json) => json,
        Err(err) => {
            eprintln!("schema serialization failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    match std::env::args().nth(1) {
        Some(path) => {
            if let Err(err) = std::fs::write(&path, json) {
                eprintln!("failed to write `{path}`: {err}");
                return ExitCode::FAILURE;
            }
            info!(
                "event=schema_export module=cli status=ok path={} entities={} version={}",
                path,
                schema.len(),
                core_version()
            );
        }
        None => println!("{json}"),
    }
    ExitCode::SUCCESS
}
