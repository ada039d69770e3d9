//! Skypad · Hidden Test-Case Updater
//!
//! One-shot maintenance tool for the judge database: finds one problem by
//! title and replaces its `hiddenTestCases` field with the configured
//! payload, then reports what happened on stdout.
//!
//! Important env variables:
//!   MONGODB_URI         : connection string (required, credentials embedded)
//!   SKYPAD_DB           : database name (default "skypadDB")
//!   SKYPAD_COLLECTION   : collection name (default "problems")
//!   PROBLEM_TITLE       : title to match (default "Hello world")
//!   UPDATER_CONFIG_PATH : path to TOML config (overrides + test-case payload)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod store;
mod updater;

use tracing::{error, info, instrument};

use crate::updater::UpdaterError;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() {
  telemetry::init_tracing();

  // Failure contract everywhere below: one printed line, normal exit.
  let cfg = match config::load().map_err(UpdaterError::from) {
    Ok(cfg) => cfg,
    Err(e) => {
      error!(target: "updater", error = %e, "Configuration rejected");
      println!("An error occurred: {e}");
      return;
    }
  };

  println!("Searching for problem: '{}'...", cfg.title);

  match updater::run(&cfg).await {
    Ok(outcome) => {
      info!(target: "updater", ?outcome, "Run finished");
      println!("{}", outcome.status_line(&cfg.title));
    }
    Err(e) => {
      error!(target: "updater", error = %e, connectivity = e.is_connectivity(), "Run failed");
      println!("An error occurred: {e}");
    }
  }
}
