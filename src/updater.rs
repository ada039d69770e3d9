//! Orchestration for the one-shot update: the typed error set, the
//! three-way outcome, and the run sequence that always releases the client.

use tracing::{debug, info, instrument};

use crate::config::{ConfigError, UpdaterConfig};
use crate::store::{ProblemStore, UpdateCounts};
use crate::util::trunc_for_log;

/// What the single update request amounted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
  /// No document carries the configured title.
  NotFound,
  /// A document matched and its hidden test cases were replaced.
  Updated,
  /// A document matched but already held the replacement payload.
  AlreadyCurrent,
}

impl UpdateOutcome {
  /// The status line this tool has always printed for each outcome.
  pub fn status_line(&self, title: &str) -> String {
    match self {
      UpdateOutcome::NotFound => {
        format!("❌ Error: Could not find the problem with title '{title}'.")
      }
      UpdateOutcome::Updated => {
        format!("🎉 Successfully added hidden test cases to '{title}'.")
      }
      UpdateOutcome::AlreadyCurrent => {
        "No changes were needed. The test cases might already be correct.".to_string()
      }
    }
  }
}

/// Everything that can go wrong before an outcome exists. Not-found and
/// no-op are outcomes, not errors.
#[derive(Debug, thiserror::Error)]
pub enum UpdaterError {
  #[error("configuration error: {0}")]
  Config(#[from] ConfigError),

  /// URI parsing or client construction failed; no request was sent.
  #[error("could not set up the database client: {0}")]
  Connect(#[source] mongodb::error::Error),

  /// The replacement payload did not encode to BSON.
  #[error("could not encode the test cases: {0}")]
  Encode(#[source] mongodb::bson::ser::Error),

  /// The update (or read-back) request itself failed.
  #[error("database operation failed: {0}")]
  Operation(#[source] mongodb::error::Error),
}

impl UpdaterError {
  /// True when the failure is transport-level (cluster unreachable, server
  /// selection timed out) rather than a rejected request.
  pub fn is_connectivity(&self) -> bool {
    match self {
      UpdaterError::Connect(e) | UpdaterError::Operation(e) => matches!(
        e.kind.as_ref(),
        mongodb::error::ErrorKind::ServerSelection { .. } | mongodb::error::ErrorKind::Io(_)
      ),
      _ => false,
    }
  }
}

/// Three-way classification of the driver's counts, evaluated in order:
/// no match, modified, matched-but-unchanged.
pub fn classify(counts: UpdateCounts) -> UpdateOutcome {
  if counts.matched == 0 {
    UpdateOutcome::NotFound
  } else if counts.modified > 0 {
    UpdateOutcome::Updated
  } else {
    UpdateOutcome::AlreadyCurrent
  }
}

/// Connect, apply the update, classify, and shut the client down on both
/// the success and the failure path.
#[instrument(level = "info", skip_all, fields(title = %cfg.title))]
pub async fn run(cfg: &UpdaterConfig) -> Result<UpdateOutcome, UpdaterError> {
  let store = ProblemStore::connect(cfg).await?;
  let outcome = apply(&store, cfg).await;
  store.shutdown().await;
  outcome
}

async fn apply(store: &ProblemStore, cfg: &UpdaterConfig) -> Result<UpdateOutcome, UpdaterError> {
  let counts = store.set_hidden_test_cases(&cfg.title, &cfg.cases).await?;
  let outcome = classify(counts);
  info!(target: "updater", matched = counts.matched, modified = counts.modified, ?outcome, "Update classified");

  // Debug-only read-back; the mutation above stays the only required
  // network operation.
  if outcome == UpdateOutcome::Updated && tracing::enabled!(target: "updater", tracing::Level::DEBUG) {
    match store.find_by_title(&cfg.title).await {
      Ok(Some(problem)) => {
        let dump = serde_json::to_string_pretty(&problem)
          .unwrap_or_else(|e| format!("<unserializable: {e}>"));
        debug!(
          target: "updater",
          hidden_cases = problem.hidden_test_cases.len(),
          "Post-update read-back:\n{}",
          trunc_for_log(&dump, 2000)
        );
      }
      Ok(None) => debug!(target: "updater", "Post-update read-back found no document"),
      Err(e) => debug!(target: "updater", error = %e, "Post-update read-back failed; ignoring"),
    }
  }
  Ok(outcome)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn counts(matched: u64, modified: u64) -> UpdateCounts {
    UpdateCounts { matched, modified }
  }

  #[test]
  fn no_match_classifies_as_not_found() {
    assert_eq!(classify(counts(0, 0)), UpdateOutcome::NotFound);
  }

  #[test]
  fn modified_match_classifies_as_updated() {
    assert_eq!(classify(counts(1, 1)), UpdateOutcome::Updated);
  }

  #[test]
  fn unmodified_match_classifies_as_already_current() {
    assert_eq!(classify(counts(1, 0)), UpdateOutcome::AlreadyCurrent);
  }

  #[test]
  fn repeated_application_goes_updated_then_no_change() {
    // First run replaces the payload; replaying the identical payload
    // matches but modifies nothing.
    assert_eq!(classify(counts(1, 1)), UpdateOutcome::Updated);
    assert_eq!(classify(counts(1, 0)), UpdateOutcome::AlreadyCurrent);
  }

  #[test]
  fn status_lines_spell_out_each_outcome() {
    let title = "Hello world";
    assert_eq!(
      UpdateOutcome::NotFound.status_line(title),
      "❌ Error: Could not find the problem with title 'Hello world'."
    );
    assert_eq!(
      UpdateOutcome::Updated.status_line(title),
      "🎉 Successfully added hidden test cases to 'Hello world'."
    );
    assert_eq!(
      UpdateOutcome::AlreadyCurrent.status_line(title),
      "No changes were needed. The test cases might already be correct."
    );
  }
}
