//! MongoDB access for the updater: connect, the single update-one request,
//! an optional read-back, and clean shutdown.
//!
//! The store is the sole authority over document identity and consistency;
//! this module only issues requests and reports the driver's counts.

use std::time::Duration;

use mongodb::bson::{doc, to_bson, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use tracing::{debug, info, instrument};

use crate::config::UpdaterConfig;
use crate::domain::{Problem, TestCase};
use crate::updater::UpdaterError;
use crate::util::redact_credentials;

const APP_NAME: &str = "skypad-testcase-updater";
// Matches the backend's serverSelectionTimeoutMS.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Counts the driver returns for the one update request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdateCounts {
    pub matched: u64,
    pub modified: u64,
}

pub struct ProblemStore {
    client: Client,
    problems: Collection<Problem>,
}

impl ProblemStore {
    /// Parse the URI, build the client and select the problems collection.
    /// The driver connects lazily: an unreachable cluster surfaces on the
    /// first operation, not here.
    #[instrument(level = "info", skip_all)]
    pub async fn connect(cfg: &UpdaterConfig) -> Result<Self, UpdaterError> {
        let mut options = ClientOptions::parse(&cfg.uri)
            .await
            .map_err(UpdaterError::Connect)?;
        options.app_name = Some(APP_NAME.to_string());
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);

        let client = Client::with_options(options).map_err(UpdaterError::Connect)?;
        let problems = client.database(&cfg.database).collection(&cfg.collection);
        info!(
            target: "updater",
            uri = %redact_credentials(&cfg.uri),
            database = %cfg.database,
            collection = %cfg.collection,
            "Client ready"
        );
        Ok(Self { client, problems })
    }

    /// Issue the single update: the first document whose `title` matches
    /// gets its `hiddenTestCases` replaced wholesale.
    #[instrument(level = "info", skip(self, cases), fields(%title, case_count = cases.len()))]
    pub async fn set_hidden_test_cases(
        &self,
        title: &str,
        cases: &[TestCase],
    ) -> Result<UpdateCounts, UpdaterError> {
        let update = set_update(cases)?;
        let result = self
            .problems
            .update_one(doc! { "title": title }, update)
            .await
            .map_err(UpdaterError::Operation)?;
        let counts = UpdateCounts {
            matched: result.matched_count,
            modified: result.modified_count,
        };
        debug!(target: "updater", matched = counts.matched, modified = counts.modified, "Update acknowledged");
        Ok(counts)
    }

    /// Read a problem back by title. Diagnostic only.
    #[instrument(level = "debug", skip(self), fields(%title))]
    pub async fn find_by_title(&self, title: &str) -> Result<Option<Problem>, UpdaterError> {
        self.problems
            .find_one(doc! { "title": title })
            .await
            .map_err(UpdaterError::Operation)
    }

    /// Release the client. Consumes the store so nothing can use it after.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}

/// Build the `$set` directive for the replacement payload.
fn set_update(cases: &[TestCase]) -> Result<Document, UpdaterError> {
    let payload = to_bson(cases).map_err(UpdaterError::Encode)?;
    Ok(doc! { "$set": { "hiddenTestCases": payload } })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_directive_uses_wire_field_names() {
        let cases = vec![TestCase { input: String::new(), expected_output: "Hello World".into() }];
        let update = set_update(&cases).expect("update doc");
        let set = update.get_document("$set").expect("$set");
        let arr = set.get_array("hiddenTestCases").expect("hiddenTestCases");
        assert_eq!(arr.len(), 1);
        let first = arr[0].as_document().expect("case doc");
        assert_eq!(first.get_str("input").unwrap(), "");
        assert_eq!(first.get_str("expectedOutput").unwrap(), "Hello World");
    }

    #[test]
    fn empty_payload_still_encodes() {
        let update = set_update(&[]).expect("update doc");
        let set = update.get_document("$set").expect("$set");
        assert!(set.get_array("hiddenTestCases").expect("array").is_empty());
    }
}
