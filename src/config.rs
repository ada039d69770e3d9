//! Run configuration: environment variables plus an optional TOML file.
//!
//! Resolution order: built-in defaults, then the TOML file named by
//! UPDATER_CONFIG_PATH, then environment variables. The defaults reproduce
//! the values this maintenance run has always used, so MONGODB_URI is the
//! only required setting.

use serde::Deserialize;
use tracing::info;

use crate::domain::TestCase;

const DEFAULT_DATABASE: &str = "skypadDB";
const DEFAULT_COLLECTION: &str = "problems";
const DEFAULT_TITLE: &str = "Hello world";

/// Everything a run needs, fully resolved.
#[derive(Clone, Debug)]
pub struct UpdaterConfig {
  pub uri: String,
  pub database: String,
  pub collection: String,
  pub title: String,
  pub cases: Vec<TestCase>,
}

/// Overrides accepted in the TOML file. Test cases use the wire spelling:
///
/// ```toml
/// title = "Hello world"
///
/// [[cases]]
/// input = ""
/// expectedOutput = "Hello World"
/// ```
#[derive(Clone, Debug, Deserialize, Default)]
pub struct FileConfig {
  #[serde(default)] pub database: Option<String>,
  #[serde(default)] pub collection: Option<String>,
  #[serde(default)] pub title: Option<String>,
  #[serde(default)] pub cases: Option<Vec<TestCase>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("MONGODB_URI is not set")]
  MissingUri,
  #[error("failed to read config file {path}: {source}")]
  Unreadable {
    path: String,
    #[source]
    source: std::io::Error,
  },
  #[error("failed to parse config file {path}: {source}")]
  Invalid {
    path: String,
    #[source]
    source: toml::de::Error,
  },
}

/// The replacement payload used when the TOML file supplies none: the single
/// smoke-test case for the "Hello world" problem.
pub fn default_cases() -> Vec<TestCase> {
  vec![TestCase { input: String::new(), expected_output: "Hello World".to_string() }]
}

/// Resolve the full configuration. MONGODB_URI must be present; everything
/// else falls back to TOML values and then to the defaults.
pub fn load() -> Result<UpdaterConfig, ConfigError> {
  let uri = std::env::var("MONGODB_URI")
    .ok()
    .filter(|s| !s.is_empty())
    .ok_or(ConfigError::MissingUri)?;
  let file = load_file_config()?.unwrap_or_default();

  Ok(UpdaterConfig {
    uri,
    database: env_or("SKYPAD_DB", file.database, DEFAULT_DATABASE),
    collection: env_or("SKYPAD_COLLECTION", file.collection, DEFAULT_COLLECTION),
    title: env_or("PROBLEM_TITLE", file.title, DEFAULT_TITLE),
    cases: file.cases.unwrap_or_else(default_cases),
  })
}

/// Read UPDATER_CONFIG_PATH if set. A named but unreadable or unparsable
/// file aborts the run instead of being silently skipped.
fn load_file_config() -> Result<Option<FileConfig>, ConfigError> {
  let Ok(path) = std::env::var("UPDATER_CONFIG_PATH") else {
    return Ok(None);
  };
  let raw = std::fs::read_to_string(&path)
    .map_err(|source| ConfigError::Unreadable { path: path.clone(), source })?;
  let cfg = toml::from_str::<FileConfig>(&raw)
    .map_err(|source| ConfigError::Invalid { path: path.clone(), source })?;
  info!(target: "updater", %path, cases = cfg.cases.as_ref().map_or(0, Vec::len), "Loaded updater config (TOML)");
  Ok(Some(cfg))
}

fn env_or(name: &str, file_value: Option<String>, default: &str) -> String {
  std::env::var(name)
    .ok()
    .filter(|s| !s.is_empty())
    .or(file_value)
    .unwrap_or_else(|| default.to_string())
}
