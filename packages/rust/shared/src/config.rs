//! Application configuration for LeetTutor.
//!
//! User config lives at `~/.leettutor/leettutor.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LeetTutorError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "leettutor.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".leettutor";

// ---------------------------------------------------------------------------
// Config structs (matching leettutor.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Primary problem API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Fallback dataset API settings.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Notebook rendering settings.
    #[serde(default)]
    pub notebook: NotebookConfig,
}

/// `[api]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the primary problem API.
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Request timeout in seconds, shared by both APIs.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://leetcode-api-pied.vercel.app".into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[dataset]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Whether to query the dataset when the primary API has no starter code.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the dataset server.
    #[serde(default = "default_dataset_base_url")]
    pub base_url: String,

    /// Dataset name, e.g. `owner/name`.
    #[serde(default = "default_dataset_name")]
    pub dataset: String,

    /// Dataset config name.
    #[serde(default = "default_dataset_config")]
    pub config: String,

    /// Dataset split.
    #[serde(default = "default_dataset_split")]
    pub split: String,

    /// Page length for each search request.
    #[serde(default = "default_search_length")]
    pub search_length: u32,

    /// Number of rows read by the linear scan when search finds nothing.
    #[serde(default = "default_scan_length")]
    pub scan_length: u32,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_dataset_base_url(),
            dataset: default_dataset_name(),
            config: default_dataset_config(),
            split: default_dataset_split(),
            search_length: default_search_length(),
            scan_length: default_scan_length(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_dataset_base_url() -> String {
    "https://datasets-server.huggingface.co".into()
}
fn default_dataset_name() -> String {
    "newfacade/LeetCodeDataset".into()
}
fn default_dataset_config() -> String {
    "default".into()
}
fn default_dataset_split() -> String {
    "train".into()
}
fn default_search_length() -> u32 {
    10
}
fn default_scan_length() -> u32 {
    50
}

/// How problem HTML is turned into markdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversionMode {
    /// Fixed ordered tag substitutions.
    #[default]
    Substitution,
    /// Full HTML→Markdown conversion via `htmd`.
    Rich,
}

/// `[notebook]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotebookConfig {
    /// Starter-code language labels to look for, in preference order.
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Base URL for links to similar problems.
    #[serde(default = "default_problem_link_base")]
    pub problem_link_base: String,

    /// Problem description conversion mode.
    #[serde(default)]
    pub conversion: ConversionMode,
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            problem_link_base: default_problem_link_base(),
            conversion: ConversionMode::default(),
        }
    }
}

fn default_languages() -> Vec<String> {
    vec!["Python3".into(), "Python".into()]
}
fn default_problem_link_base() -> String {
    "https://leetcode.com/problems".into()
}

// ---------------------------------------------------------------------------
// Fetch config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime fetch configuration for both remote APIs.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Primary API base URL (no trailing slash).
    pub api_base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Dataset settings; `None` disables the fallback.
    pub dataset: Option<DatasetConfig>,
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_base_url: config.api.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.api.timeout_secs,
            dataset: config.dataset.enabled.then(|| config.dataset.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.leettutor/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| LeetTutorError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.leettutor/leettutor.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LeetTutorError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        LeetTutorError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| LeetTutorError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| LeetTutorError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| LeetTutorError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
