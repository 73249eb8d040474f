use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name searched for in the working directory and the user config directory.
pub const CONFIG_FILE_NAME: &str = "get-build-number.toml";

/// Represents the complete configuration for get-build-number.
///
/// Contains the names of the CI variables to read and the storage settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub environment: EnvironmentConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Names of the environment variables that describe the current CI run.
///
/// Defaults follow Cirrus CI plus the variables the storage release needs.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub branch: String,
    pub default_branch: String,
    pub change_id: String,
    pub pull_request: String,
    pub token: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub release_id: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        EnvironmentConfig {
            branch: "BRANCH".to_string(),
            default_branch: "CIRRUS_DEFAULT_BRANCH".to_string(),
            change_id: "CIRRUS_CHANGE_IN_REPO".to_string(),
            pull_request: "CIRRUS_PR".to_string(),
            token: "GITHUB_TOKEN".to_string(),
            repo_owner: "CIRRUS_REPO_OWNER".to_string(),
            repo_name: "CIRRUS_REPO_NAME".to_string(),
            release_id: "RELEASE_ID_FOR_STORAGE".to_string(),
        }
    }
}

/// Where the build counters are persisted
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackend {
    #[default]
    GithubRelease,
    File,
}

/// Storage settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// JSON file used by the `file` backend
    pub path: String,
    pub api_url: String,
    pub user_agent: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            backend: StorageBackend::GithubRelease,
            path: "build-numbers.json".to_string(),
            api_url: "https://api.github.com".to_string(),
            user_agent: "get-build-number".to_string(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `get-build-number.toml` in current directory
/// 3. `get-build-number.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);

    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if local.exists() {
        fs::read_to_string(local)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
