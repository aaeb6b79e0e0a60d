use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};

/// Optional configuration file (`repoaudit.toml`) supplying defaults for the
/// command-line flags. Flags always win over file values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitHubConfig {
    /// GitHub personal access token
    pub auth: Option<String>,

    /// Repository owner/organization
    pub owner: Option<String>,

    /// Repository name
    pub repo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AuditConfig {
    /// Read previously fetched data from the local cache when present
    #[serde(default)]
    pub use_cache: bool,

    /// Maximum number of workflow runs to fetch
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Restrict workflow runs to a branch
    pub branch: Option<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            use_cache: false,
            limit: default_limit(),
            branch: None,
        }
    }
}

fn default_limit() -> usize {
    300
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| AuditError::Config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Loads configuration from `path` when the file exists, otherwise
    /// returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
