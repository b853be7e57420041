//! Configuration system for fluxpanel
//!
//! Three TOML files live in the configs directory:
//! - `panel.toml` - panel settings ([`PanelConfig`]), created with defaults
//!   when missing
//! - `access.toml` - access rules ([`AccessConfig`]), optional
//! - `groups.toml` - the account group table, optional
//!
//! # Example
//!
//! ```ignore
//! use fluxpanel_core::config::{configs_dir, ConfigFile, PanelConfig};
//!
//! fn load_settings() {
//!     let dir = configs_dir().unwrap();
//!     let panel = PanelConfig::load_in(&dir).unwrap_or_default();
//!     println!("Results per page: {}", panel.results_per_page);
//! }
//! ```

mod access;
mod loader;

use std::path::Path;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::access::{Group, GroupError, GroupTable};

pub use access::{AccessConfig, ConfigSection};
pub use loader::{
    access_config_path, configs_dir, groups_config_path, panel_config_path, panel_home_dir,
    ACCESS_CONFIG_FILE, GROUPS_CONFIG_FILE, HOME_ENV, PANEL_CONFIG_FILE,
};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Could not determine config directory
    #[error("Config directory not available - FLUXPANEL_HOME is set but empty")]
    NoConfigDirectory,

    /// Dotted key is empty or runs through a non-table value
    #[error("Invalid config key: {0:?}")]
    InvalidKey(String),

    /// Group table file is inconsistent
    #[error("Invalid group table: {0}")]
    Groups(#[from] GroupError),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Trait for settings files stored in the configs directory.
///
/// Implementors get loading with default generation, saving and reloading.
pub trait ConfigFile: Default + Serialize + DeserializeOwned + Send + Sync {
    /// File name inside the configs directory
    const FILE_NAME: &'static str;

    /// Read config from `configs` without creating anything, `None` if missing.
    fn read_in(configs: &Path) -> ConfigResult<Option<Self>> {
        let path = configs.join(Self::FILE_NAME);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!("Loaded {} from {:?}", Self::FILE_NAME, path);
        Ok(Some(config))
    }

    /// Load config from `configs`, creating the default file if missing.
    fn load_in(configs: &Path) -> ConfigResult<Self> {
        if let Some(config) = Self::read_in(configs)? {
            return Ok(config);
        }

        let default = Self::default();
        default.save_in(configs)?;
        tracing::info!(
            "Created default {} at {:?}",
            Self::FILE_NAME,
            configs.join(Self::FILE_NAME)
        );
        Ok(default)
    }

    /// Save config into `configs`, creating the directory if needed.
    fn save_in(&self, configs: &Path) -> ConfigResult<()> {
        std::fs::create_dir_all(configs)?;

        let path = configs.join(Self::FILE_NAME);
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        tracing::debug!("Saved {} to {:?}", Self::FILE_NAME, path);
        Ok(())
    }

    /// Reload config from `configs`, replacing self with the file contents.
    fn reload_in(&mut self, configs: &Path) -> ConfigResult<()> {
        let path = configs.join(Self::FILE_NAME);
        let content = std::fs::read_to_string(&path)?;
        *self = toml::from_str(&content)?;
        tracing::debug!("Reloaded {} from {:?}", Self::FILE_NAME, path);
        Ok(())
    }
}

/// Panel settings.
///
/// Loaded from `configs/panel.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// Rows shown per page in admin listings
    pub results_per_page: u32,

    /// Page numbers shown at once in the page list
    pub pages_to_show: u32,

    /// Render the page list even when there is only one page
    pub show_single_page: bool,

    /// Render the page-jump input under the page list
    pub show_page_jump: bool,

    /// Page jump is only shown when there are more pages than this
    pub page_jump_min_pages: u32,

    /// Suffix appended to a column header sorted ascending
    pub column_sort_ascending: String,

    /// Suffix appended to a column header sorted descending
    pub column_sort_descending: String,

    /// Result summary template with `{total}`, `{pages}`, `{first}` and
    /// `{last}` placeholders
    pub found_search_results: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            results_per_page: 20,
            pages_to_show: 10,
            show_single_page: false,
            show_page_jump: true,
            page_jump_min_pages: 1,
            column_sort_ascending: " ▲".to_string(),
            column_sort_descending: " ▼".to_string(),
            found_search_results: "Found a total of {total} record(s) across {pages} page(s).  \
                                   Displaying result(s) #{first}-{last}."
                .to_string(),
        }
    }
}

impl ConfigFile for PanelConfig {
    const FILE_NAME: &'static str = PANEL_CONFIG_FILE;
}

#[derive(Deserialize)]
struct GroupsFile {
    #[serde(default)]
    groups: Vec<Group>,
}

/// Load the group table from `configs/groups.toml`.
///
/// A missing file yields the built-in table.
pub fn load_groups(configs: &Path) -> ConfigResult<GroupTable> {
    let path = groups_config_path(configs);

    if !path.exists() {
        tracing::debug!("No group table at {:?}, using built-in groups", path);
        return Ok(GroupTable::builtin());
    }

    let content = std::fs::read_to_string(&path)?;
    let file: GroupsFile = toml::from_str(&content)?;
    let table = GroupTable::from_groups(file.groups)?;
    tracing::debug!("Loaded {} groups from {:?}", table.len(), path);
    Ok(table)
}

/// Load access rules from `configs/access.toml`, `None` when missing.
pub fn load_access_config(configs: &Path) -> ConfigResult<Option<AccessConfig>> {
    AccessConfig::load_from(&access_config_path(configs))
}
