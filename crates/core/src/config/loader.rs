//! Config path resolution
//!
//! Handles resolving paths for configuration files based on the panel's
//! home directory.

use std::path::{Path, PathBuf};

use super::{ConfigError, ConfigResult};

/// Environment variable overriding the panel home directory
pub const HOME_ENV: &str = "FLUXPANEL_HOME";

/// Panel settings file name
pub const PANEL_CONFIG_FILE: &str = "panel.toml";

/// Access rules file name
pub const ACCESS_CONFIG_FILE: &str = "access.toml";

/// Group table file name
pub const GROUPS_CONFIG_FILE: &str = "groups.toml";

/// Returns the panel home directory.
///
/// Uses `FLUXPANEL_HOME` when set, otherwise the current working directory.
pub fn panel_home_dir() -> ConfigResult<PathBuf> {
    match std::env::var_os(HOME_ENV) {
        Some(home) if home.is_empty() => Err(ConfigError::NoConfigDirectory),
        Some(home) => Ok(PathBuf::from(home)),
        None => Ok(std::env::current_dir()?),
    }
}

/// Returns the base configs directory.
///
/// Path: `{home}/configs/`
pub fn configs_dir() -> ConfigResult<PathBuf> {
    Ok(panel_home_dir()?.join("configs"))
}

/// Path: `{configs}/panel.toml`
pub fn panel_config_path(configs: &Path) -> PathBuf {
    configs.join(PANEL_CONFIG_FILE)
}

/// Path: `{configs}/access.toml`
pub fn access_config_path(configs: &Path) -> PathBuf {
    configs.join(ACCESS_CONFIG_FILE)
}

/// Path: `{configs}/groups.toml`
pub fn groups_config_path(configs: &Path) -> PathBuf {
    configs.join(GROUPS_CONFIG_FILE)
}
