//! fluxpanel - Core Logic
//!
//! Access resolution and admin listing pagination for the fluxpanel
//! control panel:
//! - [`access`] - access levels and the account group table
//! - [`auth`] - module action and feature rules
//! - [`config`] - TOML configuration files
//! - [`paging`] - paged, sortable SQL listings and their links

// Allow the crate to refer to itself as `fluxpanel_core` for proc macro compatibility
extern crate self as fluxpanel_core;

use std::path::Path;

use tracing::info;

pub mod access;
pub mod auth;
pub mod config;
pub mod paging;

// Re-export commonly used items
pub use access::{groups, install_groups, AccessLevel, Group, GroupTable, LevelComparison};
pub use auth::{ActionAccess, Authorization, Caller, CallerAccess, PanelFeature};
pub use config::{AccessConfig, ConfigError, ConfigFile, ConfigResult, PanelConfig};
pub use paging::{PagerOptions, Paginator, SortDirection, SortLink, SortableColumn};

// Re-export macros; the trait of the same name lives in `auth`
pub use fluxpanel_macros::AccessFeature;

/// Everything a request handler needs, loaded from one configs directory
#[derive(Debug)]
pub struct Panel {
    pub settings: PanelConfig,
    pub auth: Authorization,
}

impl Panel {
    /// Load settings, group table and access rules from `configs`.
    ///
    /// The group table is installed process-wide on first load; later loads
    /// keep the installed table.
    pub fn load(configs: &Path) -> ConfigResult<Self> {
        let settings = PanelConfig::load_in(configs)?;
        Self::with_settings(settings, configs)
    }

    /// Like [`Panel::load`], with panel settings that are already loaded
    pub fn with_settings(settings: PanelConfig, configs: &Path) -> ConfigResult<Self> {
        let table = config::load_groups(configs)?;
        match install_groups(table) {
            Ok(()) => {}
            Err(access::GroupError::AlreadyInstalled) => {
                tracing::debug!("Group table already installed, keeping it");
            }
            Err(e) => return Err(e.into()),
        }

        let rules = config::load_access_config(configs)?;
        if rules.is_none() {
            tracing::warn!("No access config in {:?}, every action reports no rule", configs);
        }

        info!("fluxpanel loaded from {:?}", configs);
        Ok(Self {
            settings,
            auth: Authorization::new(rules),
        })
    }

    /// Paginator options from the panel settings
    pub fn pager_options(&self) -> PagerOptions {
        PagerOptions::from_panel(&self.settings)
    }

    /// Paginator for one listing request
    pub fn paginator(&self, total: u64, request_uri: &str) -> Paginator {
        Paginator::new(total, request_uri, self.pager_options())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let panel = Panel::load(dir.path()).unwrap();

        // panel.toml is created with defaults
        assert!(config::panel_config_path(dir.path()).exists());
        assert_eq!(panel.settings, PanelConfig::default());
        assert!(!panel.auth.has_config());
        assert_eq!(groups().name(99), "Admin");
    }

    #[test]
    fn test_with_settings_keeps_given_settings() {
        let dir = tempfile::tempdir().unwrap();
        let settings = PanelConfig {
            results_per_page: 7,
            ..PanelConfig::default()
        };

        let panel = Panel::with_settings(settings, dir.path()).unwrap();
        assert_eq!(panel.settings.results_per_page, 7);
        assert_eq!(panel.pager_options().per_page, 7);
        // Settings are not read or written a second time
        assert!(!config::panel_config_path(dir.path()).exists());
    }

    #[test]
    fn test_load_reads_rules() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            config::access_config_path(dir.path()),
            "[modules.account]\nindex = \"LOWGM\"\n",
        )
        .unwrap();

        let panel = Panel::load(dir.path()).unwrap();
        assert!(panel
            .auth
            .action_allowed("account", "index", AccessLevel::HIGHGM)
            .is_allowed());

        let pager = panel.paginator(41, "/account?p=3");
        assert_eq!(pager.number_of_pages(), 3);
        assert_eq!(pager.limit_clause(), "LIMIT 40,20");
    }
}
