//! Access rule configuration
//!
//! The access file is a nested TOML document. Keys are looked up by dotted
//! path, so `modules.servicedesk.create` walks three tables. A key that
//! itself contains dots (`"servicedesk.*" = 0`) is matched literally before
//! the path is split.
//!
//! ```toml
//! [modules.servicedesk]
//! "*" = "NORMAL"
//! staffsettings = "HIGHGM"
//!
//! [features]
//! SeeAccountID = 2
//! ```

use std::path::Path;

use toml::{Table, Value};

use super::{ConfigError, ConfigResult};
use crate::access::AccessLevel;

/// Owned access configuration document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessConfig {
    root: Table,
}

/// Borrowed view of one table inside an [`AccessConfig`]
#[derive(Debug, Clone, Copy)]
pub struct ConfigSection<'a> {
    table: &'a Table,
}

/// Find a value by dotted key, trying the literal key first at each level
fn lookup<'a>(table: &'a Table, key: &str) -> Option<&'a Value> {
    if let Some(value) = table.get(key) {
        return Some(value);
    }

    let (head, rest) = key.split_once('.')?;
    match table.get(head)? {
        Value::Table(inner) => lookup(inner, rest),
        _ => None,
    }
}

/// Interpret a config value as an access level
///
/// Anything that is not an integer in range or a level name is treated as
/// absent.
fn level_of(key: &str, value: &Value) -> Option<AccessLevel> {
    match value {
        Value::Integer(n) => match i32::try_from(*n) {
            Ok(level) => Some(AccessLevel::new(level)),
            Err(_) => {
                tracing::warn!("Access level for '{}' out of range: {}", key, n);
                None
            }
        },
        Value::String(s) => match s.parse() {
            Ok(level) => Some(level),
            Err(_) => {
                tracing::warn!("Unknown access level name for '{}': {:?}", key, s);
                None
            }
        },
        Value::Table(_) => None,
        other => {
            tracing::warn!(
                "Access level for '{}' has wrong type: {}",
                key,
                other.type_str()
            );
            None
        }
    }
}

impl<'a> ConfigSection<'a> {
    /// Get the access level stored under a dotted key
    pub fn get(&self, key: &str) -> Option<AccessLevel> {
        lookup(self.table, key).and_then(|value| level_of(key, value))
    }

    /// Get a nested table, `None` if absent or not a table
    pub fn section(&self, key: &str) -> Option<ConfigSection<'a>> {
        match lookup(self.table, key)? {
            Value::Table(table) => Some(ConfigSection { table }),
            _ => None,
        }
    }

    /// Check whether any value exists under a dotted key
    pub fn contains(&self, key: &str) -> bool {
        lookup(self.table, key).is_some()
    }

    /// Top-level keys of this section in document order
    pub fn keys(&self) -> impl Iterator<Item = &'a str> {
        self.table.keys().map(|k| k.as_str())
    }
}

impl AccessConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already parsed TOML table
    pub fn from_table(root: Table) -> Self {
        Self { root }
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let root: Table = toml::from_str(content)?;
        Ok(Self { root })
    }

    /// Load from file. A missing file yields `None`.
    pub fn load_from(path: &Path) -> ConfigResult<Option<Self>> {
        if !path.exists() {
            tracing::debug!("No access config at {:?}", path);
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded access config from {:?}", path);
        Ok(Some(config))
    }

    /// Save to file, creating parent directories
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(&self.root)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved access config to {:?}", path);
        Ok(())
    }

    /// View of the whole document
    pub fn root(&self) -> ConfigSection<'_> {
        ConfigSection { table: &self.root }
    }

    /// Get the access level stored under a dotted key
    pub fn get(&self, key: &str) -> Option<AccessLevel> {
        self.root().get(key)
    }

    /// Get a nested table, `None` if absent or not a table
    pub fn section(&self, key: &str) -> Option<ConfigSection<'_>> {
        self.root().section(key)
    }

    /// Check whether any value exists under a dotted key
    pub fn contains(&self, key: &str) -> bool {
        self.root().contains(key)
    }

    /// Store an access level under a dotted key
    ///
    /// Missing intermediate tables are created. Fails when the path runs
    /// through an existing non-table value or has an empty segment.
    pub fn set(&mut self, key: &str, level: AccessLevel) -> ConfigResult<()> {
        let segments: Vec<&str> = key.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ConfigError::InvalidKey(key.to_string()));
        }

        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| ConfigError::InvalidKey(key.to_string()))?;

        let mut table = &mut self.root;
        for segment in parents {
            let entry = table
                .entry(segment.to_string())
                .or_insert_with(|| Value::Table(Table::new()));
            table = match entry {
                Value::Table(inner) => inner,
                _ => return Err(ConfigError::InvalidKey(key.to_string())),
            };
        }

        table.insert(last.to_string(), Value::Integer(level.value().into()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[modules.servicedesk]
"*" = "NORMAL"
staffsettings = 2

[modules.account]
create = -1
view = "bogus"
edit = true

[features]
SeeAccountID = "HIGHGM"
"#;

    #[test]
    fn test_nested_lookup() {
        let config = AccessConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(
            config.get("modules.servicedesk.*"),
            Some(AccessLevel::NORMAL)
        );
        assert_eq!(
            config.get("modules.servicedesk.staffsettings"),
            Some(AccessLevel::HIGHGM)
        );
        assert_eq!(
            config.get("modules.account.create"),
            Some(AccessLevel::UNAUTH)
        );
        assert_eq!(config.get("features.SeeAccountID"), Some(AccessLevel::HIGHGM));
    }

    #[test]
    fn test_wrong_types_are_absent() {
        let config = AccessConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.get("modules.account.view"), None);
        assert_eq!(config.get("modules.account.edit"), None);
        // A table is not a level
        assert_eq!(config.get("modules.account"), None);
        assert!(config.contains("modules.account.edit"));
    }

    #[test]
    fn test_section() {
        let config = AccessConfig::from_toml_str(SAMPLE).unwrap();

        let modules = config.section("modules").unwrap();
        assert_eq!(modules.get("servicedesk.*"), Some(AccessLevel::NORMAL));
        assert!(config.section("modules.servicedesk.*").is_none());
        assert!(config.section("missing").is_none());

        let keys: Vec<&str> = modules.keys().collect();
        assert!(keys.contains(&"servicedesk"));
        assert!(keys.contains(&"account"));
    }

    #[test]
    fn test_literal_dotted_key() {
        let config = AccessConfig::from_toml_str("[modules]\n\"servicedesk.*\" = 0\n").unwrap();

        let modules = config.section("modules").unwrap();
        assert_eq!(modules.get("servicedesk.*"), Some(AccessLevel::NORMAL));
        assert_eq!(modules.get("servicedesk.create"), None);
    }

    #[test]
    fn test_set_creates_tables() {
        let mut config = AccessConfig::new();
        config
            .set("modules.ranking.character", AccessLevel::ANYONE)
            .unwrap();

        assert_eq!(
            config.get("modules.ranking.character"),
            Some(AccessLevel::ANYONE)
        );
        assert!(config.section("modules.ranking").is_some());
    }

    #[test]
    fn test_set_rejects_bad_keys() {
        let mut config = AccessConfig::from_toml_str(SAMPLE).unwrap();

        assert!(matches!(
            config.set("", AccessLevel::ADMIN),
            Err(ConfigError::InvalidKey(_))
        ));
        assert!(matches!(
            config.set("modules..x", AccessLevel::ADMIN),
            Err(ConfigError::InvalidKey(_))
        ));
        assert!(matches!(
            config.set("modules.account.edit.deeper", AccessLevel::ADMIN),
            Err(ConfigError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configs").join("access.toml");

        assert!(AccessConfig::load_from(&path).unwrap().is_none());

        let mut config = AccessConfig::new();
        config.set("features.ViewAccount", AccessLevel::LOWGM).unwrap();
        config.save_to(&path).unwrap();

        let loaded = AccessConfig::load_from(&path).unwrap().unwrap();
        assert_eq!(loaded.get("features.ViewAccount"), Some(AccessLevel::LOWGM));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            AccessConfig::from_toml_str("[modules"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
