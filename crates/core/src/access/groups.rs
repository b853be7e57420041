//! Account group table
//!
//! Maps group ids to a display name and an access level. The table is
//! installed once at startup and only read afterwards, so request handlers
//! can share it freely.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{LazyLock, OnceLock};

use serde::{Deserialize, Serialize};

use super::level::AccessLevel;

/// Name reported for group ids missing from the table
pub const UNKNOWN_GROUP_NAME: &str = "N/A";

/// Group table errors
#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    /// The process-wide table was already installed
    #[error("Group table already installed")]
    AlreadyInstalled,

    /// Two entries share the same group id
    #[error("Duplicate group id: {0}")]
    DuplicateId(i32),
}

/// A named bucket of accounts sharing one access level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i32,
    pub name: String,
    pub level: AccessLevel,
}

impl Group {
    pub fn new(id: i32, name: impl Into<String>, level: AccessLevel) -> Self {
        Self {
            id,
            name: name.into(),
            level,
        }
    }
}

/// Comparison used when selecting groups by level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelComparison {
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
}

impl LevelComparison {
    fn holds(self, level: AccessLevel, against: AccessLevel) -> bool {
        match self {
            Self::Less => level < against,
            Self::Greater => level > against,
            Self::LessOrEqual => level <= against,
            Self::GreaterOrEqual => level >= against,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
        }
    }
}

impl fmt::Display for LevelComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LevelComparison {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<" => Ok(Self::Less),
            ">" => Ok(Self::Greater),
            "<=" => Ok(Self::LessOrEqual),
            ">=" => Ok(Self::GreaterOrEqual),
            other => Err(format!("Unknown comparison operator: {}", other)),
        }
    }
}

/// Read-only mapping from group id to [`Group`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupTable {
    groups: BTreeMap<i32, Group>,
}

impl GroupTable {
    /// Build a table, rejecting duplicate ids
    pub fn from_groups(groups: impl IntoIterator<Item = Group>) -> Result<Self, GroupError> {
        let mut table = BTreeMap::new();
        for group in groups {
            let id = group.id;
            if table.insert(id, group).is_some() {
                return Err(GroupError::DuplicateId(id));
            }
        }
        Ok(Self { groups: table })
    }

    /// The stock group layout shipped with the panel
    pub fn builtin() -> Self {
        let groups = [
            Group::new(0, "Player", AccessLevel::NORMAL),
            Group::new(1, "Super Player", AccessLevel::NORMAL),
            Group::new(2, "Support", AccessLevel::LOWGM),
            Group::new(3, "Script Manager", AccessLevel::LOWGM),
            Group::new(4, "Event Manager", AccessLevel::LOWGM),
            Group::new(5, "VIP", AccessLevel::NORMAL),
            Group::new(10, "Law Enforcement", AccessLevel::HIGHGM),
            Group::new(99, "Admin", AccessLevel::ADMIN),
        ];

        Self {
            groups: groups.into_iter().map(|g| (g.id, g)).collect(),
        }
    }

    /// Look up a group by id
    pub fn get(&self, id: i32) -> Option<&Group> {
        self.groups.get(&id)
    }

    /// Level of a group, `NORMAL` for unknown ids
    pub fn level(&self, id: i32) -> AccessLevel {
        self.get(id).map(|g| g.level).unwrap_or(AccessLevel::NORMAL)
    }

    /// Name of a group, `"N/A"` for unknown ids
    pub fn name(&self, id: i32) -> &str {
        self.get(id).map(|g| g.name.as_str()).unwrap_or(UNKNOWN_GROUP_NAME)
    }

    /// Ids of all groups whose level satisfies `comparison` against `level`
    pub fn ids_where(&self, comparison: LevelComparison, level: AccessLevel) -> Vec<i32> {
        self.groups
            .values()
            .filter(|g| comparison.holds(g.level, level))
            .map(|g| g.id)
            .collect()
    }

    /// Iterate groups in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

static INSTALLED: OnceLock<GroupTable> = OnceLock::new();
static BUILTIN: LazyLock<GroupTable> = LazyLock::new(GroupTable::builtin);

/// Install the process-wide group table
///
/// Called once during startup. Returns an error if a table is already set.
pub fn install_groups(table: GroupTable) -> Result<(), GroupError> {
    let count = table.len();
    INSTALLED
        .set(table)
        .map_err(|_| GroupError::AlreadyInstalled)?;
    tracing::debug!("Installed group table with {} groups", count);
    Ok(())
}

/// Get the process-wide group table, falling back to the built-in layout
pub fn groups() -> &'static GroupTable {
    INSTALLED.get().unwrap_or_else(|| &*BUILTIN)
}

/// Check if a group table has been installed
pub fn is_installed() -> bool {
    INSTALLED.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_table() -> GroupTable {
        GroupTable::from_groups([
            Group::new(0, "Player", AccessLevel::NORMAL),
            Group::new(99, "Admin", AccessLevel::ADMIN),
        ])
        .unwrap()
    }

    #[test]
    fn test_unknown_group_defaults() {
        let table = small_table();
        assert_eq!(table.level(5), AccessLevel::NORMAL);
        assert_eq!(table.name(5), "N/A");
        assert!(table.get(5).is_none());
    }

    #[test]
    fn test_known_group_lookup() {
        let table = small_table();
        assert_eq!(table.level(99), AccessLevel::ADMIN);
        assert_eq!(table.name(99), "Admin");
        assert_eq!(table.name(0), "Player");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = GroupTable::from_groups([
            Group::new(1, "A", AccessLevel::NORMAL),
            Group::new(1, "B", AccessLevel::ADMIN),
        ]);
        assert!(matches!(result, Err(GroupError::DuplicateId(1))));
    }

    #[test]
    fn test_builtin_layout() {
        let table = GroupTable::builtin();
        assert_eq!(table.len(), 8);
        assert_eq!(table.name(10), "Law Enforcement");
        assert_eq!(table.level(10), AccessLevel::HIGHGM);
        assert_eq!(table.level(3), AccessLevel::LOWGM);
    }

    #[test]
    fn test_ids_where() {
        let table = GroupTable::builtin();
        assert_eq!(
            table.ids_where(LevelComparison::GreaterOrEqual, AccessLevel::HIGHGM),
            vec![10, 99]
        );
        assert_eq!(
            table.ids_where(LevelComparison::Less, AccessLevel::LOWGM),
            vec![0, 1, 5]
        );
        assert_eq!(
            table.ids_where(LevelComparison::LessOrEqual, AccessLevel::LOWGM),
            vec![0, 1, 2, 3, 4, 5]
        );
        assert_eq!(
            table.ids_where(LevelComparison::Greater, AccessLevel::ADMIN),
            Vec::<i32>::new()
        );
    }

    #[test]
    fn test_comparison_parse() {
        assert_eq!("<=".parse(), Ok(LevelComparison::LessOrEqual));
        assert_eq!(">".parse(), Ok(LevelComparison::Greater));
        assert!("==".parse::<LevelComparison>().is_err());
    }

    #[test]
    fn test_iter_in_id_order() {
        let ids: Vec<i32> = GroupTable::builtin().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5, 10, 99]);
    }

    #[test]
    fn test_global_table_installs_once() {
        // The table may already be installed by another test in this binary
        let first = install_groups(small_table());
        let second = install_groups(GroupTable::builtin());
        assert!(matches!(second, Err(GroupError::AlreadyInstalled)));
        if first.is_ok() {
            assert_eq!(groups().len(), 2);
        }
        assert!(is_installed());
    }
}
