//! Access level scale and sentinels
//!
//! Levels are plain integers ordered by privilege, with two sentinels mixed
//! into the scale: `ANYONE` always passes and `UNAUTH` only passes on an
//! exact match.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Numeric privilege tier of an account group or an access rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccessLevel(i32);

impl AccessLevel {
    /// Always allowed, regardless of caller level
    pub const ANYONE: Self = Self(-2);
    /// Matches only callers that are not logged in
    pub const UNAUTH: Self = Self(-1);
    /// Regular player accounts
    pub const NORMAL: Self = Self(0);
    /// Low-ranking game masters
    pub const LOWGM: Self = Self(1);
    /// High-ranking game masters
    pub const HIGHGM: Self = Self(2);
    /// Administrators
    pub const ADMIN: Self = Self(99);
    /// Unreachable, denies everyone
    pub const NOONE: Self = Self(9999);

    const NAMED: [(&'static str, Self); 7] = [
        ("ANYONE", Self::ANYONE),
        ("UNAUTH", Self::UNAUTH),
        ("NORMAL", Self::NORMAL),
        ("LOWGM", Self::LOWGM),
        ("HIGHGM", Self::HIGHGM),
        ("ADMIN", Self::ADMIN),
        ("NOONE", Self::NOONE),
    ];

    /// Wrap a raw level value
    pub const fn new(level: i32) -> Self {
        Self(level)
    }

    /// Raw level value
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Name of a reserved level, if this is one
    pub fn name(self) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(_, level)| *level == self)
            .map(|(name, _)| *name)
    }

    /// Whether a rule requiring `self` lets a caller at `caller` through.
    ///
    /// `ANYONE` always passes, an exact match always passes (including
    /// `UNAUTH`), otherwise the rule must not be `UNAUTH` and must not exceed
    /// the caller's level.
    pub fn permits(self, caller: AccessLevel) -> bool {
        self == Self::ANYONE || self == caller || (self != Self::UNAUTH && self <= caller)
    }
}

impl Default for AccessLevel {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl From<i32> for AccessLevel {
    fn from(level: i32) -> Self {
        Self(level)
    }
}

impl From<AccessLevel> for i32 {
    fn from(level: AccessLevel) -> Self {
        level.0
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Error returned when a level string is neither a known name nor an integer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown access level: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for AccessLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some((_, level)) = Self::NAMED
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
        {
            return Ok(*level);
        }

        trimmed
            .parse::<i32>()
            .map(Self)
            .map_err(|_| ParseLevelError(s.to_string()))
    }
}

impl Serialize for AccessLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for AccessLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum NumberOrName {
            Number(i64),
            Name(String),
        }

        match NumberOrName::deserialize(deserializer)? {
            NumberOrName::Number(n) => i32::try_from(n)
                .map(Self)
                .map_err(|_| serde::de::Error::custom(format!("level out of range: {}", n))),
            NumberOrName::Name(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}
