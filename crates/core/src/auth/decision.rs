//! Access decision types

use std::fmt;

use serde::Serialize;

use crate::access::AccessLevel;
use crate::config::ConfigSection;

/// Action used when a module is requested without one
pub const DEFAULT_ACTION: &str = "index";

/// Wildcard action name matching every action of a module
pub const WILDCARD_ACTION: &str = "*";

/// Outcome of an action access check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionAccess {
    /// A rule exists and the caller's level satisfies it
    Allowed,
    /// At least one rule exists but none is satisfied
    Denied,
    /// Neither the action nor the module declares a rule
    NoRule,
}

impl ActionAccess {
    /// Returns true only for [`ActionAccess::Allowed`]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Returns true when the module declares no rule for the action
    pub fn is_no_rule(self) -> bool {
        matches!(self, Self::NoRule)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::Denied => "denied",
            Self::NoRule => "no rule",
        }
    }
}

impl fmt::Display for ActionAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candidate rule keys for an action, most specific first
pub fn action_keys(module: &str, action: &str) -> [String; 2] {
    [
        format!("{}.{}", module, action),
        format!("{}.{}", module, WILDCARD_ACTION),
    ]
}

/// Resolve an action against the `modules` section of the access config.
///
/// The exact `module.action` rule is consulted before `module.*`; the first
/// rule that lets the caller through wins. A missing section behaves like a
/// section without rules.
pub fn resolve_action(
    modules: Option<ConfigSection<'_>>,
    module: &str,
    action: &str,
    caller: AccessLevel,
) -> ActionAccess {
    let Some(modules) = modules else {
        return ActionAccess::NoRule;
    };

    let mut found_rule = false;
    for key in action_keys(module, action) {
        if let Some(required) = modules.get(&key) {
            found_rule = true;
            if required.permits(caller) {
                return ActionAccess::Allowed;
            }
        }
    }

    if found_rule {
        ActionAccess::Denied
    } else {
        ActionAccess::NoRule
    }
}

/// Resolve a feature against the `features` section of the access config.
///
/// Features are binary: a missing section, a missing key and an unsatisfied
/// rule all deny.
pub fn resolve_feature(
    features: Option<ConfigSection<'_>>,
    feature: &str,
    caller: AccessLevel,
) -> bool {
    features
        .and_then(|section| section.get(feature))
        .map(|required| required.permits(caller))
        .unwrap_or(false)
}
