//! Access resolver
//!
//! [`Authorization`] owns the access config and answers action and feature
//! checks for a caller level. It is constructed once at startup and shared
//! by reference with every request handler.

use dashmap::DashSet;
use parking_lot::RwLock;

use super::decision::{resolve_action, resolve_feature, ActionAccess, DEFAULT_ACTION};
use super::features::AccessFeature;
use crate::access::{AccessLevel, GroupTable};
use crate::config::{AccessConfig, ConfigResult};

/// Access config section holding `module.action` rules
pub const MODULES_SECTION: &str = "modules";

/// Access config section holding feature rules
pub const FEATURES_SECTION: &str = "features";

/// The account making a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    /// Account id, `None` when not logged in
    pub account_id: Option<u32>,
    /// Group id, `None` when not logged in
    pub group_id: Option<i32>,
    /// Resolved access level
    pub level: AccessLevel,
}

impl Caller {
    /// A caller that is not logged in
    pub fn anonymous() -> Self {
        Self {
            account_id: None,
            group_id: None,
            level: AccessLevel::UNAUTH,
        }
    }

    /// A logged-in caller whose level comes from the group table
    pub fn from_group(account_id: u32, group_id: i32, groups: &GroupTable) -> Self {
        Self {
            account_id: Some(account_id),
            group_id: Some(group_id),
            level: groups.level(group_id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.account_id.is_some()
    }
}

/// Resolves access rules against caller levels
#[derive(Debug)]
pub struct Authorization {
    /// Access config, `None` when no access file exists
    config: RwLock<Option<AccessConfig>>,

    /// Action keys already reported as having no rule
    reported: DashSet<String>,
}

impl Authorization {
    /// Create a resolver over an access config
    pub fn new(config: Option<AccessConfig>) -> Self {
        Self {
            config: RwLock::new(config),
            reported: DashSet::new(),
        }
    }

    /// Create a resolver without any access rules
    pub fn empty() -> Self {
        Self::new(None)
    }

    /// Check whether a caller at `level` may run `module.action`.
    ///
    /// Returns [`ActionAccess::NoRule`] when neither `module.action` nor
    /// `module.*` is configured; that case is logged once per key.
    pub fn action_allowed(&self, module: &str, action: &str, level: AccessLevel) -> ActionAccess {
        let result = {
            let config = self.config.read();
            let modules = config.as_ref().and_then(|c| c.section(MODULES_SECTION));
            resolve_action(modules, module, action, level)
        };

        tracing::debug!("Access to {}.{} at level {}: {}", module, action, level, result);

        if result.is_no_rule() && self.reported.insert(format!("{}.{}", module, action)) {
            tracing::warn!(
                "No access rule for {}.{} - add one to the [modules.{}] table",
                module,
                action,
                module
            );
        }

        result
    }

    /// Check access to a module's default action
    pub fn module_allowed(&self, module: &str, level: AccessLevel) -> ActionAccess {
        self.action_allowed(module, DEFAULT_ACTION, level)
    }

    /// Check whether a caller at `level` may use a feature by config key
    pub fn feature_allowed(&self, feature: &str, level: AccessLevel) -> bool {
        let config = self.config.read();
        let features = config.as_ref().and_then(|c| c.section(FEATURES_SECTION));
        resolve_feature(features, feature, level)
    }

    /// Check a typed feature
    pub fn allowed_to<F: AccessFeature>(&self, feature: F, level: AccessLevel) -> bool {
        self.feature_allowed(feature.key(), level)
    }

    /// Level configured for a feature, if any
    pub fn feature_level(&self, feature: &str) -> Option<AccessLevel> {
        let config = self.config.read();
        config
            .as_ref()
            .and_then(|c| c.section(FEATURES_SECTION))
            .and_then(|section| section.get(feature))
    }

    /// Level configured for a typed feature, if any
    pub fn level_to<F: AccessFeature>(&self, feature: F) -> Option<AccessLevel> {
        self.feature_level(feature.key())
    }

    /// Read a level from the access config by dotted key
    pub fn config(&self, key: &str) -> Option<AccessLevel> {
        self.config.read().as_ref().and_then(|c| c.get(key))
    }

    /// Store a level in the access config by dotted key
    ///
    /// Creates an empty config first when none is loaded.
    pub fn set_config(&self, key: &str, level: AccessLevel) -> ConfigResult<()> {
        let mut config = self.config.write();
        config.get_or_insert_with(AccessConfig::new).set(key, level)?;
        tracing::debug!("Access rule {} set to {}", key, level);
        Ok(())
    }

    /// Swap the whole access config
    pub fn replace_config(&self, config: Option<AccessConfig>) {
        *self.config.write() = config;
        self.reported.clear();
        tracing::debug!("Access config replaced");
    }

    /// Check if any access config is loaded
    pub fn has_config(&self) -> bool {
        self.config.read().is_some()
    }

    /// Bind a caller for repeated checks
    pub fn for_caller<'a>(&'a self, caller: &'a Caller) -> CallerAccess<'a> {
        CallerAccess { auth: self, caller }
    }
}

impl Default for Authorization {
    fn default() -> Self {
        Self::empty()
    }
}

/// Access checks bound to one caller
#[derive(Clone, Copy)]
pub struct CallerAccess<'a> {
    auth: &'a Authorization,
    caller: &'a Caller,
}

impl<'a> CallerAccess<'a> {
    pub fn caller(&self) -> &'a Caller {
        self.caller
    }

    pub fn action_allowed(&self, module: &str, action: &str) -> ActionAccess {
        self.auth.action_allowed(module, action, self.caller.level)
    }

    pub fn module_allowed(&self, module: &str) -> ActionAccess {
        self.auth.module_allowed(module, self.caller.level)
    }

    pub fn feature_allowed(&self, feature: &str) -> bool {
        self.auth.feature_allowed(feature, self.caller.level)
    }

    pub fn allowed_to<F: AccessFeature>(&self, feature: F) -> bool {
        self.auth.allowed_to(feature, self.caller.level)
    }

    pub fn level_to<F: AccessFeature>(&self, feature: F) -> Option<AccessLevel> {
        self.auth.level_to(feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Group;
    use crate::auth::PanelFeature;

    const ACCESS: &str = r#"
[modules.main]
"*" = "ANYONE"

[modules.account]
create = "UNAUTH"
login = "UNAUTH"
view = "NORMAL"
"*" = "ADMIN"

[modules.servicedesk]
"*" = 0
staffindex = 1

[features]
SeeAccountID = "HIGHGM"
ViewAccount = "LOWGM"
SDStaff = 1
"#;

    fn auth() -> Authorization {
        Authorization::new(Some(AccessConfig::from_toml_str(ACCESS).unwrap()))
    }

    #[test]
    fn test_wildcard_allows_lower_rule() {
        let auth = auth();
        assert_eq!(
            auth.action_allowed("servicedesk", "create", AccessLevel::LOWGM),
            ActionAccess::Allowed
        );
    }

    #[test]
    fn test_anyone_everywhere() {
        let auth = auth();
        for level in [-2, -1, 0, 1, 2, 99, 9999] {
            assert_eq!(
                auth.action_allowed("main", "index", AccessLevel::new(level)),
                ActionAccess::Allowed
            );
        }
    }

    #[test]
    fn test_unauth_only_exact() {
        let auth = auth();
        assert_eq!(
            auth.action_allowed("account", "login", AccessLevel::UNAUTH),
            ActionAccess::Allowed
        );
        // Logged-in users fall through to the ADMIN wildcard
        assert_eq!(
            auth.action_allowed("account", "login", AccessLevel::HIGHGM),
            ActionAccess::Denied
        );
        assert_eq!(
            auth.action_allowed("account", "login", AccessLevel::ADMIN),
            ActionAccess::Allowed
        );
    }

    #[test]
    fn test_exact_key_precedence() {
        let auth = auth();
        assert_eq!(
            auth.action_allowed("account", "view", AccessLevel::NORMAL),
            ActionAccess::Allowed
        );
        assert_eq!(
            auth.action_allowed("account", "edit", AccessLevel::NORMAL),
            ActionAccess::Denied
        );
    }

    #[test]
    fn test_no_rule() {
        let auth = auth();
        assert_eq!(
            auth.action_allowed("ranking", "character", AccessLevel::ADMIN),
            ActionAccess::NoRule
        );
        // Repeated checks keep returning the same result
        assert_eq!(
            auth.action_allowed("ranking", "character", AccessLevel::ADMIN),
            ActionAccess::NoRule
        );
        assert!(auth.reported.contains("ranking.character"));
    }

    #[test]
    fn test_absent_config() {
        let auth = Authorization::empty();
        assert!(!auth.has_config());
        assert_eq!(
            auth.action_allowed("main", "index", AccessLevel::ADMIN),
            ActionAccess::NoRule
        );
        assert!(!auth.feature_allowed("ViewAccount", AccessLevel::ADMIN));
        assert_eq!(auth.feature_level("ViewAccount"), None);
    }

    #[test]
    fn test_modules_section_wrong_type() {
        let auth = Authorization::new(Some(
            AccessConfig::from_toml_str("modules = 5\nfeatures = \"all\"\n").unwrap(),
        ));
        assert_eq!(
            auth.action_allowed("main", "index", AccessLevel::ADMIN),
            ActionAccess::NoRule
        );
        assert!(!auth.feature_allowed("ViewAccount", AccessLevel::ADMIN));
    }

    #[test]
    fn test_module_allowed_uses_index() {
        let auth = auth();
        assert_eq!(
            auth.module_allowed("servicedesk", AccessLevel::NORMAL),
            ActionAccess::Allowed
        );
        assert_eq!(
            auth.module_allowed("servicedesk", AccessLevel::UNAUTH),
            ActionAccess::Denied
        );
    }

    #[test]
    fn test_features() {
        let auth = auth();
        assert!(auth.feature_allowed("SeeAccountID", AccessLevel::ADMIN));
        assert!(!auth.feature_allowed("SeeAccountID", AccessLevel::LOWGM));
        assert!(!auth.feature_allowed("NoSuchFeature", AccessLevel::ADMIN));

        assert!(auth.allowed_to(PanelFeature::ViewAccount, AccessLevel::LOWGM));
        assert!(!auth.allowed_to(PanelFeature::ViewAccount, AccessLevel::NORMAL));
        assert_eq!(
            auth.level_to(PanelFeature::SeeAccountId),
            Some(AccessLevel::HIGHGM)
        );
        assert_eq!(auth.level_to(PanelFeature::EditAccountBalance), None);
    }

    #[test]
    fn test_set_and_replace_config() {
        let auth = Authorization::empty();
        auth.set_config("modules.ranking.*", AccessLevel::ANYONE)
            .unwrap();

        assert!(auth.has_config());
        assert_eq!(auth.config("modules.ranking.*"), Some(AccessLevel::ANYONE));
        assert_eq!(
            auth.action_allowed("ranking", "guild", AccessLevel::UNAUTH),
            ActionAccess::Allowed
        );

        auth.replace_config(None);
        assert_eq!(
            auth.action_allowed("ranking", "guild", AccessLevel::UNAUTH),
            ActionAccess::NoRule
        );
    }

    #[test]
    fn test_caller_binding() {
        let auth = auth();
        let groups = GroupTable::from_groups([
            Group::new(0, "Player", AccessLevel::NORMAL),
            Group::new(2, "Support", AccessLevel::LOWGM),
        ])
        .unwrap();

        let support = Caller::from_group(2000001, 2, &groups);
        let access = auth.for_caller(&support);
        assert!(support.is_authenticated());
        assert_eq!(access.caller().level, AccessLevel::LOWGM);
        assert_eq!(
            access.action_allowed("servicedesk", "staffindex"),
            ActionAccess::Allowed
        );
        assert!(access.allowed_to(PanelFeature::ServiceDeskStaff));
        assert!(access.feature_allowed("ViewAccount"));
        assert_eq!(
            access.level_to(PanelFeature::ServiceDeskStaff),
            Some(AccessLevel::LOWGM)
        );

        // Unknown group falls back to NORMAL
        let stray = Caller::from_group(2000002, 42, &groups);
        assert_eq!(stray.level, AccessLevel::NORMAL);
        let stray_access = auth.for_caller(&stray);
        // The LOWGM rule rejects it, the NORMAL wildcard then admits it
        assert_eq!(
            stray_access.action_allowed("servicedesk", "staffindex"),
            ActionAccess::Allowed
        );
        assert_eq!(
            stray_access.action_allowed("account", "edit"),
            ActionAccess::Denied
        );
        assert!(!stray_access.allowed_to(PanelFeature::ServiceDeskStaff));

        let guest = Caller::anonymous();
        assert!(!guest.is_authenticated());
        assert_eq!(
            auth.for_caller(&guest).module_allowed("servicedesk"),
            ActionAccess::Denied
        );
        assert_eq!(
            auth.for_caller(&guest).action_allowed("account", "create"),
            ActionAccess::Allowed
        );
    }
}
