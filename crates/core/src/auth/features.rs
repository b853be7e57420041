//! Named panel features
//!
//! Features are binary toggles gated by the `[features]` table of the access
//! config. Each feature enum maps its variants to config keys through
//! `#[derive(AccessFeature)]`, so call sites name features by type instead of
//! by string.

use fluxpanel_macros::AccessFeature;

/// A set of feature toggles addressable by config key
pub trait AccessFeature: Copy + Sized + 'static {
    /// Every feature in declaration order
    const ALL: &'static [Self];

    /// Config key under the `[features]` table
    fn key(self) -> &'static str;

    /// Find a feature by config key, ignoring ASCII case
    fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|feature| feature.key().eq_ignore_ascii_case(key))
    }
}

/// Features used by the stock panel pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AccessFeature)]
pub enum PanelFeature {
    ViewAccount,
    ViewAccountBanLog,
    #[access(key = "SeeAccountID")]
    SeeAccountId,
    SeeAccountPassword,
    #[access(key = "EditAccountGroupID")]
    EditAccountGroupId,
    EditAccountBalance,
    ModifyAccountPrefs,
    ViewCharacter,
    SeeCharacterAccount,
    #[access(key = "SDStaff")]
    ServiceDeskStaff,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        assert_eq!(PanelFeature::ViewAccount.key(), "ViewAccount");
        assert_eq!(PanelFeature::SeeAccountId.key(), "SeeAccountID");
        assert_eq!(PanelFeature::ServiceDeskStaff.key(), "SDStaff");
    }

    #[test]
    fn test_all_in_declaration_order() {
        assert_eq!(PanelFeature::ALL.len(), 10);
        assert_eq!(PanelFeature::ALL[0], PanelFeature::ViewAccount);
        assert_eq!(PanelFeature::ALL[9], PanelFeature::ServiceDeskStaff);
    }

    #[test]
    fn test_from_key_case_insensitive() {
        assert_eq!(
            PanelFeature::from_key("seeaccountid"),
            Some(PanelFeature::SeeAccountId)
        );
        assert_eq!(
            PanelFeature::from_key("SDSTAFF"),
            Some(PanelFeature::ServiceDeskStaff)
        );
        assert_eq!(PanelFeature::from_key("SeeAccountId2"), None);
    }
}
