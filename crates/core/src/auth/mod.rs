//! Access rule resolution
//!
//! Decides whether a caller's [`AccessLevel`](crate::access::AccessLevel) is
//! enough for a module action or a feature, using the access config:
//!
//! ```toml
//! [modules.servicedesk]
//! "*" = "NORMAL"        # default for every servicedesk action
//! staffindex = "LOWGM"  # overrides the default for one action
//!
//! [features]
//! SeeAccountID = "HIGHGM"
//! ```
//!
//! # Rules
//!
//! A configured level lets a caller through when it is `ANYONE`, when it
//! equals the caller's level exactly, or when it is not `UNAUTH` and does
//! not exceed the caller's level. `UNAUTH` rules therefore only match callers
//! who are not logged in.
//!
//! Actions check `module.action` then `module.*` and return a tri-state
//! [`ActionAccess`]; `NoRule` means the module declares nothing for the
//! action and is logged as a configuration warning. Features are plain
//! booleans.
//!
//! # Usage
//!
//! ```ignore
//! use fluxpanel_core::auth::{Authorization, Caller, PanelFeature};
//!
//! fn render_account_page(auth: &Authorization, caller: &Caller) {
//!     let access = auth.for_caller(caller);
//!     if !access.action_allowed("account", "view").is_allowed() {
//!         return;
//!     }
//!     if access.allowed_to(PanelFeature::SeeAccountId) {
//!         // show the account id column
//!     }
//! }
//! ```

mod decision;
mod features;
mod resolver;

pub use decision::{
    action_keys, resolve_action, resolve_feature, ActionAccess, DEFAULT_ACTION, WILDCARD_ACTION,
};
pub use features::{AccessFeature, PanelFeature};
pub use resolver::{Authorization, Caller, CallerAccess, FEATURES_SECTION, MODULES_SECTION};
