//! fluxpanel Proc Macros
//!
//! - `#[derive(AccessFeature)]` - Map a unit enum onto feature keys of the
//!   access config
//!
//! # Example
//!
//! ```ignore
//! use fluxpanel_core::auth::AccessFeature;
//!
//! #[derive(Clone, Copy, AccessFeature)]
//! pub enum ShopFeature {
//!     ViewShop,
//!     #[access(key = "EditShopItemID")]
//!     EditShopItemId,
//! }
//!
//! // Generated:
//! // - ShopFeature::ALL == &[ViewShop, EditShopItemId]
//! // - ShopFeature::EditShopItemId.key() == "EditShopItemID"
//! ```
//!
//! # Attributes
//!
//! - `#[access(key = "ConfigKey")]` - Optional, on a variant. The key looked
//!   up under `[features]`; defaults to the variant name.
//!
//! Keys must be unique ignoring ASCII case.

mod access_feature;
mod parse;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive macro for feature enums
///
/// Implements `fluxpanel_core::auth::AccessFeature`, listing every variant
/// in `ALL` and mapping each one to its config key. Only fieldless enums
/// without generics are accepted.
#[proc_macro_derive(AccessFeature, attributes(access))]
pub fn derive_access_feature(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    access_feature::derive_access_feature(input).into()
}
