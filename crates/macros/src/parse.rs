//! Attribute parsing for the AccessFeature derive macro

use darling::{FromDeriveInput, FromVariant};
use syn::{DeriveInput, Ident};

/// Parsed enum carrying `#[access(...)]` variant attributes
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(access), supports(enum_unit))]
pub struct AccessFeatureArgs {
    /// Enum identifier
    pub ident: Ident,

    /// Generics, rejected during codegen
    pub generics: syn::Generics,

    /// Enum variants
    pub data: darling::ast::Data<FeatureVariantArgs, ()>,
}

/// Parsed `#[access(...)]` attributes on a variant
#[derive(Debug, FromVariant)]
#[darling(attributes(access))]
pub struct FeatureVariantArgs {
    /// Variant identifier
    pub ident: Ident,

    /// Config key; the variant name when omitted
    #[darling(default)]
    pub key: Option<String>,
}

impl FeatureVariantArgs {
    /// Config key this variant is looked up under
    pub fn config_key(&self) -> String {
        self.key
            .clone()
            .unwrap_or_else(|| self.ident.to_string())
    }
}

/// Parse a DeriveInput into AccessFeatureArgs
pub fn parse_access_feature(input: &DeriveInput) -> darling::Result<AccessFeatureArgs> {
    AccessFeatureArgs::from_derive_input(input)
}
