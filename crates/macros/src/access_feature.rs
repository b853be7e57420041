//! AccessFeature derive macro implementation

use std::collections::HashMap;

use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::parse::{parse_access_feature, AccessFeatureArgs};

/// Generate the AccessFeature implementation
pub fn derive_access_feature(input: DeriveInput) -> TokenStream {
    match parse_access_feature(&input) {
        Ok(args) => generate_impl(args).unwrap_or_else(|e| e.write_errors()),
        Err(e) => e.write_errors(),
    }
}

fn generate_impl(args: AccessFeatureArgs) -> darling::Result<TokenStream> {
    let enum_name = &args.ident;

    if !args.generics.params.is_empty() {
        return Err(darling::Error::custom("AccessFeature enums cannot be generic")
            .with_span(&args.generics));
    }

    let variants = args
        .data
        .take_enum()
        .ok_or_else(|| darling::Error::unsupported_shape("struct"))?;

    if variants.is_empty() {
        return Err(darling::Error::custom("AccessFeature needs at least one variant")
            .with_span(enum_name));
    }

    // Keys must be unique ignoring case, since lookups ignore case
    let mut errors = darling::Error::accumulator();
    let mut seen: HashMap<String, &syn::Ident> = HashMap::new();
    for variant in &variants {
        let key = variant.config_key();
        if key.is_empty() {
            errors.push(darling::Error::custom("feature key cannot be empty").with_span(&variant.ident));
            continue;
        }
        if let Some(first) = seen.insert(key.to_ascii_lowercase(), &variant.ident) {
            errors.push(
                darling::Error::custom(format!(
                    "feature key `{}` is already used by `{}`",
                    key, first
                ))
                .with_span(&variant.ident),
            );
        }
    }
    errors.finish()?;

    let idents: Vec<_> = variants.iter().map(|v| &v.ident).collect();
    let keys: Vec<_> = variants.iter().map(|v| v.config_key()).collect();

    Ok(quote! {
        impl ::fluxpanel_core::auth::AccessFeature for #enum_name {
            const ALL: &'static [Self] = &[#(Self::#idents),*];

            fn key(self) -> &'static str {
                match self {
                    #(Self::#idents => #keys,)*
                }
            }
        }
    })
}
