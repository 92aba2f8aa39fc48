//! Config flag helpers used by the derive macro.
//!
//! These helpers construct the optional `--config-path` CLI argument and ensure
//! that it does not collide with user-defined fields or custom flag metadata.

use std::collections::HashSet;

use quote::{quote, quote_spanned};
use syn::Ident;

use crate::derive::parse::StructAttrs;

use super::cli::{validate_cli_long, validate_user_cli_short};

pub(crate) fn build_config_flag_field(
    struct_attrs: &StructAttrs,
    used_shorts: &HashSet<char>,
    used_longs: &HashSet<String>,
    existing_fields: &HashSet<String>,
) -> syn::Result<proc_macro2::TokenStream> {
    let name = Ident::new("config_path", proc_macro2::Span::call_site());
    if existing_fields.contains("config_path") {
        return Err(syn::Error::new_spanned(
            &name,
            "generated config flag field conflicts with user-defined field 'config_path'",
        ));
    }
    let discovery = struct_attrs.discovery.as_ref();
    let long = discovery
        .and_then(|attrs| attrs.config_cli_long.clone())
        .unwrap_or_else(|| String::from("config-path"));
    validate_cli_long(&name, &long)?;
    if used_longs.contains(&long) {
        return Err(syn::Error::new_spanned(
            &name,
            format!("duplicate `cli_long` value '{long}' conflicts with the generated config flag",),
        ));
    }
    let long_lit = syn::LitStr::new(&long, proc_macro2::Span::call_site());
    let mut arg_meta: Vec<proc_macro2::TokenStream> = vec![quote! { long = #long_lit }];
    if let Some(short) = discovery.and_then(|attrs| attrs.config_cli_short) {
        let claimed = validate_user_cli_short(&name, short, used_shorts)?;
        let short_lit = syn::LitChar::new(claimed, proc_macro2::Span::call_site());
        arg_meta.push(quote! { short = #short_lit });
    }
    let visible = discovery
        .and_then(|attrs| attrs.config_cli_visible)
        .unwrap_or(false);
    if !visible {
        arg_meta.push(quote! { hide = true });
    }
    arg_meta.push(quote! { value_name = "PATH" });
    if visible {
        arg_meta.push(quote! { help = "Path to the configuration file" });
    }
    let span = name.span();
    let serde_attr = quote_spanned! { span => #[serde(skip_serializing_if = "Option::is_none")] };
    Ok(quote_spanned! { span =>
        #[arg( #( #arg_meta ),* )]
        #serde_attr
        pub config_path: Option<std::path::PathBuf>
    })
}
