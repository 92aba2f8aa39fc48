//! Crate path resolution for dependency aliasing support.
//!
//! Converts the optional `#[ortho_config(crate = "...")]` attribute value
//! into a `TokenStream` that replaces hardcoded `ortho_config::` paths in
//! generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Resolve the crate path from the parsed struct attribute.
///
/// Defaults to `ortho_config` when no override is present. When the user
/// specifies `#[ortho_config(crate = "...")]`, the returned tokens
/// reference types through the aliased dependency name instead.
///
/// # Examples
///
/// ```rust,ignore
/// let default = resolve(None);
/// assert_eq!(default.to_string(), "ortho_config");
///
/// let path: syn::Path = syn::parse_str("my_alias").unwrap();
/// let aliased = resolve(Some(&path));
/// assert_eq!(aliased.to_string(), "my_alias");
/// ```
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { ortho_config }, |path| quote! { #path })
}
