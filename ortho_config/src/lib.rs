#![cfg_attr(docsrs, feature(doc_cfg))]

//! Core crate for the layered configuration engine.
//!
//! The primary surface is [`engine`]: an ordered element store, importers for
//! the cstyle/legacy/XML formats, reference resolution, command-line parsing,
//! fact-based conditional inclusion, and registered-parameter refresh.
//!
//! The crate also carries the teacher's original figment/clap-based
//! declarative `OrthoConfig` derive API, gated behind the `declarative_api`
//! feature (off by default): a lighter-weight alternative for callers who
//! only need flat CLI/env/file precedence merging with no inheritance,
//! reference or fact-condition semantics. The engine above does not depend on
//! it in any way.

#[cfg(all(feature = "yaml", not(feature = "serde_json")))]
compile_error!("The `serde_json` feature must be enabled when `yaml` support is active.");

#[cfg(feature = "declarative_api")]
pub use ortho_config_macros::OrthoConfig;
#[cfg(all(feature = "declarative_api", feature = "serde_json"))]
#[cfg_attr(docsrs, doc(cfg(feature = "serde_json")))]
pub use ortho_config_macros::SelectedSubcommandMerge;

#[cfg(feature = "declarative_api")]
pub use figment;
#[cfg(all(feature = "declarative_api", feature = "json5"))]
#[cfg_attr(docsrs, doc(cfg(feature = "json5")))]
pub use figment_json5;
#[cfg(all(feature = "declarative_api", feature = "json5"))]
#[cfg_attr(docsrs, doc(cfg(feature = "json5")))]
pub use json5;
#[cfg(all(feature = "declarative_api", feature = "serde_json"))]
pub use serde_json;
#[cfg(all(feature = "declarative_api", feature = "yaml"))]
#[cfg_attr(docsrs, doc(cfg(feature = "yaml")))]
pub use serde_saphyr;
#[cfg(all(feature = "declarative_api", feature = "toml"))]
#[cfg_attr(docsrs, doc(cfg(feature = "toml")))]
pub use toml;
#[cfg(feature = "declarative_api")]
pub use uncased;
#[cfg(all(feature = "declarative_api", any(unix, target_os = "redox")))]
#[cfg_attr(docsrs, doc(cfg(any(unix, target_os = "redox"))))]
pub use xdg;

#[cfg(feature = "declarative_api")]
mod csv_env;
#[cfg(all(feature = "declarative_api", feature = "serde_json"))]
#[cfg_attr(docsrs, doc(cfg(feature = "serde_json")))]
pub mod declarative;
#[cfg(feature = "declarative_api")]
pub mod discovery;
pub mod engine;
#[cfg(feature = "declarative_api")]
mod error;
#[cfg(feature = "declarative_api")]
pub mod file;
#[cfg(feature = "declarative_api")]
mod localizer;
#[cfg(feature = "declarative_api")]
mod merge;
#[cfg(feature = "declarative_api")]
mod post_merge;
#[cfg(feature = "declarative_api")]
mod result_ext;
#[cfg(feature = "declarative_api")]
pub mod subcommand;
#[cfg(all(feature = "declarative_api", feature = "serde_json"))]
#[cfg_attr(docsrs, doc(cfg(feature = "serde_json")))]
pub use crate::subcommand::SubcmdConfigMerge;
#[cfg(all(feature = "declarative_api", feature = "serde_json"))]
#[cfg_attr(docsrs, doc(cfg(feature = "serde_json")))]
pub use result_ext::OrthoJsonMergeExt;
#[cfg(feature = "declarative_api")]
pub use result_ext::{IntoFigmentError, OrthoMergeExt, OrthoResultExt, ResultIntoFigment};
#[cfg(all(feature = "declarative_api", feature = "serde_json"))]
#[cfg_attr(docsrs, doc(cfg(feature = "serde_json")))]
pub use subcommand::{
    LoadGlobalsAndSelectedSubcommandError, SelectedSubcommandMerge, SelectedSubcommandMergeError,
    load_globals_and_merge_selected_subcommand,
};
#[cfg(all(feature = "declarative_api", feature = "serde_json"))]
#[cfg_attr(docsrs, doc(cfg(feature = "serde_json")))]
pub use subcommand::{
    load_and_merge_subcommand, load_and_merge_subcommand_for,
    load_and_merge_subcommand_for_with_matches, load_and_merge_subcommand_with_matches,
};

/// Normalize a prefix by trimming trailing underscores and converting
/// to lowercase ASCII.
///
/// # Examples
///
/// ```rust
/// use ortho_config::normalize_prefix;
///
/// assert_eq!(normalize_prefix("FOO__"), "foo");
/// assert_eq!(normalize_prefix("foo"), "foo");
/// assert_eq!(normalize_prefix("Another_App_"), "another_app");
/// assert_eq!(normalize_prefix("___"), "");
/// assert_eq!(normalize_prefix("FÖÖ_"), "fÖÖ"); // ASCII-only lowercasing; non-ASCII remains unchanged
/// ```
#[cfg(feature = "declarative_api")]
#[must_use]
pub fn normalize_prefix(prefix: &str) -> String {
    prefix.trim_end_matches('_').to_ascii_lowercase()
}

#[cfg(feature = "declarative_api")]
pub use csv_env::CsvEnv;
#[cfg(all(feature = "declarative_api", feature = "serde_json"))]
#[cfg_attr(docsrs, doc(cfg(feature = "serde_json")))]
pub use declarative::{DeclarativeMerge, MergeComposer, MergeLayer, MergeProvenance};
#[cfg(feature = "declarative_api")]
pub use discovery::{ConfigDiscovery, ConfigDiscoveryBuilder, DiscoveryLoadOutcome};
#[cfg(feature = "declarative_api")]
pub use error::{OrthoError, is_display_request};
#[cfg(feature = "declarative_api")]
pub use file::load_config_file;
#[cfg(feature = "declarative_api")]
pub use localizer::{
    FluentBundleSource, FluentLocalizer, FluentLocalizerBuilder, FluentLocalizerError,
    FormattingIssue, LocalizationArgs, Localizer, NoOpLocalizer, clap_error_formatter,
    localize_clap_error, localize_clap_error_with_command,
};
/// Re-export sanitization helpers used to strip `None` fields and produce a
/// Figment provider.
///
/// # Examples
///
/// ```rust,no_run
/// use ortho_config::{sanitize_value, sanitized_provider, OrthoResult};
/// #[derive(serde::Serialize)]
/// struct CLI { flag: Option<()> }
///
/// # fn main() -> OrthoResult<()> {
/// let cli = CLI { flag: None };
/// let provider = sanitized_provider(&cli)?; // ready to merge over defaults
/// let _json = sanitize_value(&cli)?;        // raw serialized value with `None`s removed
/// # let _ = provider;
/// # Ok(())
/// # }
/// ```
#[cfg(all(feature = "declarative_api", feature = "serde_json"))]
pub use merge::{CliValueExtractor, sanitize_value, sanitized_provider, value_without_nones};
#[cfg(feature = "declarative_api")]
pub use post_merge::{PostMergeContext, PostMergeHook};
#[cfg(feature = "declarative_api")]
use std::sync::Arc;
#[cfg(feature = "declarative_api")]
pub use unic_langid::{LanguageIdentifier, langid};

/// Trait implemented for structs that represent application configuration.
#[cfg(feature = "declarative_api")]
pub trait OrthoConfig: Sized + serde::de::DeserializeOwned {
    /// Loads configuration from command-line arguments, environment variables
    /// and configuration files using the standard precedence rules.
    ///
    /// Command-line arguments have the highest precedence, followed by
    /// environment variables and finally configuration files. Default values
    /// specified via `#[ortho_config(default = ...)]` sit at the lowest
    /// precedence level.
    ///
    /// ```rust,no_run
    /// use ortho_config::{OrthoConfig, OrthoResult};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize, OrthoConfig)]
    /// struct AppConfig {
    ///     port: u16,
    /// }
    ///
    /// # fn main() -> OrthoResult<()> {
    /// let _cfg = AppConfig::load()?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an [`crate::OrthoError`] if parsing command-line arguments, reading
    /// files or deserializing configuration fails.
    fn load() -> OrthoResult<Self> {
        Self::load_from_iter(std::env::args_os())
    }

    /// Loads configuration from the provided iterator of command-line
    /// arguments.
    ///
    /// # Errors
    ///
    /// Returns an [`crate::OrthoError`] if parsing command-line arguments, reading
    /// files or deserializing configuration fails.
    fn load_from_iter<I, T>(iter: I) -> OrthoResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone;

    /// Prefix used for environment variables and subcommand configuration.
    #[must_use]
    // Intentionally non-const so implementations can read runtime information.
    fn prefix() -> &'static str {
        ""
    }
}

/// Canonical result type for public APIs in this crate.
///
/// Errors are wrapped in an `Arc` to reduce the size of `Result` and avoid
/// `clippy::result_large_err` on public signatures while keeping rich error
/// variants internally. This keeps call-sites lightweight and encourages cheap
/// cloning while propagating errors.
#[cfg(feature = "declarative_api")]
pub type OrthoResult<T> = std::result::Result<T, Arc<OrthoError>>;
