//! Behavioural step modules registered with `rstest-bdd`.

#[cfg(feature = "serde_json")]
pub mod cli_default_as_absent_steps;
pub mod cli_steps;
pub mod collection_steps;
pub mod config_path_steps;
pub mod env_steps;
pub mod error_steps;
pub mod extends_steps;
#[cfg(feature = "serde_json")]
pub mod flatten_steps;
pub mod ignore_steps;
pub mod localizer_steps;
#[cfg(feature = "serde_json")]
pub mod merge_composer_steps;
#[cfg(feature = "serde_json")]
pub mod merge_error_steps;
#[cfg(feature = "serde_json")]
pub mod subcommand_steps;
