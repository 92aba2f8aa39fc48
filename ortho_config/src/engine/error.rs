//! Diagnostics for the engine: a single `thiserror` enum plus the
//! accumulated-diagnostics container used by refresh (spec §7).

use std::sync::Arc;

use thiserror::Error;

use crate::engine::location::StorageLocation;

/// Canonical result type for engine entry points, mirroring the
/// declarative API's `OrthoResult`'s `Arc`-wrapped shape so callers can
/// clone cheaply.
pub type EngineResult<T> = Result<T, Arc<EngineError>>;

/// Errors produced while ingesting, resolving, refreshing or exporting
/// configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// A grammar violation in an importer (spec §7.1): aborts ingest.
    #[error("malformed configuration at {location}: {message}")]
    Ingest {
        /// Where the violation was detected.
        location: StorageLocation,
        /// Human-readable description.
        message: String,
    },

    /// An element referenced a name or mapping that does not exist, or
    /// otherwise violates a structural precondition (e.g. `add_override`
    /// after the target has already been declared).
    #[error("{0}")]
    Structural(String),

    /// A value failed to parse as its declared type (spec §6.3).
    #[error("{what}")]
    Format {
        /// Description of what failed to parse.
        what: String,
    },

    /// An I/O failure while reading or writing a configuration file.
    #[error("I/O error for '{path}': {source}")]
    Io {
        /// Path that triggered the failure.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A command-line token violated the cmdline grammar (spec §4.7).
    #[error("command-line error: {0}")]
    Cmdline(String),

    /// Version translation saw a stored version newer than the registered
    /// one (spec §4.6, §10.5), which is unconditionally fatal.
    #[error("stored version {stored} is newer than registered version {registered}")]
    FutureVersion {
        /// Version recorded in the store.
        stored: u32,
        /// Version the application registered.
        registered: u32,
    },

    /// Multiple load-time diagnostics accumulated during a refresh pass
    /// (spec §7.2).
    #[error("{0}")]
    Aggregate(Box<RefreshResult>),
}

/// One non-fatal diagnostic accumulated during `refresh_all_parameters`
/// (spec §4.6 step 4, §7.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A non-optional registered parameter had no matching loaded value.
    MissingParameter {
        /// Fully-qualified parameter name.
        name: String,
    },
    /// A config's registered subconfig prefix produced no loaded config
    /// object for the referenced sub-path.
    MissingConfig {
        /// Fully-qualified subconfig name.
        name: String,
    },
    /// A second ingest of an element whose source could not be overridden.
    LoadedDuplicate {
        /// Duplicated name.
        name: String,
    },
    /// Registered and loaded metadata diverged under the strict rules
    /// (spec §4.3 "Metadata equivalence").
    MetadataMismatch {
        /// Parameter name.
        name: String,
        /// Description of the mismatching fields.
        detail: String,
    },
    /// A reference never reached a fixpoint (spec P4).
    UnresolvedReference {
        /// Reference name.
        name: String,
    },
    /// A registered parameter was found only under a deprecated alias.
    DeprecatedName {
        /// Name the application registered.
        current: String,
        /// Alias the value was actually loaded under.
        deprecated: String,
    },
    /// A command-line switch or override could not be applied.
    CmdlineError {
        /// Description of the failure.
        detail: String,
    },
    /// A value failed `fromString` against its registered type.
    ParseError {
        /// Parameter name.
        name: String,
        /// Description of the failure.
        detail: String,
    },
    /// A value violated its registered restriction (range/enum/regex).
    RestrictionViolation {
        /// Parameter name.
        name: String,
        /// Description of the violated restriction.
        detail: String,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingParameter { name } => write!(f, "missing parameter '{name}'"),
            Self::MissingConfig { name } => write!(f, "missing config '{name}'"),
            Self::LoadedDuplicate { name } => write!(f, "loaded duplicate '{name}'"),
            Self::MetadataMismatch { name, detail } => {
                write!(f, "metadata mismatch for '{name}': {detail}")
            }
            Self::UnresolvedReference { name } => write!(f, "unresolved reference '{name}'"),
            Self::DeprecatedName {
                current,
                deprecated,
            } => write!(f, "'{current}' loaded from deprecated name '{deprecated}'"),
            Self::CmdlineError { detail } => write!(f, "command-line error: {detail}"),
            Self::ParseError { name, detail } => write!(f, "failed to parse '{name}': {detail}"),
            Self::RestrictionViolation { name, detail } => {
                write!(f, "restriction violated for '{name}': {detail}")
            }
        }
    }
}

/// The checking mode controlling whether load-time diagnostics are fatal,
/// demoted to warnings, or trigger a rewrite on save (spec §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckingMode {
    /// Diagnostics are fatal.
    #[default]
    Strict,
    /// Diagnostics are demoted to warnings; suggested defaults are used.
    Lenient,
    /// As lenient, and additionally marks the store as requiring a save.
    Autosave,
}

impl CheckingMode {
    /// Parse the `AVCONFIG2_NO_STRICT_CHECKING` environment value (spec §6.4).
    #[must_use]
    pub fn from_env_value(value: &str) -> Self {
        match value {
            "1" => Self::Lenient,
            "AUTOSAVE" => Self::Autosave,
            _ => Self::Strict,
        }
    }
}

/// The accumulated diagnostics produced by one `refresh_all_parameters` pass
/// (spec §7.2, §8 P4).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshResult {
    diagnostics: Vec<Diagnostic>,
    /// Set when running under [`CheckingMode::Autosave`] and a diagnostic
    /// that would normally be fatal was instead repaired in memory.
    pub save_required: bool,
}

impl RefreshResult {
    /// Create an empty result.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
            save_required: false,
        }
    }

    /// Record a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Whether any diagnostic was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of recorded diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Iterate the recorded diagnostics in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// All unresolved-reference diagnostics, by name (spec P4).
    #[must_use]
    pub fn unresolved_references(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::UnresolvedReference { name } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Merge `other`'s diagnostics into `self`.
    pub fn extend(&mut self, other: Self) {
        self.save_required |= other.save_required;
        self.diagnostics.extend(other.diagnostics);
    }

    /// Convert to an `Err(EngineError::Aggregate)` if non-empty under
    /// `mode == CheckingMode::Strict`; otherwise returns `Ok(self)` so the
    /// caller can still inspect warnings.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Aggregate`] when `mode` is
    /// [`CheckingMode::Strict`] and at least one diagnostic was recorded.
    pub fn into_checked(self, mode: CheckingMode) -> Result<Self, EngineError> {
        if mode == CheckingMode::Strict && !self.is_empty() {
            Err(EngineError::Aggregate(Box::new(self)))
        } else {
            Ok(self)
        }
    }
}

impl std::fmt::Display for RefreshResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, d) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {d}", i + 1)?;
        }
        Ok(())
    }
}
