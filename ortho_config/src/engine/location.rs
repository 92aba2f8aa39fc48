//! Storage locations (spec §3.1 C1): an immutable descriptor of where a
//! loaded element came from, carrying its source class and the fact
//! condition stack in effect when it was ingested.

use std::fmt;
use std::path::PathBuf;

use crate::engine::fact::ConditionStack;

/// Where a loaded element came from, in decreasing precedence order
/// (spec §3.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceClass {
    /// Lowest precedence: synthesized for a pure cmdline-only option.
    DefaultPure,
    /// Synthesized for an optional registered parameter with no loaded
    /// value.
    DefaultOptional,
    /// Copied from a parent section by inheritance expansion.
    InheritedParameter,
    /// Produced by the reference-resolution engine.
    ResolvedReference,
    /// Declared inside a namespace in a config file.
    FileOrdinary,
    /// A `name = value;` line in a dev-overlay file, before any section.
    FileDevOverride,
    /// `--name value` on argv.
    CmdlineOverride,
    /// Highest precedence: registered `-switch value` on argv.
    CmdlineParam,
}

impl SourceClass {
    /// Whether `self` strictly outranks `other` under spec §3.3.
    #[must_use]
    pub fn outranks(self, other: Self) -> bool {
        self > other
    }
}

impl fmt::Display for SourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DefaultPure => "DEFAULT_PURE",
            Self::DefaultOptional => "DEFAULT_OPTIONAL",
            Self::InheritedParameter => "INHERITED_PARAMETER",
            Self::ResolvedReference => "RESOLVED_REFERENCE",
            Self::FileOrdinary => "FILE_ORDINARY",
            Self::FileDevOverride => "FILE_DEV_OVERRIDE",
            Self::CmdlineOverride => "CMDLINE_OVERRIDE",
            Self::CmdlineParam => "CMDLINE_PARAM",
        };
        f.write_str(name)
    }
}

/// The textual format an element was loaded from, or synthesized for one
/// that was not loaded from any file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// The canonical hierarchical C-style format (spec §4.4).
    Cstyle,
    /// The legacy INI-like paraset format (spec C8).
    Legacy,
    /// The XML serialization (spec C9).
    Xml,
    /// Supplied on the command line, or synthesized in memory.
    Synthetic,
}

/// An immutable descriptor of where a loaded element came from (spec C1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLocation {
    /// Directory the file was loaded from, if any.
    pub directory: Option<PathBuf>,
    /// The config's base name (without extension), if loaded from a file.
    pub name: Option<String>,
    /// Which textual format produced this element.
    pub format: SourceFormat,
    /// The precedence class this element currently carries.
    pub source: SourceClass,
    /// The fact-condition stack in effect at ingest time (spec §4.1).
    pub facts: ConditionStack,
    /// User comment attached to this element (spec §4.4), if any.
    pub comment: Option<String>,
    /// `true` for the synthetic identity-mapping locations of spec
    /// invariant 5, which the exporter must never re-emit.
    pub null: bool,
}

impl StorageLocation {
    /// A synthetic location for elements with no file origin (cmdline,
    /// defaults, resolved references, inherited copies).
    #[must_use]
    pub fn synthetic(source: SourceClass) -> Self {
        Self {
            directory: None,
            name: None,
            format: SourceFormat::Synthetic,
            source,
            facts: ConditionStack::new(),
            comment: None,
            null: false,
        }
    }

    /// A location tagged `null` (spec invariant 5): recorded but never
    /// re-saved by the exporter.
    #[must_use]
    pub fn null_mapping() -> Self {
        Self {
            null: true,
            ..Self::synthetic(SourceClass::FileOrdinary)
        }
    }

    /// A location for an element loaded from a real file.
    #[must_use]
    pub fn from_file(
        directory: PathBuf,
        name: impl Into<String>,
        format: SourceFormat,
        source: SourceClass,
        facts: ConditionStack,
    ) -> Self {
        Self {
            directory: Some(directory),
            name: Some(name.into()),
            format,
            source,
            facts,
            comment: None,
            null: false,
        }
    }

    /// Return a copy with `source` replaced, used by source-class
    /// transitions (spec §3.5).
    #[must_use]
    pub fn with_source(&self, source: SourceClass) -> Self {
        Self {
            source,
            ..self.clone()
        }
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.directory, &self.name) {
            (Some(dir), Some(name)) => write!(f, "{}/{name} ({})", dir.display(), self.source),
            _ => write!(f, "<{}>", self.source),
        }
    }
}
