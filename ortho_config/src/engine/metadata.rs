//! Parameter metadata (spec §3.1 C3): the schema a registered parameter or
//! a loaded element carries — type, help text, suggested values, the
//! restriction it must satisfy, and the command-line switch that binds it.

use crate::engine::value::TypeTag;

/// A restriction a parameter's decoded value must satisfy (spec §3.1 C3).
#[derive(Debug, Clone, PartialEq)]
pub enum Restriction {
    /// An inclusive numeric range, compared against the decoded integer or
    /// float value.
    Range {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// The textual value must be one of these alternatives.
    Enum(Vec<String>),
    /// The textual value must match this regular expression.
    Regex(String),
}

impl Restriction {
    /// The textual form used for strict metadata equivalence (spec §4.3)
    /// and for round-tripping through `\restriction` (spec §4.4).
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Range { min, max } => format!("{min}..{max}"),
            Self::Enum(values) => values.join("|"),
            Self::Regex(pattern) => pattern.clone(),
        }
    }

    /// Parse a `\restriction` directive's value (spec §4.4): `min..max` for
    /// a range, a `/pattern/` for a regex, otherwise a `|`-separated enum.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if let Some(inner) = trimmed.strip_prefix('/').and_then(|r| r.strip_suffix('/')) {
            return Self::Regex(inner.to_owned());
        }
        if let Some((min, max)) = trimmed.split_once("..") {
            if let (Ok(min), Ok(max)) = (min.trim().parse(), max.trim().parse()) {
                return Self::Range { min, max };
            }
        }
        Self::Enum(trimmed.split('|').map(str::trim).map(str::to_owned).collect())
    }
}

/// Schema for a single parameter (spec §3.1 C3).
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    /// Fully-qualified dotted name.
    pub name: String,
    /// Which [`crate::engine::value::Value`] variant this parameter holds.
    pub type_tag: TypeTag,
    /// Help text shown in `-help` and written as `//!` comments on export.
    pub help: Option<String>,
    /// The suggested default value, used in lenient/autosave checking
    /// modes and to synthesize `DEFAULT_OPTIONAL` elements.
    pub suggested_default: Option<String>,
    /// A suggested reference expression, used the same way as
    /// `suggested_default` but for reference-typed parameters.
    pub suggested_reference: Option<String>,
    /// Whether the application may run without this parameter present.
    pub optional: bool,
    /// The `-switch` name this parameter binds to on the command line.
    pub cmdline_switch: Option<String>,
    /// The value restriction, if any.
    pub restriction: Option<Restriction>,
    /// A user comment attached to this parameter's declaration.
    pub comment: Option<String>,
    /// Set on metadata synthesized from an override/cmdline element before
    /// its full schema was known (spec §3.1 "Override element"); such
    /// metadata is exempt from the strict equivalence check (spec §4.6
    /// step 2e).
    pub incomplete: bool,
}

impl Metadata {
    /// A minimal, complete metadata value, useful for tests and for
    /// programmatically-registered parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            type_tag,
            help: None,
            suggested_default: None,
            suggested_reference: None,
            optional: false,
            cmdline_switch: None,
            restriction: None,
            comment: None,
            incomplete: false,
        }
    }

    /// Metadata synthesized for an override/cmdline element ahead of its
    /// full schema (spec §3.1).
    #[must_use]
    pub fn incomplete(name: impl Into<String>) -> Self {
        Self {
            incomplete: true,
            ..Self::new(name, TypeTag::Str)
        }
    }

    /// Relaxed equivalence (spec §4.3): `type` and `name` match.
    #[must_use]
    pub fn relaxed_equivalent(&self, other: &Self) -> bool {
        self.name == other.name && self.type_tag == other.type_tag
    }

    /// Strict equivalence (spec §4.3): relaxed, plus help, default,
    /// suggested reference, optional flag, restriction textual form, and
    /// command-line switch all match.
    #[must_use]
    pub fn strict_equivalent(&self, other: &Self) -> bool {
        self.relaxed_equivalent(other)
            && self.help == other.help
            && self.suggested_default == other.suggested_default
            && self.suggested_reference == other.suggested_reference
            && self.optional == other.optional
            && self.cmdline_switch == other.cmdline_switch
            && self.restriction_text() == other.restriction_text()
    }

    fn restriction_text(&self) -> Option<String> {
        self.restriction.as_ref().map(Restriction::to_text)
    }
}
