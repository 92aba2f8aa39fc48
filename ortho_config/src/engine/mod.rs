//! The layered configuration engine (spec §3-§8): an ordered element store,
//! importers for the cstyle, legacy and XML formats, reference resolution,
//! command-line parsing, fact-based conditional inclusion, and registered-
//! parameter refresh.
//!
//! This module is a self-contained engine alongside the crate's existing
//! figment-based [`crate::OrthoConfig`] derive; callers that need the full
//! precedence, reference and refresh semantics of the original
//! `AVConfig2` model use this module directly, while callers who only need
//! declarative struct loading keep using [`crate::OrthoConfig`].

pub mod cmdline;
pub mod cstyle;
pub mod error;
pub mod fact;
pub mod legacy;
pub mod location;
pub mod metadata;
pub mod refresh;
pub mod resolve;
pub mod store;
pub mod value;
pub mod xml;

pub use cmdline::{BuiltinAction, ParsedCmdline, parse_cmdline};
pub use cstyle::{ExportOptions, FormatVersion, OrderPolicy, SaveMode, SaveValueMode, export_cstyle, import_cstyle};
pub use error::{CheckingMode, Diagnostic, EngineError, EngineResult, RefreshResult};
pub use fact::{ConditionStack, FactCondition, FactMap};
pub use legacy::import_legacy;
pub use location::{SourceClass, SourceFormat, StorageLocation};
pub use metadata::{Metadata, Restriction};
pub use refresh::{
    RefreshOutcome, RegisteredConfig, RegisteredParameter, RegisteredSubconfig, SubconfigInstance,
    VersionTranslator, refresh_all_parameters, refresh_to_fixpoint,
};
pub use resolve::resolve_references;
pub use store::{
    DefineElement, Element, IncludeElement, InheritanceElement, MappingElement, OverrideElement,
    ParameterElement, ReferenceElement, SearchPathElement, Store,
};
pub use value::{IntWidth, TypeTag, Value};
pub use xml::{export_xml, import_xml};
