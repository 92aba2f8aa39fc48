//! The loaded-data store (spec §4.2, C4): an ordered, typed container of
//! every element an importer or the command-line parser can produce,
//! precedence-aware and insertion-order preserving.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::engine::error::{Diagnostic, EngineError, EngineResult};
use crate::engine::fact::FactMap;
use crate::engine::location::{SourceClass, StorageLocation};
use crate::engine::metadata::Metadata;

/// A loaded parameter (spec §3.1 "Parameter element").
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterElement {
    /// The parameter's current textual value.
    pub value: String,
    /// The schema bound to this value.
    pub metadata: Metadata,
    /// Where this value came from, including its precedence class.
    pub location: StorageLocation,
    /// An overridden value plus the source it came from, preserved so the
    /// exporter can reproduce the override line (spec invariant 7).
    pub override_value: Option<(String, SourceClass)>,
    /// Set when this element was synthesized by inheritance expansion
    /// (spec §4.2.4): the parent section's fully-qualified name.
    pub inherited_parameter_name: Option<String>,
}

impl ParameterElement {
    /// Construct a fresh parameter element with no override annotation.
    #[must_use]
    pub fn new(value: impl Into<String>, metadata: Metadata, location: StorageLocation) -> Self {
        Self {
            value: value.into(),
            metadata,
            location,
            override_value: None,
            inherited_parameter_name: None,
        }
    }
}

/// A loaded reference (spec §3.1 "Reference element").
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceElement {
    /// The unparsed reference expression (spec §4.3 grammar).
    pub reference_expr: String,
    /// The schema the resolved parameter will carry.
    pub metadata: Metadata,
    /// Where this reference was declared.
    pub location: StorageLocation,
}

/// A dev-overlay or cmdline override awaiting its canonical declaration
/// (spec §3.1 "Override element").
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideElement {
    /// Fully-qualified name.
    pub name: String,
    /// The overriding textual value.
    pub value: String,
    /// Where the override was declared.
    pub location: StorageLocation,
}

/// An `#include "name"` element.
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeElement {
    /// The included config's base name.
    pub included_name: String,
    /// Where the `#include` directive appeared.
    pub location: StorageLocation,
}

/// A `#search "path"` element.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPathElement {
    /// The search path.
    pub path: String,
    /// Where the `#search` directive appeared.
    pub location: StorageLocation,
}

/// A `#map` entry (spec §3.1 "Mapping element", invariant 5).
#[derive(Debug, Clone, PartialEq)]
pub struct MappingElement {
    /// The name being mapped.
    pub from: String,
    /// The directory the mapped name resolves to, if any.
    pub mapped_dir: Option<String>,
    /// The name the mapping resolves to.
    pub mapped_name: String,
    /// Where the mapping was declared; `null` for a synthesized identity
    /// mapping (invariant 5), so the exporter never re-emits it.
    pub location: StorageLocation,
}

/// A `#define` element.
#[derive(Debug, Clone, PartialEq)]
pub struct DefineElement {
    /// The fact being defined.
    pub fact_name: String,
    /// Its value.
    pub fact_value: String,
    /// Where the `#define` appeared.
    pub location: StorageLocation,
}

/// An `add_inherited_section` declaration (spec §3.1 "Inheritance
/// element").
#[derive(Debug, Clone, PartialEq)]
pub struct InheritanceElement {
    /// The section being inherited from.
    pub parent_section: String,
    /// The section inheriting.
    pub child_section: String,
    /// Where `namespace child : parent { ... }` appeared.
    pub location: StorageLocation,
}

/// A single element, tagged by kind, as exposed by
/// [`Store::elements_in_total_order`] (spec §3.2: "Total order over all
/// kinds is exposed for export").
#[derive(Debug, Clone)]
pub enum Element<'a> {
    /// A define (spec §4.5 step 2).
    Define(&'a DefineElement),
    /// An override awaiting its canonical declaration.
    Override(&'a OverrideElement),
    /// A mapping table entry.
    Mapping(&'a MappingElement),
    /// A search path.
    SearchPath(&'a SearchPathElement),
    /// An include.
    Include(&'a IncludeElement),
    /// A subconfig template parameter.
    SubconfigTemplate(&'a ParameterElement),
    /// An inheritance declaration.
    Inheritance(&'a InheritanceElement),
    /// A parameter.
    Parameter(&'a ParameterElement),
    /// A reference.
    Reference(&'a ReferenceElement),
}

/// The ordered, typed container of all loaded elements (spec C4).
#[derive(Debug, Clone, Default)]
pub struct Store {
    parameters: IndexMap<String, ParameterElement>,
    references: IndexMap<String, ReferenceElement>,
    overrides: IndexMap<String, OverrideElement>,
    includes: IndexMap<String, IncludeElement>,
    search_paths: IndexMap<String, SearchPathElement>,
    mappings: IndexMap<String, MappingElement>,
    defines: IndexMap<String, DefineElement>,
    inheritances: IndexMap<String, InheritanceElement>,
    subconfig_templates: IndexMap<String, ParameterElement>,
    /// Switch name -> value, populated by the command-line parser (spec
    /// §4.2.1 "a matching command-line switch was captured").
    cmdline_switches: std::collections::BTreeMap<String, String>,
    facts: FactMap,
    /// Reference names awaiting resolution (spec §4.2.2).
    pending_references: indexmap::IndexSet<String>,
    /// Non-fatal diagnostics accumulated during ingest (spec §4.2, §7.2),
    /// drained into a [`crate::engine::error::RefreshResult`] by refresh.
    diagnostics: Vec<Diagnostic>,
}

impl Store {
    /// An empty store with no facts defined.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The fact map accumulated from `#define`s so far.
    #[must_use]
    pub fn facts(&self) -> &FactMap {
        &self.facts
    }

    /// Record the command-line switch values captured by the cmdline
    /// parser (spec C11), consulted by [`Store::add_parameter`] and
    /// [`Store::add_reference`].
    pub fn set_cmdline_switches(&mut self, switches: std::collections::BTreeMap<String, String>) {
        self.cmdline_switches = switches;
    }

    /// Register a `#define fact_name fact_value` (spec §4.4), growing the
    /// fact map (spec invariant 4).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Ingest`] if the fact is already defined with
    /// a different value, or is the empty string.
    pub fn add_define(&mut self, element: DefineElement) -> EngineResult<()> {
        self.facts
            .insert(element.fact_name.clone(), element.fact_value.clone())
            .map_err(|message| {
                Arc::new(EngineError::Ingest {
                    location: element.location.clone(),
                    message,
                })
            })?;
        self.defines.insert(element.fact_name.clone(), element);
        Ok(())
    }

    /// `add_parameter` (spec §4.2.1).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Structural`] when an inherited parameter is
    /// redefined with incompatible metadata.
    pub fn add_parameter(
        &mut self,
        value: impl Into<String>,
        metadata: Metadata,
        location: StorageLocation,
    ) -> EngineResult<()> {
        if !location.facts.is_satisfied_by(&self.facts) {
            return Ok(());
        }
        let value = value.into();
        let name = metadata.name.clone();

        if let Some(installed) = self.install_from_cmdline_switch(&name, &value, &metadata, &location) {
            installed?;
            self.move_parameter_to_back(&name);
            return Ok(());
        }

        let Some(existing) = self.parameters.get(&name).cloned() else {
            if let Some(over) = self.overrides.shift_remove(&name) {
                let mut elem = ParameterElement::new(over.value, metadata, over.location);
                elem.override_value = Some((value, SourceClass::FileOrdinary));
                self.parameters.insert(name.clone(), elem);
            } else {
                self.parameters
                    .insert(name.clone(), ParameterElement::new(value, metadata, location));
            }
            self.move_parameter_to_back(&name);
            return Ok(());
        };

        match existing.location.source {
            SourceClass::InheritedParameter => {
                let same = existing.value == value && existing.metadata.relaxed_equivalent(&metadata);
                if same {
                    return Ok(());
                }
                if !existing.metadata.relaxed_equivalent(&metadata) {
                    let message = format!(
                        "parameter '{name}' redefines inherited parameter with incompatible metadata"
                    );
                    tracing::error!(%message, "ingest failed");
                    return Err(Arc::new(EngineError::Structural(message)));
                }
                self.parameters
                    .insert(name.clone(), ParameterElement::new(value, metadata, location));
            }
            SourceClass::DefaultOptional => {
                self.parameters
                    .insert(name.clone(), ParameterElement::new(value, metadata, location));
            }
            SourceClass::CmdlineOverride | SourceClass::FileDevOverride => {
                let mut elem = existing.clone();
                elem.metadata = metadata;
                elem.override_value = Some((value, SourceClass::FileOrdinary));
                self.parameters.insert(name.clone(), elem);
            }
            _ => {
                tracing::warn!(%name, "dropping duplicate parameter declaration");
                self.diagnostics.push(Diagnostic::LoadedDuplicate { name });
                return Ok(());
            }
        }
        self.move_parameter_to_back(&name);
        Ok(())
    }

    fn install_from_cmdline_switch(
        &mut self,
        name: &str,
        value: &str,
        metadata: &Metadata,
        location: &StorageLocation,
    ) -> Option<EngineResult<()>> {
        let switch = metadata.cmdline_switch.as_ref()?;
        let switch_value = self.cmdline_switches.get(switch)?.clone();
        let mut elem = ParameterElement::new(
            switch_value,
            metadata.clone(),
            location.with_source(SourceClass::CmdlineParam),
        );
        elem.override_value = Some((value.to_owned(), SourceClass::FileOrdinary));
        self.parameters.insert(name.to_owned(), elem);
        Some(Ok(()))
    }

    /// `add_reference` (spec §4.2.2).
    ///
    /// # Errors
    ///
    /// Never fails directly; returns `Ok(())` unless fact filtering drops
    /// the element.
    pub fn add_reference(
        &mut self,
        reference_expr: impl Into<String>,
        metadata: Metadata,
        location: StorageLocation,
    ) -> EngineResult<()> {
        if !location.facts.is_satisfied_by(&self.facts) {
            return Ok(());
        }
        let name = metadata.name.clone();
        let reference_expr = reference_expr.into();

        if let Some(switch) = &metadata.cmdline_switch {
            if let Some(switch_value) = self.cmdline_switches.get(switch).cloned() {
                let elem = ParameterElement::new(
                    switch_value,
                    metadata.clone(),
                    location.with_source(SourceClass::CmdlineParam),
                );
                self.parameters.insert(name.clone(), elem);
                self.move_parameter_to_back(&name);
                self.references.insert(
                    name.clone(),
                    ReferenceElement {
                        reference_expr,
                        metadata,
                        location,
                    },
                );
                return Ok(());
            }
        }

        self.references.insert(
            name.clone(),
            ReferenceElement {
                reference_expr,
                metadata,
                location,
            },
        );
        self.pending_references.insert(name.clone());
        self.move_reference_to_back(&name);
        Ok(())
    }

    /// `add_override` (spec §4.2.3).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Ingest`] when the override arrives after the
    /// name was already declared as an ordinary file parameter or
    /// resolved reference.
    pub fn add_override(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        location: StorageLocation,
    ) -> EngineResult<()> {
        if !location.facts.is_satisfied_by(&self.facts) {
            return Ok(());
        }
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.parameters.get(&name) {
            match existing.location.source {
                SourceClass::DefaultOptional => {
                    let metadata = existing.metadata.clone();
                    self.parameters.insert(
                        name.clone(),
                        ParameterElement::new(
                            value,
                            metadata,
                            location.with_source(SourceClass::FileDevOverride),
                        ),
                    );
                    self.move_parameter_to_back(&name);
                }
                SourceClass::CmdlineParam | SourceClass::CmdlineOverride => {
                    // Higher priority already installed; keep it (§4.2.3).
                }
                _ => {
                    let message = format!("override '{name}' appears after its canonical declaration");
                    tracing::error!(%message, "ingest failed");
                    return Err(Arc::new(EngineError::Ingest { location, message }));
                }
            }
        } else {
            self.overrides.insert(
                name.clone(),
                OverrideElement {
                    name: name.clone(),
                    value,
                    location,
                },
            );
        }
        Ok(())
    }

    /// `add_inherited_section` (spec §4.2.4, decided §4.2.5).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Structural`] if no element under `parent.*`
    /// exists, or if a copy collides with an ordinary file parameter.
    pub fn add_inherited_section(
        &mut self,
        parent: &str,
        child: &str,
        location: StorageLocation,
    ) -> EngineResult<()> {
        let prefix = format!("{parent}.");
        let param_names: Vec<String> = self
            .parameters
            .keys()
            .filter(|n| n.starts_with(&prefix))
            .cloned()
            .collect();
        let reference_names: Vec<String> = self
            .references
            .keys()
            .filter(|n| n.starts_with(&prefix))
            .cloned()
            .collect();
        if param_names.is_empty() && reference_names.is_empty() {
            let message = format!("no declarations found under parent section '{parent}'");
            tracing::error!(%message, "ingest failed");
            return Err(Arc::new(EngineError::Structural(message)));
        }

        for name in param_names {
            let remainder = name
                .strip_prefix(&prefix)
                .unwrap_or_default()
                .to_owned();
            let child_name = format!("{child}.{remainder}");
            let Some(mut elem) = self.parameters.get(&name).cloned() else {
                continue;
            };
            elem.location = location.with_source(SourceClass::InheritedParameter);
            elem.inherited_parameter_name = Some(name.clone());
            elem.metadata.name = child_name.clone();
            self.install_inherited_parameter(&child_name, elem)?;
        }

        for name in reference_names {
            let remainder = name
                .strip_prefix(&prefix)
                .unwrap_or_default()
                .to_owned();
            let child_name = format!("{child}.{remainder}");
            if let Some(reference) = self.references.get(&name).cloned() {
                let mut metadata = reference.metadata;
                metadata.name = child_name.clone();
                self.references.insert(
                    child_name.clone(),
                    ReferenceElement {
                        reference_expr: reference.reference_expr,
                        metadata,
                        location: location.with_source(SourceClass::InheritedParameter),
                    },
                );
                self.pending_references.insert(child_name.clone());
                self.move_reference_to_back(&child_name);
            }
        }

        self.inheritances.insert(
            format!("{parent}->{child}"),
            InheritanceElement {
                parent_section: parent.to_owned(),
                child_section: child.to_owned(),
                location,
            },
        );
        Ok(())
    }

    fn install_inherited_parameter(
        &mut self,
        child_name: &str,
        mut elem: ParameterElement,
    ) -> EngineResult<()> {
        if let Some(existing) = self.parameters.get(child_name) {
            match existing.location.source {
                SourceClass::CmdlineParam | SourceClass::CmdlineOverride | SourceClass::FileDevOverride => {
                    let mut updated = existing.clone();
                    updated.metadata = elem.metadata;
                    updated.inherited_parameter_name = elem.inherited_parameter_name;
                    self.parameters.insert(child_name.to_owned(), updated);
                    return Ok(());
                }
                SourceClass::FileOrdinary => {
                    let message = format!(
                        "inherited parameter '{child_name}' collides with an ordinary declaration"
                    );
                    tracing::error!(%message, "ingest failed");
                    return Err(Arc::new(EngineError::Structural(message)));
                }
                // Decided §4.2.5: a later inheritance from a different
                // parent silently replaces the earlier inherited copy.
                SourceClass::InheritedParameter => {}
                _ => {}
            }
        }
        self.parameters.insert(child_name.to_owned(), elem);
        self.move_parameter_to_back(child_name);
        Ok(())
    }

    /// Record an `#include "name"`.
    pub fn add_include(&mut self, element: IncludeElement) {
        self.includes
            .insert(element.included_name.clone(), element);
    }

    /// Record a `#search "path"`.
    pub fn add_search_path(&mut self, element: SearchPathElement) {
        self.search_paths.insert(element.path.clone(), element);
    }

    /// Map a name, idempotently (spec invariant 5): mapping an unmapped
    /// name returns the name unchanged and records a `null`-location
    /// identity mapping so it is never re-emitted by the exporter.
    pub fn map_name(&mut self, from: &str) -> String {
        if let Some(existing) = self.mappings.get(from) {
            return existing.mapped_name.clone();
        }
        self.mappings.insert(
            from.to_owned(),
            MappingElement {
                from: from.to_owned(),
                mapped_dir: None,
                mapped_name: from.to_owned(),
                location: crate::engine::location::StorageLocation::null_mapping(),
            },
        );
        from.to_owned()
    }

    /// Record an explicit mapping table entry (spec §4.4 `#map`).
    pub fn add_mapping(&mut self, element: MappingElement) {
        self.mappings.insert(element.from.clone(), element);
    }

    /// Add a subconfig-template parameter (spec §3.1): participates in
    /// export, never in refresh.
    pub fn add_subconfig_template(&mut self, element: ParameterElement) {
        self.subconfig_templates
            .insert(element.metadata.name.clone(), element);
    }

    fn move_parameter_to_back(&mut self, name: &str) {
        if let Some(v) = self.parameters.shift_remove(name) {
            self.parameters.insert(name.to_owned(), v);
        }
    }

    fn move_reference_to_back(&mut self, name: &str) {
        if let Some(v) = self.references.shift_remove(name) {
            self.references.insert(name.to_owned(), v);
        }
    }

    /// Look up a loaded parameter by name.
    #[must_use]
    pub fn get_parameter(&self, name: &str) -> Option<&ParameterElement> {
        self.parameters.get(name)
    }

    /// Look up a loaded reference by name.
    #[must_use]
    pub fn get_reference(&self, name: &str) -> Option<&ReferenceElement> {
        self.references.get(name)
    }

    /// Install a parameter produced by the resolution engine (spec §4.3),
    /// bypassing the `add_parameter` dispatch since precedence has
    /// already been checked by the caller.
    pub fn insert_resolved_parameter(&mut self, name: &str, element: ParameterElement) {
        self.parameters.insert(name.to_owned(), element);
        self.move_parameter_to_back(name);
    }

    /// Remove a parameter by name (spec C4 `remove_by_name`); used by
    /// refresh to drop a stale `DEFAULT_OPTIONAL` on deprecated-alias
    /// resolution (spec §4.6 step 2a).
    pub fn remove_parameter(&mut self, name: &str) -> Option<ParameterElement> {
        self.parameters.shift_remove(name)
    }

    /// Iterate all loaded parameters in store order.
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &ParameterElement)> {
        self.parameters.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate all loaded references in store order.
    pub fn references(&self) -> impl Iterator<Item = (&str, &ReferenceElement)> {
        self.references.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Names of references still awaiting resolution (spec §4.2.2).
    #[must_use]
    pub fn pending_references(&self) -> Vec<String> {
        self.pending_references.iter().cloned().collect()
    }

    /// Called by the resolution engine once a reference resolves.
    pub fn mark_reference_resolved(&mut self, name: &str) {
        self.pending_references.shift_remove(name);
    }

    /// Number of loaded parameters.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// Number of loaded references.
    #[must_use]
    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    /// Defines registered so far.
    #[must_use]
    pub fn defines(&self) -> impl Iterator<Item = &DefineElement> {
        self.defines.values()
    }

    /// Overrides awaiting their canonical declaration.
    #[must_use]
    pub fn overrides(&self) -> impl Iterator<Item = &OverrideElement> {
        self.overrides.values()
    }

    /// Mapping table entries, excluding identity mappings recorded with a
    /// `null` location (spec invariant 5).
    #[must_use]
    pub fn mappings(&self) -> impl Iterator<Item = &MappingElement> {
        self.mappings.values().filter(|m| !m.location.null)
    }

    /// Search path entries.
    #[must_use]
    pub fn search_paths(&self) -> impl Iterator<Item = &SearchPathElement> {
        self.search_paths.values()
    }

    /// Include entries.
    #[must_use]
    pub fn includes(&self) -> impl Iterator<Item = &IncludeElement> {
        self.includes.values()
    }

    /// Subconfig template parameters.
    #[must_use]
    pub fn subconfig_templates(&self) -> impl Iterator<Item = &ParameterElement> {
        self.subconfig_templates.values()
    }

    /// Inheritance declarations.
    #[must_use]
    pub fn inheritances(&self) -> impl Iterator<Item = &InheritanceElement> {
        self.inheritances.values()
    }

    /// Diagnostics accumulated during ingest (loaded duplicates), drained
    /// by refresh into its [`crate::engine::error::RefreshResult`].
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Total order over every element kind (spec §3.2), used by the
    /// exporter (spec §4.5) to walk the store once.
    #[must_use]
    pub fn elements_in_total_order(&self) -> Vec<Element<'_>> {
        let mut elements = Vec::with_capacity(self.total_count());
        elements.extend(self.defines.values().map(Element::Define));
        elements.extend(self.overrides.values().map(Element::Override));
        elements.extend(self.mappings.values().map(Element::Mapping));
        elements.extend(self.search_paths.values().map(Element::SearchPath));
        elements.extend(self.includes.values().map(Element::Include));
        elements.extend(
            self.subconfig_templates
                .values()
                .map(Element::SubconfigTemplate),
        );
        elements.extend(self.inheritances.values().map(Element::Inheritance));
        elements.extend(self.parameters.values().map(Element::Parameter));
        elements.extend(self.references.values().map(Element::Reference));
        elements
    }

    /// Total element count across every kind.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.defines.len()
            + self.overrides.len()
            + self.mappings.len()
            + self.search_paths.len()
            + self.includes.len()
            + self.subconfig_templates.len()
            + self.inheritances.len()
            + self.parameters.len()
            + self.references.len()
    }

    /// The element at `index` in [`Store::elements_in_total_order`].
    #[must_use]
    pub fn element_by_total_index(&self, index: usize) -> Option<Element<'_>> {
        self.elements_in_total_order().into_iter().nth(index)
    }
}
