//! The pretty-printing exporter for the canonical cstyle format (spec §4.5).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use crate::engine::fact::FactCondition;
use crate::engine::location::SourceClass;
use crate::engine::store::{ParameterElement, Store};

/// Which parameters the exporter writes (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    /// Emit every loaded parameter.
    #[default]
    All,
    /// Emit only the names the caller names as registered.
    OnlyRegistered,
}

/// Which value a registered parameter is written with (spec §4.5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveValueMode {
    /// Write back the value currently held in the store.
    KeepLoadedValues,
    /// Write the caller-supplied in-memory value for each name present in
    /// the map, falling back to the loaded value otherwise.
    AdoptProcessValues(BTreeMap<String, String>),
}

impl Default for SaveValueMode {
    fn default() -> Self {
        Self::KeepLoadedValues
    }
}

/// Whether an overridden parameter is rewritten in place or moved to the
/// end of its namespace (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderPolicy {
    /// Keep each parameter at its original load position.
    #[default]
    Replace,
    /// Move overridden parameters to the end of their namespace.
    Append,
}

/// Options controlling [`export_cstyle`] (spec §4.5).
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Which parameters to emit.
    pub mode: SaveMode,
    /// How to source each parameter's value.
    pub value_mode: SaveValueMode,
    /// How overridden parameters are ordered within their namespace.
    pub order: OrderPolicy,
    /// Names the application registered; consulted when `mode` is
    /// [`SaveMode::OnlyRegistered`].
    pub registered: BTreeSet<String>,
}

/// A dotted-name parameter or reference placed into its namespace position
/// for rendering (spec §4.5 step 3).
enum Leaf<'a> {
    Parameter(&'a ParameterElement),
    Reference(&'a crate::engine::store::ReferenceElement),
}

struct Entry<'a> {
    path: Vec<String>,
    facts: Vec<FactCondition>,
    leaf: Leaf<'a>,
    /// The value to render for a parameter leaf, already resolved against
    /// [`SaveValueMode`]; unused for reference leaves.
    display_value: String,
}

/// Render `store` to cstyle text (spec §4.5).
#[must_use]
pub fn export_cstyle(store: &Store, options: &ExportOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#avconfig_version {}", super::PINNED_VERSION.as_number());
    out.push('\n');

    for define in store.defines() {
        let _ = writeln!(out, "#define {} {}", define.fact_name, define.fact_value);
    }
    if store.defines().next().is_some() {
        out.push('\n');
    }

    render_overrides(store, options, &mut out);

    for mapping in store.mappings() {
        match &mapping.mapped_dir {
            Some(dir) => {
                let _ = writeln!(out, "#map \"{dir}\" {} : {}", mapping.from, mapping.mapped_name);
            }
            None => {
                let _ = writeln!(out, "#map {} : {}", mapping.from, mapping.mapped_name);
            }
        }
    }
    for path in store.search_paths() {
        let _ = writeln!(out, "#search \"{}\"", path.path);
    }
    for include in store.includes() {
        let _ = writeln!(out, "#include \"{}\"", include.included_name);
    }
    out.push('\n');

    render_subconfig_templates(store, &mut out);

    let entries = collect_entries(store, options);
    render_fact_tree(&entries, &[], options.order, &mut out, 0);
    out
}

fn render_overrides(store: &Store, options: &ExportOptions, out: &mut String) {
    for (name, param) in store.parameters() {
        if !include_parameter(options, name, param) {
            continue;
        }
        if param.override_value.is_none() {
            continue;
        }
        // An override line is emitted for every overrideable source,
        // cmdline included: exporting (e.g. on `-save`) snapshots the
        // applied override so it survives a run without the flag (spec §8
        // scenario 1).
        let value = resolved_value(options, name, &param.value);
        let _ = writeln!(out, "{name} = {value};");
    }
    for pending in store.overrides() {
        let _ = writeln!(out, "{} = {};", pending.name, pending.value);
    }
}

fn render_subconfig_templates(store: &Store, out: &mut String) {
    let mut by_template: BTreeMap<String, Vec<&ParameterElement>> = BTreeMap::new();
    for param in store.subconfig_templates() {
        let root = param
            .metadata
            .name
            .split_once('.')
            .map_or_else(|| param.metadata.name.clone(), |(head, _)| head.to_owned());
        by_template.entry(root).or_default().push(param);
    }
    for (template, params) in by_template {
        let _ = writeln!(out, "subconfig_template {template} {{");
        for param in params {
            let remainder = param
                .metadata
                .name
                .strip_prefix(&format!("{template}."))
                .unwrap_or(&param.metadata.name);
            render_parameter_fields(
                remainder,
                &param.metadata,
                &param.value,
                param.location.comment.as_deref(),
                out,
                1,
            );
        }
        let _ = writeln!(out, "}} // subconfig_template {template}");
    }
}

fn include_parameter(options: &ExportOptions, name: &str, param: &ParameterElement) -> bool {
    if param.location.source == SourceClass::InheritedParameter {
        // Regenerated automatically by re-importing the `namespace child :
        // parent` declaration; re-emitting it would duplicate it.
        return false;
    }
    match options.mode {
        SaveMode::All => true,
        SaveMode::OnlyRegistered => options.registered.contains(name),
    }
}

fn resolved_value<'a>(options: &'a ExportOptions, name: &str, loaded: &'a str) -> &'a str {
    match &options.value_mode {
        SaveValueMode::KeepLoadedValues => loaded,
        SaveValueMode::AdoptProcessValues(values) => {
            values.get(name).map_or(loaded, String::as_str)
        }
    }
}

fn collect_entries<'a>(store: &'a Store, options: &'a ExportOptions) -> Vec<Entry<'a>> {
    let mut entries = Vec::new();
    for (name, param) in store.parameters() {
        if !include_parameter(options, name, param) {
            continue;
        }
        if store.get_reference(name).is_some() {
            // The reference declaration is the canonical text for this
            // name; the parameter here is its (possibly overridden)
            // resolved value, handled separately.
            continue;
        }
        // The namespace position always carries this parameter's own
        // declared value, not a higher-precedence override that supersedes
        // it (spec invariant 7): that override is rendered separately by
        // `render_overrides`, in its own location.
        let declared_value = param
            .override_value
            .as_ref()
            .map_or(param.value.as_str(), |(value, _)| value.as_str());
        entries.push(Entry {
            path: name.split('.').map(str::to_owned).collect(),
            facts: param.location.facts.conditions().to_vec(),
            display_value: resolved_value(options, name, declared_value).to_owned(),
            leaf: Leaf::Parameter(param),
        });
    }
    for (name, reference) in store.references() {
        if reference.location.source == SourceClass::InheritedParameter {
            continue;
        }
        entries.push(Entry {
            path: name.split('.').map(str::to_owned).collect(),
            facts: reference.location.facts.conditions().to_vec(),
            display_value: String::new(),
            leaf: Leaf::Reference(reference),
        });
    }
    entries
}

/// Group `entries` by fact-condition stack, opening and closing `#if`
/// blocks around the longest common prefix of conditions shared by
/// consecutive entries (spec §4.5 step 3).
fn render_fact_tree(
    entries: &[Entry<'_>],
    open: &[FactCondition],
    order: OrderPolicy,
    out: &mut String,
    depth: usize,
) {
    // Partition entries whose stack begins with `open` directly at this
    // depth from those that need another `#if` level opened first.
    let mut direct: Vec<&Entry<'_>> = Vec::new();
    let mut by_next_condition: Vec<(FactCondition, Vec<&Entry<'_>>)> = Vec::new();

    for entry in entries {
        if entry.facts.len() == open.len() {
            direct.push(entry);
            continue;
        }
        let next = &entry.facts[open.len()];
        if let Some((_, bucket)) = by_next_condition.iter_mut().find(|(c, _)| c == next) {
            bucket.push(entry);
        } else {
            by_next_condition.push((next.clone(), vec![entry]));
        }
    }

    render_namespace_tree(&direct, 0, order, out, depth);

    for (condition, bucket) in by_next_condition {
        let values: Vec<&str> = condition.allowed_values.iter().map(String::as_str).collect();
        indent(out, depth);
        let _ = writeln!(out, "#if {} == {}", condition.fact_name, values.join("|"));
        let mut next_open = open.to_vec();
        next_open.push(condition);
        let owned: Vec<Entry<'_>> = bucket
            .into_iter()
            .map(|e| Entry {
                path: e.path.clone(),
                facts: e.facts.clone(),
                display_value: e.display_value.clone(),
                leaf: match &e.leaf {
                    Leaf::Parameter(p) => Leaf::Parameter(p),
                    Leaf::Reference(r) => Leaf::Reference(r),
                },
            })
            .collect();
        render_fact_tree(&owned, &next_open, order, out, depth + 1);
        indent(out, depth);
        out.push_str("#endif\n");
    }
}

/// Render the dotted-name namespace tree for `entries`, each of whose
/// `path` has already had its first `skip` segments consumed by an
/// enclosing `namespace` block.
fn render_namespace_tree(
    entries: &[&Entry<'_>],
    skip: usize,
    order: OrderPolicy,
    out: &mut String,
    depth: usize,
) {
    let mut grouped: BTreeMap<&str, Vec<&Entry<'_>>> = BTreeMap::new();
    let mut leaves: Vec<&Entry<'_>> = Vec::new();

    for entry in entries {
        if entry.path.len() - skip <= 1 {
            leaves.push(entry);
            continue;
        }
        grouped.entry(entry.path[skip].as_str()).or_default().push(entry);
    }

    if order == OrderPolicy::Append {
        // Stable-partition so overridden parameters move to the end of
        // their namespace, in load order, instead of their original
        // position (spec §4.5 `OP_APPEND`).
        let (unmoved, moved): (Vec<&Entry<'_>>, Vec<&Entry<'_>>) = leaves
            .into_iter()
            .partition(|e| !matches!(&e.leaf, Leaf::Parameter(p) if p.override_value.is_some()));
        leaves = unmoved;
        leaves.extend(moved);
    }

    for entry in &leaves {
        let name = entry.path.last().map_or("", String::as_str);
        match &entry.leaf {
            Leaf::Parameter(_) => render_parameter_line(name, entry, out, depth),
            Leaf::Reference(reference) => render_reference_line(name, reference, out, depth),
        }
    }

    for (segment, children) in grouped {
        indent(out, depth);
        let _ = writeln!(out, "namespace {segment} {{");
        render_namespace_tree(&children, skip + 1, order, out, depth + 1);
        indent(out, depth);
        let _ = writeln!(out, "}} // namespace {segment}");
    }
}

fn render_parameter_line(name: &str, entry: &Entry<'_>, out: &mut String, depth: usize) {
    let Leaf::Parameter(param) = &entry.leaf else {
        return;
    };
    render_parameter_fields(name, &param.metadata, &entry.display_value, param.location.comment.as_deref(), out, depth);
}

fn render_parameter_fields(
    name: &str,
    metadata: &crate::engine::metadata::Metadata,
    value: &str,
    comment: Option<&str>,
    out: &mut String,
    depth: usize,
) {
    if let Some(help) = &metadata.help {
        for line in help.lines() {
            indent(out, depth);
            let _ = writeln!(out, "//! {line}");
        }
    }
    if let Some(switch) = &metadata.cmdline_switch {
        indent(out, depth);
        let _ = writeln!(out, "//! \\cmdline {switch}");
    }
    if let Some(default) = &metadata.suggested_default {
        indent(out, depth);
        let _ = writeln!(out, "//! \\suggested {default}");
    }
    if let Some(reference) = &metadata.suggested_reference {
        indent(out, depth);
        let _ = writeln!(out, "//! \\suggested_ref {reference}");
    }
    if let Some(restriction) = &metadata.restriction {
        indent(out, depth);
        let _ = writeln!(out, "//! \\restriction {}", restriction.to_text());
    }
    if metadata.optional {
        indent(out, depth);
        out.push_str("//! \\optional\n");
    }
    if let Some(comment) = comment {
        indent(out, depth);
        let _ = writeln!(out, "// {comment}");
    }
    indent(out, depth);
    let _ = writeln!(out, "{} {name} = {value};", metadata.type_tag);
}

fn render_reference_line(
    name: &str,
    reference: &crate::engine::store::ReferenceElement,
    out: &mut String,
    depth: usize,
) {
    let metadata = &reference.metadata;
    if let Some(help) = &metadata.help {
        for line in help.lines() {
            indent(out, depth);
            let _ = writeln!(out, "//! {line}");
        }
    }
    indent(out, depth);
    let _ = writeln!(
        out,
        "{} & {name} = {};",
        metadata.type_tag,
        reference.reference_expr,
    );
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("    ");
    }
}
