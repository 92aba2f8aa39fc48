//! The XML serialization (spec §3 C9): a deprecated, flatter alternative to
//! the cstyle format. Supports parameters, references and sections, but not
//! defines, search paths or subconfig templates.

use std::path::PathBuf;
use std::sync::Arc;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::engine::cstyle::{ExportOptions, SaveMode, SaveValueMode};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::fact::ConditionStack;
use crate::engine::location::{SourceClass, SourceFormat, StorageLocation};
use crate::engine::metadata::{Metadata, Restriction};
use crate::engine::store::{ParameterElement, ReferenceElement, Store};
use crate::engine::value::TypeTag;

const ROOT_TAG: &str = "avconfig";

/// Parse an XML configuration document's text into `store` (spec C9).
///
/// # Errors
///
/// Returns [`EngineError::Format`] for any malformed document: a missing
/// root element, an attribute-less directive, a `<param>` with neither a
/// `<value>` nor a `<ref>` child (or both), or an unrecognised `<type>`
/// keyword.
#[tracing::instrument(skip(store, text), fields(name = name.as_deref().unwrap_or("<memory>")))]
pub fn import_xml(
    store: &mut Store,
    text: &str,
    directory: Option<PathBuf>,
    name: Option<String>,
) -> EngineResult<()> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text = true;

    loop {
        match read_event(&mut reader)? {
            Event::Start(e) if local_name(&e) == ROOT_TAG => {
                process_children(&mut reader, store, "", &directory, &name)?;
                return Ok(());
            }
            Event::Eof => {
                return Err(xml_error(format!("root element <{ROOT_TAG}> is missing")));
            }
            _ => {}
        }
    }
}

fn process_children(
    reader: &mut Reader<&[u8]>,
    store: &mut Store,
    prefix: &str,
    directory: &Option<PathBuf>,
    name: &Option<String>,
) -> EngineResult<()> {
    loop {
        match read_event(reader)? {
            Event::Start(e) => {
                let tag = local_name(&e);
                match tag.as_str() {
                    "section" => {
                        let section_name = required_attr(&e, "name")?;
                        let child_prefix = join_prefix(prefix, &section_name);
                        process_children(reader, store, &child_prefix, directory, name)?;
                    }
                    "param" => import_param(reader, store, prefix, &e, directory, name)?,
                    "include" | "map" | "override" => {
                        apply_directive(store, &tag, &e, directory, name)?;
                        skip_to_end(reader, &tag)?;
                    }
                    other => {
                        return Err(xml_error(format!("unknown element <{other}>")));
                    }
                }
            }
            Event::Empty(e) => {
                let tag = local_name(&e);
                match tag.as_str() {
                    "include" | "map" | "override" => {
                        apply_directive(store, &tag, &e, directory, name)?;
                    }
                    "section" => {}
                    "param" => {
                        return Err(xml_error("neither value nor reference in param"));
                    }
                    other => {
                        return Err(xml_error(format!("unknown element <{other}>")));
                    }
                }
            }
            Event::End(_) | Event::Eof => return Ok(()),
            _ => {}
        }
    }
}

fn apply_directive(
    store: &mut Store,
    tag: &str,
    e: &BytesStart<'_>,
    directory: &Option<PathBuf>,
    name: &Option<String>,
) -> EngineResult<()> {
    let location = build_location(directory, name);
    match tag {
        "include" => {
            let file = required_attr(e, "file")?;
            store.add_include(crate::engine::store::IncludeElement {
                included_name: file,
                location,
            });
        }
        "map" => {
            let from = required_attr(e, "from")?;
            let to = required_attr(e, "to")?;
            store.add_mapping(crate::engine::store::MappingElement {
                from,
                mapped_dir: None,
                mapped_name: to,
                location,
            });
        }
        "override" => {
            let param = required_attr(e, "param")?;
            let value = required_attr(e, "value")?;
            store.add_override(param, value, location)?;
        }
        _ => unreachable!("dispatched only for include/map/override"),
    }
    Ok(())
}

fn import_param(
    reader: &mut Reader<&[u8]>,
    store: &mut Store,
    prefix: &str,
    param_element: &BytesStart<'_>,
    directory: &Option<PathBuf>,
    name: &Option<String>,
) -> EngineResult<()> {
    let param_name = required_attr(param_element, "name")?;
    let full_name = join_prefix(prefix, &param_name);

    let mut value = None;
    let mut reference = None;
    let mut suggested = None;
    let mut help = None;
    let mut type_text = None;
    let mut restriction = None;
    let mut cmdline = None;

    loop {
        match read_event(reader)? {
            Event::Start(e) => {
                let tag = local_name(&e);
                let text = read_leaf_text(reader)?;
                assign_leaf(
                    &tag,
                    text,
                    &mut value,
                    &mut reference,
                    &mut suggested,
                    &mut help,
                    &mut type_text,
                    &mut restriction,
                    &mut cmdline,
                );
            }
            Event::Empty(e) => {
                let tag = local_name(&e);
                assign_leaf(
                    &tag,
                    String::new(),
                    &mut value,
                    &mut reference,
                    &mut suggested,
                    &mut help,
                    &mut type_text,
                    &mut restriction,
                    &mut cmdline,
                );
            }
            Event::End(_) => break,
            Event::Eof => return Err(xml_error("unexpected end of document inside <param>")),
            _ => {}
        }
    }

    match (&value, &reference) {
        (None, None) => return Err(xml_error("neither value nor reference in param")),
        (Some(_), Some(_)) => return Err(xml_error("both value and reference in param")),
        _ => {}
    }

    let type_tag = match &type_text {
        Some(keyword) => TypeTag::from_keyword(keyword)
            .ok_or_else(|| xml_error(format!("unrecognised type '{keyword}'")))?,
        None => TypeTag::Str,
    };

    let mut metadata = Metadata::new(full_name, type_tag);
    metadata.help = help;
    metadata.restriction = restriction.as_deref().map(Restriction::from_text);
    metadata.cmdline_switch = cmdline;
    metadata.incomplete = type_text.is_none();

    let location = build_location(directory, name);
    if let Some(reference_expr) = reference {
        metadata.suggested_reference = suggested;
        store.add_reference(reference_expr, metadata, location)
    } else {
        metadata.suggested_default = suggested;
        store.add_parameter(value.unwrap_or_default(), metadata, location)
    }
}

#[allow(clippy::too_many_arguments)]
fn assign_leaf(
    tag: &str,
    text: String,
    value: &mut Option<String>,
    reference: &mut Option<String>,
    suggested: &mut Option<String>,
    help: &mut Option<String>,
    type_text: &mut Option<String>,
    restriction: &mut Option<String>,
    cmdline: &mut Option<String>,
) {
    match tag {
        "value" => *value = Some(text),
        "ref" => *reference = Some(text),
        "suggested" => *suggested = Some(text),
        "help" => *help = Some(text),
        "type" => *type_text = Some(text),
        "restriction" => *restriction = Some(text),
        "cmdline" => *cmdline = Some(text),
        _ => {}
    }
}

fn read_leaf_text(reader: &mut Reader<&[u8]>) -> EngineResult<String> {
    let mut text = String::new();
    loop {
        match read_event(reader)? {
            Event::Text(t) => text.push_str(&t.unescape().map_err(|e| xml_error(e.to_string()))?),
            Event::CData(c) => {
                text.push_str(&String::from_utf8_lossy(c.as_ref()));
            }
            Event::End(_) => break,
            Event::Eof => return Err(xml_error("unexpected end of document inside leaf element")),
            _ => {}
        }
    }
    Ok(text)
}

fn skip_to_end(reader: &mut Reader<&[u8]>, tag: &str) -> EngineResult<()> {
    let mut depth = 1usize;
    loop {
        match read_event(reader)? {
            Event::Start(e) if local_name(&e) == tag => depth += 1,
            Event::End(e) if e.local_name().as_ref() == tag.as_bytes() => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => return Err(xml_error(format!("unterminated element <{tag}>"))),
            _ => {}
        }
    }
}

fn read_event<'a>(reader: &mut Reader<&'a [u8]>) -> EngineResult<Event<'a>> {
    reader.read_event().map_err(|e| xml_error(e.to_string()))
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn required_attr(e: &BytesStart<'_>, key: &str) -> EngineResult<String> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| xml_error(err.to_string()))?;
        if attr.key.as_ref() == key.as_bytes() {
            return attr
                .unescape_value()
                .map(|v| v.into_owned())
                .map_err(|err| xml_error(err.to_string()));
        }
    }
    Err(xml_error(format!(
        "missing '{key}' attribute on <{}>",
        local_name(e)
    )))
}

fn join_prefix(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_owned()
    } else {
        format!("{prefix}.{segment}")
    }
}

fn build_location(directory: &Option<PathBuf>, name: &Option<String>) -> StorageLocation {
    match (directory, name) {
        (Some(dir), Some(name)) => StorageLocation::from_file(
            dir.clone(),
            name.clone(),
            SourceFormat::Xml,
            SourceClass::FileOrdinary,
            ConditionStack::new(),
        ),
        _ => {
            let mut location = StorageLocation::synthetic(SourceClass::FileOrdinary);
            location.format = SourceFormat::Xml;
            location
        }
    }
}

fn xml_error(what: impl Into<String>) -> Arc<EngineError> {
    let what = what.into();
    tracing::error!(%what, "xml ingest failed");
    Arc::new(EngineError::Format { what })
}

/// Export `store` in the XML serialization (spec C9).
///
/// # Errors
///
/// Returns [`EngineError::Structural`] if `store` carries any define,
/// search path or subconfig template: the XML format has no
/// representation for them (original behaviour: `AVLogFatal`/`AVLogError`
/// in the reference implementation).
pub fn export_xml(store: &Store, options: &ExportOptions) -> EngineResult<String> {
    if store.defines().next().is_some() {
        return Err(Arc::new(EngineError::Structural(
            "defines are not supported by the XML format".to_owned(),
        )));
    }
    if store.search_paths().next().is_some() {
        return Err(Arc::new(EngineError::Structural(
            "search paths are not supported by the XML format".to_owned(),
        )));
    }
    if store.subconfig_templates().next().is_some() {
        return Err(Arc::new(EngineError::Structural(
            "subconfig templates are not supported by the XML format".to_owned(),
        )));
    }

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str("<avconfig version=\"1.0\">\n");

    for include in store.includes() {
        out.push_str(&format!(
            "  <include file=\"{}\"/>\n",
            escape(&include.included_name)
        ));
    }
    for mapping in store.mappings() {
        if mapping.location.null {
            continue;
        }
        out.push_str(&format!(
            "  <map from=\"{}\" to=\"{}\"/>\n",
            escape(&mapping.from),
            escape(&mapping.mapped_name)
        ));
    }
    render_overrides(store, options, &mut out);

    let entries = collect_entries(store, options);
    let refs: Vec<&Entry<'_>> = entries.iter().collect();
    let tree = group_by_prefix(&refs, 0);
    render_sections(&tree, &mut out, 1);

    out.push_str("</avconfig>\n");
    Ok(out)
}

struct Entry<'a> {
    path: Vec<&'a str>,
    param: Option<&'a ParameterElement>,
    reference: Option<&'a ReferenceElement>,
    display_value: String,
}

fn include_parameter(options: &ExportOptions, name: &str, param: &ParameterElement) -> bool {
    if param.location.source == SourceClass::InheritedParameter {
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

fn render_overrides(store: &Store, options: &ExportOptions, out: &mut String) {
    for (name, param) in store.parameters() {
        if !include_parameter(options, name, param) {
            continue;
        }
        if param.override_value.is_some() {
            let value = resolved_value(options, name, &param.value);
            out.push_str(&format!(
                "  <override param=\"{}\" value=\"{}\"/>\n",
                escape(name),
                escape(value)
            ));
        }
    }
    for over in store.overrides() {
        out.push_str(&format!(
            "  <override param=\"{}\" value=\"{}\"/>\n",
            escape(&over.name),
            escape(&over.value)
        ));
    }
}

fn collect_entries<'a>(store: &'a Store, options: &'a ExportOptions) -> Vec<Entry<'a>> {
    let mut entries = Vec::new();
    for (name, param) in store.parameters() {
        if store.get_reference(name).is_some() {
            continue;
        }
        if !include_parameter(options, name, param) {
            continue;
        }
        let declared = param
            .override_value
            .as_ref()
            .map_or(param.value.as_str(), |(v, _)| v.as_str());
        entries.push(Entry {
            path: name.split('.').collect(),
            param: Some(param),
            reference: None,
            display_value: resolved_value(options, name, declared).to_owned(),
        });
    }
    for (name, reference) in store.references() {
        if reference.location.source == SourceClass::InheritedParameter {
            continue;
        }
        entries.push(Entry {
            path: name.split('.').collect(),
            param: None,
            reference: Some(reference),
            display_value: String::new(),
        });
    }
    entries
}

enum Tree<'a> {
    Leaf(&'a Entry<'a>),
    Node(Vec<(String, Tree<'a>)>),
}

fn group_by_prefix<'a>(entries: &[&'a Entry<'a>], depth: usize) -> Vec<(String, Tree<'a>)> {
    let mut groups: Vec<(String, Vec<&'a Entry<'a>>)> = Vec::new();
    let mut leaves: Vec<&'a Entry<'a>> = Vec::new();

    for &entry in entries {
        if entry.path.len() == depth + 1 {
            leaves.push(entry);
            continue;
        }
        let segment = entry.path[depth].to_owned();
        match groups.iter_mut().find(|(name, _)| *name == segment) {
            Some((_, bucket)) => bucket.push(entry),
            None => groups.push((segment, vec![entry])),
        }
    }

    let mut out: Vec<(String, Tree<'a>)> = leaves
        .into_iter()
        .map(|entry| (entry.path[depth].to_owned(), Tree::Leaf(entry)))
        .collect();
    for (segment, bucket) in groups {
        let children = group_by_prefix(&bucket, depth + 1);
        out.push((segment, Tree::Node(children)));
    }
    out
}

fn render_sections(tree: &[(String, Tree<'_>)], out: &mut String, depth: usize) {
    for (name, node) in tree {
        match node {
            Tree::Leaf(entry) => render_param(name, entry, out, depth),
            Tree::Node(children) => {
                indent(out, depth);
                out.push_str(&format!("<section name=\"{}\">\n", escape(name)));
                render_sections(children, out, depth + 1);
                indent(out, depth);
                out.push_str("</section>\n");
            }
        }
    }
}

fn render_param(name: &str, entry: &Entry<'_>, out: &mut String, depth: usize) {
    indent(out, depth);
    out.push_str(&format!("<param name=\"{}\">\n", escape(name)));

    if let Some(param) = entry.param {
        render_leaf(out, depth + 1, "value", &entry.display_value);
        if let Some(suggested) = &param.metadata.suggested_default {
            render_leaf(out, depth + 1, "suggested", suggested);
        }
        if let Some(help) = &param.metadata.help {
            render_leaf(out, depth + 1, "help", help);
        }
        render_leaf(out, depth + 1, "type", &param.metadata.type_tag.to_string());
        if let Some(restriction) = &param.metadata.restriction {
            render_leaf(out, depth + 1, "restriction", &restriction.to_text());
        }
        if let Some(switch) = &param.metadata.cmdline_switch {
            render_leaf(out, depth + 1, "cmdline", switch);
        }
    } else if let Some(reference) = entry.reference {
        render_leaf(out, depth + 1, "ref", &reference.reference_expr);
        if let Some(suggested) = &reference.metadata.suggested_reference {
            render_leaf(out, depth + 1, "suggested", suggested);
        }
        if let Some(help) = &reference.metadata.help {
            render_leaf(out, depth + 1, "help", help);
        }
        render_leaf(
            out,
            depth + 1,
            "type",
            &reference.metadata.type_tag.to_string(),
        );
        if let Some(switch) = &reference.metadata.cmdline_switch {
            render_leaf(out, depth + 1, "cmdline", switch);
        }
    }

    indent(out, depth);
    out.push_str("</param>\n");
}

fn render_leaf(out: &mut String, depth: usize, tag: &str, text: &str) {
    indent(out, depth);
    out.push_str(&format!("<{tag}>{}</{tag}>\n", escape(text)));
}

fn escape(s: &str) -> String {
    quick_xml::escape::escape(s).into_owned()
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}
