//! The reference-resolution half of the resolution engine (spec §4.3, C5):
//! an iterated fixpoint over unresolved references, tolerant of forward
//! references and terminating on the absence of progress rather than by
//! walking a dependency graph.

use crate::engine::error::Diagnostic;
use crate::engine::location::SourceClass;
use crate::engine::metadata::Metadata;
use crate::engine::store::{ParameterElement, Store};
use crate::engine::value::split_nested_aware;

/// One `$(NAME)` substitution or literal segment of a reference
/// expression (spec §4.3 grammar).
#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Substitution(String),
}

/// Desugar `NAME` to `[$(NAME)]` and split a bracketed expression into its
/// segments (spec §4.3: "A reference value is either a bare identifier
/// ... or a bracket-delimited semicolon-separated concatenation").
fn parse_segments(expr: &str) -> Vec<Segment> {
    let trimmed = expr.trim();
    let body = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(trimmed);
    let is_bracketed = trimmed.starts_with('[') && trimmed.ends_with(']');
    let parts: Vec<String> = if is_bracketed {
        split_nested_aware(body, ';')
    } else {
        vec![trimmed.to_owned()]
    };
    parts
        .into_iter()
        .map(|part| {
            let part = part.trim();
            part.strip_prefix("$(")
                .and_then(|rest| rest.strip_suffix(')'))
                .map_or_else(
                    || Segment::Literal(part.to_owned()),
                    |name| Segment::Substitution(name.trim().to_owned()),
                )
        })
        .collect()
}

/// Names referenced via `$(...)` in `expr`, used to detect whether a
/// reference still depends on another unresolved reference.
fn referenced_names(expr: &str) -> Vec<String> {
    parse_segments(expr)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Substitution(name) => Some(name),
            Segment::Literal(_) => None,
        })
        .collect()
}

enum AttemptOutcome {
    Resolved(String),
    Skip,
    Error(Diagnostic),
}

fn attempt_resolution(store: &Store, name: &str, expr: &str, metadata: &Metadata) -> AttemptOutcome {
    let mut out = String::new();
    for segment in parse_segments(expr) {
        match segment {
            Segment::Literal(text) => out.push_str(&crate::engine::value::unquote(&text)),
            Segment::Substitution(target) => {
                let Some(param) = store.get_parameter(&target) else {
                    return AttemptOutcome::Skip;
                };
                if requires_strict_check(store, &target) && !param.metadata.strict_equivalent(metadata)
                {
                    return AttemptOutcome::Error(Diagnostic::MetadataMismatch {
                        name: name.to_owned(),
                        detail: format!(
                            "reference target '{target}' has metadata incompatible with '{name}'"
                        ),
                    });
                }
                let text = if param.metadata.type_tag == crate::engine::value::TypeTag::Str {
                    crate::engine::value::unquote(&param.value)
                } else {
                    param.value.clone()
                };
                out.push_str(&text);
            }
        }
    }
    AttemptOutcome::Resolved(out)
}

/// Strict metadata equivalence (spec §4.3) is required only when the
/// referenced value came from a non-legacy file and both sides are
/// registered; the engine does not track "registered" separately from
/// "present in the store with non-incomplete metadata", so that is used
/// as the proxy here.
fn requires_strict_check(store: &Store, target: &str) -> bool {
    store
        .get_parameter(target)
        .is_some_and(|p| !p.metadata.incomplete && p.location.format != crate::engine::location::SourceFormat::Legacy)
}

/// Run the reference-resolution fixpoint to completion (spec §4.3 loop).
///
/// Installs a resolved parameter (source `RESOLVED_REFERENCE`) for every
/// reference that reaches a fixpoint; any reference that was never
/// resolved because of a cycle or a missing target is reported as a
/// diagnostic (spec P4) and left in the store for a future resolution
/// pass (e.g. after a subconfig creates new parameters, spec §4.6 step 2).
pub fn resolve_references(store: &mut Store) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut iteration = 0u32;
    loop {
        iteration += 1;
        let mut progress = false;
        let pending = store.pending_references();
        tracing::debug!(iteration, pending = pending.len(), "resolution loop iteration");
        for name in &pending {
            let Some(reference) = store.get_reference(name).cloned() else {
                continue;
            };
            let still_unresolved = referenced_names(&reference.reference_expr)
                .iter()
                .any(|dep| pending.contains(dep));
            if still_unresolved {
                continue;
            }
            match attempt_resolution(store, name, &reference.reference_expr, &reference.metadata) {
                AttemptOutcome::Skip => {}
                AttemptOutcome::Error(diagnostic) => {
                    diagnostics.push(diagnostic);
                    store.mark_reference_resolved(name);
                    progress = true;
                }
                AttemptOutcome::Resolved(text) => {
                    install_resolved(store, name, text, reference.metadata);
                    store.mark_reference_resolved(name);
                    progress = true;
                }
            }
        }
        if !progress {
            break;
        }
    }
    for name in store.pending_references() {
        diagnostics.push(Diagnostic::UnresolvedReference { name });
    }
    diagnostics
}

/// Install a resolved reference as a parameter, respecting precedence
/// (spec §4.3 loop: "Do not overwrite higher-priority sources; overwrite
/// `DEFAULT_OPTIONAL` and `INHERITED_PARAMETER`").
fn install_resolved(store: &mut Store, name: &str, text: String, metadata: Metadata) {
    let location = crate::engine::location::StorageLocation::synthetic(SourceClass::ResolvedReference);
    if let Some(existing) = store.get_parameter(name) {
        match existing.location.source {
            SourceClass::DefaultOptional | SourceClass::InheritedParameter => {}
            _ => return,
        }
    }
    let elem = ParameterElement::new(text, metadata, location);
    store.insert_resolved_parameter(name, elem);
}
