//! Registered-parameter refresh (spec §4.6, §4.8, C10): reconciles an
//! application's typed, registered parameters against the loaded store,
//! handling deprecated aliases, version translation and subconfig
//! discovery. The engine has no notion of a live "config object"; callers
//! describe what they registered via [`RegisteredConfig`] and get back the
//! subconfig instances they need to construct for the next round.

use std::sync::Arc;

use crate::engine::error::{CheckingMode, Diagnostic, EngineError, EngineResult, RefreshResult};
use crate::engine::location::{SourceClass, SourceFormat, StorageLocation};
use crate::engine::metadata::{Metadata, Restriction};
use crate::engine::resolve::resolve_references;
use crate::engine::store::{ParameterElement, Store};
use crate::engine::value::{TypeTag, Value};

/// A single registered parameter, bound by name to a typed in-program
/// variable (spec §4.6 step 2, "registered parameter Q").
#[derive(Debug, Clone)]
pub struct RegisteredParameter {
    /// The schema the application registered; `metadata.name` is the
    /// fully-qualified name M.
    pub metadata: Metadata,
    /// Earlier names this parameter used to be loaded under, checked in
    /// order when M is missing (spec §4.6 step 2a).
    pub deprecated_aliases: Vec<String>,
    /// Exempts this parameter from the strict metadata equivalence check
    /// (spec §4.6 step 2e, "Q is pure-cmdline").
    pub pure_cmdline: bool,
}

/// A registered subconfig prefix P of a config (spec §4.6 step 2).
#[derive(Debug, Clone)]
pub struct RegisteredSubconfig {
    /// Fully-qualified prefix under which instance names are discovered.
    pub prefix: String,
}

/// The application's own registered schema for one config object (spec
/// §4.6).
#[derive(Debug, Clone, Default)]
pub struct RegisteredConfig {
    /// This config's own fully-qualified prefix (empty for a root config).
    pub prefix: String,
    /// The registered schema version and the parameter name storing the
    /// loaded version, if this config is versioned.
    pub version: Option<(String, u32)>,
    /// This config's registered parameters.
    pub parameters: Vec<RegisteredParameter>,
    /// This config's registered subconfig prefixes.
    pub subconfigs: Vec<RegisteredSubconfig>,
}

/// One subconfig instance discovered under a [`RegisteredSubconfig`]
/// prefix (spec §4.6 step 2, "instantiate a child config object for each
/// N").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubconfigInstance {
    /// The subconfig prefix P this instance was discovered under.
    pub subconfig_prefix: String,
    /// The second-level name N.
    pub instance_name: String,
}

/// The result of one [`refresh_all_parameters`] call.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// Accumulated diagnostics (spec §4.6 step 4).
    pub result: RefreshResult,
    /// Subconfig instances discovered this pass, for the caller to
    /// instantiate and feed back for the next round (spec §4.8).
    pub subconfigs: Vec<SubconfigInstance>,
}

/// Invoked once per version step a config's stored version must advance
/// through (spec §4.6 "Version translation"). Returns whether the
/// translation succeeded.
pub type VersionTranslator<'a> = dyn Fn(&str, u32) -> bool + 'a;

/// Run one refresh pass over `configs` (spec §4.6 steps 1-2, §4.6 step 4
/// applied immediately).
///
/// # Errors
///
/// Returns [`EngineError::FutureVersion`] when a config's stored version
/// exceeds its registered one, [`EngineError::Structural`] when a required
/// version translation is missing or fails, and
/// [`EngineError::Aggregate`] when `mode` is [`CheckingMode::Strict`] and
/// any diagnostic was recorded.
pub fn refresh_all_parameters(
    store: &mut Store,
    configs: &[RegisteredConfig],
    mode: CheckingMode,
    translator: Option<&VersionTranslator<'_>>,
) -> EngineResult<RefreshOutcome> {
    let mut result = RefreshResult::new();
    let subconfigs = run_one_pass(store, configs, mode, translator, &mut result)?;
    if mode == CheckingMode::Autosave && !result.is_empty() {
        result.save_required = true;
    }
    let result = result.into_checked(mode).map_err(Arc::new)?;
    Ok(RefreshOutcome { result, subconfigs })
}

/// Run refresh to a fixpoint (spec §4.8): repeatedly calls
/// `instantiate` for every subconfig instance discovered each round,
/// re-running refresh on whatever new configs it returns, until a round
/// produces none. Diagnostics from every round are aggregated and checked
/// once, at the end.
///
/// # Errors
///
/// Same failure modes as [`refresh_all_parameters`], plus immediate
/// propagation of any pass's fatal version error.
pub fn refresh_to_fixpoint(
    store: &mut Store,
    initial_configs: Vec<RegisteredConfig>,
    mut instantiate: impl FnMut(&SubconfigInstance) -> Option<RegisteredConfig>,
    mode: CheckingMode,
    translator: Option<&VersionTranslator<'_>>,
) -> EngineResult<RefreshResult> {
    let mut aggregate = RefreshResult::new();
    let mut configs = initial_configs;
    loop {
        let discovered = run_one_pass(store, &configs, mode, translator, &mut aggregate)?;
        let next: Vec<RegisteredConfig> = discovered
            .iter()
            .filter_map(&mut instantiate)
            .collect();
        if next.is_empty() {
            break;
        }
        configs = next;
    }
    if mode == CheckingMode::Autosave && !aggregate.is_empty() {
        aggregate.save_required = true;
    }
    aggregate.into_checked(mode).map_err(Arc::new)
}

fn run_one_pass(
    store: &mut Store,
    configs: &[RegisteredConfig],
    mode: CheckingMode,
    translator: Option<&VersionTranslator<'_>>,
    result: &mut RefreshResult,
) -> EngineResult<Vec<SubconfigInstance>> {
    for diagnostic in resolve_references(store) {
        result.push(diagnostic);
    }
    for diagnostic in store.take_diagnostics() {
        result.push(diagnostic);
    }

    let mut subconfigs = Vec::new();
    for config in configs {
        translate_version(store, config, translator)?;
        subconfigs.extend(discover_subconfigs(store, config));
        for param in &config.parameters {
            reconcile_parameter(store, param, mode, result);
        }
    }
    Ok(subconfigs)
}

fn translate_version(
    store: &mut Store,
    config: &RegisteredConfig,
    translator: Option<&VersionTranslator<'_>>,
) -> EngineResult<()> {
    let Some((version_param, registered_version)) = &config.version else {
        return Ok(());
    };
    let Some(loaded) = store.get_parameter(version_param).cloned() else {
        return Ok(());
    };
    let stored: u32 = loaded.value.trim().parse().map_err(|_| {
        Arc::new(EngineError::Format {
            what: format!("'{}' is not a valid version number", loaded.value),
        })
    })?;
    if stored > *registered_version {
        tracing::error!(stored, registered = *registered_version, "stored config version is newer than registered");
        return Err(Arc::new(EngineError::FutureVersion {
            stored,
            registered: *registered_version,
        }));
    }

    let mut current = stored;
    while current < *registered_version {
        let Some(translator) = translator else {
            let message = format!("no version translator registered for '{version_param}'");
            tracing::error!(%message, "refresh failed");
            return Err(Arc::new(EngineError::Structural(message)));
        };
        if !translator(&config.prefix, current) {
            let message = format!("translate_to_next_version({current}) failed for '{version_param}'");
            tracing::error!(%message, "refresh failed");
            return Err(Arc::new(EngineError::Structural(message)));
        }
        current += 1;
    }
    if current != stored {
        let mut elem = loaded;
        elem.value = current.to_string();
        store.insert_resolved_parameter(version_param, elem);
    }
    Ok(())
}

fn discover_subconfigs(store: &Store, config: &RegisteredConfig) -> Vec<SubconfigInstance> {
    let mut found = Vec::new();
    for subconfig in &config.subconfigs {
        let dotted_prefix = format!("{}.", subconfig.prefix);
        let mut seen = std::collections::BTreeSet::new();
        for (name, _) in store.parameters() {
            if let Some(remainder) = name.strip_prefix(dotted_prefix.as_str()) {
                if let Some(n) = remainder.split('.').next() {
                    seen.insert(n.to_owned());
                }
            }
        }
        for (name, _) in store.references() {
            if let Some(remainder) = name.strip_prefix(dotted_prefix.as_str()) {
                if let Some(n) = remainder.split('.').next() {
                    seen.insert(n.to_owned());
                }
            }
        }
        found.extend(seen.into_iter().map(|instance_name| SubconfigInstance {
            subconfig_prefix: subconfig.prefix.clone(),
            instance_name,
        }));
    }
    found
}

fn reconcile_parameter(
    store: &mut Store,
    param: &RegisteredParameter,
    mode: CheckingMode,
    result: &mut RefreshResult,
) {
    let name = &param.metadata.name;
    let mut loaded = store.get_parameter(name).cloned();
    let is_placeholder = loaded
        .as_ref()
        .is_some_and(|p| p.location.source == SourceClass::DefaultOptional);

    if loaded.is_none() || is_placeholder {
        for alias in &param.deprecated_aliases {
            let Some(found) = store.get_parameter(alias).cloned() else {
                continue;
            };
            if is_placeholder {
                store.remove_parameter(name);
            }
            let mut elem = found;
            elem.metadata.name = name.clone();
            store.insert_resolved_parameter(name, elem.clone());
            tracing::warn!(current = %name, deprecated = %alias, "parameter loaded under a deprecated name");
            result.push(Diagnostic::DeprecatedName {
                current: name.clone(),
                deprecated: alias.clone(),
            });
            loaded = Some(elem);
            break;
        }
    }

    let Some(loaded) = loaded else {
        if !param.metadata.optional {
            match (&param.metadata.suggested_default, mode) {
                (Some(default), CheckingMode::Lenient | CheckingMode::Autosave) => {
                    let elem = ParameterElement::new(
                        default.clone(),
                        param.metadata.clone(),
                        StorageLocation::synthetic(SourceClass::DefaultOptional),
                    );
                    store.insert_resolved_parameter(name, elem);
                }
                _ => result.push(Diagnostic::MissingParameter { name: name.clone() }),
            }
        }
        return;
    };

    if let Err(err) = Value::from_text(param.metadata.type_tag, &loaded.value) {
        result.push(Diagnostic::ParseError {
            name: name.clone(),
            detail: err.to_string(),
        });
        return;
    }

    if let Some(restriction) = &param.metadata.restriction {
        if let Err(detail) = check_restriction(restriction, &loaded.value, param.metadata.type_tag)
        {
            result.push(Diagnostic::RestrictionViolation {
                name: name.clone(),
                detail,
            });
        }
    }

    let exempt = param.pure_cmdline
        || loaded.location.source == SourceClass::DefaultOptional
        || loaded.metadata.incomplete
        || loaded.location.format == SourceFormat::Legacy;
    if !exempt && !loaded.metadata.strict_equivalent(&param.metadata) {
        result.push(Diagnostic::MetadataMismatch {
            name: name.clone(),
            detail: "registered and loaded schema diverge".to_owned(),
        });
    }
}

fn check_restriction(restriction: &Restriction, raw: &str, type_tag: TypeTag) -> Result<(), String> {
    match restriction {
        Restriction::Range { min, max } => {
            let value: f64 = raw
                .trim()
                .parse()
                .map_err(|_| format!("'{raw}' is not numeric"))?;
            if value < *min || value > *max {
                Err(format!("{value} is outside [{min}, {max}]"))
            } else {
                Ok(())
            }
        }
        Restriction::Enum(values) => {
            let candidate = if type_tag == TypeTag::Str {
                crate::engine::value::unquote(raw)
            } else {
                raw.trim().to_owned()
            };
            if values.iter().any(|v| v == &candidate) {
                Ok(())
            } else {
                Err(format!("'{candidate}' is not one of {}", values.join("|")))
            }
        }
        Restriction::Regex(pattern) => {
            let re = regex::Regex::new(pattern)
                .map_err(|e| format!("invalid restriction pattern '{pattern}': {e}"))?;
            let candidate = if type_tag == TypeTag::Str {
                crate::engine::value::unquote(raw)
            } else {
                raw.trim().to_owned()
            };
            if re.is_match(&candidate) {
                Ok(())
            } else {
                Err(format!("'{candidate}' does not match /{pattern}/"))
            }
        }
    }
}
