//! The command-line parser (spec §4.7, C11): splits argv into registered
//! switches, arbitrary overrides and a trailing extras tail, feeding the
//! store as the highest-precedence inputs.

use std::collections::BTreeMap;

use crate::engine::error::EngineError;

/// One of the builtin switches that short-circuits normal startup (spec
/// §6.2): the application refuses to start and exits `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinAction {
    /// `-help [group|all]`.
    Help,
    /// `-save`.
    Save,
    /// `-dump_config`.
    DumpConfig,
    /// `-version`.
    Version,
}

/// The result of parsing argv (spec §4.7).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCmdline {
    /// `--name value` overrides, in argv order.
    pub overrides: Vec<(String, String)>,
    /// `-switch value` assignments, in argv order; a valueless switch
    /// (next token absent or itself a `-` token) carries an empty string.
    pub switches: Vec<(String, String)>,
    /// Tokens after a bare `--`, passed through to the application
    /// unparsed (spec §6.2 "extra cmdline").
    pub extra: Vec<String>,
    /// A builtin switch that terminates the parse early, if any.
    pub builtin: Option<BuiltinAction>,
}

impl ParsedCmdline {
    /// `switches` collapsed into a `switch name -> value` map, as consumed
    /// by [`crate::engine::store::Store::set_cmdline_switches`].
    #[must_use]
    pub fn switch_map(&self) -> BTreeMap<String, String> {
        self.switches.iter().cloned().collect()
    }
}

fn builtin_for(switch: &str) -> Option<BuiltinAction> {
    match switch {
        "help" => Some(BuiltinAction::Help),
        "save" => Some(BuiltinAction::Save),
        "dump_config" => Some(BuiltinAction::DumpConfig),
        "version" => Some(BuiltinAction::Version),
        _ => None,
    }
}

/// Parse `args` per spec §4.7.
///
/// # Errors
///
/// Returns [`EngineError::Cmdline`] when an override is missing its
/// mandatory value, or when a switch appears twice with differing values.
pub fn parse_cmdline(args: &[String]) -> Result<ParsedCmdline, EngineError> {
    let mut result = ParsedCmdline::default();
    let mut seen_switches: BTreeMap<String, String> = BTreeMap::new();
    let mut iter = args.iter().peekable();

    while let Some(token) = iter.next() {
        if token == "--" {
            result.extra.extend(iter.by_ref().cloned());
            break;
        }
        if let Some(name) = token.strip_prefix("--") {
            let Some(value) = iter.next() else {
                let message = format!("override '--{name}' requires a value");
                tracing::error!(%message, "cmdline ingest failed");
                return Err(EngineError::Cmdline(message));
            };
            result.overrides.push((name.to_owned(), value.clone()));
            continue;
        }
        if let Some(switch) = token.strip_prefix('-') {
            let value = match iter.peek() {
                Some(next) if !next.starts_with('-') => {
                    let v = (*iter.next().expect("peeked Some")).clone();
                    v
                }
                _ => String::new(),
            };
            if let Some(prior) = seen_switches.get(switch) {
                if prior != &value {
                    let message = format!("switch '-{switch}' given twice with differing values");
                    tracing::error!(%message, "cmdline ingest failed");
                    return Err(EngineError::Cmdline(message));
                }
            } else {
                seen_switches.insert(switch.to_owned(), value.clone());
            }
            if let Some(builtin) = builtin_for(switch) {
                result.builtin = Some(builtin);
            }
            result.switches.push((switch.to_owned(), value));
            continue;
        }
        // A bare token with no leading dash outside of `--` extras is not
        // part of the spec's grammar; treat it as an extra so no input is
        // silently dropped.
        result.extra.push(token.clone());
    }
    Ok(result)
}
