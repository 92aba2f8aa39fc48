//! The legacy INI-like paraset importer (spec §3 C8): a compatibility-read
//! path for files predating the cstyle format. Only the element stream it
//! produces is specified; the legacy grammar itself is out of scope, so
//! this importer accepts the common `[section]` / `key = value` shape and
//! nothing more exotic.

use std::path::PathBuf;
use std::sync::Arc;

use crate::engine::error::{EngineError, EngineResult};
use crate::engine::fact::ConditionStack;
use crate::engine::location::{SourceClass, SourceFormat, StorageLocation};
use crate::engine::metadata::Metadata;
use crate::engine::store::Store;

/// The paraset name implicitly used for keys outside any `[section]`
/// header, which contributes no name prefix (spec: "Section `default` is
/// ignored").
const DEFAULT_PARASET_NAME: &str = "default";

/// Import a legacy paraset file's text into `store` (spec §3 C8).
///
/// Every assignment becomes a `FILE_ORDINARY` parameter of type `string`
/// with incomplete metadata: the legacy grammar carries no type
/// annotation, so registered refresh always relies on relaxed equivalence
/// for these elements (spec §4.6 step 2e, "loaded format is legacy").
///
/// # Errors
///
/// Returns [`EngineError::Format`] for a line that is neither a section
/// header, a comment, blank, nor a `key = value` assignment.
#[tracing::instrument(skip(store, text), fields(name = display_name(&name)))]
pub fn import_legacy(
    store: &mut Store,
    text: &str,
    directory: Option<PathBuf>,
    name: Option<String>,
) -> EngineResult<()> {
    let mut section = DEFAULT_PARASET_NAME.to_owned();

    for (lineno, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(inner) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            section = inner.trim().to_owned();
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            let what = format!("{}:{}: not a section header or assignment", display_name(&name), lineno + 1);
            tracing::error!(%what, "legacy ingest failed");
            return Err(Arc::new(EngineError::Format { what }));
        };
        let key = key.trim();
        let value = value.trim();

        let full_name = if key.contains('.') || section == DEFAULT_PARASET_NAME {
            key.to_owned()
        } else {
            format!("{section}.{key}")
        };

        let location = StorageLocation {
            directory: directory.clone(),
            name: name.clone(),
            format: SourceFormat::Legacy,
            source: SourceClass::FileOrdinary,
            facts: ConditionStack::new(),
            comment: None,
            null: false,
        };
        store.add_parameter(value.to_owned(), Metadata::incomplete(full_name), location)?;
    }
    Ok(())
}

fn display_name(name: &Option<String>) -> &str {
    name.as_deref().unwrap_or("<memory>")
}
