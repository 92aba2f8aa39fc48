//! Streaming parser for the canonical cstyle format (spec §4.4).

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::engine::error::{EngineError, EngineResult};
use crate::engine::fact::{ConditionStack, FactCondition};
use crate::engine::location::{SourceClass, SourceFormat, StorageLocation};
use crate::engine::metadata::{Metadata, Restriction};
use crate::engine::store::{DefineElement, IncludeElement, MappingElement, SearchPathElement, Store};
use crate::engine::value::TypeTag;

#[derive(Debug, Default)]
struct Pending {
    comment: Option<String>,
    help: Vec<String>,
    directives: BTreeMap<String, String>,
}

impl Pending {
    fn is_empty(&self) -> bool {
        self.comment.is_none() && self.help.is_empty() && self.directives.is_empty()
    }

    fn apply(&mut self, metadata: &mut Metadata) {
        if let Some(comment) = self.comment.take() {
            metadata.comment = Some(comment);
        }
        if !self.help.is_empty() {
            metadata.help = Some(std::mem::take(&mut self.help).join("\n"));
        }
        let directives = std::mem::take(&mut self.directives);
        for (key, value) in directives {
            match key.as_str() {
                "cmdline" => metadata.cmdline_switch = Some(value),
                "suggested" => metadata.suggested_default = Some(value),
                "suggested_ref" => metadata.suggested_reference = Some(value),
                "restriction" => metadata.restriction = Some(Restriction::from_text(&value)),
                "optional" => metadata.optional = true,
                "comment" => metadata.comment = Some(value),
                _ => {}
            }
        }
    }
}

struct Cursor<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn starts_with(&self, lit: &str) -> bool {
        self.text[self.pos..].starts_with(lit)
    }

    fn eat(&mut self, lit: &str) -> bool {
        if self.starts_with(lit) {
            self.pos += lit.len();
            true
        } else {
            false
        }
    }

    fn rest_of_line(&mut self) -> String {
        let start = self.pos;
        while !self.eof() && self.peek() != Some('\n') {
            self.bump();
        }
        let line = self.text[start..self.pos].trim().to_owned();
        self.bump();
        line
    }

    /// Skip whitespace and comment lines, accumulating `//`/`//!` content
    /// into `pending` (spec §4.4 comment attachment).
    fn skip_ws_and_comments(&mut self, pending: &mut Pending) {
        loop {
            while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                self.bump();
            }
            if self.starts_with("//!") {
                self.pos += 3;
                let line = self.rest_of_line();
                if let Some(rest) = line.strip_prefix('\\') {
                    let (key, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                    pending
                        .directives
                        .insert(key.trim().to_owned(), value.trim().to_owned());
                } else if !line.is_empty() {
                    pending.help.push(line);
                }
                continue;
            }
            if self.starts_with("//") {
                self.pos += 2;
                let line = self.rest_of_line();
                pending.comment = Some(match pending.comment.take() {
                    Some(existing) => format!("{existing}\n{line}"),
                    None => line,
                });
                continue;
            }
            break;
        }
    }

    fn read_word(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_' || c == '.') {
            self.bump();
        }
        self.text[start..self.pos].to_owned()
    }

    fn read_quoted(&mut self) -> Option<String> {
        if self.peek() != Some('"') {
            return None;
        }
        self.bump();
        let mut out = String::new();
        while let Some(c) = self.bump() {
            if c == '\\' {
                if let Some(next) = self.bump() {
                    out.push(next);
                }
            } else if c == '"' {
                return Some(out);
            } else {
                out.push(c);
            }
        }
        Some(out)
    }

    /// Read a value up to the first `;` at nesting depth zero, outside any
    /// quoted span (spec §4.4), without consuming the `;`.
    fn read_value_until_semicolon(&mut self) -> String {
        let start = self.pos;
        let mut depth: i32 = 0;
        let mut in_quotes = false;
        while let Some(c) = self.peek() {
            if in_quotes {
                self.bump();
                if c == '\\' {
                    self.bump();
                } else if c == '"' {
                    in_quotes = false;
                }
                continue;
            }
            match c {
                '"' => {
                    in_quotes = true;
                    self.bump();
                }
                '[' => {
                    depth += 1;
                    self.bump();
                }
                ']' => {
                    depth -= 1;
                    self.bump();
                }
                ';' if depth == 0 => break,
                _ => {
                    self.bump();
                }
            }
        }
        self.text[start..self.pos].trim().to_owned()
    }
}

struct Context {
    directory: Option<PathBuf>,
    name: Option<String>,
}

impl Context {
    fn location(&self, source: SourceClass, facts: ConditionStack) -> StorageLocation {
        match (&self.directory, &self.name) {
            (Some(dir), Some(name)) => {
                StorageLocation::from_file(dir.clone(), name.clone(), SourceFormat::Cstyle, source, facts)
            }
            _ => {
                let mut loc = StorageLocation::synthetic(source);
                loc.facts = facts;
                loc
            }
        }
    }
}

fn ingest_err(message: impl Into<String>) -> Arc<EngineError> {
    let message = message.into();
    tracing::error!(%message, "cstyle ingest failed");
    Arc::new(EngineError::Ingest {
        location: StorageLocation::synthetic(SourceClass::FileOrdinary),
        message,
    })
}

/// Import cstyle text into `store` (spec §4.4).
///
/// `directory`/`name` identify the originating file for the
/// [`StorageLocation`]s produced; pass `None` for in-memory text with no
/// file origin.
///
/// # Errors
///
/// Returns [`EngineError::Ingest`] on a grammar violation: unsupported
/// version, unbalanced `#if`, a malformed `#map` block, or an override
/// appearing after its canonical declaration (spec §7.1).
#[tracing::instrument(skip(store, text), fields(name = name.as_deref().unwrap_or("<memory>")))]
pub fn import_cstyle(
    store: &mut Store,
    text: &str,
    directory: Option<PathBuf>,
    name: Option<String>,
) -> EngineResult<()> {
    let ctx = Context { directory, name };
    let mut cursor = Cursor::new(text);
    let mut pending = Pending::default();

    cursor.skip_ws_and_comments(&mut pending);
    if cursor.eat("#avconfig_version") {
        while matches!(cursor.peek(), Some(c) if c.is_whitespace()) {
            cursor.bump();
        }
        let version_word = cursor.read_word();
        let version: u32 = version_word
            .parse()
            .map_err(|_| ingest_err(format!("malformed #avconfig_version '{version_word}'")))?;
        if crate::engine::cstyle::FormatVersion::from_number(version).is_none() {
            return Err(ingest_err(format!("unsupported avconfig version {version}")));
        }
    }

    parse_defines(&mut cursor, store, &ctx, &mut pending)?;
    parse_dev_overrides(&mut cursor, store, &ctx, &mut pending)?;
    parse_maps(&mut cursor, store, &mut pending)?;
    parse_search_paths(&mut cursor, store, &ctx, &mut pending)?;
    parse_includes(&mut cursor, store, &ctx, &mut pending)?;
    parse_subconfig_templates(&mut cursor, store, &ctx, &mut pending)?;
    parse_block(&mut cursor, store, &ctx, &mut pending, "", ConditionStack::new(), false)?;
    Ok(())
}

fn parse_defines(cursor: &mut Cursor<'_>, store: &mut Store, ctx: &Context, pending: &mut Pending) -> EngineResult<()> {
    loop {
        cursor.skip_ws_and_comments(pending);
        if !cursor.eat("#define") {
            break;
        }
        while matches!(cursor.peek(), Some(c) if c.is_whitespace()) {
            cursor.bump();
        }
        let name = cursor.read_word();
        while matches!(cursor.peek(), Some(c) if c.is_whitespace() && c != '\n') {
            cursor.bump();
        }
        let value = cursor.rest_of_line();
        let location = ctx.location(SourceClass::FileOrdinary, ConditionStack::new());
        store.add_define(DefineElement {
            fact_name: name,
            fact_value: value,
            location,
        })?;
    }
    Ok(())
}

fn parse_dev_overrides(
    cursor: &mut Cursor<'_>,
    store: &mut Store,
    ctx: &Context,
    pending: &mut Pending,
) -> EngineResult<()> {
    loop {
        cursor.skip_ws_and_comments(pending);
        let checkpoint = cursor.pos;
        if cursor.eof()
            || cursor.peek() == Some('#')
            || cursor.starts_with("subconfig_template")
            || cursor.starts_with("namespace")
        {
            break;
        }
        let name = cursor.read_word();
        if name.is_empty() {
            break;
        }
        while matches!(cursor.peek(), Some(c) if c.is_whitespace()) {
            cursor.bump();
        }
        if cursor.peek() != Some('=') {
            cursor.pos = checkpoint;
            break;
        }
        cursor.bump();
        while matches!(cursor.peek(), Some(c) if c.is_whitespace()) {
            cursor.bump();
        }
        let value = cursor.read_value_until_semicolon();
        cursor.eat(";");
        let location = ctx.location(SourceClass::FileDevOverride, ConditionStack::new());
        store.add_override(name, value, location)?;
    }
    Ok(())
}

fn parse_maps(cursor: &mut Cursor<'_>, store: &mut Store, pending: &mut Pending) -> EngineResult<()> {
    loop {
        cursor.skip_ws_and_comments(pending);
        if !cursor.eat("#map") {
            break;
        }
        while matches!(cursor.peek(), Some(c) if c.is_whitespace() && c != '\n') {
            cursor.bump();
        }
        let dir = cursor.read_quoted();
        loop {
            cursor.skip_ws_and_comments(pending);
            if cursor.eat("#endmap") {
                break;
            }
            if cursor.eof() {
                return Err(ingest_err("unterminated #map block"));
            }
            let line = cursor.rest_of_line();
            let (from, to) = line
                .split_once(':')
                .ok_or_else(|| ingest_err(format!("malformed #map entry '{line}'")))?;
            store.add_mapping(MappingElement {
                from: from.trim().to_owned(),
                mapped_dir: dir.clone(),
                mapped_name: to.trim().to_owned(),
                location: StorageLocation::synthetic(SourceClass::FileOrdinary),
            });
        }
    }
    Ok(())
}

fn parse_search_paths(
    cursor: &mut Cursor<'_>,
    store: &mut Store,
    ctx: &Context,
    pending: &mut Pending,
) -> EngineResult<()> {
    loop {
        cursor.skip_ws_and_comments(pending);
        if !cursor.eat("#search") {
            break;
        }
        while matches!(cursor.peek(), Some(c) if c.is_whitespace() && c != '\n') {
            cursor.bump();
        }
        let path = cursor
            .read_quoted()
            .ok_or_else(|| ingest_err("malformed #search directive"))?;
        cursor.rest_of_line();
        store.add_search_path(SearchPathElement {
            path,
            location: ctx.location(SourceClass::FileOrdinary, ConditionStack::new()),
        });
    }
    Ok(())
}

fn parse_includes(
    cursor: &mut Cursor<'_>,
    store: &mut Store,
    ctx: &Context,
    pending: &mut Pending,
) -> EngineResult<()> {
    loop {
        cursor.skip_ws_and_comments(pending);
        if !cursor.eat("#include") {
            break;
        }
        while matches!(cursor.peek(), Some(c) if c.is_whitespace() && c != '\n') {
            cursor.bump();
        }
        let included = cursor
            .read_quoted()
            .ok_or_else(|| ingest_err("malformed #include directive"))?;
        cursor.rest_of_line();
        store.add_include(IncludeElement {
            included_name: included,
            location: ctx.location(SourceClass::FileOrdinary, ConditionStack::new()),
        });
    }
    Ok(())
}

fn parse_subconfig_templates(
    cursor: &mut Cursor<'_>,
    store: &mut Store,
    ctx: &Context,
    pending: &mut Pending,
) -> EngineResult<()> {
    loop {
        cursor.skip_ws_and_comments(pending);
        if !cursor.eat("subconfig_template") {
            break;
        }
        while matches!(cursor.peek(), Some(c) if c.is_whitespace()) {
            cursor.bump();
        }
        let name = cursor.read_word();
        cursor.skip_ws_and_comments(pending);
        if !cursor.eat("{") {
            return Err(ingest_err(format!("expected '{{' after subconfig_template {name}")));
        }
        parse_block_until(
            cursor,
            store,
            ctx,
            pending,
            &name,
            ConditionStack::new(),
            true,
            Terminator::Brace,
        )?;
    }
    Ok(())
}

/// Which token ends a [`parse_block`] call: a namespace/template's `}`, an
/// `#if`'s `#endif`, or simply end-of-input for the file's top level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Brace,
    EndIf,
    Eof,
}

/// Parse the body of a namespace, `#if` block, subconfig template, or the
/// file's top-level section area, until `terminator` is reached (spec
/// §4.4).
#[allow(clippy::too_many_lines)]
fn parse_block(
    cursor: &mut Cursor<'_>,
    store: &mut Store,
    ctx: &Context,
    pending: &mut Pending,
    prefix: &str,
    facts: ConditionStack,
    in_template: bool,
) -> EngineResult<()> {
    parse_block_until(cursor, store, ctx, pending, prefix, facts, in_template, Terminator::Eof)
}

#[allow(clippy::too_many_lines)]
fn parse_block_until(
    cursor: &mut Cursor<'_>,
    store: &mut Store,
    ctx: &Context,
    pending: &mut Pending,
    prefix: &str,
    facts: ConditionStack,
    in_template: bool,
    terminator: Terminator,
) -> EngineResult<()> {
    loop {
        cursor.skip_ws_and_comments(pending);
        if terminator == Terminator::EndIf && cursor.eat("#endif") {
            return Ok(());
        }
        if cursor.eof() {
            return Ok(());
        }
        if terminator == Terminator::Brace && cursor.peek() == Some('}') {
            cursor.bump();
            cursor.rest_of_line();
            return Ok(());
        }
        if cursor.eat("#if") {
            while matches!(cursor.peek(), Some(c) if c.is_whitespace() && c != '\n') {
                cursor.bump();
            }
            let fact_name = cursor.read_word();
            while matches!(cursor.peek(), Some(c) if c.is_whitespace()) {
                cursor.bump();
            }
            if !cursor.eat("==") {
                return Err(ingest_err(format!("expected '==' in #if {fact_name}")));
            }
            let value_line = cursor.rest_of_line();
            let values: Vec<String> = value_line.split('|').map(|v| v.trim().to_owned()).collect();
            let mut nested = facts.clone();
            nested
                .push(FactCondition::new(fact_name, values))
                .map_err(|message| ingest_err(message))?;
            parse_block_until(cursor, store, ctx, pending, prefix, nested, in_template, Terminator::EndIf)?;
            continue;
        }
        if cursor.eat("namespace") {
            while matches!(cursor.peek(), Some(c) if c.is_whitespace()) {
                cursor.bump();
            }
            let name = cursor.read_word();
            while matches!(cursor.peek(), Some(c) if c.is_whitespace()) {
                cursor.bump();
            }
            let parent = if cursor.eat(":") {
                while matches!(cursor.peek(), Some(c) if c.is_whitespace()) {
                    cursor.bump();
                }
                Some(cursor.read_word())
            } else {
                None
            };
            cursor.skip_ws_and_comments(pending);
            if !cursor.eat("{") {
                return Err(ingest_err(format!("expected '{{' after namespace {name}")));
            }
            let child_full = join_prefix(prefix, &name);
            if let Some(parent) = &parent {
                let parent_full = join_prefix(prefix, parent);
                let location = ctx.location(SourceClass::FileOrdinary, facts.clone());
                store.add_inherited_section(&parent_full, &child_full, location)?;
            }
            parse_block_until(
                cursor,
                store,
                ctx,
                pending,
                &child_full,
                facts.clone(),
                in_template,
                Terminator::Brace,
            )?;
            continue;
        }
        // Otherwise: `TYPE [&] NAME = VALUE;`.
        let type_word = cursor.read_word();
        let Some(type_tag) = TypeTag::from_keyword(&type_word) else {
            if type_word.is_empty() {
                return Ok(());
            }
            return Err(ingest_err(format!("unrecognised type keyword '{type_word}'")));
        };
        while matches!(cursor.peek(), Some(c) if c.is_whitespace()) {
            cursor.bump();
        }
        let is_reference = cursor.eat("&");
        while matches!(cursor.peek(), Some(c) if c.is_whitespace()) {
            cursor.bump();
        }
        let name = cursor.read_word();
        while matches!(cursor.peek(), Some(c) if c.is_whitespace()) {
            cursor.bump();
        }
        if !cursor.eat("=") {
            return Err(ingest_err(format!("expected '=' after '{name}'")));
        }
        while matches!(cursor.peek(), Some(c) if c.is_whitespace()) {
            cursor.bump();
        }
        let value = cursor.read_value_until_semicolon();
        cursor.eat(";");

        let full_name = join_prefix(prefix, &name);
        let mut metadata = Metadata::new(full_name.clone(), type_tag);
        pending.apply(&mut metadata);
        let location = ctx.location(SourceClass::FileOrdinary, facts.clone());

        if in_template {
            store.add_subconfig_template(crate::engine::store::ParameterElement::new(
                value, metadata, location,
            ));
        } else if is_reference {
            store.add_reference(value, metadata, location)?;
        } else {
            store.add_parameter(value, metadata, location)?;
        }
    }
}

fn join_prefix(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_owned()
    } else {
        format!("{prefix}.{segment}")
    }
}
