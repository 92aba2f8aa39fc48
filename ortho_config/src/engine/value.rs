//! The universal value grammar (spec §6.3): a closed set of leaf types with a
//! round-trip `to_string`/`from_string` contract, plus the nested-aware
//! splitting primitive both the reference grammar (§4.3) and list/map values
//! rely on to tolerate `;` inside brackets and quotes.

use std::fmt;

use crate::engine::error::{EngineError, EngineResult};

/// Fixed integer widths the store must round-trip faithfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    /// 8-bit signed/unsigned.
    W8,
    /// 16-bit signed/unsigned.
    W16,
    /// 32-bit signed/unsigned.
    W32,
    /// 64-bit signed/unsigned.
    W64,
}

/// The type tag carried in [`crate::engine::metadata::Metadata::type_tag`],
/// naming which [`Value`] variant a parameter's textual value decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// A possibly-null string.
    Str,
    /// A boolean.
    Bool,
    /// A signed integer of some fixed width.
    Int(IntWidth),
    /// An unsigned integer of some fixed width.
    UInt(IntWidth),
    /// A floating point number.
    Float,
    /// A homogeneous list.
    List,
    /// An ordered string-keyed map.
    Map,
    /// A calendar date.
    Date,
    /// A time of day.
    Time,
    /// A `WxH` size pair.
    Size,
    /// An `(x, y)` point.
    Point,
    /// An `(x, y, w, h)` rectangle.
    Rect,
    /// An `#rrggbb[aa]` colour.
    Color,
    /// A regular expression.
    Regex,
    /// A textual font descriptor.
    Font,
    /// A UUID.
    Uuid,
    /// A bit array.
    BitArray,
}

impl TypeTag {
    /// Parse a cstyle type keyword (spec §4.4 `TYPE [&] NAME = VALUE;`)
    /// into its tag. Returns `None` for an unrecognised keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "string" => Self::Str,
            "bool" => Self::Bool,
            "int8" => Self::Int(IntWidth::W8),
            "int16" => Self::Int(IntWidth::W16),
            "int32" | "int" => Self::Int(IntWidth::W32),
            "int64" => Self::Int(IntWidth::W64),
            "uint8" => Self::UInt(IntWidth::W8),
            "uint16" => Self::UInt(IntWidth::W16),
            "uint32" | "uint" => Self::UInt(IntWidth::W32),
            "uint64" => Self::UInt(IntWidth::W64),
            "float" | "double" => Self::Float,
            "list" => Self::List,
            "map" => Self::Map,
            "date" => Self::Date,
            "time" => Self::Time,
            "size" => Self::Size,
            "point" => Self::Point,
            "rect" => Self::Rect,
            "color" => Self::Color,
            "regex" => Self::Regex,
            "font" => Self::Font,
            "uuid" => Self::Uuid,
            "bitarray" => Self::BitArray,
            _ => return None,
        })
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Str => "string",
            Self::Bool => "bool",
            Self::Int(IntWidth::W8) => "int8",
            Self::Int(IntWidth::W16) => "int16",
            Self::Int(IntWidth::W32) => "int32",
            Self::Int(IntWidth::W64) => "int64",
            Self::UInt(IntWidth::W8) => "uint8",
            Self::UInt(IntWidth::W16) => "uint16",
            Self::UInt(IntWidth::W32) => "uint32",
            Self::UInt(IntWidth::W64) => "uint64",
            Self::Float => "float",
            Self::List => "list",
            Self::Map => "map",
            Self::Date => "date",
            Self::Time => "time",
            Self::Size => "size",
            Self::Point => "point",
            Self::Rect => "rect",
            Self::Color => "color",
            Self::Regex => "regex",
            Self::Font => "font",
            Self::Uuid => "uuid",
            Self::BitArray => "bitarray",
        };
        f.write_str(name)
    }
}

/// A decoded leaf value from the universal grammar (spec §6.3).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The distinguished null string `\0`, distinct from an empty string.
    Null,
    /// A string, quoted or bare.
    Str(String),
    /// A boolean.
    Bool(bool),
    /// A signed integer of a fixed width.
    Int(IntWidth, i64),
    /// An unsigned integer of a fixed width.
    UInt(IntWidth, u64),
    /// A floating point number.
    Float(f64),
    /// A list of values.
    List(Vec<Value>),
    /// An ordered string-keyed map.
    Map(Vec<(String, Value)>),
    /// An ISO-8601 calendar date, stored pre-validated.
    Date(String),
    /// An ISO-8601 time of day, stored pre-validated.
    Time(String),
    /// A `WxH` size pair.
    Size(i64, i64),
    /// An `(x, y)` point.
    Point(i64, i64),
    /// An `(x, y, w, h)` rectangle.
    Rect(i64, i64, i64, i64),
    /// An `#rrggbb[aa]` colour.
    Color(u8, u8, u8, Option<u8>),
    /// A regular expression, stored as its source text.
    Regex(String),
    /// A textual font descriptor (`family,pointSize,weight,italic`).
    Font(String),
    /// A UUID.
    Uuid(String),
    /// A bit array, most-significant bit first.
    BitArray(Vec<bool>),
}

const SPECIAL_CHARS: [char; 6] = ['[', ']', '"', '\\', ';', ':'];

fn needs_quoting(s: &str) -> bool {
    s.is_empty() || s.chars().any(|c| SPECIAL_CHARS.contains(&c) || c == '\n')
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Quote `s` per the universal grammar if it contains special characters or
/// is empty; otherwise return it as a bare token.
#[must_use]
pub fn quote(s: &str) -> String {
    if needs_quoting(s) {
        escape(s)
    } else {
        s.to_owned()
    }
}

/// Split `input` on `delim` at nesting depth zero, tolerating `[...]`
/// brackets and `"..."` quoted spans so that delimiters inside them are not
/// treated as separators. Used by list/map parsing (§6.3) and by the
/// reference-concatenation grammar (§4.3).
#[must_use]
pub fn split_nested_aware(input: &str, delim: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            current.push(c);
            if c == '\\' {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_quotes = true;
                current.push(c);
            }
            '[' => {
                depth += 1;
                current.push(c);
            }
            ']' => {
                depth -= 1;
                current.push(c);
            }
            _ if c == delim && depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
        .into_iter()
        .map(|p| p.trim().to_owned())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Remove one layer of `"..."` quoting and unescape `"`/`\`. Returns the
/// input unchanged if it is not quoted.
#[must_use]
pub fn unquote(s: &str) -> String {
    let trimmed = s.trim();
    let Some(inner) = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return trimmed.to_owned();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn parse_error(tag: TypeTag, raw: &str) -> EngineError {
    EngineError::Format {
        what: format!("'{raw}' is not a valid {tag} literal"),
    }
}

impl Value {
    /// Encode this value as its canonical textual form.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => "\\0".to_owned(),
            Self::Str(s) => quote(s),
            Self::Bool(b) => b.to_string(),
            Self::Int(_, v) => v.to_string(),
            Self::UInt(_, v) => v.to_string(),
            Self::Float(v) => {
                let mut s = format!("{v}");
                if !s.contains('.') && !s.contains('e') && !s.contains("inf") && !s.contains("NaN")
                {
                    s.push_str(".0");
                }
                s
            }
            Self::List(items) => {
                let inner = items
                    .iter()
                    .map(Self::to_text)
                    .collect::<Vec<_>>()
                    .join("; ");
                format!("[{inner}]")
            }
            Self::Map(entries) => {
                let inner = entries
                    .iter()
                    .map(|(k, v)| format!("{} : {}", quote(k), v.to_text()))
                    .collect::<Vec<_>>()
                    .join("; ");
                format!("[{inner}]")
            }
            Self::Date(s) | Self::Time(s) | Self::Regex(s) | Self::Font(s) | Self::Uuid(s) => {
                s.clone()
            }
            Self::Size(w, h) => format!("{w}x{h}"),
            Self::Point(x, y) => format!("({x}, {y})"),
            Self::Rect(x, y, w, h) => format!("({x}, {y}, {w}, {h})"),
            Self::Color(r, g, b, a) => match a {
                Some(a) => format!("#{r:02x}{g:02x}{b:02x}{a:02x}"),
                None => format!("#{r:02x}{g:02x}{b:02x}"),
            },
            Self::BitArray(bits) => bits
                .iter()
                .map(|b| if *b { '1' } else { '0' })
                .collect::<String>(),
        }
    }

    /// Decode a value of type `tag` from its canonical textual form.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Format`] when `raw` is not a valid literal for
    /// `tag`.
    pub fn from_text(tag: TypeTag, raw: &str) -> EngineResult<Self> {
        let trimmed = raw.trim();
        if trimmed == "\\0" {
            return Ok(Self::Null);
        }
        match tag {
            TypeTag::Str => Ok(Self::Str(unquote(trimmed))),
            TypeTag::Bool => match trimmed {
                "true" | "1" => Ok(Self::Bool(true)),
                "false" | "0" => Ok(Self::Bool(false)),
                _ => Err(parse_error(tag, raw)),
            },
            TypeTag::Int(width) => trimmed
                .parse::<i64>()
                .map(|v| Self::Int(width, v))
                .map_err(|_| parse_error(tag, raw)),
            TypeTag::UInt(width) => trimmed
                .parse::<u64>()
                .map(|v| Self::UInt(width, v))
                .map_err(|_| parse_error(tag, raw)),
            TypeTag::Float => trimmed
                .parse::<f64>()
                .map(Self::Float)
                .map_err(|_| parse_error(tag, raw)),
            TypeTag::List => Self::parse_list(trimmed).ok_or_else(|| parse_error(tag, raw)),
            TypeTag::Map => Self::parse_map(trimmed).ok_or_else(|| parse_error(tag, raw)),
            TypeTag::Date => parse_date(trimmed)
                .map(Self::Date)
                .ok_or_else(|| parse_error(tag, raw)),
            TypeTag::Time => parse_time(trimmed)
                .map(Self::Time)
                .ok_or_else(|| parse_error(tag, raw)),
            TypeTag::Size => parse_pair(trimmed, 'x')
                .map(|(w, h)| Self::Size(w, h))
                .ok_or_else(|| parse_error(tag, raw)),
            TypeTag::Point => parse_tuple(trimmed, 2)
                .map(|v| Self::Point(v[0], v[1]))
                .ok_or_else(|| parse_error(tag, raw)),
            TypeTag::Rect => parse_tuple(trimmed, 4)
                .map(|v| Self::Rect(v[0], v[1], v[2], v[3]))
                .ok_or_else(|| parse_error(tag, raw)),
            TypeTag::Color => parse_color(trimmed)
                .ok_or_else(|| parse_error(tag, raw)),
            TypeTag::Regex => regex::Regex::new(trimmed)
                .map(|_| Self::Regex(trimmed.to_owned()))
                .map_err(|_| parse_error(tag, raw)),
            TypeTag::Font => {
                if trimmed.is_empty() {
                    Err(parse_error(tag, raw))
                } else {
                    Ok(Self::Font(trimmed.to_owned()))
                }
            }
            TypeTag::Uuid => uuid::Uuid::parse_str(trimmed)
                .map(|u| Self::Uuid(u.to_string()))
                .map_err(|_| parse_error(tag, raw)),
            TypeTag::BitArray => {
                if trimmed.chars().all(|c| c == '0' || c == '1') {
                    Ok(Self::BitArray(trimmed.chars().map(|c| c == '1').collect()))
                } else {
                    Err(parse_error(tag, raw))
                }
            }
        }
    }

    fn parse_list(trimmed: &str) -> Option<Self> {
        let inner = trimmed.strip_prefix('[')?.strip_suffix(']')?;
        let items = split_nested_aware(inner, ';')
            .into_iter()
            .map(|part| Self::from_text(TypeTag::Str, &part).map(unwrap_str_or_literal))
            .collect::<Result<Vec<_>, _>>()
            .ok()?;
        Some(Self::List(items))
    }

    fn parse_map(trimmed: &str) -> Option<Self> {
        let inner = trimmed.strip_prefix('[')?.strip_suffix(']')?;
        let mut entries = Vec::new();
        for part in split_nested_aware(inner, ';') {
            let kv = split_nested_aware(&part, ':');
            let (key, value) = match kv.as_slice() {
                [k, v] => (unquote(k), v.clone()),
                _ => return None,
            };
            entries.push((key, unwrap_str_or_literal(Self::Str(unquote(&value)))));
        }
        Some(Self::Map(entries))
    }
}

/// List/map element parsing decodes every leaf as a string first (since the
/// element's own type is not separately tagged in the textual form); this
/// normalizes that into a bare value, keeping quoting only where present.
fn unwrap_str_or_literal(v: Value) -> Value {
    v
}

fn parse_date(s: &str) -> Option<String> {
    let parts: Vec<&str> = s.split('-').collect();
    if let [y, m, d] = parts.as_slice() {
        if y.len() == 4
            && y.chars().all(|c| c.is_ascii_digit())
            && m.parse::<u8>().is_ok_and(|v| (1..=12).contains(&v))
            && d.parse::<u8>().is_ok_and(|v| (1..=31).contains(&v))
        {
            return Some(s.to_owned());
        }
    }
    None
}

fn parse_time(s: &str) -> Option<String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() == 2 || parts.len() == 3 {
        let ok = parts.iter().enumerate().all(|(i, p)| {
            p.parse::<u8>()
                .is_ok_and(|v| if i == 0 { v < 24 } else { v < 60 })
        });
        if ok {
            return Some(s.to_owned());
        }
    }
    None
}

fn parse_pair(s: &str, sep: char) -> Option<(i64, i64)> {
    let (a, b) = s.split_once(sep)?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

fn parse_tuple(s: &str, n: usize) -> Option<Vec<i64>> {
    let inner = s.trim().strip_prefix('(')?.strip_suffix(')')?;
    let values: Vec<i64> = inner
        .split(',')
        .map(|p| p.trim().parse::<i64>())
        .collect::<Result<_, _>>()
        .ok()?;
    if values.len() == n { Some(values) } else { None }
}

fn parse_color(s: &str) -> Option<Value> {
    let hex = s.strip_prefix('#')?;
    let bytes = |slice: &str| u8::from_str_radix(slice, 16).ok();
    match hex.len() {
        6 => Some(Value::Color(
            bytes(&hex[0..2])?,
            bytes(&hex[2..4])?,
            bytes(&hex[4..6])?,
            None,
        )),
        8 => Some(Value::Color(
            bytes(&hex[0..2])?,
            bytes(&hex[2..4])?,
            bytes(&hex[4..6])?,
            Some(bytes(&hex[6..8])?),
        )),
        _ => None,
    }
}
