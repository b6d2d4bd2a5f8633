//! @ai:module:intent Parse Go struct tags into key/value maps and promoted directives
//! @ai:module:layer domain
//! @ai:module:public_api Annotation, unquote, quote
//! @ai:module:depends_on error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Marker a fixture value uses to ask for a quoted string literal.
const FIXTURE_STRING_PREFIX: &str = "string:";

/// @ai:intent Parsed struct tag with its recognized directives promoted to fields
///
/// `entries` keeps every `key:"value"` pair so directives that are not promoted
/// remain reachable by generators.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Annotation {
    #[serde(rename = "tag", default, skip_serializing_if = "String::is_empty")]
    pub raw: String,
    #[serde(rename = "tags", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub entries: BTreeMap<String, String>,
    #[serde(rename = "tagFaker", default, skip_serializing_if = "String::is_empty")]
    pub faker: String,
    #[serde(rename = "tagFixture", default, skip_serializing_if = "String::is_empty")]
    pub fixture: String,
    #[serde(rename = "tagDb", default, skip_serializing_if = "String::is_empty")]
    pub db: String,
    #[serde(rename = "tagGraphql", default, skip_serializing_if = "String::is_empty")]
    pub graphql: String,
    #[serde(rename = "tagJson", default, skip_serializing_if = "String::is_empty")]
    pub json: String,
}

impl Annotation {
    /// @ai:intent Parse a struct tag literal exactly as it appears in source
    /// @ai:pre literal is a raw (`...`) or interpreted ("...") Go string literal
    /// @ai:post entries holds the last value seen for every key
    /// @ai:example ("`json:\"id\" faker:\"uuid\"`") -> faker "uuid", json "id"
    /// @ai:edge_cases unterminated literal or bad escape -> Err(MalformedTag)
    /// @ai:effects pure
    pub fn parse(literal: &str) -> Result<Self> {
        let raw = unquote(literal)?;
        let mut entries = BTreeMap::new();

        for captures in pair_regex().captures_iter(&raw) {
            let key = &captures[1];
            let value = unescape(&captures[2], '"').map_err(|message| Error::MalformedTag {
                tag: literal.to_string(),
                message: format!("value of key {}: {}", key, message),
            })?;
            entries.insert(key.to_string(), value);
        }

        let directive = |key: &str| entries.get(key).cloned().unwrap_or_default();
        let fixture = directive("fixture");
        let fixture = match fixture.strip_prefix(FIXTURE_STRING_PREFIX) {
            Some(text) => quote(text),
            None => fixture,
        };

        Ok(Self {
            faker: directive("faker"),
            db: directive("db"),
            graphql: directive("graphql"),
            json: directive("json"),
            fixture,
            raw,
            entries,
        })
    }

    /// @ai:intent Look up any tag key, promoted or not
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

fn pair_regex() -> &'static Regex {
    static PAIR: OnceLock<Regex> = OnceLock::new();
    PAIR.get_or_init(|| {
        Regex::new(r#"([^\s:"]+):"((?:[^"\\]|\\.)*)""#).expect("Invalid regex")
    })
}

/// @ai:intent Strip the quoting of a Go string literal
/// @ai:effects pure
pub fn unquote(literal: &str) -> Result<String> {
    let malformed = |message: &str| Error::MalformedTag {
        tag: literal.to_string(),
        message: message.to_string(),
    };

    if literal.len() >= 2 && literal.starts_with('`') && literal.ends_with('`') {
        let body = &literal[1..literal.len() - 1];
        if body.contains('`') {
            return Err(malformed("back-quote inside raw string"));
        }
        return Ok(body.replace('\r', ""));
    }

    if literal.len() >= 2 && literal.starts_with('"') && literal.ends_with('"') {
        return unescape(&literal[1..literal.len() - 1], '"').map_err(|m| malformed(&m));
    }

    Err(malformed("not a quoted string literal"))
}

/// Decode Go escape sequences in the body of a literal quoted with `quote`.
fn unescape(body: &str, quote: char) -> std::result::Result<String, String> {
    let mut out: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c == quote {
            return Err(format!("unescaped {} in literal", quote));
        }
        if c == '\n' {
            return Err("newline in literal".to_string());
        }
        if c != '\\' {
            push_char(&mut out, c);
            continue;
        }

        let escaped = chars.next().ok_or("trailing backslash")?;
        match escaped {
            'a' => out.push(0x07),
            'b' => out.push(0x08),
            'f' => out.push(0x0c),
            'n' => out.push(b'\n'),
            'r' => out.push(b'\r'),
            't' => out.push(b'\t'),
            'v' => out.push(0x0b),
            '\\' => out.push(b'\\'),
            '\'' | '"' if escaped == quote => push_char(&mut out, escaped),
            'x' => out.push(read_number(&mut chars, 2, 16)? as u8),
            '0'..='7' => {
                let rest = read_number(&mut chars, 2, 8)?;
                let value = escaped.to_digit(8).unwrap_or(0) * 64 + rest;
                if value > 0xff {
                    return Err(format!("octal escape out of range: {}", value));
                }
                out.push(value as u8);
            }
            'u' | 'U' => {
                let digits = if escaped == 'u' { 4 } else { 8 };
                let code = read_number(&mut chars, digits, 16)?;
                let decoded = char::from_u32(code)
                    .ok_or_else(|| format!("invalid code point {:#x}", code))?;
                push_char(&mut out, decoded);
            }
            other => return Err(format!("unknown escape sequence \\{}", other)),
        }
    }

    String::from_utf8(out).map_err(|e| format!("invalid UTF-8: {}", e))
}

fn read_number(
    chars: &mut std::str::Chars<'_>,
    digits: usize,
    radix: u32,
) -> std::result::Result<u32, String> {
    let mut value = 0u32;
    for _ in 0..digits {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(radix))
            .ok_or_else(|| format!("expected {} base-{} digits", digits, radix))?;
        value = value * radix + digit;
    }
    Ok(value)
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

/// @ai:intent Render text as an interpreted Go string literal
/// @ai:example ("hi \"x\"") -> "\"hi \\\"x\\\"\""
/// @ai:effects pure
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0c' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0b' => out.push_str("\\v"),
            c if c.is_control() && (c as u32) < 0x80 => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
