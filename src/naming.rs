//! @ai:module:intent Derive singular, plural and cased spellings of declared names
//! @ai:module:layer domain
//! @ai:module:public_api singular, plural, camel_identifier, lower_camel, lower_initial, json_name, snake, short_name, TypeNames, MemberNames
//! @ai:module:stateless true

use crate::inflection::{pluralize, singularize};
use heck::{ToLowerCamelCase, ToSnakeCase};
use serde::{Deserialize, Serialize};

/// Initialisms Go style keeps fully upper-cased inside identifiers.
const COMMON_INITIALISMS: &[&str] = &[
    "ACL", "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID",
    "IP", "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SQL", "SSH", "TCP", "TLS",
    "TTL", "UDP", "UI", "UID", "UUID", "URI", "URL", "UTF8", "VM", "XML", "XMPP", "XSRF", "XSS",
];

/// @ai:intent Full set of spellings derived from a record or contract name
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeNames {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "name")]
    pub var_name: String,
    #[serde(rename = "nameJson")]
    pub json_name: String,
    #[serde(rename = "nameSnake")]
    pub snake_name: String,
    #[serde(rename = "n")]
    pub short_name: String,
    #[serde(rename = "Names")]
    pub plural_name: String,
    #[serde(rename = "names")]
    pub plural_var_name: String,
}

/// @ai:intent Spellings derived from a field, method or parameter name
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberNames {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "name")]
    pub var_name: String,
    #[serde(rename = "nameJson")]
    pub json_name: String,
    #[serde(rename = "nameSnake")]
    pub snake_name: String,
}

impl TypeNames {
    /// @ai:intent Compute every spelling of a declared type name
    /// @ai:example ("UserAccounts") -> Name "UserAccount", name "UserAccounts", Names "UserAccounts", n "ua"
    /// @ai:edge_cases "" -> all fields empty
    /// @ai:effects pure
    pub fn derive(declared: &str) -> Self {
        let singular_name = singular(declared);
        let plural_name = plural(&singular_name);
        let name = camel_identifier(&singular_name);

        Self {
            short_name: short_name(&name),
            var_name: declared.to_string(),
            json_name: json_name(declared),
            snake_name: snake(declared),
            plural_name: camel_identifier(&plural_name),
            plural_var_name: lower_camel(&plural_name),
            name,
        }
    }
}

impl MemberNames {
    /// @ai:intent Compute the spellings of a declared member name
    /// @ai:effects pure
    pub fn derive(declared: &str) -> Self {
        Self {
            name: declared.to_string(),
            var_name: lower_initial(declared),
            json_name: json_name(declared),
            snake_name: snake(declared),
        }
    }

    /// @ai:intent Check whether the member was declared without a name
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }
}

/// @ai:intent Singularize the last word of an identifier, keeping its casing
/// @ai:example ("UserSettings") -> "UserSetting"
/// @ai:effects pure
pub fn singular(s: &str) -> String {
    inflect_last_word(s, singularize)
}

/// @ai:intent Pluralize the last word of an identifier, keeping its casing
/// @ai:example ("Dog") -> "Dogs"
/// @ai:example ("information") -> "informations"
/// @ai:effects pure
pub fn plural(s: &str) -> String {
    inflect_last_word(s, |word| {
        // "information" is uncountable in English; generators expect a distinct plural.
        if word == "information" {
            "informations".to_string()
        } else {
            pluralize(word)
        }
    })
}

/// @ai:intent Render a name as an exported Go identifier with initialisms upper-cased
/// @ai:example ("user_id") -> "UserID"
/// @ai:effects pure
pub fn camel_identifier(s: &str) -> String {
    s.to_snake_case()
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let upper = word.to_uppercase();
            if COMMON_INITIALISMS.contains(&upper.as_str()) {
                upper
            } else {
                capitalize(word)
            }
        })
        .collect()
}

/// @ai:effects pure
pub fn lower_camel(s: &str) -> String {
    s.to_lower_camel_case()
}

/// @ai:intent Lower-case only the first character
/// @ai:effects pure
pub fn lower_initial(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// @ai:intent Lower-camel spelling used for JSON keys, with "ID" softened to "Id"
/// @ai:example ("UserID") -> "userId"
/// @ai:effects pure
pub fn json_name(s: &str) -> String {
    lower_camel(s).replace("ID", "Id")
}

/// @ai:effects pure
pub fn snake(s: &str) -> String {
    s.to_snake_case()
}

/// @ai:intent Concatenate the upper-case letters of a camel name and lower-case them
/// @ai:example ("UserAccountSetting") -> "uas"
/// @ai:effects pure
pub fn short_name(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_uppercase())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Apply `inflect` to the lower-cased last word of `s`, then carry the
/// original casing over the part of the word the inflection kept.
/// A word the inflection would shrink to one letter or less is kept as declared.
fn inflect_last_word(s: &str, inflect: impl Fn(&str) -> String) -> String {
    let (head, word) = s.split_at(last_word_start(s));
    if word.is_empty() {
        return s.to_string();
    }

    let lower = word.to_lowercase();
    let inflected = inflect(&lower);
    if inflected != lower && inflected.chars().count() < 2 {
        return s.to_string();
    }
    format!("{}{}", head, restore_case(word, &lower, &inflected))
}

fn restore_case(original: &str, lower: &str, inflected: &str) -> String {
    if original == lower || original.chars().count() != lower.chars().count() {
        return inflected.to_string();
    }

    let shared = lower
        .chars()
        .zip(inflected.chars())
        .take_while(|(a, b)| a == b)
        .count();

    original
        .chars()
        .take(shared)
        .chain(inflected.chars().skip(shared))
        .collect()
}

/// Byte offset where the last camel-case or separator-delimited word starts.
fn last_word_start(s: &str) -> usize {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut start = 0;

    for (idx, &(offset, c)) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            start = offset + c.len_utf8();
            continue;
        }
        let Some(prev) = idx.checked_sub(1).map(|p| chars[p].1) else {
            continue;
        };
        if !c.is_uppercase() || !prev.is_alphanumeric() {
            continue;
        }
        let next_is_lower = chars
            .get(idx + 1)
            .is_some_and(|&(_, next)| next.is_lowercase());

        if !prev.is_uppercase() || next_is_lower {
            start = offset;
        }
    }

    start
}
