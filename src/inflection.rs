//! @ai:module:intent English singular/plural inflection of single lower-case words
//! @ai:module:layer domain
//! @ai:module:public_api pluralize, singularize
//! @ai:module:stateless true

use regex::Regex;
use std::sync::OnceLock;

/// Words whose singular and plural are the same.
const UNCOUNTABLES: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
];

/// (singular, plural) pairs, matched as word suffixes.
const IRREGULARS: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("mombie", "mombies"),
];

/// Suffix rules in ascending priority: later entries are tried first.
const PLURAL_RULES: &[(&str, &str)] = &[
    ("([a-z])$", "${1}s"),
    ("s$", "s"),
    ("^(ax|test)is$", "${1}es"),
    ("(octop|vir)us$", "${1}i"),
    ("(octop|vir)i$", "${1}i"),
    ("(alias|status|campus)$", "${1}es"),
    ("(bu)s$", "${1}ses"),
    ("(buffal|tomat)o$", "${1}oes"),
    ("([ti])um$", "${1}a"),
    ("([ti])a$", "${1}a"),
    ("sis$", "ses"),
    ("(?:([^f])fe|([lr])f)$", "${1}${2}ves"),
    ("(hive)$", "${1}s"),
    ("([^aeiouy]|qu)y$", "${1}ies"),
    ("(x|ch|ss|sh)$", "${1}es"),
    ("(matr|vert|ind)(?:ix|ex)$", "${1}ices"),
    ("^(m|l)ouse$", "${1}ice"),
    ("^(m|l)ice$", "${1}ice"),
    ("^(ox)$", "${1}en"),
    ("^(oxen)$", "${1}"),
    ("(quiz)$", "${1}zes"),
    ("(drive)$", "${1}s"),
];

/// Suffix rules in ascending priority: later entries are tried first.
const SINGULAR_RULES: &[(&str, &str)] = &[
    ("s$", ""),
    ("(ss)$", "${1}"),
    ("(n)ews$", "${1}ews"),
    ("([ti])a$", "${1}um"),
    (
        "((a)naly|(b)a|(d)iagno|(p)arenthe|(p)rogno|(s)ynop|(t)he)(sis|ses)$",
        "${1}sis",
    ),
    ("(^analy)(sis|ses)$", "${1}sis"),
    ("([^f])ves$", "${1}fe"),
    ("(hive)s$", "${1}"),
    ("(tive)s$", "${1}"),
    ("([lr])ves$", "${1}f"),
    ("([^aeiouy]|qu)ies$", "${1}y"),
    ("(s)eries$", "${1}eries"),
    ("(m)ovies$", "${1}ovie"),
    ("(c)ompany$", "${1}ompany"),
    ("(x|ch|ss|sh)es$", "${1}"),
    ("^(m|l)ice$", "${1}ouse"),
    ("(bus)(es)?$", "${1}"),
    ("(o)es$", "${1}"),
    ("(shoe)s$", "${1}"),
    ("(cris|test)(is|es)$", "${1}is"),
    ("^(a)x[ie]s$", "${1}xis"),
    ("(octop|vir)(us|i)$", "${1}us"),
    ("(alias|status|campus)(es)?$", "${1}"),
    ("^(ox)en", "${1}"),
    ("(vert|ind)ices$", "${1}ex"),
    ("(matr)ices$", "${1}ix"),
    ("(quiz)zes$", "${1}"),
    ("(database)s$", "${1}"),
];

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

fn compile(rules: &[(&str, &'static str)]) -> Vec<Rule> {
    rules
        .iter()
        .rev()
        .map(|&(pattern, replacement)| Rule {
            pattern: Regex::new(pattern).expect("Invalid regex"),
            replacement,
        })
        .collect()
}

fn plural_rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| compile(PLURAL_RULES))
}

fn singular_rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| compile(SINGULAR_RULES))
}

/// @ai:intent Plural form of a lower-case English word
/// @ai:example ("person") -> "people"
/// @ai:example ("category") -> "categories"
/// @ai:effects pure
pub fn pluralize(word: &str) -> String {
    if UNCOUNTABLES.contains(&word) {
        return word.to_string();
    }
    for &(singular, plural) in IRREGULARS.iter().rev() {
        if let Some(stem) = word.strip_suffix(singular) {
            return format!("{}{}", stem, plural);
        }
    }
    apply(plural_rules(), word)
}

/// @ai:intent Singular form of a lower-case English word
/// @ai:example ("people") -> "person"
/// @ai:example ("data") -> "datum"
/// @ai:effects pure
pub fn singularize(word: &str) -> String {
    if UNCOUNTABLES.contains(&word) {
        return word.to_string();
    }
    for &(singular, plural) in IRREGULARS.iter().rev() {
        if let Some(stem) = word.strip_suffix(plural) {
            return format!("{}{}", stem, singular);
        }
    }
    apply(singular_rules(), word)
}

/// First matching rule rewrites the word; no match leaves it unchanged.
fn apply(rules: &[Rule], word: &str) -> String {
    rules
        .iter()
        .find(|rule| rule.pattern.is_match(word))
        .map(|rule| rule.pattern.replace(word, rule.replacement).into_owned())
        .unwrap_or_else(|| word.to_string())
}
