//! `:placeholder` substitution.
//!
//! A placeholder is a colon followed by a letter or underscore and then any
//! run of letters, digits and underscores. Lookup is case-insensitive; the
//! casing of the placeholder as written decides how the value is cased:
//!
//! | Written   | Value    | Output   |
//! |-----------|----------|----------|
//! | `:NAME`   | `john`   | `JOHN`   |
//! | `:Name`   | `jOHN`   | `JOHN`   |
//! | `:name`   | `jOHN`   | `jOHN`   |

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::value::{ReplacementValue, Replacements};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)").expect("placeholder pattern is valid")
});

/// Substitutes every resolvable `:placeholder` in `template`.
///
/// Placeholders without a (non-absent) value stay in the output unchanged.
/// （以替換值填入範本中的預留位置；缺少值的預留位置保持原樣。）
pub fn apply_replacements<'a>(template: &'a str, replacements: &Replacements) -> Cow<'a, str> {
    if template.is_empty() || replacements.is_empty() {
        return Cow::Borrowed(template);
    }

    let lookup = build_lookup(replacements);
    PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
        let name = &caps[1];
        match lookup
            .get(name.to_lowercase().as_str())
            .and_then(|value| value.render())
        {
            Some(value) => transform_case(name, &value),
            None => caps[0].to_string(),
        }
    })
}

/// Placeholder names in order of first appearance, as written.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(template) {
        let name = &caps[1];
        if !names.iter().any(|existing| existing == name) {
            names.push(name.to_string());
        }
    }
    names
}

fn build_lookup(replacements: &Replacements) -> HashMap<String, &ReplacementValue> {
    let mut lookup = HashMap::with_capacity(replacements.len() * 2);
    for (key, value) in replacements.iter() {
        lookup.insert(key.to_string(), value);
        lookup.insert(key.to_lowercase(), value);
    }
    lookup
}

fn transform_case(name: &str, value: &str) -> String {
    if name == name.to_uppercase() {
        return value.to_uppercase();
    }
    let starts_upper = name
        .chars()
        .next()
        .map_or(false, |first| first.to_uppercase().eq(std::iter::once(first)));
    if starts_upper {
        capitalize_first(value)
    } else {
        value.to_string()
    }
}

fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
