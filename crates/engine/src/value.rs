use std::borrow::Cow;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// A value substituted for a `:placeholder`.
///
/// `Absent` keeps the placeholder in the output verbatim, the same as a
/// missing key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ReplacementValue {
    Absent,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ReplacementValue {
    /// Renders the value as it appears in output, or `None` when absent.
    /// （將值轉為輸出文字；若值缺席則回傳 `None`。）
    pub fn render(&self) -> Option<Cow<'_, str>> {
        match self {
            ReplacementValue::Absent => None,
            ReplacementValue::Integer(value) => Some(Cow::Owned(value.to_string())),
            ReplacementValue::Float(value) => Some(Cow::Owned(format_number(*value))),
            ReplacementValue::Text(text) => Some(Cow::Borrowed(text.as_str())),
        }
    }
}

/// Formats a float in plain decimal form: `5.0` → `"5"`, `-0.25` → `"-0.25"`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if value == 0.0 {
        // covers -0.0
        "0".to_string()
    } else {
        format!("{value}")
    }
}

impl From<&str> for ReplacementValue {
    fn from(value: &str) -> Self {
        ReplacementValue::Text(value.to_string())
    }
}

impl From<String> for ReplacementValue {
    fn from(value: String) -> Self {
        ReplacementValue::Text(value)
    }
}

impl From<&String> for ReplacementValue {
    fn from(value: &String) -> Self {
        ReplacementValue::Text(value.clone())
    }
}

impl From<i64> for ReplacementValue {
    fn from(value: i64) -> Self {
        ReplacementValue::Integer(value)
    }
}

impl From<i32> for ReplacementValue {
    fn from(value: i32) -> Self {
        ReplacementValue::Integer(i64::from(value))
    }
}

impl From<u32> for ReplacementValue {
    fn from(value: u32) -> Self {
        ReplacementValue::Integer(i64::from(value))
    }
}

impl From<u64> for ReplacementValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(value) => ReplacementValue::Integer(value),
            Err(_) => ReplacementValue::Float(value as f64),
        }
    }
}

impl From<usize> for ReplacementValue {
    fn from(value: usize) -> Self {
        ReplacementValue::from(value as u64)
    }
}

impl From<f64> for ReplacementValue {
    fn from(value: f64) -> Self {
        ReplacementValue::Float(value)
    }
}

impl From<f32> for ReplacementValue {
    fn from(value: f32) -> Self {
        ReplacementValue::Float(f64::from(value))
    }
}

impl<T: Into<ReplacementValue>> From<Option<T>> for ReplacementValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ReplacementValue::Absent, Into::into)
    }
}

/// Ordered placeholder name → value pairs.
///
/// Insertion order matters only when two keys collide after lowercasing; the
/// later one wins. JSON objects keep the order their keys were written in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Replacements {
    entries: Vec<(String, ReplacementValue)>,
}

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Replacements::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ReplacementValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets `key`, replacing an existing entry with the exact same name in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ReplacementValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ReplacementValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReplacementValue)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for Replacements
where
    K: Into<String>,
    V: Into<ReplacementValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut replacements = Replacements::new();
        for (key, value) in iter {
            replacements.insert(key, value);
        }
        replacements
    }
}

struct ReplacementsVisitor;

impl<'de> Visitor<'de> for ReplacementsVisitor {
    type Value = Replacements;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object of placeholder values")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut replacements = Replacements::new();
        while let Some((key, value)) = map.next_entry::<String, ReplacementValue>()? {
            replacements.insert(key, value);
        }
        Ok(replacements)
    }
}

impl<'de> Deserialize<'de> for Replacements {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ReplacementsVisitor)
    }
}
