//! Pipe-delimited plural templates.
//!
//! A template such as `"{0} No items|{1} One item|[2,*] :count items"` is a
//! list of segments. Each segment may be guarded by an exact count (`{n}`) or
//! an inclusive range (`[a,b]`, either side may be `*`). A literal pipe is
//! written as `\|`.
//!
//! Selection is two-tiered: guarded segments are tried first in source order,
//! and only when none of them matches is the locale's plural rule used to
//! index into the list of segment values.

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::rules::plural_index;

static CONDITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(?:\{(?P<exact>[^{}]*)\}|\[(?P<range>[^\[\]]*)\])\s*(?P<value>.*)$")
        .expect("condition pattern is valid")
});

/// Guard attached to a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// No guard; selected through the locale plural rule.
    None,
    Exact(i64),
    /// Inclusive bounds, `None` meaning unbounded on that side.
    Range(Option<i64>, Option<i64>),
}

impl Condition {
    pub fn is_explicit(&self) -> bool {
        !matches!(self, Condition::None)
    }
}

/// One alternative of a plural template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralSegment {
    pub value: String,
    pub condition: Condition,
}

impl PluralSegment {
    /// Whether this segment's guard accepts `count`.
    ///
    /// Unguarded segments accept any count above one.
    pub fn matches(&self, count: i64) -> bool {
        match self.condition {
            Condition::Exact(n) => count == n,
            Condition::Range(min, max) => {
                min.map_or(true, |min| min <= count) && max.map_or(true, |max| count <= max)
            }
            Condition::None => count > 1,
        }
    }

    /// Parses one already-split part. Returns `None` when a range marker is
    /// malformed, in which case the part is dropped.
    fn parse(part: &str) -> Option<Self> {
        let part = part.trim();
        let Some(caps) = CONDITION.captures(part) else {
            return Some(Self::unconditioned(part));
        };
        let value = caps.name("value").map_or("", |m| m.as_str());

        if let Some(exact) = caps.name("exact") {
            return Some(match exact.as_str().trim().parse::<i64>() {
                Ok(n) => Self {
                    value: unescape(value),
                    condition: Condition::Exact(n),
                },
                Err(_) => Self::unconditioned(part),
            });
        }

        let interior = caps.name("range").map_or("", |m| m.as_str());
        match parse_range(interior) {
            Some((min, max)) => Some(Self {
                value: unescape(value),
                condition: Condition::Range(min, max),
            }),
            None => {
                trace!("dropping plural segment with malformed range '[{interior}]'");
                None
            }
        }
    }

    fn unconditioned(part: &str) -> Self {
        Self {
            value: unescape(part),
            condition: Condition::None,
        }
    }
}

fn parse_range(interior: &str) -> Option<(Option<i64>, Option<i64>)> {
    let (min, max) = interior.split_once(',')?;
    if max.contains(',') {
        return None;
    }
    Some((parse_bound(min)?, parse_bound(max)?))
}

fn parse_bound(raw: &str) -> Option<Option<i64>> {
    match raw.trim() {
        "*" => Some(None),
        other => other.parse::<i64>().ok().map(Some),
    }
}

fn unescape(value: &str) -> String {
    value.replace("\\|", "|")
}

/// Splits on `|` characters that are not preceded by a backslash.
fn split_unescaped(template: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut previous = None;
    for (idx, ch) in template.char_indices() {
        if ch == '|' && previous != Some('\\') {
            parts.push(&template[start..idx]);
            start = idx + ch.len_utf8();
        }
        previous = Some(ch);
    }
    parts.push(&template[start..]);
    parts
}

/// Parses `template` into its ordered segments.
///
/// Never fails: a malformed `{n}` guard turns the part into plain text and a
/// malformed `[a,b]` guard drops the part.
pub fn parse_segments(template: &str) -> Vec<PluralSegment> {
    split_unescaped(template)
        .into_iter()
        .filter_map(PluralSegment::parse)
        .collect()
}

/// Whether `template` carries more than one alternative.
pub fn is_pluralized(template: &str) -> bool {
    split_unescaped(template).len() > 1
}

/// Picks the form of `template` that fits `count` in `locale`.
/// （依據數量與語系選擇範本中合適的複數形式。）
pub fn choose_plural_form(template: &str, count: i64, locale: &str) -> String {
    let segments = parse_segments(template);
    if segments.is_empty() {
        return template.to_string();
    }

    if segments
        .iter()
        .any(|segment| segment.condition.is_explicit())
    {
        if let Some(segment) = segments.iter().find(|segment| segment.matches(count)) {
            return segment.value.clone();
        }
    }

    let index = plural_index(locale, count);
    let index = if segments.len() == 1 || index >= segments.len() {
        0
    } else {
        index
    };
    segments
        .into_iter()
        .nth(index)
        .map(|segment| segment.value)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(value: &str, condition: Condition) -> PluralSegment {
        PluralSegment {
            value: value.to_string(),
            condition,
        }
    }

    #[test]
    fn parses_guards_in_source_order() {
        let segments = parse_segments("{0} none | [1,4] some |[5,*]  many| rest");
        assert_eq!(
            segments,
            vec![
                segment("none", Condition::Exact(0)),
                segment("some", Condition::Range(Some(1), Some(4))),
                segment("many", Condition::Range(Some(5), None)),
                segment("rest", Condition::None),
            ]
        );
    }

    #[test]
    fn escaped_pipes_do_not_split() {
        let segments = parse_segments(r"a \| b|{2} c\|d");
        assert_eq!(
            segments,
            vec![
                segment("a | b", Condition::None),
                segment("c|d", Condition::Exact(2)),
            ]
        );
        assert!(!is_pluralized(r"one \| two"));
        assert!(is_pluralized("one|two"));
    }

    #[test]
    fn malformed_exact_guard_becomes_text() {
        let segments = parse_segments("{x} odd|even");
        assert_eq!(segments[0], segment("{x} odd", Condition::None));
    }

    #[test]
    fn malformed_range_guard_is_dropped() {
        assert_eq!(
            parse_segments("[a,3] bad|[1,2] good|[4] single"),
            vec![segment("good", Condition::Range(Some(1), Some(2)))]
        );
    }

    #[test]
    fn empty_template_is_one_empty_segment() {
        assert_eq!(parse_segments(""), vec![segment("", Condition::None)]);
        assert_eq!(choose_plural_form("", 3, "en"), "");
    }

    #[test]
    fn unguarded_segments_match_above_one() {
        let plain = segment("x", Condition::None);
        assert!(!plain.matches(1));
        assert!(plain.matches(2));
        let open_low = segment("x", Condition::Range(None, Some(0)));
        assert!(open_low.matches(-50));
        assert!(!open_low.matches(1));
    }

    #[test]
    fn explicit_guards_take_priority() {
        let template = "{0} No items|{1} One item|[2,*] :count items";
        assert_eq!(choose_plural_form(template, 0, "en"), "No items");
        assert_eq!(choose_plural_form(template, 1, "en"), "One item");
        assert_eq!(choose_plural_form(template, 5, "en"), ":count items");
        assert_eq!(choose_plural_form(template, 5, "ja"), ":count items");
    }

    #[test]
    fn unmatched_guards_fall_back_to_locale_rule() {
        // -1 matches nothing, so English picks index 1 of the stripped values
        let template = "{0} zero|[2,3] few";
        assert_eq!(choose_plural_form(template, -1, "en"), "few");
        assert_eq!(choose_plural_form(template, 1, "en"), "zero");
    }

    #[test]
    fn unguarded_mix_uses_count_above_one_rule() {
        assert_eq!(choose_plural_form("{0} none|many", 7, "en"), "many");
        assert_eq!(choose_plural_form("{0} none|many", 1, "en"), "none");
    }

    #[test]
    fn out_of_range_index_uses_first_form() {
        assert_eq!(choose_plural_form("яблоко|яблока", 5, "ru"), "яблоко");
        assert_eq!(choose_plural_form("яблоко|яблока|яблок", 22, "ru"), "яблока");
    }

    #[test]
    fn templates_without_pipes_keep_their_text() {
        for count in [-3, 0, 1, 2, 99] {
            assert_eq!(choose_plural_form("Settings", count, "ar"), "Settings");
        }
    }

    #[test]
    fn single_segment_templates_are_trimmed_and_unguarded() {
        for count in [0, 1, 2] {
            assert_eq!(choose_plural_form("  padded  ", count, "en"), "padded");
        }
        assert_eq!(choose_plural_form("{1} one", 1, "en"), "one");
        assert_eq!(choose_plural_form("{1} one", 2, "en"), "one");
        assert_eq!(choose_plural_form("[5,*] many", 0, "ru"), "many");
    }
}
