//! Plural selection and placeholder interpolation for translation templates.
//!
//! Everything here is pure: functions borrow their inputs, hold no state
//! between calls and never fail. Malformed templates degrade to literal text.

pub mod interpolate;
pub mod plural;
pub mod rules;
pub mod value;

pub use interpolate::{apply_replacements, placeholders};
pub use plural::{choose_plural_form, is_pluralized, parse_segments, Condition, PluralSegment};
pub use rules::{base_language, plural_index, PluralRule};
pub use value::{format_number, ReplacementValue, Replacements};

/// Locale used when callers have none.
pub const DEFAULT_LOCALE: &str = "en";

/// Chooses the plural form for `count` and then fills in its placeholders.
///
/// ```
/// use lexiform_engine::{translate, Replacements};
///
/// let replacements = Replacements::new().with("name", "John").with("count", 5);
/// let template = "{0} :name has no apples|{1} :name has :count apple|[2,*] :name has :count apples";
/// assert_eq!(translate(template, 5, "en", &replacements), "John has 5 apples");
/// ```
pub fn translate(template: &str, count: i64, locale: &str, replacements: &Replacements) -> String {
    let chosen = choose_plural_form(template, count, locale);
    apply_replacements(&chosen, replacements).into_owned()
}
