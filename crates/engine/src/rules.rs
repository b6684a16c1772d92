//! Per-language plural rule families.
//!
//! Every locale maps to exactly one [`PluralRule`] through its base language
//! subtag. A rule turns a count into the index of the pipe-separated form
//! that should be used for it. Unknown languages use [`PluralRule::Single`].

/// Grammatical plural system shared by a group of languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralRule {
    /// No plural distinction: always the first form.
    Single,
    /// `1` is singular, everything else plural.
    OneOther,
    /// `0` and `1` are singular, everything else plural.
    ZeroOneOther,
    /// East Slavic / Serbo-Croatian: one, few (2-4), many.
    Slavic,
    /// Czech and Slovak: one, few (2-4), other.
    CzechSlovak,
    Polish,
    Lithuanian,
    Latvian,
    Romanian,
    Irish,
    Slovenian,
    Maltese,
    Welsh,
    Arabic,
    Macedonian,
}

impl PluralRule {
    /// Selects the rule for a locale tag such as `"en"`, `"pt-BR"` or `"sr_Latn"`.
    ///
    /// Only the base language subtag is considered.
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        let language = base_language(locale).to_ascii_lowercase();
        match language.as_str() {
            "az" | "bo" | "dz" | "id" | "ja" | "jv" | "ka" | "km" | "kn" | "ko" | "ms" | "th"
            | "tr" | "vi" | "zh" => Self::Single,
            "af" | "bg" | "bn" | "ca" | "da" | "de" | "el" | "en" | "eo" | "es" | "et" | "eu"
            | "fa" | "fi" | "fo" | "fur" | "fy" | "gl" | "gu" | "ha" | "he" | "hu" | "is"
            | "it" | "ku" | "lb" | "ml" | "mn" | "mr" | "nah" | "nb" | "ne" | "nl" | "nn"
            | "no" | "om" | "or" | "pa" | "pap" | "ps" | "pt" | "so" | "sq" | "sv" | "sw"
            | "ta" | "te" | "tk" | "ur" | "zu" => Self::OneOther,
            "am" | "bh" | "fil" | "fr" | "gun" | "hi" | "hy" | "ln" | "mg" | "nso" | "ti"
            | "wa" | "xbr" => Self::ZeroOneOther,
            "be" | "bs" | "hr" | "ru" | "sh" | "sr" | "uk" => Self::Slavic,
            "cs" | "sk" => Self::CzechSlovak,
            "pl" => Self::Polish,
            "lt" => Self::Lithuanian,
            "lv" => Self::Latvian,
            "ro" => Self::Romanian,
            "ga" => Self::Irish,
            "sl" => Self::Slovenian,
            "mt" => Self::Maltese,
            "cy" => Self::Welsh,
            "ar" => Self::Arabic,
            "mk" => Self::Macedonian,
            _ => Self::Single,
        }
    }

    /// Index of the form to use for `count`.
    ///
    /// Uses truncating remainder, so negative counts fall through to whatever
    /// branch the arithmetic lands on.
    #[must_use]
    pub fn index(self, count: i64) -> usize {
        let n = count;
        match self {
            Self::Single => 0,
            Self::OneOther => usize::from(n != 1),
            Self::ZeroOneOther => usize::from(n != 0 && n != 1),
            Self::Slavic => {
                if n % 10 == 1 && n % 100 != 11 {
                    0
                } else if matches!(n % 10, 2..=4) && !matches!(n % 100, 12..=14) {
                    1
                } else {
                    2
                }
            }
            Self::CzechSlovak => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
            Self::Polish => {
                if n == 1 {
                    0
                } else if matches!(n % 10, 2..=4) && !matches!(n % 100, 12..=14) {
                    1
                } else {
                    2
                }
            }
            Self::Lithuanian => {
                if n % 10 == 1 && n % 100 != 11 {
                    0
                } else if matches!(n % 10, 2..=9) && !matches!(n % 100, 12..=19) {
                    1
                } else {
                    2
                }
            }
            Self::Latvian => {
                if n == 0 {
                    0
                } else if n % 10 == 1 && n % 100 != 11 {
                    1
                } else {
                    2
                }
            }
            Self::Romanian => {
                if n == 1 {
                    0
                } else if n == 0 || matches!(n % 100, 1..=19) {
                    1
                } else {
                    2
                }
            }
            Self::Irish => match n {
                1 => 0,
                2 => 1,
                _ => 2,
            },
            Self::Slovenian => match n % 100 {
                1 => 0,
                2 => 1,
                3 | 4 => 2,
                _ => 3,
            },
            Self::Maltese => {
                if n == 1 {
                    0
                } else if n == 0 || matches!(n % 100, 2..=10) {
                    1
                } else if matches!(n % 100, 11..=19) {
                    2
                } else {
                    3
                }
            }
            Self::Welsh => match n {
                1 => 0,
                2 => 1,
                8 | 11 => 2,
                _ => 3,
            },
            Self::Arabic => {
                if n == 0 {
                    0
                } else if n == 1 {
                    1
                } else if n == 2 {
                    2
                } else if matches!(n % 100, 3..=10) {
                    3
                } else if matches!(n % 100, 11..=99) {
                    4
                } else {
                    5
                }
            }
            Self::Macedonian => usize::from(n % 10 != 1),
        }
    }

    /// Number of distinct forms a complete template for this rule carries.
    #[must_use]
    pub fn form_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::OneOther | Self::ZeroOneOther | Self::Macedonian => 2,
            Self::Slavic
            | Self::CzechSlovak
            | Self::Polish
            | Self::Lithuanian
            | Self::Latvian
            | Self::Romanian
            | Self::Irish => 3,
            Self::Slovenian | Self::Maltese | Self::Welsh => 4,
            Self::Arabic => 6,
        }
    }
}

/// Returns the language portion of a locale tag (`"en"` for `"en-US"` or `"en_US"`).
#[must_use]
pub fn base_language(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}

/// Plural form index for `count` in `locale`.
#[must_use]
pub fn plural_index(locale: &str, count: i64) -> usize {
    PluralRule::for_locale(locale).index(count)
}
