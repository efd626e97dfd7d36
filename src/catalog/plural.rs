//! Numerus form selection.
//!
//! Qt stores plural translations as an ordered list of `<numerusform>`
//! elements; the order is fixed per language family. These rules map a
//! count to an index in that list.

use crate::input::translation::{
    normalize_locale,
    primary_language,
};

/// Plural rule families, in the form order lupdate uses for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralRule {
    /// One form (Chinese, Japanese, Korean, ...).
    Single,
    /// `n == 1`, other (English, German, Dutch, ...).
    English,
    /// `n <= 1`, other (French, Brazilian Portuguese, ...).
    French,
    /// `n % 10 == 1 && n % 100 != 11`, other.
    Icelandic,
    /// one, few, many (Russian, Ukrainian, Serbian, Croatian, ...).
    EastSlavic,
    /// one, few, many with `n == 1` only for the singular.
    Polish,
    /// one, `2..=4`, other (Czech, Slovak).
    Czech,
    /// one, few, other.
    Lithuanian,
    /// one, other, zero.
    Latvian,
    /// one, two, other.
    Irish,
    /// one, few, other.
    Romanian,
    /// one, two, few, other, keyed on `n % 100`.
    Slovenian,
    /// zero, one, two, few, many, other.
    Arabic,
}

impl PluralRule {
    /// Picks the rule for a locale code such as `zh-CN` or `pt_BR`.
    ///
    /// Unknown languages use [`PluralRule::English`].
    #[must_use]
    pub fn for_language(language: &str) -> Self {
        let normalized = normalize_locale(language);
        if normalized == "pt_br" {
            return Self::French;
        }

        match primary_language(&normalized) {
            "bo" | "fa" | "hu" | "id" | "ja" | "jv" | "ko" | "ms" | "my" | "su" | "th" | "tr"
            | "vi" | "yo" | "zh" => Self::Single,
            "fil" | "fr" | "ln" | "oc" | "ti" | "tl" => Self::French,
            "is" => Self::Icelandic,
            "be" | "bs" | "hr" | "ru" | "sr" | "uk" => Self::EastSlavic,
            "pl" => Self::Polish,
            "cs" | "sk" => Self::Czech,
            "lt" => Self::Lithuanian,
            "lv" => Self::Latvian,
            "ga" => Self::Irish,
            "ro" => Self::Romanian,
            "sl" => Self::Slovenian,
            "ar" => Self::Arabic,
            _ => Self::English,
        }
    }

    /// Number of numerus forms a complete translation carries.
    #[must_use]
    pub const fn form_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::English | Self::French | Self::Icelandic => 2,
            Self::EastSlavic
            | Self::Polish
            | Self::Czech
            | Self::Lithuanian
            | Self::Latvian
            | Self::Irish
            | Self::Romanian => 3,
            Self::Slovenian => 4,
            Self::Arabic => 6,
        }
    }

    /// Index of the numerus form to use for count `n`.
    #[must_use]
    pub fn form_index(self, n: i64) -> usize {
        let n = n.unsigned_abs();
        let mod10 = n % 10;
        let mod100 = n % 100;

        match self {
            Self::Single => 0,
            Self::English => usize::from(n != 1),
            Self::French => usize::from(n > 1),
            Self::Icelandic => usize::from(!(mod10 == 1 && mod100 != 11)),
            Self::EastSlavic => {
                if mod10 == 1 && mod100 != 11 {
                    0
                } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
                    1
                } else {
                    2
                }
            }
            Self::Czech => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
            Self::Lithuanian => {
                if mod10 == 1 && mod100 != 11 {
                    0
                } else if mod10 >= 2 && !(10..20).contains(&mod100) {
                    1
                } else {
                    2
                }
            }
            Self::Latvian => {
                if mod10 == 1 && mod100 != 11 {
                    0
                } else if n != 0 {
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
            Self::Romanian => {
                if n == 1 {
                    0
                } else if n == 0 || (1..=19).contains(&mod100) {
                    1
                } else {
                    2
                }
            }
            Self::Slovenian => match mod100 {
                1 => 0,
                2 => 1,
                3 | 4 => 2,
                _ => 3,
            },
            Self::Arabic => match n {
                0 => 0,
                1 => 1,
                2 => 2,
                _ if (3..=10).contains(&mod100) => 3,
                _ if mod100 >= 11 => 4,
                _ => 5,
            },
        }
    }
}

/// Selects the numerus form for `n`, clamped to the forms actually present.
///
/// Returns `None` if `forms` is empty.
#[must_use]
pub fn select_form<'a>(forms: &'a [String], language: Option<&str>, n: i64) -> Option<&'a str> {
    let rule = language.map_or(PluralRule::English, PluralRule::for_language);
    let last = forms.len().checked_sub(1)?;
    forms.get(rule.form_index(n).min(last)).map(String::as_str)
}
