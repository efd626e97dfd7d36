//! 翻訳メッセージの中間表現

use serde::Serialize;

use crate::types::SourceLocation;

/// State of a translation, taken from the `type` attribute of `<translation>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TranslationState {
    /// No `type` attribute: reviewed and released.
    #[default]
    Finished,
    /// `type="unfinished"`: usable, but not yet reviewed.
    Unfinished,
    /// `type="obsolete"`: the source string no longer exists in the code.
    Obsolete,
    /// `type="vanished"`: like obsolete, written by newer lupdate versions.
    Vanished,
}

impl TranslationState {
    /// Parses the `type` attribute value. Unknown values are treated as `None`.
    #[must_use]
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "unfinished" => Some(Self::Unfinished),
            "obsolete" => Some(Self::Obsolete),
            "vanished" => Some(Self::Vanished),
            _ => None,
        }
    }

    /// Attribute value written back on serialization. `None` for finished messages.
    #[must_use]
    pub const fn as_attribute(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Obsolete => Some("obsolete"),
            Self::Vanished => Some("vanished"),
        }
    }

    /// Obsolete and vanished messages never contribute a translation.
    #[must_use]
    pub const fn is_retired(self) -> bool {
        matches!(self, Self::Obsolete | Self::Vanished)
    }
}

/// One `<message>` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    /// `id` attribute (`lupdate -idbased`).
    pub id: Option<String>,

    /// Source text; the lookup key.
    pub source: String,

    /// Source text before the last `lupdate` run.
    pub old_source: Option<String>,

    /// Disambiguation comment (`<comment>`).
    pub comment: Option<String>,

    pub old_comment: Option<String>,

    /// Developer note for translators (`<extracomment>`).
    pub extra_comment: Option<String>,

    pub translator_comment: Option<String>,

    /// Translated text. Empty means "not yet translated".
    pub translation: String,

    pub state: TranslationState,

    /// `numerus="yes"`
    pub numerus: bool,

    /// `<numerusform>` children, in the language's plural-rule order.
    pub numerus_forms: Vec<String>,

    pub locations: Vec<SourceLocation>,
}

impl Message {
    /// Creates a finished, non-numerus message.
    #[must_use]
    pub fn new(source: impl Into<String>, translation: impl Into<String>) -> Self {
        Self { source: source.into(), translation: translation.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_location(mut self, filename: impl Into<String>, line: u32) -> Self {
        self.locations.push(SourceLocation::new(filename, Some(line)));
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub const fn with_state(mut self, state: TranslationState) -> Self {
        self.state = state;
        self
    }

    /// Turns this message into a numerus message with the given plural forms.
    #[must_use]
    pub fn with_numerus_forms<I, S>(mut self, forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numerus = true;
        self.numerus_forms = forms.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true if the message carries a non-empty translation.
    ///
    /// For numerus messages at least one plural form must be non-empty.
    #[must_use]
    pub fn has_translation(&self) -> bool {
        if self.numerus {
            self.numerus_forms.iter().any(|form| !form.is_empty())
        } else {
            !self.translation.is_empty()
        }
    }

    /// Text to show when no count is known.
    ///
    /// For numerus messages this is the first non-empty plural form, which is
    /// what Qt returns for `n == -1`.
    #[must_use]
    pub fn display_text(&self) -> &str {
        if self.numerus {
            self.numerus_forms.iter().map(String::as_str).find(|form| !form.is_empty()).unwrap_or("")
        } else {
            &self.translation
        }
    }

    /// Returns true if any recorded location matches `location`.
    #[must_use]
    pub fn is_at(&self, location: &SourceLocation) -> bool {
        self.locations.iter().any(|own| own.matches(location))
    }
}
