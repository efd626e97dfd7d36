//! Translation progress counters.

use serde::Serialize;

use crate::ir::{
    Message,
    TranslationState,
};

/// Per-catalog message counts, as reported by `lrelease`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub contexts: usize,
    pub messages: usize,
    /// Finished messages with a translation.
    pub finished: usize,
    /// Unfinished messages with a translation.
    pub unfinished: usize,
    /// Obsolete and vanished messages.
    pub obsolete: usize,
    /// Live messages without any translation text.
    pub untranslated: usize,
}

impl CatalogStats {
    /// Tallies `messages` by state.
    pub(super) fn collect<'a>(
        contexts: usize,
        messages: impl Iterator<Item = &'a Message>,
    ) -> Self {
        let mut stats = Self { contexts, ..Self::default() };

        for message in messages {
            stats.messages += 1;
            if message.state.is_retired() {
                stats.obsolete += 1;
            } else if !message.has_translation() {
                stats.untranslated += 1;
            } else if message.state == TranslationState::Unfinished {
                stats.unfinished += 1;
            } else {
                stats.finished += 1;
            }
        }

        stats
    }
}
