//! Immutable translation catalog with source-string fallback.
//!
//! # Invariants
//!
//! 1. **Never blank**: every lookup returns either a non-empty stored
//!    translation or the caller's source text.
//!
//! 2. **Read-only**: a `Catalog` is never mutated after
//!    [`CatalogBuilder::build`]; it is `Send + Sync` and shared through `Arc`.
//!
//! 3. **First match wins**: when several entries share a key, the entry
//!    that was added first is preferred.

use std::collections::HashMap;

use super::plural::select_form;
use super::stats::CatalogStats;
use super::{
    CatalogBuilder,
    CatalogError,
};
use crate::config::CatalogSettings;
use crate::input::reader::parse_ts;
use crate::input::writer::write_ts;
use crate::ir::{
    Context,
    Message,
    TranslationState,
    TsDocument,
};
use crate::types::SourceLocation;

/// One translatable unit: a message and the context it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub context: String,
    pub message: Message,
}

/// A loaded translation catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Format version of the first document added.
    pub(super) version: String,
    /// Target language of the first document that declares one.
    pub(super) language: Option<String>,
    /// Authoring language of the first document that declares one.
    pub(super) source_language: Option<String>,
    /// All entries in insertion order, including obsolete ones.
    pub(super) entries: Vec<Entry>,
    /// Context names in order of first appearance.
    pub(super) contexts: Vec<String>,
    /// context -> source -> indices into `entries`
    pub(super) index: HashMap<String, HashMap<String, Vec<usize>>>,
    /// Serve `type="unfinished"` translations.
    pub(super) include_unfinished: bool,
}

impl Catalog {
    /// The fallback catalog: every lookup returns the source text.
    #[must_use]
    pub fn empty() -> Self {
        CatalogBuilder::new().build()
    }

    /// Parse a TS document with default settings.
    ///
    /// # Errors
    /// - [`CatalogError::Parse`] for malformed input
    /// - [`CatalogError::Version`] for an unsupported format version
    pub fn load(data: &str) -> Result<Self, CatalogError> {
        Self::load_with(data, &CatalogSettings::default())
    }

    /// Parse a TS document with explicit settings.
    ///
    /// # Errors
    /// - [`CatalogError::Parse`] for malformed input
    /// - [`CatalogError::Version`] for a version not in `settings.supported_versions`
    pub fn load_with(data: &str, settings: &CatalogSettings) -> Result<Self, CatalogError> {
        let document = parse_ts(data, &settings.supported_versions)?;
        let mut builder = CatalogBuilder::new().include_unfinished(settings.include_unfinished);
        builder.add_document(document);
        Ok(builder.build())
    }

    /// Returns the translation for `(context, source_text)`, or `source_text` itself.
    ///
    /// Matching is exact and case-sensitive. Disambiguation comments are ignored.
    #[must_use]
    pub fn lookup<'a>(&'a self, context: &str, source_text: &'a str) -> &'a str {
        self.candidates(context, source_text)
            .find(|message| self.is_usable(message))
            .map_or(source_text, Message::display_text)
    }

    /// Like [`Catalog::lookup`], but picks among entries sharing the key by location.
    ///
    /// If no entry was recorded at `location`, falls back to the first usable entry.
    #[must_use]
    pub fn disambiguate<'a>(
        &'a self,
        context: &str,
        source_text: &'a str,
        location: &SourceLocation,
    ) -> &'a str {
        match self.candidates(context, source_text).find(|message| message.is_at(location)) {
            Some(message) if self.is_usable(message) => message.display_text(),
            Some(_) => source_text,
            None => self.lookup(context, source_text),
        }
    }

    /// Qt-style lookup keyed by `(context, source, comment)`.
    ///
    /// With a comment, entries carrying that comment are tried first, then
    /// entries without one. Without a comment only comment-less entries match.
    #[must_use]
    pub fn translate<'a>(
        &'a self,
        context: &str,
        source_text: &'a str,
        comment: Option<&str>,
    ) -> &'a str {
        self.find_with_comment(context, source_text, comment)
            .map_or(source_text, Message::display_text)
    }

    /// Plural-aware lookup. Every `%n` in the result is replaced by `n`.
    ///
    /// The numerus form is chosen with the catalog language's plural rule.
    /// Falls back to `source_text` when no non-empty form is available.
    #[must_use]
    pub fn translate_plural(
        &self,
        context: &str,
        source_text: &str,
        comment: Option<&str>,
        n: i64,
    ) -> String {
        let translated = self
            .find_with_comment(context, source_text, comment)
            .and_then(|message| {
                if message.numerus {
                    select_form(&message.numerus_forms, self.language.as_deref(), n)
                } else {
                    Some(message.display_text())
                }
            })
            .filter(|text| !text.is_empty())
            .unwrap_or(source_text);

        translated.replace("%n", &n.to_string())
    }

    /// Returns true if a usable translation exists for `(context, source_text)`.
    #[must_use]
    pub fn contains(&self, context: &str, source_text: &str) -> bool {
        self.candidates(context, source_text).any(|message| self.is_usable(message))
    }

    /// Number of entries, including untranslated and obsolete ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Context names in order of first appearance.
    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        self.contexts.iter().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    #[must_use]
    pub fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        CatalogStats::collect(self.contexts.len(), self.entries.iter().map(|entry| &entry.message))
    }

    /// Rebuild a TS document, grouping entries by context.
    #[must_use]
    pub fn to_document(&self) -> TsDocument {
        let mut document = TsDocument::new(self.language.clone(), self.source_language.clone());
        if !self.version.is_empty() {
            document.version.clone_from(&self.version);
        }

        let mut positions: HashMap<&str, usize> = HashMap::new();
        for entry in &self.entries {
            let position = *positions.entry(entry.context.as_str()).or_insert_with(|| {
                document.contexts.push(Context::new(entry.context.clone()));
                document.contexts.len() - 1
            });
            if let Some(context) = document.contexts.get_mut(position) {
                context.messages.push(entry.message.clone());
            }
        }

        document
    }

    /// Serialize back to TS XML.
    ///
    /// # Errors
    /// Returns [`CatalogError::Write`] if serialization fails.
    pub fn to_ts_string(&self) -> Result<String, CatalogError> {
        write_ts(&self.to_document())
    }

    /// Entries sharing `(context, source_text)`, in insertion order.
    fn candidates<'s>(
        &'s self,
        context: &str,
        source_text: &str,
    ) -> impl Iterator<Item = &'s Message> + use<'s> {
        self.index
            .get(context)
            .and_then(|sources| sources.get(source_text))
            .into_iter()
            .flatten()
            .filter_map(|&position| self.entries.get(position))
            .map(|entry| &entry.message)
    }

    /// Comment-keyed search shared by `translate` and `translate_plural`.
    fn find_with_comment<'s>(
        &'s self,
        context: &str,
        source_text: &str,
        comment: Option<&str>,
    ) -> Option<&'s Message> {
        if let Some(wanted) = comment.filter(|comment| !comment.is_empty())
            && let Some(found) = self.candidates(context, source_text).find(|message| {
                disambiguation(message) == Some(wanted) && self.is_usable(message)
            })
        {
            return Some(found);
        }

        self.candidates(context, source_text)
            .find(|message| disambiguation(message).is_none() && self.is_usable(message))
    }

    /// Whether `message` may be served as a translation.
    fn is_usable(&self, message: &Message) -> bool {
        if message.state.is_retired() {
            return false;
        }
        if message.state == TranslationState::Unfinished && !self.include_unfinished {
            return false;
        }
        message.has_translation()
    }
}

/// Non-empty disambiguation comment of `message`.
fn disambiguation(message: &Message) -> Option<&str> {
    message.comment.as_deref().filter(|comment| !comment.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    const DRAWING: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="zh-CN" sourcelanguage="en">
  <context>
    <name>CmdDrawingOpen</name>
    <message>
      <location filename="../../Command.cpp" line="58"/>
      <source>Drawing</source>
      <translation>图纸</translation>
    </message>
    <message>
      <location filename="../../Command.cpp" line="59"/>
      <source>Open SVG...</source>
      <translation>打开SVG...</translation>
    </message>
    <message>
      <location filename="../../Command.cpp" line="60"/>
      <source>Open a scalable vector graphic</source>
      <translation></translation>
    </message>
  </context>
  <context>
    <name>Workbench</name>
    <message>
      <location filename="../../Workbench.cpp" line="34"/>
      <source>Drawing</source>
      <translation>图纸</translation>
    </message>
  </context>
</TS>
"#;

    fn drawing() -> Catalog {
        Catalog::load(DRAWING).unwrap()
    }

    #[rstest]
    #[case("Workbench", "Drawing", "图纸")]
    #[case("CmdDrawingOpen", "Open SVG...", "打开SVG...")]
    #[case("CmdDrawingOpen", "Some untranslated string", "Some untranslated string")]
    #[case("CmdDrawingOpen", "Open a scalable vector graphic", "Open a scalable vector graphic")]
    #[case("cmddrawingopen", "Open SVG...", "Open SVG...")]
    #[case("CmdDrawingOpen", "open svg...", "open svg...")]
    #[case("NoSuchContext", "Drawing", "Drawing")]
    fn test_lookup(#[case] context: &str, #[case] source: &str, #[case] expected: &str) {
        assert_eq!(drawing().lookup(context, source), expected);
    }

    #[googletest::test]
    fn test_empty_catalog_falls_back() {
        let catalog = Catalog::empty();

        expect_that!(catalog.lookup("Workbench", "Drawing"), eq("Drawing"));
        expect_that!(catalog.is_empty(), eq(true));
        expect_that!(catalog.language(), none());
    }

    #[googletest::test]
    fn test_metadata_accessors() {
        let catalog = drawing();

        expect_that!(catalog.len(), eq(4));
        expect_that!(catalog.language(), some(eq("zh-CN")));
        expect_that!(catalog.source_language(), some(eq("en")));
        assert_eq!(catalog.contexts().collect::<Vec<_>>(), vec!["CmdDrawingOpen", "Workbench"]);
        expect_that!(catalog.contains("CmdDrawingOpen", "Drawing"), eq(true));
        expect_that!(catalog.contains("CmdDrawingOpen", "Open a scalable vector graphic"), eq(false));
    }

    fn ambiguous() -> Catalog {
        let document = TsDocument::new(Some("de".to_string()), None).with_context(
            Context::new("DrawingGui::TaskOrthoViews")
                .with_message(Message::new("Top", "Oben").with_location("TaskOrthoViews.ui", 40))
                .with_message(
                    Message::new("Top", "Draufsicht")
                        .with_comment("view")
                        .with_location("TaskOrthoViews.cpp", 120),
                )
                .with_message(
                    Message::new("Top", "").with_comment("margin").with_location("TaskOrthoViews.cpp", 300),
                ),
        );
        let mut builder = CatalogBuilder::new();
        builder.add_document(document);
        builder.build()
    }

    #[rstest]
    #[case::first_location(SourceLocation::new("TaskOrthoViews.ui", Some(40)), "Oben")]
    #[case::second_location(SourceLocation::new("TaskOrthoViews.cpp", Some(120)), "Draufsicht")]
    #[case::lineless(SourceLocation::new("TaskOrthoViews.cpp", None), "Draufsicht")]
    #[case::untranslated_match(SourceLocation::new("TaskOrthoViews.cpp", Some(300)), "Top")]
    #[case::no_match_uses_first(SourceLocation::new("Command.cpp", Some(1)), "Oben")]
    fn test_disambiguate(#[case] location: SourceLocation, #[case] expected: &str) {
        assert_eq!(ambiguous().disambiguate("DrawingGui::TaskOrthoViews", "Top", &location), expected);
    }

    #[rstest]
    #[case(None, "Oben")]
    #[case(Some("view"), "Draufsicht")]
    #[case(Some("margin"), "Oben")]
    #[case(Some("unknown"), "Oben")]
    #[case(Some(""), "Oben")]
    fn test_translate_with_comment(#[case] comment: Option<&str>, #[case] expected: &str) {
        assert_eq!(ambiguous().translate("DrawingGui::TaskOrthoViews", "Top", comment), expected);
    }

    #[googletest::test]
    fn test_translate_without_comment_ignores_commented_entries() {
        let document = TsDocument::new(None, None).with_context(
            Context::new("C").with_message(Message::new("Top", "Oben").with_comment("view")),
        );
        let mut builder = CatalogBuilder::new();
        builder.add_document(document);
        let catalog = builder.build();

        expect_that!(catalog.translate("C", "Top", None), eq("Top"));
        expect_that!(catalog.lookup("C", "Top"), eq("Oben"));
    }

    fn with_state(state: TranslationState, include_unfinished: bool) -> Catalog {
        let document = TsDocument::new(None, None).with_context(
            Context::new("QObject").with_message(Message::new("No page found", "没有找到页面").with_state(state)),
        );
        let mut builder = CatalogBuilder::new().include_unfinished(include_unfinished);
        builder.add_document(document);
        builder.build()
    }

    #[rstest]
    #[case(TranslationState::Finished, true, "没有找到页面")]
    #[case(TranslationState::Unfinished, true, "没有找到页面")]
    #[case(TranslationState::Unfinished, false, "No page found")]
    #[case(TranslationState::Obsolete, true, "No page found")]
    #[case(TranslationState::Vanished, true, "No page found")]
    fn test_lookup_respects_state(
        #[case] state: TranslationState,
        #[case] include_unfinished: bool,
        #[case] expected: &str,
    ) {
        assert_eq!(with_state(state, include_unfinished).lookup("QObject", "No page found"), expected);
    }

    fn plural_catalog(language: &str, forms: &[&str]) -> Catalog {
        let document = TsDocument::new(Some(language.to_string()), None).with_context(
            Context::new("QObject")
                .with_message(Message::new("%n page(s)", "").with_numerus_forms(forms.iter().copied()))
                .with_message(Message::new("%n file(s)", "%n 个文件")),
        );
        let mut builder = CatalogBuilder::new();
        builder.add_document(document);
        builder.build()
    }

    #[rstest]
    #[case("ru", &["%n страница", "%n страницы", "%n страниц"], 1, "1 страница")]
    #[case("ru", &["%n страница", "%n страницы", "%n страниц"], 3, "3 страницы")]
    #[case("ru", &["%n страница", "%n страницы", "%n страниц"], 11, "11 страниц")]
    #[case("zh-CN", &["%n 页"], 7, "7 页")]
    #[case("de", &["%n Seite", ""], 2, "2 page(s)")]
    #[case("de", &["%n Seite"], 2, "2 Seite")]
    fn test_translate_plural(
        #[case] language: &str,
        #[case] forms: &[&str],
        #[case] n: i64,
        #[case] expected: &str,
    ) {
        let catalog = plural_catalog(language, forms);

        assert_eq!(catalog.translate_plural("QObject", "%n page(s)", None, n), expected);
    }

    #[googletest::test]
    fn test_translate_plural_plain_message_and_fallback() {
        let catalog = plural_catalog("zh-CN", &["%n 页"]);

        expect_that!(catalog.translate_plural("QObject", "%n file(s)", None, 4).as_str(), eq("4 个文件"));
        expect_that!(catalog.translate_plural("QObject", "%n item(s)", None, 4).as_str(), eq("4 item(s)"));
    }

    #[googletest::test]
    fn test_plural_message_without_count_uses_first_form() {
        let catalog = Catalog::load(
            r#"<TS version="2.1" language="zh_CN"><context><name>QObject</name>
            <message numerus="yes">
                <location filename="page.cpp" line="3"/>
                <source>%n page(s)</source>
                <translation><numerusform>%n 页</numerusform></translation>
            </message>
            </context></TS>"#,
        )
        .unwrap();

        expect_that!(catalog.lookup("QObject", "%n page(s)"), eq("%n 页"));
        expect_that!(catalog.translate("QObject", "%n page(s)", None), eq("%n 页"));
        expect_that!(
            catalog.disambiguate("QObject", "%n page(s)", &SourceLocation::new("page.cpp", Some(3))),
            eq("%n 页")
        );
        expect_that!(catalog.translate_plural("QObject", "%n page(s)", None, 2).as_str(), eq("2 页"));
    }

    #[googletest::test]
    fn test_loading_twice_is_equivalent() {
        let first = drawing();
        let second = drawing();

        for entry in first.entries() {
            expect_that!(
                first.lookup(&entry.context, &entry.message.source),
                eq(second.lookup(&entry.context, &entry.message.source))
            );
        }
    }

    #[googletest::test]
    fn test_round_trip_preserves_lookups() {
        let catalog = drawing();

        let reloaded = Catalog::load(&catalog.to_ts_string().unwrap()).unwrap();

        expect_that!(reloaded.len(), eq(catalog.len()));
        for entry in catalog.entries() {
            expect_that!(
                reloaded.lookup(&entry.context, &entry.message.source),
                eq(catalog.lookup(&entry.context, &entry.message.source))
            );
        }
    }

    #[googletest::test]
    fn test_load_errors() {
        let settings = CatalogSettings {
            supported_versions: vec!["2.0".to_string()],
            ..CatalogSettings::default()
        };

        expect_that!(matches!(Catalog::load("<TS"), Err(CatalogError::Parse { .. })), eq(true));
        expect_that!(
            matches!(Catalog::load_with(DRAWING, &settings), Err(CatalogError::Version { .. })),
            eq(true)
        );
    }
}
