//! Catalog construction from one or more parsed documents.

use std::collections::HashMap;

use super::store::{
    Catalog,
    Entry,
};
use crate::ir::TsDocument;

/// Collects documents into a [`Catalog`].
///
/// Entries keep the order in which documents and messages were added, so
/// for duplicate keys the earliest document wins.
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    /// Catalog under construction.
    catalog: Catalog,
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            catalog: Catalog {
                version: String::new(),
                language: None,
                source_language: None,
                entries: Vec::new(),
                contexts: Vec::new(),
                index: HashMap::new(),
                include_unfinished: true,
            },
        }
    }

    /// Whether `type="unfinished"` translations are served. Defaults to true.
    #[must_use]
    pub const fn include_unfinished(mut self, include: bool) -> Self {
        self.catalog.include_unfinished = include;
        self
    }

    /// Appends every message of `document`.
    ///
    /// Header attributes are taken from the first document that declares them.
    pub fn add_document(&mut self, document: TsDocument) -> &mut Self {
        let catalog = &mut self.catalog;
        if catalog.version.is_empty() {
            catalog.version = document.version;
        }
        if catalog.language.is_none() {
            catalog.language = document.language;
        }
        if catalog.source_language.is_none() {
            catalog.source_language = document.source_language;
        }

        for context in document.contexts {
            if !catalog.index.contains_key(&context.name) {
                catalog.contexts.push(context.name.clone());
            }
            let sources = catalog.index.entry(context.name.clone()).or_default();

            for message in context.messages {
                sources.entry(message.source.clone()).or_default().push(catalog.entries.len());
                catalog.entries.push(Entry { context: context.name.clone(), message });
            }
        }

        self
    }

    #[must_use]
    pub fn build(self) -> Catalog {
        tracing::trace!(
            entries = self.catalog.entries.len(),
            contexts = self.catalog.contexts.len(),
            "Built translation catalog"
        );
        self.catalog
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::ir::{
        Context,
        Message,
    };

    fn document(language: &str, translation: &str) -> TsDocument {
        TsDocument::new(Some(language.to_string()), Some("en".to_string())).with_context(
            Context::new("Workbench").with_message(Message::new("Drawing", translation)),
        )
    }

    #[googletest::test]
    fn test_earlier_document_wins() {
        let mut builder = CatalogBuilder::new();
        builder.add_document(document("zh-CN", "图纸")).add_document(document("zh-TW", "圖紙"));
        let catalog = builder.build();

        expect_that!(catalog.lookup("Workbench", "Drawing"), eq("图纸"));
        expect_that!(catalog.language(), some(eq("zh-CN")));
        expect_that!(catalog.len(), eq(2));
        expect_that!(catalog.contexts().count(), eq(1));
    }

    #[googletest::test]
    fn test_untranslated_entry_does_not_shadow_later_one() {
        let mut builder = CatalogBuilder::new();
        builder.add_document(document("zh-CN", "")).add_document(document("zh-CN", "图纸"));
        let catalog = builder.build();

        expect_that!(catalog.lookup("Workbench", "Drawing"), eq("图纸"));
    }

    #[googletest::test]
    fn test_empty_builder() {
        let catalog = CatalogBuilder::default().build();

        expect_that!(catalog.is_empty(), eq(true));
        expect_that!(catalog.lookup("Workbench", "Drawing"), eq("Drawing"));
    }
}
