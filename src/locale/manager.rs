//! Active-locale state shared with the UI layer.

use std::path::Path;
use std::sync::atomic::{
    AtomicU64,
    Ordering,
};
use std::sync::{
    Arc,
    PoisonError,
    RwLock,
};

use futures::StreamExt;
use futures::stream;

use super::discovery::files_for_locale;
use super::types::{
    LoadReport,
    LocaleError,
    SkippedFile,
};
use crate::catalog::{
    Catalog,
    CatalogBuilder,
    CatalogError,
};
use crate::config::{
    CatalogSettings,
    ConfigError,
    FileMatcher,
};
use crate::input::translation::{
    TranslationFile,
    load_translation_file,
    normalize_locale,
};
use crate::types::SourceLocation;

/// The published locale and its catalog.
#[derive(Debug)]
struct LocaleState {
    /// `None` while no locale catalog is installed.
    locale: Option<String>,
    /// Catalog served to readers.
    catalog: Arc<Catalog>,
}

/// Owns the active catalog and replaces it as a whole on locale switch.
///
/// # Consistency
///
/// Readers take a snapshot (`Arc<Catalog>`) and never observe a partially
/// loaded catalog. Loading happens outside the lock; only the final reference
/// swap is done under it.
///
/// Every switch, install or clear takes a new generation number. A switch only
/// publishes if no later request has been made in the meantime, so overlapping
/// switches settle on the most recently requested locale.
pub struct LocaleManager {
    /// Settings used for discovery and loading.
    settings: CatalogSettings,
    /// Current snapshot
    state: RwLock<LocaleState>,
    /// Number of the latest publish request.
    generation: AtomicU64,
}

impl LocaleManager {
    /// Creates an unloaded manager serving the empty catalog.
    #[must_use]
    pub fn new(settings: CatalogSettings) -> Self {
        Self {
            settings,
            state: RwLock::new(LocaleState { locale: None, catalog: Arc::new(Catalog::empty()) }),
            generation: AtomicU64::new(0),
        }
    }

    /// Creates an unloaded manager with the settings found in `root`.
    ///
    /// See [`CatalogSettings::load`] for how `.ts-catalog.json` is resolved.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the settings file is unreadable or invalid.
    pub fn from_root(root: &Path) -> Result<Self, ConfigError> {
        CatalogSettings::load(root).map(Self::new)
    }

    #[must_use]
    pub const fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    /// Loads every translation file for `locale` under `root` and publishes the result.
    ///
    /// Switching to the source language installs the empty catalog. On error the
    /// empty catalog is installed, so lookups keep returning source text.
    ///
    /// If another switch, install or clear is requested while this one is
    /// loading, this result is discarded and the later request stands.
    pub async fn switch_locale(
        &self,
        root: &Path,
        locale: &str,
    ) -> Result<LoadReport, LocaleError> {
        let ticket = self.next_generation();

        if normalize_locale(locale) == normalize_locale(&self.settings.source_language) {
            tracing::debug!(locale, "Switching to source language");
            self.publish(ticket, Some(locale.to_string()), Catalog::empty());
            return Ok(LoadReport::new(locale));
        }

        match self.load_locale(root, locale).await {
            Ok((catalog, report)) => {
                tracing::info!(
                    locale,
                    files = report.loaded.len(),
                    entries = catalog.len(),
                    "Switched locale"
                );
                self.publish(ticket, Some(locale.to_string()), catalog);
                Ok(report)
            }
            Err(error) => {
                tracing::warn!(locale, %error, "Failed to load locale, using source text");
                self.publish(ticket, None, Catalog::empty());
                Err(error)
            }
        }
    }

    /// Discovers, reads and merges the files for `locale`.
    async fn load_locale(
        &self,
        root: &Path,
        locale: &str,
    ) -> Result<(Catalog, LoadReport), LocaleError> {
        let matcher = FileMatcher::new(root.to_path_buf(), &self.settings)?;
        let files = files_for_locale(&matcher, locale);
        if files.is_empty() {
            return Err(LocaleError::NoTranslationFiles {
                root: root.to_path_buf(),
                locale: locale.to_string(),
            });
        }

        let settings = &self.settings;
        let results: Vec<(TranslationFile, Result<_, CatalogError>)> = stream::iter(files)
            .map(|file| async move {
                let result = load_translation_file(&file.path, settings).await;
                (file, result)
            })
            .buffered(settings.loading.concurrency())
            .collect()
            .await;

        let count = results.len();
        let mut builder = CatalogBuilder::new().include_unfinished(settings.include_unfinished);
        let mut report = LoadReport::new(locale);
        let mut first_error = None;

        for (file, result) in results {
            match result {
                Ok(document) => {
                    builder.add_document(document);
                    report.loaded.push(file.path);
                }
                Err(error) => {
                    tracing::warn!(
                        path = %file.path.display(),
                        %error,
                        "Skipping translation file"
                    );
                    report.skipped.push(SkippedFile { path: file.path, reason: error.to_string() });
                    first_error.get_or_insert(error);
                }
            }
        }

        if report.loaded.is_empty()
            && let Some(source) = first_error
        {
            return Err(LocaleError::AllFilesFailed { locale: locale.to_string(), count, source });
        }

        let catalog = builder.build();
        report.stats = catalog.stats();
        Ok((catalog, report))
    }

    /// Publishes an externally built catalog for `locale`.
    pub fn install(&self, locale: impl Into<String>, catalog: Catalog) {
        let ticket = self.next_generation();
        self.publish(ticket, Some(locale.into()), catalog);
    }

    /// Returns to the unloaded state.
    pub fn clear(&self) {
        let ticket = self.next_generation();
        self.publish(ticket, None, Catalog::empty());
    }

    /// Registers a new publish request and returns its number.
    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Swaps in `catalog` under the write lock, unless a newer request exists.
    ///
    /// Returns false when the catalog was discarded.
    fn publish(&self, ticket: u64, locale: Option<String>, catalog: Catalog) -> bool {
        let catalog = Arc::new(catalog);
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let latest = self.generation.load(Ordering::Acquire);
        if ticket != latest {
            tracing::debug!(ticket, latest, ?locale, "Discarding catalog of a superseded request");
            return false;
        }
        *state = LocaleState { locale, catalog };
        true
    }

    /// Snapshot of the active catalog.
    #[must_use]
    pub fn current(&self) -> Arc<Catalog> {
        Arc::clone(&self.state.read().unwrap_or_else(PoisonError::into_inner).catalog)
    }

    #[must_use]
    pub fn locale(&self) -> Option<String> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).locale.clone()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.state.read().unwrap_or_else(PoisonError::into_inner).locale.is_some()
    }

    #[must_use]
    pub fn lookup(&self, context: &str, source_text: &str) -> String {
        self.current().lookup(context, source_text).to_string()
    }

    #[must_use]
    pub fn disambiguate(
        &self,
        context: &str,
        source_text: &str,
        location: &SourceLocation,
    ) -> String {
        self.current().disambiguate(context, source_text, location).to_string()
    }

    #[must_use]
    pub fn translate(&self, context: &str, source_text: &str, comment: Option<&str>) -> String {
        self.current().translate(context, source_text, comment).to_string()
    }

    #[must_use]
    pub fn translate_plural(
        &self,
        context: &str,
        source_text: &str,
        comment: Option<&str>,
        n: i64,
    ) -> String {
        self.current().translate_plural(context, source_text, comment, n)
    }
}

impl std::fmt::Debug for LocaleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleManager")
            .field("settings", &self.settings)
            .field("locale", &self.locale())
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .field("catalog", &"<Arc<Catalog>>")
            .finish()
    }
}
