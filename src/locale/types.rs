//! Locale loading results and errors.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{
    CatalogError,
    CatalogStats,
};
use crate::config::MatcherError;

/// A translation file that could not be loaded and was left out of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a successful locale switch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// Locale as requested by the caller.
    pub locale: String,
    /// Files merged into the catalog, in merge order.
    pub loaded: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
    pub stats: CatalogStats,
}

impl LoadReport {
    #[must_use]
    pub fn new(locale: impl Into<String>) -> Self {
        Self { locale: locale.into(), ..Self::default() }
    }
}

#[derive(Error, Debug)]
pub enum LocaleError {
    /// The configured file patterns could not be compiled
    #[error(transparent)]
    Matcher(#[from] MatcherError),

    /// Discovery found nothing for the requested locale
    #[error("No translation files for locale '{locale}' under {root}")]
    NoTranslationFiles { root: PathBuf, locale: String },

    /// Every candidate file failed to load
    #[error("All {count} translation files for locale '{locale}' failed to load: {source}")]
    AllFilesFailed {
        locale: String,
        count: usize,
        /// First failure, in discovery order.
        #[source]
        source: CatalogError,
    },
}
