use std::path::PathBuf;

use thiserror::Error;

/// Errors that may occur while loading or writing a translation catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The document is not well-formed XML or does not follow the TS layout
    #[error("Failed to parse translation catalog at byte {position}: {message}")]
    Parse { position: u64, message: String },

    /// The `version` attribute of `<TS>` is not in the supported set
    #[error("Unsupported TS format version '{found}' (supported: {})", supported.join(", "))]
    Version { found: String, supported: Vec<String> },

    /// Error when failing to read a translation file
    #[error("Failed to read translation file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error when failing to serialize a catalog
    #[error("Failed to write translation catalog: {0}")]
    Write(String),
}

impl CatalogError {
    /// Shorthand for [`CatalogError::Parse`].
    pub(crate) fn parse(position: u64, message: impl Into<String>) -> Self {
        Self::Parse { position, message: message.into() }
    }

    /// Returns true for errors caused by the document content rather than I/O.
    #[must_use]
    pub const fn is_content_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Version { .. })
    }
}
