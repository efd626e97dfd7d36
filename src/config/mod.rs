//! Catalog settings: file patterns, accepted format versions, loading limits.
/// Settings file loader
mod loader;
/// Translation file pattern matcher
mod matcher;
/// Configuration types and settings
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use matcher::{
    FileMatcher,
    MatcherError,
};
pub use types::{
    CatalogSettings,
    ConfigError,
    LoadingConfig,
    TranslationFilesConfig,
    ValidationError,
};
