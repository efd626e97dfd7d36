use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "translationFiles.includePatterns[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// バリデーションエラーを番号付きの一覧に整形する
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogSettings {
    pub translation_files: TranslationFilesConfig,

    /// Accepted values of the `version` attribute on `<TS>`.
    pub supported_versions: Vec<String>,

    /// Authoring language. Switching to it installs an empty catalog.
    pub source_language: String,

    /// Whether `type="unfinished"` translations are served.
    ///
    /// Matches `lrelease`, which keeps them unless `-nounfinished` is given.
    pub include_unfinished: bool,

    pub loading: LoadingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadingConfig {
    /// Number of translation files read concurrently.
    /// Default: 80% of CPU cores (minimum 1).
    pub num_threads: Option<usize>,
}

impl LoadingConfig {
    /// Resolves the effective concurrency for file loading.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.num_threads.unwrap_or_else(|| (num_cpus::get() * 4 / 5).max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationFilesConfig {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

impl Default for TranslationFilesConfig {
    fn default() -> Self {
        Self { include_patterns: vec!["**/*.ts".to_string()], exclude_patterns: Vec::new() }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            translation_files: TranslationFilesConfig::default(),
            supported_versions: vec!["1.1".to_string(), "2.0".to_string(), "2.1".to_string()],
            source_language: "en".to_string(),
            include_unfinished: true,
            loading: LoadingConfig::default(),
        }
    }
}

impl CatalogSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Zero loading threads
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.translation_files.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "translationFiles.includePatterns",
                "At least one pattern is required. Example: [\"**/translations/*.ts\"]",
            ));
        }

        for (index, pattern) in self.translation_files.include_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("translationFiles.includePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        for (index, pattern) in self.translation_files.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("translationFiles.excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if self.supported_versions.is_empty() {
            errors.push(ValidationError::new(
                "supportedVersions",
                "At least one version is required. Example: [\"2.0\", \"2.1\"]",
            ));
        }

        for (index, version) in self.supported_versions.iter().enumerate() {
            if version.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("supportedVersions[{index}]"),
                    "The version cannot be empty",
                ));
            }
        }

        if self.source_language.trim().is_empty() {
            errors.push(ValidationError::new(
                "sourceLanguage",
                "The source language cannot be empty. Example: \"en\"",
            ));
        }

        if self.loading.num_threads == Some(0) {
            errors.push(ValidationError::new(
                "loading.numThreads",
                "The thread count must be at least 1, or remove this field to use the default",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
