//! File pattern matcher for translation catalogs.

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};

use super::CatalogSettings;

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Invalid translation include pattern '{pattern}': {source}")]
    InvalidIncludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid translation exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

/// Matches `.ts` files under a translations root against configured glob patterns.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    /// Directory the patterns are relative to.
    root: PathBuf,
    /// `translationFiles.includePatterns`
    include_set: GlobSet,
    /// `translationFiles.excludePatterns`
    exclude_set: GlobSet,
}

impl FileMatcher {
    /// Creates a new matcher from settings.
    pub fn new(root: PathBuf, settings: &CatalogSettings) -> Result<Self, MatcherError> {
        let include_set =
            Self::build_glob_set(&settings.translation_files.include_patterns, |pattern, source| {
                MatcherError::InvalidIncludePattern { pattern, source }
            })?;

        let exclude_set =
            Self::build_glob_set(&settings.translation_files.exclude_patterns, |pattern, source| {
                MatcherError::InvalidExcludePattern { pattern, source }
            })?;

        Ok(Self { root, include_set, exclude_set })
    }

    /// Compiles `patterns` into one set, mapping the first bad pattern through `make_error`.
    fn build_glob_set<F>(patterns: &[String], make_error: F) -> Result<GlobSet, MatcherError>
    where
        F: Fn(String, globset::Error) -> MatcherError,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| make_error(pattern.clone(), e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns true if the path matches `includePatterns` but not `excludePatterns`.
    ///
    /// The path must be absolute and under the translations root.
    #[must_use]
    pub fn is_translation_file(&self, absolute_path: &Path) -> bool {
        let Some(relative_path) = absolute_path.strip_prefix(&self.root).ok() else {
            return false;
        };

        self.is_translation_file_relative(relative_path)
    }

    /// Returns true if the path matches `includePatterns` but not `excludePatterns`.
    ///
    /// The path must be relative to the translations root.
    #[must_use]
    pub fn is_translation_file_relative(&self, relative_path: &Path) -> bool {
        self.include_set.is_match(relative_path) && !self.exclude_set.is_match(relative_path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::path::PathBuf;

    use rstest::rstest;

    use super::*;
    use crate::config::TranslationFilesConfig;

    fn create_settings(include: &[&str], exclude: &[&str]) -> CatalogSettings {
        CatalogSettings {
            translation_files: TranslationFilesConfig {
                include_patterns: include.iter().copied().map(String::from).collect(),
                exclude_patterns: exclude.iter().copied().map(String::from).collect(),
            },
            ..CatalogSettings::default()
        }
    }

    #[rstest]
    fn is_translation_file_with_default_pattern() {
        let settings = CatalogSettings::default();
        let matcher = FileMatcher::new(PathBuf::from("/freecad"), &settings).expect("valid patterns");

        assert!(matcher.is_translation_file(Path::new(
            "/freecad/src/Mod/Drawing/Gui/Resources/translations/Drawing_zh-CN.ts"
        )));
        assert!(matcher.is_translation_file(Path::new("/freecad/Drawing_de.ts")));

        assert!(!matcher.is_translation_file(Path::new("/freecad/Drawing_de.qm")));
        assert!(!matcher.is_translation_file(Path::new("/freecad/src/Command.cpp")));
    }

    #[rstest]
    fn is_translation_file_with_exclude() {
        let settings = create_settings(&["**/translations/*.ts"], &["**/build/**"]);
        let matcher = FileMatcher::new(PathBuf::from("/freecad"), &settings).expect("valid patterns");

        assert!(matcher.is_translation_file(Path::new("/freecad/Gui/translations/Drawing_fr.ts")));
        assert!(!matcher.is_translation_file(Path::new("/freecad/build/translations/Drawing_fr.ts")));
        assert!(!matcher.is_translation_file(Path::new("/freecad/Gui/Drawing_fr.ts")));
    }

    #[rstest]
    fn is_translation_file_outside_root() {
        let settings = CatalogSettings::default();
        let matcher = FileMatcher::new(PathBuf::from("/freecad"), &settings).expect("valid patterns");

        assert!(!matcher.is_translation_file(Path::new("/other/Drawing_fr.ts")));
    }

    #[rstest]
    fn is_translation_file_relative_works() {
        let settings = create_settings(&["translations/*.ts"], &[]);
        let matcher = FileMatcher::new(PathBuf::from("/freecad"), &settings).expect("valid patterns");

        assert!(matcher.is_translation_file_relative(Path::new("translations/Drawing_ja.ts")));
        assert!(!matcher.is_translation_file_relative(Path::new("Drawing_ja.ts")));
    }

    #[rstest]
    fn new_with_invalid_include_pattern() {
        let settings = create_settings(&["**/*.{ts"], &[]);

        let result = FileMatcher::new(PathBuf::from("/freecad"), &settings);

        assert!(matches!(result.unwrap_err(), MatcherError::InvalidIncludePattern { .. }));
    }

    #[rstest]
    fn new_with_invalid_exclude_pattern() {
        let settings = create_settings(&["**/*.ts"], &["[invalid"]);

        let result = FileMatcher::new(PathBuf::from("/freecad"), &settings);

        assert!(matches!(result.unwrap_err(), MatcherError::InvalidExcludePattern { .. }));
    }

    #[rstest]
    fn root_accessor() {
        let settings = CatalogSettings::default();
        let matcher = FileMatcher::new(PathBuf::from("/freecad"), &settings).expect("valid patterns");

        assert_eq!(matcher.root(), Path::new("/freecad"));
    }
}
