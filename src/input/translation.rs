//! Translation file input definitions

use std::collections::HashSet;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::LazyLock;

use crate::catalog::CatalogError;
use crate::config::CatalogSettings;
use crate::input::reader::parse_ts;
use crate::ir::TsDocument;

/// Locale codes that ship as Qt Linguist catalogs, in the spellings
/// lupdate-based projects use for file names.
static LANGUAGE_CODES: LazyLock<HashSet<String>> = LazyLock::new(|| {
    [
        "af", "ar", "be", "bg", "bs", "ca", "cs", "cy", "da", "de", "el", "en", "eo", "es",
        "es-AR", "es-ES", "et", "eu", "fa", "fi", "fil", "fr", "ga", "gl", "he", "hr", "hu",
        "hy", "id", "is", "it", "ja", "ka", "kab", "kk", "ko", "lt", "lv", "mk", "ms", "nb",
        "nl", "nn", "no", "pl", "pt", "pt-BR", "pt-PT", "ro", "ru", "sk", "sl", "sq", "sr",
        "sr-CS", "sv", "sv-SE", "th", "tr", "uk", "uz", "val-ES", "vi", "zh", "zh-CN", "zh-HK",
        "zh-TW",
    ]
    .iter()
    .map(|code| normalize_locale(code))
    .collect()
});

/// Normalize locale code (lowercase and replace - with _)
#[must_use]
pub fn normalize_locale(code: &str) -> String {
    code.to_lowercase().replace('-', "_")
}

/// Primary language subtag of a normalized locale (`zh_cn` -> `zh`).
#[must_use]
pub fn primary_language(normalized: &str) -> &str {
    normalized.split('_').next().unwrap_or(normalized)
}

/// Returns true if `code` is a known locale code in any spelling.
fn is_locale_code(code: &str) -> bool {
    LANGUAGE_CODES.contains(&normalize_locale(code))
}

/// A `.ts` file found on disk, with module and locale taken from its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationFile {
    pub path: PathBuf,

    /// Module the catalog belongs to (`Drawing` for `Drawing_zh-CN.ts`).
    pub module: Option<String>,

    /// Locale as spelled in the path (`zh-CN`, `zh_CN`).
    pub locale: String,
}

impl TranslationFile {
    /// Detect module and locale from a file path.
    ///
    /// Tries, in order:
    /// - `zh-CN.ts` -> locale from the whole file stem
    /// - `Drawing_zh-CN.ts`, `Drawing_zh_CN.ts` -> `<module>_<locale>`
    /// - `zh_CN/Drawing.ts` -> locale from the parent directory
    ///
    /// Returns `None` when no part of the path is a known locale code.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_string_lossy().to_string();

        if is_locale_code(&stem) {
            return Some(Self { path: path.to_path_buf(), module: None, locale: stem });
        }

        // Search from the left so that `Drawing_zh_CN` yields `zh_CN`, not `CN`
        for (index, _) in stem.char_indices().filter(|(_, c)| *c == '_') {
            let (Some(module), Some(locale)) = (stem.get(..index), stem.get(index + 1..)) else {
                continue;
            };
            if !module.is_empty() && is_locale_code(locale) {
                return Some(Self {
                    path: path.to_path_buf(),
                    module: Some(module.to_string()),
                    locale: locale.to_string(),
                });
            }
        }

        let parent_name = path.parent()?.file_name()?.to_string_lossy().to_string();
        if is_locale_code(&parent_name) {
            return Some(Self { path: path.to_path_buf(), module: Some(stem), locale: parent_name });
        }

        None
    }

    /// Normalized locale of this file.
    #[must_use]
    pub fn normalized_locale(&self) -> String {
        normalize_locale(&self.locale)
    }
}

/// Load and parse a translation file.
///
/// # Errors
/// Returns error if file read or TS parse fails.
pub async fn load_translation_file(
    path: &Path,
    settings: &CatalogSettings,
) -> Result<TsDocument, CatalogError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;

    let document = parse_ts(&content, &settings.supported_versions)?;
    tracing::debug!(
        path = %path.display(),
        version = %document.version,
        messages = document.message_count(),
        "Loaded translation file"
    );

    Ok(document)
}
