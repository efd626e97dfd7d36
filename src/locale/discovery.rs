//! Translation file discovery.

use std::collections::BTreeMap;
use std::path::Path;

use ignore::WalkBuilder;

use crate::config::FileMatcher;
use crate::input::translation::{
    TranslationFile,
    normalize_locale,
    primary_language,
};

/// Finds every translation file under the matcher's root.
///
/// Results are sorted by path so that catalogs merge deterministically.
#[must_use]
pub fn find_translation_files(matcher: &FileMatcher) -> Vec<TranslationFile> {
    let mut found_files = Vec::new();

    for result in WalkBuilder::new(matcher.root())
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        if !matcher.is_translation_file(path) {
            continue;
        }

        match TranslationFile::from_path(path) {
            Some(file) => found_files.push(file),
            None => tracing::debug!(path = %path.display(), "No locale in file name, skipping"),
        }
    }

    found_files.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!(
        root = %matcher.root().display(),
        count = found_files.len(),
        "Discovered translation files"
    );
    found_files
}

/// Picks, per module, the file that best serves `locale`.
///
/// An exact locale match (`zh-CN` for `zh_CN`) is preferred; otherwise a file
/// for the bare language (`Drawing_zh.ts`) is used. Modules with neither are
/// left out. Input order is kept.
#[must_use]
pub fn select_for_locale(files: Vec<TranslationFile>, locale: &str) -> Vec<TranslationFile> {
    let wanted = normalize_locale(locale);
    let language = primary_language(&wanted).to_string();

    // module -> (exact, language-only)
    let mut best: BTreeMap<ModuleKey<'_>, (Option<usize>, Option<usize>)> = BTreeMap::new();
    for (position, file) in files.iter().enumerate() {
        let normalized = file.normalized_locale();
        let slot = best.entry(module_key(file)).or_default();
        if normalized == wanted {
            slot.0.get_or_insert(position);
        } else if normalized == language {
            slot.1.get_or_insert(position);
        }
    }

    let mut chosen: Vec<usize> =
        best.into_values().filter_map(|(exact, fallback)| exact.or(fallback)).collect();
    chosen.sort_unstable();

    files
        .into_iter()
        .enumerate()
        .filter(|(position, _)| chosen.binary_search(position).is_ok())
        .map(|(_, file)| file)
        .collect()
}

/// Grouping key for [`select_for_locale`].
type ModuleKey<'a> = (Option<&'a str>, Option<&'a Path>);

/// Named modules group by name. `<locale>.ts` files carry no name, so their
/// directory stands in for it.
fn module_key(file: &TranslationFile) -> ModuleKey<'_> {
    match file.module.as_deref() {
        Some(module) => (Some(module), None),
        None => (None, file.path.parent()),
    }
}

/// Discovers the files to load for `locale`.
#[must_use]
pub fn files_for_locale(matcher: &FileMatcher, locale: &str) -> Vec<TranslationFile> {
    select_for_locale(find_translation_files(matcher), locale)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::config::{
        CatalogSettings,
        TranslationFilesConfig,
    };

    fn file(path: &str) -> TranslationFile {
        TranslationFile::from_path(Path::new(path)).unwrap()
    }

    fn names(files: &[TranslationFile]) -> Vec<String> {
        files.iter().map(|file| file.path.display().to_string()).collect()
    }

    #[rstest]
    #[case("zh-CN", &["Drawing_zh-CN.ts", "Part_zh.ts"])]
    #[case("zh_TW", &["Drawing_zh-TW.ts", "Part_zh.ts"])]
    #[case("zh", &["Part_zh.ts"])]
    #[case("de", &["Drawing_de.ts"])]
    #[case("fr", &[])]
    fn test_select_for_locale(#[case] locale: &str, #[case] expected: &[&str]) {
        let files = vec![
            file("Drawing_de.ts"),
            file("Drawing_zh-CN.ts"),
            file("Drawing_zh-TW.ts"),
            file("Part_zh.ts"),
        ];

        let selected = select_for_locale(files, locale);

        assert_eq!(names(&selected), expected);
    }

    #[rstest]
    #[case("zh-CN", &["Drawing/zh-CN.ts", "Part/zh-CN.ts"])]
    #[case("zh_TW", &["Drawing/zh.ts"])]
    fn test_select_for_locale_keeps_bare_locale_files_apart(
        #[case] locale: &str,
        #[case] expected: &[&str],
    ) {
        let files = vec![file("Drawing/zh-CN.ts"), file("Drawing/zh.ts"), file("Part/zh-CN.ts")];

        let selected = select_for_locale(files, locale);

        assert_eq!(names(&selected), expected);
    }

    fn write(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "<TS/>").unwrap();
        path
    }

    #[googletest::test]
    fn test_find_translation_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "Drawing/Drawing_zh-CN.ts");
        write(root, "Drawing/Drawing_de.ts");
        write(root, "Part/zh_CN/Part.ts");
        write(root, "Part/notes.ts");
        write(root, "Part/Part_de.txt");
        write(root, "build/Drawing_fr.ts");

        let settings = CatalogSettings {
            translation_files: TranslationFilesConfig {
                exclude_patterns: vec!["build/**".to_string()],
                ..TranslationFilesConfig::default()
            },
            ..CatalogSettings::default()
        };
        let matcher = FileMatcher::new(root.to_path_buf(), &settings).unwrap();

        let found = find_translation_files(&matcher);
        let relative: Vec<String> = found
            .iter()
            .map(|file| file.path.strip_prefix(root).unwrap().display().to_string())
            .collect();

        assert_eq!(
            relative,
            vec!["Drawing/Drawing_de.ts", "Drawing/Drawing_zh-CN.ts", "Part/zh_CN/Part.ts"]
        );

        let selected = files_for_locale(&matcher, "zh-CN");
        expect_that!(selected.len(), eq(2));
    }

    #[googletest::test]
    fn test_files_for_locale_with_locale_named_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "Drawing/zh-CN.ts");
        write(root, "Part/zh-CN.ts");
        let matcher = FileMatcher::new(root.to_path_buf(), &CatalogSettings::default()).unwrap();

        let selected = files_for_locale(&matcher, "zh-CN");

        expect_that!(selected.len(), eq(2));
    }
}
