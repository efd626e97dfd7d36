//! Locale switching over a directory of translation files.

pub mod discovery;
pub mod manager;
pub mod types;

pub use manager::LocaleManager;
pub use types::{
    LoadReport,
    LocaleError,
    SkippedFile,
};
