//! ts-catalog
//!
//! Qt Linguist `.ts` 翻訳カタログの読み込み・検索ライブラリ

pub mod catalog;
pub mod config;
pub mod input;
pub mod ir;
pub mod locale;
pub mod types;

pub use catalog::{
    Catalog,
    CatalogBuilder,
    CatalogError,
};
pub use config::CatalogSettings;
pub use locale::LocaleManager;
pub use types::SourceLocation;
