//! In-memory translation catalogs.

pub mod builder;
pub mod error;
pub mod plural;
pub mod stats;
pub mod store;

pub use builder::CatalogBuilder;
pub use error::CatalogError;
pub use plural::PluralRule;
pub use stats::CatalogStats;
pub use store::{
    Catalog,
    Entry,
};
