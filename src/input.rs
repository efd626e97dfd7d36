//! Reading and writing `.ts` translation files.

pub mod reader;
pub mod translation;
pub mod writer;
