//! 翻訳カタログの中間表現

pub mod document;
pub mod message;

pub use document::{
    Context,
    TsDocument,
};
pub use message::{
    Message,
    TranslationState,
};
