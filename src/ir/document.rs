//! `.ts` ドキュメント全体の中間表現

use super::Message;

/// One `<context>` element: a named group of messages, usually one dialog or command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Context {
    pub name: String,
    pub comment: Option<String>,
    pub messages: Vec<Message>,
}

impl Context {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }
}

/// A parsed `<TS>` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsDocument {
    /// Format version (`version` attribute), e.g. `"2.1"`.
    pub version: String,

    /// Target language (`language` attribute), e.g. `"zh-CN"`.
    pub language: Option<String>,

    /// Authoring language (`sourcelanguage` attribute).
    pub source_language: Option<String>,

    pub contexts: Vec<Context>,
}

impl TsDocument {
    /// Version written by current lupdate releases.
    pub const CURRENT_VERSION: &'static str = "2.1";

    #[must_use]
    pub fn new(language: Option<String>, source_language: Option<String>) -> Self {
        Self {
            version: Self::CURRENT_VERSION.to_string(),
            language,
            source_language,
            contexts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.contexts.push(context);
        self
    }

    /// Total number of messages across all contexts.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(|context| context.messages.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn test_message_count() {
        let document = TsDocument::new(Some("zh-CN".to_string()), Some("en".to_string()))
            .with_context(
                Context::new("CmdDrawingOpen")
                    .with_message(Message::new("Drawing", "图纸"))
                    .with_message(Message::new("Open SVG...", "打开SVG...")),
            )
            .with_context(Context::new("Workbench").with_message(Message::new("Drawing", "图纸")));

        expect_that!(document.message_count(), eq(3));
        expect_that!(document.version.as_str(), eq("2.1"));
    }
}
