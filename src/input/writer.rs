//! Qt Linguist TS writer.

use std::fmt::Display;

use quick_xml::Writer;
use quick_xml::events::{
    BytesDecl,
    BytesEnd,
    BytesStart,
    BytesText,
    Event,
};

use crate::catalog::CatalogError;
use crate::ir::{
    Context,
    Message,
    TsDocument,
};

/// Indentation width used by lupdate.
const INDENT: usize = 4;

/// Serialize a document to TS XML.
///
/// Locations are always written in absolute form.
///
/// # Errors
/// Returns [`CatalogError::Write`] if the XML writer fails.
pub fn write_ts(document: &TsDocument) -> Result<String, CatalogError> {
    let mut writer = TsWriter { writer: Writer::new_with_indent(Vec::new(), b' ', INDENT) };
    writer.write_document(document)?;

    let mut bytes = writer.writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(write_error)
}

/// Converts any writer failure into [`CatalogError::Write`].
fn write_error(error: impl Display) -> CatalogError {
    CatalogError::Write(error.to_string())
}

/// Characters XML 1.0 cannot carry as text.
fn needs_byte_element(c: char) -> bool {
    c < ' ' && !matches!(c, '\t' | '\n' | '\r')
}

/// Thin wrapper over the indenting XML writer.
struct TsWriter {
    /// Output sink.
    writer: Writer<Vec<u8>>,
}

impl TsWriter {
    /// Writes one raw event.
    fn event(&mut self, event: Event<'_>) -> Result<(), CatalogError> {
        self.writer.write_event(event).map_err(write_error)
    }

    /// Opens `element`.
    fn start(&mut self, element: BytesStart<'_>) -> Result<(), CatalogError> {
        self.event(Event::Start(element))
    }

    /// Closes `</name>`.
    fn end(&mut self, name: &str) -> Result<(), CatalogError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    /// Writes `<name>text</name>` on one line.
    fn text_element(&mut self, element: BytesStart<'_>, text: &str) -> Result<(), CatalogError> {
        let end = BytesEnd::new(String::from_utf8_lossy(element.name().as_ref()).into_owned());
        self.start(element)?;
        self.write_text(text)?;
        self.event(Event::End(end))
    }

    /// Writes character data, turning control characters into `<byte value="xNN"/>`.
    ///
    /// Every segment is written as a text event, even an empty one, so that
    /// the indenting writer keeps `<byte>` and the closing tag on the same line.
    fn write_text(&mut self, text: &str) -> Result<(), CatalogError> {
        let mut rest = text;
        while let Some(index) = rest.find(needs_byte_element) {
            let (segment, tail) = rest.split_at(index);
            self.event(Event::Text(BytesText::new(segment)))?;

            let mut chars = tail.chars();
            if let Some(control) = chars.next() {
                let mut byte = BytesStart::new("byte");
                byte.push_attribute(("value", format!("x{:x}", u32::from(control)).as_str()));
                self.event(Event::Empty(byte))?;
            }
            rest = chars.as_str();
        }
        self.event(Event::Text(BytesText::new(rest)))
    }

    /// Writes `<name>text</name>` only when `text` is present.
    fn optional_text_element(
        &mut self,
        name: &str,
        text: Option<&str>,
    ) -> Result<(), CatalogError> {
        match text {
            Some(text) => self.text_element(BytesStart::new(name), text),
            None => Ok(()),
        }
    }

    /// Declaration, doctype and the `<TS>` root.
    fn write_document(&mut self, document: &TsDocument) -> Result<(), CatalogError> {
        self.event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        self.event(Event::DocType(BytesText::from_escaped("TS")))?;

        let mut root = BytesStart::new("TS");
        root.push_attribute(("version", document.version.as_str()));
        if let Some(language) = &document.language {
            root.push_attribute(("language", language.as_str()));
        }
        if let Some(source_language) = &document.source_language {
            root.push_attribute(("sourcelanguage", source_language.as_str()));
        }
        self.start(root)?;

        for context in &document.contexts {
            self.write_context(context)?;
        }

        self.end("TS")
    }

    /// One `<context>` with its messages.
    fn write_context(&mut self, context: &Context) -> Result<(), CatalogError> {
        self.start(BytesStart::new("context"))?;
        self.text_element(BytesStart::new("name"), &context.name)?;
        self.optional_text_element("comment", context.comment.as_deref())?;

        for message in &context.messages {
            self.write_message(message)?;
        }

        self.end("context")
    }

    /// One `<message>`; child order follows lupdate.
    fn write_message(&mut self, message: &Message) -> Result<(), CatalogError> {
        let mut start = BytesStart::new("message");
        if let Some(id) = &message.id {
            start.push_attribute(("id", id.as_str()));
        }
        if message.numerus {
            start.push_attribute(("numerus", "yes"));
        }
        self.start(start)?;

        for location in &message.locations {
            let mut element = BytesStart::new("location");
            element.push_attribute(("filename", location.filename.as_str()));
            if let Some(line) = location.line {
                element.push_attribute(("line", line.to_string().as_str()));
            }
            self.event(Event::Empty(element))?;
        }

        self.text_element(BytesStart::new("source"), &message.source)?;
        self.optional_text_element("oldsource", message.old_source.as_deref())?;
        self.optional_text_element("comment", message.comment.as_deref())?;
        self.optional_text_element("oldcomment", message.old_comment.as_deref())?;
        self.optional_text_element("extracomment", message.extra_comment.as_deref())?;
        self.optional_text_element("translatorcomment", message.translator_comment.as_deref())?;

        let mut translation = BytesStart::new("translation");
        if let Some(state) = message.state.as_attribute() {
            translation.push_attribute(("type", state));
        }

        if message.numerus {
            self.start(translation)?;
            for form in &message.numerus_forms {
                self.text_element(BytesStart::new("numerusform"), form)?;
            }
            self.end("translation")?;
        } else {
            self.text_element(translation, &message.translation)?;
        }

        self.end("message")
    }
}
