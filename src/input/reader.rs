//! Qt Linguist TS reader.
//!
//! Walks the XML event stream produced by `quick-xml` and builds a
//! [`TsDocument`]. Elements this crate has no use for (`userdata`,
//! `extra-*`, `dependencies`, ...) are skipped without inspection.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{
    BytesStart,
    Event,
};

use crate::catalog::CatalogError;
use crate::ir::{
    Context,
    Message,
    TranslationState,
    TsDocument,
};
use crate::types::SourceLocation;

/// Version assumed when `<TS>` carries no `version` attribute.
const IMPLICIT_VERSION: &str = "1.1";

/// Parse a TS document.
///
/// An empty `supported_versions` slice accepts any version.
///
/// # Errors
/// - [`CatalogError::Parse`] if the text is not well-formed XML or has no `<TS>` root
/// - [`CatalogError::Version`] if the declared version is not supported
pub fn parse_ts(text: &str, supported_versions: &[String]) -> Result<TsDocument, CatalogError> {
    TsReader::new(text).read_document(supported_versions)
}

/// Event-driven reader state.
struct TsReader<'a> {
    /// Underlying XML reader.
    reader: Reader<&'a [u8]>,
    /// Filename of the previous `<location>`; used when `filename` is omitted.
    current_file: String,
    /// Last line recorded per file; base for `line="+N"` / `line="-N"`.
    last_lines: HashMap<String, i64>,
}

impl<'a> TsReader<'a> {
    /// Creates a reader over `text`.
    fn new(text: &'a str) -> Self {
        Self {
            reader: Reader::from_str(text),
            current_file: String::new(),
            last_lines: HashMap::new(),
        }
    }

    /// Current byte offset, used in error reports.
    fn position(&self) -> u64 {
        u64::try_from(self.reader.buffer_position()).unwrap_or(u64::MAX)
    }

    /// Builds a parse error at the current position.
    fn error(&self, message: impl Into<String>) -> CatalogError {
        CatalogError::parse(self.position(), message)
    }

    /// Reads the next event, converting XML errors.
    fn next_event(&mut self) -> Result<Event<'a>, CatalogError> {
        self.reader.read_event().map_err(|e| self.error(e.to_string()))
    }

    /// Skips everything up to and including the end tag matching `start`.
    fn skip(&mut self, start: &BytesStart<'_>) -> Result<(), CatalogError> {
        self.reader.read_to_end(start.name()).map_err(|e| self.error(e.to_string()))?;
        Ok(())
    }

    /// Returns the unescaped value of attribute `name`, if present.
    fn attribute(
        &self,
        start: &BytesStart<'_>,
        name: &[u8],
    ) -> Result<Option<String>, CatalogError> {
        for attr in start.attributes() {
            let attr = attr.map_err(|e| self.error(e.to_string()))?;
            if attr.key.as_ref() == name {
                let value = attr.unescape_value().map_err(|e| self.error(e.to_string()))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    /// Finds the `<TS>` root and reads it.
    fn read_document(mut self, supported_versions: &[String]) -> Result<TsDocument, CatalogError> {
        loop {
            match self.next_event()? {
                Event::Start(start) if start.name().as_ref() == b"TS" => {
                    let mut document = self.read_root_attributes(&start, supported_versions)?;
                    self.read_root_children(&mut document)?;
                    self.read_epilog()?;
                    return Ok(document);
                }
                Event::Empty(start) if start.name().as_ref() == b"TS" => {
                    let document = self.read_root_attributes(&start, supported_versions)?;
                    self.read_epilog()?;
                    return Ok(document);
                }
                Event::Start(other) | Event::Empty(other) => {
                    let name = String::from_utf8_lossy(other.name().as_ref()).into_owned();
                    return Err(self.error(format!("expected <TS> root element, found <{name}>")));
                }
                Event::Eof => return Err(self.error("missing <TS> root element")),
                _ => {}
            }
        }
    }

    /// Checks that only whitespace, comments and processing instructions follow `</TS>`.
    fn read_epilog(&mut self) -> Result<(), CatalogError> {
        loop {
            match self.next_event()? {
                Event::Eof => return Ok(()),
                Event::Comment(_) | Event::PI(_) => {}
                Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
                Event::Start(other) | Event::Empty(other) => {
                    let name = String::from_utf8_lossy(other.name().as_ref()).into_owned();
                    return Err(self.error(format!("unexpected <{name}> after </TS>")));
                }
                Event::End(other) => {
                    let name = String::from_utf8_lossy(other.name().as_ref()).into_owned();
                    return Err(self.error(format!("unexpected </{name}> after </TS>")));
                }
                _ => return Err(self.error("unexpected content after </TS>")),
            }
        }
    }

    /// Reads `version`, `language` and `sourcelanguage` and checks the version.
    fn read_root_attributes(
        &self,
        start: &BytesStart<'_>,
        supported_versions: &[String],
    ) -> Result<TsDocument, CatalogError> {
        let version =
            self.attribute(start, b"version")?.unwrap_or_else(|| IMPLICIT_VERSION.to_string());

        if !supported_versions.is_empty() && !supported_versions.contains(&version) {
            return Err(CatalogError::Version {
                found: version,
                supported: supported_versions.to_vec(),
            });
        }

        let language = self.attribute(start, b"language")?.filter(|value| !value.is_empty());
        let source_language =
            self.attribute(start, b"sourcelanguage")?.filter(|value| !value.is_empty());

        Ok(TsDocument { version, language, source_language, contexts: Vec::new() })
    }

    /// Reads `<context>` children until `</TS>`.
    fn read_root_children(&mut self, document: &mut TsDocument) -> Result<(), CatalogError> {
        loop {
            match self.next_event()? {
                Event::Start(start) => {
                    if start.name().as_ref() == b"context" {
                        let context = self.read_context()?;
                        document.contexts.push(context);
                    } else {
                        self.skip(&start)?;
                    }
                }
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(self.error("unexpected end of document inside <TS>")),
                _ => {}
            }
        }
    }

    /// Reads one `<context>` after its start tag.
    fn read_context(&mut self) -> Result<Context, CatalogError> {
        let mut context = Context::default();
        loop {
            match self.next_event()? {
                Event::Start(start) => match start.name().as_ref() {
                    b"name" => context.name = self.read_text()?,
                    b"comment" => context.comment = Some(self.read_text()?),
                    b"message" => {
                        let message = self.read_message(&start)?;
                        context.messages.push(message);
                    }
                    _ => self.skip(&start)?,
                },
                Event::End(_) => return Ok(context),
                Event::Eof => return Err(self.error("unexpected end of document inside <context>")),
                _ => {}
            }
        }
    }

    /// Reads one `<message>`; `start` carries its attributes.
    fn read_message(&mut self, start: &BytesStart<'_>) -> Result<Message, CatalogError> {
        let mut message = Message {
            id: self.attribute(start, b"id")?,
            numerus: self.attribute(start, b"numerus")?.as_deref() == Some("yes"),
            ..Message::default()
        };

        loop {
            match self.next_event()? {
                Event::Empty(child) => match child.name().as_ref() {
                    b"location" => self.read_location(&child, &mut message)?,
                    b"translation" => message.state = self.read_state(&child)?,
                    _ => {}
                },
                Event::Start(child) => match child.name().as_ref() {
                    b"location" => {
                        self.read_location(&child, &mut message)?;
                        self.skip(&child)?;
                    }
                    b"source" => message.source = self.read_text()?,
                    b"oldsource" => message.old_source = Some(self.read_text()?),
                    b"comment" => message.comment = Some(self.read_text()?),
                    b"oldcomment" => message.old_comment = Some(self.read_text()?),
                    b"extracomment" => message.extra_comment = Some(self.read_text()?),
                    b"translatorcomment" => message.translator_comment = Some(self.read_text()?),
                    b"translation" => {
                        message.state = self.read_state(&child)?;
                        if message.numerus {
                            message.numerus_forms = self.read_numerus_forms()?;
                        } else {
                            message.translation = self.read_text()?;
                        }
                    }
                    _ => self.skip(&child)?,
                },
                Event::End(_) => return Ok(message),
                Event::Eof => return Err(self.error("unexpected end of document inside <message>")),
                _ => {}
            }
        }
    }

    /// State from the `type` attribute of `<translation>`.
    fn read_state(&self, start: &BytesStart<'_>) -> Result<TranslationState, CatalogError> {
        Ok(self
            .attribute(start, b"type")?
            .and_then(|value| TranslationState::from_attribute(&value))
            .unwrap_or_default())
    }

    /// Resolves a `<location>` element, including lupdate's relative form.
    ///
    /// A missing `filename` refers to the previous location's file. A signed
    /// `line` is an offset from the last line recorded for that file.
    /// References whose line cannot be parsed are dropped.
    fn read_location(
        &mut self,
        start: &BytesStart<'_>,
        message: &mut Message,
    ) -> Result<(), CatalogError> {
        let filename = match self.attribute(start, b"filename")? {
            Some(filename) if !filename.is_empty() => {
                self.current_file.clone_from(&filename);
                filename
            }
            _ => self.current_file.clone(),
        };

        let Some(raw_line) = self.attribute(start, b"line")? else {
            message.locations.push(SourceLocation::new(filename, None));
            return Ok(());
        };

        let Ok(value) = raw_line.trim().parse::<i64>() else {
            tracing::debug!(line = %raw_line, "Ignoring location with unparsable line");
            return Ok(());
        };

        let line = if raw_line.starts_with(['+', '-']) {
            let base = self.last_lines.entry(filename.clone()).or_insert(0);
            *base = base.saturating_add(value);
            *base
        } else {
            self.last_lines.insert(filename.clone(), value);
            value
        };

        match u32::try_from(line) {
            Ok(line) => message.locations.push(SourceLocation::new(filename, Some(line))),
            Err(_) => tracing::debug!(line, "Ignoring location with out-of-range line"),
        }
        Ok(())
    }

    /// Reads `<numerusform>` children up to the end of `<translation>`.
    fn read_numerus_forms(&mut self) -> Result<Vec<String>, CatalogError> {
        let mut forms = Vec::new();
        loop {
            match self.next_event()? {
                Event::Start(child) if child.name().as_ref() == b"numerusform" => {
                    forms.push(self.read_text()?);
                }
                Event::Empty(child) if child.name().as_ref() == b"numerusform" => {
                    forms.push(String::new());
                }
                Event::Start(child) => self.skip(&child)?,
                Event::End(_) => return Ok(forms),
                Event::Eof => {
                    return Err(self.error("unexpected end of document inside <translation>"));
                }
                _ => {}
            }
        }
    }

    /// Reads character content up to the end of the current element.
    ///
    /// Decodes entities, CDATA and `<byte value=".."/>` escapes. When the
    /// element holds `<lengthvariant>` children, the first variant wins.
    fn read_text(&mut self) -> Result<String, CatalogError> {
        let mut text = String::new();
        let mut variant: Option<String> = None;
        loop {
            match self.next_event()? {
                Event::Text(content) => {
                    let unescaped = content.unescape().map_err(|e| self.error(e.to_string()))?;
                    text.push_str(&unescaped);
                }
                Event::CData(content) => {
                    let decoded = std::str::from_utf8(&content)
                        .map_err(|e| self.error(format!("invalid UTF-8 in CDATA: {e}")))?;
                    text.push_str(decoded);
                }
                Event::Empty(child) if child.name().as_ref() == b"byte" => {
                    let character = self.read_byte(&child)?;
                    text.push(character);
                }
                Event::Start(child) if child.name().as_ref() == b"lengthvariant" => {
                    let content = self.read_text()?;
                    if variant.is_none() {
                        variant = Some(content);
                    }
                }
                Event::Start(child) => self.skip(&child)?,
                Event::End(_) => return Ok(variant.unwrap_or(text)),
                Event::Eof => return Err(self.error("unexpected end of document inside text")),
                _ => {}
            }
        }
    }

    /// Decodes `<byte value="x1b"/>` (hex) or `<byte value="27"/>` (decimal).
    fn read_byte(&self, start: &BytesStart<'_>) -> Result<char, CatalogError> {
        let Some(value) = self.attribute(start, b"value")? else {
            return Err(self.error("<byte> element without value attribute"));
        };

        let code = match value.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => value.parse::<u32>(),
        };

        code.ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error(format!("invalid <byte> value '{value}'")))
    }
}
