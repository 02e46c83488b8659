use crate::catalog::{Catalog, CatalogHeader, Context};
use crate::error::{CatalogError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::translation::{LineRef, Location, Status, TranslationEntry};

/// Parser for Qt Linguist translation source documents (`.ts`)
pub struct TsParser;

/// Element whose character data is currently being collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    ContextName,
    Source,
    OldSource,
    Comment,
    ExtraComment,
    TranslatorComment,
    UserData,
    Translation,
    NumerusForm,
}

/// A `<message>` under construction
#[derive(Default)]
struct MessageDraft {
    source: Option<String>,
    translation: String,
    status: Status,
    comment: Option<String>,
    old_source: Option<String>,
    extra_comment: Option<String>,
    translator_comment: Option<String>,
    user_data: Option<String>,
    locations: Vec<Location>,
    numerus: bool,
    numerus_forms: Vec<String>,
}

impl TsParser {
    pub fn parse_file(path: &Path) -> Result<Catalog> {
        let content = fs::read_to_string(path).map_err(|e| {
            CatalogError::parse_error(path, format!("Failed to read file: {}", e))
        })?;
        let catalog = Self::parse_with_origin(&content, path)?;
        debug!(
            file = %path.display(),
            contexts = catalog.contexts.len(),
            messages = catalog.len(),
            "parsed translation file"
        );
        Ok(catalog)
    }

    pub fn parse_str(content: &str) -> Result<Catalog> {
        Self::parse_with_origin(content, Path::new("<memory>"))
    }

    fn parse_with_origin(content: &str, origin: &Path) -> Result<Catalog> {
        let fail = |reason: String| CatalogError::parse_error(PathBuf::from(origin), reason);

        let mut reader = Reader::from_str(content);
        // Leading and trailing spaces in <source> are part of the key.
        reader.config_mut().trim_text(false);

        let mut catalog = Catalog::default();
        let mut seen_root = false;
        let mut context: Option<Context> = None;
        let mut message: Option<MessageDraft> = None;
        let mut capture: Option<Capture> = None;
        let mut text = String::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                fail(format!(
                    "XML error at byte {}: {}",
                    reader.buffer_position(),
                    e
                ))
            })?;

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_empty = matches!(event, Event::Empty(_));
                    let name = e.name();
                    let name = name.as_ref();

                    if !seen_root {
                        if name != b"TS" {
                            return Err(fail(format!(
                                "root element must be <TS>, found <{}>",
                                String::from_utf8_lossy(name)
                            )));
                        }
                        seen_root = true;
                        catalog.header = Self::read_header(e).map_err(fail)?;
                        continue;
                    }

                    match name {
                        b"context" => {
                            if context.is_some() {
                                return Err(fail("nested <context> element".to_string()));
                            }
                            context = Some(Context::default());
                        }
                        b"name" if context.is_some() && message.is_none() => {
                            capture = Some(Capture::ContextName);
                        }
                        b"message" => {
                            if context.is_none() {
                                return Err(fail("<message> outside of <context>".to_string()));
                            }
                            let mut draft = MessageDraft::default();
                            draft.numerus = Self::attr(e, b"numerus").map_err(&fail)?.as_deref()
                                == Some("yes");
                            message = Some(draft);
                        }
                        b"location" => {
                            if let Some(draft) = message.as_mut() {
                                draft.locations.push(Self::read_location(e).map_err(&fail)?);
                            }
                        }
                        b"source" if message.is_some() => capture = Some(Capture::Source),
                        b"oldsource" if message.is_some() => capture = Some(Capture::OldSource),
                        b"comment" if message.is_some() => capture = Some(Capture::Comment),
                        b"extracomment" if message.is_some() => {
                            capture = Some(Capture::ExtraComment)
                        }
                        b"translatorcomment" if message.is_some() => {
                            capture = Some(Capture::TranslatorComment)
                        }
                        b"userdata" if message.is_some() => capture = Some(Capture::UserData),
                        b"translation" => {
                            if let Some(draft) = message.as_mut() {
                                let kind = Self::attr(e, b"type").map_err(&fail)?;
                                draft.status = Status::from_type_attr(kind.as_deref())
                                    .ok_or_else(|| {
                                        fail(format!(
                                            "unknown translation type '{}'",
                                            kind.unwrap_or_default()
                                        ))
                                    })?;
                                capture = Some(Capture::Translation);
                            }
                        }
                        b"numerusform" if capture == Some(Capture::Translation) => {
                            capture = Some(Capture::NumerusForm);
                        }
                        other if message.is_some() && capture.is_none() => {
                            warn!(
                                origin = %origin.display(),
                                element = %String::from_utf8_lossy(other),
                                "unsupported <message> child is not kept"
                            );
                        }
                        _ => {}
                    }

                    if is_empty {
                        // <translation/> and friends carry no text
                        if let Some(kind) = capture.take() {
                            Self::finish_capture(kind, String::new(), &mut context, &mut message);
                            if kind == Capture::NumerusForm {
                                capture = Some(Capture::Translation);
                            }
                        }
                    }
                    text.clear();
                }
                Event::Text(e) => {
                    if capture.is_some() {
                        let unescaped = e
                            .unescape()
                            .map_err(|err| fail(format!("bad character data: {}", err)))?;
                        text.push_str(&unescaped);
                    }
                }
                Event::CData(e) => {
                    if capture.is_some() {
                        text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::End(ref e) => match e.name().as_ref() {
                    b"name" | b"source" | b"oldsource" | b"comment" | b"extracomment"
                    | b"translatorcomment" | b"userdata" | b"translation" | b"numerusform" => {
                        if let Some(kind) = capture.take() {
                            let value = std::mem::take(&mut text);
                            Self::finish_capture(kind, value, &mut context, &mut message);
                            if kind == Capture::NumerusForm {
                                capture = Some(Capture::Translation);
                            }
                        }
                    }
                    b"message" => {
                        let draft = message
                            .take()
                            .ok_or_else(|| fail("unbalanced </message>".to_string()))?;
                        let ctx = context
                            .as_mut()
                            .ok_or_else(|| fail("<message> outside of <context>".to_string()))?;
                        let entry = Self::finish_message(draft, &ctx.name).ok_or_else(|| {
                            fail(format!("message without <source> in context '{}'", ctx.name))
                        })?;
                        ctx.messages.push(entry);
                    }
                    b"context" => {
                        let mut ctx = context
                            .take()
                            .ok_or_else(|| fail("unbalanced </context>".to_string()))?;
                        // <name> normally precedes messages, but be safe
                        for entry in &mut ctx.messages {
                            if entry.context != ctx.name {
                                entry.context = ctx.name.clone();
                            }
                        }
                        catalog.contexts.push(ctx);
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_root {
            return Err(fail("document has no <TS> root element".to_string()));
        }
        if context.is_some() {
            return Err(fail("unterminated <context> element".to_string()));
        }

        Ok(catalog)
    }

    fn finish_capture(
        kind: Capture,
        value: String,
        context: &mut Option<Context>,
        message: &mut Option<MessageDraft>,
    ) {
        match kind {
            Capture::ContextName => {
                if let Some(ctx) = context.as_mut() {
                    ctx.name = value;
                }
            }
            Capture::Source => {
                if let Some(draft) = message.as_mut() {
                    draft.source = Some(value);
                }
            }
            Capture::OldSource => {
                if let Some(draft) = message.as_mut() {
                    draft.old_source = Some(value);
                }
            }
            Capture::Comment => {
                if let Some(draft) = message.as_mut() {
                    draft.comment = Some(value);
                }
            }
            Capture::ExtraComment => {
                if let Some(draft) = message.as_mut() {
                    draft.extra_comment = Some(value);
                }
            }
            Capture::TranslatorComment => {
                if let Some(draft) = message.as_mut() {
                    draft.translator_comment = Some(value);
                }
            }
            Capture::UserData => {
                if let Some(draft) = message.as_mut() {
                    draft.user_data = Some(value);
                }
            }
            Capture::Translation => {
                if let Some(draft) = message.as_mut() {
                    // Whitespace between <numerusform> children is layout, not text
                    if draft.numerus_forms.is_empty() {
                        draft.translation = value;
                    }
                }
            }
            Capture::NumerusForm => {
                if let Some(draft) = message.as_mut() {
                    draft.numerus_forms.push(value);
                }
            }
        }
    }

    fn finish_message(draft: MessageDraft, context: &str) -> Option<TranslationEntry> {
        let source = draft.source?;
        let translation = match draft.numerus_forms.first() {
            Some(first) => first.clone(),
            None => draft.translation,
        };
        Some(TranslationEntry {
            context: context.to_string(),
            source,
            translation,
            status: draft.status,
            comment: draft.comment,
            old_source: draft.old_source,
            extra_comment: draft.extra_comment,
            translator_comment: draft.translator_comment,
            user_data: draft.user_data,
            locations: draft.locations,
            numerus: draft.numerus,
            numerus_forms: draft.numerus_forms,
        })
    }

    fn read_header(e: &BytesStart<'_>) -> std::result::Result<CatalogHeader, String> {
        Ok(CatalogHeader {
            version: Self::attr(e, b"version")?,
            language: Self::attr(e, b"language")?,
            source_language: Self::attr(e, b"sourcelanguage")?,
        })
    }

    fn read_location(e: &BytesStart<'_>) -> std::result::Result<Location, String> {
        let filename = Self::attr(e, b"filename")?;
        let line = match Self::attr(e, b"line")? {
            Some(raw) => Some(raw.parse::<LineRef>()?),
            None => None,
        };
        Ok(Location { filename, line })
    }

    fn attr(e: &BytesStart<'_>, key: &[u8]) -> std::result::Result<Option<String>, String> {
        for attr in e.attributes() {
            let attr = attr.map_err(|err| format!("bad attribute: {}", err))?;
            if attr.key.as_ref() == key {
                let value = attr
                    .unescape_value()
                    .map_err(|err| format!("bad attribute value: {}", err))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }
}
