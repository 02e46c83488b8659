use crate::catalog::{Catalog, Context};
use crate::error::{CatalogError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::translation::TranslationEntry;

const INDENT: &str = "    ";

/// Serializes a catalog in lupdate's layout, so that a catalog parsed from an
/// lupdate-written file is written back byte for byte.
pub struct TsWriter {
    writer: Writer<Vec<u8>>,
}

impl TsWriter {
    pub fn to_string(catalog: &Catalog) -> Result<String> {
        let mut this = Self {
            writer: Writer::new(Vec::new()),
        };
        this.write_catalog(catalog)?;
        String::from_utf8(this.writer.into_inner())
            .map_err(|e| CatalogError::Write(format!("output is not UTF-8: {}", e)))
    }

    pub fn write_file(catalog: &Catalog, path: &Path) -> Result<()> {
        let content = Self::to_string(catalog)?;
        fs::write(path, content)?;
        debug!(file = %path.display(), messages = catalog.len(), "wrote translation file");
        Ok(())
    }

    fn write_catalog(&mut self, catalog: &Catalog) -> Result<()> {
        self.event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        self.newline(0)?;
        self.event(Event::DocType(BytesText::from_escaped("TS")))?;
        self.newline(0)?;

        let header = &catalog.header;
        let mut root = BytesStart::new("TS");
        if let Some(version) = &header.version {
            root.push_attribute(("version", version.as_str()));
        }
        if let Some(language) = &header.language {
            root.push_attribute(("language", language.as_str()));
        }
        if let Some(source_language) = &header.source_language {
            root.push_attribute(("sourcelanguage", source_language.as_str()));
        }
        self.event(Event::Start(root))?;
        self.newline(0)?;

        for context in &catalog.contexts {
            self.write_context(context)?;
        }

        self.event(Event::End(BytesEnd::new("TS")))?;
        self.newline(0)
    }

    fn write_context(&mut self, context: &Context) -> Result<()> {
        self.event(Event::Start(BytesStart::new("context")))?;
        self.newline(1)?;
        self.text_element("name", &context.name)?;
        for message in &context.messages {
            self.newline(1)?;
            self.write_message(message)?;
        }
        self.newline(0)?;
        self.event(Event::End(BytesEnd::new("context")))?;
        self.newline(0)
    }

    fn write_message(&mut self, entry: &TranslationEntry) -> Result<()> {
        let mut start = BytesStart::new("message");
        if entry.numerus {
            start.push_attribute(("numerus", "yes"));
        }
        self.event(Event::Start(start))?;

        for location in &entry.locations {
            self.newline(2)?;
            let mut elem = BytesStart::new("location");
            if let Some(filename) = &location.filename {
                elem.push_attribute(("filename", filename.as_str()));
            }
            if let Some(line) = location.line {
                elem.push_attribute(("line", line.to_string().as_str()));
            }
            self.event(Event::Empty(elem))?;
        }

        self.newline(2)?;
        self.text_element("source", &entry.source)?;

        // lupdate's element order
        self.optional_element("oldsource", entry.old_source.as_deref())?;
        self.optional_element("comment", entry.comment.as_deref())?;
        self.optional_element("extracomment", entry.extra_comment.as_deref())?;
        self.optional_element("translatorcomment", entry.translator_comment.as_deref())?;

        self.newline(2)?;
        let mut translation = BytesStart::new("translation");
        if let Some(kind) = entry.status.type_attr() {
            translation.push_attribute(("type", kind));
        }
        self.event(Event::Start(translation))?;
        if entry.numerus && !entry.numerus_forms.is_empty() {
            for form in &entry.numerus_forms {
                self.newline(3)?;
                self.text_element("numerusform", form)?;
            }
            self.newline(2)?;
        } else {
            self.event(Event::Text(BytesText::new(&entry.translation)))?;
        }
        self.event(Event::End(BytesEnd::new("translation")))?;
        self.optional_element("userdata", entry.user_data.as_deref())?;

        self.newline(1)?;
        self.event(Event::End(BytesEnd::new("message")))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.event(Event::Start(BytesStart::new(name)))?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn optional_element(&mut self, name: &str, text: Option<&str>) -> Result<()> {
        match text {
            Some(text) => {
                self.newline(2)?;
                self.text_element(name, text)
            }
            None => Ok(()),
        }
    }

    /// Line break followed by `depth` levels of indentation
    fn newline(&mut self, depth: usize) -> Result<()> {
        let ws = format!("\n{}", INDENT.repeat(depth));
        self.event(Event::Text(BytesText::from_escaped(ws)))
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| CatalogError::Write(e.to_string()))
    }
}
