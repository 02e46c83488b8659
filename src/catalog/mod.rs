pub mod locales;
pub mod stats;
pub mod translator;

pub use locales::LocaleSet;
pub use stats::{CatalogStats, ContextStats};
pub use translator::Translator;

use crate::parse::{Status, TranslationEntry};
use serde::{Deserialize, Serialize};

/// Attributes of the `<TS>` root element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogHeader {
    pub version: Option<String>,
    pub language: Option<String>,
    pub source_language: Option<String>,
}

/// One `<context>` block: an interface component and its messages in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub name: String,
    pub messages: Vec<TranslationEntry>,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Vec::new(),
        }
    }
}

/// A parsed translation source document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub header: CatalogHeader,
    pub contexts: Vec<Context>,
}

impl Catalog {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            header: CatalogHeader {
                version: Some("2.1".to_string()),
                language: Some(language.into()),
                source_language: None,
            },
            contexts: Vec::new(),
        }
    }

    /// Total number of messages, obsolete ones included
    pub fn len(&self) -> usize {
        self.contexts.iter().map(|c| c.messages.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.iter().all(|c| c.messages.is_empty())
    }

    pub fn language(&self) -> Option<&str> {
        self.header.language.as_deref()
    }

    /// All messages in document order
    pub fn entries(&self) -> impl Iterator<Item = &TranslationEntry> {
        self.contexts.iter().flat_map(|c| c.messages.iter())
    }

    /// Messages that lookup may serve
    pub fn active_entries(&self) -> impl Iterator<Item = &TranslationEntry> {
        self.entries().filter(|e| e.status.is_active())
    }

    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Append an entry to its context, creating the context at the end if needed
    pub fn push(&mut self, entry: TranslationEntry) {
        match self.contexts.iter_mut().find(|c| c.name == entry.context) {
            Some(ctx) => ctx.messages.push(entry),
            None => {
                let mut ctx = Context::new(entry.context.clone());
                ctx.messages.push(entry);
                self.contexts.push(ctx);
            }
        }
    }

    /// Drop obsolete and vanished messages, and contexts left empty by that
    pub fn drop_obsolete(&mut self) -> usize {
        let before = self.len();
        for ctx in &mut self.contexts {
            ctx.messages.retain(|m| !m.status.is_obsolete());
        }
        self.contexts.retain(|c| !c.messages.is_empty());
        before - self.len()
    }

    /// Build the runtime lookup index
    pub fn translator(&self) -> Translator {
        Translator::from_catalog(self)
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats::from_catalog(self)
    }

    /// `(context, source, translation, status)` for every message, in document order
    pub fn tuples(&self) -> Vec<(&str, &str, &str, Status)> {
        self.entries()
            .map(|e| {
                (
                    e.context.as_str(),
                    e.source.as_str(),
                    e.translation.as_str(),
                    e.status,
                )
            })
            .collect()
    }
}
