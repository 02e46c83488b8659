use serde::Serialize;

use super::{Catalog, Context};
use crate::parse::Status;

/// Message counts for one context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextStats {
    pub name: String,
    pub messages: usize,
    pub active: usize,
    pub obsolete: usize,
    pub unfinished: usize,
    /// Active entries whose translation is empty
    pub empty: usize,
}

impl ContextStats {
    fn from_context(ctx: &Context) -> Self {
        let mut stats = Self {
            name: ctx.name.clone(),
            ..Self::default()
        };
        for entry in &ctx.messages {
            stats.messages += 1;
            match entry.status {
                Status::Active => {
                    stats.active += 1;
                    if entry.translation.is_empty() {
                        stats.empty += 1;
                    }
                }
                Status::Unfinished => stats.unfinished += 1,
                Status::Obsolete | Status::Vanished => stats.obsolete += 1,
            }
        }
        stats
    }
}

/// Aggregate counts for a whole catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogStats {
    pub language: Option<String>,
    pub contexts: usize,
    pub messages: usize,
    pub active: usize,
    pub obsolete: usize,
    pub unfinished: usize,
    pub empty: usize,
    /// Share of live messages (active + unfinished) with a usable translation, 0-100
    pub completion: f64,
    pub per_context: Vec<ContextStats>,
}

impl CatalogStats {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let per_context: Vec<ContextStats> =
            catalog.contexts.iter().map(ContextStats::from_context).collect();

        let mut stats = Self {
            language: catalog.header.language.clone(),
            contexts: per_context.len(),
            ..Self::default()
        };
        for ctx in &per_context {
            stats.messages += ctx.messages;
            stats.active += ctx.active;
            stats.obsolete += ctx.obsolete;
            stats.unfinished += ctx.unfinished;
            stats.empty += ctx.empty;
        }

        let live = stats.active + stats.unfinished;
        stats.completion = if live == 0 {
            100.0
        } else {
            (stats.active - stats.empty) as f64 * 100.0 / live as f64
        };
        stats.per_context = per_context;
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::TranslationEntry;

    #[test]
    fn test_counts() {
        let mut catalog = Catalog::new("zh_CN");
        catalog.push(TranslationEntry::new("A", "one", "一", Status::Active));
        catalog.push(TranslationEntry::new("A", "two", "", Status::Active));
        catalog.push(TranslationEntry::new("A", "old", "旧", Status::Obsolete));
        catalog.push(TranslationEntry::new("B", "new", "", Status::Unfinished));

        let stats = catalog.stats();
        assert_eq!(stats.contexts, 2);
        assert_eq!(stats.messages, 4);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.obsolete, 1);
        assert_eq!(stats.unfinished, 1);
        assert_eq!(stats.empty, 1);
        // one usable out of three live messages
        assert!((stats.completion - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.per_context[0].name, "A");
        assert_eq!(stats.per_context[1].unfinished, 1);
    }

    #[test]
    fn test_empty_catalog_is_complete() {
        let stats = Catalog::default().stats();
        assert_eq!(stats.messages, 0);
        assert_eq!(stats.completion, 100.0);
    }
}
