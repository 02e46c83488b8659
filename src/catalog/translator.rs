use hashbrown::{Equivalent, HashMap};
use tracing::debug;

use super::Catalog;

/// Owned lookup key: `(context, source, comment)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LookupKey {
    context: String,
    source: String,
    comment: Option<String>,
}

/// Borrowed form of [`LookupKey`]; hashes identically so lookups don't allocate
#[derive(Hash)]
struct KeyRef<'a> {
    context: &'a str,
    source: &'a str,
    comment: Option<&'a str>,
}

impl Equivalent<LookupKey> for KeyRef<'_> {
    fn equivalent(&self, key: &LookupKey) -> bool {
        self.context == key.context
            && self.source == key.source
            && self.comment == key.comment.as_deref()
    }
}

/// Runtime string lookup over the active entries of one catalog.
///
/// Only [`Status::Active`](crate::parse::Status::Active) entries are indexed.
/// When a context holds several active entries for the same source text, the
/// first one in document order wins. Anything not found, or found with an
/// empty translation, falls back to the source text.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    language: Option<String>,
    index: HashMap<LookupKey, String>,
}

impl Translator {
    /// A translator with no entries; every lookup falls back
    pub fn empty(language: Option<String>) -> Self {
        Self {
            language,
            index: HashMap::new(),
        }
    }

    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut index = HashMap::new();
        let mut shadowed = 0usize;

        for entry in catalog.active_entries() {
            let key = LookupKey {
                context: entry.context.clone(),
                source: entry.source.clone(),
                comment: entry.comment.clone(),
            };
            if index.contains_key(&key) {
                shadowed += 1;
                continue;
            }
            index.insert(key, entry.translation.clone());
        }

        debug!(
            language = catalog.language().unwrap_or("?"),
            entries = index.len(),
            shadowed,
            "built translator index"
        );

        Self {
            language: catalog.header.language.clone(),
            index,
        }
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Number of indexed keys
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Translation for `source` in `context`, or `source` itself
    pub fn lookup<'a>(&'a self, context: &str, source: &'a str) -> &'a str {
        self.lookup_with_comment(context, source, None)
    }

    pub fn lookup_with_comment<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: Option<&str>,
    ) -> &'a str {
        self.find(context, source, comment).unwrap_or(source)
    }

    /// Like [`lookup`](Self::lookup) but reports a miss instead of falling back
    pub fn try_lookup(&self, context: &str, source: &str) -> Option<&str> {
        self.find(context, source, None)
    }

    pub fn try_lookup_with_comment(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
    ) -> Option<&str> {
        self.find(context, source, comment)
    }

    fn find(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&str> {
        let key = KeyRef {
            context,
            source,
            comment,
        };
        self.index
            .get(&key)
            .map(String::as_str)
            .filter(|translation| !translation.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{Status, TranslationEntry};

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new("zh_CN");
        catalog.push(TranslationEntry::new("MainWindow", "Career", "生涯", Status::Active));
        catalog.push(TranslationEntry::new("AramFlyout", "Tenacity: ", "韧性：", Status::Obsolete));
        catalog.push(TranslationEntry::new("AramFlyoutView", "Tenacity: ", "韧性：", Status::Active));
        catalog.push(TranslationEntry::new("NewCard", "Draft", "草稿", Status::Unfinished));
        catalog.push(TranslationEntry::new("EmptyCard", "Blank", "", Status::Active));
        catalog
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_translator_is_send_sync() {
        assert_send_sync::<Translator>();
        assert_send_sync::<std::sync::Arc<Translator>>();
    }

    #[test]
    fn test_lookup_active() {
        let tr = catalog().translator();
        assert_eq!(tr.lookup("MainWindow", "Career"), "生涯");
        assert_eq!(tr.lookup("AramFlyoutView", "Tenacity: "), "韧性：");
    }

    #[test]
    fn test_obsolete_is_never_served() {
        let tr = catalog().translator();
        assert_eq!(tr.lookup("AramFlyout", "Tenacity: "), "Tenacity: ");
        assert_eq!(tr.try_lookup("AramFlyout", "Tenacity: "), None);
    }

    #[test]
    fn test_unfinished_and_empty_fall_back() {
        let tr = catalog().translator();
        assert_eq!(tr.lookup("NewCard", "Draft"), "Draft");
        assert_eq!(tr.lookup("EmptyCard", "Blank"), "Blank");
    }

    #[test]
    fn test_unknown_falls_back() {
        let tr = catalog().translator();
        assert_eq!(
            tr.lookup("UnknownContext", "Nonexistent phrase"),
            "Nonexistent phrase"
        );
    }

    #[test]
    fn test_first_active_duplicate_wins() {
        let mut catalog = catalog();
        catalog.push(TranslationEntry::new("MainWindow", "Career", "履历", Status::Active));
        let tr = catalog.translator();
        assert_eq!(tr.lookup("MainWindow", "Career"), "生涯");
        assert_eq!(tr.len(), 3);
    }

    #[test]
    fn test_comment_disambiguates() {
        let mut catalog = Catalog::new("zh_CN");
        catalog.push(TranslationEntry::new("Menu", "Open", "打开", Status::Active).with_comment("verb"));
        catalog.push(TranslationEntry::new("Menu", "Open", "开放", Status::Active).with_comment("adjective"));
        let tr = catalog.translator();
        assert_eq!(tr.lookup_with_comment("Menu", "Open", Some("verb")), "打开");
        assert_eq!(tr.lookup_with_comment("Menu", "Open", Some("adjective")), "开放");
        assert_eq!(tr.lookup("Menu", "Open"), "Open");
    }

    #[test]
    fn test_empty_translator() {
        let tr = Translator::empty(Some("fr".to_string()));
        assert!(tr.is_empty());
        assert_eq!(tr.language(), Some("fr"));
        assert_eq!(tr.lookup("MainWindow", "Career"), "Career");
    }
}
