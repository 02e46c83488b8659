use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};
use crate::parse::TranslationEntry;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::path::PathBuf;

/// Which side of a message a query is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Source,
    Translation,
    #[default]
    Both,
}

/// A single message matching a search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchMatch {
    /// Catalog file the message came from, when searching files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Field the query was found in (`Both` when it hit both sides)
    pub matched: SearchField,
    pub entry: TranslationEntry,
}

/// Searches messages of a catalog by source or translation text
pub struct EntrySearcher {
    /// Whether search is case-sensitive
    case_sensitive: bool,
    /// Treat the query as a regular expression
    is_regex: bool,
    /// Also report obsolete and vanished messages
    include_obsolete: bool,
    field: SearchField,
}

impl Default for EntrySearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl EntrySearcher {
    /// Create a new EntrySearcher with default settings
    pub fn new() -> Self {
        Self {
            case_sensitive: false,
            is_regex: false,
            include_obsolete: false,
            field: SearchField::Both,
        }
    }

    /// Set whether search is case-sensitive (default: false)
    pub fn case_sensitive(mut self, value: bool) -> Self {
        self.case_sensitive = value;
        self
    }

    /// Set whether the query is a regex (default: false)
    pub fn is_regex(mut self, value: bool) -> Self {
        self.is_regex = value;
        self
    }

    /// Set whether obsolete messages are searched too (default: false)
    pub fn include_obsolete(mut self, value: bool) -> Self {
        self.include_obsolete = value;
        self
    }

    pub fn field(mut self, field: SearchField) -> Self {
        self.field = field;
        self
    }

    fn build_matcher(&self, query: &str) -> Result<Regex> {
        if query.trim().is_empty() {
            return Err(CatalogError::invalid_query("search text cannot be empty"));
        }
        let pattern = if self.is_regex {
            query.to_string()
        } else {
            regex::escape(query)
        };
        Ok(RegexBuilder::new(&pattern)
            .case_insensitive(!self.case_sensitive)
            .build()?)
    }

    /// Search `catalog` and return matching messages in document order
    pub fn search(&self, catalog: &Catalog, query: &str) -> Result<Vec<SearchMatch>> {
        let matcher = self.build_matcher(query)?;
        Ok(self.search_with(&matcher, catalog))
    }

    /// Search several catalogs with one compiled query
    pub fn search_all<'a, I>(&self, catalogs: I, query: &str) -> Result<Vec<SearchMatch>>
    where
        I: IntoIterator<Item = (&'a PathBuf, &'a Catalog)>,
    {
        let matcher = self.build_matcher(query)?;
        let mut matches = Vec::new();
        for (path, catalog) in catalogs {
            matches.extend(self.search_with(&matcher, catalog).into_iter().map(|mut m| {
                m.file = Some(path.clone());
                m
            }));
        }
        Ok(matches)
    }

    fn search_with(&self, matcher: &Regex, catalog: &Catalog) -> Vec<SearchMatch> {
        catalog
            .entries()
            .filter(|e| self.include_obsolete || !e.status.is_obsolete())
            .filter_map(|entry| {
                let in_source = self.field != SearchField::Translation
                    && matcher.is_match(&entry.source);
                let in_translation = self.field != SearchField::Source
                    && (matcher.is_match(&entry.translation)
                        || entry.numerus_forms.iter().any(|f| matcher.is_match(f)));

                let matched = match (in_source, in_translation) {
                    (true, true) => SearchField::Both,
                    (true, false) => SearchField::Source,
                    (false, true) => SearchField::Translation,
                    (false, false) => return None,
                };
                Some(SearchMatch {
                    file: None,
                    matched,
                    entry: entry.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Status;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new("zh_CN");
        catalog.push(TranslationEntry::new("MainWindow", "Career", "生涯", Status::Active));
        catalog.push(TranslationEntry::new("SearchInterface", "Career", "生涯", Status::Active));
        catalog.push(TranslationEntry::new("DodgeCard", "Dodge", "秒退", Status::Active));
        catalog.push(TranslationEntry::new(
            "AutoBanChampionCard",
            "Auto ban champion",
            "自动禁用英雄",
            Status::Obsolete,
        ));
        catalog
    }

    #[test]
    fn test_search_source_case_insensitive() {
        let matches = EntrySearcher::new().search(&catalog(), "career").unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].entry.context, "MainWindow");
        assert_eq!(matches[0].matched, SearchField::Source);
    }

    #[test]
    fn test_search_case_sensitive() {
        let matches = EntrySearcher::new()
            .case_sensitive(true)
            .search(&catalog(), "career")
            .unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_search_translation() {
        let matches = EntrySearcher::new().search(&catalog(), "秒退").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched, SearchField::Translation);
    }

    #[test]
    fn test_obsolete_excluded_by_default() {
        let searcher = EntrySearcher::new();
        assert!(searcher.search(&catalog(), "ban").unwrap().is_empty());

        let matches = searcher
            .include_obsolete(true)
            .search(&catalog(), "ban")
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].entry.status, Status::Obsolete);
    }

    #[test]
    fn test_field_restriction() {
        let matches = EntrySearcher::new()
            .field(SearchField::Translation)
            .search(&catalog(), "Dodge")
            .unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_regex_query() {
        let matches = EntrySearcher::new()
            .is_regex(true)
            .search(&catalog(), "^D.dge$")
            .unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_literal_query_escapes_metacharacters() {
        let matches = EntrySearcher::new().search(&catalog(), "D.dge").unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_empty_query_is_error() {
        let err = EntrySearcher::new().search(&catalog(), "  ").unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_invalid_regex_is_error() {
        let result = EntrySearcher::new().is_regex(true).search(&catalog(), "(");
        assert!(matches!(result, Err(CatalogError::InvalidQuery(_))));
    }
}
