pub mod catalog;
pub mod config;
pub mod error;
pub mod lint;
pub mod output;
pub mod parse;
pub mod search;

use std::path::{Path, PathBuf};
use tracing::{info, warn};

// Re-export commonly used types
pub use catalog::{Catalog, CatalogHeader, CatalogStats, Context, LocaleSet, Translator};
pub use error::{CatalogError, Result};
pub use lint::{Finding, FindingKind, LintReport, Linter, Severity};
pub use output::{ReportFormatter, SimpleFormatter};
pub use parse::{LineRef, Location, Status, TranslationEntry, TsParser, TsWriter};
pub use search::{EntrySearcher, FileSearcher, SearchField, SearchMatch};

/// Query parameters for searching catalogs
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    pub case_sensitive: bool,
    pub is_regex: bool,
    pub include_obsolete: bool,
    pub field: SearchField,
    /// Files or directories; empty means the current directory
    pub paths: Vec<PathBuf>,
    pub exclude_patterns: Vec<String>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            case_sensitive: false,
            is_regex: false,
            include_obsolete: false,
            field: SearchField::Both,
            paths: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_regex(mut self, is_regex: bool) -> Self {
        self.is_regex = is_regex;
        self
    }

    pub fn with_obsolete(mut self, include_obsolete: bool) -> Self {
        self.include_obsolete = include_obsolete;
        self
    }

    pub fn with_field(mut self, field: SearchField) -> Self {
        self.field = field;
        self
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.exclude_patterns = exclusions;
        self
    }
}

/// Result of a search operation
#[derive(Debug)]
pub struct SearchResult {
    pub query: String,
    pub files_searched: usize,
    pub matches: Vec<SearchMatch>,
    /// Catalogs that could not be parsed, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

/// Outcome of a single lookup against a catalog file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOutcome {
    /// Text to display: the translation, or the source on fallback
    pub text: String,
    pub fell_back: bool,
}

/// Outcome of rewriting a catalog in canonical layout
#[derive(Debug, Clone)]
pub struct FormatOutcome {
    pub output: String,
    pub changed: bool,
    pub dropped_obsolete: usize,
}

/// Resolve search paths against the working directory and expand them to catalog files
fn collect_catalog_files(paths: &[PathBuf], exclusions: &[String]) -> Result<Vec<PathBuf>> {
    let paths = if paths.is_empty() {
        vec![std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))]
    } else {
        paths.to_vec()
    };

    // Project type of the first directory decides the default exclusions
    let project_root = paths
        .iter()
        .find(|p| p.is_dir())
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    let files = FileSearcher::for_project(&project_root)
        .add_exclusions(exclusions.to_vec())
        .collect(&paths)?;

    if files.is_empty() {
        return Err(CatalogError::no_catalogs(project_root));
    }
    Ok(files)
}

/// Orchestrates a search across every catalog under the query paths.
///
/// Catalogs that fail to parse are reported in [`SearchResult::skipped`]
/// instead of aborting the search.
#[must_use = "this function returns a Result that should be handled"]
pub fn run_search(query: SearchQuery) -> Result<SearchResult> {
    let files = collect_catalog_files(&query.paths, &query.exclude_patterns)?;

    let mut catalogs = Vec::new();
    let mut skipped = Vec::new();
    for file in files {
        match TsParser::parse_file(&file) {
            Ok(catalog) => catalogs.push((file, catalog)),
            Err(e) => {
                warn!(file = %file.display(), error = %e, "skipping unparseable catalog");
                skipped.push((file, e.to_string()));
            }
        }
    }

    let searcher = EntrySearcher::new()
        .case_sensitive(query.case_sensitive)
        .is_regex(query.is_regex)
        .include_obsolete(query.include_obsolete)
        .field(query.field);
    let matches = searcher.search_all(catalogs.iter().map(|(p, c)| (p, c)), &query.text)?;

    info!(
        query = %query.text,
        files = catalogs.len(),
        matches = matches.len(),
        "search finished"
    );

    Ok(SearchResult {
        query: query.text,
        files_searched: catalogs.len(),
        matches,
        skipped,
    })
}

/// Look up one message in a catalog file, falling back to the source text
#[must_use = "this function returns a Result that should be handled"]
pub fn run_lookup(
    path: &Path,
    context: &str,
    source: &str,
    comment: Option<&str>,
) -> Result<LookupOutcome> {
    let translator = TsParser::parse_file(path)?.translator();
    Ok(match translator.try_lookup_with_comment(context, source, comment) {
        Some(text) => LookupOutcome {
            text: text.to_string(),
            fell_back: false,
        },
        None => LookupOutcome {
            text: source.to_string(),
            fell_back: true,
        },
    })
}

/// Lint every catalog under `paths`
#[must_use = "this function returns a Result that should be handled"]
pub fn run_lint(paths: &[PathBuf]) -> Result<Vec<(PathBuf, LintReport)>> {
    let linter = Linter::new()?;
    collect_catalog_files(paths, &[])?
        .into_iter()
        .map(|file| -> Result<(PathBuf, LintReport)> {
            let catalog = TsParser::parse_file(&file)?;
            let report = linter.check(&catalog);
            Ok((file, report))
        })
        .collect()
}

/// Message counts for every catalog under `paths`
#[must_use = "this function returns a Result that should be handled"]
pub fn run_stats(paths: &[PathBuf]) -> Result<Vec<(PathBuf, CatalogStats)>> {
    collect_catalog_files(paths, &[])?
        .into_iter()
        .map(|file| -> Result<(PathBuf, CatalogStats)> {
            let stats = TsParser::parse_file(&file)?.stats();
            Ok((file, stats))
        })
        .collect()
}

/// Re-serialize a catalog file in canonical layout without touching the file
#[must_use = "this function returns a Result that should be handled"]
pub fn run_format(path: &Path, drop_obsolete: bool) -> Result<FormatOutcome> {
    let original = std::fs::read_to_string(path)?;
    let mut catalog = TsParser::parse_file(path)?;
    let dropped_obsolete = if drop_obsolete {
        catalog.drop_obsolete()
    } else {
        0
    };
    let output = TsWriter::to_string(&catalog)?;
    Ok(FormatOutcome {
        changed: output != original,
        output,
        dropped_obsolete,
    })
}
