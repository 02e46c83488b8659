use colored::Colorize;
use regex::{Regex, RegexBuilder};
use std::path::Path;

use crate::catalog::CatalogStats;
use crate::lint::{LintReport, Severity};
use crate::parse::{Status, TranslationEntry};
use crate::search::SearchMatch;

/// Formatter for human-readable terminal output
pub struct ReportFormatter {
    max_width: usize,
}

impl ReportFormatter {
    /// Create a new ReportFormatter with default width (80 columns)
    pub fn new() -> Self {
        Self { max_width: 80 }
    }

    /// Create a ReportFormatter with custom width
    pub fn with_width(max_width: usize) -> Self {
        Self { max_width }
    }

    /// Search results grouped by file and context, with the query highlighted
    pub fn format_matches(
        &self,
        matches: &[SearchMatch],
        query: &str,
        case_sensitive: bool,
        is_regex: bool,
    ) -> String {
        let highlighter = Self::highlighter(query, case_sensitive, is_regex);
        let mut output = String::new();
        let mut current_file: Option<&Path> = None;
        let mut current_context: Option<&str> = None;

        for m in matches {
            if m.file.as_deref() != current_file {
                current_file = m.file.as_deref();
                current_context = None;
                if let Some(file) = current_file {
                    output.push_str(&format!("=== {} ===\n", file.display()).bold().to_string());
                }
            }
            if current_context != Some(m.entry.context.as_str()) {
                current_context = Some(m.entry.context.as_str());
                output.push_str(&format!("[{}]\n", m.entry.context.cyan()));
            }

            let source = self.highlight(&self.display_text(&m.entry.source), highlighter.as_ref());
            let translation =
                self.highlight(&self.display_text(&m.entry.translation), highlighter.as_ref());
            output.push_str(&format!("  {} => {}", source, translation));
            if m.entry.status != Status::Active {
                output.push_str(&format!(" ({})", m.entry.status).dimmed().to_string());
            }
            if let Some(location) = m.entry.location() {
                output.push_str(&format!("  {}", location).dimmed().to_string());
            }
            output.push('\n');
        }

        output
    }

    /// Findings of one catalog, one per line, followed by a summary
    pub fn format_lint(&self, path: &Path, report: &LintReport) -> String {
        let mut output = String::new();

        for finding in &report.findings {
            let severity = match finding.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow(),
                Severity::Info => "info".blue(),
            };
            let location = finding
                .location
                .as_ref()
                .map(|l| format!(" ({})", l))
                .unwrap_or_default();
            output.push_str(&format!(
                "{}: {}[{}] {}: \"{}\"{}\n    {}\n",
                path.display(),
                severity,
                finding.kind.code(),
                finding.context,
                self.display_text(&finding.source),
                location,
                finding.message
            ));
        }

        output.push_str(&format!(
            "{}: {} error(s), {} warning(s), {} info\n",
            path.display(),
            report.count(Severity::Error),
            report.count(Severity::Warning),
            report.count(Severity::Info)
        ));
        output
    }

    pub fn format_stats(&self, path: &Path, stats: &CatalogStats) -> String {
        let mut output = format!(
            "{} ({})\n",
            path.display().to_string().bold(),
            stats.language.as_deref().unwrap_or("unknown language")
        );
        output.push_str(&format!(
            "  contexts: {}  messages: {}  active: {}  obsolete: {}  unfinished: {}  empty: {}\n",
            stats.contexts,
            stats.messages,
            stats.active,
            stats.obsolete,
            stats.unfinished,
            stats.empty
        ));
        output.push_str(&format!("  completion: {:.1}%\n", stats.completion));
        output
    }

    /// Single-line rendering of a message for listings
    pub fn format_entry(&self, entry: &TranslationEntry) -> String {
        format!(
            "{}: {} => {}",
            entry.context,
            self.display_text(&entry.source),
            self.display_text(&entry.translation)
        )
    }

    fn highlighter(query: &str, case_sensitive: bool, is_regex: bool) -> Option<Regex> {
        let pattern = if is_regex {
            query.to_string()
        } else {
            regex::escape(query)
        };
        RegexBuilder::new(&pattern)
            .case_insensitive(!case_sensitive)
            .build()
            .ok()
    }

    fn highlight(&self, text: &str, re: Option<&Regex>) -> String {
        match re {
            Some(re) => re
                .replace_all(text, |caps: &regex::Captures| caps[0].bold().to_string())
                .to_string(),
            None => text.to_string(),
        }
    }

    /// Quote-free single-line form: newlines shown as `\n`, long text truncated
    fn display_text(&self, s: &str) -> String {
        let flat = s.replace('\n', "\\n");
        self.truncate(&flat, self.max_width.saturating_sub(20))
    }

    /// Truncate a string to fit within max length (in characters)
    fn truncate(&self, s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
            format!("{}...", kept)
        }
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::lint::Linter;
    use crate::search::{EntrySearcher, SearchField};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_formatter_creation() {
        let formatter = ReportFormatter::new();
        assert_eq!(formatter.max_width, 80);
        assert_eq!(ReportFormatter::with_width(120).max_width, 120);
    }

    #[test]
    fn test_truncate_counts_chars() {
        let formatter = ReportFormatter::with_width(30);
        let long = "游".repeat(40);
        let out = formatter.display_text(&long);
        assert_eq!(out.chars().count(), 10);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_format_matches_groups_by_context() {
        plain();
        let mut catalog = Catalog::new("zh_CN");
        catalog.push(TranslationEntry::new("MainWindow", "Career", "生涯", Status::Active));
        catalog.push(TranslationEntry::new("SearchInterface", "Career", "生涯", Status::Active));
        let matches = EntrySearcher::new()
            .field(SearchField::Source)
            .search(&catalog, "Career")
            .unwrap();

        let out = ReportFormatter::new().format_matches(&matches, "Career", false, false);
        assert!(out.contains("[MainWindow]"));
        assert!(out.contains("[SearchInterface]"));
        assert!(out.contains("Career => 生涯"));
    }

    #[test]
    fn test_format_lint_summary() {
        plain();
        let mut catalog = Catalog::new("zh_CN");
        catalog.push(TranslationEntry::new("C", "a", "", Status::Active));
        let report = Linter::new().unwrap().check(&catalog);

        let out = ReportFormatter::new().format_lint(Path::new("app.zh_CN.ts"), &report);
        assert!(out.contains("empty-translation"));
        assert!(out.contains("0 error(s), 1 warning(s), 1 info"));
    }

    #[test]
    fn test_multiline_text_is_flattened() {
        let entry = TranslationEntry::new("C", "line one\nline two", "一\n二", Status::Active);
        let out = ReportFormatter::new().format_entry(&entry);
        assert_eq!(out, "C: line one\\nline two => 一\\n二");
    }
}
