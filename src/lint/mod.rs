//! Integrity checks for translation catalogs.
//!
//! Duplicate active keys are the only error: they make lookup depend on
//! document order. Obsolete messages that sit next to an active message with
//! the same key are kept as history and reported at info level.

use hashbrown::HashMap;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::catalog::Catalog;
use crate::config::placeholder_patterns;
use crate::error::Result;
use crate::parse::{Location, Status, TranslationEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    DuplicateActive,
    ShadowedObsolete,
    EmptyTranslation,
    Unfinished,
    PlaceholderMismatch,
    EdgeWhitespace,
    MissingLocation,
}

impl FindingKind {
    pub fn severity(self) -> Severity {
        match self {
            Self::DuplicateActive => Severity::Error,
            Self::EmptyTranslation | Self::Unfinished | Self::PlaceholderMismatch => {
                Severity::Warning
            }
            Self::ShadowedObsolete | Self::EdgeWhitespace | Self::MissingLocation => {
                Severity::Info
            }
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::DuplicateActive => "duplicate-active",
            Self::ShadowedObsolete => "shadowed-obsolete",
            Self::EmptyTranslation => "empty-translation",
            Self::Unfinished => "unfinished",
            Self::PlaceholderMismatch => "placeholder-mismatch",
            Self::EdgeWhitespace => "edge-whitespace",
            Self::MissingLocation => "missing-location",
        }
    }
}

/// One problem found in a catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub context: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub message: String,
}

impl Finding {
    fn new(kind: FindingKind, entry: &TranslationEntry, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            context: entry.context.clone(),
            source: entry.source.clone(),
            location: entry.location().cloned(),
            message: message.into(),
        }
    }
}

/// All findings for one catalog, in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LintReport {
    pub findings: Vec<Finding>,
}

impl LintReport {
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }

    /// Keep only findings at or above `min`
    pub fn filter_severity(mut self, min: Severity) -> Self {
        self.findings.retain(|f| f.severity >= min);
        self
    }
}

pub struct Linter {
    placeholders: Vec<Regex>,
}

impl Linter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            placeholders: placeholder_patterns()?,
        })
    }

    pub fn check(&self, catalog: &Catalog) -> LintReport {
        let mut findings = Vec::new();

        for context in &catalog.contexts {
            // first active entry per (source, comment)
            let mut active: HashMap<(&str, Option<&str>), &TranslationEntry> = HashMap::new();
            for entry in context.messages.iter().filter(|m| m.status.is_active()) {
                let key = (entry.source.as_str(), entry.comment.as_deref());
                match active.get(&key) {
                    Some(first) => findings.push(Finding::new(
                        FindingKind::DuplicateActive,
                        entry,
                        format!(
                            "duplicate active message (first defined at {}); lookup serves the first",
                            first.location().map(ToString::to_string).unwrap_or_else(|| "?".to_string())
                        ),
                    )),
                    None => {
                        active.insert(key, entry);
                    }
                }
            }

            for entry in &context.messages {
                match entry.status {
                    Status::Obsolete | Status::Vanished => {
                        let key = (entry.source.as_str(), entry.comment.as_deref());
                        if active.contains_key(&key) {
                            findings.push(Finding::new(
                                FindingKind::ShadowedObsolete,
                                entry,
                                "obsolete message kept alongside an active one with the same source",
                            ));
                        }
                    }
                    Status::Unfinished => {
                        findings.push(Finding::new(
                            FindingKind::Unfinished,
                            entry,
                            "translation is marked unfinished and will not be served",
                        ));
                        self.check_text(entry, &mut findings);
                    }
                    Status::Active => {
                        if entry.translation.is_empty() {
                            findings.push(Finding::new(
                                FindingKind::EmptyTranslation,
                                entry,
                                "active message has an empty translation",
                            ));
                        } else {
                            self.check_text(entry, &mut findings);
                        }
                        if entry.locations.is_empty() {
                            findings.push(Finding::new(
                                FindingKind::MissingLocation,
                                entry,
                                "message has no source location",
                            ));
                        }
                    }
                }
            }
        }

        debug!(findings = findings.len(), "lint finished");
        LintReport { findings }
    }

    fn check_text(&self, entry: &TranslationEntry, findings: &mut Vec<Finding>) {
        if entry.translation.is_empty() {
            return;
        }

        let expected = self.placeholders_in(&entry.source);
        let found = self.placeholders_in(&entry.translation);
        if expected != found {
            findings.push(Finding::new(
                FindingKind::PlaceholderMismatch,
                entry,
                format!(
                    "placeholders differ: source has [{}], translation has [{}]",
                    expected.join(", "),
                    found.join(", ")
                ),
            ));
        }

        let source_edges = edge_whitespace(&entry.source);
        let translation_edges = edge_whitespace(&entry.translation);
        if source_edges != translation_edges {
            findings.push(Finding::new(
                FindingKind::EdgeWhitespace,
                entry,
                "leading or trailing whitespace differs between source and translation",
            ));
        }
    }

    /// Sorted placeholder tokens, duplicates kept
    fn placeholders_in<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut tokens: Vec<&str> = self
            .placeholders
            .iter()
            .flat_map(|re| re.find_iter(text).map(|m| m.as_str()))
            .collect();
        tokens.sort_unstable();
        tokens
    }
}

/// Whether `text` starts / ends with whitespace
fn edge_whitespace(text: &str) -> (bool, bool) {
    (
        text.starts_with(char::is_whitespace),
        text.ends_with(char::is_whitespace),
    )
}
