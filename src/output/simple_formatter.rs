use serde::Serialize;

use crate::error::Result;
use crate::search::SearchMatch;

/// Formatter for machine-readable output (line based or JSON)
pub struct SimpleFormatter;

impl SimpleFormatter {
    pub fn new() -> Self {
        Self
    }

    /// One line per match: `file:line:context:source\ttranslation`.
    /// Newlines and tabs inside text are escaped so every match stays on one line.
    pub fn format(&self, matches: &[SearchMatch]) -> String {
        let mut output = String::new();

        for m in matches {
            let file = m
                .file
                .as_ref()
                .map(|f| f.display().to_string())
                .unwrap_or_default();
            let line = m
                .entry
                .location()
                .and_then(|l| l.line)
                .map(|l| l.to_string())
                .unwrap_or_default();
            output.push_str(&format!(
                "{}:{}:{}:{}\t{}\n",
                file,
                line,
                m.entry.context,
                Self::escape(&m.entry.source),
                Self::escape(&m.entry.translation)
            ));
        }

        output
    }

    /// Pretty JSON for any report type
    pub fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    fn escape(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('\n', "\\n")
            .replace('\t', "\\t")
    }
}

impl Default for SimpleFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{Status, TranslationEntry};
    use crate::search::SearchField;
    use std::path::PathBuf;

    fn sample() -> SearchMatch {
        SearchMatch {
            file: Some(PathBuf::from("i18n/Seraphine.zh_CN.ts")),
            matched: SearchField::Source,
            entry: TranslationEntry::new("MainWindow", "Career", "生涯", Status::Active)
                .with_location("../../view/main_window.py", 406),
        }
    }

    #[test]
    fn test_simple_format_line() {
        let out = SimpleFormatter::new().format(&[sample()]);
        assert_eq!(out, "i18n/Seraphine.zh_CN.ts:406:MainWindow:Career\t生涯\n");
    }

    #[test]
    fn test_newlines_are_escaped() {
        let mut m = sample();
        m.entry.source = "a\nb".to_string();
        let out = SimpleFormatter::new().format(&[m]);
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("a\\nb"));
    }

    #[test]
    fn test_json_output() {
        let json = SimpleFormatter::new().to_json(&[sample()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["entry"]["context"], "MainWindow");
        assert_eq!(value[0]["entry"]["translation"], "生涯");
        assert_eq!(value[0]["entry"]["status"], "active");
        assert_eq!(value[0]["matched"], "source");
    }
}
