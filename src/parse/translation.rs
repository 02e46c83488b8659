use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a message, taken from the `type` attribute of `<translation>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Finished translation, served at runtime
    #[default]
    Active,
    /// Drafted but not yet accepted (`type="unfinished"`)
    Unfinished,
    /// Source phrase no longer emitted by the UI (`type="obsolete"`)
    Obsolete,
    /// Newer lupdate spelling of obsolete (`type="vanished"`)
    Vanished,
}

impl Status {
    /// Map a `type` attribute value to a status. `None` means no attribute.
    pub fn from_type_attr(value: Option<&str>) -> Option<Self> {
        match value {
            None | Some("") => Some(Self::Active),
            Some("unfinished") => Some(Self::Unfinished),
            Some("obsolete") => Some(Self::Obsolete),
            Some("vanished") => Some(Self::Vanished),
            Some(_) => None,
        }
    }

    /// The `type` attribute value written for this status
    pub fn type_attr(self) -> Option<&'static str> {
        match self {
            Self::Active => None,
            Self::Unfinished => Some("unfinished"),
            Self::Obsolete => Some("obsolete"),
            Self::Vanished => Some("vanished"),
        }
    }

    pub fn is_active(self) -> bool {
        self == Self::Active
    }

    /// Obsolete and vanished entries are kept for translators only
    pub fn is_obsolete(self) -> bool {
        matches!(self, Self::Obsolete | Self::Vanished)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Active => "active",
            Self::Unfinished => "unfinished",
            Self::Obsolete => "obsolete",
            Self::Vanished => "vanished",
        };
        f.write_str(label)
    }
}

/// Line reference of a `<location>`.
///
/// `lupdate -locations relative` records each line as an offset from the
/// previous location in the same file (`line="+10"`, `line="-3"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawLine")]
pub enum LineRef {
    Absolute(u32),
    Relative(i32),
}

impl FromStr for LineRef {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let invalid = || format!("invalid location line '{}'", raw);
        if raw.starts_with(['+', '-']) {
            raw.parse::<i32>().map(Self::Relative).map_err(|_| invalid())
        } else {
            raw.parse::<u32>().map(Self::Absolute).map_err(|_| invalid())
        }
    }
}

impl fmt::Display for LineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(line) => write!(f, "{}", line),
            Self::Relative(offset) => write!(f, "{:+}", offset),
        }
    }
}

/// JSON form: absolute lines are numbers, relative ones keep their sign as a string
impl Serialize for LineRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absolute(line) => serializer.serialize_u32(*line),
            Self::Relative(_) => serializer.collect_str(self),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLine {
    Number(u32),
    Text(String),
}

impl TryFrom<RawLine> for LineRef {
    type Error = String;

    fn try_from(raw: RawLine) -> Result<Self, Self::Error> {
        match raw {
            RawLine::Number(line) => Ok(Self::Absolute(line)),
            RawLine::Text(text) => text.parse(),
        }
    }
}

/// Origin of a message in the UI sources (`<location filename=".." line=".."/>`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub filename: Option<String>,
    pub line: Option<LineRef>,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.filename, self.line) {
            (Some(file), Some(line)) => write!(f, "{}:{}", file, line),
            (Some(file), None) => f.write_str(file),
            (None, Some(line)) => write!(f, "line {}", line),
            (None, None) => f.write_str("?"),
        }
    }
}

/// A single `<message>` of a translation catalog
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TranslationEntry {
    /// Name of the owning `<context>` (e.g. "MainWindow")
    pub context: String,
    /// Original-language phrase, exactly as written (whitespace is significant)
    pub source: String,
    /// Localized phrase; first plural form for numerus messages
    pub translation: String,
    pub status: Status,
    /// Disambiguation comment, part of the lookup key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Source text before the last edit (`<oldsource>`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_source: Option<String>,
    /// Developer note for translators (`<extracomment>`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_comment: Option<String>,
    /// Translator's own note (`<translatorcomment>`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translator_comment: Option<String>,
    /// Opaque `<userdata>` payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub numerus: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub numerus_forms: Vec<String>,
}

impl TranslationEntry {
    pub fn new(
        context: impl Into<String>,
        source: impl Into<String>,
        translation: impl Into<String>,
        status: Status,
    ) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
            translation: translation.into(),
            status,
            ..Self::default()
        }
    }

    pub fn with_location(mut self, filename: impl Into<String>, line: u32) -> Self {
        self.locations.push(Location {
            filename: Some(filename.into()),
            line: Some(LineRef::Absolute(line)),
        });
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The first recorded location, if any
    pub fn location(&self) -> Option<&Location> {
        self.locations.first()
    }

    /// Whether this entry and `other` share a lookup key within one context
    pub fn same_key(&self, other: &TranslationEntry) -> bool {
        self.context == other.context && self.source == other.source && self.comment == other.comment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_type_attr() {
        assert_eq!(Status::from_type_attr(None), Some(Status::Active));
        assert_eq!(Status::from_type_attr(Some("obsolete")), Some(Status::Obsolete));
        assert_eq!(Status::from_type_attr(Some("unfinished")), Some(Status::Unfinished));
        assert_eq!(Status::from_type_attr(Some("vanished")), Some(Status::Vanished));
        assert_eq!(Status::from_type_attr(Some("finished")), None);
    }

    #[test]
    fn test_status_type_attr_round_trip() {
        for status in [Status::Active, Status::Unfinished, Status::Obsolete, Status::Vanished] {
            assert_eq!(Status::from_type_attr(status.type_attr()), Some(status));
        }
    }

    #[test]
    fn test_obsolete_covers_vanished() {
        assert!(Status::Obsolete.is_obsolete());
        assert!(Status::Vanished.is_obsolete());
        assert!(!Status::Unfinished.is_obsolete());
        assert!(!Status::Active.is_obsolete());
    }

    #[test]
    fn test_location_display() {
        let loc = Location {
            filename: Some("../../view/main_window.py".to_string()),
            line: Some(LineRef::Absolute(406)),
        };
        assert_eq!(loc.to_string(), "../../view/main_window.py:406");
    }

    #[test]
    fn test_line_ref_parse_and_display() {
        assert_eq!("406".parse::<LineRef>(), Ok(LineRef::Absolute(406)));
        assert_eq!("+10".parse::<LineRef>(), Ok(LineRef::Relative(10)));
        assert_eq!("-3".parse::<LineRef>(), Ok(LineRef::Relative(-3)));
        assert_eq!("+0".parse::<LineRef>(), Ok(LineRef::Relative(0)));
        assert!("x".parse::<LineRef>().is_err());

        assert_eq!(LineRef::Relative(10).to_string(), "+10");
        assert_eq!(LineRef::Relative(-3).to_string(), "-3");
        assert_eq!(LineRef::Relative(0).to_string(), "+0");
        assert_eq!(LineRef::Absolute(7).to_string(), "7");
    }

    #[test]
    fn test_line_ref_json() {
        let loc = Location {
            filename: Some("a.py".to_string()),
            line: Some(LineRef::Relative(-3)),
        };
        let json = serde_json::to_string(&loc).unwrap();
        assert_eq!(json, r#"{"filename":"a.py","line":"-3"}"#);
        let back: Location = serde_json::from_str(&json).unwrap();
        assert_eq!(back, loc);

        let abs: Location = serde_json::from_str(r#"{"filename":"a.py","line":12}"#).unwrap();
        assert_eq!(abs.line, Some(LineRef::Absolute(12)));
    }

    #[test]
    fn test_same_key_includes_comment() {
        let a = TranslationEntry::new("MainWindow", "Close", "关闭", Status::Active);
        let b = TranslationEntry::new("MainWindow", "Close", "关闭窗口", Status::Obsolete);
        let c = b.clone().with_comment("window");
        assert!(a.same_key(&b));
        assert!(!a.same_key(&c));
    }
}
