pub mod exclusions;
pub mod patterns;
pub mod settings;

pub use exclusions::{detect_project_type, get_default_exclusions, ProjectType};
pub use patterns::{locale_suffix_pattern, placeholder_patterns};
pub use settings::Settings;

/// File extension of Qt Linguist translation sources
pub const TS_EXTENSION: &str = "ts";
