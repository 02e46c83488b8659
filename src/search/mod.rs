pub mod file_search;
pub mod text_search;

pub use file_search::{is_translation_file, FileSearcher};
pub use text_search::{EntrySearcher, SearchField, SearchMatch};
