pub mod translation;
pub mod ts_parser;
pub mod ts_writer;

pub use translation::{LineRef, Location, Status, TranslationEntry};
pub use ts_parser::TsParser;
pub use ts_writer::TsWriter;
