pub mod formatter;
pub mod simple_formatter;

pub use formatter::ReportFormatter;
pub use simple_formatter::SimpleFormatter;
