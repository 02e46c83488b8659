use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Failed to parse a translation source document
    #[error("Failed to parse translation file {file}:\n{reason}\n\nTip: Verify the file is a well-formed Qt Linguist .ts document")]
    Parse { file: PathBuf, reason: String },

    /// Failed to serialize a catalog back to XML
    #[error("Failed to write translation document: {0}")]
    Write(String),

    /// No `.ts` files found under the given path
    #[error("No translation files found in {path}.\n\nTip: Pass a .ts file or a directory containing .ts files")]
    NoCatalogs { path: PathBuf },

    /// Search query or pattern is unusable
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON rendering failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    /// Create a Parse error from a file path and reason
    pub fn parse_error(file: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create a NoCatalogs error
    pub fn no_catalogs(path: impl Into<PathBuf>) -> Self {
        Self::NoCatalogs { path: path.into() }
    }

    pub fn invalid_query(reason: impl Into<String>) -> Self {
        Self::InvalidQuery(reason.into())
    }
}

impl From<regex::Error> for CatalogError {
    fn from(err: regex::Error) -> Self {
        Self::InvalidQuery(err.to_string())
    }
}

/// Result type alias for CatalogError
pub type Result<T> = std::result::Result<T, CatalogError>;
