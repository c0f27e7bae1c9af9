//! Error types for sword2flex operations.

use thiserror::Error;

/// Errors that can occur while loading sources, fetching verses, or exporting.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error(
        "Invalid reference '{0}'. Try formats like 'John 1:1', 'John 1:1-18', or 'John 1:1-5:14'."
    )]
    InvalidReference(String),

    #[error("Data lookup error for {reference}: {message}")]
    Lookup { reference: String, message: String },

    #[error("No data found for {0}")]
    NoData(String),

    #[error("No text source could be opened: {0}")]
    NoBackend(String),

    #[error("Translation '{0}' not available")]
    UnknownTranslation(String),

    #[error("Conversion error: {0}")]
    Convert(String),
}

impl Error {
    pub(crate) fn lookup(reference: impl ToString, message: impl ToString) -> Self {
        Error::Lookup {
            reference: reference.to_string(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
