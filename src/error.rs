use folio_layout::LayoutError;
use folio_style::StyleParseError;
use thiserror::Error;

/// Errors from building a document from its source and laying it out.
#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Invalid style: {0}")]
    Style(#[from] StyleParseError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document source is invalid: {0}")]
    Source(String),
}
