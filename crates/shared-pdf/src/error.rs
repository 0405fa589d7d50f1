use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Page {requested} does not exist (document has {page_count} pages)")]
    PageOutOfRange { requested: u32, page_count: u32 },

    #[error("Uploaded file is empty")]
    InvalidFileEmpty,

    #[error("Failed to parse document: {0}")]
    MalformedDocument(String),

    #[error("Failed to render PDF page: {0}")]
    RenderFailed(String),
}
