use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("File too large: {0} MB (max: {1} MB)")]
    FileTooLarge(u64, u64),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("PDF parsing error: {0}")]
    PdfParse(#[from] lopdf::Error),

    #[error("Invalid UTF-8 encoding in: {0}")]
    InvalidEncoding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid chunking configuration: {0}")]
    InvalidConfig(String),
}
