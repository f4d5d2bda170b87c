use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid DOCX package: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Missing package part: {0}")]
    MissingPart(String),

    #[error("Malformed document XML: {0}")]
    Xml(String),

    #[error("Output path must differ from source: {0}")]
    SameOutput(String),
}

impl DocxError {
    pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
        DocxError::Xml(err.to_string())
    }
}
