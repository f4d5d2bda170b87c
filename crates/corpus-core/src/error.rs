use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Embedding provider HTTP error: {0}")]
    Http(String),

    #[error("Embedding provider returned {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Malformed embedding response: {0}")]
    Malformed(String),

    #[error("Expected {expected}-dimensional embeddings, got {actual}")]
    Dimension { expected: usize, actual: usize },

    #[error("Missing credentials: {0} is not set")]
    MissingCredentials(&'static str),
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(e: reqwest::Error) -> Self {
        EmbeddingError::Http(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Reference index is empty")]
    EmptyIndex,

    #[error("Index was built with {indexed}, queried with {query}")]
    EmbedderMismatch { indexed: String, query: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt index file: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

impl RetrievalError {
    /// True when the index holds no chunks yet
    pub fn is_empty_index(&self) -> bool {
        matches!(self, RetrievalError::Index(IndexError::EmptyIndex))
    }
}
