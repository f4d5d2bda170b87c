use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdjudicationError {
    #[error("Adjudication timed out")]
    Timeout,

    #[error("Provider HTTP error: {0}")]
    Http(String),

    #[error("Provider returned {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Malformed model response: {0}")]
    Malformed(String),

    #[error("Missing credentials: {0} is not set")]
    MissingCredentials(&'static str),
}

impl From<reqwest::Error> for AdjudicationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AdjudicationError::Timeout
        } else {
            AdjudicationError::Http(e.to_string())
        }
    }
}
