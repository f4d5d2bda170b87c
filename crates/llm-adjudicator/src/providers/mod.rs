pub mod gemini;
pub mod openai;

pub use gemini::GeminiAdjudicator;
pub use openai::OpenAiAdjudicator;

use std::time::Duration;

use reqwest::{Client, Response};

use crate::error::AdjudicationError;

fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(5))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Body of a 2xx response, or a `Status` error carrying the body
async fn success_body(resp: Response) -> Result<String, AdjudicationError> {
    let status = resp.status();
    let body = resp.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(AdjudicationError::Status {
            code: status.as_u16(),
            body,
        })
    }
}
