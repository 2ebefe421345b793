pub mod management;
pub mod models;
pub mod preview;

pub use management::ManagementClient;
pub use preview::PreviewClient;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentfulError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("resource not found")]
    NotFound,
    #[error("invalid access token")]
    Unauthorized,
    #[error("API rate limit exceeded")]
    RateLimit,
    #[error("entry validation failed: {0}")]
    Validation(String),
    #[error("unexpected API response ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("asset processing did not complete for {0}")]
    ProcessingIncomplete(String),
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Map a response to a typed body, or to the error taxonomy shared by
/// both API hosts: 404 not-found (recoverable by callers), 401/403 auth,
/// 422 validation, 429 rate limit, anything else surfaced as-is.
pub(crate) async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ContentfulError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response.json().await?);
    }

    match status.as_u16() {
        404 => Err(ContentfulError::NotFound),
        401 | 403 => Err(ContentfulError::Unauthorized),
        429 => Err(ContentfulError::RateLimit),
        422 => {
            let message = error_message(response).await;
            Err(ContentfulError::Validation(message))
        }
        code => {
            let message = error_message(response).await;
            Err(ContentfulError::Api {
                status: code,
                message,
            })
        }
    }
}

async fn error_message(response: reqwest::Response) -> String {
    match response.json::<ApiErrorBody>().await {
        Ok(body) => body.message.unwrap_or_else(|| "no message".to_string()),
        Err(_) => "no message".to_string(),
    }
}
