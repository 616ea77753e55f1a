use thiserror::Error;

use crate::provider::Provider;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("unknown extraction provider: {0}")]
    UnknownProvider(String),

    #[error("extraction provider not configured: {0}")]
    NotConfigured(Provider),
}
