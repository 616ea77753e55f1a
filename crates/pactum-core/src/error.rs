use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("form submission must be a JSON object")]
    NotAnObject,

    #[error("invalid lifecycle stage: {0}")]
    InvalidStage(String),
}
