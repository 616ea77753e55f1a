use pactum_extract::ExtractError;
use pactum_storage::error::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("storage error: {0}")]
    Transport(#[from] StorageError),

    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractError),

    #[error("could not parse extraction output as JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}
