//! pactum-pipeline
//!
//! Moves contract documents through the bucket lifecycle: fetch from
//! `incoming/`, extract structured data, parse the provider's JSON answer,
//! then relocate to `processed/` or `failed/`.

pub mod batch;
pub mod config;
pub mod document;
pub mod error;
pub mod parse;

pub use batch::{BatchItem, BatchOutcome, BatchRunner};
pub use config::PipelineConfig;
pub use document::{DocumentPipeline, DocumentResult, SubmittedDocument};
pub use error::PipelineError;
