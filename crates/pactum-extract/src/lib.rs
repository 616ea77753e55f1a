//! pactum-extract
//!
//! Structured data extraction from contract documents. Two interchangeable
//! providers (Bedrock Converse and the Anthropic Messages API) sit behind
//! the [`Extractor`] trait; [`ExtractionRouter`] picks one per call.

pub mod anthropic;
pub mod bedrock;
pub mod error;
pub mod format;
pub mod prompt;
pub mod provider;
pub mod router;
pub mod tokens;

pub use anthropic::AnthropicExtractor;
pub use bedrock::BedrockExtractor;
pub use error::ExtractError;
pub use provider::{ExtractionOptions, ExtractionResult, Provider};
pub use router::{ExtractionRouter, Extractor};
