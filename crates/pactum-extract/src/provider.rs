use std::fmt;
use std::str::FromStr;

use pactum_core::models::token_count::TokenUsage;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ExtractError;

/// The extraction backends a caller can choose between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    #[default]
    Bedrock,
    Anthropic,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Bedrock => "bedrock",
            Provider::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bedrock" | "aws" => Ok(Provider::Bedrock),
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            other => Err(ExtractError::UnknownProvider(other.to_string())),
        }
    }
}

/// Per-call options. Unset fields fall back to the router's and the
/// backend's configured defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionOptions {
    pub provider: Option<Provider>,
    pub model_id: Option<String>,
    /// Replaces the default user instruction sent alongside the document.
    pub instructions: Option<String>,
}

impl ExtractionOptions {
    pub fn with_provider(provider: Provider) -> Self {
        Self {
            provider: Some(provider),
            ..Self::default()
        }
    }
}

/// Provider-agnostic output of one extraction call.
///
/// `text` is the model's raw answer, expected to be JSON, possibly inside a
/// fenced code block. Interpreting it is the caller's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub text: String,
    #[serde(default)]
    pub confidence: Map<String, Value>,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub citations: Vec<Value>,
    pub usage: TokenUsage,
    pub elapsed_ms: u64,
    pub provider: Provider,
    /// Provider API that served the call, e.g. `converse` or `messages`.
    pub api: String,
    pub model_id: String,
}
