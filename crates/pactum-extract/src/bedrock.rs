//! Structured extraction via the Bedrock Converse API.
//!
//! Sends the document as a `DocumentBlock`, which handles PDF, Office and
//! text formats natively, and asks the model for a JSON answer.

use std::time::Instant;

use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, DocumentBlock, DocumentSource, InferenceConfiguration,
    Message, StopReason, SystemContentBlock,
};
use serde_json::Map;
use tracing::{info, warn};

use crate::error::ExtractError;
use crate::format::{self, DocumentKind};
use crate::prompt;
use crate::provider::{ExtractionOptions, ExtractionResult, Provider};
use crate::router::Extractor;
use crate::tokens;

pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";

const MAX_OUTPUT_TOKENS: i32 = 8192;

pub struct BedrockExtractor {
    client: Client,
    model_id: String,
}

impl BedrockExtractor {
    pub fn new(config: &aws_config::SdkConfig, model_id: impl Into<String>) -> Self {
        Self::from_client(Client::new(config), model_id)
    }

    pub fn from_client(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

impl Extractor for BedrockExtractor {
    async fn extract(
        &self,
        bytes: &[u8],
        filename: &str,
        options: &ExtractionOptions,
    ) -> Result<ExtractionResult, ExtractError> {
        let kind = DocumentKind::from_filename(filename)?;
        let model_id = options.model_id.as_deref().unwrap_or(&self.model_id);
        let started = Instant::now();

        let doc_block = DocumentBlock::builder()
            .format(kind.bedrock_format())
            .name(format::sanitize_document_name(filename))
            .source(DocumentSource::Bytes(aws_smithy_types::Blob::new(bytes)))
            .build()
            .map_err(|e| ExtractError::Invocation(e.to_string()))?;

        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Document(doc_block))
            .content(ContentBlock::Text(prompt::instruction(options)))
            .build()
            .map_err(|e| ExtractError::Invocation(e.to_string()))?;

        info!(model_id, filename, bytes = bytes.len(), "extracting document via bedrock");

        let response = self
            .client
            .converse()
            .model_id(model_id)
            .system(SystemContentBlock::Text(
                prompt::EXTRACTION_SYSTEM_PROMPT.to_string(),
            ))
            .messages(message)
            .inference_config(
                InferenceConfiguration::builder()
                    .max_tokens(MAX_OUTPUT_TOKENS)
                    .temperature(0.0)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| ExtractError::Invocation(e.into_service_error().to_string()))?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| ExtractError::ResponseParse("no message in response".to_string()))?;

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(t) = block {
                    Some(t.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        let mut notes = Vec::new();
        if *response.stop_reason() == StopReason::MaxTokens {
            warn!(model_id, filename, "bedrock response truncated at max tokens");
            notes.push("response truncated at the output token limit".to_string());
        }

        let token_count = response
            .usage()
            .map(tokens::extract_token_usage)
            .unwrap_or_default();
        let usage = tokens::usage_for(model_id, token_count);
        let elapsed_ms = started.elapsed().as_millis() as u64;

        info!(
            model_id,
            filename,
            text_len = text.len(),
            input_tokens = usage.tokens.input,
            output_tokens = usage.tokens.output,
            elapsed_ms,
            "bedrock extraction complete"
        );

        Ok(ExtractionResult {
            text,
            confidence: Map::new(),
            notes,
            citations: Vec::new(),
            usage,
            elapsed_ms,
            provider: Provider::Bedrock,
            api: "converse".to_string(),
            model_id: model_id.to_string(),
        })
    }
}
