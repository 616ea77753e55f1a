//! Structured extraction via the Anthropic Messages API.
//!
//! PDFs go up as base64 `document` blocks, text formats as plain-text
//! document sources. Citations are enabled so the answer carries references
//! back into the source document.

use std::time::Instant;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use pactum_core::models::token_count::TokenCount;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::ExtractError;
use crate::format::DocumentKind;
use crate::prompt;
use crate::provider::{ExtractionOptions, ExtractionResult, Provider};
use crate::router::Extractor;
use crate::tokens;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const API_VERSION: &str = "2023-06-01";
const MAX_OUTPUT_TOKENS: u32 = 8192;

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: Vec<RequestBlock<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RequestBlock<'a> {
    Document {
        source: DocumentSource,
        title: &'a str,
        citations: CitationsConfig,
    },
    Text {
        text: String,
    },
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum DocumentSource {
    Base64 {
        media_type: &'static str,
        data: String,
    },
    Text {
        media_type: &'static str,
        data: String,
    },
}

#[derive(Serialize)]
struct CitationsConfig {
    enabled: bool,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
    usage: Option<ApiUsage>,
    stop_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseBlock {
    Text {
        text: String,
        #[serde(default)]
        citations: Option<Vec<Value>>,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct ApiUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

// ── Extractor ────────────────────────────────────────────────────────────────

pub struct AnthropicExtractor {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicExtractor {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the extractor at a different API host (no trailing slash needed).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn document_block<'a>(
        kind: DocumentKind,
        bytes: &[u8],
        title: &'a str,
    ) -> Result<RequestBlock<'a>, ExtractError> {
        let source = match kind {
            DocumentKind::Pdf => DocumentSource::Base64 {
                media_type: "application/pdf",
                data: STANDARD.encode(bytes),
            },
            k if k.is_plain_text() => DocumentSource::Text {
                media_type: "text/plain",
                data: String::from_utf8_lossy(bytes).into_owned(),
            },
            _ => return Err(ExtractError::UnsupportedFormat(title.to_string())),
        };

        Ok(RequestBlock::Document {
            source,
            title,
            citations: CitationsConfig { enabled: true },
        })
    }
}

impl Extractor for AnthropicExtractor {
    async fn extract(
        &self,
        bytes: &[u8],
        filename: &str,
        options: &ExtractionOptions,
    ) -> Result<ExtractionResult, ExtractError> {
        let kind = DocumentKind::from_filename(filename)?;
        let model = options.model_id.as_deref().unwrap_or(&self.model);
        let started = Instant::now();

        let request = MessagesRequest {
            model,
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: 0.0,
            system: prompt::EXTRACTION_SYSTEM_PROMPT,
            messages: vec![RequestMessage {
                role: "user",
                content: vec![
                    Self::document_block(kind, bytes, filename)?,
                    RequestBlock::Text {
                        text: prompt::instruction(options),
                    },
                ],
            }],
        };

        let url = format!("{}/v1/messages", self.base_url);
        info!(model, filename, bytes = bytes.len(), "extracting document via anthropic");

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(status = status.as_u16(), error = %e, "could not read error response body");
                    String::new()
                }
            };
            return Err(ExtractError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: MessagesResponse = resp
            .json()
            .await
            .map_err(|e| ExtractError::ResponseParse(e.to_string()))?;

        let mut text = String::new();
        let mut citations = Vec::new();
        for block in body.content {
            if let ResponseBlock::Text {
                text: t,
                citations: c,
            } = block
            {
                text.push_str(&t);
                citations.extend(c.unwrap_or_default());
            }
        }

        let mut notes = Vec::new();
        if body.stop_reason.as_deref() == Some("max_tokens") {
            warn!(model, filename, "anthropic response truncated at max tokens");
            notes.push("response truncated at the output token limit".to_string());
        }

        let token_count = body
            .usage
            .map(|u| TokenCount {
                input: u.input_tokens,
                output: u.output_tokens,
            })
            .unwrap_or_default();
        let usage = tokens::usage_for(model, token_count);
        let elapsed_ms = started.elapsed().as_millis() as u64;

        info!(
            model,
            filename,
            text_len = text.len(),
            citations = citations.len(),
            elapsed_ms,
            "anthropic extraction complete"
        );

        Ok(ExtractionResult {
            text,
            confidence: Map::new(),
            notes,
            citations,
            usage,
            elapsed_ms,
            provider: Provider::Anthropic,
            api: "messages".to_string(),
            model_id: model.to_string(),
        })
    }
}
