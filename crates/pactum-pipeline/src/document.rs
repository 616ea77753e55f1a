//! Single-document processing.
//!
//! Each document moves through fetch, extract, parse and relocate. A fetch
//! failure leaves the object where it is. Any later failure sends it to
//! `failed/` on a best-effort basis and reports the original error.

use std::collections::HashMap;
use std::time::Instant;

use pactum_core::keys::{self, Stage};
use pactum_core::models::token_count::TokenUsage;
use pactum_extract::{ExtractionOptions, ExtractionResult, Extractor, Provider};
use pactum_storage::ObjectStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::error::PipelineError;
use crate::parse;

/// Outcome of a successfully processed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResult {
    pub success: bool,
    pub filename: String,
    pub original_key: String,
    pub new_key: String,
    pub extracted_data: Value,
    pub confidence: Map<String, Value>,
    pub notes: Vec<String>,
    pub citations: Vec<Value>,
    pub usage: TokenUsage,
    /// Time spent inside the extraction provider.
    pub extraction_ms: u64,
    /// Wall time for the whole document, fetch to relocation.
    pub processing_time_ms: u64,
    pub provider: Provider,
    pub api: String,
    pub model_id: String,
}

impl DocumentResult {
    fn assemble(
        key: &str,
        new_key: String,
        filename: &str,
        extraction: ExtractionResult,
        parsed: &Value,
        processing_time_ms: u64,
    ) -> Self {
        let confidence = if extraction.confidence.is_empty() {
            parse::envelope_confidence(parsed)
        } else {
            extraction.confidence
        };

        let mut notes = extraction.notes;
        notes.extend(parse::envelope_notes(parsed));

        Self {
            success: true,
            filename: filename.to_string(),
            original_key: key.to_string(),
            new_key,
            extracted_data: parse::payload(parsed),
            confidence,
            notes,
            citations: extraction.citations,
            usage: extraction.usage,
            extraction_ms: extraction.elapsed_ms,
            processing_time_ms,
            provider: extraction.provider,
            api: extraction.api,
            model_id: extraction.model_id,
        }
    }
}

/// Where a newly submitted document landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedDocument {
    pub key: String,
    pub locator: String,
}

/// Processes documents against an injected store and extractor.
pub struct DocumentPipeline<S, E> {
    store: S,
    extractor: E,
}

impl<S: ObjectStore, E: Extractor> DocumentPipeline<S, E> {
    pub fn new(store: S, extractor: E) -> Self {
        Self { store, extractor }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Upload a new document under `incoming/`.
    pub async fn submit(
        &self,
        body: Vec<u8>,
        filename: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<SubmittedDocument, PipelineError> {
        let key = keys::incoming(filename);
        let locator = self.store.store(body, &key, metadata).await?;
        info!(key = %key, locator = %locator, "document submitted");
        Ok(SubmittedDocument { key, locator })
    }

    /// Run one document through the pipeline.
    pub async fn process(
        &self,
        key: &str,
        options: &ExtractionOptions,
    ) -> Result<DocumentResult, PipelineError> {
        let started = Instant::now();
        let filename = keys::filename(key);

        info!(key, filename, "processing document");

        // Nothing has moved yet, so a fetch failure needs no cleanup.
        let bytes = self.store.fetch(key).await.map_err(|e| {
            error!(key, error = %e, "failed to fetch document");
            PipelineError::from(e)
        })?;

        match self.settle(key, filename, &bytes, options, started).await {
            Ok(result) => {
                info!(
                    key,
                    new_key = %result.new_key,
                    provider = %result.provider,
                    processing_time_ms = result.processing_time_ms,
                    "document processed"
                );
                Ok(result)
            }
            Err(err) => {
                error!(key, error = %err, "document processing failed");
                self.quarantine(key).await;
                Err(err)
            }
        }
    }

    async fn settle(
        &self,
        key: &str,
        filename: &str,
        bytes: &[u8],
        options: &ExtractionOptions,
        started: Instant,
    ) -> Result<DocumentResult, PipelineError> {
        let extraction = self.extractor.extract(bytes, filename, options).await?;
        let parsed = parse::parse_extraction(&extraction.text)?;

        let new_key = keys::relocate(key, Stage::Processed);
        self.store.relocate(key, &new_key).await?;

        let elapsed = started.elapsed().as_millis() as u64;
        Ok(DocumentResult::assemble(
            key, new_key, filename, extraction, &parsed, elapsed,
        ))
    }

    /// Best-effort move to `failed/`. Errors are logged, never returned.
    async fn quarantine(&self, key: &str) {
        let failed_key = keys::relocate(key, Stage::Failed);
        match self.store.relocate(key, &failed_key).await {
            Ok(()) => warn!(key, failed_key = %failed_key, "moved document to failed"),
            Err(e) => error!(
                key,
                failed_key = %failed_key,
                error = %e,
                "could not move document to failed"
            ),
        }
    }
}
