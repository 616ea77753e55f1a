//! Serial batch processing of everything under `incoming/`.

use std::time::Duration;

use jiff::Timestamp;
use pactum_core::keys::INCOMING_PREFIX;
use pactum_extract::{ExtractionOptions, Extractor};
use pactum_storage::ObjectStore;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::document::{DocumentPipeline, DocumentResult};

/// Pause between consecutive documents.
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(2000);

/// One document's entry in a batch outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchItem {
    Success {
        key: String,
        result: Box<DocumentResult>,
    },
    Failure {
        key: String,
        error: String,
    },
}

impl BatchItem {
    pub fn key(&self) -> &str {
        match self {
            BatchItem::Success { key, .. } | BatchItem::Failure { key, .. } => key,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BatchItem::Success { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub run_id: Uuid,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    pub processed: usize,
    pub failed: usize,
    pub results: Vec<BatchItem>,
    /// Set when the incoming listing itself could not be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchOutcome {
    fn empty(run_id: Uuid, started_at: Timestamp) -> Self {
        Self {
            run_id,
            started_at,
            finished_at: Timestamp::now(),
            processed: 0,
            failed: 0,
            results: Vec::new(),
            error: None,
        }
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }
}

/// Runs the document pipeline over every incoming object, one at a time.
pub struct BatchRunner<S, E> {
    pipeline: DocumentPipeline<S, E>,
    delay: Duration,
}

impl<S: ObjectStore, E: Extractor> BatchRunner<S, E> {
    pub fn new(pipeline: DocumentPipeline<S, E>) -> Self {
        Self {
            pipeline,
            delay: DEFAULT_BATCH_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn pipeline(&self) -> &DocumentPipeline<S, E> {
        &self.pipeline
    }

    /// Process every object under `incoming/` in listing order.
    ///
    /// Per-document failures are recorded and do not stop the batch. The
    /// delay is applied between documents, never after the last one.
    pub async fn run(&self, options: &ExtractionOptions) -> BatchOutcome {
        let run_id = Uuid::new_v4();
        let started_at = Timestamp::now();

        let pending = match self.pipeline.store().list(INCOMING_PREFIX).await {
            Ok(objects) => objects,
            Err(e) => {
                error!(run_id = %run_id, error = %e, "could not list incoming documents");
                let mut outcome = BatchOutcome::empty(run_id, started_at);
                outcome.error = Some(e.to_string());
                return outcome;
            }
        };

        if pending.is_empty() {
            info!(run_id = %run_id, "no incoming documents");
            return BatchOutcome::empty(run_id, started_at);
        }

        let total = pending.len();
        info!(run_id = %run_id, total, delay_ms = self.delay.as_millis() as u64, "starting batch");

        let mut outcome = BatchOutcome::empty(run_id, started_at);
        for (index, object) in pending.into_iter().enumerate() {
            match self.pipeline.process(&object.key, options).await {
                Ok(result) => {
                    outcome.processed += 1;
                    outcome.results.push(BatchItem::Success {
                        key: object.key,
                        result: Box::new(result),
                    });
                }
                Err(e) => {
                    warn!(run_id = %run_id, key = %object.key, error = %e, "document failed");
                    outcome.failed += 1;
                    outcome.results.push(BatchItem::Failure {
                        key: object.key,
                        error: e.to_string(),
                    });
                }
            }

            if index + 1 < total {
                tokio::time::sleep(self.delay).await;
            }
        }

        outcome.finished_at = Timestamp::now();
        info!(
            run_id = %run_id,
            processed = outcome.processed,
            failed = outcome.failed,
            "batch complete"
        );
        outcome
    }
}
