//! Environment-driven configuration, read once at startup.

use std::path::PathBuf;
use std::time::Duration;

use pactum_extract::{
    AnthropicExtractor, BedrockExtractor, ExtractionRouter, Provider, anthropic, bedrock,
};
use pactum_storage::client::{self, CredentialSource};
use pactum_storage::{LocalStore, S3Store, Storage, StorageMode};
use tracing::info;

use crate::batch::DEFAULT_BATCH_DELAY;
use crate::error::PipelineError;

pub const DEFAULT_BUCKET: &str = "pactum-documents";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_LOCAL_ROOT: &str = "./storage";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub bucket: String,
    pub region: String,
    pub credentials: CredentialSource,
    pub storage_mode: StorageMode,
    pub local_root: PathBuf,
    pub provider: Provider,
    pub bedrock_model_id: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub batch_delay: Duration,
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, PipelineError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PipelineError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let credentials = match (get("AWS_ACCESS_KEY_ID"), get("AWS_SECRET_ACCESS_KEY")) {
            (Some(access_key_id), Some(secret_access_key)) => CredentialSource::Inline {
                access_key_id,
                secret_access_key,
                session_token: get("AWS_SESSION_TOKEN"),
            },
            _ => CredentialSource::DefaultChain,
        };

        let storage_mode = match get("PACTUM_STORAGE_MODE") {
            Some(mode) => mode
                .parse::<StorageMode>()
                .map_err(|e| PipelineError::Config(e.to_string()))?,
            None => StorageMode::default(),
        };

        let provider = match get("PACTUM_EXTRACTION_PROVIDER") {
            Some(name) => name
                .parse::<Provider>()
                .map_err(|e| PipelineError::Config(e.to_string()))?,
            None => Provider::default(),
        };

        let batch_delay = match get("PACTUM_BATCH_DELAY_MS") {
            Some(ms) => Duration::from_millis(ms.trim().parse().map_err(|_| {
                PipelineError::Config(format!("PACTUM_BATCH_DELAY_MS is not a number: {ms}"))
            })?),
            None => DEFAULT_BATCH_DELAY,
        };

        Ok(Self {
            bucket: get("PACTUM_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            region: get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            credentials,
            storage_mode,
            local_root: get("PACTUM_LOCAL_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCAL_ROOT)),
            provider,
            bedrock_model_id: get("PACTUM_BEDROCK_MODEL_ID")
                .unwrap_or_else(|| bedrock::DEFAULT_MODEL_ID.to_string()),
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            anthropic_model: get("PACTUM_ANTHROPIC_MODEL")
                .unwrap_or_else(|| anthropic::DEFAULT_MODEL.to_string()),
            batch_delay,
        })
    }

    /// The configured store. The S3 client itself is created on first use.
    pub fn build_store(&self) -> Storage {
        match self.storage_mode {
            StorageMode::S3 => Storage::S3(S3Store::new(
                &self.bucket,
                &self.region,
                self.credentials.clone(),
            )),
            StorageMode::Local => Storage::Local(LocalStore::new(&self.local_root)),
        }
    }

    /// The extraction router with every backend the configuration enables.
    /// Bedrock is always available; Anthropic needs an API key.
    pub async fn build_router(&self) -> ExtractionRouter {
        let aws = client::build_aws_config(&self.region, &self.credentials).await;
        let mut router = ExtractionRouter::new(self.provider)
            .with_bedrock(BedrockExtractor::new(&aws, &self.bedrock_model_id));

        if let Some(key) = &self.anthropic_api_key {
            router = router.with_anthropic(AnthropicExtractor::new(key, &self.anthropic_model));
        }

        info!(
            default_provider = %self.provider,
            anthropic = self.anthropic_api_key.is_some(),
            "extraction router ready"
        );
        router
    }
}
