use std::future::Future;

use tracing::debug;

use crate::anthropic::AnthropicExtractor;
use crate::bedrock::BedrockExtractor;
use crate::error::ExtractError;
use crate::provider::{ExtractionOptions, ExtractionResult, Provider};

/// Extract structured data from a document given its bytes and name.
pub trait Extractor: Send + Sync {
    fn extract(
        &self,
        bytes: &[u8],
        filename: &str,
        options: &ExtractionOptions,
    ) -> impl Future<Output = Result<ExtractionResult, ExtractError>> + Send;
}

/// A configured backend, selected per call.
pub enum Backend<'a> {
    Bedrock(&'a BedrockExtractor),
    Anthropic(&'a AnthropicExtractor),
}

impl Backend<'_> {
    pub fn provider(&self) -> Provider {
        match self {
            Backend::Bedrock(_) => Provider::Bedrock,
            Backend::Anthropic(_) => Provider::Anthropic,
        }
    }

    pub async fn extract(
        &self,
        bytes: &[u8],
        filename: &str,
        options: &ExtractionOptions,
    ) -> Result<ExtractionResult, ExtractError> {
        match self {
            Backend::Bedrock(b) => b.extract(bytes, filename, options).await,
            Backend::Anthropic(a) => a.extract(bytes, filename, options).await,
        }
    }
}

/// Dispatches each call to the provider named in the options, or to the
/// configured default. Results are passed through as the backend returns
/// them.
pub struct ExtractionRouter {
    default_provider: Provider,
    bedrock: Option<BedrockExtractor>,
    anthropic: Option<AnthropicExtractor>,
}

impl ExtractionRouter {
    pub fn new(default_provider: Provider) -> Self {
        Self {
            default_provider,
            bedrock: None,
            anthropic: None,
        }
    }

    pub fn with_bedrock(mut self, bedrock: BedrockExtractor) -> Self {
        self.bedrock = Some(bedrock);
        self
    }

    pub fn with_anthropic(mut self, anthropic: AnthropicExtractor) -> Self {
        self.anthropic = Some(anthropic);
        self
    }

    pub fn default_provider(&self) -> Provider {
        self.default_provider
    }

    /// Resolve the backend for a call. Fails when the chosen provider has
    /// no configured backend.
    pub fn select(&self, options: &ExtractionOptions) -> Result<Backend<'_>, ExtractError> {
        let provider = options.provider.unwrap_or(self.default_provider);
        match provider {
            Provider::Bedrock => self
                .bedrock
                .as_ref()
                .map(Backend::Bedrock)
                .ok_or(ExtractError::NotConfigured(provider)),
            Provider::Anthropic => self
                .anthropic
                .as_ref()
                .map(Backend::Anthropic)
                .ok_or(ExtractError::NotConfigured(provider)),
        }
    }
}

impl Extractor for ExtractionRouter {
    async fn extract(
        &self,
        bytes: &[u8],
        filename: &str,
        options: &ExtractionOptions,
    ) -> Result<ExtractionResult, ExtractError> {
        let backend = self.select(options)?;
        debug!(provider = %backend.provider(), filename, "routing extraction");
        backend.extract(bytes, filename, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_provider_is_rejected() {
        let router = ExtractionRouter::new(Provider::Bedrock);
        assert!(matches!(
            router.select(&ExtractionOptions::default()),
            Err(ExtractError::NotConfigured(Provider::Bedrock))
        ));
    }

    #[test]
    fn option_overrides_default_provider() {
        let router = ExtractionRouter::new(Provider::Bedrock)
            .with_anthropic(AnthropicExtractor::new("test-key", "claude-sonnet-4-20250514"));

        let backend = router
            .select(&ExtractionOptions::with_provider(Provider::Anthropic))
            .unwrap();
        assert_eq!(backend.provider(), Provider::Anthropic);
        assert!(router.select(&ExtractionOptions::default()).is_err());
    }
}
