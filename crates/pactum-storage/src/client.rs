//! AWS SDK configuration shared by the S3 store and the Bedrock extractor.

use aws_sdk_s3::config::Credentials;

/// Where AWS credentials come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Inline {
        access_key_id: String,
        secret_access_key: String,
        session_token: Option<String>,
    },
    /// Ambient resolution: environment, profile, instance role.
    DefaultChain,
}

/// Build an `SdkConfig` from a region and credential source.
pub async fn build_aws_config(region: &str, creds: &CredentialSource) -> aws_config::SdkConfig {
    let mut builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()));

    if let CredentialSource::Inline {
        access_key_id,
        secret_access_key,
        session_token,
    } = creds
    {
        builder = builder.credentials_provider(Credentials::new(
            access_key_id,
            secret_access_key,
            session_token.clone(),
            None,
            "pactum-config",
        ));
    }

    builder.load().await
}

/// Build an S3 client for the given region and credentials.
pub async fn build_client(region: &str, creds: &CredentialSource) -> aws_sdk_s3::Client {
    let config = build_aws_config(region, creds).await;
    aws_sdk_s3::Client::new(&config)
}
