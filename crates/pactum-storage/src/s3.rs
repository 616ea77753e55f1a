use std::collections::HashMap;

use aws_sdk_s3::Client;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::client::{self, CredentialSource};
use crate::error::StorageError;
use crate::objects;
use crate::store::{ObjectMeta, ObjectStore};

/// S3-backed [`ObjectStore`] over one bucket.
///
/// The SDK client is built on first use and reused for the lifetime of the
/// store. The store is owned by whoever constructs it; nothing is global.
pub struct S3Store {
    bucket: String,
    region: String,
    credentials: CredentialSource,
    client: OnceCell<Client>,
}

impl S3Store {
    pub fn new(
        bucket: impl Into<String>,
        region: impl Into<String>,
        credentials: CredentialSource,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
            credentials,
            client: OnceCell::new(),
        }
    }

    /// Wrap an already-built client.
    pub fn with_client(bucket: impl Into<String>, client: Client) -> Self {
        let region = client
            .config()
            .region()
            .map(|r| r.to_string())
            .unwrap_or_default();
        Self {
            bucket: bucket.into(),
            region,
            credentials: CredentialSource::DefaultChain,
            client: OnceCell::new_with(Some(client)),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn client(&self) -> &Client {
        self.client
            .get_or_init(|| async {
                info!(bucket = %self.bucket, region = %self.region, "initializing S3 client");
                client::build_client(&self.region, &self.credentials).await
            })
            .await
    }

    fn locator(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}

impl ObjectStore for S3Store {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let output = objects::get_object(self.client().await, &self.bucket, key).await?;
        debug!(key, bytes = output.body.len(), "fetched object");
        Ok(output.body)
    }

    async fn store(
        &self,
        body: Vec<u8>,
        key: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<String, StorageError> {
        let content_type = content_type_for(key);
        objects::put_object(
            self.client().await,
            &self.bucket,
            key,
            body,
            content_type,
            metadata,
        )
        .await?;
        Ok(self.locator(key))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StorageError> {
        objects::list_objects_with_metadata(self.client().await, &self.bucket, prefix).await
    }

    async fn copy(&self, src: &str, dest: &str) -> Result<(), StorageError> {
        objects::copy_object(self.client().await, &self.bucket, src, dest).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        objects::delete_object(self.client().await, &self.bucket, key).await
    }
}

/// Content type for the document formats the pipeline accepts.
fn content_type_for(key: &str) -> Option<&'static str> {
    let ext = key.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())?;
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "doc" => Some("application/msword"),
        "txt" => Some("text/plain"),
        "md" => Some("text/markdown"),
        "csv" => Some("text/csv"),
        "html" | "htm" => Some("text/html"),
        "json" => Some("application/json"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline_credentials() -> CredentialSource {
        CredentialSource::Inline {
            access_key_id: "AKIAEXAMPLE".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: None,
        }
    }

    #[tokio::test]
    async fn client_is_built_once_on_first_use() {
        let store = S3Store::new("pactum-documents", "eu-west-1", inline_credentials());
        assert!(!store.client.initialized());

        let first: *const Client = store.client().await;
        assert!(store.client.initialized());
        let second: *const Client = store.client().await;

        assert!(std::ptr::eq(first, second));
        assert_eq!(
            store.client().await.config().region().map(|r| r.to_string()),
            Some("eu-west-1".to_string())
        );
    }

    #[tokio::test]
    async fn injected_client_is_used_without_building() {
        let client = client::build_client("us-west-2", &inline_credentials()).await;
        let store = S3Store::with_client("pactum-documents", client);

        assert!(store.client.initialized());
        assert_eq!(store.region, "us-west-2");
        assert_eq!(store.locator("incoming/a.pdf"), "s3://pactum-documents/incoming/a.pdf");
    }

    #[test]
    fn content_type_by_extension() {
        assert_eq!(content_type_for("incoming/a.PDF"), Some("application/pdf"));
        assert_eq!(content_type_for("incoming/notes.txt"), Some("text/plain"));
        assert_eq!(content_type_for("incoming/blob"), None);
    }
}
