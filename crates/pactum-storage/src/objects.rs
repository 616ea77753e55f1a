use std::collections::HashMap;

use aws_sdk_s3::Client;
use aws_smithy_types::byte_stream::ByteStream;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::StorageError;
use crate::store::ObjectMeta;

/// Result of a GET operation, including the body and ETag.
pub struct GetObjectOutput {
    pub body: Vec<u8>,
    pub etag: Option<String>,
    pub content_type: Option<String>,
}

/// Get an object from S3. The streamed body is collected into one buffer.
pub async fn get_object(
    client: &Client,
    bucket: &str,
    key: &str,
) -> Result<GetObjectOutput, StorageError> {
    let resp = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| {
            let err = e.into_service_error();
            if err.is_no_such_key() {
                StorageError::NotFound {
                    key: key.to_string(),
                }
            } else {
                StorageError::GetObject(err.to_string())
            }
        })?;

    let etag = resp.e_tag().map(|s| s.to_string());
    let content_type = resp.content_type().map(|s| s.to_string());
    let body = resp
        .body
        .collect()
        .await
        .map_err(|e| StorageError::GetObject(e.to_string()))?
        .into_bytes()
        .to_vec();

    Ok(GetObjectOutput {
        body,
        etag,
        content_type,
    })
}

/// Put an object to S3 with user metadata. Returns the new ETag.
pub async fn put_object(
    client: &Client,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
    content_type: Option<&str>,
    metadata: &HashMap<String, String>,
) -> Result<String, StorageError> {
    let mut req = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body));

    if let Some(ct) = content_type {
        req = req.content_type(ct);
    }
    for (name, value) in metadata {
        req = req.metadata(name, value);
    }

    let resp = req
        .send()
        .await
        .map_err(|e| StorageError::PutObject(e.into_service_error().to_string()))?;

    Ok(resp.e_tag().unwrap_or_default().to_string())
}

/// Server-side copy of `src_key` to `dest_key` within one bucket.
pub async fn copy_object(
    client: &Client,
    bucket: &str,
    src_key: &str,
    dest_key: &str,
) -> Result<(), StorageError> {
    client
        .copy_object()
        .bucket(bucket)
        .copy_source(copy_source(bucket, src_key))
        .key(dest_key)
        .send()
        .await
        .map_err(|e| {
            let err = e.into_service_error();
            if err.to_string().contains("NoSuchKey") {
                StorageError::NotFound {
                    key: src_key.to_string(),
                }
            } else {
                StorageError::CopyObject(err.to_string())
            }
        })?;

    Ok(())
}

/// Delete an object from S3.
pub async fn delete_object(
    client: &Client,
    bucket: &str,
    key: &str,
) -> Result<(), StorageError> {
    client
        .delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| StorageError::DeleteObject(e.into_service_error().to_string()))?;

    Ok(())
}

/// List objects under a prefix with size and last-modified metadata.
///
/// Follows continuation tokens until the listing is exhausted. Keys come
/// back in S3's lexicographic order.
pub async fn list_objects_with_metadata(
    client: &Client,
    bucket: &str,
    prefix: &str,
) -> Result<Vec<ObjectMeta>, StorageError> {
    let mut objects = Vec::new();
    let mut continuation_token: Option<String> = None;

    loop {
        let mut req = client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix);

        if let Some(token) = &continuation_token {
            req = req.continuation_token(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| StorageError::ListObjects(e.into_service_error().to_string()))?;

        for obj in resp.contents() {
            if let Some(key) = obj.key() {
                // Folder placeholders created by the console.
                if key.ends_with('/') {
                    continue;
                }
                objects.push(ObjectMeta {
                    key: key.to_string(),
                    size: obj.size().unwrap_or(0),
                    last_modified: obj.last_modified().map(|t| t.to_string()),
                });
            }
        }

        if resp.is_truncated() == Some(true) {
            continuation_token = resp.next_continuation_token().map(|s| s.to_string());
        } else {
            break;
        }
    }

    Ok(objects)
}

/// Everything except RFC 3986 unreserved characters and `/`.
const COPY_SOURCE_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// `CopySource` header value: `bucket/key` with the key percent-encoded,
/// keeping `/` separators intact.
fn copy_source(bucket: &str, key: &str) -> String {
    format!("{bucket}/{}", utf8_percent_encode(key, COPY_SOURCE_ENCODE))
}

#[cfg(test)]
mod tests {
    use super::copy_source;

    #[test]
    fn copy_source_encodes_key() {
        assert_eq!(
            copy_source("docs", "incoming/acme contract (v2).pdf"),
            "docs/incoming/acme%20contract%20%28v2%29.pdf"
        );
        assert_eq!(copy_source("docs", "incoming/a.pdf"), "docs/incoming/a.pdf");
        assert_eq!(
            copy_source("docs", "incoming/caf\u{e9}_v1~final.pdf"),
            "docs/incoming/caf%C3%A9_v1~final.pdf"
        );
    }
}
