//! The storage seam the pipeline is written against.

use std::collections::HashMap;
use std::future::Future;

use crate::error::StorageError;

/// Metadata for a single stored object, as returned by [`ObjectStore::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    pub key: String,
    pub size: i64,
    pub last_modified: Option<String>,
}

/// Object storage primitives over a single bucket or root directory.
pub trait ObjectStore: Send + Sync {
    /// Read a whole object. Fails with [`StorageError::NotFound`] when absent.
    fn fetch(&self, key: &str) -> impl Future<Output = Result<Vec<u8>, StorageError>> + Send;

    /// Write an object and return its locator (`s3://...` or `file://...`).
    fn store(
        &self,
        body: Vec<u8>,
        key: &str,
        metadata: &HashMap<String, String>,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;

    /// Objects whose key starts with `prefix`, in listing order. Empty when
    /// nothing matches.
    fn list(&self, prefix: &str)
    -> impl Future<Output = Result<Vec<ObjectMeta>, StorageError>> + Send;

    fn copy(&self, src: &str, dest: &str)
    -> impl Future<Output = Result<(), StorageError>> + Send;

    fn delete(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Move an object: copy to `dest`, then delete `src`.
    ///
    /// Not atomic. A failed copy leaves `src` untouched; a failed delete
    /// after a successful copy leaves the object under both keys.
    fn relocate(
        &self,
        src: &str,
        dest: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        async move {
            self.copy(src, dest).await?;
            self.delete(src).await
        }
    }
}
