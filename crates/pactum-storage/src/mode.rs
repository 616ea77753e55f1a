//! Storage mode selection: remote S3 or a local directory.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::StorageError;
use crate::local::LocalStore;
use crate::s3::S3Store;
use crate::store::{ObjectMeta, ObjectStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageMode {
    #[default]
    S3,
    Local,
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageMode::S3 => "s3",
            StorageMode::Local => "local",
        })
    }
}

impl FromStr for StorageMode {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s3" | "remote" => Ok(StorageMode::S3),
            "local" | "fs" => Ok(StorageMode::Local),
            other => Err(StorageError::Config(format!("unknown storage mode: {other}"))),
        }
    }
}

/// Either configured backend, chosen once at startup.
pub enum Storage {
    S3(S3Store),
    Local(LocalStore),
}

impl Storage {
    pub fn mode(&self) -> StorageMode {
        match self {
            Storage::S3(_) => StorageMode::S3,
            Storage::Local(_) => StorageMode::Local,
        }
    }
}

impl ObjectStore for Storage {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        match self {
            Storage::S3(s) => s.fetch(key).await,
            Storage::Local(l) => l.fetch(key).await,
        }
    }

    async fn store(
        &self,
        body: Vec<u8>,
        key: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<String, StorageError> {
        match self {
            Storage::S3(s) => s.store(body, key, metadata).await,
            Storage::Local(l) => l.store(body, key, metadata).await,
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StorageError> {
        match self {
            Storage::S3(s) => s.list(prefix).await,
            Storage::Local(l) => l.list(prefix).await,
        }
    }

    async fn copy(&self, src: &str, dest: &str) -> Result<(), StorageError> {
        match self {
            Storage::S3(s) => s.copy(src, dest).await,
            Storage::Local(l) => l.copy(src, dest).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        match self {
            Storage::S3(s) => s.delete(key).await,
            Storage::Local(l) => l.delete(key).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parsing() {
        assert_eq!("S3".parse::<StorageMode>().unwrap(), StorageMode::S3);
        assert_eq!("local".parse::<StorageMode>().unwrap(), StorageMode::Local);
        assert!("gcs".parse::<StorageMode>().is_err());
        assert_eq!(StorageMode::default(), StorageMode::S3);
    }
}
