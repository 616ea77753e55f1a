//! pactum-storage
//!
//! Object storage for the document pipeline. Thin wrapper around the AWS S3
//! SDK plus a local-disk mode, both behind the [`store::ObjectStore`] seam.

pub mod client;
pub mod error;
pub mod local;
pub mod mode;
pub mod objects;
pub mod s3;
pub mod store;

pub use local::LocalStore;
pub use mode::{Storage, StorageMode};
pub use s3::S3Store;
pub use store::{ObjectMeta, ObjectStore};
