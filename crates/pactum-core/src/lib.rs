//! pactum-core
//!
//! Pure domain types: the contract blueprint builder, storage key
//! conventions, and token/cost accounting. No AWS SDK dependency.

pub mod blueprint;
pub mod error;
pub mod keys;
pub mod models;
