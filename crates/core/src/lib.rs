//! Secure object storage for Lockbox.
//!
//! This crate contains the provider-agnostic storage service with ZERO web
//! or database dependencies.
//!
//! # Modules
//!
//! - `crypto` - Passphrase-derived authenticated encryption
//! - `storage` - Backends, staging, URL signing, and folder routing

pub mod crypto;
pub mod storage;

pub use storage::{
    ObjectStorage, ResourceType, StorageConfig, StorageError, StorageProvider,
};
