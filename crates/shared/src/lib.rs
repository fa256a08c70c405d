//! Shared configuration for Lockbox.
//!
//! This crate provides the settings types consumed by the rest of the
//! workspace:
//! - Layered configuration loading (files + environment)
//! - Storage provider credential bundles
//!
//! The storage core never reads configuration files itself; it receives the
//! credential bundle loaded here at construction time.

pub mod config;

pub use config::{AppConfig, StorageProviderSettings, StorageSettings};
