#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

uniffi::setup_scaffolding!();

pub mod assets;
pub mod cache;
pub mod coalescer;
pub mod config;
pub mod demo;
pub mod error;
pub mod ffi;
pub mod models;
pub mod paths;
pub mod storage;
pub mod vault;

// Re-export common types for convenience
pub use error::{StorageError, StorageResult, VaultError, VaultResult};
pub use storage::NoteStorage;
pub use vault::{SwitchOutcome, Vault};
