//! Error types for the notesync library
//!
//! This module provides centralized error handling using `thiserror` across all components

use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Clone, Error, PartialEq, Eq, uniffi::Error)]
pub enum StorageError {
    /// Note or notebook not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// Target already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Name cannot be used for a notebook, note or image
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Storage backend is not reachable
    #[error("Storage unavailable")]
    Unavailable,

    /// General storage error
    #[error("Storage error: {0}")]
    Other(String),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create an already exists error
    pub fn already_exists(path: impl Into<String>) -> Self {
        Self::AlreadyExists(path.into())
    }

    /// Create an I/O error
    pub fn io(reason: impl Into<String>) -> Self {
        Self::Io(reason.into())
    }

    /// Create an invalid name error
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName(name.into())
    }

    /// Create a generic storage error
    pub fn other(reason: impl Into<String>) -> Self {
        Self::Other(reason.into())
    }

    /// Map an I/O error for `path`, keeping missing files distinguishable
    pub fn from_io(path: impl AsRef<str>, err: &std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::not_found(path.as_ref())
        } else {
            Self::io(format!("{}: {err}", path.as_ref()))
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Main error type returned by the vault and its FFI handle
#[derive(Debug, Clone, Error, PartialEq, Eq, uniffi::Error)]
#[uniffi(flat_error)]
pub enum VaultError {
    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Note paths must not be empty
    #[error("Note path is empty")]
    EmptyPath,

    /// Operation needs an open note
    #[error("No note is open")]
    NoActiveNote,

    /// Async runtime could not be started
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

impl VaultError {
    /// Create a runtime error
    pub fn runtime(reason: impl Into<String>) -> Self {
        Self::Runtime(reason.into())
    }

    /// Create a generic error
    pub fn other(reason: impl Into<String>) -> Self {
        Self::Other(reason.into())
    }
}

/// Result type for vault operations
pub type VaultResult<T> = Result<T, VaultError>;
