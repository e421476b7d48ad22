use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::StorageResult;

pub mod fs;
pub mod memory;

/// Durable storage for note content, addressed by opaque note paths.
///
/// Implementations are expected to make `write` all-or-nothing.
#[async_trait]
pub trait NoteStorage: Send + Sync + Debug {
    /// Whether the backend can be used at all.
    ///
    /// When this is `false` the vault serves demo content and never calls
    /// `read` or `write`.
    fn is_available(&self) -> bool {
        true
    }

    /// Read the markdown stored for a note
    ///
    /// # Errors
    ///
    /// Returns an error if the note does not exist or cannot be read
    async fn read(&self, path: &str) -> StorageResult<String>;

    /// Create or overwrite the markdown stored for a note
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails
    async fn write(&self, path: &str, content: &str) -> StorageResult<()>;

    /// Show the note in the platform's file manager
    ///
    /// # Errors
    ///
    /// Returns an error if the note does not exist or the file manager cannot be launched
    async fn reveal(&self, path: &str) -> StorageResult<()>;
}
