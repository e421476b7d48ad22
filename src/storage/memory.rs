use core::sync::atomic::{AtomicBool, Ordering};
use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::{StorageError, StorageResult},
    storage::NoteStorage,
};

/// In-memory storage for notes
#[derive(Debug)]
pub struct MemoryStorage {
    notes: RwLock<BTreeMap<String, String>>,
    available: AtomicBool,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self {
            notes: RwLock::new(BTreeMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Build a store pre-filled with `(path, content)` pairs
    pub fn with_notes<I, P, C>(notes: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        Self {
            notes: RwLock::new(
                notes
                    .into_iter()
                    .map(|(path, content)| (path.into(), content.into()))
                    .collect(),
            ),
            available: AtomicBool::new(true),
        }
    }

    /// Toggle availability, switching the vault between real and demo mode
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// All stored note paths in order
    pub async fn paths(&self) -> Vec<String> {
        self.notes.read().await.keys().cloned().collect()
    }

    pub async fn remove(&self, path: &str) -> Option<String> {
        self.notes.write().await.remove(path)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NoteStorage for MemoryStorage {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn read(&self, path: &str) -> StorageResult<String> {
        self.notes
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path))
    }

    async fn write(&self, path: &str, content: &str) -> StorageResult<()> {
        self.notes
            .write()
            .await
            .insert(path.to_string(), content.to_string());
        Ok(())
    }

    async fn reveal(&self, path: &str) -> StorageResult<()> {
        if self.notes.read().await.contains_key(path) {
            Ok(())
        } else {
            Err(StorageError::not_found(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_storage_basic_operations() {
        let storage = MemoryStorage::new();

        storage.write("/nb/n1", "Hello").await.unwrap();
        assert_eq!(storage.read("/nb/n1").await.unwrap(), "Hello");

        storage.write("/nb/n1", "World").await.unwrap();
        assert_eq!(storage.read("/nb/n1").await.unwrap(), "World");

        assert_eq!(storage.paths().await, vec!["/nb/n1".to_string()]);

        assert_eq!(storage.remove("/nb/n1").await.as_deref(), Some("World"));
        assert_eq!(
            storage.read("/nb/n1").await,
            Err(StorageError::NotFound("/nb/n1".into()))
        );
    }

    #[tokio::test]
    async fn memory_storage_with_notes_and_reveal() {
        let storage = MemoryStorage::with_notes([("/nb/a", "A"), ("/nb/b", "B")]);

        assert_eq!(storage.read("/nb/b").await.unwrap(), "B");
        assert!(storage.reveal("/nb/a").await.is_ok());
        assert!(matches!(
            storage.reveal("/nb/missing").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn memory_storage_availability_toggle() {
        let storage = MemoryStorage::default();
        assert!(storage.is_available());
        storage.set_available(false);
        assert!(!storage.is_available());
    }
}
