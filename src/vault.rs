//! The note coordinator.
//!
//! A [`Vault`] is the single owner of the open note: it loads notes from
//! storage, keeps the editor content in memory, and decides when that content
//! is written back. Edits are cached synchronously and persisted through a
//! [`WriteCoalescer`]; [`Vault::flush`] is the barrier callers await before
//! switching notes or shutting down.
//!
//! When the storage reports itself unavailable the vault runs purely in memory:
//! every note opens with the configured demo content and writes are skipped.
//! A note opened that way stays unpersisted until it is opened again, even if
//! storage comes back in the meantime.

use std::sync::Arc;

use crate::{
    assets::MarkdownAssets,
    cache::{ActiveNote, ContentCache},
    coalescer::WriteCoalescer,
    config::VaultConfig,
    error::{StorageError, VaultError, VaultResult},
    models::VaultPhase,
    storage::NoteStorage,
};

/// Result of [`Vault::switch_note`]
#[derive(Debug)]
pub struct SwitchOutcome {
    /// Display-form content of the note that is now open
    pub content: String,
    /// Set when the outgoing note could not be written; the switch still happened
    pub flush_error: Option<VaultError>,
}

#[derive(Debug)]
pub struct Vault {
    storage: Arc<dyn NoteStorage>,
    assets: MarkdownAssets,
    cache: ContentCache,
    coalescer: WriteCoalescer,
    config: VaultConfig,
    // The open note holds demo content, not what storage has.
    demo: bool,
}

impl Vault {
    pub fn new(storage: Arc<dyn NoteStorage>, config: VaultConfig) -> Self {
        Self {
            coalescer: WriteCoalescer::new(Arc::clone(&storage), config.debounce),
            storage,
            assets: MarkdownAssets::default(),
            cache: ContentCache::new(),
            config,
            demo: false,
        }
    }

    /// Use a different rewriter, e.g. one with a platform-specific resolver
    #[must_use]
    pub fn with_assets(mut self, assets: MarkdownAssets) -> Self {
        self.assets = assets;
        self
    }

    /// Load a note and make it the active one.
    ///
    /// Returns the display form of the note. Any pending write is dropped, so
    /// callers switching away from a dirty note should [`flush`](Self::flush)
    /// first or use [`switch_note`](Self::switch_note).
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is empty or the note cannot be read. After a
    /// failed read no note is active.
    pub async fn open_note(&mut self, path: &str) -> VaultResult<String> {
        if path.is_empty() {
            return Err(VaultError::EmptyPath);
        }
        self.coalescer.cancel();

        if !self.storage.is_available() {
            tracing::debug!(path, "storage unavailable, opening demo note");
            let demo = self.config.demo_note.clone();
            self.cache.set(path, demo.clone());
            self.demo = true;
            return Ok(demo);
        }

        let stored = match self.storage.read(path).await {
            Ok(stored) => stored,
            Err(e) => {
                self.clear();
                return Err(e.into());
            }
        };
        let display = self.assets.to_display(&stored, path);
        self.cache.set(path, display.clone());
        self.demo = false;
        tracing::debug!(path, "note opened");
        Ok(display)
    }

    /// Record the editor's current content and schedule it for writing.
    ///
    /// The content is cached before this returns. Nothing is sent back to the
    /// editor. Edits arriving while no note is open are dropped.
    ///
    /// # Panics
    ///
    /// Panics if storage is available and this is called outside of a tokio runtime
    pub fn update_content(&mut self, content: impl Into<String>) {
        if !self.cache.update(content) {
            tracing::warn!("edit ignored, no note is open");
            return;
        }
        if !self.persists() {
            return;
        }
        let Some(path) = self.cache.path() else {
            return;
        };
        let assets = &self.assets;
        self.coalescer
            .schedule(path, self.cache.content(), |markdown, note_path| {
                assets.to_storage(markdown, note_path)
            });
    }

    /// Write the cached content now, replacing any pending write.
    ///
    /// A write already started by the timer is awaited first so it cannot land
    /// after this one.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails
    pub async fn flush(&mut self) -> VaultResult<()> {
        self.coalescer.settle().await;
        if !self.persists() {
            return Ok(());
        }
        let Some(path) = self.cache.path() else {
            return Ok(());
        };
        let payload = self.assets.to_storage(self.cache.content(), path);
        self.storage.write(path, &payload).await?;
        tracing::debug!(path, "note flushed");
        Ok(())
    }

    /// Drop any pending write without persisting it
    pub fn cancel(&mut self) {
        self.coalescer.cancel();
    }

    /// Flush the open note, then open `path`.
    ///
    /// A failed flush does not block the switch: it is logged and returned in
    /// [`SwitchOutcome::flush_error`], and the outgoing edits stay unsaved.
    ///
    /// # Errors
    ///
    /// Returns an error if the incoming note cannot be opened
    pub async fn switch_note(&mut self, path: &str) -> VaultResult<SwitchOutcome> {
        let flush_error = match self.flush().await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(
                    from = self.cache.path().unwrap_or_default(),
                    to = path,
                    error = %e,
                    "switching notes despite failed flush"
                );
                Some(e)
            }
        };
        let content = self.open_note(path).await?;
        Ok(SwitchOutcome {
            content,
            flush_error,
        })
    }

    /// Flush and close the open note.
    ///
    /// # Errors
    ///
    /// Returns the flush error; the note then stays open so the caller can retry
    /// or [`discard`](Self::discard) it.
    pub async fn close(&mut self) -> VaultResult<()> {
        self.flush().await?;
        self.clear();
        Ok(())
    }

    /// Close the open note without writing pending edits
    pub fn discard(&mut self) {
        self.coalescer.cancel();
        self.clear();
    }

    /// Ask storage to show the open note in the file manager
    ///
    /// # Errors
    ///
    /// Returns an error if no note is open, storage is unavailable, or the reveal fails
    pub async fn reveal(&self) -> VaultResult<()> {
        let path = self.cache.path().ok_or(VaultError::NoActiveNote)?;
        if !self.persists() {
            return Err(StorageError::Unavailable.into());
        }
        self.storage.reveal(path).await?;
        Ok(())
    }

    #[must_use]
    pub fn active_path(&self) -> Option<&str> {
        self.cache.path()
    }

    /// Cached editor content of the open note
    #[must_use]
    pub fn content(&self) -> &str {
        self.cache.content()
    }

    #[must_use]
    pub const fn phase(&self) -> VaultPhase {
        match self.cache.state() {
            ActiveNote::Idle => VaultPhase::Idle,
            ActiveNote::Open { .. } => VaultPhase::Open,
        }
    }

    #[must_use]
    pub fn has_pending_write(&self) -> bool {
        self.coalescer.is_pending()
    }

    #[must_use]
    pub const fn config(&self) -> &VaultConfig {
        &self.config
    }

    #[must_use]
    pub fn is_storage_available(&self) -> bool {
        self.storage.is_available()
    }

    /// Whether the open note was loaded from storage and can be written back
    #[must_use]
    pub fn persists(&self) -> bool {
        !self.demo && self.storage.is_available()
    }

    fn clear(&mut self) {
        self.cache.clear();
        self.demo = false;
    }
}
