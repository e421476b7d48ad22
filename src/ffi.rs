//! `UniFFI` bindings for the note vault
//!
//! This module exposes a filesystem-backed [`Vault`] to platform code
//! (iOS, Android, desktop shells). Every call blocks the calling thread on the
//! handle's own tokio runtime; debounced writes run on that runtime in the
//! background.
#![allow(clippy::missing_panics_doc)]

use std::{sync::Arc, time::Duration};

use tokio::{runtime::Runtime, sync::Mutex};

use crate::{
    assets::{AssetProtocol, MarkdownAssets},
    config::{FsStorageConfig, VaultConfig},
    demo::demo_catalog,
    error::VaultError,
    models::{NoteEntry, Notebook, VaultPhase},
    paths::with_trailing_slash,
    storage::{NoteStorage, fs::FsStorage},
    vault::Vault,
};

/// Outcome of [`VaultHandle::switch_note`] for FFI
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSwitchOutcome {
    pub content: String,
    /// Message of the flush failure for the outgoing note, if any
    pub flush_error: Option<String>,
}

/// One vault per running client
#[derive(uniffi::Object)]
pub struct VaultHandle {
    runtime: Runtime,
    storage: Arc<FsStorage>,
    vault: Mutex<Vault>,
}

#[uniffi::export]
impl VaultHandle {
    /// Create a vault storing notebooks under `root`
    ///
    /// # Errors
    ///
    /// Returns an error if the async runtime cannot be started
    #[uniffi::constructor]
    pub fn new(
        root: String,
        asset_prefix: String,
        debounce_ms: u64,
    ) -> Result<Arc<Self>, VaultError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .map_err(|e| VaultError::runtime(e.to_string()))?;
        let storage = Arc::new(FsStorage::new(FsStorageConfig::new(root)));
        let config = VaultConfig::default().with_debounce(Duration::from_millis(debounce_ms));
        let assets = MarkdownAssets::new(Arc::new(AssetProtocol::new(asset_prefix)));
        let vault = Vault::new(storage.clone(), config).with_assets(assets);

        Ok(Arc::new(Self {
            runtime,
            storage,
            vault: Mutex::new(vault),
        }))
    }

    /// Open a note, returning its display-form content
    ///
    /// # Errors
    ///
    /// Returns an error if the note cannot be read
    pub fn open_note(&self, path: String) -> Result<String, VaultError> {
        self.runtime
            .block_on(async { self.vault.lock().await.open_note(&path).await })
    }

    /// Cache the editor content and schedule a debounced write
    pub fn update_content(&self, content: String) {
        self.runtime
            .block_on(async { self.vault.lock().await.update_content(content) });
    }

    /// Write the open note now
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails
    pub fn flush(&self) -> Result<(), VaultError> {
        self.runtime
            .block_on(async { self.vault.lock().await.flush().await })
    }

    /// Drop the pending write without persisting it
    pub fn cancel(&self) {
        self.runtime
            .block_on(async { self.vault.lock().await.cancel() });
    }

    /// Flush the open note and open another one
    ///
    /// # Errors
    ///
    /// Returns an error if the incoming note cannot be opened
    pub fn switch_note(&self, path: String) -> Result<FfiSwitchOutcome, VaultError> {
        let outcome = self
            .runtime
            .block_on(async { self.vault.lock().await.switch_note(&path).await })?;
        Ok(FfiSwitchOutcome {
            content: outcome.content,
            flush_error: outcome.flush_error.map(|e| e.to_string()),
        })
    }

    /// Flush and close the open note; call before dropping the handle
    ///
    /// # Errors
    ///
    /// Returns an error if the final write fails
    pub fn close(&self) -> Result<(), VaultError> {
        self.runtime
            .block_on(async { self.vault.lock().await.close().await })
    }

    /// Close the open note without writing
    pub fn discard(&self) {
        self.runtime
            .block_on(async { self.vault.lock().await.discard() });
    }

    /// Reveal the open note in the file manager
    ///
    /// # Errors
    ///
    /// Returns an error if no note is open or the file manager cannot be launched
    pub fn reveal(&self) -> Result<(), VaultError> {
        self.runtime
            .block_on(async { self.vault.lock().await.reveal().await })
    }

    pub fn active_path(&self) -> Option<String> {
        self.runtime.block_on(async {
            self.vault
                .lock()
                .await
                .active_path()
                .map(str::to_string)
        })
    }

    pub fn phase(&self) -> VaultPhase {
        self.runtime
            .block_on(async { self.vault.lock().await.phase() })
    }

    /// Seed the sample notebook on first launch
    ///
    /// # Errors
    ///
    /// Returns an error if the sample files cannot be written
    pub fn ensure_demo_data(&self) -> Result<(), VaultError> {
        if !self.storage.is_available() {
            return Ok(());
        }
        Ok(self.runtime.block_on(self.storage.ensure_demo_data())?)
    }

    /// # Errors
    ///
    /// Returns an error if the notebook root cannot be read
    pub fn list_notebooks(&self) -> Result<Vec<Notebook>, VaultError> {
        if !self.storage.is_available() {
            return Ok(vec![demo_catalog().0]);
        }
        Ok(self.runtime.block_on(self.storage.list_notebooks())?)
    }

    /// # Errors
    ///
    /// Returns an error if the notebook cannot be read
    pub fn list_notes(&self, notebook_path: String) -> Result<Vec<NoteEntry>, VaultError> {
        if !self.storage.is_available() {
            return Ok(vec![demo_catalog().1]);
        }
        Ok(self
            .runtime
            .block_on(self.storage.list_notes(&notebook_path))?)
    }

    /// Create a notebook; without a name the next free `Notebook-N` is used
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created
    pub fn create_notebook(&self, name: Option<String>) -> Result<Notebook, VaultError> {
        self.runtime.block_on(async {
            let name = match name {
                Some(name) => name,
                None => format!(
                    "Notebook-{}",
                    self.storage.list_notebooks().await?.len() + 1
                ),
            };
            Ok(self.storage.create_notebook(&name).await?)
        })
    }

    /// Create a note; without a name the next free `Note-N` is used
    ///
    /// # Errors
    ///
    /// Returns an error if the note cannot be created
    pub fn create_note(
        &self,
        notebook_path: String,
        name: Option<String>,
    ) -> Result<NoteEntry, VaultError> {
        self.runtime.block_on(async {
            let name = match name {
                Some(name) => name,
                None => format!(
                    "Note-{}",
                    self.storage.list_notes(&notebook_path).await?.len() + 1
                ),
            };
            Ok(self.storage.create_note(&notebook_path, &name).await?)
        })
    }

    /// Store an image for the open note, returning its note-relative source
    ///
    /// # Errors
    ///
    /// Returns an error if no note is open or the image cannot be written
    pub fn save_image(&self, file_name: String, data: Vec<u8>) -> Result<String, VaultError> {
        self.runtime.block_on(async {
            let vault = self.vault.lock().await;
            let path = vault.active_path().ok_or(VaultError::NoActiveNote)?;
            let relative = self.storage.save_image(path, &file_name, &data).await?;
            Ok(relative)
        })
    }

    /// Delete a note, discarding it once removed when it is the open one
    ///
    /// # Errors
    ///
    /// Returns an error if the note cannot be removed; the open note and its
    /// unsaved edits are then kept
    pub fn delete_note(&self, note_path: String) -> Result<(), VaultError> {
        self.runtime.block_on(async {
            let mut vault = self.vault.lock().await;
            let open = vault.active_path() == Some(note_path.as_str());
            if open {
                vault.cancel();
            }
            self.storage.delete_note(&note_path).await?;
            if open {
                vault.discard();
            }
            Ok(())
        })
    }

    /// Delete a notebook, discarding the open note once removed when it lives inside
    ///
    /// # Errors
    ///
    /// Returns an error if the notebook cannot be removed; the open note and its
    /// unsaved edits are then kept
    pub fn delete_notebook(&self, notebook_path: String) -> Result<(), VaultError> {
        self.runtime.block_on(async {
            let mut vault = self.vault.lock().await;
            let inside = vault
                .active_path()
                .is_some_and(|active| is_inside(active, &notebook_path));
            if inside {
                vault.cancel();
            }
            self.storage.delete_notebook(&notebook_path).await?;
            if inside {
                vault.discard();
            }
            Ok(())
        })
    }

    /// Rename a notebook; the open note is flushed and closed when it lives inside
    ///
    /// # Errors
    ///
    /// Returns an error if the flush or the rename fails
    pub fn rename_notebook(
        &self,
        notebook_path: String,
        name: String,
    ) -> Result<Notebook, VaultError> {
        self.runtime.block_on(async {
            let mut vault = self.vault.lock().await;
            if vault
                .active_path()
                .is_some_and(|active| is_inside(active, &notebook_path))
            {
                vault.close().await?;
            }
            Ok(self.storage.rename_notebook(&notebook_path, &name).await?)
        })
    }

    /// Rename a note; when it is the open one it is flushed and reopened
    /// under the new path
    ///
    /// # Errors
    ///
    /// Returns an error if the flush, the rename or the reopen fails
    pub fn rename_note(&self, note_path: String, name: String) -> Result<NoteEntry, VaultError> {
        self.runtime.block_on(async {
            let mut vault = self.vault.lock().await;
            let was_open = vault.active_path() == Some(note_path.as_str());
            if was_open {
                vault.close().await?;
            }
            let entry = self.storage.rename_note(&note_path, &name).await?;
            if was_open {
                vault.open_note(&entry.path).await?;
            }
            Ok(entry)
        })
    }
}

fn is_inside(path: &str, dir: &str) -> bool {
    with_trailing_slash(path).starts_with(&with_trailing_slash(dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(dir: &tempfile::TempDir) -> Arc<VaultHandle> {
        let root = dir.path().join("notebooks").to_string_lossy().to_string();
        VaultHandle::new(root, "asset://localhost".into(), 50).unwrap()
    }

    #[test]
    fn test_is_inside() {
        assert!(is_inside("/root/nb/n1", "/root/nb"));
        assert!(is_inside("/root/nb", "/root/nb/"));
        assert!(!is_inside("/root/nb2/n1", "/root/nb"));
    }

    #[test]
    fn test_open_edit_close_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let handle = handle(&dir);
        handle.ensure_demo_data().unwrap();

        let notebook = handle.list_notebooks().unwrap().remove(0);
        let note = handle.list_notes(notebook.path).unwrap().remove(0);

        let content = handle.open_note(note.path.clone()).unwrap();
        assert!(content.contains("](asset://localhost/"));
        assert_eq!(handle.phase(), VaultPhase::Open);

        handle.update_content(format!("{content}\nmore"));
        handle.close().unwrap();
        assert_eq!(handle.phase(), VaultPhase::Idle);

        let stored =
            std::fs::read_to_string(std::path::Path::new(&note.path).join("note.md")).unwrap();
        assert!(stored.contains("![Sample image](images/sample.png)"));
        assert!(stored.ends_with("\nmore"));
    }

    #[test]
    fn test_create_with_default_names_and_switch() {
        let dir = tempfile::tempdir().unwrap();
        let handle = handle(&dir);

        let notebook = handle.create_notebook(None).unwrap();
        assert_eq!(notebook.name, "Notebook-1");
        let first = handle.create_note(notebook.path.clone(), None).unwrap();
        let second = handle.create_note(notebook.path.clone(), None).unwrap();
        assert_eq!(first.name, "Note-1");
        assert_eq!(second.name, "Note-2");

        handle.open_note(first.path.clone()).unwrap();
        handle.update_content("first".into());
        let outcome = handle.switch_note(second.path.clone()).unwrap();
        assert!(outcome.flush_error.is_none());
        assert_eq!(handle.active_path(), Some(second.path));

        let stored =
            std::fs::read_to_string(std::path::Path::new(&first.path).join("note.md")).unwrap();
        assert_eq!(stored, "first");
    }

    #[test]
    fn test_rename_open_note_reopens_it() {
        let dir = tempfile::tempdir().unwrap();
        let handle = handle(&dir);
        let notebook = handle.create_notebook(Some("nb".into())).unwrap();
        let note = handle.create_note(notebook.path, Some("old".into())).unwrap();

        handle.open_note(note.path.clone()).unwrap();
        handle.update_content("kept".into());
        let renamed = handle.rename_note(note.path, "new".into()).unwrap();

        assert_eq!(handle.active_path(), Some(renamed.path.clone()));
        assert_eq!(handle.open_note(renamed.path).unwrap(), "kept");
    }

    #[test]
    fn test_save_image_requires_open_note() {
        let dir = tempfile::tempdir().unwrap();
        let handle = handle(&dir);
        assert_eq!(
            handle.save_image("a.png".into(), vec![1, 2, 3]),
            Err(VaultError::NoActiveNote)
        );

        let notebook = handle.create_notebook(Some("nb".into())).unwrap();
        let note = handle.create_note(notebook.path, Some("n".into())).unwrap();
        handle.open_note(note.path).unwrap();
        assert_eq!(
            handle.save_image("a.png".into(), vec![1, 2, 3]).unwrap(),
            "images/a.png"
        );
    }

    #[test]
    fn test_delete_open_note_discards_it() {
        let dir = tempfile::tempdir().unwrap();
        let handle = handle(&dir);
        let notebook = handle.create_notebook(Some("nb".into())).unwrap();
        let note = handle.create_note(notebook.path.clone(), Some("n".into())).unwrap();

        handle.open_note(note.path.clone()).unwrap();
        handle.update_content("gone".into());
        handle.delete_note(note.path).unwrap();

        assert_eq!(handle.phase(), VaultPhase::Idle);
        assert!(handle.list_notes(notebook.path).unwrap().is_empty());
    }

    #[test]
    fn test_failed_delete_keeps_open_note_and_edits() {
        let dir = tempfile::tempdir().unwrap();
        let handle = handle(&dir);
        let notebook = handle.create_notebook(Some("nb".into())).unwrap();
        let note = handle.create_note(notebook.path.clone(), Some("n".into())).unwrap();

        handle.open_note(note.path.clone()).unwrap();
        handle.update_content("kept".into());
        std::fs::remove_dir_all(&notebook.path).unwrap();

        assert!(handle.delete_note(note.path.clone()).is_err());
        assert!(handle.delete_notebook(notebook.path).is_err());
        assert_eq!(handle.phase(), VaultPhase::Open);
        assert_eq!(handle.active_path(), Some(note.path));
    }
}
