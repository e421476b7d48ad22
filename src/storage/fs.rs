//! Directory-per-note storage.
//!
//! ```text
//! <root>/
//!   <notebook>/
//!     <note>/
//!       note.md
//!       images/
//! ```
//!
//! Note and notebook paths handed out by this store are the absolute paths of
//! their directories, so they double as the base for relative image sources.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs, process::Command};

use crate::{
    config::FsStorageConfig,
    demo::{
        NEW_NOTE_TEMPLATE, SAMPLE_IMAGE_NAME, SAMPLE_NOTE, SAMPLE_NOTE_NAME, SAMPLE_NOTEBOOK_NAME,
        SAMPLE_PNG,
    },
    error::{StorageError, StorageResult},
    models::{NoteEntry, Notebook},
    storage::NoteStorage,
};

/// Filesystem-backed note storage and catalog
#[derive(Debug, Clone)]
pub struct FsStorage {
    config: FsStorageConfig,
}

impl FsStorage {
    #[must_use]
    pub const fn new(config: FsStorageConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    fn note_file(&self, note_path: &str) -> PathBuf {
        PathBuf::from(note_path).join(&self.config.note_file)
    }

    async fn ensure_root(&self) -> StorageResult<PathBuf> {
        let root = self.config.root.clone();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| StorageError::from_io(display(&root), &e))?;
        Ok(root)
    }

    /// Seed a sample notebook with one note and one image, keeping existing files
    ///
    /// # Errors
    ///
    /// Returns an error if the sample files cannot be written
    pub async fn ensure_demo_data(&self) -> StorageResult<()> {
        let root = self.ensure_root().await?;
        let note_dir = root.join(SAMPLE_NOTEBOOK_NAME).join(SAMPLE_NOTE_NAME);
        let image_dir = note_dir.join(&self.config.image_dir);
        fs::create_dir_all(&image_dir)
            .await
            .map_err(|e| StorageError::from_io(display(&image_dir), &e))?;

        write_if_missing(&note_dir.join(&self.config.note_file), SAMPLE_NOTE.as_bytes()).await?;
        write_if_missing(&image_dir.join(SAMPLE_IMAGE_NAME), SAMPLE_PNG).await?;
        tracing::debug!(root = %root.display(), "demo data ensured");
        Ok(())
    }

    /// List notebooks under the root, sorted by name
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be created or read
    pub async fn list_notebooks(&self) -> StorageResult<Vec<Notebook>> {
        let root = self.ensure_root().await?;
        let notebooks = list_dirs(&root)
            .await?
            .into_iter()
            .map(|(name, path)| Notebook { name, path })
            .collect();
        Ok(notebooks)
    }

    /// List notes inside a notebook, sorted by name
    ///
    /// # Errors
    ///
    /// Returns an error if the notebook cannot be read
    pub async fn list_notes(&self, notebook_path: &str) -> StorageResult<Vec<NoteEntry>> {
        let notes = list_dirs(Path::new(notebook_path))
            .await?
            .into_iter()
            .map(|(name, path)| NoteEntry { name, path })
            .collect();
        Ok(notes)
    }

    /// Create (or reuse) a notebook directory
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty after sanitizing or the directory cannot be created
    pub async fn create_notebook(&self, name: &str) -> StorageResult<Notebook> {
        let root = self.ensure_root().await?;
        let dir = root.join(sanitize_name(name)?);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::from_io(display(&dir), &e))?;
        let (name, path) = entry(&dir)?;
        Ok(Notebook { name, path })
    }

    /// Create (or reuse) a note directory, seeding its markdown file
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty after sanitizing or the files cannot be created
    pub async fn create_note(&self, notebook_path: &str, name: &str) -> StorageResult<NoteEntry> {
        let dir = Path::new(notebook_path).join(sanitize_name(name)?);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::from_io(display(&dir), &e))?;
        write_if_missing(&dir.join(&self.config.note_file), NEW_NOTE_TEMPLATE.as_bytes()).await?;
        let (name, path) = entry(&dir)?;
        Ok(NoteEntry { name, path })
    }

    /// Store an image next to a note and return its note-relative source
    ///
    /// Directory components in `file_name` are dropped. A missing name is
    /// replaced by a random one.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be written
    pub async fn save_image(
        &self,
        note_path: &str,
        file_name: &str,
        data: &[u8],
    ) -> StorageResult<String> {
        let dir = Path::new(note_path).join(&self.config.image_dir);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::from_io(display(&dir), &e))?;

        let safe_name = Path::new(&file_name.replace('\\', "/"))
            .file_name()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| format!("image-{}.png", uuid::Uuid::new_v4()));
        let target = dir.join(&safe_name);
        fs::write(&target, data)
            .await
            .map_err(|e| StorageError::from_io(display(&target), &e))?;

        Ok(format!("{}/{safe_name}", self.config.image_dir))
    }

    /// Remove a note directory with its images
    ///
    /// # Errors
    ///
    /// Returns an error if the directory does not exist or cannot be removed
    pub async fn delete_note(&self, note_path: &str) -> StorageResult<()> {
        fs::remove_dir_all(note_path)
            .await
            .map_err(|e| StorageError::from_io(note_path, &e))
    }

    /// Remove a notebook directory with all of its notes
    ///
    /// # Errors
    ///
    /// Returns an error if the directory does not exist or cannot be removed
    pub async fn delete_notebook(&self, notebook_path: &str) -> StorageResult<()> {
        fs::remove_dir_all(notebook_path)
            .await
            .map_err(|e| StorageError::from_io(notebook_path, &e))
    }

    /// Rename a notebook in place
    ///
    /// # Errors
    ///
    /// Returns an error if the target name is taken, invalid, or the rename fails
    pub async fn rename_notebook(
        &self,
        notebook_path: &str,
        name: &str,
    ) -> StorageResult<Notebook> {
        let (name, path) = rename_dir(notebook_path, name).await?;
        Ok(Notebook { name, path })
    }

    /// Rename a note in place
    ///
    /// # Errors
    ///
    /// Returns an error if the target name is taken, invalid, or the rename fails
    pub async fn rename_note(&self, note_path: &str, name: &str) -> StorageResult<NoteEntry> {
        let (name, path) = rename_dir(note_path, name).await?;
        Ok(NoteEntry { name, path })
    }
}

#[async_trait]
impl NoteStorage for FsStorage {
    async fn read(&self, path: &str) -> StorageResult<String> {
        let file = self.note_file(path);
        fs::read_to_string(&file)
            .await
            .map_err(|e| StorageError::from_io(path, &e))
    }

    async fn write(&self, path: &str, content: &str) -> StorageResult<()> {
        let file = self.note_file(path);
        fs::write(&file, content.as_bytes())
            .await
            .map_err(|e| StorageError::from_io(path, &e))
    }

    async fn reveal(&self, path: &str) -> StorageResult<()> {
        let target = PathBuf::from(path);
        let exists = fs::try_exists(&target)
            .await
            .map_err(|e| StorageError::from_io(path, &e))?;
        if !exists {
            return Err(StorageError::not_found(path));
        }
        reveal_command(&target)
            .spawn()
            .map(drop)
            .map_err(|e| StorageError::io(format!("failed to launch file manager: {e}")))
    }
}

/// Trim a user-supplied name and replace path separators
///
/// # Errors
///
/// Returns an error if nothing usable remains
pub fn sanitize_name(name: &str) -> StorageResult<String> {
    let sanitized = name.trim().replace(['/', '\\'], "_");
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        Err(StorageError::invalid_name(name))
    } else {
        Ok(sanitized)
    }
}

fn display(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn entry(path: &Path) -> StorageResult<(String, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| StorageError::invalid_name(display(path)))?
        .to_string_lossy()
        .to_string();
    Ok((name, display(path)))
}

async fn list_dirs(dir: &Path) -> StorageResult<Vec<(String, String)>> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| StorageError::from_io(display(dir), &e))?;
    let mut dirs = Vec::new();
    while let Some(item) = entries
        .next_entry()
        .await
        .map_err(|e| StorageError::from_io(display(dir), &e))?
    {
        let file_type = item
            .file_type()
            .await
            .map_err(|e| StorageError::from_io(display(&item.path()), &e))?;
        if file_type.is_dir() {
            dirs.push(entry(&item.path())?);
        }
    }
    dirs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(dirs)
}

async fn write_if_missing(path: &Path, data: &[u8]) -> StorageResult<()> {
    let exists = fs::try_exists(path)
        .await
        .map_err(|e| StorageError::from_io(display(path), &e))?;
    if !exists {
        fs::write(path, data)
            .await
            .map_err(|e| StorageError::from_io(display(path), &e))?;
    }
    Ok(())
}

async fn rename_dir(from: &str, name: &str) -> StorageResult<(String, String)> {
    let source = PathBuf::from(from);
    let parent = source
        .parent()
        .ok_or_else(|| StorageError::invalid_name(from))?;
    let target = parent.join(sanitize_name(name)?);
    if target == source {
        return entry(&source);
    }
    let taken = fs::try_exists(&target)
        .await
        .map_err(|e| StorageError::from_io(display(&target), &e))?;
    if taken {
        return Err(StorageError::already_exists(display(&target)));
    }
    fs::rename(&source, &target)
        .await
        .map_err(|e| StorageError::from_io(from, &e))?;
    entry(&target)
}

#[cfg(target_os = "macos")]
fn reveal_command(target: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg("-R").arg(target);
    command
}

#[cfg(target_os = "windows")]
fn reveal_command(target: &Path) -> Command {
    let mut command = Command::new("explorer");
    command.arg(format!("/select,{}", target.display()));
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn reveal_command(target: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(target.parent().unwrap_or(target));
    command
}
