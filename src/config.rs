use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::demo::DEMO_NOTE;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
pub const DEFAULT_NOTE_FILE: &str = "note.md";
pub const DEFAULT_IMAGE_DIR: &str = "images";

/// Settings for [`crate::vault::Vault`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Quiet period after the last edit before the note is written
    pub debounce: Duration,
    /// Content served for every note while storage is unavailable
    pub demo_note: String,
}

impl VaultConfig {
    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    #[must_use]
    pub fn with_demo_note(mut self, demo_note: impl Into<String>) -> Self {
        self.demo_note = demo_note.into();
        self
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            demo_note: DEMO_NOTE.to_string(),
        }
    }
}

/// Layout of a [`crate::storage::fs::FsStorage`] tree
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FsStorageConfig {
    /// Directory holding one sub-directory per notebook
    pub root: PathBuf,
    /// Markdown file inside every note directory
    pub note_file: String,
    /// Image directory inside every note directory
    pub image_dir: String,
}

impl FsStorageConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            note_file: DEFAULT_NOTE_FILE.to_string(),
            image_dir: DEFAULT_IMAGE_DIR.to_string(),
        }
    }
}
