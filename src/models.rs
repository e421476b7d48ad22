use serde::{Deserialize, Serialize};

/// A notebook directory as listed by the catalog
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, uniffi::Record)]
pub struct Notebook {
    pub name: String,
    pub path: String,
}

/// A note as listed inside a notebook
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, uniffi::Record)]
pub struct NoteEntry {
    pub name: String,
    pub path: String,
}

/// Where the coordinator currently stands
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, uniffi::Enum)]
pub enum VaultPhase {
    /// No note open
    Idle,
    /// A note is loaded and edits may be pending
    Open,
}
