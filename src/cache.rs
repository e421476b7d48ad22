//! In-memory content of the currently open note.

/// The single active slot. Opening a note replaces it, never merges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActiveNote {
    #[default]
    Idle,
    Open { path: String, content: String },
}

/// Holds the open note's path and editor content. Never performs I/O.
#[derive(Debug, Default)]
pub struct ContentCache {
    active: ActiveNote,
}

impl ContentCache {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            active: ActiveNote::Idle,
        }
    }

    /// Replace the active note unconditionally
    pub fn set(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.active = ActiveNote::Open {
            path: path.into(),
            content: content.into(),
        };
    }

    /// Replace the content of the active note.
    ///
    /// Returns `false` (and stores nothing) when no note is open.
    pub fn update(&mut self, markdown: impl Into<String>) -> bool {
        match &mut self.active {
            ActiveNote::Open { content, .. } => {
                *content = markdown.into();
                true
            }
            ActiveNote::Idle => false,
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match &self.active {
            ActiveNote::Open { path, .. } => Some(path),
            ActiveNote::Idle => None,
        }
    }

    /// Content of the active note, empty when idle
    #[must_use]
    pub fn content(&self) -> &str {
        match &self.active {
            ActiveNote::Open { content, .. } => content,
            ActiveNote::Idle => "",
        }
    }

    #[must_use]
    pub const fn state(&self) -> &ActiveNote {
        &self.active
    }

    pub fn clear(&mut self) {
        self.active = ActiveNote::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_active_note() {
        let mut cache = ContentCache::new();
        cache.set("/nb/n1", "first");
        cache.set("/nb/n2", "second");

        assert_eq!(cache.path(), Some("/nb/n2"));
        assert_eq!(cache.content(), "second");
    }

    #[test]
    fn test_update_keeps_path() {
        let mut cache = ContentCache::new();
        cache.set("/nb/n1", "first");

        assert!(cache.update("edited"));
        assert_eq!(
            cache.state(),
            &ActiveNote::Open {
                path: "/nb/n1".into(),
                content: "edited".into(),
            }
        );
    }

    #[test]
    fn test_update_when_idle_is_noop() {
        let mut cache = ContentCache::new();
        assert!(!cache.update("lost"));
        assert_eq!(cache.path(), None);
        assert_eq!(cache.content(), "");
    }

    #[test]
    fn test_clear() {
        let mut cache = ContentCache::new();
        cache.set("/nb/n1", "text");
        cache.clear();
        assert_eq!(cache.state(), &ActiveNote::Idle);
        assert_eq!(cache.content(), "");
    }
}
