//! Static content used when no real storage is around, and the seed data
//! written on first launch.

use crate::models::{NoteEntry, Notebook};

/// Shown for every note while storage is unavailable.
pub const DEMO_NOTE: &str = "# Web Demo

Demo content shown without a storage backend.

- Notebook / Note lists on the left
- WYSIWYG markdown editing
- Images need a real storage backend
";

pub const DEMO_NOTEBOOK_NAME: &str = "Web Demo";
pub const DEMO_NOTEBOOK_PATH: &str = "/web/demo";
pub const DEMO_NOTE_NAME: &str = "Welcome";
pub const DEMO_NOTE_PATH: &str = "/web/demo/welcome";

/// Content of a freshly created note
pub const NEW_NOTE_TEMPLATE: &str = "# New note\n\nStart writing.";

pub const SAMPLE_NOTEBOOK_NAME: &str = "Sample Notebook";
pub const SAMPLE_NOTE_NAME: &str = "Welcome";
pub const SAMPLE_IMAGE_NAME: &str = "sample.png";

/// Seed note written by `FsStorage::ensure_demo_data`
pub const SAMPLE_NOTE: &str = r"# Welcome

- Notebook / Note / editor layout
- WYSIWYG markdown editing
- Images live in the note's images/ folder and are referenced by relative paths

```js
console.log('Hello');
```

![Sample image](images/sample.png)
";

/// 1x1 transparent PNG referenced by [`SAMPLE_NOTE`]
pub const SAMPLE_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0xd, 0xa, 0x1a, 0xa, 0x0, 0x0, 0x0, 0xd, 0x49, 0x48, 0x44, 0x52,
    0x0, 0x0, 0x0, 0x1, 0x0, 0x0, 0x0, 0x1, 0x8, 0x6, 0x0, 0x0, 0x0, 0x1f, 0x15, 0xc4, 0x89,
    0x0, 0x0, 0x0, 0x10, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0xfc, 0xff, 0x9f, 0xa1,
    0x1e, 0x0, 0x7, 0x82, 0x2, 0x7f, 0x3f, 0x83, 0x79, 0xcf, 0x0, 0x0, 0x0, 0x0, 0x49, 0x45,
    0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// Notebook and note listed in demo mode
#[must_use]
pub fn demo_catalog() -> (Notebook, NoteEntry) {
    (
        Notebook {
            name: DEMO_NOTEBOOK_NAME.to_string(),
            path: DEMO_NOTEBOOK_PATH.to_string(),
        },
        NoteEntry {
            name: DEMO_NOTE_NAME.to_string(),
            path: DEMO_NOTE_PATH.to_string(),
        },
    )
}
