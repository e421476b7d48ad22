use std::{
    io::{BufWriter, Write},
    sync::Arc,
    time::Duration,
};

use notesync::{
    NoteStorage,
    config::{FsStorageConfig, VaultConfig},
    storage::fs::FsStorage,
    vault::Vault,
};

#[tokio::main]
async fn main() {
    let root = std::env::args().nth(1).map_or_else(
        || std::env::temp_dir().join("notesync-demo"),
        std::path::PathBuf::from,
    );
    let storage = Arc::new(FsStorage::new(FsStorageConfig::new(root)));
    let mut writer = BufWriter::new(std::io::stdout());

    storage
        .ensure_demo_data()
        .await
        .expect("Failed to seed demo data");

    let notebooks = storage.list_notebooks().await.expect("Failed to list notebooks");
    let Some(notebook) = notebooks.first() else {
        return;
    };
    let notes = storage
        .list_notes(&notebook.path)
        .await
        .expect("Failed to list notes");
    let Some(note) = notes.first() else {
        return;
    };

    let config = VaultConfig::default().with_debounce(Duration::from_millis(200));
    let mut vault = Vault::new(storage.clone(), config);

    let display = vault.open_note(&note.path).await.expect("Failed to open note");
    writeln!(&mut writer, "Notebook: {}", notebook.name).unwrap();
    writeln!(&mut writer, "Note: {}", note.name).unwrap();
    writeln!(&mut writer, "--- display form ---\n{display}").unwrap();

    for i in 1..=3 {
        vault.update_content(format!("{display}\nEdit #{i}"));
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    vault.close().await.expect("Failed to close note");

    let stored = storage
        .read(&note.path)
        .await
        .expect("Failed to read note back");
    writeln!(&mut writer, "--- storage form ---\n{stored}").unwrap();
}
