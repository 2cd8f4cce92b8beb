use std::path::PathBuf;
use tempfile::TempDir;

pub fn create_test_notes_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Writes `content` to `relative` under the notes dir, creating folders.
pub fn create_test_file(notes_dir: &TempDir, relative: &str, content: &str) -> PathBuf {
    let path = notes_dir.path().join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}
