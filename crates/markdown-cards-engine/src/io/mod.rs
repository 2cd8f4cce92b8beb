use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid notes directory: {0}")]
    InvalidNotesDir(String),
}

/// Every file under the notes directory, sorted. Hidden entries are skipped.
pub fn scan_files(notes_root: &Path) -> Result<Vec<PathBuf>, IoError> {
    validate_notes_dir(notes_root)?;

    let mut files = Vec::new();
    scan_directory_recursive(notes_root, &mut files, &|_| true)?;
    files.sort();
    Ok(files)
}

/// Markdown files under the notes directory, sorted.
pub fn scan_markdown_files(notes_root: &Path) -> Result<Vec<PathBuf>, IoError> {
    validate_notes_dir(notes_root)?;

    let mut files = Vec::new();
    scan_directory_recursive(notes_root, &mut files, &|path| {
        path.extension().is_some_and(|ext| ext == "md")
    })?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(
    dir: &Path,
    files: &mut Vec<PathBuf>,
    keep: &dyn Fn(&Path) -> bool,
) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        if path.is_dir() {
            scan_directory_recursive(&path, files, keep)?;
        } else if keep(&path) {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_notes_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidNotesDir(format!(
            "notes directory not found: {}",
            path.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{create_test_file, create_test_notes_dir};

    #[test]
    fn test_scan_markdown_files() {
        // Given a notes directory with mixed file types
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "document.md", "# Markdown");
        create_test_file(&notes_dir, "image.png", "fake image data");
        create_test_file(&notes_dir, "config.json", "{}");

        // When scanning for markdown
        let files = scan_markdown_files(notes_dir.path()).unwrap();

        // Then only markdown is found
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name().unwrap(), "document.md");
    }

    #[test]
    fn test_scan_all_files_nested() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "root.md", "# Root file");
        create_test_file(&notes_dir, "attachments/cover.png", "png");

        let files = scan_files(notes_dir.path()).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|f| f.file_name().unwrap() == "root.md"));
        assert!(files.iter().any(|f| f.file_name().unwrap() == "cover.png"));
    }

    #[test]
    fn test_hidden_entries_skipped() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "visible.md", "x");
        create_test_file(&notes_dir, ".obsidian/workspace.md", "x");
        create_test_file(&notes_dir, ".draft.md", "x");

        let files = scan_files(notes_dir.path()).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name().unwrap(), "visible.md");
    }

    #[test]
    fn test_handle_invalid_notes_directory() {
        let nonexistent_path = PathBuf::from("/this/path/does/not/exist");

        let result = scan_markdown_files(&nonexistent_path);
        assert!(matches!(result, Err(IoError::InvalidNotesDir(_))));
        assert!(result.unwrap_err().to_string().contains("notes directory"));
    }

    #[test]
    fn test_validate_notes_dir_exists() {
        let notes_dir = create_test_notes_dir();
        assert!(validate_notes_dir(notes_dir.path()).is_ok());
    }
}
