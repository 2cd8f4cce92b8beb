use relative_path::{RelativePath, RelativePathBuf};

/// A note shown as a card: its store path and the title derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Note {
    path: RelativePathBuf,
    title: String,
}

impl Note {
    pub fn new(path: RelativePathBuf) -> Self {
        let title = Self::title_from_path(&path);
        Self { path, title }
    }

    pub fn path(&self) -> &RelativePath {
        &self.path
    }

    /// File stem of the note, compared against its first line when excerpting.
    pub fn title(&self) -> &str {
        &self.title
    }

    fn title_from_path(path: &RelativePath) -> String {
        path.file_name()
            .map(|name| name.strip_suffix(".md").unwrap_or(name))
            .unwrap_or("Untitled")
            .to_string()
    }
}

impl From<RelativePathBuf> for Note {
    fn from(path: RelativePathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for Note {
    fn from(path: &str) -> Self {
        Self::new(RelativePathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_file_stem() {
        let note = Note::from("journal/2024-01-01.md");
        assert_eq!(note.title(), "2024-01-01");
        assert_eq!(note.path(), RelativePath::new("journal/2024-01-01.md"));
    }

    #[test]
    fn non_markdown_names_are_kept_whole() {
        assert_eq!(Note::from("notes/readme.txt").title(), "readme.txt");
    }

    #[test]
    fn empty_path_is_untitled() {
        assert_eq!(Note::from("").title(), "Untitled");
    }
}
