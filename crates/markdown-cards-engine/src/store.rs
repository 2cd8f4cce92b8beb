//! The document-store collaborator: body reads, link resolution and resource
//! handles for resolved files.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use relative_path::{RelativePath, RelativePathBuf};
use url::Url;

use crate::io::{self, IoError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(RelativePathBuf),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: RelativePathBuf,
        source: std::io::Error,
    },
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Full text of a document.
    async fn read_body(&self, path: &RelativePath) -> Result<String, StoreError>;

    /// Resolves a link as written in `from` to a file in the store.
    async fn resolve_link(&self, raw: &str, from: &RelativePath) -> Option<RelativePathBuf>;

    /// Renderer-consumable identifier for a resolved file.
    fn resource_handle(&self, target: &RelativePath) -> String;
}

/// Known files of a store and the lookup order for links:
///
/// 1. relative to the linking document's folder (skipped for `/`-rooted links)
/// 2. relative to the store root
/// 3. with `.md` appended, when the link has no extension
/// 4. the shortest known path ending in the link
#[derive(Debug, Clone, Default)]
pub struct LinkIndex {
    files: Vec<RelativePathBuf>,
    known: HashSet<RelativePathBuf>,
}

impl LinkIndex {
    pub fn new(files: impl IntoIterator<Item = RelativePathBuf>) -> Self {
        let mut files: Vec<_> = files.into_iter().map(|f| f.normalize()).collect();
        files.sort();
        files.dedup();
        let known = files.iter().cloned().collect();
        Self { files, known }
    }

    pub fn resolve(&self, raw: &str, from: &RelativePath) -> Option<RelativePathBuf> {
        let raw = raw.trim();
        let (rooted, link) = match raw.strip_prefix('/') {
            Some(link) => (true, link),
            None => (false, raw),
        };
        if link.is_empty() {
            return None;
        }

        let link = RelativePath::new(link).normalize();
        let mut exact = Vec::with_capacity(3);
        if !rooted {
            let from_dir = from.parent().unwrap_or_else(|| RelativePath::new(""));
            exact.push(from_dir.join_normalized(&link));
        }
        exact.push(link.clone());
        if link.extension().is_none() {
            exact.push(RelativePathBuf::from(format!("{link}.md")));
        }

        if let Some(hit) = exact.iter().find(|c| self.known.contains(*c)) {
            return Some(hit.clone());
        }

        let tails: Vec<String> = exact.iter().skip(usize::from(!rooted)).map(|c| format!("/{c}")).collect();
        self.files
            .iter()
            .filter(|f| tails.iter().any(|tail| f.as_str().ends_with(tail.as_str())))
            .min_by_key(|f| f.as_str().len())
            .cloned()
    }
}

/// Documents on disk under a notes root.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
    index: LinkIndex,
}

impl FsDocumentStore {
    /// Indexes every file under `root`.
    pub fn open(root: &Path) -> Result<Self, IoError> {
        io::validate_notes_dir(root)?;
        let root = root.canonicalize()?;
        let files = io::scan_files(&root)?
            .into_iter()
            .filter_map(|path| {
                let relative = path.strip_prefix(&root).ok()?;
                RelativePathBuf::from_path(relative).ok()
            });

        Ok(Self {
            index: LinkIndex::new(files),
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn read_body(&self, path: &RelativePath) -> Result<String, StoreError> {
        let absolute = path.to_path(&self.root);
        tokio::fs::read_to_string(&absolute)
            .await
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::NotFound => StoreError::NotFound(path.to_relative_path_buf()),
                _ => StoreError::Io {
                    path: path.to_relative_path_buf(),
                    source,
                },
            })
    }

    async fn resolve_link(&self, raw: &str, from: &RelativePath) -> Option<RelativePathBuf> {
        self.index.resolve(raw, from)
    }

    fn resource_handle(&self, target: &RelativePath) -> String {
        let absolute = target.to_path(&self.root);
        Url::from_file_path(&absolute)
            .map(String::from)
            .unwrap_or_else(|()| absolute.display().to_string())
    }
}

/// Documents held in memory, for embedding callers and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    bodies: HashMap<RelativePathBuf, String>,
    index: LinkIndex,
}

impl MemoryDocumentStore {
    pub const SCHEME: &'static str = "memory";

    pub fn from_files<P, B>(files: impl IntoIterator<Item = (P, B)>) -> Self
    where
        P: AsRef<str>,
        B: Into<String>,
    {
        let bodies: HashMap<_, _> = files
            .into_iter()
            .map(|(path, body)| (RelativePath::new(path.as_ref()).normalize(), body.into()))
            .collect();
        Self {
            index: LinkIndex::new(bodies.keys().cloned()),
            bodies,
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn read_body(&self, path: &RelativePath) -> Result<String, StoreError> {
        self.bodies
            .get(&path.normalize())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(path.to_relative_path_buf()))
    }

    async fn resolve_link(&self, raw: &str, from: &RelativePath) -> Option<RelativePathBuf> {
        self.index.resolve(raw, from)
    }

    fn resource_handle(&self, target: &RelativePath) -> String {
        format!("{}://{target}", Self::SCHEME)
    }
}
