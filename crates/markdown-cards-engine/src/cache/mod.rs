//! # Content Cache
//!
//! Per-session card content keyed by document path:
//!
//! - `text_previews`: path → excerpt (possibly empty)
//! - `images`: path → resolved resources, only written when non-empty
//! - `image_available`: path → whether any image resolved
//!
//! A path present in `image_available` has been checked and is never
//! recomputed, even when the answer was "no image". Entries are written once
//! per path; only [`ContentCache::invalidate`] and [`ContentCache::clear`]
//! (driven by whoever watches the files) remove them.

pub mod coordinator;

use std::collections::HashMap;

use parking_lot::RwLock;
use relative_path::{RelativePath, RelativePathBuf};

pub use coordinator::{Claim, LoadCoordinator};

#[derive(Debug, Default)]
pub struct ContentCache {
    text_previews: RwLock<HashMap<RelativePathBuf, String>>,
    images: RwLock<HashMap<RelativePathBuf, Vec<String>>>,
    image_available: RwLock<HashMap<RelativePathBuf, bool>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text_preview(&self, path: &RelativePath) -> Option<String> {
        self.text_previews.read().get(path).cloned()
    }

    pub fn has_text_preview(&self, path: &RelativePath) -> bool {
        self.text_previews.read().contains_key(path)
    }

    /// Resolved images, `None` when unchecked or when nothing resolved.
    pub fn images(&self, path: &RelativePath) -> Option<Vec<String>> {
        self.images.read().get(path).cloned()
    }

    /// `Some(false)` means checked with no result; `None` means never checked.
    pub fn image_available(&self, path: &RelativePath) -> Option<bool> {
        self.image_available.read().get(path).copied()
    }

    pub fn set_text_preview(&self, path: &RelativePath, text: String) {
        self.text_previews
            .write()
            .insert(path.to_relative_path_buf(), text);
    }

    /// Records the outcome of an image check. An empty set marks the path
    /// as checked without storing images.
    pub fn set_images(&self, path: &RelativePath, images: Vec<String>) {
        let path = path.to_relative_path_buf();
        let available = !images.is_empty();
        if available {
            self.images.write().insert(path.clone(), images);
        }
        self.image_available.write().insert(path, available);
    }

    /// Forgets everything cached for `path`.
    pub fn invalidate(&self, path: &RelativePath) {
        self.text_previews.write().remove(path);
        self.images.write().remove(path);
        self.image_available.write().remove(path);
    }

    pub fn clear(&self) {
        self.text_previews.write().clear();
        self.images.write().clear();
        self.image_available.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_image_set_marks_checked_without_images() {
        let cache = ContentCache::new();
        let path = RelativePath::new("a.md");
        assert_eq!(cache.image_available(path), None);

        cache.set_images(path, vec![]);
        assert_eq!(cache.image_available(path), Some(false));
        assert_eq!(cache.images(path), None);
    }

    #[test]
    fn stores_images_and_text() {
        let cache = ContentCache::new();
        let path = RelativePath::new("a.md");
        cache.set_images(path, vec!["x".into()]);
        cache.set_text_preview(path, "hello".into());

        assert_eq!(cache.image_available(path), Some(true));
        assert_eq!(cache.images(path), Some(vec!["x".to_string()]));
        assert_eq!(cache.text_preview(path).as_deref(), Some("hello"));
    }

    #[test]
    fn invalidate_and_clear() {
        let cache = ContentCache::new();
        let a = RelativePath::new("a.md");
        let b = RelativePath::new("b.md");
        cache.set_images(a, vec!["x".into()]);
        cache.set_text_preview(a, String::new());
        cache.set_text_preview(b, "b".into());

        cache.invalidate(a);
        assert_eq!(cache.image_available(a), None);
        assert!(!cache.has_text_preview(a));
        assert!(cache.has_text_preview(b));

        cache.clear();
        assert!(!cache.has_text_preview(b));
    }
}
