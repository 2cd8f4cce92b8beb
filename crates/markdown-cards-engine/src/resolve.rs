//! Turns embed candidates into displayable resources.

use std::sync::Arc;

use relative_path::RelativePath;

use crate::embeds::{EmbedCandidate, is_external};
use crate::store::DocumentStore;
use crate::thumbnails::{ThumbnailResolver, is_video_url, video_id};

/// Raster and vector formats a card can display.
pub const IMAGE_EXTENSIONS: [&str; 8] = ["avif", "bmp", "gif", "jpeg", "jpg", "png", "svg", "webp"];

pub fn is_image_extension(extension: &str) -> bool {
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| ext.eq_ignore_ascii_case(extension))
}

#[derive(Clone)]
pub struct ResourceResolver {
    store: Arc<dyn DocumentStore>,
    thumbnails: ThumbnailResolver,
}

impl ResourceResolver {
    pub fn new(store: Arc<dyn DocumentStore>, thumbnails: ThumbnailResolver) -> Self {
        Self { store, thumbnails }
    }

    pub fn thumbnails(&self) -> &ThumbnailResolver {
        &self.thumbnails
    }

    /// Resolves candidates in order, stopping once `max_count` resources
    /// have been accepted.
    pub async fn resolve(
        &self,
        candidates: &[EmbedCandidate],
        source: &RelativePath,
        max_count: usize,
    ) -> Vec<String> {
        let raw_paths: Vec<String> = candidates.iter().map(|c| c.raw_path.clone()).collect();
        self.resolve_paths(&raw_paths, source, max_count).await
    }

    pub async fn resolve_paths(
        &self,
        raw_paths: &[String],
        source: &RelativePath,
        max_count: usize,
    ) -> Vec<String> {
        let mut resources = Vec::new();
        for raw in raw_paths {
            if resources.len() >= max_count {
                break;
            }
            if let Some(resource) = self.resolve_one(raw, source).await {
                resources.push(resource);
            }
        }
        resources
    }

    /// A single candidate. External URLs pass through untouched except
    /// links to video hosts, which become a thumbnail or nothing. Internal
    /// paths must resolve to an image file.
    pub async fn resolve_one(&self, raw: &str, source: &RelativePath) -> Option<String> {
        if is_external(raw) {
            if !is_video_url(raw) {
                return Some(raw.to_string());
            }
            let Some(id) = video_id(raw) else {
                log::debug!("Skipping video page without a video ID: {raw}");
                return None;
            };
            return self.thumbnails.resolve(&id).await;
        }

        let Some(target) = self.store.resolve_link(raw, source).await else {
            log::debug!("Unresolved embed {raw:?} in {source}");
            return None;
        };
        if !target.extension().is_some_and(is_image_extension) {
            log::debug!("Embed {raw:?} in {source} is not an image: {target}");
            return None;
        }
        Some(self.store.resource_handle(&target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeds::{EmbedOptions, extract};
    use crate::store::MemoryDocumentStore;
    use crate::thumbnails::{ImageDimensions, ImageProbe, ProbeError, thumbnail_url};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    /// Every thumbnail is a 120px placeholder except `good`'s hqdefault.
    struct OnlyGoodHq;

    #[async_trait]
    impl ImageProbe for OnlyGoodHq {
        async fn probe(&self, url: &str, _: Duration) -> Result<ImageDimensions, ProbeError> {
            let width = if url == thumbnail_url("good", "hqdefault") { 480 } else { 120 };
            Ok(ImageDimensions { width, height: 360 })
        }
    }

    fn resolver() -> ResourceResolver {
        let store = MemoryDocumentStore::from_files([
            ("note.md", ""),
            ("a.png", ""),
            ("b.JPG", ""),
            ("c.svg", ""),
            ("d.png", ""),
            ("e.png", ""),
            ("doc.pdf", ""),
        ]);
        ResourceResolver::new(Arc::new(store), ThumbnailResolver::new(Arc::new(OnlyGoodHq)))
    }

    async fn resolve(body: &str, max: usize) -> Vec<String> {
        let candidates = extract(body, &EmbedOptions::default());
        resolver()
            .resolve(&candidates, RelativePath::new("note.md"), max)
            .await
    }

    #[tokio::test]
    async fn internal_images_become_handles() {
        assert_eq!(
            resolve("![[a.png]] ![](b.JPG) ![[c.svg|50]]", 10).await,
            vec!["memory://a.png", "memory://b.JPG", "memory://c.svg"]
        );
    }

    #[tokio::test]
    async fn unresolved_and_non_image_targets_are_skipped() {
        assert_eq!(
            resolve("![[missing.png]] ![[doc.pdf]] ![[note]] ![[a.png]]", 10).await,
            vec!["memory://a.png"]
        );
    }

    #[tokio::test]
    async fn external_urls_pass_through_unchecked() {
        assert_eq!(
            resolve("![](https://x.test/nope.txt)", 10).await,
            vec!["https://x.test/nope.txt"]
        );
    }

    #[tokio::test]
    async fn video_links_become_thumbnails_or_nothing() {
        let body = "![](https://youtu.be/bad) ![](https://www.youtube.com/watch?v=good)";
        assert_eq!(
            resolve(body, 10).await,
            vec!["https://img.youtube.com/vi/good/hqdefault.jpg"]
        );
    }

    #[tokio::test]
    async fn video_pages_without_an_id_are_skipped() {
        let body = "![](https://www.youtube.com/channel/abc) ![](https://youtube.com/watch?v=not%20an%20id) ![[a.png]]";
        assert_eq!(resolve(body, 10).await, vec!["memory://a.png"]);
    }

    #[tokio::test]
    async fn cap_keeps_document_order() {
        let body = "![[a.png]] ![[missing.png]] ![[b.JPG]] ![[c.svg]] ![[d.png]] ![[e.png]]";
        assert_eq!(
            resolve(body, 2).await,
            vec!["memory://a.png", "memory://b.JPG"]
        );
    }

    #[tokio::test]
    async fn zero_cap_resolves_nothing() {
        assert!(resolve("![[a.png]]", 0).await.is_empty());
    }

    #[test]
    fn image_extensions() {
        assert!(is_image_extension("PNG"));
        assert!(is_image_extension("webp"));
        assert!(!is_image_extension("pdf"));
        assert!(!is_image_extension("md"));
    }
}
