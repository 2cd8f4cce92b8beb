//! # Card Content Loading
//!
//! [`ContentLoader`] fills a session's [`ContentCache`] with each card's
//! image set and text excerpt. Loads never fail from the caller's point of
//! view: read or probe errors are logged and cached as "nothing".
//!
//! Concurrent requests for the same path with the same options are coalesced
//! into one load; any difference in options makes them independent.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use relative_path::{RelativePath, RelativePathBuf};
use serde::{Deserialize, Serialize};

use crate::cache::{Claim, ContentCache, LoadCoordinator};
use crate::embeds::{EmbedOptions, WikiEmbed, extract};
use crate::excerpt::{self, DEFAULT_EXCERPT_LENGTH, FirstLinePolicy};
use crate::resolve::ResourceResolver;
use crate::store::{DocumentStore, StoreError};
use crate::thumbnails::{ImageProbe, ThumbnailResolver};

pub const DEFAULT_MAX_IMAGES: usize = 1;

/// When body embeds are used alongside property images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmbedFallback {
    /// Property images first, topped up from body embeds.
    #[default]
    Always,
    /// Body embeds only when no property image resolved.
    IfEmpty,
    /// Property images only; the body is never read.
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ImageSourceOptions {
    /// Raw values of the image property (paths, URLs or wikilinks).
    pub property_images: Vec<String>,
    pub fallback: EmbedFallback,
    pub embeds: EmbedOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextSourceOptions {
    /// Value of the text property; used verbatim when non-empty.
    pub property_text: Option<String>,
    /// Build an excerpt from the body when there is no property text.
    pub fallback_to_content: bool,
    pub omit_first_line: FirstLinePolicy,
    /// Card title, compared against the first line.
    pub title: String,
    pub max_chars: usize,
}

impl Default for TextSourceOptions {
    fn default() -> Self {
        Self {
            property_text: None,
            fallback_to_content: true,
            omit_first_line: FirstLinePolicy::default(),
            title: String::new(),
            max_chars: DEFAULT_EXCERPT_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ImageKey {
    path: RelativePathBuf,
    options: ImageSourceOptions,
    /// Limit in force when the request was made.
    max_images: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TextKey {
    path: RelativePathBuf,
    options: TextSourceOptions,
}

type MaxImages = Arc<dyn Fn() -> usize + Send + Sync>;

pub struct ContentLoader {
    store: Arc<dyn DocumentStore>,
    resolver: ResourceResolver,
    max_images: MaxImages,
    image_loads: LoadCoordinator<ImageKey, Vec<String>>,
    text_loads: LoadCoordinator<TextKey, String>,
}

impl ContentLoader {
    pub fn new(store: Arc<dyn DocumentStore>, probe: Arc<dyn ImageProbe>) -> Self {
        let resolver = ResourceResolver::new(Arc::clone(&store), ThumbnailResolver::new(probe));
        Self {
            store,
            resolver,
            max_images: Arc::new(|| DEFAULT_MAX_IMAGES),
            image_loads: LoadCoordinator::new(),
            text_loads: LoadCoordinator::new(),
        }
    }

    /// Source of the per-card image limit, consulted on every request.
    pub fn with_max_images(mut self, max_images: impl Fn() -> usize + Send + Sync + 'static) -> Self {
        self.max_images = Arc::new(max_images);
        self
    }

    pub fn with_thumbnail_timeout(mut self, timeout: Duration) -> Self {
        let store = Arc::clone(&self.store);
        self.resolver = ResourceResolver::new(store, self.resolver.thumbnails().clone().with_timeout(timeout));
        self
    }

    /// Ensures `cache` holds the image outcome for `path`.
    ///
    /// The load is claimed when this is called, so requests created
    /// together share one load even when each writes to its own cache.
    pub fn ensure_images_loaded(
        &self,
        path: &RelativePath,
        options: &ImageSourceOptions,
        cache: &ContentCache,
    ) -> impl Future<Output = ()> + Send {
        let load = cache.image_available(path).is_none().then(|| {
            let key = ImageKey {
                path: path.to_relative_path_buf(),
                options: options.clone(),
                max_images: (self.max_images)(),
            };
            let store = Arc::clone(&self.store);
            let resolver = self.resolver.clone();
            self.image_loads.run(key.clone(), move || async move {
                load_images(store.as_ref(), &resolver, &key)
                    .await
                    .unwrap_or_else(|e| {
                        log::warn!("Failed to load images for {}: {e}", key.path);
                        vec![]
                    })
            })
        });

        async move {
            let Some(load) = load else { return };
            let (images, claim) = load.await;
            if claim == Claim::Joined {
                log::debug!("Shared in-flight image load for {path}");
            }
            if cache.image_available(path).is_none() {
                cache.set_images(path, images);
            }
        }
    }

    /// Ensures `cache` holds the text excerpt for `path`. Claimed on call,
    /// like [`ContentLoader::ensure_images_loaded`].
    pub fn ensure_text_loaded(
        &self,
        path: &RelativePath,
        options: &TextSourceOptions,
        cache: &ContentCache,
    ) -> impl Future<Output = ()> + Send {
        let load = (!cache.has_text_preview(path)).then(|| {
            let key = TextKey {
                path: path.to_relative_path_buf(),
                options: options.clone(),
            };
            let store = Arc::clone(&self.store);
            self.text_loads.run(key.clone(), move || async move {
                load_text(store.as_ref(), &key.path, &key.options)
                    .await
                    .unwrap_or_else(|e| {
                        log::warn!("Failed to load text preview for {}: {e}", key.path);
                        String::new()
                    })
            })
        });

        async move {
            let Some(load) = load else { return };
            let (text, claim) = load.await;
            if claim == Claim::Joined {
                log::debug!("Shared in-flight text load for {path}");
            }
            if !cache.has_text_preview(path) {
                cache.set_text_preview(path, text);
            }
        }
    }
}

async fn load_images(
    store: &dyn DocumentStore,
    resolver: &ResourceResolver,
    key: &ImageKey,
) -> Result<Vec<String>, StoreError> {
    let ImageKey {
        path,
        options,
        max_images,
    } = key;

    let mut property_paths: Vec<String> = Vec::new();
    for value in &options.property_images {
        let raw = WikiEmbed::unwrap_link(value);
        if !raw.is_empty() && !property_paths.contains(&raw) {
            property_paths.push(raw);
        }
    }

    let mut images = resolver
        .resolve_paths(&property_paths, path, *max_images)
        .await;

    let wants_embeds = match options.fallback {
        EmbedFallback::Always => images.len() < *max_images,
        EmbedFallback::IfEmpty => images.is_empty() && *max_images > 0,
        EmbedFallback::Never => false,
    };
    if !wants_embeds {
        return Ok(images);
    }

    let body = store.read_body(path).await?;
    let remaining: Vec<String> = extract(&body, &options.embeds)
        .into_iter()
        .map(|c| c.raw_path)
        .filter(|raw| !property_paths.contains(raw))
        .collect();
    let embedded = resolver
        .resolve_paths(&remaining, path, max_images - images.len())
        .await;
    images.extend(embedded);
    Ok(images)
}

async fn load_text(
    store: &dyn DocumentStore,
    path: &RelativePath,
    options: &TextSourceOptions,
) -> Result<String, StoreError> {
    let property_text = options
        .property_text
        .as_deref()
        .map(excerpt::collapse_whitespace)
        .filter(|text| !text.is_empty());
    if let Some(text) = property_text {
        return Ok(excerpt::truncate(&text, options.max_chars));
    }
    if !options.fallback_to_content {
        return Ok(String::new());
    }

    let body = store.read_body(path).await?;
    Ok(excerpt::excerpt(
        &body,
        &options.title,
        options.omit_first_line,
        options.max_chars,
    ))
}
