pub mod cache;
pub mod embeds;
pub mod excerpt;
pub mod io;
pub mod loader;
pub mod models;
pub mod parsing;
pub mod resolve;
pub mod store;
pub mod thumbnails;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use cache::ContentCache;
pub use embeds::{EmbedCandidate, EmbedKind, EmbedOptions, extract};
pub use excerpt::FirstLinePolicy;
pub use io::*;
pub use loader::{ContentLoader, EmbedFallback, ImageSourceOptions, TextSourceOptions};
pub use models::Note;
pub use resolve::ResourceResolver;
pub use store::{DocumentStore, FsDocumentStore, MemoryDocumentStore, StoreError};
pub use thumbnails::{HttpImageProbe, ImageProbe, ThumbnailResolver};
