//! # Embed Kinds
//!
//! Each embed syntax owns its pattern and the cleanup of what it captures.
//!
//! - **`WikiEmbed`**: `![[path]]`, `![[path|caption]]`, `![[path#fragment]]`
//! - **`ImageLink`**: `![caption](url "title")`
//! - **`CardLink`**: the `image:` field of a `cardlink` / `embed` fenced block

pub mod cardlink;
pub mod image_link;
pub mod wiki_embed;

pub use cardlink::CardLink;
pub use image_link::ImageLink;
pub use wiki_embed::WikiEmbed;
