//! # External Thumbnails
//!
//! Video-sharing links are never shown as images directly. The video ID is
//! parsed out of the link and a fixed list of thumbnail qualities is probed,
//! best first. The platform answers missing qualities with a small
//! placeholder image, so a candidate only counts when it is at least
//! [`MIN_THUMBNAIL_WIDTH`] pixels wide.

pub mod probe;

use std::sync::Arc;
use std::time::Duration;

use url::Url;

pub use probe::{HttpImageProbe, ImageDimensions, ImageProbe, ProbeError};

pub const MIN_THUMBNAIL_WIDTH: u32 = 320;
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Thumbnail qualities, highest resolution first.
pub const QUALITIES: [&str; 4] = ["maxresdefault", "sddefault", "hqdefault", "mqdefault"];

const SHORT_HOSTS: [&str; 1] = ["youtu.be"];
const CANONICAL_HOSTS: [&str; 6] = [
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtube-nocookie.com",
    "www.youtube-nocookie.com",
];
const ID_PATH_PREFIXES: [&str; 3] = ["embed", "shorts", "v"];

/// Whether `url` points at a video-sharing host, with or without a usable
/// video ID.
pub fn is_video_url(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|host| SHORT_HOSTS.contains(&host.as_str()) || CANONICAL_HOSTS.contains(&host.as_str()))
}

/// The video ID of a video-sharing URL, or `None` for anything else.
///
/// Accepts `youtu.be/<id>`, `?v=<id>` on canonical hosts, and the
/// `/embed/<id>`, `/shorts/<id>` and `/v/<id>` path forms.
pub fn video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());

    let id = if SHORT_HOSTS.contains(&host.as_str()) {
        segments.next().map(str::to_string)
    } else if CANONICAL_HOSTS.contains(&host.as_str()) {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .or_else(|| match segments.next() {
                Some(prefix) if ID_PATH_PREFIXES.contains(&prefix) => {
                    segments.next().map(str::to_string)
                }
                _ => None,
            })
    } else {
        None
    };

    id.filter(|id| is_valid_id(id))
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

pub fn thumbnail_url(video_id: &str, quality: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/{quality}.jpg")
}

/// Finds the best genuine thumbnail for a video.
#[derive(Clone)]
pub struct ThumbnailResolver {
    probe: Arc<dyn ImageProbe>,
    timeout: Duration,
}

impl ThumbnailResolver {
    pub fn new(probe: Arc<dyn ImageProbe>) -> Self {
        Self {
            probe,
            timeout: PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// First quality whose image loads and is wide enough. `None` is the
    /// normal answer for videos without a usable thumbnail.
    pub async fn resolve(&self, video_id: &str) -> Option<String> {
        for quality in QUALITIES {
            let url = thumbnail_url(video_id, quality);
            match self.probe.probe(&url, self.timeout).await {
                Ok(dims) if dims.width >= MIN_THUMBNAIL_WIDTH => return Some(url),
                Ok(dims) => log::debug!("Skipping {url}: {}px wide placeholder", dims.width),
                Err(e) => log::debug!("Skipping {url}: {e}"),
            }
        }
        None
    }
}
