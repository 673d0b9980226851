//! Extraction of video identifiers from the URL shapes the site hands out.

use std::sync::LazyLock;

use regex::Regex;
use tubegrab_core::VideoId;

const THUMBNAIL_BASE: &str = "https://img.youtube.com/vi";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlShape {
    Watch,
    ShortLink,
    Embed,
    Shorts,
}

impl UrlShape {
    pub const ALL: [UrlShape; 4] = [Self::Watch, Self::ShortLink, Self::Embed, Self::Shorts];

    fn pattern(self) -> &'static str {
        match self {
            Self::Watch => r"youtube\.com/watch\?v=([^&\n?#]+)",
            Self::ShortLink => r"youtu\.be/([^&\n?#]+)",
            Self::Embed => r"youtube\.com/embed/([^&\n?#]+)",
            Self::Shorts => r"youtube\.com/shorts/([^&\n?#]+)",
        }
    }
}

static SHAPES: LazyLock<Vec<(UrlShape, Regex)>> = LazyLock::new(|| {
    UrlShape::ALL
        .iter()
        .filter_map(|shape| Regex::new(shape.pattern()).ok().map(|regex| (*shape, regex)))
        .collect()
});

static VIDEO_URL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.be)/.+").ok()
});

pub fn resolve(raw: &str) -> Option<VideoId> {
    resolve_with_shape(raw).map(|(_, id)| id)
}

pub fn resolve_with_shape(raw: &str) -> Option<(UrlShape, VideoId)> {
    SHAPES.iter().find_map(|(shape, regex)| {
        let captures = regex.captures(raw)?;
        let id = captures.get(1)?.as_str();
        (!id.is_empty()).then(|| (*shape, VideoId::new(id)))
    })
}

pub fn looks_like_video_url(raw: &str) -> bool {
    VIDEO_URL
        .as_ref()
        .is_some_and(|regex| regex.is_match(raw.trim()))
}

pub fn thumbnail_url(id: &VideoId) -> String {
    format!("{THUMBNAIL_BASE}/{id}/maxresdefault.jpg")
}

pub fn fallback_thumbnail_url(id: &VideoId) -> String {
    format!("{THUMBNAIL_BASE}/{id}/hqdefault.jpg")
}
