use std::fmt;

use serde::{Deserialize, Serialize};

use crate::MediaFormat;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wire payload accepted at the boundary. Values are checked by the
/// orchestrator, not by serde.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub quality: String,
}

impl DownloadRequest {
    pub fn new(video_url: impl Into<String>, format: MediaFormat, quality: impl Into<String>) -> Self {
        Self {
            video_url: video_url.into(),
            format: format.as_str().to_string(),
            quality: quality.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    source_url: String,
    video_id: VideoId,
    format: MediaFormat,
    quality: Option<String>,
}

impl ConversionRequest {
    pub fn new(
        source_url: impl Into<String>,
        video_id: VideoId,
        format: MediaFormat,
        quality: Option<String>,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            video_id,
            format,
            quality,
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    pub fn format(&self) -> MediaFormat {
        self.format
    }

    pub fn quality(&self) -> Option<&str> {
        self.quality.as_deref()
    }

    pub fn effective_quality(&self) -> &str {
        self.quality
            .as_deref()
            .unwrap_or_else(|| self.format.default_quality())
    }
}
