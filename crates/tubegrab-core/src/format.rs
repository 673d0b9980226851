use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{TubeGrabError, TubeGrabResult};

const AUDIO_QUALITIES: [&str; 4] = ["320", "256", "192", "128"];
const VIDEO_QUALITIES: [&str; 4] = ["1080", "720", "480", "360"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaFormat {
    #[serde(rename = "mp3")]
    Audio,
    #[serde(rename = "mp4")]
    Video,
}

impl MediaFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Audio => "mp3",
            Self::Video => "mp4",
        }
    }

    pub fn qualities(self) -> &'static [&'static str] {
        match self {
            Self::Audio => &AUDIO_QUALITIES,
            Self::Video => &VIDEO_QUALITIES,
        }
    }

    pub fn default_quality(self) -> &'static str {
        match self {
            Self::Audio => "128",
            Self::Video => "720",
        }
    }

    pub fn preferred_quality(self) -> &'static str {
        self.qualities()[0]
    }

    pub fn default_title(self) -> &'static str {
        match self {
            Self::Audio => "YouTube Audio",
            Self::Video => "YouTube Video",
        }
    }

    pub fn supports_quality(self, quality: &str) -> bool {
        self.qualities().contains(&quality)
    }

    pub fn quality_label(self, quality: &str) -> String {
        match self {
            Self::Audio => format!("{quality} kbps"),
            Self::Video => format!("{quality}p"),
        }
    }

    pub fn check_quality(self, quality: &str) -> TubeGrabResult<Option<String>> {
        let quality = quality.trim();
        if quality.is_empty() {
            return Ok(None);
        }
        if !self.supports_quality(quality) {
            return Err(TubeGrabError::UnsupportedInput(format!(
                "Unsupported quality '{quality}' for {}",
                self.as_str()
            )));
        }
        Ok(Some(quality.to_string()))
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaFormat {
    type Err = TubeGrabError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "mp3" => Ok(Self::Audio),
            "mp4" => Ok(Self::Video),
            other => Err(TubeGrabError::UnsupportedInput(format!(
                "Unsupported format '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MediaFormat;

    #[test]
    fn test_parses_wire_names() {
        assert_eq!("mp3".parse::<MediaFormat>().unwrap(), MediaFormat::Audio);
        assert_eq!(" MP4 ".parse::<MediaFormat>().unwrap(), MediaFormat::Video);
        assert!("flac".parse::<MediaFormat>().is_err());
    }

    #[test]
    fn test_quality_sets_are_per_format() {
        assert!(MediaFormat::Audio.supports_quality("320"));
        assert!(!MediaFormat::Audio.supports_quality("1080"));
        assert!(MediaFormat::Video.supports_quality("360"));
        assert!(!MediaFormat::Video.supports_quality("128"));
    }

    #[test]
    fn test_blank_quality_is_unspecified() {
        assert_eq!(MediaFormat::Video.check_quality("  ").unwrap(), None);
        assert_eq!(
            MediaFormat::Video.check_quality("480").unwrap(),
            Some("480".to_string())
        );
        assert!(MediaFormat::Audio.check_quality("999").is_err());
    }

    #[test]
    fn test_serializes_as_extension() {
        assert_eq!(
            serde_json::to_string(&MediaFormat::Audio).unwrap(),
            "\"mp3\""
        );
        assert_eq!(MediaFormat::Video.quality_label("720"), "720p");
        assert_eq!(MediaFormat::Audio.preferred_quality(), "320");
    }
}
