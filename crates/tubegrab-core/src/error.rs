use serde_json::Value;
use thiserror::Error;

use crate::result::{ConversionFailure, ErrorBody};

pub const INVALID_URL_MESSAGE: &str = "Invalid YouTube URL";
pub const MISSING_KEY_MESSAGE: &str = "API key not configured";
pub const PROVIDER_FAILED_MESSAGE: &str = "Failed to process video";
pub const MISSING_LINK_MESSAGE: &str = "No download URL returned";

#[derive(Debug, Error)]
pub enum TubeGrabError {
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("provider error: status={status} body={body}")]
    ProviderStatus { status: u16, body: String },
    #[error("provider returned no download link")]
    MissingLink { data: Value },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("conversion failed: {}", .0.message())]
    Conversion(ConversionFailure),
}

pub type TubeGrabResult<T> = Result<T, TubeGrabError>;

impl TubeGrabError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnsupportedInput(_) | Self::InvalidInput(_) => 400,
            Self::ProviderStatus { status, .. } => *status,
            Self::Conversion(failure) => failure.status,
            Self::Config(_) | Self::Network(_) | Self::MissingLink { .. } | Self::Parse(_) => 500,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::UnsupportedInput(_) | Self::InvalidInput(_))
    }

    pub fn to_failure(&self) -> ConversionFailure {
        let body = match self {
            Self::InvalidInput(_) => ErrorBody::new(INVALID_URL_MESSAGE),
            Self::UnsupportedInput(message) => ErrorBody::new(message.clone()),
            Self::Config(_) => ErrorBody::new(MISSING_KEY_MESSAGE),
            Self::ProviderStatus { body, .. } => {
                ErrorBody::new(PROVIDER_FAILED_MESSAGE).with_details(body.clone())
            }
            Self::MissingLink { data } => ErrorBody::new(MISSING_LINK_MESSAGE).with_data(data.clone()),
            Self::Network(message) | Self::Parse(message) => ErrorBody::new(message.clone()),
            Self::Conversion(failure) => failure.body.clone(),
        };
        ConversionFailure::new(self.status_code(), body)
    }
}
