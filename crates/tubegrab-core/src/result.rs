use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::MediaFormat;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub success: bool,
    pub download_url: String,
    pub title: String,
    pub format: MediaFormat,
    pub quality: String,
}

impl ConversionResult {
    pub fn new(
        download_url: impl Into<String>,
        title: impl Into<String>,
        format: MediaFormat,
        quality: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            download_url: download_url.into(),
            title: title.into(),
            format,
            quality: quality.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            data: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", .body.error)]
pub struct ConversionFailure {
    pub status: u16,
    pub body: ErrorBody,
}

impl ConversionFailure {
    pub fn new(status: u16, body: ErrorBody) -> Self {
        Self { status, body }
    }

    pub fn message(&self) -> &str {
        &self.body.error
    }
}

pub type ConversionOutcome = Result<ConversionResult, ConversionFailure>;
