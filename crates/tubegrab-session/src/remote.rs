use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::warn;
use tubegrab_core::{
    ConversionFailure, ConversionOutcome, ConversionResult, DownloadRequest, ErrorBody,
    TubeGrabError, TubeGrabResult,
};

use crate::driver::ConversionBackend;

#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: Client,
    endpoint: String,
}

impl RemoteBackend {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> TubeGrabResult<Self> {
        let client = Client::builder()
            .user_agent("tubegrab/0.1")
            .timeout(timeout)
            .build()
            .map_err(|err| TubeGrabError::Config(format!("failed to build http client: {err}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ConversionBackend for RemoteBackend {
    async fn convert(&self, request: &DownloadRequest) -> ConversionOutcome {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                TubeGrabError::Network(format!("endpoint request failed: {err}")).to_failure()
            })?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        decode_response(status, &body)
    }
}

pub fn decode_response(status: u16, body: &str) -> ConversionOutcome {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let succeeded = parsed
        .as_ref()
        .and_then(|value| value.get("success"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if (200..300).contains(&status) && succeeded {
        if let Some(result) = parsed
            .clone()
            .and_then(|value| serde_json::from_value::<ConversionResult>(value).ok())
        {
            return Ok(result);
        }
    }

    let error_body = parsed
        .and_then(|value| serde_json::from_value::<ErrorBody>(value).ok())
        .unwrap_or_else(|| {
            warn!(status, "endpoint returned an unrecognized body");
            ErrorBody::new("Failed to get download URL").with_details(body.to_string())
        });
    let status = if (200..300).contains(&status) { 500 } else { status };
    Err(ConversionFailure::new(status, error_body))
}
