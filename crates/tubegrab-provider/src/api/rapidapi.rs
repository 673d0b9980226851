use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};
use tubegrab_core::{
    ConversionRequest, ConversionResult, MediaFormat, TubeGrabError, TubeGrabResult,
};
use url::Url;

use crate::ConversionProvider;
use crate::normalize::normalize_reply;

const KEY_HEADER: &str = "x-rapidapi-key";
const HOST_HEADER: &str = "x-rapidapi-host";

#[derive(Debug, Clone)]
pub struct RapidApiClient {
    client: Client,
    base_url: String,
    host: String,
}

impl RapidApiClient {
    pub fn new(client: Client, base_url: &str) -> TubeGrabResult<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|err| TubeGrabError::Config(format!("invalid provider url: {err}")))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| TubeGrabError::Config("provider url has no host".to_string()))?
            .to_string();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            host,
        })
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> TubeGrabResult<Self> {
        let client = Client::builder()
            .user_agent("tubegrab/0.1")
            .timeout(timeout)
            .build()
            .map_err(|err| TubeGrabError::Config(format!("failed to build http client: {err}")))?;
        Self::new(client, base_url)
    }

    pub fn endpoint(&self, format: MediaFormat) -> String {
        format!("{}/download/{}", self.base_url, format.as_str())
    }

    pub async fn fetch(&self, request: &ConversionRequest, api_key: &str) -> TubeGrabResult<Value> {
        let endpoint = self.endpoint(request.format());
        info!(endpoint = %endpoint, video_id = %request.video_id(), "calling conversion provider");

        let response = self
            .client
            .get(&endpoint)
            .query(&[("url", request.source_url())])
            .header(KEY_HEADER, api_key)
            .header(HOST_HEADER, &self.host)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| TubeGrabError::Network(format!("provider request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "provider rejected request");
            return Err(TubeGrabError::ProviderStatus {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|err| TubeGrabError::Network(format!("provider body read failed: {err}")))?;
        debug!(body = %text, "provider response");
        serde_json::from_str(&text)
            .map_err(|err| TubeGrabError::Parse(format!("provider response parse failed: {err}")))
    }
}

#[async_trait]
impl ConversionProvider for RapidApiClient {
    async fn request(
        &self,
        request: &ConversionRequest,
        api_key: &str,
    ) -> TubeGrabResult<ConversionResult> {
        let data = self.fetch(request, api_key).await?;
        normalize_reply(request, data)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use tubegrab_core::VideoId;

    use super::*;

    fn request(format: MediaFormat, quality: Option<&str>) -> ConversionRequest {
        ConversionRequest::new(
            "https://youtu.be/abc123",
            VideoId::new("abc123"),
            format,
            quality.map(str::to_string),
        )
    }

    fn client(server: &mockito::Server) -> RapidApiClient {
        RapidApiClient::with_timeout(&server.url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_follows_format() {
        let client = RapidApiClient::new(Client::new(), "https://provider.example/").unwrap();
        assert_eq!(
            client.endpoint(MediaFormat::Audio),
            "https://provider.example/download/mp3"
        );
        assert_eq!(
            client.endpoint(MediaFormat::Video),
            "https://provider.example/download/mp4"
        );
    }

    #[test]
    fn test_rejects_unparseable_base_url() {
        assert!(matches!(
            RapidApiClient::new(Client::new(), "not a url"),
            Err(TubeGrabError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_forwards_source_url_and_credential() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/download/mp3")
            .match_query(Matcher::UrlEncoded(
                "url".into(),
                "https://youtu.be/abc123".into(),
            ))
            .match_header(KEY_HEADER, "secret")
            .match_header(HOST_HEADER, "127.0.0.1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"downloadUrl":"https://cdn.example/a.mp3","title":"Song"}"#)
            .expect(1)
            .create_async()
            .await;

        let result = client(&server)
            .request(&request(MediaFormat::Audio, Some("320")), "secret")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            result,
            ConversionResult::new("https://cdn.example/a.mp3", "Song", MediaFormat::Audio, "320")
        );
    }

    #[tokio::test]
    async fn test_video_requests_hit_video_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/download/mp4")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"link":"https://cdn.example/v.mp4"}"#)
            .create_async()
            .await;

        let result = client(&server)
            .request(&request(MediaFormat::Video, None), "secret")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.download_url, "https://cdn.example/v.mp4");
        assert_eq!(result.title, "YouTube Video");
        assert_eq!(result.quality, "720");
    }

    #[tokio::test]
    async fn test_non_success_status_is_a_transport_fault() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/download/mp3")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("rate limited")
            .expect(1)
            .create_async()
            .await;

        let result = client(&server)
            .request(&request(MediaFormat::Audio, None), "secret")
            .await;

        mock.assert_async().await;
        match result {
            Err(TubeGrabError::ProviderStatus { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "rate limited");
            }
            other => panic!("Expected ProviderStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_without_link_is_a_contract_fault() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/download/mp3")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status":"ok","title":"Song"}"#)
            .create_async()
            .await;

        let result = client(&server)
            .request(&request(MediaFormat::Audio, None), "secret")
            .await;

        match result {
            Err(TubeGrabError::MissingLink { data }) => assert_eq!(data["title"], "Song"),
            other => panic!("Expected MissingLink, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_parse_fault() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/download/mp3")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let result = client(&server)
            .request(&request(MediaFormat::Audio, None), "secret")
            .await;

        assert!(matches!(result, Err(TubeGrabError::Parse(_))));
    }
}
