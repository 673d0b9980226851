use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};

use crate::Orchestrator;

const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

pub fn router(orchestrator: Arc<Orchestrator>) -> Router {
    Router::new()
        .route("/", post(convert).options(preflight))
        .route("/youtube-download", post(convert).options(preflight))
        .with_state(orchestrator)
}

fn cors_headers() -> [(HeaderName, HeaderValue); 2] {
    [
        (
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ),
    ]
}

async fn preflight() -> Response {
    (StatusCode::OK, cors_headers()).into_response()
}

async fn convert(State(orchestrator): State<Arc<Orchestrator>>, body: Bytes) -> Response {
    match orchestrator.handle_body(&body).await {
        Ok(result) => (StatusCode::OK, cors_headers(), Json(result)).into_response(),
        Err(failure) => {
            let status =
                StatusCode::from_u16(failure.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, cors_headers(), Json(failure.body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use mockito::Matcher;
    use serde_json::{Value, json};
    use tokio::net::TcpListener;
    use tubegrab_config::KeySource;
    use tubegrab_provider::RapidApiClient;

    use super::*;

    async fn spawn(provider_url: &str, key: Option<&str>) -> SocketAddr {
        let provider =
            RapidApiClient::with_timeout(provider_url, std::time::Duration::from_secs(5)).unwrap();
        let orchestrator = Orchestrator::new(
            Arc::new(provider),
            KeySource::Fixed(key.map(str::to_string)),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(Arc::new(orchestrator)))
                .await
                .unwrap();
        });
        addr
    }

    fn assert_cors(response: &reqwest::Response) {
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(
            response.headers()["access-control-allow-headers"],
            ALLOWED_HEADERS
        );
    }

    #[tokio::test]
    async fn test_preflight_returns_only_cors_headers() {
        let server = mockito::Server::new_async().await;
        let addr = spawn(&server.url(), Some("secret")).await;

        let response = reqwest::Client::new()
            .request(reqwest::Method::OPTIONS, format!("http://{addr}/"))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_cors(&response);
        assert!(response.text().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_converts_through_the_provider() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/download/mp3")
            .match_query(Matcher::UrlEncoded(
                "url".into(),
                "https://youtu.be/abc123".into(),
            ))
            .with_status(200)
            .with_body(r#"{"downloadUrl":"https://cdn.example/a.mp3","title":"Song"}"#)
            .expect(1)
            .create_async()
            .await;
        let addr = spawn(&server.url(), Some("secret")).await;

        let response = reqwest::Client::new()
            .post(format!("http://{addr}/youtube-download"))
            .json(&json!({"videoUrl": "https://youtu.be/abc123", "format": "mp3", "quality": "320"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_cors(&response);
        let body: Value = response.json().await.unwrap();
        assert_eq!(
            body,
            json!({
                "success": true,
                "downloadUrl": "https://cdn.example/a.mp3",
                "title": "Song",
                "format": "mp3",
                "quality": "320"
            })
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_invalid_url_is_a_bad_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let addr = spawn(&server.url(), Some("secret")).await;

        let response = reqwest::Client::new()
            .post(format!("http://{addr}/"))
            .json(&json!({"videoUrl": "not-a-url", "format": "mp3", "quality": "320"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        assert_cors(&response);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"error": "Invalid YouTube URL"}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_provider_failure_keeps_its_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/download/mp4")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("rate limited")
            .create_async()
            .await;
        let addr = spawn(&server.url(), Some("secret")).await;

        let response = reqwest::Client::new()
            .post(format!("http://{addr}/"))
            .json(&json!({"videoUrl": "https://youtu.be/abc123", "format": "mp4", "quality": "720"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 503);
        assert_cors(&response);
        let body: Value = response.json().await.unwrap();
        assert_eq!(
            body,
            json!({"error": "Failed to process video", "details": "rate limited"})
        );
    }

    #[tokio::test]
    async fn test_missing_link_reports_raw_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/download/mp3")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status":"queued"}"#)
            .create_async()
            .await;
        let addr = spawn(&server.url(), Some("secret")).await;

        let response = reqwest::Client::new()
            .post(format!("http://{addr}/"))
            .json(&json!({"videoUrl": "https://youtu.be/abc123", "format": "mp3", "quality": ""}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        assert_cors(&response);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "No download URL returned");
        assert_eq!(body["data"], json!({"status": "queued"}));
    }

    #[tokio::test]
    async fn test_missing_credential_is_generic() {
        let server = mockito::Server::new_async().await;
        let addr = spawn(&server.url(), None).await;

        let response = reqwest::Client::new()
            .post(format!("http://{addr}/"))
            .json(&json!({"videoUrl": "https://youtu.be/abc123", "format": "mp3", "quality": "320"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        assert_cors(&response);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"error": "API key not configured"}));
    }
}
