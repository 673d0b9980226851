use std::sync::Arc;

use async_trait::async_trait;
use tubegrab_config::{
    KeySource, TubeGrabConfig, resolve_provider_timeout, resolve_provider_url,
};
use tubegrab_core::{ConversionOutcome, DownloadRequest, TubeGrabResult};
use tubegrab_provider::RapidApiClient;
use tubegrab_server::Orchestrator;
use tubegrab_session::ConversionBackend;

pub fn build_orchestrator(config: &TubeGrabConfig) -> TubeGrabResult<Orchestrator> {
    let provider = RapidApiClient::with_timeout(
        &resolve_provider_url(config),
        resolve_provider_timeout(config),
    )?;
    Ok(Orchestrator::new(
        Arc::new(provider),
        KeySource::from_config(config),
    ))
}

pub struct LocalBackend {
    orchestrator: Orchestrator,
}

impl LocalBackend {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }
}

#[async_trait]
impl ConversionBackend for LocalBackend {
    async fn convert(&self, request: &DownloadRequest) -> ConversionOutcome {
        self.orchestrator.handle(request.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tubegrab_core::{MISSING_KEY_MESSAGE, MediaFormat};

    use super::*;

    #[tokio::test]
    async fn test_local_backend_reports_missing_credential() {
        let provider =
            RapidApiClient::with_timeout("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let orchestrator = Orchestrator::new(Arc::new(provider), KeySource::Fixed(None));
        let backend = LocalBackend::new(orchestrator);
        let request = DownloadRequest::new("https://youtu.be/abc123", MediaFormat::Audio, "320");

        let failure = backend.convert(&request).await.unwrap_err();
        assert_eq!(failure.status, 500);
        assert_eq!(failure.message(), MISSING_KEY_MESSAGE);
    }

    #[test]
    fn test_builds_orchestrator_from_defaults() {
        assert!(build_orchestrator(&TubeGrabConfig::default()).is_ok());
    }
}
