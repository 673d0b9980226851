use std::sync::Arc;

use tracing::{error, info, warn};
use tubegrab_config::KeySource;
use tubegrab_core::{
    ConversionOutcome, ConversionRequest, ConversionResult, DownloadRequest, MediaFormat,
    TubeGrabError, TubeGrabResult,
};
use tubegrab_provider::ConversionProvider;

#[derive(Clone)]
pub struct Orchestrator {
    provider: Arc<dyn ConversionProvider>,
    keys: KeySource,
}

impl Orchestrator {
    pub fn new(provider: Arc<dyn ConversionProvider>, keys: KeySource) -> Self {
        Self { provider, keys }
    }

    pub async fn handle(&self, payload: DownloadRequest) -> ConversionOutcome {
        let outcome = match self.api_key() {
            Ok(api_key) => self.dispatch(&api_key, &payload).await,
            Err(err) => Err(err),
        };
        outcome.map_err(|err| report(&err))
    }

    pub async fn handle_body(&self, body: &[u8]) -> ConversionOutcome {
        let outcome = match self.api_key() {
            Ok(api_key) => match parse_payload(body) {
                Ok(payload) => self.dispatch(&api_key, &payload).await,
                Err(err) => Err(err),
            },
            Err(err) => Err(err),
        };
        outcome.map_err(|err| report(&err))
    }

    fn api_key(&self) -> TubeGrabResult<String> {
        self.keys.read().ok_or_else(|| {
            error!("provider credential not configured");
            TubeGrabError::Config("provider credential missing".to_string())
        })
    }

    async fn dispatch(
        &self,
        api_key: &str,
        payload: &DownloadRequest,
    ) -> TubeGrabResult<ConversionResult> {
        info!(
            video_url = %payload.video_url,
            format = %payload.format,
            quality = %payload.quality,
            "processing request"
        );
        let request = validate(payload)?;
        info!(video_id = %request.video_id(), "extracted video id");

        let result = self.provider.request(&request, api_key).await?;
        info!(title = %result.title, "conversion ready");
        Ok(result)
    }
}

fn parse_payload(body: &[u8]) -> TubeGrabResult<DownloadRequest> {
    serde_json::from_slice(body)
        .map_err(|err| TubeGrabError::Parse(format!("invalid request body: {err}")))
}

pub fn validate(payload: &DownloadRequest) -> TubeGrabResult<ConversionRequest> {
    let video_url = payload.video_url.trim();
    let video_id = tubegrab_url::resolve(video_url).ok_or_else(|| {
        TubeGrabError::InvalidInput(format!("unrecognized video url: {video_url}"))
    })?;
    let format: MediaFormat = payload.format.parse()?;
    let quality = format.check_quality(&payload.quality)?;
    Ok(ConversionRequest::new(video_url, video_id, format, quality))
}

fn report(err: &TubeGrabError) -> tubegrab_core::ConversionFailure {
    if err.is_validation() {
        warn!(error = %err, "rejected request");
    } else {
        error!(error = %err, "conversion failed");
    }
    err.to_failure()
}
