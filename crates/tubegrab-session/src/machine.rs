use std::time::Duration;

use tracing::debug;
use tubegrab_core::{
    ConversionFailure, ConversionOutcome, ConversionResult, DownloadRequest, MediaFormat, VideoId,
};

use crate::progress::ProgressSequence;

pub const INVALID_URL_NOTICE: &str = "Please enter a valid YouTube URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingConsent,
    Submitted,
    InProgress,
    Complete,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    pub fn is_busy(self) -> bool {
        matches!(self, Self::Submitted | Self::InProgress)
    }
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    SelectFormat(MediaFormat),
    SelectQuality(String),
    Submit(String),
    Decline,
    Accept,
    Begin,
    Tick(Duration),
    Resolved {
        attempt: u64,
        outcome: ConversionOutcome,
    },
    Reset,
}

#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    format: MediaFormat,
    quality: String,
    progress_total: Duration,
    attempt: u64,
    pending_url: Option<String>,
    request: Option<DownloadRequest>,
    video_id: Option<VideoId>,
    progress: Option<ProgressSequence>,
    held: Option<ConversionResult>,
    result: Option<ConversionResult>,
    failure: Option<ConversionFailure>,
    notice: Option<String>,
}

impl Session {
    pub fn new(progress_total: Duration) -> Self {
        let format = MediaFormat::Audio;
        Self {
            state: SessionState::Idle,
            format,
            quality: format.preferred_quality().to_string(),
            progress_total,
            attempt: 0,
            pending_url: None,
            request: None,
            video_id: None,
            progress: None,
            held: None,
            result: None,
            failure: None,
            notice: None,
        }
    }

    pub fn apply(self, event: SessionEvent) -> Self {
        let before = self.state;
        let next = match event {
            SessionEvent::SelectFormat(format) => self.select_format(format),
            SessionEvent::SelectQuality(quality) => self.select_quality(quality),
            SessionEvent::Submit(url) => self.submit(url),
            SessionEvent::Decline => self.decline(),
            SessionEvent::Accept => self.accept(),
            SessionEvent::Begin => self.begin(),
            SessionEvent::Tick(delta) => self.tick(delta),
            SessionEvent::Resolved { attempt, outcome } => self.resolve(attempt, outcome),
            SessionEvent::Reset => self.reset(),
        };
        if before != next.state {
            debug!(from = ?before, to = ?next.state, attempt = next.attempt, "session transition");
        }
        next
    }

    fn select_format(mut self, format: MediaFormat) -> Self {
        if self.state.is_busy() {
            return self;
        }
        self.format = format;
        if !format.supports_quality(&self.quality) {
            self.quality = format.preferred_quality().to_string();
        }
        self
    }

    fn select_quality(mut self, quality: String) -> Self {
        if self.state.is_busy() {
            return self;
        }
        if self.format.supports_quality(&quality) {
            self.quality = quality;
            self.notice = None;
        } else {
            self.notice = Some(format!(
                "{} is not available for {}",
                quality,
                self.format.as_str()
            ));
        }
        self
    }

    fn submit(self, url: String) -> Self {
        if self.state.is_busy() {
            return self;
        }
        let mut session = if self.state.is_terminal() {
            self.reset()
        } else {
            self
        };
        let url = url.trim().to_string();
        if url.is_empty() {
            return session;
        }
        if tubegrab_url::resolve(&url).is_none() {
            session.notice = Some(INVALID_URL_NOTICE.to_string());
            return session;
        }
        session.notice = None;
        session.pending_url = Some(url);
        session.state = SessionState::AwaitingConsent;
        session
    }

    fn decline(mut self) -> Self {
        if self.state != SessionState::AwaitingConsent {
            return self;
        }
        self.pending_url = None;
        self.state = SessionState::Idle;
        self
    }

    fn accept(mut self) -> Self {
        if self.state != SessionState::AwaitingConsent {
            return self;
        }
        let Some(url) = self.pending_url.take() else {
            self.state = SessionState::Idle;
            return self;
        };
        self.attempt += 1;
        self.video_id = tubegrab_url::resolve(&url);
        self.request = Some(DownloadRequest::new(url, self.format, self.quality.clone()));
        self.state = SessionState::Submitted;
        self
    }

    fn begin(mut self) -> Self {
        if self.state != SessionState::Submitted {
            return self;
        }
        self.progress = Some(ProgressSequence::new(self.progress_total));
        self.state = SessionState::InProgress;
        self.try_complete()
    }

    fn tick(mut self, delta: Duration) -> Self {
        if self.state != SessionState::InProgress {
            return self;
        }
        if let Some(progress) = self.progress.as_mut() {
            progress.advance(delta);
        }
        self.try_complete()
    }

    fn resolve(mut self, attempt: u64, outcome: ConversionOutcome) -> Self {
        if attempt != self.attempt || !self.state.is_busy() {
            debug!(attempt, current = self.attempt, "discarding stale resolution");
            return self;
        }
        match outcome {
            Ok(result) => {
                self.held = Some(result);
                self.try_complete()
            }
            Err(failure) => {
                self.progress = None;
                self.held = None;
                self.failure = Some(failure);
                self.state = SessionState::Failed;
                self
            }
        }
    }

    /// A held success is released only once the progress sequence is done.
    fn try_complete(mut self) -> Self {
        let finished = self
            .progress
            .as_ref()
            .is_some_and(ProgressSequence::is_finished);
        if self.state == SessionState::InProgress && finished && self.held.is_some() {
            self.result = self.held.take();
            self.state = SessionState::Complete;
        }
        self
    }

    fn reset(self) -> Self {
        Self {
            attempt: self.attempt + 1,
            format: self.format,
            quality: self.quality,
            ..Self::new(self.progress_total)
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn format(&self) -> MediaFormat {
        self.format
    }

    pub fn quality(&self) -> &str {
        &self.quality
    }

    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn pending_url(&self) -> Option<&str> {
        self.pending_url.as_deref()
    }

    pub fn request(&self) -> Option<&DownloadRequest> {
        self.request.as_ref()
    }

    pub fn video_id(&self) -> Option<&VideoId> {
        self.video_id.as_ref()
    }

    pub fn preview_thumbnail(&self) -> Option<String> {
        self.video_id.as_ref().map(tubegrab_url::thumbnail_url)
    }

    pub fn progress(&self) -> Option<&ProgressSequence> {
        self.progress.as_ref()
    }

    pub fn result(&self) -> Option<&ConversionResult> {
        self.result.as_ref()
    }

    pub fn download_url(&self) -> Option<&str> {
        self.result.as_ref().map(|result| result.download_url.as_str())
    }

    pub fn failure(&self) -> Option<&ConversionFailure> {
        self.failure.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        !self.state.is_busy()
    }
}
