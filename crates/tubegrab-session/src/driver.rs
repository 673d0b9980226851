use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Instant, interval_at};
use tracing::info;
use tubegrab_core::{ConversionOutcome, DownloadRequest};

use crate::machine::{Session, SessionEvent, SessionState};

#[async_trait]
pub trait ConversionBackend: Send + Sync {
    async fn convert(&self, request: &DownloadRequest) -> ConversionOutcome;
}

/// Runs a `Submitted` session to `Complete` or `Failed`.
///
/// The progress ticker and the backend call start together and stay
/// independent; they only meet in the session's completion rule. `observe`
/// sees every intermediate session. Dropping the returned future abandons
/// both the ticker and the in-flight call.
pub async fn run_attempt<B, F>(
    session: Session,
    backend: &B,
    tick: Duration,
    mut observe: F,
) -> Session
where
    B: ConversionBackend + ?Sized,
    F: FnMut(&Session),
{
    if session.state() != SessionState::Submitted {
        return session;
    }
    let Some(request) = session.request().cloned() else {
        return session;
    };
    let attempt = session.attempt();
    info!(attempt, video_url = %request.video_url, "starting conversion");

    let mut session = session.apply(SessionEvent::Begin);
    observe(&session);

    let call = backend.convert(&request);
    tokio::pin!(call);
    let mut ticker = interval_at(Instant::now() + tick, tick);
    let mut pending = true;

    while session.state() == SessionState::InProgress {
        tokio::select! {
            biased;
            outcome = &mut call, if pending => {
                pending = false;
                session = session.apply(SessionEvent::Resolved { attempt, outcome });
            }
            _ = ticker.tick() => {
                session = session.apply(SessionEvent::Tick(tick));
            }
        }
        observe(&session);
    }

    info!(attempt, state = ?session.state(), "conversion finished");
    session
}
