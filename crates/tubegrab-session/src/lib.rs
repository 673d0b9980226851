//! Client-side conversion session: consent gate, simulated progress and the
//! join with the real conversion result.

pub mod driver;
pub mod machine;
pub mod progress;
pub mod remote;

pub use driver::{ConversionBackend, run_attempt};
pub use machine::{INVALID_URL_NOTICE, Session, SessionEvent, SessionState};
pub use progress::{ProgressSequence, STAGES};
pub use remote::RemoteBackend;
