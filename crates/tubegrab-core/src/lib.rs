mod error;
mod format;
mod request;
mod result;

pub use error::{
    INVALID_URL_MESSAGE, MISSING_KEY_MESSAGE, MISSING_LINK_MESSAGE, PROVIDER_FAILED_MESSAGE,
    TubeGrabError, TubeGrabResult,
};
pub use format::MediaFormat;
pub use request::{ConversionRequest, DownloadRequest, VideoId};
pub use result::{ConversionFailure, ConversionOutcome, ConversionResult, ErrorBody};
