//! Client for the external conversion provider.

pub mod api {
    pub mod rapidapi;
}
pub mod normalize;

use async_trait::async_trait;
use tubegrab_core::{ConversionRequest, ConversionResult, TubeGrabResult};

pub use api::rapidapi::RapidApiClient;
pub use normalize::{LINK_FIELDS, first_non_empty, normalize_reply};

#[async_trait]
pub trait ConversionProvider: Send + Sync {
    async fn request(
        &self,
        request: &ConversionRequest,
        api_key: &str,
    ) -> TubeGrabResult<ConversionResult>;
}
