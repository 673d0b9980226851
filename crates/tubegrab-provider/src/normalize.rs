use serde_json::Value;
use tubegrab_core::{ConversionRequest, ConversionResult, TubeGrabError, TubeGrabResult};

/// Field names the provider has been seen to put the download link under,
/// in preference order. Adding an alias is a change to this list only.
pub const LINK_FIELDS: &[&str] = &["downloadUrl", "dlink", "link", "url"];

pub const TITLE_FIELDS: &[&str] = &["title"];

pub fn first_non_empty<'a>(data: &'a Value, fields: &[&str]) -> Option<&'a str> {
    let map = data.as_object()?;
    fields
        .iter()
        .filter_map(|field| map.get(*field).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

pub fn normalize_reply(request: &ConversionRequest, data: Value) -> TubeGrabResult<ConversionResult> {
    let Some(download_url) = first_non_empty(&data, LINK_FIELDS) else {
        return Err(TubeGrabError::MissingLink { data });
    };
    let title = first_non_empty(&data, TITLE_FIELDS).unwrap_or_else(|| request.format().default_title());

    Ok(ConversionResult::new(
        download_url,
        title,
        request.format(),
        request.effective_quality(),
    ))
}
