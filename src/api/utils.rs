//! API utility functions
//!
//! Pure, stateless helpers for pulling the share link out of a request.
//! Kept out of services.rs so they can be unit tested without a router.

use axum::body::Body;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use url::form_urlencoded;

use super::models::ResolveRequest;
use crate::api::error::ApiError;

/// True for `application/x-www-form-urlencoded` (any parameters)
pub fn is_form_content_type(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .map(|media_type| media_type.essence_str() == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str())
        .unwrap_or(false)
}

/// Reads the request body, stopping as soon as it grows past `max_size`
pub async fn read_limited(body: Body, max_size: usize) -> Result<Vec<u8>, ApiError> {
    let collected = Limited::new(body, max_size).collect().await.map_err(|err| {
        if err.downcast_ref::<LengthLimitError>().is_some() {
            ApiError::PayloadTooLarge(max_size)
        } else {
            ApiError::Internal(err.to_string())
        }
    })?;

    Ok(collected.to_bytes().to_vec())
}

/// Picks the share link from, in order: JSON body `url`, form field `url`,
/// query parameter `url`
///
/// The body is tried as JSON whatever its Content-Type; a body that does not
/// parse simply contributes nothing. Blank values are skipped.
pub fn pick_link(body: &[u8], content_type: Option<&str>, query: Option<&str>) -> Option<String> {
    let from_json = || {
        serde_json::from_slice::<ResolveRequest>(body)
            .ok()
            .and_then(|request| request.url)
    };

    let from_form = || {
        content_type
            .filter(|ct| is_form_content_type(ct))
            .and_then(|_| field_value(body, "url"))
    };

    let from_query = || query.and_then(|q| field_value(q.as_bytes(), "url"));

    [from_json(), from_form(), from_query()]
        .into_iter()
        .flatten()
        .map(|link| link.trim().to_string())
        .find(|link| !link.is_empty())
}

fn field_value(encoded: &[u8], name: &str) -> Option<String> {
    form_urlencoded::parse(encoded)
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: Option<&str> = Some("application/x-www-form-urlencoded");

    #[test]
    fn test_form_content_type() {
        assert!(is_form_content_type("application/x-www-form-urlencoded"));
        assert!(is_form_content_type("application/x-www-form-urlencoded; charset=UTF-8"));
        assert!(!is_form_content_type("application/json"));
        assert!(!is_form_content_type("multipart/form-data; boundary=x"));
        assert!(!is_form_content_type("invalid"));
    }

    #[tokio::test]
    async fn test_read_limited() {
        let data = read_limited(Body::from(vec![7u8; 1000]), 1000).await.unwrap();
        assert_eq!(data.len(), 1000);

        assert!(matches!(
            read_limited(Body::from(vec![7u8; 1000]), 999).await,
            Err(ApiError::PayloadTooLarge(999))
        ));
    }

    #[test]
    fn test_pick_link_json_wins() {
        let body = br#"{"url": "https://terabox.com/s/json"}"#;
        let link = pick_link(body, Some("application/json"), Some("url=https%3A%2F%2Fterabox.com%2Fs%2Fq"));
        assert_eq!(link.as_deref(), Some("https://terabox.com/s/json"));
    }

    #[test]
    fn test_pick_link_json_without_content_type() {
        let body = br#"{"url": "https://terabox.com/s/raw"}"#;
        assert_eq!(
            pick_link(body, None, None).as_deref(),
            Some("https://terabox.com/s/raw")
        );
    }

    #[test]
    fn test_pick_link_form_before_query() {
        let body = b"url=https%3A%2F%2Fterabox.com%2Fs%2Fform&x=1";
        let link = pick_link(body, FORM, Some("url=https://terabox.com/s/query"));
        assert_eq!(link.as_deref(), Some("https://terabox.com/s/form"));
    }

    #[test]
    fn test_pick_link_form_ignored_without_form_content_type() {
        let body = b"url=https%3A%2F%2Fterabox.com%2Fs%2Fform";
        assert_eq!(pick_link(body, Some("text/plain"), None), None);
    }

    #[test]
    fn test_pick_link_query_fallback() {
        let link = pick_link(b"", None, Some("foo=bar&url=https%3A%2F%2Fterabox.com%2Fs%2Fq"));
        assert_eq!(link.as_deref(), Some("https://terabox.com/s/q"));
    }

    #[test]
    fn test_pick_link_blank_values_skipped() {
        let body = br#"{"url": "   "}"#;
        let link = pick_link(body, Some("application/json"), Some("url=https://terabox.com/s/q"));
        assert_eq!(link.as_deref(), Some("https://terabox.com/s/q"));

        assert_eq!(pick_link(br#"{"url": ""}"#, None, Some("url=")), None);
        assert_eq!(pick_link(b"{not json", None, None), None);
    }
}
