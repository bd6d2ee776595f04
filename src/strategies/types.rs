use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::traits::StrategyError;
use crate::extract::{DEFAULT_TITLE, is_absolute_url};
use crate::humanize::{UNKNOWN_SIZE, format_size};

/// Identifier of the strategy that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtractionMethod {
    #[serde(rename = "PrimaryAPI")]
    PrimaryApi,
    #[serde(rename = "BackupAPI")]
    BackupApi,
    #[serde(rename = "DirectScrape")]
    DirectScrape,
    #[serde(rename = "ProxyFetch")]
    ProxyFetch,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::PrimaryApi => "PrimaryAPI",
            ExtractionMethod::BackupApi => "BackupAPI",
            ExtractionMethod::DirectScrape => "DirectScrape",
            ExtractionMethod::ProxyFetch => "ProxyFetch",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized output of a successful strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub video_url: String,
    pub title: String,
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub method: ExtractionMethod,
}

impl ExtractionResult {
    /// Result with placeholder title and unknown size
    pub fn new(video_url: impl Into<String>, method: ExtractionMethod) -> Self {
        Self {
            video_url: video_url.into(),
            title: DEFAULT_TITLE.to_string(),
            size: UNKNOWN_SIZE.to_string(),
            thumbnail: None,
            method,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: Option<String>) -> Self {
        self.thumbnail = thumbnail;
        self
    }
}

/// Field names an extraction API uses for each part of its answer,
/// each list in priority order
#[derive(Debug, Clone, Copy)]
pub struct PayloadKeys {
    pub video_url: &'static [&'static str],
    pub title: &'static [&'static str],
    pub size: &'static [&'static str],
    pub thumbnail: &'static [&'static str],
}

/// Turns a JSON extraction-API body into an [`ExtractionResult`]
///
/// Fails with [`StrategyError::InvalidData`] when the body is not a JSON
/// object or carries no absolute direct URL under any of the accepted keys.
pub fn normalize_api_payload(
    body: &str,
    keys: &PayloadKeys,
    method: ExtractionMethod,
) -> Result<ExtractionResult, StrategyError> {
    let payload: Value = serde_json::from_str(body).map_err(|_| StrategyError::InvalidData)?;
    if !payload.is_object() {
        return Err(StrategyError::InvalidData);
    }

    let video_url = first_string(&payload, keys.video_url)
        .filter(|url| is_absolute_url(url))
        .ok_or(StrategyError::InvalidData)?;

    let title = first_string(&payload, keys.title).unwrap_or_else(|| DEFAULT_TITLE.to_string());

    Ok(ExtractionResult::new(video_url, method)
        .with_title(title)
        .with_size(first_size(&payload, keys.size))
        .with_thumbnail(first_string(&payload, keys.thumbnail)))
}

/// First non-empty string value among `keys`
fn first_string(payload: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| payload.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Human-readable size from the first usable value among `keys`
///
/// Numbers (and numeric strings) are byte counts; any other non-empty string
/// is assumed to be preformatted and passed through.
fn first_size(payload: &Value, keys: &[&str]) -> String {
    for key in keys {
        match payload.get(*key) {
            Some(Value::Number(n)) => {
                let bytes = n
                    .as_u64()
                    .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
                    .unwrap_or(0);
                return format_size(bytes);
            }
            Some(Value::String(s)) if !s.trim().is_empty() => {
                let s = s.trim();
                return match s.parse::<u64>() {
                    Ok(bytes) => format_size(bytes),
                    Err(_) => s.to_string(),
                };
            }
            _ => continue,
        }
    }
    UNKNOWN_SIZE.to_string()
}
