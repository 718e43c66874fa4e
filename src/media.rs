//! Media references (`{url, alt}`) and their normalization

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A media reference as the API and the renderer use it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Media {
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

impl Media {
    pub fn new(url: &str, alt: &str) -> Self {
        Self {
            url: url.to_string(),
            alt: alt.to_string(),
        }
    }
}

/// Normalize a raw media value into a [`Media`].
///
/// Total over JSON: a non-empty string is taken as the URL, an object contributes
/// its `url`/`alt` strings, and anything else (null, numbers, empty strings,
/// objects without a usable `url`) falls back to `fallback_url` with an empty alt.
pub fn normalize_media(value: Option<&Value>, fallback_url: &str) -> Media {
    match value {
        Some(Value::String(url)) if !url.is_empty() => Media::new(url, ""),
        Some(Value::Object(map)) => {
            let url = map
                .get("url")
                .and_then(Value::as_str)
                .filter(|u| !u.is_empty())
                .unwrap_or(fallback_url);
            let alt = map.get("alt").and_then(Value::as_str).unwrap_or("");
            Media::new(url, alt)
        }
        _ => Media::new(fallback_url, ""),
    }
}

/// Deserialize a media list, dropping entries that carry no usable URL.
pub(crate) fn lenient_media_list<'de, D>(deserializer: D) -> Result<Vec<Media>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let items = match raw {
        Some(Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .iter()
        .map(|item| normalize_media(Some(item), ""))
        .filter(|media| !media.url.is_empty())
        .collect())
}
