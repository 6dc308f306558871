//! URL validation and source-type detection.

use url::Url;

use crate::{ExtractError, SourceKind};

/// Validate a user-supplied URL: http(s) scheme and a host are required.
pub fn validate_url(raw: &str) -> Result<Url, ExtractError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ExtractError::InvalidUrl("please enter a URL".into()));
    }

    let parsed = Url::parse(raw).map_err(|_| {
        ExtractError::InvalidUrl("invalid URL format — must include http:// or https://".into())
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ExtractError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ExtractError::InvalidUrl("URL has no host".into()));
    }

    Ok(parsed)
}

/// Classify a URL as a YouTube video or a plain website.
pub fn detect_source_kind(raw: &str) -> SourceKind {
    if extract_video_id(raw).is_some() {
        SourceKind::Youtube
    } else {
        SourceKind::Website
    }
}

/// Pull a YouTube video id out of watch, short-link, or embed URL forms.
pub fn extract_video_id(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw.trim()).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    let candidate = match host {
        "youtube.com" | "m.youtube.com" => {
            let path = parsed.path();
            if path == "/watch" {
                parsed
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned())
            } else {
                path.strip_prefix("/embed/")
                    .map(|rest| rest.split('/').next().unwrap_or(rest).to_string())
            }
        }
        "youtu.be" => parsed
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }?;

    let valid = !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid.then_some(candidate)
}
