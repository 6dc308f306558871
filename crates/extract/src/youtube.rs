//! YouTube transcript extraction via the public caption track endpoint.
//!
//! The watch page embeds caption track metadata as JSON; the track URL
//! serves timed caption XML. Both are parsed with plain string scanning —
//! no headless browser, no API key.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use gist_core::config::ExtractConfig;

use crate::{ExtractError, ExtractedContent, SourceKind};

/// One caption line with its timing, in seconds.
#[derive(Debug, Clone)]
pub struct CaptionLine {
    pub start: f64,
    pub duration: f64,
    pub text: String,
}

/// A transcript span covering roughly five minutes of video.
#[derive(Debug, Clone)]
pub struct TimedSection {
    pub start: f64,
    pub duration: f64,
    pub text: String,
}

/// Window size for timestamped sections, in seconds.
const SECTION_WINDOW_SECS: f64 = 300.0;

pub struct YoutubeExtractor {
    client: reqwest::Client,
}

impl YoutubeExtractor {
    pub fn new(config: &ExtractConfig) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch the transcript for `video_id` and join it into plain text.
    pub async fn extract(&self, video_id: &str) -> Result<ExtractedContent, ExtractError> {
        let lines = self.caption_lines(video_id).await?;
        let content = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if content.trim().is_empty() {
            return Err(ExtractError::NoTranscript);
        }

        Ok(ExtractedContent {
            kind: SourceKind::Youtube,
            title: Some(format!("YouTube Video: {video_id}")),
            content,
        })
    }

    /// Fetch timed caption lines for `video_id`.
    pub async fn caption_lines(&self, video_id: &str) -> Result<Vec<CaptionLine>, ExtractError> {
        let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
        debug!(video_id, "fetching watch page");
        let page = self.fetch(&watch_url).await?;

        let tracks = caption_tracks(&page)?;
        let track_url = first_track_url(&tracks).ok_or(ExtractError::NoTranscript)?;

        debug!(video_id, "fetching caption track");
        let xml = self.fetch(&track_url).await?;
        let lines = parse_timedtext(&xml);
        if lines.is_empty() {
            return Err(ExtractError::NoTranscript);
        }
        Ok(lines)
    }

    async fn fetch(&self, url: &str) -> Result<String, ExtractError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(ExtractError::Status(status));
        }
        Ok(response.text().await?)
    }
}

/// Locate the `"captionTracks": [...]` array embedded in the watch page.
/// Absence of the key means captions are disabled for the video.
fn caption_tracks(page: &str) -> Result<Vec<Value>, ExtractError> {
    let key = "\"captionTracks\":";
    let start = page
        .find(key)
        .ok_or(ExtractError::TranscriptsDisabled)?
        + key.len();
    let rest = &page[start..];
    let open = rest.find('[').ok_or(ExtractError::TranscriptsDisabled)?;

    // Balanced-bracket scan; track URLs contain no brackets but stay robust
    // against nested arrays anyway.
    let bytes = rest.as_bytes();
    let mut depth = 0usize;
    let mut end = None;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if escaped {
            escaped = false;
            continue;
        }
        if in_string {
            match b {
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }

    let end = end.ok_or(ExtractError::TranscriptsDisabled)?;
    let tracks: Vec<Value> =
        serde_json::from_str(&rest[open..=end]).map_err(|_| ExtractError::TranscriptsDisabled)?;
    if tracks.is_empty() {
        return Err(ExtractError::NoTranscript);
    }
    Ok(tracks)
}

/// Base URL of the first caption track, with JSON-escaped ampersands fixed.
fn first_track_url(tracks: &[Value]) -> Option<String> {
    tracks
        .first()
        .and_then(|t| t["baseUrl"].as_str())
        .map(|u| u.replace("\\u0026", "&"))
}

/// Parse timedtext XML: `<text start="1.23" dur="4.56">line</text>`.
fn parse_timedtext(xml: &str) -> Vec<CaptionLine> {
    let mut lines = Vec::new();
    let mut rest = xml;

    while let Some(tag_start) = rest.find("<text") {
        let after_tag = &rest[tag_start..];
        let Some(attr_end) = after_tag.find('>') else {
            break;
        };
        let attrs = &after_tag[..attr_end];
        let Some(close) = after_tag[attr_end + 1..].find("</text>") else {
            break;
        };
        let raw_text = &after_tag[attr_end + 1..attr_end + 1 + close];

        let start = attr_value(attrs, "start").and_then(|v| v.parse().ok()).unwrap_or(0.0);
        let duration = attr_value(attrs, "dur").and_then(|v| v.parse().ok()).unwrap_or(0.0);
        let text = decode_entities(raw_text);
        if !text.trim().is_empty() {
            lines.push(CaptionLine {
                start,
                duration,
                text: text.trim().to_string(),
            });
        }

        rest = &after_tag[attr_end + 1 + close..];
    }
    lines
}

fn attr_value<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    let key = format!("{name}=\"");
    let start = attrs.find(&key)? + key.len();
    let rest = &attrs[start..];
    let end = rest.find('"')?;
    Some(&rest[..end])
}

/// Decode the small set of entities timedtext actually emits.
fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

/// Group caption lines into ~5-minute sections for timestamped navigation.
pub fn timed_sections(lines: &[CaptionLine]) -> Vec<TimedSection> {
    let mut sections: Vec<TimedSection> = Vec::new();
    let mut current: Option<TimedSection> = None;

    for line in lines {
        let extends = current
            .as_ref()
            .is_some_and(|s| line.start - s.start < SECTION_WINDOW_SECS);
        if extends {
            if let Some(section) = current.as_mut() {
                section.text.push(' ');
                section.text.push_str(&line.text);
                section.duration += line.duration;
            }
        } else {
            if let Some(done) = current.take() {
                sections.push(done);
            }
            current = Some(TimedSection {
                start: line.start,
                duration: line.duration,
                text: line.text.clone(),
            });
        }
    }
    if let Some(done) = current {
        sections.push(done);
    }
    sections
}

/// Format seconds as HH:MM:SS, or MM:SS under an hour.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PAGE: &str = r#"...,"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=en","name":{"simpleText":"English"},"languageCode":"en"}]}},..."#;

    #[test]
    fn finds_caption_tracks_in_watch_page() {
        let tracks = caption_tracks(SAMPLE_PAGE).unwrap();
        assert_eq!(tracks.len(), 1);
        let url = first_track_url(&tracks).unwrap();
        assert!(url.starts_with("https://www.youtube.com/api/timedtext"));
        assert!(url.contains("&lang=en"), "escaped ampersand not fixed: {url}");
    }

    #[test]
    fn missing_caption_tracks_means_disabled() {
        let err = caption_tracks("<html>no captions here</html>");
        assert!(matches!(err, Err(ExtractError::TranscriptsDisabled)));
    }

    #[test]
    fn empty_track_list_means_no_transcript() {
        let page = r#""captionTracks":[],"#;
        assert!(matches!(
            caption_tracks(page),
            Err(ExtractError::NoTranscript)
        ));
    }

    #[test]
    fn parses_timedtext_lines() {
        let xml = r#"<?xml version="1.0"?><transcript>
            <text start="0.0" dur="2.5">Hello there</text>
            <text start="2.5" dur="3.0">it&#39;s a &amp; test</text>
        </transcript>"#;
        let lines = parse_timedtext(xml);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Hello there");
        assert_eq!(lines[1].text, "it's a & test");
        assert!((lines[1].start - 2.5).abs() < f64::EPSILON);
        assert!((lines[1].duration - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sections_split_on_five_minute_windows() {
        let lines: Vec<CaptionLine> = (0..8)
            .map(|i| CaptionLine {
                start: i as f64 * 100.0, // 0s, 100s, ..., 700s
                duration: 5.0,
                text: format!("line{i}"),
            })
            .collect();
        let sections = timed_sections(&lines);
        // Window boundaries land at 300s and 600s.
        assert_eq!(sections.len(), 3);
        assert!(sections[0].text.contains("line0"));
        assert!(sections[0].text.contains("line2"));
        assert!(sections[1].text.contains("line3"));
        assert!(sections[2].text.contains("line6"));
    }

    #[test]
    fn timestamp_formats() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(75.0), "01:15");
        assert_eq!(format_timestamp(3661.0), "01:01:01");
    }
}
