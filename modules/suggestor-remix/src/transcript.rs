use std::sync::LazyLock;

use anyhow::{Context, Result};
use apify_client::ApifyClient;
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use suggestor_common::Platform;
use tracing::{info, warn};

static YOUTUBE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtube\.com/watch\?(?:[^#]*&)?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/shorts/)([^&\s?#/]+)",
    )
    .expect("valid regex")
});

/// Spoken text of a video. `Ok(None)` means the video has no usable transcript.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn transcript(&self, platform: Platform, video_url: &str) -> Result<Option<String>>;
}

/// Transcripts through the Apify video-transcript actor.
pub struct ApifyTranscripts {
    client: ApifyClient,
    target_lang: String,
}

impl ApifyTranscripts {
    pub fn new(client: ApifyClient, target_lang: impl Into<String>) -> Self {
        Self {
            client,
            target_lang: target_lang.into(),
        }
    }
}

#[async_trait]
impl TranscriptSource for ApifyTranscripts {
    async fn transcript(&self, platform: Platform, video_url: &str) -> Result<Option<String>> {
        let url = match platform {
            Platform::Youtube => youtube_video_id(video_url)
                .map(|id| format!("https://www.youtube.com/watch?v={id}"))
                .unwrap_or_else(|| video_url.to_string()),
            _ => video_url.to_string(),
        };

        let items = self
            .client
            .transcribe_videos(std::slice::from_ref(&url), &self.target_lang)
            .await
            .with_context(|| format!("Transcribing {url}"))?;

        let text = transcript_text(&items);
        match &text {
            Some(t) => info!(%platform, chars = t.len(), "Retrieved transcript"),
            None => warn!(%platform, url = %url, items = items.len(), "No transcript in actor output"),
        }
        Ok(text)
    }
}

/// Video id from a watch, shorts, embed or youtu.be URL, or a bare 11-char id.
pub fn youtube_video_id(url_or_id: &str) -> Option<String> {
    let trimmed = url_or_id.trim();
    if trimmed.len() == 11 && !trimmed.contains('/') && !trimmed.contains('.') {
        return Some(trimmed.to_string());
    }
    YOUTUBE_ID_RE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Join the transcripts in an actor dataset. A translated transcript is
/// preferred over the source one; empty output is `None`.
pub fn transcript_text(items: &[Value]) -> Option<String> {
    let mut parts = Vec::new();
    for item in items {
        let transcript = ["target_transcript", "source_transcript", "transcript"]
            .iter()
            .find_map(|key| transcript_field(item.get(*key)));
        match transcript {
            Some(t) => parts.push(t),
            None => {
                if let Some(t) = transcript_field(item.get("translation")) {
                    parts.push(format!("Translation:\n{t}"));
                }
            }
        }
    }
    let joined = parts.join("\n");
    let joined = joined.trim();
    (!joined.is_empty()).then(|| joined.to_string())
}

fn transcript_field(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("text")?.as_str()?,
        _ => return None,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn youtube_ids_from_every_url_shape() {
        let cases = [
            ("https://www.youtube.com/watch?v=dQw4w9WgXcQ", "dQw4w9WgXcQ"),
            ("https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=4", "dQw4w9WgXcQ"),
            ("https://www.youtube.com/shorts/abcDEF12345?si=x", "abcDEF12345"),
            ("https://www.youtube.com/embed/abcDEF12345", "abcDEF12345"),
            ("https://youtu.be/abcDEF12345", "abcDEF12345"),
            ("abcDEF12345", "abcDEF12345"),
        ];
        for (input, id) in cases {
            assert_eq!(youtube_video_id(input).as_deref(), Some(id), "{input}");
        }
        assert_eq!(youtube_video_id("https://www.youtube.com/@motiversity"), None);
    }

    #[test]
    fn translated_transcript_wins() {
        let items = vec![
            json!({
                "target_transcript": {"text": "hello there"},
                "source_transcript": {"text": "hola"}
            }),
            json!({"source_transcript": "second clip"}),
        ];
        assert_eq!(transcript_text(&items).as_deref(), Some("hello there\nsecond clip"));
    }

    #[test]
    fn translation_is_a_last_resort() {
        let items = vec![json!({"transcript": "", "translation": "bonjour"})];
        assert_eq!(transcript_text(&items).as_deref(), Some("Translation:\nbonjour"));
    }

    #[test]
    fn empty_dataset_has_no_transcript() {
        assert_eq!(transcript_text(&[]), None);
        assert_eq!(transcript_text(&[json!({"status": "failed"})]), None);
    }
}
