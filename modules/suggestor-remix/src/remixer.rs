use std::sync::Arc;

use ai_client::Completion;
use serde::{Deserialize, Serialize};
use suggestor_common::{ContentBody, ContentItem, Platform, Post, Thread};
use tracing::info;

use crate::error::{RemixError, Result};
use crate::prompts;
use crate::transcript::TranscriptSource;

/// What to produce from a selected post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemixKind {
    /// A full rewrite in the original's style.
    Script,
    /// A short opener that sells the post.
    Hook,
}

/// Turns selected posts into new copy with a language model.
pub struct Remixer {
    llm: Arc<dyn Completion>,
    transcripts: Arc<dyn TranscriptSource>,
}

impl Remixer {
    pub fn new(llm: Arc<dyn Completion>, transcripts: Arc<dyn TranscriptSource>) -> Self {
        Self { llm, transcripts }
    }

    pub async fn remix(&self, kind: RemixKind, item: &ContentItem) -> Result<String> {
        let label = post_label(item);
        info!(
            post = %label,
            platform = %item.platform,
            content_type = item.content_type(),
            ?kind,
            "Remixing post"
        );

        let prompt = match kind {
            RemixKind::Script => self.script_prompt(item, &label).await?,
            RemixKind::Hook => hook_prompt(item, &label)?,
        };

        let output = self
            .llm
            .complete(prompts::SYSTEM_PREAMBLE, &prompt)
            .await
            .map_err(RemixError::Completion)?;
        info!(post = %label, chars = output.len(), "Remix complete");
        Ok(output)
    }

    async fn script_prompt(&self, item: &ContentItem, label: &str) -> Result<String> {
        let post = match &item.body {
            ContentBody::Thread(thread) => return thread_script_prompt(thread, label),
            ContentBody::Tweet(p) | ContentBody::Post(p) | ContentBody::Video(p) => p,
        };

        match item.platform {
            Platform::Twitter | Platform::Linkedin => {
                let text = non_empty(post.text.as_deref()).ok_or_else(|| empty(label))?;
                Ok(prompts::script_text(item.platform, text))
            }
            Platform::Youtube | Platform::Instagram | Platform::Tiktok => {
                let transcript = self.video_transcript(item.platform, post, label).await?;
                Ok(prompts::script_video(item.platform, &transcript))
            }
        }
    }

    async fn video_transcript(&self, platform: Platform, post: &Post, label: &str) -> Result<String> {
        let url = non_empty(post.video_url.as_deref())
            .or_else(|| non_empty(post.url.as_deref()))
            .ok_or_else(|| RemixError::NoVideoUrl {
                post: label.to_string(),
            })?;

        self.transcripts
            .transcript(platform, url)
            .await
            .map_err(RemixError::Transcript)?
            .ok_or_else(|| RemixError::TranscriptUnavailable {
                url: url.to_string(),
            })
    }
}

fn thread_script_prompt(thread: &Thread, label: &str) -> Result<String> {
    let tweets: Vec<String> = thread
        .tweets
        .iter()
        .map(|t| {
            format!(
                "Tweet {}: {}",
                t.tweet_number,
                t.tweet.text.as_deref().unwrap_or_default()
            )
        })
        .collect();
    if tweets.is_empty() {
        return Err(empty(label));
    }
    Ok(prompts::script_thread(&tweets.join("\n\n")))
}

fn hook_prompt(item: &ContentItem, label: &str) -> Result<String> {
    let content = match &item.body {
        ContentBody::Thread(thread) => {
            non_empty(Some(thread.combined_text.as_str())).map(str::to_string)
        }
        ContentBody::Tweet(p) | ContentBody::Post(p) | ContentBody::Video(p) => {
            let text = non_empty(p.text.as_deref());
            match (item.platform, text, non_empty(p.description.as_deref())) {
                (Platform::Youtube, Some(title), Some(description)) => {
                    Some(format!("{title}\n\n{description}"))
                }
                (_, text, _) => text.map(str::to_string),
            }
        }
    };
    let content = content.ok_or_else(|| empty(label))?;
    Ok(prompts::hook(item.platform, &content))
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

fn empty(label: &str) -> RemixError {
    RemixError::EmptyContent {
        post: label.to_string(),
    }
}

fn post_label(item: &ContentItem) -> String {
    item.post_number
        .clone()
        .or_else(|| item.url().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}
