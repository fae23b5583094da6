pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{
    InstagramReelInput, LinkedInPostInput, RunData, StartUrl, TikTokScraperInput,
    TweetSearchInput, VideoTranscriptInput, YouTubeChannelInput,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use types::ApiResponse;

const BASE_URL: &str = "https://api.apify.com/v2";

pub const INSTAGRAM_REEL_SCRAPER: &str = "apify/instagram-reel-scraper";
pub const LINKEDIN_POST_SCRAPER: &str = "supreme_coder/linkedin-post";
pub const YOUTUBE_CHANNEL_SCRAPER: &str = "streamers/youtube-channel-scraper";
pub const TWEET_SCRAPER: &str = "scrape.badger/twitter-tweets-scraper";
pub const TIKTOK_SCRAPER: &str = "clockworks/tiktok-scraper";
pub const VIDEO_TRANSCRIPT: &str = "agentx/video-transcript";

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API root (proxies, local mocks).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Start an actor run. Returns immediately with run metadata.
    ///
    /// Actor names use the `owner/name` form; the API path wants `owner~name`.
    pub async fn start_run<I: Serialize>(&self, actor: &str, input: &I) -> Result<RunData> {
        let url = format!("{}/acts/{}/runs", self.base_url, actor_path(actor));
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;
        let envelope: ApiResponse<RunData> = read_json(resp).await?;
        Ok(envelope.data)
    }

    /// Long-poll a run until it reaches a terminal status.
    pub async fn wait_for_run(&self, run_id: &str) -> Result<RunData> {
        let url = format!("{}/actor-runs/{}?waitForFinish=60", self.base_url, run_id);
        loop {
            let resp = self.client.get(&url).bearer_auth(&self.token).send().await?;
            let run = read_json::<ApiResponse<RunData>>(resp).await?.data;
            match run.status.as_str() {
                "SUCCEEDED" => return Ok(run),
                "FAILED" | "ABORTED" | "TIMED-OUT" => {
                    return Err(ApifyError::RunFailed {
                        run_id: run.id,
                        status: run.status,
                    });
                }
                status => tracing::debug!(run_id, status, "Run still in progress"),
            }
        }
    }

    /// Items of a dataset, decoded as `T`.
    pub async fn get_dataset_items<T: DeserializeOwned>(&self, dataset_id: &str) -> Result<Vec<T>> {
        let url = format!("{}/datasets/{}/items?format=json", self.base_url, dataset_id);
        let resp = self.client.get(&url).bearer_auth(&self.token).send().await?;
        read_json(resp).await
    }

    /// Run an actor end-to-end: start run, poll, fetch the dataset as raw records.
    ///
    /// Records are returned untouched. Actor output schemas drift often, so
    /// interpretation is left to the caller.
    pub async fn run_actor<I: Serialize>(&self, actor: &str, input: &I) -> Result<Vec<Value>> {
        let run = self.start_run(actor, input).await?;
        tracing::info!(actor, run_id = %run.id, "Apify run started, polling for completion");

        let completed = self.wait_for_run(&run.id).await?;
        tracing::info!(
            actor,
            run_id = %completed.id,
            dataset_id = %completed.default_dataset_id,
            "Run completed, fetching results"
        );

        let items: Vec<Value> = self
            .get_dataset_items(&completed.default_dataset_id)
            .await?;
        tracing::info!(actor, count = items.len(), "Fetched dataset items");
        Ok(items)
    }

    /// Reels from an Instagram profile URL or username.
    pub async fn scrape_instagram_reels(
        &self,
        profile: &str,
        limit: u32,
        lookback_days: u32,
    ) -> Result<Vec<Value>> {
        tracing::info!(profile, limit, "Starting Instagram reel scrape");
        let input = InstagramReelInput {
            username: vec![profile.to_string()],
            results_limit: limit,
            only_posts_newer_than: format!("{lookback_days} days"),
        };
        self.run_actor(INSTAGRAM_REEL_SCRAPER, &input).await
    }

    /// Posts from a LinkedIn profile or company page, back to `scrape_until`.
    pub async fn scrape_linkedin_posts(
        &self,
        page_url: &str,
        limit: u32,
        scrape_until: &str,
    ) -> Result<Vec<Value>> {
        tracing::info!(page_url, limit, scrape_until, "Starting LinkedIn post scrape");
        let input = LinkedInPostInput {
            urls: vec![page_url.to_string()],
            limit_per_source: limit,
            scrape_until: scrape_until.to_string(),
        };
        self.run_actor(LINKEDIN_POST_SCRAPER, &input).await
    }

    /// Videos and shorts from a YouTube channel, newest first. Live streams are skipped.
    pub async fn scrape_youtube_channel(
        &self,
        channel_url: &str,
        limit: u32,
        oldest_post_date: &str,
    ) -> Result<Vec<Value>> {
        tracing::info!(channel_url, limit, oldest_post_date, "Starting YouTube channel scrape");
        let input = YouTubeChannelInput {
            start_urls: vec![StartUrl {
                url: channel_url.to_string(),
            }],
            max_results: limit,
            max_results_shorts: limit,
            max_result_streams: 0,
            oldest_post_date: oldest_post_date.to_string(),
            sort_videos_by: "NEWEST".to_string(),
        };
        self.run_actor(YOUTUBE_CHANNEL_SCRAPER, &input).await
    }

    /// Original tweets by `handle` posted in `[since, until)`.
    pub async fn search_user_tweets(
        &self,
        handle: &str,
        since: &str,
        until: &str,
        limit: u32,
    ) -> Result<Vec<Value>> {
        tracing::info!(handle, since, until, limit, "Starting X/Twitter search");
        let input = TweetSearchInput::from_user(handle, since, until, limit);
        self.run_actor(TWEET_SCRAPER, &input).await
    }

    /// Videos from a TikTok profile.
    pub async fn scrape_tiktok_profile(
        &self,
        handle: &str,
        limit: u32,
        oldest_post_date: &str,
    ) -> Result<Vec<Value>> {
        tracing::info!(handle, limit, "Starting TikTok profile scrape");
        let input = TikTokScraperInput {
            profiles: vec![handle.trim_start_matches('@').to_string()],
            results_per_page: limit,
            oldest_post_date: oldest_post_date.to_string(),
        };
        self.run_actor(TIKTOK_SCRAPER, &input).await
    }

    /// Transcripts for public video URLs, translated to `target_lang`.
    pub async fn transcribe_videos(
        &self,
        video_urls: &[String],
        target_lang: &str,
    ) -> Result<Vec<Value>> {
        tracing::info!(videos = video_urls.len(), target_lang, "Starting video transcription");
        let input = VideoTranscriptInput {
            video_urls: video_urls.to_vec(),
            target_lang: target_lang.to_string(),
        };
        self.run_actor(VIDEO_TRANSCRIPT, &input).await
    }
}

fn actor_path(actor: &str) -> String {
    actor.replace('/', "~")
}

/// Decode a JSON body, turning non-2xx responses into [`ApifyError::Api`].
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    let body = resp.bytes().await?;
    if !status.is_success() {
        return Err(ApifyError::Api {
            status: status.as_u16(),
            message: String::from_utf8_lossy(&body).into_owned(),
        });
    }
    Ok(serde_json::from_slice(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_path_uses_tilde_separator() {
        assert_eq!(actor_path(TWEET_SCRAPER), "scrape.badger~twitter-tweets-scraper");
        assert_eq!(actor_path("abc123"), "abc123");
    }

    #[test]
    fn base_url_override_strips_trailing_slash() {
        let client = ApifyClient::new("token".into()).with_base_url("http://localhost:9000/v2/");
        assert_eq!(client.base_url, "http://localhost:9000/v2");
    }
}
