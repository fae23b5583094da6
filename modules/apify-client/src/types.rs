use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// A start URL entry, shared by actors that take `startUrls`.
#[derive(Debug, Clone, Serialize)]
pub struct StartUrl {
    pub url: String,
}

// --- Instagram ---

/// Input for the apify/instagram-reel-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct InstagramReelInput {
    pub username: Vec<String>,
    #[serde(rename = "resultsLimit")]
    pub results_limit: u32,
    /// Relative window such as "7 days".
    #[serde(rename = "onlyPostsNewerThan")]
    pub only_posts_newer_than: String,
}

// --- LinkedIn ---

/// Input for the supreme_coder/linkedin-post actor.
#[derive(Debug, Clone, Serialize)]
pub struct LinkedInPostInput {
    pub urls: Vec<String>,
    #[serde(rename = "limitPerSource")]
    pub limit_per_source: u32,
    /// `YYYY-MM-DD`; the actor stops once it reaches posts older than this.
    #[serde(rename = "scrapeUntil")]
    pub scrape_until: String,
}

// --- YouTube ---

/// Input for the streamers/youtube-channel-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct YouTubeChannelInput {
    #[serde(rename = "startUrls")]
    pub start_urls: Vec<StartUrl>,
    #[serde(rename = "maxResults")]
    pub max_results: u32,
    #[serde(rename = "maxResultsShorts")]
    pub max_results_shorts: u32,
    #[serde(rename = "maxResultStreams")]
    pub max_result_streams: u32,
    #[serde(rename = "oldestPostDate")]
    pub oldest_post_date: String,
    #[serde(rename = "sortVideosBy")]
    pub sort_videos_by: String,
}

// --- X / Twitter ---

/// Input for the scrape.badger/twitter-tweets-scraper actor in search mode.
#[derive(Debug, Clone, Serialize)]
pub struct TweetSearchInput {
    pub mode: String,
    pub query: String,
    pub query_type: String,
    pub max_results: u32,
}

impl TweetSearchInput {
    /// Latest original tweets (no replies) from `handle` between two dates.
    pub fn from_user(handle: &str, since: &str, until: &str, max_results: u32) -> Self {
        Self {
            mode: "Advanced Search".to_string(),
            query: format!("from:{handle} -filter:replies since:{since} until:{until}"),
            query_type: "Latest".to_string(),
            max_results,
        }
    }
}

// --- TikTok ---

/// Input for the clockworks/tiktok-scraper actor (profile-based).
#[derive(Debug, Clone, Serialize)]
pub struct TikTokScraperInput {
    pub profiles: Vec<String>,
    #[serde(rename = "resultsPerPage")]
    pub results_per_page: u32,
    #[serde(rename = "oldestPostDateUnified")]
    pub oldest_post_date: String,
}

// --- Transcripts ---

/// Input for the agentx/video-transcript actor.
#[derive(Debug, Clone, Serialize)]
pub struct VideoTranscriptInput {
    pub video_urls: Vec<String>,
    /// Language name such as "English".
    pub target_lang: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tweet_search_query_excludes_replies() {
        let input = TweetSearchInput::from_user("elonmusk", "2026-10-12", "2026-10-19", 10);
        assert_eq!(
            input.query,
            "from:elonmusk -filter:replies since:2026-10-12 until:2026-10-19"
        );
        assert_eq!(input.mode, "Advanced Search");
    }

    #[test]
    fn youtube_input_uses_actor_field_names() {
        let input = YouTubeChannelInput {
            start_urls: vec![StartUrl {
                url: "https://www.youtube.com/@motiversity/".into(),
            }],
            max_results: 50,
            max_results_shorts: 50,
            max_result_streams: 0,
            oldest_post_date: "2026-10-12".into(),
            sort_videos_by: "NEWEST".into(),
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["startUrls"][0]["url"], "https://www.youtube.com/@motiversity/");
        assert_eq!(value["maxResultStreams"], 0);
        assert_eq!(value["sortVideosBy"], "NEWEST");
    }
}
