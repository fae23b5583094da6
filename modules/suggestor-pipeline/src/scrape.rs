//! Scrape stage: one actor run per submitted URL, results appended to the
//! raw buffer tagged with the URL they came from.

use std::sync::LazyLock;

use anyhow::Context;
use apify_client::{ApifyClient, ApifyError};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use regex::Regex;
use serde_json::Value;
use suggestor_common::{Config, Platform, Result, SuggestorError, UrlAnalysis, UrlStatus};
use tracing::{info, warn};

use crate::coerce::{object, text, truthy};
use crate::extract::twitter::best_mp4_variant;
use crate::storage::RawBuffer;

pub const MIN_URLS: usize = 1;
pub const MAX_URLS: usize = 10;

static RE_INSTAGRAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"instagram\.com/([^/?]+)").expect("valid regex"));
static RE_LINKEDIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"linkedin\.com/(?:in|company)/([^/?]+)").expect("valid regex"));
static RE_TWITTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:twitter|x)\.com/([^/?]+)").expect("valid regex"));
static RE_YOUTUBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"youtube\.com/(?:c/|@|channel/|user/)([^/?]+)").expect("valid regex")
});
static RE_TIKTOK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"tiktok\.com/@([^/?]+)").expect("valid regex"));

/// What one scraper run should fetch.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub target_url: String,
    /// Handle extracted from the URL; empty when none matched.
    pub username: String,
    pub limit: u32,
    pub lookback_days: u32,
}

impl ScrapeConfig {
    /// First day of the lookback window, `YYYY-MM-DD`.
    pub fn since(&self, today: NaiveDate) -> String {
        (today - Duration::days(i64::from(self.lookback_days)))
            .format("%Y-%m-%d")
            .to_string()
    }
}

#[async_trait]
pub trait SocialScraper: Send + Sync {
    /// Raw records for one source. Errors fail only this URL.
    async fn scrape(&self, platform: Platform, config: &ScrapeConfig) -> anyhow::Result<Vec<Value>>;
}

#[async_trait]
impl SocialScraper for ApifyClient {
    async fn scrape(&self, platform: Platform, config: &ScrapeConfig) -> anyhow::Result<Vec<Value>> {
        let today = Utc::now().date_naive();
        let since = config.since(today);
        let records = match platform {
            Platform::Instagram => {
                self.scrape_instagram_reels(&config.target_url, config.limit, config.lookback_days)
                    .await
            }
            Platform::Linkedin => {
                self.scrape_linkedin_posts(&config.target_url, config.limit, &since)
                    .await
            }
            Platform::Youtube => {
                self.scrape_youtube_channel(&config.target_url, config.limit, &since)
                    .await
            }
            Platform::Twitter => {
                anyhow::ensure!(
                    !config.username.is_empty(),
                    "Could not extract username from URL: {}",
                    config.target_url
                );
                let until = today.format("%Y-%m-%d").to_string();
                self.search_user_tweets(&config.username, &since, &until, config.limit)
                    .await
            }
            Platform::Tiktok => {
                anyhow::ensure!(
                    !config.username.is_empty(),
                    "Could not extract username from URL: {}",
                    config.target_url
                );
                self.scrape_tiktok_profile(&config.username, config.limit, &since)
                    .await
            }
        };
        records.with_context(|| format!("{platform} scrape failed for {}", config.target_url))
    }
}

/// Handle embedded in a profile URL, or an empty string.
pub fn extract_username(url: &str, platform: Platform) -> String {
    let re = match platform {
        Platform::Instagram => &RE_INSTAGRAM,
        Platform::Linkedin => &RE_LINKEDIN,
        Platform::Twitter => &RE_TWITTER,
        Platform::Youtube => &RE_YOUTUBE,
        Platform::Tiktok => &RE_TIKTOK,
    };
    re.captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

pub fn validate_urls(urls: &[String]) -> Result<()> {
    if urls.len() < MIN_URLS {
        return Err(SuggestorError::Validation(format!(
            "At least {MIN_URLS} URL is required"
        )));
    }
    if urls.len() > MAX_URLS {
        return Err(SuggestorError::Validation(format!(
            "Maximum {MAX_URLS} URLs allowed"
        )));
    }
    Ok(())
}

/// Detect platform and handle for each URL, numbered from 1.
pub fn analyze_urls(urls: &[String]) -> Vec<UrlAnalysis> {
    urls.iter()
        .enumerate()
        .map(|(i, url)| {
            let platform = Platform::from_url(url);
            let username = platform
                .map(|p| extract_username(url, p))
                .unwrap_or_default();
            match platform {
                Some(p) => info!("URL {}: {} - @{} ({})", i + 1, p, username, url),
                None => warn!("URL {}: unsupported platform ({})", i + 1, url),
            }
            UrlAnalysis {
                index: i + 1,
                url: url.clone(),
                platform,
                username,
                status: if platform.is_some() {
                    UrlStatus::Pending
                } else {
                    UrlStatus::Skipped
                },
            }
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    /// `platform:url` for each run that produced output.
    pub successful: Vec<String>,
    pub failed: Vec<String>,
    /// Raw records in the buffer after all runs.
    pub records: usize,
}

/// Run every supported URL through `scraper` into a freshly reset buffer.
/// Failed URLs are recorded and skipped; only buffer I/O errors propagate.
pub async fn scrape_all(
    scraper: &dyn SocialScraper,
    analysis: &mut [UrlAnalysis],
    config: &Config,
    buffer: &RawBuffer,
) -> Result<ScrapeOutcome> {
    buffer.reset()?;
    info!(path = %buffer.path().display(), "Initialized raw buffer");

    let mut outcome = ScrapeOutcome::default();
    let mut account_blocked = false;
    for entry in analysis.iter_mut() {
        let Some(platform) = entry.platform else {
            continue;
        };
        let label = format!("{platform}:{}", entry.url);
        if account_blocked {
            entry.status = UrlStatus::Failed;
            outcome.failed.push(label);
            continue;
        }
        let scrape_config = ScrapeConfig {
            target_url: entry.url.clone(),
            username: entry.username.clone(),
            limit: match platform {
                Platform::Twitter => config.tweet_limit,
                _ => config.results_limit,
            },
            lookback_days: config.lookback_days,
        };

        info!(platform = %platform, url = %entry.url, "Scraping");
        match scraper.scrape(platform, &scrape_config).await {
            Ok(records) => {
                let count = records.len();
                let prepared = prepare_records(platform, records, &entry.url, &entry.username);
                let total = buffer.append(prepared)?;
                info!(platform = %platform, url = %entry.url, count, total, "Scrape complete");
                entry.status = UrlStatus::Scraped;
                outcome.successful.push(label);
            }
            Err(e) => {
                warn!(platform = %platform, url = %entry.url, error = %format!("{e:#}"), "Scrape failed");
                entry.status = UrlStatus::Failed;
                outcome.failed.push(label);
                if is_account_problem(&e) {
                    warn!("Apify rejected the account, skipping remaining URLs");
                    account_blocked = true;
                }
            }
        }
    }

    outcome.records = buffer.load()?.len();
    info!(
        records = outcome.records,
        successful = outcome.successful.len(),
        failed = outcome.failed.len(),
        "Scrape stage finished"
    );
    Ok(outcome)
}

fn is_account_problem(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<ApifyError>())
        .any(ApifyError::is_account_problem)
}

/// Tag records with their source URL and fill in derived tweet fields.
/// `handle` stands in when a tweet carries no author.
pub fn prepare_records(
    platform: Platform,
    records: Vec<Value>,
    url_group: &str,
    handle: &str,
) -> Vec<Value> {
    records
        .into_iter()
        .map(|mut record| {
            if let Value::Object(map) = &mut record {
                if platform == Platform::Twitter {
                    enrich_tweet(map, handle);
                }
                map.insert("URL_GROUP".to_string(), Value::String(url_group.to_string()));
            }
            record
        })
        .collect()
}

/// Add the permalink, the default content type, and the best video URL per
/// video descriptor.
pub fn enrich_tweet(tweet: &mut serde_json::Map<String, Value>, handle: &str) {
    let id = match tweet.get("id") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(n @ Value::Number(_)) if truthy(Some(n)) => Some(n.to_string()),
        _ => None,
    };
    if let Some(id) = id {
        let screen_name =
            text(object(tweet, "user"), "screen_name").unwrap_or_else(|| handle.to_string());
        tweet.insert(
            "tweet_url".to_string(),
            Value::String(format!("https://x.com/{screen_name}/status/{id}")),
        );
    }

    tweet
        .entry("content_type")
        .or_insert_with(|| Value::String("tweet".to_string()));

    if let Some(Value::Array(media)) = tweet.get_mut("media") {
        for item in media.iter_mut().filter_map(Value::as_object_mut) {
            if text(item, "type").as_deref() != Some("video") {
                continue;
            }
            if let Some(url) = best_mp4_variant(object(item, "video_info")) {
                item.insert("highest_quality_video_url".to_string(), Value::String(url));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn usernames_come_from_profile_urls() {
        assert_eq!(extract_username("https://x.com/elonmusk", Platform::Twitter), "elonmusk");
        assert_eq!(
            extract_username("https://www.instagram.com/su.mitra_sa/", Platform::Instagram),
            "su.mitra_sa"
        );
        assert_eq!(
            extract_username("https://www.linkedin.com/company/anthropic/", Platform::Linkedin),
            "anthropic"
        );
        assert_eq!(
            extract_username("https://www.youtube.com/@motiversity/videos", Platform::Youtube),
            "motiversity"
        );
        assert_eq!(
            extract_username("https://www.tiktok.com/@jennaezarik?lang=en", Platform::Tiktok),
            "jennaezarik"
        );
        assert_eq!(extract_username("https://www.linkedin.com/feed/", Platform::Linkedin), "");
    }

    #[test]
    fn url_count_is_bounded() {
        assert!(validate_urls(&[]).is_err());
        assert!(validate_urls(&vec!["https://x.com/a".to_string(); 10]).is_ok());
        assert!(validate_urls(&vec!["https://x.com/a".to_string(); 11]).is_err());
    }

    #[test]
    fn unsupported_urls_are_skipped() {
        let analysis = analyze_urls(&["https://example.org".into(), "https://x.com/nasa".into()]);
        assert_eq!(analysis[0].status, UrlStatus::Skipped);
        assert_eq!(analysis[0].platform, None);
        assert_eq!(analysis[1].index, 2);
        assert_eq!(analysis[1].username, "nasa");
    }

    #[test]
    fn lookback_window_start() {
        let config = ScrapeConfig {
            target_url: String::new(),
            username: String::new(),
            limit: 10,
            lookback_days: 7,
        };
        let today = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
        assert_eq!(config.since(today), "2026-02-24");
    }

    #[test]
    fn tweets_are_enriched_and_tagged() {
        let records = prepare_records(
            Platform::Twitter,
            vec![json!({
                "id": 17,
                "user": {"screen_name": "nasa"},
                "media": [{"type": "video", "video_info": {"variants": [
                    {"content_type": "video/mp4", "bitrate": 1, "url": "https://v/1.mp4"}
                ]}}]
            })],
            "https://x.com/nasa",
            "nasa",
        );
        let tweet = &records[0];
        assert_eq!(tweet["tweet_url"], "https://x.com/nasa/status/17");
        assert_eq!(tweet["content_type"], "tweet");
        assert_eq!(tweet["URL_GROUP"], "https://x.com/nasa");
        assert_eq!(tweet["media"][0]["highest_quality_video_url"], "https://v/1.mp4");
    }
}
