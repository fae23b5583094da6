use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// --- Platform ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Instagram,
    Linkedin,
    Youtube,
    Tiktok,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Twitter,
        Platform::Instagram,
        Platform::Linkedin,
        Platform::Youtube,
        Platform::Tiktok,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
        }
    }

    /// Capitalized name used in summary reports.
    pub fn title(&self) -> &'static str {
        match self {
            Platform::Twitter => "Twitter",
            Platform::Instagram => "Instagram",
            Platform::Linkedin => "Linkedin",
            Platform::Youtube => "Youtube",
            Platform::Tiktok => "Tiktok",
        }
    }

    /// Parse an explicit platform tag. Case-insensitive; `x` is accepted for Twitter.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "twitter" | "x" => Some(Platform::Twitter),
            "instagram" => Some(Platform::Instagram),
            "linkedin" => Some(Platform::Linkedin),
            "youtube" => Some(Platform::Youtube),
            "tiktok" => Some(Platform::Tiktok),
            _ => None,
        }
    }

    /// Infer the platform from a source URL by domain substring.
    pub fn from_url(url: &str) -> Option<Self> {
        let lower = url.to_lowercase();
        if lower.contains("instagram.com") {
            Some(Platform::Instagram)
        } else if lower.contains("linkedin.com") {
            Some(Platform::Linkedin)
        } else if lower.contains("twitter.com") || lower.contains("x.com") {
            Some(Platform::Twitter)
        } else if lower.contains("youtube.com") || lower.contains("youtu.be") {
            Some(Platform::Youtube)
        } else if lower.contains("tiktok.com") {
            Some(Platform::Tiktok)
        } else {
            None
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::from_tag(s).ok_or_else(|| format!("unknown platform: {s}"))
    }
}

// --- Media type ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Text,
    Image,
    Video,
    /// YouTube video of 60 seconds or less
    Short,
    Carousel,
    Thread,
    ThreadWithImages,
    ThreadWithVideos,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Text => "text",
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Short => "short",
            MediaType::Carousel => "carousel",
            MediaType::Thread => "thread",
            MediaType::ThreadWithImages => "thread_with_images",
            MediaType::ThreadWithVideos => "thread_with_videos",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Stats ---

/// Engagement counters. `None` means the platform does not expose the metric
/// publicly; `Some(0)` means it does and the count is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub views: Option<u64>,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
    pub shares: Option<u64>,
    pub retweets: Option<u64>,
    pub replies: Option<u64>,
    pub quotes: Option<u64>,
    pub bookmarks: Option<u64>,
    pub collects: Option<u64>,
}

impl Stats {
    /// All six tweet counters present and zeroed; the starting point for thread sums.
    pub fn zeroed_tweet() -> Self {
        Self {
            views: Some(0),
            likes: Some(0),
            retweets: Some(0),
            replies: Some(0),
            quotes: Some(0),
            bookmarks: Some(0),
            ..Default::default()
        }
    }

    /// Add every metric `other` reports into `self`, treating absent values as zero.
    pub fn accumulate(&mut self, other: &Stats) {
        fn add(acc: &mut Option<u64>, v: Option<u64>) {
            if let Some(v) = v {
                *acc = Some(acc.unwrap_or(0).saturating_add(v));
            }
        }
        add(&mut self.views, other.views);
        add(&mut self.likes, other.likes);
        add(&mut self.comments, other.comments);
        add(&mut self.shares, other.shares);
        add(&mut self.retweets, other.retweets);
        add(&mut self.replies, other.replies);
        add(&mut self.quotes, other.quotes);
        add(&mut self.bookmarks, other.bookmarks);
        add(&mut self.collects, other.collects);
    }
}

// --- Author ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: Option<String>,
    pub username: Option<String>,
    pub description: Option<String>,
    pub headline: Option<String>,
    pub profile_url: Option<String>,
    pub followers_count: Option<u64>,
    pub subscribers_count: Option<u64>,
    pub location: Option<String>,
    pub profile_image_url: Option<String>,
}

// --- Content bodies ---

/// A single piece of content: a tweet, an Instagram or LinkedIn post, a
/// YouTube or TikTok video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    /// Passed through from the source untouched; some actors emit numeric ids.
    pub id: Option<Value>,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub url: Option<String>,
    pub text: Option<String>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub image_urls: Vec<String>,
    pub media_count: u64,
    pub stats: Stats,
    pub hashtags: Vec<String>,
    pub urls: Vec<String>,
    pub author: Author,
    pub timestamp: Option<String>,
    pub language: Option<String>,
    pub duration: Option<Value>,
    pub thumbnail_url: Option<String>,
    pub activity_description: Option<String>,
}

impl Default for Post {
    fn default() -> Self {
        Self {
            id: None,
            media_type: MediaType::Text,
            url: None,
            text: None,
            description: None,
            video_url: None,
            image_urls: Vec::new(),
            media_count: 0,
            stats: Stats::default(),
            hashtags: Vec::new(),
            urls: Vec::new(),
            author: Author::default(),
            timestamp: None,
            language: None,
            duration: None,
            thumbnail_url: None,
            activity_description: None,
        }
    }
}

/// One tweet inside a thread, numbered from 1 in thread order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadTweet {
    pub tweet_number: usize,
    #[serde(flatten)]
    pub tweet: Post,
}

/// A media URL collected from a thread, tagged with the tweet it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRef {
    pub url: String,
    pub tweet_number: usize,
    #[serde(default)]
    pub tweet_id: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadMedia {
    pub videos: Vec<MediaRef>,
    pub images: Vec<MediaRef>,
    /// Raw media descriptor count across all tweets.
    pub total_count: u64,
}

/// An ordered Twitter thread scored and selected as one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thread {
    pub id: Option<Value>,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub url: Option<String>,
    pub thread_length: usize,
    pub tweets: Vec<ThreadTweet>,
    pub combined_text: String,
    pub combined_stats: Stats,
    pub all_media: ThreadMedia,
    pub author: Author,
    pub timestamp: Option<String>,
    pub language: Option<String>,
}

impl Default for Thread {
    fn default() -> Self {
        Self {
            id: None,
            media_type: MediaType::Thread,
            url: None,
            thread_length: 0,
            tweets: Vec::new(),
            combined_text: String::new(),
            combined_stats: Stats::default(),
            all_media: ThreadMedia::default(),
            author: Author::default(),
            timestamp: None,
            language: None,
        }
    }
}

/// Variant payload, tagged by `content_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "content_type", rename_all = "snake_case")]
pub enum ContentBody {
    Tweet(Post),
    Thread(Thread),
    Post(Post),
    Video(Post),
}

// --- ContentItem ---

/// Canonical, platform-agnostic content item.
///
/// Serialized flat: `platform`, `content_type`, the body's fields, then
/// `URL_GROUP` and the selection annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub platform: Platform,
    #[serde(flatten)]
    pub body: ContentBody,
    /// Input URL this item was scraped for. Grouping key, not an identifier.
    #[serde(rename = "URL_GROUP", default)]
    pub url_group: Option<String>,
    #[serde(default)]
    pub engagement_score: Option<f64>,
    #[serde(default)]
    pub post_number: Option<String>,
}

impl ContentItem {
    pub fn new(platform: Platform, body: ContentBody, url_group: Option<String>) -> Self {
        Self {
            platform,
            body,
            url_group,
            engagement_score: None,
            post_number: None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self.body {
            ContentBody::Tweet(_) => "tweet",
            ContentBody::Thread(_) => "thread",
            ContentBody::Post(_) => "post",
            ContentBody::Video(_) => "video",
        }
    }

    pub fn media_type(&self) -> MediaType {
        match &self.body {
            ContentBody::Thread(t) => t.media_type,
            ContentBody::Tweet(p) | ContentBody::Post(p) | ContentBody::Video(p) => p.media_type,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match &self.body {
            ContentBody::Thread(t) => t.url.as_deref(),
            ContentBody::Tweet(p) | ContentBody::Post(p) | ContentBody::Video(p) => {
                p.url.as_deref()
            }
        }
    }

    /// Stats the engagement formulas read: a thread's combined stats, otherwise the item's own.
    pub fn scoring_stats(&self) -> &Stats {
        match &self.body {
            ContentBody::Thread(t) => &t.combined_stats,
            ContentBody::Tweet(p) | ContentBody::Post(p) | ContentBody::Video(p) => &p.stats,
        }
    }

    /// Grouping key, treating an empty string as missing.
    pub fn group_key(&self) -> Option<&str> {
        self.url_group.as_deref().filter(|g| !g.is_empty())
    }

    pub fn score(&self) -> f64 {
        self.engagement_score.unwrap_or(0.0)
    }
}

// --- Tasks ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Processing,
    Completed,
    Error,
}

impl TaskStatus {
    pub fn message(&self) -> &'static str {
        match self {
            TaskStatus::Processing => "Processing URLs through the complete pipeline...",
            TaskStatus::Completed => "Content processing completed successfully!",
            TaskStatus::Error => "An error occurred during processing.",
        }
    }
}

/// One submitted URL and what the scrape stage made of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlAnalysis {
    pub index: usize,
    pub url: String,
    /// `None` when no supported platform matches the URL.
    pub platform: Option<Platform>,
    pub username: String,
    pub status: UrlStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlStatus {
    Pending,
    Scraped,
    Failed,
    Skipped,
}

/// Persisted state of one end-to-end pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: String,
    pub status: TaskStatus,
    pub started_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub urls_processed: Vec<UrlAnalysis>,
    #[serde(default)]
    pub platforms_needed: Vec<Platform>,
    #[serde(default)]
    pub total_urls: usize,
    /// Final selection exactly as written to the result file.
    #[serde(default)]
    pub result_data: Option<Vec<Value>>,
    #[serde(default)]
    pub successful_scrapers: Vec<String>,
    #[serde(default)]
    pub failed_scrapers: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TaskRecord {
    pub fn new(task_id: impl Into<String>, urls_processed: Vec<UrlAnalysis>) -> Self {
        let mut platforms_needed: Vec<Platform> =
            urls_processed.iter().filter_map(|u| u.platform).collect();
        platforms_needed.sort();
        platforms_needed.dedup();
        Self {
            task_id: task_id.into(),
            status: TaskStatus::Processing,
            started_at: chrono::Utc::now(),
            completed_at: None,
            total_urls: urls_processed.len(),
            urls_processed,
            platforms_needed,
            result_data: None,
            successful_scrapers: Vec::new(),
            failed_scrapers: Vec::new(),
            error: None,
        }
    }

    pub fn complete(&mut self, result_data: Vec<Value>) {
        self.status = TaskStatus::Completed;
        self.result_data = Some(result_data);
        self.completed_at = Some(chrono::Utc::now());
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = TaskStatus::Error;
        self.error = Some(error.into());
        self.completed_at = Some(chrono::Utc::now());
    }
}

/// `task_<utc timestamp>_<8 hex chars>`; sortable by start time.
pub fn new_task_id() -> String {
    let now = chrono::Utc::now();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("task_{}_{}", now.format("%Y%m%d_%H%M%S"), &suffix[..8])
}
