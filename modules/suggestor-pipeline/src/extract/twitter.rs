//! Tweets and threads from the tweet search actor.
//!
//! A record with `content_type == "thread"` carries its tweets in
//! `ordered_tweets`; anything else is read as a single tweet.

use serde_json::Value;
use suggestor_common::{
    Author, ContentBody, ContentItem, MediaRef, MediaType, Platform, Post, Stats, Thread,
    ThreadMedia, ThreadTweet,
};

use super::{positive, url_group};
use crate::clean::cleaned;
use crate::coerce::{count, first_text, hashtags, object, safe_int, text, RawRecord};

pub fn extract(record: &RawRecord) -> Option<ContentItem> {
    let body = if text(record, "content_type").as_deref() == Some("thread") {
        ContentBody::Thread(extract_thread(record)?)
    } else {
        ContentBody::Tweet(extract_tweet(record))
    };
    Some(ContentItem::new(Platform::Twitter, body, url_group(record)))
}

pub fn extract_tweet(record: &RawRecord) -> Post {
    let media = scan_media(record.get("media"));
    let url = text(record, "tweet_url");
    Post {
        id: cleaned(record.get("id")),
        media_type: media.media_type,
        author: author(object(record, "user"), url.as_deref()),
        url,
        text: first_text(record, &["text", "full_text"]),
        video_url: media.video_url,
        image_urls: media.image_urls,
        media_count: media.descriptor_count,
        stats: tweet_stats(record),
        hashtags: tweet_hashtags(record),
        urls: expanded_urls(record.get("urls")),
        timestamp: first_text(record, &["created_at_datetime", "created_at"]),
        language: text(record, "lang"),
        ..Default::default()
    }
}

/// Build a thread from `ordered_tweets`. `None` when there are no tweets.
pub fn extract_thread(record: &RawRecord) -> Option<Thread> {
    let tweets: Vec<&RawRecord> = match record.get("ordered_tweets") {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
        _ => Vec::new(),
    };
    let first = *tweets.first()?;

    let mut combined_stats = Stats::zeroed_tweet();
    let mut all_media = ThreadMedia::default();
    let mut texts = Vec::with_capacity(tweets.len());
    let mut thread_tweets = Vec::with_capacity(tweets.len());

    for (i, raw) in tweets.iter().enumerate() {
        let tweet_number = i + 1;
        let tweet = extract_tweet(raw);

        combined_stats.accumulate(&tweet.stats);
        texts.push(tweet.text.clone().unwrap_or_default());

        all_media.total_count += tweet.media_count;
        if let Some(video) = &tweet.video_url {
            all_media.videos.push(MediaRef {
                url: video.clone(),
                tweet_number,
                tweet_id: tweet.id.clone(),
            });
        }
        for image in &tweet.image_urls {
            all_media.images.push(MediaRef {
                url: image.clone(),
                tweet_number,
                tweet_id: tweet.id.clone(),
            });
        }

        // Per-tweet author lives on the thread.
        thread_tweets.push(ThreadTweet {
            tweet_number,
            tweet: Post {
                author: Author::default(),
                ..tweet
            },
        });
    }

    let media_type = if !all_media.videos.is_empty() {
        MediaType::ThreadWithVideos
    } else if !all_media.images.is_empty() {
        MediaType::ThreadWithImages
    } else {
        MediaType::Thread
    };

    let first_url = text(first, "tweet_url");
    Some(Thread {
        id: cleaned(record.get("thread_id")).or_else(|| cleaned(first.get("id"))),
        media_type,
        url: first_url.clone(),
        thread_length: thread_tweets.len(),
        tweets: thread_tweets,
        combined_text: texts.join(" "),
        combined_stats,
        all_media,
        author: author(object(first, "user"), first_url.as_deref()),
        timestamp: first_text(first, &["created_at_datetime", "created_at"]),
        language: text(first, "lang"),
    })
}

fn tweet_stats(record: &RawRecord) -> Stats {
    Stats {
        views: Some(count(record.get("view_count"))),
        likes: Some(count(record.get("favorite_count"))),
        retweets: Some(count(record.get("retweet_count"))),
        replies: Some(count(record.get("reply_count"))),
        quotes: Some(count(record.get("quote_count"))),
        bookmarks: Some(count(record.get("bookmark_count"))),
        ..Default::default()
    }
}

/// The actor spells the field `hastags`; accept both.
fn tweet_hashtags(record: &RawRecord) -> Vec<String> {
    let tags = hashtags(record.get("hastags"));
    if tags.is_empty() {
        hashtags(record.get("hashtags"))
    } else {
        tags
    }
}

fn expanded_urls(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(map) => first_text(map, &["expanded_url", "url"]),
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

fn author(user: &RawRecord, permalink: Option<&str>) -> Author {
    let username = text(user, "screen_name");
    Author {
        profile_url: profile_url(permalink, username.as_deref()),
        name: text(user, "name"),
        description: text(user, "description"),
        followers_count: positive(count(user.get("followers_count"))),
        location: text(user, "location"),
        profile_image_url: text(user, "profile_image_url"),
        username,
        ..Default::default()
    }
}

/// Profile URL from the tweet permalink, else built from the handle.
pub fn profile_url(permalink: Option<&str>, username: Option<&str>) -> Option<String> {
    if let Some((profile, _)) = permalink.and_then(|p| p.split_once("/status/")) {
        return Some(profile.to_string());
    }
    username.map(|u| format!("https://x.com/{u}"))
}

pub(crate) struct MediaScan {
    pub media_type: MediaType,
    pub video_url: Option<String>,
    pub image_urls: Vec<String>,
    pub descriptor_count: u64,
}

/// Walk the tweet's media descriptors. Any video makes it a video tweet.
pub(crate) fn scan_media(media: Option<&Value>) -> MediaScan {
    let mut scan = MediaScan {
        media_type: MediaType::Text,
        video_url: None,
        image_urls: Vec::new(),
        descriptor_count: 0,
    };
    let Some(Value::Array(items)) = media else {
        return scan;
    };
    scan.descriptor_count = items.len() as u64;

    for item in items.iter().filter_map(Value::as_object) {
        match text(item, "type").as_deref() {
            Some("video") => {
                scan.media_type = MediaType::Video;
                let url = text(item, "highest_quality_video_url")
                    .or_else(|| best_mp4_variant(object(item, "video_info")));
                if url.is_some() {
                    scan.video_url = url;
                }
            }
            Some("photo") => {
                if scan.media_type == MediaType::Text {
                    scan.media_type = MediaType::Image;
                }
                if let Some(url) = text(item, "media_url") {
                    scan.image_urls.push(url);
                }
            }
            _ => {}
        }
    }
    scan
}

/// The `video/mp4` variant with the highest bitrate; first one wins ties.
pub fn best_mp4_variant(video_info: &RawRecord) -> Option<String> {
    let Some(Value::Array(variants)) = video_info.get("variants") else {
        return None;
    };
    let mut best: Option<(i64, &RawRecord)> = None;
    for variant in variants.iter().filter_map(Value::as_object) {
        if text(variant, "content_type").as_deref() != Some("video/mp4") {
            continue;
        }
        let bitrate = variant.get("bitrate").map(safe_int).unwrap_or(0);
        if best.map_or(true, |(b, _)| bitrate > b) {
            best = Some((bitrate, variant));
        }
    }
    best.and_then(|(_, variant)| text(variant, "url"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn photo_tweet_is_an_image_with_media_urls() {
        let raw = record(json!({
            "id": "1",
            "text": "look",
            "tweet_url": "https://x.com/nasa/status/1",
            "media": [{"type": "photo", "media_url": "https://pbs/1.jpg"}],
            "user": {"screen_name": "nasa", "followers_count": 0},
            "hastags": ["#space"]
        }));
        let post = extract_tweet(&raw);
        assert_eq!(post.media_type, MediaType::Image);
        assert_eq!(post.image_urls, vec!["https://pbs/1.jpg"]);
        assert_eq!(post.media_count, 1);
        assert_eq!(post.hashtags, vec!["space"]);
        assert_eq!(post.author.profile_url.as_deref(), Some("https://x.com/nasa"));
        assert_eq!(post.author.followers_count, None);
        assert_eq!(post.stats.views, Some(0));
    }

    #[test]
    fn video_wins_over_photo_and_picks_highest_bitrate() {
        let raw = record(json!({
            "full_text": "clip",
            "media": [
                {"type": "photo", "media_url": "https://pbs/thumb.jpg"},
                {"type": "video", "video_info": {"variants": [
                    {"content_type": "video/mp4", "bitrate": 256000, "url": "https://v/low.mp4"},
                    {"content_type": "application/x-mpegURL", "url": "https://v/pl.m3u8"},
                    {"content_type": "video/mp4", "bitrate": "2176000", "url": "https://v/high.mp4"}
                ]}}
            ],
            "user": {"screen_name": "clips"}
        }));
        let post = extract_tweet(&raw);
        assert_eq!(post.media_type, MediaType::Video);
        assert_eq!(post.video_url.as_deref(), Some("https://v/high.mp4"));
        assert_eq!(post.text.as_deref(), Some("clip"));
        assert_eq!(post.media_count, 2);
        assert_eq!(post.author.profile_url.as_deref(), Some("https://x.com/clips"));
    }

    #[test]
    fn precomputed_video_url_is_preferred() {
        let scan = scan_media(Some(&json!([{
            "type": "video",
            "highest_quality_video_url": "https://v/best.mp4",
            "video_info": {"variants": [{"content_type": "video/mp4", "bitrate": 1, "url": "https://v/x.mp4"}]}
        }])));
        assert_eq!(scan.video_url.as_deref(), Some("https://v/best.mp4"));
    }

    #[test]
    fn urls_prefer_expanded_form() {
        let raw = record(json!({
            "urls": [{"expanded_url": "https://example.com/a", "url": "https://t.co/x"},
                     {"url": "https://t.co/y"}]
        }));
        assert_eq!(
            extract_tweet(&raw).urls,
            vec!["https://example.com/a", "https://t.co/y"]
        );
    }

    #[test]
    fn thread_combines_stats_text_and_media() {
        let raw = record(json!({
            "content_type": "thread",
            "thread_id": "100",
            "URL_GROUP": "https://x.com/dev",
            "ordered_tweets": [
                {"id": "100", "text": "1/ start", "tweet_url": "https://x.com/dev/status/100",
                 "view_count": 100, "favorite_count": 10, "retweet_count": 1,
                 "user": {"screen_name": "dev", "name": "Dev"}},
                {"id": "101", "text": "2/ end", "view_count": "50", "favorite_count": 5,
                 "media": [{"type": "photo", "media_url": "https://pbs/2.jpg"}]}
            ]
        }));
        let item = extract(&raw).unwrap();
        let ContentBody::Thread(thread) = &item.body else {
            panic!("expected thread");
        };
        assert_eq!(thread.thread_length, 2);
        assert_eq!(thread.combined_text, "1/ start 2/ end");
        assert_eq!(thread.combined_stats.views, Some(150));
        assert_eq!(thread.combined_stats.likes, Some(15));
        assert_eq!(thread.combined_stats.retweets, Some(1));
        assert_eq!(thread.media_type, MediaType::ThreadWithImages);
        assert_eq!(thread.all_media.images[0].tweet_number, 2);
        assert_eq!(thread.url.as_deref(), Some("https://x.com/dev/status/100"));
        assert_eq!(thread.author.name.as_deref(), Some("Dev"));
        assert_eq!(thread.tweets[1].tweet_number, 2);
        assert_eq!(item.url_group.as_deref(), Some("https://x.com/dev"));
    }

    #[test]
    fn thread_without_tweets_is_dropped() {
        let raw = record(json!({"content_type": "thread", "ordered_tweets": []}));
        assert!(extract(&raw).is_none());
    }

    #[test]
    fn profile_url_falls_back_to_handle_then_nothing() {
        assert_eq!(
            profile_url(Some("https://x.com/a"), Some("b")).as_deref(),
            Some("https://x.com/b")
        );
        assert_eq!(profile_url(Some("not a permalink"), None), None);
        assert_eq!(profile_url(None, None), None);
    }

    #[test]
    fn anonymous_tweet_has_no_author() {
        let raw = record(json!({"id": "9", "text": "no user here", "URL_GROUP": "https://x.com/a"}));
        let item = extract(&raw).unwrap();
        let value = crate::clean::clean(serde_json::to_value(&item).unwrap());
        assert!(value.get("author").is_none(), "{value}");
        assert_eq!(value["text"], "no user here");
    }
}
