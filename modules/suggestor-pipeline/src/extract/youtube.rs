use suggestor_common::{Author, ContentBody, ContentItem, MediaType, Platform, Post, Stats};

use super::{media_count, url_group};
use crate::clean::cleaned;
use crate::coerce::{count, first_text, scan_hashtags, text, RawRecord};

/// Videos of this many seconds or fewer are shorts.
const SHORT_MAX_SECONDS: u64 = 60;

pub fn extract(record: &RawRecord) -> ContentItem {
    let title = text(record, "title");
    let description = first_text(record, &["description", "text"]);
    let video_url = text(record, "url");
    let thumbnail_url = text(record, "thumbnailUrl");
    let image_urls: Vec<String> = thumbnail_url.iter().cloned().collect();

    let tag_source = format!(
        "{} {}",
        title.as_deref().unwrap_or_default(),
        description.as_deref().unwrap_or_default()
    );

    let media_type = match text(record, "duration").as_deref().and_then(parse_duration) {
        Some(secs) if secs <= SHORT_MAX_SECONDS => MediaType::Short,
        _ => MediaType::Video,
    };

    let post = Post {
        id: cleaned(record.get("videoId")).or_else(|| cleaned(record.get("id"))),
        media_type,
        url: video_url.clone(),
        text: title,
        description,
        media_count: media_count(video_url.as_ref(), &image_urls),
        video_url,
        image_urls,
        stats: Stats {
            views: Some(count(record.get("viewCount"))),
            likes: Some(count(record.get("likeCount").or_else(|| record.get("likes")))),
            comments: Some(count(
                record.get("commentCount").or_else(|| record.get("commentsCount")),
            )),
            ..Default::default()
        },
        hashtags: scan_hashtags(&tag_source),
        author: Author {
            name: text(record, "channelName"),
            username: text(record, "channelHandle"),
            profile_url: text(record, "channelUrl"),
            subscribers_count: Some(count(
                record.get("subscriberCount").or_else(|| record.get("numberOfSubscribers")),
            )),
            ..Default::default()
        },
        timestamp: first_text(record, &["publishedAt", "date"]),
        duration: cleaned(record.get("duration")),
        thumbnail_url,
        ..Default::default()
    };
    ContentItem::new(Platform::Youtube, ContentBody::Video(post), url_group(record))
}

/// Seconds in an ISO-8601 time duration such as `PT1M5S` or `PT45S`.
/// `None` for anything else, including a bare `PT`.
pub fn parse_duration(raw: &str) -> Option<u64> {
    let rest = raw.trim().strip_prefix("PT")?;
    let mut total = 0u64;
    let mut digits = String::new();
    let mut seen = false;
    for c in rest.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let n: u64 = digits.parse().ok()?;
        digits.clear();
        total += match c {
            'H' => n * 3600,
            'M' => n * 60,
            'S' => n,
            _ => return None,
        };
        seen = true;
    }
    (digits.is_empty() && seen).then_some(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_iso_durations() {
        assert_eq!(parse_duration("PT45S"), Some(45));
        assert_eq!(parse_duration("PT1M"), Some(60));
        assert_eq!(parse_duration("PT1M1S"), Some(61));
        assert_eq!(parse_duration("PT1H2M3S"), Some(3723));
        assert_eq!(parse_duration("PT"), None);
        assert_eq!(parse_duration("00:45"), None);
        assert_eq!(parse_duration("PT5X"), None);
    }

    #[test]
    fn short_is_sixty_seconds_or_less() {
        let short = json!({"url": "https://youtube.com/shorts/a", "duration": "PT60S"});
        let long = json!({"url": "https://youtube.com/watch?v=b", "duration": "PT1M1S"});
        let unparsable = json!({"url": "https://youtube.com/watch?v=c", "duration": "0:30"});
        assert_eq!(extract(short.as_object().unwrap()).media_type(), MediaType::Short);
        assert_eq!(extract(long.as_object().unwrap()).media_type(), MediaType::Video);
        assert_eq!(extract(unparsable.as_object().unwrap()).media_type(), MediaType::Video);
    }

    #[test]
    fn video_maps_channel_and_hashtags() {
        let raw = json!({
            "videoId": "dQw4",
            "title": "Stay focused #motivation",
            "description": "Daily push #mindset",
            "url": "https://www.youtube.com/watch?v=dQw4",
            "thumbnailUrl": "https://i.ytimg.com/vi/dQw4/hq.jpg",
            "viewCount": 10000,
            "likeCount": 500,
            "commentCount": 20,
            "channelName": "Motiversity",
            "channelUrl": "https://www.youtube.com/@motiversity",
            "subscriberCount": "4500000",
            "duration": "PT5M2S"
        });
        let item = extract(raw.as_object().unwrap());
        let ContentBody::Video(post) = &item.body else {
            panic!("expected video");
        };
        assert_eq!(post.text.as_deref(), Some("Stay focused #motivation"));
        assert_eq!(post.hashtags, vec!["motivation", "mindset"]);
        assert_eq!(post.media_count, 2);
        assert_eq!(post.stats.likes, Some(500));
        assert_eq!(post.stats.shares, None);
        assert_eq!(post.author.subscribers_count, Some(4_500_000));
        assert_eq!(post.duration, Some(json!("PT5M2S")));
        assert_eq!(post.id, Some(json!("dQw4")));
    }
}
