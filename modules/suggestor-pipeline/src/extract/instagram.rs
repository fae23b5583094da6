use serde_json::Value;
use suggestor_common::{Author, ContentBody, ContentItem, MediaType, Platform, Post, Stats};

use super::{media_count, url_group};
use crate::clean::cleaned;
use crate::coerce::{count, hashtags, text, url_list, RawRecord};

pub fn extract(record: &RawRecord) -> ContentItem {
    let video_url = text(record, "videoUrl");
    let image_urls = match text(record, "imageUrl") {
        Some(url) => vec![url],
        None => url_list(record.get("images")),
    };

    let username = text(record, "ownerUsername");
    let post = Post {
        id: cleaned(record.get("id")),
        media_type: media_type(record, video_url.is_some()),
        url: text(record, "url"),
        text: text(record, "caption"),
        media_count: media_count(video_url.as_ref(), &image_urls),
        video_url,
        image_urls,
        stats: Stats {
            views: Some(views(record)),
            likes: Some(count(record.get("likesCount"))),
            comments: Some(count(record.get("commentsCount"))),
            ..Default::default()
        },
        hashtags: hashtags(record.get("hashtags")),
        author: Author {
            name: text(record, "ownerFullName"),
            profile_url: username.as_ref().map(|u| format!("https://instagram.com/{u}")),
            username,
            ..Default::default()
        },
        timestamp: text(record, "timestamp"),
        ..Default::default()
    };
    ContentItem::new(Platform::Instagram, ContentBody::Post(post), url_group(record))
}

/// The declared type when it is one we know, otherwise inferred from media.
fn media_type(record: &RawRecord, has_video: bool) -> MediaType {
    let declared = match record.get("type") {
        Some(Value::String(s)) => s.to_lowercase(),
        _ => String::new(),
    };
    match declared.as_str() {
        "video" => MediaType::Video,
        "image" => MediaType::Image,
        "carousel" => MediaType::Carousel,
        _ if has_video => MediaType::Video,
        _ => MediaType::Image,
    }
}

/// Reels report `videoViewCount`; some actor versions only `videoPlayCount`.
fn views(record: &RawRecord) -> u64 {
    match count(record.get("videoViewCount")) {
        0 => count(record.get("videoPlayCount")),
        n => n,
    }
}
