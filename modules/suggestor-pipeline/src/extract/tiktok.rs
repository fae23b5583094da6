use suggestor_common::{Author, ContentBody, ContentItem, MediaType, Platform, Post, Stats};

use super::{media_count, positive, url_group};
use crate::clean::cleaned;
use crate::coerce::{count, first_text, hashtags, object, text, truthy, RawRecord};

pub fn extract(record: &RawRecord) -> ContentItem {
    let video_url = first_text(record, &["webVideoUrl", "videoUrl"]);
    let author = object(record, "authorMeta");

    let post = Post {
        id: cleaned(record.get("id")),
        media_type: MediaType::Video,
        url: video_url.clone(),
        text: text(record, "text"),
        media_count: media_count(video_url.as_ref(), &[]),
        video_url,
        stats: Stats {
            views: Some(count(record.get("playCount"))),
            likes: Some(count(record.get("diggCount"))),
            comments: Some(count(record.get("commentCount"))),
            shares: Some(count(record.get("shareCount"))),
            collects: Some(count(record.get("collectCount"))),
            ..Default::default()
        },
        hashtags: hashtags(record.get("hashtags")),
        author: Author {
            name: text(author, "nickName"),
            username: text(author, "name"),
            profile_url: text(author, "profileUrl"),
            followers_count: positive(count(author.get("fans"))),
            ..Default::default()
        },
        timestamp: text(record, "createTimeISO"),
        duration: truthy(record.get("videoDuration"))
            .then(|| cleaned(record.get("videoDuration")))
            .flatten(),
        ..Default::default()
    };
    ContentItem::new(Platform::Tiktok, ContentBody::Video(post), url_group(record))
}
