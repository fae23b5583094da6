use serde_json::Value;
use suggestor_common::{Author, ContentBody, ContentItem, MediaType, Platform, Post, Stats};

use super::{media_count, url_group};
use crate::clean::cleaned;
use crate::coerce::{count, first_text, object, scan_hashtags, text, truthy, url_list, RawRecord};

pub fn extract(record: &RawRecord) -> ContentItem {
    let (media_type, video_url, image_urls) = if text(record, "type").as_deref()
        == Some("linkedinVideo")
    {
        (MediaType::Video, video_stream(record), Vec::new())
    } else if truthy(record.get("images")) {
        (MediaType::Image, None, url_list(record.get("images")))
    } else {
        (MediaType::Text, None, Vec::new())
    };

    let body = text(record, "text");
    let author = object(record, "author");

    let post = Post {
        id: cleaned(record.get("urn")),
        media_type,
        url: text(record, "url"),
        hashtags: body.as_deref().map(scan_hashtags).unwrap_or_default(),
        text: body,
        media_count: media_count(video_url.as_ref(), &image_urls),
        video_url,
        image_urls,
        stats: Stats {
            likes: Some(count(record.get("numLikes"))),
            comments: Some(count(record.get("numComments"))),
            shares: Some(count(record.get("numShares"))),
            ..Default::default()
        },
        author: Author {
            name: full_name(author),
            username: text(author, "publicId"),
            headline: text(author, "occupation"),
            profile_url: text(author, "profileUrl").or_else(|| text(record, "authorProfileUrl")),
            ..Default::default()
        },
        timestamp: first_text(record, &["postedAtISO", "postedAt"]),
        activity_description: text(record, "activityDescription"),
        ..Default::default()
    };
    ContentItem::new(Platform::Linkedin, ContentBody::Post(post), url_group(record))
}

/// First streaming location of the first progressive stream that has one.
fn video_stream(record: &RawRecord) -> Option<String> {
    let metadata = object(object(record, "linkedinVideo"), "videoPlayMetadata");
    let Some(Value::Array(streams)) = metadata.get("progressiveStreams") else {
        return None;
    };
    streams
        .iter()
        .filter_map(Value::as_object)
        .find_map(|stream| url_list(stream.get("streamingLocations")).into_iter().next())
}

fn full_name(author: &RawRecord) -> Option<String> {
    let first = text(author, "firstName").unwrap_or_default();
    let last = text(author, "lastName").unwrap_or_default();
    let name = format!("{first} {last}").trim().to_string();
    (!name.is_empty()).then_some(name)
}
