//! Per-platform field extractors.
//!
//! Each extractor maps one raw scraper record to a [`ContentItem`]. They never
//! fail on malformed input: missing or mistyped fields fall back to empty
//! values and zero counts. Only a thread with no tweets yields `None`.

pub mod instagram;
pub mod linkedin;
pub mod tiktok;
pub mod twitter;
pub mod youtube;

use suggestor_common::{ContentItem, Platform};

use crate::coerce::{text, RawRecord};

/// Dispatch a record to its platform's extractor.
pub fn extract(platform: Platform, record: &RawRecord) -> Option<ContentItem> {
    match platform {
        Platform::Twitter => twitter::extract(record),
        Platform::Instagram => Some(instagram::extract(record)),
        Platform::Linkedin => Some(linkedin::extract(record)),
        Platform::Youtube => Some(youtube::extract(record)),
        Platform::Tiktok => Some(tiktok::extract(record)),
    }
}

pub(crate) fn url_group(record: &RawRecord) -> Option<String> {
    text(record, "URL_GROUP")
}

/// One slot for a video URL plus one per image URL.
pub(crate) fn media_count(video_url: Option<&String>, image_urls: &[String]) -> u64 {
    u64::from(video_url.is_some()) + image_urls.len() as u64
}

/// Followers-style counts are reported only when positive.
pub(crate) fn positive(n: u64) -> Option<u64> {
    (n > 0).then_some(n)
}
