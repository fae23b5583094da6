//! Routes raw scraper records to the right extractor.
//!
//! A record's platform comes from its explicit `platform` tag when present,
//! otherwise from the domain of its `URL_GROUP`. Records that are not objects,
//! or whose platform cannot be determined, are dropped with a warning.

use std::collections::BTreeMap;

use serde_json::Value;
use suggestor_common::{ContentItem, Platform};
use tracing::{debug, warn};

use crate::coerce::{text, RawRecord};
use crate::extract;

#[derive(Debug, Clone, Copy, Default)]
pub struct RouteOptions {
    /// Keep only Instagram records whose raw `type` is `Video`.
    pub instagram_videos_only: bool,
}

#[derive(Debug, Default)]
pub struct RouteOutcome {
    pub items: Vec<ContentItem>,
    pub per_platform: BTreeMap<Platform, usize>,
    /// Records that could not be routed or extracted.
    pub dropped: usize,
    /// Records deliberately skipped by [`RouteOptions`].
    pub filtered: usize,
}

/// Platform for one record. An unrecognized explicit tag is not overridden
/// by the URL.
pub fn detect_platform(record: &RawRecord) -> Option<Platform> {
    match record.get("platform") {
        Some(Value::String(tag)) => Platform::from_tag(tag),
        Some(Value::Null) | None => text(record, "URL_GROUP").and_then(|g| Platform::from_url(&g)),
        Some(_) => None,
    }
}

/// Convert raw records into canonical items, preserving input order.
pub fn route_records(records: &[Value], options: RouteOptions) -> RouteOutcome {
    let mut outcome = RouteOutcome::default();

    for (index, raw) in records.iter().enumerate() {
        let Some(record) = raw.as_object() else {
            warn!(index, "Skipping record that is not a JSON object");
            outcome.dropped += 1;
            continue;
        };

        let Some(platform) = detect_platform(record) else {
            warn!(
                index,
                url_group = ?text(record, "URL_GROUP"),
                "Could not determine platform, skipping record"
            );
            outcome.dropped += 1;
            continue;
        };

        if platform == Platform::Instagram
            && options.instagram_videos_only
            && text(record, "type").as_deref() != Some("Video")
        {
            debug!(index, "Skipping non-video Instagram record");
            outcome.filtered += 1;
            continue;
        }

        match extract::extract(platform, record) {
            Some(item) => {
                debug!(
                    index,
                    platform = %platform,
                    content_type = item.content_type(),
                    media_type = %item.media_type(),
                    "Extracted record"
                );
                *outcome.per_platform.entry(platform).or_default() += 1;
                outcome.items.push(item);
            }
            None => {
                warn!(index, platform = %platform, "Extractor produced nothing, skipping record");
                outcome.dropped += 1;
            }
        }
    }

    outcome
}
