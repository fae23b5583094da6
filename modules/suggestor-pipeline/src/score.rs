//! Engagement scoring. Each platform weights the metrics it exposes; missing
//! metrics count as zero and scores are never negative.

use suggestor_common::{ContentItem, Platform, Stats};

pub fn engagement_score(platform: Platform, stats: &Stats) -> f64 {
    let m = |v: Option<u64>| v.unwrap_or(0) as f64;
    let score = match platform {
        Platform::Twitter => {
            m(stats.views) * 0.3 + m(stats.likes) * 2.0 + m(stats.retweets) * 3.0 + m(stats.replies) * 1.5
        }
        Platform::Linkedin => m(stats.comments) * 5.0 + m(stats.likes),
        Platform::Youtube => m(stats.views) * 0.1,
        Platform::Tiktok => m(stats.views) * 0.2,
        Platform::Instagram => m(stats.views) * 0.5,
    };
    score.max(0.0)
}

/// Score an item from its scoring stats (a thread's combined stats) and
/// record the result on it.
pub fn score_item(item: &mut ContentItem) -> f64 {
    let score = engagement_score(item.platform, item.scoring_stats());
    item.engagement_score = Some(score);
    score
}
