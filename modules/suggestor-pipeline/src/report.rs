//! Human-readable progress summaries. Diagnostic output only.

use std::collections::BTreeMap;

use suggestor_common::{ContentItem, Platform};
use tracing::info;

use crate::router::RouteOutcome;
use crate::select::Selection;

const TOP_PREVIEW: usize = 3;

/// `@handle` from the last path segment of a group URL.
pub fn group_display_name(url_group: Option<&str>) -> String {
    url_group
        .map(|g| g.trim_end_matches('/'))
        .and_then(|g| g.rsplit('/').next())
        .map(|seg| seg.trim_start_matches('@'))
        .filter(|seg| !seg.is_empty())
        .map(|seg| format!("@{seg}"))
        .unwrap_or_else(|| "Unknown".to_string())
}

pub fn platform_counts(items: &[ContentItem]) -> BTreeMap<Platform, usize> {
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(item.platform).or_default() += 1;
    }
    counts
}

/// Per-group counts in first-seen order.
pub fn group_counts(items: &[ContentItem]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for item in items {
        let name = group_display_name(item.group_key());
        match counts.iter_mut().find(|(n, _)| *n == name) {
            Some((_, c)) => *c += 1,
            None => counts.push((name, 1)),
        }
    }
    counts
}

pub fn log_extraction_summary(outcome: &RouteOutcome) {
    info!("Extraction summary:");
    for (platform, count) in &outcome.per_platform {
        info!("  {}: {} items", platform.title(), count);
    }
    info!(
        total = outcome.items.len(),
        dropped = outcome.dropped,
        filtered = outcome.filtered,
        "  Total items"
    );
}

pub fn log_selection_summary(selection: &Selection) {
    let Some(plan) = &selection.plan else {
        info!("No content with a source group to select from");
        return;
    };

    info!(
        groups = plan.groups,
        available = plan.available,
        requested = plan.requested,
        actual_target = plan.actual_target,
        base = plan.base,
        extra = plan.extra,
        "Selection plan"
    );
    if plan.ungrouped > 0 {
        info!(ungrouped = plan.ungrouped, "Items without a source group were excluded");
    }
    if plan.actual_target < plan.requested {
        info!(
            "Only {} items available, selecting {} (multiple of 3 where possible)",
            plan.available, plan.actual_target
        );
    }

    let items = &selection.items;
    let total: f64 = items.iter().map(ContentItem::score).sum();
    info!("Selected {} items, total engagement score {:.2}", items.len(), total);

    info!("Platform distribution:");
    for (platform, count) in platform_counts(items) {
        info!("  {}: {} items", platform.title(), count);
    }
    info!("Group distribution:");
    for (group, count) in group_counts(items) {
        info!("  {}: {} items", group, count);
    }

    info!("Top {}:", TOP_PREVIEW.min(items.len()));
    for item in items.iter().take(TOP_PREVIEW) {
        info!(
            "  {} {} {} ({}) score {:.2}",
            item.post_number.as_deref().unwrap_or("-"),
            item.platform.title(),
            item.content_type(),
            group_display_name(item.group_key()),
            item.score()
        );
    }
}
