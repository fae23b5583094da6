//! Fair selection of top content across source groups.
//!
//! Every group first gets an equal base share of the target. Slots left over,
//! either from the division remainder or from groups too small to fill their
//! share, go to the best remaining items globally.

use std::collections::HashMap;

use suggestor_common::ContentItem;

use crate::score::score_item;

/// Targets smaller than requested snap down to one of these.
const PREFERRED_TARGETS: [usize; 3] = [9, 6, 3];

/// How a target was split across groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPlan {
    pub requested: usize,
    pub available: usize,
    pub groups: usize,
    pub actual_target: usize,
    pub base: usize,
    pub extra: usize,
    /// Items without a `URL_GROUP`, excluded from selection.
    pub ungrouped: usize,
}

#[derive(Debug, Default)]
pub struct Selection {
    /// Ranked, numbered `post_1..post_n`.
    pub items: Vec<ContentItem>,
    /// `None` when there was nothing to select from.
    pub plan: Option<SelectionPlan>,
}

/// Target after capping at what is available and snapping to a multiple of three.
pub fn plan_target(requested: usize, available: usize) -> usize {
    let capped = requested.min(available);
    if capped < requested {
        PREFERRED_TARGETS
            .into_iter()
            .find(|&preferred| preferred <= capped)
            .unwrap_or(capped)
    } else {
        capped
    }
}

/// Select up to `target` items, fairly across `URL_GROUP`s.
///
/// Items that carry no score yet are scored first.
pub fn select_top_content(items: Vec<ContentItem>, target: usize) -> Selection {
    let mut groups: Vec<Vec<ContentItem>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut ungrouped = 0;

    for mut item in items {
        if item.engagement_score.is_none() {
            score_item(&mut item);
        }
        let Some(key) = item.group_key().map(str::to_string) else {
            ungrouped += 1;
            continue;
        };
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(item);
    }

    if groups.is_empty() {
        return Selection::default();
    }

    for group in &mut groups {
        sort_by_score(group);
    }

    let available: usize = groups.iter().map(Vec::len).sum();
    let actual_target = plan_target(target, available);
    let base = actual_target / groups.len();
    let extra = actual_target % groups.len();

    let mut selected = Vec::with_capacity(actual_target);
    let mut pool = Vec::new();
    for group in groups.iter_mut() {
        let take = base.min(group.len());
        pool.extend(group.drain(take..));
        selected.append(group);
    }

    sort_by_score(&mut pool);
    let remaining = actual_target.saturating_sub(selected.len());
    selected.extend(pool.into_iter().take(remaining));

    sort_by_score(&mut selected);
    selected.truncate(actual_target);
    for (i, item) in selected.iter_mut().enumerate() {
        item.post_number = Some(format!("post_{}", i + 1));
    }

    Selection {
        items: selected,
        plan: Some(SelectionPlan {
            requested: target,
            available,
            groups: groups.len(),
            actual_target,
            base,
            extra,
            ungrouped,
        }),
    }
}

/// Descending by score; stable, so ties keep their current order.
fn sort_by_score(items: &mut [ContentItem]) {
    items.sort_by(|a, b| b.score().total_cmp(&a.score()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use suggestor_common::{ContentBody, Platform, Post};

    fn item(group: Option<&str>, score: f64) -> ContentItem {
        let mut item = ContentItem::new(
            Platform::Youtube,
            ContentBody::Video(Post::default()),
            group.map(str::to_string),
        );
        item.engagement_score = Some(score);
        item
    }

    #[test]
    fn target_snaps_to_multiple_of_three_when_short() {
        assert_eq!(plan_target(9, 20), 9);
        assert_eq!(plan_target(9, 7), 6);
        assert_eq!(plan_target(9, 5), 3);
        assert_eq!(plan_target(9, 2), 2);
        assert_eq!(plan_target(12, 10), 9);
        assert_eq!(plan_target(7, 40), 7);
        assert_eq!(plan_target(0, 5), 0);
    }

    #[test]
    fn ungrouped_items_are_excluded() {
        let selection = select_top_content(vec![item(None, 10.0), item(Some(""), 5.0)], 9);
        assert!(selection.items.is_empty());
        assert!(selection.plan.is_none());
    }

    #[test]
    fn ties_keep_input_order() {
        let items = ["a", "b", "c"]
            .into_iter()
            .map(|url| {
                let mut it = item(Some("g"), 1.0);
                if let ContentBody::Video(post) = &mut it.body {
                    post.url = Some(url.to_string());
                }
                it
            })
            .collect();
        let selection = select_top_content(items, 2);
        let urls: Vec<_> = selection.items.iter().filter_map(ContentItem::url).collect();
        assert_eq!(urls, vec!["a", "b"]);
        assert_eq!(selection.items[1].post_number.as_deref(), Some("post_2"));
    }

    #[test]
    fn more_groups_than_slots_favors_best_items() {
        let items = (0..5)
            .map(|i| item(Some(&format!("g{i}")), i as f64))
            .collect();
        let selection = select_top_content(items, 3);
        let plan = selection.plan.unwrap();
        assert_eq!(plan.base, 0);
        assert_eq!(plan.extra, 3);
        let scores: Vec<f64> = selection.items.iter().map(ContentItem::score).collect();
        assert_eq!(scores, vec![4.0, 3.0, 2.0]);
    }

    #[test]
    fn unscored_items_are_scored_before_ranking() {
        let mut viewed = ContentItem::new(
            Platform::Tiktok,
            ContentBody::Video(Post {
                stats: suggestor_common::Stats {
                    views: Some(100),
                    ..Default::default()
                },
                ..Default::default()
            }),
            Some("g".into()),
        );
        viewed.engagement_score = None;
        let selection = select_top_content(vec![viewed, item(Some("g"), 1.0)], 9);
        assert_eq!(selection.items[0].engagement_score, Some(20.0));
    }
}
