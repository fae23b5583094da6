//! Selection properties over hand-built score tables.

use std::collections::HashMap;

use suggestor_common::{ContentBody, ContentItem, Platform, Post};
use suggestor_pipeline::select_top_content;

fn item(group: &str, score: f64) -> ContentItem {
    let mut item = ContentItem::new(
        Platform::Instagram,
        ContentBody::Post(Post {
            url: Some(format!("{group}#{score}")),
            ..Default::default()
        }),
        Some(group.to_string()),
    );
    item.engagement_score = Some(score);
    item
}

fn groups(sizes: &[usize]) -> Vec<ContentItem> {
    let mut items = Vec::new();
    for (g, &size) in sizes.iter().enumerate() {
        for i in 0..size {
            // Deterministic, varied scores that interleave across groups.
            let score = ((g * 37 + i * 53) % 101) as f64 + 0.5;
            items.push(item(&format!("https://www.instagram.com/g{g}/"), score));
        }
    }
    items
}

fn per_group(items: &[ContentItem]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(item.url_group.clone().unwrap()).or_insert(0) += 1;
    }
    counts
}

#[test]
fn fair_distribution_backfills_undersized_group() {
    let mut items = Vec::new();
    for s in [50.0, 40.0, 30.0, 20.0, 10.0] {
        items.push(item("a", s));
    }
    for s in [45.0, 35.0, 25.0] {
        items.push(item("b", s));
    }
    items.push(item("c", 5.0));

    let selection = select_top_content(items, 9);
    let plan = selection.plan.as_ref().unwrap();
    assert_eq!(plan.actual_target, 9);
    assert_eq!(plan.base, 3);
    assert_eq!(plan.extra, 0);

    assert_eq!(selection.items.len(), 9);
    let counts = per_group(&selection.items);
    assert_eq!(counts["a"], 5);
    assert_eq!(counts["b"], 3);
    assert_eq!(counts["c"], 1);

    let scores: Vec<f64> = selection.items.iter().map(ContentItem::score).collect();
    assert_eq!(scores, vec![50.0, 45.0, 40.0, 35.0, 30.0, 25.0, 20.0, 10.0, 5.0]);
    let labels: Vec<&str> = selection
        .items
        .iter()
        .filter_map(|i| i.post_number.as_deref())
        .collect();
    assert_eq!(labels.first(), Some(&"post_1"));
    assert_eq!(labels.last(), Some(&"post_9"));
}

#[test]
fn seven_items_snap_to_six() {
    for sizes in [[3, 2, 2], [5, 1, 1], [1, 1, 5], [4, 2, 1]] {
        let selection = select_top_content(groups(&sizes), 9);
        assert_eq!(selection.items.len(), 6, "sizes {sizes:?}");
    }
}

#[test]
fn selection_is_capped_and_fair() {
    let layouts: &[&[usize]] = &[
        &[1],
        &[2],
        &[10],
        &[1, 1],
        &[4, 4],
        &[9, 1, 1],
        &[3, 3, 3],
        &[2, 7, 0, 5],
        &[1, 1, 1, 1, 1],
        &[6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6],
    ];
    for &sizes in layouts {
        for target in [0, 1, 3, 5, 6, 9, 12] {
            let available: usize = sizes.iter().sum();
            let selection = select_top_content(groups(sizes), target);
            let selected = selection.items.len();
            assert!(selected <= target, "{sizes:?} T={target}: {selected} > target");
            assert!(selected <= available, "{sizes:?} T={target}: {selected} > available");

            let Some(plan) = selection.plan else {
                assert_eq!(selected, 0);
                continue;
            };
            assert_eq!(selected, plan.actual_target, "{sizes:?} T={target}");

            let counts = per_group(&selection.items);
            for (g, &size) in sizes.iter().enumerate() {
                let key = format!("https://www.instagram.com/g{g}/");
                let got = counts.get(&key).copied().unwrap_or(0);
                assert!(
                    got >= plan.base.min(size),
                    "{sizes:?} T={target}: group {g} got {got}, base {}",
                    plan.base
                );
            }

            let scores: Vec<f64> = selection.items.iter().map(ContentItem::score).collect();
            assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{sizes:?} not ranked");
        }
    }
}

#[test]
fn empty_input_selects_nothing() {
    let selection = select_top_content(Vec::new(), 9);
    assert!(selection.items.is_empty());
    assert!(selection.plan.is_none());
}
