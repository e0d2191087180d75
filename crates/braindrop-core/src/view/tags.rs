//! Tag summaries for a view.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::RaindropView;
use crate::models::Tag;

/// How a tag list should be ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagOrder {
    /// Alphabetical, ignoring case
    #[default]
    Name,
    /// Most used first, then alphabetical
    Count,
}

/// A tag and how many raindrops in a view carry it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: Tag,
    pub count: usize,
}

impl RaindropView {
    /// Every tag used in the view, with usage counts.
    pub fn tags(&self, order: TagOrder) -> Vec<TagCount> {
        let mut counts: BTreeMap<&Tag, usize> = BTreeMap::new();
        for raindrop in self.iter() {
            for tag in &raindrop.tags {
                *counts.entry(tag).or_default() += 1;
            }
        }

        let mut tags = counts
            .into_iter()
            .map(|(tag, count)| TagCount {
                tag: tag.clone(),
                count,
            })
            .collect::<Vec<_>>();

        if order == TagOrder::Count {
            // Stable sort keeps the alphabetical order within equal counts.
            tags.sort_by(|left, right| right.count.cmp(&left.count));
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CollectionId, Raindrop, RaindropId};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn view() -> RaindropView {
        let make = |id, tags: &[&str]| {
            Arc::new(
                Raindrop::new(RaindropId::new(id), CollectionId::new(1))
                    .with_tags(tags.iter().copied()),
            )
        };
        RaindropView::new(
            "All",
            [
                make(1, &["rust", "Async"]),
                make(2, &["Rust"]),
                make(3, &["go", "async"]),
                make(4, &["rust", "zig"]),
            ],
        )
    }

    fn summary(tags: &[TagCount]) -> Vec<(String, usize)> {
        tags.iter()
            .map(|entry| (entry.tag.folded().to_string(), entry.count))
            .collect()
    }

    #[test]
    fn tags_by_name_merge_case_variants() {
        assert_eq!(
            summary(&view().tags(TagOrder::Name)),
            vec![
                ("async".to_string(), 2),
                ("go".to_string(), 1),
                ("rust".to_string(), 3),
                ("zig".to_string(), 1),
            ]
        );
    }

    #[test]
    fn tags_by_count_put_popular_first() {
        assert_eq!(
            summary(&view().tags(TagOrder::Count)),
            vec![
                ("rust".to_string(), 3),
                ("async".to_string(), 2),
                ("go".to_string(), 1),
                ("zig".to_string(), 1),
            ]
        );
    }

    #[test]
    fn tags_follow_the_filtered_view() {
        let narrowed = view().tagged(&Tag::new("go"));
        assert_eq!(
            summary(&narrowed.tags(TagOrder::Name)),
            vec![("async".to_string(), 1), ("go".to_string(), 1)]
        );
    }
}
