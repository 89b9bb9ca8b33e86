//! Tag statistics over the full record set.
//!
//! These never look at the active view configuration.

use crate::models::MediaRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Per-tag record counts in first-encounter order.
///
/// A record repeating the same tag is counted once.
fn counts_in_encounter_order(records: &[MediaRecord]) -> Vec<TagCount> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<TagCount> = Vec::new();

    for record in records {
        let mut seen_in_record: Vec<&str> = Vec::with_capacity(record.tags.len());
        for tag in &record.tags {
            if seen_in_record.contains(&tag.as_str()) {
                continue;
            }
            seen_in_record.push(tag.as_str());

            match positions.get(tag.as_str()) {
                Some(&index) => counts[index].count += 1,
                None => {
                    positions.insert(tag.as_str(), counts.len());
                    counts.push(TagCount {
                        tag: tag.clone(),
                        count: 1,
                    });
                }
            }
        }
    }

    counts
}

/// Number of records carrying each tag.
pub fn tag_counts(records: &[MediaRecord]) -> HashMap<String, usize> {
    counts_in_encounter_order(records)
        .into_iter()
        .map(|tc| (tc.tag, tc.count))
        .collect()
}

/// Most used tags, highest count first.
///
/// Tags with equal counts keep the order in which they were first seen.
pub fn popular_tags(records: &[MediaRecord], limit: usize) -> Vec<TagCount> {
    let mut counts = counts_in_encounter_order(records);
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// Every distinct tag, lexicographically ordered.
pub fn all_tags(records: &[MediaRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
