use std::collections::{HashMap, HashSet};

use crate::model::{LeaderEntity, MergedRecord};
use crate::normalize::slug;

/// Assemble the final record set from both editions' entities and the
/// secondary-to-primary link map.
///
/// Secondary-driven records come first, in secondary table order: both-sided
/// when the link resolves to a known primary entity, secondary-only
/// otherwise. Primary entities whose titles were never consumed follow, in
/// primary table order. Consumed-title tracking is a local accumulator
/// returned to the caller rather than hidden state.
pub fn assemble_records(
    primary: &[LeaderEntity],
    secondary: &[LeaderEntity],
    links: &HashMap<String, String>,
) -> (Vec<MergedRecord>, HashSet<String>) {
    let primary_by_title: HashMap<&str, &LeaderEntity> = primary
        .iter()
        .filter(|entity| !entity.page_title.is_empty())
        .map(|entity| (entity.page_title.as_str(), entity))
        .collect();

    let mut consumed = HashSet::new();
    let mut records = Vec::with_capacity(primary.len() + secondary.len());

    for entity in secondary {
        let primary_title = links.get(&entity.page_title);
        let primary_entity =
            primary_title.and_then(|title| primary_by_title.get(title.as_str()).copied());
        if let Some(title) = primary_title {
            consumed.insert(title.clone());
        }

        records.push(MergedRecord {
            id: record_id(primary_entity, entity),
            en: primary_entity.cloned(),
            fr: Some(entity.clone()),
        });
    }

    for entity in primary {
        if !entity.page_title.is_empty() && consumed.contains(&entity.page_title) {
            continue;
        }
        records.push(MergedRecord {
            id: slug(join_key(entity)),
            en: Some(entity.clone()),
            fr: None,
        });
    }

    (records, consumed)
}

fn record_id(primary: Option<&LeaderEntity>, secondary: &LeaderEntity) -> String {
    match primary {
        Some(entity) => slug(join_key(entity)),
        None => slug(join_key(secondary)),
    }
}

/// Canonical title when the entity has one; name-only entities fall back to
/// the display name so their records still carry a non-empty id.
fn join_key(entity: &LeaderEntity) -> &str {
    if entity.page_title.is_empty() {
        &entity.name
    } else {
        &entity.page_title
    }
}
