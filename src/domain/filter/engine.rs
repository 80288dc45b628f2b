// Filter & search rules
//
// Every function here is pure: no I/O, no mutation of inputs, and the
// relative order of the input collection is always preserved.

use std::collections::{BTreeSet, HashMap};

use super::criteria::FilterCriteria;
use crate::domain::catalog::{DetailRecord, ItemId, ListItem};

/// Case-insensitive substring match on the item name
///
/// An empty or whitespace-only query keeps every item.
pub fn filter_by_name(items: &[ListItem], query: &str) -> Vec<ListItem> {
    let normalized = query.trim().to_lowercase();
    if normalized.is_empty() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&normalized))
        .cloned()
        .collect()
}

pub fn has_active_filters(criteria: &FilterCriteria) -> bool {
    criteria.is_active()
}

/// Keep items whose detail record satisfies every active constraint
///
/// Items without a cached detail are excluded whenever any constraint is
/// active, since unknown attributes cannot satisfy it.
pub fn filter_by_attributes(
    items: &[ListItem],
    details: &HashMap<ItemId, DetailRecord>,
    criteria: &FilterCriteria,
) -> Vec<ListItem> {
    if !has_active_filters(criteria) {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|item| {
            details
                .get(&item.id)
                .is_some_and(|detail| matches_criteria(detail, criteria))
        })
        .cloned()
        .collect()
}

/// Name search followed by the attribute filter
pub fn apply_filters(
    items: &[ListItem],
    details: &HashMap<ItemId, DetailRecord>,
    query: &str,
    criteria: &FilterCriteria,
) -> Vec<ListItem> {
    let by_name = filter_by_name(items, query);
    filter_by_attributes(&by_name, details, criteria)
}

/// All ability names across the given details, deduplicated and sorted
pub fn extract_abilities<'a, I>(details: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a DetailRecord>,
{
    let names: BTreeSet<&str> = details
        .into_iter()
        .flat_map(|detail| detail.ability_names())
        .collect();

    names.into_iter().map(str::to_string).collect()
}

fn matches_criteria(detail: &DetailRecord, criteria: &FilterCriteria) -> bool {
    within(detail.height, criteria.min_height, criteria.max_height)
        && within(detail.weight, criteria.min_weight, criteria.max_weight)
        && has_matching_ability(detail, &criteria.abilities)
}

fn within(value: u32, min: Option<u32>, max: Option<u32>) -> bool {
    if min.is_some_and(|min| value < min) {
        return false;
    }
    if max.is_some_and(|max| value > max) {
        return false;
    }
    true
}

fn has_matching_ability(detail: &DetailRecord, wanted: &BTreeSet<String>) -> bool {
    wanted.is_empty() || detail.ability_names().any(|name| wanted.contains(name))
}
