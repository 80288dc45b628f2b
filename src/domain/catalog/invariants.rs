use super::entity::ItemId;
use crate::domain::{DomainError, DomainResult};

/// Derive an item id from its upstream URL
///
/// Contract: the id is the second-to-last `/`-delimited segment, i.e. the
/// numeric segment right before the final slash (`.../items/25/`).
pub fn parse_item_id(url: &str) -> DomainResult<ItemId> {
    let segments: Vec<&str> = url.split('/').collect();

    if segments.len() < 2 {
        return Err(DomainError::InvariantViolation(format!(
            "Item URL has no id segment: {}",
            url
        )));
    }

    let candidate = segments[segments.len() - 2];
    candidate.parse::<ItemId>().map_err(|_| {
        DomainError::InvariantViolation(format!(
            "Item URL segment '{}' is not a numeric id: {}",
            candidate, url
        ))
    })
}
