use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::catalog::ItemId;

/// Maximum number of entries kept in the recently-viewed history
pub const RECENTLY_VIEWED_LIMIT: usize = 10;

/// Persisted user preferences
///
/// Serialized as `{"favorites": [...], "recentlyViewed": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferenceState {
    /// Order is insignificant
    #[serde(default)]
    pub favorites: BTreeSet<ItemId>,

    /// Most recent first, no duplicates, at most RECENTLY_VIEWED_LIMIT entries
    #[serde(default)]
    pub recently_viewed: Vec<ItemId>,
}

impl UserPreferenceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_favorite(&self, id: ItemId) -> bool {
        self.favorites.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty() && self.recently_viewed.is_empty()
    }
}
