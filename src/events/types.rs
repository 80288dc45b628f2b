// events/types.rs
//
// All catalog events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events carry only the data needed to react
// - Events are emitted after the emitting service released its state lock

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ItemId;

/// Trait that all catalog events must implement
pub trait CatalogEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// PAGINATION EVENTS
// ============================================================================

/// Emitted when a list page was fetched and merged into the collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLoaded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub page_index: u32,
    /// Items that were not already in the collection
    pub new_items: usize,
    pub total_count: u32,
    pub has_next_page: bool,
}

impl PageLoaded {
    pub fn new(page_index: u32, new_items: usize, total_count: u32, has_next_page: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            page_index,
            new_items,
            total_count,
            has_next_page,
        }
    }
}

impl CatalogEvent for PageLoaded {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "PageLoaded" }
}

/// Emitted when a list page fetch failed; cursor and collection are unchanged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLoadFailed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub page_index: u32,
    pub message: String,
}

impl PageLoadFailed {
    pub fn new(page_index: u32, message: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            page_index,
            message,
        }
    }
}

impl CatalogEvent for PageLoadFailed {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "PageLoadFailed" }
}

// ============================================================================
// DETAIL EVENTS
// ============================================================================

/// Emitted when a detail record entered the cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailCached {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub item_id: ItemId,
}

impl DetailCached {
    pub fn new(item_id: ItemId) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            item_id,
        }
    }
}

impl CatalogEvent for DetailCached {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "DetailCached" }
}

/// Emitted when a single detail fetch failed (isolated to that id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailFetchFailed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub item_id: ItemId,
    pub message: String,
}

impl DetailFetchFailed {
    pub fn new(item_id: ItemId, message: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            item_id,
            message,
        }
    }
}

impl CatalogEvent for DetailFetchFailed {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "DetailFetchFailed" }
}

// ============================================================================
// VIEW EVENTS
// ============================================================================

/// Emitted when the name query or the attribute criteria changed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub name_query: String,
    pub criteria_active: bool,
}

impl FiltersChanged {
    pub fn new(name_query: String, criteria_active: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            name_query,
            criteria_active,
        }
    }
}

impl CatalogEvent for FiltersChanged {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "FiltersChanged" }
}

// ============================================================================
// PREFERENCE EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteToggled {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub item_id: ItemId,
    pub is_favorite: bool,
}

impl FavoriteToggled {
    pub fn new(item_id: ItemId, is_favorite: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            item_id,
            is_favorite,
        }
    }
}

impl CatalogEvent for FavoriteToggled {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "FavoriteToggled" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemViewed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub item_id: ItemId,
}

impl ItemViewed {
    pub fn new(item_id: ItemId) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            item_id,
        }
    }
}

impl CatalogEvent for ItemViewed {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ItemViewed" }
}

/// Emitted once, when persisted preferences replaced the in-memory state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesHydrated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub favorite_count: usize,
    pub recently_viewed_count: usize,
}

impl PreferencesHydrated {
    pub fn new(favorite_count: usize, recently_viewed_count: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            favorite_count,
            recently_viewed_count,
        }
    }
}

impl CatalogEvent for PreferencesHydrated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "PreferencesHydrated" }
}
