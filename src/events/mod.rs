// src/events/mod.rs
//
// Internal Event System - Public API
//
// CRITICAL: EventHandler is INTERNAL and must NOT be exported

pub mod bus;
pub mod types;

pub use types::CatalogEvent;

pub use types::{
    // Details
    DetailCached,
    DetailFetchFailed,
    // Preferences
    FavoriteToggled,
    // View
    FiltersChanged,
    ItemViewed,
    // Pagination
    PageLoadFailed,
    PageLoaded,
    PreferencesHydrated,
};

pub use bus::{EventBus, EventLogEntry};
