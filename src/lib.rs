// src/lib.rs
// Catalog Explorer - paginated catalog browsing with search, attribute
// filters and favorites
//
// Architecture:
// - Domain-centric: filter rules and preference transitions are pure
// - Event-driven: services announce facts through the event bus
// - Explicit: one owner per piece of mutable state, no implicit fetches
// - Application Layer: the presentation-facing facade and DTOs

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    apply_filters,
    extract_abilities,
    filter_by_attributes,
    filter_by_name,
    has_active_filters,
    parse_item_id,
    reduce,
    // Catalog
    Ability,
    DetailRecord,
    // Filter
    FilterCriteria,
    ItemId,
    ItemType,
    ListItem,
    // Preferences
    PreferenceAction,
    Stat,
    UserPreferenceState,
    RECENTLY_VIEWED_LIMIT,
};

// ============================================================================
// PUBLIC API - Errors & Configuration
// ============================================================================

pub use config::ExplorerConfig;
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    CatalogEvent,
    // Details
    DetailCached,
    DetailFetchFailed,
    EventBus,
    EventLogEntry,
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

// ============================================================================
// PUBLIC API - Storage
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};
pub use repositories::{
    InMemoryPreferenceRepository, PreferenceRepository, SqlitePreferenceRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    DetailBatchReport, DetailService, PageOutcome, PaginationCursor, PaginationService,
    PreferenceService, SkipReason, ViewService,
};

// ============================================================================
// PUBLIC API - Application Layer & Integrations
// ============================================================================

pub use application::{CatalogExplorer, GridLayout, ScrollMetrics};
pub use integrations::{CatalogApi, HttpCatalogClient, ListPage};
