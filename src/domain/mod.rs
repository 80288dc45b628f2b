// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file declares all domain modules and re-exports their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod catalog;
pub mod filter;
pub mod preferences;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Catalog
pub use catalog::{parse_item_id, Ability, DetailRecord, ItemId, ItemType, ListItem, Stat};

// Filter & search (pure)
pub use filter::{
    apply_filters, extract_abilities, filter_by_attributes, filter_by_name, has_active_filters,
    FilterCriteria,
};

// Preferences
pub use preferences::{reduce, PreferenceAction, UserPreferenceState, RECENTLY_VIEWED_LIMIT};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
