// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic (fallbacks and retries live in services)
// - NO event emission
// - Explicit SQL only

pub mod preference_repository;

pub use preference_repository::{
    InMemoryPreferenceRepository, PreferenceRepository, SqlitePreferenceRepository,
};
