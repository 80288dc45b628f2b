// src/services/mod.rs
//
// Services Module - Orchestration Layer
//
// Each service exclusively owns one piece of mutable state and is the only
// place it changes. Services never hold a lock across an await point.

pub mod detail_service;
pub mod pagination_service;
pub mod preference_service;
pub mod view_service;

pub use detail_service::{DetailBatchReport, DetailService};

pub use pagination_service::{PageOutcome, PaginationCursor, PaginationService, SkipReason};

pub use preference_service::PreferenceService;

pub use view_service::ViewService;
