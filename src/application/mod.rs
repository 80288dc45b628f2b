// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - This layer sits ABOVE the services
// - It is the boundary between the presentation layer and the services
// - It translates domain entities into DTOs

pub mod dto;
pub mod error_handling;
pub mod explorer;
pub mod grid;

pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use explorer::CatalogExplorer;
pub use grid::{GridLayout, GridRow, ScrollMetrics, NEAR_BOTTOM_THRESHOLD_PX};
