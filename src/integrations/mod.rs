// src/integrations/mod.rs
//
// External Integrations Module

pub mod catalog_api;

pub use catalog_api::{CatalogApi, HttpCatalogClient, ListPage};

#[cfg(test)]
pub use catalog_api::MockCatalogApi;
