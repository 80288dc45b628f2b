pub mod client;

pub use client::{CatalogApi, HttpCatalogClient, ListPage};

#[cfg(test)]
pub use client::MockCatalogApi;
