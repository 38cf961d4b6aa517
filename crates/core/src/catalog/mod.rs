//! Video catalog access with metadata caching

pub mod ports;
mod service;

pub use service::CatalogService;
