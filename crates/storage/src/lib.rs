#![forbid(unsafe_code)]

pub mod json;
pub mod repository;

pub use json::{JsonFileCatalog, parse_catalog};
pub use repository::{CatalogRepository, InMemoryCatalog, Storage, StorageError};
