//! Model catalog: cached, coalesced model listing.

pub mod cache;

pub use cache::{CatalogError, ModelCatalogCache};
