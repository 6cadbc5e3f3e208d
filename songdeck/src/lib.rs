//! # Songdeck
//!
//! Client for a remote song catalog. Keeps a local copy of the collection in
//! step with the Catalog API:
//! - HTTP transport behind the `CatalogApi` trait
//! - Snapshot cache with whole-collection replacement
//! - Optimistic delete with rollback
//! - Localized notifications for every mutation outcome

pub mod api;
pub mod cache;
pub mod catalog;
pub mod error;
pub mod mutation;
pub mod state;

pub use api::{CatalogApi, HttpCatalogApi};
pub use catalog::CatalogClient;
pub use error::{ApiError, CatalogError, Operation};
pub use state::LoadStatus;
