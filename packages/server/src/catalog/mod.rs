//! The catalog aggregate engine.
//!
//! Everything in here is independent of the HTTP layer: operations take an
//! explicit database handle, a typed [`AdminId`] and already-validated input,
//! and return either the materialized aggregate or a [`CatalogError`].

pub mod category;
pub mod error;
pub mod guard;
pub mod product;
pub mod reconcile;
pub mod repo;
pub mod store;
pub mod tree;
pub mod tx;
pub mod variant;

pub use error::CatalogError;
pub use guard::AdminId;
