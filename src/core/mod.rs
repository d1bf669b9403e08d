//! Core business logic - framework-agnostic catalog and pricing operations.
//! Functions here take a `DatabaseConnection` explicitly so tests can
//! substitute an in-memory database.

pub mod pricing;
pub mod products;
