//! Finvault Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for manual and provider-synced
//! assets. It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate (repositories) and the `connect` crate
//! (aggregation provider client).

pub mod assets;
pub mod errors;
pub mod plaid;
pub mod users;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
