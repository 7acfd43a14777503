//! SQLite storage implementation for Finvault.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `finvault-core` and contains:
//! - Database connection pooling and the single-writer actor
//! - Diesel migrations, including the seeded asset catalog
//! - Repository implementations for users, manual assets and Plaid asset reports
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! ```text
//! core (domain)          connect (plaid)
//!       │                      │
//!       └──────────┬───────────┘
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod assets;
pub mod plaid;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from finvault-core for convenience
pub use finvault_core::errors::{DatabaseError, Error, Result};
