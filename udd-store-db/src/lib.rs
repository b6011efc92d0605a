// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! SQLite database interface for the Ultimate Debian Database (UDD).
//!
//! This crate provides pooled, read-mostly access to a UDD-shaped SQLite
//! database: bugs and their junction tables, developer identities, binary
//! and source packages, and popularity contest data.
//!
//! **Architecture**: This is the database layer underneath `udd-resource`.
//! Every query runs on a single-use [`Cursor`] that holds a pooled
//! connection for exactly one statement and returns it on drop.
//!
//! # Key Features
//!
//! - Bounded connection pool (`active + idle <= capacity`)
//! - Dynamic [`Value`] rows with positional column mapping
//! - Query counting and optional Prometheus metrics
//! - In-memory database for testing
//!
//! # Example
//!
//! ```ignore
//! use udd_store_db::{UddDb, Value};
//!
//! let db = UddDb::open_memory()?;
//! let rows = db
//!     .cursor()?
//!     .fetch_all("SELECT title FROM bugs WHERE id = ?1", &[Value::Integer(24043)])?;
//! ```

mod connection;
mod cursor;
mod error;
mod metrics;
mod pool;
mod schema;
mod value;
mod write;

pub use connection::{OpenMode, UddDb};
pub use cursor::{Cursor, QueryStats};
pub use error::{Error, Result};
pub use metrics::DbMetrics;
pub use pool::PoolConfig;
pub use schema::{SCHEMA_SQL, quote_ident};
pub use value::{Row, Value};
