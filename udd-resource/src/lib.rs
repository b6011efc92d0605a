// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! Resource-to-relation mapping over the Ultimate Debian Database.
//!
//! Resource types are declared as plain schema values ([`ResourceType`])
//! and registered by path in a [`Registry`]. [`Udd`] fetches instances by
//! primary key or by equality filters, deduplicates them through a
//! process-wide identity map, and resolves computed fields lazily through
//! junction-table [`Relation`]s, caching each one on its instance.
//!
//! # Example
//!
//! ```ignore
//! use udd_resource::{Udd, Filters};
//! use udd_store_db::UddDb;
//!
//! let udd = Udd::new(UddDb::open_memory()?)?;
//! let bugs = udd.resolve("bugs")?;
//! let bug = udd.get(&bugs, &[24043.into()])?;
//! let blocks = udd.computed(&bug, "blocks")?;
//! ```

pub mod catalog;
mod error;
mod identity;
mod linked;
mod registry;
mod relation;
mod resource;
mod schema;
mod udd;

pub use error::{Error, Result};
pub use linked::Linked;
pub use registry::Registry;
pub use relation::Relation;
pub use resource::{Reference, Resource};
pub use schema::{
    Backing, ComputeFn, ComputedField, Identity, ResourceType, ResourceTypeBuilder, Strategy,
};
pub use udd::{Fetched, Filters, Udd};
