// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! Error types for resource resolution and fetching.

use thiserror::Error;
use udd_store_db::Value;

/// Result type for resource operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving, fetching or linking resources.
#[derive(Error, Debug)]
pub enum Error {
    /// No resource type is registered under this path
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// A primary-key fetch matched no row in any backing table
    #[error("Object not found: {resource}/{key}")]
    ObjectNotFound { resource: &'static str, key: String },

    /// A junction row references a key absent from every candidate type
    #[error(
        "Corrupted database: {resource}/{key} links through '{relation}' to {target}, which does not exist"
    )]
    CorruptedDatabase {
        resource: &'static str,
        relation: &'static str,
        key: String,
        target: String,
    },

    /// Two resource types declare the same path
    #[error("Duplicate resource path: {0}")]
    DuplicatePath(&'static str),

    /// A backing table returned a row whose width differs from the declared fields
    #[error("Table '{table}' returned {found} columns, but resource '{resource}' declares {expected} fields")]
    FieldCountMismatch {
        resource: &'static str,
        table: &'static str,
        expected: usize,
        found: usize,
    },

    /// A filter names a field the resource does not declare
    #[error("Unknown filter '{field}' for resource '{resource}'")]
    UnknownFilter { resource: &'static str, field: String },

    /// A name is declared twice among direct and computed fields
    #[error("Field '{field}' is declared twice on resource '{resource}'")]
    FieldCollision {
        resource: &'static str,
        field: &'static str,
    },

    /// Primary key given with the wrong number of components
    #[error("Resource '{resource}' has a primary key of {expected} fields, got {found}")]
    InvalidPrimaryKey {
        resource: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Unknown computed field '{field}' for resource '{resource}'")]
    UnknownComputedField { resource: &'static str, field: String },

    /// A resource type declaration is inconsistent
    #[error("Invalid declaration of resource '{resource}': {reason}")]
    InvalidDeclaration {
        resource: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Store(#[from] udd_store_db::Error),
}

impl Error {
    /// Whether the caller asked for something that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ResourceNotFound(_) | Error::ObjectNotFound { .. }
        )
    }

    /// Whether the declared schema and the deployed database or code have
    /// drifted apart.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::DuplicatePath(_)
                | Error::FieldCountMismatch { .. }
                | Error::FieldCollision { .. }
                | Error::InvalidDeclaration { .. }
                | Error::UnknownComputedField { .. }
        )
    }
}

/// Render a primary-key tuple as `a/b/c`.
pub(crate) fn display_key(key: &[Value]) -> String {
    key.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/")
}
