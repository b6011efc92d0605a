// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! Resource instances.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::ser::{Serialize, SerializeMap, Serializer};
use udd_store_db::{Row, Value};

use crate::error::{Error, Result};
use crate::linked::Linked;
use crate::schema::{Identity, ResourceType};

/// One fetched row of a resource type.
///
/// Field values and the primary key are fixed at construction. Each
/// computed field has its own slot, filled at most once.
pub struct Resource {
    ty: Arc<ResourceType>,
    table: &'static str,
    key: Vec<Value>,
    values: Row,
    computed: Vec<Mutex<Option<Arc<Linked>>>>,
}

impl Resource {
    /// Map a row positionally onto `ty`.
    pub(crate) fn from_row(ty: &Arc<ResourceType>, table: &'static str, values: Row) -> Result<Self> {
        if values.len() != ty.fields().len() {
            return Err(Error::FieldCountMismatch {
                resource: ty.path(),
                table,
                expected: ty.fields().len(),
                found: values.len(),
            });
        }
        let key = ty.key_indices().iter().map(|&i| values[i].clone()).collect();
        let computed = ty.computed().iter().map(|_| Mutex::new(None)).collect();
        Ok(Self {
            ty: Arc::clone(ty),
            table,
            key,
            values,
            computed,
        })
    }

    pub fn resource_type(&self) -> &Arc<ResourceType> {
        &self.ty
    }

    pub fn path(&self) -> &'static str {
        self.ty.path()
    }

    /// Backing table this row was read from.
    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn key(&self) -> &[Value] {
        &self.key
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.ty.field_index(field).map(|i| &self.values[i])
    }

    /// Direct fields paired with their values, in declared order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.ty.fields().iter().copied().zip(&self.values)
    }

    /// Primary-key-only view used when this resource is embedded.
    pub fn reference(&self) -> Reference<'_> {
        Reference(self)
    }

    /// Cached value of computed field `index`, or the result of `compute`.
    ///
    /// The slot stays locked while computing, so concurrent callers wait
    /// for the first result instead of querying again. Errors are not
    /// cached.
    pub(crate) fn cached_or_compute(
        &self,
        index: usize,
        compute: impl FnOnce() -> Result<Linked>,
    ) -> Result<Arc<Linked>> {
        let mut slot = self.computed[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = slot.as_ref() {
            return Ok(Arc::clone(cached));
        }
        let value = Arc::new(compute()?);
        *slot = Some(Arc::clone(&value));
        Ok(value)
    }

    /// Whether computed field `name` has already been resolved.
    pub fn is_cached(&self, name: &str) -> bool {
        self.ty.computed_index(name).is_some_and(|i| {
            self.computed[i]
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_some()
        })
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        let same_table = match self.ty.identity() {
            Identity::Singleton => true,
            Identity::PerTable => self.table == other.table,
        };
        self.path() == other.path() && same_table && self.key == other.key
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("path", &self.path())
            .field("table", &self.table)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Serializes only the primary-key fields of a resource.
pub struct Reference<'a>(&'a Resource);

impl Serialize for Reference<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let primary_key = self.0.ty.primary_key();
        let mut map = serializer.serialize_map(Some(primary_key.len()))?;
        for (field, value) in primary_key.iter().zip(&self.0.key) {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}
