// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeSeq, Serializer};
use udd_store_db::Value;

use crate::resource::Resource;

/// Value of a computed field.
#[derive(Debug, Clone, PartialEq)]
pub enum Linked {
    /// One junction column per row.
    Scalars(Vec<Value>),
    /// Several junction columns per row.
    Tuples(Vec<Vec<Value>>),
    /// Rows resolved to resources.
    Objects(Vec<Arc<Resource>>),
    /// Rows keyed by their leading column.
    Keyed(BTreeMap<String, Vec<Value>>),
}

impl Linked {
    pub fn len(&self) -> usize {
        match self {
            Linked::Scalars(v) => v.len(),
            Linked::Tuples(v) => v.len(),
            Linked::Objects(v) => v.len(),
            Linked::Keyed(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_scalars(&self) -> Option<&[Value]> {
        match self {
            Linked::Scalars(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_tuples(&self) -> Option<&[Vec<Value>]> {
        match self {
            Linked::Tuples(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_objects(&self) -> Option<&[Arc<Resource>]> {
        match self {
            Linked::Objects(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_keyed(&self) -> Option<&BTreeMap<String, Vec<Value>>> {
        match self {
            Linked::Keyed(v) => Some(v),
            _ => None,
        }
    }
}

// Embedded resources serialize as references so that cycles such as
// merged_with never expand.
impl Serialize for Linked {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Linked::Scalars(values) => values.serialize(serializer),
            Linked::Tuples(rows) => rows.serialize(serializer),
            Linked::Keyed(map) => map.serialize(serializer),
            Linked::Objects(objects) => {
                let mut seq = serializer.serialize_seq(Some(objects.len()))?;
                for object in objects {
                    seq.serialize_element(&object.reference())?;
                }
                seq.end()
            }
        }
    }
}
