// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! Process-wide identity map.
//!
//! Entries hold weak references: two fetches of the same key return the
//! same instance for as long as one of them is alive. Dead entries are
//! swept whenever the map has doubled since the previous sweep, so memory
//! follows the number of live instances rather than every key ever seen.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tracing::trace;
use udd_store_db::Value;

use crate::resource::Resource;
use crate::schema::{Identity, ResourceType};

const MIN_SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct IdentityKey {
    path: &'static str,
    table: Option<&'static str>,
    key: Vec<Value>,
}

struct Entries {
    map: HashMap<IdentityKey, Weak<Resource>>,
    sweep_at: usize,
}

pub(crate) struct IdentityMap {
    entries: Mutex<Entries>,
}

impl Default for IdentityMap {
    fn default() -> Self {
        Self {
            entries: Mutex::new(Entries {
                map: HashMap::new(),
                sweep_at: MIN_SWEEP_THRESHOLD,
            }),
        }
    }
}

impl IdentityMap {
    /// Live instance of a singleton type, if any.
    ///
    /// Per-table types always miss: their identity depends on the table a
    /// row is found in, which is unknown until the row is fetched.
    pub(crate) fn lookup(&self, ty: &ResourceType, key: &[Value]) -> Option<Arc<Resource>> {
        if ty.identity() != Identity::Singleton {
            return None;
        }
        let id = IdentityKey {
            path: ty.path(),
            table: None,
            key: key.to_vec(),
        };
        self.lock().map.get(&id).and_then(Weak::upgrade)
    }

    /// Return the live instance equal to `resource`, registering it if
    /// there is none.
    pub(crate) fn intern(&self, resource: Resource) -> Arc<Resource> {
        let ty = resource.resource_type();
        let id = IdentityKey {
            path: ty.path(),
            table: match ty.identity() {
                Identity::Singleton => None,
                Identity::PerTable => Some(resource.table()),
            },
            key: resource.key().to_vec(),
        };

        let mut entries = self.lock();
        if let Some(live) = entries.map.get(&id).and_then(Weak::upgrade) {
            return live;
        }

        let resource = Arc::new(resource);
        entries.map.insert(id, Arc::downgrade(&resource));
        if entries.map.len() >= entries.sweep_at {
            let before = entries.map.len();
            entries.map.retain(|_, weak| weak.strong_count() > 0);
            entries.sweep_at = (entries.map.len() * 2).max(MIN_SWEEP_THRESHOLD);
            trace!(
                "Swept identity map: {before} -> {} entries",
                entries.map.len()
            );
        }
        resource
    }

    /// Like [`IdentityMap::intern`], and also index a singleton under
    /// `requested` when it differs from the row's own key.
    ///
    /// Keys from URLs arrive as text while the row key follows the column
    /// type (`"24043"` against `24043`). The alias lets the next lookup
    /// with the same spelling hit without a query. It dies with the
    /// instance.
    pub(crate) fn intern_as(&self, resource: Resource, requested: &[Value]) -> Arc<Resource> {
        let resource = self.intern(resource);
        let ty = resource.resource_type();
        if ty.identity() == Identity::Singleton && resource.key() != requested {
            let alias = IdentityKey {
                path: ty.path(),
                table: None,
                key: requested.to_vec(),
            };
            self.lock().map.insert(alias, Arc::downgrade(&resource));
        }
        resource
    }

    /// Number of live instances. Aliases count once.
    pub(crate) fn live(&self) -> usize {
        self.lock()
            .map
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .map(Weak::as_ptr)
            .collect::<HashSet<_>>()
            .len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(identity: Identity) -> Arc<ResourceType> {
        Arc::new(
            ResourceType::builder("bugs")
                .tables(&["bugs", "archived_bugs"])
                .fields(&["id", "title"])
                .identity(identity)
                .build()
                .unwrap(),
        )
    }

    fn row(id: i64) -> Vec<Value> {
        vec![Value::Integer(id), "title".into()]
    }

    #[test]
    fn test_singleton_identity() {
        let map = IdentityMap::default();
        let ty = ty(Identity::Singleton);

        let first = map.intern(Resource::from_row(&ty, "bugs", row(1)).unwrap());
        let second = map.intern(Resource::from_row(&ty, "archived_bugs", row(1)).unwrap());
        assert!(Arc::ptr_eq(&first, &second));

        let hit = map.lookup(&ty, &[Value::Integer(1)]).unwrap();
        assert!(Arc::ptr_eq(&first, &hit));
        assert!(map.lookup(&ty, &[Value::Integer(2)]).is_none());
    }

    #[test]
    fn test_per_table_identity() {
        let map = IdentityMap::default();
        let ty = ty(Identity::PerTable);

        let active = map.intern(Resource::from_row(&ty, "bugs", row(1)).unwrap());
        let archived = map.intern(Resource::from_row(&ty, "archived_bugs", row(1)).unwrap());
        assert!(!Arc::ptr_eq(&active, &archived));
        assert_ne!(*active, *archived);

        let again = map.intern(Resource::from_row(&ty, "bugs", row(1)).unwrap());
        assert!(Arc::ptr_eq(&active, &again));
        assert!(map.lookup(&ty, &[Value::Integer(1)]).is_none());
    }

    #[test]
    fn test_dropped_instances_are_forgotten() {
        let map = IdentityMap::default();
        let ty = ty(Identity::Singleton);

        let first = map.intern(Resource::from_row(&ty, "bugs", row(1)).unwrap());
        assert_eq!(map.live(), 1);
        drop(first);
        assert_eq!(map.live(), 0);
        assert!(map.lookup(&ty, &[Value::Integer(1)]).is_none());
    }

    #[test]
    fn test_alias_for_differently_typed_key() {
        let map = IdentityMap::default();
        let ty = ty(Identity::Singleton);

        let text_key = [Value::from("1")];
        let first = map.intern_as(Resource::from_row(&ty, "bugs", row(1)).unwrap(), &text_key);
        assert!(Arc::ptr_eq(&first, &map.lookup(&ty, &text_key).unwrap()));
        assert!(Arc::ptr_eq(&first, &map.lookup(&ty, &[Value::Integer(1)]).unwrap()));
        assert_eq!(map.live(), 1);

        drop(first);
        assert!(map.lookup(&ty, &text_key).is_none());
        assert_eq!(map.live(), 0);
    }

    #[test]
    fn test_per_table_types_get_no_alias() {
        let map = IdentityMap::default();
        let ty = ty(Identity::PerTable);

        let _bug = map.intern_as(
            Resource::from_row(&ty, "bugs", row(1)).unwrap(),
            &[Value::from("1")],
        );
        assert_eq!(map.lock().map.len(), 1);
    }

    #[test]
    fn test_sweep_bounds_dead_entries() {
        let map = IdentityMap::default();
        let ty = ty(Identity::Singleton);

        for id in 0..(3 * MIN_SWEEP_THRESHOLD as i64) {
            map.intern(Resource::from_row(&ty, "bugs", row(id)).unwrap());
        }
        assert!(map.lock().map.len() < MIN_SWEEP_THRESHOLD);
    }
}
