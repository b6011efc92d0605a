// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! Fetching resources.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;
use udd_store_db::{UddDb, Value};

use crate::catalog;
use crate::error::{Error, Result, display_key};
use crate::identity::IdentityMap;
use crate::linked::Linked;
use crate::registry::Registry;
use crate::resource::Resource;
use crate::schema::{ResourceType, Strategy};

/// Equality constraints, field name to raw string value.
pub type Filters = BTreeMap<String, String>;

/// Result of [`Udd::fetch`].
#[derive(Debug)]
pub enum Fetched {
    One(Arc<Resource>),
    Many(Vec<Arc<Resource>>),
}

/// Entry point of the mapping layer: a database, the registered resource
/// types and the identity map shared by every request.
pub struct Udd {
    db: UddDb,
    registry: Registry,
    identities: IdentityMap,
}

impl Udd {
    /// Serve the standard resource catalog from `db`.
    pub fn new(db: UddDb) -> Result<Self> {
        Ok(Self::with_registry(db, catalog::registry()?))
    }

    pub fn with_registry(db: UddDb, registry: Registry) -> Self {
        Self {
            db,
            registry,
            identities: IdentityMap::default(),
        }
    }

    pub fn db(&self) -> &UddDb {
        &self.db
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn resolve(&self, path: &str) -> Result<Arc<ResourceType>> {
        self.registry.resolve(path)
    }

    /// Number of instances currently alive in the identity map.
    pub fn live_instances(&self) -> usize {
        self.identities.live()
    }

    /// Primary-key fetch or filtered fetch.
    ///
    /// With a key, filters must also hold for the found instance, otherwise
    /// it counts as not found. Filters are compared by the store in both
    /// cases, so a key fetch matches exactly what a filtered fetch with the
    /// key fields added would return.
    pub fn fetch(
        &self,
        ty: &Arc<ResourceType>,
        key: Option<&[Value]>,
        filters: &Filters,
    ) -> Result<Fetched> {
        let Some(key) = key else {
            return self.filter(ty, filters).map(Fetched::Many);
        };

        check_filters(ty, filters)?;
        self.get_matching(ty, key, filters).map(Fetched::One)
    }

    /// Fetch one instance by primary key, trying each backing table in
    /// order.
    pub fn get(&self, ty: &Arc<ResourceType>, key: &[Value]) -> Result<Arc<Resource>> {
        self.get_matching(ty, key, &Filters::new())
    }

    fn get_matching(
        &self,
        ty: &Arc<ResourceType>,
        key: &[Value],
        filters: &Filters,
    ) -> Result<Arc<Resource>> {
        let primary_key = ty.primary_key();
        if key.len() != primary_key.len() {
            return Err(Error::InvalidPrimaryKey {
                resource: ty.path(),
                expected: primary_key.len(),
                found: key.len(),
            });
        }

        // A live instance only proves the key; filters need the store.
        if filters.is_empty() {
            if let Some(live) = self.identities.lookup(ty, key) {
                return Ok(live);
            }
        }

        let predicate = primary_key
            .iter()
            .copied()
            .chain(filters.keys().map(String::as_str))
            .collect::<Vec<_>>();
        let params = key
            .iter()
            .cloned()
            .chain(filters.values().map(|v| Value::Text(v.clone())))
            .collect::<Vec<_>>();

        for &table in ty.backing().tables() {
            let sql = ty.select_sql(table, &predicate, true);
            let row = self.db.cursor()?.fetch_all(&sql, &params)?.into_iter().next();
            if let Some(row) = row {
                let resource = Resource::from_row(ty, table, row)?;
                return Ok(self.identities.intern_as(resource, key));
            }
        }

        debug!("{}/{} not found", ty.path(), display_key(key));
        Err(Error::ObjectNotFound {
            resource: ty.path(),
            key: display_key(key),
        })
    }

    /// Fetch every instance matching all `filters`, concatenated across
    /// backing tables.
    pub fn filter(&self, ty: &Arc<ResourceType>, filters: &Filters) -> Result<Vec<Arc<Resource>>> {
        check_filters(ty, filters)?;

        let fields = filters.keys().map(String::as_str).collect::<Vec<_>>();
        let params = filters
            .values()
            .map(|v| Value::Text(v.clone()))
            .collect::<Vec<_>>();

        let mut found = Vec::new();
        for &table in ty.backing().tables() {
            let sql = ty.select_sql(table, &fields, false);
            for row in self.db.cursor()?.fetch_all(&sql, &params)? {
                let resource = Resource::from_row(ty, table, row)?;
                found.push(self.identities.intern(resource));
            }
        }
        Ok(found)
    }

    /// Value of computed field `name`, resolved on first access.
    pub fn computed(&self, resource: &Resource, name: &str) -> Result<Arc<Linked>> {
        let ty = resource.resource_type();
        let index = ty
            .computed_index(name)
            .ok_or_else(|| Error::UnknownComputedField {
                resource: ty.path(),
                field: name.to_owned(),
            })?;
        let field = &ty.computed()[index];
        resource.cached_or_compute(index, || match &field.strategy {
            Strategy::Relation(relation) => self.fetch_linked(resource, relation),
            Strategy::Custom(compute) => compute(self, resource),
        })
    }

    /// Every computed field of `resource`, in declared order.
    pub fn computed_all(&self, resource: &Resource) -> Result<Vec<(&'static str, Arc<Linked>)>> {
        let mut values = Vec::new();
        for field in resource.resource_type().computed() {
            values.push((field.name, self.computed(resource, field.name)?));
        }
        Ok(values)
    }
}

fn check_filters(ty: &ResourceType, filters: &Filters) -> Result<()> {
    match filters.keys().find(|field| ty.field_index(field).is_none()) {
        Some(field) => Err(Error::UnknownFilter {
            resource: ty.path(),
            field: field.clone(),
        }),
        None => Ok(()),
    }
}
