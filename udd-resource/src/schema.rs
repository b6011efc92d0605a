// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! Resource type descriptors.
//!
//! A [`ResourceType`] is a plain schema value: where its rows live, which
//! columns it maps positionally, which of them form the primary key, and
//! which computed fields it derives through relations.

use std::fmt;

use udd_store_db::quote_ident;

use crate::error::{Error, Result};
use crate::linked::Linked;
use crate::relation::Relation;
use crate::resource::Resource;
use crate::udd::Udd;

/// Where the rows of a resource type come from.
#[derive(Debug, Clone, Copy)]
pub enum Backing {
    /// Real tables, tried in declared order.
    Tables(&'static [&'static str]),
    /// A `SELECT DISTINCT` projection of the declared fields over one table.
    Distinct { table: &'static str },
}

impl Backing {
    /// Tables backing this type, in lookup order.
    pub fn tables(&self) -> &[&'static str] {
        match self {
            Backing::Tables(tables) => *tables,
            Backing::Distinct { table } => std::slice::from_ref(table),
        }
    }
}

/// How instances of a type are deduplicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// At most one live instance per primary key.
    Singleton,
    /// The table of origin is part of identity, so the same key may live
    /// once per backing table.
    PerTable,
}

/// Custom computation of a computed field.
pub type ComputeFn = fn(&Udd, &Resource) -> Result<Linked>;

/// How a computed field is resolved.
#[derive(Clone)]
pub enum Strategy {
    Relation(Relation),
    Custom(ComputeFn),
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Relation(relation) => f.debug_tuple("Relation").field(relation).finish(),
            Strategy::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// A named, documented, lazily evaluated field.
#[derive(Debug, Clone)]
pub struct ComputedField {
    pub name: &'static str,
    pub doc: &'static str,
    pub strategy: Strategy,
}

impl ComputedField {
    /// A field resolved directly by a relation, named after it.
    pub const fn linked(doc: &'static str, relation: Relation) -> Self {
        Self {
            name: relation.name,
            doc,
            strategy: Strategy::Relation(relation),
        }
    }

    pub const fn custom(name: &'static str, doc: &'static str, compute: ComputeFn) -> Self {
        Self {
            name,
            doc,
            strategy: Strategy::Custom(compute),
        }
    }
}

/// Schema descriptor for one kind of resource.
#[derive(Debug)]
pub struct ResourceType {
    path: &'static str,
    doc: &'static str,
    backing: Backing,
    fields: &'static [&'static str],
    primary_key: &'static [&'static str],
    key_indices: Vec<usize>,
    computed: Vec<ComputedField>,
    identity: Identity,
}

impl ResourceType {
    pub fn builder(path: &'static str) -> ResourceTypeBuilder {
        ResourceTypeBuilder {
            path,
            doc: "",
            backing: None,
            fields: &[],
            primary_key: None,
            computed: Vec::new(),
            identity: Identity::Singleton,
        }
    }

    /// Routing segment, unique among registered types.
    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn doc(&self) -> &'static str {
        self.doc
    }

    pub fn backing(&self) -> &Backing {
        &self.backing
    }

    /// Direct fields, in column order.
    pub fn fields(&self) -> &'static [&'static str] {
        self.fields
    }

    pub fn primary_key(&self) -> &'static [&'static str] {
        self.primary_key
    }

    pub fn computed(&self) -> &[ComputedField] {
        &self.computed
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Column position of a direct field.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| *f == name)
    }

    pub(crate) fn key_indices(&self) -> &[usize] {
        &self.key_indices
    }

    pub(crate) fn computed_index(&self, name: &str) -> Option<usize> {
        self.computed.iter().position(|c| c.name == name)
    }

    /// Build the row query for one backing table.
    ///
    /// `predicate` fields are bound positionally as `?1..?n`.
    pub(crate) fn select_sql(&self, table: &str, predicate: &[&str], single: bool) -> String {
        let projection = match self.backing {
            Backing::Tables(_) => "*".to_owned(),
            Backing::Distinct { .. } => format!(
                "DISTINCT {}",
                self.fields
                    .iter()
                    .map(|f| quote_ident(f))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };
        let mut sql = format!("SELECT {projection} FROM {}", quote_ident(table));
        if !predicate.is_empty() {
            let clauses = predicate
                .iter()
                .enumerate()
                .map(|(i, f)| format!("{} = ?{}", quote_ident(f), i + 1))
                .collect::<Vec<_>>();
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        if single {
            sql.push_str(" LIMIT 1");
        }
        sql
    }
}

/// Builder validating a [`ResourceType`] declaration.
pub struct ResourceTypeBuilder {
    path: &'static str,
    doc: &'static str,
    backing: Option<Backing>,
    fields: &'static [&'static str],
    primary_key: Option<&'static [&'static str]>,
    computed: Vec<ComputedField>,
    identity: Identity,
}

impl ResourceTypeBuilder {
    pub fn doc(mut self, doc: &'static str) -> Self {
        self.doc = doc;
        self
    }

    /// Back the type by one or more tables tried in order.
    pub fn tables(mut self, tables: &'static [&'static str]) -> Self {
        self.backing = Some(Backing::Tables(tables));
        self
    }

    /// Back the type by the distinct values of its fields in `table`.
    pub fn distinct(mut self, table: &'static str) -> Self {
        self.backing = Some(Backing::Distinct { table });
        self
    }

    pub fn fields(mut self, fields: &'static [&'static str]) -> Self {
        self.fields = fields;
        self
    }

    /// Defaults to the first declared field.
    pub fn primary_key(mut self, key: &'static [&'static str]) -> Self {
        self.primary_key = Some(key);
        self
    }

    pub fn computed(mut self, computed: impl IntoIterator<Item = ComputedField>) -> Self {
        self.computed.extend(computed);
        self
    }

    pub fn identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    pub fn build(self) -> Result<ResourceType> {
        let path = self.path;
        let fields = self.fields;
        let invalid = |reason: &str| Error::InvalidDeclaration {
            resource: path,
            reason: reason.to_owned(),
        };

        let backing = self.backing.ok_or_else(|| invalid("no backing table"))?;
        if backing.tables().is_empty() {
            return Err(invalid("no backing table"));
        }
        if fields.is_empty() {
            return Err(invalid("no fields"));
        }

        let primary_key = match self.primary_key {
            Some(key) if key.is_empty() => return Err(invalid("empty primary key")),
            Some(key) => key,
            None => &fields[..1],
        };

        for (i, &field) in fields.iter().enumerate() {
            if fields[..i].contains(&field) {
                return Err(Error::FieldCollision {
                    resource: path,
                    field,
                });
            }
        }
        for (i, computed) in self.computed.iter().enumerate() {
            if fields.contains(&computed.name)
                || self.computed[..i].iter().any(|c| c.name == computed.name)
            {
                return Err(Error::FieldCollision {
                    resource: path,
                    field: computed.name,
                });
            }
        }

        let key_indices = primary_key
            .iter()
            .map(|k| {
                fields
                    .iter()
                    .position(|f| f == k)
                    .ok_or_else(|| invalid(&format!("primary key field '{k}' is not declared")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ResourceType {
            path,
            doc: self.doc,
            backing,
            fields,
            primary_key,
            key_indices,
            computed: self.computed,
            identity: self.identity,
        })
    }
}
