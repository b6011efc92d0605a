// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! Relation fetcher over junction tables.
//!
//! A relation named `blocks` on a resource backed by `bugs` reads the
//! junction table `bugs_blocks`, selecting the rows whose key columns equal
//! the owner's primary key. Rows are returned as raw values, or resolved to
//! resources of one of the candidate target types.

use std::sync::Arc;

use tracing::warn;
use udd_store_db::{Row, Value, quote_ident};

use crate::error::{Error, Result, display_key};
use crate::linked::Linked;
use crate::resource::Resource;
use crate::udd::Udd;

/// Declaration of a junction-table relation.
#[derive(Debug, Clone, Copy)]
pub struct Relation {
    /// Suffix of the junction table, also the computed field name.
    pub name: &'static str,
    /// Junction columns to select, in result order.
    pub result_fields: &'static [&'static str],
    /// Candidate target resource paths, tried in order.
    pub targets: &'static [&'static str],
    /// Junction prefix; defaults to the owner's backing tables.
    pub base_table: Option<&'static str>,
    /// Owner key fields absent from the junction table.
    pub excluded_key_fields: &'static [&'static str],
}

impl Relation {
    pub const fn new(name: &'static str, result_fields: &'static [&'static str]) -> Self {
        Self {
            name,
            result_fields,
            targets: &[],
            base_table: None,
            excluded_key_fields: &[],
        }
    }

    /// Resolve each row's leading values as the primary key of one of
    /// `paths`.
    pub const fn targets(mut self, paths: &'static [&'static str]) -> Self {
        self.targets = paths;
        self
    }

    pub const fn base_table(mut self, base: &'static str) -> Self {
        self.base_table = Some(base);
        self
    }

    pub const fn excluding(mut self, fields: &'static [&'static str]) -> Self {
        self.excluded_key_fields = fields;
        self
    }

    fn junction(&self, base: &str) -> String {
        format!("{base}_{}", self.name)
    }
}

fn junction_sql(junction: &str, columns: &[&str], key_fields: &[&str]) -> String {
    let columns = columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    let clauses = key_fields
        .iter()
        .enumerate()
        .map(|(i, f)| format!("{} = ?{}", quote_ident(f), i + 1))
        .collect::<Vec<_>>()
        .join(" AND ");
    format!(
        "SELECT {columns} FROM {} WHERE {clauses}",
        quote_ident(junction)
    )
}

impl Udd {
    /// Resolve `relation` for `owner`.
    ///
    /// Without targets, one-column relations yield [`Linked::Scalars`] and
    /// wider ones [`Linked::Tuples`]. With targets, every row must resolve
    /// to an existing resource or the database is reported as corrupted.
    pub fn fetch_linked(&self, owner: &Resource, relation: &Relation) -> Result<Linked> {
        let rows = self.linked_rows(owner, relation)?;

        if relation.targets.is_empty() {
            return Ok(if relation.result_fields.len() == 1 {
                Linked::Scalars(rows.into_iter().flatten().collect())
            } else {
                Linked::Tuples(rows)
            });
        }

        rows.iter()
            .map(|row| self.resolve_target(owner, relation, row))
            .collect::<Result<Vec<_>>>()
            .map(Linked::Objects)
    }

    /// Raw junction rows for `relation`, in store order, concatenated across
    /// every base table.
    pub fn linked_rows(&self, owner: &Resource, relation: &Relation) -> Result<Vec<Row>> {
        let ty = owner.resource_type();
        let mut key_fields = Vec::new();
        let mut params = Vec::new();
        for (field, value) in ty.primary_key().iter().zip(owner.key()) {
            if !relation.excluded_key_fields.contains(field) {
                key_fields.push(*field);
                params.push(value.clone());
            }
        }
        if key_fields.is_empty() {
            return Err(Error::InvalidDeclaration {
                resource: ty.path(),
                reason: format!("relation '{}' excludes every key field", relation.name),
            });
        }

        let bases = match relation.base_table {
            Some(ref base) => std::slice::from_ref(base),
            None => ty.backing().tables(),
        };

        let mut rows = Vec::new();
        for base in bases {
            let sql = junction_sql(&relation.junction(base), relation.result_fields, &key_fields);
            rows.extend(self.db().cursor()?.fetch_all(&sql, &params)?);
        }
        Ok(rows)
    }

    fn resolve_target(
        &self,
        owner: &Resource,
        relation: &Relation,
        row: &[Value],
    ) -> Result<Arc<Resource>> {
        for path in relation.targets {
            let target = self.resolve(path)?;
            let width = target.primary_key().len();
            let Some(key) = row.get(..width) else {
                return Err(Error::InvalidDeclaration {
                    resource: owner.path(),
                    reason: format!(
                        "relation '{}' yields {} columns, '{path}' needs {width}",
                        relation.name,
                        row.len()
                    ),
                });
            };
            match self.get(&target, key) {
                Ok(found) => return Ok(found),
                Err(Error::ObjectNotFound { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        let key = display_key(owner.key());
        let target = display_key(row);
        warn!(
            "Corrupted database: {}/{key} links through '{}' to {target}, found in none of {:?}",
            owner.path(),
            relation.name,
            relation.targets
        );
        Err(Error::CorruptedDatabase {
            resource: owner.path(),
            relation: relation.name,
            key,
            target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_junction_name() {
        let relation = Relation::new("merged_with", &["merged_with"]);
        assert_eq!(relation.junction("archived_bugs"), "archived_bugs_merged_with");
    }

    #[test]
    fn test_junction_sql() {
        assert_eq!(
            junction_sql("carnivore_keys", &["key", "key_type"], &["id"]),
            r#"SELECT "key", "key_type" FROM "carnivore_keys" WHERE "id" = ?1"#
        );
        assert_eq!(
            junction_sql(
                "packages_descriptions",
                &["language"],
                &["package", "distribution", "release", "component"]
            ),
            r#"SELECT "language" FROM "packages_descriptions" WHERE "package" = ?1 AND "distribution" = ?2 AND "release" = ?3 AND "component" = ?4"#
        );
    }

    #[test]
    fn test_const_builders() {
        const BLOCKS: Relation = Relation::new("blocks", &["blocked"])
            .targets(&["active_bugs", "archived_bugs"])
            .base_table("bugs")
            .excluding(&["source"]);
        assert_eq!(BLOCKS.targets, &["active_bugs", "archived_bugs"]);
        assert_eq!(BLOCKS.base_table, Some("bugs"));
        assert_eq!(BLOCKS.excluded_key_fields, &["source"]);
    }
}
