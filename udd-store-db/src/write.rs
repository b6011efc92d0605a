// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! Write operations for the store database.
//!
//! The API itself is read-only; these are used for fixtures and local
//! imports.

use rusqlite::params_from_iter;

use crate::connection::UddDb;
use crate::error::Result;
use crate::schema::quote_ident;
use crate::value::Value;

fn insert_sql(table: &str, width: usize) -> String {
    let placeholders = (1..=width)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} VALUES ({placeholders})",
        quote_ident(table)
    )
}

impl UddDb {
    /// Insert one positional row into `table`.
    pub fn insert(&self, table: &str, values: &[Value]) -> Result<()> {
        self.connection()?
            .execute(&insert_sql(table, values.len()), params_from_iter(values))?;
        Ok(())
    }

    /// Insert several positional rows into `table` in one transaction.
    pub fn insert_many(&self, table: &str, rows: &[Vec<Value>]) -> Result<()> {
        let conn = self.connection()?;
        let tx = conn.unchecked_transaction()?;
        for row in rows {
            tx.execute(&insert_sql(table, row.len()), params_from_iter(row))?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Run a batch of SQL statements.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.connection()?.execute_batch(sql)?;
        Ok(())
    }
}
