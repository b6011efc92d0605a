// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! Single-use query cursors.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use rusqlite::params_from_iter;
use tracing::debug;

use crate::error::{Error, Result};
use crate::metrics::DbMetrics;
use crate::pool::PooledConnection;
use crate::value::{Row, Value};

/// Counts executed queries for one database handle.
#[derive(Debug, Default)]
pub struct QueryStats {
    queries: AtomicU64,
}

impl QueryStats {
    fn record(&self) {
        self.queries.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of statements executed through cursors so far.
    pub fn queries(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }
}

/// A pooled connection scoped to exactly one query.
///
/// [`Cursor::fetch_all`] consumes the cursor; the connection goes back to
/// the pool when the cursor is dropped, whether the query succeeded or not.
pub struct Cursor {
    conn: PooledConnection,
    stats: Arc<QueryStats>,
    metrics: Option<Arc<DbMetrics>>,
}

impl Cursor {
    pub(crate) fn new(
        conn: PooledConnection,
        stats: Arc<QueryStats>,
        metrics: Option<Arc<DbMetrics>>,
    ) -> Self {
        Self {
            conn,
            stats,
            metrics,
        }
    }

    /// Execute `sql` with positional parameters and collect every row.
    pub fn fetch_all(self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        debug!("query: {sql} {params:?}");
        self.stats.record();

        let start = Instant::now();
        let result = self.run(sql, params).map_err(|source| Error::Query {
            sql: sql.to_owned(),
            source,
        });

        if let Some(ref metrics) = self.metrics {
            let status = if result.is_ok() { "success" } else { "error" };
            metrics.queries_total.with_label_values(&[status]).inc();
            metrics
                .query_duration
                .with_label_values(&[status])
                .observe(start.elapsed().as_secs_f64());
        }

        result
    }

    fn run(&self, sql: &str, params: &[Value]) -> rusqlite::Result<Vec<Row>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let width = stmt.column_count();

        let mut out = Vec::new();
        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(row.get::<_, Value>(i)?);
            }
            out.push(values);
        }
        Ok(out)
    }
}
