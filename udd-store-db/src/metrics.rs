// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! Prometheus metrics for connection pool and query monitoring.

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry};

/// Metrics for monitoring connection pool health and query throughput.
#[derive(Clone, Debug)]
pub struct DbMetrics {
    /// Number of currently checked-out connections
    pub active_connections: IntGauge,
    /// Number of idle connections available in the pool
    pub idle_connections: IntGauge,
    /// Time spent acquiring connections, labeled by outcome ("reused", "created", "timeout", "error")
    pub connection_acquire_duration: HistogramVec,
    /// Number of queries executed, labeled by status ("success" or "error")
    pub queries_total: IntCounterVec,
    /// Query duration in seconds, labeled by status
    pub query_duration: HistogramVec,
}

impl DbMetrics {
    /// Create new metrics and register them with the given Prometheus registry.
    ///
    /// # Arguments
    /// * `prefix` - Prefix for metric names (e.g., "udd")
    /// * `registry` - Prometheus registry to register metrics with
    pub fn new(prefix: &str, registry: &Registry) -> Result<Self, prometheus::Error> {
        let active_connections = IntGauge::with_opts(Opts::new(
            format!("{prefix}_db_active_connections"),
            "Number of database connections currently in use",
        ))?;

        let idle_connections = IntGauge::with_opts(Opts::new(
            format!("{prefix}_db_idle_connections"),
            "Number of idle database connections in the pool",
        ))?;

        let connection_acquire_duration = HistogramVec::new(
            HistogramOpts::new(
                format!("{prefix}_db_connection_acquire_duration_seconds"),
                "Time spent acquiring a database connection",
            )
            .buckets(vec![
                0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0,
            ]),
            &["outcome"],
        )?;

        let queries_total = IntCounterVec::new(
            Opts::new(
                format!("{prefix}_db_queries_total"),
                "Total number of database queries executed",
            ),
            &["status"],
        )?;

        let query_duration = HistogramVec::new(
            HistogramOpts::new(
                format!("{prefix}_db_query_duration_seconds"),
                "Database query duration in seconds",
            )
            .buckets(vec![
                0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0,
            ]),
            &["status"],
        )?;

        registry.register(Box::new(active_connections.clone()))?;
        registry.register(Box::new(idle_connections.clone()))?;
        registry.register(Box::new(connection_acquire_duration.clone()))?;
        registry.register(Box::new(queries_total.clone()))?;
        registry.register(Box::new(query_duration.clone()))?;

        Ok(Self {
            active_connections,
            idle_connections,
            connection_acquire_duration,
            queries_total,
            query_duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_register_once() {
        let registry = Registry::new();
        DbMetrics::new("udd", &registry).unwrap();
        assert!(DbMetrics::new("udd", &registry).is_err());
        assert!(DbMetrics::new("other", &registry).is_ok());
    }
}
