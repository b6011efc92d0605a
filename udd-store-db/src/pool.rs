// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! Blocking connection pool for SQLite connections.
//!
//! - **Invariant**: `active + idle ≤ capacity`
//! - **Resource safety**: connections are always returned via RAII guards,
//!   including when a query fails or the caller unwinds

use std::collections::VecDeque;
use std::ops::Deref;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use rusqlite::Connection;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::metrics::DbMetrics;

/// Configuration for the connection pool.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool
    pub max_size: usize,
    /// Timeout for acquiring a connection from the pool
    pub acquire_timeout: Duration,
    /// Optional metrics for monitoring
    pub metrics: Option<Arc<DbMetrics>>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        // Default to number of CPU cores + 1 for some headroom
        let max_size = std::thread::available_parallelism()
            .map(|n| n.get() + 1)
            .unwrap_or(5);

        Self {
            max_size,
            acquire_timeout: Duration::from_secs(30),
            metrics: None,
        }
    }
}

type Opener = dyn Fn() -> Result<Connection> + Send + Sync;

struct PoolState {
    idle: VecDeque<Connection>,
    active_count: usize,
    capacity: usize,
}

impl PoolState {
    fn invariant(&self) -> bool {
        self.active_count + self.idle.len() <= self.capacity && self.capacity > 0
    }

    fn update_metrics(&self, metrics: &DbMetrics) {
        metrics.idle_connections.set(self.idle.len() as i64);
        metrics.active_connections.set(self.active_count as i64);
    }
}

struct PoolInner {
    state: Mutex<PoolState>,
    available: Condvar,
    metrics: Option<Arc<DbMetrics>>,
}

impl PoolInner {
    // The state is only mutated by short non-panicking critical sections,
    // so a poisoned lock still guards a consistent state.
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn observe_acquire(&self, outcome: &str, start: Instant) {
        if let Some(ref metrics) = self.metrics {
            metrics
                .connection_acquire_duration
                .with_label_values(&[outcome])
                .observe(start.elapsed().as_secs_f64());
        }
    }
}

/// A bounded pool of SQLite connections to one database.
#[derive(Clone)]
pub(crate) struct ConnectionPool {
    inner: Arc<PoolInner>,
    opener: Arc<Opener>,
    acquire_timeout: Duration,
}

impl ConnectionPool {
    pub(crate) fn new<F>(config: &PoolConfig, opener: F) -> Result<Self>
    where
        F: Fn() -> Result<Connection> + Send + Sync + 'static,
    {
        if config.max_size == 0 {
            return Err(Error::PoolCapacity);
        }

        let state = PoolState {
            idle: VecDeque::new(),
            active_count: 0,
            capacity: config.max_size,
        };
        debug_assert!(state.invariant());

        Ok(Self {
            inner: Arc::new(PoolInner {
                state: Mutex::new(state),
                available: Condvar::new(),
                metrics: config.metrics.clone(),
            }),
            opener: Arc::new(opener),
            acquire_timeout: config.acquire_timeout,
        })
    }

    /// Hand an already opened connection to the pool as idle.
    pub(crate) fn seed(&self, conn: Connection) {
        let mut state = self.inner.lock();
        if state.active_count + state.idle.len() < state.capacity {
            state.idle.push_back(conn);
        }
        debug_assert!(state.invariant());
    }

    /// Acquire a connection, blocking until one is available or the
    /// acquire timeout elapses.
    pub(crate) fn acquire(&self) -> Result<PooledConnection> {
        let start = Instant::now();
        let deadline = start + self.acquire_timeout;
        let mut state = self.inner.lock();

        loop {
            debug_assert!(state.invariant());

            if let Some(conn) = state.idle.pop_front() {
                state.active_count += 1;
                if let Some(ref metrics) = self.inner.metrics {
                    state.update_metrics(metrics);
                }
                drop(state);
                self.inner.observe_acquire("reused", start);
                trace!("Reusing idle connection");
                return Ok(self.guard(conn));
            }

            if state.active_count < state.capacity {
                state.active_count += 1;
                drop(state);

                return match (self.opener)() {
                    Ok(conn) => {
                        self.inner.observe_acquire("created", start);
                        debug!("Created new connection");
                        Ok(self.guard(conn))
                    }
                    Err(e) => {
                        let mut state = self.inner.lock();
                        state.active_count = state.active_count.saturating_sub(1);
                        debug_assert!(state.invariant());
                        drop(state);
                        self.inner.available.notify_one();
                        self.inner.observe_acquire("error", start);
                        warn!("Failed to create connection: {e}");
                        Err(e)
                    }
                };
            }

            let now = Instant::now();
            if now >= deadline {
                drop(state);
                self.inner.observe_acquire("timeout", start);
                return Err(Error::PoolTimeout(self.acquire_timeout));
            }

            trace!(
                "Pool at capacity ({}/{}), waiting",
                state.active_count,
                state.capacity
            );
            state = self
                .inner
                .available
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    fn guard(&self, conn: Connection) -> PooledConnection {
        PooledConnection {
            conn: Some(conn),
            pool: Arc::clone(&self.inner),
        }
    }

    /// Current pool statistics as (idle, active, capacity).
    pub(crate) fn stats(&self) -> (usize, usize, usize) {
        let state = self.inner.lock();
        (state.idle.len(), state.active_count, state.capacity)
    }
}

/// RAII guard that returns its connection to the pool on drop.
pub(crate) struct PooledConnection {
    conn: Option<Connection>,
    pool: Arc<PoolInner>,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn.as_ref().expect("Connection already returned")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        let mut state = self.pool.lock();
        debug_assert!(state.invariant());

        if let Some(conn) = self.conn.take() {
            if state.active_count > 0 {
                state.active_count -= 1;
                state.idle.push_back(conn);
            }
        }

        if let Some(ref metrics) = self.pool.metrics {
            state.update_metrics(metrics);
        }
        debug_assert!(state.invariant());
        drop(state);

        self.pool.available.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_pool(max_size: usize, timeout: Duration) -> ConnectionPool {
        let config = PoolConfig {
            max_size,
            acquire_timeout: timeout,
            metrics: None,
        };
        ConnectionPool::new(&config, || Ok(Connection::open_in_memory()?)).unwrap()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = PoolConfig {
            max_size: 0,
            ..Default::default()
        };
        let pool = ConnectionPool::new(&config, || Ok(Connection::open_in_memory()?));
        assert!(matches!(pool, Err(Error::PoolCapacity)));
    }

    #[test]
    fn test_guard_returns_connection() {
        let pool = memory_pool(2, Duration::from_secs(1));
        {
            let _a = pool.acquire().unwrap();
            let _b = pool.acquire().unwrap();
            assert_eq!(pool.stats(), (0, 2, 2));
        }
        assert_eq!(pool.stats(), (2, 0, 2));

        // Idle connections are reused rather than reopened.
        let _c = pool.acquire().unwrap();
        assert_eq!(pool.stats(), (1, 1, 2));
    }

    #[test]
    fn test_acquire_times_out_at_capacity() {
        let pool = memory_pool(1, Duration::from_millis(20));
        let _held = pool.acquire().unwrap();
        assert!(matches!(pool.acquire(), Err(Error::PoolTimeout(_))));
    }

    #[test]
    fn test_waiter_wakes_on_release() {
        let pool = memory_pool(1, Duration::from_secs(5));
        let held = pool.acquire().unwrap();

        let waiter = {
            let pool = pool.clone();
            std::thread::spawn(move || pool.acquire().map(|_| ()))
        };
        std::thread::sleep(Duration::from_millis(20));
        drop(held);

        assert!(waiter.join().unwrap().is_ok());
        assert_eq!(pool.stats(), (1, 0, 1));
    }

    #[test]
    fn test_failed_open_releases_slot() {
        let config = PoolConfig {
            max_size: 1,
            acquire_timeout: Duration::from_millis(20),
            metrics: None,
        };
        let pool = ConnectionPool::new(&config, || {
            Err(Error::DatabaseNotFound("/nonexistent".into()))
        })
        .unwrap();
        assert!(pool.acquire().is_err());
        assert_eq!(pool.stats(), (0, 0, 1));
    }
}
