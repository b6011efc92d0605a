// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! Database connection management.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::cursor::{Cursor, QueryStats};
use crate::error::{Error, Result};
use crate::pool::{ConnectionPool, PoolConfig, PooledConnection};
use crate::schema::SCHEMA_SQL;

/// Database open mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read-only access (for production use with a mirrored UDD)
    ReadOnly,
    /// Read-write access (for testing or local imports)
    ReadWrite,
    /// Create new database if it doesn't exist
    Create,
}

static MEMORY_DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Pooled SQLite database handle for UDD data.
pub struct UddDb {
    pool: ConnectionPool,
    stats: Arc<QueryStats>,
    config: PoolConfig,
    // Shared-cache in-memory databases vanish once their last connection
    // closes; this one stays open for the lifetime of the handle.
    _keepalive: Option<Mutex<Connection>>,
}

impl UddDb {
    /// Open a database file.
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode, config: PoolConfig) -> Result<Self> {
        let path = path.as_ref().to_owned();
        let access = match mode {
            OpenMode::ReadOnly => {
                if !path.exists() {
                    return Err(Error::DatabaseNotFound(path));
                }
                OpenFlags::SQLITE_OPEN_READ_ONLY
            }
            OpenMode::ReadWrite => {
                if !path.exists() {
                    return Err(Error::DatabaseNotFound(path));
                }
                OpenFlags::SQLITE_OPEN_READ_WRITE
            }
            OpenMode::Create => OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        };
        let flags = access | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let opener = {
            let path = path.clone();
            move || open_with(&path, flags)
        };

        // Open one connection eagerly so a bad path fails at startup.
        let first = opener()?;
        if mode == OpenMode::Create {
            configure_pragmas(&first)?;
        }

        let pool = ConnectionPool::new(&config, opener)?;
        pool.seed(first);

        debug!("Opened database at {} ({:?})", path.display(), mode);
        Ok(Self {
            pool,
            stats: Arc::default(),
            config,
            _keepalive: None,
        })
    }

    /// Create an in-memory database (for testing).
    ///
    /// The database is initialized with the full schema and may be shared
    /// by every connection in the pool.
    pub fn open_memory() -> Result<Self> {
        Self::open_memory_with(PoolConfig::default())
    }

    /// Create an in-memory database with a custom pool configuration.
    pub fn open_memory_with(config: PoolConfig) -> Result<Self> {
        let n = MEMORY_DB_COUNTER.fetch_add(1, Ordering::Relaxed);
        let uri = PathBuf::from(format!(
            "file:udd-memory-{}-{n}?mode=memory&cache=shared",
            std::process::id()
        ));
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let keepalive = open_with(&uri, flags)?;
        configure_pragmas(&keepalive)?;

        let pool = ConnectionPool::new(&config, move || open_with(&uri, flags))?;
        let db = Self {
            pool,
            stats: Arc::default(),
            config,
            _keepalive: Some(Mutex::new(keepalive)),
        };
        db.create_schema()?;
        debug!("Created in-memory database");
        Ok(db)
    }

    /// Create the database schema.
    pub fn create_schema(&self) -> Result<()> {
        self.connection()?.execute_batch(SCHEMA_SQL)?;
        debug!("Created database schema");
        Ok(())
    }

    /// Check if the database has the expected schema tables.
    pub fn has_schema(&self) -> Result<bool> {
        let count: i32 = self.connection()?.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('bugs', 'archived_bugs')",
            [],
            |row| row.get(0),
        )?;
        Ok(count == 2)
    }

    /// Acquire a single-use cursor.
    ///
    /// Blocks until a pooled connection is free or the acquire timeout
    /// elapses.
    pub fn cursor(&self) -> Result<Cursor> {
        let conn = self.pool.acquire()?;
        Ok(Cursor::new(
            conn,
            Arc::clone(&self.stats),
            self.config.metrics.clone(),
        ))
    }

    /// Number of queries executed through cursors of this handle.
    pub fn query_count(&self) -> u64 {
        self.stats.queries()
    }

    /// Current pool statistics as (idle, active, capacity).
    pub fn pool_stats(&self) -> (usize, usize, usize) {
        self.pool.stats()
    }

    /// Get a pooled raw connection (for schema setup and fixtures).
    pub(crate) fn connection(&self) -> Result<PooledConnection> {
        self.pool.acquire()
    }
}

fn open_with(path: &Path, flags: OpenFlags) -> Result<Connection> {
    Connection::open_with_flags(path, flags).map_err(|e| Error::DatabaseOpen {
        path: path.to_owned(),
        source: e,
    })
}

/// Configure SQLite pragmas for a writable database.
fn configure_pragmas(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA synchronous = NORMAL;
        PRAGMA temp_store = MEMORY;
        "#,
    )?;
    Ok(())
}
