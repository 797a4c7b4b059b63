#[macro_use]
extern crate diesel;

use std::{
    cell::{RefCell, RefMut},
    sync::Arc,
    time::Duration,
};

use anyhow::{anyhow, Result as Fallible};
use diesel::{
    connection::SimpleConnection as _,
    r2d2::{self, CustomizeConnection},
    sql_types::Double,
    sqlite::SqliteConnection,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use famspot_core::{entities::great_circle_distance_m, repositories as repo};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

mod models;
mod repo_impl;
mod schema;

#[cfg(test)]
mod tests;

use repo_impl::from_diesel_err;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

type Connection = SqliteConnection;

type ConnectionManager = r2d2::ConnectionManager<Connection>;
type ConnectionPool = r2d2::Pool<ConnectionManager>;
type PooledConnection = r2d2::PooledConnection<ConnectionManager>;

type SharedConnectionPool = Arc<RwLock<ConnectionPool>>;

diesel::define_sql_function! {
    /// Great-circle distance in meters between two positions given in degrees.
    fn distance_m(lat1: Double, lng1: Double, lat2: Double, lng2: Double) -> Double;
}

/// Prepares every connection that is handed out by the pool.
///
/// Both the busy timeout and the foreign key checks are
/// settings of the connection and not of the database.
#[derive(Debug, Clone, Copy)]
struct ConnectionCustomizer {
    busy_timeout: Duration,
}

impl CustomizeConnection<Connection, r2d2::Error> for ConnectionCustomizer {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = 1;",
            self.busy_timeout.as_millis()
        ))
        .map_err(r2d2::Error::QueryError)?;
        distance_m_utils::register_impl(conn, great_circle_distance_m)
            .map_err(r2d2::Error::QueryError)
    }
}

pub struct DbReadOnly<'a> {
    _locked_pool: RwLockReadGuard<'a, ConnectionPool>,
    conn: RefCell<PooledConnection>,
}

impl<'a> DbReadOnly<'a> {
    fn try_new(pool: &'a SharedConnectionPool) -> Fallible<Self> {
        let locked_pool = pool.read();
        let conn = locked_pool.get().inspect_err(|err| {
            log::error!("Failed to obtain pooled database connection for read-only access: {err}");
        })?;
        Ok(Self {
            _locked_pool: locked_pool,
            conn: RefCell::new(conn),
        })
    }
}

pub struct DbReadWrite<'a> {
    _locked_pool: RwLockWriteGuard<'a, ConnectionPool>,
    conn: RefCell<PooledConnection>,
}

/// A connection inside of a running transaction.
pub struct DbConnection<'a> {
    conn: RefCell<&'a mut SqliteConnection>,
}

impl<'a> DbConnection<'a> {
    fn new(conn: &'a mut SqliteConnection) -> Self {
        Self {
            conn: RefCell::new(conn),
        }
    }
}

impl<'a> DbReadWrite<'a> {
    fn try_new(pool: &'a SharedConnectionPool) -> Fallible<Self> {
        let locked_pool = pool.write();
        let conn = locked_pool.get().inspect_err(|err| {
            log::error!("Failed to obtain pooled database connection for read/write access: {err}");
        })?;
        Ok(Self {
            _locked_pool: locked_pool,
            conn: RefCell::new(conn),
        })
    }

    /// Runs `f` in an immediate transaction.
    ///
    /// The write lock on the database is acquired when the transaction
    /// begins and not when the first write happens. Concurrent writers,
    /// even in other processes, are blocked until the transaction has
    /// been committed or rolled back. Any error returned by `f` rolls
    /// back all changes.
    pub fn transaction<T, F, E>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&DbConnection) -> Result<T, E>,
        E: From<repo::Error>,
    {
        let mut usecase_error = None;
        self.conn
            .borrow_mut()
            .immediate_transaction(|conn| {
                f(&DbConnection::new(conn)).map_err(|err| {
                    usecase_error = Some(err);
                    diesel::result::Error::RollbackTransaction
                })
            })
            .map_err(|err| {
                if let Some(usecase_error) = usecase_error {
                    debug_assert!(matches!(err, diesel::result::Error::RollbackTransaction));
                    usecase_error
                } else {
                    from_diesel_err(err).into()
                }
            })
    }

    fn sqlite_conn(&self) -> RefMut<PooledConnection> {
        self.conn.borrow_mut()
    }
}

#[derive(Clone)]
pub struct Connections {
    // Only a single connection with write access will be
    // handed out at a time from the pool. Multiple read
    // connections can be accessed concurrently. Writers in
    // other processes are serialized by SQLite itself.
    pool: SharedConnectionPool,
}

/// Configure the database engine
///
/// Some values like the text encoding can only be changed once after the
/// database has initially been created.
pub fn initialize_database(connection: &mut SqliteConnection) -> Fallible<()> {
    connection.batch_execute(r#"
PRAGMA journal_mode = WAL;        -- better write-concurrency
PRAGMA synchronous = NORMAL;      -- fsync only in critical moments, safe for journal_mode = WAL
PRAGMA wal_autocheckpoint = 1000; -- write WAL changes back every 1000 pages (default)
PRAGMA wal_checkpoint(TRUNCATE);  -- free some space by truncating possibly massive WAL files from the last run
PRAGMA secure_delete = 0;         -- avoid some disk I/O
PRAGMA automatic_index = 1;       -- detect and log missing indexes
PRAGMA recursive_triggers = 1;    -- for recursive ON CASCADE DELETE actions
PRAGMA encoding = 'UTF-8';
"#)?;
    Ok(())
}

impl Connections {
    pub fn init(url: &str, pool_size: u32, busy_timeout: Duration) -> Fallible<Self> {
        // Establish a test connection before creating the connection pool to fail early.
        // If the given file is inaccessible r2d2 seems to do multiple retries
        // and logs errors instead of simply failing and returning and error immediately.
        use diesel::Connection as _;
        let _ = SqliteConnection::establish(url)?;
        let manager = ConnectionManager::new(url);
        let pool = ConnectionPool::builder()
            .max_size(pool_size)
            .connection_customizer(Box::new(ConnectionCustomizer { busy_timeout }))
            .build(manager)?;
        initialize_database(&mut *pool.get()?)?;
        Ok(Self::new(pool))
    }

    fn new(pool: ConnectionPool) -> Self {
        Self {
            pool: Arc::new(RwLock::new(pool)),
        }
    }

    pub fn shared(&self) -> Fallible<DbReadOnly> {
        DbReadOnly::try_new(&self.pool)
    }

    pub fn exclusive(&self) -> Fallible<DbReadWrite> {
        DbReadWrite::try_new(&self.pool)
    }
}

pub fn run_embedded_database_migrations(conn: DbReadWrite<'_>) -> Fallible<()> {
    log::info!("Running embedded database migrations");
    let mut conn = conn.sqlite_conn();
    let versions = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| anyhow!("Failed to run database migrations: {err}"))?;
    for version in versions {
        log::info!("Applied database migration {version}");
    }
    Ok(())
}
