//! Connection pool management for SQLite via r2d2.

use foodie_core::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};

use crate::migrations;

pub type DbPool = Pool<SqliteConnectionManager>;

pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const POOL_SIZE: u32 = 4;

/// Open (creating if needed) the database file and bring its schema up to
/// date. Every connection has foreign keys on and uses WAL.
pub fn init_pool(db_path: &str) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;",
        )
    });
    migrated(manager, db_path)
}

/// A private in-memory database, migrated and ready.
///
/// Connections in the returned pool see the same data; separate calls get
/// separate databases.
pub fn init_memory_pool() -> Result<DbPool> {
    use std::sync::atomic::{AtomicU64, Ordering};
    static NEXT_DB: AtomicU64 = AtomicU64::new(0);
    let uri = format!(
        "file:foodie_memdb_{}?mode=memory&cache=shared",
        NEXT_DB.fetch_add(1, Ordering::Relaxed)
    );

    let manager = SqliteConnectionManager::file(&uri)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    migrated(manager, &uri)
}

fn migrated(manager: SqliteConnectionManager, label: &str) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(POOL_SIZE)
        .build(manager)
        .map_err(|e| Error::database(format!("Cannot open pool for {label}: {e}")))?;
    migrations::run_migrations(&*get_conn(&pool)?)?;
    Ok(pool)
}

/// Open an existing database without creating it or touching its schema.
pub fn open_read_only(db_path: &str) -> Result<Connection> {
    Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(Error::database)
}

pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("No database connection available: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_memory_pool() {
        let pool = init_memory_pool().unwrap();
        assert_eq!(pool.max_size(), POOL_SIZE);
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let fk: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn test_connections_share_state() {
        let pool = init_memory_pool().unwrap();
        {
            let conn = get_conn(&pool).unwrap();
            conn.execute(
                "INSERT INTO menus (id, datetime) VALUES ('m1', '2030-01-01T00:00:00.000000Z')",
                [],
            )
            .unwrap();
        }

        let conn = get_conn(&pool).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM menus", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_file_pool_runs_migrations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foodie.db");
        let pool = init_pool(path.to_str().unwrap()).unwrap();
        let conn = get_conn(&pool).unwrap();

        let version = crate::migrations::current_version(&conn).unwrap();
        assert_eq!(version, crate::migrations::latest_version());
    }

    #[test]
    fn test_read_only_open_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch("CREATE TABLE t (x INTEGER);").unwrap();
        }

        let conn = open_read_only(path.to_str().unwrap()).unwrap();
        assert!(conn.execute("INSERT INTO t (x) VALUES (1)", []).is_err());
        let tables: i64 = conn
            .query_row("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(tables, 1);

        assert!(open_read_only(dir.path().join("missing.db").to_str().unwrap()).is_err());
    }
}
