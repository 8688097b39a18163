//! Embedded SQL migrations and runner.
//!
//! Migrations are stored as `&str` constants and executed in order. A
//! `schema_migrations` table tracks which versions have been applied.

use foodie_core::{Error, Result};
use rusqlite::Connection;

/// V1: initial schema -- accounts, catalogue, orders, ratings.
const V1_INITIAL: &str = r#"
-- Accounts
CREATE TABLE base_users (
    id          TEXT PRIMARY KEY,
    email       TEXT NOT NULL UNIQUE,
    first_name  TEXT,
    last_name   TEXT,
    image       TEXT,
    thumbnail   TEXT,
    date_joined TEXT NOT NULL,
    is_active   INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE customers (
    id                TEXT PRIMARY KEY,
    base_user_id      TEXT NOT NULL UNIQUE REFERENCES base_users(id) ON DELETE CASCADE,
    address           TEXT,
    is_email_verified INTEGER NOT NULL DEFAULT 0,
    mobile_number     TEXT,
    phone_number      TEXT
);

CREATE TABLE operators (
    id           TEXT PRIMARY KEY,
    base_user_id TEXT NOT NULL UNIQUE REFERENCES base_users(id) ON DELETE CASCADE
);

CREATE TABLE dispatchers (
    id         TEXT PRIMARY KEY,
    email      TEXT NOT NULL UNIQUE,
    first_name TEXT,
    last_name  TEXT,
    image      TEXT,
    thumbnail  TEXT,
    is_active  INTEGER NOT NULL DEFAULT 1
);

-- Catalogue
CREATE TABLE menu_items (
    id          TEXT PRIMARY KEY,
    item_type   TEXT NOT NULL
                CHECK (item_type IN ('APPETIZER', 'MAIN', 'DESSERT', 'BEVERAGE')),
    name        TEXT NOT NULL,
    description TEXT,
    image       TEXT,
    thumbnail   TEXT,
    is_active   INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE menus (
    id       TEXT PRIMARY KEY,
    datetime TEXT NOT NULL
);
CREATE INDEX idx_menus_datetime ON menus(datetime);

CREATE TABLE menu_menu_items (
    menu_id      TEXT NOT NULL REFERENCES menus(id) ON DELETE CASCADE,
    menu_item_id TEXT NOT NULL REFERENCES menu_items(id) ON DELETE CASCADE,
    PRIMARY KEY (menu_id, menu_item_id)
);

-- Orders
CREATE TABLE orders (
    id                 TEXT PRIMARY KEY,
    customer_id        TEXT NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    dispatcher_id      TEXT NOT NULL REFERENCES dispatchers(id) ON DELETE CASCADE,
    datetime           TEXT NOT NULL,
    status             TEXT NOT NULL
                       CHECK (status IN ('RECEIVED', 'CANCELLED', 'DELIVERED')),
    delivery_time_from TEXT NOT NULL,
    delivery_time_to   TEXT NOT NULL
);
CREATE INDEX idx_orders_customer ON orders(customer_id);
CREATE INDEX idx_orders_dispatcher ON orders(dispatcher_id);

CREATE TABLE order_menu_items (
    order_id     TEXT NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    menu_item_id TEXT NOT NULL REFERENCES menu_items(id) ON DELETE CASCADE,
    PRIMARY KEY (order_id, menu_item_id)
);

CREATE TABLE service_ratings (
    id          TEXT PRIMARY KEY,
    customer_id TEXT NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    order_id    TEXT NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    datetime    TEXT NOT NULL,
    rating      INTEGER NOT NULL,
    taste       INTEGER NOT NULL DEFAULT 1,
    delivery    INTEGER NOT NULL DEFAULT 1,
    packaging   INTEGER NOT NULL DEFAULT 1,
    support     INTEGER NOT NULL DEFAULT 1,
    comments    TEXT
);
CREATE INDEX idx_service_ratings_order ON service_ratings(order_id);
"#;

/// Ordered list of (version, sql) pairs.
const MIGRATIONS: &[(i64, &str)] = &[(1, V1_INITIAL)];

/// Run all pending migrations on `conn`.
///
/// Creates the `schema_migrations` tracking table if it does not exist,
/// then applies each outstanding migration inside a transaction. Returns
/// the number of migrations applied.
pub fn run_migrations(conn: &Connection) -> Result<usize> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(|e| Error::database(format!("Failed to create schema_migrations: {e}")))?;

    let mut applied = 0;
    for &(version, sql) in MIGRATIONS {
        let already: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1",
                [version],
                |row| row.get(0),
            )
            .map_err(|e| Error::database(e.to_string()))?;

        if already {
            continue;
        }

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        tx.execute_batch(sql)
            .map_err(|e| Error::database(format!("Migration V{version} failed: {e}")))?;

        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            [version],
        )
        .map_err(|e| Error::database(e.to_string()))?;

        tx.commit().map_err(|e| Error::database(e.to_string()))?;

        tracing::info!(version, "Applied migration");
        applied += 1;
    }

    Ok(applied)
}

/// Highest version recorded in `schema_migrations`, or 0 on a fresh database.
pub fn current_version(conn: &Connection) -> Result<i64> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// Latest migration version embedded in this build.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map(|&(v, _)| v).unwrap_or(0)
}
