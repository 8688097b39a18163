//! foodie-db: database schema, migrations, and query operations.
//!
//! SQLite via rusqlite with r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Embedded schema migrations
//! - `pool` - Connection pool management
//! - `models` - Row models matching the schema
//! - `queries` - Per-table query operations
//!
//! # Example
//!
//! ```no_run
//! use foodie_db::pool::{init_pool, get_conn};
//! use foodie_db::queries::{base_users, menus};
//!
//! let pool = init_pool("foodie.db").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let user = base_users::create_user(&conn, "Ada@Example.COM").unwrap();
//! assert_eq!(user.email, "Ada@example.com");
//!
//! let current = menus::get_current_menu(&conn).unwrap();
//! println!("current menu: {current:?}");
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
