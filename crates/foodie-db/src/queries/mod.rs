//! Database query modules.
//!
//! One module per table group:
//! - base_users: accounts, email normalization, named-user lookup
//! - customers / operators: role records attached to a base user
//! - dispatchers: delivery staff
//! - menu_items / menus: the catalogue and dated menus
//! - orders: orders, their items, and status changes
//! - service_ratings: post-order feedback

pub mod base_users;
pub mod customers;
pub mod dispatchers;
pub mod menu_items;
pub mod menus;
pub mod operators;
pub mod orders;
pub mod service_ratings;

use foodie_core::{Error, Result};

/// Map a failed write into the error callers can act on.
///
/// UNIQUE violations become [`Error::Conflict`], foreign-key and CHECK
/// violations become [`Error::Validation`].
pub(crate) fn write_err(e: rusqlite::Error, what: &str) -> Error {
    let msg = e.to_string();
    if msg.contains("UNIQUE constraint failed") {
        Error::Conflict(format!("{what} already exists"))
    } else if msg.contains("FOREIGN KEY constraint failed") {
        Error::validation(format!("{what} references a missing record"))
    } else if msg.contains("CHECK constraint failed") {
        Error::validation(format!("{what} has an out-of-range value"))
    } else {
        Error::database(e)
    }
}

/// Turn `QueryReturnedNoRows` into `Ok(None)`.
pub(crate) fn optional<T>(result: rusqlite::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e)),
    }
}

/// Reject values longer than the column allows.
pub(crate) fn check_len(field: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(Error::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

pub(crate) fn check_opt_len(field: &str, value: Option<&str>, max: usize) -> Result<()> {
    value.map_or(Ok(()), |v| check_len(field, v, max))
}
