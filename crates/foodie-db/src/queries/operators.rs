//! Operator profile operations.

use foodie_core::{BaseUserId, Error, OperatorId, Result};
use rusqlite::Connection;

use super::{base_users, optional, write_err};
use crate::models::Operator;

/// Attach an operator profile to an existing base user.
pub fn create_operator(conn: &Connection, base_user_id: BaseUserId) -> Result<Operator> {
    let operator = Operator {
        id: OperatorId::new(),
        base_user_id,
    };

    conn.execute(
        "INSERT INTO operators (id, base_user_id) VALUES (?1, ?2)",
        rusqlite::params![operator.id.to_string(), base_user_id.to_string()],
    )
    .map_err(|e| write_err(e, "Operator for this user"))?;

    Ok(operator)
}

pub fn get_operator(conn: &Connection, id: OperatorId) -> Result<Option<Operator>> {
    optional(conn.query_row(
        "SELECT id, base_user_id FROM operators WHERE id = ?1",
        [id.to_string()],
        Operator::from_row,
    ))
}

pub fn get_operator_by_base_user(
    conn: &Connection,
    base_user_id: BaseUserId,
) -> Result<Option<Operator>> {
    optional(conn.query_row(
        "SELECT id, base_user_id FROM operators WHERE base_user_id = ?1",
        [base_user_id.to_string()],
        Operator::from_row,
    ))
}

pub fn list_operators(conn: &Connection) -> Result<Vec<Operator>> {
    let mut stmt = conn
        .prepare("SELECT id, base_user_id FROM operators ORDER BY id")
        .map_err(Error::database)?;
    let rows = stmt
        .query_map([], Operator::from_row)
        .map_err(Error::database)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::database)?;
    Ok(rows)
}

/// The owning account's [`BaseUser::full_name`](crate::models::BaseUser::full_name).
pub fn display_name(conn: &Connection, id: OperatorId) -> Result<Option<String>> {
    Ok(base_users::get_owner(conn, "operators", &id.to_string())?.map(|u| u.full_name()))
}

pub fn delete_operator(conn: &Connection, id: OperatorId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM operators WHERE id = ?1", [id.to_string()])
        .map_err(Error::database)?;
    Ok(n > 0)
}
