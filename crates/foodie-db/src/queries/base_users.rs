//! Base user account operations.
//!
//! Covers the account manager behaviour (create with a normalized email),
//! insert-or-update saves, and the presence-based role checks.

use foodie_core::{BaseUserId, Error, Result};
use rusqlite::Connection;

use super::{check_len, check_opt_len, optional, write_err};
use crate::models::{encode_ts, BaseUser, NamedUser};
use crate::queries::{customers, operators};

const COLS: &str = "id, email, first_name, last_name, image, thumbnail, date_joined, is_active";

/// Lowercase the domain part of an email address, leaving the local part as
/// typed. Input without an `@` is returned unchanged.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

fn validate(user: &BaseUser) -> Result<()> {
    if user.email.is_empty() {
        return Err(Error::validation("email is required"));
    }
    check_len("email", &user.email, 64)?;
    check_opt_len("first_name", user.first_name.as_deref(), 32)?;
    check_opt_len("last_name", user.last_name.as_deref(), 32)?;
    Ok(())
}

/// Create and save an active user with the given email.
pub fn create_user(conn: &Connection, email: &str) -> Result<BaseUser> {
    let mut user = BaseUser::new(normalize_email(email));
    user.is_active = true;
    save_base_user(conn, &user)?;
    Ok(user)
}

/// Insert the user, or update every column if the ID already exists.
///
/// `date_joined` is kept from the first insert.
pub fn save_base_user(conn: &Connection, user: &BaseUser) -> Result<()> {
    validate(user)?;

    conn.execute(
        "INSERT INTO base_users (id, email, first_name, last_name, image, thumbnail, date_joined, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(id) DO UPDATE SET
            email = excluded.email,
            first_name = excluded.first_name,
            last_name = excluded.last_name,
            image = excluded.image,
            thumbnail = excluded.thumbnail,
            is_active = excluded.is_active",
        rusqlite::params![
            user.id.to_string(),
            user.email,
            user.first_name,
            user.last_name,
            user.image,
            user.thumbnail,
            encode_ts(&user.date_joined),
            user.is_active,
        ],
    )
    .map_err(|e| write_err(e, &format!("User with email '{}'", user.email)))?;

    Ok(())
}

/// Get a user by primary key.
pub fn get_base_user(conn: &Connection, id: BaseUserId) -> Result<Option<BaseUser>> {
    let q = format!("SELECT {COLS} FROM base_users WHERE id = ?1");
    optional(conn.query_row(&q, [id.to_string()], BaseUser::from_row))
}

/// Get a user by login identifier. The email is normalized before lookup.
pub fn get_base_user_by_email(conn: &Connection, email: &str) -> Result<Option<BaseUser>> {
    let q = format!("SELECT {COLS} FROM base_users WHERE email = ?1");
    optional(conn.query_row(&q, [normalize_email(email)], BaseUser::from_row))
}

/// List all users ordered by email.
pub fn list_base_users(conn: &Connection) -> Result<Vec<BaseUser>> {
    let q = format!("SELECT {COLS} FROM base_users ORDER BY email ASC");
    let mut stmt = conn.prepare(&q).map_err(Error::database)?;
    let rows = stmt
        .query_map([], BaseUser::from_row)
        .map_err(Error::database)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::database)?;
    Ok(rows)
}

/// Delete a user by ID. Role records cascade. Returns true if a row was deleted.
pub fn delete_base_user(conn: &Connection, id: BaseUserId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM base_users WHERE id = ?1", [id.to_string()])
        .map_err(Error::database)?;
    Ok(n > 0)
}

/// True when a customer record is attached to this user.
pub fn is_customer(conn: &Connection, id: BaseUserId) -> Result<bool> {
    Ok(customers::get_customer_by_base_user(conn, id)?.is_some())
}

/// True when an operator record is attached to this user.
pub fn is_operator(conn: &Connection, id: BaseUserId) -> Result<bool> {
    Ok(operators::get_operator_by_base_user(conn, id)?.is_some())
}

/// The customer or operator record attached to this user.
///
/// A customer wins if both exist; `None` when neither does.
pub fn get_named_user(conn: &Connection, id: BaseUserId) -> Result<Option<NamedUser>> {
    if let Some(customer) = customers::get_customer_by_base_user(conn, id)? {
        return Ok(Some(NamedUser::Customer(customer)));
    }
    Ok(operators::get_operator_by_base_user(conn, id)?.map(NamedUser::Operator))
}

/// The account that owns a row in a role table (`customers` or `operators`).
pub(crate) fn get_owner(
    conn: &Connection,
    role_table: &str,
    role_id: &str,
) -> Result<Option<BaseUser>> {
    let q = format!(
        "SELECT {} FROM base_users u JOIN {role_table} r ON r.base_user_id = u.id WHERE r.id = ?1",
        COLS.split(", ")
            .map(|c| format!("u.{c}"))
            .collect::<Vec<_>>()
            .join(", ")
    );
    optional(conn.query_row(&q, [role_id], BaseUser::from_row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures;

    #[test]
    fn normalize_lowercases_domain_only() {
        assert_eq!(normalize_email("Ada@Example.COM"), "Ada@example.com");
        assert_eq!(normalize_email("  bob@HOST  "), "bob@host");
        assert_eq!(normalize_email("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn create_user_is_active_and_persisted() {
        let conn = fixtures::conn();
        let user = create_user(&conn, "Ada@Example.COM").unwrap();
        assert!(user.is_active);

        let found = get_base_user(&conn, user.id).unwrap().unwrap();
        assert_eq!(found, user);
        assert_eq!(found.username(), "Ada@example.com");
    }

    #[test]
    fn duplicate_email_is_conflict() {
        let conn = fixtures::conn();
        create_user(&conn, "dup@example.com").unwrap();
        let err = create_user(&conn, "dup@EXAMPLE.com").unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn save_updates_existing_row() {
        let conn = fixtures::conn();
        let mut user = create_user(&conn, "ada@example.com").unwrap();
        user.first_name = Some("Ada".into());
        user.thumbnail = Some("base_user/thumbnails/x.jpeg".into());
        save_base_user(&conn, &user).unwrap();

        let found = get_base_user(&conn, user.id).unwrap().unwrap();
        assert_eq!(found.first_name.as_deref(), Some("Ada"));
        assert_eq!(found.thumbnail.as_deref(), Some("base_user/thumbnails/x.jpeg"));
        assert_eq!(list_base_users(&conn).unwrap().len(), 1);
    }

    #[test]
    fn overlong_name_is_rejected() {
        let conn = fixtures::conn();
        let mut user = BaseUser::new("ada@example.com");
        user.first_name = Some("x".repeat(33));
        assert!(matches!(
            save_base_user(&conn, &user),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn lookup_by_email_normalizes() {
        let conn = fixtures::conn();
        let user = create_user(&conn, "ada@example.com").unwrap();
        let found = get_base_user_by_email(&conn, "ada@EXAMPLE.com").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(get_base_user_by_email(&conn, "nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn named_user_is_customer_when_linked() {
        let conn = fixtures::conn();
        let customer = fixtures::customer(&conn, "c@example.com");

        assert!(is_customer(&conn, customer.base_user_id).unwrap());
        assert!(!is_operator(&conn, customer.base_user_id).unwrap());
        assert_eq!(
            get_named_user(&conn, customer.base_user_id).unwrap(),
            Some(NamedUser::Customer(customer))
        );
    }

    #[test]
    fn named_user_is_operator_when_linked() {
        let conn = fixtures::conn();
        let user = create_user(&conn, "op@example.com").unwrap();
        let operator = operators::create_operator(&conn, user.id).unwrap();

        assert!(is_operator(&conn, user.id).unwrap());
        let named = get_named_user(&conn, user.id).unwrap().unwrap();
        assert!(named.is_operator());
        assert_eq!(named, NamedUser::Operator(operator));
    }

    #[test]
    fn named_user_is_none_without_role() {
        let conn = fixtures::conn();
        let user = create_user(&conn, "plain@example.com").unwrap();
        assert!(get_named_user(&conn, user.id).unwrap().is_none());
        assert!(!is_customer(&conn, user.id).unwrap());
    }

    #[test]
    fn delete_cascades_to_role_records() {
        let conn = fixtures::conn();
        let customer = fixtures::customer(&conn, "gone@example.com");
        assert!(delete_base_user(&conn, customer.base_user_id).unwrap());
        assert!(customers::get_customer(&conn, customer.id).unwrap().is_none());
        assert!(!delete_base_user(&conn, customer.base_user_id).unwrap());
    }
}
