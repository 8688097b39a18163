//! Dispatcher operations.
//!
//! Dispatchers stand alone; they are not linked to a base user account.

use foodie_core::{DispatcherId, Error, Result};
use rusqlite::Connection;

use super::{check_len, check_opt_len, optional, write_err};
use crate::models::Dispatcher;

const COLS: &str = "id, email, first_name, last_name, image, thumbnail, is_active";

fn validate(email: &str, first_name: Option<&str>, last_name: Option<&str>) -> Result<()> {
    if email.is_empty() {
        return Err(Error::validation("email is required"));
    }
    check_len("email", email, 64)?;
    check_opt_len("first_name", first_name, 32)?;
    check_opt_len("last_name", last_name, 32)
}

/// Create an active dispatcher.
pub fn create_dispatcher(
    conn: &Connection,
    email: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<Dispatcher> {
    validate(email, first_name, last_name)?;
    let id = DispatcherId::new();

    conn.execute(
        "INSERT INTO dispatchers (id, email, first_name, last_name, is_active)
         VALUES (?1, ?2, ?3, ?4, 1)",
        rusqlite::params![id.to_string(), email, first_name, last_name],
    )
    .map_err(|e| write_err(e, &format!("Dispatcher '{email}'")))?;

    Ok(Dispatcher {
        id,
        email: email.to_string(),
        first_name: first_name.map(String::from),
        last_name: last_name.map(String::from),
        image: None,
        thumbnail: None,
        is_active: true,
    })
}

pub fn get_dispatcher(conn: &Connection, id: DispatcherId) -> Result<Option<Dispatcher>> {
    let q = format!("SELECT {COLS} FROM dispatchers WHERE id = ?1");
    optional(conn.query_row(&q, [id.to_string()], Dispatcher::from_row))
}

pub fn get_dispatcher_by_email(conn: &Connection, email: &str) -> Result<Option<Dispatcher>> {
    let q = format!("SELECT {COLS} FROM dispatchers WHERE email = ?1");
    optional(conn.query_row(&q, [email], Dispatcher::from_row))
}

/// List dispatchers ordered by email, optionally only the active ones.
pub fn list_dispatchers(conn: &Connection, active_only: bool) -> Result<Vec<Dispatcher>> {
    let q = if active_only {
        format!("SELECT {COLS} FROM dispatchers WHERE is_active = 1 ORDER BY email")
    } else {
        format!("SELECT {COLS} FROM dispatchers ORDER BY email")
    };
    let mut stmt = conn.prepare(&q).map_err(Error::database)?;
    let rows = stmt
        .query_map([], Dispatcher::from_row)
        .map_err(Error::database)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::database)?;
    Ok(rows)
}

/// Overwrite every column of an existing dispatcher.
pub fn update_dispatcher(conn: &Connection, dispatcher: &Dispatcher) -> Result<bool> {
    validate(
        &dispatcher.email,
        dispatcher.first_name.as_deref(),
        dispatcher.last_name.as_deref(),
    )?;

    let n = conn
        .execute(
            "UPDATE dispatchers
             SET email = ?1, first_name = ?2, last_name = ?3, image = ?4, thumbnail = ?5, is_active = ?6
             WHERE id = ?7",
            rusqlite::params![
                dispatcher.email,
                dispatcher.first_name,
                dispatcher.last_name,
                dispatcher.image,
                dispatcher.thumbnail,
                dispatcher.is_active,
                dispatcher.id.to_string(),
            ],
        )
        .map_err(|e| write_err(e, &format!("Dispatcher '{}'", dispatcher.email)))?;
    Ok(n > 0)
}

/// Delete a dispatcher. Their orders cascade.
pub fn delete_dispatcher(conn: &Connection, id: DispatcherId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM dispatchers WHERE id = ?1", [id.to_string()])
        .map_err(Error::database)?;
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures;

    #[test]
    fn create_defaults_to_active() {
        let conn = fixtures::conn();
        let d = create_dispatcher(&conn, "d@example.com", Some("Dan"), Some("Ride")).unwrap();
        assert!(d.is_active);
        assert_eq!(d.full_name(), "Dan Ride");
        assert_eq!(get_dispatcher(&conn, d.id).unwrap(), Some(d.clone()));
        assert_eq!(
            get_dispatcher_by_email(&conn, "d@example.com").unwrap(),
            Some(d)
        );
    }

    #[test]
    fn duplicate_email_is_conflict() {
        let conn = fixtures::conn();
        create_dispatcher(&conn, "d@example.com", None, None).unwrap();
        assert!(matches!(
            create_dispatcher(&conn, "d@example.com", None, None),
            Err(Error::Conflict(_))
        ));
    }

    #[test]
    fn list_active_only() {
        let conn = fixtures::conn();
        let mut a = create_dispatcher(&conn, "a@example.com", None, None).unwrap();
        create_dispatcher(&conn, "b@example.com", None, None).unwrap();

        a.is_active = false;
        a.image = Some("dispatcher/images/a.jpeg".into());
        assert!(update_dispatcher(&conn, &a).unwrap());

        assert_eq!(list_dispatchers(&conn, false).unwrap().len(), 2);
        let active = list_dispatchers(&conn, true).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].email, "b@example.com");
    }

    #[test]
    fn delete_dispatcher_by_id() {
        let conn = fixtures::conn();
        let d = fixtures::dispatcher(&conn);
        assert!(delete_dispatcher(&conn, d.id).unwrap());
        assert!(!delete_dispatcher(&conn, d.id).unwrap());
    }
}
