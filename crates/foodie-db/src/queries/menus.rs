//! Dated menu operations and the current-menu lookup.

use chrono::{DateTime, Utc};
use foodie_core::{Error, MenuId, MenuItemId, Result};
use rusqlite::Connection;

use super::{optional, write_err};
use crate::models::{checked_ts, encode_ts, Menu, MenuItem};

/// Create an empty menu for the given time.
pub fn create_menu(conn: &Connection, datetime: DateTime<Utc>) -> Result<Menu> {
    let menu = Menu {
        id: MenuId::new(),
        datetime: checked_ts(datetime)?,
    };

    conn.execute(
        "INSERT INTO menus (id, datetime) VALUES (?1, ?2)",
        rusqlite::params![menu.id.to_string(), encode_ts(&menu.datetime)],
    )
    .map_err(|e| write_err(e, "Menu"))?;

    Ok(menu)
}

pub fn get_menu(conn: &Connection, id: MenuId) -> Result<Option<Menu>> {
    optional(conn.query_row(
        "SELECT id, datetime FROM menus WHERE id = ?1",
        [id.to_string()],
        Menu::from_row,
    ))
}

/// All menus, earliest first.
pub fn list_menus(conn: &Connection) -> Result<Vec<Menu>> {
    let mut stmt = conn
        .prepare("SELECT id, datetime FROM menus ORDER BY datetime ASC, id ASC")
        .map_err(Error::database)?;
    let rows = stmt
        .query_map([], Menu::from_row)
        .map_err(Error::database)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::database)?;
    Ok(rows)
}

/// Move a menu to another time. Returns false when the menu does not exist.
pub fn reschedule_menu(conn: &Connection, id: MenuId, datetime: DateTime<Utc>) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE menus SET datetime = ?1 WHERE id = ?2",
            rusqlite::params![encode_ts(&checked_ts(datetime)?), id.to_string()],
        )
        .map_err(Error::database)?;
    Ok(n > 0)
}

pub fn delete_menu(conn: &Connection, id: MenuId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM menus WHERE id = ?1", [id.to_string()])
        .map_err(Error::database)?;
    Ok(n > 0)
}

/// The first upcoming menu: earliest datetime that is not before now.
pub fn get_current_menu(conn: &Connection) -> Result<Option<Menu>> {
    get_current_menu_at(conn, Utc::now())
}

/// [`get_current_menu`] against an explicit clock.
pub fn get_current_menu_at(conn: &Connection, now: DateTime<Utc>) -> Result<Option<Menu>> {
    optional(conn.query_row(
        "SELECT id, datetime FROM menus
         WHERE datetime >= ?1
         ORDER BY datetime ASC, id ASC
         LIMIT 1",
        [encode_ts(&checked_ts(now)?)],
        Menu::from_row,
    ))
}

/// Put an item on a menu. Adding an item twice is a no-op.
pub fn add_menu_item(conn: &Connection, menu_id: MenuId, item_id: MenuItemId) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO menu_menu_items (menu_id, menu_item_id) VALUES (?1, ?2)",
        rusqlite::params![menu_id.to_string(), item_id.to_string()],
    )
    .map_err(|e| write_err(e, "Menu entry"))?;
    Ok(())
}

/// Take an item off a menu. Returns false when it was not listed.
pub fn remove_menu_item(conn: &Connection, menu_id: MenuId, item_id: MenuItemId) -> Result<bool> {
    let n = conn
        .execute(
            "DELETE FROM menu_menu_items WHERE menu_id = ?1 AND menu_item_id = ?2",
            rusqlite::params![menu_id.to_string(), item_id.to_string()],
        )
        .map_err(Error::database)?;
    Ok(n > 0)
}

/// Items listed on a menu, ordered by name.
pub fn list_menu_items(conn: &Connection, menu_id: MenuId) -> Result<Vec<MenuItem>> {
    let mut stmt = conn
        .prepare(
            "SELECT mi.id, mi.item_type, mi.name, mi.description, mi.image, mi.thumbnail, mi.is_active
             FROM menu_items mi
             JOIN menu_menu_items mmi ON mmi.menu_item_id = mi.id
             WHERE mmi.menu_id = ?1
             ORDER BY mi.name",
        )
        .map_err(Error::database)?;
    let rows = stmt
        .query_map([menu_id.to_string()], MenuItem::from_row)
        .map_err(Error::database)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::database)?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{fixtures, menu_items};
    use chrono::{Duration, TimeZone};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn current_menu_none_when_all_past() {
        let conn = fixtures::conn();
        create_menu(&conn, at(1, 12)).unwrap();
        create_menu(&conn, at(2, 12)).unwrap();

        assert!(get_current_menu_at(&conn, at(3, 0)).unwrap().is_none());
    }

    #[test]
    fn current_menu_none_when_empty() {
        let conn = fixtures::conn();
        assert!(get_current_menu(&conn).unwrap().is_none());
    }

    #[test]
    fn current_menu_is_earliest_upcoming() {
        let conn = fixtures::conn();
        create_menu(&conn, at(1, 12)).unwrap();
        let later = create_menu(&conn, at(9, 12)).unwrap();
        let soonest = create_menu(&conn, at(5, 12)).unwrap();

        let current = get_current_menu_at(&conn, at(3, 0)).unwrap().unwrap();
        assert_eq!(current, soonest);
        assert_ne!(current, later);
    }

    #[test]
    fn current_menu_includes_exact_now() {
        let conn = fixtures::conn();
        let menu = create_menu(&conn, at(4, 12)).unwrap();
        assert_eq!(get_current_menu_at(&conn, at(4, 12)).unwrap(), Some(menu));
    }

    #[test]
    fn out_of_range_year_is_rejected() {
        let conn = fixtures::conn();
        let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        let menu = create_menu(&conn, at(1, 12)).unwrap();

        assert!(matches!(create_menu(&conn, far), Err(Error::Validation(_))));
        assert!(matches!(
            reschedule_menu(&conn, menu.id, far),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            get_current_menu_at(&conn, far),
            Err(Error::Validation(_))
        ));

        assert_eq!(list_menus(&conn).unwrap(), vec![menu.clone()]);
        assert_eq!(get_current_menu_at(&conn, at(1, 0)).unwrap(), Some(menu));
    }

    #[test]
    fn current_menu_uses_wall_clock() {
        let conn = fixtures::conn();
        create_menu(&conn, Utc::now() - Duration::days(1)).unwrap();
        let upcoming = create_menu(&conn, Utc::now() + Duration::days(1)).unwrap();
        assert_eq!(get_current_menu(&conn).unwrap(), Some(upcoming));
    }

    #[test]
    fn menu_items_membership() {
        let conn = fixtures::conn();
        let menu = create_menu(&conn, at(1, 12)).unwrap();
        let soup = fixtures::menu_item(&conn, "Soup");
        let bread = fixtures::menu_item(&conn, "Bread");

        add_menu_item(&conn, menu.id, soup.id).unwrap();
        add_menu_item(&conn, menu.id, bread.id).unwrap();
        add_menu_item(&conn, menu.id, soup.id).unwrap();

        let names: Vec<_> = list_menu_items(&conn, menu.id)
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, ["Bread", "Soup"]);

        assert!(remove_menu_item(&conn, menu.id, soup.id).unwrap());
        assert!(!remove_menu_item(&conn, menu.id, soup.id).unwrap());

        // Deleting the item drops it from the menu.
        menu_items::delete_menu_item(&conn, bread.id).unwrap();
        assert!(list_menu_items(&conn, menu.id).unwrap().is_empty());
    }

    #[test]
    fn reschedule_and_delete() {
        let conn = fixtures::conn();
        let menu = create_menu(&conn, at(1, 12)).unwrap();
        assert!(reschedule_menu(&conn, menu.id, at(8, 12)).unwrap());
        assert_eq!(get_menu(&conn, menu.id).unwrap().unwrap().datetime, at(8, 12));
        assert_eq!(list_menus(&conn).unwrap().len(), 1);

        assert!(delete_menu(&conn, menu.id).unwrap());
        assert!(get_menu(&conn, menu.id).unwrap().is_none());
    }

    #[test]
    fn display_is_datetime() {
        let menu = Menu {
            id: MenuId::new(),
            datetime: at(1, 12),
        };
        assert_eq!(menu.to_string(), "2030-06-01 12:00:00 UTC");
    }
}
