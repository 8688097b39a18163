//! Menu item (catalogue) operations.

use foodie_core::{Error, MenuItemId, MenuItemType, Result};
use rusqlite::Connection;

use super::{check_len, optional, write_err};
use crate::models::MenuItem;

const COLS: &str = "id, item_type, name, description, image, thumbnail, is_active";

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("name is required"));
    }
    check_len("name", name, 32)
}

/// Create an active menu item.
pub fn create_menu_item(
    conn: &Connection,
    item_type: MenuItemType,
    name: &str,
    description: Option<&str>,
) -> Result<MenuItem> {
    validate_name(name)?;
    let id = MenuItemId::new();

    conn.execute(
        "INSERT INTO menu_items (id, item_type, name, description, is_active)
         VALUES (?1, ?2, ?3, ?4, 1)",
        rusqlite::params![id.to_string(), item_type.as_str(), name, description],
    )
    .map_err(|e| write_err(e, &format!("Menu item '{name}'")))?;

    Ok(MenuItem {
        id,
        item_type,
        name: name.to_string(),
        description: description.map(String::from),
        image: None,
        thumbnail: None,
        is_active: true,
    })
}

pub fn get_menu_item(conn: &Connection, id: MenuItemId) -> Result<Option<MenuItem>> {
    let q = format!("SELECT {COLS} FROM menu_items WHERE id = ?1");
    optional(conn.query_row(&q, [id.to_string()], MenuItem::from_row))
}

/// List menu items ordered by name, optionally only the active ones.
pub fn list_menu_items(conn: &Connection, active_only: bool) -> Result<Vec<MenuItem>> {
    let q = if active_only {
        format!("SELECT {COLS} FROM menu_items WHERE is_active = 1 ORDER BY name")
    } else {
        format!("SELECT {COLS} FROM menu_items ORDER BY name")
    };
    let mut stmt = conn.prepare(&q).map_err(Error::database)?;
    let rows = stmt
        .query_map([], MenuItem::from_row)
        .map_err(Error::database)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::database)?;
    Ok(rows)
}

/// Overwrite every column of an existing menu item.
pub fn update_menu_item(conn: &Connection, item: &MenuItem) -> Result<bool> {
    validate_name(&item.name)?;

    let n = conn
        .execute(
            "UPDATE menu_items
             SET item_type = ?1, name = ?2, description = ?3, image = ?4, thumbnail = ?5, is_active = ?6
             WHERE id = ?7",
            rusqlite::params![
                item.item_type.as_str(),
                item.name,
                item.description,
                item.image,
                item.thumbnail,
                item.is_active,
                item.id.to_string(),
            ],
        )
        .map_err(|e| write_err(e, &format!("Menu item '{}'", item.name)))?;
    Ok(n > 0)
}

/// Delete a menu item. It is removed from every menu and order that lists it.
pub fn delete_menu_item(conn: &Connection, id: MenuItemId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM menu_items WHERE id = ?1", [id.to_string()])
        .map_err(Error::database)?;
    Ok(n > 0)
}
