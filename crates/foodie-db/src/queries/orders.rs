//! Order operations.
//!
//! An order is created in `RECEIVED` state together with its menu items in a
//! single transaction. Status changes go through [`set_status`], which only
//! accepts the closed [`OrderStatus`] enum; the schema's CHECK constraint
//! rejects any other stored value.

use chrono::{DateTime, Utc};
use foodie_core::{CustomerId, DispatcherId, Error, MenuItemId, OrderId, OrderStatus, Result};
use rusqlite::Connection;

use super::{optional, write_err};
use crate::models::{checked_ts, encode_ts, normalize_ts, MenuItem, Order};

const COLS: &str =
    "id, customer_id, dispatcher_id, datetime, status, delivery_time_from, delivery_time_to";

/// Place an order for the given items.
///
/// The delivery window must not end before it starts.
pub fn create_order(
    conn: &Connection,
    customer_id: CustomerId,
    dispatcher_id: DispatcherId,
    delivery_time_from: DateTime<Utc>,
    delivery_time_to: DateTime<Utc>,
    menu_item_ids: &[MenuItemId],
) -> Result<Order> {
    if delivery_time_to < delivery_time_from {
        return Err(Error::validation(
            "delivery window ends before it starts",
        ));
    }

    let order = Order {
        id: OrderId::new(),
        customer_id,
        dispatcher_id,
        datetime: normalize_ts(Utc::now()),
        status: OrderStatus::Received,
        delivery_time_from: checked_ts(delivery_time_from)?,
        delivery_time_to: checked_ts(delivery_time_to)?,
    };

    let tx = conn.unchecked_transaction().map_err(Error::database)?;

    tx.execute(
        "INSERT INTO orders (id, customer_id, dispatcher_id, datetime, status, delivery_time_from, delivery_time_to)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            order.id.to_string(),
            customer_id.to_string(),
            dispatcher_id.to_string(),
            encode_ts(&order.datetime),
            order.status.as_str(),
            encode_ts(&order.delivery_time_from),
            encode_ts(&order.delivery_time_to),
        ],
    )
    .map_err(|e| write_err(e, "Order"))?;

    for item_id in menu_item_ids {
        insert_item(&tx, order.id, *item_id)?;
    }

    tx.commit().map_err(Error::database)?;

    Ok(order)
}

fn insert_item(conn: &Connection, order_id: OrderId, item_id: MenuItemId) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO order_menu_items (order_id, menu_item_id) VALUES (?1, ?2)",
        rusqlite::params![order_id.to_string(), item_id.to_string()],
    )
    .map_err(|e| write_err(e, "Order entry"))?;
    Ok(())
}

pub fn get_order(conn: &Connection, id: OrderId) -> Result<Option<Order>> {
    let q = format!("SELECT {COLS} FROM orders WHERE id = ?1");
    optional(conn.query_row(&q, [id.to_string()], Order::from_row))
}

/// A customer's orders, newest first.
pub fn list_orders_for_customer(conn: &Connection, customer_id: CustomerId) -> Result<Vec<Order>> {
    list_where(conn, "customer_id = ?1", &customer_id.to_string())
}

/// A dispatcher's orders, newest first.
pub fn list_orders_for_dispatcher(
    conn: &Connection,
    dispatcher_id: DispatcherId,
) -> Result<Vec<Order>> {
    list_where(conn, "dispatcher_id = ?1", &dispatcher_id.to_string())
}

/// Orders currently in the given state, newest first.
pub fn list_orders_by_status(conn: &Connection, status: OrderStatus) -> Result<Vec<Order>> {
    list_where(conn, "status = ?1", status.as_str())
}

fn list_where(conn: &Connection, filter: &str, value: &str) -> Result<Vec<Order>> {
    let q = format!("SELECT {COLS} FROM orders WHERE {filter} ORDER BY datetime DESC, id");
    let mut stmt = conn.prepare(&q).map_err(Error::database)?;
    let rows = stmt
        .query_map([value], Order::from_row)
        .map_err(Error::database)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::database)?;
    Ok(rows)
}

/// Move an order to another state.
pub fn set_status(conn: &Connection, id: OrderId, status: OrderStatus) -> Result<()> {
    let n = conn
        .execute(
            "UPDATE orders SET status = ?1 WHERE id = ?2",
            rusqlite::params![status.as_str(), id.to_string()],
        )
        .map_err(|e| write_err(e, "Order"))?;

    if n == 0 {
        return Err(Error::not_found("order", id));
    }
    Ok(())
}

/// Parse an externally supplied status and apply it.
///
/// Anything outside `RECEIVED`, `CANCELLED` and `DELIVERED` is rejected
/// before the database is touched.
pub fn set_status_str(conn: &Connection, id: OrderId, status: &str) -> Result<()> {
    let status: OrderStatus = status.parse()?;
    set_status(conn, id, status)
}

pub fn add_order_item(conn: &Connection, order_id: OrderId, item_id: MenuItemId) -> Result<()> {
    insert_item(conn, order_id, item_id)
}

pub fn remove_order_item(conn: &Connection, order_id: OrderId, item_id: MenuItemId) -> Result<bool> {
    let n = conn
        .execute(
            "DELETE FROM order_menu_items WHERE order_id = ?1 AND menu_item_id = ?2",
            rusqlite::params![order_id.to_string(), item_id.to_string()],
        )
        .map_err(Error::database)?;
    Ok(n > 0)
}

/// Items on an order, ordered by name.
pub fn list_order_items(conn: &Connection, order_id: OrderId) -> Result<Vec<MenuItem>> {
    let mut stmt = conn
        .prepare(
            "SELECT mi.id, mi.item_type, mi.name, mi.description, mi.image, mi.thumbnail, mi.is_active
             FROM menu_items mi
             JOIN order_menu_items omi ON omi.menu_item_id = mi.id
             WHERE omi.order_id = ?1
             ORDER BY mi.name",
        )
        .map_err(Error::database)?;
    let rows = stmt
        .query_map([order_id.to_string()], MenuItem::from_row)
        .map_err(Error::database)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::database)?;
    Ok(rows)
}

/// Delete an order. Its ratings cascade.
pub fn delete_order(conn: &Connection, id: OrderId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM orders WHERE id = ?1", [id.to_string()])
        .map_err(Error::database)?;
    Ok(n > 0)
}
