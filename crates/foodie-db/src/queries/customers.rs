//! Customer profile operations.

use foodie_core::{BaseUserId, CustomerId, Error, Result};
use rusqlite::Connection;

use super::{base_users, check_opt_len, optional, write_err};
use crate::models::Customer;

const COLS: &str = "id, base_user_id, address, is_email_verified, mobile_number, phone_number";

/// Attach a customer profile to an existing base user.
pub fn create_customer(conn: &Connection, base_user_id: BaseUserId) -> Result<Customer> {
    let customer = Customer {
        id: CustomerId::new(),
        base_user_id,
        address: None,
        is_email_verified: false,
        mobile_number: None,
        phone_number: None,
    };

    conn.execute(
        "INSERT INTO customers (id, base_user_id) VALUES (?1, ?2)",
        rusqlite::params![customer.id.to_string(), base_user_id.to_string()],
    )
    .map_err(|e| write_err(e, "Customer for this user"))?;

    Ok(customer)
}

pub fn get_customer(conn: &Connection, id: CustomerId) -> Result<Option<Customer>> {
    let q = format!("SELECT {COLS} FROM customers WHERE id = ?1");
    optional(conn.query_row(&q, [id.to_string()], Customer::from_row))
}

pub fn get_customer_by_base_user(
    conn: &Connection,
    base_user_id: BaseUserId,
) -> Result<Option<Customer>> {
    let q = format!("SELECT {COLS} FROM customers WHERE base_user_id = ?1");
    optional(conn.query_row(&q, [base_user_id.to_string()], Customer::from_row))
}

pub fn list_customers(conn: &Connection) -> Result<Vec<Customer>> {
    let q = format!("SELECT {COLS} FROM customers ORDER BY id");
    let mut stmt = conn.prepare(&q).map_err(Error::database)?;
    let rows = stmt
        .query_map([], Customer::from_row)
        .map_err(Error::database)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::database)?;
    Ok(rows)
}

/// Update contact details and the verification flag.
///
/// Returns false when no customer has this ID.
pub fn update_customer(conn: &Connection, customer: &Customer) -> Result<bool> {
    check_opt_len("address", customer.address.as_deref(), 64)?;
    check_opt_len("mobile_number", customer.mobile_number.as_deref(), 32)?;
    check_opt_len("phone_number", customer.phone_number.as_deref(), 32)?;

    let n = conn
        .execute(
            "UPDATE customers
             SET address = ?1, is_email_verified = ?2, mobile_number = ?3, phone_number = ?4
             WHERE id = ?5",
            rusqlite::params![
                customer.address,
                customer.is_email_verified,
                customer.mobile_number,
                customer.phone_number,
                customer.id.to_string(),
            ],
        )
        .map_err(|e| write_err(e, "Customer"))?;
    Ok(n > 0)
}

/// The owning account's [`BaseUser::full_name`](crate::models::BaseUser::full_name).
pub fn display_name(conn: &Connection, id: CustomerId) -> Result<Option<String>> {
    Ok(base_users::get_owner(conn, "customers", &id.to_string())?.map(|u| u.full_name()))
}

/// Delete a customer. Their orders and ratings cascade.
pub fn delete_customer(conn: &Connection, id: CustomerId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM customers WHERE id = ?1", [id.to_string()])
        .map_err(Error::database)?;
    Ok(n > 0)
}
