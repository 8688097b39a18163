//! Service rating operations.

use chrono::Utc;
use foodie_core::{CustomerId, Error, OrderId, Result, ServiceRatingId};
use rusqlite::Connection;

use super::{optional, write_err};
use crate::models::{encode_ts, normalize_ts, RatingFeedback, ServiceRating};

const COLS: &str =
    "id, customer_id, order_id, datetime, rating, taste, delivery, packaging, support, comments";

/// Record a customer's rating of an order, stamped with the current time.
pub fn create_service_rating(
    conn: &Connection,
    customer_id: CustomerId,
    order_id: OrderId,
    rating: i32,
    feedback: &RatingFeedback,
) -> Result<ServiceRating> {
    let record = ServiceRating {
        id: ServiceRatingId::new(),
        customer_id,
        order_id,
        datetime: normalize_ts(Utc::now()),
        rating,
        feedback: feedback.clone(),
    };

    conn.execute(
        "INSERT INTO service_ratings (id, customer_id, order_id, datetime, rating, taste, delivery, packaging, support, comments)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        rusqlite::params![
            record.id.to_string(),
            customer_id.to_string(),
            order_id.to_string(),
            encode_ts(&record.datetime),
            rating,
            feedback.taste,
            feedback.delivery,
            feedback.packaging,
            feedback.support,
            feedback.comments,
        ],
    )
    .map_err(|e| write_err(e, "Service rating"))?;

    Ok(record)
}

pub fn get_service_rating(conn: &Connection, id: ServiceRatingId) -> Result<Option<ServiceRating>> {
    let q = format!("SELECT {COLS} FROM service_ratings WHERE id = ?1");
    optional(conn.query_row(&q, [id.to_string()], ServiceRating::from_row))
}

pub fn list_ratings_for_order(conn: &Connection, order_id: OrderId) -> Result<Vec<ServiceRating>> {
    list_where(conn, "order_id = ?1", &order_id.to_string())
}

pub fn list_ratings_for_customer(
    conn: &Connection,
    customer_id: CustomerId,
) -> Result<Vec<ServiceRating>> {
    list_where(conn, "customer_id = ?1", &customer_id.to_string())
}

fn list_where(conn: &Connection, filter: &str, value: &str) -> Result<Vec<ServiceRating>> {
    let q = format!("SELECT {COLS} FROM service_ratings WHERE {filter} ORDER BY datetime, id");
    let mut stmt = conn.prepare(&q).map_err(Error::database)?;
    let rows = stmt
        .query_map([value], ServiceRating::from_row)
        .map_err(Error::database)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::database)?;
    Ok(rows)
}

pub fn delete_service_rating(conn: &Connection, id: ServiceRatingId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM service_ratings WHERE id = ?1", [id.to_string()])
        .map_err(Error::database)?;
    Ok(n > 0)
}
