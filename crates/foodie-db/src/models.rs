//! Rust structs mapping to database tables.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`. Timestamps are stored as fixed-width RFC 3339 text in
//! UTC with microsecond precision, so comparing the stored strings orders
//! them chronologically.

use std::fmt;

use chrono::{DateTime, Datelike, SecondsFormat, SubsecRound, Utc};
use foodie_core::{
    BaseUserId, CustomerId, DispatcherId, MenuId, MenuItemId, MenuItemType, OperatorId, OrderId,
    OrderStatus, ServiceRatingId,
};
use rusqlite::types::Type;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

/// Truncate a timestamp to the precision the database keeps.
pub fn normalize_ts(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(6)
}

/// Normalize a caller-supplied timestamp, rejecting years outside
/// `0..=9999`. Those encode with a sign and extra digits, which breaks
/// ordering of the stored text and cannot be parsed back.
pub fn checked_ts(ts: DateTime<Utc>) -> foodie_core::Result<DateTime<Utc>> {
    if !(0..=9999).contains(&ts.year()) {
        return Err(foodie_core::Error::validation(format!(
            "timestamp out of range: {ts}"
        )));
    }
    Ok(normalize_ts(ts))
}

/// Encode a timestamp in the stored text form.
pub fn encode_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_err(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

/// Parse a UUID-based ID from a text column.
fn parse_id<T: From<Uuid>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    let s: String = row.get(idx)?;
    let uuid = Uuid::parse_str(&s).map_err(|e| conversion_err(idx, e))?;
    Ok(T::from(uuid))
}

fn parse_ts(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| conversion_err(idx, e))
}

/// Parse a column whose text must be one of a closed set of values.
fn parse_enum<T>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = foodie_core::Error>,
{
    let s: String = row.get(idx)?;
    s.parse().map_err(|e| conversion_err(idx, e))
}

fn parse_bool(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<bool> {
    Ok(row.get::<_, i32>(idx)? != 0)
}

/// "first last", trimmed; `None` when both parts are blank.
fn join_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let full = format!("{} {}", first.unwrap_or(""), last.unwrap_or(""));
    let full = full.trim();
    (!full.is_empty()).then(|| full.to_string())
}

// ---------------------------------------------------------------------------
// BaseUser
// ---------------------------------------------------------------------------

/// Account record shared by customers and operators. The email is the login
/// identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseUser {
    pub id: BaseUserId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Storage path of the uploaded image.
    pub image: Option<String>,
    /// Storage path of the generated thumbnail.
    pub thumbnail: Option<String>,
    pub date_joined: DateTime<Utc>,
    pub is_active: bool,
}

impl BaseUser {
    /// A fresh, inactive, not yet persisted account.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: BaseUserId::new(),
            email: email.into(),
            first_name: None,
            last_name: None,
            image: None,
            thumbnail: None,
            date_joined: normalize_ts(Utc::now()),
            is_active: false,
        }
    }

    pub fn username(&self) -> &str {
        &self.email
    }

    /// Display name, falling back to the email when no name is set.
    pub fn full_name(&self) -> String {
        join_name(self.first_name.as_deref(), self.last_name.as_deref())
            .unwrap_or_else(|| self.email.clone())
    }

    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            email: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            image: row.get(4)?,
            thumbnail: row.get(5)?,
            date_joined: parse_ts(row, 6)?,
            is_active: parse_bool(row, 7)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Customer / Operator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub base_user_id: BaseUserId,
    pub address: Option<String>,
    pub is_email_verified: bool,
    pub mobile_number: Option<String>,
    pub phone_number: Option<String>,
}

impl Customer {
    pub fn is_customer(&self) -> bool {
        true
    }

    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            base_user_id: parse_id(row, 1)?,
            address: row.get(2)?,
            is_email_verified: parse_bool(row, 3)?,
            mobile_number: row.get(4)?,
            phone_number: row.get(5)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub id: OperatorId,
    pub base_user_id: BaseUserId,
}

impl Operator {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            base_user_id: parse_id(row, 1)?,
        })
    }
}

/// The role record attached to a [`BaseUser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum NamedUser {
    Customer(Customer),
    Operator(Operator),
}

impl NamedUser {
    pub fn base_user_id(&self) -> BaseUserId {
        match self {
            Self::Customer(c) => c.base_user_id,
            Self::Operator(o) => o.base_user_id,
        }
    }

    pub fn is_customer(&self) -> bool {
        matches!(self, Self::Customer(_))
    }

    pub fn is_operator(&self) -> bool {
        matches!(self, Self::Operator(_))
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatcher {
    pub id: DispatcherId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    pub is_active: bool,
}

impl Dispatcher {
    pub fn full_name(&self) -> String {
        join_name(self.first_name.as_deref(), self.last_name.as_deref())
            .unwrap_or_else(|| self.email.clone())
    }

    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            email: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            image: row.get(4)?,
            thumbnail: row.get(5)?,
            is_active: parse_bool(row, 6)?,
        })
    }
}

// ---------------------------------------------------------------------------
// MenuItem / Menu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub item_type: MenuItemType,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    pub is_active: bool,
}

impl MenuItem {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            item_type: parse_enum(row, 1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            image: row.get(4)?,
            thumbnail: row.get(5)?,
            is_active: parse_bool(row, 6)?,
        })
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A dated menu. Its items live in the `menu_menu_items` join table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub id: MenuId,
    pub datetime: DateTime<Utc>,
}

impl Menu {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            datetime: parse_ts(row, 1)?,
        })
    }
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.datetime)
    }
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub dispatcher_id: DispatcherId,
    pub datetime: DateTime<Utc>,
    pub status: OrderStatus,
    pub delivery_time_from: DateTime<Utc>,
    pub delivery_time_to: DateTime<Utc>,
}

impl Order {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            customer_id: parse_id(row, 1)?,
            dispatcher_id: parse_id(row, 2)?,
            datetime: parse_ts(row, 3)?,
            status: parse_enum(row, 4)?,
            delivery_time_from: parse_ts(row, 5)?,
            delivery_time_to: parse_ts(row, 6)?,
        })
    }
}

// ---------------------------------------------------------------------------
// ServiceRating
// ---------------------------------------------------------------------------

/// Feedback flags and free text left with a rating. Every flag defaults to
/// `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingFeedback {
    pub taste: bool,
    pub delivery: bool,
    pub packaging: bool,
    pub support: bool,
    pub comments: Option<String>,
}

impl Default for RatingFeedback {
    fn default() -> Self {
        Self {
            taste: true,
            delivery: true,
            packaging: true,
            support: true,
            comments: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRating {
    pub id: ServiceRatingId,
    pub customer_id: CustomerId,
    pub order_id: OrderId,
    pub datetime: DateTime<Utc>,
    pub rating: i32,
    pub feedback: RatingFeedback,
}

impl ServiceRating {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            customer_id: parse_id(row, 1)?,
            order_id: parse_id(row, 2)?,
            datetime: parse_ts(row, 3)?,
            rating: row.get(4)?,
            feedback: RatingFeedback {
                taste: parse_bool(row, 5)?,
                delivery: parse_bool(row, 6)?,
                packaging: parse_bool(row, 7)?,
                support: parse_bool(row, 8)?,
                comments: row.get(9)?,
            },
        })
    }
}
