//! Closed enums of the ordering domain.
//!
//! Both enums serialize and store in uppercase, matching the values the
//! database `CHECK` constraints accept. Parsing any other string is a
//! validation error.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

// ---------------------------------------------------------------------------
// MenuItemType
// ---------------------------------------------------------------------------

/// Course a menu item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MenuItemType {
    Appetizer,
    Main,
    Dessert,
    Beverage,
}

impl MenuItemType {
    pub const ALL: [MenuItemType; 4] = [
        MenuItemType::Appetizer,
        MenuItemType::Main,
        MenuItemType::Dessert,
        MenuItemType::Beverage,
    ];

    /// Stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appetizer => "APPETIZER",
            Self::Main => "MAIN",
            Self::Dessert => "DESSERT",
            Self::Beverage => "BEVERAGE",
        }
    }
}

impl fmt::Display for MenuItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuItemType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::validation(format!("Invalid menu item type: {s}")))
    }
}

// ---------------------------------------------------------------------------
// OrderStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Received,
    Cancelled,
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Received,
        OrderStatus::Cancelled,
        OrderStatus::Delivered,
    ];

    /// Stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "RECEIVED",
            Self::Cancelled => "CANCELLED",
            Self::Delivered => "DELIVERED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| Error::validation(format!("Invalid order status: {s}")))
    }
}
