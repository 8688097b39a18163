//! Record identifiers.
//!
//! Every table keys its rows by UUID, and each table gets its own wrapper
//! type so an order ID cannot be handed to a customer lookup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Declare one UUID-backed ID type per name.
///
/// Each type is `Copy`, hashes and compares by value, serializes as the bare
/// UUID string, and converts to and from `Uuid`. `Default` is a fresh
/// random ID.
macro_rules! typed_id {
    ($($(#[doc = $doc:expr])* $name:ident),+ $(,)?) => {
        $(
            $(#[doc = $doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(Uuid);

            impl $name {
                /// A random (v4) ID.
                #[must_use]
                pub fn new() -> Self {
                    Self(Uuid::new_v4())
                }
            }

            impl Default for $name {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl FromStr for $name {
                type Err = uuid::Error;

                fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                    Uuid::parse_str(s).map(Self)
                }
            }

            impl From<Uuid> for $name {
                fn from(uuid: Uuid) -> Self {
                    Self(uuid)
                }
            }

            impl From<$name> for Uuid {
                fn from(id: $name) -> Self {
                    id.0
                }
            }
        )+
    };
}

typed_id! {
    /// Unique identifier for a base user account.
    BaseUserId,
    /// Unique identifier for a customer profile.
    CustomerId,
    /// Unique identifier for an operator profile.
    OperatorId,
    /// Unique identifier for a dispatcher.
    DispatcherId,
    /// Unique identifier for a menu item.
    MenuItemId,
    /// Unique identifier for a dated menu.
    MenuId,
    /// Unique identifier for an order.
    OrderId,
    /// Unique identifier for a service rating.
    ServiceRatingId,
}
