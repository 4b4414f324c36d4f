//! Identifier newtypes. All three wrap a time-ordered UUIDv7 and serialize as
//! the bare UUID string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Name used in parse errors.
            pub const KIND: &'static str = stringify!($name);

            /// Fresh id; later ids sort after earlier ones.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0.hyphenated(), f)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            /// Accepts any textual UUID form, surrounding whitespace ignored.
            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                Uuid::try_parse(raw.trim())
                    .map(Self)
                    .map_err(|e| DomainError::invalid_id(Self::KIND, e.to_string()))
            }
        }
    };
}

uuid_id!(
    /// A product record, assigned by the catalog store on insert.
    ProductId
);
uuid_id!(
    /// A shopping cart.
    CartId
);
uuid_id!(
    /// One open real-time connection.
    ConnectionId
);
