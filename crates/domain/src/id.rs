//! Typed identifier newtypes backed by string slugs.
//!
//! Street and light identifiers come from fleet provisioning as
//! human-readable slugs (`"elm"`, `"elm_1"`), so the newtypes wrap
//! strings rather than generated UUIDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidArgumentError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// View the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the identifier is empty (invalid).
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = InvalidArgumentError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.is_empty() {
                    return Err(InvalidArgumentError::EmptyId);
                }
                Ok(Self(s.to_string()))
            }
        }
    };
}

define_id!(
    /// Unique identifier for a [`Street`](crate::street::Street).
    StreetId
);

define_id!(
    /// Identifier for a [`Light`](crate::light::Light), unique within its street.
    LightId
);
