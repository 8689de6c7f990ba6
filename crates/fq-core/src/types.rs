//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A string didn't name any variant of a closed set.
    #[error("invalid {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

/// A validated record identifier.
///
/// Identifiers must be non-empty. Uniqueness is enforced when a
/// [`RecordStore`](crate::RecordStore) is built, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Creates a new ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::Empty { field: "record ID" });
        }
        Ok(Self(id))
    }

    /// Wraps a literal that is known to be non-empty.
    pub(crate) fn from_static(id: &'static str) -> Self {
        debug_assert!(!id.is_empty());
        Self(id.to_string())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RecordId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Generates a closed string enum with `as_str`, `Display` and `FromStr`.
macro_rules! define_str_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$( Self::$variant, )+];

            /// The wire/filter spelling of this variant.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok(Self::$variant), )+
                    _ => Err(ValidationError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

define_str_enum!(
    /// Operational state of a profiling float.
    ObservationStatus, "observation status" {
        /// Reporting on schedule.
        Active => "active",
        /// No longer reporting.
        Inactive => "inactive",
        /// Reporting late.
        Delayed => "delayed",
    }
);

define_str_enum!(
    /// What a logged activity was.
    ActivityKind, "activity type" {
        Query => "query",
        Visualization => "visualization",
        Export => "export",
        Download => "download",
    }
);

define_str_enum!(
    /// Outcome of a logged activity.
    ActivityStatus, "activity status" {
        Completed => "completed",
        Failed => "failed",
        Processing => "processing",
    }
);
