//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (positive identifiers, machine-name
//! charsets) so that once a value reaches the domain layer it can be treated
//! as trusted.

use std::fmt::{Display, Formatter};
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name(i32);

        impl $name {
            /// Constructs the identifier, rejecting non-positive values.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value <= 0 {
                    return Err(TypeConstraintError::NonPositiveId);
                }
                Ok(Self(value))
            }

            /// Returns the raw integer value.
            #[must_use]
            pub fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(RecordId, "Identifier of a stored record.");
id_newtype!(RevisionId, "Identifier of a stored record revision.");

/// Returns true when `value` is a valid machine name over the given extra
/// characters (always lowercase letters, digits and underscore).
fn is_machine_name(value: &str, extra: &[char]) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || extra.contains(&c))
}

/// Macro to generate machine-name newtypes (lowercase letters, digits and
/// underscores, plus any extra characters listed).
macro_rules! machine_name_newtype {
    ($name:ident, $extra:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed machine name, rejecting empty or
            /// out-of-charset values.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = value.into().trim().to_string();
                if trimmed.is_empty() {
                    return Err(TypeConstraintError::EmptyString);
                }
                if !is_machine_name(&trimmed, $extra) {
                    return Err(TypeConstraintError::InvalidValue(trimmed));
                }
                Ok(Self(trimmed))
            }

            /// Constructs from a literal known to satisfy the charset.
            #[must_use]
            pub fn from_static(value: &'static str) -> Self {
                debug_assert!(is_machine_name(value, $extra));
                Self(value.to_string())
            }

            /// Borrow the value as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

machine_name_newtype!(
    FieldName,
    &[],
    "Machine name of a field attached to a record type."
);

machine_name_newtype!(RecordTypeName, &[], "Machine name of a record type.");

machine_name_newtype!(
    FormatterId,
    &[],
    "Identifier of a registered fallback formatter."
);

machine_name_newtype!(
    ViewModeId,
    &['-'],
    "Named rendering context a field instance is displayed in. Custom \
     integrations may supply opaque ids (dashes allowed)."
);

/// View mode used for listing/table contexts.
pub const LISTING_VIEW_MODE: &str = "listing";

/// View mode used for the record detail page.
pub const FULL_VIEW_MODE: &str = "full";

impl ViewModeId {
    /// True when the instance is rendered inside a listing/table context.
    #[must_use]
    pub fn is_listing(&self) -> bool {
        self.0 == LISTING_VIEW_MODE
    }
}

/// Language code attached to a record (`en`, `pt-br`, ...).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Constructs a language code, rejecting empty or out-of-charset values.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_lowercase();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if !trimmed.chars().all(|c| c.is_ascii_lowercase() || c == '-') {
            return Err(TypeConstraintError::InvalidValue(trimmed));
        }
        Ok(Self(trimmed))
    }

    /// Borrow the value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self("en".to_string())
    }
}

impl Display for LanguageCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for LanguageCode {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Token identifying one logical page session.
///
/// A fresh token is minted on every full page render; partial-update actions
/// echo it back so edit-mode flags survive rebuilds of a sub-tree but never a
/// full reload.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PageToken(Uuid);

impl PageToken {
    /// Mints a fresh token.
    #[must_use]
    pub fn mint() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a token echoed back by a partial-update request.
    pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| TypeConstraintError::InvalidValue(value.to_string()))
    }
}

impl Display for PageToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
