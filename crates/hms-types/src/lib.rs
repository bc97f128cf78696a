//! Shared primitive types for the HMS client workspace.
//!
//! - [`RecordId`]: server-assigned identifier, either an integer or a UUID
//! - [`NonEmptyText`]: trimmed text that is guaranteed to be non-empty

use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Errors that can occur when parsing a [`RecordId`].
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// The input was neither an integer nor a UUID
    #[error("invalid record id: {0:?}")]
    Invalid(String),
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Server-assigned record identifier.
///
/// The backend hands out integer keys for most tables and UUIDs for a few newer ones.
/// `RecordId::Int(0)` doubles as the "unset" value when a record arrives without an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordId {
    /// Integer primary key.
    Int(i64),
    /// UUID primary key.
    Uuid(Uuid),
}

impl RecordId {
    /// Parses an identifier from text.
    ///
    /// Integers are tried first, then UUIDs in any form accepted by [`Uuid::parse_str`]
    /// (hyphenated, simple, braced or URN).
    ///
    /// # Errors
    ///
    /// Returns [`IdError::Invalid`] if the trimmed input is neither.
    pub fn parse(input: &str) -> Result<Self, IdError> {
        let trimmed = input.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Ok(Self::Int(n));
        }
        Uuid::parse_str(trimmed)
            .map(Self::Uuid)
            .map_err(|_| IdError::Invalid(input.to_owned()))
    }

    /// True for the zero-value placeholder `Int(0)` and the nil UUID.
    pub fn is_unset(&self) -> bool {
        match self {
            Self::Int(n) => *n == 0,
            Self::Uuid(u) => u.is_nil(),
        }
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::Int(0)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Uuid> for RecordId {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl FromStr for RecordId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Uuid(u) => write!(f, "{u}"),
        }
    }
}

impl serde::Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Uuid(u) => serializer.collect_str(u),
        }
    }
}

impl<'de> serde::Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct RecordIdVisitor;

        impl serde::de::Visitor<'_> for RecordIdVisitor {
            type Value = RecordId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer or a UUID string")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<RecordId, E> {
                Ok(RecordId::Int(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<RecordId, E> {
                i64::try_from(v)
                    .map(RecordId::Int)
                    .map_err(|_| E::custom(format!("record id {v} out of range")))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<RecordId, E> {
                RecordId::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(RecordIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_and_rejects_blank() {
        let text = NonEmptyText::new("  Ward 7 ").expect("valid text");
        assert_eq!(text.as_str(), "Ward 7");

        let err = NonEmptyText::new("   ").expect_err("blank should be rejected");
        assert!(matches!(err, TextError::Empty));
    }

    #[test]
    fn record_id_parses_integers_and_uuids() {
        assert_eq!(RecordId::parse(" 42 ").expect("int id"), RecordId::Int(42));

        let id = RecordId::parse("550e8400-e29b-41d4-a716-446655440000").expect("uuid id");
        assert!(matches!(id, RecordId::Uuid(_)));
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");

        let simple = RecordId::parse("550e8400e29b41d4a716446655440000").expect("simple uuid");
        assert_eq!(simple, id);
    }

    #[test]
    fn record_id_rejects_garbage() {
        let err = RecordId::parse("bed-7").expect_err("not an id");
        assert!(err.to_string().contains("bed-7"));
    }

    #[test]
    fn record_id_default_is_unset() {
        assert!(RecordId::default().is_unset());
        assert!(RecordId::Uuid(Uuid::nil()).is_unset());
        assert!(!RecordId::Int(3).is_unset());
    }

    #[test]
    fn record_id_serde_keeps_json_kind() {
        let int_json = serde_json::to_string(&RecordId::Int(7)).expect("serialize int");
        assert_eq!(int_json, "7");

        let from_number: RecordId = serde_json::from_str("7").expect("deserialize number");
        let from_string: RecordId = serde_json::from_str("\"7\"").expect("deserialize string");
        assert_eq!(from_number, from_string);

        let uuid_json = "\"550e8400-e29b-41d4-a716-446655440000\"";
        let uuid_id: RecordId = serde_json::from_str(uuid_json).expect("deserialize uuid");
        assert_eq!(
            serde_json::to_string(&uuid_id).expect("serialize uuid"),
            uuid_json
        );
    }
}
