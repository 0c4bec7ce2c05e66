//! Field definitions attached to record types.

use serde::{Deserialize, Serialize};

use crate::domain::types::{FieldName, FormatterId, RecordTypeName, TypeConstraintError};

/// Storage kind of a field, driving widget and formatter selection.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    LongText,
    Integer,
    Email,
    Boolean,
}

impl FieldKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::LongText => "long_text",
            Self::Integer => "integer",
            Self::Email => "email",
            Self::Boolean => "boolean",
        }
    }

    /// Formatter applied when a display config does not name a working one.
    #[must_use]
    pub fn natural_formatter(&self) -> FormatterId {
        match self {
            Self::Text | Self::LongText | Self::Email => FormatterId::from_static("plain"),
            Self::Integer => FormatterId::from_static("integer"),
            Self::Boolean => FormatterId::from_static("boolean"),
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for FieldKind {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "text" => Ok(Self::Text),
            "long_text" => Ok(Self::LongText),
            "integer" => Ok(Self::Integer),
            "email" => Ok(Self::Email),
            "boolean" => Ok(Self::Boolean),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown field kind '{other}'"
            ))),
        }
    }
}

/// Configuration of a single field on a record type.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FieldDefinition {
    pub record_type: RecordTypeName,
    pub name: FieldName,
    /// Human label shown next to the value and in audit messages.
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    /// Maximum accepted length of the raw value, when bounded.
    pub max_length: Option<i32>,
    /// Protected fields accept edits from administrators only.
    pub protected: bool,
    /// Sort weight within the record type.
    pub weight: i32,
}

impl FieldDefinition {
    /// Invalidation tags for output caching keyed on this field's
    /// configuration and storage.
    #[must_use]
    pub fn cache_tags(&self) -> Vec<String> {
        vec![
            format!("field:{}.{}", self.record_type, self.name),
            format!("field_storage:{}.{}", self.record_type, self.name),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_kind_round_trips_through_str() {
        for kind in [
            FieldKind::Text,
            FieldKind::LongText,
            FieldKind::Integer,
            FieldKind::Email,
            FieldKind::Boolean,
        ] {
            assert_eq!(FieldKind::try_from(kind.as_str()).unwrap(), kind);
        }
        assert!(FieldKind::try_from("markdown").is_err());
    }

    #[test]
    fn natural_formatter_matches_kind() {
        assert_eq!(FieldKind::Text.natural_formatter().as_str(), "plain");
        assert_eq!(FieldKind::Integer.natural_formatter().as_str(), "integer");
        assert_eq!(FieldKind::Boolean.natural_formatter().as_str(), "boolean");
    }

    #[test]
    fn cache_tags_name_field_and_storage() {
        let field = FieldDefinition {
            record_type: RecordTypeName::new("article").unwrap(),
            name: FieldName::new("title").unwrap(),
            label: "Title".to_string(),
            kind: FieldKind::Text,
            required: true,
            max_length: Some(255),
            protected: false,
            weight: 0,
        };
        assert_eq!(
            field.cache_tags(),
            vec![
                "field:article.title".to_string(),
                "field_storage:article.title".to_string(),
            ]
        );
    }
}
