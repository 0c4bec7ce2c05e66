//! Domain model for stored records and their raw field values.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{FieldName, LanguageCode, RecordId, RecordTypeName, RevisionId};

/// A persisted content record owning the fields edited in place.
///
/// `values` holds the current raw value per field; rendering and typing are
/// the concern of the field definition and the formatter/widget layers.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: RecordId,
    pub record_type: RecordTypeName,
    pub langcode: LanguageCode,
    /// Current revision, present only for versioned record types.
    pub revision_id: Option<RevisionId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    /// Raw field values keyed by field machine name.
    pub values: HashMap<FieldName, String>,
    /// Write staging: whether the next save creates a new revision.
    /// Always `false` on a freshly loaded record.
    #[serde(default, skip_serializing)]
    pub new_revision: bool,
    /// Write staging: audit message for the next revision, if any.
    /// Always `None` on a freshly loaded record.
    #[serde(default, skip_serializing)]
    pub revision_log: Option<String>,
}

impl Record {
    /// Returns the raw value of a field, if one is stored.
    #[must_use]
    pub fn value(&self, field: &FieldName) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// True when the field has a non-blank stored value.
    #[must_use]
    pub fn has_value(&self, field: &FieldName) -> bool {
        self.value(field).is_some_and(|v| !v.trim().is_empty())
    }

    /// Applies a candidate value to the field; `None` clears it.
    pub fn set_value(&mut self, field: FieldName, value: Option<String>) {
        match value {
            Some(v) => {
                self.values.insert(field, v);
            }
            None => {
                self.values.remove(&field);
            }
        }
    }

    /// Opaque last-modified stamp used to anchor validation errors in the
    /// rendered edit form.
    #[must_use]
    pub fn changed_stamp(&self) -> String {
        self.updated_at.and_utc().timestamp().to_string()
    }
}

/// Payload for inserting a new record.
#[derive(Clone, Debug, Deserialize)]
pub struct NewRecord {
    pub record_type: RecordTypeName,
    pub langcode: LanguageCode,
    pub values: HashMap<FieldName, String>,
}

impl NewRecord {
    /// Builds an insert payload, dropping blank values.
    #[must_use]
    pub fn new(
        record_type: RecordTypeName,
        langcode: LanguageCode,
        values: HashMap<FieldName, String>,
    ) -> Self {
        Self {
            record_type,
            langcode,
            values: values
                .into_iter()
                .filter(|(_, v)| !v.trim().is_empty())
                .collect(),
        }
    }
}
