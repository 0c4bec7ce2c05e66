//! Record revisions and per-type versioning configuration.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{FieldName, RecordId, RecordTypeName, RevisionId};

/// A frozen snapshot of a record's field values.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RecordRevision {
    pub id: RevisionId,
    pub record_id: RecordId,
    /// Audit message recorded when the revision was created.
    pub log_message: Option<String>,
    pub created_at: NaiveDateTime,
    pub values: HashMap<FieldName, String>,
}

/// Versioning behavior of a record type.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RecordTypeConfig {
    pub name: RecordTypeName,
    pub label: String,
    /// Whether records of this type keep revisions at all.
    pub versioned: bool,
    /// Whether an ordinary save opens a new revision by default.
    pub new_revision_by_default: bool,
}

impl RecordTypeConfig {
    /// True when a save through the editing pipeline must snapshot a new
    /// revision.
    #[must_use]
    pub fn revisions_on_save(&self) -> bool {
        self.versioned && self.new_revision_by_default
    }
}
