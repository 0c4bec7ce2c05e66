//! Versioning policy consulted when a save goes through the pipeline.

use crate::domain::field::FieldDefinition;
use crate::domain::record::Record;
use crate::domain::revision::RecordTypeConfig;

/// Record-type-specific rule for whether an edit snapshots a new revision.
pub trait VersioningPolicy {
    /// Whether saving this record should create a new revision.
    fn creates_new_revision(&self, record: &Record) -> bool;

    /// Audit message recorded with a synthesized revision.
    fn audit_message(&self, field: &FieldDefinition) -> String {
        format!("Updated the {} field through editable field.", field.label)
    }
}

/// Policy backed by the record type's stored configuration; an unknown type
/// is treated as unversioned.
pub struct TypeConfigPolicy {
    config: Option<RecordTypeConfig>,
}

impl TypeConfigPolicy {
    #[must_use]
    pub fn new(config: Option<RecordTypeConfig>) -> Self {
        Self { config }
    }
}

impl VersioningPolicy for TypeConfigPolicy {
    fn creates_new_revision(&self, _record: &Record) -> bool {
        self.config.as_ref().is_some_and(RecordTypeConfig::revisions_on_save)
    }
}
