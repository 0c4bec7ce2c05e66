//! Session keys addressing a single field instance on a page.
//!
//! Every actionable control rendered by the editing layer carries an instance
//! path of the form `{record_type}/{record_id}/{field}[/{row}]/actions/{op}`.
//! [`SessionKey::resolve`] maps such a path back to the instance it targets.

use thiserror::Error;

use crate::domain::types::{FieldName, RecordId, RecordTypeName, RevisionId};

/// Segments addressing the instance itself (record type, record id, field).
const KEY_SEGMENTS: usize = 3;

/// Trailing segments addressing the actionable control inside the instance
/// sub-tree (the actions container and the control name).
const ACTION_SEGMENTS: usize = 2;

/// Errors raised when an instance path cannot be resolved to a session key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("instance path has {0} segments, at least {min} required", min = KEY_SEGMENTS + ACTION_SEGMENTS)]
    TooShort(usize),
    #[error("'{0}' is not a valid record type segment")]
    InvalidRecordType(String),
    #[error("'{0}' is not a valid record id segment")]
    InvalidRecordId(String),
    #[error("'{0}' is not a valid field name segment")]
    InvalidFieldName(String),
    #[error("'{0}' is not a valid row discriminator segment")]
    InvalidRow(String),
    #[error("instance path carries unexpected trailing segments")]
    TrailingSegments,
}

/// Stable address of one field instance within a page session.
///
/// Two instances get the same key iff they show the same field of the same
/// record at the same listing row; keys are therefore safe to use as the
/// lookup key for edit-mode flags across partial rebuilds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionKey {
    record_type: RecordTypeName,
    record_id: RecordId,
    field_name: FieldName,
    row: Option<usize>,
}

impl SessionKey {
    #[must_use]
    pub fn new(record_type: RecordTypeName, record_id: RecordId, field_name: FieldName) -> Self {
        Self {
            record_type,
            record_id,
            field_name,
            row: None,
        }
    }

    /// Scopes the key to one row of a listing showing the same field and
    /// record several times.
    #[must_use]
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    #[must_use]
    pub fn record_type(&self) -> &RecordTypeName {
        &self.record_type
    }

    #[must_use]
    pub fn record_id(&self) -> RecordId {
        self.record_id
    }

    #[must_use]
    pub fn field_name(&self) -> &FieldName {
        &self.field_name
    }

    #[must_use]
    pub fn row(&self) -> Option<usize> {
        self.row
    }

    /// Ordered segments of the instance path.
    #[must_use]
    pub fn segments(&self) -> Vec<String> {
        let mut segments = vec![
            self.record_type.to_string(),
            self.record_id.to_string(),
            self.field_name.to_string(),
        ];
        if let Some(row) = self.row {
            segments.push(row.to_string());
        }
        segments
    }

    /// Key under which session state is stored.
    #[must_use]
    pub fn storage_key(&self) -> String {
        self.segments().join(":")
    }

    /// Instance path as carried by rendered controls.
    #[must_use]
    pub fn path(&self) -> String {
        self.segments().join("/")
    }

    /// Full action path for a control (`edit` or `save`) inside this
    /// instance's sub-tree.
    #[must_use]
    pub fn action_path(&self, operation: &str) -> String {
        format!("{}/actions/{operation}", self.path())
    }

    /// DOM id of the wrapper element replaced on partial updates.
    #[must_use]
    pub fn wrapper_id(&self) -> String {
        format!("editable-field-{}", self.segments().join("-"))
    }

    /// Identifier under which partially built form state is cached; the
    /// revision segment is `0` for unversioned records.
    #[must_use]
    pub fn build_id(&self, revision: Option<RevisionId>) -> String {
        format!(
            "editable-field-form__{}__{}__{}__{}",
            self.record_type,
            self.record_id,
            revision.map_or(0, RevisionId::get),
            self.field_name,
        )
    }

    /// Resolves an inbound action path to the session it targets.
    ///
    /// The trailing two segments address the control that fired (the actions
    /// container and the button) and are stripped before parsing. Malformed
    /// paths are rejected, never guessed at.
    pub fn resolve<S: AsRef<str>>(path: &[S]) -> Result<Self, PathError> {
        if path.len() < KEY_SEGMENTS + ACTION_SEGMENTS {
            return Err(PathError::TooShort(path.len()));
        }
        let segments = &path[..path.len() - ACTION_SEGMENTS];

        let record_type = RecordTypeName::new(segments[0].as_ref())
            .map_err(|_| PathError::InvalidRecordType(segments[0].as_ref().to_string()))?;
        let record_id = segments[1]
            .as_ref()
            .parse::<i32>()
            .ok()
            .and_then(|id| RecordId::new(id).ok())
            .ok_or_else(|| PathError::InvalidRecordId(segments[1].as_ref().to_string()))?;
        let field_name = FieldName::new(segments[2].as_ref())
            .map_err(|_| PathError::InvalidFieldName(segments[2].as_ref().to_string()))?;

        let mut key = Self::new(record_type, record_id, field_name);
        if let Some(raw) = segments.get(KEY_SEGMENTS) {
            let row = raw
                .as_ref()
                .parse::<usize>()
                .map_err(|_| PathError::InvalidRow(raw.as_ref().to_string()))?;
            key = key.with_row(row);
        }
        if segments.len() > KEY_SEGMENTS + 1 {
            return Err(PathError::TrailingSegments);
        }
        Ok(key)
    }

    /// Resolves a `/`-joined action path, as submitted by the client script.
    pub fn from_action_path(path: &str) -> Result<Self, PathError> {
        let segments = path.split('/').collect::<Vec<_>>();
        Self::resolve(&segments)
    }
}
