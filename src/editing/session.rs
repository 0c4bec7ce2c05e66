//! Per-instance editing session: mode plus the context needed to rebuild the
//! instance without re-deriving it from storage.

use serde::{Deserialize, Serialize};

use crate::domain::display::DisplayConfig;
use crate::domain::record::Record;
use crate::domain::types::{FieldName, LanguageCode, RecordId, RecordTypeName, RevisionId, ViewModeId};
use crate::editing::key::SessionKey;

/// The two states of the editing state machine.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    View,
    Edit,
}

impl EditMode {
    #[must_use]
    pub fn is_edit(self) -> bool {
        matches!(self, Self::Edit)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
        }
    }
}

impl std::fmt::Display for EditMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimal context stored alongside the edit-mode flag so a partial update
/// can rebuild the instance.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionContext {
    pub record_type: RecordTypeName,
    pub record_id: RecordId,
    pub revision_id: Option<RevisionId>,
    pub field_name: FieldName,
    pub langcode: LanguageCode,
    pub view_mode: ViewModeId,
    pub display: DisplayConfig,
}

impl SessionContext {
    /// Builds the context for one field of a record in a given view mode.
    #[must_use]
    pub fn for_record(
        record: &Record,
        field_name: FieldName,
        view_mode: ViewModeId,
        display: DisplayConfig,
    ) -> Self {
        Self {
            record_type: record.record_type.clone(),
            record_id: record.id,
            revision_id: record.revision_id,
            field_name,
            langcode: record.langcode.clone(),
            view_mode,
            display,
        }
    }
}

/// One field instance under edit, pairing its page-stable key with the
/// context snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldEditSession {
    pub key: SessionKey,
    pub context: SessionContext,
}

impl FieldEditSession {
    /// Builds a session whose key is derived from the context, scoped to a
    /// listing row when one is given.
    #[must_use]
    pub fn for_context(context: SessionContext, row: Option<usize>) -> Self {
        let mut key = SessionKey::new(
            context.record_type.clone(),
            context.record_id,
            context.field_name.clone(),
        );
        if let Some(row) = row {
            key = key.with_row(row);
        }
        Self { key, context }
    }

    /// Mode the instance starts in before any action was taken: always-edit
    /// instances skip view mode entirely.
    #[must_use]
    pub fn initial_mode(&self) -> EditMode {
        if self.context.display.click_to_edit {
            EditMode::View
        } else {
            EditMode::Edit
        }
    }

    /// Build identifier locating cached partial-render state.
    #[must_use]
    pub fn build_id(&self) -> String {
        self.key.build_id(self.context.revision_id)
    }
}
