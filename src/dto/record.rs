use crate::domain::field::FieldDefinition;
use crate::domain::record::Record;
use crate::domain::revision::{RecordRevision, RecordTypeConfig};
use crate::domain::types::PageToken;
use crate::editing::render::FieldFragment;

/// Data required to render the record detail page.
pub struct RecordPageData {
    pub record: Record,
    pub record_type: RecordTypeConfig,
    /// Fields of the record type in weight order.
    pub fields: Vec<FieldDefinition>,
    /// Fragments aligned with `fields`.
    pub fragments: Vec<FieldFragment>,
    /// Newest-first revision log; empty for unversioned types.
    pub revisions: Vec<RecordRevision>,
    /// Token scoping this render's edit sessions.
    pub page_token: PageToken,
}
