use serde::{Deserialize, Serialize};

use crate::domain::field::FieldDefinition;
use crate::domain::record::Record;
use crate::domain::revision::RecordTypeConfig;
use crate::domain::types::PageToken;
use crate::editing::render::FieldFragment;
use crate::pagination::Paginated;

/// Query parameters accepted by the index page service.
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    /// Record type tab selected by the user.
    pub record_type: Option<String>,
    /// Page number requested by the user interface.
    pub page: Option<usize>,
}

/// One listing row with its per-column inline-edit fragments.
#[derive(Debug, Serialize)]
pub struct IndexRow {
    pub record: Record,
    /// Fragments aligned with the listing columns.
    pub cells: Vec<FieldFragment>,
}

/// Data required to render the main index template.
pub struct IndexPageData {
    pub record_types: Vec<RecordTypeConfig>,
    /// Type whose records are listed; `None` when nothing is configured.
    pub current_type: Option<RecordTypeConfig>,
    /// Listing columns in field weight order.
    pub columns: Vec<FieldDefinition>,
    pub rows: Paginated<IndexRow>,
    /// Token scoping this render's edit sessions.
    pub page_token: PageToken,
}
