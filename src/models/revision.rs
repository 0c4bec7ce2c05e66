//! Diesel models for record revision snapshots.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::revision::RecordRevision as DomainRecordRevision;
use crate::domain::types::{RecordId, RevisionId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::record_revisions)]
/// Diesel model for [`DomainRecordRevision`]; the field values are frozen
/// into a JSON text snapshot.
pub struct RecordRevision {
    pub id: i32,
    pub record_id: i32,
    pub log_message: Option<String>,
    pub created_at: NaiveDateTime,
    pub snapshot: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::record_revisions)]
/// Insertable form of [`RecordRevision`].
pub struct NewRecordRevision<'a> {
    pub record_id: i32,
    pub log_message: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub snapshot: String,
}

impl TryFrom<RecordRevision> for DomainRecordRevision {
    type Error = TypeConstraintError;

    fn try_from(row: RecordRevision) -> Result<Self, Self::Error> {
        let values = serde_json::from_str(&row.snapshot)
            .map_err(|e| TypeConstraintError::InvalidValue(format!("revision snapshot: {e}")))?;

        Ok(Self {
            id: RevisionId::new(row.id)?,
            record_id: RecordId::new(row.record_id)?,
            log_message: row.log_message,
            created_at: row.created_at,
            values,
        })
    }
}
