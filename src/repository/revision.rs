//! Repository implementation for record revision history.

use diesel::prelude::*;

use crate::domain::revision::RecordRevision;
use crate::domain::types::RecordId;
use crate::models::revision::RecordRevision as DbRecordRevision;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, RevisionReader};

impl RevisionReader for DieselRepository {
    fn list_revisions(&self, record_id: RecordId) -> RepositoryResult<Vec<RecordRevision>> {
        use crate::schema::record_revisions;

        let mut conn = self.conn()?;
        record_revisions::table
            .filter(record_revisions::record_id.eq(record_id.get()))
            .order(record_revisions::id.desc())
            .load::<DbRecordRevision>(&mut conn)?
            .into_iter()
            .map(|row| RecordRevision::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}
