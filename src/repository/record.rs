//! Repository implementation for stored records and their field values.

use chrono::Utc;
use diesel::{Connection, prelude::*};

use crate::domain::record::{NewRecord, Record};
use crate::domain::types::{RecordId, RecordTypeName, RevisionId};
use crate::models::record::{
    NewRecord as DbNewRecord, Record as DbRecord, RecordField as DbRecordField,
};
use crate::models::revision::{
    NewRecordRevision as DbNewRecordRevision, RecordRevision as DbRecordRevision,
};
use crate::pagination::Paginated;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, RecordListQuery, RecordReader, RecordWriter};

fn hydrate(db_record: DbRecord, rows: Vec<DbRecordField>) -> RepositoryResult<Record> {
    db_record.into_domain(rows).map_err(RepositoryError::from)
}

impl RecordReader for DieselRepository {
    fn get_record_by_id(
        &self,
        record_type: &RecordTypeName,
        id: RecordId,
    ) -> RepositoryResult<Option<Record>> {
        use crate::schema::{record_fields, records};

        let mut conn = self.conn()?;
        let db_record = records::table
            .find(id.get())
            .filter(records::record_type.eq(record_type.as_str()))
            .first::<DbRecord>(&mut conn)
            .optional()?;

        match db_record {
            Some(db_record) => {
                let rows = record_fields::table
                    .filter(record_fields::record_id.eq(db_record.id))
                    .load::<DbRecordField>(&mut conn)?;
                Ok(Some(hydrate(db_record, rows)?))
            }
            None => Ok(None),
        }
    }

    fn get_record(&self, id: RecordId) -> RepositoryResult<Option<Record>> {
        use crate::schema::{record_fields, records};

        let mut conn = self.conn()?;
        let db_record = records::table
            .find(id.get())
            .first::<DbRecord>(&mut conn)
            .optional()?;

        match db_record {
            Some(db_record) => {
                let rows = record_fields::table
                    .filter(record_fields::record_id.eq(db_record.id))
                    .load::<DbRecordField>(&mut conn)?;
                Ok(Some(hydrate(db_record, rows)?))
            }
            None => Ok(None),
        }
    }

    fn list_records(&self, query: RecordListQuery) -> RepositoryResult<Paginated<Record>> {
        use crate::schema::{record_fields, records};

        let mut conn = self.conn()?;

        let total: i64 = records::table
            .filter(records::record_type.eq(query.record_type.as_str()))
            .count()
            .get_result(&mut conn)?;

        let page = query
            .pagination
            .as_ref()
            .map_or(1, |p| if p.page == 0 { 1 } else { p.page });

        let db_records = match &query.pagination {
            Some(p) => {
                let per_page = p.per_page.max(1);
                records::table
                    .filter(records::record_type.eq(query.record_type.as_str()))
                    .order(records::id.asc())
                    .limit(per_page as i64)
                    .offset(((page - 1) * per_page) as i64)
                    .load::<DbRecord>(&mut conn)?
            }
            None => records::table
                .filter(records::record_type.eq(query.record_type.as_str()))
                .order(records::id.asc())
                .load::<DbRecord>(&mut conn)?,
        };

        let total_pages = match &query.pagination {
            Some(p) => (total as usize).div_ceil(p.per_page.max(1)),
            None => usize::from(total > 0),
        };

        let ids: Vec<i32> = db_records.iter().map(|r| r.id).collect();
        let field_rows = record_fields::table
            .filter(record_fields::record_id.eq_any(&ids))
            .load::<DbRecordField>(&mut conn)?;

        let items = db_records
            .into_iter()
            .map(|db_record| {
                let rows = field_rows
                    .iter()
                    .filter(|row| row.record_id == db_record.id)
                    .cloned()
                    .collect();
                hydrate(db_record, rows)
            })
            .collect::<RepositoryResult<Vec<Record>>>()?;

        Ok(Paginated::new(items, page, total_pages))
    }
}

impl RecordWriter for DieselRepository {
    fn create_records(&self, new_records: &[NewRecord]) -> RepositoryResult<usize> {
        use crate::schema::{record_fields, records};

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            for new_record in new_records {
                let db_record = diesel::insert_into(records::table)
                    .values(DbNewRecord::from_domain(new_record, now))
                    .get_result::<DbRecord>(conn)?;

                let value_rows = new_record
                    .values
                    .iter()
                    .map(|(field, value)| DbRecordField {
                        record_id: db_record.id,
                        field: field.to_string(),
                        value: value.clone(),
                    })
                    .collect::<Vec<_>>();

                diesel::insert_into(record_fields::table)
                    .values(&value_rows)
                    .execute(conn)?;
            }
            Ok(new_records.len())
        })
    }

    fn save_record(&self, record: &Record) -> RepositoryResult<Record> {
        use crate::schema::{record_fields, record_revisions, records};

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        let mut saved = record.clone();
        saved.updated_at = now;
        saved.new_revision = false;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            records::table
                .find(record.id.get())
                .first::<DbRecord>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;

            if record.new_revision {
                let snapshot = serde_json::to_string(&record.values).map_err(|e| {
                    RepositoryError::Unexpected(format!("revision snapshot: {e}"))
                })?;

                let revision = diesel::insert_into(record_revisions::table)
                    .values(DbNewRecordRevision {
                        record_id: record.id.get(),
                        log_message: record.revision_log.as_deref(),
                        created_at: now,
                        snapshot,
                    })
                    .get_result::<DbRecordRevision>(conn)?;

                saved.revision_id =
                    Some(RevisionId::new(revision.id).map_err(RepositoryError::from)?);
            }

            diesel::update(records::table.find(record.id.get()))
                .set((
                    records::updated_at.eq(now),
                    records::revision_id.eq(saved.revision_id.map(RevisionId::get)),
                ))
                .execute(conn)?;

            diesel::delete(
                record_fields::table.filter(record_fields::record_id.eq(record.id.get())),
            )
            .execute(conn)?;

            let value_rows = saved
                .values
                .iter()
                .filter(|(_, value)| !value.trim().is_empty())
                .map(|(field, value)| DbRecordField {
                    record_id: record.id.get(),
                    field: field.to_string(),
                    value: value.clone(),
                })
                .collect::<Vec<_>>();

            diesel::insert_into(record_fields::table)
                .values(&value_rows)
                .execute(conn)?;

            Ok(())
        })?;

        Ok(saved)
    }

    fn delete_record(&self, id: RecordId) -> RepositoryResult<()> {
        use crate::schema::{record_fields, record_revisions, records};

        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            diesel::delete(
                record_fields::table.filter(record_fields::record_id.eq(id.get())),
            )
            .execute(conn)?;
            diesel::delete(
                record_revisions::table.filter(record_revisions::record_id.eq(id.get())),
            )
            .execute(conn)?;
            diesel::delete(records::table.find(id.get())).execute(conn)?;
            Ok(())
        })
    }
}
