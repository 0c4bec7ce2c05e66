//! Diesel models for records and their field value rows.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::record::{NewRecord as DomainNewRecord, Record as DomainRecord};
use crate::domain::types::{
    FieldName, LanguageCode, RecordId, RecordTypeName, RevisionId, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::records)]
/// Diesel model for [`crate::domain::record::Record`], without field values.
pub struct Record {
    pub id: i32,
    pub record_type: String,
    pub langcode: String,
    pub revision_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::records)]
/// Insertable form of [`Record`].
pub struct NewRecord<'a> {
    pub record_type: &'a str,
    pub langcode: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl<'a> NewRecord<'a> {
    /// Builds the insertable row; timestamps are supplied by the caller so
    /// one batch shares a single creation instant.
    pub fn from_domain(record: &'a DomainNewRecord, now: NaiveDateTime) -> Self {
        Self {
            record_type: record.record_type.as_str(),
            langcode: record.langcode.as_str(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations, Insertable)]
#[diesel(table_name = crate::schema::record_fields)]
#[diesel(belongs_to(Record, foreign_key = record_id))]
#[diesel(primary_key(record_id, field))]
/// One raw field value of a record.
pub struct RecordField {
    pub record_id: i32,
    pub field: String,
    pub value: String,
}

impl Record {
    /// Converts the row plus its value rows into the domain record.
    pub fn into_domain(
        self,
        fields: Vec<RecordField>,
    ) -> Result<DomainRecord, TypeConstraintError> {
        let mut values = HashMap::with_capacity(fields.len());
        for row in fields {
            values.insert(FieldName::new(row.field)?, row.value);
        }

        Ok(DomainRecord {
            id: RecordId::new(self.id)?,
            record_type: RecordTypeName::new(self.record_type)?,
            langcode: LanguageCode::new(self.langcode)?,
            revision_id: self.revision_id.map(RevisionId::new).transpose()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
            values,
            new_revision: false,
            revision_log: None,
        })
    }
}

impl TryFrom<Record> for DomainRecord {
    type Error = TypeConstraintError;

    fn try_from(record: Record) -> Result<Self, Self::Error> {
        record.into_domain(Vec::new())
    }
}
