use crate::db::{DbConnection, DbPool, get_connection};
use crate::domain::display::FieldDisplay;
use crate::domain::field::FieldDefinition;
use crate::domain::record::{NewRecord, Record};
use crate::domain::revision::{RecordRevision, RecordTypeConfig};
use crate::domain::types::{FieldName, RecordId, RecordTypeName, ViewModeId};
use crate::pagination::Paginated;
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod metadata;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod record;
pub mod revision;

#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone)]
pub struct RecordListQuery {
    pub record_type: RecordTypeName,
    pub pagination: Option<Pagination>,
}

impl RecordListQuery {
    pub fn new(record_type: RecordTypeName) -> Self {
        Self {
            record_type,
            pagination: None,
        }
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait RecordReader {
    fn get_record_by_id(
        &self,
        record_type: &RecordTypeName,
        id: RecordId,
    ) -> RepositoryResult<Option<Record>>;
    /// Loads a record by id alone, whatever its type.
    fn get_record(&self, id: RecordId) -> RepositoryResult<Option<Record>>;
    fn list_records(&self, query: RecordListQuery) -> RepositoryResult<Paginated<Record>>;
}

pub trait RecordWriter {
    fn create_records(&self, new_records: &[NewRecord]) -> RepositoryResult<usize>;
    /// Persists the record's scalar columns and replaces its field value
    /// rows. When `new_revision` is staged a snapshot row is inserted and
    /// the record points at it, all in one transaction.
    fn save_record(&self, record: &Record) -> RepositoryResult<Record>;
    fn delete_record(&self, id: RecordId) -> RepositoryResult<()>;
}

pub trait RecordTypeReader {
    fn get_record_type(&self, name: &RecordTypeName)
    -> RepositoryResult<Option<RecordTypeConfig>>;
    fn list_record_types(&self) -> RepositoryResult<Vec<RecordTypeConfig>>;
}

pub trait FieldDefinitionReader {
    fn get_field_definition(
        &self,
        record_type: &RecordTypeName,
        name: &FieldName,
    ) -> RepositoryResult<Option<FieldDefinition>>;
    /// Field definitions of a record type, ordered by weight.
    fn list_field_definitions(
        &self,
        record_type: &RecordTypeName,
    ) -> RepositoryResult<Vec<FieldDefinition>>;
}

pub trait DisplayConfigReader {
    fn get_display_config(
        &self,
        record_type: &RecordTypeName,
        field: &FieldName,
        view_mode: &ViewModeId,
    ) -> RepositoryResult<Option<FieldDisplay>>;
    fn list_display_configs(
        &self,
        record_type: &RecordTypeName,
    ) -> RepositoryResult<Vec<FieldDisplay>>;
}

pub trait DisplayConfigWriter {
    fn upsert_display_config(&self, display: &FieldDisplay) -> RepositoryResult<FieldDisplay>;
}

pub trait RevisionReader {
    /// Revisions of a record, newest first.
    fn list_revisions(&self, record_id: RecordId) -> RepositoryResult<Vec<RecordRevision>>;
}

/// Diesel-backed implementation of the repository traits.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}
