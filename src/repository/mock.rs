//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::display::FieldDisplay;
use crate::domain::field::FieldDefinition;
use crate::domain::record::{NewRecord, Record};
use crate::domain::revision::{RecordRevision, RecordTypeConfig};
use crate::domain::types::{FieldName, RecordId, RecordTypeName, ViewModeId};
use crate::pagination::Paginated;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    DisplayConfigReader, DisplayConfigWriter, FieldDefinitionReader, RecordListQuery,
    RecordReader, RecordTypeReader, RecordWriter, RevisionReader,
};

mock! {
    pub Repository {}

    impl RecordReader for Repository {
        fn get_record_by_id(
            &self,
            record_type: &RecordTypeName,
            id: RecordId,
        ) -> RepositoryResult<Option<Record>>;
        fn get_record(&self, id: RecordId) -> RepositoryResult<Option<Record>>;
        fn list_records(&self, query: RecordListQuery) -> RepositoryResult<Paginated<Record>>;
    }

    impl RecordWriter for Repository {
        fn create_records(&self, new_records: &[NewRecord]) -> RepositoryResult<usize>;
        fn save_record(&self, record: &Record) -> RepositoryResult<Record>;
        fn delete_record(&self, id: RecordId) -> RepositoryResult<()>;
    }

    impl RecordTypeReader for Repository {
        fn get_record_type(
            &self,
            name: &RecordTypeName,
        ) -> RepositoryResult<Option<RecordTypeConfig>>;
        fn list_record_types(&self) -> RepositoryResult<Vec<RecordTypeConfig>>;
    }

    impl FieldDefinitionReader for Repository {
        fn get_field_definition(
            &self,
            record_type: &RecordTypeName,
            name: &FieldName,
        ) -> RepositoryResult<Option<FieldDefinition>>;
        fn list_field_definitions(
            &self,
            record_type: &RecordTypeName,
        ) -> RepositoryResult<Vec<FieldDefinition>>;
    }

    impl DisplayConfigReader for Repository {
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

    impl DisplayConfigWriter for Repository {
        fn upsert_display_config(&self, display: &FieldDisplay) -> RepositoryResult<FieldDisplay>;
    }

    impl RevisionReader for Repository {
        fn list_revisions(&self, record_id: RecordId) -> RepositoryResult<Vec<RecordRevision>>;
    }
}
