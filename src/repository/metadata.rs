//! Repository implementation for the content-model configuration: record
//! types, field definitions and display configs.

use diesel::{prelude::*, upsert::excluded};

use crate::domain::display::FieldDisplay;
use crate::domain::field::FieldDefinition;
use crate::domain::revision::RecordTypeConfig;
use crate::domain::types::{FieldName, RecordTypeName, ViewModeId};
use crate::models::metadata::{
    DisplayConfig as DbDisplayConfig, FieldDefinition as DbFieldDefinition,
    RecordType as DbRecordType,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, DisplayConfigReader, DisplayConfigWriter, FieldDefinitionReader,
    RecordTypeReader,
};

impl RecordTypeReader for DieselRepository {
    fn get_record_type(
        &self,
        name: &RecordTypeName,
    ) -> RepositoryResult<Option<RecordTypeConfig>> {
        use crate::schema::record_types;

        let mut conn = self.conn()?;
        let row = record_types::table
            .find(name.as_str())
            .first::<DbRecordType>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(Some(
                RecordTypeConfig::try_from(row).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_record_types(&self) -> RepositoryResult<Vec<RecordTypeConfig>> {
        use crate::schema::record_types;

        let mut conn = self.conn()?;
        record_types::table
            .order(record_types::name.asc())
            .load::<DbRecordType>(&mut conn)?
            .into_iter()
            .map(|row| RecordTypeConfig::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl FieldDefinitionReader for DieselRepository {
    fn get_field_definition(
        &self,
        record_type: &RecordTypeName,
        name: &FieldName,
    ) -> RepositoryResult<Option<FieldDefinition>> {
        use crate::schema::field_definitions;

        let mut conn = self.conn()?;
        let row = field_definitions::table
            .find((record_type.as_str(), name.as_str()))
            .first::<DbFieldDefinition>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(Some(
                FieldDefinition::try_from(row).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_field_definitions(
        &self,
        record_type: &RecordTypeName,
    ) -> RepositoryResult<Vec<FieldDefinition>> {
        use crate::schema::field_definitions;

        let mut conn = self.conn()?;
        field_definitions::table
            .filter(field_definitions::record_type.eq(record_type.as_str()))
            .order((
                field_definitions::weight.asc(),
                field_definitions::name.asc(),
            ))
            .load::<DbFieldDefinition>(&mut conn)?
            .into_iter()
            .map(|row| FieldDefinition::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl DisplayConfigReader for DieselRepository {
    fn get_display_config(
        &self,
        record_type: &RecordTypeName,
        field: &FieldName,
        view_mode: &ViewModeId,
    ) -> RepositoryResult<Option<FieldDisplay>> {
        use crate::schema::display_configs;

        let mut conn = self.conn()?;
        let row = display_configs::table
            .find((record_type.as_str(), field.as_str(), view_mode.as_str()))
            .first::<DbDisplayConfig>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(Some(
                FieldDisplay::try_from(row).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_display_configs(
        &self,
        record_type: &RecordTypeName,
    ) -> RepositoryResult<Vec<FieldDisplay>> {
        use crate::schema::display_configs;

        let mut conn = self.conn()?;
        display_configs::table
            .filter(display_configs::record_type.eq(record_type.as_str()))
            .order((
                display_configs::field.asc(),
                display_configs::view_mode.asc(),
            ))
            .load::<DbDisplayConfig>(&mut conn)?
            .into_iter()
            .map(|row| FieldDisplay::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl DisplayConfigWriter for DieselRepository {
    fn upsert_display_config(&self, display: &FieldDisplay) -> RepositoryResult<FieldDisplay> {
        use crate::schema::display_configs;

        let mut conn = self.conn()?;
        let row = DbDisplayConfig::try_from(display).map_err(RepositoryError::from)?;

        let saved = diesel::insert_into(display_configs::table)
            .values(&row)
            .on_conflict((
                display_configs::record_type,
                display_configs::field,
                display_configs::view_mode,
            ))
            .do_update()
            .set((
                display_configs::click_to_edit.eq(excluded(display_configs::click_to_edit)),
                display_configs::click_to_edit_style
                    .eq(excluded(display_configs::click_to_edit_style)),
                display_configs::empty_text.eq(excluded(display_configs::empty_text)),
                display_configs::fallback_format.eq(excluded(display_configs::fallback_format)),
                display_configs::fallback_settings
                    .eq(excluded(display_configs::fallback_settings)),
                display_configs::hide_submit_button
                    .eq(excluded(display_configs::hide_submit_button)),
            ))
            .get_result::<DbDisplayConfig>(&mut conn)?;

        FieldDisplay::try_from(saved).map_err(RepositoryError::from)
    }
}
