//! Diesel models for the content-model configuration tables: record types,
//! field definitions and per-view-mode display configs.

use diesel::prelude::*;

use crate::domain::display::{
    ClickToEditStyle, DisplayConfig as DomainDisplayConfig, FieldDisplay,
};
use crate::domain::field::{FieldDefinition as DomainFieldDefinition, FieldKind};
use crate::domain::revision::RecordTypeConfig;
use crate::domain::types::{
    FieldName, FormatterId, RecordTypeName, TypeConstraintError, ViewModeId,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::record_types)]
#[diesel(primary_key(name))]
/// Diesel model for [`RecordTypeConfig`].
pub struct RecordType {
    pub name: String,
    pub label: String,
    pub versioned: bool,
    pub new_revision_by_default: bool,
}

impl TryFrom<RecordType> for RecordTypeConfig {
    type Error = TypeConstraintError;

    fn try_from(row: RecordType) -> Result<Self, Self::Error> {
        Ok(Self {
            name: RecordTypeName::new(row.name)?,
            label: row.label,
            versioned: row.versioned,
            new_revision_by_default: row.new_revision_by_default,
        })
    }
}

impl From<&RecordTypeConfig> for RecordType {
    fn from(config: &RecordTypeConfig) -> Self {
        Self {
            name: config.name.to_string(),
            label: config.label.clone(),
            versioned: config.versioned,
            new_revision_by_default: config.new_revision_by_default,
        }
    }
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::field_definitions)]
#[diesel(primary_key(record_type, name))]
/// Diesel model for [`DomainFieldDefinition`].
pub struct FieldDefinition {
    pub record_type: String,
    pub name: String,
    pub label: String,
    pub kind: String,
    pub required: bool,
    pub max_length: Option<i32>,
    pub protected: bool,
    pub weight: i32,
}

impl TryFrom<FieldDefinition> for DomainFieldDefinition {
    type Error = TypeConstraintError;

    fn try_from(row: FieldDefinition) -> Result<Self, Self::Error> {
        Ok(Self {
            record_type: RecordTypeName::new(row.record_type)?,
            name: FieldName::new(row.name)?,
            label: row.label,
            kind: FieldKind::try_from(row.kind.as_str())?,
            required: row.required,
            max_length: row.max_length,
            protected: row.protected,
            weight: row.weight,
        })
    }
}

impl From<&DomainFieldDefinition> for FieldDefinition {
    fn from(field: &DomainFieldDefinition) -> Self {
        Self {
            record_type: field.record_type.to_string(),
            name: field.name.to_string(),
            label: field.label.clone(),
            kind: field.kind.as_str().to_string(),
            required: field.required,
            max_length: field.max_length,
            protected: field.protected,
            weight: field.weight,
        }
    }
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::display_configs)]
#[diesel(primary_key(record_type, field, view_mode))]
/// Diesel model for [`FieldDisplay`]; the formatter settings map is stored
/// as a JSON text column.
pub struct DisplayConfig {
    pub record_type: String,
    pub field: String,
    pub view_mode: String,
    pub click_to_edit: bool,
    pub click_to_edit_style: String,
    pub empty_text: String,
    pub fallback_format: Option<String>,
    pub fallback_settings: String,
    pub hide_submit_button: bool,
}

impl TryFrom<DisplayConfig> for FieldDisplay {
    type Error = TypeConstraintError;

    fn try_from(row: DisplayConfig) -> Result<Self, Self::Error> {
        let fallback_settings = serde_json::from_str(&row.fallback_settings).map_err(|e| {
            TypeConstraintError::InvalidValue(format!("fallback settings: {e}"))
        })?;

        Ok(Self {
            record_type: RecordTypeName::new(row.record_type)?,
            field_name: FieldName::new(row.field)?,
            view_mode: ViewModeId::new(row.view_mode)?,
            config: DomainDisplayConfig {
                click_to_edit: row.click_to_edit,
                click_to_edit_style: ClickToEditStyle::try_from(
                    row.click_to_edit_style.as_str(),
                )?,
                empty_text: row.empty_text,
                fallback_format: row
                    .fallback_format
                    .map(FormatterId::new)
                    .transpose()?,
                fallback_settings,
                hide_submit_button: row.hide_submit_button,
            },
        })
    }
}

impl TryFrom<&FieldDisplay> for DisplayConfig {
    type Error = TypeConstraintError;

    fn try_from(display: &FieldDisplay) -> Result<Self, Self::Error> {
        let fallback_settings = serde_json::to_string(&display.config.fallback_settings)
            .map_err(|e| TypeConstraintError::InvalidValue(format!("fallback settings: {e}")))?;

        Ok(Self {
            record_type: display.record_type.to_string(),
            field: display.field_name.to_string(),
            view_mode: display.view_mode.to_string(),
            click_to_edit: display.config.click_to_edit,
            click_to_edit_style: display.config.click_to_edit_style.to_string(),
            empty_text: display.config.empty_text.clone(),
            fallback_format: display
                .config
                .fallback_format
                .as_ref()
                .map(ToString::to_string),
            fallback_settings,
            hide_submit_button: display.config.hide_submit_button,
        })
    }
}
