//! Services behind the display settings administration page.

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::RecordTypeName;
use crate::dto::settings::{DisplayConfigRow, SettingsPageData, SettingsQuery};
use crate::editing::format::FormatterRegistry;
use crate::forms::settings::{DisplayConfigForm, DisplayConfigPayload};
use crate::repository::{
    DisplayConfigReader, DisplayConfigWriter, FieldDefinitionReader, RecordTypeReader,
};
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Loads the stored display rows of one record type for the admin page.
pub fn load_settings_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: SettingsQuery,
) -> ServiceResult<SettingsPageData>
where
    R: RecordTypeReader + FieldDefinitionReader + DisplayConfigReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let record_types = repo.list_record_types().map_err(|err| {
        log::error!("Failed to list record types: {err}");
        err
    })?;

    let current_type = match &query.record_type {
        Some(name) => {
            let name = RecordTypeName::new(name.as_str()).map_err(|_| ServiceError::NotFound)?;
            Some(repo.get_record_type(&name)?.ok_or(ServiceError::NotFound)?)
        }
        None => record_types.first().cloned(),
    };

    let formatters = FormatterRegistry::with_defaults().ids();

    let Some(current_type) = current_type else {
        return Ok(SettingsPageData {
            record_types,
            current_type: None,
            fields: Vec::new(),
            formatters,
            configs: Vec::new(),
        });
    };

    let fields = repo.list_field_definitions(&current_type.name)?;
    let configs = repo
        .list_display_configs(&current_type.name)
        .map_err(|err| {
            log::error!("Failed to list display configs: {err}");
            err
        })?
        .into_iter()
        .map(|display| DisplayConfigRow {
            summary: display.config.summary(),
            display,
        })
        .collect();

    Ok(SettingsPageData {
        record_types,
        current_type: Some(current_type),
        fields,
        formatters,
        configs,
    })
}

/// Validates and stores one display configuration row.
pub fn save_display_config<R>(
    form: DisplayConfigForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: RecordTypeReader + FieldDefinitionReader + DisplayConfigWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = DisplayConfigPayload::try_from(form)?;

    repo.get_record_type(&payload.record_type)?
        .ok_or_else(|| ServiceError::Form("Unknown record type.".to_string()))?;
    repo.get_field_definition(&payload.record_type, &payload.field_name)?
        .ok_or_else(|| ServiceError::Form("Unknown field.".to_string()))?;

    let display = payload.into_domain();
    repo.upsert_display_config(&display).map_err(|err| {
        log::error!("Failed to save display config: {err}");
        err
    })?;

    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::display::{DisplayConfig, FieldDisplay};
    use crate::domain::field::{FieldDefinition, FieldKind};
    use crate::domain::revision::RecordTypeConfig;
    use crate::domain::types::{FieldName, ViewModeId};
    use crate::repository::mock::MockRepository;

    /// Builds an admin user for test scenarios.
    fn admin_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            roles: vec![SERVICE_ADMIN_ROLE.to_string()],
            exp: 0,
        }
    }

    /// Builds an editor user without admin rights.
    fn editor_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "2".to_string(),
            email: "editor@example.com".to_string(),
            name: "Editor".to_string(),
            roles: vec![
                crate::SERVICE_ACCESS_ROLE.to_string(),
                crate::SERVICE_EDITOR_ROLE.to_string(),
            ],
            exp: 0,
        }
    }

    fn type_config() -> RecordTypeConfig {
        RecordTypeConfig {
            name: RecordTypeName::new("article").unwrap(),
            label: "Article".to_string(),
            versioned: false,
            new_revision_by_default: false,
        }
    }

    fn field_definition() -> FieldDefinition {
        FieldDefinition {
            record_type: RecordTypeName::new("article").unwrap(),
            name: FieldName::new("title").unwrap(),
            label: "Title".to_string(),
            kind: FieldKind::Text,
            required: false,
            max_length: None,
            protected: false,
            weight: 0,
        }
    }

    fn base_form() -> DisplayConfigForm {
        DisplayConfigForm {
            record_type: "article".to_string(),
            field: "title".to_string(),
            view_mode: None,
            click_to_edit: Some("on".to_string()),
            click_to_edit_style: "hover".to_string(),
            empty_text: "&nbsp;".to_string(),
            fallback_format: None,
            fallback_settings: None,
            hide_submit_button: None,
        }
    }

    /// Ensures the settings page is reserved for admins.
    #[test]
    fn settings_page_requires_admin_role() {
        let mut repo = MockRepository::new();
        repo.expect_list_record_types().times(0);

        let result = load_settings_page(&repo, &editor_user(), SettingsQuery::default());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    /// Ensures saving is reserved for admins.
    #[test]
    fn save_requires_admin_role() {
        let mut repo = MockRepository::new();
        repo.expect_upsert_display_config().times(0);

        let result = save_display_config(base_form(), &editor_user(), &repo);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    /// Checks that stored rows come back with their summary lines.
    #[test]
    fn settings_page_lists_rows_with_summaries() {
        let mut repo = MockRepository::new();
        repo.expect_list_record_types()
            .returning(|| Ok(vec![type_config()]));
        repo.expect_list_field_definitions()
            .returning(|_| Ok(vec![field_definition()]));
        repo.expect_list_display_configs().returning(|record_type| {
            Ok(vec![FieldDisplay {
                record_type: record_type.clone(),
                field_name: FieldName::new("title").unwrap(),
                view_mode: ViewModeId::new("listing").unwrap(),
                config: DisplayConfig {
                    hide_submit_button: true,
                    ..DisplayConfig::default()
                },
            }])
        });

        let data = load_settings_page(&repo, &admin_user(), SettingsQuery::default()).unwrap();

        assert_eq!(data.configs.len(), 1);
        assert!(
            data.configs[0]
                .summary
                .iter()
                .any(|line| line.contains("submit"))
        );
        assert!(data.formatters.contains(&"plain"));
    }

    /// Confirms a valid form is persisted through the repository.
    #[test]
    fn save_upserts_the_display_row() {
        let mut repo = MockRepository::new();
        repo.expect_get_record_type()
            .returning(|_| Ok(Some(type_config())));
        repo.expect_get_field_definition()
            .returning(|_, _| Ok(Some(field_definition())));
        repo.expect_upsert_display_config()
            .withf(|display| {
                display.record_type.as_str() == "article"
                    && display.field_name.as_str() == "title"
                    && display.view_mode.as_str() == "listing"
                    && display.config.click_to_edit
            })
            .times(1)
            .returning(|display| Ok(display.clone()));

        save_display_config(base_form(), &admin_user(), &repo).expect("should save config");
    }

    /// Rejects rows that reference a field the type does not have.
    #[test]
    fn unknown_field_is_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_get_record_type()
            .returning(|_| Ok(Some(type_config())));
        repo.expect_get_field_definition().returning(|_, _| Ok(None));
        repo.expect_upsert_display_config().times(0);

        let result = save_display_config(base_form(), &admin_user(), &repo);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
