//! Services behind the partial-update field actions.
//!
//! Both actions resolve the instance from the submitted path, run the state
//! machine and hand back a single re-rendered fragment; the page around the
//! fragment is never touched.

use crate::domain::auth::AuthenticatedUser;
use crate::domain::field::FieldDefinition;
use crate::domain::types::{
    FULL_VIEW_MODE, LISTING_VIEW_MODE, LanguageCode, PageToken, ViewModeId,
};
use crate::editing::access::AccessPolicy;
use crate::editing::format::FormatterRegistry;
use crate::editing::key::SessionKey;
use crate::editing::mode::ModeController;
use crate::editing::mutation::{self, MutationError};
use crate::editing::policy::TypeConfigPolicy;
use crate::editing::render::{FieldFragment, RenderRequest, RenderSelector};
use crate::editing::session::{EditMode, FieldEditSession, SessionContext};
use crate::editing::store::EditSessionStore;
use crate::editing::widget::{WidgetInput, WidgetRegistry};
use crate::forms::field::FieldActionForm;
use crate::repository::{
    DisplayConfigReader, FieldDefinitionReader, RecordReader, RecordTypeReader, RecordWriter,
};
use crate::services::{ServiceError, ServiceResult, access_policy, display_for};

/// Instance an action path resolved to.
struct ResolvedAction {
    session: FieldEditSession,
    field: FieldDefinition,
}

/// Maps a submitted action path back to its session and field.
///
/// The remembered context snapshot is preferred; when the scope expired it is
/// rebuilt from storage, and a deleted record still yields a minimal context
/// so the action can answer with the empty sub-tree.
fn resolve_action<R, S>(repo: &R, store: &S, path: &str) -> ServiceResult<ResolvedAction>
where
    R: RecordReader + FieldDefinitionReader + DisplayConfigReader + ?Sized,
    S: EditSessionStore + ?Sized,
{
    let key = SessionKey::from_action_path(path)?;
    let field = repo
        .get_field_definition(key.record_type(), key.field_name())?
        .ok_or(ServiceError::NotFound)?;

    let controller = ModeController::new(store);
    let context = match controller.context(&key)? {
        Some(context) => context,
        None => {
            let view_mode = if key.row().is_some() {
                ViewModeId::from_static(LISTING_VIEW_MODE)
            } else {
                ViewModeId::from_static(FULL_VIEW_MODE)
            };
            let display = display_for(repo, key.record_type(), &field, &view_mode)?;
            match repo.get_record_by_id(key.record_type(), key.record_id())? {
                Some(record) => {
                    SessionContext::for_record(&record, field.name.clone(), view_mode, display)
                }
                None => SessionContext {
                    record_type: key.record_type().clone(),
                    record_id: key.record_id(),
                    revision_id: None,
                    field_name: field.name.clone(),
                    langcode: LanguageCode::default(),
                    view_mode,
                    display,
                },
            }
        }
    };

    Ok(ResolvedAction {
        session: FieldEditSession::for_context(context, key.row()),
        field,
    })
}

/// Switches one instance into edit mode and re-renders its sub-tree.
///
/// A viewer without the edit capability gets no error; the fragment simply
/// comes back in view mode without a trigger.
pub fn start_edit<R, S>(
    repo: &R,
    store: &S,
    user: &AuthenticatedUser,
    form: &FieldActionForm,
    page: PageToken,
) -> ServiceResult<FieldFragment>
where
    R: RecordReader + FieldDefinitionReader + DisplayConfigReader + ?Sized,
    S: EditSessionStore + ?Sized,
{
    let resolved = resolve_action(repo, store, &form.path)?;
    let session = &resolved.session;
    let field = &resolved.field;

    let record = repo
        .get_record_by_id(session.key.record_type(), session.key.record_id())
        .map_err(|err| {
            log::error!("Failed to load record for edit action: {err}");
            err
        })?;

    let access = access_policy(user);
    let controller = ModeController::new(store);
    if let Some(record) = &record {
        if access.can_edit(record, field) {
            controller.set_mode(&session.key, EditMode::Edit)?;
            controller.remember(&session.key, session.context.clone())?;
        }
    }
    let mode = controller.mode(&session.key, &session.context.display)?;

    let formatters = FormatterRegistry::with_defaults();
    let widgets = WidgetRegistry::with_defaults();
    let selector = RenderSelector::new(&formatters, &widgets);
    Ok(selector.render(
        RenderRequest {
            session,
            field,
            record: record.as_ref(),
            mode,
            page,
            candidate: None,
            errors: Vec::new(),
        },
        &access,
    ))
}

/// Applies a submitted value to its record and re-renders the instance.
///
/// A stored submission flips the instance back to view mode; validation
/// failures keep it in edit mode with the submitted value and its errors; a
/// record deleted since the page rendered yields the empty sub-tree.
pub fn save_field<R, S>(
    repo: &R,
    store: &S,
    user: &AuthenticatedUser,
    form: &FieldActionForm,
    page: PageToken,
) -> ServiceResult<FieldFragment>
where
    R: RecordReader
        + RecordWriter
        + RecordTypeReader
        + FieldDefinitionReader
        + DisplayConfigReader
        + ?Sized,
    S: EditSessionStore + ?Sized,
{
    let resolved = resolve_action(repo, store, &form.path)?;
    let session = &resolved.session;
    let field = &resolved.field;

    let formatters = FormatterRegistry::with_defaults();
    let widgets = WidgetRegistry::with_defaults();
    let selector = RenderSelector::new(&formatters, &widgets);
    let controller = ModeController::new(store);
    let access = access_policy(user);

    let current = repo
        .get_record_by_id(session.key.record_type(), session.key.record_id())
        .map_err(|err| {
            log::error!("Failed to load record for save action: {err}");
            err
        })?;

    let outcome = match &current {
        Some(current) => {
            if !access.can_edit(current, field) {
                return Err(ServiceError::Unauthorized);
            }
            let record_type = repo
                .get_record_type(session.key.record_type())
                .map_err(|err| {
                    log::error!("Failed to load record type for save action: {err}");
                    err
                })?;
            let policy = TypeConfigPolicy::new(record_type);
            let input = WidgetInput::new(form.values.clone());
            match mutation::apply(repo, &widgets, &policy, session, field, &input) {
                Ok(outcome) => Some(outcome),
                Err(MutationError::RecordNotFound { .. }) => None,
                Err(MutationError::Store(err)) => {
                    // Leave the instance in edit mode so the user can retry.
                    log::error!("Failed to save field {}: {err}", session.key.path());
                    return Err(ServiceError::Repository(err));
                }
            }
        }
        None => None,
    };

    let Some(outcome) = outcome else {
        controller.set_mode(&session.key, EditMode::View)?;
        return Ok(selector.render(
            RenderRequest {
                session,
                field,
                record: None,
                mode: EditMode::View,
                page,
                candidate: None,
                errors: Vec::new(),
            },
            &access,
        ));
    };

    if outcome.saved {
        controller.set_mode(&session.key, EditMode::View)?;
        let context = SessionContext::for_record(
            &outcome.record,
            field.name.clone(),
            session.context.view_mode.clone(),
            session.context.display.clone(),
        );
        controller.remember(&session.key, context.clone())?;
        let refreshed = FieldEditSession::for_context(context, session.key.row());
        return Ok(selector.render(
            RenderRequest {
                session: &refreshed,
                field,
                record: Some(&outcome.record),
                mode: EditMode::View,
                page,
                candidate: None,
                errors: Vec::new(),
            },
            &access,
        ));
    }

    controller.set_mode(&session.key, EditMode::Edit)?;
    let candidate = outcome
        .record
        .value(&field.name)
        .map(ToString::to_string)
        .unwrap_or_default();
    Ok(selector.render(
        RenderRequest {
            session,
            field,
            record: current.as_ref(),
            mode: EditMode::Edit,
            page,
            candidate: Some(&candidate),
            errors: outcome.errors,
        },
        &access,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::display::{DisplayConfig, FieldDisplay};
    use crate::domain::field::FieldKind;
    use crate::domain::record::{NewRecord, Record};
    use crate::domain::revision::RecordTypeConfig;
    use crate::domain::types::{FieldName, RecordId, RecordTypeName};
    use crate::editing::render::FragmentBody;
    use crate::editing::store::MemorySessionStore;
    use crate::pagination::Paginated;
    use crate::repository::RecordListQuery;
    use crate::repository::errors::{RepositoryError, RepositoryResult};
    use chrono::Utc;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory store covering every trait the field actions touch.
    struct FakeRepo {
        records: RefCell<HashMap<i32, Record>>,
        fields: Vec<FieldDefinition>,
        record_type: RecordTypeConfig,
        fail_save: bool,
    }

    impl FakeRepo {
        fn new(record: Record, fields: Vec<FieldDefinition>) -> Self {
            let mut records = HashMap::new();
            records.insert(record.id.get(), record);
            Self {
                records: RefCell::new(records),
                fields,
                record_type: RecordTypeConfig {
                    name: RecordTypeName::new("article").unwrap(),
                    label: "Article".to_string(),
                    versioned: false,
                    new_revision_by_default: false,
                },
                fail_save: false,
            }
        }

        fn failing_saves(mut self) -> Self {
            self.fail_save = true;
            self
        }

        fn stored_title(&self) -> Option<String> {
            self.records
                .borrow()
                .get(&42)
                .and_then(|r| r.value(&FieldName::new("title").unwrap()).map(String::from))
        }
    }

    impl RecordReader for FakeRepo {
        fn get_record_by_id(
            &self,
            record_type: &RecordTypeName,
            id: RecordId,
        ) -> RepositoryResult<Option<Record>> {
            Ok(self
                .records
                .borrow()
                .get(&id.get())
                .filter(|r| &r.record_type == record_type)
                .cloned())
        }

        fn get_record(&self, id: RecordId) -> RepositoryResult<Option<Record>> {
            Ok(self.records.borrow().get(&id.get()).cloned())
        }

        fn list_records(&self, _query: RecordListQuery) -> RepositoryResult<Paginated<Record>> {
            Ok(Paginated::new(Vec::new(), 1, 0))
        }
    }

    impl RecordWriter for FakeRepo {
        fn create_records(&self, _records: &[NewRecord]) -> RepositoryResult<usize> {
            Ok(0)
        }

        fn save_record(&self, record: &Record) -> RepositoryResult<Record> {
            if self.fail_save {
                return Err(RepositoryError::DatabaseError("disk full".to_string()));
            }
            let saved = record.clone();
            self.records.borrow_mut().insert(saved.id.get(), saved.clone());
            Ok(saved)
        }

        fn delete_record(&self, id: RecordId) -> RepositoryResult<()> {
            self.records.borrow_mut().remove(&id.get());
            Ok(())
        }
    }

    impl RecordTypeReader for FakeRepo {
        fn get_record_type(
            &self,
            name: &RecordTypeName,
        ) -> RepositoryResult<Option<RecordTypeConfig>> {
            Ok((name == &self.record_type.name).then(|| self.record_type.clone()))
        }

        fn list_record_types(&self) -> RepositoryResult<Vec<RecordTypeConfig>> {
            Ok(vec![self.record_type.clone()])
        }
    }

    impl FieldDefinitionReader for FakeRepo {
        fn get_field_definition(
            &self,
            record_type: &RecordTypeName,
            name: &FieldName,
        ) -> RepositoryResult<Option<FieldDefinition>> {
            Ok(self
                .fields
                .iter()
                .find(|f| &f.record_type == record_type && &f.name == name)
                .cloned())
        }

        fn list_field_definitions(
            &self,
            record_type: &RecordTypeName,
        ) -> RepositoryResult<Vec<FieldDefinition>> {
            Ok(self
                .fields
                .iter()
                .filter(|f| &f.record_type == record_type)
                .cloned()
                .collect())
        }
    }

    impl DisplayConfigReader for FakeRepo {
        fn get_display_config(
            &self,
            _record_type: &RecordTypeName,
            _field: &FieldName,
            _view_mode: &ViewModeId,
        ) -> RepositoryResult<Option<FieldDisplay>> {
            Ok(None)
        }

        fn list_display_configs(
            &self,
            _record_type: &RecordTypeName,
        ) -> RepositoryResult<Vec<FieldDisplay>> {
            Ok(Vec::new())
        }
    }

    fn editor() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "editor@example.com".to_string(),
            name: "Editor".to_string(),
            roles: vec![
                crate::SERVICE_ACCESS_ROLE.to_string(),
                crate::SERVICE_EDITOR_ROLE.to_string(),
            ],
            exp: 0,
        }
    }

    fn viewer() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "2".to_string(),
            email: "viewer@example.com".to_string(),
            name: "Viewer".to_string(),
            roles: vec![crate::SERVICE_ACCESS_ROLE.to_string()],
            exp: 0,
        }
    }

    fn field(name: &str, required: bool, max_length: Option<i32>) -> FieldDefinition {
        FieldDefinition {
            record_type: RecordTypeName::new("article").unwrap(),
            name: FieldName::new(name).unwrap(),
            label: "Title".to_string(),
            kind: FieldKind::Text,
            required,
            max_length,
            protected: false,
            weight: 0,
        }
    }

    fn record(title: &str) -> Record {
        let now = Utc::now().naive_utc();
        let mut values = HashMap::new();
        values.insert(FieldName::new("title").unwrap(), title.to_string());
        Record {
            id: RecordId::new(42).unwrap(),
            record_type: RecordTypeName::new("article").unwrap(),
            langcode: LanguageCode::default(),
            revision_id: None,
            created_at: now,
            updated_at: now,
            values,
            new_revision: false,
            revision_log: None,
        }
    }

    fn edit_form(path: &str) -> FieldActionForm {
        FieldActionForm {
            path: path.to_string(),
            ..FieldActionForm::default()
        }
    }

    fn save_form(path: &str, value: &str) -> FieldActionForm {
        let mut values = HashMap::new();
        values.insert("value".to_string(), value.to_string());
        FieldActionForm {
            path: path.to_string(),
            values,
            ..FieldActionForm::default()
        }
    }

    #[test]
    fn edit_action_flips_the_instance_into_edit_mode() {
        let repo = FakeRepo::new(record("Hello"), vec![field("title", false, None)]);
        let store = MemorySessionStore::new();

        let fragment = start_edit(
            &repo,
            &store,
            &editor(),
            &edit_form("article/42/title/actions/edit"),
            PageToken::mint(),
        )
        .unwrap();

        assert_eq!(fragment.mode, EditMode::Edit);
        match fragment.body {
            FragmentBody::Edit { elements, .. } => assert_eq!(elements[0].value, "Hello"),
            other => panic!("expected edit body, got {other:?}"),
        }

        // The flag survives for the next rebuild of the same instance.
        let key = SessionKey::from_action_path("article/42/title/actions/edit").unwrap();
        let controller = ModeController::new(&store);
        assert_eq!(
            controller.mode(&key, &DisplayConfig::default()).unwrap(),
            EditMode::Edit
        );
    }

    #[test]
    fn edit_without_capability_degrades_to_view() {
        let repo = FakeRepo::new(record("Hello"), vec![field("title", false, None)]);
        let store = MemorySessionStore::new();

        let fragment = start_edit(
            &repo,
            &store,
            &viewer(),
            &edit_form("article/42/title/actions/edit"),
            PageToken::mint(),
        )
        .unwrap();

        assert_eq!(fragment.mode, EditMode::View);
        match fragment.body {
            FragmentBody::View { edit_trigger, .. } => assert!(edit_trigger.is_none()),
            other => panic!("expected view body, got {other:?}"),
        }

        // The denied request must not have flipped the stored flag either.
        let key = SessionKey::from_action_path("article/42/title/actions/edit").unwrap();
        let controller = ModeController::new(&store);
        assert_eq!(
            controller.mode(&key, &DisplayConfig::default()).unwrap(),
            EditMode::View
        );
    }

    #[test]
    fn listing_row_action_rebuilds_an_expired_scope() {
        let repo = FakeRepo::new(record("Hello"), vec![field("title", false, None)]);
        let store = MemorySessionStore::new();

        // No prior render remembered a context for row 3.
        let fragment = start_edit(
            &repo,
            &store,
            &editor(),
            &edit_form("article/42/title/3/actions/edit"),
            PageToken::mint(),
        )
        .unwrap();

        assert_eq!(fragment.mode, EditMode::Edit);
        assert_eq!(fragment.path, "article/42/title/3");
    }

    #[test]
    fn save_persists_and_returns_the_view_fragment() {
        let repo = FakeRepo::new(record("Old"), vec![field("title", false, None)]);
        let store = MemorySessionStore::new();
        let page = PageToken::mint();
        start_edit(
            &repo,
            &store,
            &editor(),
            &edit_form("article/42/title/actions/edit"),
            page,
        )
        .unwrap();

        let fragment = save_field(
            &repo,
            &store,
            &editor(),
            &save_form("article/42/title/actions/save", "New"),
            page,
        )
        .unwrap();

        assert_eq!(fragment.mode, EditMode::View);
        match fragment.body {
            FragmentBody::View { markup, .. } => assert_eq!(markup.as_deref(), Some("New")),
            other => panic!("expected view body, got {other:?}"),
        }
        assert_eq!(repo.stored_title().as_deref(), Some("New"));

        let key = SessionKey::from_action_path("article/42/title/actions/save").unwrap();
        let controller = ModeController::new(&store);
        assert_eq!(
            controller.mode(&key, &DisplayConfig::default()).unwrap(),
            EditMode::View
        );
    }

    #[test]
    fn invalid_value_keeps_edit_mode_with_errors() {
        let repo = FakeRepo::new(record("Old"), vec![field("title", false, Some(5))]);
        let store = MemorySessionStore::new();
        let page = PageToken::mint();
        start_edit(
            &repo,
            &store,
            &editor(),
            &edit_form("article/42/title/actions/edit"),
            page,
        )
        .unwrap();

        let fragment = save_field(
            &repo,
            &store,
            &editor(),
            &save_form("article/42/title/actions/save", "Far too long"),
            page,
        )
        .unwrap();

        assert_eq!(fragment.mode, EditMode::Edit);
        match fragment.body {
            FragmentBody::Edit {
                elements, errors, ..
            } => {
                assert_eq!(elements[0].value, "Far too long");
                assert_eq!(errors.len(), 1);
            }
            other => panic!("expected edit body, got {other:?}"),
        }
        assert_eq!(repo.stored_title().as_deref(), Some("Old"));
    }

    #[test]
    fn cleared_required_value_re_renders_empty_with_error() {
        let repo = FakeRepo::new(record("Old"), vec![field("title", true, None)]);
        let store = MemorySessionStore::new();
        let page = PageToken::mint();

        let fragment = save_field(
            &repo,
            &store,
            &editor(),
            &save_form("article/42/title/actions/save", "   "),
            page,
        )
        .unwrap();

        match fragment.body {
            FragmentBody::Edit {
                elements, errors, ..
            } => {
                assert_eq!(elements[0].value, "");
                assert!(!errors.is_empty());
            }
            other => panic!("expected edit body, got {other:?}"),
        }
        assert_eq!(repo.stored_title().as_deref(), Some("Old"));
    }

    #[test]
    fn store_failure_leaves_the_instance_in_edit_mode() {
        let repo =
            FakeRepo::new(record("Old"), vec![field("title", false, None)]).failing_saves();
        let store = MemorySessionStore::new();
        let page = PageToken::mint();
        start_edit(
            &repo,
            &store,
            &editor(),
            &edit_form("article/42/title/actions/edit"),
            page,
        )
        .unwrap();

        let result = save_field(
            &repo,
            &store,
            &editor(),
            &save_form("article/42/title/actions/save", "New"),
            page,
        );

        assert!(matches!(result, Err(ServiceError::Repository(_))));
        let key = SessionKey::from_action_path("article/42/title/actions/save").unwrap();
        let controller = ModeController::new(&store);
        assert_eq!(
            controller.mode(&key, &DisplayConfig::default()).unwrap(),
            EditMode::Edit
        );
    }

    #[test]
    fn vanished_record_renders_the_unavailable_fragment() {
        let repo = FakeRepo::new(record("Old"), vec![field("title", false, None)]);
        let store = MemorySessionStore::new();
        let page = PageToken::mint();
        start_edit(
            &repo,
            &store,
            &editor(),
            &edit_form("article/42/title/actions/edit"),
            page,
        )
        .unwrap();
        repo.records.borrow_mut().clear();

        let fragment = save_field(
            &repo,
            &store,
            &editor(),
            &save_form("article/42/title/actions/save", "New"),
            page,
        )
        .unwrap();

        assert_eq!(fragment.body, FragmentBody::Unavailable);
        let key = SessionKey::from_action_path("article/42/title/actions/save").unwrap();
        let controller = ModeController::new(&store);
        assert_eq!(
            controller.mode(&key, &DisplayConfig::default()).unwrap(),
            EditMode::View
        );
    }

    #[test]
    fn forged_save_without_capability_is_unauthorized() {
        let repo = FakeRepo::new(record("Old"), vec![field("title", false, None)]);
        let store = MemorySessionStore::new();

        let result = save_field(
            &repo,
            &store,
            &viewer(),
            &save_form("article/42/title/actions/save", "New"),
            PageToken::mint(),
        );

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
        assert_eq!(repo.stored_title().as_deref(), Some("Old"));
    }

    #[test]
    fn unknown_field_is_not_found_and_garbage_paths_are_rejected() {
        let repo = FakeRepo::new(record("Old"), vec![field("title", false, None)]);
        let store = MemorySessionStore::new();

        let result = start_edit(
            &repo,
            &store,
            &editor(),
            &edit_form("article/42/missing/actions/edit"),
            PageToken::mint(),
        );
        assert!(matches!(result, Err(ServiceError::NotFound)));

        let result = start_edit(
            &repo,
            &store,
            &editor(),
            &edit_form("actions/edit"),
            PageToken::mint(),
        );
        assert!(matches!(result, Err(ServiceError::Path(_))));
    }
}
