//! Service behind the record detail page.

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::{FULL_VIEW_MODE, PageToken, RecordId, ViewModeId};
use crate::dto::record::RecordPageData;
use crate::editing::format::FormatterRegistry;
use crate::editing::mode::ModeController;
use crate::editing::render::{RenderRequest, RenderSelector};
use crate::editing::session::{FieldEditSession, SessionContext};
use crate::editing::store::EditSessionStore;
use crate::editing::widget::WidgetRegistry;
use crate::repository::{
    DisplayConfigReader, FieldDefinitionReader, RecordReader, RecordTypeReader, RevisionReader,
};
use crate::services::{ServiceError, ServiceResult, access_policy, display_for, ensure_role};

/// Loads one record with an editable fragment per field, plus its revision
/// history when the type keeps one.
///
/// Every fragment is registered in the session store under `page` so later
/// partial updates can rebuild it without re-deriving display settings.
pub fn load_record_page<R, S>(
    repo: &R,
    store: &S,
    user: &AuthenticatedUser,
    record_id: i32,
    page: PageToken,
) -> ServiceResult<RecordPageData>
where
    R: RecordReader
        + RecordTypeReader
        + FieldDefinitionReader
        + DisplayConfigReader
        + RevisionReader
        + ?Sized,
    S: EditSessionStore + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let id = RecordId::new(record_id).map_err(|_| ServiceError::NotFound)?;
    let record = repo
        .get_record(id)
        .map_err(|err| {
            log::error!("Failed to load record {record_id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;
    let record_type = repo
        .get_record_type(&record.record_type)
        .map_err(|err| {
            log::error!("Failed to load record type: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;
    let fields = repo
        .list_field_definitions(&record.record_type)
        .map_err(|err| {
            log::error!("Failed to list field definitions: {err}");
            err
        })?;

    let view_mode = ViewModeId::from_static(FULL_VIEW_MODE);
    let formatters = FormatterRegistry::with_defaults();
    let widgets = WidgetRegistry::with_defaults();
    let selector = RenderSelector::new(&formatters, &widgets);
    let controller = ModeController::new(store);
    let access = access_policy(user);

    let mut fragments = Vec::with_capacity(fields.len());
    for field in &fields {
        let display = display_for(repo, &record.record_type, field, &view_mode)?;
        let context =
            SessionContext::for_record(&record, field.name.clone(), view_mode.clone(), display);
        let session = FieldEditSession::for_context(context, None);
        let mode = controller.mode(&session.key, &session.context.display)?;
        controller.remember(&session.key, session.context.clone())?;
        fragments.push(selector.render(
            RenderRequest {
                session: &session,
                field,
                record: Some(&record),
                mode,
                page,
                candidate: None,
                errors: Vec::new(),
            },
            &access,
        ));
    }

    let revisions = if record_type.versioned {
        repo.list_revisions(id).map_err(|err| {
            log::error!("Failed to list revisions of record {record_id}: {err}");
            err
        })?
    } else {
        Vec::new()
    };

    Ok(RecordPageData {
        record,
        record_type,
        fields,
        fragments,
        revisions,
        page_token: page,
    })
}
