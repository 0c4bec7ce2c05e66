//! Service behind the records listing page.

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::record::Record;
use crate::domain::types::{LISTING_VIEW_MODE, PageToken, RecordTypeName, ViewModeId};
pub use crate::dto::main::IndexQuery;
use crate::dto::main::{IndexPageData, IndexRow};
use crate::editing::format::FormatterRegistry;
use crate::editing::listing::{ListingContext, render_listing};
use crate::editing::render::RenderSelector;
use crate::editing::store::EditSessionStore;
use crate::editing::widget::WidgetRegistry;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    DisplayConfigReader, FieldDefinitionReader, RecordListQuery, RecordReader, RecordTypeReader,
};
use crate::services::{ServiceError, ServiceResult, access_policy, display_for, ensure_role};

/// Loads the paginated listing with one editable fragment per column and
/// row.
///
/// Rendering runs against the page scope identified by `page_token`; a
/// column's fragments share one display configuration while every row keeps
/// its own session.
pub fn load_index_page<R, S>(
    repo: &R,
    store: &S,
    user: &AuthenticatedUser,
    query: IndexQuery,
    page_token: PageToken,
) -> ServiceResult<IndexPageData>
where
    R: RecordReader + RecordTypeReader + FieldDefinitionReader + DisplayConfigReader + ?Sized,
    S: EditSessionStore + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

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

    let Some(current_type) = current_type else {
        return Ok(IndexPageData {
            record_types,
            current_type: None,
            columns: Vec::new(),
            rows: Paginated::new(Vec::new(), 1, 0),
            page_token,
        });
    };

    let page = query.page.unwrap_or(1);
    let records = repo
        .list_records(
            RecordListQuery::new(current_type.name.clone()).paginate(page, DEFAULT_ITEMS_PER_PAGE),
        )
        .map_err(|err| {
            log::error!("Failed to list records: {err}");
            err
        })?;

    let columns = repo.list_field_definitions(&current_type.name)?;

    let view_mode = ViewModeId::from_static(LISTING_VIEW_MODE);
    let formatters = FormatterRegistry::with_defaults();
    let widgets = WidgetRegistry::with_defaults();
    let selector = RenderSelector::new(&formatters, &widgets);
    let access = access_policy(user);

    let mut rows: Vec<IndexRow> = records
        .items
        .iter()
        .map(|record| IndexRow {
            record: record.clone(),
            cells: Vec::new(),
        })
        .collect();
    let row_records: Vec<Option<Record>> = records.items.into_iter().map(Some).collect();

    for field in &columns {
        let display = display_for(repo, &current_type.name, field, &view_mode)?;
        let ctx = ListingContext {
            field,
            display: &display,
            page: page_token,
        };
        let fragments = render_listing(store, &selector, &access, &ctx, &row_records)?;
        for row in fragments.rows {
            rows[row.row].cells.push(row.fragment);
        }
    }

    Ok(IndexPageData {
        record_types,
        current_type: Some(current_type),
        columns,
        rows: Paginated {
            items: rows,
            pages: records.pages,
            page: records.page,
        },
        page_token,
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::editing::store::MemorySessionStore;
    use crate::repository::mock::MockRepository;

    fn viewer_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "viewer@example.com".to_string(),
            name: "Viewer".to_string(),
            roles: vec!["other_service".to_string()],
            exp: 0,
        }
    }

    fn reader_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "2".to_string(),
            email: "reader@example.com".to_string(),
            name: "Reader".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
            exp: 0,
        }
    }

    #[test]
    fn index_requires_the_access_role() {
        let mut repo = MockRepository::new();
        repo.expect_list_record_types().times(0);
        let store = MemorySessionStore::new();

        let result = load_index_page(
            &repo,
            &store,
            &viewer_user(),
            IndexQuery::default(),
            PageToken::mint(),
        );

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn index_with_no_record_types_renders_empty() {
        let mut repo = MockRepository::new();
        repo.expect_list_record_types().returning(|| Ok(Vec::new()));
        let store = MemorySessionStore::new();

        let data = load_index_page(
            &repo,
            &store,
            &reader_user(),
            IndexQuery::default(),
            PageToken::mint(),
        )
        .unwrap();

        assert!(data.current_type.is_none());
        assert!(data.columns.is_empty());
        assert!(data.rows.items.is_empty());
    }

    #[test]
    fn unknown_record_type_tab_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_list_record_types().returning(|| Ok(Vec::new()));
        repo.expect_get_record_type().returning(|_| Ok(None));
        let store = MemorySessionStore::new();

        let result = load_index_page(
            &repo,
            &store,
            &reader_user(),
            IndexQuery {
                record_type: Some("missing".to_string()),
                page: None,
            },
            PageToken::mint(),
        );

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
