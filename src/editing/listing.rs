//! Multi-instance fan-out for listing contexts.
//!
//! A listing shows the same field for many records (and possibly the same
//! record on several rows); every row gets its own session and fails or
//! edits independently of its siblings.

use crate::domain::display::DisplayConfig;
use crate::domain::field::FieldDefinition;
use crate::domain::record::Record;
use crate::domain::types::{PageToken, ViewModeId, LISTING_VIEW_MODE};
use crate::editing::access::AccessPolicy;
use crate::editing::mode::ModeController;
use crate::editing::render::{CacheMetadata, FieldFragment, RenderRequest, RenderSelector};
use crate::editing::session::{FieldEditSession, SessionContext};
use crate::editing::store::{EditSessionStore, SessionStoreError};

/// Shared inputs for one listing column.
pub struct ListingContext<'a> {
    pub field: &'a FieldDefinition,
    pub display: &'a DisplayConfig,
    pub page: PageToken,
}

/// Fragment rendered for one listing row.
#[derive(Clone, Debug, PartialEq)]
pub struct RowFragment {
    pub row: usize,
    pub fragment: FieldFragment,
}

/// All fragments of a listing column plus the listing's cache policy.
#[derive(Clone, Debug, PartialEq)]
pub struct ListingFragments {
    pub rows: Vec<RowFragment>,
    /// Any row may be mid-edit, so the listing as a whole is never cached.
    pub cache: CacheMetadata,
}

/// Renders one field instance per resolvable row.
///
/// Rows without a record are skipped silently; they produce no fragment and
/// no error. Session state is keyed by row, so one row's mode never leaks
/// into another's.
pub fn render_listing<S, A>(
    store: &S,
    selector: &RenderSelector<'_>,
    access: &A,
    ctx: &ListingContext<'_>,
    rows: &[Option<Record>],
) -> Result<ListingFragments, SessionStoreError>
where
    S: EditSessionStore + ?Sized,
    A: AccessPolicy + ?Sized,
{
    let controller = ModeController::new(store);
    let view_mode = ViewModeId::from_static(LISTING_VIEW_MODE);
    let mut fragments = Vec::new();

    for (row, record) in rows.iter().enumerate() {
        let Some(record) = record else {
            continue;
        };

        let context = SessionContext::for_record(
            record,
            ctx.field.name.clone(),
            view_mode.clone(),
            ctx.display.clone(),
        );
        let session = FieldEditSession::for_context(context.clone(), Some(row));

        let mode = controller.mode(&session.key, ctx.display)?;
        controller.remember(&session.key, context)?;

        let fragment = selector.render(
            RenderRequest {
                session: &session,
                field: ctx.field,
                record: Some(record),
                mode,
                page: ctx.page,
                candidate: None,
                errors: Vec::new(),
            },
            access,
        );
        fragments.push(RowFragment { row, fragment });
    }

    Ok(ListingFragments {
        rows: fragments,
        cache: CacheMetadata::uncacheable(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::FieldKind;
    use crate::domain::record::Record;
    use crate::domain::types::{FieldName, LanguageCode, RecordId, RecordTypeName};
    use crate::editing::format::FormatterRegistry;
    use crate::editing::session::EditMode;
    use crate::editing::store::MemorySessionStore;
    use crate::editing::widget::WidgetRegistry;
    use chrono::Utc;
    use std::collections::HashMap;

    struct AllowAll;

    impl AccessPolicy for AllowAll {
        fn can_update_record(&self, _record: &Record) -> bool {
            true
        }
        fn can_edit_field(&self, _record: &Record, _field: &FieldDefinition) -> bool {
            true
        }
        fn can_use_inline_edit(&self) -> bool {
            true
        }
    }

    fn field() -> FieldDefinition {
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

    fn record(id: i32, title: &str) -> Record {
        let now = Utc::now().naive_utc();
        let mut values = HashMap::new();
        values.insert(FieldName::new("title").unwrap(), title.to_string());
        Record {
            id: RecordId::new(id).unwrap(),
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

    #[test]
    fn unresolvable_rows_are_skipped_silently() {
        let store = MemorySessionStore::new();
        let formatters = FormatterRegistry::with_defaults();
        let widgets = WidgetRegistry::with_defaults();
        let selector = RenderSelector::new(&formatters, &widgets);
        let display = DisplayConfig::default();
        let field = field();
        let ctx = ListingContext {
            field: &field,
            display: &display,
            page: PageToken::mint(),
        };

        let rows = vec![Some(record(1, "One")), None, Some(record(3, "Three"))];
        let listing = render_listing(&store, &selector, &AllowAll, &ctx, &rows).unwrap();

        assert_eq!(listing.rows.len(), 2);
        assert_eq!(listing.rows[0].row, 0);
        assert_eq!(listing.rows[1].row, 2);
    }

    #[test]
    fn rows_get_distinct_session_keys() {
        let store = MemorySessionStore::new();
        let formatters = FormatterRegistry::with_defaults();
        let widgets = WidgetRegistry::with_defaults();
        let selector = RenderSelector::new(&formatters, &widgets);
        let display = DisplayConfig::default();
        let field = field();
        let ctx = ListingContext {
            field: &field,
            display: &display,
            page: PageToken::mint(),
        };

        // The same record twice, as a listing may legitimately repeat rows.
        let rows = vec![Some(record(1, "One")), Some(record(1, "One"))];
        let listing = render_listing(&store, &selector, &AllowAll, &ctx, &rows).unwrap();

        assert_ne!(listing.rows[0].fragment.path, listing.rows[1].fragment.path);
        assert_ne!(
            listing.rows[0].fragment.wrapper_id,
            listing.rows[1].fragment.wrapper_id
        );
    }

    #[test]
    fn editing_one_row_leaves_siblings_in_view_mode() {
        let store = MemorySessionStore::new();
        let formatters = FormatterRegistry::with_defaults();
        let widgets = WidgetRegistry::with_defaults();
        let selector = RenderSelector::new(&formatters, &widgets);
        let display = DisplayConfig::default();
        let field = field();
        let ctx = ListingContext {
            field: &field,
            display: &display,
            page: PageToken::mint(),
        };
        let rows = vec![
            Some(record(1, "One")),
            Some(record(2, "Two")),
            Some(record(3, "Three")),
        ];

        // Row 1 switches to edit mode between renders.
        let controller = ModeController::new(&store);
        let middle = FieldEditSession::for_context(
            SessionContext::for_record(
                rows[1].as_ref().unwrap(),
                field.name.clone(),
                ViewModeId::from_static(LISTING_VIEW_MODE),
                display.clone(),
            ),
            Some(1),
        );
        controller.set_mode(&middle.key, EditMode::Edit).unwrap();

        let listing = render_listing(&store, &selector, &AllowAll, &ctx, &rows).unwrap();

        assert_eq!(listing.rows[0].fragment.mode, EditMode::View);
        assert_eq!(listing.rows[1].fragment.mode, EditMode::Edit);
        assert_eq!(listing.rows[2].fragment.mode, EditMode::View);
    }

    #[test]
    fn listing_output_is_uncacheable() {
        let store = MemorySessionStore::new();
        let formatters = FormatterRegistry::with_defaults();
        let widgets = WidgetRegistry::with_defaults();
        let selector = RenderSelector::new(&formatters, &widgets);
        let display = DisplayConfig::default();
        let field = field();
        let ctx = ListingContext {
            field: &field,
            display: &display,
            page: PageToken::mint(),
        };

        let listing =
            render_listing(&store, &selector, &AllowAll, &ctx, &[Some(record(1, "One"))]).unwrap();
        assert_eq!(listing.cache.max_age, Some(0));
    }
}
