//! The render selector: turns a session plus its record into the fragment
//! data rebuilt on every partial update.
//!
//! Rendering is pure; the same inputs always produce an identical fragment,
//! so re-rendering an untouched instance yields byte-identical markup.

use serde::Serialize;

use crate::domain::display::ClickToEditStyle;
use crate::domain::field::FieldDefinition;
use crate::domain::record::Record;
use crate::domain::types::PageToken;
use crate::editing::access::AccessPolicy;
use crate::editing::format::FormatterRegistry;
use crate::editing::session::{EditMode, FieldEditSession};
use crate::editing::validate::FieldError;
use crate::editing::widget::{self, FormElement, WidgetRegistry};

/// Operation tag carried by an edit trigger.
pub const OP_EDIT: &str = "edit";

/// Operation tag carried by a save control.
pub const OP_SAVE: &str = "save";

/// Cache context varying output by viewer identity.
const USER_CACHE_CONTEXT: &str = "user";

/// The affordance switching an instance into edit mode.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct EditTrigger {
    /// Control name, unique per instance.
    pub name: String,
    pub label: String,
    /// Action path the control posts to.
    pub action: String,
    pub operation: &'static str,
    pub style: ClickToEditStyle,
}

/// Cache hints declared for a rendered sub-tree.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CacheMetadata {
    pub contexts: Vec<String>,
    pub tags: Vec<String>,
    /// `None` means cacheable without expiry; `Some(0)` forbids caching.
    pub max_age: Option<u32>,
}

impl CacheMetadata {
    /// Hints for one field instance: varies per user, invalidated with the
    /// field's definition and storage.
    #[must_use]
    pub fn for_field(field: &FieldDefinition) -> Self {
        Self {
            contexts: vec![USER_CACHE_CONTEXT.to_string()],
            tags: field.cache_tags(),
            max_age: None,
        }
    }

    /// Hints for output that may be mid-edit and must not be cached.
    #[must_use]
    pub fn uncacheable() -> Self {
        Self {
            contexts: vec![USER_CACHE_CONTEXT.to_string()],
            tags: Vec::new(),
            max_age: Some(0),
        }
    }
}

/// Mode-specific payload of a fragment.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FragmentBody {
    View {
        /// Pre-rendered value markup; `None` renders nothing.
        markup: Option<String>,
        /// Present only when the viewer may edit.
        edit_trigger: Option<EditTrigger>,
    },
    Edit {
        elements: Vec<FormElement>,
        errors: Vec<FieldError>,
        /// Name of the save control.
        submit_name: String,
        /// Action path the save control posts to.
        save_action: String,
        /// Last-modified stamp anchoring validation errors.
        changed: String,
        /// Keep the submit control in the markup but visually hidden.
        hide_submit: bool,
    },
    /// The underlying record is gone; render an empty sub-tree.
    Unavailable,
}

/// One rebuildable sub-tree, addressed by its session path.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct FieldFragment {
    pub wrapper_id: String,
    pub build_id: String,
    pub path: String,
    pub page: PageToken,
    pub field_label: String,
    pub mode: EditMode,
    pub body: FragmentBody,
    pub cache: CacheMetadata,
}

/// Inputs for rendering one instance.
pub struct RenderRequest<'a> {
    pub session: &'a FieldEditSession,
    pub field: &'a FieldDefinition,
    /// Freshly loaded record; `None` when it was deleted since the page was
    /// rendered.
    pub record: Option<&'a Record>,
    pub mode: EditMode,
    pub page: PageToken,
    /// Submitted value to show instead of the stored one, used when
    /// re-rendering a form after validation failed.
    pub candidate: Option<&'a str>,
    pub errors: Vec<FieldError>,
}

/// Chooses between the view rendering and the edit form for a session.
pub struct RenderSelector<'a> {
    formatters: &'a FormatterRegistry,
    widgets: &'a WidgetRegistry,
}

impl<'a> RenderSelector<'a> {
    #[must_use]
    pub fn new(formatters: &'a FormatterRegistry, widgets: &'a WidgetRegistry) -> Self {
        Self { formatters, widgets }
    }

    /// Renders the instance's sub-tree for its active mode.
    ///
    /// A denied capability never errors: the edit trigger is omitted, and a
    /// requested edit mode silently degrades to the view rendering.
    #[must_use]
    pub fn render<A>(&self, request: RenderRequest<'_>, access: &A) -> FieldFragment
    where
        A: AccessPolicy + ?Sized,
    {
        let session = request.session;
        let context = &session.context;

        let Some(record) = request.record else {
            return self.fragment(&request, EditMode::View, FragmentBody::Unavailable);
        };

        let can_edit = access.can_edit(record, request.field);
        let mode = if request.mode.is_edit() && !can_edit {
            EditMode::View
        } else {
            request.mode
        };

        let body = match mode {
            EditMode::View => {
                let markup = if record.has_value(&context.field_name) {
                    record.value(&context.field_name).and_then(|value| {
                        self.formatters.format(request.field, &context.display, value)
                    })
                } else if context.view_mode.is_listing() && !context.display.empty_text.is_empty() {
                    Some(context.display.empty_text.clone())
                } else {
                    None
                };
                let edit_trigger = can_edit.then(|| EditTrigger {
                    name: format!("edit-{}", session.key.segments().join("-")),
                    label: "Edit this field".to_string(),
                    action: session.key.action_path(OP_EDIT),
                    operation: OP_EDIT,
                    style: context.display.click_to_edit_style,
                });
                FragmentBody::View {
                    markup,
                    edit_trigger,
                }
            }
            EditMode::Edit => {
                let current = request
                    .candidate
                    .or_else(|| record.value(&context.field_name));
                let mut elements = self.widgets.elements(request.field, current);
                if context.view_mode.is_listing() {
                    widget::simplify(&mut elements);
                }
                FragmentBody::Edit {
                    elements,
                    errors: request.errors.clone(),
                    submit_name: format!("submit-{}", session.key.segments().join("-")),
                    save_action: session.key.action_path(OP_SAVE),
                    changed: record.changed_stamp(),
                    hide_submit: context.display.hide_submit_button,
                }
            }
        };

        self.fragment(&request, mode, body)
    }

    fn fragment(
        &self,
        request: &RenderRequest<'_>,
        mode: EditMode,
        body: FragmentBody,
    ) -> FieldFragment {
        let session = request.session;
        FieldFragment {
            wrapper_id: session.key.wrapper_id(),
            build_id: session.build_id(),
            path: session.key.path(),
            page: request.page,
            field_label: request.field.label.clone(),
            mode,
            body,
            cache: CacheMetadata::for_field(request.field),
        }
    }
}
