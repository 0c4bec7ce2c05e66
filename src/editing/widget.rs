//! Input widgets generating and parsing the editable representation of a
//! field.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::field::{FieldDefinition, FieldKind};

/// Form input name carrying the submitted field value.
pub const VALUE_INPUT: &str = "value";

/// Default visible height of a multi-line widget.
const TEXTAREA_ROWS: u32 = 5;

/// Concrete control a form element renders as.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlKind {
    Text,
    Textarea { rows: u32 },
    Number,
    Email,
    Checkbox,
}

impl ControlKind {
    #[must_use]
    pub fn is_checkbox(&self) -> bool {
        matches!(self, Self::Checkbox)
    }
}

/// One primitive element of a widget, ready for template rendering.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FormElement {
    pub control: ControlKind,
    pub name: String,
    pub label: String,
    pub value: String,
    pub required: bool,
    pub max_length: Option<i32>,
    /// Set by the simplification pass; the label is kept in the markup for
    /// assistive technology but not displayed.
    pub title_hidden: bool,
}

impl FormElement {
    fn new(control: ControlKind, field: &FieldDefinition, value: String) -> Self {
        Self {
            control,
            name: VALUE_INPUT.to_string(),
            label: field.label.clone(),
            value,
            required: field.required,
            max_length: field.max_length,
            title_hidden: false,
        }
    }
}

/// Submitted form values addressed by input name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WidgetInput {
    values: HashMap<String, String>,
}

impl WidgetInput {
    #[must_use]
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Generates form elements for a field and parses them back on submit.
pub trait FieldWidget {
    /// Elements pre-populated with the current value.
    fn elements(&self, field: &FieldDefinition, current: Option<&str>) -> Vec<FormElement>;

    /// Candidate value extracted from submitted input; `None` clears the
    /// field.
    fn parse(&self, field: &FieldDefinition, input: &WidgetInput) -> Option<String>;
}

fn parse_single_line(input: &WidgetInput) -> Option<String> {
    let trimmed = input.get(VALUE_INPUT)?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Single-line text input.
pub struct TextWidget;

impl FieldWidget for TextWidget {
    fn elements(&self, field: &FieldDefinition, current: Option<&str>) -> Vec<FormElement> {
        vec![FormElement::new(
            ControlKind::Text,
            field,
            current.unwrap_or_default().to_string(),
        )]
    }

    fn parse(&self, _field: &FieldDefinition, input: &WidgetInput) -> Option<String> {
        parse_single_line(input)
    }
}

/// Multi-line textarea.
pub struct LongTextWidget;

impl FieldWidget for LongTextWidget {
    fn elements(&self, field: &FieldDefinition, current: Option<&str>) -> Vec<FormElement> {
        vec![FormElement::new(
            ControlKind::Textarea {
                rows: TEXTAREA_ROWS,
            },
            field,
            current.unwrap_or_default().to_string(),
        )]
    }

    fn parse(&self, _field: &FieldDefinition, input: &WidgetInput) -> Option<String> {
        let normalized = input.get(VALUE_INPUT)?.replace("\r\n", "\n");
        let trimmed = normalized.trim_end();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Numeric input for integer fields.
pub struct IntegerWidget;

impl FieldWidget for IntegerWidget {
    fn elements(&self, field: &FieldDefinition, current: Option<&str>) -> Vec<FormElement> {
        vec![FormElement::new(
            ControlKind::Number,
            field,
            current.unwrap_or_default().to_string(),
        )]
    }

    fn parse(&self, _field: &FieldDefinition, input: &WidgetInput) -> Option<String> {
        parse_single_line(input)
    }
}

/// Email input.
pub struct EmailWidget;

impl FieldWidget for EmailWidget {
    fn elements(&self, field: &FieldDefinition, current: Option<&str>) -> Vec<FormElement> {
        vec![FormElement::new(
            ControlKind::Email,
            field,
            current.unwrap_or_default().to_string(),
        )]
    }

    fn parse(&self, _field: &FieldDefinition, input: &WidgetInput) -> Option<String> {
        parse_single_line(input)
    }
}

/// Checkbox for boolean fields; an absent input means unchecked, not cleared.
pub struct BooleanWidget;

impl BooleanWidget {
    fn is_truthy(value: &str) -> bool {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        )
    }
}

impl FieldWidget for BooleanWidget {
    fn elements(&self, field: &FieldDefinition, current: Option<&str>) -> Vec<FormElement> {
        let checked = current.is_some_and(Self::is_truthy);
        vec![FormElement::new(
            ControlKind::Checkbox,
            field,
            if checked { "1" } else { "" }.to_string(),
        )]
    }

    fn parse(&self, _field: &FieldDefinition, input: &WidgetInput) -> Option<String> {
        let checked = input.get(VALUE_INPUT).is_some_and(Self::is_truthy);
        Some(if checked { "1" } else { "0" }.to_string())
    }
}

/// Registry resolving field kinds to their widget.
pub struct WidgetRegistry {
    widgets: HashMap<FieldKind, Box<dyn FieldWidget>>,
    fallback: Box<dyn FieldWidget>,
}

impl WidgetRegistry {
    /// Registry with one widget per built-in kind; unknown kinds fall back to
    /// a plain text input.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut widgets: HashMap<FieldKind, Box<dyn FieldWidget>> = HashMap::new();
        widgets.insert(FieldKind::Text, Box::new(TextWidget));
        widgets.insert(FieldKind::LongText, Box::new(LongTextWidget));
        widgets.insert(FieldKind::Integer, Box::new(IntegerWidget));
        widgets.insert(FieldKind::Email, Box::new(EmailWidget));
        widgets.insert(FieldKind::Boolean, Box::new(BooleanWidget));
        Self {
            widgets,
            fallback: Box::new(TextWidget),
        }
    }

    pub fn register(&mut self, kind: FieldKind, widget: Box<dyn FieldWidget>) {
        self.widgets.insert(kind, widget);
    }

    fn widget(&self, kind: FieldKind) -> &dyn FieldWidget {
        self.widgets
            .get(&kind)
            .map_or(self.fallback.as_ref(), |w| w.as_ref())
    }

    #[must_use]
    pub fn elements(&self, field: &FieldDefinition, current: Option<&str>) -> Vec<FormElement> {
        self.widget(field.kind).elements(field, current)
    }

    #[must_use]
    pub fn parse(&self, field: &FieldDefinition, input: &WidgetInput) -> Option<String> {
        self.widget(field.kind).parse(field, input)
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Cosmetic pass for in-place use inside listings.
///
/// Hides the label of a lone primitive element (the surrounding cell already
/// labels it) unless it is a checkbox, and grows a textarea to fit its
/// current content plus one spare line.
pub fn simplify(elements: &mut [FormElement]) {
    if elements.len() != 1 {
        return;
    }
    let element = &mut elements[0];
    if !element.control.is_checkbox() {
        element.title_hidden = true;
    }
    if matches!(element.control, ControlKind::Textarea { .. }) {
        let lines = element.value.lines().count().max(1) as u32;
        element.control = ControlKind::Textarea { rows: lines + 1 };
    }
}
