//! Forms for the display settings page.

use std::collections::HashMap;

use serde::Deserialize;
use validator::Validate;

use crate::domain::display::{ClickToEditStyle, DisplayConfig, FieldDisplay};
use crate::domain::types::{FieldName, FormatterId, LISTING_VIEW_MODE, RecordTypeName, ViewModeId};
use crate::forms::FormError;

/// Form capturing one display configuration row.
#[derive(Debug, Deserialize, Validate)]
pub struct DisplayConfigForm {
    #[validate(length(min = 1, max = 64))]
    pub record_type: String,
    #[validate(length(min = 1, max = 64))]
    pub field: String,
    /// View mode the row applies to; empty means the listing mode.
    #[serde(default)]
    pub view_mode: Option<String>,
    /// Checkbox, present when enabled.
    #[serde(default)]
    pub click_to_edit: Option<String>,
    pub click_to_edit_style: String,
    #[serde(default)]
    pub empty_text: String,
    /// Empty selects the field kind's natural formatter.
    #[serde(default)]
    pub fallback_format: Option<String>,
    /// Formatter options as a JSON object.
    #[serde(default)]
    pub fallback_settings: Option<String>,
    /// Checkbox, present when enabled.
    #[serde(default)]
    pub hide_submit_button: Option<String>,
}

/// Validated display configuration ready to persist.
#[derive(Debug)]
pub struct DisplayConfigPayload {
    pub record_type: RecordTypeName,
    pub field_name: FieldName,
    pub view_mode: ViewModeId,
    pub config: DisplayConfig,
}

impl TryFrom<DisplayConfigForm> for DisplayConfigPayload {
    type Error = FormError;

    fn try_from(form: DisplayConfigForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let record_type =
            RecordTypeName::new(form.record_type).map_err(|_| FormError::InvalidRecordType)?;
        let field_name = FieldName::new(form.field).map_err(|_| FormError::InvalidFieldName)?;
        let view_mode = match form.view_mode.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            Some(mode) => ViewModeId::new(mode).map_err(|_| FormError::InvalidViewMode)?,
            None => ViewModeId::from_static(LISTING_VIEW_MODE),
        };

        let click_to_edit_style = ClickToEditStyle::try_from(form.click_to_edit_style.as_str())
            .map_err(|_| FormError::InvalidStyle)?;

        let fallback_format = form
            .fallback_format
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(|f| FormatterId::new(f).map_err(|_| FormError::InvalidFormatter))
            .transpose()?;

        let fallback_settings = match form
            .fallback_settings
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(raw) => serde_json::from_str::<HashMap<String, serde_json::Value>>(raw)
                .map_err(|_| FormError::InvalidFormatterSettings)?,
            None => HashMap::new(),
        };

        let config = DisplayConfig {
            click_to_edit: form.click_to_edit.is_some(),
            click_to_edit_style,
            empty_text: ammonia::clean(&form.empty_text),
            fallback_format,
            fallback_settings,
            hide_submit_button: form.hide_submit_button.is_some(),
        };

        Ok(Self {
            record_type,
            field_name,
            view_mode,
            config,
        })
    }
}

impl DisplayConfigPayload {
    /// Converts into the stored display row.
    #[must_use]
    pub fn into_domain(self) -> FieldDisplay {
        FieldDisplay {
            record_type: self.record_type,
            field_name: self.field_name,
            view_mode: self.view_mode,
            config: self.config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_form() -> DisplayConfigForm {
        DisplayConfigForm {
            record_type: "article".to_string(),
            field: "title".to_string(),
            view_mode: None,
            click_to_edit: Some("on".to_string()),
            click_to_edit_style: "hover".to_string(),
            empty_text: "&nbsp;".to_string(),
            fallback_format: Some("plain".to_string()),
            fallback_settings: None,
            hide_submit_button: None,
        }
    }

    #[test]
    fn payload_carries_validated_settings() {
        let payload = DisplayConfigPayload::try_from(base_form()).unwrap();

        assert_eq!(payload.record_type.as_str(), "article");
        assert_eq!(payload.field_name.as_str(), "title");
        assert_eq!(payload.view_mode.as_str(), LISTING_VIEW_MODE);
        assert!(payload.config.click_to_edit);
        assert_eq!(payload.config.click_to_edit_style, ClickToEditStyle::Hover);
        assert_eq!(
            payload.config.fallback_format.as_ref().map(|f| f.as_str()),
            Some("plain")
        );
        assert!(!payload.config.hide_submit_button);
    }

    #[test]
    fn absent_checkboxes_disable_their_settings() {
        let mut form = base_form();
        form.click_to_edit = None;
        form.hide_submit_button = Some("on".to_string());

        let payload = DisplayConfigPayload::try_from(form).unwrap();

        assert!(!payload.config.click_to_edit);
        assert!(payload.config.hide_submit_button);
    }

    #[test]
    fn blank_fallback_format_selects_the_natural_formatter() {
        let mut form = base_form();
        form.fallback_format = Some("  ".to_string());

        let payload = DisplayConfigPayload::try_from(form).unwrap();

        assert!(payload.config.fallback_format.is_none());
    }

    #[test]
    fn formatter_settings_must_be_a_json_object() {
        let mut form = base_form();
        form.fallback_settings = Some("{\"trim_length\": 10}".to_string());
        let payload = DisplayConfigPayload::try_from(form).unwrap();
        assert_eq!(
            payload.config.fallback_settings.get("trim_length"),
            Some(&serde_json::json!(10))
        );

        let mut form = base_form();
        form.fallback_settings = Some("not json".to_string());
        assert!(matches!(
            DisplayConfigPayload::try_from(form),
            Err(FormError::InvalidFormatterSettings)
        ));
    }

    #[test]
    fn unknown_style_is_rejected() {
        let mut form = base_form();
        form.click_to_edit_style = "inline".to_string();

        assert!(matches!(
            DisplayConfigPayload::try_from(form),
            Err(FormError::InvalidStyle)
        ));
    }

    #[test]
    fn empty_record_type_fails_validation() {
        let mut form = base_form();
        form.record_type = String::new();

        assert!(matches!(
            DisplayConfigPayload::try_from(form),
            Err(FormError::Validation(_))
        ));
    }

    #[test]
    fn empty_text_markup_is_sanitized() {
        let mut form = base_form();
        form.empty_text = "<script>alert('x')</script><em>none</em>".to_string();

        let payload = DisplayConfigPayload::try_from(form).unwrap();

        assert_eq!(payload.config.empty_text, "<em>none</em>");
    }
}
