//! Per-field display configuration controlling the in-place editing UX.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::field::FieldKind;
use crate::domain::types::{
    FieldName, FormatterId, RecordTypeName, TypeConstraintError, ViewModeId,
};

/// How the switch from view mode to edit mode is offered to the user.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClickToEditStyle {
    /// An explicit "Edit this field" trigger is rendered next to the value.
    Button,
    /// The value itself becomes the trigger, highlighted on hover.
    #[default]
    Hover,
}

impl ClickToEditStyle {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Hover => "hover",
        }
    }
}

impl std::fmt::Display for ClickToEditStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ClickToEditStyle {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "button" => Ok(Self::Button),
            "hover" => Ok(Self::Hover),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown click-to-edit style '{other}'"
            ))),
        }
    }
}

/// Display configuration of one field, scoped to a record type.
///
/// Controls which mode a field instance starts in, how the edit trigger is
/// offered, and which formatter renders the stored value in view mode.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Start in view mode and offer an explicit switch to edit mode. When
    /// disabled every instance renders as a form immediately.
    pub click_to_edit: bool,
    pub click_to_edit_style: ClickToEditStyle,
    /// Raw markup substituted for an empty value in listing contexts.
    pub empty_text: String,
    /// Formatter rendering the value in view mode. When unset the field
    /// kind's natural formatter applies; when set but unresolvable the value
    /// renders as nothing.
    pub fallback_format: Option<FormatterId>,
    /// Free-form options forwarded to the fallback formatter.
    #[serde(default)]
    pub fallback_settings: HashMap<String, serde_json::Value>,
    /// Suppress the per-field submit button (the client script submits on
    /// change instead).
    pub hide_submit_button: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            click_to_edit: true,
            click_to_edit_style: ClickToEditStyle::default(),
            empty_text: "&nbsp;".to_string(),
            fallback_format: None,
            fallback_settings: HashMap::new(),
            hide_submit_button: false,
        }
    }
}

impl DisplayConfig {
    /// Default configuration seeded with the natural formatter of a kind.
    #[must_use]
    pub fn for_kind(kind: FieldKind) -> Self {
        Self {
            fallback_format: Some(kind.natural_formatter()),
            ..Self::default()
        }
    }

    /// One human-readable line per active setting, shown on the display
    /// settings page.
    #[must_use]
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "Hide submit button: {}",
                if self.hide_submit_button { "Hide" } else { "Show" }
            ),
            format!(
                "Click to edit: {}",
                if self.click_to_edit { "Enable" } else { "Disable" }
            ),
            format!("Click to edit style: {}", self.click_to_edit_style),
        ];
        if !self.empty_text.is_empty() {
            lines.push(format!("Empty text: {}", self.empty_text));
        }
        if let Some(format) = &self.fallback_format {
            lines.push(format!("Fallback format: {format}"));
        }
        lines
    }
}

/// A stored display config row, keyed by record type, field and view mode.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FieldDisplay {
    pub record_type: RecordTypeName,
    pub field_name: FieldName,
    pub view_mode: ViewModeId,
    pub config: DisplayConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_behavior() {
        let config = DisplayConfig::default();
        assert!(config.click_to_edit);
        assert_eq!(config.click_to_edit_style, ClickToEditStyle::Hover);
        assert_eq!(config.empty_text, "&nbsp;");
        assert!(config.fallback_format.is_none());
        assert!(!config.hide_submit_button);
    }

    #[test]
    fn for_kind_seeds_natural_formatter() {
        let config = DisplayConfig::for_kind(FieldKind::Boolean);
        assert_eq!(
            config.fallback_format.map(|f| f.into_inner()),
            Some("boolean".to_string())
        );
    }

    #[test]
    fn summary_lists_active_settings() {
        let config = DisplayConfig {
            fallback_format: Some(FormatterId::from_static("plain")),
            ..DisplayConfig::default()
        };
        let summary = config.summary();
        assert!(summary.contains(&"Click to edit: Enable".to_string()));
        assert!(summary.contains(&"Click to edit style: hover".to_string()));
        assert!(summary.contains(&"Fallback format: plain".to_string()));
    }

    #[test]
    fn style_parses_known_values_only() {
        assert_eq!(
            ClickToEditStyle::try_from("button").unwrap(),
            ClickToEditStyle::Button
        );
        assert!(ClickToEditStyle::try_from("inline").is_err());
    }
}
