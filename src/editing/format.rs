//! Fallback formatters rendering stored values in view mode.

use std::collections::HashMap;

use crate::domain::display::DisplayConfig;
use crate::domain::field::{FieldDefinition, FieldKind};

/// Free-form settings forwarded from the display config to a formatter.
pub type FormatterSettings = HashMap<String, serde_json::Value>;

/// Renders a raw stored value as view-mode markup.
///
/// Formatters are stateless and safe to share across sessions within one
/// request.
pub trait FieldFormatter {
    fn id(&self) -> &'static str;

    /// Whether the formatter can render values of the given kind.
    fn supports(&self, kind: FieldKind) -> bool;

    /// Produces HTML-safe markup for the value.
    fn format(&self, value: &str, settings: &FormatterSettings) -> String;
}

fn str_setting<'a>(settings: &'a FormatterSettings, key: &str) -> Option<&'a str> {
    settings.get(key).and_then(|v| v.as_str())
}

fn u64_setting(settings: &FormatterSettings, key: &str) -> Option<u64> {
    settings.get(key).and_then(|v| v.as_u64())
}

/// Escaped verbatim output, usable for any kind.
pub struct PlainFormatter;

impl FieldFormatter for PlainFormatter {
    fn id(&self) -> &'static str {
        "plain"
    }

    fn supports(&self, _kind: FieldKind) -> bool {
        true
    }

    fn format(&self, value: &str, _settings: &FormatterSettings) -> String {
        ammonia::clean_text(value)
    }
}

/// Escaped output truncated to `trim_length` characters with an ellipsis.
pub struct TrimmedFormatter;

impl TrimmedFormatter {
    const DEFAULT_TRIM_LENGTH: u64 = 120;
}

impl FieldFormatter for TrimmedFormatter {
    fn id(&self) -> &'static str {
        "trimmed"
    }

    fn supports(&self, kind: FieldKind) -> bool {
        matches!(kind, FieldKind::Text | FieldKind::LongText | FieldKind::Email)
    }

    fn format(&self, value: &str, settings: &FormatterSettings) -> String {
        let limit =
            u64_setting(settings, "trim_length").unwrap_or(Self::DEFAULT_TRIM_LENGTH) as usize;
        let truncated: String = value.chars().take(limit).collect();
        if truncated.chars().count() < value.chars().count() {
            format!("{}…", ammonia::clean_text(truncated.trim_end()))
        } else {
            ammonia::clean_text(&truncated)
        }
    }
}

/// Integer output with an optional thousand separator.
pub struct IntegerFormatter;

impl IntegerFormatter {
    fn group(digits: &str, separator: &str) -> String {
        let chars: Vec<char> = digits.chars().collect();
        let mut grouped = String::new();
        for (i, c) in chars.iter().enumerate() {
            if i > 0 && (chars.len() - i) % 3 == 0 {
                grouped.push_str(separator);
            }
            grouped.push(*c);
        }
        grouped
    }
}

impl FieldFormatter for IntegerFormatter {
    fn id(&self) -> &'static str {
        "integer"
    }

    fn supports(&self, kind: FieldKind) -> bool {
        matches!(kind, FieldKind::Integer)
    }

    fn format(&self, value: &str, settings: &FormatterSettings) -> String {
        let Ok(number) = value.trim().parse::<i64>() else {
            // Not a number after all; show it escaped rather than hiding it.
            return ammonia::clean_text(value);
        };
        let separator = str_setting(settings, "thousand_separator").unwrap_or(",");
        let digits = number.unsigned_abs().to_string();
        let grouped = Self::group(&digits, separator);
        let formatted = if number < 0 {
            format!("-{grouped}")
        } else {
            grouped
        };
        ammonia::clean_text(&formatted)
    }
}

/// On/off labels for boolean values.
pub struct BooleanFormatter;

impl BooleanFormatter {
    fn is_truthy(value: &str) -> bool {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        )
    }
}

impl FieldFormatter for BooleanFormatter {
    fn id(&self) -> &'static str {
        "boolean"
    }

    fn supports(&self, kind: FieldKind) -> bool {
        matches!(kind, FieldKind::Boolean)
    }

    fn format(&self, value: &str, settings: &FormatterSettings) -> String {
        let label = if Self::is_truthy(value) {
            str_setting(settings, "on_label").unwrap_or("Yes")
        } else {
            str_setting(settings, "off_label").unwrap_or("No")
        };
        ammonia::clean_text(label)
    }
}

/// Registry resolving formatter ids to implementations.
pub struct FormatterRegistry {
    formatters: HashMap<&'static str, Box<dyn FieldFormatter>>,
}

impl FormatterRegistry {
    /// Registry with the built-in formatter roster.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self {
            formatters: HashMap::new(),
        };
        registry.register(Box::new(PlainFormatter));
        registry.register(Box::new(TrimmedFormatter));
        registry.register(Box::new(IntegerFormatter));
        registry.register(Box::new(BooleanFormatter));
        registry
    }

    pub fn register(&mut self, formatter: Box<dyn FieldFormatter>) {
        self.formatters.insert(formatter.id(), formatter);
    }

    /// Ids of every registered formatter, sorted for stable presentation.
    #[must_use]
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.formatters.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn resolve(&self, field: &FieldDefinition, display: &DisplayConfig) -> Option<&dyn FieldFormatter> {
        match &display.fallback_format {
            Some(id) => {
                // A configured formatter that is unknown or incompatible with
                // the field's kind degrades to no output, never an error.
                let formatter = self.formatters.get(id.as_str())?;
                formatter.supports(field.kind).then_some(formatter.as_ref())
            }
            None => {
                let natural = field.kind.natural_formatter();
                self.formatters.get(natural.as_str()).map(|f| f.as_ref())
            }
        }
    }

    /// Renders the value through the configured fallback formatter.
    ///
    /// `None` means "no output": either no formatter resolved or the resolved
    /// one is incompatible with the field kind.
    #[must_use]
    pub fn format(
        &self,
        field: &FieldDefinition,
        display: &DisplayConfig,
        value: &str,
    ) -> Option<String> {
        self.resolve(field, display)
            .map(|formatter| formatter.format(value, &display.fallback_settings))
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{FieldName, FormatterId, RecordTypeName};
    use serde_json::json;

    fn field(kind: FieldKind) -> FieldDefinition {
        FieldDefinition {
            record_type: RecordTypeName::new("article").unwrap(),
            name: FieldName::new("title").unwrap(),
            label: "Title".to_string(),
            kind,
            required: false,
            max_length: None,
            protected: false,
            weight: 0,
        }
    }

    fn display(format: Option<&'static str>) -> DisplayConfig {
        DisplayConfig {
            fallback_format: format.map(FormatterId::from_static),
            ..DisplayConfig::default()
        }
    }

    #[test]
    fn plain_escapes_markup() {
        let registry = FormatterRegistry::with_defaults();
        let output = registry
            .format(&field(FieldKind::Text), &display(Some("plain")), "<b>hi</b>")
            .unwrap();
        assert!(!output.contains('<'));
        assert!(output.contains("hi"));
    }

    #[test]
    fn trimmed_honors_trim_length_setting() {
        let registry = FormatterRegistry::with_defaults();
        let mut config = display(Some("trimmed"));
        config
            .fallback_settings
            .insert("trim_length".to_string(), json!(5));
        let output = registry
            .format(&field(FieldKind::LongText), &config, "hello world")
            .unwrap();
        assert_eq!(output, "hello…");
    }

    #[test]
    fn integer_groups_thousands() {
        let registry = FormatterRegistry::with_defaults();
        let output = registry
            .format(&field(FieldKind::Integer), &display(Some("integer")), "1234567")
            .unwrap();
        assert_eq!(output, "1,234,567");

        let negative = registry
            .format(&field(FieldKind::Integer), &display(Some("integer")), "-1000")
            .unwrap();
        assert_eq!(negative, "-1,000");
    }

    #[test]
    fn boolean_uses_labels() {
        let registry = FormatterRegistry::with_defaults();
        let mut config = display(Some("boolean"));
        config
            .fallback_settings
            .insert("on_label".to_string(), json!("Active"));
        assert_eq!(
            registry.format(&field(FieldKind::Boolean), &config, "1"),
            Some("Active".to_string())
        );
        assert_eq!(
            registry.format(&field(FieldKind::Boolean), &config, "0"),
            Some("No".to_string())
        );
    }

    #[test]
    fn incompatible_formatter_yields_no_output() {
        let registry = FormatterRegistry::with_defaults();
        assert_eq!(
            registry.format(&field(FieldKind::Boolean), &display(Some("integer")), "1"),
            None
        );
        assert_eq!(
            registry.format(&field(FieldKind::Text), &display(Some("nonexistent")), "x"),
            None
        );
    }

    #[test]
    fn unset_formatter_falls_back_to_natural() {
        let registry = FormatterRegistry::with_defaults();
        assert_eq!(
            registry.format(&field(FieldKind::Boolean), &display(None), "true"),
            Some("Yes".to_string())
        );
    }
}
