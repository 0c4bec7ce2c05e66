//! Form posted by the partial-update field actions.

use std::collections::HashMap;

use crate::forms::FormError;

/// Body of an `edit` or `save` action posted by the client script.
///
/// Widget inputs arrive as flat form fields next to the addressing ones, so
/// anything unrecognized is collected as a widget value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldActionForm {
    /// Action path addressing the field instance.
    pub path: String,
    /// Page token echoed back from the full page render.
    pub page: String,
    /// Change stamp of the record at render time.
    pub changed: Option<String>,
    /// Submitted widget inputs, keyed by control name.
    pub values: HashMap<String, String>,
}

#[cfg(feature = "server")]
impl FieldActionForm {
    /// Parses a urlencoded action body. Repeated keys keep the last value.
    pub fn parse(body: &[u8]) -> Result<Self, FormError> {
        let pairs: Vec<(String, String)> =
            serde_html_form::from_bytes(body).map_err(|_| FormError::Malformed)?;

        let mut form = Self::default();
        let mut path = None;
        let mut page = None;
        for (name, value) in pairs {
            match name.as_str() {
                "path" => path = Some(value),
                "page" => page = Some(value),
                "changed" => form.changed = Some(value),
                _ => {
                    form.values.insert(name, value);
                }
            }
        }
        form.path = path.ok_or(FormError::MissingField("path"))?;
        form.page = page.ok_or(FormError::MissingField("page"))?;
        Ok(form)
    }
}

#[cfg(all(test, feature = "server"))]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_addressing_fields_from_widget_values() {
        let body = b"path=article%2F7%2Ftitle%2Factions%2Fedit&page=token&changed=123&value=Hello%20world";

        let form = FieldActionForm::parse(body).unwrap();

        assert_eq!(form.path, "article/7/title/actions/edit");
        assert_eq!(form.page, "token");
        assert_eq!(form.changed.as_deref(), Some("123"));
        assert_eq!(form.values.get("value").map(String::as_str), Some("Hello world"));
    }

    #[test]
    fn parse_requires_path_and_page() {
        assert!(matches!(
            FieldActionForm::parse(b"page=token"),
            Err(FormError::MissingField("path"))
        ));
        assert!(matches!(
            FieldActionForm::parse(b"path=a%2F1%2Fb%2Factions%2Fedit"),
            Err(FormError::MissingField("page"))
        ));
    }

    #[test]
    fn parse_keeps_last_value_of_repeated_keys() {
        let form = FieldActionForm::parse(b"path=p&page=t&value=0&value=1").unwrap();
        assert_eq!(form.values.get("value").map(String::as_str), Some("1"));
    }

    #[test]
    fn parse_tolerates_missing_widget_values() {
        let form = FieldActionForm::parse(b"path=p&page=t").unwrap();
        assert!(form.changed.is_none());
        assert!(form.values.is_empty());
    }
}
