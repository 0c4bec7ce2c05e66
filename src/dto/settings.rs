use serde::{Deserialize, Serialize};

use crate::domain::display::FieldDisplay;
use crate::domain::field::FieldDefinition;
use crate::domain::revision::RecordTypeConfig;

/// Query parameters accepted by the settings page service.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsQuery {
    pub record_type: Option<String>,
}

/// One stored display row with its human-readable summary.
#[derive(Debug, Serialize)]
pub struct DisplayConfigRow {
    pub display: FieldDisplay,
    /// One line per active setting.
    pub summary: Vec<String>,
}

/// Data required to render the display settings page.
pub struct SettingsPageData {
    pub record_types: Vec<RecordTypeConfig>,
    /// Type whose configuration is shown; `None` when nothing is configured.
    pub current_type: Option<RecordTypeConfig>,
    /// Fields of the current type in weight order.
    pub fields: Vec<FieldDefinition>,
    /// Formatter ids offered by the fallback format select.
    pub formatters: Vec<&'static str>,
    pub configs: Vec<DisplayConfigRow>,
}
