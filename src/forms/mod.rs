//! Form definitions backing the editable-field routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod field;
pub mod settings;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("malformed form body")]
    Malformed,

    #[error("missing form field: {0}")]
    MissingField(&'static str),

    #[error("invalid record type")]
    InvalidRecordType,

    #[error("invalid field name")]
    InvalidFieldName,

    #[error("invalid view mode")]
    InvalidViewMode,

    #[error("invalid click-to-edit style")]
    InvalidStyle,

    #[error("invalid formatter")]
    InvalidFormatter,

    #[error("invalid formatter settings")]
    InvalidFormatterSettings,
}
