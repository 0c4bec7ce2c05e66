//! Field-level validation of candidate values.

use serde::Serialize;
use validator::{ValidateEmail, ValidateLength};

use crate::domain::field::{FieldDefinition, FieldKind};
use crate::domain::types::FieldName;

/// One validation failure, scoped to the field that produced it.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: FieldName,
    pub message: String,
}

impl FieldError {
    fn new(field: &FieldDefinition, message: String) -> Self {
        Self {
            field: field.name.clone(),
            message,
        }
    }
}

fn kind_error(field: &FieldDefinition, candidate: &str) -> Option<String> {
    match field.kind {
        FieldKind::Integer => candidate
            .parse::<i64>()
            .is_err()
            .then(|| format!("{} must be a whole number.", field.label)),
        FieldKind::Email => (!candidate.validate_email())
            .then(|| format!("{} must be a valid email address.", field.label)),
        FieldKind::Boolean => {
            let known = matches!(candidate, "0" | "1" | "true" | "false");
            (!known).then(|| format!("{} must be a boolean value.", field.label))
        }
        FieldKind::Text | FieldKind::LongText => None,
    }
}

/// Validates a candidate value against the field definition.
///
/// Errors keep their emission order: the required check first, then the
/// kind-specific parse, then the length bound. No deduplication happens.
#[must_use]
pub fn validate_field(field: &FieldDefinition, candidate: Option<&str>) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let value = candidate.map(str::trim).filter(|v| !v.is_empty());

    if field.required && value.is_none() {
        errors.push(FieldError::new(
            field,
            format!("The {} field is required.", field.label),
        ));
    }

    let Some(value) = value else {
        return errors;
    };

    if let Some(message) = kind_error(field, value) {
        errors.push(FieldError::new(field, message));
    }

    if let Some(max) = field.max_length {
        let bounded = value.validate_length(None, Some(max as u64), None);
        if !bounded {
            errors.push(FieldError::new(
                field,
                format!(
                    "{} cannot be longer than {max} characters.",
                    field.label
                ),
            ));
        }
    }

    errors
}
