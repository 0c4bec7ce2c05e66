//! The mutation pipeline applying a submitted value to its record.

use thiserror::Error;

use crate::domain::field::FieldDefinition;
use crate::domain::record::Record;
use crate::domain::types::{RecordId, RecordTypeName};
use crate::editing::policy::VersioningPolicy;
use crate::editing::session::FieldEditSession;
use crate::editing::validate::{self, FieldError};
use crate::editing::widget::{WidgetInput, WidgetRegistry};
use crate::repository::errors::RepositoryError;
use crate::repository::{RecordReader, RecordWriter};

/// Result of one pipeline run.
#[derive(Clone, Debug, PartialEq)]
pub struct MutationOutcome {
    /// The mutated clone, saved or not; on validation failure it carries the
    /// submitted values for re-rendering the form.
    pub record: Record,
    pub valid: bool,
    /// Validation errors in the order the validator produced them.
    pub errors: Vec<FieldError>,
    pub saved: bool,
}

/// Failures that abort the pipeline before a result can be produced.
///
/// Validation failures are not among them; they are reported through
/// [`MutationOutcome`] so the caller can re-render the form.
#[derive(Debug, Error)]
pub enum MutationError {
    /// The record was deleted since the page was rendered.
    #[error("record {record_type}/{record_id} no longer exists")]
    RecordNotFound {
        record_type: RecordTypeName,
        record_id: RecordId,
    },
    /// The store failed while loading or persisting; fatal for this request.
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

/// Applies submitted input to the session's field.
///
/// The record is reloaded from the store first so the mutation is based on
/// the freshest state, not on whatever copy rendered the form. Persisting
/// only happens when validation passes; a store failure propagates untouched
/// so the caller can leave the session in edit mode for a retry.
pub fn apply<R, P>(
    repo: &R,
    widgets: &WidgetRegistry,
    policy: &P,
    session: &FieldEditSession,
    field: &FieldDefinition,
    input: &WidgetInput,
) -> Result<MutationOutcome, MutationError>
where
    R: RecordReader + RecordWriter + ?Sized,
    P: VersioningPolicy + ?Sized,
{
    let context = &session.context;

    let current = repo
        .get_record_by_id(&context.record_type, context.record_id)?
        .ok_or_else(|| MutationError::RecordNotFound {
            record_type: context.record_type.clone(),
            record_id: context.record_id,
        })?;

    let mut draft = current.clone();
    let candidate = widgets.parse(field, input);
    draft.set_value(field.name.clone(), candidate.clone());

    if policy.creates_new_revision(&draft) {
        draft.new_revision = true;
        if draft.revision_log.is_none() {
            draft.revision_log = Some(policy.audit_message(field));
        }
    }

    let errors = validate::validate_field(field, candidate.as_deref());
    if !errors.is_empty() {
        return Ok(MutationOutcome {
            record: draft,
            valid: false,
            errors,
            saved: false,
        });
    }

    let saved = repo.save_record(&draft)?;
    Ok(MutationOutcome {
        record: saved,
        valid: true,
        errors: Vec::new(),
        saved: true,
    })
}
