//! Service layer driving the editing core on behalf of the routes.

use crate::domain::auth::AuthenticatedUser;
use crate::domain::display::DisplayConfig;
use crate::domain::field::FieldDefinition;
use crate::domain::types::{RecordTypeName, ViewModeId};
use crate::editing::access::RoleAccessPolicy;
use crate::repository::DisplayConfigReader;
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE, SERVICE_EDITOR_ROLE};

pub mod errors;
pub mod field;
pub mod main;
pub mod record;
pub mod settings;

pub use errors::{ServiceError, ServiceResult};

/// True when `roles` contains `role`.
#[must_use]
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}

/// Rejects users lacking `role` with [`ServiceError::Unauthorized`].
pub fn ensure_role(user: &AuthenticatedUser, role: &str) -> ServiceResult<()> {
    if check_role(role, &user.roles) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Capability policy for the signed-in user over the service roles.
#[must_use]
pub fn access_policy(user: &AuthenticatedUser) -> RoleAccessPolicy<'_> {
    RoleAccessPolicy::new(
        user,
        SERVICE_ACCESS_ROLE,
        SERVICE_EDITOR_ROLE,
        SERVICE_ADMIN_ROLE,
    )
}

/// Display configuration of one field in a view mode: the stored row when
/// one exists, the field kind's defaults otherwise.
pub(crate) fn display_for<R>(
    repo: &R,
    record_type: &RecordTypeName,
    field: &FieldDefinition,
    view_mode: &ViewModeId,
) -> ServiceResult<DisplayConfig>
where
    R: DisplayConfigReader + ?Sized,
{
    let stored = repo.get_display_config(record_type, &field.name, view_mode)?;
    Ok(stored.map_or_else(|| DisplayConfig::for_kind(field.kind), |row| row.config))
}
