//! Capability checks gating the edit affordances.
//!
//! Denial is never an error: callers omit the affected control entirely and
//! render the plain value instead.

use crate::domain::auth::AuthenticatedUser;
use crate::domain::field::FieldDefinition;
use crate::domain::record::Record;

/// Access decisions consulted before offering or accepting an edit.
pub trait AccessPolicy {
    /// May the viewer modify the record at all?
    fn can_update_record(&self, record: &Record) -> bool;

    /// May the viewer change this particular field?
    fn can_edit_field(&self, record: &Record, field: &FieldDefinition) -> bool;

    /// Does the viewer hold the in-place editing permission itself?
    fn can_use_inline_edit(&self) -> bool;

    /// Combined gate for rendering an edit trigger or accepting a submission.
    fn can_edit(&self, record: &Record, field: &FieldDefinition) -> bool {
        self.can_update_record(record)
            && self.can_edit_field(record, field)
            && self.can_use_inline_edit()
    }
}

/// Policy mapping the signed-in user's roles onto edit capabilities.
///
/// `fields` grants the in-place editing permission, `fields_editor` grants
/// record updates, and protected fields additionally require `fields_admin`.
pub struct RoleAccessPolicy<'a> {
    user: &'a AuthenticatedUser,
    access_role: &'a str,
    editor_role: &'a str,
    admin_role: &'a str,
}

impl<'a> RoleAccessPolicy<'a> {
    #[must_use]
    pub fn new(
        user: &'a AuthenticatedUser,
        access_role: &'a str,
        editor_role: &'a str,
        admin_role: &'a str,
    ) -> Self {
        Self {
            user,
            access_role,
            editor_role,
            admin_role,
        }
    }
}

impl AccessPolicy for RoleAccessPolicy<'_> {
    fn can_update_record(&self, _record: &Record) -> bool {
        self.user.has_role(self.editor_role) || self.user.has_role(self.admin_role)
    }

    fn can_edit_field(&self, _record: &Record, field: &FieldDefinition) -> bool {
        !field.protected || self.user.has_role(self.admin_role)
    }

    fn can_use_inline_edit(&self) -> bool {
        self.user.has_role(self.access_role)
    }
}
