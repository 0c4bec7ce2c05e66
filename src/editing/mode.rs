//! The view/edit state machine over a session store.

use crate::domain::display::DisplayConfig;
use crate::editing::key::SessionKey;
use crate::editing::session::{EditMode, SessionContext};
use crate::editing::store::{EditSessionStore, SessionPatch, SessionStoreError};

/// Reads and transitions the edit-mode flag of field instances.
///
/// The controller never touches the record store; transitions only flip the
/// flag and leave rebuilding the sub-tree to the render layer. All operations
/// are idempotent within one rebuild cycle.
pub struct ModeController<'a, S: EditSessionStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: EditSessionStore + ?Sized> ModeController<'a, S> {
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Active mode of the instance.
    ///
    /// Instances with click-to-edit disabled are always in edit mode; others
    /// follow the stored flag and default to view mode.
    pub fn mode(
        &self,
        key: &SessionKey,
        display: &DisplayConfig,
    ) -> Result<EditMode, SessionStoreError> {
        if !display.click_to_edit {
            return Ok(EditMode::Edit);
        }
        let stored = self
            .store
            .get(key)?
            .and_then(|entry| entry.edit_mode)
            .unwrap_or(false);
        Ok(if stored { EditMode::Edit } else { EditMode::View })
    }

    /// Stores the flag for the instance, regardless of its prior state.
    pub fn set_mode(&self, key: &SessionKey, mode: EditMode) -> Result<(), SessionStoreError> {
        self.store
            .merge(key, SessionPatch::edit_mode(mode.is_edit()))?;
        Ok(())
    }

    /// Remembers the context snapshot needed to rebuild the instance on a
    /// later partial update.
    pub fn remember(
        &self,
        key: &SessionKey,
        context: SessionContext,
    ) -> Result<(), SessionStoreError> {
        self.store.merge(key, SessionPatch::context(context))?;
        Ok(())
    }

    /// Context snapshot stored for the instance, if any.
    pub fn context(&self, key: &SessionKey) -> Result<Option<SessionContext>, SessionStoreError> {
        Ok(self.store.get(key)?.and_then(|entry| entry.context))
    }
}
