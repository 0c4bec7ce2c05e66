//! Session-scoped key-value store for edit-mode flags and instance context.
//!
//! The store is the only state shared across the view/edit round trip of one
//! instance. It is scoped to a single logical page session per user and is
//! never shared between users.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::editing::key::SessionKey;
use crate::editing::session::SessionContext;

/// Errors raised by a session store backend.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("failed to read session state: {0}")]
    Read(String),
    #[error("failed to write session state: {0}")]
    Write(String),
}

/// Stored state of one session key.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionEntry {
    /// Edit-mode flag; `None` means no action touched this instance yet.
    pub edit_mode: Option<bool>,
    /// Context snapshot remembered at render time.
    pub context: Option<SessionContext>,
}

/// Partial update merged into a stored entry; `None` fields are left as is.
#[derive(Clone, Debug, Default)]
pub struct SessionPatch {
    pub edit_mode: Option<bool>,
    pub context: Option<SessionContext>,
}

impl SessionPatch {
    #[must_use]
    pub fn edit_mode(value: bool) -> Self {
        Self {
            edit_mode: Some(value),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn context(context: SessionContext) -> Self {
        Self {
            context: Some(context),
            ..Self::default()
        }
    }

    fn apply(self, entry: &mut SessionEntry) {
        if let Some(edit_mode) = self.edit_mode {
            entry.edit_mode = Some(edit_mode);
        }
        if let Some(context) = self.context {
            entry.context = Some(context);
        }
    }
}

/// Get/put/merge semantics over session keys.
///
/// Receivers take `&self`; implementations use interior mutability so stores
/// can be threaded through rendering code that only holds shared references.
pub trait EditSessionStore {
    fn get(&self, key: &SessionKey) -> Result<Option<SessionEntry>, SessionStoreError>;

    fn put(&self, key: &SessionKey, entry: SessionEntry) -> Result<(), SessionStoreError>;

    /// Merges a patch into the stored entry and returns the merged result.
    fn merge(&self, key: &SessionKey, patch: SessionPatch) -> Result<SessionEntry, SessionStoreError>;
}

/// In-memory store backing unit tests and single-request rendering.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RefCell<HashMap<String, SessionEntry>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EditSessionStore for MemorySessionStore {
    fn get(&self, key: &SessionKey) -> Result<Option<SessionEntry>, SessionStoreError> {
        Ok(self.entries.borrow().get(&key.storage_key()).cloned())
    }

    fn put(&self, key: &SessionKey, entry: SessionEntry) -> Result<(), SessionStoreError> {
        self.entries.borrow_mut().insert(key.storage_key(), entry);
        Ok(())
    }

    fn merge(&self, key: &SessionKey, patch: SessionPatch) -> Result<SessionEntry, SessionStoreError> {
        let mut entries = self.entries.borrow_mut();
        let entry = entries.entry(key.storage_key()).or_default();
        patch.apply(entry);
        Ok(entry.clone())
    }
}

#[cfg(feature = "server")]
pub use self::http::HttpSessionStore;

#[cfg(feature = "server")]
mod http {
    use std::collections::HashMap;

    use actix_session::Session;
    use serde::{Deserialize, Serialize};

    use super::{EditSessionStore, SessionEntry, SessionPatch, SessionStoreError};
    use crate::domain::types::PageToken;
    use crate::editing::key::SessionKey;

    /// Cookie-session key the page scope is stored under.
    const STATE_KEY: &str = "editable_fields.state";

    /// All session entries of one logical page, replaced wholesale when a
    /// fresh page (new token) is rendered.
    #[derive(Debug, Serialize, Deserialize)]
    struct PageScope {
        page: PageToken,
        entries: HashMap<String, SessionEntry>,
    }

    impl PageScope {
        fn empty(page: PageToken) -> Self {
            Self {
                page,
                entries: HashMap::new(),
            }
        }
    }

    /// Store persisting the page scope inside the user's cookie session.
    ///
    /// Flags survive partial rebuilds because partial-update actions echo the
    /// page token back; a full page load mints a new token and thereby drops
    /// every flag of the previous page.
    pub struct HttpSessionStore {
        session: Session,
        page: PageToken,
    }

    impl HttpSessionStore {
        /// Mints a token for a freshly rendered page and resets the scope.
        pub fn begin_page(session: &Session) -> Result<PageToken, SessionStoreError> {
            let page = PageToken::mint();
            session
                .insert(STATE_KEY, PageScope::empty(page))
                .map_err(|e| SessionStoreError::Write(e.to_string()))?;
            Ok(page)
        }

        /// Opens the store for a partial-update request carrying `page`.
        ///
        /// A token mismatch means the scope belongs to a different page; the
        /// stale scope is discarded rather than read through.
        pub fn open(session: Session, page: PageToken) -> Result<Self, SessionStoreError> {
            let scope = session
                .get::<PageScope>(STATE_KEY)
                .map_err(|e| SessionStoreError::Read(e.to_string()))?;
            if scope.as_ref().is_none_or(|s| s.page != page) {
                session
                    .insert(STATE_KEY, PageScope::empty(page))
                    .map_err(|e| SessionStoreError::Write(e.to_string()))?;
            }
            Ok(Self { session, page })
        }

        fn load(&self) -> Result<PageScope, SessionStoreError> {
            let scope = self
                .session
                .get::<PageScope>(STATE_KEY)
                .map_err(|e| SessionStoreError::Read(e.to_string()))?;
            Ok(scope.unwrap_or_else(|| PageScope::empty(self.page)))
        }

        fn save(&self, scope: &PageScope) -> Result<(), SessionStoreError> {
            self.session
                .insert(STATE_KEY, scope)
                .map_err(|e| SessionStoreError::Write(e.to_string()))
        }
    }

    impl EditSessionStore for HttpSessionStore {
        fn get(&self, key: &SessionKey) -> Result<Option<SessionEntry>, SessionStoreError> {
            Ok(self.load()?.entries.get(&key.storage_key()).cloned())
        }

        fn put(&self, key: &SessionKey, entry: SessionEntry) -> Result<(), SessionStoreError> {
            let mut scope = self.load()?;
            scope.entries.insert(key.storage_key(), entry);
            self.save(&scope)
        }

        fn merge(
            &self,
            key: &SessionKey,
            patch: SessionPatch,
        ) -> Result<SessionEntry, SessionStoreError> {
            let mut scope = self.load()?;
            let entry = scope.entries.entry(key.storage_key()).or_default();
            patch.apply(entry);
            let merged = entry.clone();
            self.save(&scope)?;
            Ok(merged)
        }
    }
}
