// Application state (AppState)

use crate::models::catalog::Catalog;
use crate::session::store::SessionStore;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared application state
///
/// Holds the one session every handler operates on. The mutex serializes
/// mutations so each operation sees and leaves a consistent session.
#[derive(Clone)]
pub struct AppState {
    /// Current session, registry and bookings
    pub session: Arc<Mutex<SessionStore>>,

    /// Plans, classes and time slots
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(session: SessionStore) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            catalog: Arc::new(Catalog::default()),
        }
    }

    /// Lock the session. A panic inside a previous handler does not leave the
    /// session half-written, so a poisoned lock is recovered.
    pub fn session(&self) -> MutexGuard<'_, SessionStore> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
