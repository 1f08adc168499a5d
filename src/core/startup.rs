use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::core::config::Config;
use crate::core::state::AppState;
use crate::session::notifier::LogNotifier;
use crate::session::store::SessionStore;
use crate::storage::file::FileStore;
use crate::storage::kv::{KeyValueStore, MemoryStore};

// this runs at boot time
pub fn open_storage(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    match config.storage.backend.as_str() {
        "memory" => {
            info!("Using in-memory storage, nothing will survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        _ => {
            let store = FileStore::open(config.storage.path.clone()).context(format!(
                "Failed to open storage file '{}'",
                config.storage.path.display()
            ))?;
            info!(path = %store.path().display(), "File storage opened");
            Ok(Arc::new(store))
        }
    }
}

pub fn build_state(config: &Config) -> Result<AppState> {
    let storage = open_storage(config)?;
    let notifier = Arc::new(LogNotifier::new(config.notifications.permission));

    let session = SessionStore::open(storage, notifier, config.membership.clone())
        .context("Failed to restore session from storage")?;

    info!(
        registered_users = session.registry().len(),
        authenticated = session.is_authenticated(),
        "Session store ready"
    );

    Ok(AppState::new(session))
}
