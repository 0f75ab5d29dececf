use std::path::PathBuf;
use std::sync::Arc;

use water_db::{Db, KeyValueStore};

use crate::config::TrackerConfig;
use crate::error::{AppError, Result};
use crate::services::AppServices;

/// Paths and settings needed to run the local tracker.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub tracker: TrackerConfig,
}

/// Application state shared by frontends (HTTP, CLI).
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(db_path: PathBuf, tracker: TrackerConfig) -> Self {
        let config = AppConfig { db_path, tracker };
        let services = AppServices::new(&config);
        Self { config, services }
    }

    /// Same wiring as [`AppState::new`] but persisting through `backend`.
    pub fn with_backend(
        db_path: PathBuf,
        tracker: TrackerConfig,
        backend: Arc<dyn KeyValueStore>,
    ) -> Self {
        let config = AppConfig { db_path, tracker };
        let services = AppServices::with_backend(&config, backend);
        Self { config, services }
    }

    pub fn is_fresh_db(&self) -> bool {
        !self.config.db_path.exists()
    }

    pub fn setup_db(&self) -> Result<()> {
        setup_db(&self.config.db_path)
    }

    pub fn initialize(&self) -> Result<()> {
        self.config.tracker.validate()?;
        self.setup_db()
            .map_err(|err| AppError::Message(format!("initialize db: {}", err)))
    }
}

pub fn setup_db(path: &std::path::Path) -> Result<()> {
    let mut db = Db::open(path)?;
    db.migrate()?;
    Ok(())
}
