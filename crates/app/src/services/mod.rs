mod tracker;
mod usage;

use std::sync::Arc;

use water_db::{KeyValueStore, SqliteStore};

use crate::app::AppConfig;
use crate::notify::Notifier;
use crate::store::AggregationStore;

pub use tracker::{ConversationOutcome, MAX_SESSIONS, TrackerService};
pub use usage::{UsageService, UsageSummary};

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub usage: UsageService,
    pub tracker: TrackerService,
    store: Arc<AggregationStore>,
}

impl AppServices {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_backend(config, Arc::new(SqliteStore::new(&config.db_path)))
    }

    pub fn with_backend(config: &AppConfig, backend: Arc<dyn KeyValueStore>) -> Self {
        let notifier = Notifier::new(config.tracker.event_capacity);
        let store = Arc::new(AggregationStore::new(
            backend,
            config.tracker.max_history,
            notifier,
        ));
        Self {
            usage: UsageService::new(store.clone()),
            tracker: TrackerService::new(store.clone(), &config.tracker),
            store,
        }
    }

    pub fn store(&self) -> &Arc<AggregationStore> {
        &self.store
    }
}
