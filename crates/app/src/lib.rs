pub mod app;
pub mod config;
pub mod error;
pub mod notify;
pub mod services;
pub mod startup;
pub mod store;
pub mod util;

pub use app::{AppConfig, AppState};
pub use config::{CostModelKind, TrackerConfig};
pub use error::{ApiError, AppError, Result, StoreError};
pub use notify::{AggregateEvent, AggregateUpdate, Notifier};
pub use services::{
    AppServices, ConversationOutcome, MAX_SESSIONS, TrackerService, UsageService, UsageSummary,
};
pub use startup::{AppPaths, ensure_app_data_dir};
pub use store::{AggregationStore, STATE_KEY, STATE_NAMESPACE, StoreResult};
pub use util::time::resolve_date;
