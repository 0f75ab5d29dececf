use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{NaiveDate, Utc};
use tokio::sync::broadcast;
use tracing::{info, warn};
use water_core::{AggregateState, UsageEntry};
use water_db::KeyValueStore;

use crate::error::StoreError;
use crate::notify::{AggregateEvent, AggregateUpdate, Notifier};

pub const STATE_NAMESPACE: &str = "water_usage";
pub const STATE_KEY: &str = "state";

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Owner of the persisted [`AggregateState`].
///
/// Every mutation runs read, apply, write and publish while holding one
/// write lock, so concurrent callers never lose each other's updates and
/// events leave in commit order. Readers skip the lock; the state is stored
/// as a single value, so they see a committed snapshot or nothing new.
pub struct AggregationStore {
    backend: Arc<dyn KeyValueStore>,
    max_history: usize,
    notifier: Notifier,
    write_lock: Mutex<()>,
    last_known: RwLock<Snapshot>,
}

// `generation` counts commits; a read only refreshes the cache when no
// commit landed while it was loading.
#[derive(Default)]
struct Snapshot {
    generation: u64,
    state: Option<AggregateState>,
}

impl AggregationStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, max_history: usize, notifier: Notifier) -> Self {
        Self {
            backend,
            max_history,
            notifier,
            write_lock: Mutex::new(()),
            last_known: RwLock::new(Snapshot::default()),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AggregateEvent> {
        self.notifier.subscribe()
    }

    pub fn record_usage(&self, entry: UsageEntry) -> StoreResult<AggregateState> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut state = self.load()?;
        state.apply(entry.clone(), self.max_history, Utc::now().timestamp_millis());
        self.save(&state)?;
        self.commit(&state);
        info!(
            date_key = %entry.date_key,
            water_usage_ml = entry.water_usage_ml,
            lifetime_total_ml = state.lifetime_total_ml,
            "recorded usage"
        );
        self.notifier
            .publish(AggregateEvent::Updated(AggregateUpdate::new(entry, state.clone())));
        Ok(state)
    }

    pub fn get_state(&self) -> StoreResult<AggregateState> {
        let seen = self.generation();
        let state = self.load()?;
        let mut snapshot = self
            .last_known
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if snapshot.generation == seen {
            snapshot.state = Some(state.clone());
        }
        Ok(state)
    }

    /// Drops history and totals. Irreversible.
    pub fn reset(&self) -> StoreResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.backend
            .delete(STATE_NAMESPACE, STATE_KEY)
            .map_err(StoreError::Write)?;
        self.commit(&AggregateState::default());
        info!("usage data reset");
        self.notifier.publish(AggregateEvent::Reset);
        Ok(())
    }

    pub fn weekly_total(&self, as_of: NaiveDate) -> StoreResult<f64> {
        Ok(self.get_state()?.weekly_total(as_of))
    }

    /// Last snapshot successfully read or written by this store.
    pub fn last_known_state(&self) -> Option<AggregateState> {
        self.last_known
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .state
            .clone()
    }

    fn generation(&self) -> u64 {
        self.last_known
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    fn load(&self) -> StoreResult<AggregateState> {
        let raw = self
            .backend
            .get(STATE_NAMESPACE, STATE_KEY)
            .map_err(|err| {
                warn!(error = %err, "failed to read usage state");
                StoreError::Read(err)
            })?;
        match raw {
            Some(raw) => serde_json::from_str(&raw).map_err(StoreError::Corrupt),
            None => Ok(AggregateState::default()),
        }
    }

    fn save(&self, state: &AggregateState) -> StoreResult<()> {
        let raw = serde_json::to_string(state).map_err(StoreError::Encode)?;
        self.backend
            .put(STATE_NAMESPACE, STATE_KEY, &raw)
            .map_err(|err| {
                warn!(error = %err, "failed to write usage state");
                StoreError::Write(err)
            })
    }

    fn commit(&self, state: &AggregateState) {
        let mut snapshot = self
            .last_known
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        snapshot.generation += 1;
        snapshot.state = Some(state.clone());
    }
}
