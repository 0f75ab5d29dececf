use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;
use water_core::{AggregateState, UsageEntry};

use crate::error::Result;
use crate::store::AggregationStore;

/// Figures shown by the popup for one reference day.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageSummary {
    pub date: NaiveDate,
    pub today_ml: f64,
    pub week_ml: f64,
    pub lifetime_ml: f64,
    pub prompts_today: usize,
    /// Newest first.
    pub recent: Vec<UsageEntry>,
    pub last_updated_at: Option<i64>,
    /// Set when storage could not be read and the last committed snapshot
    /// was used instead.
    pub stale: bool,
}

impl UsageSummary {
    fn from_state(state: &AggregateState, date: NaiveDate, recent_limit: usize, stale: bool) -> Self {
        Self {
            date,
            today_ml: state.day_total(date),
            week_ml: state.weekly_total(date),
            lifetime_ml: state.lifetime_total_ml,
            prompts_today: state.turns_on(date),
            recent: state.recent(recent_limit),
            last_updated_at: state.last_updated_at,
            stale,
        }
    }
}

#[derive(Clone)]
pub struct UsageService {
    store: Arc<AggregationStore>,
}

impl UsageService {
    pub(super) fn new(store: Arc<AggregationStore>) -> Self {
        Self { store }
    }

    pub fn state(&self) -> Result<AggregateState> {
        Ok(self.store.get_state()?)
    }

    pub fn weekly_total(&self, as_of: NaiveDate) -> Result<f64> {
        Ok(self.store.weekly_total(as_of)?)
    }

    pub fn summary(&self, date: NaiveDate, recent_limit: usize) -> Result<UsageSummary> {
        match self.store.get_state() {
            Ok(state) => Ok(UsageSummary::from_state(&state, date, recent_limit, false)),
            Err(err) => match self.store.last_known_state() {
                Some(state) => {
                    warn!(error = %err, "serving last committed usage snapshot");
                    Ok(UsageSummary::from_state(&state, date, recent_limit, true))
                }
                None => Err(err.into()),
            },
        }
    }

    pub fn reset(&self) -> Result<()> {
        Ok(self.store.reset()?)
    }
}
