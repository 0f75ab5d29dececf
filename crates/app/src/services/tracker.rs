use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local};
use ingest::{CountedTurn, LatestTurn, ObservationSession};
use tracing::debug;
use water_core::{Estimate, EstimateMode, Estimator, TurnObservation, UsageEntry};

use crate::config::TrackerConfig;
use crate::error::{AppError, Result};
use crate::store::AggregationStore;

/// Open page sessions kept before the least recently used one is dropped.
pub const MAX_SESSIONS: usize = 64;

/// Outcome of scanning the whole rendered conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationOutcome {
    pub recorded: Vec<UsageEntry>,
    pub turn_count: usize,
    pub conversation_total_ml: f64,
    pub latest: Option<LatestTurn>,
}

#[derive(Debug)]
struct PageSession {
    session: ObservationSession,
    last_used: u64,
}

#[derive(Debug, Default)]
struct SessionTable {
    pages: HashMap<String, PageSession>,
    tick: u64,
}

impl SessionTable {
    fn get_or_open(
        &mut self,
        id: &str,
        estimator: Estimator,
        mode: EstimateMode,
    ) -> &mut ObservationSession {
        self.tick += 1;
        let tick = self.tick;
        if !self.pages.contains_key(id) {
            if self.pages.len() >= MAX_SESSIONS {
                self.evict_oldest();
            }
            debug!(session_id = id, "opened page session");
        }
        let page = self
            .pages
            .entry(id.to_string())
            .or_insert_with(|| PageSession {
                session: ObservationSession::new(estimator, mode),
                last_used: tick,
            });
        page.last_used = tick;
        &mut page.session
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .pages
            .iter()
            .min_by_key(|(_, page)| page.last_used)
            .map(|(id, _)| id.clone());
        if let Some(id) = oldest {
            debug!(session_id = %id, "evicted idle page session");
            self.pages.remove(&id);
        }
    }
}

/// Entry point for page watchers: turns are estimated, deduplicated per page
/// session and recorded into the aggregate.
#[derive(Clone)]
pub struct TrackerService {
    store: Arc<AggregationStore>,
    estimator: Estimator,
    mode: EstimateMode,
    sessions: Arc<Mutex<SessionTable>>,
}

impl TrackerService {
    pub(super) fn new(store: Arc<AggregationStore>, config: &TrackerConfig) -> Self {
        Self {
            store,
            estimator: config.estimator(),
            mode: config.estimate_mode,
            sessions: Arc::new(Mutex::new(SessionTable::default())),
        }
    }

    fn with_session<T>(&self, id: &str, f: impl FnOnce(&mut ObservationSession) -> T) -> T {
        let mut table = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        f(table.get_or_open(id, self.estimator, self.mode))
    }

    /// Records the turn unless this page session already counted it.
    pub fn on_turn_observed(
        &self,
        session_id: &str,
        ordinal: usize,
        prompt: &str,
        response: &str,
    ) -> Result<Option<UsageEntry>> {
        self.observe(
            session_id,
            TurnObservation::new(ordinal, prompt, response, Local::now()),
        )
    }

    pub fn observe(&self, session_id: &str, turn: TurnObservation) -> Result<Option<UsageEntry>> {
        let session_id = session_key(session_id)?;
        let counted = self.with_session(session_id, |session| session.observe(&turn));
        match counted {
            Some(counted) => {
                let recorded = self.record_all(session_id, vec![counted])?;
                Ok(recorded.into_iter().next())
            }
            None => Ok(None),
        }
    }

    pub fn on_conversation_observed(
        &self,
        session_id: &str,
        prompts: &[String],
        responses: &[String],
    ) -> Result<ConversationOutcome> {
        self.observe_conversation(session_id, prompts, responses, Local::now())
    }

    pub fn observe_conversation(
        &self,
        session_id: &str,
        prompts: &[String],
        responses: &[String],
        observed_at: DateTime<Local>,
    ) -> Result<ConversationOutcome> {
        let session_id = session_key(session_id)?;
        let scan = self.with_session(session_id, |session| {
            session.observe_conversation(prompts, responses, observed_at)
        });
        let recorded = self.record_all(session_id, scan.counted)?;
        Ok(ConversationOutcome {
            recorded,
            turn_count: scan.turn_count,
            conversation_total_ml: scan.conversation_total_ml,
            latest: scan.latest,
        })
    }

    /// Live estimate for text that has not been submitted yet.
    pub fn preview(&self, text: &str) -> Estimate {
        self.estimator.estimate(text)
    }

    /// Drops one page's session, as after that page reloads; its turns count
    /// again. Other pages are unaffected. Returns whether the session existed.
    pub fn reset_session(&self, session_id: &str) -> Result<bool> {
        let session_id = session_key(session_id)?;
        let mut table = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(table.pages.remove(session_id).is_some())
    }

    // A failed write releases the failed turn and every turn after it, so
    // the next observation retries them instead of treating them as seen.
    fn record_all(&self, session_id: &str, counted: Vec<CountedTurn>) -> Result<Vec<UsageEntry>> {
        let mut recorded = Vec::with_capacity(counted.len());
        let mut pending = counted.into_iter();
        while let Some(turn) = pending.next() {
            if let Err(err) = self.store.record_usage(turn.entry.clone()) {
                let mut table = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(page) = table.pages.get_mut(session_id) {
                    page.session.release(&turn.identity);
                    for rest in pending.by_ref() {
                        page.session.release(&rest.identity);
                    }
                }
                return Err(err.into());
            }
            recorded.push(turn.entry);
        }
        Ok(recorded)
    }
}

fn session_key(session_id: &str) -> Result<&str> {
    let trimmed = session_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("session_id is required".to_string()));
    }
    Ok(trimmed)
}
