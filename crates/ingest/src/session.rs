use chrono::{DateTime, Local};
use tracing::debug;
use water_core::{Estimate, EstimateMode, Estimator, TurnObservation, UsageEntry, char_count};

use crate::dedup::{Deduplicator, TurnIdentity, turn_identity};
use crate::types::{ConversationScan, CountedTurn, LatestTurn};

/// Observation state for one page: turns the watcher reports are estimated
/// and gated so each one is counted once.
#[derive(Debug)]
pub struct ObservationSession {
    estimator: Estimator,
    mode: EstimateMode,
    dedup: Deduplicator,
}

impl ObservationSession {
    pub fn new(estimator: Estimator, mode: EstimateMode) -> Self {
        Self {
            estimator,
            mode,
            dedup: Deduplicator::new(),
        }
    }

    /// Returns the entry to record, or `None` when the turn is empty or was
    /// already counted in this session.
    pub fn observe(&mut self, turn: &TurnObservation) -> Option<CountedTurn> {
        if turn.is_empty() {
            return None;
        }
        let estimate = self
            .estimator
            .estimate_turn(&turn.prompt_text, &turn.response_text, self.mode);
        self.count(turn, &estimate)
    }

    /// Scans every prompt/response pair rendered on the page. Pairs are
    /// matched by position up to the shorter of the two lists.
    pub fn observe_conversation(
        &mut self,
        prompts: &[String],
        responses: &[String],
        observed_at: DateTime<Local>,
    ) -> ConversationScan {
        let turn_count = prompts.len().min(responses.len());
        let mut scan = ConversationScan {
            turn_count,
            ..ConversationScan::default()
        };
        for (ordinal, (prompt, response)) in prompts.iter().zip(responses).enumerate() {
            let turn =
                TurnObservation::new(ordinal, prompt.as_str(), response.as_str(), observed_at);
            if turn.is_empty() {
                continue;
            }
            let estimate = self.estimator.estimate_turn(prompt, response, self.mode);
            scan.conversation_total_ml += estimate.water_usage_ml;
            if let Some(counted) = self.count(&turn, &estimate) {
                scan.counted.push(counted);
            }
        }
        if let (Some(prompt), Some(response)) = (prompts.last(), responses.last()) {
            scan.latest = Some(LatestTurn {
                prompt: prompt.clone(),
                response: response.clone(),
            });
        }
        scan
    }

    /// Un-counts a turn whose entry could not be recorded, so a later
    /// observation of the same turn is counted again.
    pub fn release(&mut self, identity: &TurnIdentity) {
        if self.dedup.forget(identity) {
            debug!(ordinal = identity.ordinal, "released turn for recount");
        }
    }

    fn count(&mut self, turn: &TurnObservation, estimate: &Estimate) -> Option<CountedTurn> {
        let identity = turn_identity(turn.ordinal, &turn.prompt_text, &turn.response_text);
        if !self.dedup.should_count(&identity) {
            debug!(ordinal = turn.ordinal, "skipping already counted turn");
            return None;
        }
        let entry = UsageEntry::from_estimate(
            &turn.observed_at,
            char_count(&turn.prompt_text),
            estimate,
        );
        Some(CountedTurn { identity, entry })
    }
}
