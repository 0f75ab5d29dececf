use serde::Serialize;
use water_core::UsageEntry;

use crate::dedup::TurnIdentity;

/// A turn that passed the deduplication gate, with the entry to record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountedTurn {
    pub identity: TurnIdentity,
    pub entry: UsageEntry,
}

/// Most recent prompt/response pair seen on the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatestTurn {
    pub prompt: String,
    pub response: String,
}

/// Result of scanning a whole rendered conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversationScan {
    /// Turns counted for the first time during this scan, in page order.
    pub counted: Vec<CountedTurn>,
    /// Number of complete prompt/response pairs on the page.
    pub turn_count: usize,
    /// Estimated cost of every pair on the page, counted or not.
    pub conversation_total_ml: f64,
    pub latest: Option<LatestTurn>,
}
