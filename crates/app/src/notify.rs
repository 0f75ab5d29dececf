use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;
use water_core::{AggregateState, UsageEntry};

/// Summary carried by an update event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateUpdate {
    pub entry: UsageEntry,
    /// Total for the entry's day after the update.
    pub day_total_ml: f64,
    /// Entries for the entry's day still in the history.
    pub day_turns: usize,
    pub state: AggregateState,
}

impl AggregateUpdate {
    pub fn new(entry: UsageEntry, state: AggregateState) -> Self {
        let day_total_ml = state
            .daily_totals
            .get(&entry.date_key)
            .copied()
            .unwrap_or(0.0);
        let day_turns = state
            .history
            .iter()
            .filter(|item| item.date_key == entry.date_key)
            .count();
        Self {
            entry,
            day_total_ml,
            day_turns,
            state,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AggregateEvent {
    Updated(AggregateUpdate),
    Reset,
}

/// Best-effort fan-out of aggregate events. Publishing never blocks and
/// never fails; receivers that fall behind lose the oldest events.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<AggregateEvent>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AggregateEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: AggregateEvent) {
        match self.sender.send(event) {
            Ok(receivers) => debug!(receivers, "published aggregate event"),
            Err(_) => debug!("no listeners for aggregate event"),
        }
    }
}
