mod dedup;
mod session;
mod types;

pub use dedup::{Deduplicator, TurnIdentity, turn_identity};
pub use session::ObservationSession;
pub use types::{ConversationScan, CountedTurn, LatestTurn};
