use std::collections::HashSet;
use std::fmt::Write;

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Content-derived identity of a conversational turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TurnIdentity {
    pub ordinal: usize,
    pub digest: String,
}

pub fn turn_identity(ordinal: usize, prompt: &str, response: &str) -> TurnIdentity {
    TurnIdentity {
        ordinal,
        digest: hash_turn(prompt, response),
    }
}

/// Remembers which turns were already counted during one page session.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<TurnIdentity>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` only the first time `identity` is offered.
    pub fn should_count(&mut self, identity: &TurnIdentity) -> bool {
        if self.seen.contains(identity) {
            return false;
        }
        self.seen.insert(identity.clone())
    }

    /// Drops an identity so the turn counts again when next observed.
    pub fn forget(&mut self, identity: &TurnIdentity) -> bool {
        self.seen.remove(identity)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(&mut out, "{:02x}", byte);
    }
    out
}

// Length prefix keeps ("ab", "c") and ("a", "bc") apart.
fn hash_turn(prompt: &str, response: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update((prompt.len() as u64).to_le_bytes());
    hasher.update(prompt.as_bytes());
    hasher.update(response.as_bytes());
    hex_digest(&hasher.finalize())
}
