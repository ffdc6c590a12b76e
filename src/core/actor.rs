//! Actor identity, table snapshots, and betting phases.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::Card;

/// Actor identifier, stable for the lifetime of a session.
///
/// Seat indices are 0-based; the id carries no seating meaning beyond
/// what the roster assigns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u8);

impl ActorId {
    /// Create a new actor ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all actor IDs for a table with `count` seats.
    pub fn all(count: usize) -> impl Iterator<Item = ActorId> {
        (0..count as u8).map(ActorId)
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Actor {}", self.0)
    }
}

/// Betting phase of a hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Phase {
    /// Whether any community cards remain to be revealed.
    ///
    /// Deal-biasing skills are pointless on the river, so the economy
    /// skips them there.
    #[must_use]
    pub const fn cards_remain(self) -> bool {
        !matches!(self, Phase::River)
    }
}

/// A read-only per-actor snapshot used by universe generation.
///
/// Rebuilt by the session owner before each selection call; the engine
/// never stores it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActorState {
    /// Who this snapshot describes.
    pub id: ActorId,
    /// Hole cards; fewer than 2 means the actor cannot contest.
    pub hole: SmallVec<[Card; 2]>,
    /// Folded actors are excluded from universes and force collection.
    pub folded: bool,
    /// Remaining chips.
    pub stack: f64,
    /// Chips committed to the pot this hand.
    pub committed: f64,
}

impl ActorState {
    /// Create a snapshot with the given hole cards.
    #[must_use]
    pub fn new(id: ActorId, hole: impl IntoIterator<Item = Card>) -> Self {
        Self {
            id,
            hole: hole.into_iter().collect(),
            folded: false,
            stack: 0.0,
            committed: 0.0,
        }
    }

    /// Set stack and committed chips (builder pattern).
    #[must_use]
    pub fn with_chips(mut self, stack: f64, committed: f64) -> Self {
        self.stack = stack;
        self.committed = committed;
        self
    }

    /// Mark the actor folded (builder pattern).
    #[must_use]
    pub fn folded(mut self) -> Self {
        self.folded = true;
        self
    }

    /// Whether the actor participates in universe generation.
    #[must_use]
    pub fn contests(&self) -> bool {
        !self.folded && self.hole.len() >= 2
    }
}
