//! Per-turn decision inputs and outputs.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ActorId, Card, Phase};

/// A betting action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    Raise,
    AllIn,
}

impl PlayerAction {
    /// How committal the action is, in [0, 1].
    #[must_use]
    pub fn aggression(self) -> f64 {
        match self {
            PlayerAction::Fold => 0.0,
            PlayerAction::Check => 0.2,
            PlayerAction::Call => 0.4,
            PlayerAction::Raise => 0.8,
            PlayerAction::AllIn => 1.0,
        }
    }

    #[must_use]
    pub fn is_aggressive(self) -> bool {
        matches!(self, PlayerAction::Raise | PlayerAction::AllIn)
    }
}

/// The engine's verdict for one turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: PlayerAction,
    /// Chips put in by this action (call amount, raise-to total, or
    /// the full stack for all-in). Zero for fold and check.
    pub amount: f64,
    /// Human-readable trace of why the action was chosen.
    pub rationale: String,
}

/// Read-only snapshot of the table state at one actor's turn.
///
/// The decision engine never mutates the context; the game-state owner
/// builds a fresh one per turn.
#[derive(Clone, Debug)]
pub struct DecisionContext {
    pub actor: ActorId,
    pub hole: SmallVec<[Card; 2]>,
    pub board: Vec<Card>,
    pub phase: Phase,
    pub pot: f64,
    /// Chips required to continue. Zero means check is available.
    pub to_call: f64,
    /// Chips behind, not counting `committed`.
    pub stack: f64,
    /// Chips this actor has already put into the pot this hand.
    pub committed: f64,
    pub opponent_count: usize,
    /// Raises already made this betting round.
    pub raises_this_round: u32,
    /// Seat position in [0, 1]; 1 acts last.
    pub position: f64,
    /// Net active force power from this actor's perspective.
    pub net_force_power: f64,
}

impl DecisionContext {
    /// Fraction of total chips already committed to the pot.
    #[must_use]
    pub fn commitment_ratio(&self) -> f64 {
        let total = self.stack + self.committed;
        if total <= 0.0 {
            1.0
        } else {
            self.committed / total
        }
    }

    /// Break-even equity for calling: `to_call / (pot + to_call)`.
    #[must_use]
    pub fn pot_odds(&self) -> f64 {
        if self.to_call <= 0.0 {
            0.0
        } else {
            self.to_call / (self.pot + self.to_call)
        }
    }
}
