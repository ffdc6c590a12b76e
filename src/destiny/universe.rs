//! Universe generation.
//!
//! A universe is one hypothetical outcome for a single candidate next
//! card: the resulting hand per active actor, the winner set, and a
//! synthetic 0-100 score per actor. The score is a force-consumption
//! signal, not real equity - winners land around the configured winner
//! base, losers around the loser base, each with symmetric jitter.
//!
//! Universes are ephemeral: recomputed on every selection call, with
//! fresh jitter each time, and discarded after one pick.

use smallvec::SmallVec;

use crate::config::JitterTuning;
use crate::core::{evaluate_best, ActorId, ActorState, Card, EngineRng, HandCategory, HandRank};

/// One hypothetical outcome for one candidate card.
#[derive(Clone, Debug)]
pub struct Universe {
    /// The candidate next card.
    pub card: Card,
    /// Actors holding the best hand if this card falls.
    pub winners: SmallVec<[ActorId; 4]>,
    /// The winning hand's category, for style scoring.
    pub winning_category: HandCategory,
    /// Synthetic per-actor scores in 0-100.
    pub scores: Vec<(ActorId, f64)>,
    /// Destiny score; filled in by scoring.
    pub destiny: f64,
    /// Style bonus component of the destiny score.
    pub style_bonus: f64,
}

impl Universe {
    /// Look up an actor's synthetic score.
    #[must_use]
    pub fn score_of(&self, actor: ActorId) -> Option<f64> {
        self.scores.iter().find(|(id, _)| *id == actor).map(|(_, s)| *s)
    }
}

/// Simulate revealing `candidate` on top of `board`.
///
/// Returns `None` when no actor produces an evaluable hand - the
/// caller falls back to a uniform draw rather than failing.
pub fn generate_universe(
    candidate: Card,
    board: &[Card],
    actors: &[ActorState],
    jitter: &JitterTuning,
    rng: &mut EngineRng,
) -> Option<Universe> {
    let mut ranked: SmallVec<[(ActorId, HandRank); 8]> = SmallVec::new();
    let mut cards: SmallVec<[Card; 7]> = SmallVec::new();

    for actor in actors.iter().filter(|a| a.contests()) {
        cards.clear();
        cards.extend_from_slice(&actor.hole);
        cards.extend_from_slice(board);
        cards.push(candidate);

        // Evaluation failures skip the actor, never the universe.
        if let Ok(rank) = evaluate_best(&cards) {
            ranked.push((actor.id, rank));
        }
    }

    if ranked.is_empty() {
        return None;
    }

    let best = ranked.iter().map(|(_, r)| *r).max()?;
    let winners: SmallVec<[ActorId; 4]> = ranked
        .iter()
        .filter(|(_, r)| *r == best)
        .map(|(id, _)| *id)
        .collect();

    let scores = ranked
        .iter()
        .map(|(id, rank)| {
            let won = *rank == best;
            let (base, spread) = if won {
                (jitter.winner_base, jitter.winner_spread)
            } else {
                (jitter.loser_base, jitter.loser_spread)
            };
            let noise = if spread > 0.0 {
                rng.gen_range_f64(-spread..spread)
            } else {
                0.0
            };
            (*id, (base + noise).clamp(0.0, 100.0))
        })
        .collect();

    Some(Universe {
        card: candidate,
        winners,
        winning_category: best.category,
        scores,
        destiny: 0.0,
        style_bonus: 0.0,
    })
}
