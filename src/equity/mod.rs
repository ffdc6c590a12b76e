//! Monte Carlo equity estimation.
//!
//! `EquityEstimator` answers one question: given hole cards, a partial
//! board, and an opponent count, how often does this hand win or tie
//! by showdown? Each trial completes the board and deals opponent hole
//! cards from the remaining deck via a partial shuffle sized to
//! exactly the cards the trial needs, so cost scales with cards drawn
//! rather than deck size.
//!
//! Trials whose hand evaluation fails are skipped and excluded from
//! the denominator - estimation never aborts on a bad trial.

use smallvec::SmallVec;

use crate::config::EquityTuning;
use crate::core::{evaluate_best, Card, EngineRng};

/// Outcome of an equity estimation run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EquityResult {
    /// `(wins + 0.5 * ties) / valid_trials`, in [0, 1].
    pub equity: f64,
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
    /// Trials that produced an evaluable showdown.
    pub valid_trials: u32,
}

impl EquityResult {
    fn from_counts(wins: u32, ties: u32, losses: u32) -> Self {
        let valid = wins + ties + losses;
        let equity = if valid == 0 {
            0.5
        } else {
            (wins as f64 + 0.5 * ties as f64) / valid as f64
        };
        Self { equity, wins, ties, losses, valid_trials: valid }
    }
}

/// Physical plus force-perceived equity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerceivedEquity {
    /// The raw Monte Carlo result.
    pub physical: EquityResult,
    /// Physical equity shifted by net force power, clamped to [0, 1].
    pub perceived: f64,
}

/// Monte Carlo win/tie/loss estimator.
#[derive(Clone, Debug)]
pub struct EquityEstimator {
    cfg: EquityTuning,
}

impl EquityEstimator {
    /// Create an estimator with the given tuning.
    #[must_use]
    pub fn new(cfg: EquityTuning) -> Self {
        Self { cfg }
    }

    /// Estimate showdown equity over `sim_count` trials.
    ///
    /// `board` may hold 0-5 revealed community cards. Passing
    /// `sim_count = 0` falls back to the configured default.
    pub fn estimate(
        &self,
        hole: &[Card],
        board: &[Card],
        opponent_count: usize,
        sim_count: usize,
        rng: &mut EngineRng,
    ) -> EquityResult {
        let sims = if sim_count == 0 { self.cfg.default_sims } else { sim_count };
        let board_needed = 5usize.saturating_sub(board.len());
        let needed = board_needed + 2 * opponent_count;

        let mut remaining = remaining_deck(hole, board);
        if remaining.len() < needed {
            // Degenerate input; nothing sensible to simulate.
            return EquityResult::from_counts(0, 0, 0);
        }

        let mut wins = 0;
        let mut ties = 0;
        let mut losses = 0;

        let mut hero_cards: SmallVec<[Card; 7]> = SmallVec::new();
        let mut opp_cards: SmallVec<[Card; 7]> = SmallVec::new();

        for _ in 0..sims {
            rng.partial_shuffle(&mut remaining, needed);
            let (runout, dealt) = remaining[..needed].split_at(board_needed);

            hero_cards.clear();
            hero_cards.extend_from_slice(hole);
            hero_cards.extend_from_slice(board);
            hero_cards.extend_from_slice(runout);

            let hero = match evaluate_best(&hero_cards) {
                Ok(rank) => rank,
                Err(_) => continue,
            };

            let mut beaten = false;
            let mut tied = false;
            let mut evaluable = true;

            for opp in dealt.chunks_exact(2) {
                opp_cards.clear();
                opp_cards.extend_from_slice(opp);
                opp_cards.extend_from_slice(board);
                opp_cards.extend_from_slice(runout);

                match evaluate_best(&opp_cards) {
                    Ok(rank) if rank > hero => {
                        beaten = true;
                        break;
                    }
                    Ok(rank) if rank == hero => tied = true,
                    Ok(_) => {}
                    Err(_) => {
                        evaluable = false;
                        break;
                    }
                }
            }

            if !evaluable {
                continue;
            }
            if beaten {
                losses += 1;
            } else if tied {
                ties += 1;
            } else {
                wins += 1;
            }
        }

        EquityResult::from_counts(wins, ties, losses)
    }

    /// Estimate equity and the force-perceived variant.
    ///
    /// The perceived shift is deliberately bounded:
    /// `tanh(net_force_power * scale) * gain` can never push perceived
    /// equity outside the unit interval after clamping.
    pub fn estimate_with_magic(
        &self,
        hole: &[Card],
        board: &[Card],
        opponent_count: usize,
        sim_count: usize,
        net_force_power: f64,
        rng: &mut EngineRng,
    ) -> PerceivedEquity {
        let physical = self.estimate(hole, board, opponent_count, sim_count, rng);
        let shift = (net_force_power * self.cfg.perception_scale).tanh() * self.cfg.perception_gain;
        PerceivedEquity {
            physical,
            perceived: (physical.equity + shift).clamp(0.0, 1.0),
        }
    }

    /// Preflop estimate with the larger configured sample count.
    pub fn estimate_preflop(
        &self,
        hole: &[Card],
        opponent_count: usize,
        rng: &mut EngineRng,
    ) -> EquityResult {
        self.estimate(hole, &[], opponent_count, self.cfg.preflop_sims, rng)
    }
}

/// Full deck minus the cards already visible to the hero.
fn remaining_deck(hole: &[Card], board: &[Card]) -> Vec<Card> {
    Card::full_deck()
        .into_iter()
        .filter(|c| !hole.contains(c) && !board.contains(c))
        .collect()
}
