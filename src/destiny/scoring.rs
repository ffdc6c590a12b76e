//! Destiny scoring.
//!
//! Each universe is scored by how well it serves the active forces:
//! fortunes pay out proportionally to their owner's synthetic score,
//! curses and backlash proportionally to how badly their target fares.
//! A style bonus rewards rarer winning categories and live draws, a
//! monotony penalty decays repeats of the same winning category, and
//! the whole bonus scales with the strongest raw fortune power.

use std::collections::VecDeque;

use crate::config::StyleTuning;
use crate::core::{ActorId, Card, HandCategory};
use crate::force::{Force, ForceKind};

use super::universe::Universe;

/// One force's contribution to a universe's destiny score.
#[derive(Clone, Debug, PartialEq)]
pub struct Contribution {
    pub owner: ActorId,
    pub kind: ForceKind,
    pub amount: f64,
}

/// Rolling history of winning categories.
///
/// Damps the style bonus when the same category keeps winning, so the
/// deal does not settle into one dramatic groove.
#[derive(Clone, Debug, Default)]
pub struct StyleHistory {
    recent: VecDeque<HandCategory>,
}

impl StyleHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a winning category.
    pub fn record(&mut self, category: HandCategory, capacity: usize) {
        self.recent.push_back(category);
        while self.recent.len() > capacity {
            self.recent.pop_front();
        }
    }

    /// Multiplicative damp factor for a category: `decay^repeats`.
    #[must_use]
    pub fn monotony_factor(&self, category: HandCategory, decay: f64) -> f64 {
        let repeats = self.recent.iter().filter(|&&c| c == category).count() as u32;
        decay.powi(repeats as i32)
    }

    /// Clear the history.
    pub fn clear(&mut self) {
        self.recent.clear();
    }
}

/// Score one universe against the resolved forces.
///
/// `raw_forces` are the pre-opposition forces; the style bonus scales
/// with the strongest raw fortune so a heavily-opposed fortune still
/// wants a dramatic reveal. Returns the contributions for the meta
/// breakdown.
pub fn score_universe(
    universe: &mut Universe,
    resolved: &[Force],
    raw_forces: &[Force],
    board: &[Card],
    cfg: &StyleTuning,
    history: &StyleHistory,
    intensity: f64,
) -> Vec<Contribution> {
    let mut destiny = 0.0;
    let mut contributions = Vec::new();

    for force in resolved {
        if force.power <= 0.0 {
            continue;
        }
        let amount = match force.kind {
            ForceKind::Fortune => universe
                .score_of(force.owner)
                .map(|score| force.power * score / 100.0),
            ForceKind::Curse | ForceKind::Backlash => force
                .target
                .and_then(|t| universe.score_of(t))
                .map(|score| force.power * (1.0 - score / 100.0)),
            _ => None,
        };
        if let Some(amount) = amount {
            destiny += amount;
            contributions.push(Contribution {
                owner: force.owner,
                kind: force.kind,
                amount,
            });
        }
    }

    // Style bonus follows the strongest raw fortune's beneficiary.
    let strongest = raw_forces
        .iter()
        .filter(|f| f.kind == ForceKind::Fortune)
        .max_by(|a, b| a.power.total_cmp(&b.power));

    let style_bonus = match strongest {
        Some(fortune) if universe.winners.contains(&fortune.owner) => {
            let category = universe.winning_category;
            let mut bonus = cfg.category_weights[category.rank()]
                * history.monotony_factor(category, cfg.monotony_decay);
            bonus += draw_potential_bonus(board, universe.card, cfg);
            bonus * (fortune.power.max(cfg.power_floor) / 100.0) * intensity
        }
        _ => 0.0,
    };

    universe.destiny = destiny + style_bonus;
    universe.style_bonus = style_bonus;
    contributions
}

/// Bonus for reveals that leave a live draw on board.
///
/// Only meaningful while more cards are coming (board under 4 cards
/// after this reveal would still see a river).
fn draw_potential_bonus(board: &[Card], candidate: Card, cfg: &StyleTuning) -> f64 {
    if board.len() + 1 >= 5 {
        return 0.0;
    }

    let mut bonus = 0.0;

    // Four to a flush across board + candidate.
    let mut suit_counts = [0u8; 4];
    for card in board.iter().chain(std::iter::once(&candidate)) {
        suit_counts[card.suit() as usize] += 1;
    }
    if suit_counts.iter().any(|&c| c >= 4) {
        bonus += cfg.flush_draw_bonus;
    }

    // Four consecutive distinct ranks (ace high or low).
    let mut ranks: Vec<u8> = board
        .iter()
        .chain(std::iter::once(&candidate))
        .map(|c| c.high_rank())
        .collect();
    if ranks.contains(&14) {
        ranks.push(1);
    }
    ranks.sort_unstable();
    ranks.dedup();
    let mut run = 1;
    let mut best_run = 1;
    for pair in ranks.windows(2) {
        if pair[1] == pair[0] + 1 {
            run += 1;
            best_run = best_run.max(run);
        } else {
            run = 1;
        }
    }
    if best_run >= 4 {
        bonus += cfg.straight_draw_bonus;
    }

    bonus
}
