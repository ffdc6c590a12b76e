//! Per-opponent frequency statistics.
//!
//! Counts voluntary entries, raises, aggressive actions, and folds to
//! bets. The model stays silent until enough hands are observed, then
//! contributes an exploitability signal to the opponent utility term.
//! Only the two strongest tiers consult it.

use rustc_hash::FxHashMap;

use crate::core::ActorId;

/// Frequency statistics for one observed opponent.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpponentModel {
    hands: u32,
    voluntary_entries: u32,
    raises: u32,
    aggressive_actions: u32,
    total_actions: u32,
    bets_faced: u32,
    folds_to_bet: u32,
}

impl OpponentModel {
    /// Record one completed hand and whether the opponent entered the
    /// pot voluntarily.
    pub fn record_hand(&mut self, voluntary_entry: bool) {
        self.hands += 1;
        if voluntary_entry {
            self.voluntary_entries += 1;
        }
    }

    /// Record one in-hand action.
    pub fn record_action(&mut self, raised: bool, aggressive: bool) {
        self.total_actions += 1;
        if raised {
            self.raises += 1;
        }
        if aggressive {
            self.aggressive_actions += 1;
        }
    }

    /// Record a response to a bet.
    pub fn record_bet_faced(&mut self, folded: bool) {
        self.bets_faced += 1;
        if folded {
            self.folds_to_bet += 1;
        }
    }

    #[must_use]
    pub fn hands_observed(&self) -> u32 {
        self.hands
    }

    /// Voluntary pot entry rate.
    #[must_use]
    pub fn vpip(&self) -> f64 {
        rate(self.voluntary_entries, self.hands)
    }

    #[must_use]
    pub fn raise_rate(&self) -> f64 {
        rate(self.raises, self.total_actions)
    }

    #[must_use]
    pub fn aggression_frequency(&self) -> f64 {
        rate(self.aggressive_actions, self.total_actions)
    }

    #[must_use]
    pub fn fold_to_bet_rate(&self) -> f64 {
        rate(self.folds_to_bet, self.bets_faced)
    }

    /// Exploitability signal in [0, 1], 0.5 neutral.
    ///
    /// `None` until `min_hands` hands are observed. High values mean
    /// the opponent folds too much or plays too passively - pressure
    /// profits. Low values mean a loose aggressor - value bets profit,
    /// bluffs do not.
    #[must_use]
    pub fn signal(&self, min_hands: u32) -> Option<f64> {
        if self.hands < min_hands {
            return None;
        }
        let fold_component = self.fold_to_bet_rate() - 0.5;
        let passivity = 0.5 - self.aggression_frequency();
        let looseness = self.vpip() - 0.5;
        Some((0.5 + 0.4 * fold_component + 0.3 * passivity + 0.2 * looseness).clamp(0.0, 1.0))
    }
}

fn rate(count: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(count) / f64::from(total)
    }
}

/// Statistics over every opponent at the table.
#[derive(Clone, Debug, Default)]
pub struct OpponentBook {
    models: FxHashMap<ActorId, OpponentModel>,
}

impl OpponentBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model_mut(&mut self, actor: ActorId) -> &mut OpponentModel {
        self.models.entry(actor).or_default()
    }

    #[must_use]
    pub fn model(&self, actor: ActorId) -> Option<&OpponentModel> {
        self.models.get(&actor)
    }

    /// Average signal over every opponent with enough observed hands.
    /// `None` when no opponent qualifies yet.
    #[must_use]
    pub fn field_signal(&self, min_hands: u32) -> Option<f64> {
        let signals: Vec<f64> = self
            .models
            .values()
            .filter_map(|m| m.signal(min_hands))
            .collect();
        if signals.is_empty() {
            None
        } else {
            Some(signals.iter().sum::<f64>() / signals.len() as f64)
        }
    }

    /// Forget everything, at a session boundary.
    pub fn clear(&mut self) {
        self.models.clear();
    }
}
