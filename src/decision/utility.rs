//! Candidate-action utility terms and structural penalties.

use crate::config::DecisionTuning;

use super::context::{DecisionContext, PlayerAction};

/// The six utility terms, each roughly in [-1, 1].
///
/// Weighted per tier: hand strength, pot-odds edge, position, opponent
/// model, force advantage, aggression bias - in that order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UtilityTerms {
    pub hand_strength: f64,
    pub pot_odds_edge: f64,
    pub position: f64,
    pub opponent_signal: f64,
    pub force_advantage: f64,
    pub aggression: f64,
}

impl UtilityTerms {
    /// Weighted sum against a tier's weight vector.
    #[must_use]
    pub fn weighted(&self, weights: &[f64; 6]) -> f64 {
        self.hand_strength * weights[0]
            + self.pot_odds_edge * weights[1]
            + self.position * weights[2]
            + self.opponent_signal * weights[3]
            + self.force_advantage * weights[4]
            + self.aggression * weights[5]
    }
}

/// Build the term vector for one candidate action.
///
/// `opponent_signal` is the modeled exploitability of the field (0.5
/// neutral), `aggression_multiplier` comes from the behavior state.
#[must_use]
pub fn terms_for(
    action: PlayerAction,
    ctx: &DecisionContext,
    equity: f64,
    opponent_signal: f64,
    aggression_multiplier: f64,
) -> UtilityTerms {
    let pot_odds = ctx.pot_odds();

    let hand_strength = match action {
        PlayerAction::Fold => 1.0 - equity,
        PlayerAction::Check => 0.5,
        _ => equity,
    };

    // Folding with a price edge is the mirror of continuing with one.
    let edge = equity - pot_odds;
    let pot_odds_edge = match action {
        PlayerAction::Fold => -edge,
        PlayerAction::Check => 0.0,
        _ => edge,
    };

    let position = if action.is_aggressive() { ctx.position } else { 0.0 };

    // An exploitable field rewards pressure, a tough one rewards
    // caution.
    let opponent_signal = match action {
        PlayerAction::Raise | PlayerAction::AllIn => opponent_signal - 0.5,
        PlayerAction::Fold => 0.5 - opponent_signal,
        _ => 0.0,
    };

    let force_advantage = if action.is_aggressive() || action == PlayerAction::Call {
        (ctx.net_force_power * 0.01).tanh()
    } else {
        -(ctx.net_force_power * 0.01).tanh()
    };

    UtilityTerms {
        hand_strength,
        pot_odds_edge,
        position,
        opponent_signal,
        force_advantage,
        aggression: action.aggression() * aggression_multiplier,
    }
}

/// Structural penalties applied after the weighted blend.
#[must_use]
pub fn structural_penalty(
    action: PlayerAction,
    amount: f64,
    ctx: &DecisionContext,
    equity: f64,
    allin_equity_floor: f64,
    cfg: &DecisionTuning,
) -> f64 {
    let mut penalty = 0.0;
    let pot_odds = ctx.pot_odds();

    // Stack commitment, relieved when the price is right.
    if matches!(action, PlayerAction::Call | PlayerAction::Raise) && ctx.stack > 0.0 {
        let consumed = (amount / ctx.stack).clamp(0.0, 1.0);
        let relief = if equity > pot_odds { 0.5 } else { 1.0 };
        penalty += cfg.stack_commit_penalty * consumed * relief;
    }

    if action.is_aggressive() && equity < cfg.weak_raise_equity {
        penalty += cfg.weak_raise_penalty * (cfg.weak_raise_equity - equity)
            / cfg.weak_raise_equity;
    }

    if action == PlayerAction::Raise {
        penalty += cfg.escalation_penalty * f64::from(ctx.raises_this_round);

        if ctx.pot > 0.0 {
            let ratio = amount / ctx.pot;
            if ratio > 1.0 {
                penalty += cfg.overbet_penalty * (ratio - 1.0);
            }
        }
    }

    if action == PlayerAction::AllIn && equity < allin_equity_floor {
        penalty += cfg.allin_shortfall_penalty * (allin_equity_floor - equity);
    }

    penalty
}
