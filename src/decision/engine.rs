//! The per-actor turn decision engine.
//!
//! Candidates are scored with a weighted utility blend, penalized for
//! structural mistakes, and sampled through a temperature-controlled
//! softmax. Skill tier picks the equity source: a lookup chart for
//! tier 3, Monte Carlo for tier 2, perception-biased Monte Carlo for
//! tier 1. Behavior state shifts the temperature per actor, and tier-1
//! actors additionally follow a chip-stage script.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::TuningConfig;
use crate::core::{ActorId, EngineRng};
use crate::equity::EquityEstimator;

use super::behavior::{BehaviorEvent, BehaviorFsm, BehaviorState};
use super::context::{Decision, DecisionContext, PlayerAction};
use super::lookup::rough_equity;
use super::opponent::OpponentBook;
use super::softmax::softmax;
use super::stage::StageScript;
use super::utility::{structural_penalty, terms_for};

/// One gated candidate action with its chip amount.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    action: PlayerAction,
    amount: f64,
}

/// The decision engine for every NPC at the table.
#[derive(Debug)]
pub struct DecisionEngine {
    cfg: TuningConfig,
    estimator: EquityEstimator,
    fsms: FxHashMap<ActorId, BehaviorFsm>,
    stages: FxHashMap<ActorId, StageScript>,
    opponents: OpponentBook,
}

impl DecisionEngine {
    #[must_use]
    pub fn new(cfg: TuningConfig) -> Self {
        let estimator = EquityEstimator::new(cfg.equity.clone());
        Self {
            cfg,
            estimator,
            fsms: FxHashMap::default(),
            stages: FxHashMap::default(),
            opponents: OpponentBook::new(),
        }
    }

    /// Decide one turn for an actor of the given skill tier.
    pub fn decide(
        &mut self,
        ctx: &DecisionContext,
        tier: u8,
        rng: &mut EngineRng,
    ) -> Decision {
        let tier = tier.clamp(1, 3);

        // Pot-committed fast path: the call is pocket change next to
        // the pot and the stack is already in the middle.
        if ctx.to_call > 0.0
            && ctx.to_call <= self.cfg.decision.fastpath_call_pot_ratio * ctx.pot
            && ctx.commitment_ratio() >= self.cfg.decision.fastpath_stack_ratio
        {
            return Decision {
                action: PlayerAction::Call,
                amount: ctx.to_call.min(ctx.stack),
                rationale: "pot-committed call".to_string(),
            };
        }

        let equity = self.equity_for(ctx, tier, rng);
        let candidates = self.build_candidates(ctx, tier, equity);

        let fsm_state = self.fsms.get(&ctx.actor).map(BehaviorFsm::state);
        let aggression_mult = self.aggression_multiplier(ctx.actor, tier);
        let opponent_signal = if tier <= 2 {
            self.opponents
                .field_signal(self.cfg.fsm.opponent_min_hands)
                .unwrap_or(0.5)
        } else {
            0.5
        };

        let tier_cfg = self.cfg.tier(tier);
        let utilities: Vec<f64> = candidates
            .iter()
            .map(|c| {
                let terms =
                    terms_for(c.action, ctx, equity, opponent_signal, aggression_mult);
                terms.weighted(&tier_cfg.weights)
                    - structural_penalty(
                        c.action,
                        c.amount,
                        ctx,
                        equity,
                        tier_cfg.allin_equity_floor,
                        &self.cfg.decision,
                    )
            })
            .collect();

        let temperature = self.temperature(ctx.actor, tier);
        let probs = softmax(&utilities, temperature);
        let pick = rng.choose_weighted(&probs).unwrap_or_else(|| {
            // Degenerate distribution: take the best candidate.
            utilities
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.total_cmp(b))
                .map_or(0, |(i, _)| i)
        });

        let chosen = candidates[pick];
        let rationale = rationale(chosen.action, equity, ctx, fsm_state);
        debug!(
            actor = ctx.actor.index(),
            tier,
            action = ?chosen.action,
            amount = chosen.amount,
            equity,
            temperature,
            "decision"
        );

        Decision { action: chosen.action, amount: chosen.amount, rationale }
    }

    /// Equity source by tier: chart, sampled, or perception-biased.
    fn equity_for(&self, ctx: &DecisionContext, tier: u8, rng: &mut EngineRng) -> f64 {
        match tier {
            3 => rough_equity(&ctx.hole, &ctx.board, ctx.opponent_count),
            2 => {
                let sims = self.sims_for(ctx);
                self.estimator
                    .estimate(&ctx.hole, &ctx.board, ctx.opponent_count, sims, rng)
                    .equity
            }
            _ => {
                let sims = self.sims_for(ctx);
                self.estimator
                    .estimate_with_magic(
                        &ctx.hole,
                        &ctx.board,
                        ctx.opponent_count,
                        sims,
                        ctx.net_force_power,
                        rng,
                    )
                    .perceived
            }
        }
    }

    fn sims_for(&self, ctx: &DecisionContext) -> usize {
        if ctx.board.is_empty() {
            self.cfg.equity.preflop_sims
        } else {
            0
        }
    }

    /// Gated candidate set: fold/check/call, three raise sizings,
    /// all-in behind its equity floor.
    fn build_candidates(
        &self,
        ctx: &DecisionContext,
        tier: u8,
        equity: f64,
    ) -> Vec<Candidate> {
        let mut candidates = Vec::with_capacity(6);

        if ctx.to_call > 0.0 {
            candidates.push(Candidate { action: PlayerAction::Fold, amount: 0.0 });
            candidates.push(Candidate {
                action: PlayerAction::Call,
                amount: ctx.to_call.min(ctx.stack),
            });
        } else {
            candidates.push(Candidate { action: PlayerAction::Check, amount: 0.0 });
        }

        if ctx.stack > ctx.to_call {
            for fraction in sizing_fractions(tier, equity) {
                let amount = ctx.to_call + fraction * ctx.pot.max(1.0);
                if amount > ctx.to_call && amount < ctx.stack {
                    candidates.push(Candidate { action: PlayerAction::Raise, amount });
                }
            }
        }

        // All-in is gated hard below the floor unless the actor is
        // already desperate.
        let floor = self.cfg.tier(tier).allin_equity_floor;
        let desperate = matches!(
            self.fsms.get(&ctx.actor).map(BehaviorFsm::state),
            Some(BehaviorState::Cornered)
        );
        if ctx.stack > 0.0 && (equity >= floor || desperate) {
            candidates.push(Candidate { action: PlayerAction::AllIn, amount: ctx.stack });
        }

        candidates
    }

    fn temperature(&self, actor: ActorId, tier: u8) -> f64 {
        let mut temperature = self.cfg.tier(tier).temperature;
        if let Some(fsm) = self.fsms.get(&actor) {
            temperature += fsm.temperature_shift(&self.cfg.fsm);
        }
        if tier == 1 {
            if let Some(stage) = self.stages.get(&actor) {
                temperature += stage.temperature_shift();
            }
        }
        temperature.max(0.05)
    }

    fn aggression_multiplier(&self, actor: ActorId, tier: u8) -> f64 {
        let mut mult = self
            .fsms
            .get(&actor)
            .map_or(1.0, |fsm| fsm.aggression_multiplier(&self.cfg.fsm));
        if tier == 1 {
            if let Some(stage) = self.stages.get(&actor) {
                mult *= stage.aggression_multiplier();
            }
        }
        mult
    }

    /// Feed a hand-result event into an actor's behavior machine.
    pub fn on_hand_result(&mut self, actor: ActorId, tier: u8, event: BehaviorEvent) {
        self.fsms
            .entry(actor)
            .or_insert_with(|| BehaviorFsm::new(tier))
            .on_event(event, &self.cfg.fsm);
    }

    /// Per-hand decay tick for every behavior machine.
    pub fn tick_hand(&mut self) {
        for fsm in self.fsms.values_mut() {
            fsm.tick();
        }
    }

    /// Current behavior state, if the actor has one.
    #[must_use]
    pub fn behavior_state(&self, actor: ActorId) -> Option<BehaviorState> {
        self.fsms.get(&actor).map(BehaviorFsm::state)
    }

    /// Update a tier-1 actor's stage script from its stack ratio.
    pub fn observe_stack_ratio(&mut self, actor: ActorId, ratio: f64) {
        self.stages.entry(actor).or_default().observe_stack_ratio(ratio);
    }

    /// Externally force the weakness posture on a tier-1 actor.
    pub fn trigger_weakness(&mut self, actor: ActorId) {
        self.stages.entry(actor).or_default().trigger_weakness();
    }

    pub fn clear_weakness(&mut self, actor: ActorId) {
        self.stages.entry(actor).or_default().clear_weakness();
    }

    /// Opponent statistics book, for the game loop to feed.
    pub fn opponents_mut(&mut self) -> &mut OpponentBook {
        &mut self.opponents
    }

    /// Forget all per-actor state at a session boundary.
    pub fn reset(&mut self) {
        self.fsms.clear();
        self.stages.clear();
        self.opponents.clear();
    }
}

/// Tier-specific bet sizing, as pot fractions.
///
/// Tier 1 polarizes and inverts: strong hands bet small to keep the
/// field in, weak hands bet big to push it out. Tier 2 sticks to fixed
/// ratios. Tier 3 leaks information by sizing linearly with strength.
fn sizing_fractions(tier: u8, equity: f64) -> [f64; 3] {
    match tier {
        1 => {
            if equity >= 0.6 {
                [0.35, 0.5, 0.7]
            } else {
                [0.9, 1.2, 1.6]
            }
        }
        2 => [0.5, 0.75, 1.0],
        _ => {
            let scale = 0.5 + equity;
            [0.3 * scale, 0.5 * scale, 0.7 * scale]
        }
    }
}

fn rationale(
    action: PlayerAction,
    equity: f64,
    ctx: &DecisionContext,
    state: Option<BehaviorState>,
) -> String {
    let mood = match state {
        Some(BehaviorState::Hunting) => " while hunting",
        Some(BehaviorState::Tilted { .. }) => " on tilt",
        Some(BehaviorState::Cornered) => " cornered",
        _ => "",
    };
    format!(
        "{action:?}: equity {equity:.2} vs pot odds {:.2}{mood}",
        ctx.pot_odds()
    )
}
