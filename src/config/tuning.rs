//! The versioned tuning table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current tuning table version. Loaded tables must match.
pub const TUNING_VERSION: u32 = 1;

/// Configuration validation failure.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The table was produced for a different engine version.
    #[error("tuning version mismatch: expected {expected}, got {got}")]
    VersionMismatch { expected: u32, got: u32 },

    /// A constant is outside its documented range.
    #[error("invalid tuning value for {field}: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    /// A table that must be non-empty was empty.
    #[error("empty tuning table: {0}")]
    EmptyTable(&'static str),
}

/// Mana pool parameters for one skill level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManaSpec {
    /// Pool capacity.
    pub max: f64,
    /// Mana restored at each round end.
    pub regen: f64,
}

/// Destiny style-bonus tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleTuning {
    /// Bonus weight per hand category (index = category rank 0-9).
    /// Rarer categories carry larger weights.
    pub category_weights: [f64; 10],
    /// Bonus when the next card leaves a four-flush on board.
    pub flush_draw_bonus: f64,
    /// Bonus when the next card leaves an open-ended straight draw.
    pub straight_draw_bonus: f64,
    /// Rolling history length for the monotony penalty.
    pub monotony_history: usize,
    /// Multiplicative decay applied per repeat of the same winning
    /// category within the history window.
    pub monotony_decay: f64,
    /// Raw fortune power below which the style bonus is not scaled up.
    pub power_floor: f64,
    /// Global style intensity multiplier.
    pub intensity: f64,
}

/// Force opposition and suppression tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OppositionTuning {
    /// Fractional suppression applied to an opposing passive force per
    /// tier of advantage held by an active-mode force.
    pub tier_gap_suppression: f64,
    /// Flat fractional reduction a void shield applies to forces
    /// targeting its owner.
    pub void_shield_reduction: f64,
    /// Flat fractional reduction a null field applies to all passive
    /// forces.
    pub null_field_reduction: f64,
    /// Null fields at this tier or stronger short-circuit selection to
    /// a uniform draw.
    pub dominant_null_tier: u8,
    /// Fraction of a curse's power retained when a reversal rewrites
    /// it into a fortune.
    pub reversal_retention: f64,
}

/// Synthetic universe score jitter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JitterTuning {
    /// Base score for universe winners.
    pub winner_base: f64,
    /// Symmetric jitter half-width around `winner_base`.
    pub winner_spread: f64,
    /// Base score for universe losers.
    pub loser_base: f64,
    /// Symmetric jitter half-width around `loser_base`.
    pub loser_spread: f64,
}

/// System backlash parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BacklashTuning {
    /// Initial backlash power when a pool is drained to zero.
    pub initial_power: f64,
    /// Multiplicative per-round decay.
    pub decay: f64,
    /// Backlash ends once power drops below this floor.
    pub expiry_floor: f64,
}

/// Monte Carlo sample counts and perception bias.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EquityTuning {
    /// Default postflop sample count.
    pub default_sims: usize,
    /// Preflop sample count (preflop variance is higher).
    pub preflop_sims: usize,
    /// Net force power scale inside the tanh.
    pub perception_scale: f64,
    /// Maximum perceived-equity shift.
    pub perception_gain: f64,
}

/// Per-tier decision weights and penalties.
///
/// Index 0 is tier 1 (strongest), index 2 is tier 3.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierTuning {
    /// Utility weights: hand strength, pot-odds edge, position,
    /// opponent model, force advantage, aggression bias.
    pub weights: [f64; 6],
    /// Softmax temperature. Lower is sharper.
    pub temperature: f64,
    /// All-in candidates are gated below this equity.
    pub allin_equity_floor: f64,
}

/// Decision engine structural tuning shared across tiers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionTuning {
    /// Per-tier weight vectors, temperatures, gates.
    pub tiers: [TierTuning; 3],
    /// Penalty per fraction of stack a call consumes.
    pub stack_commit_penalty: f64,
    /// Penalty for raising with equity below this threshold.
    pub weak_raise_equity: f64,
    /// Magnitude of the weak-hand-raise penalty.
    pub weak_raise_penalty: f64,
    /// Penalty per raise already made this round.
    pub escalation_penalty: f64,
    /// Penalty for shoving without the equity floor.
    pub allin_shortfall_penalty: f64,
    /// Penalty per unit of bet-to-pot ratio above 1.
    pub overbet_penalty: f64,
    /// Fast path: a call at most this fraction of the pot...
    pub fastpath_call_pot_ratio: f64,
    /// ...that consumes at least this fraction of the stack is called
    /// without scoring.
    pub fastpath_stack_ratio: f64,
}

/// Behavior state machine tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FsmTuning {
    /// Tilt duration in decay ticks, per tier (index 0 = tier 1).
    pub tilt_duration: [u32; 3],
    /// Chip ratio (stack / starting stack) at or below which the actor
    /// is cornered.
    pub cornered_ratio: f64,
    /// Chip ratio at or above which a cornered actor recovers.
    pub recovery_ratio: f64,
    /// Temperature shift while tilted.
    pub tilt_temperature_shift: f64,
    /// Aggression weight multiplier while hunting.
    pub hunting_aggression: f64,
    /// Hands observed before the opponent model contributes.
    pub opponent_min_hands: u32,
}

/// The complete versioned tuning table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TuningConfig {
    /// Table version; must equal [`TUNING_VERSION`].
    pub version: u32,
    pub style: StyleTuning,
    pub opposition: OppositionTuning,
    pub jitter: JitterTuning,
    pub backlash: BacklashTuning,
    pub equity: EquityTuning,
    pub decision: DecisionTuning,
    pub fsm: FsmTuning,
    /// Mana pool per skill level; index = level - 1.
    pub mana_levels: Vec<ManaSpec>,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            version: TUNING_VERSION,
            style: StyleTuning {
                // High card through royal flush.
                category_weights: [0.0, 0.5, 1.0, 2.0, 4.0, 5.0, 8.0, 14.0, 22.0, 30.0],
                flush_draw_bonus: 1.5,
                straight_draw_bonus: 1.0,
                monotony_history: 5,
                monotony_decay: 0.6,
                power_floor: 10.0,
                intensity: 1.0,
            },
            opposition: OppositionTuning {
                tier_gap_suppression: 0.25,
                void_shield_reduction: 0.35,
                null_field_reduction: 0.5,
                dominant_null_tier: 1,
                reversal_retention: 0.6,
            },
            jitter: JitterTuning {
                winner_base: 65.0,
                winner_spread: 10.0,
                loser_base: 30.0,
                loser_spread: 15.0,
            },
            backlash: BacklashTuning {
                initial_power: 30.0,
                decay: 0.5,
                expiry_floor: 5.0,
            },
            equity: EquityTuning {
                default_sims: 400,
                preflop_sims: 1200,
                perception_scale: 0.005,
                perception_gain: 0.3,
            },
            decision: DecisionTuning {
                tiers: [
                    TierTuning {
                        weights: [0.30, 0.20, 0.10, 0.15, 0.15, 0.10],
                        temperature: 0.35,
                        allin_equity_floor: 0.62,
                    },
                    TierTuning {
                        weights: [0.35, 0.25, 0.10, 0.05, 0.10, 0.15],
                        temperature: 0.70,
                        allin_equity_floor: 0.68,
                    },
                    TierTuning {
                        weights: [0.45, 0.20, 0.05, 0.0, 0.05, 0.25],
                        temperature: 1.20,
                        allin_equity_floor: 0.75,
                    },
                ],
                stack_commit_penalty: 0.8,
                weak_raise_equity: 0.35,
                weak_raise_penalty: 0.5,
                escalation_penalty: 0.25,
                allin_shortfall_penalty: 1.2,
                overbet_penalty: 0.3,
                fastpath_call_pot_ratio: 0.15,
                fastpath_stack_ratio: 0.8,
            },
            fsm: FsmTuning {
                tilt_duration: [2, 3, 5],
                cornered_ratio: 0.25,
                recovery_ratio: 0.6,
                tilt_temperature_shift: 0.5,
                hunting_aggression: 1.5,
                opponent_min_hands: 10,
            },
            mana_levels: vec![
                ManaSpec { max: 40.0, regen: 4.0 },
                ManaSpec { max: 55.0, regen: 5.0 },
                ManaSpec { max: 70.0, regen: 6.0 },
                ManaSpec { max: 85.0, regen: 8.0 },
                ManaSpec { max: 100.0, regen: 10.0 },
                ManaSpec { max: 120.0, regen: 12.0 },
                ManaSpec { max: 140.0, regen: 14.0 },
                ManaSpec { max: 160.0, regen: 17.0 },
                ManaSpec { max: 185.0, regen: 20.0 },
                ManaSpec { max: 220.0, regen: 25.0 },
            ],
        }
    }
}

impl TuningConfig {
    /// Validate the table, returning the first violation found.
    ///
    /// Intended to run once at load time; the engine assumes a
    /// validated table afterwards.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != TUNING_VERSION {
            return Err(ConfigError::VersionMismatch {
                expected: TUNING_VERSION,
                got: self.version,
            });
        }

        for &w in &self.style.category_weights {
            check_non_negative("style.category_weights", w)?;
        }
        check_unit("style.monotony_decay", self.style.monotony_decay)?;
        if self.style.monotony_history == 0 {
            return Err(ConfigError::OutOfRange {
                field: "style.monotony_history",
                value: 0.0,
            });
        }
        check_non_negative("style.intensity", self.style.intensity)?;

        check_unit("opposition.tier_gap_suppression", self.opposition.tier_gap_suppression)?;
        check_unit("opposition.void_shield_reduction", self.opposition.void_shield_reduction)?;
        check_unit("opposition.null_field_reduction", self.opposition.null_field_reduction)?;
        check_unit("opposition.reversal_retention", self.opposition.reversal_retention)?;

        check_non_negative("jitter.winner_spread", self.jitter.winner_spread)?;
        check_non_negative("jitter.loser_spread", self.jitter.loser_spread)?;

        check_unit("backlash.decay", self.backlash.decay)?;
        check_non_negative("backlash.initial_power", self.backlash.initial_power)?;

        if self.equity.default_sims == 0 || self.equity.preflop_sims == 0 {
            return Err(ConfigError::OutOfRange {
                field: "equity.sims",
                value: 0.0,
            });
        }

        for tier in &self.decision.tiers {
            for &w in &tier.weights {
                check_non_negative("decision.tiers.weights", w)?;
            }
            if !(tier.temperature.is_finite() && tier.temperature > 0.0) {
                return Err(ConfigError::OutOfRange {
                    field: "decision.tiers.temperature",
                    value: tier.temperature,
                });
            }
            check_unit("decision.tiers.allin_equity_floor", tier.allin_equity_floor)?;
        }

        check_unit("fsm.cornered_ratio", self.fsm.cornered_ratio)?;
        if self.fsm.recovery_ratio <= self.fsm.cornered_ratio {
            return Err(ConfigError::OutOfRange {
                field: "fsm.recovery_ratio",
                value: self.fsm.recovery_ratio,
            });
        }

        if self.mana_levels.is_empty() {
            return Err(ConfigError::EmptyTable("mana_levels"));
        }
        for spec in &self.mana_levels {
            if !(spec.max.is_finite() && spec.max > 0.0) {
                return Err(ConfigError::OutOfRange {
                    field: "mana_levels.max",
                    value: spec.max,
                });
            }
            check_non_negative("mana_levels.regen", spec.regen)?;
        }

        Ok(())
    }

    /// Mana pool spec for a skill level, clamping to the table edges.
    #[must_use]
    pub fn mana_for_level(&self, level: u8) -> ManaSpec {
        let idx = (level.max(1) as usize - 1).min(self.mana_levels.len() - 1);
        self.mana_levels[idx]
    }

    /// Tier tuning lookup; tiers are 1-based (1 = strongest).
    #[must_use]
    pub fn tier(&self, tier: u8) -> &TierTuning {
        let idx = (tier.clamp(1, 3) - 1) as usize;
        &self.decision.tiers[idx]
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

fn check_unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}
