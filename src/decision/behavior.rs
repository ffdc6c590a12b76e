//! Per-actor behavior state machine.
//!
//! Emotional state modulates the softmax temperature and the
//! aggression utility term. The reachable state set shrinks with
//! weaker tiers: tier 3 only ever tilts, tier 2 also hunts, tier 1
//! additionally recognizes being cornered.

use serde::{Deserialize, Serialize};

use crate::config::FsmTuning;

/// Behavior states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorState {
    Baseline,
    /// Riding a big win; presses harder.
    Hunting,
    /// Recovering from a bad beat for `remaining` decay ticks.
    Tilted { remaining: u32 },
    /// Short-stacked survival mode.
    Cornered,
}

/// Hand-result events that drive transitions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BehaviorEvent {
    BigWin,
    BadBeat,
    /// Current stack over starting stack.
    ChipRatio(f64),
}

/// One actor's behavior machine.
#[derive(Clone, Debug)]
pub struct BehaviorFsm {
    tier: u8,
    state: BehaviorState,
}

impl BehaviorFsm {
    /// Create a machine for an actor of the given skill tier (1-3).
    #[must_use]
    pub fn new(tier: u8) -> Self {
        Self { tier: tier.clamp(1, 3), state: BehaviorState::Baseline }
    }

    #[must_use]
    pub fn state(&self) -> BehaviorState {
        self.state
    }

    /// Apply a hand-result event.
    pub fn on_event(&mut self, event: BehaviorEvent, cfg: &FsmTuning) {
        match event {
            BehaviorEvent::BigWin => {
                // Hunting needs tier 2 or better; a cornered actor
                // stays cornered until the chip ratio says otherwise.
                if self.tier <= 2 && self.state != BehaviorState::Cornered {
                    self.state = BehaviorState::Hunting;
                }
            }
            BehaviorEvent::BadBeat => {
                if self.state != BehaviorState::Cornered {
                    let duration = cfg.tilt_duration[(self.tier - 1) as usize];
                    self.state = BehaviorState::Tilted { remaining: duration };
                }
            }
            BehaviorEvent::ChipRatio(ratio) => {
                if self.tier == 1 {
                    if ratio <= cfg.cornered_ratio {
                        self.state = BehaviorState::Cornered;
                    } else if self.state == BehaviorState::Cornered
                        && ratio >= cfg.recovery_ratio
                    {
                        self.state = BehaviorState::Baseline;
                    }
                }
            }
        }
    }

    /// One decay tick, applied per hand.
    pub fn tick(&mut self) {
        match self.state {
            BehaviorState::Tilted { remaining } if remaining > 1 => {
                self.state = BehaviorState::Tilted { remaining: remaining - 1 };
            }
            BehaviorState::Tilted { .. } | BehaviorState::Hunting => {
                self.state = BehaviorState::Baseline;
            }
            _ => {}
        }
    }

    /// Additive softmax temperature shift for the current state.
    #[must_use]
    pub fn temperature_shift(&self, cfg: &FsmTuning) -> f64 {
        match self.state {
            BehaviorState::Tilted { .. } => cfg.tilt_temperature_shift,
            _ => 0.0,
        }
    }

    /// Multiplier applied to the aggression utility term.
    #[must_use]
    pub fn aggression_multiplier(&self, cfg: &FsmTuning) -> f64 {
        match self.state {
            BehaviorState::Hunting => cfg.hunting_aggression,
            BehaviorState::Cornered => 0.5,
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TuningConfig;

    fn cfg() -> FsmTuning {
        TuningConfig::default().fsm
    }

    #[test]
    fn test_bad_beat_tilts_then_decays_home() {
        let cfg = cfg();
        let mut fsm = BehaviorFsm::new(2);

        fsm.on_event(BehaviorEvent::BadBeat, &cfg);
        let duration = cfg.tilt_duration[1];
        assert_eq!(fsm.state(), BehaviorState::Tilted { remaining: duration });

        for _ in 0..duration {
            assert_ne!(fsm.state(), BehaviorState::Baseline);
            fsm.tick();
        }
        assert_eq!(fsm.state(), BehaviorState::Baseline);
    }

    #[test]
    fn test_tier_three_cannot_hunt() {
        let cfg = cfg();
        let mut weak = BehaviorFsm::new(3);
        weak.on_event(BehaviorEvent::BigWin, &cfg);
        assert_eq!(weak.state(), BehaviorState::Baseline);

        let mut mid = BehaviorFsm::new(2);
        mid.on_event(BehaviorEvent::BigWin, &cfg);
        assert_eq!(mid.state(), BehaviorState::Hunting);
    }

    #[test]
    fn test_only_tier_one_gets_cornered() {
        let cfg = cfg();
        let mut top = BehaviorFsm::new(1);
        top.on_event(BehaviorEvent::ChipRatio(0.1), &cfg);
        assert_eq!(top.state(), BehaviorState::Cornered);

        let mut mid = BehaviorFsm::new(2);
        mid.on_event(BehaviorEvent::ChipRatio(0.1), &cfg);
        assert_eq!(mid.state(), BehaviorState::Baseline);
    }

    #[test]
    fn test_cornered_recovers_above_threshold() {
        let cfg = cfg();
        let mut fsm = BehaviorFsm::new(1);
        fsm.on_event(BehaviorEvent::ChipRatio(0.2), &cfg);
        assert_eq!(fsm.state(), BehaviorState::Cornered);

        // Between the thresholds: stays cornered.
        fsm.on_event(BehaviorEvent::ChipRatio(0.4), &cfg);
        assert_eq!(fsm.state(), BehaviorState::Cornered);

        fsm.on_event(BehaviorEvent::ChipRatio(0.7), &cfg);
        assert_eq!(fsm.state(), BehaviorState::Baseline);
    }

    #[test]
    fn test_cornered_ignores_emotional_events() {
        let cfg = cfg();
        let mut fsm = BehaviorFsm::new(1);
        fsm.on_event(BehaviorEvent::ChipRatio(0.1), &cfg);

        fsm.on_event(BehaviorEvent::BigWin, &cfg);
        assert_eq!(fsm.state(), BehaviorState::Cornered);
        fsm.on_event(BehaviorEvent::BadBeat, &cfg);
        assert_eq!(fsm.state(), BehaviorState::Cornered);
    }

    #[test]
    fn test_tilt_shifts_temperature() {
        let cfg = cfg();
        let mut fsm = BehaviorFsm::new(2);
        assert_eq!(fsm.temperature_shift(&cfg), 0.0);
        fsm.on_event(BehaviorEvent::BadBeat, &cfg);
        assert_eq!(fsm.temperature_shift(&cfg), cfg.tilt_temperature_shift);
    }
}
