//! Top-tier stage script.
//!
//! Instead of emotional swings, the strongest tier plays a scripted
//! arc over its remaining-stack ratio: dominant while ahead, standard
//! in the middle, desperate when short. An external "weakness"
//! override lets the presentation layer force the desperate posture
//! regardless of chips.

use serde::{Deserialize, Serialize};

/// Chip-stage postures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StagePosture {
    /// Comfortably ahead; patient, applies pressure selectively.
    Dominant,
    Standard,
    /// Short; takes thinner edges and higher variance.
    Desperate,
}

const DOMINANT_RATIO: f64 = 1.5;
const DESPERATE_RATIO: f64 = 0.4;

/// Stack-ratio-driven posture tracker for tier-1 actors.
#[derive(Clone, Debug)]
pub struct StageScript {
    posture: StagePosture,
    weakness_override: bool,
}

impl Default for StageScript {
    fn default() -> Self {
        Self::new()
    }
}

impl StageScript {
    #[must_use]
    pub fn new() -> Self {
        Self { posture: StagePosture::Standard, weakness_override: false }
    }

    /// Update the posture from current stack over starting stack.
    pub fn observe_stack_ratio(&mut self, ratio: f64) {
        self.posture = if ratio >= DOMINANT_RATIO {
            StagePosture::Dominant
        } else if ratio <= DESPERATE_RATIO {
            StagePosture::Desperate
        } else {
            StagePosture::Standard
        };
    }

    /// Force the desperate posture until cleared.
    pub fn trigger_weakness(&mut self) {
        self.weakness_override = true;
    }

    pub fn clear_weakness(&mut self) {
        self.weakness_override = false;
    }

    #[must_use]
    pub fn posture(&self) -> StagePosture {
        if self.weakness_override {
            StagePosture::Desperate
        } else {
            self.posture
        }
    }

    /// Additive softmax temperature shift for the current posture.
    ///
    /// Dominant play is deliberate; desperate play is erratic.
    #[must_use]
    pub fn temperature_shift(&self) -> f64 {
        match self.posture() {
            StagePosture::Dominant => -0.1,
            StagePosture::Standard => 0.0,
            StagePosture::Desperate => 0.3,
        }
    }

    /// Multiplier applied to the aggression utility term.
    #[must_use]
    pub fn aggression_multiplier(&self) -> f64 {
        match self.posture() {
            StagePosture::Dominant => 1.2,
            StagePosture::Standard => 1.0,
            StagePosture::Desperate => 1.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posture_tracks_stack_ratio() {
        let mut script = StageScript::new();
        assert_eq!(script.posture(), StagePosture::Standard);

        script.observe_stack_ratio(2.0);
        assert_eq!(script.posture(), StagePosture::Dominant);

        script.observe_stack_ratio(0.3);
        assert_eq!(script.posture(), StagePosture::Desperate);

        script.observe_stack_ratio(1.0);
        assert_eq!(script.posture(), StagePosture::Standard);
    }

    #[test]
    fn test_weakness_override_masks_posture() {
        let mut script = StageScript::new();
        script.observe_stack_ratio(2.0);
        script.trigger_weakness();
        assert_eq!(script.posture(), StagePosture::Desperate);

        script.clear_weakness();
        assert_eq!(script.posture(), StagePosture::Dominant);
    }

    #[test]
    fn test_desperate_runs_hotter() {
        let mut script = StageScript::new();
        script.observe_stack_ratio(0.2);
        assert!(script.temperature_shift() > 0.0);
        assert!(script.aggression_multiplier() > 1.0);
    }
}
