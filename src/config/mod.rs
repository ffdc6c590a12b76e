//! Engine tuning configuration.
//!
//! Every floating-point tuning constant lives here - style weights,
//! suppression ratios, jitter ranges, softmax temperatures, utility
//! weight vectors, penalties, the mana table, backlash parameters.
//! The table is versioned and validated once at load time so a bad
//! constant fails loudly instead of skewing a thousand simulations.

mod tuning;

pub use tuning::{
    BacklashTuning, ConfigError, DecisionTuning, EquityTuning, FsmTuning, JitterTuning,
    ManaSpec, OppositionTuning, StyleTuning, TierTuning, TuningConfig, TUNING_VERSION,
};
