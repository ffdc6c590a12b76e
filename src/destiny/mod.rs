//! Fate-weighted dealing: opposition, universes, scoring, selection.

pub mod engine;
pub mod opposition;
pub mod scoring;
pub mod universe;

pub use engine::{
    DestinyEngine, FallbackReason, ForceSummary, Foresight, ForesightCandidate, SelectOptions,
    Selection, SelectionMeta, SelectionMode,
};
pub use opposition::{has_dominant_null, resolve_force_opposition};
pub use scoring::{score_universe, Contribution, StyleHistory};
pub use universe::{generate_universe, Universe};
