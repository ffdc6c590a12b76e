//! # fateweave
//!
//! A fate-weighted dealing and NPC decision engine for magic-infused
//! hold'em. The deck is honest until someone bends it: actors spend
//! mana on skills that enqueue directional forces, opposing forces
//! cancel rather than amplify, and the surviving net bias steers which
//! card the deck surrenders next.
//!
//! ## Design Principles
//!
//! 1. **Deterministic Under Seed**: every source of randomness flows
//!    through an injectable [`core::EngineRng`]; identical seeds
//!    reproduce identical sessions.
//!
//! 2. **Single-Owner State**: mana pools, cooldowns, pending forces,
//!    and behavior machines live in explicit context objects mutated
//!    only through documented operations. No globals, no locking.
//!
//! 3. **Selection Never Fails**: while the deck is non-empty, every
//!    degenerate path (no forces, dominant null, no evaluable
//!    universe) collapses to a uniform draw.
//!
//! ## Modules
//!
//! - `core`: cards, hand evaluation, actors, seedable RNG
//! - `config`: the versioned, load-time-validated tuning table
//! - `equity`: Monte Carlo showdown equity estimation
//! - `force`: skill catalog, mana economy, force lifecycle, events
//! - `destiny`: force opposition, universe scoring, card selection
//! - `decision`: NPC turn decisions, behavior FSM, skill policy

pub mod config;
pub mod core;
pub mod decision;
pub mod destiny;
pub mod equity;
pub mod force;

pub use crate::core::{
    evaluate_best, evaluate_five, ActorId, ActorState, Card, EngineRng, EvalError, HandCategory,
    HandRank, Phase,
};

pub use crate::config::{ConfigError, TuningConfig, TUNING_VERSION};

pub use crate::equity::{EquityEstimator, EquityResult, PerceivedEquity};

pub use crate::force::{
    ActivationError, ActivationMode, ActorConfig, Attribute, EngineEvent, Force, ForceEconomy,
    ForceKind, SkillCatalog, SkillKey, SkillPolicy, TableActor, TableContext,
};

pub use crate::destiny::{
    DestinyEngine, FallbackReason, Foresight, SelectOptions, Selection, SelectionMode,
};

pub use crate::decision::{
    BehaviorEvent, BehaviorFsm, BehaviorState, Decision, DecisionContext, DecisionEngine,
    PlayerAction, SkillAi, StagePosture, StageScript,
};
