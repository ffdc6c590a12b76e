//! Core primitives: cards, actors, phases, RNG, hand evaluation.
//!
//! Everything above this module (the force economy, the destiny
//! engine, the decision engine) builds on these types; nothing here
//! depends on them.

pub mod actor;
pub mod card;
pub mod eval;
pub mod rng;

pub use actor::{ActorId, ActorState, Phase};
pub use card::{Card, RANK_COUNT, SUIT_COUNT};
pub use eval::{evaluate_best, evaluate_five, EvalError, HandCategory, HandRank};
pub use rng::EngineRng;
