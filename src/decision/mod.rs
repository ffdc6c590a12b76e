//! NPC turn decisions: utilities, softmax, behavior, skill policy.

pub mod behavior;
pub mod context;
pub mod engine;
pub mod lookup;
pub mod opponent;
pub mod skill_ai;
pub mod softmax;
pub mod stage;
pub mod utility;

pub use behavior::{BehaviorEvent, BehaviorFsm, BehaviorState};
pub use context::{Decision, DecisionContext, PlayerAction};
pub use engine::DecisionEngine;
pub use opponent::{OpponentBook, OpponentModel};
pub use skill_ai::SkillAi;
pub use softmax::softmax;
pub use stage::{StagePosture, StageScript};
pub use utility::UtilityTerms;
