//! The force economy: skills, mana, forces, and their lifecycle.

pub mod catalog;
pub mod economy;
pub mod events;
#[allow(clippy::module_inception)]
pub mod force;
pub mod skill;

pub use catalog::{SkillCatalog, SkillKey, SkillSpec};
pub use economy::{
    ActivationError, ActorConfig, ForceEconomy, NpcActivation, SkillPolicy, TableActor,
    TableContext,
};
pub use events::{EngineEvent, EventQueue, PerceptionEvent};
pub use force::{ActivationMode, Attribute, Force, ForceKind};
pub use skill::{ManaPool, SkillInstance, SkillUid};
