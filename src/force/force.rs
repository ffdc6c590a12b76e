//! Force data model.
//!
//! A force is a directional probabilistic influence on the next card
//! reveal: it has an owner, a kind, a power, and optionally a target.
//! Forces are produced by skills and by the system backlash, and are
//! consumed by the destiny engine (deal bias) and the decision engine
//! (force-advantage utility term).
//!
//! Kinds are an exhaustive enum - every consumer matches all variants,
//! so adding a kind is a compile-time checked change.

use serde::{Deserialize, Serialize};

use crate::core::ActorId;

/// What a force does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForceKind {
    /// Bends the reveal toward outcomes favoring the owner.
    Fortune,
    /// Bends the reveal against the target.
    Curse,
    /// System penalty after mana depletion; works like a curse on the
    /// owner.
    Backlash,
    /// Informational: detects other activations. Never biases a deal.
    Sense,
    /// Informational: previews candidate outcomes. Never biases a deal.
    Peek,
    /// Rewrites pending curses on the activator into owned fortunes.
    Reversal,
    /// Dampens all passive forces; at dominant tier it blanks the
    /// selection entirely.
    NullField,
    /// Shields the owner: reduces forces targeting them.
    VoidShield,
    /// Clears pending forces from other actors.
    PurgeAll,
}

impl ForceKind {
    /// Whether this kind directly biases which card is dealt.
    #[must_use]
    pub const fn is_dealing(self) -> bool {
        matches!(self, ForceKind::Fortune | ForceKind::Curse | ForceKind::Backlash)
    }

    /// Whether this kind shapes other forces instead of the deal.
    #[must_use]
    pub const fn is_meta(self) -> bool {
        matches!(self, ForceKind::NullField | ForceKind::VoidShield)
    }

    /// Whether this kind only carries information.
    #[must_use]
    pub const fn is_informational(self) -> bool {
        matches!(self, ForceKind::Sense | ForceKind::Peek)
    }
}

/// How the owning skill is driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationMode {
    /// Always on while the skill exists.
    Passive,
    /// Explicitly activated, costs mana, enqueues a single-use force.
    Active,
    /// Switched on/off; persists across reveals while on.
    Toggle,
    /// Fired by the system, not the actor.
    Triggered,
}

/// Skill school. The catalog is keyed by (attribute, tier).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    /// Fortune production.
    Blessing,
    /// Curse production.
    Hex,
    /// Sensing other activations.
    Insight,
    /// Peeking at candidate outcomes.
    Unveil,
    /// Curse reversal.
    Reversal,
    /// Null field projection.
    Null,
    /// Void shield.
    Ward,
    /// Pending-force purge.
    Purge,
}

impl Attribute {
    /// The force kind skills of this attribute produce.
    #[must_use]
    pub const fn effect(self) -> ForceKind {
        match self {
            Attribute::Blessing => ForceKind::Fortune,
            Attribute::Hex => ForceKind::Curse,
            Attribute::Insight => ForceKind::Sense,
            Attribute::Unveil => ForceKind::Peek,
            Attribute::Reversal => ForceKind::Reversal,
            Attribute::Null => ForceKind::NullField,
            Attribute::Ward => ForceKind::VoidShield,
            Attribute::Purge => ForceKind::PurgeAll,
        }
    }

    /// All attributes, for catalog construction.
    pub fn all() -> impl Iterator<Item = Attribute> {
        [
            Attribute::Blessing,
            Attribute::Hex,
            Attribute::Insight,
            Attribute::Unveil,
            Attribute::Reversal,
            Attribute::Null,
            Attribute::Ward,
            Attribute::Purge,
        ]
        .into_iter()
    }
}

/// A directional probabilistic influence on the next reveal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Force {
    /// The actor the force belongs to.
    pub owner: ActorId,
    /// Presentation name of the owner.
    pub owner_name: String,
    /// What the force does.
    pub kind: ForceKind,
    /// Magnitude; informational forces carry 0.
    pub power: f64,
    /// Skill tier, 1 (strongest) to 3.
    pub tier: u8,
    /// How the producing skill is driven.
    pub activation: ActivationMode,
    /// Directed target, for curses and shields.
    pub target: Option<ActorId>,
    /// The producing skill's school.
    pub attribute: Attribute,
    /// Whether this force suppresses opposing lower-tier passives.
    pub suppresses_lower: bool,
}

impl Force {
    /// A fortune owned by `owner`.
    #[must_use]
    pub fn fortune(owner: ActorId, owner_name: impl Into<String>, power: f64, tier: u8) -> Self {
        Self {
            owner,
            owner_name: owner_name.into(),
            kind: ForceKind::Fortune,
            power,
            tier,
            activation: ActivationMode::Active,
            target: None,
            attribute: Attribute::Blessing,
            suppresses_lower: false,
        }
    }

    /// A curse from `owner` directed at `target`.
    #[must_use]
    pub fn curse(
        owner: ActorId,
        owner_name: impl Into<String>,
        target: ActorId,
        power: f64,
        tier: u8,
    ) -> Self {
        Self {
            owner,
            owner_name: owner_name.into(),
            kind: ForceKind::Curse,
            power,
            tier,
            activation: ActivationMode::Active,
            target: Some(target),
            attribute: Attribute::Hex,
            suppresses_lower: false,
        }
    }

    /// The system backlash pressing on `actor`.
    #[must_use]
    pub fn backlash(actor: ActorId, power: f64) -> Self {
        Self {
            owner: actor,
            owner_name: String::new(),
            kind: ForceKind::Backlash,
            power,
            tier: 2,
            activation: ActivationMode::Triggered,
            target: Some(actor),
            attribute: Attribute::Hex,
            suppresses_lower: false,
        }
    }

    /// Set the activation mode (builder pattern).
    #[must_use]
    pub fn with_activation(mut self, mode: ActivationMode) -> Self {
        self.activation = mode;
        self
    }

    /// Set lower-tier suppression (builder pattern).
    #[must_use]
    pub fn with_suppression(mut self, suppresses: bool) -> Self {
        self.suppresses_lower = suppresses;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert!(ForceKind::Fortune.is_dealing());
        assert!(ForceKind::Backlash.is_dealing());
        assert!(!ForceKind::NullField.is_dealing());
        assert!(ForceKind::VoidShield.is_meta());
        assert!(ForceKind::Sense.is_informational());
        assert!(!ForceKind::Curse.is_informational());
    }

    #[test]
    fn test_attribute_effects_cover_all_kinds() {
        let effects: Vec<_> = Attribute::all().map(Attribute::effect).collect();
        assert!(effects.contains(&ForceKind::Fortune));
        assert!(effects.contains(&ForceKind::Curse));
        assert!(effects.contains(&ForceKind::PurgeAll));
        assert_eq!(effects.len(), 8);
    }

    #[test]
    fn test_backlash_targets_its_owner() {
        let f = Force::backlash(ActorId::new(3), 20.0);
        assert_eq!(f.target, Some(ActorId::new(3)));
        assert_eq!(f.kind, ForceKind::Backlash);
    }
}
