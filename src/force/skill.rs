//! Skill instances and mana pools.

use serde::{Deserialize, Serialize};

use crate::config::ManaSpec;
use crate::core::ActorId;

use super::catalog::SkillSpec;
use super::force::{ActivationMode, Attribute, ForceKind};

/// Unique skill instance identifier within one economy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SkillUid(pub u32);

impl std::fmt::Display for SkillUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Skill#{}", self.0)
    }
}

/// A skill owned by one actor for the session.
///
/// Created from the catalog at roster setup, mutated by activation and
/// cooldown ticking, reset at hand boundaries.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkillInstance {
    pub uid: SkillUid,
    pub owner: ActorId,
    pub attribute: Attribute,
    pub tier: u8,
    pub effect: ForceKind,
    pub threshold: f64,
    pub mana_cost: f64,
    pub cooldown: u32,
    pub power: f64,
    pub activation: ActivationMode,
    /// Whether the skill currently contributes a force.
    pub active: bool,
    pub cooldown_remaining: u32,
    pub suppresses_lower: bool,
}

impl SkillInstance {
    /// Instantiate a catalog spec for an owner.
    #[must_use]
    pub fn from_spec(uid: SkillUid, owner: ActorId, spec: &SkillSpec) -> Self {
        Self {
            uid,
            owner,
            attribute: spec.attribute,
            tier: spec.tier,
            effect: spec.effect,
            threshold: spec.threshold,
            mana_cost: spec.mana_cost,
            cooldown: spec.cooldown,
            power: spec.power,
            activation: spec.activation,
            // Passives are on from the start.
            active: spec.activation == ActivationMode::Passive,
            cooldown_remaining: 0,
            suppresses_lower: spec.suppresses_lower,
        }
    }

    /// Whether the skill can be explicitly activated at all.
    #[must_use]
    pub fn is_activatable(&self) -> bool {
        matches!(self.activation, ActivationMode::Active | ActivationMode::Toggle)
    }

    /// Tick the cooldown down one round.
    pub fn tick_cooldown(&mut self) {
        self.cooldown_remaining = self.cooldown_remaining.saturating_sub(1);
    }

    /// New-hand reset: non-passive skills deactivate, cooldowns clear.
    pub fn reset_for_new_hand(&mut self) {
        if self.activation != ActivationMode::Passive {
            self.active = false;
        }
        self.cooldown_remaining = 0;
    }
}

/// A bounded mana pool.
///
/// The invariant `0 <= current <= max` holds after every operation;
/// `spend` and `regen` are the only mutators.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManaPool {
    current: f64,
    max: f64,
    regen: f64,
}

impl ManaPool {
    /// Create a full pool from a level spec.
    #[must_use]
    pub fn from_spec(spec: ManaSpec) -> Self {
        Self { current: spec.max, max: spec.max, regen: spec.regen }
    }

    /// Current mana.
    #[must_use]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Pool capacity.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Whether the pool covers a cost.
    #[must_use]
    pub fn can_afford(&self, cost: f64) -> bool {
        self.current >= cost
    }

    /// Spend mana. Returns `false` (pool untouched) when short.
    pub fn spend(&mut self, cost: f64) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.current = (self.current - cost).max(0.0);
        true
    }

    /// Regenerate one round's worth of mana.
    pub fn regen(&mut self) {
        self.current = (self.current + self.regen).min(self.max);
    }

    /// Refill to capacity.
    pub fn refill(&mut self) {
        self.current = self.max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::force::catalog::{SkillCatalog, SkillKey};

    fn sample_skill(attribute: Attribute, tier: u8) -> SkillInstance {
        let catalog = SkillCatalog::standard();
        let spec = catalog.resolve(SkillKey::new(attribute, tier)).unwrap();
        SkillInstance::from_spec(SkillUid(1), ActorId::new(0), spec)
    }

    #[test]
    fn test_passive_starts_active() {
        let sense = sample_skill(Attribute::Insight, 2);
        assert!(sense.active);
        assert!(!sense.is_activatable());

        let blessing = sample_skill(Attribute::Blessing, 2);
        assert!(!blessing.active);
        assert!(blessing.is_activatable());
    }

    #[test]
    fn test_new_hand_reset() {
        let mut blessing = sample_skill(Attribute::Blessing, 1);
        blessing.active = true;
        blessing.cooldown_remaining = 2;

        blessing.reset_for_new_hand();
        assert!(!blessing.active);
        assert_eq!(blessing.cooldown_remaining, 0);

        let mut sense = sample_skill(Attribute::Insight, 3);
        sense.reset_for_new_hand();
        assert!(sense.active, "passives stay on across hands");
    }

    #[test]
    fn test_mana_invariant() {
        let mut pool = ManaPool::from_spec(ManaSpec { max: 50.0, regen: 10.0 });

        assert!(pool.spend(30.0));
        assert_eq!(pool.current(), 20.0);

        // Short spend leaves the pool untouched.
        assert!(!pool.spend(25.0));
        assert_eq!(pool.current(), 20.0);

        // Regen never exceeds max.
        for _ in 0..10 {
            pool.regen();
        }
        assert_eq!(pool.current(), 50.0);
    }

    #[test]
    fn test_spend_to_zero() {
        let mut pool = ManaPool::from_spec(ManaSpec { max: 10.0, regen: 1.0 });
        assert!(pool.spend(10.0));
        assert_eq!(pool.current(), 0.0);
        assert!(!pool.spend(0.1));
    }
}
