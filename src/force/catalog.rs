//! The fixed skill catalog.
//!
//! Skills are declared in rosters as (attribute, tier) keys and
//! resolved here into concrete specs. The catalog is built once per
//! economy; it is data, not behavior.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::force::{ActivationMode, Attribute, ForceKind};

/// A roster-declared skill key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillKey {
    pub attribute: Attribute,
    /// 1 (strongest) to 3.
    pub tier: u8,
}

impl SkillKey {
    /// Create a skill key.
    #[must_use]
    pub const fn new(attribute: Attribute, tier: u8) -> Self {
        Self { attribute, tier }
    }
}

/// Resolved catalog entry for one (attribute, tier).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkillSpec {
    pub attribute: Attribute,
    pub tier: u8,
    /// The force kind produced on activation.
    pub effect: ForceKind,
    /// Minimum activation likelihood the NPC policy must report
    /// before this skill fires (also the sense detection chance).
    pub threshold: f64,
    pub mana_cost: f64,
    /// Cooldown in betting rounds.
    pub cooldown: u32,
    /// Force power contributed when active.
    pub power: f64,
    pub activation: ActivationMode,
    /// Active-mode skills of tier 1-2 suppress opposing lower-tier
    /// passives during opposition resolution.
    pub suppresses_lower: bool,
}

/// The full catalog, keyed by (attribute, tier).
#[derive(Clone, Debug)]
pub struct SkillCatalog {
    entries: FxHashMap<SkillKey, SkillSpec>,
}

impl SkillCatalog {
    /// Build the standard catalog: every attribute at tiers 1-3.
    #[must_use]
    pub fn standard() -> Self {
        let mut entries = FxHashMap::default();
        for attribute in Attribute::all() {
            for tier in 1..=3u8 {
                let key = SkillKey::new(attribute, tier);
                entries.insert(key, spec_for(attribute, tier));
            }
        }
        Self { entries }
    }

    /// Resolve a skill key. `None` for unknown keys (out-of-range
    /// tiers); callers skip these with a diagnostic.
    #[must_use]
    pub fn resolve(&self, key: SkillKey) -> Option<&SkillSpec> {
        self.entries.get(&key)
    }

    /// Number of catalog entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tier scaling: tier 1 is strongest and most expensive.
fn spec_for(attribute: Attribute, tier: u8) -> SkillSpec {
    // tier 1 -> 3.0, tier 2 -> 2.0, tier 3 -> 1.0
    let grade = (4 - tier.clamp(1, 3)) as f64;

    let activation = match attribute {
        Attribute::Insight | Attribute::Ward => ActivationMode::Passive,
        Attribute::Unveil => ActivationMode::Toggle,
        _ => ActivationMode::Active,
    };

    let power = match attribute {
        // Informational skills carry no deal power.
        Attribute::Insight | Attribute::Unveil => 0.0,
        Attribute::Blessing | Attribute::Hex => 15.0 * grade,
        Attribute::Null | Attribute::Ward => 10.0 * grade,
        Attribute::Reversal | Attribute::Purge => 8.0 * grade,
    };

    let mana_cost = match activation {
        ActivationMode::Passive => 0.0,
        ActivationMode::Toggle => 6.0 * grade,
        _ => 10.0 * grade,
    };

    SkillSpec {
        attribute,
        tier,
        effect: attribute.effect(),
        threshold: 0.15 + 0.10 * (grade - 1.0),
        mana_cost,
        cooldown: match activation {
            ActivationMode::Passive => 0,
            _ => tier.clamp(1, 3) as u32,
        },
        power,
        activation,
        suppresses_lower: activation == ActivationMode::Active && tier <= 2,
    }
}
