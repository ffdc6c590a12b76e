//! NPC skill-activation policy.
//!
//! Supplies the per-attribute activation likelihoods and curse-target
//! selection consumed by the force economy's NPC pass. Likelihoods are
//! heuristic: dealing attributes fire more when chips are committed,
//! defensive and disruptive ones when a threat has been detected, and
//! stronger tiers fire more readily across the board.

use tracing::trace;

use crate::core::{ActorId, EngineRng};
use crate::force::{Attribute, SkillPolicy, TableActor};

/// The standard NPC skill policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct SkillAi;

impl SkillAi {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Diminishing pot pressure in [0, 1).
fn pot_pressure(pot: f64) -> f64 {
    if pot <= 0.0 {
        0.0
    } else {
        pot / (pot + 200.0)
    }
}

impl SkillPolicy for SkillAi {
    fn activation_likelihood(
        &self,
        attribute: Attribute,
        tier: u8,
        commitment: f64,
        threat: f64,
        pot: f64,
    ) -> f64 {
        let pot = pot_pressure(pot);
        let base = match attribute {
            // Dealing attributes scale with how much is at stake.
            Attribute::Blessing => 0.25 + 0.40 * commitment + 0.20 * pot,
            Attribute::Hex => 0.20 + 0.30 * commitment + 0.35 * threat,
            // Information wants uncertainty, not commitment.
            Attribute::Unveil => 0.20 + 0.50 * threat + 0.10 * pot,
            Attribute::Insight => 0.15 + 0.40 * threat,
            // Disruption and defense answer detected magic.
            Attribute::Null => 0.10 + 0.55 * threat,
            Attribute::Ward => 0.10 + 0.50 * threat,
            Attribute::Reversal => 0.05 + 0.65 * threat,
            Attribute::Purge => 0.05 + 0.55 * threat + 0.15 * pot,
        };

        // Tier 1 actors are more willing than tier 3.
        let tier_factor = 1.0 + 0.15 * f64::from(3u8.saturating_sub(tier.clamp(1, 3)));
        let likelihood = (base * tier_factor).clamp(0.0, 1.0);
        trace!(?attribute, tier, likelihood, "skill activation likelihood");
        likelihood
    }

    fn choose_curse_target(
        &self,
        tier: u8,
        caster: ActorId,
        actors: &[TableActor],
        rng: &mut EngineRng,
    ) -> Option<ActorId> {
        let candidates: Vec<&TableActor> = actors
            .iter()
            .filter(|a| a.id != caster && !a.folded)
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let weights: Vec<f64> = match tier.clamp(1, 3) {
            // Strongest casters hit whoever threatens them most.
            1 => candidates.iter().map(|a| 0.1 + a.threat).collect(),
            // Mid tier punishes whoever is deepest in the pot.
            2 => candidates
                .iter()
                .map(|a| 0.1 + a.commitment_ratio())
                .collect(),
            // Weakest casters envy the chip leader.
            _ => candidates.iter().map(|a| 0.1 + a.stack).collect(),
        };

        rng.choose_weighted(&weights).map(|i| candidates[i].id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(id: u8, stack: f64, committed: f64, threat: f64) -> TableActor {
        TableActor {
            id: ActorId::new(id),
            folded: false,
            stack,
            committed,
            threat,
        }
    }

    #[test]
    fn test_commitment_raises_blessing_likelihood() {
        let ai = SkillAi::new();
        let idle = ai.activation_likelihood(Attribute::Blessing, 2, 0.0, 0.0, 0.0);
        let committed = ai.activation_likelihood(Attribute::Blessing, 2, 0.8, 0.0, 0.0);
        assert!(committed > idle);
    }

    #[test]
    fn test_threat_raises_defensive_likelihood() {
        let ai = SkillAi::new();
        for attribute in [Attribute::Null, Attribute::Ward, Attribute::Reversal] {
            let calm = ai.activation_likelihood(attribute, 2, 0.3, 0.0, 50.0);
            let threatened = ai.activation_likelihood(attribute, 2, 0.3, 0.9, 50.0);
            assert!(threatened > calm, "{attribute:?}");
        }
    }

    #[test]
    fn test_stronger_tier_more_willing() {
        let ai = SkillAi::new();
        let strong = ai.activation_likelihood(Attribute::Hex, 1, 0.5, 0.5, 100.0);
        let weak = ai.activation_likelihood(Attribute::Hex, 3, 0.5, 0.5, 100.0);
        assert!(strong > weak);
    }

    #[test]
    fn test_likelihood_stays_in_unit_interval() {
        let ai = SkillAi::new();
        for attribute in Attribute::all() {
            for tier in 1..=3 {
                let l = ai.activation_likelihood(attribute, tier, 1.0, 1.0, 1e9);
                assert!((0.0..=1.0).contains(&l));
            }
        }
    }

    #[test]
    fn test_curse_target_skips_caster_and_folded() {
        let ai = SkillAi::new();
        let mut rng = EngineRng::new(5);
        let mut folded = actor(1, 100.0, 0.0, 0.9);
        folded.folded = true;
        let actors = [actor(0, 100.0, 0.0, 0.0), folded, actor(2, 100.0, 0.0, 0.1)];

        for _ in 0..20 {
            let target = ai
                .choose_curse_target(2, ActorId::new(0), &actors, &mut rng)
                .unwrap();
            assert_eq!(target, ActorId::new(2));
        }
    }

    #[test]
    fn test_tier_three_prefers_chip_leader() {
        let ai = SkillAi::new();
        let mut rng = EngineRng::new(9);
        let actors = [
            actor(0, 100.0, 0.0, 0.0),
            actor(1, 1000.0, 0.0, 0.0),
            actor(2, 10.0, 0.0, 0.0),
        ];

        let mut leader_hits = 0;
        for _ in 0..200 {
            if ai.choose_curse_target(3, ActorId::new(0), &actors, &mut rng)
                == Some(ActorId::new(1))
            {
                leader_hits += 1;
            }
        }
        assert!(leader_hits > 150, "leader picked {leader_hits}/200");
    }

    #[test]
    fn test_no_live_opponents() {
        let ai = SkillAi::new();
        let mut rng = EngineRng::new(1);
        let actors = [actor(0, 100.0, 0.0, 0.0)];
        assert!(ai
            .choose_curse_target(1, ActorId::new(0), &actors, &mut rng)
            .is_none());
    }
}
