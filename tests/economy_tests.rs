//! Force economy lifecycle and activation errors.

use proptest::prelude::*;

use fateweave::config::{ManaSpec, TuningConfig};
use fateweave::core::ActorId;
use fateweave::force::{
    ActivationError, ActorConfig, Attribute, ForceEconomy, ForceKind, SkillKey,
};

fn roster_actor(id: u8, level: u8, skills: Vec<SkillKey>) -> ActorConfig {
    ActorConfig {
        id: ActorId::new(id),
        name: format!("actor-{id}"),
        is_human: false,
        levels: (level, level),
        skills,
    }
}

fn economy(skills: Vec<SkillKey>) -> ForceEconomy {
    let mut eco = ForceEconomy::new(TuningConfig::default());
    eco.register_from_config(&[
        roster_actor(0, 1, skills),
        roster_actor(1, 1, vec![]),
    ]);
    eco
}

fn uid_of(eco: &ForceEconomy, actor: ActorId, attribute: Attribute) -> fateweave::force::SkillUid {
    eco.skills_of(actor)
        .iter()
        .find(|s| s.attribute == attribute)
        .map(|s| s.uid)
        .expect("skill registered")
}

#[test]
fn insufficient_mana_leaves_pool_untouched() {
    // Level-1 pool holds 40. Spend down to 10, then a 20-cost skill
    // must fail without touching the pool.
    let mut eco = economy(vec![
        SkillKey::new(Attribute::Blessing, 2),
        SkillKey::new(Attribute::Blessing, 3),
        SkillKey::new(Attribute::Hex, 2),
    ]);
    let actor = ActorId::new(0);

    let b2 = uid_of(&eco, actor, Attribute::Blessing);
    eco.activate_player_skill(actor, b2, None).unwrap();
    let b3 = eco
        .skills_of(actor)
        .iter()
        .find(|s| s.attribute == Attribute::Blessing && s.tier == 3)
        .unwrap()
        .uid;
    eco.activate_player_skill(actor, b3, None).unwrap();
    assert_eq!(eco.mana_of(actor).unwrap().current(), 10.0);

    let hex = uid_of(&eco, actor, Attribute::Hex);
    let result = eco.activate_player_skill(actor, hex, Some(ActorId::new(1)));
    assert_eq!(result, Err(ActivationError::InsufficientMana));
    assert_eq!(eco.mana_of(actor).unwrap().current(), 10.0);
}

#[test]
fn cooldown_blocks_reactivation_until_round_ends() {
    let mut eco = economy(vec![SkillKey::new(Attribute::Blessing, 3)]);
    let actor = ActorId::new(0);
    let uid = uid_of(&eco, actor, Attribute::Blessing);

    eco.activate_player_skill(actor, uid, None).unwrap();
    assert_eq!(
        eco.activate_player_skill(actor, uid, None),
        Err(ActivationError::OnCooldown)
    );

    // Tier-3 cooldown is 3 rounds.
    eco.on_round_end();
    eco.on_round_end();
    assert_eq!(
        eco.activate_player_skill(actor, uid, None),
        Err(ActivationError::OnCooldown)
    );
    eco.on_round_end();
    eco.activate_player_skill(actor, uid, None).unwrap();
}

#[test]
fn draining_to_zero_starts_backlash() {
    // Two 20-cost activations empty the 40-point pool exactly.
    let mut eco = economy(vec![
        SkillKey::new(Attribute::Blessing, 2),
        SkillKey::new(Attribute::Hex, 2),
    ]);
    let actor = ActorId::new(0);

    let blessing = uid_of(&eco, actor, Attribute::Blessing);
    let hex = uid_of(&eco, actor, Attribute::Hex);
    eco.activate_player_skill(actor, blessing, None).unwrap();
    eco.activate_player_skill(actor, hex, Some(ActorId::new(1))).unwrap();

    assert_eq!(eco.mana_of(actor).unwrap().current(), 0.0);
    assert!(eco.backlash_active(actor));

    // Further activation is blocked outright.
    assert_eq!(
        eco.activate_player_skill(actor, blessing, None),
        Err(ActivationError::BacklashActive)
    );

    // 30 -> 15 -> 7.5 -> expired below the floor of 5.
    eco.on_round_end();
    assert!(eco.backlash_active(actor));
    eco.on_round_end();
    assert!(eco.backlash_active(actor));
    eco.on_round_end();
    assert!(!eco.backlash_active(actor));
}

#[test]
fn pending_forces_survive_rounds_and_die_on_reveal() {
    let mut eco = economy(vec![SkillKey::new(Attribute::Blessing, 2)]);
    let actor = ActorId::new(0);
    let uid = uid_of(&eco, actor, Attribute::Blessing);

    eco.activate_player_skill(actor, uid, None).unwrap();
    assert_eq!(eco.pending_forces().len(), 1);
    assert_eq!(eco.pending_forces()[0].kind, ForceKind::Fortune);

    // Round end without a reveal: the force is still waiting.
    eco.on_round_end();
    assert_eq!(eco.pending_forces().len(), 1);

    eco.on_card_revealed();
    assert!(eco.pending_forces().is_empty());
}

#[test]
fn new_hand_clears_pending_and_deactivates_toggles() {
    let mut eco = economy(vec![
        SkillKey::new(Attribute::Blessing, 2),
        SkillKey::new(Attribute::Unveil, 2),
        SkillKey::new(Attribute::Insight, 2),
    ]);
    let actor = ActorId::new(0);

    let blessing = uid_of(&eco, actor, Attribute::Blessing);
    let unveil = uid_of(&eco, actor, Attribute::Unveil);
    eco.activate_player_skill(actor, blessing, None).unwrap();
    eco.activate_player_skill(actor, unveil, None).unwrap();

    eco.on_new_hand();

    assert!(eco.pending_forces().is_empty());
    for skill in eco.skills_of(actor) {
        match skill.attribute {
            // Passives persist across hands.
            Attribute::Insight => assert!(skill.active),
            _ => assert!(!skill.active, "{:?} should deactivate", skill.attribute),
        }
    }
}

#[test]
fn reset_refills_mana_and_clears_backlash() {
    let mut eco = economy(vec![
        SkillKey::new(Attribute::Blessing, 2),
        SkillKey::new(Attribute::Hex, 2),
    ]);
    let actor = ActorId::new(0);

    let blessing = uid_of(&eco, actor, Attribute::Blessing);
    let hex = uid_of(&eco, actor, Attribute::Hex);
    eco.activate_player_skill(actor, blessing, None).unwrap();
    eco.activate_player_skill(actor, hex, Some(ActorId::new(1))).unwrap();
    assert!(eco.backlash_active(actor));

    eco.reset();
    let pool = eco.mana_of(actor).unwrap();
    assert_eq!(pool.current(), pool.max());
    assert!(!eco.backlash_active(actor));
}

#[test]
fn unknown_skill_keys_are_skipped() {
    let mut eco = ForceEconomy::new(TuningConfig::default());
    eco.register_from_config(&[roster_actor(
        0,
        1,
        vec![
            SkillKey::new(Attribute::Blessing, 2),
            // No tier-9 entry exists in the catalog.
            SkillKey::new(Attribute::Blessing, 9),
        ],
    )]);
    assert_eq!(eco.skills_of(ActorId::new(0)).len(), 1);
}

proptest! {
    #[test]
    fn mana_invariant_holds_under_any_sequence(
        max in 1.0f64..300.0,
        regen in 0.0f64..40.0,
        ops in prop::collection::vec((prop::bool::ANY, 0.0f64..120.0), 0..64),
    ) {
        let mut pool =
            fateweave::force::ManaPool::from_spec(ManaSpec { max, regen });

        for (is_spend, cost) in ops {
            if is_spend {
                pool.spend(cost);
            } else {
                pool.regen();
            }
            prop_assert!(pool.current() >= 0.0);
            prop_assert!(pool.current() <= pool.max());
        }
    }
}
