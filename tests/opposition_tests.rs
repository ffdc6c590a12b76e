//! Force opposition invariants.

use proptest::prelude::*;

use fateweave::config::TuningConfig;
use fateweave::core::ActorId;
use fateweave::destiny::resolve_force_opposition;
use fateweave::force::{Force, ForceKind};

fn cfg() -> fateweave::config::OppositionTuning {
    TuningConfig::default().opposition
}

#[test]
fn opposing_fortunes_net_out() {
    // fortune(40, A) vs fortune(25, B) -> 15 and 0.
    let forces = vec![
        Force::fortune(ActorId::new(0), "a", 40.0, 2),
        Force::fortune(ActorId::new(1), "b", 25.0, 2),
    ];
    let resolved = resolve_force_opposition(&forces, &cfg());

    assert_eq!(resolved[0].power, 15.0);
    assert_eq!(resolved[1].power, 0.0);
}

#[test]
fn equal_opposition_zeroes_both() {
    let forces = vec![
        Force::curse(ActorId::new(0), "a", ActorId::new(1), 20.0, 2),
        Force::curse(ActorId::new(1), "b", ActorId::new(0), 20.0, 2),
    ];
    let resolved = resolve_force_opposition(&forces, &cfg());
    assert!(resolved.iter().all(|f| f.power == 0.0));
}

#[test]
fn resolution_is_idempotent() {
    let forces = vec![
        Force::fortune(ActorId::new(0), "a", 40.0, 1),
        Force::fortune(ActorId::new(1), "b", 25.0, 3),
        Force::curse(ActorId::new(1), "b", ActorId::new(0), 18.0, 2),
    ];
    let once = resolve_force_opposition(&forces, &cfg());
    let twice = resolve_force_opposition(&once, &cfg());

    // A second pass finds only one surviving side per kind; nothing
    // left to net against.
    for (a, b) in once.iter().zip(twice.iter()) {
        assert!((a.power - b.power).abs() < 1e-9);
    }
}

fn arbitrary_forces() -> impl Strategy<Value = Vec<Force>> {
    prop::collection::vec(
        (0u8..4, 0u8..4, 0.0f64..100.0, 1u8..=3, prop::bool::ANY),
        0..8,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(owner, target, power, tier, is_curse)| {
                if is_curse && owner != target {
                    Force::curse(ActorId::new(owner), "p", ActorId::new(target), power, tier)
                } else {
                    Force::fortune(ActorId::new(owner), "p", power, tier)
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn effective_power_never_negative(forces in arbitrary_forces()) {
        let resolved = resolve_force_opposition(&forces, &cfg());
        for force in &resolved {
            prop_assert!(force.power >= 0.0);
            prop_assert!(force.power.is_finite());
        }
    }

    #[test]
    fn cancellation_never_amplifies(forces in arbitrary_forces()) {
        let resolved = resolve_force_opposition(&forces, &cfg());

        for kind in [ForceKind::Fortune, ForceKind::Curse] {
            let original_max_side: f64 = {
                // Strongest single side among the originals bounds the
                // surviving total.
                let mut sides = std::collections::HashMap::new();
                for f in forces.iter().filter(|f| f.kind == kind) {
                    let side = f.target.unwrap_or(f.owner);
                    *sides.entry(side).or_insert(0.0) += f.power;
                }
                sides.values().copied().fold(0.0, f64::max)
            };
            let resolved_total: f64 = resolved
                .iter()
                .filter(|f| f.kind == kind)
                .map(|f| f.power)
                .sum();
            prop_assert!(resolved_total <= original_max_side + 1e-9);
        }
    }
}
