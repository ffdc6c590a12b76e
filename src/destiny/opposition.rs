//! Force opposition resolution.
//!
//! Opposing forces of the same kind cancel, never amplify. Active-mode
//! forces first suppress opposing lower-tier passives by a per-tier-gap
//! ratio; then, within each dealing kind, power is summed per side
//! (fortunes side with their owner, curses with their target), the
//! strongest side keeps only the net difference, every other side is
//! zeroed, and exact ties zero everyone. Finally the meta forces apply
//! their flat reductions: a void shield dampens forces aimed at its
//! owner, a null field dampens all passives.
//!
//! Post-resolution invariants: every effective power is >= 0, and for
//! any same-kind opposing pair the surviving totals never exceed the
//! larger of the two original totals.

use rustc_hash::FxHashMap;

use crate::config::OppositionTuning;
use crate::core::ActorId;
use crate::force::{ActivationMode, Force, ForceKind};

/// Which side of an opposition a dealing force pulls for.
fn side_of(force: &Force) -> ActorId {
    match force.kind {
        // A curse pulls against its target; curses on the same target
        // are allies regardless of caster.
        ForceKind::Curse | ForceKind::Backlash => force.target.unwrap_or(force.owner),
        _ => force.owner,
    }
}

/// Resolve opposition, suppression, and meta reductions.
///
/// Returns the input forces with effective powers; order is preserved.
#[must_use]
pub fn resolve_force_opposition(forces: &[Force], cfg: &OppositionTuning) -> Vec<Force> {
    let mut resolved: Vec<Force> = forces.to_vec();

    // Suppression shapes the power entering opposition, so it runs
    // before netting.
    apply_tier_suppression(&mut resolved, cfg);

    for kind in [ForceKind::Fortune, ForceKind::Curse, ForceKind::Backlash] {
        net_out_kind(&mut resolved, kind);
    }

    apply_meta_reductions(&mut resolved, cfg);

    for force in &mut resolved {
        if !force.power.is_finite() || force.power < 0.0 {
            force.power = 0.0;
        }
    }

    resolved
}

/// Whether a dominant blank override is present: a null field at the
/// configured tier or stronger short-circuits selection to a uniform
/// draw.
#[must_use]
pub fn has_dominant_null(forces: &[Force], cfg: &OppositionTuning) -> bool {
    forces
        .iter()
        .any(|f| f.kind == ForceKind::NullField && f.tier <= cfg.dominant_null_tier && f.power > 0.0)
}

/// Zero the weaker sides of one kind; the strongest keeps the net.
fn net_out_kind(forces: &mut [Force], kind: ForceKind) {
    let mut sides: FxHashMap<ActorId, f64> = FxHashMap::default();
    for force in forces.iter() {
        if force.kind == kind && force.power > 0.0 {
            *sides.entry(side_of(force)).or_insert(0.0) += force.power;
        }
    }
    if sides.len() < 2 {
        return;
    }

    let max_sum = sides.values().copied().fold(0.0f64, f64::max);
    let tied = sides.values().filter(|&&s| s == max_sum).count() > 1;
    let rest: f64 = sides.values().copied().sum::<f64>() - max_sum;
    let survivor = sides
        .iter()
        .find(|(_, &s)| s == max_sum)
        .map(|(&side, _)| side);

    // Proportional share of the net difference for the winning side.
    let scale = if tied || max_sum <= 0.0 {
        0.0
    } else {
        ((max_sum - rest) / max_sum).max(0.0)
    };

    for force in forces.iter_mut() {
        if force.kind != kind || force.power <= 0.0 {
            continue;
        }
        if tied || Some(side_of(force)) != survivor {
            force.power = 0.0;
        } else {
            force.power *= scale;
        }
    }
}

/// Active-mode forces shave opposing lower-tier passives.
fn apply_tier_suppression(forces: &mut [Force], cfg: &OppositionTuning) {
    let suppressors: Vec<(ActorId, u8, ForceKind)> = forces
        .iter()
        .filter(|f| f.suppresses_lower && f.activation == ActivationMode::Active && f.power > 0.0)
        .map(|f| (side_of(f), f.tier, f.kind))
        .collect();

    for force in forces.iter_mut() {
        if !matches!(force.activation, ActivationMode::Passive | ActivationMode::Toggle) {
            continue;
        }
        for &(side, tier, kind) in &suppressors {
            if kind == force.kind && side != side_of(force) && force.tier > tier {
                let gap = (force.tier - tier) as f64;
                let factor = (1.0 - cfg.tier_gap_suppression * gap).max(0.0);
                force.power *= factor;
            }
        }
    }
}

/// Void shields and null fields apply flat percentage reductions.
fn apply_meta_reductions(forces: &mut [Force], cfg: &OppositionTuning) {
    let shield_owners: Vec<ActorId> = forces
        .iter()
        .filter(|f| f.kind == ForceKind::VoidShield && f.power > 0.0)
        .map(|f| f.owner)
        .collect();
    let null_present = forces
        .iter()
        .any(|f| f.kind == ForceKind::NullField && f.power > 0.0);

    for force in forces.iter_mut() {
        if force.kind.is_meta() {
            continue;
        }
        if let Some(target) = force.target {
            if shield_owners.contains(&target) {
                force.power *= 1.0 - cfg.void_shield_reduction;
            }
        }
        if null_present && force.activation == ActivationMode::Passive {
            force.power *= 1.0 - cfg.null_field_reduction;
        }
    }
}
