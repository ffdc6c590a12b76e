//! The force economy: skill registry, mana pools, force lifecycle.
//!
//! One `ForceEconomy` is owned by the session and passed by reference
//! wherever force state is needed - there is no ambient registry. All
//! shared mutable state (mana, cooldowns, pending forces, backlash) is
//! mutated only through the operations here, and each piece of
//! ephemeral state has exactly one reset point:
//!
//! - `on_round_end`: mana regen, toggle reset, cooldown tick, backlash
//!   decay. Pending forces deliberately survive - they must reach the
//!   next card reveal.
//! - `on_card_revealed`: pending forces are consumed and cleared.
//! - `on_new_hand`: pending forces, perception events, and non-passive
//!   activation state all clear.
//! - `reset`: full reinitialization of mana and backlash.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::TuningConfig;
use crate::core::{ActorId, EngineRng, Phase};

use super::catalog::{SkillCatalog, SkillKey};
use super::events::{EngineEvent, EventQueue, PerceptionEvent};
use super::force::{ActivationMode, Attribute, Force, ForceKind};
use super::skill::{ManaPool, SkillInstance, SkillUid};

/// Why a skill activation was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ActivationError {
    #[error("skill not found")]
    NotFound,
    #[error("skill is not an activatable type")]
    NotActiveType,
    #[error("activation blocked by active backlash")]
    BacklashActive,
    #[error("skill is on cooldown")]
    OnCooldown,
    #[error("insufficient mana")]
    InsufficientMana,
}

/// One roster entry: an actor and their declared skills.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActorConfig {
    pub id: ActorId,
    pub name: String,
    /// Human actors never go through the NPC skill pass.
    pub is_human: bool,
    /// The actor's two role levels; the mana pool derives from the
    /// larger one.
    pub levels: (u8, u8),
    pub skills: Vec<SkillKey>,
}

/// Per-actor view the economy needs each betting round.
#[derive(Clone, Debug)]
pub struct TableActor {
    pub id: ActorId,
    pub folded: bool,
    pub stack: f64,
    pub committed: f64,
    /// Detected threat level toward this actor's opposition, 0-1.
    pub threat: f64,
}

impl TableActor {
    /// Fraction of this actor's chips already in the pot.
    #[must_use]
    pub fn commitment_ratio(&self) -> f64 {
        let total = self.stack + self.committed;
        if total <= 0.0 {
            0.0
        } else {
            self.committed / total
        }
    }
}

/// Read-only table snapshot for a betting round.
#[derive(Clone, Debug)]
pub struct TableContext {
    pub phase: Phase,
    pub pot: f64,
    pub actors: Vec<TableActor>,
}

impl TableContext {
    fn actor(&self, id: ActorId) -> Option<&TableActor> {
        self.actors.iter().find(|a| a.id == id)
    }

    fn is_folded(&self, id: ActorId) -> bool {
        self.actor(id).map_or(false, |a| a.folded)
    }
}

/// Skill activation and targeting policy, supplied by the decision
/// layer and consumed by the NPC pass.
pub trait SkillPolicy {
    /// Likelihood in [0, 1] that a skill of this attribute/tier should
    /// fire given the owner's commitment, detected threat, and pot.
    fn activation_likelihood(
        &self,
        attribute: Attribute,
        tier: u8,
        commitment: f64,
        threat: f64,
        pot: f64,
    ) -> f64;

    /// Pick a curse target for `caster` among live opponents.
    fn choose_curse_target(
        &self,
        tier: u8,
        caster: ActorId,
        actors: &[TableActor],
        rng: &mut EngineRng,
    ) -> Option<ActorId>;
}

/// Decaying system penalty after mana depletion.
#[derive(Clone, Copy, Debug, PartialEq)]
struct BacklashState {
    power: f64,
}

#[derive(Clone, Debug)]
struct ActorProfile {
    name: String,
    is_human: bool,
}

/// A successful NPC activation, for callers that narrate the round.
#[derive(Clone, Debug, PartialEq)]
pub struct NpcActivation {
    pub owner: ActorId,
    pub uid: SkillUid,
    pub attribute: Attribute,
    pub tier: u8,
}

/// The session's force economy.
#[derive(Debug)]
pub struct ForceEconomy {
    cfg: TuningConfig,
    catalog: SkillCatalog,
    profiles: FxHashMap<ActorId, ActorProfile>,
    skills: FxHashMap<ActorId, Vec<SkillInstance>>,
    mana: FxHashMap<ActorId, ManaPool>,
    pending: Vec<Force>,
    backlash: FxHashMap<ActorId, BacklashState>,
    perception: Vec<PerceptionEvent>,
    events: EventQueue,
    next_uid: u32,
    npc_pass_done: bool,
}

impl ForceEconomy {
    /// Create an economy with the standard catalog.
    #[must_use]
    pub fn new(cfg: TuningConfig) -> Self {
        Self {
            cfg,
            catalog: SkillCatalog::standard(),
            profiles: FxHashMap::default(),
            skills: FxHashMap::default(),
            mana: FxHashMap::default(),
            pending: Vec::new(),
            backlash: FxHashMap::default(),
            perception: Vec::new(),
            events: EventQueue::new(),
            next_uid: 0,
            npc_pass_done: false,
        }
    }

    /// Register a roster: resolve skill keys, derive mana pools.
    ///
    /// Unknown skill keys are skipped with a diagnostic - the actor
    /// simply lacks that skill.
    pub fn register_from_config(&mut self, roster: &[ActorConfig]) {
        for actor in roster {
            let level = actor.levels.0.max(actor.levels.1);
            let pool = ManaPool::from_spec(self.cfg.mana_for_level(level));
            self.mana.insert(actor.id, pool);
            self.profiles.insert(
                actor.id,
                ActorProfile { name: actor.name.clone(), is_human: actor.is_human },
            );

            let mut instances = Vec::with_capacity(actor.skills.len());
            for &key in &actor.skills {
                let Some(spec) = self.catalog.resolve(key) else {
                    warn!(actor = %actor.id, ?key, "unknown skill key ignored");
                    continue;
                };
                let uid = SkillUid(self.next_uid);
                self.next_uid += 1;
                instances.push(SkillInstance::from_spec(uid, actor.id, spec));
                self.events.push(EngineEvent::SkillRegistered {
                    owner: actor.id,
                    uid,
                    attribute: key.attribute,
                    tier: key.tier,
                });
            }
            self.skills.insert(actor.id, instances);
        }
    }

    /// Explicitly activate one of `actor`'s skills.
    ///
    /// `target` is consulted only for curse-producing skills.
    pub fn activate_player_skill(
        &mut self,
        actor: ActorId,
        uid: SkillUid,
        target: Option<ActorId>,
    ) -> Result<(), ActivationError> {
        let skill = self
            .skills
            .get(&actor)
            .and_then(|list| list.iter().find(|s| s.uid == uid))
            .cloned()
            .ok_or(ActivationError::NotFound)?;

        if !skill.is_activatable() {
            return Err(ActivationError::NotActiveType);
        }
        if self.backlash.contains_key(&actor) {
            return Err(ActivationError::BacklashActive);
        }
        if skill.cooldown_remaining > 0 {
            return Err(ActivationError::OnCooldown);
        }

        let pool = self.mana.get_mut(&actor).ok_or(ActivationError::NotFound)?;
        if !pool.spend(skill.mana_cost) {
            return Err(ActivationError::InsufficientMana);
        }
        let (current, max) = (pool.current(), pool.max());
        self.events.push(EngineEvent::ManaChanged { owner: actor, current, max });
        if current <= 0.0 {
            self.start_backlash(actor);
        }

        self.apply_activation(actor, uid, &skill, target);
        Ok(())
    }

    /// Run the NPC skill pass for this betting round.
    ///
    /// Executes at most once per round (further calls are no-ops until
    /// `on_round_end`). Human actors, folded actors, cooldowns, and
    /// backlash are all respected; river-phase deal-affecting skills
    /// are skipped outright.
    pub fn npc_decide_skills(
        &mut self,
        ctx: &TableContext,
        policy: &dyn SkillPolicy,
        rng: &mut EngineRng,
    ) -> Vec<NpcActivation> {
        if self.npc_pass_done {
            return Vec::new();
        }
        self.npc_pass_done = true;

        let mut activations = Vec::new();

        let actor_ids: Vec<ActorId> = self.skills.keys().copied().collect();
        for actor in actor_ids {
            if self.profiles.get(&actor).map_or(true, |p| p.is_human) {
                continue;
            }
            if ctx.is_folded(actor) || self.backlash.contains_key(&actor) {
                continue;
            }
            let Some(table) = ctx.actor(actor) else { continue };
            let commitment = table.commitment_ratio();
            let threat = table.threat;

            let candidates: Vec<SkillInstance> = self
                .skills
                .get(&actor)
                .map(|list| {
                    list.iter()
                        .filter(|s| {
                            s.activation == ActivationMode::Active && s.cooldown_remaining == 0
                        })
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();

            for skill in candidates {
                // No cards left to bias on the river.
                if !ctx.phase.cards_remain() && deal_affecting(skill.effect) {
                    continue;
                }
                if !self.mana.get(&actor).map_or(false, |p| p.can_afford(skill.mana_cost)) {
                    continue;
                }

                let likelihood = policy.activation_likelihood(
                    skill.attribute,
                    skill.tier,
                    commitment,
                    threat,
                    ctx.pot,
                );
                if likelihood < skill.threshold || !rng.gen_bool(likelihood) {
                    continue;
                }

                let target = if skill.effect == ForceKind::Curse {
                    match policy.choose_curse_target(skill.tier, actor, &ctx.actors, rng) {
                        Some(t) => Some(t),
                        None => continue,
                    }
                } else {
                    None
                };

                let pool = self.mana.get_mut(&actor).expect("pool registered");
                if !pool.spend(skill.mana_cost) {
                    continue;
                }
                let (current, max) = (pool.current(), pool.max());
                self.events.push(EngineEvent::ManaChanged { owner: actor, current, max });
                if current <= 0.0 {
                    self.start_backlash(actor);
                }

                debug!(actor = %actor, skill = %skill.uid, likelihood, "npc skill activation");
                self.apply_activation(actor, skill.uid, &skill, target);
                activations.push(NpcActivation {
                    owner: actor,
                    uid: skill.uid,
                    attribute: skill.attribute,
                    tier: skill.tier,
                });

                if self.backlash.contains_key(&actor) {
                    break;
                }
            }
        }

        activations
    }

    /// Collect every force bearing on the next reveal.
    ///
    /// Merges the decaying backlash, active passive/toggle skills of
    /// non-folded owners (informational skills tagged power 0), and
    /// this round's pending forces, also filtered for folded owners.
    #[must_use]
    pub fn collect_active_forces(&self, ctx: &TableContext) -> Vec<Force> {
        let mut forces = Vec::new();

        for (&actor, state) in &self.backlash {
            if !ctx.is_folded(actor) {
                forces.push(Force::backlash(actor, state.power));
            }
        }

        for (&actor, list) in &self.skills {
            if ctx.is_folded(actor) {
                continue;
            }
            for skill in list {
                let persistent = matches!(
                    skill.activation,
                    ActivationMode::Passive | ActivationMode::Toggle
                );
                if !persistent || !skill.active {
                    continue;
                }
                forces.push(Force {
                    owner: actor,
                    owner_name: self.name_of(actor),
                    kind: skill.effect,
                    power: if skill.effect.is_informational() { 0.0 } else { skill.power },
                    tier: skill.tier,
                    activation: skill.activation,
                    target: None,
                    attribute: skill.attribute,
                    suppresses_lower: skill.suppresses_lower,
                });
            }
        }

        forces.extend(
            self.pending
                .iter()
                .filter(|f| !ctx.is_folded(f.owner))
                .cloned(),
        );

        forces
    }

    /// Sense-skill owners probe this hand's perception events.
    ///
    /// Each active sense skill detects each foreign activation with
    /// its catalog threshold as the per-event probability; detections
    /// are emitted as events and returned.
    pub fn perception_check(
        &mut self,
        observer: ActorId,
        rng: &mut EngineRng,
    ) -> Vec<PerceptionEvent> {
        let senses: Vec<SkillInstance> = self
            .skills
            .get(&observer)
            .map(|list| {
                list.iter()
                    .filter(|s| s.effect == ForceKind::Sense && s.active)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if senses.is_empty() {
            return Vec::new();
        }

        let mut detected = Vec::new();
        for event in self.perception.clone() {
            if event.source == observer {
                continue;
            }
            // Strongest sense gets the attempt.
            let best = senses
                .iter()
                .map(|s| detection_chance(s.tier, event.tier))
                .fold(0.0f64, f64::max);
            if rng.gen_bool(best) {
                self.events.push(EngineEvent::PerceptionDetected {
                    observer,
                    source: event.source,
                    attribute: event.attribute,
                });
                detected.push(event);
            }
        }
        detected
    }

    /// Round-end lifecycle: regen, toggle reset, cooldowns, backlash
    /// decay. Pending forces survive into the next reveal.
    pub fn on_round_end(&mut self) {
        let actors: Vec<ActorId> = self.mana.keys().copied().collect();
        for actor in actors {
            if let Some(pool) = self.mana.get_mut(&actor) {
                pool.regen();
                let (current, max) = (pool.current(), pool.max());
                self.events.push(EngineEvent::ManaChanged { owner: actor, current, max });
            }
        }

        for list in self.skills.values_mut() {
            for skill in list.iter_mut() {
                if skill.activation == ActivationMode::Toggle {
                    skill.active = false;
                }
                skill.tick_cooldown();
            }
        }

        let floor = self.cfg.backlash.expiry_floor;
        let decay = self.cfg.backlash.decay;
        let mut ended = Vec::new();
        self.backlash.retain(|&actor, state| {
            state.power *= decay;
            if state.power < floor {
                ended.push(actor);
                false
            } else {
                true
            }
        });
        for actor in ended {
            self.events.push(EngineEvent::BacklashEnded { owner: actor });
        }

        self.npc_pass_done = false;
    }

    /// The reveal consumed this round's single-use forces.
    pub fn on_card_revealed(&mut self) {
        self.pending.clear();
    }

    /// New-hand boundary: pending forces and perception events clear,
    /// non-passive skills deactivate, cooldowns clear.
    pub fn on_new_hand(&mut self) {
        self.pending.clear();
        self.perception.clear();
        for list in self.skills.values_mut() {
            for skill in list.iter_mut() {
                skill.reset_for_new_hand();
            }
        }
        self.npc_pass_done = false;
    }

    /// Full reinitialization: mana refilled, backlash cleared, plus
    /// the new-hand reset.
    pub fn reset(&mut self) {
        self.on_new_hand();
        for pool in self.mana.values_mut() {
            pool.refill();
        }
        self.backlash.clear();
        self.events = EventQueue::new();
    }

    /// Drain queued events in emission order.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain()
    }

    /// Current mana for an actor, if registered.
    #[must_use]
    pub fn mana_of(&self, actor: ActorId) -> Option<&ManaPool> {
        self.mana.get(&actor)
    }

    /// An actor's skills, if registered.
    #[must_use]
    pub fn skills_of(&self, actor: ActorId) -> &[SkillInstance] {
        self.skills.get(&actor).map_or(&[], Vec::as_slice)
    }

    /// Whether a backlash currently presses on an actor.
    #[must_use]
    pub fn backlash_active(&self, actor: ActorId) -> bool {
        self.backlash.contains_key(&actor)
    }

    /// Pending single-use forces awaiting the next reveal.
    #[must_use]
    pub fn pending_forces(&self) -> &[Force] {
        &self.pending
    }

    /// Net pending+backlash force power from an actor's point of view:
    /// own fortunes minus curses and backlash aimed at them.
    #[must_use]
    pub fn net_force_power(&self, actor: ActorId) -> f64 {
        let mut net = 0.0;
        for force in &self.pending {
            match force.kind {
                ForceKind::Fortune if force.owner == actor => net += force.power,
                ForceKind::Curse | ForceKind::Backlash if force.target == Some(actor) => {
                    net -= force.power;
                }
                _ => {}
            }
        }
        if let Some(state) = self.backlash.get(&actor) {
            net -= state.power;
        }
        net
    }

    fn name_of(&self, actor: ActorId) -> String {
        self.profiles.get(&actor).map_or_else(String::new, |p| p.name.clone())
    }

    fn start_backlash(&mut self, actor: ActorId) {
        let power = self.cfg.backlash.initial_power;
        self.backlash.insert(actor, BacklashState { power });
        self.events.push(EngineEvent::BacklashStarted { owner: actor, power });
    }

    /// Post-spend effect dispatch, shared by player and NPC paths.
    fn apply_activation(
        &mut self,
        actor: ActorId,
        uid: SkillUid,
        skill: &SkillInstance,
        target: Option<ActorId>,
    ) {
        if let Some(list) = self.skills.get_mut(&actor) {
            if let Some(live) = list.iter_mut().find(|s| s.uid == uid) {
                live.cooldown_remaining = live.cooldown;
                if live.activation == ActivationMode::Toggle {
                    live.active = !live.active;
                } else {
                    live.active = true;
                }
            }
        }

        let name = self.name_of(actor);
        match skill.effect {
            ForceKind::Fortune => {
                self.pending.push(
                    Force::fortune(actor, name, skill.power, skill.tier)
                        .with_suppression(skill.suppresses_lower),
                );
            }
            ForceKind::Curse => {
                if let Some(target) = target {
                    self.pending.push(
                        Force::curse(actor, name, target, skill.power, skill.tier)
                            .with_suppression(skill.suppresses_lower),
                    );
                }
            }
            ForceKind::Reversal => {
                // Rewrite pending curses on the activator into owned
                // fortunes at partial power.
                let retention = self.cfg.opposition.reversal_retention;
                for force in self.pending.iter_mut() {
                    if force.kind == ForceKind::Curse && force.target == Some(actor) {
                        *force = Force::fortune(
                            actor,
                            name.clone(),
                            force.power * retention,
                            force.tier,
                        );
                    }
                }
                self.events
                    .push(EngineEvent::SkillTriggered { owner: actor, kind: ForceKind::Reversal });
            }
            ForceKind::PurgeAll => {
                // Everything foreign is swept; the purge itself stays
                // pending as a record of the sweep.
                self.pending.retain(|f| f.owner == actor);
                self.pending.push(Force {
                    owner: actor,
                    owner_name: name,
                    kind: ForceKind::PurgeAll,
                    power: skill.power,
                    tier: skill.tier,
                    activation: ActivationMode::Active,
                    target: None,
                    attribute: Attribute::Purge,
                    suppresses_lower: false,
                });
                self.events
                    .push(EngineEvent::SkillTriggered { owner: actor, kind: ForceKind::PurgeAll });
            }
            ForceKind::NullField => {
                self.pending.push(Force {
                    owner: actor,
                    owner_name: name,
                    kind: ForceKind::NullField,
                    power: skill.power,
                    tier: skill.tier,
                    activation: ActivationMode::Active,
                    target: None,
                    attribute: Attribute::Null,
                    suppresses_lower: false,
                });
            }
            // Toggles/passives contribute through collect_active_forces.
            ForceKind::Sense | ForceKind::Peek | ForceKind::VoidShield | ForceKind::Backlash => {}
        }

        self.perception.push(PerceptionEvent {
            source: actor,
            attribute: skill.attribute,
            tier: skill.tier,
        });
        self.events.push(EngineEvent::SkillActivated {
            owner: actor,
            uid,
            attribute: skill.attribute,
            tier: skill.tier,
        });
    }
}

/// Whether an effect biases which card appears.
fn deal_affecting(kind: ForceKind) -> bool {
    kind.is_dealing() || matches!(kind, ForceKind::NullField | ForceKind::Reversal | ForceKind::PurgeAll)
}

/// Tier-scaled detection probability: stronger senses see more,
/// stronger sources hide better.
fn detection_chance(sense_tier: u8, source_tier: u8) -> f64 {
    let base = 0.25 + 0.2 * (3 - sense_tier.clamp(1, 3)) as f64;
    let stealth = 0.1 * (3 - source_tier.clamp(1, 3)) as f64;
    (base - stealth).clamp(0.05, 0.9)
}
