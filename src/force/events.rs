//! Engine event surface.
//!
//! The economy records everything noteworthy in an emission-ordered
//! queue that external listeners drain at their leisure. Core
//! correctness never depends on the queue being consumed - an
//! unattended queue just grows until drained or the hand resets.

use serde::{Deserialize, Serialize};

use crate::core::ActorId;

use super::force::{Attribute, ForceKind};
use super::skill::SkillUid;

/// A notification for external listeners (presentation, telemetry).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A roster skill resolved against the catalog.
    SkillRegistered {
        owner: ActorId,
        uid: SkillUid,
        attribute: Attribute,
        tier: u8,
    },
    /// An explicit or NPC activation succeeded.
    SkillActivated {
        owner: ActorId,
        uid: SkillUid,
        attribute: Attribute,
        tier: u8,
    },
    /// A system-driven skill effect fired (reversal rewrite, purge).
    SkillTriggered { owner: ActorId, kind: ForceKind },
    /// An actor's mana changed.
    ManaChanged {
        owner: ActorId,
        current: f64,
        max: f64,
    },
    /// Mana depletion started a backlash against the actor.
    BacklashStarted { owner: ActorId, power: f64 },
    /// The backlash decayed away.
    BacklashEnded { owner: ActorId },
    /// A sensing skill detected another actor's activation.
    PerceptionDetected {
        observer: ActorId,
        source: ActorId,
        attribute: Attribute,
    },
}

/// A record of a skill activation this hand, probabilistically
/// detectable by sensing skills.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerceptionEvent {
    pub source: ActorId,
    pub attribute: Attribute,
    pub tier: u8,
}

/// Emission-ordered event queue with at-least-once delivery.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Vec<EngineEvent>,
}

impl EventQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn push(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    /// Drain all queued events in emission order.
    pub fn drain(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Peek at queued events without consuming them.
    #[must_use]
    pub fn pending(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Number of undrained events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
