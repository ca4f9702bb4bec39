//! Melee attack: range- and cooldown-gated damage.

use glam::Vec3;
use tracing::debug;

use crate::config::AgentSettings;
use crate::cue::Cue;
use crate::providers::DamageTargets;
use crate::timer::{Cooldown, Task};
use crate::types::{ActorId, TargetRef};

/// Result of one [`Attack::try_attack`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    /// Attacking has been switched off for good.
    Disabled,
    /// Still cooling down from the previous hit.
    CoolingDown,
    /// Nobody to attack.
    NoTarget,
    /// The target is further than the attack range.
    OutOfRange,
    /// Damage was delivered.
    Landed {
        /// Who was hit.
        victim: ActorId,
        /// Whether the victim's health reached zero.
        killed: bool,
    },
}

/// Attack capability of one agent.
#[derive(Debug, Clone)]
pub struct Attack {
    enabled: bool,
    cooldown: Cooldown,
    range: f32,
    damage: i32,
    jumpscare: bool,
}

impl Attack {
    /// An attack using the range, damage and cooldown from `settings`.
    #[must_use]
    pub fn new(settings: &AgentSettings) -> Self {
        Self {
            enabled: true,
            cooldown: Cooldown::new(settings.attack_cooldown),
            range: settings.attack_range,
            damage: settings.attack_damage,
            jumpscare: false,
        }
    }

    /// Builder: emit a [`Cue::Jumpscare`] with every landed hit.
    #[must_use]
    pub fn with_jumpscare(mut self, enabled: bool) -> Self {
        self.jumpscare = enabled;
        self
    }

    /// Whether the attack can still ever fire.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the cooldown has elapsed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.enabled && self.cooldown.is_ready()
    }

    /// Hit `target` if it is in range and the cooldown allows it.
    pub fn try_attack<D>(
        &mut self,
        from: Vec3,
        target: Option<TargetRef>,
        targets: &mut D,
        cues: &mut Vec<Cue>,
    ) -> AttackOutcome
    where
        D: DamageTargets + ?Sized,
    {
        if !self.enabled {
            return AttackOutcome::Disabled;
        }
        if !self.cooldown.is_ready() {
            return AttackOutcome::CoolingDown;
        }
        let Some(target) = target else {
            return AttackOutcome::NoTarget;
        };
        if from.distance(target.position) > self.range {
            return AttackOutcome::OutOfRange;
        }

        let victim = target.actor;
        let killed = match targets.health_of(victim) {
            Some(health) => health.take_damage(self.damage, from),
            None => {
                targets.notify_damage(victim, self.damage, from);
                false
            }
        };
        debug!(%victim, damage = self.damage, killed, "Attack landed");

        cues.push(Cue::AttackLanded {
            victim,
            damage: self.damage,
        });
        if self.jumpscare {
            cues.push(Cue::Jumpscare { victim });
        }
        self.cooldown.trigger();
        AttackOutcome::Landed { victim, killed }
    }

    /// Tick the cooldown.
    pub fn advance(&mut self, dt: f32) {
        self.cooldown.advance(dt);
    }

    /// Switch attacking off permanently.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.cooldown.cancel();
    }
}
