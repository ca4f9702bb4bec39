//! Non-enemy actors: the scripted player and world noise sources.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use haunt_core::config::FootstepConfig;
use haunt_core::health::Health;
use haunt_core::providers::EmitterSnapshot;
use haunt_core::sound::footsteps::Footstep;
use haunt_core::sound::{FootstepCadence, Gait, SoundBait, SoundTier, TieredEmitter};
use haunt_core::types::{ActorId, EmitterId, TargetRef};

use crate::geometry::Aabb;

/// Player collider half width.
pub const PLAYER_HALF_WIDTH: f32 = 0.4;
/// Player collider height.
pub const PLAYER_HEIGHT: f32 = 1.8;

/// One leg of the player's scripted walk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// Where to go.
    pub to: Vec3,
    /// How to get there.
    #[serde(default = "default_gait")]
    pub gait: Gait,
}

fn default_gait() -> Gait {
    Gait::Walk
}

/// Player movement speeds per gait.
fn gait_speed(gait: Gait) -> f32 {
    match gait {
        Gait::Still => 0.0,
        Gait::Walk => 2.0,
        Gait::Sprint => 5.0,
        Gait::Crouch => 1.0,
    }
}

/// The hunted actor: walks a script, makes footstep noise, takes hits.
#[derive(Debug, Clone)]
pub struct Player {
    actor: ActorId,
    emitter_id: EmitterId,
    position: Vec3,
    legs: Vec<Leg>,
    leg: usize,
    gait: Gait,
    cadence: FootstepCadence,
    emitter: TieredEmitter,
    health: Health,
    damage_log: Vec<i32>,
}

impl Player {
    /// A player at `position` following `legs` in order.
    #[must_use]
    pub fn new(position: Vec3, legs: Vec<Leg>, max_health: i32, footsteps: FootstepConfig) -> Self {
        Self {
            actor: ActorId::new(),
            emitter_id: EmitterId::new(),
            position,
            legs,
            leg: 0,
            gait: Gait::Still,
            cadence: FootstepCadence::new(footsteps),
            emitter: TieredEmitter::new(),
            health: Health::new(max_health).with_despawn_delay(None),
            damage_log: Vec::new(),
        }
    }

    /// Actor id.
    #[must_use]
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// Feet position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Gait on the last step.
    #[must_use]
    pub fn gait(&self) -> Gait {
        self.gait
    }

    /// Hit points.
    #[must_use]
    pub fn health(&self) -> &Health {
        &self.health
    }

    /// Mutable hit points, for attack delivery.
    pub fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }

    /// Hits delivered without a health lookup.
    #[must_use]
    pub fn damage_log(&self) -> &[i32] {
        &self.damage_log
    }

    /// Record a generic hit notification.
    pub fn notify_hit(&mut self, amount: i32) {
        self.damage_log.push(amount);
    }

    /// Weak reference for perception.
    #[must_use]
    pub fn target_ref(&self) -> TargetRef {
        TargetRef::new(self.actor, self.position)
    }

    /// Body collider.
    #[must_use]
    pub fn collider(&self) -> Aabb {
        Aabb::standing(self.position, PLAYER_HALF_WIDTH, PLAYER_HEIGHT)
    }

    /// Footstep emitter as seen by perception.
    #[must_use]
    pub fn emitter_snapshot(&self) -> EmitterSnapshot {
        EmitterSnapshot {
            id: self.emitter_id,
            position: self.position,
            state: self.emitter.state(),
        }
    }

    /// Walk the script for `dt` seconds. Returns the footstep that landed.
    pub fn step(&mut self, dt: f32) -> Option<Footstep> {
        self.emitter.advance(dt);
        if !self.health.is_alive() {
            self.gait = Gait::Still;
            return None;
        }

        self.gait = match self.legs.get(self.leg).copied() {
            Some(leg) => {
                let to_goal = leg.to - self.position;
                let travel = gait_speed(leg.gait) * dt;
                if to_goal.length() <= travel {
                    self.position = leg.to;
                    self.leg += 1;
                } else if let Some(dir) = to_goal.try_normalize() {
                    self.position += dir * travel;
                }
                leg.gait
            }
            None => Gait::Still,
        };

        let step = self.cadence.advance(self.gait, dt, &mut self.emitter);
        if let Some(step) = step {
            debug!(tier = ?step.tier, position = %self.position, "Player footstep");
        }
        step
    }
}

/// A fixed noise source that raises one tier on a period (a radio, a
/// dripping pipe, a thrown bottle that keeps rolling).
#[derive(Debug, Clone)]
pub struct NoiseSource {
    id: EmitterId,
    position: Vec3,
    tier: SoundTier,
    period: f32,
    duration: f32,
    clock: f32,
    emitter: TieredEmitter,
}

impl NoiseSource {
    /// Emit `tier` for `duration` every `period` seconds at `position`.
    #[must_use]
    pub fn new(position: Vec3, tier: SoundTier, period: f32, duration: f32) -> Self {
        Self {
            id: EmitterId::new(),
            position,
            tier,
            period: period.max(0.05),
            duration,
            clock: 0.0,
            emitter: TieredEmitter::new(),
        }
    }

    /// Advance one tick.
    pub fn step(&mut self, dt: f32) {
        self.emitter.advance(dt);
        self.clock -= dt;
        if self.clock <= 0.0 {
            self.emitter.emit(self.tier, self.duration);
            self.clock += self.period;
        }
    }

    /// Perception view.
    #[must_use]
    pub fn snapshot(&self) -> EmitterSnapshot {
        EmitterSnapshot {
            id: self.id,
            position: self.position,
            state: self.emitter.state(),
        }
    }
}

/// A live sound bait with its perception id.
#[derive(Debug, Clone)]
pub struct PlacedBait {
    id: EmitterId,
    bait: SoundBait,
}

impl PlacedBait {
    /// Throw a bait to `position`.
    #[must_use]
    pub fn new(bait: SoundBait) -> Self {
        Self {
            id: EmitterId::new(),
            bait,
        }
    }

    /// Advance one tick. Returns `false` once expired.
    pub fn step(&mut self, dt: f32) -> bool {
        self.bait.advance(dt)
    }

    /// Perception view.
    #[must_use]
    pub fn snapshot(&self) -> EmitterSnapshot {
        EmitterSnapshot {
            id: self.id,
            position: self.bait.position(),
            state: self.bait.emitter().state(),
        }
    }

    /// Fade level.
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.bait.volume()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_follows_script() {
        let legs = vec![
            Leg {
                to: Vec3::new(0.0, 0.0, 2.0),
                gait: Gait::Walk,
            },
            Leg {
                to: Vec3::new(5.0, 0.0, 2.0),
                gait: Gait::Sprint,
            },
        ];
        let mut player = Player::new(Vec3::ZERO, legs, 100, FootstepConfig::default());
        let mut tiers = Vec::new();
        for _ in 0..40 {
            if let Some(step) = player.step(0.1) {
                tiers.push(step.tier);
            }
        }
        assert_eq!(player.position(), Vec3::new(5.0, 0.0, 2.0));
        assert_eq!(player.gait(), Gait::Still);
        assert!(tiers.contains(&SoundTier::Normal));
        assert!(tiers.contains(&SoundTier::High));
    }

    #[test]
    fn dead_player_stands_still() {
        let legs = vec![Leg {
            to: Vec3::new(0.0, 0.0, 10.0),
            gait: Gait::Walk,
        }];
        let mut player = Player::new(Vec3::ZERO, legs, 10, FootstepConfig::default());
        player.health_mut().take_damage(10, Vec3::ZERO);
        player.step(1.0);
        assert_eq!(player.position(), Vec3::ZERO);
    }

    #[test]
    fn noise_source_pulses() {
        let mut noise = NoiseSource::new(Vec3::ZERO, SoundTier::Normal, 1.0, 0.2);
        noise.step(0.1);
        assert!(noise.snapshot().state.normal);
        noise.step(0.3);
        assert!(!noise.snapshot().state.normal);
        noise.step(0.7);
        assert!(noise.snapshot().state.normal);
    }
}
