//! Capability traits: everything the core needs from the engine.
//!
//! The core never touches a physics world or a navigation mesh directly.
//! Hosts implement these small traits; tests implement them with plain
//! structs.

use glam::Vec3;

use crate::health::Health;
use crate::sound::emitter::EmitterState;
use crate::types::{ActorId, EmitterId, TargetRef};

/// Per-agent navigation: one implementation drives one agent's body.
pub trait NavigationProvider {
    /// Current world position of the agent.
    fn position(&self) -> Vec3;

    /// Current facing direction of the agent.
    fn forward(&self) -> Vec3;

    /// Turn the agent to face `direction` (the host decides how to snap).
    fn face(&mut self, direction: Vec3);

    /// Current movement speed (magnitude of velocity).
    fn velocity(&self) -> f32;

    /// Set the maximum travel speed.
    fn set_speed(&mut self, speed: f32);

    /// Configured maximum travel speed.
    fn speed(&self) -> f32;

    /// Distance from the destination at which the agent stops.
    fn set_stopping_distance(&mut self, distance: f32);

    /// Distance from the destination at which the agent stops.
    fn stopping_distance(&self) -> f32;

    /// Request a path to `destination`. Returns `false` when rejected.
    fn set_destination(&mut self, destination: Vec3) -> bool;

    /// Current destination, if a path is active.
    fn destination(&self) -> Option<Vec3>;

    /// Halt or resume following the current path.
    fn set_stopped(&mut self, stopped: bool);

    /// Drop the current path.
    fn reset_path(&mut self);

    /// Whether the agent has an active path.
    fn has_path(&self) -> bool;

    /// Whether a path request is still being computed.
    fn path_pending(&self) -> bool;

    /// Remaining path distance to the destination.
    fn remaining_distance(&self) -> f32;

    /// Snap `point` to the navigable surface within `max_distance`.
    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3>;

    /// Whether the agent currently stands on the navigable surface.
    fn is_on_nav_surface(&self) -> bool;

    /// Permanently switch the agent's navigation off.
    fn disable(&mut self);

    /// Whether the agent has reached its destination.
    fn has_arrived(&self) -> bool {
        !self.path_pending() && self.remaining_distance() <= self.stopping_distance()
    }
}

/// A tiered emitter visible to an overlap query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterSnapshot {
    /// Which emitter.
    pub id: EmitterId,
    /// Emitter position.
    pub position: Vec3,
    /// Its tier flags this tick.
    pub state: EmitterState,
}

/// What a ray struck first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayHit {
    /// An actor (or one of its parts).
    Actor(ActorId),
    /// Static level geometry.
    Geometry,
}

/// World queries shared by every agent.
pub trait SpatialQueryProvider {
    /// Find the actor carrying classification `tag` (the hunted target).
    fn locate_target(&self, tag: &str) -> Option<TargetRef>;

    /// First thing hit by a ray within `max_distance`, or `None` when the
    /// ray hits nothing.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;

    /// Whether `hit` is `root` itself or one of its child parts.
    fn is_same_or_descendant(&self, hit: ActorId, root: ActorId) -> bool {
        hit == root
    }

    /// All tiered emitters within `radius` of `center`, in any order.
    fn emitters_within(&self, center: Vec3, radius: f32) -> Vec<EmitterSnapshot>;
}

/// How attacks reach their victims.
pub trait DamageTargets {
    /// The victim's health capability, when it has one.
    fn health_of(&mut self, actor: ActorId) -> Option<&mut Health>;

    /// Generic "you were hit" notification for victims without health.
    fn notify_damage(&mut self, actor: ActorId, amount: i32, from: Vec3);
}

/// The public alert interface of an enemy.
///
/// Collaborators (sound bait, spells, damage dealers) talk to an enemy only
/// through this trait.
pub trait AlertSink {
    /// Something noteworthy happened at `point`; investigate it, maybe.
    fn alert_to_position(&mut self, point: Vec3);

    /// Start chasing `target` immediately.
    fn alert_to_target(&mut self, target: TargetRef);

    /// Apply damage received at `hit_point`.
    fn take_damage(&mut self, amount: i32, hit_point: Vec3);

    /// Whether the enemy is alive. Enemies without health never die.
    fn is_alive(&self) -> bool;
}
