//! Core type definitions shared by every Haunt module.
//!
//! Positions are `glam::Vec3` in world units with `+Y` up.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Unique identifier for one enemy agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    /// Create a new random agent ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for any actor the core can perceive or hit
/// (the player, props, other agents' bodies).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    /// Create a new random actor ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a tiered sound emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmitterId(pub Uuid);

impl EmitterId {
    /// Create a new random emitter ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EmitterId {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Spatial
// ---------------------------------------------------------------------------

/// A weak reference to a perceived actor: its identity plus the position it
/// had when it was last sampled. Holding one never keeps the actor alive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRef {
    /// Which actor.
    pub actor: ActorId,
    /// World position at sampling time.
    pub position: Vec3,
}

impl TargetRef {
    /// Create a target reference.
    #[must_use]
    pub fn new(actor: ActorId, position: Vec3) -> Self {
        Self { actor, position }
    }
}

/// Position and facing of an agent for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// World position (feet).
    pub position: Vec3,
    /// Facing direction. Not required to be normalised.
    pub forward: Vec3,
}

impl Pose {
    /// Create a pose.
    #[must_use]
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::Z,
        }
    }
}

/// Angle in degrees between two directions. Zero-length inputs yield `0.0`.
#[must_use]
pub fn angle_between_deg(a: Vec3, b: Vec3) -> f32 {
    let (Some(a), Some(b)) = (a.try_normalize(), b.try_normalize()) else {
        return 0.0;
    };
    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Project a point onto the horizontal plane at `height`.
#[must_use]
pub fn flatten_to(point: Vec3, height: f32) -> Vec3 {
    Vec3::new(point.x, height, point.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_between_axes() {
        assert!((angle_between_deg(Vec3::Z, Vec3::X) - 90.0).abs() < 1e-3);
        assert!(angle_between_deg(Vec3::Z, Vec3::Z).abs() < 1e-3);
        assert!((angle_between_deg(Vec3::Z, -Vec3::Z) - 180.0).abs() < 1e-3);
    }

    #[test]
    fn angle_with_zero_vector_is_zero() {
        assert_eq!(angle_between_deg(Vec3::ZERO, Vec3::X), 0.0);
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(AgentId::new(), AgentId::new());
        assert_ne!(ActorId::new(), ActorId::new());
    }
}
