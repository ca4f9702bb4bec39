//! Perception: per-agent sight and tiered hearing.
//!
//! Evaluated once per tick, in priority order:
//!
//! 1. **Sight**: the designated target within range, inside the field of
//!    view, and the first thing an eye-height ray hits. Short-circuits.
//! 2. **Hearing**: the first nearby emitter with a raised tier whose
//!    distance is within that tier's hearing radius (inclusive).
//! 3. Nothing.

use glam::Vec3;
use tracing::trace;

use crate::config::AgentSettings;
use crate::providers::{EmitterSnapshot, RayHit, SpatialQueryProvider};
use crate::sound::SoundTier;
use crate::types::{Pose, TargetRef, angle_between_deg};

/// Distances below this count as "on top of the agent".
const CONTACT_DISTANCE: f32 = 1e-4;

/// What one perception tick concluded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerceptionOutcome {
    /// The target is in plain sight.
    TargetAcquired(TargetRef),
    /// A noise worth checking was heard at this position.
    AlertToPosition(Vec3),
    /// Nothing noticed.
    NoTarget,
}

/// Per-agent sensor state. Mutated only by [`Perception::tick`].
#[derive(Debug, Clone, Default)]
pub struct Perception {
    target: Option<TargetRef>,
    last_outcome: Option<PerceptionOutcome>,
}

impl Perception {
    /// A sensor that has seen nothing yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the last tick saw the target.
    #[must_use]
    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    /// The target seen on the last tick. `None` whenever `has_target` is false.
    #[must_use]
    pub fn target(&self) -> Option<TargetRef> {
        self.target
    }

    /// Outcome of the last tick.
    #[must_use]
    pub fn last_outcome(&self) -> Option<PerceptionOutcome> {
        self.last_outcome
    }

    /// Run one perception pass.
    pub fn tick<S>(&mut self, pose: &Pose, settings: &AgentSettings, spatial: &S) -> PerceptionOutcome
    where
        S: SpatialQueryProvider + ?Sized,
    {
        self.target = None;

        let outcome = if let Some(target) = Self::look(pose, settings, spatial) {
            self.target = Some(target);
            PerceptionOutcome::TargetAcquired(target)
        } else if let Some(point) = Self::listen(pose, settings, spatial) {
            PerceptionOutcome::AlertToPosition(point)
        } else {
            PerceptionOutcome::NoTarget
        };

        self.last_outcome = Some(outcome);
        outcome
    }

    fn look<S>(pose: &Pose, settings: &AgentSettings, spatial: &S) -> Option<TargetRef>
    where
        S: SpatialQueryProvider + ?Sized,
    {
        if !settings.sight_enabled {
            return None;
        }
        let target = spatial.locate_target(&settings.target_tag)?;
        can_see(pose, target, settings, spatial).then_some(target)
    }

    fn listen<S>(pose: &Pose, settings: &AgentSettings, spatial: &S) -> Option<Vec3>
    where
        S: SpatialQueryProvider + ?Sized,
    {
        spatial
            .emitters_within(pose.position, settings.max_hearing_radius())
            .iter()
            .find(|emitter| heard_tier(pose.position, emitter, settings).is_some())
            .map(|emitter| {
                trace!(position = %emitter.position, "Emitter heard");
                emitter.position
            })
    }
}

/// Full sight test: range, field of view, then an unobstructed ray from eye
/// height whose first hit is the target (or part of it). The ray is always
/// cast, even for a target standing on the agent or at its eye.
pub fn can_see<S>(pose: &Pose, target: TargetRef, settings: &AgentSettings, spatial: &S) -> bool
where
    S: SpatialQueryProvider + ?Sized,
{
    let to_target = target.position - pose.position;
    if to_target.length() > settings.sight_range {
        return false;
    }
    if to_target.length() > CONTACT_DISTANCE
        && angle_between_deg(pose.forward, to_target) > settings.sight_fov_deg * 0.5
    {
        return false;
    }

    let eye = pose.position + Vec3::Y * settings.eye_height;
    let direction = (target.position - eye)
        .try_normalize()
        .or_else(|| to_target.try_normalize())
        .or_else(|| pose.forward.try_normalize())
        .unwrap_or(Vec3::Z);
    match spatial.raycast(eye, direction, settings.sight_range) {
        Some(RayHit::Actor(hit)) => spatial.is_same_or_descendant(hit, target.actor),
        Some(RayHit::Geometry) | None => false,
    }
}

/// Loudest raised tier of `emitter` that reaches a listener at `listener`.
#[must_use]
pub fn heard_tier(listener: Vec3, emitter: &EmitterSnapshot, settings: &AgentSettings) -> Option<SoundTier> {
    let distance = listener.distance(emitter.position);
    SoundTier::LOUDEST_FIRST
        .into_iter()
        .find(|&tier| emitter.state.is_emitting(tier) && distance <= settings.hearing_radius(tier))
}
