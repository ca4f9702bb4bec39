//! Sound propagation: how noise reaches enemies.
//!
//! Two channels feed perception:
//!
//! - **Broadcast**: a [`SoundEvent`] (origin, radius, tag) pushed through a
//!   world-owned [`SoundBus`] to every subscribed listener synchronously.
//!   Hearing is a hard threshold at the emitter's radius, no falloff curve.
//! - **Tiered flags**: a [`TieredEmitter`] raises Low / Normal / High flags
//!   for a short time; perception polls them each tick against per-tier
//!   hearing radii. Overlapping emissions simply coexist.

pub mod bait;
pub mod emitter;
pub mod footsteps;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{HauntError, Result};
use crate::types::ActorId;

pub use bait::SoundBait;
pub use emitter::TieredEmitter;
pub use footsteps::{FootstepCadence, Gait};

// ---------------------------------------------------------------------------
// Tiers and tags
// ---------------------------------------------------------------------------

/// Discrete loudness class of a tiered emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SoundTier {
    /// Crouching, careful movement.
    Low,
    /// Walking, ordinary interaction.
    Normal,
    /// Sprinting, spell casts, bait.
    High,
}

impl SoundTier {
    /// All tiers, loudest first. Perception scans in this order.
    pub const LOUDEST_FIRST: [Self; 3] = [Self::High, Self::Normal, Self::Low];

    /// Dense index for per-tier arrays.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Low => 0,
            Self::Normal => 1,
            Self::High => 2,
        }
    }
}

/// Classification tag of whatever made a noise (e.g. `"Player"`, `"Noise"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundTag(pub String);

impl SoundTag {
    /// Create a tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SoundTag {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SoundTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// SoundEvent
// ---------------------------------------------------------------------------

/// One broadcast noise. Ephemeral: emitted, delivered, discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundEvent {
    /// Where the noise happened.
    pub origin: Vec3,
    /// Hard hearing radius (> 0).
    pub radius: f32,
    /// Classification of the source.
    pub tag: SoundTag,
    /// The emitting actor, for identification only.
    pub source: Option<ActorId>,
}

impl SoundEvent {
    /// Create a sound event.
    ///
    /// # Errors
    /// Returns `HauntError::InvalidSound` when the radius is not a positive
    /// finite number or the origin is not finite.
    pub fn new(origin: Vec3, radius: f32, tag: impl Into<SoundTag>) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(HauntError::InvalidSound(format!(
                "radius must be positive, got {radius}"
            )));
        }
        if !origin.is_finite() {
            return Err(HauntError::InvalidSound(format!("origin is not finite: {origin}")));
        }
        Ok(Self {
            origin,
            radius,
            tag: tag.into(),
            source: None,
        })
    }

    /// Attach the emitting actor.
    #[must_use]
    pub fn from_actor(mut self, source: ActorId) -> Self {
        self.source = Some(source);
        self
    }

    /// Whether a listener at `position` hears this event (inclusive radius).
    #[must_use]
    pub fn reaches(&self, position: Vec3) -> bool {
        position.distance(self.origin) <= self.radius
    }
}

// ---------------------------------------------------------------------------
// SoundBus
// ---------------------------------------------------------------------------

/// Something that can receive broadcast sounds.
pub trait SoundListener {
    /// Where the listener's ears are right now.
    fn listener_position(&self) -> Vec3;

    /// Called synchronously for every event the listener can hear.
    fn on_sound(&mut self, event: &SoundEvent);
}

/// An explicit sound subject scoped to one simulation world.
///
/// Listeners register with the tags they care about; emitting delivers to
/// every matching listener within the event radius in the same call.
#[derive(Debug, Clone)]
pub struct SoundBus<K> {
    subscribers: HashMap<K, HashSet<SoundTag>>,
}

impl<K> Default for SoundBus<K> {
    fn default() -> Self {
        Self {
            subscribers: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> SoundBus<K> {
    /// An empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for the given tags, replacing any earlier filter.
    pub fn subscribe<I, T>(&mut self, listener: K, tags: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<SoundTag>,
    {
        self.subscribers
            .insert(listener, tags.into_iter().map(Into::into).collect());
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, listener: K) -> bool {
        self.subscribers.remove(&listener).is_some()
    }

    /// Whether `listener` is registered.
    #[must_use]
    pub fn is_subscribed(&self, listener: K) -> bool {
        self.subscribers.contains_key(&listener)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Listeners that would hear `event`, given a way to locate them.
    /// Listeners that cannot be located are skipped.
    pub fn recipients<F>(&self, event: &SoundEvent, mut position_of: F) -> Vec<K>
    where
        F: FnMut(K) -> Option<Vec3>,
    {
        self.subscribers
            .iter()
            .filter(|(_, tags)| tags.contains(&event.tag))
            .filter_map(|(&key, _)| {
                position_of(key)
                    .filter(|&pos| event.reaches(pos))
                    .map(|_| key)
            })
            .collect()
    }

    /// Deliver `event` to every matching listener in `listeners`.
    ///
    /// Returns how many listeners heard it. Delivery order is unspecified.
    pub fn emit<L: SoundListener>(&self, event: &SoundEvent, listeners: &mut HashMap<K, L>) -> usize {
        let mut delivered = 0;
        for (key, tags) in &self.subscribers {
            if !tags.contains(&event.tag) {
                continue;
            }
            let Some(listener) = listeners.get_mut(key) else {
                continue;
            };
            if event.reaches(listener.listener_position()) {
                listener.on_sound(event);
                delivered += 1;
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ear {
        position: Vec3,
        heard: Vec<Vec3>,
    }

    impl SoundListener for Ear {
        fn listener_position(&self) -> Vec3 {
            self.position
        }

        fn on_sound(&mut self, event: &SoundEvent) {
            self.heard.push(event.origin);
        }
    }

    fn ear(x: f32) -> Ear {
        Ear {
            position: Vec3::new(x, 0.0, 0.0),
            heard: Vec::new(),
        }
    }

    #[test]
    fn rejects_non_positive_radius() {
        assert!(SoundEvent::new(Vec3::ZERO, 0.0, "Noise").is_err());
        assert!(SoundEvent::new(Vec3::ZERO, -3.0, "Noise").is_err());
        assert!(SoundEvent::new(Vec3::ZERO, f32::NAN, "Noise").is_err());
    }

    #[test]
    fn boundary_distance_is_heard() {
        let ev = SoundEvent::new(Vec3::ZERO, 5.0, "Noise").expect("valid");
        assert!(ev.reaches(Vec3::new(5.0, 0.0, 0.0)));
        assert!(!ev.reaches(Vec3::new(5.001, 0.0, 0.0)));
    }

    #[test]
    fn emit_filters_by_tag_and_radius() {
        let mut bus = SoundBus::new();
        bus.subscribe(1_u32, ["Player", "Noise"]);
        bus.subscribe(2_u32, ["Noise"]);
        bus.subscribe(3_u32, ["Player"]);

        let mut ears = HashMap::from([(1_u32, ear(2.0)), (2_u32, ear(20.0)), (3_u32, ear(1.0))]);

        let ev = SoundEvent::new(Vec3::ZERO, 8.0, "Noise").expect("valid");
        let delivered = bus.emit(&ev, &mut ears);

        assert_eq!(delivered, 1);
        assert_eq!(ears[&1].heard.len(), 1, "in range and tagged");
        assert!(ears[&2].heard.is_empty(), "out of range");
        assert!(ears[&3].heard.is_empty(), "not listening for Noise");
    }

    #[test]
    fn unsubscribed_listeners_hear_nothing() {
        let mut bus = SoundBus::new();
        bus.subscribe(7_u32, ["Noise"]);
        assert!(bus.unsubscribe(7));
        assert!(!bus.unsubscribe(7));

        let mut ears = HashMap::from([(7_u32, ear(0.0))]);
        let ev = SoundEvent::new(Vec3::ZERO, 8.0, "Noise").expect("valid");
        assert_eq!(bus.emit(&ev, &mut ears), 0);
        assert!(bus.is_empty());
    }

    #[test]
    fn recipients_skip_unlocatable_listeners() {
        let mut bus = SoundBus::new();
        bus.subscribe('a', ["Noise"]);
        bus.subscribe('b', ["Noise"]);
        let ev = SoundEvent::new(Vec3::ZERO, 4.0, "Noise").expect("valid");
        let heard = bus.recipients(&ev, |k| (k == 'a').then_some(Vec3::X));
        assert_eq!(heard, vec!['a']);
    }

    #[test]
    fn separate_buses_are_isolated() {
        let mut a = SoundBus::new();
        let b: SoundBus<u32> = SoundBus::new();
        a.subscribe(1_u32, ["Noise"]);
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 0);
    }
}
