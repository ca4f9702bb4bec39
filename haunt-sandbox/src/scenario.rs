//! Scenario files: a level, its enemies, the player's script and timed
//! world events, all in one TOML document.
//!
//! ```toml
//! name = "corridor"
//! duration = 12.0
//!
//! [[walls]]
//! min = [-1.0, 0.0, 4.0]
//! max = [1.0, 3.0, 5.0]
//!
//! [[enemies]]
//! position = [0.0, 0.0, 10.0]
//! facing = [0.0, 0.0, -1.0]
//! route = { waypoints = [[0.0, 0.0, 10.0], [6.0, 0.0, 10.0]], mode = "ping_pong" }
//!
//! [[events]]
//! at = 3.0
//! kind = "bait"
//! position = [2.0, 0.0, 2.0]
//! ```

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use haunt_core::config::AgentSettings;
use haunt_core::error::{HauntError, Result};
use haunt_core::metrics::spans;
use haunt_core::patrol::PatrolRoute;
use haunt_core::sound::SoundTier;
use haunt_core::sound::bait::BAIT_LIFETIME;

use crate::actors::Leg;
use crate::geometry::Aabb;

/// A complete sandbox scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Display name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Simulated seconds to run.
    #[serde(default = "default_duration")]
    pub duration: f32,
    /// Static level geometry.
    #[serde(default)]
    pub walls: Vec<Aabb>,
    /// The hunted player, if any.
    #[serde(default)]
    pub player: Option<PlayerSpec>,
    /// Enemies to spawn.
    #[serde(default)]
    pub enemies: Vec<EnemySpec>,
    /// Periodic noise sources.
    #[serde(default)]
    pub noises: Vec<NoiseSpec>,
    /// Timed one-off events.
    #[serde(default)]
    pub events: Vec<EventSpec>,
}

/// Player placement and walk script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSpec {
    /// Starting position.
    pub position: Vec3,
    /// Hit points.
    #[serde(default = "default_player_health")]
    pub health: i32,
    /// Legs walked in order.
    #[serde(default)]
    pub legs: Vec<Leg>,
}

/// One enemy to spawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpec {
    /// Spawn position.
    pub position: Vec3,
    /// Initial facing.
    #[serde(default = "default_facing")]
    pub facing: Vec3,
    /// Patrol route. Without one the enemy idles (or roams, if enabled).
    #[serde(default)]
    pub route: Option<PatrolRoute>,
    /// Hit points. Without them the enemy cannot die.
    #[serde(default)]
    pub health: Option<i32>,
    /// Seconds before a dead body despawns. A negative value keeps it.
    #[serde(default = "default_despawn")]
    pub despawn_after: Option<f32>,
    /// Scare the player on every landed hit.
    #[serde(default)]
    pub jumpscare: bool,
    /// Per-enemy tuning replacing the shared `[agent]` settings.
    #[serde(default)]
    pub settings: Option<AgentSettings>,
}

/// A periodic noise source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseSpec {
    /// Where it sits.
    pub position: Vec3,
    /// Tier raised on each pulse.
    pub tier: SoundTier,
    /// Seconds between pulses.
    pub period: f32,
    /// How long each pulse lasts.
    #[serde(default = "default_noise_duration")]
    pub duration: f32,
}

/// A timed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSpec {
    /// Simulated time the event fires at.
    pub at: f32,
    /// What happens.
    #[serde(flatten)]
    pub kind: EventKind,
}

/// What a timed event does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// Broadcast a sound through the world's bus.
    Sound {
        /// Where.
        origin: Vec3,
        /// Hearing radius.
        radius: f32,
        /// Source classification.
        #[serde(default = "default_sound_tag")]
        tag: String,
    },
    /// Throw a sound bait.
    Bait {
        /// Where it lands.
        position: Vec3,
        /// How long it lasts.
        #[serde(default = "default_bait_lifetime")]
        lifetime: f32,
    },
    /// Damage one enemy (by spawn index).
    Damage {
        /// Index into `enemies`.
        enemy: usize,
        /// Hit points removed.
        amount: i32,
        /// Where the hit landed.
        #[serde(default)]
        hit_point: Vec3,
    },
    /// Alert one enemy to a position (a spell, a scripted distraction).
    Alert {
        /// Index into `enemies`.
        enemy: usize,
        /// Where to look.
        position: Vec3,
    },
    /// Force one enemy to chase the player.
    Reveal {
        /// Index into `enemies`.
        enemy: usize,
    },
}

impl Scenario {
    /// Parse a scenario from TOML.
    ///
    /// # Errors
    /// Returns `HauntError::Config` when the TOML does not parse or an
    /// event points at an enemy that does not exist.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let _span = info_span!(spans::SCENARIO_LOAD).entered();
        let mut scenario: Self = toml::from_str(toml_str).map_err(|e| HauntError::Config(e.to_string()))?;
        scenario.check()?;
        scenario.events.sort_by(|a, b| a.at.total_cmp(&b.at));
        info!(
            name = %scenario.name,
            enemies = scenario.enemies.len(),
            events = scenario.events.len(),
            "Scenario loaded"
        );
        Ok(scenario)
    }

    /// Load a scenario file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    fn check(&mut self) -> Result<()> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(HauntError::Config(format!(
                "scenario duration must be positive, got {}",
                self.duration
            )));
        }
        for event in &self.events {
            let enemy = match event.kind {
                EventKind::Damage { enemy, .. } | EventKind::Alert { enemy, .. } | EventKind::Reveal { enemy } => {
                    Some(enemy)
                }
                EventKind::Sound { .. } | EventKind::Bait { .. } => None,
            };
            if let Some(index) = enemy
                && index >= self.enemies.len()
            {
                return Err(HauntError::Config(format!(
                    "event at {}s targets enemy #{index}, but only {} are defined",
                    event.at,
                    self.enemies.len()
                )));
            }
        }
        for (i, enemy) in self.enemies.iter_mut().enumerate() {
            if let Some(settings) = enemy.settings.take() {
                if settings.validate().is_err() {
                    warn!(enemy = i, "Enemy settings invalid, sanitizing");
                }
                enemy.settings = Some(settings.sanitized());
            }
        }
        Ok(())
    }
}

fn default_name() -> String { "untitled".to_string() }
fn default_duration() -> f32 { 10.0 }
fn default_player_health() -> i32 { 100 }
fn default_facing() -> Vec3 { Vec3::Z }
fn default_despawn() -> Option<f32> { Some(haunt_core::health::DEFAULT_DESPAWN_DELAY) }
fn default_noise_duration() -> f32 { 0.2 }
fn default_sound_tag() -> String { "Noise".to_string() }
fn default_bait_lifetime() -> f32 { BAIT_LIFETIME }
