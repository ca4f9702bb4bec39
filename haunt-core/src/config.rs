//! Configuration for the Haunt enemy core.
//!
//! Maps directly to `haunt.toml`. Every field has a serde default, so an
//! empty file (or a missing one) yields a playable configuration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{HauntError, Result};
use crate::sound::SoundTier;

/// Top-level Haunt configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HauntConfig {
    /// Perception, movement and combat tuning shared by every enemy.
    #[serde(default)]
    pub agent: AgentSettings,
    /// Player footstep cadence and loudness.
    #[serde(default)]
    pub footsteps: FootstepConfig,
    /// Tick loop settings.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Logging and diagnostics.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl HauntConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `HauntError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| HauntError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load from `path` when it exists, otherwise fall back to defaults.
    ///
    /// # Errors
    /// Returns an error only if the file exists but cannot be read or parsed.
    pub fn from_file_or_default(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            warn!(path = %path.display(), "Config file missing, using defaults");
            Ok(Self::default())
        }
    }
}

// ---------------------------------------------------------------------------
// Agent settings
// ---------------------------------------------------------------------------

/// Immutable tuning shared by many agents.
///
/// Authored once, loaded at agent initialisation, never mutated at runtime.
/// Share it with [`AgentSettings::shared`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Whether the agent can see at all. Blind agents rely on hearing only.
    #[serde(default = "default_true")]
    pub sight_enabled: bool,
    /// Full field-of-view angle in degrees.
    #[serde(default = "default_sight_fov")]
    pub sight_fov_deg: f32,
    /// Maximum sight distance.
    #[serde(default = "default_sight_range")]
    pub sight_range: f32,
    /// Height of the eyes above the agent's feet, used as ray origin.
    #[serde(default = "default_eye_height")]
    pub eye_height: f32,
    /// Classification tag of the actor this agent hunts.
    #[serde(default = "default_target_tag")]
    pub target_tag: String,

    /// Hearing radius for Low-tier emissions.
    #[serde(default = "default_low_hearing")]
    pub low_hearing_range: f32,
    /// Hearing radius for Normal-tier emissions.
    #[serde(default = "default_normal_hearing")]
    pub normal_hearing_range: f32,
    /// Hearing radius for High-tier emissions.
    #[serde(default = "default_high_hearing")]
    pub high_hearing_range: f32,
    /// Sound tags this agent reacts to on the broadcast bus.
    #[serde(default = "default_hearing_tags")]
    pub hearing_tags: Vec<String>,

    /// Seconds the last known position stays relevant.
    #[serde(default = "default_memory_time")]
    pub memory_time: f32,

    /// Patrol / roam speed.
    #[serde(default = "default_patrol_speed")]
    pub patrol_speed: f32,
    /// Chase / investigate speed.
    #[serde(default = "default_chase_speed")]
    pub chase_speed: f32,
    /// How close to a destination before stopping.
    #[serde(default = "default_stopping_distance")]
    pub stopping_distance: f32,

    /// Melee attack range.
    #[serde(default = "default_attack_range")]
    pub attack_range: f32,
    /// Seconds between attacks.
    #[serde(default = "default_attack_cooldown")]
    pub attack_cooldown: f32,
    /// Damage per attack.
    #[serde(default = "default_attack_damage")]
    pub attack_damage: i32,

    /// Chance (0–1) to investigate a stimulus rather than ignore it.
    #[serde(default = "default_investigate_chance")]
    pub investigate_chance: f32,
    /// How close to a patrol / roam point before it counts as reached.
    #[serde(default = "default_patrol_tolerance")]
    pub patrol_point_tolerance: f32,

    /// Roam randomly when no patrol route exists.
    #[serde(default = "default_true")]
    pub random_roam: bool,
    /// Roam radius around the spawn point.
    #[serde(default = "default_roam_radius")]
    pub roam_radius: f32,
    /// Max distance a sampled roam point may be snapped to the nav surface.
    #[serde(default = "default_roam_sample_distance")]
    pub roam_sample_distance: f32,
    /// Sampling attempts per roam pick before waiting and retrying.
    #[serde(default = "default_roam_sample_attempts")]
    pub roam_sample_attempts: u32,
    /// Seconds before an unreached roam point is abandoned.
    #[serde(default = "default_roam_travel_timeout")]
    pub roam_travel_timeout: f32,
    /// Minimum wait between roam picks.
    #[serde(default = "default_roam_wait_min")]
    pub roam_wait_min: f32,
    /// Maximum wait between roam picks.
    #[serde(default = "default_roam_wait_max")]
    pub roam_wait_max: f32,

    /// Displacement rate (units/s) under which the agent counts as stuck.
    #[serde(default = "default_stuck_threshold")]
    pub stuck_threshold: f32,
    /// Seconds of being stuck before the path is reissued.
    #[serde(default = "default_stuck_timeout")]
    pub stuck_timeout: f32,

    /// Footstep cue interval while patrolling.
    #[serde(default = "default_roam_footstep_interval")]
    pub roam_footstep_interval: f32,
    /// Footstep cue interval while chasing / investigating.
    #[serde(default = "default_chase_footstep_interval")]
    pub chase_footstep_interval: f32,

    /// Starting volume of the investigate warning loop.
    #[serde(default = "default_1_0")]
    pub investigate_loop_volume: f32,
    /// Fade-out time of the investigate warning loop.
    #[serde(default = "default_investigate_fade")]
    pub investigate_fade_time: f32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            sight_enabled: true,
            sight_fov_deg: 90.0,
            sight_range: 20.0,
            eye_height: 0.8,
            target_tag: "Player".to_string(),
            low_hearing_range: 3.0,
            normal_hearing_range: 8.0,
            high_hearing_range: 12.0,
            hearing_tags: default_hearing_tags(),
            memory_time: 6.0,
            patrol_speed: 1.8,
            chase_speed: 4.5,
            stopping_distance: 1.2,
            attack_range: 1.6,
            attack_cooldown: 1.5,
            attack_damage: 20,
            investigate_chance: 0.9,
            patrol_point_tolerance: 0.5,
            random_roam: true,
            roam_radius: 10.0,
            roam_sample_distance: 2.0,
            roam_sample_attempts: 5,
            roam_travel_timeout: 12.0,
            roam_wait_min: 1.5,
            roam_wait_max: 4.0,
            stuck_threshold: 0.5,
            stuck_timeout: 2.0,
            roam_footstep_interval: 0.6,
            chase_footstep_interval: 0.3,
            investigate_loop_volume: 1.0,
            investigate_fade_time: 1.2,
        }
    }
}

impl AgentSettings {
    /// Wrap in an `Arc` for sharing between agents.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Hearing radius for a given tier.
    #[must_use]
    pub fn hearing_radius(&self, tier: SoundTier) -> f32 {
        match tier {
            SoundTier::Low => self.low_hearing_range,
            SoundTier::Normal => self.normal_hearing_range,
            SoundTier::High => self.high_hearing_range,
        }
    }

    /// Largest of the three hearing radii, used for the overlap query.
    #[must_use]
    pub fn max_hearing_radius(&self) -> f32 {
        self.low_hearing_range
            .max(self.normal_hearing_range)
            .max(self.high_hearing_range)
    }

    /// Check every field and report the first unusable one.
    ///
    /// # Errors
    /// Returns `HauntError::InvalidSettings` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        match self.problems().into_iter().next() {
            Some((field, reason)) => Err(HauntError::InvalidSettings { field, reason }),
            None => Ok(()),
        }
    }

    /// Replace every unusable value with a safe default, logging each fix.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        for (field, reason) in self.problems() {
            warn!(field, %reason, "Degrading invalid agent setting");
        }

        let positive = |v: f32, d: f32| if v.is_finite() && v > 0.0 { v } else { d };
        let non_negative = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };

        self.sight_fov_deg = if self.sight_fov_deg.is_finite() {
            self.sight_fov_deg.clamp(0.0, 360.0)
        } else {
            defaults.sight_fov_deg
        };
        self.sight_range = positive(self.sight_range, defaults.sight_range);
        self.eye_height = non_negative(self.eye_height);
        self.low_hearing_range = positive(self.low_hearing_range, defaults.low_hearing_range);
        self.normal_hearing_range =
            positive(self.normal_hearing_range, defaults.normal_hearing_range);
        self.high_hearing_range = positive(self.high_hearing_range, defaults.high_hearing_range);
        self.memory_time = non_negative(self.memory_time);
        self.patrol_speed = positive(self.patrol_speed, defaults.patrol_speed);
        self.chase_speed = positive(self.chase_speed, defaults.chase_speed);
        self.stopping_distance = non_negative(self.stopping_distance);
        self.attack_range = positive(self.attack_range, defaults.attack_range);
        self.attack_cooldown = non_negative(self.attack_cooldown);
        self.attack_damage = self.attack_damage.max(0);
        self.investigate_chance = if self.investigate_chance.is_finite() {
            self.investigate_chance.clamp(0.0, 1.0)
        } else {
            defaults.investigate_chance
        };
        self.patrol_point_tolerance =
            positive(self.patrol_point_tolerance, defaults.patrol_point_tolerance);
        self.roam_radius = positive(self.roam_radius, defaults.roam_radius);
        self.roam_sample_distance =
            positive(self.roam_sample_distance, defaults.roam_sample_distance);
        self.roam_sample_attempts = self.roam_sample_attempts.max(1);
        self.roam_travel_timeout = positive(self.roam_travel_timeout, defaults.roam_travel_timeout);
        self.roam_wait_min = non_negative(self.roam_wait_min);
        self.roam_wait_max = non_negative(self.roam_wait_max);
        if self.roam_wait_min > self.roam_wait_max {
            std::mem::swap(&mut self.roam_wait_min, &mut self.roam_wait_max);
        }
        self.stuck_threshold = non_negative(self.stuck_threshold);
        self.stuck_timeout = positive(self.stuck_timeout, defaults.stuck_timeout);
        self.roam_footstep_interval =
            positive(self.roam_footstep_interval, defaults.roam_footstep_interval);
        self.chase_footstep_interval =
            positive(self.chase_footstep_interval, defaults.chase_footstep_interval);
        self.investigate_loop_volume = if self.investigate_loop_volume.is_finite() {
            self.investigate_loop_volume.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.investigate_fade_time = non_negative(self.investigate_fade_time);
        self
    }

    fn problems(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        let mut positive = |field: &'static str, v: f32| {
            if !(v.is_finite() && v > 0.0) {
                out.push((field, format!("must be a positive number, got {v}")));
            }
        };
        positive("sight_range", self.sight_range);
        positive("low_hearing_range", self.low_hearing_range);
        positive("normal_hearing_range", self.normal_hearing_range);
        positive("high_hearing_range", self.high_hearing_range);
        positive("patrol_speed", self.patrol_speed);
        positive("chase_speed", self.chase_speed);
        positive("attack_range", self.attack_range);
        positive("patrol_point_tolerance", self.patrol_point_tolerance);
        positive("roam_radius", self.roam_radius);
        positive("roam_sample_distance", self.roam_sample_distance);
        positive("roam_travel_timeout", self.roam_travel_timeout);
        positive("stuck_timeout", self.stuck_timeout);
        positive("roam_footstep_interval", self.roam_footstep_interval);
        positive("chase_footstep_interval", self.chase_footstep_interval);

        if !(0.0..=360.0).contains(&self.sight_fov_deg) {
            out.push(("sight_fov_deg", format!("must be within 0..=360, got {}", self.sight_fov_deg)));
        }
        if !(0.0..=1.0).contains(&self.investigate_chance) {
            out.push((
                "investigate_chance",
                format!("must be within 0..=1, got {}", self.investigate_chance),
            ));
        }
        if !(self.memory_time.is_finite() && self.memory_time >= 0.0) {
            out.push(("memory_time", format!("must be non-negative, got {}", self.memory_time)));
        }
        if !(self.attack_cooldown.is_finite() && self.attack_cooldown >= 0.0) {
            out.push((
                "attack_cooldown",
                format!("must be non-negative, got {}", self.attack_cooldown),
            ));
        }
        if self.attack_damage < 0 {
            out.push(("attack_damage", format!("must be non-negative, got {}", self.attack_damage)));
        }
        if self.roam_sample_attempts == 0 {
            out.push(("roam_sample_attempts", "must be at least 1".to_string()));
        }
        if self.roam_wait_min > self.roam_wait_max {
            out.push((
                "roam_wait_min",
                format!("{} exceeds roam_wait_max {}", self.roam_wait_min, self.roam_wait_max),
            ));
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Player footstep cadence and loudness per gait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootstepConfig {
    /// Seconds between steps while walking.
    #[serde(default = "default_walk_interval")]
    pub walk_interval: f32,
    /// Seconds between steps while sprinting.
    #[serde(default = "default_sprint_interval")]
    pub sprint_interval: f32,
    /// Seconds between steps while crouching.
    #[serde(default = "default_crouch_interval")]
    pub crouch_interval: f32,
    /// Playback volume while walking.
    #[serde(default = "default_walk_volume")]
    pub walk_volume: f32,
    /// Playback volume while sprinting.
    #[serde(default = "default_1_0")]
    pub sprint_volume: f32,
    /// Playback volume while crouching.
    #[serde(default = "default_crouch_volume")]
    pub crouch_volume: f32,
    /// How long each step keeps its hearing tier flag raised.
    #[serde(default = "default_sound_duration")]
    pub sound_duration: f32,
}

impl Default for FootstepConfig {
    fn default() -> Self {
        Self {
            walk_interval: 0.5,
            sprint_interval: 0.35,
            crouch_interval: 0.8,
            walk_volume: 0.6,
            sprint_volume: 1.0,
            crouch_volume: 0.3,
            sound_duration: 0.2,
        }
    }
}

/// Tick loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Fixed ticks per second.
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: u32,
    /// Base RNG seed; each agent derives its own stream from it.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Wall-clock budget per tick in milliseconds.
    #[serde(default = "default_frame_budget")]
    pub frame_budget_ms: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            seed: 0x5EED,
            frame_budget_ms: 2.0,
        }
    }
}

impl SimulationConfig {
    /// Seconds per fixed tick. A zero tick rate falls back to 60 Hz.
    #[must_use]
    pub fn dt(&self) -> f32 {
        let hz = if self.tick_rate_hz == 0 { 60 } else { self.tick_rate_hz };
        1.0 / hz as f32
    }
}

/// Logging and diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,
    /// Log any tick exceeding this many milliseconds.
    #[serde(default = "default_slow_tick")]
    pub log_slow_ticks_ms: f64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            log_slow_ticks_ms: 5.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_target_tag() -> String { "Player".to_string() }
fn default_hearing_tags() -> Vec<String> { vec!["Player".to_string(), "Noise".to_string()] }
fn default_log_level() -> String { "info".to_string() }
fn default_sight_fov() -> f32 { 90.0 }
fn default_sight_range() -> f32 { 20.0 }
fn default_eye_height() -> f32 { 0.8 }
fn default_low_hearing() -> f32 { 3.0 }
fn default_normal_hearing() -> f32 { 8.0 }
fn default_high_hearing() -> f32 { 12.0 }
fn default_memory_time() -> f32 { 6.0 }
fn default_patrol_speed() -> f32 { 1.8 }
fn default_chase_speed() -> f32 { 4.5 }
fn default_stopping_distance() -> f32 { 1.2 }
fn default_attack_range() -> f32 { 1.6 }
fn default_attack_cooldown() -> f32 { 1.5 }
fn default_attack_damage() -> i32 { 20 }
fn default_investigate_chance() -> f32 { 0.9 }
fn default_patrol_tolerance() -> f32 { 0.5 }
fn default_roam_radius() -> f32 { 10.0 }
fn default_roam_sample_distance() -> f32 { 2.0 }
fn default_roam_sample_attempts() -> u32 { 5 }
fn default_roam_travel_timeout() -> f32 { 12.0 }
fn default_roam_wait_min() -> f32 { 1.5 }
fn default_roam_wait_max() -> f32 { 4.0 }
fn default_stuck_threshold() -> f32 { 0.5 }
fn default_stuck_timeout() -> f32 { 2.0 }
fn default_roam_footstep_interval() -> f32 { 0.6 }
fn default_chase_footstep_interval() -> f32 { 0.3 }
fn default_investigate_fade() -> f32 { 1.2 }
fn default_walk_interval() -> f32 { 0.5 }
fn default_sprint_interval() -> f32 { 0.35 }
fn default_crouch_interval() -> f32 { 0.8 }
fn default_walk_volume() -> f32 { 0.6 }
fn default_crouch_volume() -> f32 { 0.3 }
fn default_sound_duration() -> f32 { 0.2 }
fn default_1_0() -> f32 { 1.0 }
fn default_tick_rate() -> u32 { 60 }
fn default_seed() -> u64 { 0x5EED }
fn default_frame_budget() -> f64 { 2.0 }
fn default_slow_tick() -> f64 { 5.0 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = HauntConfig::from_toml("").expect("parse");
        assert_eq!(config.agent, AgentSettings::default());
        assert_eq!(config.simulation.tick_rate_hz, 60);
    }

    #[test]
    fn partial_agent_section_keeps_other_defaults() {
        let config = HauntConfig::from_toml(
            r#"
            [agent]
            sight_range = 35.0
            hearing_tags = ["Noise"]
            "#,
        )
        .expect("parse");
        assert!((config.agent.sight_range - 35.0).abs() < f32::EPSILON);
        assert!((config.agent.memory_time - 6.0).abs() < f32::EPSILON);
        assert_eq!(config.agent.hearing_tags, vec!["Noise".to_string()]);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = HauntConfig::from_toml("[agent\nsight_range = ").expect_err("should fail");
        assert!(matches!(err, HauntError::Config(_)));
    }

    #[test]
    fn defaults_validate() {
        assert!(AgentSettings::default().validate().is_ok());
    }

    #[test]
    fn negative_radius_is_rejected() {
        let settings = AgentSettings {
            high_hearing_range: -1.0,
            ..AgentSettings::default()
        };
        let err = settings.validate().expect_err("should fail");
        assert!(matches!(
            err,
            HauntError::InvalidSettings { field: "high_hearing_range", .. }
        ));
    }

    #[test]
    fn sanitize_degrades_to_safe_values() {
        let settings = AgentSettings {
            sight_range: 0.0,
            normal_hearing_range: f32::NAN,
            investigate_chance: 3.0,
            roam_wait_min: 5.0,
            roam_wait_max: 1.0,
            roam_sample_attempts: 0,
            ..AgentSettings::default()
        }
        .sanitized();

        assert!(settings.validate().is_ok());
        assert!((settings.sight_range - 20.0).abs() < f32::EPSILON);
        assert!((settings.normal_hearing_range - 8.0).abs() < f32::EPSILON);
        assert!((settings.investigate_chance - 1.0).abs() < f32::EPSILON);
        assert!(settings.roam_wait_min <= settings.roam_wait_max);
        assert_eq!(settings.roam_sample_attempts, 1);
    }

    #[test]
    fn max_hearing_radius_picks_largest() {
        let settings = AgentSettings {
            low_hearing_range: 15.0,
            ..AgentSettings::default()
        };
        assert!((settings.max_hearing_radius() - 15.0).abs() < f32::EPSILON);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config =
            HauntConfig::from_file_or_default(&dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(config.agent, AgentSettings::default());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("haunt.toml");
        std::fs::write(&path, "[simulation]\ntick_rate_hz = 30\n").expect("write");
        let config = HauntConfig::from_file(&path).expect("load");
        assert_eq!(config.simulation.tick_rate_hz, 30);
        assert!((config.simulation.dt() - 1.0 / 30.0).abs() < 1e-6);
    }
}
