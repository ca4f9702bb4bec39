//! The sandbox world: owns every actor and runs the fixed-step frame.
//!
//! ## Frame order
//!
//! 1. Fire timed events that are due (broadcast sounds, baits, damage, alerts)
//! 2. Step the player, noise sources and baits
//! 3. Snapshot the world for perception (target, colliders, emitters)
//! 4. Tick every enemy in spawn order, then move its body
//! 5. Drain cues into the log and remove despawned enemies

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec3;
use ordered_float::OrderedFloat;
use serde::Serialize;
use tracing::{debug, info, info_span, trace_span, warn};

use haunt_core::config::{AgentSettings, HauntConfig};
use haunt_core::controller::{AgentSnapshot, EnemyController};
use haunt_core::cue::Cue;
use haunt_core::error::{HauntError, Result};
use haunt_core::health::Health;
use haunt_core::metrics::{AiCounters, CounterSnapshot, FrameBudgetMonitor, FramePercentiles, spans};
use haunt_core::providers::{AlertSink, DamageTargets, EmitterSnapshot, RayHit, SpatialQueryProvider};
use haunt_core::sound::{SoundBait, SoundBus, SoundEvent};
use haunt_core::types::{ActorId, AgentId, Pose, TargetRef};

use crate::actors::{NoiseSource, PlacedBait, Player};
use crate::geometry::Aabb;
use crate::nav::KinematicAgent;
use crate::scenario::{EventKind, EventSpec, Scenario};

/// Classification tag carried by the sandbox player.
pub const PLAYER_TAG: &str = "Player";

// ---------------------------------------------------------------------------
// Perception view
// ---------------------------------------------------------------------------

/// Read-only snapshot of the world that enemies perceive during one frame.
#[derive(Debug, Clone)]
pub struct WorldView<'a> {
    walls: &'a [Aabb],
    player: Option<(TargetRef, Aabb)>,
    emitters: Vec<EmitterSnapshot>,
}

impl<'a> WorldView<'a> {
    /// A view over `walls` with an optional live player and the raised
    /// emitters of this frame.
    #[must_use]
    pub fn new(walls: &'a [Aabb], player: Option<(TargetRef, Aabb)>, emitters: Vec<EmitterSnapshot>) -> Self {
        Self {
            walls,
            player,
            emitters,
        }
    }
}

impl SpatialQueryProvider for WorldView<'_> {
    fn locate_target(&self, tag: &str) -> Option<TargetRef> {
        if tag != PLAYER_TAG {
            return None;
        }
        self.player.map(|(target, _)| target)
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let direction = direction.try_normalize()?;
        let walls = self
            .walls
            .iter()
            .filter_map(|wall| wall.ray_hit(origin, direction, max_distance))
            .map(|t| (t, RayHit::Geometry));
        let body = self.player.and_then(|(target, collider)| {
            collider
                .ray_hit(origin, direction, max_distance)
                .map(|t| (t, RayHit::Actor(target.actor)))
        });
        walls
            .chain(body)
            .min_by_key(|(t, _)| OrderedFloat(*t))
            .map(|(_, hit)| hit)
    }

    fn emitters_within(&self, center: Vec3, radius: f32) -> Vec<EmitterSnapshot> {
        self.emitters
            .iter()
            .filter(|e| e.position.distance(center) <= radius)
            .copied()
            .collect()
    }
}

/// Attack delivery into the sandbox player.
#[derive(Debug, Default)]
pub struct PlayerTargets<'a> {
    player: Option<&'a mut Player>,
}

impl<'a> PlayerTargets<'a> {
    /// Deliver hits to `player`, if there is one.
    #[must_use]
    pub fn new(player: Option<&'a mut Player>) -> Self {
        Self { player }
    }
}

impl DamageTargets for PlayerTargets<'_> {
    fn health_of(&mut self, actor: ActorId) -> Option<&mut Health> {
        self.player
            .as_deref_mut()
            .filter(|p| p.actor() == actor)
            .map(Player::health_mut)
    }

    fn notify_damage(&mut self, actor: ActorId, amount: i32, _from: Vec3) {
        if let Some(player) = self.player.as_deref_mut().filter(|p| p.actor() == actor) {
            player.notify_hit(amount);
        }
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// A cue stamped with when and who.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CueRecord {
    /// Simulated time.
    pub time: f32,
    /// Emitting enemy.
    pub agent: AgentId,
    /// The cue.
    pub cue: Cue,
}

/// The player's end state.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerReport {
    /// Final position.
    pub position: Vec3,
    /// Final hit points.
    pub health: i32,
    /// Whether the player survived.
    pub alive: bool,
}

/// Outcome of a scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Scenario name.
    pub scenario: String,
    /// Simulated seconds.
    pub simulated_seconds: f32,
    /// Frames run.
    pub frames: u64,
    /// AI event counters.
    pub counters: CounterSnapshot,
    /// Frame timing.
    pub frame_timing: FramePercentiles,
    /// Frame budget in milliseconds.
    pub frame_budget_ms: f64,
    /// Enemies still in the world.
    pub enemies: Vec<AgentSnapshot>,
    /// The player, if the scenario had one.
    pub player: Option<PlayerReport>,
    /// Every cue emitted, when requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cues: Vec<CueRecord>,
}

impl SimulationReport {
    /// Short human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{}: {:.1}s in {} frames\n{}\n",
            self.scenario,
            self.simulated_seconds,
            self.frames,
            self.frame_timing.summary(self.frame_budget_ms)
        );
        for enemy in &self.enemies {
            out.push_str(&format!(
                "  enemy {} {:<11} at ({:.1}, {:.1}, {:.1}) hp={}\n",
                enemy.id,
                enemy.state.to_string(),
                enemy.position.x,
                enemy.position.y,
                enemy.position.z,
                enemy.health.map_or_else(|| "-".to_string(), |h| h.to_string()),
            ));
        }
        if let Some(player) = &self.player {
            out.push_str(&format!(
                "  player hp={} {}\n",
                player.health,
                if player.alive { "alive" } else { "dead" }
            ));
        }
        out
    }
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// One sandbox world built from a [`Scenario`].
#[derive(Debug)]
pub struct World {
    name: String,
    duration: f32,
    dt: f32,
    slow_tick_ms: f64,
    walls: Vec<Aabb>,
    player: Option<Player>,
    noises: Vec<NoiseSource>,
    baits: Vec<PlacedBait>,
    bus: SoundBus<AgentId>,
    enemies: HashMap<AgentId, EnemyController>,
    bodies: HashMap<AgentId, KinematicAgent>,
    spawned: Vec<AgentId>,
    events: Vec<EventSpec>,
    next_event: usize,
    counters: Arc<AiCounters>,
    monitor: FrameBudgetMonitor,
    time: f32,
    frames: u64,
    record_cues: bool,
    cue_log: Vec<CueRecord>,
}

impl World {
    /// Build the world described by `scenario` using `config` for shared
    /// tuning, footsteps and the tick loop.
    ///
    /// # Errors
    /// Returns `HauntError::Config` when the configured tick produces an
    /// unusable time step.
    pub fn from_scenario(scenario: &Scenario, config: &HauntConfig) -> Result<Self> {
        let dt = config.simulation.dt();
        if !(dt.is_finite() && dt > 0.0) {
            return Err(HauntError::Config(format!("invalid tick rate {}", config.simulation.tick_rate_hz)));
        }

        let shared = config.agent.clone().sanitized().shared();
        let counters = Arc::new(AiCounters::new());
        let mut bus = SoundBus::new();
        let mut enemies = HashMap::with_capacity(scenario.enemies.len());
        let mut bodies = HashMap::with_capacity(scenario.enemies.len());
        let mut spawned = Vec::with_capacity(scenario.enemies.len());

        for (index, spec) in scenario.enemies.iter().enumerate() {
            let settings: Arc<AgentSettings> = spec.settings.clone().map_or_else(|| Arc::clone(&shared), Arc::new);
            let mut enemy = EnemyController::new(
                Arc::clone(&settings),
                Pose::new(spec.position, spec.facing),
                agent_seed(config.simulation.seed, index),
            )
            .with_jumpscare(spec.jumpscare)
            .with_counters(Arc::clone(&counters));
            if let Some(route) = spec.route.clone() {
                enemy = enemy.with_route(route);
            }
            if let Some(max) = spec.health {
                enemy = enemy.with_health(Health::new(max).with_despawn_delay(spec.despawn_after));
            }

            let id = enemy.id();
            bus.subscribe(id, settings.hearing_tags.iter().map(String::as_str));
            bodies.insert(id, KinematicAgent::new(spec.position, spec.facing, scenario.walls.clone()));
            enemies.insert(id, enemy);
            spawned.push(id);
        }

        let player = scenario
            .player
            .as_ref()
            .map(|p| Player::new(p.position, p.legs.clone(), p.health, config.footsteps.clone()));
        let noises = scenario
            .noises
            .iter()
            .map(|n| NoiseSource::new(n.position, n.tier, n.period, n.duration))
            .collect();

        info!(
            scenario = %scenario.name,
            enemies = spawned.len(),
            walls = scenario.walls.len(),
            dt,
            "World built"
        );

        Ok(Self {
            name: scenario.name.clone(),
            duration: scenario.duration,
            dt,
            slow_tick_ms: config.telemetry.log_slow_ticks_ms,
            walls: scenario.walls.clone(),
            player,
            noises,
            baits: Vec::new(),
            bus,
            enemies,
            bodies,
            spawned,
            events: scenario.events.clone(),
            next_event: 0,
            counters,
            monitor: FrameBudgetMonitor::new(config.simulation.frame_budget_ms),
            time: 0.0,
            frames: 0,
            record_cues: false,
            cue_log: Vec::new(),
        })
    }

    /// Builder: keep every drained cue for the report. Off by default, in
    /// which case cues are drained and dropped each frame.
    #[must_use]
    pub fn with_cue_log(mut self, record: bool) -> Self {
        self.record_cues = record;
        self
    }

    /// Simulated time so far.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Whether the scenario has run its full duration.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.time >= self.duration
    }

    /// The enemy spawned `index`-th, while it is still in the world.
    #[must_use]
    pub fn enemy(&self, index: usize) -> Option<&EnemyController> {
        self.spawned.get(index).and_then(|id| self.enemies.get(id))
    }

    /// Body of the enemy spawned `index`-th.
    #[must_use]
    pub fn body(&self, index: usize) -> Option<&KinematicAgent> {
        self.spawned.get(index).and_then(|id| self.bodies.get(id))
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    /// Shared AI counters.
    #[must_use]
    pub fn counters(&self) -> &AiCounters {
        &self.counters
    }

    /// Every cue emitted so far, when the cue log is on.
    #[must_use]
    pub fn cues(&self) -> &[CueRecord] {
        &self.cue_log
    }

    /// Broadcast `event` to every subscribed enemy in range. Returns how many
    /// heard it.
    pub fn emit_sound(&mut self, event: &SoundEvent) -> usize {
        let _span = trace_span!(spans::SOUND_EMIT, tag = %event.tag).entered();
        let heard = self.bus.emit(event, &mut self.enemies);
        debug!(origin = %event.origin, radius = event.radius, heard, "Sound broadcast");
        heard
    }

    /// Run one fixed frame.
    pub fn step(&mut self) {
        let dt = self.dt;
        let started = Instant::now();
        {
            let _span = info_span!(spans::FRAME, frame = self.frames).entered();
            self.fire_due_events();
            self.step_actors(dt);
            self.tick_enemies(dt);
            self.collect_cues();
        }
        let took = started.elapsed().as_secs_f64() * 1000.0;
        self.monitor.record(took);
        self.time += dt;
        self.frames += 1;

        if took > self.slow_tick_ms {
            warn!(frame = self.frames, took_ms = took, "Slow frame");
        }
    }

    /// Run until the scenario duration elapses.
    pub fn run(&mut self) {
        while !self.is_finished() {
            self.step();
        }
        info!(scenario = %self.name, frames = self.frames, "Scenario finished");
    }

    /// Summarise the run. Cues are included when the cue log is on.
    #[must_use]
    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            scenario: self.name.clone(),
            simulated_seconds: self.time,
            frames: self.frames,
            counters: self.counters.snapshot(),
            frame_timing: self.monitor.percentiles(),
            frame_budget_ms: self.monitor.budget_ms(),
            enemies: self
                .spawned
                .iter()
                .filter_map(|id| self.enemies.get(id))
                .map(EnemyController::snapshot)
                .collect(),
            player: self.player.as_ref().map(|p| PlayerReport {
                position: p.position(),
                health: p.health().current(),
                alive: p.health().is_alive(),
            }),
            cues: self.cue_log.clone(),
        }
    }

    fn fire_due_events(&mut self) {
        while let Some(event) = self.events.get(self.next_event) {
            if event.at > self.time {
                break;
            }
            let kind = event.kind.clone();
            self.next_event += 1;
            self.apply_event(kind);
        }
    }

    fn apply_event(&mut self, kind: EventKind) {
        debug!(time = self.time, ?kind, "Scenario event");
        match kind {
            EventKind::Sound { origin, radius, tag } => match SoundEvent::new(origin, radius, tag.as_str()) {
                Ok(event) => {
                    self.emit_sound(&event);
                }
                Err(e) => warn!(error = %e, "Skipping sound event"),
            },
            EventKind::Bait { position, lifetime } => {
                self.baits.push(PlacedBait::new(SoundBait::new(position, lifetime)));
            }
            EventKind::Damage {
                enemy,
                amount,
                hit_point,
            } => {
                match self.enemy_mut(enemy) {
                    Ok(target) => target.take_damage(amount, hit_point),
                    Err(e) => warn!(enemy, error = %e, "Skipping damage event"),
                }
            }
            EventKind::Alert { enemy, position } => {
                match self.enemy_mut(enemy) {
                    Ok(target) => target.alert_to_position(position),
                    Err(e) => warn!(enemy, error = %e, "Skipping alert event"),
                }
            }
            EventKind::Reveal { enemy } => {
                let Some(seen) = self.player.as_ref().map(Player::target_ref) else {
                    warn!(enemy, "Reveal without a player");
                    return;
                };
                match self.enemy_mut(enemy) {
                    Ok(target) => target.alert_to_target(seen),
                    Err(e) => warn!(enemy, error = %e, "Skipping reveal event"),
                }
            }
        }
    }

    /// The enemy spawned `index`-th, for scenario events.
    ///
    /// # Errors
    /// Returns `HauntError::UnknownAgent` once that enemy has despawned, and
    /// `HauntError::Config` for an index no enemy was spawned at.
    fn enemy_mut(&mut self, index: usize) -> Result<&mut EnemyController> {
        let id = *self
            .spawned
            .get(index)
            .ok_or_else(|| HauntError::Config(format!("no enemy #{index} in this scenario")))?;
        self.enemies.get_mut(&id).ok_or(HauntError::UnknownAgent(id))
    }

    fn step_actors(&mut self, dt: f32) {
        if let Some(player) = self.player.as_mut() {
            player.step(dt);
        }
        for noise in &mut self.noises {
            noise.step(dt);
        }
        self.baits.retain_mut(|bait| bait.step(dt));
    }

    fn tick_enemies(&mut self, dt: f32) {
        let player = self
            .player
            .as_ref()
            .filter(|p| p.health().is_alive())
            .map(|p| (p.target_ref(), p.collider()));
        let emitters = self
            .player
            .iter()
            .map(Player::emitter_snapshot)
            .chain(self.noises.iter().map(NoiseSource::snapshot))
            .chain(self.baits.iter().map(PlacedBait::snapshot))
            .filter(|e| e.state.low || e.state.normal || e.state.high)
            .collect();
        let view = WorldView::new(&self.walls, player, emitters);
        let mut targets = PlayerTargets::new(self.player.as_mut());

        for id in &self.spawned {
            let (Some(enemy), Some(body)) = (self.enemies.get_mut(id), self.bodies.get_mut(id)) else {
                continue;
            };
            enemy.tick(dt, body, &view, &mut targets);
            body.step(dt);
        }
    }

    fn collect_cues(&mut self) {
        let mut gone = Vec::new();
        for id in &self.spawned {
            let Some(enemy) = self.enemies.get_mut(id) else {
                continue;
            };
            let cues = enemy.drain_cues();
            if self.record_cues {
                self.cue_log.extend(cues.into_iter().map(|cue| CueRecord {
                    time: self.time,
                    agent: *id,
                    cue,
                }));
            }
            if enemy.is_despawned() {
                gone.push(*id);
            }
        }
        for id in gone {
            self.enemies.remove(&id);
            self.bodies.remove(&id);
            self.bus.unsubscribe(id);
            info!(agent = %id, "Enemy removed from world");
        }
    }
}

/// Per-agent random stream derived from the world seed.
fn agent_seed(base: u64, index: usize) -> u64 {
    base ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
