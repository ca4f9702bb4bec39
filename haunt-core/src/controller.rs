//! Enemy controller: the per-agent behavior state machine.
//!
//! One [`EnemyController::tick`] runs, in order:
//!
//! 1. death check (terminal)
//! 2. perception (sight, then tiered hearing)
//! 3. state decision from the perception outcome and memory
//! 4. state execution (movement intent, attack)
//! 5. timed tasks (attack cooldown, movement, audio fade, despawn)
//!
//! Collaborators outside the tick reach the agent only through
//! [`AlertSink`] and [`SoundListener`].

use std::fmt;
use std::sync::Arc;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace_span};

use crate::attack::{Attack, AttackOutcome};
use crate::config::AgentSettings;
use crate::cue::Cue;
use crate::health::Health;
use crate::memory::MemoryState;
use crate::metrics::{AiCounters, spans};
use crate::movement::Movement;
use crate::patrol::PatrolRoute;
use crate::perception::{Perception, PerceptionOutcome};
use crate::providers::{AlertSink, DamageTargets, NavigationProvider, SpatialQueryProvider};
use crate::sound::{SoundEvent, SoundListener};
use crate::timer::{Countdown, Fade, Task};
use crate::types::{AgentId, Pose, TargetRef, flatten_to};

// ---------------------------------------------------------------------------
// Behavior State
// ---------------------------------------------------------------------------

/// High-level behavior of an agent. `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorState {
    /// Standing still.
    #[default]
    Idle,
    /// Walking a route or roaming.
    Patrol,
    /// Heading for a remembered position.
    Investigate,
    /// Running after the target.
    Chase,
    /// In range and hitting the target.
    Attack,
    /// Gone for good.
    Dead,
}

impl BehaviorState {
    /// Stable integer code for animator parameters.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Patrol => 1,
            Self::Investigate => 2,
            Self::Chase => 3,
            Self::Attack => 4,
            Self::Dead => 5,
        }
    }
}

impl fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Patrol => "patrol",
            Self::Investigate => "investigate",
            Self::Chase => "chase",
            Self::Attack => "attack",
            Self::Dead => "dead",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Investigate Loop
// ---------------------------------------------------------------------------

/// The looping "I'm coming for you" sound played while investigating.
#[derive(Debug, Clone, Default)]
struct InvestigateLoop {
    playing: bool,
    volume: f32,
    fade: Option<Fade>,
}

impl InvestigateLoop {
    fn start(&mut self, volume: f32, cues: &mut Vec<Cue>) {
        self.fade = None;
        self.playing = true;
        self.volume = volume;
        cues.push(Cue::InvestigateLoopStarted { volume });
    }

    fn fade_out(&mut self, duration: f32) {
        if self.playing && self.fade.is_none() {
            self.fade = Some(Fade::out(self.volume, duration));
        }
    }

    fn advance(&mut self, dt: f32, cues: &mut Vec<Cue>) {
        let Some(fade) = self.fade.as_mut() else {
            return;
        };
        let finished = fade.advance(dt);
        self.volume = fade.volume();
        if finished {
            self.fade = None;
            self.playing = false;
            cues.push(Cue::InvestigateLoopStopped);
        } else {
            cues.push(Cue::InvestigateLoopVolume { volume: self.volume });
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Debug view of one agent, serialisable to JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSnapshot {
    /// Agent id.
    pub id: AgentId,
    /// Current state.
    pub state: BehaviorState,
    /// Animator code of `state`.
    pub state_code: u8,
    /// Last sampled position.
    pub position: Vec3,
    /// Remembered position, if any.
    pub last_known: Option<Vec3>,
    /// Seconds since the memory was refreshed.
    pub time_since_seen: f32,
    /// Whether the target was in sight on the last tick.
    pub sees_target: bool,
    /// Hit points, for agents with health.
    pub health: Option<i32>,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// One enemy: perception, memory, movement, attack and optional health,
/// arbitrated by a [`BehaviorState`] machine.
#[derive(Debug)]
pub struct EnemyController {
    id: AgentId,
    settings: Arc<AgentSettings>,
    state: BehaviorState,
    pose: Pose,
    perception: Perception,
    memory: MemoryState,
    target: Option<TargetRef>,
    movement: Movement,
    attack: Attack,
    health: Option<Health>,
    rng: StdRng,
    cues: Vec<Cue>,
    counters: Option<Arc<AiCounters>>,
    investigate_loop: InvestigateLoop,
    despawn: Countdown,
    despawned: bool,
}

impl EnemyController {
    /// Spawn an agent at `spawn` with its own random stream seeded by `seed`.
    #[must_use]
    pub fn new(settings: Arc<AgentSettings>, spawn: Pose, seed: u64) -> Self {
        let movement = Movement::new(Arc::clone(&settings), spawn.position);
        let attack = Attack::new(&settings);
        let state = if movement.can_patrol() {
            BehaviorState::Patrol
        } else {
            BehaviorState::Idle
        };
        let id = AgentId::new();
        info!(agent = %id, position = %spawn.position, ?state, "Enemy spawned");
        Self {
            id,
            settings,
            state,
            pose: spawn,
            perception: Perception::new(),
            memory: MemoryState::new(),
            target: None,
            movement,
            attack,
            health: None,
            rng: StdRng::seed_from_u64(seed),
            cues: Vec::new(),
            counters: None,
            investigate_loop: InvestigateLoop::default(),
            despawn: Countdown::idle(),
            despawned: false,
        }
    }

    /// Builder: use a fixed id.
    #[must_use]
    pub fn with_id(mut self, id: AgentId) -> Self {
        self.id = id;
        self
    }

    /// Builder: walk `route` while patrolling.
    #[must_use]
    pub fn with_route(mut self, route: PatrolRoute) -> Self {
        self.movement = self.movement.with_route(route);
        if self.state == BehaviorState::Idle && self.movement.can_patrol() {
            self.state = BehaviorState::Patrol;
        }
        self
    }

    /// Builder: give the agent hit points, making it mortal.
    #[must_use]
    pub fn with_health(mut self, health: Health) -> Self {
        self.health = Some(health);
        self
    }

    /// Builder: scare the victim on every landed hit.
    #[must_use]
    pub fn with_jumpscare(mut self, enabled: bool) -> Self {
        self.attack = self.attack.with_jumpscare(enabled);
        self
    }

    /// Builder: report into shared world counters.
    #[must_use]
    pub fn with_counters(mut self, counters: Arc<AiCounters>) -> Self {
        self.counters = Some(counters);
        self
    }

    /// Agent id.
    #[must_use]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Current behavior state.
    #[must_use]
    pub fn state(&self) -> BehaviorState {
        self.state
    }

    /// Short-term memory.
    #[must_use]
    pub fn memory(&self) -> &MemoryState {
        &self.memory
    }

    /// The actor currently being hunted, if known.
    #[must_use]
    pub fn target(&self) -> Option<TargetRef> {
        self.target
    }

    /// Perception state from the last tick.
    #[must_use]
    pub fn perception(&self) -> &Perception {
        &self.perception
    }

    /// Movement state.
    #[must_use]
    pub fn movement(&self) -> &Movement {
        &self.movement
    }

    /// Attack state.
    #[must_use]
    pub fn attack(&self) -> &Attack {
        &self.attack
    }

    /// Health, if the agent has any.
    #[must_use]
    pub fn health(&self) -> Option<&Health> {
        self.health.as_ref()
    }

    /// Shared settings.
    #[must_use]
    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    /// Pose sampled at the start of the last tick.
    #[must_use]
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Whether the despawn delay has run out.
    #[must_use]
    pub fn is_despawned(&self) -> bool {
        self.despawned
    }

    /// Take every cue emitted since the last drain.
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// Debug snapshot.
    #[must_use]
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            state: self.state,
            state_code: self.state.code(),
            position: self.pose.position,
            last_known: self.memory.recall(),
            time_since_seen: self.memory.time_since_seen(),
            sees_target: self.perception.has_target(),
            health: self.health.map(|h| h.current()),
        }
    }

    /// Run one logical frame for this agent.
    pub fn tick<N, S, D>(&mut self, dt: f32, nav: &mut N, spatial: &S, targets: &mut D)
    where
        N: NavigationProvider + ?Sized,
        S: SpatialQueryProvider + ?Sized,
        D: DamageTargets + ?Sized,
    {
        let _span = trace_span!(spans::AGENT_TICK, agent = %self.id).entered();
        self.pose = Pose::new(nav.position(), nav.forward());

        if self.health.is_some_and(|h| !h.is_alive()) {
            self.set_state(BehaviorState::Dead);
        }
        if self.state == BehaviorState::Dead {
            self.tick_dead(dt, nav);
            return;
        }

        match self.perception.tick(&self.pose, &self.settings, spatial) {
            PerceptionOutcome::TargetAcquired(seen) => {
                self.bump(|c| &c.sightings);
                self.target = Some(seen);
                self.memory.refresh(seen.position);
                let next = if self.pose.position.distance(seen.position) <= self.settings.attack_range {
                    BehaviorState::Attack
                } else {
                    BehaviorState::Chase
                };
                self.set_state(next);
            }
            outcome => {
                if let PerceptionOutcome::AlertToPosition(point) = outcome {
                    self.alert_to_position(point);
                }
                if self.memory.decay(dt, self.settings.memory_time) {
                    debug!(agent = %self.id, "Memory faded");
                    self.target = None;
                }
                let next = if self.memory.recall().is_some() {
                    BehaviorState::Investigate
                } else {
                    self.resting_state()
                };
                self.set_state(next);
            }
        }

        self.execute(nav, spatial, targets);

        self.attack.advance(dt);
        let report = self.movement.advance(dt, nav, &mut self.rng, &mut self.cues);
        if report.stuck_recovered {
            self.bump(|c| &c.stuck_recoveries);
        }
        if report.roam_picked {
            self.bump(|c| &c.roam_picks);
        }
        self.investigate_loop.advance(dt, &mut self.cues);
    }

    fn resting_state(&self) -> BehaviorState {
        if self.movement.can_patrol() {
            BehaviorState::Patrol
        } else {
            BehaviorState::Idle
        }
    }

    fn execute<N, S, D>(&mut self, nav: &mut N, spatial: &S, targets: &mut D)
    where
        N: NavigationProvider + ?Sized,
        S: SpatialQueryProvider + ?Sized,
        D: DamageTargets + ?Sized,
    {
        match self.state {
            BehaviorState::Idle => self.movement.idle(nav),
            BehaviorState::Patrol => self.movement.patrol(nav),
            BehaviorState::Investigate => self.investigate(nav),
            BehaviorState::Chase => match self.resolve_target(spatial) {
                Some(target) => self.movement.chase(target.position, nav),
                None => {
                    debug!(agent = %self.id, "Chase target lost");
                    self.target = None;
                    self.investigate(nav);
                }
            },
            BehaviorState::Attack => match self.target {
                Some(target) => {
                    let look = flatten_to(target.position, self.pose.position.y) - self.pose.position;
                    if look.length_squared() > f32::EPSILON {
                        nav.face(look);
                    }
                    let outcome = self
                        .attack
                        .try_attack(self.pose.position, Some(target), targets, &mut self.cues);
                    if matches!(outcome, AttackOutcome::Landed { .. }) {
                        self.bump(|c| &c.attacks_landed);
                    }
                }
                None => {
                    let next = self.resting_state();
                    self.set_state(next);
                    self.execute(nav, spatial, targets);
                }
            },
            BehaviorState::Dead => {}
        }
    }

    /// Head for the remembered position, or fall back to resting.
    fn investigate<N>(&mut self, nav: &mut N)
    where
        N: NavigationProvider + ?Sized,
    {
        match self.memory.recall() {
            Some(point) => {
                self.set_state(BehaviorState::Investigate);
                self.movement.move_to(point, nav);
            }
            None => {
                let next = self.resting_state();
                self.set_state(next);
                if next == BehaviorState::Patrol {
                    self.movement.patrol(nav);
                } else {
                    self.movement.idle(nav);
                }
            }
        }
    }

    /// The live position of the hunted actor, when it can still be found.
    fn resolve_target<S>(&mut self, spatial: &S) -> Option<TargetRef>
    where
        S: SpatialQueryProvider + ?Sized,
    {
        let known = self.target?;
        let live = spatial
            .locate_target(&self.settings.target_tag)
            .filter(|found| found.actor == known.actor)?;
        self.target = Some(live);
        Some(live)
    }

    fn tick_dead<N>(&mut self, dt: f32, nav: &mut N)
    where
        N: NavigationProvider + ?Sized,
    {
        self.movement.advance(dt, nav, &mut self.rng, &mut self.cues);
        self.investigate_loop.advance(dt, &mut self.cues);
        if !self.despawned && self.despawn.advance(dt) {
            self.despawned = true;
            info!(agent = %self.id, "Despawning");
            self.cues.push(Cue::Despawn);
        }
    }

    fn set_state(&mut self, next: BehaviorState) {
        let prev = self.state;
        if prev == next || prev == BehaviorState::Dead {
            return;
        }

        if next == BehaviorState::Investigate {
            self.investigate_loop
                .start(self.settings.investigate_loop_volume, &mut self.cues);
        } else if prev == BehaviorState::Investigate {
            self.investigate_loop.fade_out(self.settings.investigate_fade_time);
        }

        self.state = next;
        debug!(agent = %self.id, from = ?prev, to = ?next, "State transition");
        self.cues.push(Cue::StateChanged { from: prev, to: next });
        self.bump(|c| &c.state_transitions);

        if next == BehaviorState::Dead {
            self.die();
        }
    }

    fn die(&mut self) {
        info!(agent = %self.id, "Enemy died");
        self.movement.disable();
        self.attack.disable();
        self.investigate_loop.fade_out(self.settings.investigate_fade_time);
        self.target = None;
        self.cues.push(Cue::Died);
        self.bump(|c| &c.deaths);
        if let Some(delay) = self.health.and_then(|h| h.despawn_delay) {
            self.despawn.start(delay);
            if !self.despawn.is_active() {
                self.despawned = true;
                self.cues.push(Cue::Despawn);
            }
        }
    }

    fn bump(&self, counter: impl FnOnce(&AiCounters) -> &std::sync::atomic::AtomicU64) {
        if let Some(counters) = &self.counters {
            AiCounters::bump(counter(counters));
        }
    }
}

impl AlertSink for EnemyController {
    fn alert_to_position(&mut self, point: Vec3) {
        if self.state == BehaviorState::Dead {
            return;
        }
        if self.rng.r#gen::<f32>() < self.settings.investigate_chance {
            debug!(agent = %self.id, %point, "Alert adopted");
            self.memory.refresh(point);
            self.set_state(BehaviorState::Investigate);
            self.bump(|c| &c.alerts_accepted);
        } else {
            debug!(agent = %self.id, %point, "Alert ignored");
            self.bump(|c| &c.alerts_ignored);
        }
    }

    fn alert_to_target(&mut self, target: TargetRef) {
        if self.state == BehaviorState::Dead {
            return;
        }
        self.target = Some(target);
        self.memory.refresh(target.position);
        self.set_state(BehaviorState::Chase);
    }

    fn take_damage(&mut self, amount: i32, hit_point: Vec3) {
        if self.state == BehaviorState::Dead {
            return;
        }
        if let Some(health) = self.health.as_mut() {
            health.take_damage(amount, hit_point);
            if !health.is_alive() {
                self.set_state(BehaviorState::Dead);
                return;
            }
        }
        self.memory.refresh(hit_point);
        self.set_state(BehaviorState::Chase);
    }

    fn is_alive(&self) -> bool {
        self.health.is_none_or(|h| h.is_alive())
    }
}

impl SoundListener for EnemyController {
    fn listener_position(&self) -> Vec3 {
        self.pose.position
    }

    fn on_sound(&mut self, event: &SoundEvent) {
        if self.state == BehaviorState::Dead {
            return;
        }
        self.cues.push(Cue::SoundHeard { origin: event.origin });
        self.bump(|c| &c.sounds_heard);
        self.alert_to_position(event.origin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{EmitterSnapshot, RayHit};
    use crate::types::ActorId;

    struct Still {
        position: Vec3,
        disabled: bool,
        destination: Option<Vec3>,
    }

    impl NavigationProvider for Still {
        fn position(&self) -> Vec3 {
            self.position
        }
        fn forward(&self) -> Vec3 {
            Vec3::Z
        }
        fn face(&mut self, _direction: Vec3) {}
        fn velocity(&self) -> f32 {
            0.0
        }
        fn set_speed(&mut self, _speed: f32) {}
        fn speed(&self) -> f32 {
            0.0
        }
        fn set_stopping_distance(&mut self, _distance: f32) {}
        fn stopping_distance(&self) -> f32 {
            0.0
        }
        fn set_destination(&mut self, destination: Vec3) -> bool {
            self.destination = Some(destination);
            true
        }
        fn destination(&self) -> Option<Vec3> {
            self.destination
        }
        fn set_stopped(&mut self, _stopped: bool) {}
        fn reset_path(&mut self) {
            self.destination = None;
        }
        fn has_path(&self) -> bool {
            self.destination.is_some()
        }
        fn path_pending(&self) -> bool {
            false
        }
        fn remaining_distance(&self) -> f32 {
            0.0
        }
        fn sample_position(&self, point: Vec3, _max_distance: f32) -> Option<Vec3> {
            Some(point)
        }
        fn is_on_nav_surface(&self) -> bool {
            !self.disabled
        }
        fn disable(&mut self) {
            self.disabled = true;
        }
    }

    struct Empty;

    impl SpatialQueryProvider for Empty {
        fn locate_target(&self, _tag: &str) -> Option<TargetRef> {
            None
        }
        fn raycast(&self, _origin: Vec3, _direction: Vec3, _max: f32) -> Option<RayHit> {
            None
        }
        fn emitters_within(&self, _center: Vec3, _radius: f32) -> Vec<EmitterSnapshot> {
            Vec::new()
        }
    }

    struct NoVictims;

    impl DamageTargets for NoVictims {
        fn health_of(&mut self, _actor: ActorId) -> Option<&mut Health> {
            None
        }
        fn notify_damage(&mut self, _actor: ActorId, _amount: i32, _from: Vec3) {}
    }

    fn nav() -> Still {
        Still {
            position: Vec3::ZERO,
            disabled: false,
            destination: None,
        }
    }

    fn settings(f: impl FnOnce(&mut AgentSettings)) -> Arc<AgentSettings> {
        let mut s = AgentSettings::default();
        f(&mut s);
        s.shared()
    }

    #[test]
    fn initial_state_depends_on_patrol_capability() {
        let roaming = EnemyController::new(AgentSettings::default().shared(), Pose::default(), 1);
        assert_eq!(roaming.state(), BehaviorState::Patrol);

        let still = EnemyController::new(settings(|s| s.random_roam = false), Pose::default(), 1);
        assert_eq!(still.state(), BehaviorState::Idle);
    }

    #[test]
    fn state_codes_are_stable() {
        let codes: Vec<u8> = [
            BehaviorState::Idle,
            BehaviorState::Patrol,
            BehaviorState::Investigate,
            BehaviorState::Chase,
            BehaviorState::Attack,
            BehaviorState::Dead,
        ]
        .into_iter()
        .map(BehaviorState::code)
        .collect();
        assert_eq!(codes, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn ignored_alert_leaves_state() {
        let mut e = EnemyController::new(settings(|s| s.investigate_chance = 0.0), Pose::default(), 9);
        e.alert_to_position(Vec3::X);
        assert_eq!(e.state(), BehaviorState::Patrol);
        assert!(e.memory().recall().is_none());
    }

    #[test]
    fn alert_at_origin_is_remembered() {
        let mut e = EnemyController::new(settings(|s| s.investigate_chance = 1.0), Pose::default(), 9);
        e.alert_to_position(Vec3::ZERO);
        assert_eq!(e.state(), BehaviorState::Investigate);
        assert_eq!(e.memory().recall(), Some(Vec3::ZERO));
    }

    #[test]
    fn investigate_loop_starts_and_fades() {
        let mut e = EnemyController::new(settings(|s| s.investigate_chance = 1.0), Pose::default(), 3);
        let mut nav = nav();
        e.alert_to_position(Vec3::new(3.0, 0.0, 0.0));
        assert!(
            e.drain_cues()
                .contains(&Cue::InvestigateLoopStarted { volume: 1.0 })
        );

        // Memory 6s: investigate, then fade back to patrol.
        let mut cues = Vec::new();
        for _ in 0..100 {
            e.tick(0.1, &mut nav, &Empty, &mut NoVictims);
            cues.extend(e.drain_cues());
        }
        assert_eq!(e.state(), BehaviorState::Patrol);
        assert!(cues.iter().any(|c| matches!(c, Cue::InvestigateLoopVolume { .. })));
        assert!(cues.contains(&Cue::InvestigateLoopStopped));
    }

    #[test]
    fn damage_without_health_alerts_to_chase() {
        let mut e = EnemyController::new(AgentSettings::default().shared(), Pose::default(), 5);
        e.take_damage(1_000, Vec3::new(2.0, 0.0, 2.0));
        assert!(e.is_alive());
        assert_eq!(e.state(), BehaviorState::Chase);
        assert_eq!(e.memory().recall(), Some(Vec3::new(2.0, 0.0, 2.0)));

        // No target known: the chase degrades to investigating the hit point.
        let mut nav = nav();
        e.tick(0.1, &mut nav, &Empty, &mut NoVictims);
        assert_eq!(e.state(), BehaviorState::Investigate);
        assert_eq!(nav.destination, Some(Vec3::new(2.0, 0.0, 2.0)));
    }

    #[test]
    fn death_despawns_after_delay() {
        let mut e = EnemyController::new(AgentSettings::default().shared(), Pose::default(), 5)
            .with_health(Health::new(10).with_despawn_delay(Some(1.0)));
        let mut nav = nav();
        e.take_damage(10, Vec3::ZERO);
        assert_eq!(e.state(), BehaviorState::Dead);
        assert!(!e.is_alive());
        assert!(e.drain_cues().contains(&Cue::Died));

        for _ in 0..9 {
            e.tick(0.1, &mut nav, &Empty, &mut NoVictims);
        }
        assert!(!e.is_despawned());
        e.tick(0.15, &mut nav, &Empty, &mut NoVictims);
        assert!(e.is_despawned());
        assert!(nav.disabled);
        let despawns = e.drain_cues().iter().filter(|c| **c == Cue::Despawn).count();
        assert_eq!(despawns, 1);
    }

    #[test]
    fn dead_agent_ignores_everything() {
        let mut e = EnemyController::new(AgentSettings::default().shared(), Pose::default(), 5)
            .with_health(Health::new(10));
        e.take_damage(10, Vec3::ZERO);
        e.drain_cues();
        e.alert_to_position(Vec3::X);
        e.alert_to_target(TargetRef::new(ActorId::new(), Vec3::X));
        e.take_damage(5, Vec3::X);
        e.on_sound(&SoundEvent::new(Vec3::X, 5.0, "Player").expect("valid"));
        assert_eq!(e.state(), BehaviorState::Dead);
        assert!(e.drain_cues().is_empty());
    }

    #[test]
    fn snapshot_serializes() {
        let e = EnemyController::new(AgentSettings::default().shared(), Pose::default(), 5)
            .with_health(Health::new(40));
        let json = serde_json::to_string(&e.snapshot()).expect("serialize");
        assert!(json.contains("\"state\":\"patrol\""));
        assert!(json.contains("\"health\":40"));
    }
}
