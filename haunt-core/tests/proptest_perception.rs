//! Property-Based Tests for Haunt Core
//!
//! Uses `proptest` to check perception, memory, attack and lifecycle
//! invariants under random inputs.

mod common;

use glam::Vec3;
use proptest::prelude::*;

use common::{TestNav, TestVictims, TestWorld};
use haunt_core::attack::{Attack, AttackOutcome};
use haunt_core::config::AgentSettings;
use haunt_core::controller::{BehaviorState, EnemyController};
use haunt_core::health::Health;
use haunt_core::memory::MemoryState;
use haunt_core::perception::{Perception, heard_tier};
use haunt_core::providers::{AlertSink, EmitterSnapshot};
use haunt_core::sound::SoundTier;
use haunt_core::sound::emitter::EmitterState;
use haunt_core::types::{ActorId, EmitterId, Pose, TargetRef, angle_between_deg};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_point(extent: f32) -> impl Strategy<Value = Vec3> {
    (-extent..extent, -2.0..2.0f32, -extent..extent).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn arb_direction() -> impl Strategy<Value = Vec3> {
    (0.0..std::f32::consts::TAU).prop_map(|yaw| Vec3::new(yaw.sin(), 0.0, yaw.cos()))
}

fn arb_tier() -> impl Strategy<Value = SoundTier> {
    prop_oneof![Just(SoundTier::Low), Just(SoundTier::Normal), Just(SoundTier::High)]
}

#[derive(Debug, Clone)]
enum Poke {
    Tick,
    AlertPosition(Vec3),
    AlertTarget(Vec3),
    Damage(i32),
}

fn arb_poke() -> impl Strategy<Value = Poke> {
    prop_oneof![
        Just(Poke::Tick),
        arb_point(20.0).prop_map(Poke::AlertPosition),
        arb_point(20.0).prop_map(Poke::AlertTarget),
        (0..200i32).prop_map(Poke::Damage),
    ]
}

// ---------------------------------------------------------------------------
// Property: sight never reports a target outside range or field of view
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn sight_has_no_false_positives(
        target in arb_point(40.0),
        forward in arb_direction(),
        fov in 10.0..360.0f32,
        range in 1.0..30.0f32,
    ) {
        let settings = AgentSettings {
            sight_fov_deg: fov,
            sight_range: range,
            ..AgentSettings::default()
        };
        let pose = Pose::new(Vec3::ZERO, forward);
        let world = TestWorld::with_target(target);

        let mut perception = Perception::new();
        perception.tick(&pose, &settings, &world);

        if perception.has_target() {
            prop_assert!(world.rays_cast.get() > 0, "target reported without a sight ray");
            prop_assert!(target.length() <= range);
            if target.length() > 1e-3 {
                prop_assert!(angle_between_deg(forward, target) <= fov * 0.5 + 1e-3);
            }
        }
    }

    #[test]
    fn occluded_target_is_never_seen(
        target in prop_oneof![
            arb_point(20.0),
            Just(Vec3::ZERO),
            Just(Vec3::Y * AgentSettings::default().eye_height),
        ],
        origin in arb_point(10.0),
        forward in arb_direction(),
        fov in 10.0..360.0f32,
    ) {
        let settings = AgentSettings {
            sight_fov_deg: fov,
            ..AgentSettings::default()
        };
        let mut world = TestWorld::with_target(origin + target);
        world.occluded = true;
        let mut perception = Perception::new();
        perception.tick(&Pose::new(origin, forward), &settings, &world);
        prop_assert!(!perception.has_target());
        prop_assert!(perception.target().is_none());
    }
}

// ---------------------------------------------------------------------------
// Property: a tier is heard exactly when distance <= its radius
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn hearing_threshold_is_inclusive(tier in arb_tier(), radius in 0.5..30.0f32, distance in 0.0..40.0f32) {
        let mut settings = AgentSettings::default();
        match tier {
            SoundTier::Low => settings.low_hearing_range = radius,
            SoundTier::Normal => settings.normal_hearing_range = radius,
            SoundTier::High => settings.high_hearing_range = radius,
        }
        let emitter = EmitterSnapshot {
            id: EmitterId::new(),
            position: Vec3::new(distance, 0.0, 0.0),
            state: EmitterState::only(tier),
        };
        let heard = heard_tier(Vec3::ZERO, &emitter, &settings);
        prop_assert_eq!(heard.is_some(), distance <= radius);

        let at_edge = EmitterSnapshot { position: Vec3::new(radius, 0.0, 0.0), ..emitter };
        prop_assert_eq!(heard_tier(Vec3::ZERO, &at_edge, &settings), Some(tier));
    }
}

// ---------------------------------------------------------------------------
// Property: once forgotten, memory stays forgotten
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn memory_decay_is_idempotent(
        memory_time in 0.5..10.0f32,
        overshoot in 0.01..5.0f32,
        later in prop::collection::vec(0.0..1.0f32, 0..20),
    ) {
        let mut memory = MemoryState::new();
        memory.refresh(Vec3::ONE);
        memory.decay(memory_time + overshoot, memory_time);
        prop_assert!(memory.recall().is_none());
        for dt in later {
            prop_assert!(!memory.decay(dt, memory_time));
            prop_assert!(memory.recall().is_none());
        }
    }
}

// ---------------------------------------------------------------------------
// Property: attacks inside one cooldown deal damage once
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn cooldown_gates_damage(cooldown in 0.2..5.0f32, gap_fraction in 0.0..0.99f32) {
        let settings = AgentSettings { attack_cooldown: cooldown, ..AgentSettings::default() };
        let mut attack = Attack::new(&settings);
        let target = TargetRef::new(ActorId::new(), Vec3::new(0.0, 0.0, 1.0));
        let mut victims = TestVictims::default();
        let mut cues = Vec::new();

        let first = attack.try_attack(Vec3::ZERO, Some(target), &mut victims, &mut cues);
        prop_assert!(matches!(first, AttackOutcome::Landed { .. }), "first attack must land");
        attack.advance(cooldown * gap_fraction);
        let second = attack.try_attack(Vec3::ZERO, Some(target), &mut victims, &mut cues);
        prop_assert_eq!(second, AttackOutcome::CoolingDown);
        prop_assert_eq!(victims.notified.len(), 1);
    }
}

// ---------------------------------------------------------------------------
// Property: Dead is terminal
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn death_is_terminal(seed in any::<u64>(), pokes in prop::collection::vec(arb_poke(), 1..40)) {
        let settings = AgentSettings { sight_fov_deg: 360.0, ..AgentSettings::default() }.shared();
        let mut enemy = EnemyController::new(settings, Pose::default(), seed).with_health(Health::new(50));
        let mut nav = TestNav::at(Vec3::ZERO);
        let world = TestWorld::with_target(Vec3::new(0.0, 0.0, 1.0));
        let mut victims = TestVictims::default();

        enemy.take_damage(50, Vec3::ZERO);
        prop_assert_eq!(enemy.state(), BehaviorState::Dead);

        for poke in pokes {
            match poke {
                Poke::Tick => enemy.tick(0.1, &mut nav, &world, &mut victims),
                Poke::AlertPosition(p) => enemy.alert_to_position(p),
                Poke::AlertTarget(p) => enemy.alert_to_target(TargetRef::new(ActorId::new(), p)),
                Poke::Damage(amount) => enemy.take_damage(amount, Vec3::ZERO),
            }
            prop_assert_eq!(enemy.state(), BehaviorState::Dead);
            prop_assert!(!enemy.is_alive());
        }
        prop_assert!(victims.notified.is_empty());
    }
}
