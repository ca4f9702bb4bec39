//! Presentation cues.
//!
//! The core never plays audio or drives an animator. Each agent appends cues
//! to an outbox during its tick; the host drains them afterwards and maps
//! them onto sounds, animations and UI.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::controller::BehaviorState;
use crate::types::ActorId;

/// A presentation event emitted by one agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cue", rename_all = "snake_case")]
pub enum Cue {
    /// The behavior state changed. `to.code()` is the animator value.
    StateChanged {
        /// Previous state.
        from: BehaviorState,
        /// New state.
        to: BehaviorState,
    },
    /// One enemy footstep.
    Footstep {
        /// Agent speed when the step landed.
        speed: f32,
    },
    /// The investigate loop started playing.
    InvestigateLoopStarted {
        /// Starting volume.
        volume: f32,
    },
    /// Investigate loop volume while fading out.
    InvestigateLoopVolume {
        /// Current volume.
        volume: f32,
    },
    /// The investigate loop stopped.
    InvestigateLoopStopped,
    /// A bus-delivered sound reached this agent.
    SoundHeard {
        /// Where the sound came from.
        origin: Vec3,
    },
    /// An attack connected.
    AttackLanded {
        /// Who was hit.
        victim: ActorId,
        /// Damage dealt.
        damage: i32,
    },
    /// Show the jumpscare to the victim.
    Jumpscare {
        /// Who gets scared.
        victim: ActorId,
    },
    /// The agent died.
    Died,
    /// The body should be removed now.
    Despawn,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_serialize_with_tag() {
        let cue = Cue::StateChanged {
            from: BehaviorState::Patrol,
            to: BehaviorState::Chase,
        };
        let json = serde_json::to_string(&cue).expect("serialize");
        assert!(json.contains("\"cue\":\"state_changed\""));
        let back: Cue = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cue);
    }
}
