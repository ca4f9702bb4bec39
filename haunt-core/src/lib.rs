//! # Haunt Core Library
//!
//! Engine-agnostic perception and behavior core for horror-game enemies.
//!
//! Every enemy is an [`EnemyController`] that owns:
//!
//! - **Perception**: sight (range, field of view, occlusion raycast) and
//!   tiered hearing (Low / Normal / High emitter flags)
//! - **Memory**: the last known position of whatever it saw or heard, which
//!   decays after a configured time
//! - **Movement**: patrol routes, random roam, chase, stuck recovery
//! - **Attack**: range- and cooldown-gated damage with a jumpscare cue
//! - **Health**: optional; agents without it are immortal
//!
//! The engine (navigation, physics, audio, animation) is reached only through
//! the capability traits in [`providers`]. Presentation reacts to the
//! [`Cue`]s each agent emits.
//!
//! ## Tick Contract
//!
//! One logical frame runs every agent strictly sequentially:
//! perception → state decision → movement / attack dispatch.
//! No operation blocks; timed behaviours are [`timer::Task`] objects advanced
//! by the tick.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod attack;
pub mod config;
pub mod controller;
pub mod cue;
pub mod error;
pub mod health;
pub mod memory;
pub mod metrics;
pub mod movement;
pub mod patrol;
pub mod perception;
pub mod providers;
pub mod sound;
pub mod timer;
pub mod types;

pub use config::{AgentSettings, HauntConfig};
pub use controller::{BehaviorState, EnemyController};
pub use cue::Cue;
pub use error::HauntError;
pub use providers::{AlertSink, DamageTargets, NavigationProvider, SpatialQueryProvider};
pub use sound::{SoundBus, SoundEvent, SoundTag, SoundTier};
pub use types::*;
