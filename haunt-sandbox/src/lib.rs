//! # haunt-sandbox: Headless Reference World for Haunt
//!
//! This crate is the integration layer between the engine-agnostic
//! `haunt-core` library and a minimal world: it implements every capability
//! trait the core asks for and runs scripted scenarios without an engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │             haunt-sandbox                │
//! │  ┌──────────┐ ┌─────────┐ ┌───────────┐ │
//! │  │ Scenario │ │ Actors  │ │ Kinematic │ │
//! │  │  (TOML)  │ │ player, │ │    nav    │ │
//! │  └────┬─────┘ │ baits   │ └─────┬─────┘ │
//! │       │       └────┬────┘       │       │
//! │       ▼            ▼            ▼       │
//! │  ┌────────────────────────────────────┐ │
//! │  │   World (frame loop, WorldView)    │ │
//! │  └─────────────────┬──────────────────┘ │
//! │                    ▼                    │
//! │  ┌────────────────────────────────────┐ │
//! │  │            haunt-core              │ │
//! │  └────────────────────────────────────┘ │
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `geometry`: axis-aligned boxes for walls and colliders
//! - `nav`: straight-line [`NavigationProvider`](haunt_core::NavigationProvider)
//! - `actors`: scripted player, periodic noise sources, placed baits
//! - `scenario`: TOML scenario documents
//! - `simulation`: the world, its perception view and the run report

pub mod actors;
pub mod geometry;
pub mod nav;
pub mod scenario;
pub mod simulation;

pub use scenario::Scenario;
pub use simulation::{SimulationReport, World};
