//! LifeSim Simulation Engine
//!
//! Turn-based life simulation: one character, one year per call to
//! [`LifeWorld::advance`]. Display and prompts go through a [`Narrator`];
//! randomness is injected so lives can be replayed from a seed.

pub mod autopilot;
pub mod character;
pub mod components;
pub mod config;
pub mod names;
pub mod narrator;
pub mod persistence;
pub mod relations;
pub mod stats;
pub mod systems;
pub mod tax;
pub mod traits;
pub mod world;

pub use character::{Character, DeathCause, Obituary};
pub use components::*;
pub use config::{ConfigError, RunnerConfig, SimConfig};
pub use narrator::{Answer, LifeEvent, Narrator, Question, ScriptedNarrator, YearReport};
pub use persistence::{LoadResult, PersistenceError, Repairs, SaveFile};
pub use world::{AdvanceOutcome, LifeWorld};
