//! battle_sim - Headless battle simulator and narrator
//!
//! This library provides:
//! - Narrator: An event sink that prints battle events as English lines
//! - Simulation: Seeded AI-vs-AI battles and their summary reports

pub mod narrator;
pub mod simulation;

pub use narrator::{narrate, Narrator};
pub use simulation::{BattleSimulation, PerSide, SeriesSummary, SimulationError, SimulationReport};
