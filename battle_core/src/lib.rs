//! battle_core - Turn resolution core for two-sided creature battles
//!
//! This library provides:
//! - Stats: Effective stats from base stats, plus in-battle stat stages
//! - Effectiveness: The 18x18 element type chart
//! - Damage: Deterministic damage and secondary-effect candidates
//! - Conditions: The per-creature status ailment state machine
//! - AI: Deterministic move selection for non-interactive sides
//! - Battle: The turn resolver state machine, its controller and event stream

pub mod ai;
pub mod battle;
pub mod condition;
pub mod config;
pub mod creature;
pub mod damage;
#[cfg(feature = "pacing")]
pub mod driver;
pub mod effectiveness;
pub mod prelude;
pub mod stats;
pub mod types;

// Re-export core types for convenience
pub use battle::{
    resolve_swap, resolve_turn, validate_action, Action, ActionError, Battle, BattleEvent, BattleOutcome,
    BattleState, EventLog, EventSink, FailReason, Team, TurnActions, TurnPhase,
};
pub use condition::{Condition, ConditionKind};
pub use config::{BattleConstants, Catalog, ConfigError};
pub use creature::{Creature, Move, SecondaryEffect, StatChange};
pub use damage::{calculate_damage, calculate_move_impact, DamageOutcome, MoveImpact};
pub use effectiveness::{EffectivenessTier, ElementType};
pub use stats::{effective_stat, BattleStat, StatFormula, StatStages, Stats};
pub use types::{Controller, DamageClass, MoveTarget, Side};
