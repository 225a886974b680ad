//! Prelude module for convenient imports
//!
//! ```rust
//! use battle_core::prelude::*;
//! ```

// Core types
pub use crate::creature::{Creature, Move};
pub use crate::stats::{BattleStat, Stats};
pub use crate::types::{Controller, DamageClass, MoveTarget, Side};

// Battle
pub use crate::battle::{Action, Battle, BattleEvent, BattleOutcome, EventLog, EventSink, Team, TurnPhase};

// Conditions and effectiveness
pub use crate::condition::ConditionKind;
pub use crate::effectiveness::{EffectivenessTier, ElementType};

// Config
pub use crate::config::{BattleConstants, Catalog};
