//! Conditions - Mutually exclusive status ailments and their state machine
//!
//! A combatant holds at most one [`Condition`]. Transitions:
//! - `None -> Some(c)` through [`apply_condition`]
//! - `Some(Freeze | Sleep | Confusion) -> None` through [`pre_move_check`]
//! - Burn and Poison deal damage in [`end_of_turn_tick`]

mod manager;

pub use manager::{apply_condition, end_of_turn_tick, pre_move_check, ApplyOutcome, PreMoveOutcome, TickResult};

use crate::stats::BattleStat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameterless condition identifier, used by catalogs and events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    #[serde(alias = "prz", alias = "paralyze")]
    Paralysis,
    #[serde(alias = "psn")]
    Poison,
    #[serde(alias = "brn")]
    Burn,
    #[serde(alias = "frz")]
    Freeze,
    #[serde(alias = "slp")]
    Sleep,
    #[serde(alias = "cnf", alias = "confuse")]
    Confusion,
}

impl ConditionKind {
    pub const ALL: [ConditionKind; 6] = [
        ConditionKind::Paralysis,
        ConditionKind::Poison,
        ConditionKind::Burn,
        ConditionKind::Freeze,
        ConditionKind::Sleep,
        ConditionKind::Confusion,
    ];

    /// Short badge ("PRZ", "BRN", ...)
    pub fn abbreviation(&self) -> &'static str {
        match self {
            ConditionKind::Paralysis => "PRZ",
            ConditionKind::Poison => "PSN",
            ConditionKind::Burn => "BRN",
            ConditionKind::Freeze => "FRZ",
            ConditionKind::Sleep => "SLP",
            ConditionKind::Confusion => "CNF",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionKind::Paralysis => "Paralysis",
            ConditionKind::Poison => "Poison",
            ConditionKind::Burn => "Burn",
            ConditionKind::Freeze => "Freeze",
            ConditionKind::Sleep => "Sleep",
            ConditionKind::Confusion => "Confusion",
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An active condition with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    Paralysis {
        speed_mod: f64,
        accuracy_mod: f64,
        chance_to_hit: f64,
    },
    Poison {
        damage_fraction: f64,
        chance_to_hit: f64,
    },
    Burn {
        damage_fraction: f64,
        attack_mod: f64,
        chance_to_hit: f64,
    },
    Freeze {
        chance_to_reset: f64,
        chance_to_hit: f64,
    },
    Sleep {
        chance_to_reset: f64,
        chance_to_hit: f64,
    },
    Confusion {
        chance_to_reset: f64,
        chance_to_hit: f64,
    },
}

impl Condition {
    pub fn kind(&self) -> ConditionKind {
        match self {
            Condition::Paralysis { .. } => ConditionKind::Paralysis,
            Condition::Poison { .. } => ConditionKind::Poison,
            Condition::Burn { .. } => ConditionKind::Burn,
            Condition::Freeze { .. } => ConditionKind::Freeze,
            Condition::Sleep { .. } => ConditionKind::Sleep,
            Condition::Confusion { .. } => ConditionKind::Confusion,
        }
    }

    /// Chance that an attempt to inflict this condition lands
    pub fn chance_to_hit(&self) -> f64 {
        match *self {
            Condition::Paralysis { chance_to_hit, .. }
            | Condition::Poison { chance_to_hit, .. }
            | Condition::Burn { chance_to_hit, .. }
            | Condition::Freeze { chance_to_hit, .. }
            | Condition::Sleep { chance_to_hit, .. }
            | Condition::Confusion { chance_to_hit, .. } => chance_to_hit,
        }
    }

    /// Chance per attempted move that the condition wears off
    pub fn chance_to_reset(&self) -> Option<f64> {
        match *self {
            Condition::Freeze { chance_to_reset, .. }
            | Condition::Sleep { chance_to_reset, .. }
            | Condition::Confusion { chance_to_reset, .. } => Some(chance_to_reset),
            Condition::Paralysis { .. } | Condition::Poison { .. } | Condition::Burn { .. } => None,
        }
    }

    /// Fraction of max HP lost at end of turn
    pub fn damage_fraction(&self) -> Option<f64> {
        match *self {
            Condition::Poison { damage_fraction, .. } | Condition::Burn { damage_fraction, .. } => {
                Some(damage_fraction)
            }
            Condition::Paralysis { .. }
            | Condition::Freeze { .. }
            | Condition::Sleep { .. }
            | Condition::Confusion { .. } => None,
        }
    }

    /// Multiplicative read-time modifier this condition puts on a stat
    pub fn stat_modifier(&self, stat: BattleStat) -> f64 {
        match (*self, stat) {
            (Condition::Paralysis { speed_mod, .. }, BattleStat::Speed) => speed_mod,
            (Condition::Paralysis { accuracy_mod, .. }, BattleStat::Accuracy) => accuracy_mod,
            (Condition::Burn { attack_mod, .. }, BattleStat::Attack) => attack_mod,
            _ => 1.0,
        }
    }

    /// Replace the chance to land, keeping other parameters
    pub fn with_chance_to_hit(mut self, chance: f64) -> Self {
        match &mut self {
            Condition::Paralysis { chance_to_hit, .. }
            | Condition::Poison { chance_to_hit, .. }
            | Condition::Burn { chance_to_hit, .. }
            | Condition::Freeze { chance_to_hit, .. }
            | Condition::Sleep { chance_to_hit, .. }
            | Condition::Confusion { chance_to_hit, .. } => *chance_to_hit = chance,
        }
        self
    }
}
