//! Damage outcome types

use crate::condition::Condition;
use crate::creature::StatChange;
use crate::effectiveness::EffectivenessTier;
use crate::types::MoveTarget;
use serde::{Deserialize, Serialize};

/// Deterministic damage of a move against a defender
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageOutcome {
    /// Damage before type effectiveness
    pub raw_damage: u32,
    /// Final damage to apply
    pub damage: u32,
    /// Combined type multiplier against every defender type
    pub multiplier: f64,
    /// Tier for damaging moves; `None` for status moves
    pub tier: Option<EffectivenessTier>,
}

impl DamageOutcome {
    /// Outcome of a status move
    pub fn status() -> Self {
        DamageOutcome {
            raw_damage: 0,
            damage: 0,
            multiplier: 1.0,
            tier: None,
        }
    }

    pub fn is_immune(&self) -> bool {
        self.tier == Some(EffectivenessTier::Immune)
    }
}

/// Everything a landed move would do, before any of it is applied
#[derive(Debug, Clone, PartialEq)]
pub struct MoveImpact {
    /// Who the move is aimed at
    pub target: MoveTarget,
    pub outcome: DamageOutcome,
    /// Condition candidate for the target (secondary roll already passed)
    pub condition: Option<Condition>,
    /// Stat change candidate (secondary roll already passed)
    pub stat_change: Option<StatChange>,
    /// HP the attacker loses after the hit
    pub recoil: u32,
    /// HP the attacker regains after the hit
    pub drain: u32,
}

impl MoveImpact {
    pub fn damage(&self) -> u32 {
        self.outcome.damage
    }

    /// Whether the roll produced any secondary effect
    pub fn has_secondary(&self) -> bool {
        self.condition.is_some() || self.stat_change.is_some() || self.recoil > 0 || self.drain > 0
    }
}
