//! Move definitions and their secondary effects

use crate::condition::ConditionKind;
use crate::effectiveness::ElementType;
use crate::stats::BattleStat;
use crate::types::{DamageClass, MoveTarget};
use serde::{Deserialize, Serialize};

/// A move a creature knows, with its remaining PP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    /// Catalog identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Base power (0 for status moves)
    #[serde(default)]
    pub power: u32,
    /// Hit chance in percent (0-100)
    #[serde(default = "default_accuracy")]
    pub accuracy: u8,
    #[serde(alias = "damage_type")]
    pub class: DamageClass,
    #[serde(rename = "type", alias = "element")]
    pub element: ElementType,
    #[serde(default = "default_target")]
    pub target: MoveTarget,
    /// Maximum PP
    #[serde(rename = "pp")]
    pub max_pp: u8,
    /// Remaining PP, filled to max when a creature is built
    #[serde(skip)]
    pub current_pp: u8,
    /// Optional secondary effect
    #[serde(default)]
    pub effect: Option<SecondaryEffect>,
}

fn default_accuracy() -> u8 {
    100
}

fn default_target() -> MoveTarget {
    MoveTarget::Opponent
}

impl Move {
    /// Create a damaging move aimed at the opponent with full PP
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        element: ElementType,
        class: DamageClass,
        power: u32,
        accuracy: u8,
        pp: u8,
    ) -> Self {
        Move {
            id: id.into(),
            name: name.into(),
            power,
            accuracy,
            class,
            element,
            target: MoveTarget::Opponent,
            max_pp: pp,
            current_pp: pp,
            effect: None,
        }
    }

    pub fn with_target(mut self, target: MoveTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_effect(mut self, effect: SecondaryEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    /// Restore PP to maximum
    pub fn with_full_pp(mut self) -> Self {
        self.current_pp = self.max_pp;
        self
    }

    pub fn has_pp(&self) -> bool {
        self.current_pp > 0
    }

    /// Spend one PP, returns false if none was left
    pub fn spend_pp(&mut self) -> bool {
        if self.current_pp == 0 {
            return false;
        }
        self.current_pp -= 1;
        true
    }

    pub fn is_damaging(&self) -> bool {
        self.class.is_damaging()
    }

    /// Hit chance as a probability before the user's accuracy modifiers
    pub fn hit_chance(&self) -> f64 {
        f64::from(self.accuracy.min(100)) / 100.0
    }
}

/// Secondary effect descriptor attached to a move
///
/// `chance` gates the condition and stat change. Recoil and drain always
/// apply to a landed hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryEffect {
    /// Chance (0.0 to 1.0) that the condition / stat change triggers
    #[serde(default = "default_chance")]
    pub chance: f64,
    /// Condition inflicted on the move's target
    #[serde(default)]
    pub condition: Option<ConditionKind>,
    /// Stage change applied when the effect triggers
    #[serde(default)]
    pub stat_change: Option<StatChange>,
    /// Fraction of damage dealt that the user takes back
    #[serde(default)]
    pub recoil: f64,
    /// Fraction of damage dealt that heals the user
    #[serde(default)]
    pub drain: f64,
}

fn default_chance() -> f64 {
    1.0
}

impl Default for SecondaryEffect {
    fn default() -> Self {
        SecondaryEffect {
            chance: 1.0,
            condition: None,
            stat_change: None,
            recoil: 0.0,
            drain: 0.0,
        }
    }
}

impl SecondaryEffect {
    pub fn condition(kind: ConditionKind, chance: f64) -> Self {
        SecondaryEffect {
            chance,
            condition: Some(kind),
            ..SecondaryEffect::default()
        }
    }

    pub fn recoil(fraction: f64) -> Self {
        SecondaryEffect {
            recoil: fraction,
            ..SecondaryEffect::default()
        }
    }

    pub fn drain(fraction: f64) -> Self {
        SecondaryEffect {
            drain: fraction,
            ..SecondaryEffect::default()
        }
    }

    pub fn stat_change(change: StatChange, chance: f64) -> Self {
        SecondaryEffect {
            chance,
            stat_change: Some(change),
            ..SecondaryEffect::default()
        }
    }
}

/// Stage delta to a single stat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatChange {
    pub stat: BattleStat,
    pub stages: i8,
    /// Who receives the change; the move's own target when unset
    #[serde(default)]
    pub target: Option<MoveTarget>,
}

impl StatChange {
    pub fn new(stat: BattleStat, stages: i8) -> Self {
        StatChange {
            stat,
            stages,
            target: None,
        }
    }

    pub fn on(mut self, target: MoveTarget) -> Self {
        self.target = Some(target);
        self
    }
}
