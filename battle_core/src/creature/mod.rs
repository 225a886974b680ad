//! Creature - A battler with stats, types, a condition slot and known moves

mod moves;

pub use moves::{Move, SecondaryEffect, StatChange};

use crate::condition::Condition;
use crate::config::ConfigError;
use crate::effectiveness::ElementType;
use crate::stats::{BattleStat, StatFormula, StatStages, Stats};
use serde::{Deserialize, Serialize};

/// A creature taking part in a battle
///
/// Effective stats are derived once at construction. Condition and stage
/// modifiers are layered on at read time and never touch the stored stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CreatureRecord")]
pub struct Creature {
    /// Species identifier from the catalog
    pub id: String,
    /// Display name
    pub name: String,
    /// One or more elemental types
    pub types: Vec<ElementType>,
    /// Stats as defined by the catalog
    pub base_stats: Stats,
    /// Stats after the stat formula
    pub stats: Stats,
    pub(crate) max_hp: u32,
    pub(crate) current_hp: u32,
    pub(crate) condition: Option<Condition>,
    pub(crate) stages: StatStages,
    pub(crate) moves: Vec<Move>,
}

/// Serialized form of a `Creature`, checked before it becomes one
#[derive(Deserialize)]
struct CreatureRecord {
    id: String,
    name: String,
    types: Vec<ElementType>,
    base_stats: Stats,
    stats: Stats,
    max_hp: u32,
    current_hp: u32,
    condition: Option<Condition>,
    stages: StatStages,
    moves: Vec<Move>,
}

impl TryFrom<CreatureRecord> for Creature {
    type Error = ConfigError;

    fn try_from(record: CreatureRecord) -> Result<Self, Self::Error> {
        if record.current_hp > record.max_hp {
            return Err(ConfigError::ValidationError(format!(
                "creature '{}' has {} HP of {}",
                record.id, record.current_hp, record.max_hp
            )));
        }
        Ok(Creature {
            id: record.id,
            name: record.name,
            types: record.types,
            base_stats: record.base_stats,
            stats: record.stats,
            max_hp: record.max_hp,
            current_hp: record.current_hp,
            condition: record.condition,
            stages: record.stages,
            moves: record.moves,
        })
    }
}

impl Creature {
    /// Build a creature at full HP with every move at full PP
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        types: Vec<ElementType>,
        base_stats: Stats,
        moves: Vec<Move>,
        formula: &StatFormula,
    ) -> Self {
        let stats = base_stats.effective(formula);
        Creature {
            id: id.into(),
            name: name.into(),
            types,
            base_stats,
            stats,
            max_hp: stats.hp,
            current_hp: stats.hp,
            condition: None,
            stages: StatStages::default(),
            moves: moves.into_iter().map(Move::with_full_pp).collect(),
        }
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn is_alive(&self) -> bool {
        !self.is_fainted()
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    pub fn stages(&self) -> &StatStages {
        &self.stages
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn move_at(&self, index: usize) -> Option<&Move> {
        self.moves.get(index)
    }

    pub(crate) fn move_at_mut(&mut self, index: usize) -> Option<&mut Move> {
        self.moves.get_mut(index)
    }

    /// Whether any known move still has PP
    pub fn has_usable_move(&self) -> bool {
        self.moves.iter().any(Move::has_pp)
    }

    /// Remove HP, clamped at zero. Returns HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.current_hp);
        self.current_hp -= lost;
        lost
    }

    /// Restore HP, clamped at max. Returns HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_hp.saturating_sub(self.current_hp));
        self.current_hp += gained;
        gained
    }

    /// Shift a stat stage, returning how far it moved
    pub fn shift_stage(&mut self, stat: BattleStat, delta: i8) -> i8 {
        self.stages.shift(stat, delta)
    }

    /// Read-time value of a battle stat (condition and stage modifiers applied)
    ///
    /// For `Accuracy` this is the percentage multiplier applied to move accuracy.
    pub fn stat(&self, stat: BattleStat) -> u32 {
        let Some(base) = self.stats.get(stat) else {
            return (self.accuracy_multiplier() * 100.0).floor() as u32;
        };
        let condition_mod = self
            .condition
            .as_ref()
            .map(|c| c.stat_modifier(stat))
            .unwrap_or(1.0);
        let value = base as f64 * condition_mod * self.stages.multiplier(stat);
        (value.floor() as u32).max(1)
    }

    /// Speed used for turn ordering
    pub fn effective_speed(&self) -> u32 {
        self.stat(BattleStat::Speed)
    }

    /// Multiplier on a move's hit chance from condition and accuracy stage
    pub fn accuracy_multiplier(&self) -> f64 {
        let condition_mod = self
            .condition
            .as_ref()
            .map(|c| c.stat_modifier(BattleStat::Accuracy))
            .unwrap_or(1.0);
        condition_mod * self.stages.multiplier(BattleStat::Accuracy)
    }

    /// Fraction of max HP remaining (0.0 to 1.0)
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.current_hp as f64 / self.max_hp as f64
    }
}
