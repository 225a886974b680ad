//! Battle constants configuration

use super::{check_unit, ConfigError};
use crate::condition::{Condition, ConditionKind};
use crate::stats::StatFormula;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable battle constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BattleConstants {
    #[serde(default)]
    pub stats: StatFormula,
    #[serde(default)]
    pub conditions: ConditionPresets,
    #[serde(default)]
    pub ai: AiConstants,
    #[serde(default)]
    pub team: TeamConstants,
}

impl BattleConstants {
    /// Load and validate constants from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let constants: BattleConstants = super::load_toml(path)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Parse and validate constants from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let constants: BattleConstants = super::parse_toml(content)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Constants shipped with the crate
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::parse(include_str!("../../config/constants.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stats.level == 0 {
            return Err(ConfigError::ValidationError("stats.level must be positive".to_string()));
        }
        if !(self.stats.nature > 0.0) {
            return Err(ConfigError::ValidationError("stats.nature must be positive".to_string()));
        }
        if self.team.max_size == 0 || self.team.max_moves == 0 {
            return Err(ConfigError::ValidationError(
                "team.max_size and team.max_moves must be positive".to_string(),
            ));
        }
        self.conditions.validate()
    }
}

/// Parameters used whenever a move inflicts a condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionPresets {
    #[serde(default)]
    pub paralysis: ParalysisPreset,
    #[serde(default)]
    pub poison: PoisonPreset,
    #[serde(default)]
    pub burn: BurnPreset,
    #[serde(default = "default_freeze")]
    pub freeze: ResetPreset,
    #[serde(default = "default_sleep")]
    pub sleep: ResetPreset,
    #[serde(default)]
    pub confusion: ConfusionPreset,
}

impl Default for ConditionPresets {
    fn default() -> Self {
        ConditionPresets {
            paralysis: ParalysisPreset::default(),
            poison: PoisonPreset::default(),
            burn: BurnPreset::default(),
            freeze: default_freeze(),
            sleep: default_sleep(),
            confusion: ConfusionPreset::default(),
        }
    }
}

impl ConditionPresets {
    /// Build the active condition for `kind` from its preset
    pub fn build(&self, kind: ConditionKind) -> Condition {
        match kind {
            ConditionKind::Paralysis => Condition::Paralysis {
                speed_mod: self.paralysis.speed_mod,
                accuracy_mod: self.paralysis.accuracy_mod,
                chance_to_hit: self.paralysis.chance_to_hit,
            },
            ConditionKind::Poison => Condition::Poison {
                damage_fraction: self.poison.damage_fraction,
                chance_to_hit: self.poison.chance_to_hit,
            },
            ConditionKind::Burn => Condition::Burn {
                damage_fraction: self.burn.damage_fraction,
                attack_mod: self.burn.attack_mod,
                chance_to_hit: self.burn.chance_to_hit,
            },
            ConditionKind::Freeze => Condition::Freeze {
                chance_to_reset: self.freeze.chance_to_reset,
                chance_to_hit: self.freeze.chance_to_hit,
            },
            ConditionKind::Sleep => Condition::Sleep {
                chance_to_reset: self.sleep.chance_to_reset,
                chance_to_hit: self.sleep.chance_to_hit,
            },
            ConditionKind::Confusion => Condition::Confusion {
                chance_to_reset: self.confusion.chance_to_reset,
                chance_to_hit: self.confusion.chance_to_hit,
            },
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_unit("conditions.paralysis.chance_to_hit", self.paralysis.chance_to_hit)?;
        check_unit("conditions.poison.damage_fraction", self.poison.damage_fraction)?;
        check_unit("conditions.poison.chance_to_hit", self.poison.chance_to_hit)?;
        check_unit("conditions.burn.damage_fraction", self.burn.damage_fraction)?;
        check_unit("conditions.burn.chance_to_hit", self.burn.chance_to_hit)?;
        check_unit("conditions.freeze.chance_to_reset", self.freeze.chance_to_reset)?;
        check_unit("conditions.freeze.chance_to_hit", self.freeze.chance_to_hit)?;
        check_unit("conditions.sleep.chance_to_reset", self.sleep.chance_to_reset)?;
        check_unit("conditions.sleep.chance_to_hit", self.sleep.chance_to_hit)?;
        check_unit("conditions.confusion.chance_to_reset", self.confusion.chance_to_reset)?;
        check_unit("conditions.confusion.self_hit_chance", self.confusion.self_hit_chance)?;
        check_unit("conditions.confusion.chance_to_hit", self.confusion.chance_to_hit)?;
        if !(self.paralysis.speed_mod > 0.0) || !(self.paralysis.accuracy_mod > 0.0) || !(self.burn.attack_mod > 0.0) {
            return Err(ConfigError::ValidationError(
                "condition stat modifiers must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParalysisPreset {
    /// Speed multiplier while paralyzed
    #[serde(default = "default_half")]
    pub speed_mod: f64,
    /// Accuracy multiplier while paralyzed
    #[serde(default = "default_paralysis_accuracy")]
    pub accuracy_mod: f64,
    #[serde(default = "default_chance_to_hit")]
    pub chance_to_hit: f64,
}

impl Default for ParalysisPreset {
    fn default() -> Self {
        ParalysisPreset {
            speed_mod: 0.5,
            accuracy_mod: 0.75,
            chance_to_hit: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoisonPreset {
    /// Fraction of max HP lost each end of turn
    #[serde(default = "default_poison_fraction")]
    pub damage_fraction: f64,
    #[serde(default = "default_chance_to_hit")]
    pub chance_to_hit: f64,
}

impl Default for PoisonPreset {
    fn default() -> Self {
        PoisonPreset {
            damage_fraction: 1.0 / 8.0,
            chance_to_hit: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnPreset {
    /// Fraction of max HP lost each end of turn
    #[serde(default = "default_burn_fraction")]
    pub damage_fraction: f64,
    /// Attack multiplier while burned
    #[serde(default = "default_half")]
    pub attack_mod: f64,
    #[serde(default = "default_chance_to_hit")]
    pub chance_to_hit: f64,
}

impl Default for BurnPreset {
    fn default() -> Self {
        BurnPreset {
            damage_fraction: 1.0 / 16.0,
            attack_mod: 0.5,
            chance_to_hit: 1.0,
        }
    }
}

/// Preset for conditions that wear off on a roll (freeze, sleep)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetPreset {
    /// Chance per attempted move to recover
    pub chance_to_reset: f64,
    #[serde(default = "default_chance_to_hit")]
    pub chance_to_hit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionPreset {
    #[serde(default = "default_confusion_reset")]
    pub chance_to_reset: f64,
    /// Chance a confused creature hits itself instead of moving
    #[serde(default = "default_self_hit_chance")]
    pub self_hit_chance: f64,
    /// Self-hit damage uses half of this power
    #[serde(default = "default_reference_power")]
    pub reference_power: u32,
    #[serde(default = "default_chance_to_hit")]
    pub chance_to_hit: f64,
}

impl Default for ConfusionPreset {
    fn default() -> Self {
        ConfusionPreset {
            chance_to_reset: 0.25,
            self_hit_chance: 1.0 / 3.0,
            reference_power: 100,
            chance_to_hit: 1.0,
        }
    }
}

fn default_freeze() -> ResetPreset {
    ResetPreset {
        chance_to_reset: 0.2,
        chance_to_hit: 1.0,
    }
}
fn default_sleep() -> ResetPreset {
    ResetPreset {
        chance_to_reset: 0.33,
        chance_to_hit: 1.0,
    }
}
fn default_chance_to_hit() -> f64 {
    1.0
}
fn default_half() -> f64 {
    0.5
}
fn default_paralysis_accuracy() -> f64 {
    0.75
}
fn default_poison_fraction() -> f64 {
    1.0 / 8.0
}
fn default_burn_fraction() -> f64 {
    1.0 / 16.0
}
fn default_confusion_reset() -> f64 {
    0.25
}
fn default_self_hit_chance() -> f64 {
    1.0 / 3.0
}
fn default_reference_power() -> u32 {
    100
}

/// Move selector tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConstants {
    /// Score of a status move that would change something
    #[serde(default = "default_status_move_score")]
    pub status_move_score: f64,
    /// Scale damage scores by move accuracy
    #[serde(default = "default_accuracy_weighting")]
    pub accuracy_weighting: bool,
}

impl Default for AiConstants {
    fn default() -> Self {
        AiConstants {
            status_move_score: 25.0,
            accuracy_weighting: true,
        }
    }
}

fn default_status_move_score() -> f64 {
    25.0
}
fn default_accuracy_weighting() -> bool {
    true
}

/// Roster limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamConstants {
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    #[serde(default = "default_max_moves")]
    pub max_moves: usize,
}

impl Default for TeamConstants {
    fn default() -> Self {
        TeamConstants {
            max_size: 6,
            max_moves: 4,
        }
    }
}

fn default_max_size() -> usize {
    6
}
fn default_max_moves() -> usize {
    4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let constants = BattleConstants::default();
        assert_eq!(constants.stats.level, 100);
        assert!((constants.conditions.burn.damage_fraction - 1.0 / 16.0).abs() < f64::EPSILON);
        assert!((constants.conditions.freeze.chance_to_reset - 0.2).abs() < f64::EPSILON);
        assert!((constants.conditions.sleep.chance_to_reset - 0.33).abs() < f64::EPSILON);
        assert_eq!(constants.team.max_moves, 4);
    }

    #[test]
    fn test_parse_constants() {
        let toml = r#"
[stats]
level = 50

[conditions.burn]
damage_fraction = 0.125

[conditions.sleep]
chance_to_reset = 0.5

[ai]
accuracy_weighting = false
"#;

        let constants = BattleConstants::parse(toml).unwrap();
        assert_eq!(constants.stats.level, 50);
        assert_eq!(constants.stats.iv, 31);
        assert!((constants.conditions.burn.damage_fraction - 0.125).abs() < f64::EPSILON);
        assert!((constants.conditions.burn.attack_mod - 0.5).abs() < f64::EPSILON);
        assert!((constants.conditions.sleep.chance_to_reset - 0.5).abs() < f64::EPSILON);
        // Untouched section keeps its own defaults
        assert!((constants.conditions.freeze.chance_to_reset - 0.2).abs() < f64::EPSILON);
        assert!(!constants.ai.accuracy_weighting);
    }

    #[test]
    fn test_empty_constants() {
        let constants = BattleConstants::parse("").unwrap();
        assert_eq!(constants, BattleConstants::default());
    }

    #[test]
    fn test_embedded_matches_default() {
        let constants = BattleConstants::embedded().unwrap();
        assert_eq!(constants, BattleConstants::default());
    }

    #[test]
    fn test_rejects_bad_probability() {
        let toml = r#"
[conditions.confusion]
self_hit_chance = 1.5
"#;
        assert!(matches!(
            BattleConstants::parse(toml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_build_uses_presets() {
        let mut presets = ConditionPresets::default();
        presets.poison.damage_fraction = 0.25;
        match presets.build(ConditionKind::Poison) {
            Condition::Poison { damage_fraction, .. } => assert!((damage_fraction - 0.25).abs() < f64::EPSILON),
            other => panic!("unexpected condition {other:?}"),
        }
    }
}
