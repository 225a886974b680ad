//! Stat calculation - base stats into effective battle stats

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest and highest stage a stat can be pushed to
pub const MIN_STAGE: i8 = -6;
pub const MAX_STAGE: i8 = 6;

/// The six stats every creature carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    #[serde(alias = "special-attack")]
    pub special_attack: u32,
    #[serde(alias = "special-defense")]
    pub special_defense: u32,
    pub speed: u32,
}

impl Stats {
    pub fn new(
        hp: u32,
        attack: u32,
        defense: u32,
        special_attack: u32,
        special_defense: u32,
        speed: u32,
    ) -> Self {
        Stats {
            hp,
            attack,
            defense,
            special_attack,
            special_defense,
            speed,
        }
    }

    /// Derive effective stats from these base stats
    pub fn effective(&self, formula: &StatFormula) -> Stats {
        Stats {
            hp: effective_stat(self.hp, formula),
            attack: effective_stat(self.attack, formula),
            defense: effective_stat(self.defense, formula),
            special_attack: effective_stat(self.special_attack, formula),
            special_defense: effective_stat(self.special_defense, formula),
            speed: effective_stat(self.speed, formula),
        }
    }

    /// Value of a non-accuracy battle stat
    pub fn get(&self, stat: BattleStat) -> Option<u32> {
        match stat {
            BattleStat::Attack => Some(self.attack),
            BattleStat::Defense => Some(self.defense),
            BattleStat::SpecialAttack => Some(self.special_attack),
            BattleStat::SpecialDefense => Some(self.special_defense),
            BattleStat::Speed => Some(self.speed),
            BattleStat::Accuracy => None,
        }
    }
}

/// Fixed modifiers fed into the stat formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatFormula {
    #[serde(default = "default_iv")]
    pub iv: u32,
    #[serde(default = "default_ev")]
    pub ev: u32,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default = "default_nature")]
    pub nature: f64,
}

impl Default for StatFormula {
    fn default() -> Self {
        StatFormula {
            iv: default_iv(),
            ev: default_ev(),
            level: default_level(),
            nature: default_nature(),
        }
    }
}

fn default_iv() -> u32 {
    31
}
fn default_ev() -> u32 {
    252
}
fn default_level() -> u32 {
    100
}
fn default_nature() -> f64 {
    1.1
}

/// `floor(((2*base + IV + EV/4) * level / 100 + 5) * nature)`
pub fn effective_stat(base: u32, formula: &StatFormula) -> u32 {
    let core = 2.0 * base as f64 + formula.iv as f64 + formula.ev as f64 / 4.0;
    let scaled = core * formula.level as f64 / 100.0 + 5.0;
    (scaled * formula.nature).floor() as u32
}

/// Stats that can be modified in battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleStat {
    Attack,
    Defense,
    #[serde(alias = "special-attack")]
    SpecialAttack,
    #[serde(alias = "special-defense")]
    SpecialDefense,
    Speed,
    Accuracy,
}

impl BattleStat {
    pub fn as_str(&self) -> &'static str {
        match self {
            BattleStat::Attack => "Attack",
            BattleStat::Defense => "Defense",
            BattleStat::SpecialAttack => "Sp. Atk",
            BattleStat::SpecialDefense => "Sp. Def",
            BattleStat::Speed => "Speed",
            BattleStat::Accuracy => "Accuracy",
        }
    }
}

impl fmt::Display for BattleStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// In-battle stage modifiers, each clamped to [-6, +6]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatStages {
    pub attack: i8,
    pub defense: i8,
    pub special_attack: i8,
    pub special_defense: i8,
    pub speed: i8,
    pub accuracy: i8,
}

impl StatStages {
    pub fn get(&self, stat: BattleStat) -> i8 {
        match stat {
            BattleStat::Attack => self.attack,
            BattleStat::Defense => self.defense,
            BattleStat::SpecialAttack => self.special_attack,
            BattleStat::SpecialDefense => self.special_defense,
            BattleStat::Speed => self.speed,
            BattleStat::Accuracy => self.accuracy,
        }
    }

    fn slot(&mut self, stat: BattleStat) -> &mut i8 {
        match stat {
            BattleStat::Attack => &mut self.attack,
            BattleStat::Defense => &mut self.defense,
            BattleStat::SpecialAttack => &mut self.special_attack,
            BattleStat::SpecialDefense => &mut self.special_defense,
            BattleStat::Speed => &mut self.speed,
            BattleStat::Accuracy => &mut self.accuracy,
        }
    }

    /// Shift a stage, returning how far it actually moved
    pub fn shift(&mut self, stat: BattleStat, delta: i8) -> i8 {
        let slot = self.slot(stat);
        let before = *slot;
        *slot = before.saturating_add(delta).clamp(MIN_STAGE, MAX_STAGE);
        *slot - before
    }

    /// Read-time multiplier for a stat at its current stage
    pub fn multiplier(&self, stat: BattleStat) -> f64 {
        let stage = self.get(stat) as f64;
        // Accuracy uses a 3-based ladder, the rest a 2-based one
        let base = if stat == BattleStat::Accuracy { 3.0 } else { 2.0 };
        if stage >= 0.0 {
            (base + stage) / base
        } else {
            base / (base - stage)
        }
    }
}
