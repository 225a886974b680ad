//! Core types shared across the battle engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two parties in a battle
///
/// `User` is the side designated to act first on an exact speed tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    User,
    Opponent,
}

impl Side {
    /// Both sides in fixed resolution order (user first)
    pub const BOTH: [Side; 2] = [Side::User, Side::Opponent];

    /// Array index of this side
    pub fn index(self) -> usize {
        match self {
            Side::User => 0,
            Side::Opponent => 1,
        }
    }

    /// The other side
    pub fn opponent(self) -> Side {
        match self {
            Side::User => Side::Opponent,
            Side::Opponent => Side::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::User => "user",
            Side::Opponent => "opponent",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who picks a side's actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Controller {
    /// Actions are supplied from outside (menu, voice intent, ...)
    Interactive,
    /// Actions come from the built-in move selector
    Ai,
}

/// Damage class of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageClass {
    /// Uses attack vs defense
    Physical,
    /// Uses special-attack vs special-defense
    Special,
    /// Deals no damage
    Status,
}

impl DamageClass {
    pub fn is_damaging(&self) -> bool {
        !matches!(self, DamageClass::Status)
    }
}

/// Who a move is aimed at, relative to its user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveTarget {
    #[serde(alias = "user")]
    #[serde(rename = "self")]
    User,
    #[serde(alias = "enemy")]
    Opponent,
}

impl MoveTarget {
    /// Resolve to an absolute side given the acting side
    pub fn resolve(self, actor: Side) -> Side {
        match self {
            MoveTarget::User => actor,
            MoveTarget::Opponent => actor.opponent(),
        }
    }
}

/// Probability roll: succeeds when a uniform draw in [0, 1) falls below `chance`
///
/// Total for every input. NaN and non-positive chances never succeed.
pub fn roll(rng: &mut impl rand::Rng, chance: f64) -> bool {
    if chance.is_nan() || chance <= 0.0 {
        return false;
    }
    rng.gen::<f64>() < chance
}
