//! Per-turn actions

use crate::types::Side;
use serde::{Deserialize, Serialize};

/// What a side does with its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Use the move in this slot of the active creature
    UseMove(usize),
    /// Switch the active creature to this team slot
    Swap(usize),
    /// Give up the battle
    Forfeit,
}

/// One action for each side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnActions {
    pub user: Action,
    pub opponent: Action,
}

impl TurnActions {
    pub fn new(user: Action, opponent: Action) -> Self {
        TurnActions { user, opponent }
    }

    pub fn get(&self, side: Side) -> Action {
        match side {
            Side::User => self.user,
            Side::Opponent => self.opponent,
        }
    }
}
