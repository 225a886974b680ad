//! Battle state - teams, phase and pending actions

use super::Action;
use crate::config::ConfigError;
use crate::creature::Creature;
use crate::types::{Controller, Side};
use serde::{Deserialize, Serialize};

/// An ordered roster with one active creature
///
/// The active index always points at a creature. It may point at a fainted
/// one only until the pending forced swap resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TeamRecord")]
pub struct Team {
    pub(crate) creatures: Vec<Creature>,
    pub(crate) active: usize,
}

/// Serialized form of a `Team`, checked before it becomes one
#[derive(Deserialize)]
struct TeamRecord {
    creatures: Vec<Creature>,
    active: usize,
}

impl TryFrom<TeamRecord> for Team {
    type Error = ConfigError;

    fn try_from(record: TeamRecord) -> Result<Self, Self::Error> {
        let mut team = Team::new(record.creatures)?;
        if record.active >= team.len() {
            return Err(ConfigError::ValidationError(format!(
                "active slot {} is outside a team of {}",
                record.active,
                team.len()
            )));
        }
        team.active = record.active;
        Ok(team)
    }
}

impl Team {
    /// Build a team with the first creature active
    pub fn new(creatures: Vec<Creature>) -> Result<Self, ConfigError> {
        if creatures.is_empty() {
            return Err(ConfigError::ValidationError("a team needs at least one creature".to_string()));
        }
        Ok(Team { creatures, active: 0 })
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    pub fn get(&self, index: usize) -> Option<&Creature> {
        self.creatures.get(index)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &Creature {
        &self.creatures[self.active]
    }

    pub(crate) fn active_mut(&mut self) -> &mut Creature {
        &mut self.creatures[self.active]
    }

    /// Make `index` the active creature. Caller validates the slot.
    pub(crate) fn set_active(&mut self, index: usize) {
        debug_assert!(index < self.creatures.len());
        self.active = index;
    }

    /// Every creature has fainted
    pub fn is_wiped(&self) -> bool {
        self.creatures.iter().all(Creature::is_fainted)
    }

    /// Creatures still standing
    pub fn alive_count(&self) -> usize {
        self.creatures.iter().filter(|c| c.is_alive()).count()
    }

    /// First healthy creature other than the active one
    pub fn first_healthy_reserve(&self) -> Option<usize> {
        self.creatures
            .iter()
            .enumerate()
            .find(|(i, c)| *i != self.active && c.is_alive())
            .map(|(i, _)| i)
    }
}

/// Turn resolver state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    /// Waiting for one action from each side
    AwaitingActions,
    ResolvingFirst,
    ResolvingSecond,
    EndOfTurnEffects,
    CheckFaint,
    /// At least one side must replace a fainted creature
    AwaitingSwap,
    /// Terminal
    BattleEnd,
}

impl TurnPhase {
    /// Phases where the resolver stops and waits for input (or for nothing)
    pub fn is_stable(&self) -> bool {
        matches!(self, TurnPhase::AwaitingActions | TurnPhase::AwaitingSwap | TurnPhase::BattleEnd)
    }
}

/// How a battle finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    Winner(Side),
    /// Both teams were wiped out in the same turn
    Draw,
}

impl BattleOutcome {
    pub fn winner(&self) -> Option<Side> {
        match self {
            BattleOutcome::Winner(side) => Some(*side),
            BattleOutcome::Draw => None,
        }
    }
}

/// Complete state of one battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub(crate) teams: [Team; 2],
    pub(crate) controllers: [Controller; 2],
    /// Starts at 1, increments once per completed turn
    pub(crate) turn: u32,
    pub(crate) phase: TurnPhase,
    pub(crate) pending: [Option<Action>; 2],
    /// Sides that owe a forced swap
    pub(crate) awaiting_swap: [bool; 2],
    pub(crate) outcome: Option<BattleOutcome>,
}

impl BattleState {
    pub fn new(user: Team, opponent: Team, controllers: [Controller; 2]) -> Self {
        BattleState {
            teams: [user, opponent],
            controllers,
            turn: 1,
            phase: TurnPhase::AwaitingActions,
            pending: [None, None],
            awaiting_swap: [false, false],
            outcome: None,
        }
    }

    pub fn team(&self, side: Side) -> &Team {
        &self.teams[side.index()]
    }

    pub(crate) fn team_mut(&mut self, side: Side) -> &mut Team {
        &mut self.teams[side.index()]
    }

    /// Active creature of `side`
    pub fn active(&self, side: Side) -> &Creature {
        self.team(side).active()
    }

    pub(crate) fn active_mut(&mut self, side: Side) -> &mut Creature {
        self.team_mut(side).active_mut()
    }

    pub fn controller(&self, side: Side) -> Controller {
        self.controllers[side.index()]
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn pending(&self, side: Side) -> Option<Action> {
        self.pending[side.index()]
    }

    pub fn awaiting_swap(&self, side: Side) -> bool {
        self.awaiting_swap[side.index()]
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.phase == TurnPhase::BattleEnd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::tests::make_creature;

    #[test]
    fn test_team_requires_a_creature() {
        assert!(Team::new(Vec::new()).is_err());
    }

    #[test]
    fn test_deserialize_checks_active_slot() {
        let mut team = Team::new(vec![make_creature("A", 80, 80), make_creature("B", 80, 80)]).unwrap();
        team.set_active(1);
        let value = serde_json::to_value(&team).unwrap();
        let back: Team = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(back.active_index(), 1);

        let mut out_of_range = value.clone();
        out_of_range["active"] = serde_json::json!(2);
        assert!(serde_json::from_value::<Team>(out_of_range).is_err());

        let mut empty = value;
        empty["creatures"] = serde_json::json!([]);
        assert!(serde_json::from_value::<Team>(empty).is_err());
    }

    #[test]
    fn test_first_healthy_reserve() {
        let mut team = Team::new(vec![
            make_creature("A", 80, 80),
            make_creature("B", 80, 80),
            make_creature("C", 80, 80),
        ])
        .unwrap();
        assert_eq!(team.first_healthy_reserve(), Some(1));

        team.creatures[1].current_hp = 0;
        assert_eq!(team.first_healthy_reserve(), Some(2));

        team.creatures[2].current_hp = 0;
        assert_eq!(team.first_healthy_reserve(), None);
        assert!(!team.is_wiped());
        assert_eq!(team.alive_count(), 1);

        team.creatures[0].current_hp = 0;
        assert!(team.is_wiped());
    }

    #[test]
    fn test_new_state() {
        let user = Team::new(vec![make_creature("A", 80, 80)]).unwrap();
        let opponent = Team::new(vec![make_creature("B", 80, 80)]).unwrap();
        let state = BattleState::new(user, opponent, [Controller::Interactive, Controller::Ai]);

        assert_eq!(state.turn(), 1);
        assert_eq!(state.phase(), TurnPhase::AwaitingActions);
        assert_eq!(state.active(Side::Opponent).name, "B");
        assert_eq!(state.controller(Side::Opponent), Controller::Ai);
        assert!(state.outcome().is_none());
    }
}
