//! Battle controller - owns the state and is its only writer

use super::{
    resolve_swap, resolve_turn, validate_action, Action, ActionError, BattleEvent, BattleOutcome, BattleState,
    EventLog, EventSink, Team, TurnActions, TurnPhase,
};
use crate::ai::select_action;
use crate::config::{BattleConstants, Catalog, ConfigError};
use crate::types::{Controller, Side};
use rand::Rng;
use tracing::debug;

/// A running battle
///
/// Collects one action per side, hands them to the resolver and commits the
/// returned state. AI sides get their action planned whenever the battle
/// (re)enters `AwaitingActions`. Events go to the log and then to every
/// subscribed sink, always after the state they describe is committed.
pub struct Battle<R: Rng> {
    state: BattleState,
    constants: BattleConstants,
    rng: R,
    log: EventLog,
    sinks: Vec<Box<dyn EventSink>>,
    started: bool,
}

impl<R: Rng> Battle<R> {
    pub fn new(user: Team, opponent: Team, controllers: [Controller; 2], constants: BattleConstants, rng: R) -> Self {
        let mut battle = Battle {
            state: BattleState::new(user, opponent, controllers),
            constants,
            rng,
            log: EventLog::new(),
            sinks: Vec::new(),
            started: false,
        };
        battle.plan_ai_actions();
        battle
    }

    /// Build both rosters from catalog species ids
    pub fn from_catalog<S: AsRef<str>>(
        catalog: &Catalog,
        user: &[S],
        opponent: &[S],
        controllers: [Controller; 2],
        constants: BattleConstants,
        rng: R,
    ) -> Result<Self, ConfigError> {
        let user = catalog.team(user, &constants)?;
        let opponent = catalog.team(opponent, &constants)?;
        Ok(Self::new(user, opponent, controllers, constants, rng))
    }

    /// Register a passive observer for every event from now on
    pub fn subscribe(&mut self, sink: impl EventSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    /// Emit `BattleStarted` once; later calls return nothing
    pub fn start(&mut self) -> Vec<BattleEvent> {
        if self.started {
            return Vec::new();
        }
        self.started = true;
        let events = vec![BattleEvent::BattleStarted {
            user: self.state.active(Side::User).name.clone(),
            opponent: self.state.active(Side::Opponent).name.clone(),
        }];
        self.dispatch(&events);
        events
    }

    /// Submit an action for an interactive side
    ///
    /// In `AwaitingActions` the turn resolves once both sides have an action.
    /// In `AwaitingSwap` only the owed `Swap` is accepted.
    pub fn submit(&mut self, side: Side, action: Action) -> Result<Vec<BattleEvent>, ActionError> {
        match self.state.phase() {
            TurnPhase::BattleEnd => Err(ActionError::BattleOver),
            TurnPhase::AwaitingSwap => {
                let Action::Swap(index) = action else {
                    validate_action(&self.state, side, action)?;
                    return Err(ActionError::SwapRequired { side });
                };
                let (next, events) = resolve_swap(&self.state, side, index)?;
                let mut out = self.start();
                out.extend(self.commit(next, events));
                Ok(out)
            }
            _ => {
                if self.state.controller(side) == Controller::Ai {
                    return Err(ActionError::NotExpected { side });
                }
                if self.state.pending(side).is_some() {
                    return Err(ActionError::DuplicateSubmission { side });
                }
                validate_action(&self.state, side, action)?;
                debug!(%side, ?action, "action accepted");
                self.state.pending[side.index()] = Some(action);
                self.advance()
            }
        }
    }

    /// Resolve the turn if every side has an action waiting
    ///
    /// Drives AI-only battles, where no side ever calls `submit`.
    pub fn advance(&mut self) -> Result<Vec<BattleEvent>, ActionError> {
        let mut out = self.start();
        if self.state.phase() != TurnPhase::AwaitingActions {
            return Ok(out);
        }
        let (Some(user), Some(opponent)) = (self.state.pending(Side::User), self.state.pending(Side::Opponent)) else {
            return Ok(out);
        };

        let actions = TurnActions::new(user, opponent);
        let (next, events) = resolve_turn(&self.state, actions, &self.constants, &mut self.rng)?;
        out.extend(self.commit(next, events));
        Ok(out)
    }

    /// Sides whose input the battle is waiting on
    pub fn expected_sides(&self) -> Vec<Side> {
        Side::BOTH
            .into_iter()
            .filter(|side| match self.state.phase() {
                TurnPhase::AwaitingActions => self.state.pending(*side).is_none(),
                TurnPhase::AwaitingSwap => self.state.awaiting_swap(*side),
                _ => false,
            })
            .collect()
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn phase(&self) -> TurnPhase {
        self.state.phase()
    }

    pub fn turn(&self) -> u32 {
        self.state.turn()
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.state.outcome()
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn constants(&self) -> &BattleConstants {
        &self.constants
    }

    fn commit(&mut self, next: BattleState, events: Vec<BattleEvent>) -> Vec<BattleEvent> {
        self.state = next;
        self.plan_ai_actions();
        self.dispatch(&events);
        events
    }

    fn plan_ai_actions(&mut self) {
        if self.state.phase() != TurnPhase::AwaitingActions {
            return;
        }
        for side in Side::BOTH {
            if self.state.controller(side) == Controller::Ai && self.state.pending(side).is_none() {
                let action = select_action(&self.state, side, &self.constants);
                debug!(%side, ?action, "ai planned action");
                self.state.pending[side.index()] = Some(action);
            }
        }
    }

    fn dispatch(&mut self, events: &[BattleEvent]) {
        for event in events {
            self.log.push(event.clone());
            for sink in &mut self.sinks {
                sink.on_event(event);
            }
        }
    }
}
