//! Battle system - Turn resolution state machine and its controller

mod action;
mod controller;
mod error;
mod event;
mod resolver;
mod state;

pub use action::{Action, TurnActions};
pub use controller::Battle;
pub use error::ActionError;
pub use event::{BattleEvent, EventLog, EventSink, FailReason};
pub use resolver::{resolve_swap, resolve_turn, validate_action};
pub use state::{BattleOutcome, BattleState, Team, TurnPhase};

pub use crate::types::Side;
