//! Battle events - the append-only record of what happened

use super::BattleOutcome;
use crate::condition::ConditionKind;
use crate::effectiveness::EffectivenessTier;
use crate::stats::BattleStat;
use crate::types::Side;
use serde::{Deserialize, Serialize};

/// Why a move that was used did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailReason {
    /// The move's target has already fainted
    NoTarget,
}

/// A single thing that happened during a battle
///
/// `side` always names the side the affected creature belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BattleEvent {
    BattleStarted {
        user: String,
        opponent: String,
    },
    TurnStarted {
        turn: u32,
    },
    MoveUsed {
        side: Side,
        creature: String,
        move_name: String,
    },
    MoveMissed {
        side: Side,
        creature: String,
    },
    MoveFailed {
        side: Side,
        creature: String,
        reason: FailReason,
    },
    /// A damaging move landed (amount may be 0 against an immune target)
    DamageDealt {
        side: Side,
        creature: String,
        amount: u32,
        tier: EffectivenessTier,
        remaining_hp: u32,
        max_hp: u32,
    },
    ConditionApplied {
        side: Side,
        creature: String,
        kind: ConditionKind,
    },
    /// Target already had a condition
    ConditionFailed {
        side: Side,
        creature: String,
        existing: ConditionKind,
    },
    /// Frozen or asleep and could not move
    ConditionBlocked {
        side: Side,
        creature: String,
        kind: ConditionKind,
    },
    ConditionCleared {
        side: Side,
        creature: String,
        kind: ConditionKind,
    },
    ConditionTicked {
        side: Side,
        creature: String,
        kind: ConditionKind,
        damage: u32,
        remaining_hp: u32,
    },
    ConfusionSelfHit {
        side: Side,
        creature: String,
        damage: u32,
        remaining_hp: u32,
    },
    /// `applied` is 0 when the stage was already at its limit
    StatChanged {
        side: Side,
        creature: String,
        stat: BattleStat,
        requested: i8,
        applied: i8,
    },
    RecoilTaken {
        side: Side,
        creature: String,
        damage: u32,
        remaining_hp: u32,
    },
    HpDrained {
        side: Side,
        creature: String,
        /// Creature the HP was drained from
        from: String,
        amount: u32,
        remaining_hp: u32,
    },
    Fainted {
        side: Side,
        creature: String,
    },
    SwapRequired {
        side: Side,
    },
    Swapped {
        side: Side,
        from: String,
        to: String,
        forced: bool,
    },
    Forfeited {
        side: Side,
    },
    TurnEnded {
        turn: u32,
    },
    BattleEnded {
        outcome: BattleOutcome,
    },
}

impl BattleEvent {
    /// Side the event concerns, if any
    pub fn side(&self) -> Option<Side> {
        match self {
            BattleEvent::MoveUsed { side, .. }
            | BattleEvent::MoveMissed { side, .. }
            | BattleEvent::MoveFailed { side, .. }
            | BattleEvent::DamageDealt { side, .. }
            | BattleEvent::ConditionApplied { side, .. }
            | BattleEvent::ConditionFailed { side, .. }
            | BattleEvent::ConditionBlocked { side, .. }
            | BattleEvent::ConditionCleared { side, .. }
            | BattleEvent::ConditionTicked { side, .. }
            | BattleEvent::ConfusionSelfHit { side, .. }
            | BattleEvent::StatChanged { side, .. }
            | BattleEvent::RecoilTaken { side, .. }
            | BattleEvent::HpDrained { side, .. }
            | BattleEvent::Fainted { side, .. }
            | BattleEvent::SwapRequired { side }
            | BattleEvent::Swapped { side, .. }
            | BattleEvent::Forfeited { side } => Some(*side),
            BattleEvent::BattleStarted { .. }
            | BattleEvent::TurnStarted { .. }
            | BattleEvent::TurnEnded { .. }
            | BattleEvent::BattleEnded { .. } => None,
        }
    }

    /// Whether the event moved someone's HP
    pub fn changes_hp(&self) -> bool {
        match self {
            BattleEvent::DamageDealt { amount, .. } | BattleEvent::HpDrained { amount, .. } => *amount > 0,
            BattleEvent::ConditionTicked { damage, .. }
            | BattleEvent::ConfusionSelfHit { damage, .. }
            | BattleEvent::RecoilTaken { damage, .. } => *damage > 0,
            _ => false,
        }
    }
}

/// Passive observer of emitted events
///
/// Sinks see events only after the state they describe is committed. They
/// cannot reach or alter battle state.
pub trait EventSink {
    fn on_event(&mut self, event: &BattleEvent);
}

impl<F: FnMut(&BattleEvent)> EventSink for F {
    fn on_event(&mut self, event: &BattleEvent) {
        self(event)
    }
}

/// Full ordered history of a battle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<BattleEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = BattleEvent>) {
        self.events.extend(events);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Events recorded at or after `index`
    pub fn since(&self, index: usize) -> &[BattleEvent] {
        self.events.get(index..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter()
    }

    /// Serialize the history as a JSON array
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }
}

impl EventSink for EventLog {
    fn on_event(&mut self, event: &BattleEvent) {
        self.events.push(event.clone());
    }
}
