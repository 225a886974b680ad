//! Battle narration - turns events into the lines a player would read

use battle_core::{BattleEvent, BattleOutcome, ConditionKind, EffectivenessTier, FailReason, Side};
use std::io::Write;
use tracing::debug;

/// Lines describing a single event, in display order
///
/// Many events have nothing to say (a neutral hit, the end of a turn).
pub fn narrate(event: &BattleEvent) -> Vec<String> {
    match event {
        BattleEvent::BattleStarted { user, opponent } => {
            vec![format!("The opponent sent out {}!", opponent), format!("Go! {}!", user)]
        }
        BattleEvent::TurnStarted { turn } => vec![format!("--- Turn {} ---", turn)],
        BattleEvent::MoveUsed {
            creature, move_name, ..
        } => vec![format!("{} used {}!", creature, move_name)],
        BattleEvent::MoveMissed { creature, .. } => vec![format!("{}'s attack missed!", creature)],
        BattleEvent::MoveFailed { reason, .. } => match reason {
            FailReason::NoTarget => vec!["But there was no target...".to_string()],
        },
        BattleEvent::DamageDealt { creature, tier, .. } => match tier {
            EffectivenessTier::Immune => vec![format!("It doesn't affect {}!", creature)],
            EffectivenessTier::NotVeryEffective => vec!["It's not very effective...".to_string()],
            EffectivenessTier::SuperEffective => vec!["It's super effective!".to_string()],
            EffectivenessTier::Normal => Vec::new(),
        },
        BattleEvent::ConditionApplied { creature, kind, .. } => vec![applied_line(creature, *kind)],
        BattleEvent::ConditionFailed { .. } => vec!["But it failed...".to_string()],
        BattleEvent::ConditionBlocked { creature, kind, .. } => vec![match kind {
            ConditionKind::Freeze => format!("{} is frozen solid!", creature),
            ConditionKind::Sleep => format!("{} is fast asleep...", creature),
            _ => format!("{} can't move!", creature),
        }],
        BattleEvent::ConditionCleared { creature, kind, .. } => vec![match kind {
            ConditionKind::Freeze => format!("{} thawed out!", creature),
            ConditionKind::Sleep => format!("{} woke up!", creature),
            ConditionKind::Confusion => format!("{} snapped out of confusion!", creature),
            other => format!("{} recovered from {}!", creature, other.as_str()),
        }],
        BattleEvent::ConditionTicked { creature, kind, .. } => vec![match kind {
            ConditionKind::Burn => format!("{} is hurt by its burn!", creature),
            ConditionKind::Poison => format!("{} is hurt by poison!", creature),
            other => format!("{} is hurt by {}!", creature, other.as_str()),
        }],
        BattleEvent::ConfusionSelfHit { creature, .. } => vec![
            format!("{} is confused!", creature),
            "It hurt itself in its confusion!".to_string(),
        ],
        BattleEvent::StatChanged {
            creature,
            stat,
            requested,
            applied,
            ..
        } => {
            let line = match (*applied, *requested > 0) {
                (0, true) => format!("{}'s {} won't go any higher!", creature, stat),
                (0, false) => format!("{}'s {} won't go any lower!", creature, stat),
                (n, _) if n >= 2 => format!("{}'s {} rose sharply!", creature, stat),
                (n, _) if n > 0 => format!("{}'s {} rose!", creature, stat),
                (n, _) if n <= -2 => format!("{}'s {} harshly fell!", creature, stat),
                _ => format!("{}'s {} fell!", creature, stat),
            };
            vec![line]
        }
        BattleEvent::RecoilTaken { creature, .. } => vec![format!("{} was hurt by the recoil!", creature)],
        BattleEvent::HpDrained { from, .. } => vec![format!("{} had its energy drained!", from)],
        BattleEvent::Fainted { creature, .. } => vec![format!("{} fainted!", creature)],
        BattleEvent::SwapRequired { side } => match side {
            Side::User => vec!["Choose your next creature!".to_string()],
            Side::Opponent => Vec::new(),
        },
        BattleEvent::Swapped { side, from, to, .. } => match side {
            Side::User => vec![format!("Come back, {}!", from), format!("Go! {}!", to)],
            Side::Opponent => vec![format!("The opponent withdrew {}!", from), format!("The opponent sent out {}!", to)],
        },
        BattleEvent::Forfeited { side } => match side {
            Side::User => vec!["You forfeited the battle!".to_string()],
            Side::Opponent => vec!["The opponent forfeited!".to_string()],
        },
        BattleEvent::TurnEnded { .. } => Vec::new(),
        BattleEvent::BattleEnded { outcome } => vec![match outcome {
            BattleOutcome::Winner(Side::User) => "You won the battle!".to_string(),
            BattleOutcome::Winner(Side::Opponent) => "You lost the battle!".to_string(),
            BattleOutcome::Draw => "The battle ended in a draw!".to_string(),
        }],
    }
}

fn applied_line(creature: &str, kind: ConditionKind) -> String {
    match kind {
        ConditionKind::Paralysis => format!("{} is paralyzed! It may be unable to move!", creature),
        ConditionKind::Poison => format!("{} was poisoned!", creature),
        ConditionKind::Burn => format!("{} was burned!", creature),
        ConditionKind::Freeze => format!("{} was frozen solid!", creature),
        ConditionKind::Sleep => format!("{} fell asleep!", creature),
        ConditionKind::Confusion => format!("{} became confused!", creature),
    }
}

/// Event sink that writes narration to any writer
///
/// Write failures are logged and dropped; the battle keeps going.
pub struct Narrator<W: Write> {
    out: W,
    lines: usize,
}

impl Narrator<std::io::Stdout> {
    pub fn stdout() -> Self {
        Narrator::new(std::io::stdout())
    }
}

impl<W: Write> Narrator<W> {
    pub fn new(out: W) -> Self {
        Narrator { out, lines: 0 }
    }

    /// Lines written so far
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> battle_core::EventSink for Narrator<W> {
    fn on_event(&mut self, event: &BattleEvent) {
        for line in narrate(event) {
            match writeln!(self.out, "{}", line) {
                Ok(()) => self.lines += 1,
                Err(e) => debug!(error = %e, "narration write failed"),
            }
        }
    }
}
