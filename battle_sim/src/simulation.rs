//! Headless battle simulation utilities

use battle_core::{
    ActionError, Battle, BattleConstants, BattleEvent, BattleOutcome, Catalog, ConfigError, Controller, EventLog,
    Side,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Battle rejected an action: {0}")]
    Action(#[from] ActionError),

    #[error("max_turns must be at least 1")]
    NoTurns,
}

/// A count kept separately for each side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PerSide {
    pub user: u32,
    pub opponent: u32,
}

impl PerSide {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::User => self.user,
            Side::Opponent => self.opponent,
        }
    }

    fn add(&mut self, side: Side, amount: u32) {
        match side {
            Side::User => self.user += amount,
            Side::Opponent => self.opponent += amount,
        }
    }
}

/// Summary of one finished (or cut off) battle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub seed: u64,
    /// `None` when the battle hit the turn limit first
    pub outcome: Option<BattleOutcome>,
    /// Completed turns
    pub turns: u32,
    /// Damage dealt by each side's moves
    pub damage_dealt: PerSide,
    /// Creatures each side lost
    pub faints: PerSide,
    pub moves_used: PerSide,
    pub events: usize,
    pub truncated: bool,
}

impl SimulationReport {
    /// Tally a report from an event stream
    pub fn from_events(seed: u64, outcome: Option<BattleOutcome>, events: &[BattleEvent]) -> Self {
        let mut report = SimulationReport {
            seed,
            outcome,
            turns: 0,
            damage_dealt: PerSide::default(),
            faints: PerSide::default(),
            moves_used: PerSide::default(),
            events: events.len(),
            truncated: outcome.is_none(),
        };

        for event in events {
            match event {
                BattleEvent::TurnEnded { .. } => report.turns += 1,
                // `side` is the defender; credit the attacker
                BattleEvent::DamageDealt { side, amount, .. } => report.damage_dealt.add(side.opponent(), *amount),
                BattleEvent::Fainted { side, .. } => report.faints.add(*side, 1),
                BattleEvent::MoveUsed { side, .. } => report.moves_used.add(*side, 1),
                _ => {}
            }
        }

        report
    }

    pub fn winner(&self) -> Option<Side> {
        self.outcome.and_then(|o| o.winner())
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = match self.outcome {
            Some(BattleOutcome::Winner(side)) => format!("{} wins", side),
            Some(BattleOutcome::Draw) => "draw".to_string(),
            None => "unfinished".to_string(),
        };
        writeln!(f, "Result: {} after {} turns (seed {})", result, self.turns, self.seed)?;
        writeln!(
            f,
            "Damage dealt: user {} / opponent {}",
            self.damage_dealt.user, self.damage_dealt.opponent
        )?;
        writeln!(f, "Faints: user {} / opponent {}", self.faints.user, self.faints.opponent)?;
        write!(f, "Moves used: user {} / opponent {}", self.moves_used.user, self.moves_used.opponent)
    }
}

/// One AI-vs-AI battle driven to completion
pub struct BattleSimulation {
    pub report: SimulationReport,
    pub log: EventLog,
}

impl BattleSimulation {
    /// Run a seeded battle between two catalog rosters
    ///
    /// Stops after `max_turns` completed turns if nobody has won by then.
    pub fn run<S: AsRef<str>>(
        catalog: &Catalog,
        user: &[S],
        opponent: &[S],
        constants: &BattleConstants,
        seed: u64,
        max_turns: u32,
    ) -> Result<Self, SimulationError> {
        if max_turns == 0 {
            return Err(SimulationError::NoTurns);
        }

        let mut battle = Battle::from_catalog(
            catalog,
            user,
            opponent,
            [Controller::Ai, Controller::Ai],
            constants.clone(),
            StdRng::seed_from_u64(seed),
        )?;

        battle.start();
        while !battle.is_over() && battle.turn() <= max_turns {
            battle.advance()?;
        }

        let report = SimulationReport::from_events(seed, battle.outcome(), battle.log().events());
        if report.truncated {
            info!(seed, max_turns, "battle cut off at turn limit");
        } else {
            debug!(seed, turns = report.turns, outcome = ?report.outcome, "battle finished");
        }

        Ok(BattleSimulation {
            report,
            log: battle.log().clone(),
        })
    }
}

/// Win counts over a range of seeds
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SeriesSummary {
    pub battles: u32,
    pub wins: PerSide,
    pub draws: u32,
    pub unfinished: u32,
    pub total_turns: u32,
}

impl SeriesSummary {
    /// Run one battle per seed in `seeds` and tally the results
    pub fn run<S: AsRef<str>>(
        catalog: &Catalog,
        user: &[S],
        opponent: &[S],
        constants: &BattleConstants,
        seeds: std::ops::Range<u64>,
        max_turns: u32,
    ) -> Result<Self, SimulationError> {
        let mut summary = SeriesSummary::default();
        for seed in seeds {
            let sim = BattleSimulation::run(catalog, user, opponent, constants, seed, max_turns)?;
            summary.record(&sim.report);
        }
        Ok(summary)
    }

    pub fn record(&mut self, report: &SimulationReport) {
        self.battles += 1;
        self.total_turns += report.turns;
        match report.outcome {
            Some(BattleOutcome::Winner(side)) => self.wins.add(side, 1),
            Some(BattleOutcome::Draw) => self.draws += 1,
            None => self.unfinished += 1,
        }
    }

    /// Calculate win rate for a side, in percent
    pub fn win_rate(&self, side: Side) -> f64 {
        if self.battles > 0 {
            self.wins.get(side) as f64 / self.battles as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Calculate average battle length
    pub fn avg_turns(&self) -> f64 {
        if self.battles > 0 {
            self.total_turns as f64 / self.battles as f64
        } else {
            0.0
        }
    }
}
