//! Turn resolution - Apply both sides' actions to a BattleState
//!
//! Both entry points are pure with respect to their input: they clone the
//! state, run the state machine to the next stable phase and return the new
//! state together with the events emitted on the way.

use super::{Action, ActionError, BattleEvent, BattleOutcome, BattleState, FailReason, Team, TurnActions, TurnPhase};
use crate::ai::select_replacement;
use crate::condition::{apply_condition, end_of_turn_tick, pre_move_check, ApplyOutcome, PreMoveOutcome};
use crate::config::BattleConstants;
use crate::damage::calculate_move_impact;
use crate::types::{roll, Controller, MoveTarget, Side};
use rand::Rng;
use tracing::{debug, trace};

/// Check that `side` may submit `action` in the current phase
pub fn validate_action(state: &BattleState, side: Side, action: Action) -> Result<(), ActionError> {
    match state.phase {
        TurnPhase::BattleEnd => return Err(ActionError::BattleOver),
        TurnPhase::AwaitingSwap => {
            return match action {
                Action::Forfeit => Err(ActionError::ForfeitNotAllowed),
                Action::Swap(index) if state.awaiting_swap(side) => check_swap_target(state.team(side), side, index),
                _ if state.awaiting_swap(side) => Err(ActionError::SwapRequired { side }),
                _ => Err(ActionError::NotExpected { side }),
            };
        }
        TurnPhase::AwaitingActions => {}
        TurnPhase::ResolvingFirst
        | TurnPhase::ResolvingSecond
        | TurnPhase::EndOfTurnEffects
        | TurnPhase::CheckFaint => return Err(ActionError::NotExpected { side }),
    }

    match action {
        Action::UseMove(slot) => {
            let mv = state
                .active(side)
                .move_at(slot)
                .ok_or(ActionError::UnknownMove { side, slot })?;
            if !mv.has_pp() {
                return Err(ActionError::NoPp {
                    side,
                    slot,
                    name: mv.name.clone(),
                });
            }
            Ok(())
        }
        Action::Swap(index) => check_swap_target(state.team(side), side, index),
        Action::Forfeit => Ok(()),
    }
}

fn check_swap_target(team: &Team, side: Side, index: usize) -> Result<(), ActionError> {
    let creature = team.get(index).ok_or(ActionError::UnknownSlot { side, index })?;
    if creature.is_fainted() {
        return Err(ActionError::SwapToFainted {
            side,
            index,
            name: creature.name.clone(),
        });
    }
    if index == team.active_index() {
        return Err(ActionError::SwapToActive {
            side,
            index,
            name: creature.name.clone(),
        });
    }
    Ok(())
}

/// Resolve one full turn (immutable API)
///
/// Only valid in `AwaitingActions`. Runs, in order:
/// 1. Forfeits (user side considered first)
/// 2. Voluntary swaps
/// 3. Both half-turns, faster combatant first, user first on a speed tie
/// 4. End-of-turn condition ticks, user side then opponent side
/// 5. Faint check, ending in `AwaitingActions`, `AwaitingSwap` or `BattleEnd`
pub fn resolve_turn(
    state: &BattleState,
    actions: TurnActions,
    constants: &BattleConstants,
    rng: &mut impl Rng,
) -> Result<(BattleState, Vec<BattleEvent>), ActionError> {
    match state.phase {
        TurnPhase::AwaitingActions => {}
        TurnPhase::BattleEnd => return Err(ActionError::BattleOver),
        _ => {
            let side = Side::BOTH
                .into_iter()
                .find(|s| state.awaiting_swap(*s))
                .unwrap_or(Side::User);
            return Err(ActionError::SwapRequired { side });
        }
    }
    for side in Side::BOTH {
        validate_action(state, side, actions.get(side))?;
    }

    let mut next = state.clone();
    let mut events = vec![BattleEvent::TurnStarted { turn: next.turn }];
    next.pending = [None, None];
    debug!(turn = next.turn, user = ?actions.user, opponent = ?actions.opponent, "resolving turn");

    // Step 1: Forfeit ends the battle before anything else happens
    if let Some(side) = Side::BOTH.into_iter().find(|s| actions.get(*s) == Action::Forfeit) {
        events.push(BattleEvent::Forfeited { side });
        end_battle(&mut next, BattleOutcome::Winner(side.opponent()), &mut events);
        return Ok((next, events));
    }

    // Step 2: Swaps take priority over moves
    for side in Side::BOTH {
        if let Action::Swap(index) = actions.get(side) {
            swap_in(&mut next, side, index, false, &mut events);
        }
    }

    // Step 3: Half-turns in speed order
    let movers: Vec<(Side, usize)> = turn_order(&next)
        .into_iter()
        .filter_map(|side| match actions.get(side) {
            Action::UseMove(slot) => Some((side, slot)),
            Action::Swap(_) | Action::Forfeit => None,
        })
        .collect();

    for (i, (side, slot)) in movers.into_iter().enumerate() {
        next.phase = if i == 0 { TurnPhase::ResolvingFirst } else { TurnPhase::ResolvingSecond };
        if next.active(side).is_fainted() {
            trace!(%side, "actor fainted, half-turn skipped");
            continue;
        }
        resolve_half_turn(&mut next, side, slot, constants, rng, &mut events);
    }

    // Step 4: Burn and poison, user side first
    next.phase = TurnPhase::EndOfTurnEffects;
    for side in Side::BOTH {
        let creature = next.active_mut(side);
        if let Some(tick) = end_of_turn_tick(creature) {
            events.push(BattleEvent::ConditionTicked {
                side,
                creature: creature.name.clone(),
                kind: tick.kind,
                damage: tick.damage,
                remaining_hp: creature.current_hp(),
            });
            note_faint(&next, side, &mut events);
        }
    }

    // Step 5: Faints, forced swaps and the end of the battle
    next.phase = TurnPhase::CheckFaint;
    check_faint(&mut next, &mut events);

    debug!(phase = ?next.phase, turn = next.turn, events = events.len(), "turn resolved");
    Ok((next, events))
}

/// Resolve a forced swap owed by `side` (immutable API)
///
/// Once no side owes a swap the deferred turn completes and the battle
/// returns to `AwaitingActions`.
pub fn resolve_swap(state: &BattleState, side: Side, index: usize) -> Result<(BattleState, Vec<BattleEvent>), ActionError> {
    match state.phase {
        TurnPhase::BattleEnd => return Err(ActionError::BattleOver),
        TurnPhase::AwaitingSwap if state.awaiting_swap(side) => {}
        _ => return Err(ActionError::NotExpected { side }),
    }
    check_swap_target(state.team(side), side, index)?;

    let mut next = state.clone();
    let mut events = Vec::new();
    swap_in(&mut next, side, index, true, &mut events);
    next.awaiting_swap[side.index()] = false;

    if !next.awaiting_swap.iter().any(|owed| *owed) {
        finish_turn(&mut next, &mut events);
    }
    Ok((next, events))
}

/// Sides in acting order: higher effective speed first, user on a tie
fn turn_order(state: &BattleState) -> [Side; 2] {
    let user = state.active(Side::User).effective_speed();
    let opponent = state.active(Side::Opponent).effective_speed();
    trace!(user, opponent, "speed check");
    if user >= opponent {
        [Side::User, Side::Opponent]
    } else {
        [Side::Opponent, Side::User]
    }
}

fn resolve_half_turn(
    state: &mut BattleState,
    side: Side,
    slot: usize,
    constants: &BattleConstants,
    rng: &mut impl Rng,
    events: &mut Vec<BattleEvent>,
) {
    let actor = state.active(side).name.clone();

    // Step 1: Condition gate
    let check = pre_move_check(state.active_mut(side), constants, rng);
    match check {
        PreMoveOutcome::Ready | PreMoveOutcome::ConfusedActs => {}
        PreMoveOutcome::Recovered(kind) => events.push(BattleEvent::ConditionCleared {
            side,
            creature: actor.clone(),
            kind,
        }),
        PreMoveOutcome::Immobilized(kind) => {
            events.push(BattleEvent::ConditionBlocked { side, creature: actor, kind });
            return;
        }
        PreMoveOutcome::HurtItself { damage } => {
            events.push(BattleEvent::ConfusionSelfHit {
                side,
                creature: actor,
                damage,
                remaining_hp: state.active(side).current_hp(),
            });
            note_faint(state, side, events);
            return;
        }
    }

    // Step 2: The move goes ahead, PP is spent
    let Some(slot_move) = state.active_mut(side).move_at_mut(slot) else {
        return;
    };
    slot_move.spend_pp();
    let mv = slot_move.clone();
    events.push(BattleEvent::MoveUsed {
        side,
        creature: actor.clone(),
        move_name: mv.name.clone(),
    });

    let aimed = if mv.is_damaging() { MoveTarget::Opponent } else { mv.target };
    let defender_side = side.opponent();
    if state.active(aimed.resolve(side)).is_fainted() {
        events.push(BattleEvent::MoveFailed {
            side,
            creature: actor,
            reason: FailReason::NoTarget,
        });
        return;
    }

    // Step 3: Accuracy, independent of effectiveness
    let hit_chance = mv.hit_chance() * state.active(side).accuracy_multiplier();
    if !roll(rng, hit_chance) {
        trace!(%side, mv = %mv.name, hit_chance, "move missed");
        events.push(BattleEvent::MoveMissed { side, creature: actor });
        return;
    }

    let impact = calculate_move_impact(&mv, state.active(side), state.active(defender_side), constants, rng);

    // Step 4: Damage
    if let Some(tier) = impact.outcome.tier {
        let defender = state.active_mut(defender_side);
        let dealt = defender.take_damage(impact.damage());
        events.push(BattleEvent::DamageDealt {
            side: defender_side,
            creature: defender.name.clone(),
            amount: dealt,
            tier,
            remaining_hp: defender.current_hp(),
            max_hp: defender.max_hp(),
        });
        note_faint(state, defender_side, events);
        if impact.outcome.is_immune() {
            return;
        }
    }

    // Step 5: Condition
    if let Some(condition) = impact.condition {
        let target_side = impact.target.resolve(side);
        let target = state.active_mut(target_side);
        if target.is_alive() {
            match apply_condition(target, condition, rng) {
                ApplyOutcome::Applied(kind) => events.push(BattleEvent::ConditionApplied {
                    side: target_side,
                    creature: target.name.clone(),
                    kind,
                }),
                ApplyOutcome::AlreadyAfflicted(existing) => events.push(BattleEvent::ConditionFailed {
                    side: target_side,
                    creature: target.name.clone(),
                    existing,
                }),
                ApplyOutcome::Missed => {}
            }
        }
    }

    // Step 6: Stat stages
    if let Some(change) = impact.stat_change {
        let target_side = change.target.unwrap_or(impact.target).resolve(side);
        let target = state.active_mut(target_side);
        if target.is_alive() {
            let applied = target.shift_stage(change.stat, change.stages);
            events.push(BattleEvent::StatChanged {
                side: target_side,
                creature: target.name.clone(),
                stat: change.stat,
                requested: change.stages,
                applied,
            });
        }
    }

    // Step 7: Recoil and drain on the attacker
    if impact.recoil > 0 && state.active(side).is_alive() {
        let attacker = state.active_mut(side);
        let lost = attacker.take_damage(impact.recoil);
        events.push(BattleEvent::RecoilTaken {
            side,
            creature: actor.clone(),
            damage: lost,
            remaining_hp: attacker.current_hp(),
        });
        note_faint(state, side, events);
    }
    if impact.drain > 0 && state.active(side).is_alive() {
        let from = state.active(defender_side).name.clone();
        let attacker = state.active_mut(side);
        let healed = attacker.heal(impact.drain);
        events.push(BattleEvent::HpDrained {
            side,
            creature: actor,
            from,
            amount: healed,
            remaining_hp: attacker.current_hp(),
        });
    }
}

fn note_faint(state: &BattleState, side: Side, events: &mut Vec<BattleEvent>) {
    let creature = state.active(side);
    if creature.is_fainted() {
        debug!(%side, creature = %creature.name, "fainted");
        events.push(BattleEvent::Fainted {
            side,
            creature: creature.name.clone(),
        });
    }
}

fn check_faint(state: &mut BattleState, events: &mut Vec<BattleEvent>) {
    let wiped = Side::BOTH.map(|side| state.team(side).is_wiped());
    let outcome = match wiped {
        [true, true] => Some(BattleOutcome::Draw),
        [true, false] => Some(BattleOutcome::Winner(Side::Opponent)),
        [false, true] => Some(BattleOutcome::Winner(Side::User)),
        [false, false] => None,
    };
    if let Some(outcome) = outcome {
        end_battle(state, outcome, events);
        return;
    }

    for side in Side::BOTH {
        if state.active(side).is_alive() {
            continue;
        }
        match state.controller(side) {
            Controller::Ai => {
                if let Some(index) = select_replacement(state.team(side)) {
                    swap_in(state, side, index, true, events);
                }
            }
            Controller::Interactive => {
                state.awaiting_swap[side.index()] = true;
                events.push(BattleEvent::SwapRequired { side });
            }
        }
    }

    if state.awaiting_swap.iter().any(|owed| *owed) {
        state.phase = TurnPhase::AwaitingSwap;
    } else {
        finish_turn(state, events);
    }
}

fn swap_in(state: &mut BattleState, side: Side, index: usize, forced: bool, events: &mut Vec<BattleEvent>) {
    let from = state.active(side).name.clone();
    state.team_mut(side).set_active(index);
    let to = state.active(side).name.clone();
    debug!(%side, %from, %to, forced, "swap");
    events.push(BattleEvent::Swapped { side, from, to, forced });
}

fn finish_turn(state: &mut BattleState, events: &mut Vec<BattleEvent>) {
    events.push(BattleEvent::TurnEnded { turn: state.turn });
    state.turn += 1;
    state.phase = TurnPhase::AwaitingActions;
}

fn end_battle(state: &mut BattleState, outcome: BattleOutcome, events: &mut Vec<BattleEvent>) {
    debug!(?outcome, turn = state.turn, "battle ended");
    state.outcome = Some(outcome);
    state.phase = TurnPhase::BattleEnd;
    state.awaiting_swap = [false, false];
    events.push(BattleEvent::BattleEnded { outcome });
}
