//! Move selector for non-interactive sides
//!
//! Pure scoring over the deterministic damage calculator. No randomness is
//! involved; ties go to the earliest move slot.

use crate::battle::{Action, BattleState, Team};
use crate::config::BattleConstants;
use crate::creature::{Creature, Move};
use crate::damage::calculate_damage;
use crate::types::{MoveTarget, Side};
use tracing::trace;

/// Score a single move from `user` against `opponent`
///
/// Damaging moves score the HP they would remove (capped at the target's
/// remaining HP). Status moves score `status_move_score` if they would
/// change anything, zero otherwise.
pub fn score_move(mv: &Move, user: &Creature, opponent: &Creature, constants: &BattleConstants) -> f64 {
    let base = if mv.is_damaging() {
        let outcome = calculate_damage(mv, user, opponent, constants);
        outcome.damage.min(opponent.current_hp()) as f64
    } else if status_move_is_useful(mv, user, opponent) {
        constants.ai.status_move_score
    } else {
        0.0
    };

    if constants.ai.accuracy_weighting {
        base * (mv.hit_chance() * user.accuracy_multiplier()).min(1.0)
    } else {
        base
    }
}

fn status_move_is_useful(mv: &Move, user: &Creature, opponent: &Creature) -> bool {
    let Some(effect) = &mv.effect else {
        return false;
    };
    let aimed_at = |target: MoveTarget| match target {
        MoveTarget::User => user,
        MoveTarget::Opponent => opponent,
    };

    if effect.condition.is_some() && aimed_at(mv.target).condition().is_none() {
        return true;
    }
    if let Some(change) = effect.stat_change {
        let target = aimed_at(change.target.unwrap_or(mv.target));
        let mut stages = *target.stages();
        if stages.shift(change.stat, change.stages) != 0 {
            return true;
        }
    }
    false
}

/// Pick the best move slot that still has PP
///
/// Returns `None` when every move is out of PP.
pub fn select_move(user: &Creature, opponent: &Creature, constants: &BattleConstants) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (slot, mv) in user.moves().iter().enumerate() {
        if !mv.has_pp() {
            continue;
        }
        let score = score_move(mv, user, opponent, constants);
        trace!(creature = %user.name, mv = %mv.name, score, "scored move");
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((slot, score)),
        }
    }

    best.map(|(slot, _)| slot)
}

/// First healthy creature other than the active one
pub fn select_replacement(team: &Team) -> Option<usize> {
    team.first_healthy_reserve()
}

/// Choose the full action for `side` in the current state
///
/// Falls back to swapping to a healthy reserve that still has PP when the
/// active creature is out, and to forfeiting when there is none.
pub fn select_action(state: &BattleState, side: Side, constants: &BattleConstants) -> Action {
    let team = state.team(side);
    let user = team.active();
    let opponent = state.team(side.opponent()).active();

    if let Some(slot) = select_move(user, opponent, constants) {
        return Action::UseMove(slot);
    }
    let reserve = team
        .creatures()
        .iter()
        .enumerate()
        .find(|(i, c)| *i != team.active_index() && c.is_alive() && c.has_usable_move());
    match reserve {
        Some((index, _)) => Action::Swap(index),
        None => Action::Forfeit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::ConditionKind;
    use crate::creature::{SecondaryEffect, StatChange};
    use crate::effectiveness::ElementType;
    use crate::stats::{BattleStat, StatFormula, Stats};
    use crate::types::DamageClass;

    fn creature(types: Vec<ElementType>, moves: Vec<Move>) -> Creature {
        Creature::new(
            "mon",
            "Mon",
            types,
            Stats::new(100, 100, 100, 100, 100, 100),
            moves,
            &StatFormula::default(),
        )
    }

    fn special(id: &str, element: ElementType, power: u32) -> Move {
        Move::new(id, id, element, DamageClass::Special, power, 100, 10)
    }

    #[test]
    fn test_prefers_super_effective() {
        let constants = BattleConstants::default();
        let user = creature(
            vec![ElementType::Water],
            vec![special("tackle", ElementType::Normal, 80), special("surf", ElementType::Water, 80)],
        );
        let target = creature(vec![ElementType::Fire], Vec::new());
        assert_eq!(select_move(&user, &target, &constants), Some(1));
    }

    #[test]
    fn test_ties_go_to_first_slot() {
        let constants = BattleConstants::default();
        let user = creature(
            vec![ElementType::Normal],
            vec![special("a", ElementType::Normal, 80), special("b", ElementType::Normal, 80)],
        );
        let target = creature(vec![ElementType::Normal], Vec::new());
        assert_eq!(select_move(&user, &target, &constants), Some(0));
    }

    #[test]
    fn test_skips_moves_without_pp() {
        let constants = BattleConstants::default();
        let mut user = creature(
            vec![ElementType::Water],
            vec![special("surf", ElementType::Water, 90), special("tackle", ElementType::Normal, 40)],
        );
        user.moves[0].current_pp = 0;
        let target = creature(vec![ElementType::Fire], Vec::new());
        assert_eq!(select_move(&user, &target, &constants), Some(1));

        user.moves[1].current_pp = 0;
        assert_eq!(select_move(&user, &target, &constants), None);
    }

    #[test]
    fn test_immune_move_scores_zero() {
        let constants = BattleConstants::default();
        let user = creature(vec![ElementType::Normal], Vec::new());
        let ghost = creature(vec![ElementType::Ghost], Vec::new());
        let mv = special("tackle", ElementType::Normal, 80);
        assert_eq!(score_move(&mv, &user, &ghost, &constants), 0.0);
    }

    #[test]
    fn test_status_move_useless_on_afflicted_target() {
        let constants = BattleConstants::default();
        let wisp = Move::new("wisp", "Will-O-Wisp", ElementType::Fire, DamageClass::Status, 0, 100, 15)
            .with_effect(SecondaryEffect::condition(ConditionKind::Burn, 1.0));
        let user = creature(vec![ElementType::Fire], Vec::new());
        let mut target = creature(vec![ElementType::Normal], Vec::new());

        assert!(score_move(&wisp, &user, &target, &constants) > 0.0);
        target.condition = Some(constants.conditions.build(ConditionKind::Poison));
        assert_eq!(score_move(&wisp, &user, &target, &constants), 0.0);
    }

    #[test]
    fn test_maxed_stage_is_useless() {
        let constants = BattleConstants::default();
        let dance = Move::new("dance", "Swords Dance", ElementType::Normal, DamageClass::Status, 0, 100, 20)
            .with_target(MoveTarget::User)
            .with_effect(SecondaryEffect::stat_change(StatChange::new(BattleStat::Attack, 2), 1.0));
        let mut user = creature(vec![ElementType::Normal], Vec::new());
        let target = creature(vec![ElementType::Normal], Vec::new());

        assert!(score_move(&dance, &user, &target, &constants) > 0.0);
        user.shift_stage(BattleStat::Attack, 6);
        assert_eq!(score_move(&dance, &user, &target, &constants), 0.0);
    }

    #[test]
    fn test_out_of_pp_swaps_then_forfeits() {
        use crate::types::Controller;

        let constants = BattleConstants::default();
        let mut tired = creature(vec![ElementType::Normal], vec![special("a", ElementType::Normal, 40)]);
        tired.moves[0].current_pp = 0;
        let fresh = creature(vec![ElementType::Normal], vec![special("a", ElementType::Normal, 40)]);
        let foe = creature(vec![ElementType::Normal], vec![special("a", ElementType::Normal, 40)]);

        let state = BattleState::new(
            Team::new(vec![tired.clone(), fresh]).unwrap(),
            Team::new(vec![foe.clone()]).unwrap(),
            [Controller::Ai, Controller::Ai],
        );
        assert_eq!(select_action(&state, Side::User, &constants), Action::Swap(1));

        let state = BattleState::new(
            Team::new(vec![tired.clone(), tired]).unwrap(),
            Team::new(vec![foe]).unwrap(),
            [Controller::Ai, Controller::Ai],
        );
        assert_eq!(select_action(&state, Side::User, &constants), Action::Forfeit);
        assert_eq!(select_action(&state, Side::Opponent, &constants), Action::UseMove(0));
    }

    #[test]
    fn test_finishing_blow_capped_by_remaining_hp() {
        let constants = BattleConstants::default();
        let user = creature(vec![ElementType::Normal], Vec::new());
        let mut target = creature(vec![ElementType::Normal], Vec::new());
        target.current_hp = 5;
        let weak = special("weak", ElementType::Normal, 40);
        let strong = special("strong", ElementType::Normal, 120);
        // Both knock the target out; the earlier slot wins the tie
        assert_eq!(score_move(&weak, &user, &target, &constants), 5.0);
        assert_eq!(score_move(&strong, &user, &target, &constants), 5.0);
    }
}
