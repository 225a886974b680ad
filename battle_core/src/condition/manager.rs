//! Condition transitions - apply, pre-move gate, end-of-turn tick

use super::{Condition, ConditionKind};
use crate::config::BattleConstants;
use crate::creature::Creature;
use crate::damage::confusion_self_damage;
use crate::types::roll;
use rand::Rng;
use tracing::trace;

/// Result of trying to inflict a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The condition took hold
    Applied(ConditionKind),
    /// The chance-to-hit roll failed; nothing to report
    Missed,
    /// Target already carries a condition; state unchanged
    AlreadyAfflicted(ConditionKind),
}

/// Try to inflict `condition` on `target`
///
/// Rolls `chance_to_hit` first. A target that already has a condition is
/// left unchanged whatever the new condition is.
pub fn apply_condition(target: &mut Creature, condition: Condition, rng: &mut impl Rng) -> ApplyOutcome {
    if !roll(rng, condition.chance_to_hit()) {
        trace!(creature = %target.name, kind = %condition.kind(), "condition roll missed");
        return ApplyOutcome::Missed;
    }

    if let Some(existing) = target.condition {
        return ApplyOutcome::AlreadyAfflicted(existing.kind());
    }

    target.condition = Some(condition);
    ApplyOutcome::Applied(condition.kind())
}

/// Result of the check run before a combatant's move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreMoveOutcome {
    /// No condition gates this move
    Ready,
    /// The condition wore off; the move goes ahead
    Recovered(ConditionKind),
    /// Still frozen or asleep; the move is blocked
    Immobilized(ConditionKind),
    /// Confused but the move goes ahead
    ConfusedActs,
    /// Confused and hit itself; the move is blocked
    HurtItself { damage: u32 },
}

impl PreMoveOutcome {
    /// Whether the scheduled move may be executed
    pub fn can_act(&self) -> bool {
        match self {
            PreMoveOutcome::Ready | PreMoveOutcome::Recovered(_) | PreMoveOutcome::ConfusedActs => true,
            PreMoveOutcome::Immobilized(_) | PreMoveOutcome::HurtItself { .. } => false,
        }
    }
}

/// Gate a combatant's move on its condition
///
/// Paralysis never blocks here; it only works through lowered speed and
/// accuracy.
pub fn pre_move_check(
    creature: &mut Creature,
    constants: &BattleConstants,
    rng: &mut impl Rng,
) -> PreMoveOutcome {
    let Some(condition) = creature.condition else {
        return PreMoveOutcome::Ready;
    };

    match condition {
        Condition::Paralysis { .. } | Condition::Poison { .. } | Condition::Burn { .. } => PreMoveOutcome::Ready,
        Condition::Freeze { chance_to_reset, .. } | Condition::Sleep { chance_to_reset, .. } => {
            if roll(rng, chance_to_reset) {
                creature.condition = None;
                PreMoveOutcome::Recovered(condition.kind())
            } else {
                PreMoveOutcome::Immobilized(condition.kind())
            }
        }
        Condition::Confusion { chance_to_reset, .. } => {
            if roll(rng, chance_to_reset) {
                creature.condition = None;
                return PreMoveOutcome::Recovered(ConditionKind::Confusion);
            }

            if roll(rng, constants.conditions.confusion.self_hit_chance) {
                let damage = confusion_self_damage(creature, constants);
                let lost = creature.take_damage(damage);
                PreMoveOutcome::HurtItself { damage: lost }
            } else {
                PreMoveOutcome::ConfusedActs
            }
        }
    }
}

/// End-of-turn damage from a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    pub kind: ConditionKind,
    /// HP actually lost this tick
    pub damage: u32,
}

/// Apply the end-of-turn tick for Burn and Poison
///
/// Deals `floor(damage_fraction * max_hp)`. Other conditions and fainted
/// creatures produce no tick.
pub fn end_of_turn_tick(creature: &mut Creature) -> Option<TickResult> {
    if creature.is_fainted() {
        return None;
    }
    let condition = creature.condition?;

    match condition {
        Condition::Burn { damage_fraction, .. } | Condition::Poison { damage_fraction, .. } => {
            let amount = (damage_fraction * creature.max_hp() as f64).floor() as u32;
            let damage = creature.take_damage(amount);
            Some(TickResult {
                kind: condition.kind(),
                damage,
            })
        }
        Condition::Paralysis { .. }
        | Condition::Freeze { .. }
        | Condition::Sleep { .. }
        | Condition::Confusion { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::tests::make_creature;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn constants() -> BattleConstants {
        BattleConstants::default()
    }

    #[test]
    fn test_apply_to_healthy_target() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut c = make_creature("Target", 80, 80);
        let burn = constants().conditions.build(ConditionKind::Burn);

        assert_eq!(apply_condition(&mut c, burn, &mut rng), ApplyOutcome::Applied(ConditionKind::Burn));
        assert_eq!(c.condition().map(|c| c.kind()), Some(ConditionKind::Burn));
    }

    #[test]
    fn test_burned_target_cannot_be_poisoned() {
        let mut rng = StdRng::seed_from_u64(2);
        let presets = constants().conditions;
        let mut c = make_creature("Target", 80, 80);
        apply_condition(&mut c, presets.build(ConditionKind::Burn), &mut rng);
        let before = c.clone();

        for kind in ConditionKind::ALL {
            let outcome = apply_condition(&mut c, presets.build(kind), &mut rng);
            assert_eq!(outcome, ApplyOutcome::AlreadyAfflicted(ConditionKind::Burn));
            assert_eq!(c, before);
        }
    }

    #[test]
    fn test_zero_chance_never_applies() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut c = make_creature("Target", 80, 80);
        let poison = constants().conditions.build(ConditionKind::Poison).with_chance_to_hit(0.0);
        for _ in 0..50 {
            assert_eq!(apply_condition(&mut c, poison, &mut rng), ApplyOutcome::Missed);
        }
        assert!(c.condition().is_none());
    }

    #[test]
    fn test_freeze_blocks_until_reset() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut c = make_creature("Target", 80, 80);
        c.condition = Some(Condition::Freeze {
            chance_to_reset: 0.0,
            chance_to_hit: 1.0,
        });
        for _ in 0..20 {
            let outcome = pre_move_check(&mut c, &constants(), &mut rng);
            assert_eq!(outcome, PreMoveOutcome::Immobilized(ConditionKind::Freeze));
            assert!(!outcome.can_act());
        }

        c.condition = Some(Condition::Freeze {
            chance_to_reset: 1.0,
            chance_to_hit: 1.0,
        });
        let outcome = pre_move_check(&mut c, &constants(), &mut rng);
        assert_eq!(outcome, PreMoveOutcome::Recovered(ConditionKind::Freeze));
        assert!(outcome.can_act());
        assert!(c.condition().is_none());
    }

    #[test]
    fn test_sleep_wakes_up() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut c = make_creature("Target", 80, 80);
        c.condition = Some(Condition::Sleep {
            chance_to_reset: 1.0,
            chance_to_hit: 1.0,
        });
        assert_eq!(
            pre_move_check(&mut c, &constants(), &mut rng),
            PreMoveOutcome::Recovered(ConditionKind::Sleep)
        );
    }

    #[test]
    fn test_paralysis_never_blocks() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut c = make_creature("Target", 80, 80);
        c.condition = Some(constants().conditions.build(ConditionKind::Paralysis));
        for _ in 0..50 {
            assert_eq!(pre_move_check(&mut c, &constants(), &mut rng), PreMoveOutcome::Ready);
        }
    }

    #[test]
    fn test_confusion_self_hit() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut consts = constants();
        consts.conditions.confusion.self_hit_chance = 1.0;

        let mut c = make_creature("Target", 80, 80);
        c.condition = Some(Condition::Confusion {
            chance_to_reset: 0.0,
            chance_to_hit: 1.0,
        });
        let expected = confusion_self_damage(&c, &consts);
        let hp = c.current_hp();

        let outcome = pre_move_check(&mut c, &consts, &mut rng);
        assert_eq!(outcome, PreMoveOutcome::HurtItself { damage: expected });
        assert_eq!(c.current_hp(), hp - expected);
        // Still confused
        assert_eq!(c.condition().map(|c| c.kind()), Some(ConditionKind::Confusion));
    }

    #[test]
    fn test_confusion_acts_without_self_hit() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut consts = constants();
        consts.conditions.confusion.self_hit_chance = 0.0;

        let mut c = make_creature("Target", 80, 80);
        c.condition = Some(Condition::Confusion {
            chance_to_reset: 0.0,
            chance_to_hit: 1.0,
        });
        let hp = c.current_hp();
        assert_eq!(pre_move_check(&mut c, &consts, &mut rng), PreMoveOutcome::ConfusedActs);
        assert_eq!(c.current_hp(), hp);
    }

    #[test]
    fn test_burn_tick_accumulates() {
        let mut c = make_creature("Target", 80, 80);
        c.max_hp = 160;
        c.current_hp = 160;
        c.condition = Some(Condition::Burn {
            damage_fraction: 1.0 / 16.0,
            attack_mod: 0.5,
            chance_to_hit: 1.0,
        });

        let mut total = 0;
        for _ in 0..4 {
            let tick = end_of_turn_tick(&mut c).unwrap();
            assert_eq!(tick.kind, ConditionKind::Burn);
            assert_eq!(tick.damage, 10);
            total += tick.damage;
        }
        assert_eq!(total, 40);
        assert_eq!(c.current_hp(), 120);
    }

    #[test]
    fn test_poison_tick_clamps_at_zero() {
        let mut c = make_creature("Target", 80, 80);
        c.current_hp = 3;
        c.condition = Some(constants().conditions.build(ConditionKind::Poison));

        let tick = end_of_turn_tick(&mut c).unwrap();
        assert_eq!(tick.damage, 3);
        assert!(c.is_fainted());
        assert!(end_of_turn_tick(&mut c).is_none());
    }

    #[test]
    fn test_non_damaging_conditions_do_not_tick() {
        let presets = constants().conditions;
        for kind in [ConditionKind::Paralysis, ConditionKind::Freeze, ConditionKind::Sleep, ConditionKind::Confusion] {
            let mut c = make_creature("Target", 80, 80);
            c.condition = Some(presets.build(kind));
            assert!(end_of_turn_tick(&mut c).is_none());
            assert_eq!(c.current_hp(), c.max_hp());
        }
    }
}
