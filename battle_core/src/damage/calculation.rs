//! Damage calculation - turning a move + two creatures into damage

use super::{DamageOutcome, MoveImpact};
use crate::config::BattleConstants;
use crate::creature::{Creature, Move};
use crate::effectiveness::EffectivenessTier;
use crate::stats::BattleStat;
use crate::types::{roll, DamageClass, MoveTarget};
use rand::Rng;

/// `floor(((2*level/5 + 2) * atk * power) / def / 50) + 2`
pub fn raw_damage(level: u32, attack: u32, defense: u32, power: u32) -> u32 {
    let level_factor = 2.0 * level as f64 / 5.0 + 2.0;
    let defense = defense.max(1) as f64;
    let base = (level_factor * attack as f64 * power as f64) / defense / 50.0;
    (base.floor() as u32).saturating_add(2)
}

/// Deterministic damage of `mv` from `attacker` against `defender`
///
/// Status moves deal nothing and carry no tier. Damaging moves with power
/// against a non-immune defender always deal at least 1.
pub fn calculate_damage(
    mv: &Move,
    attacker: &Creature,
    defender: &Creature,
    constants: &BattleConstants,
) -> DamageOutcome {
    let (attack_stat, defense_stat) = match mv.class {
        DamageClass::Status => return DamageOutcome::status(),
        DamageClass::Physical => (BattleStat::Attack, BattleStat::Defense),
        DamageClass::Special => (BattleStat::SpecialAttack, BattleStat::SpecialDefense),
    };

    let raw = raw_damage(
        constants.stats.level,
        attacker.stat(attack_stat),
        defender.stat(defense_stat),
        mv.power,
    );
    let multiplier = mv.element.effectiveness_multi(&defender.types);

    let mut damage = (raw as f64 * multiplier).floor() as u32;
    if mv.power > 0 && multiplier > 0.0 {
        damage = damage.max(1);
    }

    DamageOutcome {
        raw_damage: raw,
        damage,
        multiplier,
        tier: Some(EffectivenessTier::from_multiplier(multiplier)),
    }
}

/// Full impact of a landed move, rolling its secondary effect
///
/// The secondary roll is independent of the accuracy roll. Immune targets
/// get no secondary effects. Damaging moves always target the opponent;
/// status moves target whoever `mv.target` names.
pub fn calculate_move_impact(
    mv: &Move,
    attacker: &Creature,
    defender: &Creature,
    constants: &BattleConstants,
    rng: &mut impl Rng,
) -> MoveImpact {
    let outcome = calculate_damage(mv, attacker, defender, constants);
    let target = if mv.is_damaging() { MoveTarget::Opponent } else { mv.target };

    let mut impact = MoveImpact {
        target,
        outcome,
        condition: None,
        stat_change: None,
        recoil: 0,
        drain: 0,
    };

    let Some(effect) = &mv.effect else {
        return impact;
    };
    if outcome.is_immune() {
        return impact;
    }

    if roll(rng, effect.chance) {
        impact.condition = effect.condition.map(|kind| constants.conditions.build(kind));
        impact.stat_change = effect.stat_change;
    }

    let dealt = outcome.damage as f64;
    impact.recoil = (dealt * effect.recoil.max(0.0)).floor() as u32;
    impact.drain = (dealt * effect.drain.max(0.0)).floor() as u32;

    impact
}

/// Damage a confused creature deals to itself
///
/// Half the configured reference power, typeless, using its own attack
/// against its own defense.
pub fn confusion_self_damage(creature: &Creature, constants: &BattleConstants) -> u32 {
    let power = constants.conditions.confusion.reference_power / 2;
    raw_damage(
        constants.stats.level,
        creature.stat(BattleStat::Attack),
        creature.stat(BattleStat::Defense),
        power,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::ConditionKind;
    use crate::creature::{SecondaryEffect, StatChange};
    use crate::effectiveness::ElementType;
    use crate::stats::{StatFormula, Stats};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn creature(types: Vec<ElementType>, base: u32) -> Creature {
        Creature::new(
            "mon",
            "Mon",
            types,
            Stats::new(base, base, base, base, base, base),
            Vec::new(),
            &StatFormula::default(),
        )
    }

    fn physical(element: ElementType, power: u32) -> Move {
        Move::new("hit", "Hit", element, DamageClass::Physical, power, 100, 10)
    }

    #[test]
    fn test_raw_damage_formula() {
        // ((42 * 100 * 80) / 100 / 50) + 2 = 67.2 -> 67 + 2
        assert_eq!(raw_damage(100, 100, 100, 80), 69);
        // Zero defense is treated as 1
        assert_eq!(raw_damage(100, 100, 0, 80), raw_damage(100, 100, 1, 80));
        // Huge inputs saturate instead of overflowing
        assert_eq!(raw_damage(100, u32::MAX, 1, u32::MAX), u32::MAX);
    }

    #[test]
    fn test_oversized_power_saturates() {
        let constants = BattleConstants::default();
        let attacker = creature(vec![ElementType::Water], 255);
        let defender = creature(vec![ElementType::Fire], 5);
        let outcome = calculate_damage(&physical(ElementType::Water, 4_000_000_000), &attacker, &defender, &constants);
        assert_eq!(outcome.raw_damage, u32::MAX);
        assert_eq!(outcome.damage, u32::MAX);
    }

    #[test]
    fn test_normal_hit() {
        let constants = BattleConstants::default();
        let attacker = creature(vec![ElementType::Normal], 100);
        let defender = creature(vec![ElementType::Normal], 100);
        let outcome = calculate_damage(&physical(ElementType::Normal, 80), &attacker, &defender, &constants);

        // Equal attack and defense: floor(42 * 80 / 50) + 2 = 69
        assert_eq!(outcome.raw_damage, 69);
        assert_eq!(outcome.damage, 69);
        assert_eq!(outcome.tier, Some(EffectivenessTier::Normal));
    }

    #[test]
    fn test_super_effective_doubles() {
        let constants = BattleConstants::default();
        let attacker = creature(vec![ElementType::Water], 100);
        let defender = creature(vec![ElementType::Fire], 100);
        let outcome = calculate_damage(&physical(ElementType::Water, 80), &attacker, &defender, &constants);
        assert_eq!(outcome.damage, 138);
        assert_eq!(outcome.tier, Some(EffectivenessTier::SuperEffective));
    }

    #[test]
    fn test_multi_type_quadruple() {
        let constants = BattleConstants::default();
        let attacker = creature(vec![ElementType::Electric], 100);
        let defender = creature(vec![ElementType::Water, ElementType::Flying], 100);
        let outcome = calculate_damage(&physical(ElementType::Electric, 80), &attacker, &defender, &constants);
        assert!((outcome.multiplier - 4.0).abs() < f64::EPSILON);
        assert_eq!(outcome.damage, 69 * 4);
    }

    #[test]
    fn test_immune_deals_nothing() {
        let constants = BattleConstants::default();
        let attacker = creature(vec![ElementType::Normal], 100);
        let defender = creature(vec![ElementType::Ghost], 100);
        let outcome = calculate_damage(&physical(ElementType::Normal, 80), &attacker, &defender, &constants);
        assert_eq!(outcome.damage, 0);
        assert!(outcome.is_immune());
    }

    #[test]
    fn test_status_move_has_no_tier() {
        let constants = BattleConstants::default();
        let attacker = creature(vec![ElementType::Normal], 100);
        let defender = creature(vec![ElementType::Ghost], 100);
        let growl = Move::new("growl", "Growl", ElementType::Normal, DamageClass::Status, 0, 100, 40);
        let outcome = calculate_damage(&growl, &attacker, &defender, &constants);
        assert_eq!(outcome, DamageOutcome::status());
    }

    #[test]
    fn test_special_uses_special_stats() {
        let constants = BattleConstants::default();
        let attacker = Creature::new(
            "a",
            "A",
            vec![ElementType::Normal],
            Stats::new(100, 10, 100, 150, 100, 100),
            Vec::new(),
            &StatFormula::default(),
        );
        let defender = creature(vec![ElementType::Normal], 100);
        let special = Move::new("beam", "Beam", ElementType::Normal, DamageClass::Special, 80, 100, 10);
        let phys = physical(ElementType::Normal, 80);

        let s = calculate_damage(&special, &attacker, &defender, &constants);
        let p = calculate_damage(&phys, &attacker, &defender, &constants);
        assert!(s.damage > p.damage);
    }

    #[test]
    fn test_impact_rolls_secondary() {
        let constants = BattleConstants::default();
        let mut rng = StdRng::seed_from_u64(11);
        let attacker = creature(vec![ElementType::Fire], 100);
        let defender = creature(vec![ElementType::Normal], 100);

        let sure_burn = physical(ElementType::Fire, 80).with_effect(SecondaryEffect::condition(ConditionKind::Burn, 1.0));
        let impact = calculate_move_impact(&sure_burn, &attacker, &defender, &constants, &mut rng);
        assert_eq!(impact.condition.map(|c| c.kind()), Some(ConditionKind::Burn));

        let never = physical(ElementType::Fire, 80).with_effect(SecondaryEffect::condition(ConditionKind::Burn, 0.0));
        for _ in 0..20 {
            let impact = calculate_move_impact(&never, &attacker, &defender, &constants, &mut rng);
            assert!(impact.condition.is_none());
        }
    }

    #[test]
    fn test_recoil_and_drain_fractions() {
        let constants = BattleConstants::default();
        let mut rng = StdRng::seed_from_u64(12);
        let attacker = creature(vec![ElementType::Normal], 100);
        let defender = creature(vec![ElementType::Normal], 100);

        let recoil = physical(ElementType::Normal, 80).with_effect(SecondaryEffect::recoil(0.25));
        let impact = calculate_move_impact(&recoil, &attacker, &defender, &constants, &mut rng);
        assert_eq!(impact.damage(), 69);
        assert_eq!(impact.recoil, 17);
        assert_eq!(impact.drain, 0);

        let drain = physical(ElementType::Normal, 80).with_effect(SecondaryEffect::drain(0.5));
        let impact = calculate_move_impact(&drain, &attacker, &defender, &constants, &mut rng);
        assert_eq!(impact.drain, 34);
    }

    #[test]
    fn test_status_move_targets_self() {
        let constants = BattleConstants::default();
        let mut rng = StdRng::seed_from_u64(13);
        let attacker = creature(vec![ElementType::Normal], 100);
        let defender = creature(vec![ElementType::Normal], 100);
        let swords = Move::new("swords", "Swords Dance", ElementType::Normal, DamageClass::Status, 0, 100, 20)
            .with_target(MoveTarget::User)
            .with_effect(SecondaryEffect::stat_change(StatChange::new(BattleStat::Attack, 2), 1.0));

        let impact = calculate_move_impact(&swords, &attacker, &defender, &constants, &mut rng);
        assert_eq!(impact.target, MoveTarget::User);
        assert_eq!(impact.damage(), 0);
        assert_eq!(impact.stat_change.map(|s| s.stages), Some(2));
    }

    #[test]
    fn test_immune_target_gets_no_secondary() {
        let constants = BattleConstants::default();
        let mut rng = StdRng::seed_from_u64(14);
        let attacker = creature(vec![ElementType::Normal], 100);
        let defender = creature(vec![ElementType::Ghost], 100);
        let mv = physical(ElementType::Normal, 80).with_effect(SecondaryEffect::condition(ConditionKind::Paralysis, 1.0));
        let impact = calculate_move_impact(&mv, &attacker, &defender, &constants, &mut rng);
        assert!(!impact.has_secondary());
    }

    #[test]
    fn test_confusion_self_damage_uses_own_stats() {
        let constants = BattleConstants::default();
        let c = creature(vec![ElementType::Normal], 100);
        // Reference power 100 -> 50: floor(42 * 50 / 50) + 2
        assert_eq!(confusion_self_damage(&c, &constants), 44);
    }

    proptest! {
        #[test]
        fn damaging_move_deals_at_least_one(
            atk_base in 1u32..255,
            def_base in 1u32..255,
            power in 1u32..250,
            move_type in 0usize..18,
            def_a in 0usize..18,
            def_b in 0usize..18,
            dual in proptest::bool::ANY,
        ) {
            let constants = BattleConstants::default();
            let attacker = creature(vec![ElementType::Normal], atk_base);
            let mut types = vec![ElementType::ALL[def_a]];
            if dual && def_a != def_b {
                types.push(ElementType::ALL[def_b]);
            }
            let defender = creature(types, def_base);
            let mv = physical(ElementType::ALL[move_type], power);

            let outcome = calculate_damage(&mv, &attacker, &defender, &constants);
            if outcome.multiplier > 0.0 {
                prop_assert!(outcome.damage >= 1);
            } else {
                prop_assert_eq!(outcome.damage, 0);
            }
        }
    }
}
