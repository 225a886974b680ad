//! Integration test: Load catalog -> Build rosters -> Battle -> Report
//!
//! Validates the full flow from catalog data to a narrated, summarized battle.

use battle_core::driver::{forward_paced, replay, ChannelSink, Pacing};
use battle_core::{Battle, BattleConstants, BattleEvent, Catalog, Controller, EventLog, Side};
use battle_sim::{narrate, BattleSimulation, Narrator, SimulationReport};
use rand::rngs::StdRng;
use rand::SeedableRng;

const CATALOG: &str = r#"
[[moves]]
id = "ember"
name = "Ember"
type = "fire"
class = "special"
power = 40
accuracy = 100
pp = 25

[[moves]]
id = "vine_whip"
name = "Vine Whip"
type = "grass"
class = "physical"
power = 45
accuracy = 100
pp = 25

[[species]]
id = "vulpix"
name = "Vulpix"
types = ["fire"]
moves = ["ember"]
base_stats = { hp = 38, attack = 41, defense = 40, special_attack = 50, special_defense = 65, speed = 65 }

[[species]]
id = "bulbasaur"
name = "Bulbasaur"
types = ["grass", "poison"]
moves = ["vine_whip"]
base_stats = { hp = 45, attack = 49, defense = 49, special_attack = 65, special_defense = 65, speed = 45 }
"#;

#[test]
fn test_full_flow_from_catalog_to_report() {
    let constants = BattleConstants::default();
    let catalog = Catalog::parse(CATALOG, &constants).unwrap();

    let sim = BattleSimulation::run(&catalog, &["vulpix"], &["bulbasaur"], &constants, 11, 200).unwrap();
    let report = &sim.report;

    // Ember is super effective and Vulpix is faster, so it should win
    assert_eq!(report.winner(), Some(Side::User));
    assert_eq!(report.faints.get(Side::Opponent), 1);
    assert_eq!(report.faints.get(Side::User), 0);
    assert!(report.damage_dealt.user > report.damage_dealt.opponent);

    let first_hit = sim.log.iter().find_map(|e| match e {
        BattleEvent::DamageDealt { tier, .. } => Some(*tier),
        _ => None,
    });
    assert_eq!(first_hit, Some(battle_core::EffectivenessTier::SuperEffective));
    assert!(matches!(sim.log.events().last(), Some(BattleEvent::BattleEnded { .. })));
}

#[test]
fn test_report_matches_log() {
    let constants = BattleConstants::default();
    let catalog = Catalog::default_catalog().unwrap();
    let sim = BattleSimulation::run(
        &catalog,
        &["jolteon", "lapras"],
        &["arcanine", "gengar"],
        &constants,
        3,
        500,
    )
    .unwrap();

    let rebuilt = SimulationReport::from_events(3, sim.report.outcome, sim.log.events());
    assert_eq!(rebuilt, sim.report);
}

#[test]
fn test_event_log_json_round_trip() {
    let constants = BattleConstants::default();
    let catalog = Catalog::default_catalog().unwrap();
    let sim = BattleSimulation::run(&catalog, &["pikachu"], &["blastoise"], &constants, 5, 500).unwrap();

    let json = sim.log.to_json().unwrap();
    let parsed: Vec<BattleEvent> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.as_slice(), sim.log.events());
    assert!(json.contains("\"event\": \"battle_started\""));
}

#[test]
fn test_every_battle_has_opening_and_closing_lines() {
    let constants = BattleConstants::default();
    let catalog = Catalog::default_catalog().unwrap();
    let sim = BattleSimulation::run(&catalog, &["charizard"], &["machamp"], &constants, 8, 500).unwrap();

    let lines: Vec<String> = sim.log.iter().flat_map(narrate).collect();
    assert!(lines.iter().any(|l| l == "Go! Charizard!"));
    assert!(lines.iter().any(|l| l.starts_with("Charizard used")));
    let last = lines.last().unwrap();
    assert!(
        last == "You won the battle!" || last == "You lost the battle!" || last == "The battle ended in a draw!"
    );
}

#[tokio::test]
async fn test_paced_narration_matches_direct_narration() {
    let constants = BattleConstants::default();
    let catalog = Catalog::default_catalog().unwrap();
    let sim = BattleSimulation::run(&catalog, &["venusaur"], &["snorlax"], &constants, 21, 500).unwrap();

    let mut narrator = Narrator::new(Vec::new());
    replay(sim.log.events(), &mut narrator, &Pacing::instant()).await;
    let paced = String::from_utf8(narrator.into_inner()).unwrap();

    let direct: String = sim.log.iter().flat_map(narrate).map(|l| l + "\n").collect();
    assert_eq!(paced, direct);
}

#[tokio::test]
async fn test_channel_subscriber_sees_whole_battle() {
    let constants = BattleConstants::default();
    let catalog = Catalog::default_catalog().unwrap();
    let mut battle = Battle::from_catalog(
        &catalog,
        &["gengar"],
        &["pikachu"],
        [Controller::Ai, Controller::Ai],
        constants,
        StdRng::seed_from_u64(99),
    )
    .unwrap();

    let (sink, mut rx) = ChannelSink::channel();
    battle.subscribe(sink);
    while !battle.is_over() && battle.turn() < 500 {
        battle.advance().unwrap();
    }
    let expected = battle.log().clone();
    drop(battle);

    let mut received = EventLog::new();
    let delivered = forward_paced(&mut rx, &mut received, &Pacing::instant()).await;
    assert_eq!(delivered, expected.len());
    assert_eq!(received, expected);
}
