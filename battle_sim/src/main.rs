//! battle_sim - Run a seeded AI-vs-AI battle and narrate it

use anyhow::{bail, Context, Result};
use battle_core::driver::{replay, Pacing};
use battle_core::{BattleConstants, Catalog, Side};
use battle_sim::{BattleSimulation, Narrator, SeriesSummary};
use clap::Parser;
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "battle_sim", version, about = "Simulate a creature battle")]
struct Args {
    /// Species ids for the user side, comma separated
    #[arg(short, long, value_delimiter = ',', default_value = "charizard,blastoise,venusaur")]
    user: Vec<String>,

    /// Species ids for the opponent side, comma separated
    #[arg(short, long, value_delimiter = ',', default_value = "gengar,snorlax,machamp")]
    opponent: Vec<String>,

    /// RNG seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Catalog TOML to use instead of the built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Battle constants TOML to use instead of the defaults
    #[arg(long)]
    constants: Option<PathBuf>,

    /// Stop after this many turns
    #[arg(long, default_value_t = 500)]
    max_turns: u32,

    /// Base delay between narrated lines, in milliseconds
    #[arg(long, default_value_t = 0)]
    paced_ms: u64,

    /// Print the report and event log as JSON instead of narrating
    #[arg(long)]
    json: bool,

    /// Run this many battles on consecutive seeds and print win rates
    #[arg(long)]
    series: Option<u64>,

    /// List the catalog's species and exit
    #[arg(long)]
    list: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            args.log_json
                .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with((!args.log_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    let constants = match &args.constants {
        Some(path) => BattleConstants::load(path)
            .with_context(|| format!("loading constants from {}", path.display()))?,
        None => BattleConstants::default(),
    };
    let catalog = match &args.catalog {
        Some(path) => {
            Catalog::load(path, &constants).with_context(|| format!("loading catalog from {}", path.display()))?
        }
        None => Catalog::default_catalog().context("loading built-in catalog")?,
    };

    if args.list {
        for id in catalog.species_ids() {
            if let Some(species) = catalog.get_species(id) {
                let types: Vec<&str> = species.types.iter().map(|t| t.as_str()).collect();
                println!("{:<12} {:<12} {}", species.id, species.name, types.join("/"));
            }
        }
        return Ok(());
    }

    if args.user.is_empty() || args.opponent.is_empty() {
        bail!("both sides need at least one species");
    }

    if let Some(count) = args.series {
        let seeds = args.seed..args.seed.saturating_add(count);
        let summary = SeriesSummary::run(&catalog, &args.user, &args.opponent, &constants, seeds, args.max_turns)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!("Battles: {}", summary.battles);
            println!("User wins: {} ({:.1}%)", summary.wins.user, summary.win_rate(Side::User));
            println!(
                "Opponent wins: {} ({:.1}%)",
                summary.wins.opponent,
                summary.win_rate(Side::Opponent)
            );
            println!("Draws: {}  Unfinished: {}", summary.draws, summary.unfinished);
            println!("Average turns: {:.1}", summary.avg_turns());
        }
        return Ok(());
    }

    let sim = BattleSimulation::run(
        &catalog,
        &args.user,
        &args.opponent,
        &constants,
        args.seed,
        args.max_turns,
    )?;

    if args.json {
        let dump = json!({
            "report": sim.report,
            "events": sim.log.events(),
        });
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(());
    }

    let mut narrator = Narrator::stdout();
    replay(sim.log.events(), &mut narrator, &Pacing::from_millis(args.paced_ms)).await;

    println!();
    println!("{}", sim.report);
    Ok(())
}
