//! Headless Round Simulator
//!
//! Plays N seeded rounds against an in-memory preference store and reports
//! round type frequencies and item counts.

use ahash::AHashMap;
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use retake_allocator::allocation::{RecordingDelivery, RoundAllocator};
use retake_allocator::core::config::Config;
use retake_allocator::core::error::Result;
use retake_allocator::core::{ConfigHandle, PlayerId, RoundType, Team};
use retake_allocator::items::{Item, WeaponSlot};
use retake_allocator::preferences::{InMemoryPreferenceStore, PreferenceStore};

/// Headless Round Simulator - allocation statistics over many rounds
#[derive(Parser, Debug)]
#[command(name = "round_sim")]
#[command(about = "Simulate retake rounds and report allocation statistics")]
struct Args {
    /// Number of rounds to play
    #[arg(long, default_value_t = 1000)]
    rounds: u32,

    /// Players per team
    #[arg(long, default_value_t = 5)]
    players: u64,

    /// Config file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

#[derive(Serialize)]
struct SimulationReport {
    seed: u64,
    rounds: u32,
    round_types: BTreeMap<String, u32>,
    items: BTreeMap<String, u32>,
    defuse_kits: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("retake_allocator=warn")
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(|| rand::random());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let config = match &args.config {
        Some(path) => Config::load(path)?.0,
        None => Config::default(),
    };

    let store = Arc::new(InMemoryPreferenceStore::new());
    let t_roster: Vec<PlayerId> = (1..=args.players).map(PlayerId::new).collect();
    let ct_roster: Vec<PlayerId> = (101..=100 + args.players).map(PlayerId::new).collect();
    seed_preferences(store.as_ref(), &config, &t_roster, Team::Terrorist, &mut rng)?;
    seed_preferences(store.as_ref(), &config, &ct_roster, Team::CounterTerrorist, &mut rng)?;

    let mut allocator = RoundAllocator::new(ConfigHandle::new(config), store);

    let mut round_types: AHashMap<RoundType, u32> = AHashMap::new();
    let mut items: AHashMap<Item, u32> = AHashMap::new();
    let mut defuse_kits = 0;

    for _ in 0..args.rounds {
        let mut delivery = RecordingDelivery::default();
        let summary = allocator.start_round(&t_roster, &ct_roster, &mut delivery, &mut rng)?;
        *round_types.entry(summary.round_type).or_default() += 1;
        for granted in delivery.items.values() {
            for item in granted {
                *items.entry(*item).or_default() += 1;
            }
        }
        defuse_kits += delivery.defuse_kits.len() as u32;
    }

    let report = SimulationReport {
        seed,
        rounds: args.rounds,
        round_types: round_types
            .into_iter()
            .map(|(rt, n)| (rt.display_name().to_string(), n))
            .collect(),
        items: items
            .into_iter()
            .map(|(item, n)| (item.as_str().to_string(), n))
            .collect(),
        defuse_kits,
    };

    if args.format == "json" {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize report: {}", e),
        }
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Give roughly half of the roster a stored loadout and AWP opt-in
fn seed_preferences(
    store: &dyn PreferenceStore,
    config: &Config,
    roster: &[PlayerId],
    team: Team,
    rng: &mut ChaCha8Rng,
) -> Result<()> {
    for player in roster {
        if rng.gen::<f64>() < 0.5 {
            continue;
        }
        for slot in WeaponSlot::DEFAULTABLE {
            let options = config.usable_weapons_for(slot, team);
            if !options.is_empty() {
                let weapon = options[rng.gen_range(0..options.len())];
                store.set_weapon(*player, team, slot, weapon)?;
            }
        }
        if rng.gen::<f64>() < 0.3 {
            store.set_awp_on_turn(*player, true)?;
        }
    }
    Ok(())
}

fn print_report(report: &SimulationReport) {
    println!("=== ROUND SIMULATION (seed {}) ===", report.seed);
    println!();
    println!("Round types over {} rounds:", report.rounds);
    for (name, count) in &report.round_types {
        let share = f64::from(*count) / f64::from(report.rounds.max(1)) * 100.0;
        println!("  {:<10} {:>6} ({:.1}%)", name, count, share);
    }
    println!();
    println!("Items granted:");
    for (item, count) in &report.items {
        println!("  {:<16} {:>6}", item, count);
    }
    println!("  {:<16} {:>6}", "defuse_kit", report.defuse_kits);
}
