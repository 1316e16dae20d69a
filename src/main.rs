//! Retake Allocator - Console Host
//!
//! Stands in for a game server: players join teams, open menus, type chat
//! commands and start rounds from stdin. Menu timeouts run on tokio.

use retake_allocator::allocation::{ItemDelivery, RoundAllocator};
use retake_allocator::command::{parse_command, CommandContext, CommandExecutor};
use retake_allocator::core::config::Config;
use retake_allocator::core::error::Result;
use retake_allocator::core::{ConfigHandle, PlayerId, Team};
use retake_allocator::items::Item;
use retake_allocator::menu::{
    GunsMenu, MenuCoordinator, MenuKind, MenuOutcome, MenuPresenter, MenuView, NextRoundVoteMenu,
    TokioScheduler,
};
use retake_allocator::preferences::open_store;
use retake_allocator::MESSAGE_PREFIX;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "retake-allocator")]
#[command(about = "Console host for the retake weapon allocator")]
struct Args {
    /// Config file, created with defaults if missing
    #[arg(long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Random seed for reproducible rounds
    #[arg(long)]
    seed: Option<u64>,

    /// Override the database connection string from the config
    #[arg(long)]
    db: Option<String>,
}

/// Prints menus and chat lines to stdout
struct ConsolePresenter;

impl MenuPresenter for ConsolePresenter {
    fn show_menu(&mut self, player: PlayerId, view: &MenuView) {
        println!("[{}] {}{}", player, MESSAGE_PREFIX, view.title);
        for (i, option) in view.options.iter().enumerate() {
            println!("    {}. {}", i + 1, option.label);
        }
    }

    fn notify(&mut self, player: PlayerId, message: &str) {
        println!("[{}] {}", player, message);
    }
}

/// Prints granted items
struct ConsoleDelivery;

impl ItemDelivery for ConsoleDelivery {
    fn give_items(&mut self, player: PlayerId, items: &[Item]) {
        let names: Vec<&str> = items.iter().map(|i| i.display_name()).collect();
        println!("  {:>20}: {}", player, names.join(", "));
    }

    fn give_defuse_kit(&mut self, player: PlayerId) {
        println!("  {:>20}: + Defuse Kit", player);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("retake_allocator=info")),
        )
        .init();

    let args = Args::parse();

    let (mut config, _warnings) = Config::load_or_create(&args.config)?;
    if let Some(db) = args.db {
        config.database.connection_string = db;
    }
    let store = open_store(&config.database, config.migrate_on_startup)?;
    let handle = ConfigHandle::new(config);

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!("Retake allocator starting (seed {})", seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let rt = Runtime::new()?;
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let scheduler = TokioScheduler::new(rt.handle().clone(), events_tx);

    let mut allocator = RoundAllocator::new(handle.clone(), store.clone());
    let mut menus = MenuCoordinator::new(handle.clone(), store.clone(), ConsolePresenter, scheduler);
    menus.register(Box::new(GunsMenu::new()));
    menus.register(Box::new(NextRoundVoteMenu::new(allocator.votes())));

    let mut players: BTreeMap<PlayerId, Team> = BTreeMap::new();

    println!("\n=== RETAKE ALLOCATOR ===");
    println!();
    println!("Commands:");
    println!("  join <id> <t|ct>            - Add a player to a team");
    println!("  leave <id>                  - Remove a player");
    println!("  guns <id>                   - Open the weapon menu");
    println!("  vote <id>                   - Open the next round vote");
    println!("  pick <id> <n>               - Pick option n in the player's menu");
    println!("  gun <id> <weapon> [t|ct]    - Set a weapon preference");
    println!("  removegun <id> <weapon>     - Remove a weapon preference");
    println!("  nextround <type>            - Force the next round type");
    println!("  round / r                   - Start a round");
    println!("  status / s                  - Show players and menus");
    println!("  reload                      - Reload the config file");
    println!("  quit / q                    - Exit");
    println!();

    loop {
        // Timeouts that fired while waiting for input
        while let Ok(event) = events_rx.try_recv() {
            menus.dispatch(event)?;
        }

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        while let Ok(event) = events_rx.try_recv() {
            menus.dispatch(event)?;
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts.as_slice() {
            ["quit"] | ["q"] => break,
            ["join", id, team] => match (parse_player(id), Team::parse(team)) {
                (Some(player), Some(team)) => {
                    players.insert(player, team);
                    println!("Player {} joined {}", player, team.short_name());
                }
                _ => println!("Usage: join <id> <t|ct>"),
            },
            ["leave", id] => match parse_player(id) {
                Some(player) => {
                    players.remove(&player);
                    menus.on_disconnect(player);
                    println!("Player {} left", player);
                }
                None => println!("Usage: leave <id>"),
            },
            ["guns", id] | ["vote", id] => {
                let kind = if parts[0] == "guns" {
                    MenuKind::Guns
                } else {
                    MenuKind::NextRoundVote
                };
                match parse_player(id) {
                    Some(player) => {
                        menus.open_menu(player, kind);
                    }
                    None => println!("Usage: {} <id>", parts[0]),
                }
            }
            ["pick", id, n] => match (parse_player(id), n.parse::<usize>()) {
                (Some(player), Ok(n)) if n > 0 => match menus.select_index(player, n - 1) {
                    Ok(MenuOutcome::Ignored) => println!("Nothing to pick"),
                    Ok(_) => {}
                    Err(e) => println!("Could not save selection: {}", e),
                },
                _ => println!("Usage: pick <id> <n>"),
            },
            ["gun", id, rest @ ..] | ["removegun", id, rest @ ..] => match parse_player(id) {
                Some(player) => {
                    let line = format!("{} {}", parts[0], rest.join(" "));
                    let team = players.get(&player).copied().unwrap_or(Team::None);
                    run_chat_command(&handle, store.as_ref(), &mut allocator, player, team, &line);
                }
                None => println!("Usage: {} <id> <weapon> [t|ct]", parts[0]),
            },
            ["nextround", ..] => {
                run_chat_command(
                    &handle,
                    store.as_ref(),
                    &mut allocator,
                    PlayerId::UNAUTHENTICATED,
                    Team::None,
                    input,
                );
            }
            ["round"] | ["r"] => {
                let t: Vec<PlayerId> = roster(&players, Team::Terrorist);
                let ct: Vec<PlayerId> = roster(&players, Team::CounterTerrorist);
                match allocator.start_round(&t, &ct, &mut ConsoleDelivery, &mut rng) {
                    Ok(summary) => {
                        if let Some(announcement) = summary.announcement {
                            println!("{}{}", MESSAGE_PREFIX, announcement);
                        }
                    }
                    Err(e) => println!("Round start failed: {}", e),
                }
            }
            ["status"] | ["s"] => {
                println!("Players: {}", players.len());
                for (player, team) in &players {
                    let menu = menus
                        .session(*player)
                        .map(|s| format!(" (in {} menu, {})", s.kind, s.step.label()))
                        .unwrap_or_default();
                    println!("  {:>20} {}{}", player, team.short_name(), menu);
                }
                if let Some(round_type) = allocator.current_round_type() {
                    println!("Current round: {}", round_type);
                }
                if let Some(round_type) = allocator.next_round_type() {
                    println!("Next round forced: {}", round_type);
                }
            }
            ["reload"] => match handle.reload_from(&args.config) {
                Ok(warnings) => println!("Config reloaded ({} warnings)", warnings.len()),
                Err(e) => println!("Config not reloaded: {}", e),
            },
            _ => println!("Unknown command: {}", input),
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn parse_player(id: &str) -> Option<PlayerId> {
    id.parse::<u64>().ok().map(PlayerId::new)
}

fn roster(players: &BTreeMap<PlayerId, Team>, team: Team) -> Vec<PlayerId> {
    players
        .iter()
        .filter(|(_, t)| **t == team)
        .map(|(p, _)| *p)
        .collect()
}

fn run_chat_command(
    handle: &ConfigHandle,
    store: &dyn retake_allocator::preferences::PreferenceStore,
    allocator: &mut RoundAllocator,
    player: PlayerId,
    current_team: Team,
    line: &str,
) {
    let command = match parse_command(line) {
        Ok(Some(command)) => command,
        Ok(None) => return,
        Err(e) => {
            println!("{}{}", MESSAGE_PREFIX, e);
            return;
        }
    };

    let config = handle.snapshot();
    let ctx = CommandContext {
        config: &config,
        store,
        player,
        current_team,
    };
    match CommandExecutor::execute(&ctx, &command) {
        Ok(result) => {
            if let Some(round_type) = result.next_round_type {
                allocator.set_next_round_type(Some(round_type));
            }
            println!("[{}] {}{}", player, MESSAGE_PREFIX, result.message);
        }
        Err(e) => println!("Command failed: {}", e),
    }
}
