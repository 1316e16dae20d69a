//! Integration tests for the preference menus
//!
//! Menus are driven through the coordinator with a recording presenter and
//! a manual clock, the same way a game host would feed them events.

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use retake_allocator::allocation::{RecordingDelivery, RoundAllocator};
use retake_allocator::core::config::{Config, WeaponSelectionType};
use retake_allocator::core::error::{AllocatorError, Result};
use retake_allocator::core::{ConfigHandle, PlayerId, RoundType, Team};
use retake_allocator::items::{Item, WeaponSlot};
use retake_allocator::menu::{
    AwpPolicy, GunsMenu, ManualScheduler, MenuChoice, MenuCoordinator, MenuKind, MenuOutcome,
    MenuStep, NextRoundVoteMenu, RecordingPresenter,
};
use retake_allocator::preferences::{InMemoryPreferenceStore, PlayerPreferences, PreferenceStore};

type Menus = MenuCoordinator<RecordingPresenter, ManualScheduler>;

const PLAYER: PlayerId = PlayerId(76561198000000001);

fn guns_menus(config: Config, store: Arc<dyn PreferenceStore>) -> Menus {
    let mut menus = MenuCoordinator::new(
        ConfigHandle::new(config),
        store,
        RecordingPresenter::new(),
        ManualScheduler::new(),
    );
    menus.register(Box::new(GunsMenu::new()));
    menus
}

/// Store that fails every write while `failing` is set
#[derive(Default)]
struct FlakyStore {
    inner: InMemoryPreferenceStore,
    failing: AtomicBool,
}

impl FlakyStore {
    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(AllocatorError::Store("database is locked".into()))
        } else {
            Ok(())
        }
    }
}

impl PreferenceStore for FlakyStore {
    fn set_weapon(&self, player: PlayerId, team: Team, slot: WeaponSlot, weapon: Item) -> Result<()> {
        self.check()?;
        self.inner.set_weapon(player, team, slot, weapon)
    }

    fn clear_weapon(&self, player: PlayerId, team: Team, slot: WeaponSlot) -> Result<()> {
        self.check()?;
        self.inner.clear_weapon(player, team, slot)
    }

    fn set_awp_on_turn(&self, player: PlayerId, on_turn: bool) -> Result<()> {
        self.check()?;
        self.inner.set_awp_on_turn(player, on_turn)
    }

    fn get(&self, player: PlayerId) -> Result<PlayerPreferences> {
        self.inner.get(player)
    }

    fn get_many(&self, players: &[PlayerId]) -> Result<AHashMap<PlayerId, PlayerPreferences>> {
        self.inner.get_many(players)
    }
}

fn current_step(menus: &Menus) -> Option<MenuStep> {
    menus.session(PLAYER).map(|s| s.step)
}

#[test]
fn test_full_guns_flow_persists_every_step() {
    let store = Arc::new(InMemoryPreferenceStore::new());
    let mut menus = guns_menus(Config::default(), store.clone());

    assert!(menus.open_menu(PLAYER, MenuKind::Guns));
    assert_eq!(
        menus.presenter().last_menu(PLAYER).map(|v| v.title.as_str()),
        Some("Select a T Primary Weapon")
    );

    let picks = [
        (MenuStep::TPrimary, MenuChoice::Weapon(Item::Ak47)),
        (MenuStep::TSecondary, MenuChoice::Weapon(Item::P250)),
        (MenuStep::CtPrimary, MenuChoice::Weapon(Item::M4a4)),
        (MenuStep::CtSecondary, MenuChoice::Weapon(Item::FiveSeven)),
    ];
    for (step, choice) in picks {
        let outcome = menus.select(PLAYER, step, choice).unwrap();
        assert!(matches!(outcome, MenuOutcome::Advanced(_)), "{:?}", outcome);
    }
    assert_eq!(current_step(&menus), Some(MenuStep::AwpPolicy));
    assert_eq!(
        menus.presenter().last_menu(PLAYER).map(|v| v.title.as_str()),
        Some("Select when to give the AWP")
    );

    let outcome = menus
        .select(PLAYER, MenuStep::AwpPolicy, MenuChoice::Awp(AwpPolicy::OnMyTurn))
        .unwrap();
    assert_eq!(outcome, MenuOutcome::Completed);
    assert!(!menus.is_in_menu(PLAYER));
    assert_eq!(menus.scheduler().live_timers(), 0);

    let prefs = store.get(PLAYER).unwrap();
    assert_eq!(prefs.weapon(Team::Terrorist, WeaponSlot::FullBuyPrimary), Some(Item::Ak47));
    assert_eq!(prefs.weapon(Team::Terrorist, WeaponSlot::Secondary), Some(Item::P250));
    assert_eq!(prefs.weapon(Team::Terrorist, WeaponSlot::PistolRound), Some(Item::P250));
    assert_eq!(
        prefs.weapon(Team::CounterTerrorist, WeaponSlot::FullBuyPrimary),
        Some(Item::M4a4)
    );
    assert_eq!(
        prefs.weapon(Team::CounterTerrorist, WeaponSlot::Secondary),
        Some(Item::FiveSeven)
    );
    assert_eq!(prefs.weapon(Team::CounterTerrorist, WeaponSlot::PistolRound), None);
    assert!(prefs.awp_on_turn);

    let messages = menus.presenter().messages_for(PLAYER);
    assert_eq!(
        messages.first().copied(),
        Some(format!("[Retakes] You selected {} as T Primary!", Item::Ak47.display_name()).as_str())
    );
    assert!(messages.contains(&"[Retakes] You have finished setting up your weapons!"));
    assert!(messages.contains(
        &"[Retakes] The weapons you have selected will be given to you at the start of the next round!"
    ));
}

#[test]
fn test_second_open_is_rejected_and_keeps_step() {
    let mut menus = guns_menus(Config::default(), Arc::new(InMemoryPreferenceStore::new()));

    assert!(menus.open_menu(PLAYER, MenuKind::Guns));
    assert!(!menus.open_menu(PLAYER, MenuKind::Guns));
    assert_eq!(current_step(&menus), Some(MenuStep::TPrimary));
    assert_eq!(menus.active_sessions(), 1);
    assert_eq!(
        menus.presenter().messages_for(PLAYER),
        vec!["[Retakes] You are already using another menu!"]
    );
}

#[test]
fn test_timeout_closes_menu_and_later_selection_is_ignored() {
    let store = Arc::new(InMemoryPreferenceStore::new());
    let mut menus = guns_menus(Config::default(), store.clone());
    menus.open_menu(PLAYER, MenuKind::Guns);

    // Not yet expired
    assert!(menus.scheduler_mut().advance(Duration::from_secs(29)).is_empty());

    let events = menus.scheduler_mut().advance(Duration::from_secs(1));
    assert_eq!(events.len(), 1);
    let outcomes: Vec<MenuOutcome> = events
        .into_iter()
        .map(|event| menus.dispatch(event).unwrap())
        .collect();
    assert_eq!(outcomes, vec![MenuOutcome::TimedOut]);
    assert!(!menus.is_in_menu(PLAYER));
    assert_eq!(
        menus.presenter().messages_for(PLAYER),
        vec!["[Retakes] You did not interact with the menu in 30 seconds!"]
    );

    let late = menus
        .select(PLAYER, MenuStep::TPrimary, MenuChoice::Weapon(Item::Ak47))
        .unwrap();
    assert_eq!(late, MenuOutcome::Ignored);
    assert!(store.get(PLAYER).unwrap().is_empty());
}

#[test]
fn test_activity_restarts_the_timeout() {
    let mut menus = guns_menus(Config::default(), Arc::new(InMemoryPreferenceStore::new()));
    menus.open_menu(PLAYER, MenuKind::Guns);

    assert!(menus.scheduler_mut().advance(Duration::from_secs(20)).is_empty());
    menus
        .select(PLAYER, MenuStep::TPrimary, MenuChoice::Weapon(Item::Ak47))
        .unwrap();
    assert!(menus.scheduler_mut().advance(Duration::from_secs(20)).is_empty());
    assert!(menus.is_in_menu(PLAYER));

    let events = menus.scheduler_mut().advance(Duration::from_secs(10));
    assert_eq!(events.len(), 1);
    assert_eq!(menus.dispatch(events[0]).unwrap(), MenuOutcome::TimedOut);
}

#[test]
fn test_exit_keeps_committed_preferences() {
    let store = Arc::new(InMemoryPreferenceStore::new());
    let mut menus = guns_menus(Config::default(), store.clone());
    menus.open_menu(PLAYER, MenuKind::Guns);
    menus
        .select(PLAYER, MenuStep::TPrimary, MenuChoice::Weapon(Item::Galil))
        .unwrap();

    let outcome = menus
        .select(PLAYER, MenuStep::TSecondary, MenuChoice::Exit)
        .unwrap();
    assert_eq!(outcome, MenuOutcome::Cancelled);
    assert!(!menus.is_in_menu(PLAYER));
    assert_eq!(
        store
            .get(PLAYER)
            .unwrap()
            .weapon(Team::Terrorist, WeaponSlot::FullBuyPrimary),
        Some(Item::Galil)
    );
    assert_eq!(
        menus.presenter().messages_for(PLAYER).last().copied(),
        Some("[Retakes] You have exited the menu.")
    );
}

#[test]
fn test_store_failure_keeps_step_and_retry_succeeds() {
    let store = Arc::new(FlakyStore::default());
    let mut menus = guns_menus(Config::default(), store.clone());
    menus.open_menu(PLAYER, MenuKind::Guns);

    store.failing.store(true, Ordering::SeqCst);
    let result = menus.select(PLAYER, MenuStep::TPrimary, MenuChoice::Weapon(Item::Ak47));
    assert!(matches!(result, Err(AllocatorError::Store(_))));
    assert_eq!(current_step(&menus), Some(MenuStep::TPrimary));

    store.failing.store(false, Ordering::SeqCst);
    let outcome = menus
        .select(PLAYER, MenuStep::TPrimary, MenuChoice::Weapon(Item::Ak47))
        .unwrap();
    assert_eq!(outcome, MenuOutcome::Advanced(MenuStep::TSecondary));
    assert_eq!(
        store
            .get(PLAYER)
            .unwrap()
            .weapon(Team::Terrorist, WeaponSlot::FullBuyPrimary),
        Some(Item::Ak47)
    );
}

#[test]
fn test_guns_menu_disabled_without_player_choice() {
    let config = Config {
        allowed_weapon_selection_types: vec![WeaponSelectionType::Default],
        ..Config::default()
    };
    let mut menus = guns_menus(config, Arc::new(InMemoryPreferenceStore::new()));
    assert!(!menus.open_menu(PLAYER, MenuKind::Guns));
    assert!(!menus.is_in_menu(PLAYER));
}

#[test]
fn test_guns_menu_refuses_unauthenticated_player() {
    let store = Arc::new(InMemoryPreferenceStore::new());
    let mut menus = guns_menus(Config::default(), store.clone());
    let anonymous = PlayerId::UNAUTHENTICATED;

    assert!(!menus.open_menu(anonymous, MenuKind::Guns));
    assert!(!menus.is_in_menu(anonymous));
    let outcome = menus
        .select(anonymous, MenuStep::TPrimary, MenuChoice::Weapon(Item::Ak47))
        .unwrap();
    assert_eq!(outcome, MenuOutcome::Ignored);

    assert!(store.get(anonymous).unwrap().is_empty());
    assert_eq!(menus.scheduler().live_timers(), 0);
    assert_eq!(
        menus.presenter().messages_for(anonymous),
        vec!["[Retakes] You must be authenticated to use this menu."]
    );
}

#[test]
fn test_menus_are_independent_per_player() {
    let mut menus = guns_menus(Config::default(), Arc::new(InMemoryPreferenceStore::new()));
    let other = PlayerId(76561198000000002);
    assert!(menus.open_menu(PLAYER, MenuKind::Guns));
    assert!(menus.open_menu(other, MenuKind::Guns));
    menus
        .select(PLAYER, MenuStep::TPrimary, MenuChoice::Weapon(Item::Ak47))
        .unwrap();

    assert_eq!(current_step(&menus), Some(MenuStep::TSecondary));
    assert_eq!(menus.session(other).map(|s| s.step), Some(MenuStep::TPrimary));
    assert_eq!(menus.scheduler().live_timers(), 2);
}

#[test]
fn test_vote_menu_disabled_by_default() {
    let store: Arc<dyn PreferenceStore> = Arc::new(InMemoryPreferenceStore::new());
    let allocator = RoundAllocator::new(ConfigHandle::new(Config::default()), store.clone());
    let mut menus = guns_menus(Config::default(), store);
    menus.register(Box::new(NextRoundVoteMenu::new(allocator.votes())));

    assert!(!menus.open_menu(PLAYER, MenuKind::NextRoundVote));
    assert_eq!(
        menus.presenter().messages_for(PLAYER),
        vec!["[Retakes] This menu is disabled on this server!"]
    );
}

#[test]
fn test_votes_decide_next_round_type() {
    let config = Config {
        enable_next_round_type_voting: true,
        ..Config::default()
    };
    let handle = ConfigHandle::new(config);
    let store: Arc<dyn PreferenceStore> = Arc::new(InMemoryPreferenceStore::new());
    let mut allocator = RoundAllocator::new(handle.clone(), store.clone());
    let mut menus: Menus = MenuCoordinator::new(
        handle,
        store,
        RecordingPresenter::new(),
        ManualScheduler::new(),
    );
    menus.register(Box::new(NextRoundVoteMenu::new(allocator.votes())));

    let voters = [PlayerId(1), PlayerId(2), PlayerId(3)];
    let picks = [RoundType::Pistol, RoundType::Pistol, RoundType::FullBuy];
    for (voter, pick) in voters.iter().zip(picks) {
        assert!(menus.open_menu(*voter, MenuKind::NextRoundVote));
        let outcome = menus
            .select(*voter, MenuStep::RoundVote, MenuChoice::RoundType(pick))
            .unwrap();
        assert_eq!(outcome, MenuOutcome::Completed);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut delivery = RecordingDelivery::default();
    let summary = allocator
        .start_round(&voters, &[PlayerId(100)], &mut delivery, &mut rng)
        .unwrap();
    assert_eq!(summary.round_type, RoundType::Pistol);
    assert!(allocator.votes().lock().unwrap().is_empty());
}
