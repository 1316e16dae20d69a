//! Integration tests for round type selection

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use retake_allocator::core::config::{Config, RoundTypeSelection, RoundTypeTable};
use retake_allocator::core::RoundType;
use retake_allocator::rounds::{round_type_for_draw, RoundTypeSelector};

#[test]
fn test_draw_below_pistol_weight_is_pistol() {
    let config = Config::default();
    assert_eq!(round_type_for_draw(0.10, &config), RoundType::Pistol);
}

#[test]
fn test_draw_between_pistol_and_half_buy_is_half_buy() {
    let config = Config::default();
    assert_eq!(round_type_for_draw(0.30, &config), RoundType::HalfBuy);
}

#[test]
fn test_draw_above_half_buy_is_full_buy() {
    let config = Config::default();
    assert_eq!(round_type_for_draw(0.90, &config), RoundType::FullBuy);
}

#[test]
fn test_zero_weight_type_never_drawn() {
    let config = Config {
        round_type_percentages: RoundTypeTable {
            pistol: 0,
            half_buy: 50,
            full_buy: 50,
        },
        ..Config::default()
    };
    let mut selector = RoundTypeSelector::new();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..2000 {
        assert_ne!(selector.select(None, &config, &mut rng), RoundType::Pistol);
    }
}

#[test]
fn test_override_wins_in_every_mode() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for mode in [
        RoundTypeSelection::Random,
        RoundTypeSelection::RandomFixedCounts,
        RoundTypeSelection::ManualOrdering,
    ] {
        let config = Config {
            round_type_selection: mode,
            ..Config::default()
        };
        let mut selector = RoundTypeSelector::new();
        for _ in 0..10 {
            assert_eq!(
                selector.select(Some(RoundType::HalfBuy), &config, &mut rng),
                RoundType::HalfBuy
            );
        }
    }
}

#[test]
fn test_manual_ordering_follows_configured_sequence() {
    let config = Config {
        round_type_selection: RoundTypeSelection::ManualOrdering,
        ..Config::default()
    };
    let mut selector = RoundTypeSelector::new();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let first_cycle: Vec<RoundType> = (0..30)
        .map(|_| selector.select(None, &config, &mut rng))
        .collect();
    assert!(first_cycle[..5].iter().all(|rt| *rt == RoundType::Pistol));
    assert!(first_cycle[5..15].iter().all(|rt| *rt == RoundType::HalfBuy));
    assert!(first_cycle[15..].iter().all(|rt| *rt == RoundType::FullBuy));

    // Wraps back to the start
    assert_eq!(selector.select(None, &config, &mut rng), RoundType::Pistol);
}

fn weights() -> impl Strategy<Value = RoundTypeTable> {
    (0u32..=100)
        .prop_flat_map(|pistol| (Just(pistol), 0u32..=(100 - pistol)))
        .prop_map(|(pistol, half_buy)| RoundTypeTable {
            pistol,
            half_buy,
            full_buy: 100 - pistol - half_buy,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_frequencies_track_weights(table in weights(), seed in any::<u64>()) {
        let config = Config {
            round_type_percentages: table,
            ..Config::default()
        };
        prop_assert!(config.validate().is_ok());

        let draws = 5000;
        let mut selector = RoundTypeSelector::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut counts = [0u32; 3];
        for _ in 0..draws {
            let index = match selector.select(None, &config, &mut rng) {
                RoundType::Pistol => 0,
                RoundType::HalfBuy => 1,
                RoundType::FullBuy => 2,
            };
            counts[index] += 1;
        }

        for (i, round_type) in RoundType::ALL.iter().enumerate() {
            let observed = f64::from(counts[i]) / f64::from(draws);
            let expected = config.round_type_percentage(*round_type);
            prop_assert!(
                (observed - expected).abs() < 0.05,
                "{}: observed {:.3}, expected {:.3}",
                round_type,
                observed,
                expected
            );
        }
    }

    #[test]
    fn test_fixed_counts_cycle_matches_counts(
        pistol in 0u32..6,
        half_buy in 0u32..6,
        full_buy in 1u32..6,
        seed in any::<u64>(),
    ) {
        let config = Config {
            round_type_selection: RoundTypeSelection::RandomFixedCounts,
            round_type_random_fixed_counts: RoundTypeTable { pistol, half_buy, full_buy },
            ..Config::default()
        };
        let mut selector = RoundTypeSelector::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let total = (pistol + half_buy + full_buy) as usize;
        let cycle: Vec<RoundType> = (0..total)
            .map(|_| selector.select(None, &config, &mut rng))
            .collect();
        let count = |rt: RoundType| cycle.iter().filter(|r| **r == rt).count() as u32;
        prop_assert_eq!(count(RoundType::Pistol), pistol);
        prop_assert_eq!(count(RoundType::HalfBuy), half_buy);
        prop_assert_eq!(count(RoundType::FullBuy), full_buy);
    }
}

#[test]
fn test_same_seed_same_sequence() {
    let config = Config {
        round_type_selection: RoundTypeSelection::RandomFixedCounts,
        ..Config::default()
    };
    let run = || {
        let mut selector = RoundTypeSelector::new();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        (0..60)
            .map(|_| selector.select(None, &config, &mut rng))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}
