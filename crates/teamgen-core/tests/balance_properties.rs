// Integration tests for the roster balancer.
//
// These exercise the public API over a spread of rosters and check the
// properties every result must satisfy: rating mass is conserved, both splits
// are the same size, the search is exhaustive and repeatable, and captain
// choice does not depend on the order names were typed in.

use teamgen_core::{BalanceError, GameMode, Pick, RatingBook, RatingLookup, RosterBalancer};

// ===========================================================================
// Test helpers
// ===========================================================================

const MODE: GameMode = GameMode::Modern;

/// Deterministic pseudo-random ratings in 1000..=2400.
fn roster(seed: u64, size: usize) -> Vec<(String, f64)> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (0..size)
        .map(|i| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let rating = 1000 + (state >> 33) % 1401;
            (format!("Player {seed}-{i}"), rating as f64)
        })
        .collect()
}

fn book_for(players: &[(String, f64)]) -> RatingBook {
    let mut book = RatingBook::new();
    for (name, rating) in players {
        book.insert(MODE, name, *rating);
    }
    book
}

fn slot_names(players: &[(String, f64)]) -> Vec<String> {
    players.iter().map(|(n, _)| n.clone()).collect()
}

/// Smallest achievable |team1 - team2| with the two given captains on
/// opposite sides and equal team sizes, by checking every bitmask.
fn brute_force_min_delta(c1: f64, c2: f64, rest: &[f64]) -> f64 {
    let k = rest.len() / 2;
    let mut best = f64::INFINITY;
    for mask in 0u32..(1 << rest.len()) {
        if mask.count_ones() as usize != k {
            continue;
        }
        let (mut with_c1, mut with_c2) = (c1, c2);
        for (i, r) in rest.iter().enumerate() {
            if mask & (1 << i) != 0 {
                with_c1 += r;
            } else {
                with_c2 += r;
            }
        }
        best = best.min((with_c1 - with_c2).abs());
    }
    best
}

fn rosters() -> Vec<Vec<(String, f64)>> {
    let mut all = Vec::new();
    for seed in 0..40u64 {
        let size = [4, 6, 8][(seed % 3) as usize];
        all.push(roster(seed, size));
    }
    all
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn rating_mass_conserved_across_options() {
    for players in rosters() {
        let book = book_for(&players);
        let result = RosterBalancer::new(&book)
            .balance(MODE, &slot_names(&players))
            .unwrap();

        let total: f64 = players.iter().map(|(_, r)| r).sum();
        let a = result.option_a;
        let b = result.option_b;
        assert!((a.sum1 + a.sum2 - total).abs() < 1e-9);
        assert!((b.sum1 + b.sum2 - total).abs() < 1e-9);
        assert!((result.sum1 + result.sum2 - total).abs() < 1e-9);
    }
}

#[test]
fn splits_are_equal_halves_of_the_non_captains() {
    for players in rosters() {
        let book = book_for(&players);
        let result = RosterBalancer::new(&book)
            .balance(MODE, &slot_names(&players))
            .unwrap();

        assert_eq!(result.split_a.len(), result.split_b.len());
        assert_eq!(result.split_a.len() + result.split_b.len() + 2, players.len());
        assert_eq!(result.team1.len(), result.team2.len());
        assert_eq!(result.team1[0], result.captains[0]);
        assert_eq!(result.team2[0], result.captains[1]);
    }
}

#[test]
fn search_is_exhaustive() {
    for players in rosters() {
        let book = book_for(&players);
        let result = RosterBalancer::new(&book)
            .balance(MODE, &slot_names(&players))
            .unwrap();

        let rest: Vec<f64> = result
            .split_a
            .iter()
            .chain(result.split_b.iter())
            .map(|p| p.rating)
            .collect();
        let expected = brute_force_min_delta(
            result.captains[0].rating,
            result.captains[1].rating,
            &rest,
        );
        assert_eq!(result.delta, expected, "roster {:?}", players);

        let chosen = result.recommended();
        assert_eq!(chosen.delta, result.delta);
        assert_eq!(result.delta, result.option_a.delta.min(result.option_b.delta));
        if result.option_a.delta == result.option_b.delta {
            assert_eq!(result.recommendation, Pick::A);
        }
    }
}

#[test]
fn probabilities_sum_to_one() {
    for players in rosters() {
        let book = book_for(&players);
        let result = RosterBalancer::new(&book)
            .balance(MODE, &slot_names(&players))
            .unwrap();

        for option in [result.option_a, result.option_b] {
            assert!((option.p1 + option.p2 - 1.0).abs() < 1e-12);
            assert!(option.p1 > 0.0 && option.p1 < 1.0);
        }
    }
}

#[test]
fn repeated_runs_are_identical() {
    for players in rosters() {
        let book = book_for(&players);
        let balancer = RosterBalancer::new(&book);
        let first = balancer.balance(MODE, &slot_names(&players)).unwrap();
        let second = balancer.balance(MODE, &slot_names(&players)).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn captains_and_delta_independent_of_input_order() {
    for players in rosters() {
        let book = book_for(&players);
        let balancer = RosterBalancer::new(&book);
        let forward = balancer.balance(MODE, &slot_names(&players)).unwrap();

        let mut reversed = slot_names(&players);
        reversed.reverse();
        let backward = balancer.balance(MODE, &reversed).unwrap();

        let mut rotated = slot_names(&players);
        rotated.rotate_left(3);
        let shifted = balancer.balance(MODE, &rotated).unwrap();

        for other in [&backward, &shifted] {
            assert_eq!(other.delta, forward.delta);
            assert_eq!(other.captains[0].rating, forward.captains[0].rating);
            assert_eq!(other.captains[1].rating, forward.captains[1].rating);
        }
    }
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[test]
fn eight_players_exact_balance_found() {
    // Captains 2000 and 1900. One perfect split exists:
    // 2000 + 1500 + 1100 + 1000 = 5600 vs 1900 + 1400 + 1200 + 1100 = 5600
    let players: Vec<(String, f64)> = [
        ("Ace", 2000.0),
        ("Blaze", 1900.0),
        ("Cobra", 1500.0),
        ("Dune", 1400.0),
        ("Echo", 1200.0),
        ("Flint", 1100.0),
        ("Gale", 1100.0),
        ("Haze", 1000.0),
    ]
    .into_iter()
    .map(|(n, r)| (n.to_string(), r))
    .collect();

    let book = book_for(&players);
    let result = RosterBalancer::new(&book)
        .balance(MODE, &slot_names(&players))
        .unwrap();

    assert_eq!(result.delta, 0.0);
    assert_eq!(result.sum1, result.sum2);
    assert_eq!(result.partitions_evaluated, 20);
    assert!(result.advisory.is_none());
}

#[test]
fn win_probability_for_two_hundred_point_gap() {
    // Captain 1's team averages 1600 against 1400 under option B.
    let players: Vec<(String, f64)> = [
        ("North", 1700.0),
        ("South", 1500.0),
        ("East", 1500.0),
        ("West", 1300.0),
    ]
    .into_iter()
    .map(|(n, r)| (n.to_string(), r))
    .collect();

    let book = book_for(&players);
    let result = RosterBalancer::new(&book)
        .balance(MODE, &slot_names(&players))
        .unwrap();

    // Option B: North + East (A) vs South + West.
    assert_eq!(result.option_b.avg1, 1600.0);
    assert_eq!(result.option_b.avg2, 1400.0);
    assert!((result.option_b.p1 - 0.7597).abs() < 1e-4);
    assert!((result.option_b.p2 - 0.2403).abs() < 1e-4);
    assert_eq!(result.recommendation, Pick::A);
    assert_eq!(result.delta, 0.0);
}

#[test]
fn validation_errors_stop_before_lookup() {
    let book = RatingBook::new();
    let balancer = RosterBalancer::new(&book);

    assert_eq!(
        balancer.balance(MODE, &["a", "b", "c", "d", "e"]),
        Err(BalanceError::OddPlayerCount { found: 5 })
    );
    assert_eq!(
        balancer.balance(MODE, &["a", "b", "A", "d"]),
        Err(BalanceError::DuplicatePlayer { name: "A".into() })
    );
    assert!(matches!(
        balancer.balance(MODE, &["a", "b", "c", "d"]),
        Err(BalanceError::UnresolvedPlayers { .. })
    ));
}

#[test]
fn autofill_then_balance_needs_no_captain_adjustment() {
    let players = roster(99, 12);
    let book = book_for(&players);
    let balancer = RosterBalancer::new(&book);

    let slots = balancer.autofill(MODE);
    assert_eq!(slots.len(), 8);
    assert!(slots.iter().all(|s| book.lookup_rating(MODE, s).is_some()));

    let result = balancer.balance(MODE, &slots).unwrap();
    assert!(result.advisory.is_none());
    assert_eq!(result.partitions_evaluated, 20);
}
