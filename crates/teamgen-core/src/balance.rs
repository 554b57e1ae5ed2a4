// Roster balancing: captain selection and exhaustive two-team split search.
//
// The two highest-rated players captain opposing teams. Every k-subset `A` of
// the remaining players is tried together with its complement `B`, under both
// assignments (captain 2 drafts A, or captain 2 drafts B). The split with the
// smallest absolute rating-sum gap wins.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combinations::{binomial, Combinations};
use crate::elo::{average, win_probability};
use crate::mode::GameMode;
use crate::ratings::{name_key, RatingLookup};

/// Number of input slots the roster form offers.
pub const SLOT_COUNT: usize = 8;
pub const MIN_PLAYERS: usize = 4;
pub const MAX_PLAYERS: usize = 8;

/// Two deltas closer than this are the same delta. Integral ratings compare
/// exactly; the tolerance only absorbs summation-order noise on fractional ones.
const DELTA_TOLERANCE: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A player resolved against the active rating table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedPlayer {
    /// Display name exactly as the caller entered it (trimmed).
    pub name: String,
    pub rating: f64,
}

/// Which half of the chosen partition captain 2 should draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pick {
    A,
    B,
}

impl fmt::Display for Pick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pick::A => f.write_str("A"),
            Pick::B => f.write_str("B"),
        }
    }
}

/// Totals and odds for one assignment of a partition to the captains.
///
/// Team 1 is always captain 1's team.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionBreakdown {
    pub sum1: f64,
    pub sum2: f64,
    pub avg1: f64,
    pub avg2: f64,
    pub p1: f64,
    pub p2: f64,
    pub delta: f64,
}

impl OptionBreakdown {
    fn new(team1: &[RatedPlayer], team2: &[RatedPlayer]) -> Self {
        let sum1 = rating_sum(team1);
        let sum2 = rating_sum(team2);
        let avg1 = average(sum1, team1.len());
        let avg2 = average(sum2, team2.len());
        let p1 = win_probability(avg1, avg2);
        OptionBreakdown {
            sum1,
            sum2,
            avg1,
            avg2,
            p1,
            p2: 1.0 - p1,
            delta: (sum1 - sum2).abs(),
        }
    }
}

/// Advisory raised when the caller's first two slots did not hold the two
/// top-rated players. Not an error: the result is still computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptainAdjusted {
    pub captain1: String,
    pub captain2: String,
    /// Corrected input slots: captains first, the other names in their
    /// original relative order, padded with empty strings.
    pub slots: Vec<String>,
}

impl fmt::Display for CaptainAdjusted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Adjusted captains: {} (Captain 1) and {} (Captain 2).",
            self.captain1, self.captain2
        )
    }
}

/// Outcome of a successful balance run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResult {
    pub mode: GameMode,
    /// Captain 1 (highest rating) and captain 2.
    pub captains: [RatedPlayer; 2],
    pub split_a: Vec<RatedPlayer>,
    pub split_b: Vec<RatedPlayer>,
    pub recommendation: Pick,
    /// Captain 1's team under the recommended pick.
    pub team1: Vec<RatedPlayer>,
    /// Captain 2's team under the recommended pick.
    pub team2: Vec<RatedPlayer>,
    pub sum1: f64,
    pub sum2: f64,
    pub delta: f64,
    /// Lowercased name -> 1-based position among the entered names.
    pub positions: BTreeMap<String, usize>,
    /// Captain 2 drafts `split_a`; captain 1 keeps `split_b`.
    pub option_a: OptionBreakdown,
    /// Captain 2 drafts `split_b`; captain 1 keeps `split_a`.
    pub option_b: OptionBreakdown,
    pub partitions_evaluated: usize,
    pub advisory: Option<CaptainAdjusted>,
}

impl BalanceResult {
    /// The breakdown for the recommended pick.
    pub fn recommended(&self) -> &OptionBreakdown {
        match self.recommendation {
            Pick::A => &self.option_a,
            Pick::B => &self.option_b,
        }
    }

    /// The half of the partition captain 2 should draft.
    pub fn recommended_split(&self) -> &[RatedPlayer] {
        match self.recommendation {
            Pick::A => &self.split_a,
            Pick::B => &self.split_b,
        }
    }

    /// 1-based input position of `name`, if it was part of the roster.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.positions.get(&name_key(name)).copied()
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BalanceError {
    #[error("please enter at least 4 unique players (got {found})")]
    TooFewPlayers { found: usize },

    #[error("please provide an even number of players, e.g. 4, 6 or 8 (got {found})")]
    OddPlayerCount { found: usize },

    #[error("up to 8 players are supported (got {found})")]
    TooManyPlayers { found: usize },

    #[error("duplicate player detected: {name}")]
    DuplicatePlayer { name: String },

    #[error("player(s) not found for {mode}: {}", .names.join(", "))]
    UnresolvedPlayers { mode: GameMode, names: Vec<String> },
}

// ---------------------------------------------------------------------------
// Balancer
// ---------------------------------------------------------------------------

/// Splits a roster into two rating-balanced teams using ratings from `L`.
pub struct RosterBalancer<'a, L: ?Sized> {
    ratings: &'a L,
}

impl<'a, L: RatingLookup + ?Sized> RosterBalancer<'a, L> {
    pub fn new(ratings: &'a L) -> Self {
        RosterBalancer { ratings }
    }

    /// Validate `slots`, pick captains and find the fairest split.
    ///
    /// Blank slots are ignored. The result depends only on the arguments and
    /// the lookup's contents.
    pub fn balance<S: AsRef<str>>(
        &self,
        mode: GameMode,
        slots: &[S],
    ) -> Result<BalanceResult, BalanceError> {
        let entered = validate_names(slots)?;
        let rated = self.resolve(mode, &entered)?;

        let positions: BTreeMap<String, usize> = entered
            .iter()
            .enumerate()
            .map(|(i, n)| (name_key(n), i + 1))
            .collect();

        let mut by_rating = rated;
        by_rating.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        let captain1 = by_rating[0].clone();
        let captain2 = by_rating[1].clone();
        let rest = &by_rating[2..];

        let advisory = captain_advisory(slots, &captain1, &captain2, &entered);
        if let Some(adj) = &advisory {
            debug!("{}", adj);
        }

        let search = search(&captain1, &captain2, rest);
        let split_a = pick_players(rest, &search.subset);
        let split_b = complement_players(rest, &search.subset);

        let option_a = OptionBreakdown::new(
            &team_of(&captain1, &split_b),
            &team_of(&captain2, &split_a),
        );
        let option_b = OptionBreakdown::new(
            &team_of(&captain1, &split_a),
            &team_of(&captain2, &split_b),
        );

        let (team1, team2) = match search.pick {
            Pick::A => (team_of(&captain1, &split_b), team_of(&captain2, &split_a)),
            Pick::B => (team_of(&captain1, &split_a), team_of(&captain2, &split_b)),
        };
        let sum1 = rating_sum(&team1);
        let sum2 = rating_sum(&team2);

        debug!(
            "{}: {} vs {}, best delta {} (pick {}) after {} partitions",
            mode, captain1.name, captain2.name, search.delta, search.pick, search.evaluated
        );

        Ok(BalanceResult {
            mode,
            captains: [captain1, captain2],
            split_a,
            split_b,
            recommendation: search.pick,
            team1,
            team2,
            sum1,
            sum2,
            delta: search.delta,
            positions,
            option_a,
            option_b,
            partitions_evaluated: search.evaluated,
            advisory,
        })
    }

    /// Fill the input slots with the highest-rated players of `mode`.
    pub fn autofill(&self, mode: GameMode) -> Vec<String> {
        let mut known: Vec<RatedPlayer> = self
            .ratings
            .list_names(mode)
            .into_iter()
            .filter_map(|name| {
                let rating = self.ratings.lookup_rating(mode, &name)?;
                rating.is_finite().then_some(RatedPlayer { name, rating })
            })
            .collect();
        known.sort_by(|a, b| b.rating.total_cmp(&a.rating));

        let mut slots: Vec<String> = known
            .into_iter()
            .take(SLOT_COUNT)
            .map(|p| p.name)
            .collect();
        slots.resize(SLOT_COUNT, String::new());
        slots
    }

    /// Resolve every entered name, collecting all misses into one error.
    /// A non-finite rating counts as a miss.
    fn resolve(&self, mode: GameMode, entered: &[String]) -> Result<Vec<RatedPlayer>, BalanceError> {
        let mut rated = Vec::with_capacity(entered.len());
        let mut missing = Vec::new();
        for name in entered {
            match self.ratings.lookup_rating(mode, name).filter(|r| r.is_finite()) {
                Some(rating) => rated.push(RatedPlayer {
                    name: name.clone(),
                    rating,
                }),
                None => missing.push(name.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(BalanceError::UnresolvedPlayers {
                mode,
                names: missing,
            });
        }
        Ok(rated)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Trim, drop blanks, then check duplicates and roster size.
fn validate_names<S: AsRef<str>>(slots: &[S]) -> Result<Vec<String>, BalanceError> {
    let entered: Vec<String> = slots
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let mut seen = HashSet::new();
    for name in &entered {
        if !seen.insert(name_key(name)) {
            return Err(BalanceError::DuplicatePlayer { name: name.clone() });
        }
    }

    let found = entered.len();
    if found < MIN_PLAYERS {
        return Err(BalanceError::TooFewPlayers { found });
    }
    if found % 2 != 0 {
        return Err(BalanceError::OddPlayerCount { found });
    }
    if found > MAX_PLAYERS {
        return Err(BalanceError::TooManyPlayers { found });
    }
    Ok(entered)
}

/// Check the first two raw slots against the true captains.
fn captain_advisory<S: AsRef<str>>(
    slots: &[S],
    captain1: &RatedPlayer,
    captain2: &RatedPlayer,
    entered: &[String],
) -> Option<CaptainAdjusted> {
    let slot_key = |i: usize| slots.get(i).map(|s| name_key(s.as_ref())).unwrap_or_default();
    let (first, second) = (slot_key(0), slot_key(1));
    let (top1, top2) = (name_key(&captain1.name), name_key(&captain2.name));

    let in_place = (first == top1 && second == top2) || (first == top2 && second == top1);
    if in_place {
        return None;
    }

    let mut corrected = vec![captain1.name.clone(), captain2.name.clone()];
    corrected.extend(
        entered
            .iter()
            .filter(|n| {
                let key = name_key(n);
                key != top1 && key != top2
            })
            .cloned(),
    );
    corrected.resize(SLOT_COUNT.max(corrected.len()), String::new());

    Some(CaptainAdjusted {
        captain1: captain1.name.clone(),
        captain2: captain2.name.clone(),
        slots: corrected,
    })
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct SearchOutcome {
    /// Indices into `rest` forming split A.
    subset: Vec<usize>,
    pick: Pick,
    delta: f64,
    evaluated: usize,
}

/// Exhaustive search over every k-subset of `rest`.
///
/// Mirrored partitions (A, B) and (B, A) are both visited. The first partition
/// reaching the minimal delta wins; within a partition option A wins ties.
fn search(captain1: &RatedPlayer, captain2: &RatedPlayer, rest: &[RatedPlayer]) -> SearchOutcome {
    let k = rest.len() / 2;
    let total = rating_sum(rest);
    let mut best: Option<SearchOutcome> = None;
    let mut evaluated = 0;

    for subset in Combinations::new(rest.len(), k) {
        evaluated += 1;
        let sum_a: f64 = subset.iter().map(|&i| rest[i].rating).sum();
        let sum_b = total - sum_a;

        // Captain 2 drafts A: team1 = c1 + B, team2 = c2 + A.
        let delta_a = ((captain1.rating + sum_b) - (captain2.rating + sum_a)).abs();
        // Captain 2 drafts B: team1 = c1 + A, team2 = c2 + B.
        let delta_b = ((captain1.rating + sum_a) - (captain2.rating + sum_b)).abs();

        let (pick, delta) = if delta_a <= delta_b + DELTA_TOLERANCE {
            (Pick::A, delta_a)
        } else {
            (Pick::B, delta_b)
        };

        let improves = best
            .as_ref()
            .map_or(true, |b| delta < b.delta - DELTA_TOLERANCE);
        if improves {
            best = Some(SearchOutcome {
                subset,
                pick,
                delta,
                evaluated: 0,
            });
        }
    }

    debug_assert_eq!(evaluated, binomial(rest.len(), k));
    let mut outcome = best.unwrap_or(SearchOutcome {
        subset: Vec::new(),
        pick: Pick::A,
        delta: (captain1.rating - captain2.rating).abs(),
        evaluated: 0,
    });
    outcome.evaluated = evaluated;
    outcome
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn rating_sum(players: &[RatedPlayer]) -> f64 {
    players.iter().map(|p| p.rating).sum()
}

fn pick_players(rest: &[RatedPlayer], subset: &[usize]) -> Vec<RatedPlayer> {
    subset.iter().map(|&i| rest[i].clone()).collect()
}

fn complement_players(rest: &[RatedPlayer], subset: &[usize]) -> Vec<RatedPlayer> {
    rest.iter()
        .enumerate()
        .filter(|(i, _)| !subset.contains(i))
        .map(|(_, p)| p.clone())
        .collect()
}

fn team_of(captain: &RatedPlayer, members: &[RatedPlayer]) -> Vec<RatedPlayer> {
    let mut team = Vec::with_capacity(members.len() + 1);
    team.push(captain.clone());
    team.extend_from_slice(members);
    team
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
