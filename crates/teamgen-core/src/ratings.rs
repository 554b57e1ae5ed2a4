// Player rating tables, one per game mode.
//
// Ratings come from a plain leaderboard export with a `Player` and a `Rating`
// column. Names are matched case-insensitively; display names keep the casing
// of the export.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::mode::GameMode;

// ---------------------------------------------------------------------------
// Lookup seam
// ---------------------------------------------------------------------------

/// Source of player ratings for the balancer.
pub trait RatingLookup {
    /// Rating of `name` in `mode`, compared case-insensitively after trimming.
    fn lookup_rating(&self, mode: GameMode, name: &str) -> Option<f64>;

    /// Display names known for `mode`, in load order.
    fn list_names(&self, mode: GameMode) -> Vec<String>;
}

/// Normalized key used for every name comparison.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// In-memory rating book
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    name: String,
    rating: f64,
}

/// Ratings for a single mode. Keeps load order for autofill and suggestions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModeTable {
    entries: Vec<Entry>,
    by_key: HashMap<String, usize>,
}

impl ModeTable {
    /// Insert or replace a player. A name that collides case-insensitively with
    /// an existing entry replaces it in place, keeping its load position.
    ///
    /// Returns `Ok(true)` for a new entry and `Ok(false)` for a replacement.
    /// Blank names and non-finite ratings are rejected.
    pub fn insert(&mut self, name: &str, rating: f64) -> Result<bool, RatingError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RatingError::Validation("blank player name".into()));
        }
        if !rating.is_finite() {
            return Err(RatingError::Validation(format!(
                "non-finite rating {rating} for '{name}'"
            )));
        }
        let key = name_key(name);
        let entry = Entry {
            name: name.to_string(),
            rating,
        };
        match self.by_key.get(&key) {
            Some(&idx) => {
                self.entries[idx] = entry;
                Ok(false)
            }
            None => {
                self.by_key.insert(key, self.entries.len());
                self.entries.push(entry);
                Ok(true)
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.by_key
            .get(&name_key(name))
            .map(|&idx| self.entries[idx].rating)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All loaded rating tables keyed by mode.
#[derive(Debug, Clone, Default)]
pub struct RatingBook {
    tables: HashMap<GameMode, ModeTable>,
}

impl RatingBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single rating, replacing any case-insensitive duplicate.
    /// Blank names and non-finite ratings are skipped with a warning.
    pub fn insert(&mut self, mode: GameMode, name: &str, rating: f64) {
        match self.tables.entry(mode).or_default().insert(name, rating) {
            Ok(true) => {}
            Ok(false) => {
                warn!("duplicate rating entry for '{}' in {}, using latest value", name.trim(), mode);
            }
            Err(e) => warn!("skipping {} rating: {}", mode, e),
        }
    }

    /// Replace the whole table for `mode`.
    pub fn set_table(&mut self, mode: GameMode, table: ModeTable) {
        self.tables.insert(mode, table);
    }

    pub fn table(&self, mode: GameMode) -> Option<&ModeTable> {
        self.tables.get(&mode)
    }

    /// Modes that have at least one rated player, in league order.
    pub fn modes(&self) -> Vec<GameMode> {
        GameMode::ALL
            .into_iter()
            .filter(|m| self.tables.get(m).is_some_and(|t| !t.is_empty()))
            .collect()
    }

    /// Load `mode`'s table from a CSV file, replacing any previous table.
    pub fn load_mode(&mut self, mode: GameMode, path: &Path) -> Result<usize, RatingError> {
        let table = load_table(path)?;
        if table.is_empty() {
            return Err(RatingError::Validation(format!(
                "{} ratings file {} produced zero valid rows",
                mode,
                path.display()
            )));
        }
        let count = table.len();
        info!("Loaded {} {} ratings from {}", count, mode, path.display());
        self.set_table(mode, table);
        Ok(count)
    }
}

impl RatingLookup for RatingBook {
    fn lookup_rating(&self, mode: GameMode, name: &str) -> Option<f64> {
        self.tables.get(&mode).and_then(|t| t.get(name))
    }

    fn list_names(&self, mode: GameMode) -> Vec<String> {
        self.tables
            .get(&mode)
            .map(|t| t.names().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// CSV loading
// ---------------------------------------------------------------------------

/// Header names accepted for the player and rating columns.
const PLAYER_COLUMNS: &[&str] = &["Player", "Name", "name", "player"];
const RATING_COLUMNS: &[&str] = &["Rating", "ELO", "Elo", "rating"];

/// Leaderboard export row. Extra columns (rank, games, wins...) are ignored.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawRatingRow {
    #[serde(alias = "Name", alias = "name", alias = "player")]
    Player: String,
    #[serde(alias = "ELO", alias = "Elo", alias = "rating")]
    Rating: f64,
}

/// Read a rating table from CSV. `source` names the input in errors.
///
/// A header without a player or rating column fails the whole file; bad data
/// rows are skipped with a warning.
fn load_table_from_reader<R: Read>(rdr: R, source: &str) -> Result<ModeTable, RatingError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let headers = reader.headers().map_err(|e| RatingError::Csv {
        path: source.to_string(),
        source: e,
    })?;
    for (column, aliases) in [("Player", PLAYER_COLUMNS), ("Rating", RATING_COLUMNS)] {
        if !headers.iter().any(|h| aliases.contains(&h)) {
            return Err(RatingError::Validation(format!(
                "{source}: missing `{column}` column"
            )));
        }
    }

    let mut table = ModeTable::default();
    for result in reader.deserialize::<RawRatingRow>() {
        match result {
            Ok(raw) => match table.insert(&raw.Player, raw.Rating) {
                Ok(true) => {}
                Ok(false) => {
                    warn!("duplicate rating entry for '{}', using latest value", raw.Player.trim());
                }
                Err(e) => warn!("skipping rating row: {}", e),
            },
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                return Err(RatingError::Csv {
                    path: source.to_string(),
                    source: e,
                });
            }
            Err(e) => {
                warn!("skipping malformed rating row: {}", e);
            }
        }
    }
    Ok(table)
}

/// Load one mode's rating table from a CSV file.
pub fn load_table(path: &Path) -> Result<ModeTable, RatingError> {
    let file = std::fs::File::open(path).map_err(|e| RatingError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_table_from_reader(file, &path.display().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
