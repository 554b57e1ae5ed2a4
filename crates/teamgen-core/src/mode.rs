// Competition categories ("modes") a rating table can belong to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A league competition category. Each mode has its own rating table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameMode {
    Overall,
    #[serde(rename = "MPT")]
    Mpt,
    Modern,
    #[serde(rename = "FUT")]
    Fut,
    #[serde(rename = "QC")]
    Qc,
    #[serde(rename = "MDJ")]
    Mdj,
    #[serde(rename = "UU")]
    Uu,
    #[serde(rename = "CW")]
    Cw,
}

impl GameMode {
    /// Every mode, in the order the league lists them.
    pub const ALL: [GameMode; 8] = [
        GameMode::Mpt,
        GameMode::Modern,
        GameMode::Fut,
        GameMode::Qc,
        GameMode::Mdj,
        GameMode::Uu,
        GameMode::Cw,
        GameMode::Overall,
    ];

    /// The label used on leaderboards and in config files.
    pub fn label(self) -> &'static str {
        match self {
            GameMode::Overall => "Overall",
            GameMode::Mpt => "MPT",
            GameMode::Modern => "Modern",
            GameMode::Fut => "FUT",
            GameMode::Qc => "QC",
            GameMode::Mdj => "MDJ",
            GameMode::Uu => "UU",
            GameMode::Cw => "CW",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown game mode `{0}`")]
pub struct ParseModeError(pub String);

impl FromStr for GameMode {
    type Err = ParseModeError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        GameMode::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}
