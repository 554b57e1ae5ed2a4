// Library root: rating book, combination search and the roster balancer.

pub mod balance;
pub mod combinations;
pub mod elo;
pub mod mode;
pub mod ratings;

pub use balance::{
    BalanceError, BalanceResult, CaptainAdjusted, OptionBreakdown, Pick, RatedPlayer,
    RosterBalancer,
};
pub use mode::{GameMode, ParseModeError};
pub use ratings::{RatingBook, RatingError, RatingLookup};
