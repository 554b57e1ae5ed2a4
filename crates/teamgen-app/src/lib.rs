// Library root: configuration, rating loading and report rendering for the
// `teamgen` binary. Exposed so integration tests can drive the same paths.

pub mod config;
pub mod report;

use config::Config;
use teamgen_core::{RatingBook, RatingError};
use tracing::info;

/// Load every rating file named in `config` into one book.
///
/// All configured files must load; a missing or empty file is an error.
pub fn load_rating_book(config: &Config) -> Result<RatingBook, RatingError> {
    let mut book = RatingBook::new();
    for (&mode, path) in &config.rating_files {
        book.load_mode(mode, path)?;
    }
    info!(
        "Rating book ready for {}: {} modes",
        config.league_name,
        book.modes().len()
    );
    Ok(book)
}
