// Team generator entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, filtered by RUST_LOG)
// 2. Load config (copying defaults/ on first run)
// 3. Load the rating book for every configured mode
// 4. Run the requested subcommand and print its report

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use teamgen::{config, load_rating_book, report};
use teamgen_core::{GameMode, RatingLookup, RosterBalancer};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "teamgen", version, about = "Split a league lobby into two balanced teams")]
struct Cli {
    /// Directory holding config/ and defaults/ (defaults to the current directory)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Output JSON instead of a text report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick captains and the fairest split for 4, 6 or 8 players
    Balance {
        /// Rating category (defaults to league.default_mode)
        #[arg(long)]
        mode: Option<GameMode>,

        /// Player names in slot order; slots 1 and 2 are the captain slots
        #[arg(required = true, num_args = 1..)]
        players: Vec<String>,
    },
    /// Fill the eight slots with the highest-rated players of a mode
    Autofill {
        #[arg(long)]
        mode: Option<GameMode>,
    },
    /// List the rated player names `balance` accepts for a mode
    Names {
        #[arg(long)]
        mode: Option<GameMode>,

        /// Only show names containing this text (case-insensitive)
        filter: Option<String>,
    },
    /// List loaded modes and their player counts
    Modes,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_tracing() {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to resolve current directory")?,
    };

    let config = config::load_config(&base_dir).context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, default mode {}, {} rating files",
        config.league_name,
        config.default_mode,
        config.rating_files.len()
    );

    let book = load_rating_book(&config).context("failed to load ratings")?;
    let balancer = RosterBalancer::new(&book);

    match cli.command {
        Commands::Balance { mode, players } => {
            let mode = mode.unwrap_or(config.default_mode);
            let result = balancer.balance(mode, &players)?;
            if cli.json {
                println!("{}", report::render_json(&result)?);
            } else {
                print!("{}", report::render_text(&result));
            }
        }
        Commands::Autofill { mode } => {
            let mode = mode.unwrap_or(config.default_mode);
            let slots = balancer.autofill(mode);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&slots)?);
            } else {
                print!("{}", report::render_slots(&slots));
            }
        }
        Commands::Names { mode, filter } => {
            let mode = mode.unwrap_or(config.default_mode);
            let known = book.list_names(mode);
            let shown = report::matching_names(&known, filter.as_deref());
            let rendered = report::render_names(&shown, cli.json)?;
            if cli.json {
                println!("{rendered}");
            } else {
                print!("{rendered}");
            }
        }
        Commands::Modes => {
            let modes: Vec<(GameMode, usize)> = book
                .modes()
                .into_iter()
                .map(|m| (m, book.table(m).map_or(0, |t| t.len())))
                .collect();
            let rendered = report::render_modes(&modes, cli.json)?;
            if cli.json {
                println!("{rendered}");
            } else {
                print!("{rendered}");
            }
        }
    }
    Ok(())
}

/// Initialize tracing to stderr so stdout stays clean for reports and JSON.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("teamgen=warn,teamgen_core=warn,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
