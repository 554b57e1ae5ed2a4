// Configuration loading and parsing (config/league.toml).

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use teamgen_core::GameMode;
use thiserror::Error;
use tracing::info;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid `{field}`: {message}")]
    Invalid { field: String, message: String },

    #[error("no config/ or defaults/ directory under {}", .base.display())]
    NoConfigDir { base: PathBuf },

    #[error("failed to install default {}: {source}", .path.display())]
    InstallDefault {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league_name: String,
    pub default_mode: GameMode,
    /// Rating CSV per mode, resolved against the config base directory.
    pub rating_files: BTreeMap<GameMode, PathBuf>,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueSection,
    /// Mode label -> rating CSV path. Labels are validated after parsing so
    /// a typo reports the offending key instead of a generic serde error.
    #[serde(default)]
    ratings: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
struct LeagueSection {
    name: String,
    default_mode: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` relative to
/// `base_dir`. Relative rating paths are resolved against `base_dir`.
///
/// This does not auto-copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let league_path = base_dir.join("config").join("league.toml");
    let text = read_file(&league_path)?;
    let file: LeagueFile = toml::from_str(&text).map_err(|e| ConfigError::Parse {
        path: league_path.clone(),
        source: e,
    })?;

    if file.league.name.trim().is_empty() {
        return Err(ConfigError::invalid("league.name", "must not be empty"));
    }

    let default_mode: GameMode = file
        .league
        .default_mode
        .parse()
        .map_err(|e| ConfigError::invalid("league.default_mode", format!("{e}")))?;

    let mut rating_files = BTreeMap::new();
    for (label, path) in &file.ratings {
        let field = format!("ratings.{label}");
        let mode: GameMode = label
            .parse()
            .map_err(|e| ConfigError::invalid(&field, format!("{e}")))?;
        if path.trim().is_empty() {
            return Err(ConfigError::invalid(&field, "path must not be empty"));
        }
        if rating_files.insert(mode, base_dir.join(path.trim())).is_some() {
            return Err(ConfigError::invalid(
                &field,
                format!("{mode} is configured more than once"),
            ));
        }
    }

    if !rating_files.contains_key(&default_mode) {
        return Err(ConfigError::invalid(
            "league.default_mode",
            format!("no ratings file configured for {default_mode}"),
        ));
    }

    Ok(Config {
        league_name: file.league.name,
        default_mode,
        rating_files,
    })
}

/// Install any file from `defaults/` that is missing under `config/`.
///
/// Existing config files are never touched and `*.example` files are not
/// installed. Returns the paths written. With no `defaults/` the existing
/// `config/` is used as-is; with neither directory there is nothing to load.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.is_dir() {
        return if config_dir.is_dir() {
            Ok(Vec::new())
        } else {
            Err(ConfigError::NoConfigDir {
                base: base_dir.to_path_buf(),
            })
        };
    }

    std::fs::create_dir_all(&config_dir).map_err(install_err(&config_dir))?;

    let mut installed = Vec::new();
    for default in default_files(&defaults_dir).map_err(install_err(&defaults_dir))? {
        let Some(file_name) = default.file_name() else {
            continue;
        };
        let target = config_dir.join(file_name);
        if install_if_missing(&default, &target).map_err(install_err(&target))? {
            info!("Installed default config {}", target.display());
            installed.push(target);
        }
    }
    Ok(installed)
}

fn install_err(path: &Path) -> impl FnOnce(std::io::Error) -> ConfigError {
    let path = path.to_path_buf();
    move |source| ConfigError::InstallDefault { path, source }
}

/// Regular files in `dir`, excluding `*.example`, sorted by name.
fn default_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_example = path.extension().is_some_and(|ext| ext == "example");
        if path.is_file() && !is_example {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Copy `from` to `to` unless `to` already exists. `create_new` makes the
/// existence check and the create one step.
fn install_if_missing(from: &Path, to: &Path) -> std::io::Result<bool> {
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(to)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e),
    };
    let mut src = std::fs::File::open(from)?;
    std::io::copy(&mut src, &mut dest)?;
    Ok(true)
}

/// Convenience wrapper: loads config relative to `base_dir` after copying
/// any missing defaults into place.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
