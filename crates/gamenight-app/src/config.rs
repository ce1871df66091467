// Configuration loading and parsing (config/session.toml).

use gamenight_core::session::SeatingRules;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("cannot seed config/ from defaults/: {message}")]
    Seed { message: String },
}

// ---------------------------------------------------------------------------
// session.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub session: SessionConfig,
    pub seating: SeatingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Shown in the console banner.
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeatingConfig {
    pub max_seats_per_table: usize,
}

impl SeatingConfig {
    pub fn rules(&self) -> SeatingRules {
        SeatingRules {
            max_seats_per_table: self.max_seats_per_table,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive, used when `RUST_LOG` is unset.
    pub filter: String,
    /// Directory for the log file, relative to the working directory.
    pub dir: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/session.toml` relative to `base_dir`.
///
/// Does not seed defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("session.toml");
    let text = std::fs::read_to_string(&path)
        .map_err(|_| ConfigError::FileNotFound { path: path.clone() })?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Copy every file in `defaults/` that is missing from `config/`.
/// `*.example` templates stay behind. Returns the paths written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.is_dir() {
        if config_dir.is_dir() {
            return Ok(Vec::new());
        }
        return Err(seed_error(format!(
            "no defaults/ or config/ directory under {}",
            base_dir.display()
        )));
    }

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| seed_error(format!("cannot create {}: {e}", config_dir.display())))?;
    let entries = std::fs::read_dir(&defaults_dir)
        .map_err(|e| seed_error(format!("cannot list {}: {e}", defaults_dir.display())))?;

    let mut seeded = Vec::new();
    for entry in entries {
        let src = entry
            .map_err(|e| seed_error(format!("cannot list {}: {e}", defaults_dir.display())))?
            .path();
        let is_template = src.extension().is_some_and(|ext| ext == "example");
        let Some(name) = src.file_name() else {
            continue;
        };
        if !src.is_file() || is_template {
            continue;
        }

        let dest = config_dir.join(name);
        if dest.exists() {
            continue;
        }
        std::fs::copy(&src, &dest).map_err(|e| {
            seed_error(format!(
                "cannot copy {} to {}: {e}",
                src.display(),
                dest.display()
            ))
        })?;
        seeded.push(dest);
    }

    Ok(seeded)
}

/// Seed and load the config under the working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir()
        .map_err(|e| seed_error(format!("cannot resolve working directory: {e}")))?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn seed_error(message: String) -> ConfigError {
    ConfigError::Seed { message }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.session.name.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "session.name".into(),
            message: "must not be empty".into(),
        });
    }

    if config.seating.max_seats_per_table == 0 {
        return Err(ConfigError::ValidationError {
            field: "seating.max_seats_per_table".into(),
            message: "must be greater than 0".into(),
        });
    }

    let logging_fields: &[(&str, &str)] = &[
        ("logging.filter", config.logging.filter.as_str()),
        ("logging.dir", config.logging.dir.as_str()),
    ];
    for (name, val) in logging_fields {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
