//! Host configuration read from the environment.

use anyhow::{bail, Result};
use drill_core::{Navigation, SessionSettings};
use std::path::PathBuf;

/// Runtime configuration for the terminal host.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the bundled deck files.
    pub decks_dir: PathBuf,
    /// Directory where deck progress is stored.
    pub data_dir: PathBuf,
    pub session: SessionSettings,
}

impl Config {
    /// Build configuration from environment variables.
    ///
    /// Recognised variables:
    /// - DRILL_DECKS_DIR: deck source directory (default `decks`)
    /// - DRILL_DATA_DIR: progress directory (default: local data dir)
    /// - DRILL_NAVIGATION: `linear` or `priority` (default `linear`)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let decks_dir = lookup("DRILL_DECKS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("decks"));

        let data_dir = lookup("DRILL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let navigation = match lookup("DRILL_NAVIGATION") {
            Some(value) => match Navigation::from_str(value.trim()) {
                Some(navigation) => navigation,
                None => bail!("DRILL_NAVIGATION must be `linear` or `priority`, got `{value}`"),
            },
            None => Navigation::default(),
        };

        Ok(Self {
            decks_dir,
            data_dir,
            session: SessionSettings {
                navigation,
                ..Default::default()
            },
        })
    }
}

fn default_data_dir() -> PathBuf {
    // Fall back to the current dir when no data dir is known
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("recall-drill")
}
