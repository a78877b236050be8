//! Runtime settings, read from the environment after `.env` is loaded.

use std::path::PathBuf;

use rb_core::STORAGE_KEY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root for the local key-value files and the rendered page
    #[cfg_attr(feature = "db-sqlite", allow(dead_code))]
    pub data_dir: PathBuf,
    pub storage_key: String,
    /// Where each rendered view is written
    pub output: PathBuf,
    #[cfg_attr(not(feature = "db-sqlite"), allow(dead_code))]
    pub database_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = PathBuf::from(lookup("RB_DATA_DIR").unwrap_or_else(|| "./data".into()));
        let output = lookup("RB_OUTPUT")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("board.html"));

        Self {
            storage_key: lookup("RB_STORAGE_KEY").unwrap_or_else(|| STORAGE_KEY.into()),
            database_url: lookup("RB_DATABASE_URL")
                .unwrap_or_else(|| "sqlite:rusty_board.db".into()),
            output,
            data_dir,
        }
    }
}
