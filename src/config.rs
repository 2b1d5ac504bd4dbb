//! Configuration parsing for Waymark.
//!
//! Supports:
//! - CLI arguments via clap
//! - Environment variable overrides
//! - Sensible defaults for quick start

use clap::Parser;
use std::path::PathBuf;

/// Waymark: a world-scoped named waypoint store.
#[derive(Parser, Debug, Clone)]
#[command(name = "waymark")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Data directory for the SQLite database
    #[arg(short, long, env = "WAYMARK_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Size of the storage connection pool
    #[arg(long, env = "WAYMARK_POOL_SIZE", default_value_t = 4)]
    pub pool_size: u32,

    /// PostgreSQL connection URL; the embedded SQLite engine is used when unset
    #[cfg(feature = "postgres")]
    #[arg(long, env = "WAYMARK_POSTGRES_URL")]
    pub postgres_url: Option<String>,
}

impl Config {
    /// Parse configuration from CLI arguments and environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Path of the embedded database file inside the data directory.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("waymark.db")
    }

    /// Create a default configuration for testing.
    #[cfg(test)]
    pub fn test_config(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            log_level: "debug".into(),
            pool_size: 2,
            #[cfg(feature = "postgres")]
            postgres_url: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            log_level: "info".into(),
            pool_size: 4,
            #[cfg(feature = "postgres")]
            postgres_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.pool_size, 4);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.db_path(), PathBuf::from("./data/waymark.db"));
    }

    #[test]
    fn test_test_config_uses_given_dir() {
        let config = Config::test_config(PathBuf::from("/tmp/waymark-test"));
        assert!(config.db_path().starts_with("/tmp/waymark-test"));
    }
}
