use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use udd_store_db::{DbMetrics, OpenMode, PoolConfig, UddDb};

use crate::error::{ApiError, ConfigError, Result};

fn default_bind() -> String {
    "[::]:8080".into()
}

fn default_workers() -> usize {
    4
}

fn default_connection_rate() -> usize {
    256
}

fn default_database() -> PathBuf {
    PathBuf::from("udd.sqlite")
}

fn default_acquire_timeout_secs() -> u64 {
    30
}

fn default_enable_compression() -> bool {
    false
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_connection_rate")]
    pub max_connection_rate: usize,

    /// SQLite mirror of UDD, opened read-only.
    #[serde(default = "default_database")]
    pub database: PathBuf,
    /// Defaults to one connection per worker plus one.
    #[serde(default)]
    pub pool_size: Option<usize>,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,

    #[serde(default = "default_enable_compression")]
    pub enable_compression: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            workers: default_workers(),
            max_connection_rate: default_connection_rate(),
            database: default_database(),
            pool_size: None,
            acquire_timeout_secs: default_acquire_timeout_secs(),
            enable_compression: default_enable_compression(),
        }
    }
}

impl Config {
    pub fn load(settings_file: &Path) -> Result<Config> {
        let contents = read_to_string(settings_file).map_err(|e| ConfigError::ReadFile {
            path: settings_file.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Config> {
        let config: Config =
            toml::from_str(contents).map_err(|e| ApiError::from(ConfigError::from(e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| -> Result<()> {
            Err(ConfigError::Invalid {
                reason: reason.to_string(),
            }
            .into())
        };
        if self.workers == 0 {
            return invalid("workers must be greater than 0");
        }
        if self.pool_size == Some(0) {
            return invalid("pool_size must be greater than 0");
        }
        if self.acquire_timeout_secs == 0 {
            return invalid("acquire_timeout_secs must be greater than 0");
        }
        Ok(())
    }

    pub fn pool_config(&self, metrics: Option<Arc<DbMetrics>>) -> PoolConfig {
        PoolConfig {
            max_size: self.pool_size.unwrap_or(self.workers + 1),
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
            metrics,
        }
    }

    /// Open the configured database read-only.
    pub fn open_database(&self, metrics: Option<Arc<DbMetrics>>) -> Result<UddDb> {
        Ok(UddDb::open(
            &self.database,
            OpenMode::ReadOnly,
            self.pool_config(metrics),
        )?)
    }
}

/// Load settings from `CONFIG_FILE`, else `settings.toml` if present, else
/// defaults.
pub fn load() -> Result<Config> {
    match std::env::var("CONFIG_FILE") {
        Err(_) => {
            if Path::new("settings.toml").exists() {
                Config::load(Path::new("settings.toml"))
            } else {
                Ok(Config::default())
            }
        }
        Ok(settings_file) => Config::load(Path::new(&settings_file)),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.bind, "[::]:8080");
        assert_eq!(config.workers, 4);
        assert_eq!(config.database, PathBuf::from("udd.sqlite"));
        assert!(!config.enable_compression);

        let pool = config.pool_config(None);
        assert_eq!(pool.max_size, 5);
        assert_eq!(pool.acquire_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_explicit_values() {
        let config = Config::from_toml(
            r#"
            bind = "127.0.0.1:9000"
            workers = 2
            database = "/srv/udd/udd.sqlite"
            pool_size = 8
            acquire_timeout_secs = 5
            enable_compression = true
            "#,
        )
        .unwrap();
        assert_eq!(config.bind, "127.0.0.1:9000");
        assert_eq!(config.pool_config(None).max_size, 8);
        assert_eq!(
            config.pool_config(None).acquire_timeout,
            Duration::from_secs(5)
        );
        assert!(config.enable_compression);
    }

    #[rstest]
    #[case("workers = 0")]
    #[case("pool_size = 0")]
    #[case("acquire_timeout_secs = 0")]
    fn test_invalid_values(#[case] contents: &str) {
        let err = Config::from_toml(contents).unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::Invalid { .. })));
    }

    #[rstest]
    #[case("port = 80")]
    #[case("workers = \"four\"")]
    fn test_parse_errors(#[case] contents: &str) {
        let err = Config::from_toml(contents).unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "workers = 3").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.workers, 3);

        let err = Config::load(Path::new("/nonexistent/settings.toml")).unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::ReadFile { .. })));
    }

    #[test]
    fn test_open_missing_database() {
        let config = Config {
            database: PathBuf::from("/nonexistent/udd.sqlite"),
            ..Config::default()
        };
        assert!(matches!(
            config.open_database(None),
            Err(ApiError::Store(udd_store_db::Error::DatabaseNotFound(_)))
        ));
    }
}
