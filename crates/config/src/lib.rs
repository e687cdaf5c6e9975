//! Configuration for the pocket package store.
//!
//! Values are layered with [`figment`], later layers overriding earlier ones:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. An optional configuration file (`.toml`, `.yaml`/`.yml` or `.json`)
//! 3. Environment variables prefixed with `POCKET_`, nested keys separated by
//!    a double underscore (e.g. `POCKET_DATABASE__PATH=/srv/mirror/pocket.db`)

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;
use tracing::level_filters::LevelFilter;

const ENV_PREFIX: &str = "POCKET_";
const DEFAULT_DATABASE_FILE: &str = "pocket.db";

/// File permissions used when the store file is created (owner read/write).
///
/// Deliberately not part of [`DatabaseConfig`]; it is not configurable.
pub const DATABASE_FILE_MODE: u32 = 0o600;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub log: LogConfig,
}

/// Where the package store lives on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the store file. Relative paths are resolved against the
    /// working directory when the store is opened.
    pub path: PathBuf,
}
impl Default for DatabaseConfig {
    fn default() -> Self {
        let path = ProjectDirs::from("", "", "pocket")
            .map(|dirs| dirs.data_dir().join(DEFAULT_DATABASE_FILE))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE));
        Self { path }
    }
}
impl DatabaseConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Maximum verbosity (`off`, `error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
}
impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}
impl LogConfig {
    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.level
            .parse::<LevelFilter>()
            .or_raise(|| ErrorKind::InvalidValue(format!("log.level `{}`", self.level)))
    }
}

impl Config {
    /// Build the layered [`Figment`] without extracting it.
    ///
    /// Useful for callers that want to merge in their own providers.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(file) = file {
            // Figment silently treats a missing file as an empty provider.
            if !file.is_file() {
                exn::bail!(ErrorKind::InvalidValue(format!("configuration file not found: {}", file.display())));
            }
            figment = match file.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file(file)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(file)),
                Some("json") => figment.merge(Json::file(file)),
                _ => exn::bail!(ErrorKind::InvalidValue(format!(
                    "unsupported configuration format: {}",
                    file.display()
                ))),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load and validate the configuration.
    #[instrument(level = "debug")]
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::from_figment(&Self::figment(file)?)
    }

    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        tracing::debug!(path = %config.database.path.display(), level = %config.log.level, "configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.path.as_os_str().is_empty() {
            exn::bail!(ErrorKind::InvalidValue("database.path is empty".to_string()));
        }
        self.log.level_filter()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.log.level, "info");
        assert!(config.database.path.ends_with(DEFAULT_DATABASE_FILE));
    }

    #[rstest]
    #[case("pocket.toml", "[database]\npath = \"mirror/store.db\"\n\n[log]\nlevel = \"debug\"\n")]
    #[case("pocket.yaml", "database:\n  path: mirror/store.db\nlog:\n  level: debug\n")]
    #[case("pocket.yml", "database:\n  path: mirror/store.db\nlog:\n  level: debug\n")]
    #[case("pocket.json", r#"{"database": {"path": "mirror/store.db"}, "log": {"level": "debug"}}"#)]
    fn test_load_from_file(#[case] name: &str, #[case] contents: &str) {
        // Jail serializes access to the process environment with the other
        // figment tests.
        Jail::expect_with(|jail| {
            jail.create_file(name, contents)?;
            let config = Config::load(Some(Path::new(name))).map_err(|e| format!("{e:?}"))?;
            assert_eq!(config.database.path, PathBuf::from("mirror/store.db"));
            assert_eq!(config.log.level, "debug");
            Ok(())
        });
    }

    #[test]
    fn test_environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("pocket.toml", "[database]\npath = \"from-file.db\"\n")?;
            jail.set_env("POCKET_DATABASE__PATH", "from-env.db");
            let config = Config::load(Some(Path::new("pocket.toml"))).map_err(|e| format!("{e:?}"))?;
            assert_eq!(config.database.path, PathBuf::from("from-env.db"));
            assert_eq!(config.log.level, "info");
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::figment(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(*err, ErrorKind::InvalidValue(_)));
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pocket.ini");
        std::fs::write(&file, "path=x").unwrap();
        let err = Config::figment(Some(&file)).unwrap_err();
        assert!(matches!(*err, ErrorKind::InvalidValue(_)));
    }

    #[rstest]
    #[case("off", LevelFilter::OFF)]
    #[case("warn", LevelFilter::WARN)]
    #[case("TRACE", LevelFilter::TRACE)]
    fn test_level_filter(#[case] level: &str, #[case] expected: LevelFilter) {
        let log = LogConfig { level: level.to_string() };
        assert_eq!(log.level_filter().unwrap(), expected);
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();
        config.log.level = "chatty".to_string();
        assert!(matches!(*config.validate().unwrap_err(), ErrorKind::InvalidValue(_)));

        let config = Config { database: DatabaseConfig::new(""), ..Config::default() };
        assert!(matches!(*config.validate().unwrap_err(), ErrorKind::InvalidValue(_)));
    }
}
