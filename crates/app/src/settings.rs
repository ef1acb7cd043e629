//! Handles settings for the application.
//!
//! Sources, later ones win:
//! - an optional TOML file (`config/pantry.toml` unless `--config` is given);
//! - environment variables prefixed with `PANTRY`, nested keys separated by
//!   `__` (e.g. `PANTRY__APP__LEVEL=debug`);
//! - command line overrides applied by `main`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config/pantry.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite { path: String },
}

impl Default for Database {
    fn default() -> Self {
        Database::Sqlite {
            path: "pantry.db".to_string(),
        }
    }
}

impl Database {
    /// Connection string understood by sea-orm.
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite { path } => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub database: Database,
}

impl Settings {
    pub fn new(path: Option<&str>) -> Result<Self, ConfigError> {
        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("PANTRY").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(raw: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn defaults_when_empty() {
        let settings = from_toml("");
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.database.url(), "sqlite:pantry.db?mode=rwc");
    }

    #[test]
    fn memory_database() {
        let settings = from_toml(
            r#"
            [app]
            level = "debug"
            [database]
            kind = "memory"
            "#,
        );
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.database, Database::Memory);
        assert_eq!(settings.database.url(), "sqlite::memory:");
    }

    #[test]
    fn sqlite_path() {
        let settings = from_toml(
            r#"
            [database]
            kind = "sqlite"
            path = "/tmp/kitchen.db"
            "#,
        );
        assert_eq!(settings.database.url(), "sqlite:/tmp/kitchen.db?mode=rwc");
    }
}
