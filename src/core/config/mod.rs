use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "contacts.toml";
pub const MEMORY_DATABASE_URL: &str = ":memory:";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactsConfig {
    pub database: DatabaseConfig,
    pub bootstrap: BootstrapConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    pub run_migrations: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    pub seed_locations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "contacts.db".to_string(),
            pool_size: 8,
            run_migrations: true,
        }
    }
}

impl ContactsConfig {
    /// Layered sources, lowest priority first: built-in defaults, the TOML
    /// file at `path` (if present), `DATABASE_URL`, then `CONTACTS_*`
    /// variables with `__` separating sections
    /// (`CONTACTS_DATABASE__POOL_SIZE=4`).
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(
                Env::raw()
                    .only(&["DATABASE_URL"])
                    .map(|_| "database.url".into()),
            )
            .merge(Env::prefixed("CONTACTS_").split("__"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(path).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration for a private in-memory database, used by tests and
    /// throwaway tooling.
    pub fn in_memory() -> Self {
        Self {
            database: DatabaseConfig {
                url: MEMORY_DATABASE_URL.to_string(),
                pool_size: 1,
                run_migrations: true,
            },
            bootstrap: BootstrapConfig::default(),
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database.url == MEMORY_DATABASE_URL
    }

    fn validate(&self) -> Result<(), figment::Error> {
        if self.database.url.trim().is_empty() {
            return Err(figment::Error::from("database.url must not be empty".to_string()));
        }
        if self.database.pool_size == 0 {
            return Err(figment::Error::from("database.pool_size must be at least 1".to_string()));
        }
        Ok(())
    }
}
