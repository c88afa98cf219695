//! Configuration Management
//!
//! Loads connection settings for the source MongoDB instance and the
//! destination PostgreSQL database from environment variables, with a
//! `.env` file picked up when present. Credentials are validated after
//! loading so a misconfigured environment fails at startup rather than
//! on first use.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

// Default values
const DEFAULT_MONGO_HOST: &str = "localhost";
const DEFAULT_MONGO_PORT: u16 = 27017;
const DEFAULT_MONGO_SERVER_SELECTION_TIMEOUT_MS: u64 = 2_000;
const DEFAULT_POSTGRES_HOST: &str = "localhost";
const DEFAULT_POSTGRES_PORT: u16 = 5432;
const DEFAULT_POSTGRES_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_POSTGRES_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Source MongoDB connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// How long the driver waits for a reachable server before failing
    pub server_selection_timeout_ms: u64,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_MONGO_HOST.to_string(),
            port: DEFAULT_MONGO_PORT,
            user: String::new(),
            password: String::new(),
            database: String::new(),
            server_selection_timeout_ms: DEFAULT_MONGO_SERVER_SELECTION_TIMEOUT_MS,
        }
    }
}

/// Destination PostgreSQL connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_POSTGRES_HOST.to_string(),
            port: DEFAULT_POSTGRES_PORT,
            user: String::new(),
            password: String::new(),
            database: String::new(),
            max_connections: DEFAULT_POSTGRES_MAX_CONNECTIONS,
            connect_timeout_secs: DEFAULT_POSTGRES_CONNECT_TIMEOUT_SECS,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub mongo: MongoConfig,
    pub postgres: PostgresConfig,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Reads a `.env` file if one exists, then overlays process environment
    /// variables on top of the defaults. Fails if the loaded values do not
    /// pass [`Config::validate`].
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mongo = MongoConfig {
            host: std::env::var("MONGO_HOST").unwrap_or_else(|_| DEFAULT_MONGO_HOST.to_string()),
            port: std::env::var("MONGO_PORT")
                .unwrap_or_else(|_| DEFAULT_MONGO_PORT.to_string())
                .parse()
                .context("Invalid MONGO_PORT")?,
            user: std::env::var("MONGO_USER").unwrap_or_default(),
            password: std::env::var("MONGO_PASSWORD").unwrap_or_default(),
            database: std::env::var("MONGO_DB").unwrap_or_default(),
            server_selection_timeout_ms: std::env::var("MONGO_SERVER_SELECTION_TIMEOUT_MS")
                .unwrap_or_else(|_| DEFAULT_MONGO_SERVER_SELECTION_TIMEOUT_MS.to_string())
                .parse()
                .context("Invalid MONGO_SERVER_SELECTION_TIMEOUT_MS")?,
        };

        let postgres = PostgresConfig {
            host: std::env::var("POSTGRES_DB_HOST")
                .unwrap_or_else(|_| DEFAULT_POSTGRES_HOST.to_string()),
            port: std::env::var("POSTGRES_DB_PORT")
                .unwrap_or_else(|_| DEFAULT_POSTGRES_PORT.to_string())
                .parse()
                .context("Invalid POSTGRES_DB_PORT")?,
            user: std::env::var("POSTGRES_USER").unwrap_or_default(),
            password: std::env::var("POSTGRES_PASSWORD").unwrap_or_default(),
            database: std::env::var("POSTGRES_DB").unwrap_or_default(),
            max_connections: std::env::var("POSTGRES_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DEFAULT_POSTGRES_MAX_CONNECTIONS.to_string())
                .parse()
                .context("Invalid POSTGRES_MAX_CONNECTIONS")?,
            connect_timeout_secs: std::env::var("POSTGRES_CONNECT_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_POSTGRES_CONNECT_TIMEOUT_SECS.to_string())
                .parse()
                .context("Invalid POSTGRES_CONNECT_TIMEOUT_SECS")?,
        };

        let config = Self { mongo, postgres };
        config.validate()?;
        Ok(config)
    }

    /// Validate the loaded values
    ///
    /// Checks the configuration that was actually loaded, not the raw
    /// environment, so defaults and `.env` entries count.
    pub fn validate(&self) -> Result<()> {
        if self.mongo.user.is_empty() {
            bail!("MONGO_USER must be set");
        }
        if self.mongo.password.is_empty() {
            bail!("MONGO_PASSWORD must be set");
        }
        if self.mongo.database.is_empty() {
            bail!("MONGO_DB must be set");
        }
        if self.postgres.user.is_empty() {
            bail!("POSTGRES_USER must be set");
        }
        if self.postgres.password.is_empty() {
            bail!("POSTGRES_PASSWORD must be set");
        }
        if self.postgres.database.is_empty() {
            bail!("POSTGRES_DB must be set");
        }
        if self.postgres.max_connections == 0 {
            bail!("POSTGRES_MAX_CONNECTIONS must be greater than 0");
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn populated() -> Config {
        Config {
            mongo: MongoConfig {
                user: "reader".to_string(),
                password: "secret".to_string(),
                database: "app".to_string(),
                ..MongoConfig::default()
            },
            postgres: PostgresConfig {
                user: "writer".to_string(),
                password: "secret".to_string(),
                database: "warehouse".to_string(),
                ..PostgresConfig::default()
            },
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.mongo.host, "localhost");
        assert_eq!(config.mongo.port, 27017);
        assert_eq!(config.mongo.server_selection_timeout_ms, 2_000);
        assert_eq!(config.postgres.port, 5432);
        assert_eq!(config.postgres.max_connections, 5);
    }

    #[test]
    fn test_validate_accepts_populated_config() {
        assert!(populated().validate().is_ok());
    }

    // Validation runs against the loaded values themselves, so an empty
    // credential is rejected no matter where it came from.
    #[test]
    fn test_validate_rejects_missing_credentials() {
        let mut config = populated();
        config.mongo.user.clear();
        assert!(config.validate().is_err());

        let mut config = populated();
        config.postgres.password.clear();
        assert!(config.validate().is_err());

        let mut config = populated();
        config.postgres.database.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_pool_size() {
        let mut config = populated();
        config.postgres.max_connections = 0;
        assert!(config.validate().is_err());
    }
}
