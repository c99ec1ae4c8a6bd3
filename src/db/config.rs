//! Destination connection settings
//!
//! Settings come from `MYSQL_*` environment variables, which the binary
//! may source from a dotenv file first.

use eyre::{Context, Result};
use std::fmt;

pub const ENV_HOST: &str = "MYSQL_HOST";
pub const ENV_PORT: &str = "MYSQL_PORT";
pub const ENV_USER: &str = "MYSQL_USER";
pub const ENV_PASSWORD: &str = "MYSQL_PASSWORD";
pub const ENV_DATABASE: &str = "MYSQL_DATABASE";
pub const ENV_CHARSET: &str = "MYSQL_CHARSET";

/// Coordinates and credentials of the destination database
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub charset: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "ecommerce_platform".to_string(),
            charset: "utf8mb4".to_string(),
        }
    }
}

impl DbConfig {
    /// Load settings from the environment, falling back to defaults
    ///
    /// Expected environment variables (all optional):
    /// - MYSQL_HOST: server host (default `localhost`)
    /// - MYSQL_PORT: server port (default `3306`)
    /// - MYSQL_USER: user name (default `root`)
    /// - MYSQL_PASSWORD: password (default empty)
    /// - MYSQL_DATABASE: schema holding the raw tables (default `ecommerce_platform`)
    /// - MYSQL_CHARSET: connection charset (default `utf8mb4`)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let port = match std::env::var(ENV_PORT) {
            Ok(port) => port
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", ENV_PORT, port))?,
            Err(_) => defaults.port,
        };

        Ok(Self {
            host: env_or(ENV_HOST, defaults.host),
            port,
            user: env_or(ENV_USER, defaults.user),
            password: env_or(ENV_PASSWORD, defaults.password),
            database: env_or(ENV_DATABASE, defaults.database),
            charset: env_or(ENV_CHARSET, defaults.charset),
        })
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

// Never print the password
impl fmt::Display for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mysql://{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("charset", &self.charset)
            .finish()
    }
}
