use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("PORT is not a valid TCP port: {0}")]
    InvalidPort(String),
}

/// # Service Configuration
///
/// Read once at startup from the environment (a `.env` file is loaded first
/// when present). `MONGODB_URI` and `DB_NAME` are required; the bind address
/// defaults to `127.0.0.1:8080`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub mongo_uri: String,
    pub db_name: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mongo_uri =
            env::var("MONGODB_URI").map_err(|_| ConfigError::MissingVar("MONGODB_URI"))?;
        let db_name = env::var("DB_NAME").map_err(|_| ConfigError::MissingVar("DB_NAME"))?;
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => 8080,
        };

        Ok(Self {
            mongo_uri,
            db_name,
            host,
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env mutations cannot race each other.
    #[test]
    fn test_from_env() {
        unsafe {
            env::set_var("MONGODB_URI", "mongodb://localhost:27017");
            env::set_var("DB_NAME", "vet_appointments_test");
            env::remove_var("HOST");
            env::remove_var("PORT");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.mongo_uri, "mongodb://localhost:27017");
        assert_eq!(config.db_name, "vet_appointments_test");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);

        unsafe {
            env::set_var("PORT", "not-a-port");
        }
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::InvalidPort(_))
        ));

        unsafe {
            env::remove_var("PORT");
            env::remove_var("MONGODB_URI");
        }
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::MissingVar("MONGODB_URI"))
        ));
    }
}
