use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tixer_db::DbConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("env var {0} not set")]
    Missing(&'static str),

    #[error("env var {key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Deployment environment. Selects the log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Environment::Local),
            "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(format!(
                "expected one of local, development, staging, production; got {other}"
            )),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `4000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal
    /// before their store calls are cancelled (default: `20`).
    pub shutdown_timeout_secs: u64,
    /// Largest accepted request body in bytes (default: 1 MiB).
    pub max_body_bytes: usize,
}

/// Database pool and per-query settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub pool: DbConfig,
    /// Upper bound on any single repository call.
    pub query_timeout: Duration,
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `ENVIRONMENT`                | `local`                 |
    /// | `HOST`                       | `0.0.0.0`               |
    /// | `PORT`                       | `4000`                  |
    /// | `CORS_ORIGINS`               | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`      | `20`                    |
    /// | `MAX_REQUEST_BODY_BYTES`     | `1048576`               |
    /// | `DATABASE_URL`               | required                |
    /// | `DB_MAX_OPEN_CONNS`          | `25`                    |
    /// | `DB_MIN_CONNS`               | `2`                     |
    /// | `DB_MAX_CONN_IDLE_TIME_SECS` | `900`                   |
    /// | `DB_QUERY_TIMEOUT_SECS`      | `5`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reading from an arbitrary source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let environment = env.parse("ENVIRONMENT", Environment::Local)?;

        let cors_origins = env
            .string("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server = ServerConfig {
            host: env.string("HOST", "0.0.0.0"),
            port: env.parse("PORT", 4000)?,
            cors_origins,
            request_timeout_secs: env.parse("REQUEST_TIMEOUT_SECS", 30)?,
            shutdown_timeout_secs: env.parse("SHUTDOWN_TIMEOUT_SECS", 20)?,
            max_body_bytes: env.parse("MAX_REQUEST_BODY_BYTES", 1_048_576)?,
        };

        let database = DatabaseConfig {
            pool: DbConfig {
                url: env.required("DATABASE_URL")?,
                max_connections: env.parse("DB_MAX_OPEN_CONNS", 25)?,
                min_connections: env.parse("DB_MIN_CONNS", 2)?,
                max_idle_time: Duration::from_secs(env.parse("DB_MAX_CONN_IDLE_TIME_SECS", 900)?),
            },
            query_timeout: Duration::from_secs(env.parse("DB_QUERY_TIMEOUT_SECS", 5)?),
        };

        Ok(Self {
            environment,
            server,
            database,
        })
    }
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.is_empty())
    }

    fn string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    fn parse<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/tixer")]).unwrap();

        assert_eq!(config.environment, Environment::Local);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.server.max_body_bytes, 1_048_576);
        assert_eq!(config.database.pool.max_connections, 25);
        assert_eq!(config.database.query_timeout, Duration::from_secs(5));
    }

    #[test]
    fn database_url_is_required() {
        assert_matches!(load(&[]), Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn malformed_numbers_are_errors() {
        let result = load(&[("DATABASE_URL", "postgres://x"), ("PORT", "eighty")]);
        assert_matches!(result, Err(ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn unknown_environment_is_an_error() {
        let result = load(&[("DATABASE_URL", "postgres://x"), ("ENVIRONMENT", "qa")]);
        assert_matches!(result, Err(ConfigError::Invalid { key: "ENVIRONMENT", .. }));
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = load(&[
            ("DATABASE_URL", "postgres://x"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
        ])
        .unwrap();
        assert_eq!(
            config.server.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }
}
