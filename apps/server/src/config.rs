//! Server configuration read from the environment.

use std::env;
use std::path::PathBuf;

use quint_core::Algorithm;

/// Runtime settings for the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    /// Algorithm assigned to decks created without explicit parameters.
    pub default_algorithm: Algorithm,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            default_algorithm: Algorithm::Fsrs,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid PORT '{port}': {e}"))?,
            None => defaults.port,
        };

        let default_algorithm = match lookup("QUINT_DEFAULT_ALGORITHM") {
            Some(name) => name.parse()?,
            None => defaults.default_algorithm,
        };

        Ok(Self {
            database_path: lookup("QUINT_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            default_algorithm,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quint")
        .join("quint.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert!(config.database_path.ends_with("quint/quint.db"));
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("QUINT_DATABASE_PATH", "/tmp/q.db"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("QUINT_DEFAULT_ALGORITHM", "SM2"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/q.db"));
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.default_algorithm, Algorithm::Sm2);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_lookup(lookup(&[("PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup(&[("QUINT_DEFAULT_ALGORITHM", "leitner")])).is_err());
    }
}
