//! Process configuration, read once from the environment at start-up

use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_DB_MAX_CONNECTIONS, DEFAULT_PORT};

/// Where the classifier weights come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Directory holding `config.json` and `model.safetensors`
    LocalDir(PathBuf),
    /// Hugging Face hub repository id, fetched on load
    HubRepo(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Postgres URL. Predictions are kept in memory when unset.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    /// `None` leaves the model unloaded and the API permanently not ready.
    pub model_source: Option<ModelSource>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = non_empty("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let db_max_connections = non_empty("DB_MAX_CONNECTIONS")
            .and_then(|s| s.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);

        let model_source = non_empty("MODEL_DIR")
            .map(|dir| ModelSource::LocalDir(PathBuf::from(dir)))
            .or_else(|| non_empty("MODEL_REPO").map(ModelSource::HubRepo));

        Self {
            port,
            database_url: non_empty("DATABASE_URL"),
            db_max_connections,
            model_source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.db_max_connections, 5);
        assert!(config.database_url.is_none());
        assert!(config.model_source.is_none());
    }

    #[test]
    fn test_model_dir_takes_precedence() {
        let config = config_from(&[("MODEL_DIR", "/models/skin"), ("MODEL_REPO", "org/model")]);
        assert_eq!(
            config.model_source,
            Some(ModelSource::LocalDir(PathBuf::from("/models/skin")))
        );

        let config = config_from(&[("MODEL_REPO", "org/model")]);
        assert_eq!(
            config.model_source,
            Some(ModelSource::HubRepo("org/model".to_string()))
        );
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[("PORT", "not-a-port"), ("DB_MAX_CONNECTIONS", "0"), ("DATABASE_URL", " ")]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.db_max_connections, 5);
        assert!(config.database_url.is_none());
    }
}
