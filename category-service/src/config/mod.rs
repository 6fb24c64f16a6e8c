use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub server_selection_timeout_secs: u64,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://127.0.0.1:27017".to_string(),
            database: "mydatabase".to_string(),
            server_selection_timeout_secs: 30,
        }
    }
}

impl CategoryConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env, APP__ prefix and PORT)
        let common_config = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";
        let defaults = MongoConfig::default();

        Ok(CategoryConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some(&defaults.uri), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some(&defaults.database), false)?,
                server_selection_timeout_secs: get_env(
                    "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                    Some("30"),
                    false,
                )?
                .parse()
                .map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "MONGODB_SERVER_SELECTION_TIMEOUT_SECS must be a whole number: {}",
                        e
                    ))
                })?,
            },
        })
    }
}

/// Reads `key`, falling back to `default` outside production.
fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mongo_defaults_point_at_local_instance() {
        let mongo = MongoConfig::default();
        assert_eq!(mongo.uri, "mongodb://127.0.0.1:27017");
        assert_eq!(mongo.database, "mydatabase");
        assert_eq!(mongo.server_selection_timeout_secs, 30);
    }

    #[test]
    fn get_env_uses_default_outside_production() {
        let value = get_env("CATEGORY_TEST_UNSET_KEY_DEV", Some("fallback"), false).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn get_env_requires_value_in_production() {
        let err = get_env("CATEGORY_TEST_UNSET_KEY_PROD", Some("fallback"), true).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn get_env_without_default_is_an_error() {
        let err = get_env("CATEGORY_TEST_UNSET_KEY_NONE", None, false).unwrap_err();
        assert!(err.to_string().contains("CATEGORY_TEST_UNSET_KEY_NONE"));
    }
}
