use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_parse, server::ServerConfig};
use strum::{Display, EnumString};

// Import MongoDB config from the database library
use database::mongodb::MongoConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Where product records live
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreKind {
    #[default]
    MongoDb,
    /// Process-local store, lost on restart; for local runs without MongoDB
    Memory,
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    /// Set when `store` is [`StoreKind::MongoDb`]
    pub mongodb: Option<MongoConfig>,
    pub server: ServerConfig,
    pub environment: Environment,
    pub store: StoreKind,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let store = env_parse("INVENTORY_STORE", StoreKind::default())?;
        let mongodb = match store {
            StoreKind::MongoDb => Some(MongoConfig::from_env()?),
            StoreKind::Memory => None,
        };
        let server = ServerConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
            store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_defaults_to_mongodb() {
        temp_env::with_vars(
            [
                ("INVENTORY_STORE", None),
                ("MONGODB_URL", Some("mongodb://db:27017")),
                ("MONGODB_DATABASE", Some("inventory")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.store, StoreKind::MongoDb);
                assert_eq!(config.mongodb.unwrap().database(), "inventory");
                assert_eq!(config.app.name, "inventory_api");
            },
        );
    }

    #[test]
    fn test_mongodb_store_requires_url() {
        temp_env::with_vars_unset(
            ["INVENTORY_STORE", "MONGODB_URL", "MONGO_URL"],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(matches!(err, ConfigError::MissingEnvVar(_)));
            },
        );
    }

    #[test]
    fn test_memory_store_needs_no_mongodb() {
        temp_env::with_vars(
            [
                ("INVENTORY_STORE", Some("Memory")),
                ("MONGODB_URL", None),
                ("MONGO_URL", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.store, StoreKind::Memory);
                assert!(config.mongodb.is_none());
            },
        );
    }

    #[test]
    fn test_store_unknown_is_rejected() {
        temp_env::with_var("INVENTORY_STORE", Some("postgres"), || {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { ref key, .. } if key == "INVENTORY_STORE"));
        });
    }
}
