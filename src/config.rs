//! Configuration management for Vantage server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Connection settings for the Elasticsearch analytics engine
#[derive(Debug, Deserialize, Clone)]
pub struct ElasticConfig {
    /// Base URL of the cluster, e.g. http://localhost:9200
    pub url: String,
    /// Index the aggregation queries run against
    pub index: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    /// Country cap applied when the request does not carry a usable one
    pub default_country_limit: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub elastic: ElasticConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default"))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix VANTAGE_)
            .add_source(
                Environment::with_prefix("VANTAGE")
                    .separator("_")
                    .try_parsing(true),
            )
            // Override cluster URL from ELASTICSEARCH_URL env var if present
            .set_override_option(
                "elastic.url",
                env::var("ELASTICSEARCH_URL").ok(),
            )?
            // Override index name from ELASTIC_SEARCH_INDEX env var if present
            .set_override_option(
                "elastic.index",
                env::var("ELASTIC_SEARCH_INDEX").ok(),
            )?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            index: "kibana_sample_data_logs".to_string(),
            username: None,
            password: None,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_country_limit: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
