use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Which set of locally emulated services is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServicePhase {
    /// Key-value store and frontend export only
    Core,
    /// Key-value store, search index and frontend export
    Search,
    Full,
}

impl ServicePhase {
    pub fn search_enabled(&self) -> bool {
        matches!(self, Self::Search | Self::Full)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Core => "core",
            Self::Search => "search",
            Self::Full => "full",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub aws_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub dynamodb_endpoint: String,
    pub dynamodb_table: String,
    pub opensearch_endpoint: String,
    pub opensearch_artist_index: String,
    pub opensearch_studio_index: String,
    pub frontend_export_path: PathBuf,
    pub export_dir: PathBuf,
    pub image_base_url: String,
    pub service_phase: ServicePhase,
    pub write_rate_per_second: u32,
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub localstack_memory_limit: Option<String>,
    pub proxy_port: u16,
    pub proxy_backend_url: String,
    #[serde(default)]
    pub proxy_watch_path: Option<PathBuf>,
    pub proxy_debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aws_region: "eu-west-2".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            dynamodb_endpoint: "http://localhost:4566".to_string(),
            dynamodb_table: "tattoo-directory-local".to_string(),
            opensearch_endpoint: "http://localhost:9200".to_string(),
            opensearch_artist_index: "artists-local".to_string(),
            opensearch_studio_index: "studios-local".to_string(),
            frontend_export_path: PathBuf::from("frontend/src/app/data/mockArtistData.json"),
            export_dir: PathBuf::from("scripts/output"),
            image_base_url: "http://localhost:4566/tattoo-directory-images".to_string(),
            service_phase: ServicePhase::Full,
            write_rate_per_second: 10,
            request_timeout_secs: 30,
            localstack_memory_limit: None,
            proxy_port: 9001,
            proxy_backend_url: "http://localhost:9000".to_string(),
            proxy_watch_path: None,
            proxy_debounce_ms: 500,
        }
    }
}

impl Config {
    /// Load configuration from defaults, an optional `devtools.toml` and the environment.
    ///
    /// Environment variable names are the upper-cased field names, e.g.
    /// `DYNAMODB_ENDPOINT` or `SERVICE_PHASE`.
    pub fn load() -> Result<Self> {
        let defaults = ::config::Config::try_from(&Config::default())
            .context("Failed to build default configuration")?;

        let settings = ::config::Config::builder()
            .add_source(defaults)
            .add_source(::config::File::with_name("devtools").required(false))
            .add_source(::config::Environment::default().try_parsing(true))
            .build()
            .context("Failed to read configuration sources")?;

        let config: Config = settings
            .try_deserialize()
            .context("Invalid configuration values")?;

        if config.write_rate_per_second == 0 {
            anyhow::bail!("WRITE_RATE_PER_SECOND must be greater than zero");
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// LocalStack memory hint in megabytes, e.g. `2g` -> 2048, `512m` -> 512.
    pub fn memory_limit_mb(&self) -> Option<u64> {
        let raw = self.localstack_memory_limit.as_deref()?.trim().to_ascii_lowercase();
        let (digits, multiplier) = match raw.chars().last()? {
            'g' => (&raw[..raw.len() - 1], 1024),
            'm' => (&raw[..raw.len() - 1], 1),
            _ => (raw.as_str(), 1),
        };
        digits.trim().parse::<u64>().ok().map(|n| n * multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_limit_parsing() {
        let mut config = Config::default();
        assert_eq!(config.memory_limit_mb(), None);

        config.localstack_memory_limit = Some("2g".to_string());
        assert_eq!(config.memory_limit_mb(), Some(2048));

        config.localstack_memory_limit = Some("512M".to_string());
        assert_eq!(config.memory_limit_mb(), Some(512));

        config.localstack_memory_limit = Some("lots".to_string());
        assert_eq!(config.memory_limit_mb(), None);
    }

    #[test]
    fn test_service_phase_search() {
        assert!(!ServicePhase::Core.search_enabled());
        assert!(ServicePhase::Search.search_enabled());
        assert!(ServicePhase::Full.search_enabled());
    }
}
