//! Configuration infrastructure
//!
//! Contains configuration loading and management for the LPSE client.
//! Settings live in a single JSON file under the user config directory and
//! are created with defaults on first use.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Portal connection and paging settings
    #[serde(default)]
    pub portal: PortalConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Portal connection and paging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Portal origin, e.g. `https://lpse.pu.go.id`
    pub host: String,

    /// Browser user agent presented to the portal
    pub user_agent: String,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Rows requested per listing page
    pub page_size: u32,

    /// Stop after this many pages (0 = no limit)
    pub max_pages: u32,

    /// Fetch the announcement page of every listed package
    pub fetch_details: bool,
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output (stderr, stdout carries results)
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Log file name inside the log directory
    pub file_name: String,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            host: lpse::HOST.to_string(),
            user_agent: defaults::USER_AGENT.to_string(),
            request_timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            page_size: defaults::PAGE_SIZE,
            max_pages: defaults::MAX_PAGES,
            fetch_details: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("reqwest".to_string(), "info".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("html5ever".to_string(), "warn".to_string());
                filters.insert("lpse_scraper_lib".to_string(), "info".to_string());
                filters
            },
        }
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join("lpse-scraper");

        Ok(config_dir)
    }

    /// Create a configuration manager for the default location
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        let config_path = config_dir.join("lpse_config.json");

        Ok(Self { config_path })
    }

    /// Create a configuration manager for an explicit file
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!("Configuration file not found, creating default: {:?}", self.config_path);
            let default_config = AppConfig::default();
            self.save_config(&default_config).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .with_context(|| format!("Failed to read configuration file {:?}", self.config_path))?;

        let config: AppConfig = serde_json::from_str(&content).with_context(|| {
            format!("Configuration file {:?} contains invalid JSON", self.config_path)
        })?;

        if config.portal.page_size == 0 {
            warn!("⚠️  page_size 0 in {:?}, using {}", self.config_path, defaults::PAGE_SIZE);
            return Ok(AppConfig {
                portal: PortalConfig {
                    page_size: defaults::PAGE_SIZE,
                    ..config.portal
                },
                ..config
            });
        }

        info!("Loaded configuration from: {:?}", self.config_path);
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    /// Update portal settings in place
    pub async fn update_portal_config<F>(&self, updater: F) -> Result<()>
    where
        F: FnOnce(&mut PortalConfig),
    {
        let mut config = self.load_config().await?;
        updater(&mut config.portal);
        self.save_config(&config).await
    }

    /// Reset configuration to defaults (useful for troubleshooting)
    pub async fn reset_to_defaults(&self) -> Result<AppConfig> {
        info!("🔄 Resetting configuration to defaults");
        let default_config = AppConfig::default();
        self.save_config(&default_config).await?;
        Ok(default_config)
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }
}

/// LPSE portal endpoints
pub mod lpse {
    /// Default portal origin
    pub const HOST: &str = "https://lpse.pu.go.id";

    /// Tender landing page; its response sets the session cookie
    pub const TENDER_PAGE: &str = "/eproc4/lelang";

    /// DataTables JSON endpoint for the tender listing
    pub const TENDER_DATA_TABLE: &str = "/eproc4/dt/lelang";

    /// Announcement page of one tender
    pub fn announcement_path(code: &str) -> String {
        format!("{TENDER_PAGE}/{code}/pengumumanlelang")
    }

    /// Schedule page of one tender
    pub fn schedule_path(code: &str) -> String {
        format!("{TENDER_PAGE}/{code}/jadwal")
    }
}

/// Default configuration values
pub mod defaults {
    /// Browser user agent the portal expects
    pub const USER_AGENT: &str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:86.0) Gecko/20100101 Firefox/86.0";

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    /// Default rows per listing page
    pub const PAGE_SIZE: u32 = 10;

    /// Default page limit (0 = all pages)
    pub const MAX_PAGES: u32 = 0;

    /// Default log level
    pub const LOG_LEVEL: &str = "info";

    /// Default JSON format setting
    pub const LOG_JSON_FORMAT: bool = false;

    /// Default console output setting
    pub const LOG_CONSOLE_OUTPUT: bool = true;

    /// Default file output setting
    pub const LOG_FILE_OUTPUT: bool = false;

    /// Default log file name
    pub const LOG_FILE_NAME: &str = "lpse-scraper.log";
}
