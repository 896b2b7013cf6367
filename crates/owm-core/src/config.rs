use anyhow::{Context, Result};
use owm_query::{Catalog, ExcessPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable that overrides `api.api_key`.
pub const API_KEY_ENV: &str = "OWM_API_KEY";

/// Location of the bulk city list published by OpenWeatherMap.
pub const DEFAULT_CITY_LIST_URL: &str = "http://bulk.openweathermap.org/sample/city.list.json.gz";

const APP_DIR: &str = "owm";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Weather API access
    pub api: ApiConfig,

    /// City reference data
    #[serde(default)]
    pub cities: CitiesConfig,

    /// Query building
    #[serde(default)]
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Static API key sent as `appid`
    pub api_key: String,

    /// Transport scheme prepended to every query path
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Replaces the host (and port) of every query path, e.g. a local proxy
    #[serde(default)]
    pub host_override: Option<String>,
}

fn default_scheme() -> String {
    "https".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl ApiConfig {
    /// Check if a key is configured (not the placeholder)
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.api_key.starts_with("YOUR_")
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: "YOUR_API_KEY".to_string(),
            scheme: default_scheme(),
            timeout_secs: default_timeout_secs(),
            host_override: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitiesConfig {
    /// Directory holding `city.list.json`
    #[serde(default = "default_city_data_dir")]
    pub data_dir: PathBuf,

    /// Where to download the gzip list from when it is missing locally
    #[serde(default = "default_city_list_url")]
    pub source_url: String,
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn default_city_data_dir() -> PathBuf {
    default_config_dir().join("city_list")
}

fn default_city_list_url() -> String {
    DEFAULT_CITY_LIST_URL.to_string()
}

impl Default for CitiesConfig {
    fn default() -> Self {
        Self {
            data_dir: default_city_data_dir(),
            source_url: default_city_list_url(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    /// What to do with parameters beyond the last optional suffix
    #[serde(default)]
    pub excess_parameters: ExcessPolicy,

    /// TOML catalog replacing the built-in one
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

impl QueryConfig {
    /// Load the configured catalog file, if any.
    ///
    /// # Errors
    /// Fails if the file cannot be read or does not hold a valid catalog.
    pub fn load_catalog(&self) -> Result<Option<Catalog>> {
        let Some(path) = &self.catalog_path else {
            return Ok(None);
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let catalog = Catalog::from_toml_str(&contents)
            .with_context(|| format!("Invalid catalog file {}", path.display()))?;
        tracing::info!("Loaded query catalog from {}", path.display());
        Ok(Some(catalog))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            api: ApiConfig::default(),
            cities: CitiesConfig::default(),
            query: QueryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    ///
    /// # Errors
    /// Fails if the file cannot be read, parsed or created.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if it is missing.
    ///
    /// # Errors
    /// Fails if the file cannot be read, parsed or created.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let mut config = Self::default();
            config.save_to(path)?;
            tracing::info!("Created default configuration at {}", path.display());
            config.apply_env();
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let mut config: Config = toml::from_str(&contents).context("Failed to parse config file")?;
        config.apply_env();

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    ///
    /// # Errors
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                tracing::debug!("Using API key from {}", API_KEY_ENV);
                self.api.api_key = key;
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.api.scheme != "http" && self.api.scheme != "https" {
            result.add_error(
                "api.scheme",
                format!("Scheme must be http or https, got: {}", self.api.scheme),
            );
        }

        if self.api.timeout_secs == 0 {
            result.add_error("api.timeout_secs", "Timeout must be greater than 0");
        } else if self.api.timeout_secs > 300 {
            result.add_warning("api.timeout_secs", "Timeout is unusually long (>300s)");
        }

        if let Some(host) = &self.api.host_override {
            if host.is_empty() || host.contains('/') {
                result.add_error(
                    "api.host_override",
                    "Host override must be a bare host[:port] without scheme or path",
                );
            }
        }

        if !self.api.is_configured() {
            result.add_warning(
                "api.api_key",
                format!("API key not configured - set it here or via {}", API_KEY_ENV),
            );
        }

        Self::validate_url(&self.cities.source_url, "cities.source_url", &mut result);

        if let Some(path) = &self.query.catalog_path {
            if !path.is_file() {
                result.add_error(
                    "query.catalog_path",
                    format!("Catalog file does not exist: {}", path.display()),
                );
            }
        }

        result
    }

    fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }
                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    /// Fails if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    /// Fails if the directory cannot be created or the file written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    ///
    /// # Errors
    /// Fails if the platform has no configuration directory.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join(APP_DIR);

        Ok(config_dir.join("config.toml"))
    }
}
